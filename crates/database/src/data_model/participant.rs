use model::participant::{ParticipantFeature, Position, Telemetry};

/// The persisted feature of one tracked device.
/// Table: `participants`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub device_id: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub last_report_timestamp: f64,
    pub last_move_timestamp: f64,
    pub altitude: Option<f64>,
    pub temperature: Option<f64>,
    pub battery: Option<f64>,
    pub satellite_count: Option<i32>,
    pub signal_quality: Option<f64>,
    pub status_code: Option<i32>,
}

impl ParticipantRow {
    pub fn to_model(self) -> ParticipantFeature {
        ParticipantFeature {
            device_id: self.device_id,
            position: match (self.longitude, self.latitude) {
                (Some(longitude), Some(latitude)) => Some(Position {
                    longitude,
                    latitude,
                }),
                _ => None,
            },
            last_report_timestamp: self.last_report_timestamp,
            last_move_timestamp: self.last_move_timestamp,
            telemetry: Telemetry {
                altitude: self.altitude,
                temperature: self.temperature,
                battery: self.battery,
                satellite_count: self.satellite_count,
                signal_quality: self.signal_quality,
                status_code: self.status_code,
            },
        }
    }
}
