use model::{
    leaderboard::LeaderboardEntry,
    participant::{Position, Telemetry},
};

/// One ranked participant from the last successful refresh.
/// Table: `leaderboard_entries`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaderboardEntryRow {
    pub device_id: String,
    pub course_progress: f64,
    pub distance_from_course: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub last_move_timestamp: f64,
    pub last_report_timestamp: f64,
    pub altitude: Option<f64>,
    pub temperature: Option<f64>,
    pub battery: Option<f64>,
    pub satellite_count: Option<i32>,
    pub signal_quality: Option<f64>,
    pub status_code: Option<i32>,
}

impl LeaderboardEntryRow {
    pub fn to_model(self) -> LeaderboardEntry {
        LeaderboardEntry {
            device_id: self.device_id,
            course_progress: self.course_progress,
            distance_from_course: self.distance_from_course,
            position: Position {
                longitude: self.longitude,
                latitude: self.latitude,
            },
            last_move_timestamp: self.last_move_timestamp,
            last_report_timestamp: self.last_report_timestamp,
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
