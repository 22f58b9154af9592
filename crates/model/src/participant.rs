use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ExampleData, Timestamp};

/// A coordinate pair in degrees.
///
/// Comparison is exact on both components: a resent fix compares equal,
/// jitter of any magnitude compares unequal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

/// Sensor readings carried alongside a fix. Replaced wholesale on every
/// report, never merged with values from an earlier report.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub altitude: Option<f64>,
    pub temperature: Option<f64>,
    pub battery: Option<f64>,
    pub satellite_count: Option<i32>,
    pub signal_quality: Option<f64>,
    pub status_code: Option<i32>,
}

/// The persisted state of one tracked device.
///
/// `position` is the *displayed* position. It can lag behind the raw fix when
/// the device reports a degraded status, and it can be absent entirely when a
/// device has only ever reported without coordinates. Consumers must treat a
/// positionless feature as undisplayable rather than fail.
///
/// `last_move_timestamp <= last_report_timestamp` holds for every feature
/// produced by the resolver.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFeature {
    pub device_id: String,
    pub position: Option<Position>,
    pub last_report_timestamp: Timestamp,
    pub last_move_timestamp: Timestamp,
    pub telemetry: Telemetry,
}

impl ParticipantFeature {
    pub fn longitude(&self) -> Option<f64> {
        self.position.map(|position| position.longitude)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.position.map(|position| position.latitude)
    }
}

impl ExampleData for ParticipantFeature {
    fn example_data() -> Self {
        ParticipantFeature {
            device_id: "tracker-017".to_owned(),
            position: Some(Position {
                longitude: 10.1283,
                latitude: 54.3227,
            }),
            last_report_timestamp: 1_722_772_800.0,
            last_move_timestamp: 1_722_772_740.0,
            telemetry: Telemetry {
                altitude: Some(12.0),
                temperature: Some(21.5),
                battery: Some(3.9),
                satellite_count: Some(7),
                signal_quality: Some(9.5),
                status_code: Some(204),
            },
        }
    }
}
