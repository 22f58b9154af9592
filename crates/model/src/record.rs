use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    participant::{ParticipantFeature, Telemetry},
    report::ReportPayload,
    Timestamp,
};

/// One append-only analytical row: the raw report merged with what the
/// resolver derived from it. Written on every ingested report and never read
/// back by this service.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    pub device_id: String,
    /// Report time as claimed by the device or gateway clock.
    pub reported_at: Timestamp,
    /// Server-side receive time.
    pub received_at: DateTime<Utc>,
    pub raw_longitude: Option<f64>,
    pub raw_latitude: Option<f64>,
    pub displayed_longitude: Option<f64>,
    pub displayed_latitude: Option<f64>,
    pub last_move_timestamp: Timestamp,
    #[serde(flatten)]
    pub telemetry: Telemetry,
}

impl TelemetryRecord {
    pub fn derive(
        payload: &ReportPayload,
        resolved: &ParticipantFeature,
        received_at: DateTime<Utc>,
    ) -> Self {
        TelemetryRecord {
            device_id: payload.device_id.clone(),
            reported_at: payload.timestamp,
            received_at,
            raw_longitude: payload.position.map(|position| position.longitude),
            raw_latitude: payload.position.map(|position| position.latitude),
            displayed_longitude: resolved.longitude(),
            displayed_latitude: resolved.latitude(),
            last_move_timestamp: resolved.last_move_timestamp,
            telemetry: payload.telemetry.clone(),
        }
    }
}
