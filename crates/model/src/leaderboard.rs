use std::{cmp::Ordering, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    participant::{Position, Telemetry},
    ExampleData, Timestamp,
};

/// Direction in which a larger course progress counts as leading.
///
/// The sign convention of the progress scalar depends on how the course file
/// was drawn, so the winning direction is a per-deployment setting rather
/// than a property of the data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum RankingOrder {
    Ascending,
    Descending,
}

impl Default for RankingOrder {
    fn default() -> Self {
        RankingOrder::Descending
    }
}

impl FromStr for RankingOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(RankingOrder::Ascending),
            "descending" | "desc" => Ok(RankingOrder::Descending),
            other => Err(format!("unknown ranking order \"{}\"", other)),
        }
    }
}

/// One participant projected onto the course.
///
/// Recomputed from the participant features on every refresh; the persisted
/// board is a cache of the last successful computation, not a source of
/// truth.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub device_id: String,
    /// Distance along the course, in kilometers, of the snapped position.
    pub course_progress: f64,
    /// Offset between the displayed position and the course, in kilometers.
    pub distance_from_course: f64,
    /// The displayed position snapped onto the course polyline.
    pub position: Position,
    pub last_move_timestamp: Timestamp,
    pub last_report_timestamp: Timestamp,
    pub telemetry: Telemetry,
}

impl LeaderboardEntry {
    /// Ranks entries in place: course progress in the requested direction,
    /// ties broken by device id so repeated rankings are stable.
    pub fn sort(entries: &mut [LeaderboardEntry], order: RankingOrder) {
        entries.sort_by(|a, b| {
            let by_progress = match order {
                RankingOrder::Ascending => {
                    a.course_progress.partial_cmp(&b.course_progress)
                }
                RankingOrder::Descending => {
                    b.course_progress.partial_cmp(&a.course_progress)
                }
            };
            by_progress
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.device_id.cmp(&b.device_id))
        });
    }
}

impl ExampleData for LeaderboardEntry {
    fn example_data() -> Self {
        LeaderboardEntry {
            device_id: "tracker-017".to_owned(),
            course_progress: 23.4,
            distance_from_course: 0.012,
            position: Position {
                longitude: 10.1283,
                latitude: 54.3227,
            },
            last_move_timestamp: 1_722_772_740.0,
            last_report_timestamp: 1_722_772_800.0,
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
