use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One vertex of the course polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoursePoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// The reference path participants are ranked against. Built once from the
/// course file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Course {
    pub points: Vec<CoursePoint>,
}

impl Course {
    /// A polyline needs at least a start and an end.
    pub const MIN_POINTS: usize = 2;

    pub fn coordinates(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .map(|point| (point.longitude, point.latitude))
    }
}
