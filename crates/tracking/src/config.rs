use std::env;

use model::leaderboard::RankingOrder;

/// Deployment configuration read from the environment.
#[derive(Debug, Clone, Default)]
pub struct TrackingConfig {
    /// Which progress direction counts as leading (`LEADERBOARD_ORDER`,
    /// `ascending` or `descending`).
    pub ranking_order: RankingOrder,
    /// Course file to load on startup (`COURSE_PATH`), if any. Without it
    /// the course is loaded lazily by the first leaderboard refresh.
    pub course_path: Option<String>,
}

impl TrackingConfig {
    pub fn from_env() -> Self {
        let ranking_order = match env::var("LEADERBOARD_ORDER") {
            Ok(value) => value.parse().unwrap_or_else(|why: String| {
                log::warn!("{}, falling back to the default order", why);
                RankingOrder::default()
            }),
            Err(_) => RankingOrder::default(),
        };

        Self {
            ranking_order,
            course_path: env::var("COURSE_PATH").ok(),
        }
    }
}
