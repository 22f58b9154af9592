use std::sync::Arc;

use indexmap::IndexMap;
use model::{
    course::Course,
    leaderboard::{LeaderboardEntry, RankingOrder},
    participant::ParticipantFeature,
    report::RawReport,
};

use crate::{
    config::TrackingConfig,
    course::CourseHandle,
    database::{
        BlobRepo, FeatureRepo, LeaderboardRepo, Store,
    },
    gpx, ingest, leaderboard, RequestResult,
};

/// Domain facade handed to the web layer.
///
/// Cheap to clone; clones share the store backend, the course cache and the
/// configuration.
#[derive(Debug, Clone)]
pub struct Client<S>
where
    S: Store + 'static,
{
    store: S,
    course: CourseHandle,
    config: Arc<TrackingConfig>,
}

impl<S> Client<S>
where
    S: Store,
{
    pub fn new(store: S, config: TrackingConfig) -> Self {
        Self {
            store,
            course: CourseHandle::new(),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Validates and ingests one raw report.
    pub async fn submit_report(
        &self,
        raw: RawReport,
    ) -> RequestResult<ParticipantFeature> {
        let payload = raw.validate()?;
        ingest::ingest(&self.store, &payload).await
    }

    pub async fn participants(
        &self,
    ) -> RequestResult<IndexMap<String, ParticipantFeature>> {
        Ok(self.store.auto().get_all().await?)
    }

    pub async fn participant(
        &self,
        device_id: &str,
    ) -> RequestResult<ParticipantFeature> {
        Ok(self.store.auto().get(device_id).await?)
    }

    /// Recomputes the leaderboard from the current participant set and
    /// atomically replaces the persisted board. Returns the number of ranked
    /// participants. Nothing is written when the course is unavailable or
    /// the projection fails.
    pub async fn refresh_leaderboard(
        &self,
        course_path: &str,
        force_reload: bool,
    ) -> RequestResult<usize> {
        let course = self
            .course
            .ensure_loaded(&mut self.store.auto(), course_path, force_reload)
            .await?;
        let participants = self.store.auto().get_all().await?;
        let entries = leaderboard::project(&course, &participants);
        self.store.auto().replace_leaderboard(&entries).await?;
        Ok(entries.len())
    }

    /// The persisted board, ranked. `order` overrides the configured
    /// deployment default. Fails before the first course load rather than
    /// serving an empty board.
    pub async fn leaderboard(
        &self,
        order: Option<RankingOrder>,
    ) -> RequestResult<Vec<LeaderboardEntry>> {
        self.course.get().await?;

        let entries = self.store.auto().get_leaderboard().await?;
        let mut entries = entries.into_values().collect::<Vec<_>>();
        LeaderboardEntry::sort(
            &mut entries,
            order.unwrap_or(self.config.ranking_order),
        );
        Ok(entries)
    }

    /// The currently cached course.
    pub async fn course(&self) -> RequestResult<Arc<Course>> {
        self.course.get().await
    }

    /// Loads the course from the blob store unless already cached.
    pub async fn load_course(
        &self,
        course_path: &str,
        force_reload: bool,
    ) -> RequestResult<Arc<Course>> {
        self.course
            .ensure_loaded(&mut self.store.auto(), course_path, force_reload)
            .await
    }

    /// Converts an uploaded GPX track into the GeoJSON course format and
    /// stores it next to the source. Returns the path of the converted file.
    pub async fn convert_course(
        &self,
        gpx_path: &str,
    ) -> RequestResult<String> {
        let geojson_path = gpx::geojson_path(gpx_path)?;
        let bytes = self.store.auto().download(gpx_path).await?;
        let geojson = gpx::gpx_to_geojson(&bytes)?;
        self.store
            .auto()
            .upload(&geojson_path, &geojson, "application/geo+json")
            .await?;
        Ok(geojson_path)
    }
}
