use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{
    leaderboard::{LeaderboardEntry, RankingOrder},
    participant::ParticipantFeature,
    record::TelemetryRecord,
    report::RawReport,
    Timestamp,
};
use tracking::{
    client::Client,
    config::TrackingConfig,
    database::{
        BlobRepo, FeatureRepo, LeaderboardRepo, Result as StoreResult,
        Store, StoreError, StoreOperations, TelemetryLogRepo,
    },
    RequestError,
};

#[derive(Default)]
struct MemState {
    features: IndexMap<String, ParticipantFeature>,
    records: Vec<TelemetryRecord>,
    leaderboard: IndexMap<String, LeaderboardEntry>,
    blobs: IndexMap<String, Vec<u8>>,
    downloads: usize,
    fail_appends: bool,
    conflicts_left: usize,
}

#[derive(Clone, Default)]
struct MemStore {
    state: Arc<Mutex<MemState>>,
}

impl MemStore {
    fn with_blob(path: &str, content: &[u8]) -> Self {
        let store = MemStore::default();
        store
            .state()
            .blobs
            .insert(path.to_owned(), content.to_vec());
        store
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap()
    }
}

struct MemOps {
    state: Arc<Mutex<MemState>>,
}

impl MemOps {
    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl FeatureRepo for MemOps {
    async fn get(&mut self, device_id: &str) -> StoreResult<ParticipantFeature> {
        self.state()
            .features
            .get(device_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_all(
        &mut self,
    ) -> StoreResult<IndexMap<String, ParticipantFeature>> {
        Ok(self.state().features.clone())
    }

    async fn put_if_unmodified(
        &mut self,
        feature: &ParticipantFeature,
        expected_last_report: Option<Timestamp>,
    ) -> StoreResult<ParticipantFeature> {
        let mut state = self.state();
        if state.conflicts_left > 0 {
            state.conflicts_left -= 1;
            return Err(StoreError::Conflict);
        }
        let current = state
            .features
            .get(&feature.device_id)
            .map(|feature| feature.last_report_timestamp);
        if current != expected_last_report {
            return Err(StoreError::Conflict);
        }
        state
            .features
            .insert(feature.device_id.clone(), feature.clone());
        Ok(feature.clone())
    }
}

#[async_trait]
impl TelemetryLogRepo for MemOps {
    async fn append(&mut self, record: &TelemetryRecord) -> StoreResult<()> {
        let mut state = self.state();
        if state.fail_appends {
            return Err(StoreError::other(std::io::Error::new(
                std::io::ErrorKind::Other,
                "telemetry backend down",
            )));
        }
        state.records.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl LeaderboardRepo for MemOps {
    async fn replace_leaderboard(
        &mut self,
        entries: &IndexMap<String, LeaderboardEntry>,
    ) -> StoreResult<()> {
        self.state().leaderboard = entries.clone();
        Ok(())
    }

    async fn get_leaderboard(
        &mut self,
    ) -> StoreResult<IndexMap<String, LeaderboardEntry>> {
        Ok(self.state().leaderboard.clone())
    }
}

#[async_trait]
impl BlobRepo for MemOps {
    async fn download(&mut self, path: &str) -> StoreResult<Vec<u8>> {
        let mut state = self.state();
        state.downloads += 1;
        state.blobs.get(path).cloned().ok_or(StoreError::NotFound)
    }

    async fn upload(
        &mut self,
        path: &str,
        content: &[u8],
        _content_type: &str,
    ) -> StoreResult<()> {
        self.state().blobs.insert(path.to_owned(), content.to_vec());
        Ok(())
    }
}

impl StoreOperations for MemOps {}

impl Store for MemStore {
    type Autocommit = MemOps;

    fn auto(&self) -> Self::Autocommit {
        MemOps {
            state: self.state.clone(),
        }
    }
}

const COURSE_PATH: &str = "courses/city.geojson";
const COURSE: &str = r#"{"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[0.0,0.0],[10.0,0.0]]}}"#;

fn client(store: &MemStore) -> Client<MemStore> {
    Client::new(store.clone(), TrackingConfig::default())
}

fn raw_report(
    device_id: &str,
    status_code: Option<i32>,
    coordinates: Option<(f64, f64)>,
    timestamp: f64,
) -> RawReport {
    RawReport {
        device_id: Some(device_id.to_owned()),
        status_code,
        timestamp: Some(timestamp),
        longitude: coordinates.map(|(longitude, _)| longitude),
        latitude: coordinates.map(|(_, latitude)| latitude),
        battery: Some(3.9),
        ..Default::default()
    }
}

#[tokio::test]
async fn first_report_creates_a_feature_and_logs_telemetry() {
    let store = MemStore::default();
    let client = client(&store);

    let feature = client
        .submit_report(raw_report("a", Some(200), Some((10.0, 20.0)), 100.0))
        .await
        .unwrap();

    assert_eq!(feature.longitude(), Some(10.0));
    assert_eq!(feature.last_move_timestamp, 100.0);

    let state = store.state();
    assert_eq!(state.features.len(), 1);
    assert_eq!(state.records.len(), 1);
    assert_eq!(state.records[0].raw_longitude, Some(10.0));
    assert_eq!(state.records[0].displayed_longitude, Some(10.0));
}

#[tokio::test]
async fn invalid_reports_are_rejected_without_mutation() {
    let store = MemStore::default();
    let client = client(&store);

    let report = RawReport {
        device_id: None,
        ..raw_report("ignored", Some(200), Some((10.0, 20.0)), 100.0)
    };
    let result = client.submit_report(report).await;

    assert!(matches!(result, Err(RequestError::Validation(_))));
    let state = store.state();
    assert!(state.features.is_empty());
    assert!(state.records.is_empty());
}

#[tokio::test]
async fn degraded_status_pins_the_displayed_position() {
    let store = MemStore::default();
    let client = client(&store);

    client
        .submit_report(raw_report("a", Some(200), Some((10.0, 20.0)), 100.0))
        .await
        .unwrap();
    let feature = client
        .submit_report(raw_report("a", Some(205), Some((99.0, 99.0)), 150.0))
        .await
        .unwrap();

    assert_eq!(feature.longitude(), Some(10.0));
    assert_eq!(feature.latitude(), Some(20.0));
    assert_eq!(feature.last_move_timestamp, 100.0);
    assert_eq!(feature.last_report_timestamp, 150.0);
}

#[tokio::test]
async fn telemetry_log_failure_does_not_fail_ingestion() {
    let store = MemStore::default();
    store.state().fail_appends = true;
    let client = client(&store);

    let result = client
        .submit_report(raw_report("a", Some(200), Some((10.0, 20.0)), 100.0))
        .await;

    assert!(result.is_ok());
    let state = store.state();
    assert_eq!(state.features.len(), 1);
    assert!(state.records.is_empty());
}

#[tokio::test]
async fn lost_feature_writes_are_retried() {
    let store = MemStore::default();
    store.state().conflicts_left = 1;
    let client = client(&store);

    let result = client
        .submit_report(raw_report("a", Some(200), Some((10.0, 20.0)), 100.0))
        .await;

    assert!(result.is_ok());
    assert_eq!(store.state().features.len(), 1);
}

#[tokio::test]
async fn leaderboard_requires_a_loaded_course() {
    let store = MemStore::with_blob(COURSE_PATH, COURSE.as_bytes());
    let client = client(&store);

    assert!(matches!(
        client.leaderboard(None).await,
        Err(RequestError::CourseNotLoaded)
    ));
}

#[tokio::test]
async fn refresh_projects_ranks_and_persists() {
    let store = MemStore::with_blob(COURSE_PATH, COURSE.as_bytes());
    let client = client(&store);

    client
        .submit_report(raw_report("behind", Some(200), Some((2.0, 0.01)), 100.0))
        .await
        .unwrap();
    client
        .submit_report(raw_report("ahead", Some(200), Some((8.0, 0.01)), 100.0))
        .await
        .unwrap();
    client
        .submit_report(raw_report("dark", Some(200), None, 100.0))
        .await
        .unwrap();

    let ranked = client
        .refresh_leaderboard(COURSE_PATH, false)
        .await
        .unwrap();
    assert_eq!(ranked, 2);

    // Default order is descending: the device further along leads.
    let board = client.leaderboard(None).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].device_id, "ahead");

    let board = client
        .leaderboard(Some(RankingOrder::Ascending))
        .await
        .unwrap();
    assert_eq!(board[0].device_id, "behind");
}

#[tokio::test]
async fn the_course_is_loaded_once_until_forced() {
    let store = MemStore::with_blob(COURSE_PATH, COURSE.as_bytes());
    let client = client(&store);

    client.refresh_leaderboard(COURSE_PATH, false).await.unwrap();
    client.refresh_leaderboard(COURSE_PATH, false).await.unwrap();
    assert_eq!(store.state().downloads, 1);

    client.refresh_leaderboard(COURSE_PATH, true).await.unwrap();
    assert_eq!(store.state().downloads, 2);
}

#[tokio::test]
async fn a_missing_course_blob_publishes_nothing() {
    let store = MemStore::default();
    let client = client(&store);

    client
        .submit_report(raw_report("a", Some(200), Some((2.0, 0.01)), 100.0))
        .await
        .unwrap();

    let result = client.refresh_leaderboard(COURSE_PATH, false).await;
    assert!(matches!(result, Err(RequestError::NotFound)));
    assert!(store.state().leaderboard.is_empty());
    assert!(matches!(
        client.leaderboard(None).await,
        Err(RequestError::CourseNotLoaded)
    ));
}

#[tokio::test]
async fn a_malformed_course_keeps_the_previous_one() {
    let store = MemStore::with_blob(COURSE_PATH, COURSE.as_bytes());
    let client = client(&store);

    client.refresh_leaderboard(COURSE_PATH, false).await.unwrap();

    store
        .state()
        .blobs
        .insert(COURSE_PATH.to_owned(), b"{\"type\":\"garbage\"}".to_vec());
    let result = client.refresh_leaderboard(COURSE_PATH, true).await;

    assert!(matches!(result, Err(RequestError::MalformedCourse(_))));
    // The previously loaded course is still served.
    assert!(client.course().await.is_ok());
}

#[tokio::test]
async fn gpx_conversion_produces_a_loadable_course() {
    const GPX: &str = r#"<gpx><trk><trkseg>
        <trkpt lat="0.0" lon="0.0"></trkpt>
        <trkpt lat="0.0" lon="10.0"></trkpt>
    </trkseg></trk></gpx>"#;

    let store = MemStore::with_blob("courses/city.gpx", GPX.as_bytes());
    let client = client(&store);

    let converted = client.convert_course("courses/city.gpx").await.unwrap();
    assert_eq!(converted, COURSE_PATH);

    client
        .submit_report(raw_report("a", Some(200), Some((5.0, 0.001)), 100.0))
        .await
        .unwrap();
    let ranked = client.refresh_leaderboard(&converted, false).await.unwrap();
    assert_eq!(ranked, 1);
}
