use std::{error, result};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{
    leaderboard::LeaderboardEntry, participant::ParticipantFeature,
    record::TelemetryRecord, Timestamp,
};

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    /// A conditional write found a newer version than the one it expected.
    Conflict,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl StoreError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, StoreError>;

/// Keyed access to the authoritative participant features.
#[async_trait]
pub trait FeatureRepo {
    async fn get(&mut self, device_id: &str) -> Result<ParticipantFeature>;

    async fn get_all(&mut self)
        -> Result<IndexMap<String, ParticipantFeature>>;

    /// Writes `feature` only if the stored feature still carries
    /// `expected_last_report` as its report timestamp; `None` expects the
    /// device to be unknown. Fails with [`StoreError::Conflict`] when a
    /// concurrent writer got there first.
    async fn put_if_unmodified(
        &mut self,
        feature: &ParticipantFeature,
        expected_last_report: Option<Timestamp>,
    ) -> Result<ParticipantFeature>;
}

/// Append-only analytical side channel. Rows are never read back.
#[async_trait]
pub trait TelemetryLogRepo {
    async fn append(&mut self, record: &TelemetryRecord) -> Result<()>;
}

/// The persisted result of the last successful leaderboard refresh.
#[async_trait]
pub trait LeaderboardRepo {
    /// Replaces the whole board. All-or-nothing: a failure must leave the
    /// previous board in place.
    async fn replace_leaderboard(
        &mut self,
        entries: &IndexMap<String, LeaderboardEntry>,
    ) -> Result<()>;

    async fn get_leaderboard(
        &mut self,
    ) -> Result<IndexMap<String, LeaderboardEntry>>;
}

/// Course source files: uploaded GPX tracks and their converted GeoJSON.
#[async_trait]
pub trait BlobRepo {
    async fn download(&mut self, path: &str) -> Result<Vec<u8>>;

    async fn upload(
        &mut self,
        path: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<()>;
}

pub trait StoreOperations:
    FeatureRepo + TelemetryLogRepo + LeaderboardRepo + BlobRepo
{
}

/// Handle to a store backend. Concurrent access works by cloning the handle;
/// `auto()` yields an operations object that commits every call on its own.
pub trait Store: Clone + Send + Sync + Sized {
    type Autocommit: StoreOperations + Send;

    fn auto(&self) -> Self::Autocommit;
}
