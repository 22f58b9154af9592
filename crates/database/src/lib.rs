use std::{env, error::Error};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{
    leaderboard::LeaderboardEntry, participant::ParticipantFeature,
    record::TelemetryRecord, Timestamp,
};
use tracking::database::{
    BlobRepo, FeatureRepo, LeaderboardRepo, Store, StoreOperations,
    TelemetryLogRepo,
};

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: sqlx::PgPool,
}

impl PgStore {
    pub async fn connect(
        connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error>> {
        let url = connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

pub struct PgStoreAutocommit {
    pool: sqlx::PgPool,
}

impl StoreOperations for PgStoreAutocommit {}

impl Store for PgStore {
    type Autocommit = PgStoreAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgStoreAutocommit {
            pool: self.pool.clone(),
        }
    }
}

#[async_trait]
impl FeatureRepo for PgStoreAutocommit {
    async fn get(
        &mut self,
        device_id: &str,
    ) -> tracking::database::Result<ParticipantFeature> {
        queries::participant::get(&self.pool, device_id).await
    }

    async fn get_all(
        &mut self,
    ) -> tracking::database::Result<IndexMap<String, ParticipantFeature>>
    {
        queries::participant::get_all(&self.pool).await
    }

    async fn put_if_unmodified(
        &mut self,
        feature: &ParticipantFeature,
        expected_last_report: Option<Timestamp>,
    ) -> tracking::database::Result<ParticipantFeature> {
        queries::participant::put_if_unmodified(
            &self.pool,
            feature,
            expected_last_report,
        )
        .await
    }
}

#[async_trait]
impl TelemetryLogRepo for PgStoreAutocommit {
    async fn append(
        &mut self,
        record: &TelemetryRecord,
    ) -> tracking::database::Result<()> {
        queries::telemetry::append(&self.pool, record).await
    }
}

#[async_trait]
impl LeaderboardRepo for PgStoreAutocommit {
    async fn replace_leaderboard(
        &mut self,
        entries: &IndexMap<String, LeaderboardEntry>,
    ) -> tracking::database::Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(queries::convert_error)?;
        queries::leaderboard::replace(&mut tx, entries).await?;
        tx.commit().await.map_err(queries::convert_error)
    }

    async fn get_leaderboard(
        &mut self,
    ) -> tracking::database::Result<IndexMap<String, LeaderboardEntry>> {
        queries::leaderboard::get_all(&self.pool).await
    }
}

#[async_trait]
impl BlobRepo for PgStoreAutocommit {
    async fn download(
        &mut self,
        path: &str,
    ) -> tracking::database::Result<Vec<u8>> {
        queries::course_blob::download(&self.pool, path).await
    }

    async fn upload(
        &mut self,
        path: &str,
        content: &[u8],
        content_type: &str,
    ) -> tracking::database::Result<()> {
        queries::course_blob::upload(&self.pool, path, content, content_type)
            .await
    }
}
