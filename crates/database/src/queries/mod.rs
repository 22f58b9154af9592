use tracking::database::StoreError;

pub mod course_blob;
pub mod leaderboard;
pub mod participant;
pub mod telemetry;

pub(crate) fn convert_error(why: sqlx::Error) -> StoreError {
    match why {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        _ => StoreError::Other(Box::new(why)),
    }
}
