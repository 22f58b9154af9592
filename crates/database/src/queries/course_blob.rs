use sqlx::{Executor, Postgres};
use tracking::database::StoreError;

use crate::data_model::course_blob::CourseBlobRow;

use super::convert_error;

pub async fn download<'c, E>(
    executor: E,
    path: &str,
) -> tracking::database::Result<Vec<u8>>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<CourseBlobRow> =
        sqlx::query_as("SELECT * FROM course_blobs WHERE path = $1;")
            .bind(path)
            .fetch_optional(executor)
            .await
            .map_err(convert_error)?;

    row.map(|row| row.content).ok_or(StoreError::NotFound)
}

pub async fn upload<'c, E>(
    executor: E,
    path: &str,
    content: &[u8],
    content_type: &str,
) -> tracking::database::Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        INSERT INTO course_blobs(
            path,
            content,
            content_type
        )
        VALUES ($1, $2, $3)
        ON CONFLICT (path)
        DO UPDATE SET
            content = EXCLUDED.content,
            content_type = EXCLUDED.content_type;
        ",
    )
    .bind(path)
    .bind(content)
    .bind(content_type)
    .execute(executor)
    .await
    .map_err(convert_error)?;

    Ok(())
}
