use indexmap::IndexMap;
use model::leaderboard::LeaderboardEntry;
use sqlx::{Executor, Postgres, Transaction};

use crate::data_model::leaderboard::LeaderboardEntryRow;

use super::convert_error;

/// Replaces the whole board inside the given transaction, so a failed
/// insert never leaves a half-written board behind.
pub async fn replace<'c>(
    tx: &mut Transaction<'c, Postgres>,
    entries: &IndexMap<String, LeaderboardEntry>,
) -> tracking::database::Result<()> {
    sqlx::query("DELETE FROM leaderboard_entries;")
        .execute(&mut **tx)
        .await
        .map_err(convert_error)?;

    for entry in entries.values() {
        sqlx::query(
            "
            INSERT INTO leaderboard_entries(
                device_id,
                course_progress,
                distance_from_course,
                longitude,
                latitude,
                last_move_timestamp,
                last_report_timestamp,
                altitude,
                temperature,
                battery,
                satellite_count,
                signal_quality,
                status_code
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13
            );
            ",
        )
        .bind(&entry.device_id)
        .bind(entry.course_progress)
        .bind(entry.distance_from_course)
        .bind(entry.position.longitude)
        .bind(entry.position.latitude)
        .bind(entry.last_move_timestamp)
        .bind(entry.last_report_timestamp)
        .bind(entry.telemetry.altitude)
        .bind(entry.telemetry.temperature)
        .bind(entry.telemetry.battery)
        .bind(entry.telemetry.satellite_count)
        .bind(entry.telemetry.signal_quality)
        .bind(entry.telemetry.status_code)
        .execute(&mut **tx)
        .await
        .map_err(convert_error)?;
    }

    Ok(())
}

pub async fn get_all<'c, E>(
    executor: E,
) -> tracking::database::Result<IndexMap<String, LeaderboardEntry>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<LeaderboardEntryRow> = sqlx::query_as(
        "SELECT * FROM leaderboard_entries ORDER BY device_id ASC;",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let entry = row.to_model();
            (entry.device_id.clone(), entry)
        })
        .collect())
}
