use indexmap::IndexMap;
use model::{participant::ParticipantFeature, Timestamp};
use sqlx::{Executor, Postgres};
use tracking::database::StoreError;

use crate::data_model::participant::ParticipantRow;

use super::convert_error;

pub async fn get<'c, E>(
    executor: E,
    device_id: &str,
) -> tracking::database::Result<ParticipantFeature>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: ParticipantRow =
        sqlx::query_as("SELECT * FROM participants WHERE device_id = $1;")
            .bind(device_id)
            .fetch_one(executor)
            .await
            .map_err(convert_error)?;
    Ok(row.to_model())
}

pub async fn get_all<'c, E>(
    executor: E,
) -> tracking::database::Result<IndexMap<String, ParticipantFeature>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<ParticipantRow> =
        sqlx::query_as("SELECT * FROM participants ORDER BY device_id ASC;")
            .fetch_all(executor)
            .await
            .map_err(convert_error)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let feature = row.to_model();
            (feature.device_id.clone(), feature)
        })
        .collect())
}

/// Conditional upsert: expecting no stored row inserts, expecting a specific
/// report timestamp updates. Either way, no row coming back means a
/// concurrent writer changed the feature first.
pub async fn put_if_unmodified<'c, E>(
    executor: E,
    feature: &ParticipantFeature,
    expected_last_report: Option<Timestamp>,
) -> tracking::database::Result<ParticipantFeature>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<ParticipantRow> = match expected_last_report {
        None => {
            sqlx::query_as(
                "
                INSERT INTO participants(
                    device_id,
                    longitude,
                    latitude,
                    last_report_timestamp,
                    last_move_timestamp,
                    altitude,
                    temperature,
                    battery,
                    satellite_count,
                    signal_quality,
                    status_code
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ON CONFLICT (device_id)
                DO NOTHING
                RETURNING *;
                ",
            )
            .bind(&feature.device_id)
            .bind(feature.longitude())
            .bind(feature.latitude())
            .bind(feature.last_report_timestamp)
            .bind(feature.last_move_timestamp)
            .bind(feature.telemetry.altitude)
            .bind(feature.telemetry.temperature)
            .bind(feature.telemetry.battery)
            .bind(feature.telemetry.satellite_count)
            .bind(feature.telemetry.signal_quality)
            .bind(feature.telemetry.status_code)
            .fetch_optional(executor)
            .await
            .map_err(convert_error)?
        }
        Some(expected) => {
            sqlx::query_as(
                "
                UPDATE participants SET
                    longitude = $2,
                    latitude = $3,
                    last_report_timestamp = $4,
                    last_move_timestamp = $5,
                    altitude = $6,
                    temperature = $7,
                    battery = $8,
                    satellite_count = $9,
                    signal_quality = $10,
                    status_code = $11
                WHERE device_id = $1 AND last_report_timestamp = $12
                RETURNING *;
                ",
            )
            .bind(&feature.device_id)
            .bind(feature.longitude())
            .bind(feature.latitude())
            .bind(feature.last_report_timestamp)
            .bind(feature.last_move_timestamp)
            .bind(feature.telemetry.altitude)
            .bind(feature.telemetry.temperature)
            .bind(feature.telemetry.battery)
            .bind(feature.telemetry.satellite_count)
            .bind(feature.telemetry.signal_quality)
            .bind(feature.telemetry.status_code)
            .bind(expected)
            .fetch_optional(executor)
            .await
            .map_err(convert_error)?
        }
    };

    match row {
        Some(row) => Ok(row.to_model()),
        None => Err(StoreError::Conflict),
    }
}
