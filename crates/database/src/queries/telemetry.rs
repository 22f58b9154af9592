use model::record::TelemetryRecord;
use sqlx::{Executor, Postgres};

use super::convert_error;

pub async fn append<'c, E>(
    executor: E,
    record: &TelemetryRecord,
) -> tracking::database::Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        INSERT INTO telemetry_log(
            device_id,
            reported_at,
            received_at,
            raw_longitude,
            raw_latitude,
            displayed_longitude,
            displayed_latitude,
            last_move_timestamp,
            altitude,
            temperature,
            battery,
            satellite_count,
            signal_quality,
            status_code
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14
        );
        ",
    )
    .bind(&record.device_id)
    .bind(record.reported_at)
    .bind(record.received_at)
    .bind(record.raw_longitude)
    .bind(record.raw_latitude)
    .bind(record.displayed_longitude)
    .bind(record.displayed_latitude)
    .bind(record.last_move_timestamp)
    .bind(record.telemetry.altitude)
    .bind(record.telemetry.temperature)
    .bind(record.telemetry.battery)
    .bind(record.telemetry.satellite_count)
    .bind(record.telemetry.signal_quality)
    .bind(record.telemetry.status_code)
    .execute(executor)
    .await
    .map_err(convert_error)?;

    Ok(())
}
