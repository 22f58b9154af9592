use chrono::Utc;
use model::{
    participant::ParticipantFeature, record::TelemetryRecord,
    report::ReportPayload,
};

use crate::{
    database::{FeatureRepo, Store, StoreError, TelemetryLogRepo},
    not_found_to_none, resolver, RequestError, RequestResult,
};

/// Attempts for the conditional feature write before the conflict surfaces
/// to the caller.
const WRITE_ATTEMPTS: u32 = 3;

/// Runs one validated report through the pipeline: read the previous
/// feature, resolve, persist, and mirror a raw+derived record to the
/// telemetry log.
///
/// The read is a plain point read; lost updates are prevented by making the
/// feature write conditional on the report timestamp observed in step one.
/// When a concurrent report for the same device wins that race, the whole
/// read-resolve-write sequence is retried.
///
/// The telemetry append runs concurrently with the feature write and is
/// best-effort: its failure is logged and never fails the request.
pub async fn ingest<S: Store>(
    store: &S,
    payload: &ReportPayload,
) -> RequestResult<ParticipantFeature> {
    let mut attempts = 0;
    loop {
        attempts += 1;

        let previous = not_found_to_none(
            store
                .auto()
                .get(&payload.device_id)
                .await
                .map_err(RequestError::from),
        )?;

        let feature = resolver::resolve(previous.as_ref(), payload);
        let record = TelemetryRecord::derive(payload, &feature, Utc::now());
        let expected =
            previous.map(|previous| previous.last_report_timestamp);

        let (written, appended) = tokio::join!(
            async {
                store.auto().put_if_unmodified(&feature, expected).await
            },
            async { store.auto().append(&record).await },
        );

        if let Err(why) = appended {
            log::warn!(
                "telemetry append for {} failed: {:?}",
                payload.device_id,
                why
            );
        }

        match written {
            Ok(feature) => return Ok(feature),
            Err(StoreError::Conflict) if attempts < WRITE_ATTEMPTS => {
                log::debug!(
                    "feature write for {} lost a race, retrying",
                    payload.device_id
                );
            }
            Err(why) => return Err(why.into()),
        }
    }
}
