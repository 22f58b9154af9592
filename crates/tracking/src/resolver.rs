use model::{participant::ParticipantFeature, report::ReportPayload};

/// Fix quality classes derived from the device status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fix {
    /// 205/207: no valid fix this cycle, the transmitted coordinates are
    /// meaningless.
    Invalid,
    /// 204: a fix is present but the device is unsure whether it moved.
    Uncertain,
    /// Anything else, including an absent status code.
    Normal,
}

impl Fix {
    fn from_status(status_code: Option<i32>) -> Self {
        match status_code {
            Some(205) | Some(207) => Fix::Invalid,
            Some(204) => Fix::Uncertain,
            _ => Fix::Normal,
        }
    }
}

/// Decides what a device's displayed position and movement timestamps become
/// after a new report.
///
/// Pure and deterministic: replaying the same report against the same
/// previous feature always yields the same feature. Telemetry is replaced
/// wholesale in every branch, and the report timestamp always becomes the
/// new `last_report_timestamp`.
pub fn resolve(
    previous: Option<&ParticipantFeature>,
    report: &ReportPayload,
) -> ParticipantFeature {
    let mut feature = ParticipantFeature {
        device_id: report.device_id.clone(),
        position: report.position,
        last_report_timestamp: report.timestamp,
        last_move_timestamp: report.timestamp,
        telemetry: report.telemetry.clone(),
    };

    // First contact: the raw coordinates become the displayed position
    // as-is, whatever the status code says. A positionless feature is valid
    // and stays undisplayable until a report with coordinates arrives.
    let Some(previous) = previous else {
        return feature;
    };

    match Fix::from_status(report.status_code) {
        Fix::Invalid => {
            // Hold the previously displayed position and ignore the raw
            // coordinates. The inherited move time is the previous *report*
            // time, not the previous move time.
            feature.position = previous.position;
            feature.last_move_timestamp = previous.last_report_timestamp;
        }
        Fix::Uncertain => {
            // Exact comparison against the displayed position: a resent fix
            // means stationary, any difference means the device moved.
            if feature.position == previous.position {
                feature.last_move_timestamp = previous.last_move_timestamp;
            }
        }
        Fix::Normal => {}
    }

    feature
}

#[cfg(test)]
mod tests {
    use model::participant::{Position, Telemetry};
    use rstest::rstest;

    use super::*;

    fn telemetry(status_code: Option<i32>) -> Telemetry {
        Telemetry {
            altitude: Some(40.0),
            temperature: Some(18.0),
            battery: Some(3.7),
            satellite_count: Some(6),
            signal_quality: Some(-7.0),
            status_code,
        }
    }

    fn report(
        status_code: Option<i32>,
        position: Option<(f64, f64)>,
        timestamp: f64,
    ) -> ReportPayload {
        ReportPayload {
            device_id: "tracker-001".to_owned(),
            status_code,
            timestamp,
            position: position.map(|(longitude, latitude)| Position {
                longitude,
                latitude,
            }),
            telemetry: telemetry(status_code),
        }
    }

    fn previous(
        position: Option<(f64, f64)>,
        last_report: f64,
        last_move: f64,
    ) -> ParticipantFeature {
        ParticipantFeature {
            device_id: "tracker-001".to_owned(),
            position: position.map(|(longitude, latitude)| Position {
                longitude,
                latitude,
            }),
            last_report_timestamp: last_report,
            last_move_timestamp: last_move,
            telemetry: Telemetry {
                altitude: None,
                temperature: Some(12.0),
                battery: Some(4.1),
                satellite_count: None,
                signal_quality: None,
                status_code: Some(200),
            },
        }
    }

    #[rstest]
    #[case(Some(200))]
    #[case(Some(204))]
    #[case(Some(205))]
    #[case(None)]
    fn first_report_is_taken_as_is(#[case] status_code: Option<i32>) {
        let report = report(status_code, Some((10.0, 20.0)), 100.0);
        let feature = resolve(None, &report);

        assert_eq!(feature.position, report.position);
        assert_eq!(feature.last_report_timestamp, 100.0);
        assert_eq!(feature.last_move_timestamp, 100.0);
    }

    #[test]
    fn first_report_without_coordinates_creates_an_undisplayable_feature() {
        let feature = resolve(None, &report(Some(200), None, 100.0));

        assert_eq!(feature.position, None);
        assert_eq!(feature.last_move_timestamp, 100.0);
    }

    #[rstest]
    #[case(205)]
    #[case(207)]
    fn invalid_fix_keeps_the_displayed_position(#[case] status_code: i32) {
        let previous = previous(Some((10.0, 20.0)), 100.0, 80.0);
        let report = report(Some(status_code), Some((99.0, 99.0)), 150.0);
        let feature = resolve(Some(&previous), &report);

        assert_eq!(
            feature.position,
            Some(Position {
                longitude: 10.0,
                latitude: 20.0
            })
        );
        // Inherits the previous report time, not the previous move time.
        assert_eq!(feature.last_move_timestamp, 100.0);
        assert_eq!(feature.last_report_timestamp, 150.0);
    }

    #[test]
    fn invalid_fix_scenario_from_the_field() {
        let previous = previous(Some((10.0, 20.0)), 100.0, 100.0);
        let report = report(Some(205), Some((99.0, 99.0)), 150.0);
        let feature = resolve(Some(&previous), &report);

        assert_eq!(
            feature.position,
            Some(Position {
                longitude: 10.0,
                latitude: 20.0
            })
        );
        assert_eq!(feature.last_move_timestamp, 100.0);
        assert_eq!(feature.last_report_timestamp, 150.0);
    }

    #[test]
    fn uncertain_fix_at_the_same_spot_is_stationary() {
        let previous = previous(Some((10.0, 20.0)), 150.0, 100.0);
        let report = report(Some(204), Some((10.0, 20.0)), 200.0);
        let feature = resolve(Some(&previous), &report);

        assert_eq!(
            feature.position,
            Some(Position {
                longitude: 10.0,
                latitude: 20.0
            })
        );
        assert_eq!(feature.last_move_timestamp, 100.0);
        assert_eq!(feature.last_report_timestamp, 200.0);
    }

    #[test]
    fn uncertain_fix_at_a_new_spot_is_a_move() {
        let previous = previous(Some((10.0, 20.0)), 150.0, 100.0);
        let report = report(Some(204), Some((11.0, 20.0)), 200.0);
        let feature = resolve(Some(&previous), &report);

        assert_eq!(
            feature.position,
            Some(Position {
                longitude: 11.0,
                latitude: 20.0
            })
        );
        assert_eq!(feature.last_move_timestamp, 200.0);
    }

    #[test]
    fn uncertain_fix_without_coordinates_matches_a_positionless_feature() {
        let previous = previous(None, 150.0, 100.0);
        let report = report(Some(204), None, 200.0);
        let feature = resolve(Some(&previous), &report);

        assert_eq!(feature.position, None);
        assert_eq!(feature.last_move_timestamp, 100.0);
    }

    #[rstest]
    #[case(Some(200))]
    #[case(Some(999))]
    #[case(None)]
    fn any_other_status_is_a_normal_fix(#[case] status_code: Option<i32>) {
        let previous = previous(Some((10.0, 20.0)), 150.0, 100.0);
        let report = report(status_code, Some((10.0, 20.0)), 200.0);
        let feature = resolve(Some(&previous), &report);

        // Even an unchanged position counts as a move on a normal fix.
        assert_eq!(feature.last_move_timestamp, 200.0);
        assert_eq!(feature.last_report_timestamp, 200.0);
    }

    #[test]
    fn telemetry_is_replaced_never_merged() {
        let previous = previous(Some((10.0, 20.0)), 150.0, 100.0);
        let report = report(Some(200), Some((11.0, 21.0)), 200.0);
        let feature = resolve(Some(&previous), &report);

        // The previous feature had a temperature but no altitude; the new
        // telemetry must not keep either around.
        assert_eq!(feature.telemetry, telemetry(Some(200)));
    }

    #[test]
    fn replaying_a_report_is_idempotent() {
        let previous = previous(Some((10.0, 20.0)), 150.0, 100.0);
        let report = report(Some(204), Some((11.0, 20.0)), 200.0);

        let first = resolve(Some(&previous), &report);
        let second = resolve(Some(&previous), &report);

        assert_eq!(first, second);
    }
}
