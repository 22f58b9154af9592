use indexmap::IndexMap;
use model::{
    course::Course,
    leaderboard::LeaderboardEntry,
    participant::{ParticipantFeature, Position},
};
use utility::geo;

/// Projects every displayable participant onto the course.
///
/// Participants without a displayed position are left off the board; the
/// projection primitive is never called for them. Participant telemetry and
/// movement timestamps win over anything the primitive computes — only the
/// geometric output (snapped point, progress, offset) is taken from it.
pub fn project(
    course: &Course,
    participants: &IndexMap<String, ParticipantFeature>,
) -> IndexMap<String, LeaderboardEntry> {
    let path = geo::path_from_coordinates(course.coordinates());

    participants
        .values()
        .filter_map(|participant| {
            let position = participant.position?;
            let snap = geo::nearest_point_on_path(
                &path,
                position.longitude,
                position.latitude,
            )?;
            Some((
                participant.device_id.clone(),
                LeaderboardEntry {
                    device_id: participant.device_id.clone(),
                    course_progress: snap.location,
                    distance_from_course: snap.distance,
                    position: Position {
                        longitude: snap.longitude,
                        latitude: snap.latitude,
                    },
                    last_move_timestamp: participant.last_move_timestamp,
                    last_report_timestamp: participant.last_report_timestamp,
                    telemetry: participant.telemetry.clone(),
                },
            ))
        })
        .collect()
}
