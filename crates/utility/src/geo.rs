use geo::{
    Closest, ClosestPoint, HaversineDistance, HaversineLength,
    LineLocatePoint, LineString, Point,
};

const METERS_PER_KILOMETER: f64 = 1000.0;

/// Result of snapping a point onto a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    pub longitude: f64,
    pub latitude: f64,
    /// Distance along the path from its start to the snapped point,
    /// in kilometers.
    pub location: f64,
    /// Offset between the query point and the snapped point, in kilometers.
    pub distance: f64,
}

/// Builds a path from `(longitude, latitude)` pairs.
pub fn path_from_coordinates<I>(coordinates: I) -> LineString<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    LineString::from(coordinates.into_iter().collect::<Vec<_>>())
}

pub fn path_length_km(path: &LineString<f64>) -> f64 {
    path.haversine_length() / METERS_PER_KILOMETER
}

/// Snaps a `(longitude, latitude)` point onto `path`.
///
/// The progress scalar grows monotonically from the start of the path to its
/// end, so two snapped points on the same path compare by how far along the
/// path they lie. Returns `None` for degenerate paths on which no nearest
/// point exists.
pub fn nearest_point_on_path(
    path: &LineString<f64>,
    longitude: f64,
    latitude: f64,
) -> Option<PathProjection> {
    let point = Point::new(longitude, latitude);

    let snapped = match path.closest_point(&point) {
        Closest::Intersection(snapped) | Closest::SinglePoint(snapped) => {
            snapped
        }
        Closest::Indeterminate => return None,
    };
    let fraction = path.line_locate_point(&point)?;

    Some(PathProjection {
        longitude: snapped.x(),
        latitude: snapped.y(),
        location: fraction * path_length_km(path),
        distance: point.haversine_distance(&snapped) / METERS_PER_KILOMETER,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path() -> LineString<f64> {
        path_from_coordinates([(0.0, 0.0), (10.0, 0.0)])
    }

    #[test]
    fn point_beside_the_middle_lands_between_the_endpoints() {
        let path = straight_path();
        let projection =
            nearest_point_on_path(&path, 5.0, 0.001).unwrap();

        assert!(projection.location > 0.0);
        assert!(projection.location < path_length_km(&path));
        assert!(projection.latitude.abs() < 1e-9);
        assert!(projection.distance > 0.0);
    }

    #[test]
    fn point_at_the_start_projects_to_zero_progress() {
        let projection =
            nearest_point_on_path(&straight_path(), 0.0, 0.0).unwrap();

        assert_eq!(projection.location, 0.0);
        assert_eq!(projection.distance, 0.0);
    }

    #[test]
    fn point_past_the_end_clamps_to_the_full_length() {
        let path = straight_path();
        let projection =
            nearest_point_on_path(&path, 12.0, 0.0).unwrap();

        assert_eq!(projection.location, path_length_km(&path));
        assert_eq!(projection.longitude, 10.0);
    }

    #[test]
    fn progress_is_monotonic_along_the_path() {
        let path = straight_path();
        let early = nearest_point_on_path(&path, 2.0, 0.01).unwrap();
        let late = nearest_point_on_path(&path, 7.0, -0.01).unwrap();

        assert!(early.location < late.location);
    }
}
