use serde::Deserialize;
use serde_json::json;

use crate::{RequestError, RequestResult};

#[derive(Debug, Deserialize)]
struct Gpx {
    #[serde(rename = "trk", default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(rename = "trkseg", default)]
    segments: Vec<TrackSegment>,
}

#[derive(Debug, Deserialize)]
struct TrackSegment {
    #[serde(rename = "trkpt", default)]
    points: Vec<TrackPoint>,
}

#[derive(Debug, Deserialize)]
struct TrackPoint {
    lat: f64,
    lon: f64,
}

/// Converts GPX track bytes into the GeoJSON course format: a
/// FeatureCollection with a single LineString feature holding every track
/// point in document order, segments concatenated.
pub fn gpx_to_geojson(bytes: &[u8]) -> RequestResult<Vec<u8>> {
    let gpx: Gpx = serde_xml_rs::from_reader(bytes)
        .map_err(|why| RequestError::MalformedCourse(why.to_string()))?;

    let coordinates = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points)
        .map(|point| [point.lon, point.lat])
        .collect::<Vec<_>>();

    if coordinates.len() < 2 {
        return Err(RequestError::MalformedCourse(format!(
            "GPX track has {} points, need at least 2",
            coordinates.len()
        )));
    }

    let collection = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
        }],
    });

    serde_json::to_vec(&collection).map_err(RequestError::other)
}

/// The storage path of the converted course for a GPX source path.
pub fn geojson_path(gpx_path: &str) -> RequestResult<String> {
    match gpx_path.strip_suffix(".gpx") {
        Some(stem) => Ok(format!("{}.geojson", stem)),
        None => Err(RequestError::Validation(format!(
            "\"{}\" is not a GPX file",
            gpx_path
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::parse_course;

    const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <gpx version="1.1" creator="test">
          <trk>
            <name>course</name>
            <trkseg>
              <trkpt lat="54.32" lon="10.12"></trkpt>
              <trkpt lat="54.33" lon="10.14"></trkpt>
            </trkseg>
            <trkseg>
              <trkpt lat="54.34" lon="10.16"></trkpt>
            </trkseg>
          </trk>
        </gpx>"#;

    #[test]
    fn converts_track_points_across_segments() {
        let geojson = gpx_to_geojson(TRACK.as_bytes()).unwrap();
        let course = parse_course(&geojson).unwrap();

        assert_eq!(course.points.len(), 3);
        assert_eq!(course.points[0].longitude, 10.12);
        assert_eq!(course.points[0].latitude, 54.32);
        assert_eq!(course.points[2].longitude, 10.16);
    }

    #[test]
    fn rejects_a_track_with_too_few_points() {
        let gpx = r#"<gpx><trk><trkseg>
            <trkpt lat="54.32" lon="10.12"></trkpt>
        </trkseg></trk></gpx>"#;
        assert!(matches!(
            gpx_to_geojson(gpx.as_bytes()),
            Err(RequestError::MalformedCourse(_))
        ));
    }

    #[test]
    fn rejects_bytes_that_are_not_xml() {
        assert!(matches!(
            gpx_to_geojson(b"not xml at all"),
            Err(RequestError::MalformedCourse(_))
        ));
    }

    #[test]
    fn converted_path_swaps_the_extension() {
        assert_eq!(
            geojson_path("courses/kiel.gpx").unwrap(),
            "courses/kiel.geojson"
        );
    }

    #[test]
    fn non_gpx_paths_are_rejected() {
        assert!(matches!(
            geojson_path("courses/kiel.kml"),
            Err(RequestError::Validation(_))
        ));
    }
}
