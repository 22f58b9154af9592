use std::sync::Arc;

use model::course::{Course, CoursePoint};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{database::BlobRepo, RequestError, RequestResult};

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum CourseFile {
    FeatureCollection { features: Vec<CourseFeature> },
    Feature { geometry: CourseGeometry },
    LineString { coordinates: Vec<Vec<f64>> },
}

#[derive(Debug, Deserialize)]
struct CourseFeature {
    geometry: CourseGeometry,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum CourseGeometry {
    LineString { coordinates: Vec<Vec<f64>> },
    #[serde(other)]
    Unsupported,
}

/// Parses GeoJSON course bytes into a course polyline.
///
/// Accepts a FeatureCollection (the first LineString feature wins), a single
/// Feature, or a bare LineString geometry.
pub fn parse_course(bytes: &[u8]) -> RequestResult<Course> {
    let file: CourseFile = serde_json::from_slice(bytes)
        .map_err(|why| RequestError::MalformedCourse(why.to_string()))?;

    let coordinates = match file {
        CourseFile::LineString { coordinates } => coordinates,
        CourseFile::Feature { geometry } => match geometry {
            CourseGeometry::LineString { coordinates } => coordinates,
            CourseGeometry::Unsupported => {
                return Err(RequestError::MalformedCourse(
                    "course feature has no line string geometry".to_owned(),
                ))
            }
        },
        CourseFile::FeatureCollection { features } => features
            .into_iter()
            .find_map(|feature| match feature.geometry {
                CourseGeometry::LineString { coordinates } => {
                    Some(coordinates)
                }
                CourseGeometry::Unsupported => None,
            })
            .ok_or_else(|| {
                RequestError::MalformedCourse(
                    "course collection has no line string feature".to_owned(),
                )
            })?,
    };

    let points = coordinates
        .iter()
        .map(|position| match position[..] {
            [longitude, latitude, ..]
                if longitude.is_finite() && latitude.is_finite() =>
            {
                Ok(CoursePoint {
                    longitude,
                    latitude,
                })
            }
            _ => Err(RequestError::MalformedCourse(
                "every course point needs two finite coordinates".to_owned(),
            )),
        })
        .collect::<RequestResult<Vec<_>>>()?;

    if points.len() < Course::MIN_POINTS {
        return Err(RequestError::MalformedCourse(format!(
            "a course needs at least {} points, got {}",
            Course::MIN_POINTS,
            points.len()
        )));
    }

    Ok(Course { points })
}

/// Process-wide course cache.
///
/// Starts empty, is set by the first successful load and stays put for the
/// process lifetime; only a force reload replaces it. Readers get cheap
/// `Arc` snapshots, so a reload never invalidates a computation that is
/// already running on the old course.
#[derive(Debug, Clone, Default)]
pub struct CourseHandle {
    cached: Arc<RwLock<Option<Arc<Course>>>>,
}

impl CourseHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached course, or `CourseNotLoaded` before the first load.
    pub async fn get(&self) -> RequestResult<Arc<Course>> {
        self.cached
            .read()
            .await
            .clone()
            .ok_or(RequestError::CourseNotLoaded)
    }

    /// Loads the course from `path` unless one is already cached.
    ///
    /// Holds the write slot across the load, so concurrent callers cannot
    /// download the same course twice. A failed download or parse leaves a
    /// previously cached course in effect.
    pub async fn ensure_loaded<B>(
        &self,
        blobs: &mut B,
        path: &str,
        force: bool,
    ) -> RequestResult<Arc<Course>>
    where
        B: BlobRepo + Send,
    {
        let mut slot = self.cached.write().await;

        if !force {
            if let Some(course) = slot.as_ref() {
                log::info!("course \"{}\" already loaded", path);
                return Ok(course.clone());
            }
        }

        log::info!("loading course \"{}\"", path);
        let bytes = blobs.download(path).await?;
        let course = Arc::new(parse_course(&bytes)?);
        *slot = Some(course.clone());
        Ok(course)
    }
}
