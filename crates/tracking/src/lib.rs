use std::error::Error;

use model::report::InvalidReport;

pub mod client;
pub mod config;
pub mod course;
pub mod database;
pub mod gpx;
pub mod ingest;
pub mod leaderboard;
pub mod resolver;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    /// The request body failed boundary validation; nothing was mutated.
    Validation(String),
    /// A leaderboard computation was requested before any course was loaded.
    CourseNotLoaded,
    /// A course source failed its structural checks; a previously cached
    /// course stays in effect.
    MalformedCourse(String),
    /// A conditional feature write kept losing against concurrent reports
    /// for the same device.
    Conflict,
    Other(Box<dyn Error + Send>),
}

impl RequestError {
    pub fn other<T: Error + Send + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl From<database::StoreError> for RequestError {
    fn from(value: database::StoreError) -> Self {
        match value {
            database::StoreError::NotFound => Self::NotFound,
            database::StoreError::Conflict => Self::Conflict,
            database::StoreError::Other(why) => Self::Other(why),
        }
    }
}

impl From<InvalidReport> for RequestError {
    fn from(why: InvalidReport) -> Self {
        Self::Validation(why.to_string())
    }
}

pub type RequestResult<O> = Result<O, RequestError>;

pub fn not_found_to_none<O>(result: RequestResult<O>) -> RequestResult<Option<O>> {
    if let Err(RequestError::NotFound) = result {
        Ok(None)
    } else {
        result.map(Some)
    }
}
