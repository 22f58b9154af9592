/// A stored course source file (uploaded GPX or converted GeoJSON).
/// Table: `course_blobs`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CourseBlobRow {
    pub path: String,
    pub content: Vec<u8>,
    pub content_type: String,
}
