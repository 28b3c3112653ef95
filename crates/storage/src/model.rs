use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping that owns zero or more uploaded files. No owner field:
/// any teacher may attach files to any lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
}

impl Lesson {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
        }
    }
}

/// Metadata for an uploaded notebook. `file_path` is the stored name inside
/// the upload directory; `title` is the display name clients see. Records
/// are created on upload and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub title: String,
    pub file_path: String,
    pub lesson_id: String,
}

impl FileRecord {
    pub fn new(title: String, file_path: String, lesson_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            file_path,
            lesson_id,
        }
    }
}

/// Upload input as extracted from the multipart body. Exactly one of
/// `lesson_id` / `new_lesson_title` is expected; `new_lesson_title` wins
/// when both are present, matching the original route's behavior.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub lesson_id: Option<String>,
    pub new_lesson_title: Option<String>,
    pub file_name: String,
    pub data: Vec<u8>,
}
