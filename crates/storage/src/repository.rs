use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::model::{FileRecord, Lesson};
use crate::{CatalogError, Result};

/// Persistence seam for lesson and file metadata. Every [`FileRecord`]
/// references an existing [`Lesson`]; implementations enforce that at
/// insert time.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn insert_lesson(&self, lesson: Lesson) -> Result<Lesson>;

    async fn list_lessons(&self) -> Result<Vec<Lesson>>;

    async fn lesson_exists(&self, lesson_id: &str) -> Result<bool>;

    /// Compensating action for inline lesson creation: removes a lesson
    /// that ended up without its file.
    async fn remove_lesson(&self, lesson_id: &str) -> Result<()>;

    /// Fails with [`CatalogError::LessonNotFound`] if the referenced lesson
    /// does not exist.
    async fn insert_file(&self, file: FileRecord) -> Result<FileRecord>;

    /// Files attached to the lesson. An unknown lesson id yields an empty
    /// list, not an error.
    async fn list_files_by_lesson(&self, lesson_id: &str) -> Result<Vec<FileRecord>>;

    async fn find_file(&self, file_id: &str) -> Result<Option<FileRecord>>;
}

#[derive(Default)]
struct Tables {
    lessons: HashMap<String, Lesson>,
    files: HashMap<String, FileRecord>,
}

/// Reference [`CatalogRepository`] backed by in-process maps. The
/// lesson-reference check runs inside the write lock, so a file can never
/// be inserted against a lesson removed concurrently.
#[derive(Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Tables>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn insert_lesson(&self, lesson: Lesson) -> Result<Lesson> {
        let mut inner = self.inner.write().await;
        inner.lessons.insert(lesson.id.clone(), lesson.clone());
        Ok(lesson)
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>> {
        let inner = self.inner.read().await;
        Ok(inner.lessons.values().cloned().collect())
    }

    async fn lesson_exists(&self, lesson_id: &str) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.lessons.contains_key(lesson_id))
    }

    async fn remove_lesson(&self, lesson_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.lessons.remove(lesson_id);
        Ok(())
    }

    async fn insert_file(&self, file: FileRecord) -> Result<FileRecord> {
        let mut inner = self.inner.write().await;
        if !inner.lessons.contains_key(&file.lesson_id) {
            return Err(CatalogError::LessonNotFound);
        }
        inner.files.insert(file.id.clone(), file.clone());
        Ok(file)
    }

    async fn list_files_by_lesson(&self, lesson_id: &str) -> Result<Vec<FileRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .files
            .values()
            .filter(|f| f.lesson_id == lesson_id)
            .cloned()
            .collect())
    }

    async fn find_file(&self, file_id: &str) -> Result<Option<FileRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.files.get(file_id).cloned())
    }
}
