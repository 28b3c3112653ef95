use std::sync::Arc;

use auth::{Principal, Role};

use crate::model::{FileRecord, Lesson, UploadRequest};
use crate::repository::CatalogRepository;
use crate::{BlobStore, CatalogError, Result};

/// Notebook file extension accepted for upload.
const NOTEBOOK_EXTENSION: &str = ".ipynb";

/// Lesson catalog and file workflow: role-gated upload, listing, download.
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
    blobs: BlobStore,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CatalogRepository>, blobs: BlobStore) -> Self {
        Self { repository, blobs }
    }

    /// Lessons visible to the principal. Students and teachers may list;
    /// the guard is the enforcement point should a third role ever appear.
    pub async fn list_lessons(&self, principal: &Principal) -> Result<Vec<Lesson>> {
        if !matches!(principal.role, Role::Student | Role::Teacher) {
            return Err(CatalogError::RoleNotPermitted);
        }
        self.repository.list_lessons().await
    }

    pub async fn create_lesson(&self, title: String) -> Result<Lesson> {
        if title.is_empty() {
            return Err(CatalogError::InvalidInput(
                "Lesson title is required".to_string(),
            ));
        }
        self.repository.insert_lesson(Lesson::new(title)).await
    }

    /// Validate and store an uploaded notebook, linking it to a lesson.
    ///
    /// Teachers only. The extension check runs before any disk write. When
    /// `new_lesson_title` is set, the lesson is created inline; creation and
    /// file persist are atomic via compensation: a failed metadata insert
    /// removes the stored blob and the inline lesson.
    pub async fn upload(
        &self,
        principal: &Principal,
        request: UploadRequest,
    ) -> Result<FileRecord> {
        if !principal.is_teacher() {
            tracing::warn!(principal_id = %principal.id, "upload rejected: not a teacher");
            return Err(CatalogError::TeacherOnly);
        }

        if request.title.is_empty() || request.data.is_empty() {
            return Err(CatalogError::InvalidInput(
                "Title or file is missing.".to_string(),
            ));
        }

        if !request.file_name.ends_with(NOTEBOOK_EXTENSION) {
            return Err(CatalogError::InvalidInput(
                "Only IPYNB files are allowed".to_string(),
            ));
        }

        let (lesson_id, inline_lesson) = match request.new_lesson_title {
            Some(title) if !title.is_empty() => {
                let lesson = self.create_lesson(title).await?;
                (lesson.id.clone(), Some(lesson))
            }
            _ => {
                let lesson_id = request.lesson_id.filter(|id| !id.is_empty()).ok_or_else(
                    || {
                        CatalogError::InvalidInput(
                            "lessonId or newLessonTitle is required".to_string(),
                        )
                    },
                )?;
                if !self.repository.lesson_exists(&lesson_id).await? {
                    return Err(CatalogError::LessonNotFound);
                }
                (lesson_id, None)
            }
        };

        let stored_name = self.blobs.store(&request.data, &request.file_name).await?;

        let record = FileRecord::new(request.title, stored_name.clone(), lesson_id);
        match self.repository.insert_file(record).await {
            Ok(record) => {
                tracing::info!(file_id = %record.id, lesson_id = %record.lesson_id, "notebook uploaded");
                Ok(record)
            }
            Err(e) => {
                // Compensating actions: no blob and no inline lesson may
                // outlive a failed metadata insert.
                let _ = self.blobs.remove(&stored_name).await;
                if let Some(lesson) = inline_lesson {
                    let _ = self.repository.remove_lesson(&lesson.id).await;
                }
                Err(e)
            }
        }
    }

    /// Files attached to a lesson. A lesson with no files yet is an empty
    /// list with success, not a not-found error.
    pub async fn list_files(&self, lesson_id: &str) -> Result<Vec<FileRecord>> {
        self.repository.list_files_by_lesson(lesson_id).await
    }

    /// File content plus its display title (never the internal stored name).
    pub async fn download(&self, file_id: &str) -> Result<(Vec<u8>, String)> {
        let record = self
            .repository
            .find_file(file_id)
            .await?
            .ok_or(CatalogError::FileNotFound)?;

        let data = self.blobs.read(&record.file_path).await?;
        Ok((data, record.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCatalog;
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn teacher() -> Principal {
        Principal::new("teacher-1", Role::Teacher)
    }

    fn student() -> Principal {
        Principal::new("student-1", Role::Student)
    }

    fn upload_request(file_name: &str) -> UploadRequest {
        UploadRequest {
            title: "Lesson 1 Intro".to_string(),
            lesson_id: None,
            new_lesson_title: Some("Intro".to_string()),
            file_name: file_name.to_string(),
            data: b"{\"cells\": []}".to_vec(),
        }
    }

    async fn service(temp_dir: &TempDir) -> CatalogService {
        CatalogService::new(
            Arc::new(InMemoryCatalog::new()),
            BlobStore::new(temp_dir.path()).await.unwrap(),
        )
    }

    async fn stored_file_count(temp_dir: &TempDir) -> usize {
        std::fs::read_dir(temp_dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn test_student_upload_forbidden() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        let result = service.upload(&student(), upload_request("intro.ipynb")).await;

        assert!(matches!(result, Err(CatalogError::TeacherOnly)));
        assert_eq!(stored_file_count(&temp_dir).await, 0);
    }

    #[tokio::test]
    async fn test_wrong_extension_rejected_before_any_write() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        let result = service.upload(&teacher(), upload_request("notes.txt")).await;

        assert!(matches!(result, Err(CatalogError::InvalidInput(_))));
        assert_eq!(stored_file_count(&temp_dir).await, 0);
        assert!(service.list_lessons(&teacher()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_title_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;
        let mut request = upload_request("intro.ipynb");
        request.title = String::new();

        assert!(matches!(
            service.upload(&teacher(), request).await,
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_with_inline_lesson() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        let record = service
            .upload(&teacher(), upload_request("intro.ipynb"))
            .await
            .unwrap();

        let lessons = service.list_lessons(&teacher()).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].title, "Intro");
        assert_eq!(record.lesson_id, lessons[0].id);

        let files = service.list_files(&record.lesson_id).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].title, "Lesson 1 Intro");
    }

    #[tokio::test]
    async fn test_upload_to_unknown_lesson() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;
        let mut request = upload_request("intro.ipynb");
        request.new_lesson_title = None;
        request.lesson_id = Some("no-such-lesson".to_string());

        assert!(matches!(
            service.upload(&teacher(), request).await,
            Err(CatalogError::LessonNotFound)
        ));
        assert_eq!(stored_file_count(&temp_dir).await, 0);
    }

    #[tokio::test]
    async fn test_upload_without_lesson_reference() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;
        let mut request = upload_request("intro.ipynb");
        request.new_lesson_title = None;

        assert!(matches!(
            service.upload(&teacher(), request).await,
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_list_files_for_empty_lesson_is_success() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;
        let lesson = service.create_lesson("Empty".to_string()).await.unwrap();

        let files = service.list_files(&lesson.id).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_download_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        assert!(matches!(
            service.download("no-such-file").await,
            Err(CatalogError::FileNotFound)
        ));
    }

    #[tokio::test]
    async fn test_download_labeled_with_display_title() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        let record = service
            .upload(&teacher(), upload_request("intro.ipynb"))
            .await
            .unwrap();

        let (data, name) = service.download(&record.id).await.unwrap();
        assert_eq!(data, b"{\"cells\": []}");
        assert_eq!(name, "Lesson 1 Intro");
        assert_ne!(name, record.file_path);
    }

    /// Repository whose file insert always fails, for the compensation path.
    struct FailingCatalog {
        inner: InMemoryCatalog,
    }

    #[async_trait]
    impl CatalogRepository for FailingCatalog {
        async fn insert_lesson(&self, lesson: Lesson) -> crate::Result<Lesson> {
            self.inner.insert_lesson(lesson).await
        }

        async fn list_lessons(&self) -> crate::Result<Vec<Lesson>> {
            self.inner.list_lessons().await
        }

        async fn lesson_exists(&self, lesson_id: &str) -> crate::Result<bool> {
            self.inner.lesson_exists(lesson_id).await
        }

        async fn remove_lesson(&self, lesson_id: &str) -> crate::Result<()> {
            self.inner.remove_lesson(lesson_id).await
        }

        async fn insert_file(&self, _file: FileRecord) -> crate::Result<FileRecord> {
            Err(CatalogError::Repository("insert failed".to_string()))
        }

        async fn list_files_by_lesson(
            &self,
            lesson_id: &str,
        ) -> crate::Result<Vec<FileRecord>> {
            self.inner.list_files_by_lesson(lesson_id).await
        }

        async fn find_file(&self, file_id: &str) -> crate::Result<Option<FileRecord>> {
            self.inner.find_file(file_id).await
        }
    }

    #[tokio::test]
    async fn test_failed_insert_compensates_blob_and_inline_lesson() {
        let temp_dir = TempDir::new().unwrap();
        let service = CatalogService::new(
            Arc::new(FailingCatalog {
                inner: InMemoryCatalog::new(),
            }),
            BlobStore::new(temp_dir.path()).await.unwrap(),
        );

        let result = service.upload(&teacher(), upload_request("intro.ipynb")).await;

        assert!(matches!(result, Err(CatalogError::Repository(_))));
        // Neither the blob nor the inline-created lesson survives.
        assert_eq!(stored_file_count(&temp_dir).await, 0);
        assert!(service.list_lessons(&teacher()).await.unwrap().is_empty());
    }
}
