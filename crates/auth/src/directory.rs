use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{AuthError, Result};
use crate::model::{Student, Teacher};

/// Identity persistence seam. Two disjoint collections (students, teachers)
/// queried by email; implementations must enforce email uniqueness *across
/// both* at insert time and surface a violation as
/// [`AuthError::EmailInUse`], since a pre-check alone cannot close the race
/// between check and write.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>>;

    async fn find_teacher_by_email(&self, email: &str) -> Result<Option<Teacher>>;

    /// True if the email exists in either collection.
    async fn email_exists(&self, email: &str) -> Result<bool>;

    async fn insert_student(&self, student: Student) -> Result<Student>;

    async fn insert_teacher(&self, teacher: Teacher) -> Result<Teacher>;
}

#[derive(Default)]
struct Collections {
    students: HashMap<String, Student>,
    teachers: HashMap<String, Teacher>,
}

/// Reference [`UserDirectory`] backed by in-process maps keyed by email.
/// Uniqueness is checked inside the write lock, so concurrent inserts of
/// the same email cannot both succeed.
#[derive(Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Collections>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        let inner = self.inner.read().await;
        Ok(inner.students.get(email).cloned())
    }

    async fn find_teacher_by_email(&self, email: &str) -> Result<Option<Teacher>> {
        let inner = self.inner.read().await;
        Ok(inner.teachers.get(email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.students.contains_key(email) || inner.teachers.contains_key(email))
    }

    async fn insert_student(&self, student: Student) -> Result<Student> {
        let mut inner = self.inner.write().await;
        if inner.students.contains_key(&student.email) || inner.teachers.contains_key(&student.email)
        {
            return Err(AuthError::EmailInUse);
        }
        inner
            .students
            .insert(student.email.clone(), student.clone());
        Ok(student)
    }

    async fn insert_teacher(&self, teacher: Teacher) -> Result<Teacher> {
        let mut inner = self.inner.write().await;
        if inner.students.contains_key(&teacher.email) || inner.teachers.contains_key(&teacher.email)
        {
            return Err(AuthError::EmailInUse);
        }
        inner
            .teachers
            .insert(teacher.email.clone(), teacher.clone());
        Ok(teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let directory = InMemoryDirectory::new();
        let student = Student::new("B".to_string(), "b@x.com".to_string(), "h".to_string());

        directory.insert_student(student.clone()).await.unwrap();

        let found = directory.find_student_by_email("b@x.com").await.unwrap();
        assert_eq!(found.unwrap().id, student.id);
        assert!(directory.email_exists("b@x.com").await.unwrap());
        assert!(!directory.email_exists("c@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_uniqueness_across_collections() {
        let directory = InMemoryDirectory::new();
        let student = Student::new("B".to_string(), "b@x.com".to_string(), "h".to_string());
        directory.insert_student(student).await.unwrap();

        let teacher = Teacher::new(
            "T".to_string(),
            "b@x.com".to_string(),
            "h".to_string(),
            "2022010384".to_string(),
        );

        assert!(matches!(
            directory.insert_teacher(teacher).await,
            Err(AuthError::EmailInUse)
        ));
    }

    #[tokio::test]
    async fn test_collections_stay_disjoint() {
        let directory = InMemoryDirectory::new();
        let teacher = Teacher::new(
            "T".to_string(),
            "t@x.com".to_string(),
            "h".to_string(),
            "2022010384".to_string(),
        );
        directory.insert_teacher(teacher).await.unwrap();

        assert!(
            directory
                .find_student_by_email("t@x.com")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            directory
                .find_teacher_by_email("t@x.com")
                .await
                .unwrap()
                .is_some()
        );
    }
}
