use std::sync::Arc;

use crate::directory::UserDirectory;
use crate::error::{AuthError, Result};
use crate::jwt::{issue_token, verify_token};
use crate::model::{
    NewRegistration, Principal, PublicIdentity, Role, Student, TEACHER_REGISTRATION_NUMBERS,
    Teacher,
};
use crate::password::{hash_password, verify_password};

/// Registration, login, and token verification over a [`UserDirectory`].
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(directory: Arc<dyn UserDirectory>, jwt_secret: String) -> Self {
        Self {
            directory,
            jwt_secret,
        }
    }

    /// Register a new student or teacher.
    ///
    /// Validation short-circuits in a fixed order: role, teacher
    /// registration number against the allow-list, required fields, email
    /// uniqueness across both collections. Only then is the password hashed
    /// and the record inserted. The returned projection never contains the
    /// hash.
    pub async fn register(&self, registration: NewRegistration) -> Result<PublicIdentity> {
        let role: Role = registration.role.parse()?;

        let registration_number = match role {
            Role::Teacher => {
                let number = registration.registration_number.ok_or_else(|| {
                    AuthError::InvalidInput(
                        "Registration number is required for teachers".to_string(),
                    )
                })?;
                if !TEACHER_REGISTRATION_NUMBERS.contains(&number.as_str()) {
                    return Err(AuthError::InvalidInput(
                        "Invalid registration number".to_string(),
                    ));
                }
                Some(number)
            }
            Role::Student => None,
        };

        if registration.name.is_empty()
            || registration.email.is_empty()
            || registration.password.is_empty()
        {
            return Err(AuthError::InvalidInput(
                "Name, email and password are required".to_string(),
            ));
        }

        // Pre-check; the directory re-checks under its write lock, so a
        // concurrent registration still resolves to EmailInUse.
        if self.directory.email_exists(&registration.email).await? {
            return Err(AuthError::EmailInUse);
        }

        let password_hash = hash_password(&registration.password)?;

        let identity = match role {
            Role::Student => {
                let student = self
                    .directory
                    .insert_student(Student::new(
                        registration.name,
                        registration.email,
                        password_hash,
                    ))
                    .await?;
                PublicIdentity::from(&student)
            }
            Role::Teacher => {
                let teacher = self
                    .directory
                    .insert_teacher(Teacher::new(
                        registration.name,
                        registration.email,
                        password_hash,
                        registration_number.unwrap_or_default(),
                    ))
                    .await?;
                PublicIdentity::from(&teacher)
            }
        };

        tracing::info!(role = %role, "registered new identity");
        Ok(identity)
    }

    /// Authenticate credentials and issue a bearer token.
    ///
    /// Email is looked up among students first, then teachers; the role is
    /// inferred from which collection matched rather than stored twice.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let (id, role, password_hash) =
            match self.directory.find_student_by_email(email).await? {
                Some(student) => (student.id, Role::Student, student.password_hash),
                None => match self.directory.find_teacher_by_email(email).await? {
                    Some(teacher) => (teacher.id, Role::Teacher, teacher.password_hash),
                    None => return Err(AuthError::UserNotFound),
                },
            };

        if !verify_password(password, &password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let principal = Principal::new(id, role);
        issue_token(&principal, &self.jwt_secret)
    }

    /// Verify a bearer token and rebuild the principal it encodes. Purely
    /// stateless: validity is a function of signature and expiry alone.
    pub fn verify(&self, token: &str) -> Result<Principal> {
        let claims = verify_token(token, &self.jwt_secret)?;
        Ok(claims.principal())
    }
}
