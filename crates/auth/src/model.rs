use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Registration numbers authorized to sign up as teacher. Static
/// configuration data, not user-editable.
pub const TEACHER_REGISTRATION_NUMBERS: &[&str] = &[
    "2022010384",
    "2022003933",
    "2022002551",
    "2022013072",
    "2022003915",
    "2022002186",
    "2022003307",
    "2022003334",
];

/// Closed role set. Parsed once at the boundary (registration body, token
/// claims); every internal check is a match over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            _ => Err(AuthError::InvalidInput("Invalid role".to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified identity attached to a request after token verification.
/// Ephemeral: rebuilt per request from claims, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self.role, Role::Teacher)
    }
}

/// Student identity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl Student {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
        }
    }
}

/// Teacher identity record. Carries the registration number that authorized
/// the signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub registration_number: String,
}

impl Teacher {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        registration_number: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            registration_number,
        }
    }
}

/// Registration input, validated by [`crate::AuthService::register`].
/// `role` stays a string here: parsing it is the first validation step.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub registration_number: Option<String>,
}

/// Public projection of a created identity. The password hash is never
/// echoed back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
}

impl From<&Student> for PublicIdentity {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            registration_number: None,
        }
    }
}

impl From<&Teacher> for PublicIdentity {
    fn from(teacher: &Teacher) -> Self {
        Self {
            name: teacher.name.clone(),
            email: teacher.email.clone(),
            registration_number: Some(teacher.registration_number.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("student").unwrap(), Role::Student);
        assert_eq!(Role::from_str("teacher").unwrap(), Role::Teacher);
        assert!(Role::from_str("admin").is_err());
        assert!(Role::from_str("Teacher").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_public_identity_hides_hash() {
        let teacher = Teacher::new(
            "A".to_string(),
            "a@x.com".to_string(),
            "$argon2id$...".to_string(),
            "2022010384".to_string(),
        );
        let public = PublicIdentity::from(&teacher);
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["name"], "A");
        assert_eq!(json["registrationNumber"], "2022010384");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_student_public_identity_has_no_registration_number() {
        let student = Student::new("B".to_string(), "b@x.com".to_string(), "h".to_string());
        let json = serde_json::to_value(PublicIdentity::from(&student)).unwrap();

        assert!(json.get("registrationNumber").is_none());
    }
}
