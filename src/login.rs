//! Patient login: form validation, credential check, and the notice the
//! client shows afterwards.
//!
//! A failed login never says whether the ID or the password was wrong.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::models::Patient;

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid Patient ID or Password.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid Patient ID or Password.")]
    Mismatch,
}

/// Submitted login fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Both fields must be non-empty. Reports the first missing one.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.patient_id.is_empty() {
            return Err(AuthError::Validation("Patient ID is required".into()));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("Password is required".into()));
        }
        Ok(())
    }
}

/// Find the patient whose ID matches case-insensitively and whose password
/// matches exactly. First match wins.
pub fn authenticate<'a>(
    patients: &'a [Patient],
    identifier: &str,
    secret: &str,
) -> Option<&'a Patient> {
    let wanted = identifier.to_lowercase();
    patients.iter().find(|p| {
        p.id.to_lowercase() == wanted && bool::from(p.password.as_bytes().ct_eq(secret.as_bytes()))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Short message for the client to display after a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub variant: NoticeVariant,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn login_success(patient: &Patient) -> Self {
        Self {
            variant: NoticeVariant::Default,
            title: "Login Successful".into(),
            description: format!("Welcome back, {}!", patient.first_name),
        }
    }

    pub fn login_failed() -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            title: "Login Failed".into(),
            description: LOGIN_FAILED_MESSAGE.into(),
        }
    }
}

/// Check an already validated form against `patients`.
pub fn verify<'a>(patients: &'a [Patient], form: &LoginForm) -> Result<&'a Patient, AuthError> {
    match authenticate(patients, &form.patient_id, &form.password) {
        Some(patient) => {
            tracing::info!(patient_id = %patient.id, "Patient login succeeded");
            Ok(patient)
        }
        None => {
            tracing::info!("Patient login rejected");
            Err(AuthError::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backfill::normalize_patient;
    use crate::models::StoredPatient;
    use chrono::Utc;

    fn patient(id: &str, password: &str, first_name: &str) -> Patient {
        normalize_patient(
            StoredPatient {
                id: id.into(),
                password: password.into(),
                first_name: first_name.into(),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn identifier_match_ignores_case() {
        let patients = vec![patient("PAT1", "x", "Noor")];
        let found = authenticate(&patients, "pat1", "x").unwrap();
        assert_eq!(found.first_name, "Noor");
    }

    #[test]
    fn secret_match_is_case_sensitive() {
        let patients = vec![patient("PAT1", "x", "Noor")];
        assert!(authenticate(&patients, "pat1", "X").is_none());
    }

    #[test]
    fn empty_list_matches_nothing() {
        assert!(authenticate(&[], "PAT1", "x").is_none());
    }

    #[test]
    fn unknown_identifier_matches_nothing() {
        let patients = vec![patient("PAT1", "x", "Noor")];
        assert!(authenticate(&patients, "PAT2", "x").is_none());
    }

    #[test]
    fn first_match_wins_on_duplicates() {
        let patients = vec![patient("PAT1", "x", "First"), patient("pat1", "x", "Second")];
        assert_eq!(authenticate(&patients, "PAT1", "x").unwrap().first_name, "First");
    }

    #[test]
    fn password_prefix_does_not_match() {
        let patients = vec![patient("PAT1", "secret", "Noor")];
        assert!(authenticate(&patients, "PAT1", "secre").is_none());
        assert!(authenticate(&patients, "PAT1", "secrets").is_none());
    }

    #[test]
    fn validation_requires_patient_id_first() {
        let form = LoginForm::default();
        assert_eq!(
            form.validate().unwrap_err(),
            AuthError::Validation("Patient ID is required".into())
        );
    }

    #[test]
    fn validation_requires_password() {
        let form = LoginForm {
            patient_id: "PAT1".into(),
            password: String::new(),
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Password is required"
        );
    }

    #[test]
    fn verify_failures_share_one_message() {
        let patients = vec![patient("PAT1", "x", "Noor")];
        let wrong_id = LoginForm {
            patient_id: "PAT9".into(),
            password: "x".into(),
        };
        let wrong_secret = LoginForm {
            patient_id: "PAT1".into(),
            password: "y".into(),
        };
        let a = verify(&patients, &wrong_id).unwrap_err();
        let b = verify(&patients, &wrong_secret).unwrap_err();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), LOGIN_FAILED_MESSAGE);
    }

    #[test]
    fn verify_returns_matching_patient() {
        let patients = vec![patient("PAT1", "x", "Noor")];
        let form = LoginForm {
            patient_id: "pat1".into(),
            password: "x".into(),
        };
        assert_eq!(verify(&patients, &form).unwrap().first_name, "Noor");
    }

    #[test]
    fn success_notice_greets_by_first_name() {
        let p = patient("PAT1", "x", "Noor");
        let notice = Notice::login_success(&p);
        assert_eq!(notice.title, "Login Successful");
        assert_eq!(notice.description, "Welcome back, Noor!");
        assert_eq!(notice.variant, NoticeVariant::Default);
    }

    #[test]
    fn failure_notice_is_destructive_and_generic() {
        let notice = Notice::login_failed();
        assert_eq!(notice.title, "Login Failed");
        assert_eq!(notice.description, LOGIN_FAILED_MESSAGE);
        assert_eq!(notice.variant, NoticeVariant::Destructive);
    }
}
