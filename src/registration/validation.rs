// Per-stage validation gates

use thiserror::Error;

use super::types::{Field, RegistrationDraft, Stage};

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", join_fields(.fields))]
    MissingFields { fields: Vec<Field> },
    #[error("Password and confirmation do not match")]
    PasswordMismatch,
    #[error("Password shorter than {min} characters")]
    PasswordTooShort { min: usize },
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Message shown to the user as a transient notice
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingFields { fields }
                if fields.iter().any(|f| {
                    matches!(f, Field::CardNumber | Field::ExpiryDate | Field::SecurityCode)
                }) =>
            {
                "Please fill in all payment details".to_string()
            }
            ValidationError::MissingFields { .. } => "Please fill in all fields".to_string(),
            ValidationError::PasswordMismatch => "Passwords do not match".to_string(),
            ValidationError::PasswordTooShort { min } => {
                format!("Password must be at least {min} characters")
            }
        }
    }

    /// Fields the user has to correct
    pub fn fields(&self) -> Vec<Field> {
        match self {
            ValidationError::MissingFields { fields } => fields.clone(),
            ValidationError::PasswordMismatch => {
                vec![Field::Password, Field::PasswordConfirmation]
            }
            ValidationError::PasswordTooShort { .. } => vec![Field::Password],
        }
    }
}

/// Fields that must be non-empty before leaving `stage`.
///
/// The confirmation is not listed for the account stage; an empty
/// confirmation against a non-empty password is reported as a mismatch.
pub fn required_fields(stage: Stage) -> &'static [Field] {
    match stage {
        Stage::PersonalInfo => &[Field::FirstName, Field::LastName],
        Stage::AccountSetup => &[Field::EmailLocalPart, Field::Password],
        Stage::Payment => &[Field::CardNumber, Field::ExpiryDate, Field::SecurityCode],
        Stage::Complete => &[],
    }
}

/// Validation rules, parameterised by the configured password minimum.
///
/// Password length is measured in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageValidator {
    pub min_password_length: usize,
}

impl Default for StageValidator {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl StageValidator {
    pub fn new(min_password_length: usize) -> Self {
        Self {
            min_password_length,
        }
    }

    /// Check only the fields owned by `stage`
    pub fn validate(&self, stage: Stage, draft: &RegistrationDraft) -> Result<(), ValidationError> {
        let missing: Vec<Field> = required_fields(stage)
            .iter()
            .copied()
            .filter(|field| draft.value(*field).is_empty())
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        if stage == Stage::AccountSetup {
            if draft.password != draft.password_confirmation {
                return Err(ValidationError::PasswordMismatch);
            }
            if draft.password.encode_utf16().count() < self.min_password_length {
                return Err(ValidationError::PasswordTooShort {
                    min: self.min_password_length,
                });
            }
        }

        Ok(())
    }
}
