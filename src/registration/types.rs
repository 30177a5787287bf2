// Core types for the registration wizard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wizard stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// First and last name
    PersonalInfo,
    /// Company email and password
    AccountSetup,
    /// Registration fee payment details
    Payment,
    /// Submission accepted (terminal)
    Complete,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::PersonalInfo,
        Stage::AccountSetup,
        Stage::Payment,
        Stage::Complete,
    ];

    /// One-based position shown in the progress indicator
    pub fn number(self) -> u8 {
        match self {
            Stage::PersonalInfo => 1,
            Stage::AccountSetup => 2,
            Stage::Payment => 3,
            Stage::Complete => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::PersonalInfo => "Personal Info",
            Stage::AccountSetup => "Account Setup",
            Stage::Payment => "Payment",
            Stage::Complete => "Complete",
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::PersonalInfo => Some(Stage::AccountSetup),
            Stage::AccountSetup => Some(Stage::Payment),
            Stage::Payment => Some(Stage::Complete),
            Stage::Complete => None,
        }
    }

    /// Stage reached by going back, if going back is allowed at all
    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::AccountSetup => Some(Stage::PersonalInfo),
            Stage::Payment => Some(Stage::AccountSetup),
            Stage::PersonalInfo | Stage::Complete => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Complete
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Individual draft fields, used to name what failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    FirstName,
    LastName,
    EmailLocalPart,
    Password,
    PasswordConfirmation,
    CardNumber,
    ExpiryDate,
    SecurityCode,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::EmailLocalPart => "Company Email",
            Field::Password => "Password",
            Field::PasswordConfirmation => "Confirm Password",
            Field::CardNumber => "Card Number",
            Field::ExpiryDate => "Expiry Date",
            Field::SecurityCode => "CVV",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Form values accumulated across stages.
///
/// The draft survives backward navigation and failed validation, so the
/// user only ever corrects what is wrong.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email_local_part: String,
    pub password: String,
    pub password_confirmation: String,
    pub card_number: String,
    /// `MM/YY`
    pub expiry_date: String,
    pub security_code: String,
}

impl RegistrationDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::EmailLocalPart => &self.email_local_part,
            Field::Password => &self.password,
            Field::PasswordConfirmation => &self.password_confirmation,
            Field::CardNumber => &self.card_number,
            Field::ExpiryDate => &self.expiry_date,
            Field::SecurityCode => &self.security_code,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email_address(&self, domain: &str) -> String {
        format!("{}@{}", self.email_local_part, domain)
    }

    /// Merge submitted stage values into the draft
    pub fn apply(&mut self, input: StageInput) {
        match input {
            StageInput::PersonalInfo {
                first_name,
                last_name,
            } => {
                self.first_name = first_name;
                self.last_name = last_name;
            }
            StageInput::AccountSetup {
                email_local_part,
                password,
                password_confirmation,
            } => {
                self.email_local_part = email_local_part;
                self.password = password;
                self.password_confirmation = password_confirmation;
            }
            StageInput::Payment {
                card_number,
                expiry_date,
                security_code,
            } => {
                self.card_number = card_number;
                self.expiry_date = expiry_date;
                self.security_code = security_code;
            }
        }
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "***"
    }
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_local_part", &self.email_local_part)
            .field("password", &redact(&self.password))
            .field("password_confirmation", &redact(&self.password_confirmation))
            .field("card_number", &redact(&self.card_number))
            .field("expiry_date", &self.expiry_date)
            .field("security_code", &redact(&self.security_code))
            .finish()
    }
}

/// Values submitted together with an advance request, one variant per
/// editable stage
#[derive(Clone, PartialEq, Eq)]
pub enum StageInput {
    PersonalInfo {
        first_name: String,
        last_name: String,
    },
    AccountSetup {
        email_local_part: String,
        password: String,
        password_confirmation: String,
    },
    Payment {
        card_number: String,
        expiry_date: String,
        security_code: String,
    },
}

impl StageInput {
    pub fn personal_info(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        StageInput::PersonalInfo {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn account_setup(
        email_local_part: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        StageInput::AccountSetup {
            email_local_part: email_local_part.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
        }
    }

    pub fn payment(
        card_number: impl Into<String>,
        expiry_date: impl Into<String>,
        security_code: impl Into<String>,
    ) -> Self {
        StageInput::Payment {
            card_number: card_number.into(),
            expiry_date: expiry_date.into(),
            security_code: security_code.into(),
        }
    }

    /// Stage these values belong to
    pub fn stage(&self) -> Stage {
        match self {
            StageInput::PersonalInfo { .. } => Stage::PersonalInfo,
            StageInput::AccountSetup { .. } => Stage::AccountSetup,
            StageInput::Payment { .. } => Stage::Payment,
        }
    }
}

impl fmt::Debug for StageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the stage; these carry secrets
        write!(f, "StageInput({})", self.stage())
    }
}

/// Sent once the confirmation service has accepted a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub email: String,
    pub full_name: String,
    pub reference: String,
    pub submitted_at: DateTime<Utc>,
}

/// Transient user-facing messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Error { message: String },
    Success { message: String },
    Completed(Completion),
}
