//! Confirmation service abstraction
//!
//! Submitting the payment stage hands the registration to a
//! [`ConfirmationService`]. The production site only simulates this with a
//! fixed delay; tests substitute instantaneous or failing implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Default simulated confirmation latency
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_millis(3000);

/// What the wizard submits for confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub session_id: String,
    pub email: String,
    pub full_name: String,
    pub fee_usd: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Reference shown to the applicant
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationError {
    #[error("Confirmation rejected: {reason}")]
    Rejected { reason: String },
    #[error("Confirmation service unavailable: {message}")]
    Unavailable { message: String },
}

/// Accepts or rejects a completed registration
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConfirmationService: Send + Sync {
    async fn confirm(&self, request: &ConfirmationRequest) -> Result<Confirmation, ConfirmationError>;
}

/// Waits a fixed delay and always accepts
#[derive(Debug, Clone)]
pub struct SimulatedConfirmation {
    delay: Duration,
}

impl Default for SimulatedConfirmation {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRMATION_DELAY)
    }
}

impl SimulatedConfirmation {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ConfirmationService for SimulatedConfirmation {
    async fn confirm(&self, request: &ConfirmationRequest) -> Result<Confirmation, ConfirmationError> {
        tracing::debug!(
            session_id = %request.session_id,
            delay_ms = self.delay.as_millis() as u64,
            "Simulating registration confirmation"
        );
        tokio::time::sleep(self.delay).await;

        let reference = uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        Ok(Confirmation {
            reference: format!("ZX-{reference}"),
        })
    }
}
