//! Registration step controller
//!
//! [`RegistrationWizard`] owns one wizard session at a time: the current
//! stage, the accumulated draft and the `submitting` gate. Every method
//! takes `&self` so the wizard can be shared between the task driving the
//! UI and the task awaiting confirmation; the session lock is never held
//! across an `.await`.

use chrono::Utc;
use statig::prelude::*;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::Instrument;

use super::confirmation::{
    ConfirmationError, ConfirmationRequest, ConfirmationService, SimulatedConfirmation,
};
use super::state_machine::{StageMachine, WizardEvent};
use super::types::{Completion, Notice, RegistrationDraft, Stage, StageInput};
use super::validation::{StageValidator, ValidationError};
use crate::config::RegistrationConfig;
use crate::telemetry::{create_registration_span, generate_correlation_id};

const NOTICE_CAPACITY: usize = 32;
const SUBMITTED_MESSAGE: &str = "Registration submitted successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Advance,
    Retreat,
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardAction::Advance => f.write_str("advance"),
            WizardAction::Retreat => f.write_str("go back"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Registration wizard is not open")]
    NotOpen,
    #[error("Cannot {action} from stage {stage}")]
    InvalidTransition { stage: Stage, action: WizardAction },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("Wizard was closed while the submission was in flight")]
    SessionClosed,
    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),
}

impl WizardError {
    /// Whether the caller should simply ignore the request
    pub fn is_no_op(&self) -> bool {
        matches!(
            self,
            WizardError::InvalidTransition { .. } | WizardError::SubmissionInProgress
        )
    }
}

/// Result of a successful advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advanced {
    /// Moved to the given stage
    Moved(Stage),
    /// Submission confirmed; the wizard is now at [`Stage::Complete`]
    Completed(Completion),
}

impl Advanced {
    pub fn stage(&self) -> Stage {
        match self {
            Advanced::Moved(stage) => *stage,
            Advanced::Completed(_) => Stage::Complete,
        }
    }
}

struct Session {
    id: String,
    machine: StateMachine<StageMachine>,
    draft: RegistrationDraft,
    submitting: bool,
}

impl Session {
    fn new() -> Self {
        let id = generate_correlation_id();
        Self {
            machine: StageMachine::new(id.clone()).state_machine(),
            id,
            draft: RegistrationDraft::default(),
            submitting: false,
        }
    }

    fn stage(&self) -> Stage {
        self.machine.state().stage()
    }
}

pub struct RegistrationWizard {
    config: RegistrationConfig,
    validator: StageValidator,
    confirmation: Arc<dyn ConfirmationService>,
    session: Mutex<Option<Session>>,
    notices: broadcast::Sender<Notice>,
}

impl fmt::Debug for RegistrationWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationWizard")
            .field("config", &self.config)
            .field("session_id", &self.session_id())
            .field("stage", &self.stage())
            .finish()
    }
}

impl RegistrationWizard {
    pub fn new(config: RegistrationConfig, confirmation: Arc<dyn ConfirmationService>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            validator: StageValidator::new(config.min_password_length),
            config,
            confirmation,
            session: Mutex::new(None),
            notices,
        }
    }

    /// Wizard backed by the fixed-delay simulated confirmation
    pub fn simulated(config: RegistrationConfig) -> Self {
        let confirmation = Arc::new(SimulatedConfirmation::new(config.confirmation_delay()));
        Self::new(config, confirmation)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine
        let _ = self.notices.send(notice);
    }

    /// Start a fresh session at the first stage, discarding any current one
    pub fn open(&self) -> String {
        let session = Session::new();
        let id = session.id.clone();
        if let Some(previous) = self.lock().replace(session) {
            tracing::debug!(session_id = %previous.id, "Replaced open session");
        }
        tracing::info!(session_id = %id, stage = %Stage::PersonalInfo, "Registration wizard opened");
        id
    }

    /// Discard the current session. An in-flight submission finishes but
    /// its result is dropped.
    pub fn close(&self) {
        if let Some(session) = self.lock().take() {
            tracing::info!(
                session_id = %session.id,
                stage = %session.stage(),
                submitting = session.submitting,
                "Registration wizard closed"
            );
        }
    }

    /// Back to the first stage with an empty draft
    pub fn reset(&self) -> String {
        self.close();
        self.open()
    }

    /// Merge `input` into the draft, validate the current stage and move on.
    ///
    /// From the payment stage this awaits the confirmation service before
    /// reaching [`Stage::Complete`].
    pub async fn advance(&self, input: StageInput) -> Result<Advanced, WizardError> {
        let (request, span) = {
            let mut guard = self.lock();
            let session = guard.as_mut().ok_or(WizardError::NotOpen)?;

            if session.submitting {
                tracing::debug!(session_id = %session.id, "Ignoring advance while submitting");
                return Err(WizardError::SubmissionInProgress);
            }

            let stage = session.stage();
            if stage.is_terminal() || input.stage() != stage {
                return Err(WizardError::InvalidTransition {
                    stage,
                    action: WizardAction::Advance,
                });
            }

            session.draft.apply(input);

            if let Err(error) = self.validator.validate(stage, &session.draft) {
                tracing::warn!(
                    session_id = %session.id,
                    stage = %stage,
                    fields = ?error.fields(),
                    "Stage validation failed"
                );
                self.notify(Notice::Error {
                    message: error.user_message(),
                });
                return Err(error.into());
            }

            if stage != Stage::Payment {
                session.machine.handle(&WizardEvent::Continue);
                return Ok(Advanced::Moved(session.stage()));
            }

            session.submitting = true;
            let request = ConfirmationRequest {
                session_id: session.id.clone(),
                email: session.draft.email_address(&self.config.email_domain),
                full_name: session.draft.full_name(),
                fee_usd: self.config.registration_fee_usd,
            };
            let span = create_registration_span("confirm", &session.id, stage);
            (request, span)
        };

        let result = self.confirmation.confirm(&request).instrument(span).await;

        let mut guard = self.lock();
        let session = match guard.as_mut() {
            Some(session) if session.id == request.session_id => session,
            _ => {
                tracing::info!(
                    session_id = %request.session_id,
                    "Discarding confirmation for closed session"
                );
                return Err(WizardError::SessionClosed);
            }
        };
        session.submitting = false;

        let confirmation = match result {
            Ok(confirmation) => confirmation,
            Err(error) => {
                tracing::warn!(session_id = %session.id, error = %error, "Confirmation failed");
                self.notify(Notice::Error {
                    message: error.to_string(),
                });
                return Err(error.into());
            }
        };

        session.machine.handle(&WizardEvent::Confirmed);

        let completion = Completion {
            email: request.email,
            full_name: request.full_name,
            reference: confirmation.reference,
            submitted_at: Utc::now(),
        };
        tracing::info!(
            session_id = %session.id,
            reference = %completion.reference,
            "Registration submitted"
        );
        self.notify(Notice::Success {
            message: SUBMITTED_MESSAGE.to_string(),
        });
        self.notify(Notice::Completed(completion.clone()));

        Ok(Advanced::Completed(completion))
    }

    /// Step back one stage without touching the draft
    pub fn retreat(&self) -> Result<Stage, WizardError> {
        let mut guard = self.lock();
        let session = guard.as_mut().ok_or(WizardError::NotOpen)?;

        if session.submitting {
            return Err(WizardError::SubmissionInProgress);
        }

        let stage = session.stage();
        if stage.previous().is_none() {
            return Err(WizardError::InvalidTransition {
                stage,
                action: WizardAction::Retreat,
            });
        }

        session.machine.handle(&WizardEvent::Back);
        Ok(session.stage())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    pub fn stage(&self) -> Option<Stage> {
        self.lock().as_ref().map(Session::stage)
    }

    pub fn draft(&self) -> Option<RegistrationDraft> {
        self.lock().as_ref().map(|session| session.draft.clone())
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().as_ref().is_some_and(|session| session.submitting)
    }

    pub fn session_id(&self) -> Option<String> {
        self.lock().as_ref().map(|session| session.id.clone())
    }

    /// Address the confirmation will be sent to
    pub fn email_address(&self) -> Option<String> {
        self.lock()
            .as_ref()
            .map(|session| session.draft.email_address(&self.config.email_domain))
    }

    pub fn registration_fee(&self) -> u32 {
        self.config.registration_fee_usd
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::confirmation::{Confirmation, MockConfirmationService};
    use crate::registration::types::Field;

    fn accepting_mock(times: usize) -> MockConfirmationService {
        let mut mock = MockConfirmationService::new();
        mock.expect_confirm().times(times).returning(|_| {
            Ok(Confirmation {
                reference: "ZX-TEST0001".to_string(),
            })
        });
        mock
    }

    fn wizard_with(mock: MockConfirmationService) -> RegistrationWizard {
        RegistrationWizard::new(RegistrationConfig::default(), Arc::new(mock))
    }

    async fn reach_payment(wizard: &RegistrationWizard) {
        wizard
            .advance(StageInput::personal_info("Ada", "Lovelace"))
            .await
            .unwrap();
        wizard
            .advance(StageInput::account_setup("ada", "longenough1", "longenough1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_closed_wizard_rejects_operations() {
        let wizard = wizard_with(accepting_mock(0));
        assert!(!wizard.is_open());
        assert_eq!(wizard.stage(), None);

        let err = wizard
            .advance(StageInput::personal_info("Ada", "Lovelace"))
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::NotOpen));
        assert!(matches!(wizard.retreat(), Err(WizardError::NotOpen)));
    }

    #[tokio::test]
    async fn test_happy_path_completes_with_derived_email() {
        let wizard = wizard_with(accepting_mock(1));
        wizard.open();

        reach_payment(&wizard).await;
        assert_eq!(wizard.stage(), Some(Stage::Payment));

        let outcome = wizard
            .advance(StageInput::payment("4111111111111111", "12/29", "123"))
            .await
            .unwrap();

        let Advanced::Completed(completion) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(completion.email, "ada@zynix.com");
        assert_eq!(completion.full_name, "Ada Lovelace");
        assert_eq!(completion.reference, "ZX-TEST0001");
        assert_eq!(wizard.stage(), Some(Stage::Complete));
        assert_eq!(wizard.email_address().as_deref(), Some("ada@zynix.com"));
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn test_failed_validation_keeps_stage_and_values() {
        let wizard = wizard_with(accepting_mock(0));
        wizard.open();

        let err = wizard
            .advance(StageInput::personal_info("Ada", ""))
            .await
            .unwrap_err();
        match err {
            WizardError::Validation(ValidationError::MissingFields { fields }) => {
                assert_eq!(fields, vec![Field::LastName]);
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert_eq!(wizard.stage(), Some(Stage::PersonalInfo));
        assert_eq!(wizard.draft().unwrap().first_name, "Ada");
    }

    #[tokio::test]
    async fn test_input_for_other_stage_is_invalid_transition() {
        let wizard = wizard_with(accepting_mock(0));
        wizard.open();

        let err = wizard
            .advance(StageInput::payment("4111111111111111", "12/29", "123"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WizardError::InvalidTransition {
                stage: Stage::PersonalInfo,
                action: WizardAction::Advance
            }
        ));
        assert!(err.is_no_op());
        // Draft untouched
        assert!(wizard.draft().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retreat_boundaries() {
        let wizard = wizard_with(accepting_mock(1));
        wizard.open();

        let err = wizard.retreat().unwrap_err();
        assert!(matches!(
            err,
            WizardError::InvalidTransition {
                stage: Stage::PersonalInfo,
                action: WizardAction::Retreat
            }
        ));
        assert_eq!(err.to_string(), "Cannot go back from stage Personal Info");

        reach_payment(&wizard).await;
        assert_eq!(wizard.retreat().unwrap(), Stage::AccountSetup);
        assert_eq!(wizard.retreat().unwrap(), Stage::PersonalInfo);

        reach_payment(&wizard).await;
        wizard
            .advance(StageInput::payment("4111111111111111", "12/29", "123"))
            .await
            .unwrap();
        assert!(matches!(
            wizard.retreat(),
            Err(WizardError::InvalidTransition {
                stage: Stage::Complete,
                ..
            })
        ));
        assert!(matches!(
            wizard
                .advance(StageInput::personal_info("Ada", "Lovelace"))
                .await,
            Err(WizardError::InvalidTransition {
                stage: Stage::Complete,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_confirmation_failure_stays_on_payment() {
        let mut mock = MockConfirmationService::new();
        mock.expect_confirm().times(1).returning(|_| {
            Err(ConfirmationError::Unavailable {
                message: "offline".to_string(),
            })
        });
        let wizard = wizard_with(mock);
        wizard.open();
        reach_payment(&wizard).await;

        let err = wizard
            .advance(StageInput::payment("4111111111111111", "12/29", "123"))
            .await
            .unwrap_err();

        assert!(matches!(err, WizardError::Confirmation(_)));
        assert_eq!(wizard.stage(), Some(Stage::Payment));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.draft().unwrap().card_number, "4111111111111111");
    }

    #[tokio::test]
    async fn test_confirmation_request_carries_fee_and_identity() {
        let mut mock = MockConfirmationService::new();
        mock.expect_confirm()
            .withf(|request| {
                request.email == "ada@zynix.com"
                    && request.full_name == "Ada Lovelace"
                    && request.fee_usd == 50
            })
            .times(1)
            .returning(|_| {
                Ok(Confirmation {
                    reference: "ZX-TEST0002".to_string(),
                })
            });
        let wizard = wizard_with(mock);
        let session_id = wizard.open();
        reach_payment(&wizard).await;

        wizard
            .advance(StageInput::payment("4111111111111111", "12/29", "123"))
            .await
            .unwrap();
        assert_eq!(wizard.session_id(), Some(session_id));
    }

    #[tokio::test]
    async fn test_notices_are_broadcast() {
        let wizard = wizard_with(accepting_mock(1));
        let mut notices = wizard.subscribe();
        wizard.open();

        let _ = wizard
            .advance(StageInput::personal_info("", "Lovelace"))
            .await;
        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::Error {
                message: "Please fill in all fields".to_string()
            }
        );

        reach_payment(&wizard).await;
        wizard
            .advance(StageInput::payment("4111111111111111", "12/29", "123"))
            .await
            .unwrap();

        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::Success {
                message: "Registration submitted successfully!".to_string()
            }
        );
        match notices.recv().await.unwrap() {
            Notice::Completed(completion) => assert_eq!(completion.email, "ada@zynix.com"),
            other => panic!("unexpected notice {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_clears_draft_and_session() {
        let wizard = wizard_with(accepting_mock(0));
        let first = wizard.open();
        wizard
            .advance(StageInput::personal_info("Ada", "Lovelace"))
            .await
            .unwrap();

        let second = wizard.reset();
        assert_ne!(first, second);
        assert_eq!(wizard.stage(), Some(Stage::PersonalInfo));
        assert!(wizard.draft().unwrap().is_empty());
    }
}
