// Registration Module - Employee registration wizard
//
// Four stages (Personal Info -> Account Setup -> Payment -> Complete) with
// per-stage validation and an injected confirmation service for the final
// submission.

pub mod types;
pub mod validation;
pub mod state_machine;
pub mod confirmation;
pub mod wizard;

pub use types::{Completion, Field, Notice, RegistrationDraft, Stage, StageInput};
pub use validation::{StageValidator, ValidationError};
pub use state_machine::{StageMachine, WizardEvent};
pub use confirmation::{
    Confirmation, ConfirmationError, ConfirmationRequest, ConfirmationService,
    SimulatedConfirmation,
};
pub use wizard::{Advanced, RegistrationWizard, WizardAction, WizardError};
