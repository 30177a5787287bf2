// Zynix Onboarding Library - Employee registration wizard
// This exposes the core components for testing and integration

pub mod registration;
pub mod portal;
pub mod config;
pub mod telemetry;
pub mod cli;

// Re-export key types for easy access
pub use registration::{
    Advanced, Completion, ConfirmationService, Notice, RegistrationDraft, RegistrationWizard,
    SimulatedConfirmation, Stage, StageInput, ValidationError, WizardError,
};
pub use portal::{Overlay, Portal};
pub use config::ZynixConfig;
