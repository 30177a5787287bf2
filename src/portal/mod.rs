//! Landing page overlay flow
//!
//! The landing page shows at most one overlay at a time. The benefits
//! overview leads into the registration wizard; dismissing the registration
//! overlay closes the wizard session.

use serde::Serialize;
use thiserror::Error;

use crate::registration::RegistrationWizard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Benefit {
    pub title: &'static str,
    pub description: &'static str,
}

pub const BENEFITS: [Benefit; 6] = [
    Benefit {
        title: "Career Growth",
        description: "Fast-track promotions and skill development programs",
    },
    Benefit {
        title: "Health Benefits",
        description: "Comprehensive medical, dental, and vision coverage",
    },
    Benefit {
        title: "Performance Bonuses",
        description: "Quarterly rewards based on achievements",
    },
    Benefit {
        title: "Flexible Hours",
        description: "Work-life balance with remote options",
    },
    Benefit {
        title: "Wellness Programs",
        description: "Mental health support and gym memberships",
    },
    Benefit {
        title: "Team Culture",
        description: "Collaborative environment with amazing peers",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Overlay {
    #[default]
    None,
    Benefits,
    Registration,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortalError {
    #[error("Cannot {action} while the {current:?} overlay is shown")]
    InvalidOverlay {
        current: Overlay,
        action: &'static str,
    },
}

#[derive(Debug)]
pub struct Portal {
    overlay: Overlay,
    wizard: RegistrationWizard,
}

impl Portal {
    pub fn new(wizard: RegistrationWizard) -> Self {
        Self {
            overlay: Overlay::None,
            wizard,
        }
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn wizard(&self) -> &RegistrationWizard {
        &self.wizard
    }

    pub fn benefits(&self) -> &'static [Benefit] {
        &BENEFITS
    }

    pub fn show_benefits(&mut self) -> Result<(), PortalError> {
        match self.overlay {
            Overlay::None | Overlay::Benefits => {
                self.overlay = Overlay::Benefits;
                Ok(())
            }
            Overlay::Registration => Err(PortalError::InvalidOverlay {
                current: self.overlay,
                action: "show benefits",
            }),
        }
    }

    /// Swap the benefits overlay for a fresh registration session
    pub fn proceed_to_registration(&mut self) -> Result<String, PortalError> {
        if self.overlay != Overlay::Benefits {
            return Err(PortalError::InvalidOverlay {
                current: self.overlay,
                action: "proceed to registration",
            });
        }
        Ok(self.enter_registration())
    }

    pub fn open_registration(&mut self) -> String {
        self.enter_registration()
    }

    fn enter_registration(&mut self) -> String {
        self.overlay = Overlay::Registration;
        let session_id = self.wizard.open();
        tracing::debug!(session_id = %session_id, "Registration overlay shown");
        session_id
    }

    pub fn dismiss(&mut self) {
        if self.overlay == Overlay::Registration {
            self.wizard.close();
        }
        self.overlay = Overlay::None;
    }
}
