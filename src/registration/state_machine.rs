use serde::{Deserialize, Serialize};
use statig::prelude::*;

use super::types::Stage;

/// Navigation events. Validation happens before an event is dispatched,
/// so the machine only encodes which moves exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEvent {
    /// Validated forward move from the first two stages
    Continue,
    Back,
    /// Confirmation service accepted the payment stage
    Confirmed,
}

#[derive(Debug, Default)]
pub struct StageMachine {
    pub session_id: String,
}

impl StageMachine {
    pub fn new(session_id: String) -> Self {
        Self { session_id }
    }
}

#[state_machine(
    initial = "State::personal_info()",
    state(derive(Debug, Clone, PartialEq, Eq))
)]
impl StageMachine {
    /// Stages the user can still edit
    #[superstate]
    fn editable(&mut self, event: &WizardEvent) -> Outcome<State> {
        tracing::debug!(
            session_id = %self.session_id,
            event = ?event,
            "Event has no transition from current stage"
        );
        Handled
    }

    #[state(superstate = "editable")]
    fn personal_info(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Continue => {
                tracing::info!(session_id = %self.session_id, stage = %Stage::AccountSetup, "Stage entered");
                Transition(State::account_setup())
            }
            _ => Super,
        }
    }

    #[state(superstate = "editable")]
    fn account_setup(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Continue => {
                tracing::info!(session_id = %self.session_id, stage = %Stage::Payment, "Stage entered");
                Transition(State::payment())
            }
            WizardEvent::Back => {
                tracing::info!(session_id = %self.session_id, stage = %Stage::PersonalInfo, "Stepped back");
                Transition(State::personal_info())
            }
            _ => Super,
        }
    }

    #[state(superstate = "editable")]
    fn payment(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Confirmed => {
                tracing::info!(session_id = %self.session_id, stage = %Stage::Complete, "Registration complete");
                Transition(State::complete())
            }
            WizardEvent::Back => {
                tracing::info!(session_id = %self.session_id, stage = %Stage::AccountSetup, "Stepped back");
                Transition(State::account_setup())
            }
            _ => Super,
        }
    }

    #[state]
    fn complete(&mut self, event: &WizardEvent) -> Outcome<State> {
        tracing::debug!(
            session_id = %self.session_id,
            event = ?event,
            "Ignoring event in terminal stage"
        );
        Handled
    }
}

impl State {
    pub fn stage(&self) -> Stage {
        match self {
            State::PersonalInfo { .. } => Stage::PersonalInfo,
            State::AccountSetup { .. } => Stage::AccountSetup,
            State::Payment { .. } => Stage::Payment,
            State::Complete { .. } => Stage::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_of(sm: &StateMachine<StageMachine>) -> Stage {
        sm.state().stage()
    }

    #[test]
    fn test_forward_path_reaches_complete() {
        let mut sm = StageMachine::new("session-1".to_string()).state_machine();
        assert_eq!(stage_of(&sm), Stage::PersonalInfo);

        sm.handle(&WizardEvent::Continue);
        assert_eq!(stage_of(&sm), Stage::AccountSetup);

        sm.handle(&WizardEvent::Continue);
        assert_eq!(stage_of(&sm), Stage::Payment);

        // Payment only leaves through confirmation
        sm.handle(&WizardEvent::Continue);
        assert_eq!(stage_of(&sm), Stage::Payment);

        sm.handle(&WizardEvent::Confirmed);
        assert_eq!(stage_of(&sm), Stage::Complete);
    }

    #[test]
    fn test_back_moves_one_stage() {
        let mut sm = StageMachine::new("session-2".to_string()).state_machine();
        sm.handle(&WizardEvent::Continue);
        sm.handle(&WizardEvent::Continue);

        sm.handle(&WizardEvent::Back);
        assert_eq!(stage_of(&sm), Stage::AccountSetup);

        sm.handle(&WizardEvent::Back);
        assert_eq!(stage_of(&sm), Stage::PersonalInfo);

        // No stage before the first one
        sm.handle(&WizardEvent::Back);
        assert_eq!(stage_of(&sm), Stage::PersonalInfo);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut sm = StageMachine::new("session-3".to_string()).state_machine();
        sm.handle(&WizardEvent::Continue);
        sm.handle(&WizardEvent::Continue);
        sm.handle(&WizardEvent::Confirmed);

        for event in [WizardEvent::Back, WizardEvent::Continue, WizardEvent::Confirmed] {
            sm.handle(&event);
            assert_eq!(stage_of(&sm), Stage::Complete);
        }
    }

    #[test]
    fn test_confirmed_is_ignored_before_payment() {
        let mut sm = StageMachine::new("session-4".to_string()).state_machine();
        sm.handle(&WizardEvent::Confirmed);
        assert_eq!(stage_of(&sm), Stage::PersonalInfo);
    }
}
