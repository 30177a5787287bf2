use anyhow::{bail, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::config::RegistrationConfig;
use crate::registration::{
    Advanced, Completion, RegistrationWizard, SimulatedConfirmation, Stage, StageInput,
    WizardError,
};

const BACK: &str = "back";
const QUIT: &str = "quit";

/// What the user typed for one stage
enum Reply {
    Values(Vec<String>),
    Back,
    Quit,
}

/// How an interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Completed(Completion),
    Cancelled,
}

pub struct RegisterCommand {
    pub config: RegistrationConfig,
}

impl RegisterCommand {
    pub fn new(config: RegistrationConfig) -> Self {
        Self { config }
    }

    pub fn with_delay_ms(mut self, delay_ms: Option<u64>) -> Self {
        if let Some(delay_ms) = delay_ms {
            self.config.confirmation_delay_ms = delay_ms;
        }
        self
    }

    pub async fn execute(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        self.run(&mut stdin.lock(), &mut stdout).await?;
        Ok(())
    }

    pub async fn run<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<RegisterOutcome> {
        let confirmation = Arc::new(SimulatedConfirmation::new(self.config.confirmation_delay()));
        let wizard = RegistrationWizard::new(self.config.clone(), confirmation);
        wizard.open();

        writeln!(output, "📝 Employee Registration - Join Zynix Software Solutions")?;
        writeln!(output, "   Type '{BACK}' at the first prompt of a stage to go back, '{QUIT}' to leave.")?;

        loop {
            let Some(stage) = wizard.stage() else {
                bail!("Registration wizard closed unexpectedly");
            };
            if stage.is_terminal() {
                bail!("Registration already complete");
            }

            writeln!(output)?;
            writeln!(output, "[{}/4] {}", stage.number(), stage.title())?;
            if stage == Stage::Payment {
                writeln!(
                    output,
                    "💳 Note: A one-time registration fee of ${} is required for equipment and onboarding materials.",
                    self.config.registration_fee_usd
                )?;
            }

            let labels = self.field_labels(stage);
            let values = match prompt_fields(input, output, &labels)? {
                Reply::Values(values) => values,
                Reply::Back => {
                    if let Err(e) = wizard.retreat() {
                        writeln!(output, "⚠️  {e}")?;
                    }
                    continue;
                }
                Reply::Quit => {
                    wizard.close();
                    writeln!(output, "👋 Registration cancelled")?;
                    return Ok(RegisterOutcome::Cancelled);
                }
            };

            if stage == Stage::Payment {
                writeln!(output, "⏳ Processing...")?;
                output.flush()?;
            }

            match wizard.advance(stage_input(stage, values)).await {
                Ok(Advanced::Moved(_)) => {}
                Ok(Advanced::Completed(completion)) => {
                    writeln!(output)?;
                    writeln!(output, "✅ Registration Submitted!")?;
                    writeln!(
                        output,
                        "   Your application is being reviewed. You'll receive a confirmation email at {} within 24-48 hours.",
                        completion.email
                    )?;
                    writeln!(output, "   Reference: {}", completion.reference)?;
                    return Ok(RegisterOutcome::Completed(completion));
                }
                Err(WizardError::Validation(e)) => {
                    writeln!(output, "❌ {}", e.user_message())?;
                }
                Err(e) => {
                    writeln!(output, "❌ {e}")?;
                }
            }
        }
    }

    fn field_labels(&self, stage: Stage) -> Vec<String> {
        match stage {
            Stage::PersonalInfo => vec!["First Name".to_string(), "Last Name".to_string()],
            Stage::AccountSetup => vec![
                format!("Company Email (@{})", self.config.email_domain),
                "Create Password".to_string(),
                "Confirm Password".to_string(),
            ],
            Stage::Payment => vec![
                "Card Number".to_string(),
                "Expiry Date (MM/YY)".to_string(),
                "CVV".to_string(),
            ],
            Stage::Complete => Vec::new(),
        }
    }
}

/// Build the advance payload from prompt answers, in label order
fn stage_input(stage: Stage, values: Vec<String>) -> StageInput {
    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or_default();
    match stage {
        Stage::PersonalInfo => StageInput::personal_info(next(), next()),
        Stage::AccountSetup => StageInput::account_setup(next(), next(), next()),
        Stage::Payment => StageInput::payment(next(), next(), next()),
        Stage::Complete => unreachable!("terminal stage has no input"),
    }
}

fn prompt_fields<R: BufRead, W: Write>(input: &mut R, output: &mut W, labels: &[String]) -> Result<Reply> {
    let mut values = Vec::with_capacity(labels.len());
    for label in labels {
        write!(output, "  {label}: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("Input ended before registration was complete");
        }

        // Keywords only count on a stage's first field
        let value = line.trim_end_matches(['\r', '\n']);
        if values.is_empty() {
            match value {
                BACK => return Ok(Reply::Back),
                QUIT => return Ok(Reply::Quit),
                _ => {}
            }
        }
        values.push(value.to_string());
    }
    Ok(Reply::Values(values))
}
