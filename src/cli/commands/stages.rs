use anyhow::Result;
use crate::registration::Stage;

#[derive(Default)]
pub struct StagesCommand;

impl StagesCommand {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(&self) -> Result<()> {
        println!("🧭 REGISTRATION STAGES");
        println!("======================");
        for stage in Stage::ALL {
            println!("  {}. {}", stage.number(), stage.title());
        }
        Ok(())
    }
}
