use anyhow::Result;
use crate::config::RegistrationConfig;
use crate::portal::BENEFITS;

pub struct BenefitsCommand {
    pub fee_usd: u32,
}

impl BenefitsCommand {
    pub fn new(config: &RegistrationConfig) -> Self {
        Self {
            fee_usd: config.registration_fee_usd,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        println!("🎁 EMPLOYEE BENEFITS");
        println!("====================");
        for benefit in BENEFITS.iter() {
            println!("  ✨ {:<20} {}", benefit.title, benefit.description);
        }
        println!();
        println!(
            "💳 A one-time registration fee of ${} covers equipment and onboarding materials.",
            self.fee_usd
        );
        println!("📝 Ready to join? Run 'zynix register'");
        Ok(())
    }
}
