use anyhow::Result;

pub mod benefits;
pub mod register;
pub mod stages;

pub use benefits::BenefitsCommand;
pub use register::RegisterCommand;
pub use stages::StagesCommand;

pub async fn show_how_to_get_started() -> Result<()> {
    println!("🏢 Zynix Software Solutions - Employee Onboarding");
    println!();
    println!("To get started:");
    println!("  🎁 zynix benefits   # See what Zynix offers");
    println!("  🧭 zynix stages     # Preview the registration steps");
    println!("  📝 zynix register   # Start your registration");
    println!();
    println!("💡 Start with 'zynix register' to join the team!");
    Ok(())
}
