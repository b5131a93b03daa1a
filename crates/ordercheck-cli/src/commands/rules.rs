//! Rules command

use super::{load_config, Outcome};
use anyhow::Result;
use clap::Args;
use console::style;
use ordercheck_orders::OrderRules;

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Allowed email domain (repeatable); replaces the configured list
    #[arg(long = "allowed-domain", value_name = "DOMAIN")]
    pub allowed_domains: Vec<String>,
}

pub fn show_rules(args: RulesArgs) -> Result<Outcome> {
    let rules = OrderRules::new(load_config(&args.allowed_domains)?)?;

    println!("{}", style("Allowed email domains").bold());
    for domain in rules.allowed_email_domains() {
        println!("  {domain}");
    }
    Ok(Outcome::Valid)
}
