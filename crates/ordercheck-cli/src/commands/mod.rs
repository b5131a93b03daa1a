//! CLI commands

mod rules;
mod validate;

pub use rules::{show_rules, RulesArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use ordercheck_orders::OrderRulesConfig;
use std::process::ExitCode;

/// Result of a successful command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Valid => ExitCode::SUCCESS,
            Outcome::Invalid => ExitCode::from(1),
        }
    }
}

/// Configuration from `--allowed-domain` flags when given, otherwise from the environment.
fn load_config(allowed_domains: &[String]) -> Result<OrderRulesConfig> {
    if !allowed_domains.is_empty() {
        let config = OrderRulesConfig {
            allowed_email_domains: allowed_domains.to_vec(),
        };
        return Ok(config.normalized()?);
    }
    OrderRulesConfig::from_env().context("failed to load configuration")
}
