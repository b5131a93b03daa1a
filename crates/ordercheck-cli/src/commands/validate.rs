//! Validate command

use super::{load_config, Outcome};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::{style, Emoji};
use ordercheck_orders::{Customer, OrderRules};
use ordercheck_validate::{Validate, ValidationReport};
use std::io::Read;
use std::path::{Path, PathBuf};

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "+ ");
static ERROR: Emoji<'_, '_> = Emoji("❌ ", "x ");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line per failure
    #[default]
    Text,
    /// Structured validation error body
    Json,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the customer JSON document, or `-` for stdin
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Allowed email domain (repeatable); replaces the configured list
    #[arg(long = "allowed-domain", value_name = "DOMAIN")]
    pub allowed_domains: Vec<String>,
}

pub fn validate(args: ValidateArgs) -> Result<Outcome> {
    let rules = OrderRules::new(load_config(&args.allowed_domains)?)?;

    let raw = read_input(&args.input)?;
    let customer: Customer = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid customer document", args.input.display()))?;

    let report = rules.validate(&customer);
    tracing::info!(
        input = %args.input.display(),
        valid = report.is_valid(),
        failures = report.len(),
        "customer validated"
    );

    match args.format {
        Format::Text => print_text(&report),
        Format::Json => print_json(&report)?,
    }

    Ok(if report.is_valid() {
        Outcome::Valid
    } else {
        Outcome::Invalid
    })
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn print_text(report: &ValidationReport) {
    if report.is_valid() {
        println!("{}{}", CHECK, style("valid").green().bold());
        return;
    }
    println!(
        "{}{}",
        ERROR,
        style(format!("invalid: {} error(s)", report.len())).red().bold()
    );
    for (path, failures) in report.iter() {
        for failure in failures {
            println!(
                "  {}: {}",
                style(path).bold(),
                failure.interpolate_message()
            );
        }
    }
}

fn print_json(report: &ValidationReport) -> Result<()> {
    let body = if report.is_valid() {
        serde_json::json!({ "valid": true })
    } else {
        serde_json::to_value(report.to_api_error())?
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
