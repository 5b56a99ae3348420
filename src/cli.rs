//! Command line options of a typical check plugin.
//!
//! Only available with the `clap` feature.

use clap::error::ErrorKind;
use clap::Parser;

use crate::{exit_unknown, Result, ThresholdEvaluator, Unit};

/// The options every check built from this template understands.
#[derive(Debug, Clone, PartialEq, Parser)]
pub struct TemplateOptions {
    /// IP address for Host
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,
    /// Port for Host
    #[arg(short = 'P', long)]
    pub port: Option<u16>,
    /// Mode/Metric to monitor
    #[arg(short, long)]
    pub mode: String,
    /// Warning threshold range
    #[arg(short, long, env = "CHECK_WARNING", default_value = "")]
    pub warning: String,
    /// Critical threshold range
    #[arg(short, long, env = "CHECK_CRITICAL", default_value = "")]
    pub critical: String,
    /// List every metric in the output, not only the alerting ones
    #[arg(long)]
    pub all_metrics: bool,
}

impl TemplateOptions {
    /// Parses the process arguments. Help and version requests are printed and exit with 0, every
    /// other parse error is reported as unknown.
    pub fn parse_or_exit_unknown() -> Self {
        match Self::try_parse() {
            Ok(opts) => opts,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => exit_unknown(format!("Error parsing arguments: {}", error_message(&err))),
            },
        }
    }

    /// Adds the measured value of the selected mode together with the configured thresholds.
    pub fn add_metric(
        &self,
        check: &mut ThresholdEvaluator,
        value: f64,
        unit: impl Into<Unit>,
    ) -> Result<()> {
        check.add_metric(&self.mode, value, unit, &self.warning, &self.critical)
    }
}

// clap renders errors over several lines with usage hints, the output must stay on one.
fn error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_owned()
}
