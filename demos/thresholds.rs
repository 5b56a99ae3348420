use std::env::args;
use std::error::Error;

use checkplugin::{safe_run, Metric, ServiceState};

// Usage: cargo run --example thresholds -- <value> [warning] [critical]
//        cargo run --example thresholds -- 95 0:80 0:90

fn main() {
    safe_run(do_check, ServiceState::Unknown).print_and_exit()
}

fn do_check(check: &mut checkplugin::ThresholdEvaluator) -> Result<(), Box<dyn Error>> {
    let mut args = args().skip(1);
    let value: f64 = args.next().ok_or("provide a value")?.parse()?;
    let warning = args.next().unwrap_or_default();
    let critical = args.next().unwrap_or_default();

    check.push(Metric::new("value", value, "", &warning, &critical))?;

    // A second metric without thresholds, it only shows up in the output if it isn't ok.
    check.add_metric("args", args.count() as f64, "c", "", "")?;

    Ok(())
}
