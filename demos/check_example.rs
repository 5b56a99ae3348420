use checkplugin::cli::TemplateOptions;
use checkplugin::Runner;
use tracing_subscriber::EnvFilter;

// Usage: cargo run --features clap --example check_example -- -H 127.0.0.1 -m cpu -w 0:80 -c 0:90

fn main() {
    // stdout belongs to the check result, diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Wrong arguments exit with an unknown state before any metric is collected.
    let opts = TemplateOptions::parse_or_exit_unknown();

    Runner::new()
        .all_metrics_in_output(opts.all_metrics)
        .safe_run(|check| -> anyhow::Result<()> {
            let value = fetch_metric(&opts)?;
            opts.add_metric(check, value, "%")?;
            Ok(())
        })
        .print_and_exit()
}

// Replace this with the actual collection logic of the check.
fn fetch_metric(opts: &TemplateOptions) -> anyhow::Result<f64> {
    match opts.mode.as_str() {
        "cpu" | "memory" => Ok(10.0),
        other => anyhow::bail!("Mode {other} does not exist"),
    }
}
