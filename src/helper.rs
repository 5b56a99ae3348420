use std::fmt::Display;

use crate::{CheckOutcome, Runner, ServiceState, ThresholdEvaluator};

/// Runs the given check and reports the given state together with the error message if the
/// check returns an Err.
pub fn safe_run<E: Display>(
    check: impl FnOnce(&mut ThresholdEvaluator) -> Result<(), E>,
    error_state: ServiceState,
) -> CheckOutcome {
    Runner::<E>::new()
        .on_error(move |_| error_state)
        .safe_run(check)
}

/// Prints an unknown result with the given message and exits with the unknown exit code.
pub fn exit_unknown(msg: impl Display) -> ! {
    CheckOutcome::unknown(msg).print_and_exit()
}

#[cfg(test)]
mod tests {
    use crate::{safe_run, ServiceState};

    #[test]
    fn test_safe_run() {
        let outcome = safe_run(|_| Err("probe timed out"), ServiceState::Critical);
        assert_eq!(outcome.state(), ServiceState::Critical);
        assert_eq!(outcome.summary_line(), "CRITICAL - probe timed out");

        let outcome = safe_run(
            |check| check.add_metric("rtt", 12.0, "ms", "100", "200"),
            ServiceState::Critical,
        );
        assert_eq!(outcome.state(), ServiceState::Ok);
        assert_eq!(outcome.summary_line(), "OK");
    }
}
