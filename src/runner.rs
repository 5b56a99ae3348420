use std::fmt::Display;

use tracing::{debug, warn};

use crate::{ServiceState, ThresholdEvaluator};

/// Runs a check against a fresh [ThresholdEvaluator] and turns the result into a [CheckOutcome].
///
/// The evaluator only lives for the duration of [Runner::safe_run] and is rendered exactly once,
/// no matter whether the check returns normally or bails out early with `?`.
///
/// ```rust
/// # use checkplugin::{Runner, ServiceState};
/// let outcome = Runner::new()
///     .all_metrics_in_output(true)
///     .safe_run(|check| -> Result<(), checkplugin::Error> {
///         check.add_metric("cpu", 10.0, "%", "0:80", "0:90")?;
///         Ok(())
///     });
///
/// assert_eq!(outcome.state(), ServiceState::Ok);
/// assert_eq!(outcome.summary_line(), "OK - cpu=10%;0:80;0:90");
/// ```
pub struct Runner<E> {
    on_error: Option<Box<dyn FnOnce(&E) -> ServiceState>>,
    all_metrics_in_output: bool,
    perf_data: bool,
}

impl<E: Display> Runner<E> {
    pub fn new() -> Self {
        Self {
            on_error: None,
            all_metrics_in_output: false,
            perf_data: false,
        }
    }

    /// Picks the service state to report when the check returns an error. Without a handler the
    /// state is [ServiceState::Unknown].
    pub fn on_error(mut self, f: impl FnOnce(&E) -> ServiceState + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// List all metrics in the summary line instead of only those which aren't ok.
    pub fn all_metrics_in_output(mut self, all: bool) -> Self {
        self.all_metrics_in_output = all;
        self
    }

    /// Append the performance data of all metrics to the summary line, separated by `|`.
    pub fn with_perf_data(mut self, perf_data: bool) -> Self {
        self.perf_data = perf_data;
        self
    }

    /// This will run the check and render its evaluator. If the check fails, the state from the
    /// `on_error` handler is reported together with the error message.
    pub fn safe_run(
        self,
        f: impl FnOnce(&mut ThresholdEvaluator) -> Result<(), E>,
    ) -> CheckOutcome {
        let mut evaluator = ThresholdEvaluator::new();
        let result = f(&mut evaluator);
        let evaluation = evaluator.render(self.all_metrics_in_output);

        match result {
            Ok(()) => {
                let mut summary_line = evaluation.summary_line().to_owned();
                if self.perf_data && !evaluation.perf_data().is_empty() {
                    summary_line.push_str(" | ");
                    summary_line.push_str(evaluation.perf_data());
                }

                CheckOutcome {
                    state: evaluation.overall(),
                    summary_line,
                }
            }
            Err(err) => {
                let state = self
                    .on_error
                    .map(|f| f(&err))
                    .unwrap_or(ServiceState::Unknown);

                warn!(error = %err, state = %state, "check failed");
                debug!(
                    discarded = evaluation.summary_line(),
                    "evaluation replaced by check error"
                );

                CheckOutcome {
                    state,
                    summary_line: format!("{state} - {err}"),
                }
            }
        }
    }
}

impl<E: Display> Default for Runner<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// The final state and output line of a check run.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckOutcome {
    state: ServiceState,
    summary_line: String,
}

impl CheckOutcome {
    /// An unknown outcome with the given message, for failures before any metric was collected.
    pub fn unknown(msg: impl Display) -> Self {
        CheckOutcome {
            state: ServiceState::Unknown,
            summary_line: format!("{} - {}", ServiceState::Unknown, msg),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }

    pub fn summary_line(&self) -> &str {
        &self.summary_line
    }

    /// Will print the summary line and exit with the exit code of the state.
    pub fn print_and_exit(self) -> ! {
        println!("{}", self.summary_line);
        std::process::exit(self.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("woops")]
    struct EmptyError;

    #[test]
    fn test_runner_ok() {
        let outcome = Runner::<EmptyError>::new()
            .on_error(|_| panic!("check did not fail"))
            .safe_run(|check| {
                check
                    .add_metric("cpu", 95.0, "%", "0:80", "0:90")
                    .map_err(|_| EmptyError)
            });

        assert_eq!(outcome.state(), ServiceState::Critical);
        assert_eq!(outcome.exit_code(), 2);
        assert_eq!(outcome.summary_line(), "CRITICAL - cpu=95%;0:80;0:90");
    }

    #[test]
    fn test_runner_error() {
        let outcome = Runner::<EmptyError>::new().safe_run(|_| Err(EmptyError));

        assert_eq!(outcome.state(), ServiceState::Unknown);
        assert_eq!(outcome.exit_code(), 3);
        assert_eq!(outcome.summary_line(), "UNKNOWN - woops");
    }

    #[test]
    fn test_runner_error_state() {
        let outcome = Runner::<EmptyError>::new()
            .on_error(|_| ServiceState::Critical)
            .safe_run(|check| {
                check
                    .add_metric("cpu", 1.0, "%", "0:80", "0:90")
                    .map_err(|_| EmptyError)?;
                Err(EmptyError)
            });

        assert_eq!(outcome.state(), ServiceState::Critical);
        assert_eq!(outcome.summary_line(), "CRITICAL - woops");
    }

    #[test]
    fn test_runner_no_metrics() {
        let outcome = Runner::<EmptyError>::new().safe_run(|_| Ok(()));

        assert_eq!(outcome.state(), ServiceState::Unknown);
        assert_eq!(outcome.summary_line(), "UNKNOWN - no metrics collected");
    }

    #[test]
    fn test_runner_perf_data() {
        let outcome = Runner::<EmptyError>::new()
            .with_perf_data(true)
            .safe_run(|check| {
                check
                    .add_metric("cpu", 50.0, "%", "0:80", "0:90")
                    .map_err(|_| EmptyError)
            });

        assert_eq!(outcome.summary_line(), "OK | cpu=50%;0:80;0:90");
    }

    #[test]
    fn test_unknown_outcome() {
        let outcome = CheckOutcome::unknown("Error parsing arguments: bad flag");
        assert_eq!(outcome.exit_code(), 3);
        assert_eq!(
            outcome.summary_line(),
            "UNKNOWN - Error parsing arguments: bad flag"
        );
    }
}
