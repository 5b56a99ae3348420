use tracing::{debug, warn};

use crate::{Error, Range, Result, ServiceState, Unit};

#[derive(Clone, Debug)]
struct Threshold {
    spec: String,
    range: Result<Range>,
}

impl Threshold {
    // An empty spec means no threshold was given.
    fn parse(spec: &str) -> Option<Self> {
        if spec.is_empty() {
            return None;
        }

        let range = Range::parse(spec);
        if let Err(ref err) = range {
            warn!(spec = spec, error = %err, "ignoring unparsable threshold");
        }

        Some(Threshold {
            spec: spec.to_owned(),
            range,
        })
    }
}

/// A single measurement together with its warning and critical thresholds.
///
/// Threshold specs that fail to parse are kept, the metric then evaluates to
/// [`ServiceState::Unknown`] and carries the parse error for the output.
///
/// ```rust
/// # use checkplugin::{Metric, ServiceState};
/// let metric = Metric::new("load", 3.2, "", "0:4", "0:8");
/// assert_eq!(metric.state(), ServiceState::Ok);
///
/// let metric = Metric::new("load", 5.0, "", "0:4", "0:8");
/// assert_eq!(metric.state(), ServiceState::Warning);
/// ```
#[derive(Clone, Debug)]
pub struct Metric {
    name: String,
    value: f64,
    unit: Unit,
    warning: Option<Threshold>,
    critical: Option<Threshold>,
}

impl Metric {
    pub fn new(
        name: &str,
        value: f64,
        unit: impl Into<Unit>,
        warning: &str,
        critical: &str,
    ) -> Self {
        Metric {
            name: name.to_owned(),
            value,
            unit: unit.into(),
            warning: Threshold::parse(warning),
            critical: Threshold::parse(critical),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn warning(&self) -> Option<&Range> {
        self.warning.as_ref().and_then(|t| t.range.as_ref().ok())
    }

    pub fn critical(&self) -> Option<&Range> {
        self.critical.as_ref().and_then(|t| t.range.as_ref().ok())
    }

    /// Returns the first threshold parse error of this metric, warning before critical.
    pub fn error(&self) -> Option<&Error> {
        [&self.warning, &self.critical]
            .into_iter()
            .flatten()
            .find_map(|t| t.range.as_ref().err())
    }

    /// Evaluates the metric. Critical is checked before warning, the first match wins.
    pub fn state(&self) -> ServiceState {
        if self.error().is_some() || !self.value.is_finite() {
            return ServiceState::Unknown;
        }

        if self.critical().map_or(false, |r| r.matches(self.value)) {
            return ServiceState::Critical;
        }

        if self.warning().map_or(false, |r| r.matches(self.value)) {
            return ServiceState::Warning;
        }

        ServiceState::Ok
    }

    fn spec(threshold: &Option<Threshold>) -> &str {
        threshold.as_ref().map_or("", |t| t.spec.as_str())
    }

    /// `name=value<unit>;warn;crit`, followed by the reason in parentheses if the metric
    /// couldn't be evaluated.
    fn summary_segment(&self) -> String {
        let mut s = format!(
            "{}={}{};{};{}",
            self.name,
            self.value,
            self.unit,
            Self::spec(&self.warning),
            Self::spec(&self.critical)
        );

        if let Some(err) = self.error() {
            s.push_str(&format!(" ({err})"));
        } else if !self.value.is_finite() {
            s.push_str(" (value is not a finite number)");
        }

        s
    }

    /// Renders the metric as nagios performance data.
    pub fn perf_string(&self) -> String {
        // replace `=`
        let label = self.name.replace('=', "_");

        // quote `'`
        let label = label.replace('\'', "''");

        // quote if contains spaces
        let label = if label.contains(' ') {
            format!("'{label}'")
        } else {
            label
        };

        let valid_spec = |threshold: &Option<Threshold>| match threshold {
            Some(t) if t.range.is_ok() => t.spec.clone(),
            _ => String::new(),
        };

        let s = format!(
            "{}={}{};{};{}",
            label,
            self.value,
            self.unit,
            valid_spec(&self.warning),
            valid_spec(&self.critical)
        );
        s.trim_end_matches(';').to_string()
    }
}

/// The rendered result of a [`ThresholdEvaluator`].
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    states: Vec<(String, ServiceState)>,
    overall: ServiceState,
    summary_line: String,
    perf_data: String,
}

impl Evaluation {
    pub fn overall(&self) -> ServiceState {
        self.overall
    }

    pub fn exit_code(&self) -> i32 {
        self.overall.exit_code()
    }

    pub fn summary_line(&self) -> &str {
        &self.summary_line
    }

    /// Performance data of all metrics, space separated.
    pub fn perf_data(&self) -> &str {
        &self.perf_data
    }

    /// The state of every metric, in the order they were added.
    pub fn states(&self) -> &[(String, ServiceState)] {
        &self.states
    }

    /// Returns the state of the first metric called `name`.
    pub fn state_of(&self, name: &str) -> Option<ServiceState> {
        self.states
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, state)| *state)
    }
}

/// Collects the metrics of one check invocation and renders the final result.
///
/// The evaluator starts out collecting metrics. The first call to [`ThresholdEvaluator::render`]
/// finalizes it, after that no metrics can be added anymore.
///
/// ```rust
/// # use checkplugin::{Error, ServiceState, ThresholdEvaluator};
/// let mut evaluator = ThresholdEvaluator::new();
/// evaluator.add_metric("cpu", 50.0, "%", "0:80", "0:90").unwrap();
/// evaluator.add_metric("mem", 85.0, "%", "0:80", "0:90").unwrap();
///
/// let evaluation = evaluator.render(false);
/// assert_eq!(evaluation.summary_line(), "WARNING - mem=85%;0:80;0:90");
///
/// let evaluation = evaluator.render(true);
/// assert_eq!(
///     evaluation.summary_line(),
///     "WARNING - cpu=50%;0:80;0:90, mem=85%;0:80;0:90"
/// );
///
/// assert_eq!(
///     evaluator.add_metric("disk", 1.0, "%", "", ""),
///     Err(Error::AlreadyFinalized)
/// );
/// ```
#[derive(Debug, Default)]
pub struct ThresholdEvaluator {
    metrics: Vec<Metric>,
    finalized: bool,
}

impl ThresholdEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a measurement. Empty warning or critical specs mean no threshold. An unparsable spec
    /// doesn't fail here, it turns this metric unknown when rendering.
    pub fn add_metric(
        &mut self,
        name: &str,
        value: f64,
        unit: impl Into<Unit>,
        warning: &str,
        critical: &str,
    ) -> Result<()> {
        self.push(Metric::new(name, value, unit, warning, critical))
    }

    /// Pushes an already built metric.
    pub fn push(&mut self, metric: Metric) -> Result<()> {
        if self.finalized {
            warn!(metric = metric.name(), "metric added after the result was rendered");
            return Err(Error::AlreadyFinalized);
        }

        debug!(
            metric = metric.name(),
            value = metric.value(),
            state = %metric.state(),
            "metric evaluated"
        );
        self.metrics.push(metric);
        Ok(())
    }

    /// Returns a slice of the pushed metrics.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The worst state of all metrics. Without any metrics the state is unknown.
    pub fn overall(&self) -> ServiceState {
        self.metrics
            .iter()
            .map(Metric::state)
            .max()
            .unwrap_or(ServiceState::Unknown)
    }

    /// Renders the result and finalizes the evaluator.
    ///
    /// The summary line starts with the overall state, followed by the metrics which aren't ok, or
    /// by all metrics if `all_metrics_in_output` is set. Rendering again returns the same result.
    pub fn render(&mut self, all_metrics_in_output: bool) -> Evaluation {
        self.finalized = true;

        let states: Vec<(String, ServiceState)> = self
            .metrics
            .iter()
            .map(|m| (m.name.clone(), m.state()))
            .collect();
        let overall = self.overall();

        let summary_line = if self.metrics.is_empty() {
            format!("{} - {}", overall, Error::NoMetrics)
        } else {
            let segments: Vec<String> = self
                .metrics
                .iter()
                .filter(|m| all_metrics_in_output || m.state() != ServiceState::Ok)
                .map(Metric::summary_segment)
                .collect();

            if segments.is_empty() {
                overall.to_string()
            } else {
                format!("{} - {}", overall, segments.join(", "))
            }
        };

        let perf_data = self
            .metrics
            .iter()
            .map(Metric::perf_string)
            .collect::<Vec<_>>()
            .join(" ");

        debug!(state = %overall, metrics = self.metrics.len(), "check rendered");

        Evaluation {
            states,
            overall,
            summary_line,
            perf_data,
        }
    }
}

impl FromIterator<Metric> for ThresholdEvaluator {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        ThresholdEvaluator {
            metrics: iter.into_iter().collect(),
            finalized: false,
        }
    }
}
