/// Lets you simply create an evaluator from multiple metrics. It's a bit like the vec! macro.
/// ```rust
/// # #[macro_use]
/// # extern crate checkplugin;
/// #
/// # use checkplugin::{Metric, ServiceState};
/// #
/// # fn main() {
/// let m1 = Metric::new("test", 12.0, "", "0:10", "");
/// let m2 = Metric::new("other", 1.0, "s", "", "");
/// let mut evaluator = evaluator![m1, m2];
/// assert_eq!(evaluator.render(false).overall(), ServiceState::Warning);
/// # }
/// ```
#[macro_export]
macro_rules! evaluator {
    ($( $m:expr ), * $(,)?) => {
        {
            let metrics: ::std::vec::Vec<$crate::Metric> = ::std::vec![$( $m ),*];
            metrics.into_iter().collect::<$crate::ThresholdEvaluator>()
        }
    };
}
