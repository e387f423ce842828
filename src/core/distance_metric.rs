/// Trait for distance metrics used by the discord scanner.
///
/// Designed for static polymorphism: scanners are generic over `M: DistanceMetric`,
/// so the call in the O(n^2) inner loop is monomorphized and inlined.
///
/// The associated `Context` type holds anything that can be computed once per
/// series (e.g., per-window means and standard deviations) so that `distance`
/// never allocates.
pub trait DistanceMetric: Clone + Send + Sync {
    /// Precomputed context for the metric.
    type Context: Clone + Send + Sync;

    /// Precompute context from a time series and subsequence length.
    ///
    /// Callers guarantee `0 < m <= ts.len()`.
    fn precompute(ts: &[f64], m: usize) -> Self::Context;

    /// Compute distance between the subsequences starting at `i` and `j`.
    ///
    /// Callers guarantee `i + m <= ts.len()` and `j + m <= ts.len()`.
    fn distance(ts: &[f64], i: usize, j: usize, m: usize, ctx: &Self::Context) -> f64;

    /// Short human-readable name, used in log output.
    fn name() -> &'static str;
}
