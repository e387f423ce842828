use crate::core::distance_metric::DistanceMetric;
use crate::core::window::Window;

/// Per-window mean and scaled inverse standard deviation.
///
/// Computed in one pass over cumulative sums and sums-of-squares. Non-finite
/// values are kept out of the sums and counted instead, so a NaN or infinity
/// only affects the windows that contain it: those get NaN for both fields.
#[derive(Debug, Clone)]
pub struct WindowStats {
    pub mean: Vec<f64>,
    /// `1 / (sqrt(m) * sigma)` per window, zero for constant windows and NaN
    /// for windows holding a non-finite value.
    pub m_sigma_inv: Vec<f64>,
}

impl WindowStats {
    pub fn compute(ts: &[f64], m: usize) -> Self {
        let n = ts.len();
        if m == 0 || n < m {
            return Self {
                mean: Vec::new(),
                m_sigma_inv: Vec::new(),
            };
        }
        let n_subs = n - m + 1;

        let mut cumsum = vec![0.0; n + 1];
        let mut cumsum_sq = vec![0.0; n + 1];
        let mut non_finite = vec![0usize; n + 1];
        for (i, &x) in ts.iter().enumerate() {
            let (v, bad) = if x.is_finite() { (x, 0) } else { (0.0, 1) };
            cumsum[i + 1] = cumsum[i] + v;
            cumsum_sq[i + 1] = cumsum_sq[i] + v * v;
            non_finite[i + 1] = non_finite[i] + bad;
        }

        let m_f = m as f64;
        let sqrt_m = m_f.sqrt();
        let mut mean = Vec::with_capacity(n_subs);
        let mut m_sigma_inv = Vec::with_capacity(n_subs);
        for i in 0..n_subs {
            if non_finite[i + m] > non_finite[i] {
                mean.push(f64::NAN);
                m_sigma_inv.push(f64::NAN);
                continue;
            }
            let mu = (cumsum[i + m] - cumsum[i]) / m_f;
            // E[X^2] - E[X]^2 can round slightly below zero
            let var = (cumsum_sq[i + m] - cumsum_sq[i]) / m_f - mu * mu;
            let sigma = if var < 0.0 { 0.0 } else { var.sqrt() };
            mean.push(mu);
            m_sigma_inv.push(if sigma < 1e-15 {
                0.0
            } else {
                1.0 / (sqrt_m * sigma)
            });
        }

        Self { mean, m_sigma_inv }
    }
}

/// Z-normalized Euclidean distance metric.
///
/// Distance formula: `d = sqrt(2 * m * (1 - r))` where `r` is the Pearson
/// correlation of the two windows.
///
/// Edge cases:
/// - Either window holds a non-finite value → d = NaN
/// - Both windows constant → d = 0
/// - One window constant → d = sqrt(2*m)
/// - `r` is clamped to [-1, 1]
#[derive(Debug, Clone)]
pub struct ZNormalizedEuclidean;

impl DistanceMetric for ZNormalizedEuclidean {
    type Context = WindowStats;

    fn precompute(ts: &[f64], m: usize) -> Self::Context {
        WindowStats::compute(ts, m)
    }

    #[inline(always)]
    fn distance(ts: &[f64], i: usize, j: usize, m: usize, ctx: &Self::Context) -> f64 {
        let msi = ctx.m_sigma_inv[i];
        let msj = ctx.m_sigma_inv[j];
        let m_f = m as f64;

        if msi.is_nan() || msj.is_nan() {
            return f64::NAN;
        }
        if msi == 0.0 && msj == 0.0 {
            return 0.0;
        }
        if msi == 0.0 || msj == 0.0 {
            return (2.0 * m_f).sqrt();
        }

        let a = Window { start: i, len: m }.slice(ts);
        let b = Window { start: j, len: m }.slice(ts);
        let qt: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let r = (qt - m_f * ctx.mean[i] * ctx.mean[j]) * msi * msj;
        // r is finite here, so the radicand is in [0, 4m]
        (2.0 * m_f * (1.0 - r.clamp(-1.0, 1.0))).sqrt()
    }

    fn name() -> &'static str {
        "z-normalized euclidean"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::brute_force::best_discord;
    use crate::core::discord::{BoundaryPolicy, DiscordConfig};

    #[test]
    fn test_window_stats_simple() {
        // [1,2,3], [2,3,4], [3,4,5]: means 2, 3, 4; sigma = sqrt(2/3)
        let ts = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = WindowStats::compute(&ts, 3);
        assert_eq!(stats.mean.len(), 3);
        assert!((stats.mean[0] - 2.0).abs() < 1e-10);
        assert!((stats.mean[2] - 4.0).abs() < 1e-10);
        let expected = 1.0 / (3.0_f64.sqrt() * (2.0_f64 / 3.0).sqrt());
        for v in &stats.m_sigma_inv {
            assert!((v - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn test_window_stats_constant() {
        let stats = WindowStats::compute(&[5.0; 10], 4);
        assert!(stats.m_sigma_inv.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_shifted_linear_is_zero() {
        // [1,2,3,4] vs [3,4,5,6]: same shape after normalization
        let ts = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ctx = ZNormalizedEuclidean::precompute(&ts, 4);
        let d = ZNormalizedEuclidean::distance(&ts, 0, 2, 4, &ctx);
        assert!(d < 1e-6, "got {d}");
    }

    #[test]
    fn test_scaled_copy_is_zero() {
        // [1,3,2] vs [10,30,20]
        let ts = vec![1.0, 3.0, 2.0, 10.0, 30.0, 20.0];
        let ctx = ZNormalizedEuclidean::precompute(&ts, 3);
        let d = ZNormalizedEuclidean::distance(&ts, 0, 3, 3, &ctx);
        assert!(d < 1e-6, "got {d}");
    }

    #[test]
    fn test_anticorrelated() {
        // [1,2] and [4,3] z-normalize to [-1,1] and [1,-1]: d = sqrt(2*2*2) = sqrt(8)
        let ts = vec![1.0, 2.0, 4.0, 3.0];
        let ctx = ZNormalizedEuclidean::precompute(&ts, 2);
        let d = ZNormalizedEuclidean::distance(&ts, 0, 2, 2, &ctx);
        assert!((d - 8.0_f64.sqrt()).abs() < 1e-10, "got {d}");
    }

    #[test]
    fn test_constant_windows() {
        // [5,5,5,5] vs [1,2,3,4]: one constant → sqrt(2m)
        let ts = vec![5.0, 5.0, 5.0, 5.0, 1.0, 2.0, 3.0, 4.0];
        let ctx = ZNormalizedEuclidean::precompute(&ts, 4);
        let d = ZNormalizedEuclidean::distance(&ts, 0, 4, 4, &ctx);
        assert!((d - 8.0_f64.sqrt()).abs() < 1e-10, "got {d}");

        let flat = vec![7.0; 10];
        let ctx = ZNormalizedEuclidean::precompute(&flat, 4);
        assert_eq!(ZNormalizedEuclidean::distance(&flat, 0, 5, 4, &ctx), 0.0);
    }

    #[test]
    fn test_non_finite_only_affects_its_windows() {
        // m = 3, NaN at 4: windows 2, 3 and 4 contain it
        let mut ts: Vec<f64> = (0..12).map(|i| (i as f64 * 0.7).sin()).collect();
        ts[4] = f64::NAN;
        let stats = WindowStats::compute(&ts, 3);
        for i in 0..stats.mean.len() {
            let poisoned = (2..=4).contains(&i);
            assert_eq!(stats.mean[i].is_nan(), poisoned, "mean[{i}]");
            assert_eq!(stats.m_sigma_inv[i].is_nan(), poisoned, "m_sigma_inv[{i}]");
        }
        // Windows after the NaN match a clean series
        let clean: Vec<f64> = (0..12).map(|i| (i as f64 * 0.7).sin()).collect();
        let reference = WindowStats::compute(&clean, 3);
        for i in 5..stats.mean.len() {
            assert!((stats.mean[i] - reference.mean[i]).abs() < 1e-10);
            assert!((stats.m_sigma_inv[i] - reference.m_sigma_inv[i]).abs() < 1e-8);
        }
    }

    #[test]
    fn test_distance_to_nan_window_is_nan() {
        // Window 0 holds the NaN; window 4 is constant, window 8 is not
        let ts = vec![1.0, f64::NAN, 3.0, 4.0, 2.0, 2.0, 2.0, 2.0, 1.0, 5.0, 2.0, 7.0];
        let ctx = ZNormalizedEuclidean::precompute(&ts, 4);
        assert!(ZNormalizedEuclidean::distance(&ts, 0, 4, 4, &ctx).is_nan());
        assert!(ZNormalizedEuclidean::distance(&ts, 8, 0, 4, &ctx).is_nan());
        assert!(ZNormalizedEuclidean::distance(&ts, 4, 8, 4, &ctx).is_finite());

        let mut inf = ts.clone();
        inf[1] = f64::INFINITY;
        let ctx = ZNormalizedEuclidean::precompute(&inf, 4);
        assert!(ZNormalizedEuclidean::distance(&inf, 0, 8, 4, &ctx).is_nan());
    }

    #[test]
    fn test_nan_values_never_win() {
        // Period-10 sine with a NaN near the start and a flipped cycle at
        // 150..160; the flipped cycle must still be reported.
        let mut ts: Vec<f64> = (0..200)
            .map(|i| (i as f64 * std::f64::consts::TAU / 10.0).sin())
            .collect();
        ts[5] = f64::NAN;
        for v in &mut ts[150..160] {
            *v = -*v * 0.5 + 0.3;
        }
        let config = DiscordConfig::new(10).with_boundary(BoundaryPolicy::Full);
        let d = best_discord::<ZNormalizedEuclidean>(&ts, &config)
            .unwrap()
            .discord
            .unwrap();
        assert!(d.distance.is_finite());
        assert!(d.distance > 0.0);
        assert!((141..=159).contains(&d.position), "got {}", d.position);
    }
}
