//! Operator-facing cost estimation
//!
//! A pure linear function of job count, used only for dry-run reporting
//! and the run log's spend totals. Never affects job execution.

/// Per-image rate bounds in USD
const RATE_MIN: f64 = 0.02;
const RATE_MAX: f64 = 0.19;
const RATE_NOMINAL: f64 = 0.07;

/// A cost range for a planned batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub min: f64,
    pub max: f64,
    pub estimated: f64,
}

/// Estimate the spend for `job_count` generation calls
pub fn estimate(job_count: usize) -> CostEstimate {
    let n = job_count as f64;
    CostEstimate {
        min: n * RATE_MIN,
        max: n * RATE_MAX,
        estimated: n * RATE_NOMINAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_jobs_cost_nothing() {
        let est = estimate(0);
        assert_eq!(est.min, 0.0);
        assert_eq!(est.max, 0.0);
        assert_eq!(est.estimated, 0.0);
    }

    #[test]
    fn test_linearity() {
        for n in [1usize, 3, 10, 250] {
            let single = estimate(n);
            let double = estimate(2 * n);
            assert!((double.estimated - 2.0 * single.estimated).abs() < 1e-9);
            assert!((double.min - 2.0 * single.min).abs() < 1e-9);
            assert!((double.max - 2.0 * single.max).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bounds_ordering() {
        let est = estimate(7);
        assert!(est.min < est.estimated);
        assert!(est.estimated < est.max);
    }
}
