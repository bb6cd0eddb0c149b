//! One-way analysis of variance.
//!
//! Tests whether mean healthy days differ between the levels of a factor.
//! The p-value comes from the upper tail of the F distribution, computed
//! through the regularized incomplete beta function.

use serde::{Deserialize, Serialize};

/// Result of a one-way ANOVA of one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneWayAnova {
    pub factor: String,
    /// Number of levels with at least one observation.
    pub levels: usize,
    pub observations: usize,
    pub ss_between: f64,
    pub ss_within: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ms_between: f64,
    pub ms_within: f64,
    pub f_statistic: f64,
    pub p_value: f64,
    /// Share of total variance explained by the factor.
    pub eta_squared: f64,
}

impl OneWayAnova {
    pub fn ss_total(&self) -> f64 {
        self.ss_between + self.ss_within
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Runs a one-way ANOVA over groups of observations.
///
/// Empty groups are ignored. Returns `None` when fewer than two groups have
/// observations, when there are no residual degrees of freedom, or when
/// every group has zero variance (the F statistic is undefined).
pub fn one_way_anova(factor: &str, groups: &[Vec<f64>]) -> Option<OneWayAnova> {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let levels = groups.len();
    let observations: usize = groups.iter().map(|g| g.len()).sum();
    if levels < 2 || observations <= levels {
        return None;
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / observations as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let n = group.len() as f64;
        let mean = group.iter().sum::<f64>() / n;
        ss_between += n * (mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }

    if ss_within <= 0.0 {
        return None;
    }

    let df_between = levels - 1;
    let df_within = observations - levels;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;
    let f_statistic = ms_between / ms_within;

    Some(OneWayAnova {
        factor: factor.to_string(),
        levels,
        observations,
        ss_between,
        ss_within,
        df_between,
        df_within,
        ms_between,
        ms_within,
        f_statistic,
        p_value: f_survival(f_statistic, df_between as f64, df_within as f64),
        eta_squared: ss_between / (ss_between + ss_within),
    })
}

/// Upper tail probability `P(F > f)` of the F distribution.
pub fn f_survival(f: f64, d1: f64, d2: f64) -> f64 {
    if f <= 0.0 {
        return 1.0;
    }
    let x = d2 / (d2 + d1 * f);
    regularized_incomplete_beta(d2 / 2.0, d1 / 2.0, x)
}

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fastest below the mean of the
    // distribution; use the symmetry I_x(a, b) = 1 - I_{1-x}(b, a) above it.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

const CF_MAX_ITER: usize = 300;
const CF_EPSILON: f64 = 1e-15;
const CF_TINY: f64 = 1e-300;

/// Modified Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let clamp = |v: f64| if v.abs() < CF_TINY { CF_TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / clamp(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=CF_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / clamp(1.0 + aa * d);
        c = clamp(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / clamp(1.0 + aa * d);
        c = clamp(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < CF_EPSILON {
            break;
        }
    }
    h
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function (Lanczos approximation).
fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula.
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEFFICIENTS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + (i + 1) as f64));

    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64, tol: f64) -> bool {
        (actual - expected).abs() < tol
    }

    #[test]
    fn ln_gamma_known_values() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(close(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn incomplete_beta_edges_and_uniform() {
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
        for x in [0.1, 0.35, 0.5, 0.9] {
            assert!(close(regularized_incomplete_beta(1.0, 1.0, x), x, 1e-12));
        }
    }

    #[test]
    fn f_survival_reference_values() {
        assert!(close(f_survival(1.0, 1.0, 1.0), 0.5, 1e-10));
        assert!(close(f_survival(3.0, 2.0, 10.0), 0.095_367_431_640_625, 1e-10));
        assert!(close(f_survival(13.5, 1.0, 4.0), 0.021_311_641_128_756_7, 1e-10));
        assert!(close(f_survival(2.5, 3.0, 120.0), 0.062_786_059_209_419_4, 1e-10));
        assert_eq!(f_survival(0.0, 2.0, 10.0), 1.0);
    }

    #[test]
    fn two_group_anova() {
        let result = one_way_anova("test", &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(result.levels, 2);
        assert_eq!(result.observations, 6);
        assert!(close(result.ss_between, 13.5, 1e-12));
        assert!(close(result.ss_within, 4.0, 1e-12));
        assert_eq!((result.df_between, result.df_within), (1, 4));
        assert!(close(result.f_statistic, 13.5, 1e-12));
        assert!(close(result.p_value, 0.021_311_641_128_756_7, 1e-10));
        assert!(close(result.eta_squared, 13.5 / 17.5, 1e-12));
        assert!(close(result.ss_total(), 17.5, 1e-12));
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn degenerate_inputs_have_no_test() {
        assert_eq!(one_way_anova("one level", &[vec![1.0, 2.0], vec![]]), None);
        assert_eq!(one_way_anova("no residual", &[vec![1.0], vec![2.0]]), None);
        assert_eq!(one_way_anova("no variance", &[vec![3.0, 3.0], vec![5.0, 5.0]]), None);
    }
}
