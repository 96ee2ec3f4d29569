//! Naive multiplicative heights and bounded point search.
//!
//! The height of a reduced rational `a/b` is `ln max(|a|, |b|)`; the height
//! of a projective point is `ln max |cᵢ|` after dividing out the gcd. Both
//! are invariant under scaling by a non-zero integer.
//!
//! [`enumerate`] walks every reduced `x = a/b` in the box
//! `1 ≤ b ≤ B`, `|a| ≤ B` with `B = ⌊exp(bound_h)⌋`, ordered by
//! denominator then numerator, and keeps the ones where the curve's
//! right-hand side is the square of a rational.
//!
//! ```
//! use abc_toys::height::{self, CurveEquation};
//!
//! assert!((height::rational(3, 2)? - 3f64.ln()).abs() < 1e-12);
//! assert!((height::projective(&[2, 3, 6])? - 6f64.ln()).abs() < 1e-12);
//!
//! let found = height::enumerate(&CurveEquation::default(), 10.5f64.ln())?;
//! let xs: Vec<String> = found.points.iter().map(|p| p.x.to_string()).collect();
//! assert_eq!(xs, ["-1", "0", "2"]);
//! # Ok::<(), abc_toys::ToyError>(())
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arith::{gcd, gcd_all, Rational};
use crate::config::HeightConfig;
use crate::error::{ToyError, ToyResult};

/// Height of `a/b`.
///
/// # Errors
///
/// `InvalidParameter` when `b = 0`.
pub fn rational(a: i64, b: i64) -> ToyResult<f64> {
    if b == 0 {
        return Err(ToyError::invalid_parameter(format!("{a}/{b} has a zero denominator")));
    }
    // magnitudes only: the sign never matters and `i64::MIN / -1` has none
    let g = gcd(a, b);
    Ok(ln_magnitude((a.unsigned_abs() / g).max(b.unsigned_abs() / g)))
}

/// Height of an already reduced rational; `0` for zero.
pub fn of_rational(r: &Rational) -> f64 {
    ln_magnitude(r.max_abs())
}

/// Height of the projective point with homogeneous coordinates `coords`.
///
/// # Errors
///
/// `InvalidParameter` for an empty or all-zero tuple.
pub fn projective(coords: &[i64]) -> ToyResult<f64> {
    let g = gcd_all(coords);
    if g == 0 {
        return Err(ToyError::invalid_parameter(format!(
            "{coords:?} is not a projective point"
        )));
    }
    let max = coords.iter().map(|c| c.unsigned_abs() / g).max().unwrap_or(1);
    Ok(ln_magnitude(max))
}

fn ln_magnitude(m: u64) -> f64 {
    (m as f64).ln()
}

// ============================================================================
// Projective points
// ============================================================================

/// A point of projective space in canonical coordinates: gcd 1 and first
/// non-zero coordinate positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectivePoint {
    coords: Vec<i64>,
}

impl ProjectivePoint {
    /// Canonicalize `coords`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an empty or all-zero tuple;
    /// `ArithmeticOverflow` when the sign flip leaves the `i64` range.
    pub fn new(coords: &[i64]) -> ToyResult<Self> {
        let g = gcd_all(coords);
        if g == 0 {
            return Err(ToyError::invalid_parameter(format!(
                "{coords:?} is not a projective point"
            )));
        }
        let negate = coords.iter().find(|&&c| c != 0).is_some_and(|&c| c < 0);
        let g = i128::from(g);
        let coords = coords
            .iter()
            .map(|&c| {
                let q = i128::from(c) / g;
                let q = if negate { -q } else { q };
                i64::try_from(q).map_err(|_| {
                    ToyError::overflow(format!("coordinate {c} overflows after normalization"))
                })
            })
            .collect::<ToyResult<Vec<_>>>()?;
        Ok(Self { coords })
    }

    /// Canonical coordinates.
    pub fn coords(&self) -> &[i64] {
        &self.coords
    }

    /// `ln max |cᵢ|`.
    pub fn height(&self) -> f64 {
        ln_magnitude(self.coords.iter().map(|c| c.unsigned_abs()).max().unwrap_or(1))
    }
}

impl fmt::Display for ProjectivePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: Vec<String> = self.coords.iter().map(i64::to_string).collect();
        write!(f, "[{}]", body.join(":"))
    }
}

// ============================================================================
// Curve search
// ============================================================================

/// The curve `y² = x³ + a·x + c` with integer coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveEquation {
    /// Coefficient of `x`.
    pub a: i64,
    /// Constant term.
    pub c: i64,
}

impl Default for CurveEquation {
    /// `y² = x³ + 1`.
    fn default() -> Self {
        Self { a: 0, c: 1 }
    }
}

impl CurveEquation {
    /// Right-hand side at `x = n/d` as the reduced fraction `N / d³`.
    ///
    /// `gcd(n, d) = 1` makes `N = n³ + a·n·d² + c·d³` coprime to `d`.
    fn rhs(&self, x: &Rational) -> ToyResult<(i128, i128)> {
        let n = i128::from(x.numerator());
        let d = i128::from(x.denominator());
        let overflow = || ToyError::overflow(format!("evaluating {self} at x = {x}"));
        let d2 = d.checked_mul(d).ok_or_else(overflow)?;
        let d3 = d2.checked_mul(d).ok_or_else(overflow)?;
        let n3 = n
            .checked_mul(n)
            .and_then(|v| v.checked_mul(n))
            .ok_or_else(overflow)?;
        let linear = i128::from(self.a)
            .checked_mul(n)
            .and_then(|v| v.checked_mul(d2))
            .ok_or_else(overflow)?;
        let constant = i128::from(self.c).checked_mul(d3).ok_or_else(overflow)?;
        let num = n3
            .checked_add(linear)
            .and_then(|v| v.checked_add(constant))
            .ok_or_else(overflow)?;
        Ok((num, d3))
    }
}

impl fmt::Display for CurveEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y^2 = x^3")?;
        match self.a {
            0 => {}
            a if a < 0 => write!(f, " - {}*x", a.unsigned_abs())?,
            a => write!(f, " + {a}*x")?,
        }
        match self.c {
            0 => Ok(()),
            c if c < 0 => write!(f, " - {}", c.unsigned_abs()),
            c => write!(f, " + {c}"),
        }
    }
}

/// A rational point found by [`enumerate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightedPoint {
    /// `x`-coordinate.
    pub x: Rational,
    /// Non-negative `y`-coordinate.
    pub y: Rational,
    /// `h(x)`.
    pub height: f64,
    /// Height of `[x : y : 1]`.
    pub projective_height: f64,
}

/// Summary statistics over a list of heights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightStats {
    /// Sample size.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// Population standard deviation.
    pub std: Option<f64>,
    /// Smallest sample.
    pub min: Option<f64>,
    /// Largest sample.
    pub max: Option<f64>,
}

impl HeightStats {
    /// Statistics of `samples`; moments are `None` when it is empty.
    pub fn from_samples(samples: &[f64]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self {
                count,
                mean: None,
                std: None,
                min: None,
                max: None,
            };
        }
        let n = count as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
        Self {
            count,
            mean: Some(mean),
            std: Some(var.sqrt()),
            min: samples.iter().copied().reduce(f64::min),
            max: samples.iter().copied().reduce(f64::max),
        }
    }
}

/// Points and statistics returned by [`enumerate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightEnumeration {
    /// Accepted points in search order.
    pub points: Vec<HeightedPoint>,
    /// Statistics of `h(x)` over `points`.
    pub stats: HeightStats,
}

/// Search `curve` with the default [`HeightConfig`].
///
/// # Errors
///
/// See [`enumerate_with`].
pub fn enumerate(curve: &CurveEquation, bound_h: f64) -> ToyResult<HeightEnumeration> {
    enumerate_with(curve, bound_h, &HeightConfig::default())
}

/// Every rational point of `curve` with `h(x) ≤ ln B`, `B = ⌊exp(bound_h)⌋`,
/// taking `y ≥ 0`.
///
/// # Errors
///
/// `InvalidParameter` for a negative or non-finite `bound_h`, or when `B`
/// exceeds `config.max_search_bound`; `ArithmeticOverflow` if evaluating
/// the curve leaves the `i128` range.
pub fn enumerate_with(
    curve: &CurveEquation,
    bound_h: f64,
    config: &HeightConfig,
) -> ToyResult<HeightEnumeration> {
    let bound = search_bound(bound_h, config)?;
    let mut points = Vec::new();
    for b in 1..=bound {
        for a in -bound..=bound {
            if gcd(a, b) != 1 {
                continue;
            }
            let x = Rational::new(a, b)?;
            let (num, den) = curve.rhs(&x)?;
            let (Some(s), Some(t)) = (
                exact_sqrt(num, config.sqrt_tolerance),
                exact_sqrt(den, config.sqrt_tolerance),
            ) else {
                continue;
            };
            points.push(heighted_point(x, s, t)?);
        }
    }
    let heights: Vec<f64> = points.iter().map(|p| p.height).collect();
    let stats = HeightStats::from_samples(&heights);
    debug!(%curve, bound, found = stats.count, "height enumeration");
    Ok(HeightEnumeration { points, stats })
}

fn search_bound(bound_h: f64, config: &HeightConfig) -> ToyResult<i64> {
    if !bound_h.is_finite() || bound_h < 0.0 {
        return Err(ToyError::invalid_parameter(format!(
            "height bound {bound_h} must be finite and non-negative"
        )));
    }
    let bound = bound_h.exp().floor();
    if bound > config.max_search_bound as f64 {
        return Err(ToyError::invalid_parameter(format!(
            "search box {bound} exceeds max_search_bound {}",
            config.max_search_bound
        )));
    }
    i64::try_from(bound as u64)
        .map_err(|_| ToyError::overflow(format!("search box {bound} does not fit i64")))
}

/// Integer square root of `m` when it has one. The float estimate only
/// nominates a candidate; the candidate is confirmed by exact squaring.
fn exact_sqrt(m: i128, tolerance: f64) -> Option<i128> {
    if m < 0 {
        return None;
    }
    let root = (m as f64).sqrt();
    let nearest = root.round();
    if (root - nearest).abs() > tolerance {
        return None;
    }
    let k = nearest as i128;
    (k.checked_mul(k) == Some(m)).then_some(k)
}

fn heighted_point(x: Rational, s: i128, t: i128) -> ToyResult<HeightedPoint> {
    let narrow = |v: i128| {
        i64::try_from(v).map_err(|_| ToyError::overflow(format!("coordinate {v} of a point over x = {x}")))
    };
    let y = Rational::new(narrow(s)?, narrow(t)?)?;

    // [x : y : 1] scaled by lcm of the denominators.
    let dx = i128::from(x.denominator());
    let dy = i128::from(y.denominator());
    let lcm = dx / i128::from(gcd(x.denominator(), y.denominator())) * dy;
    let coords = [
        narrow(i128::from(x.numerator()) * (lcm / dx))?,
        narrow(i128::from(y.numerator()) * (lcm / dy))?,
        narrow(lcm)?,
    ];
    Ok(HeightedPoint {
        height: of_rational(&x),
        projective_height: ProjectivePoint::new(&coords)?.height(),
        x,
        y,
    })
}

// ============================================================================
// Grid distribution
// ============================================================================

/// A rational together with its height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RationalHeight {
    /// The rational.
    pub value: Rational,
    /// Its height.
    pub height: f64,
}

/// Heights over a full grid of rationals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightDistribution {
    /// Samples ordered by denominator, then numerator.
    pub samples: Vec<RationalHeight>,
    /// Statistics of the heights.
    pub stats: HeightStats,
}

/// Heights of every reduced non-zero `a/b` with `|a| ≤ max_abs` and
/// `1 ≤ b ≤ max_abs`, using the default bound.
///
/// # Errors
///
/// See [`grid_distribution_with`].
pub fn grid_distribution(max_abs: u64) -> ToyResult<HeightDistribution> {
    grid_distribution_with(max_abs, &HeightConfig::default())
}

/// Like [`grid_distribution`] with an explicit bound.
///
/// # Errors
///
/// `InvalidParameter` when `max_abs` exceeds `config.max_search_bound`.
pub fn grid_distribution_with(max_abs: u64, config: &HeightConfig) -> ToyResult<HeightDistribution> {
    if max_abs > config.max_search_bound {
        return Err(ToyError::invalid_parameter(format!(
            "grid size {max_abs} exceeds max_search_bound {}",
            config.max_search_bound
        )));
    }
    let m = i64::try_from(max_abs)
        .map_err(|_| ToyError::overflow(format!("grid size {max_abs} does not fit i64")))?;
    let mut samples = Vec::new();
    for b in 1..=m {
        for a in (-m..=m).filter(|&a| a != 0 && gcd(a, b) == 1) {
            let value = Rational::new(a, b)?;
            samples.push(RationalHeight {
                height: of_rational(&value),
                value,
            });
        }
    }
    let heights: Vec<f64> = samples.iter().map(|s| s.height).collect();
    let stats = HeightStats::from_samples(&heights);
    debug!(max_abs, count = stats.count, "grid distribution");
    Ok(HeightDistribution { samples, stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn rational_heights() {
        assert!((rational(3, 2).unwrap() - 3f64.ln()).abs() < EPS);
        assert!((rational(-5, 3).unwrap() - 5f64.ln()).abs() < EPS);
        assert_eq!(rational(1, 1).unwrap(), 0.0);
        assert_eq!(rational(0, 7).unwrap(), 0.0);
        assert!((rational(6, 4).unwrap() - 3f64.ln()).abs() < EPS);
    }

    #[test]
    fn rational_zero_denominator() {
        assert!(matches!(rational(1, 0), Err(ToyError::InvalidParameter(_))));
    }

    #[test]
    fn heights_at_i64_extremes() {
        let expected = 63.0 * 2f64.ln();
        for (a, b) in [(i64::MIN, -1), (i64::MIN, 1), (1, i64::MIN), (-1, i64::MIN)] {
            let h = rational(a, b).unwrap();
            assert!((h - expected).abs() < EPS, "{a}/{b}: expected {expected}, got {h}");
        }
        assert_eq!(rational(i64::MIN, i64::MIN).unwrap(), 0.0);
        assert!((rational(i64::MIN, 2).unwrap() - 62.0 * 2f64.ln()).abs() < EPS);

        // the canonical form is not representable, the height still is
        let h = projective(&[i64::MIN, 1]).unwrap();
        assert!((h - expected).abs() < EPS, "expected {expected}, got {h}");
        assert!((projective(&[i64::MIN, 2, 0]).unwrap() - 62.0 * 2f64.ln()).abs() < EPS);
    }

    #[test]
    fn projective_heights() {
        assert!((projective(&[2, 3, 6]).unwrap() - 6f64.ln()).abs() < EPS);
        assert!((projective(&[4, 6, 12]).unwrap() - 6f64.ln()).abs() < EPS);
        assert_eq!(projective(&[0, 0, 5]).unwrap(), 0.0);
        assert!(projective(&[]).is_err());
        assert!(projective(&[0, 0]).is_err());
    }

    #[test]
    fn projective_canonical_form() {
        let p = ProjectivePoint::new(&[0, -4, 6]).unwrap();
        assert_eq!(p.coords(), [0, 2, -3]);
        assert_eq!(p.to_string(), "[0:2:-3]");
        let q = ProjectivePoint::new(&[i64::MIN, 0]).unwrap();
        assert_eq!(q.coords(), [1, 0]);
        assert!(matches!(
            ProjectivePoint::new(&[i64::MIN, 1]),
            Err(ToyError::ArithmeticOverflow(_))
        ));
    }

    #[test]
    fn integral_points_on_x3_plus_1() {
        let found = enumerate(&CurveEquation::default(), 10.5f64.ln()).unwrap();
        let pairs: Vec<(String, String)> = found
            .points
            .iter()
            .map(|p| (p.x.to_string(), p.y.to_string()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("-1".to_string(), "0".to_string()),
                ("0".to_string(), "1".to_string()),
                ("2".to_string(), "3".to_string()),
            ]
        );
        let stats = &found.stats;
        assert_eq!(stats.count, 3);
        let ln2 = 2f64.ln();
        assert!((stats.mean.unwrap() - ln2 / 3.0).abs() < EPS);
        assert_eq!(stats.min, Some(0.0));
        assert!((stats.max.unwrap() - ln2).abs() < EPS);
        // [2 : 3 : 1]
        assert!((found.points[2].projective_height - 3f64.ln()).abs() < EPS);
    }

    #[test]
    fn finds_non_integral_points() {
        // y² = x³ − 2 passes through (129/100, 383/1000)
        let curve = CurveEquation { a: 0, c: -2 };
        let found = enumerate(&curve, 129.5f64.ln()).unwrap();
        let xs: Vec<String> = found.points.iter().map(|p| p.x.to_string()).collect();
        assert_eq!(xs, ["3", "129/100"]);
        let point = &found.points[1];
        assert_eq!(point.y, Rational::new(383, 1000).unwrap());
        assert!((point.height - 129f64.ln()).abs() < EPS);
        // [1290 : 383 : 1000]
        assert!((point.projective_height - 1290f64.ln()).abs() < EPS);
    }

    #[test]
    fn empty_search_has_no_moments() {
        // B = 1 leaves x in {-1, 0, 1}
        let found = enumerate(&CurveEquation { a: 0, c: -5 }, 0.5).unwrap();
        assert!(found.points.is_empty());
        assert_eq!(found.stats.count, 0);
        assert_eq!(found.stats.mean, None);
        assert_eq!(found.stats.std, None);
    }

    #[test]
    fn bound_validation() {
        let curve = CurveEquation::default();
        assert!(matches!(enumerate(&curve, -1.0), Err(ToyError::InvalidParameter(_))));
        assert!(enumerate(&curve, f64::NAN).is_err());
        assert!(enumerate(&curve, f64::INFINITY).is_err());
        assert!(enumerate(&curve, 20.0).is_err());
        let wide = HeightConfig {
            max_search_bound: 5,
            ..HeightConfig::default()
        };
        assert!(enumerate_with(&curve, 6f64.ln() + 0.01, &wide).is_err());
    }

    #[test]
    fn exact_sqrt_confirms() {
        assert_eq!(exact_sqrt(0, 1e-9), Some(0));
        assert_eq!(exact_sqrt(144, 1e-9), Some(12));
        assert_eq!(exact_sqrt(145, 1e-9), None);
        assert_eq!(exact_sqrt(-4, 1e-9), None);
    }

    #[test]
    fn population_std() {
        let stats = HeightStats::from_samples(&[1.0, 3.0]);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.std, Some(1.0));
    }

    #[test]
    fn grid_of_size_two() {
        let dist = grid_distribution(2).unwrap();
        let values: Vec<String> = dist.samples.iter().map(|s| s.value.to_string()).collect();
        assert_eq!(values, ["-2", "-1", "1", "2", "-1/2", "1/2"]);
        let ln2 = 2f64.ln();
        assert!((dist.stats.mean.unwrap() - 4.0 * ln2 / 6.0).abs() < EPS);
        assert_eq!(grid_distribution(0).unwrap().stats.count, 0);
        assert!(grid_distribution(10_000).is_err());
    }

    #[test]
    fn curve_display() {
        assert_eq!(CurveEquation::default().to_string(), "y^2 = x^3 + 1");
        assert_eq!(CurveEquation { a: -2, c: 0 }.to_string(), "y^2 = x^3 - 2*x");
    }
}
