//! Tate curves: truncated q-expansions and the chord/tangent group law.
//!
//! For a parameter `q` with `|q|_p < 1` the Tate curve `E_q` is
//!
//! ```text
//! y² = x³ + a4(q)·x + a6(q)
//! a4 = −5·s3(q)
//! a6 = −(5·s3(q) + 7·s5(q)) / 12
//! sk(q) = Σ_{n ≥ 1} nᵏ qⁿ / (1 − qⁿ)
//! ```
//!
//! [`generate`] sums the first `order` terms of both Lambert series. The
//! resulting real coefficients feed [`EllipticCurve`], which samples points
//! and adds them.
//!
//! # Parameter convention
//!
//! The series are evaluated at the real number `q`, which must satisfy
//! `|q| < 1`. Its p-part records the p-adic size of the Tate parameter:
//! `q = u·p^(±k)` with `u` a p-adic unit stands for a parameter `Q` with
//! `|Q|_p = p^(−k)`, and smallness means `k ≥ 1`. A p-adic unit `q` is
//! rejected. Both `q = 1/125` and `q = 5/7` with `p = 5` are accepted, with
//! `k = 3` and `k = 1`.
//!
//! # Example
//!
//! ```
//! use abc_toys::arith::Rational;
//! use abc_toys::tate;
//!
//! let q = Rational::new(1, 125)?;
//! let coeffs = tate::generate(5, q, 10)?;
//! assert!((coeffs.a4 + 0.042953).abs() < 1e-5);
//! assert!((coeffs.a6 + 0.009554).abs() < 1e-5);
//! # Ok::<(), abc_toys::ToyError>(())
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::arith::{self, Rational};
use crate::config::TateConfig;
use crate::error::{ToyError, ToyResult};

/// A prime together with a p-adically small Tate parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PadicParameter {
    p: u64,
    q: Rational,
    valuation: u32,
}

impl PadicParameter {
    /// Validate `(p, q)`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `p` is not prime, `q = 0`, `q` is a p-adic unit,
    /// or `|q| ≥ 1` (the real series would diverge).
    pub fn new(p: u64, q: Rational) -> ToyResult<Self> {
        if !arith::is_prime(p) {
            return Err(ToyError::invalid_parameter(format!("p = {p} is not prime")));
        }
        let v = q
            .valuation(p)
            .ok_or_else(|| ToyError::invalid_parameter("q must be non-zero"))?;
        if v == 0 {
            return Err(ToyError::invalid_parameter(format!(
                "q = {q} is a {p}-adic unit; the Tate parameter needs non-zero valuation"
            )));
        }
        if q.max_abs() == q.numerator().unsigned_abs() {
            return Err(ToyError::invalid_parameter(format!(
                "|q| = |{q}| is not below 1; the q-expansion diverges"
            )));
        }
        Ok(Self {
            p,
            q,
            valuation: v.unsigned_abs() as u32,
        })
    }

    /// The prime.
    pub const fn p(&self) -> u64 {
        self.p
    }

    /// The parameter as given.
    pub const fn q(&self) -> Rational {
        self.q
    }

    /// `k` in `|Q|_p = p^(−k)`.
    pub const fn valuation(&self) -> u32 {
        self.valuation
    }

    /// Sum `order` terms of the q-expansions.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for `order = 0`; `ArithmeticOverflow` if the
    /// integer weight `7n⁵ + 5n³` leaves `u64` or a partial sum stops being
    /// finite.
    pub fn coefficients(&self, order: u32) -> ToyResult<WeierstrassCoefficients> {
        if order == 0 {
            return Err(ToyError::invalid_parameter(
                "order must be at least 1 to sum any q-expansion term",
            ));
        }
        let q = self.q.to_f64();
        let mut s3 = 0.0f64;
        let mut weighted = 0.0f64;
        let mut q_n = 1.0f64;
        for n in 1..=u64::from(order) {
            q_n *= q;
            let n3 = n * n * n;
            let weight = n3
                .checked_mul(n * n)
                .and_then(|n5| n5.checked_mul(7))
                .and_then(|w| w.checked_add(5 * n3))
                .ok_or_else(|| {
                    ToyError::overflow(format!(
                        "term weight 7n^5 + 5n^3 exceeds u64 at n = {n} (order {order})"
                    ))
                })?;
            let lambert = q_n / (1.0 - q_n);
            s3 += n3 as f64 * lambert;
            weighted += weight as f64 * lambert;
            if !(s3.is_finite() && weighted.is_finite()) {
                return Err(ToyError::overflow(format!(
                    "q-expansion stopped being finite at n = {n}"
                )));
            }
        }
        let coeffs = WeierstrassCoefficients {
            a4: -5.0 * s3,
            a6: -weighted / 12.0,
        };
        debug!(p = self.p, q = %self.q, order, a4 = coeffs.a4, a6 = coeffs.a6, "tate coefficients");
        Ok(coeffs)
    }
}

/// Compute the Tate curve coefficients for `(p, q)` truncated at `order` terms.
///
/// # Errors
///
/// See [`PadicParameter::new`] and [`PadicParameter::coefficients`].
pub fn generate(p: u64, q: Rational, order: u32) -> ToyResult<WeierstrassCoefficients> {
    PadicParameter::new(p, q)?.coefficients(order)
}

/// Sample points of `y² = x³ + a4·x + a6` with the default tolerance.
///
/// # Errors
///
/// `InvalidParameter` for an inverted or non-finite range, or more than the
/// default `max_steps` samples.
pub fn points(
    coeffs: &WeierstrassCoefficients,
    x_range: (f64, f64),
    steps: usize,
) -> ToyResult<Vec<CurvePoint>> {
    coeffs.curve(&TateConfig::default()).points(x_range, steps)
}

/// Short Weierstrass coefficients `{a4, a6}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeierstrassCoefficients {
    /// Coefficient of `x`.
    pub a4: f64,
    /// Constant term.
    pub a6: f64,
}

impl WeierstrassCoefficients {
    /// `Δ = −16(4a4³ + 27a6²)`.
    pub fn discriminant(&self) -> f64 {
        -16.0 * (4.0 * self.a4.powi(3) + 27.0 * self.a6.powi(2))
    }

    /// The curve with the configured tolerance and scan bound.
    pub fn curve(&self, config: &TateConfig) -> EllipticCurve {
        EllipticCurve {
            coeffs: *self,
            tolerance: config.tolerance,
            max_steps: config.max_steps,
        }
    }
}

impl fmt::Display for WeierstrassCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = |v: f64| if v.is_sign_negative() { '-' } else { '+' };
        write!(
            f,
            "y^2 = x^3 {} {:.6}*x {} {:.6}",
            sign(self.a4),
            self.a4.abs(),
            sign(self.a6),
            self.a6.abs()
        )
    }
}

/// An affine point `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl CurvePoint {
    /// Construct `(x, y)`.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A group element: the point at infinity or an affine point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Point {
    /// Identity of the group law.
    Infinity,
    /// A finite point.
    Affine(CurvePoint),
}

impl Point {
    /// Shorthand for `Point::Affine(CurvePoint::new(x, y))`.
    pub const fn affine(x: f64, y: f64) -> Self {
        Self::Affine(CurvePoint::new(x, y))
    }
}

/// `y² = x³ + a4·x + a6` over the reals, with a comparison tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticCurve {
    coeffs: WeierstrassCoefficients,
    tolerance: f64,
    max_steps: usize,
}

impl EllipticCurve {
    /// The defining coefficients.
    pub const fn coefficients(&self) -> &WeierstrassCoefficients {
        &self.coeffs
    }

    /// Right-hand side `x³ + a4·x + a6`.
    pub fn rhs(&self, x: f64) -> f64 {
        x * x * x + self.coeffs.a4 * x + self.coeffs.a6
    }

    /// The non-negative `y` with `y² = rhs(x)`.
    ///
    /// # Errors
    ///
    /// `DomainError` when `rhs(x) < 0`.
    pub fn solve_y(&self, x: f64) -> ToyResult<f64> {
        let rhs = self.rhs(x);
        if rhs < 0.0 {
            return Err(ToyError::domain(format!("no real y at x = {x}: y^2 = {rhs}")));
        }
        Ok(rhs.sqrt())
    }

    /// Membership: `|y² − rhs(x)| ≤ tolerance·(1 + |y²|)`.
    pub fn contains(&self, point: &Point) -> bool {
        match point {
            Point::Infinity => true,
            Point::Affine(p) => {
                let lhs = p.y * p.y;
                (lhs - self.rhs(p.x)).abs() <= self.tolerance * (1.0 + lhs.abs())
            }
        }
    }

    /// Scan `steps` evenly spaced `x` over the closed range and emit every
    /// real point above each sample.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an inverted or non-finite range, or when
    /// `steps` exceeds the configured `max_steps`.
    pub fn points(&self, x_range: (f64, f64), steps: usize) -> ToyResult<Vec<CurvePoint>> {
        let (start, end) = x_range;
        if !(start.is_finite() && end.is_finite()) || start > end {
            return Err(ToyError::invalid_parameter(format!(
                "x range [{start}, {end}] must be finite and ordered"
            )));
        }
        if steps > self.max_steps {
            return Err(ToyError::invalid_parameter(format!(
                "steps = {steps} exceeds max_steps = {}",
                self.max_steps
            )));
        }
        let mut out = Vec::with_capacity(steps.saturating_mul(2));
        let mut skipped = 0usize;
        let span = end - start;
        for i in 0..steps {
            let x = if steps > 1 && i == steps - 1 {
                end
            } else if steps > 1 {
                start + span * i as f64 / (steps - 1) as f64
            } else {
                start
            };
            match self.solve_y(x) {
                Ok(y) => {
                    out.push(CurvePoint::new(x, y));
                    if y != 0.0 {
                        out.push(CurvePoint::new(x, -y));
                    }
                }
                Err(e) if e.is_recoverable() => {
                    trace!(x, "sample skipped: {e}");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        debug!(steps, emitted = out.len(), skipped, "curve point scan");
        Ok(out)
    }

    /// `−P`.
    pub fn negate(&self, point: Point) -> Point {
        match point {
            Point::Infinity => Point::Infinity,
            Point::Affine(p) => Point::affine(p.x, -p.y),
        }
    }

    /// Chord rule `P + Q`; defers to [`double`](Self::double) when `P = Q`.
    pub fn add(&self, lhs: Point, rhs: Point) -> Point {
        let (p, q) = match (lhs, rhs) {
            (Point::Infinity, other) | (other, Point::Infinity) => return other,
            (Point::Affine(p), Point::Affine(q)) => (p, q),
        };
        if (p.x - q.x).abs() <= self.tolerance {
            if (p.y - q.y).abs() <= self.tolerance {
                return self.double(lhs);
            }
            return Point::Infinity;
        }
        let slope = (q.y - p.y) / (q.x - p.x);
        let x3 = slope * slope - p.x - q.x;
        let y3 = slope * (p.x - x3) - p.y;
        Point::affine(x3, y3)
    }

    /// Tangent rule `2P`; points with `y = 0` have order two.
    pub fn double(&self, point: Point) -> Point {
        let p = match point {
            Point::Infinity => return Point::Infinity,
            Point::Affine(p) => p,
        };
        if p.y.abs() <= self.tolerance {
            return Point::Infinity;
        }
        let slope = (3.0 * p.x * p.x + self.coeffs.a4) / (2.0 * p.y);
        let x2 = slope * slope - 2.0 * p.x;
        let y2 = slope * (p.x - x2) - p.y;
        Point::affine(x2, y2)
    }

    /// `[seed, 2·seed, …, count·seed]` by repeated addition.
    pub fn multiples(&self, seed: Point, count: usize) -> Vec<Point> {
        let mut out = Vec::with_capacity(count);
        let mut acc = Point::Infinity;
        for _ in 0..count {
            acc = self.add(acc, seed);
            out.push(acc);
        }
        out
    }
}
