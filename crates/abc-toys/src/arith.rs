//! Integer and rational helpers shared by the four modules.
//!
//! Only the handful of operations the toy models need: Euclid's gcd, trial
//! division primality, p-adic valuation, and a canonical [`Rational`].
//!
//! # Example
//!
//! ```
//! use abc_toys::arith::{self, Rational};
//!
//! assert_eq!(arith::gcd(12, -18), 6);
//! assert!(arith::is_prime(5));
//!
//! let q: Rational = "1/125".parse()?;
//! assert_eq!(q.valuation(5), Some(-3));
//! # Ok::<(), abc_toys::ToyError>(())
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ToyError, ToyResult};

/// Greatest common divisor of `|a|` and `|b|`; `gcd(0, 0) = 0`.
pub const fn gcd(a: i64, b: i64) -> u64 {
    let mut x = a.unsigned_abs();
    let mut y = b.unsigned_abs();
    while y != 0 {
        let r = x % y;
        x = y;
        y = r;
    }
    x
}

/// Greatest common divisor of every value in `values`; `0` when all are zero.
pub fn gcd_all(values: &[i64]) -> u64 {
    values.iter().fold(0u64, |acc, &v| {
        let mut x = acc;
        let mut y = v.unsigned_abs();
        while y != 0 {
            let r = x % y;
            x = y;
            y = r;
        }
        x
    })
}

/// Trial-division primality test.
///
/// ```
/// use abc_toys::arith::is_prime;
///
/// let primes: Vec<u64> = (0..20).filter(|&n| is_prime(n)).collect();
/// assert_eq!(primes, [2, 3, 5, 7, 11, 13, 17, 19]);
/// ```
pub const fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3u64;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Exponent of `p` in `n`. `None` for `n = 0` (infinite valuation) or `p < 2`.
pub const fn valuation(p: u64, n: u64) -> Option<u32> {
    if n == 0 || p < 2 {
        return None;
    }
    let mut v = 0u32;
    let mut m = n;
    while m % p == 0 {
        m /= p;
        v += 1;
    }
    Some(v)
}

/// A rational number in canonical form.
///
/// # Invariant
///
/// `gcd(numerator, denominator) = 1` and `denominator > 0`. Zero is stored
/// as `0/1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRational", into = "RawRational")]
pub struct Rational {
    num: i64,
    den: i64,
}

/// Serialized shape of a [`Rational`]; canonicalized on the way in.
#[derive(Serialize, Deserialize)]
struct RawRational {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<RawRational> for Rational {
    type Error = ToyError;

    fn try_from(raw: RawRational) -> ToyResult<Self> {
        Rational::new(raw.numerator, raw.denominator)
    }
}

impl From<Rational> for RawRational {
    fn from(r: Rational) -> Self {
        Self {
            numerator: r.num,
            denominator: r.den,
        }
    }
}

impl Rational {
    /// Zero.
    pub const ZERO: Self = Self { num: 0, den: 1 };

    /// One.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Build `num/den` in lowest terms with a positive denominator.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `den = 0`; `ArithmeticOverflow` when the
    /// sign normalization of `i64::MIN` leaves the `i64` range.
    pub fn new(num: i64, den: i64) -> ToyResult<Self> {
        if den == 0 {
            return Err(ToyError::invalid_parameter(format!(
                "zero denominator in {num}/{den}"
            )));
        }
        if num == 0 {
            return Ok(Self::ZERO);
        }
        let g = i128::from(gcd(num, den));
        let mut n = i128::from(num) / g;
        let mut d = i128::from(den) / g;
        if d < 0 {
            n = -n;
            d = -d;
        }
        match (i64::try_from(n), i64::try_from(d)) {
            (Ok(num), Ok(den)) => Ok(Self { num, den }),
            _ => Err(ToyError::overflow(format!(
                "{num}/{den} does not fit i64 after normalization"
            ))),
        }
    }

    /// The integer `n` as `n/1`.
    pub const fn integer(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Reduced numerator (carries the sign).
    pub const fn numerator(&self) -> i64 {
        self.num
    }

    /// Reduced denominator (always positive).
    pub const fn denominator(&self) -> i64 {
        self.den
    }

    /// True for `0/1`.
    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// `max(|numerator|, denominator)` of the reduced form.
    pub const fn max_abs(&self) -> u64 {
        let n = self.num.unsigned_abs();
        let d = self.den.unsigned_abs();
        if n > d {
            n
        } else {
            d
        }
    }

    /// p-adic valuation `v_p(num) − v_p(den)`; `None` for zero.
    pub const fn valuation(&self, p: u64) -> Option<i64> {
        let vn = match valuation(p, self.num.unsigned_abs()) {
            Some(v) => v as i64,
            None => return None,
        };
        let vd = match valuation(p, self.den.unsigned_abs()) {
            Some(v) => v as i64,
            None => return None,
        };
        Some(vn - vd)
    }

    /// Nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Ord for Rational {
    /// Numeric order; denominators are positive so cross-multiplication
    /// preserves it.
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        let lhs = i128::from(self.num) * i128::from(other.den);
        let rhs = i128::from(other.num) * i128::from(self.den);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Rational {
    type Err = ToyError;

    /// Parses `"a"` or `"a/b"` (surrounding whitespace ignored).
    fn from_str(s: &str) -> ToyResult<Self> {
        let parse = |part: &str| {
            part.trim().parse::<i64>().map_err(|e| {
                ToyError::invalid_parameter(format!("cannot parse {s:?} as a rational: {e}"))
            })
        };
        match s.split_once('/') {
            Some((num, den)) => Self::new(parse(num)?, parse(den)?),
            None => Ok(Self::integer(parse(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_examples() {
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(i64::MIN, 0), 1u64 << 63);
    }

    #[test]
    fn gcd_all_examples() {
        assert_eq!(gcd_all(&[]), 0);
        assert_eq!(gcd_all(&[0, 0]), 0);
        assert_eq!(gcd_all(&[4, -6, 10]), 2);
        assert_eq!(gcd_all(&[2, 3, 6]), 1);
    }

    #[test]
    fn primes_below_100() {
        let count = (0u64..100).filter(|&n| is_prime(n)).count();
        assert_eq!(count, 25, "expected 25 primes below 100");
        assert!(!is_prime(1));
        assert!(!is_prime(91)); // 7 · 13
        assert!(is_prime(7919));
    }

    #[test]
    fn valuation_examples() {
        assert_eq!(valuation(5, 0), None);
        assert_eq!(valuation(1, 8), None);
        assert_eq!(valuation(5, 125), Some(3));
        assert_eq!(valuation(5, 7), Some(0));
        assert_eq!(valuation(2, 96), Some(5));
    }

    #[test]
    fn canonical_form() {
        let r = Rational::new(6, -4).unwrap();
        assert_eq!((r.numerator(), r.denominator()), (-3, 2));
        let z = Rational::new(0, -9).unwrap();
        assert_eq!(z, Rational::ZERO);
        assert_eq!(z.denominator(), 1);
    }

    #[test]
    fn zero_denominator_rejected() {
        assert!(matches!(
            Rational::new(3, 0),
            Err(ToyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn min_over_minus_one_overflows() {
        assert!(matches!(
            Rational::new(i64::MIN, -1),
            Err(ToyError::ArithmeticOverflow(_))
        ));
        // The same magnitude with a positive denominator is representable.
        assert_eq!(Rational::new(i64::MIN, 1).unwrap().numerator(), i64::MIN);
    }

    #[test]
    fn rational_valuation() {
        let q = Rational::new(1, 125).unwrap();
        assert_eq!(q.valuation(5), Some(-3));
        assert_eq!(Rational::new(50, 3).unwrap().valuation(5), Some(2));
        assert_eq!(Rational::ZERO.valuation(5), None);
    }

    #[test]
    fn parse_and_display() {
        let q: Rational = " 2 / 250 ".parse().unwrap();
        assert_eq!(q.to_string(), "1/125");
        let n: Rational = "-7".parse().unwrap();
        assert_eq!(n.to_string(), "-7");
        assert!("1/0".parse::<Rational>().is_err());
        assert!("one half".parse::<Rational>().is_err());
    }

    #[test]
    fn serde_canonicalizes() {
        let r: Rational = serde_json::from_str(r#"{"numerator": 4, "denominator": -6}"#).unwrap();
        assert_eq!(r, Rational::new(-2, 3).unwrap());
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"numerator":-2,"denominator":3}"#);
    }

    #[test]
    fn ordering_is_numeric() {
        let third = Rational::new(1, 3).unwrap();
        let half = Rational::new(1, 2).unwrap();
        let neg = Rational::new(-5, 3).unwrap();
        assert!(third < half);
        assert!(neg < Rational::ZERO);
        assert!(Rational::integer(2) > half);
    }

    #[test]
    fn max_abs_of_reduced_form() {
        assert_eq!(Rational::new(-10, 6).unwrap().max_abs(), 5);
        assert_eq!(Rational::ZERO.max_abs(), 1);
    }
}
