//! A toy monoid with two competing degree functions.
//!
//! Objects are non-negative integers `n`. A morphism of multiplier `k ≥ 1`
//! sends `n` to `n·k`; composing morphisms multiplies their multipliers, and
//! the degree of a morphism is its multiplier. Two degree functions are
//! compared on objects:
//!
//! ```text
//! degree(n)    = n
//! alt_scale(n) = n + ⌊n/2⌋
//! ```
//!
//! They agree only at `n ∈ {0, 1}`; [`table`] lists both side by side.

use core::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::FrobenioidConfig;
use crate::error::{ToyError, ToyResult};

/// A degree assigned to each object.
pub trait DegreeFunction {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Degree of object `n`.
    fn degree(&self, n: u32) -> u64;
}

/// `degree(n) = n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl DegreeFunction for Identity {
    fn name(&self) -> &'static str {
        "degree"
    }

    fn degree(&self, n: u32) -> u64 {
        u64::from(n)
    }
}

/// `T(n) = n + ⌊n/2⌋`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AltScale;

impl DegreeFunction for AltScale {
    fn name(&self) -> &'static str {
        "alt_scale"
    }

    fn degree(&self, n: u32) -> u64 {
        u64::from(n) + u64::from(n / 2)
    }
}

/// [`Identity`] as a free function.
pub fn degree(n: u32) -> u64 {
    Identity.degree(n)
}

/// [`AltScale`] as a free function.
pub fn alt_scale(n: u32) -> u64 {
    AltScale.degree(n)
}

/// One row of [`table`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleRow {
    /// Object.
    pub n: u32,
    /// `degree(n)`.
    pub degree: u64,
    /// `alt_scale(n)`.
    pub alt_scale: u64,
    /// `alt_scale(n) − degree(n)`.
    pub diff: u64,
    /// `alt_scale(n) / degree(n)`, absent when `degree(n) = 0`.
    pub ratio: Option<f64>,
}

/// Both degree functions for `n = 0..=n_max`, with the default row cap.
///
/// # Errors
///
/// See [`table_with`].
pub fn table(n_max: u32) -> ToyResult<Vec<ScaleRow>> {
    table_with(n_max, &FrobenioidConfig::default())
}

/// Both degree functions for `n = 0..=n_max`.
///
/// # Errors
///
/// `InvalidParameter` when `n_max` exceeds `config.max_n`.
pub fn table_with(n_max: u32, config: &FrobenioidConfig) -> ToyResult<Vec<ScaleRow>> {
    check_listing("n_max", n_max, config)?;
    let rows: Vec<ScaleRow> = (0..=n_max)
        .map(|n| {
            let d = degree(n);
            let t = alt_scale(n);
            ScaleRow {
                n,
                degree: d,
                alt_scale: t,
                diff: t - d,
                ratio: (d != 0).then(|| t as f64 / d as f64),
            }
        })
        .collect();
    debug!(n_max, rows = rows.len(), "scale table");
    Ok(rows)
}

fn check_listing(what: &str, len: u32, config: &FrobenioidConfig) -> ToyResult<()> {
    if len > config.max_n {
        return Err(ToyError::invalid_parameter(format!(
            "{what} = {len} exceeds max_n = {}",
            config.max_n
        )));
    }
    Ok(())
}

/// An object together with its degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonoidObject {
    /// The integer.
    pub n: u32,
    /// Its degree under the function it was built with.
    pub degree: u64,
}

impl MonoidObject {
    /// Object `n` measured by `function`.
    pub fn new(n: u32, function: &dyn DegreeFunction) -> Self {
        Self {
            n,
            degree: function.degree(n),
        }
    }
}

/// Objects `0..count` under [`Identity`].
///
/// # Errors
///
/// `InvalidParameter` when `count` exceeds the default `max_n`.
pub fn objects(count: u32) -> ToyResult<Vec<MonoidObject>> {
    check_listing("count", count, &FrobenioidConfig::default())?;
    Ok((0..count).map(|n| MonoidObject::new(n, &Identity)).collect())
}

/// Multiplication by `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Morphism {
    multiplier: u32,
}

/// The morphism of multiplier `k`.
///
/// # Errors
///
/// `InvalidParameter` for `k = 0`.
pub fn morphism(k: u32) -> ToyResult<Morphism> {
    if k == 0 {
        return Err(ToyError::invalid_parameter(
            "morphism multiplier must be at least 1",
        ));
    }
    Ok(Morphism { multiplier: k })
}

impl Morphism {
    /// The identity morphism.
    pub const IDENTITY: Self = Self { multiplier: 1 };

    /// `k`.
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Degree of the morphism, equal to its multiplier.
    pub fn degree(&self) -> u64 {
        u64::from(self.multiplier)
    }

    /// `self ∘ other`.
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` when the product of multipliers leaves `u32`.
    pub fn compose(&self, other: &Self) -> ToyResult<Self> {
        self.multiplier
            .checked_mul(other.multiplier)
            .map(|multiplier| Self { multiplier })
            .ok_or_else(|| ToyError::overflow(format!("composing {self} with {other}")))
    }

    /// Image of object `n`.
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` when `n·k` leaves `u32`.
    pub fn apply(&self, n: u32) -> ToyResult<u32> {
        n.checked_mul(self.multiplier)
            .ok_or_else(|| ToyError::overflow(format!("applying {self} to {n}")))
    }
}

impl fmt::Display for Morphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "×{}", self.multiplier)
    }
}

/// The unique morphism `source → target`, if one exists: `source ≥ 1`,
/// `target ≥ 1`, and `source | target`.
pub fn morphism_between(source: u32, target: u32) -> Option<Morphism> {
    if source == 0 || target == 0 || target % source != 0 {
        return None;
    }
    Some(Morphism {
        multiplier: target / source,
    })
}

/// A morphism with its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Arrow {
    /// Source object.
    pub source: u32,
    /// Target object.
    pub target: u32,
    /// The morphism.
    pub morphism: Morphism,
    /// Its degree.
    pub degree: u64,
}

/// Every morphism out of `source` whose target is at most `max_object`,
/// by increasing multiplier.
///
/// # Errors
///
/// `InvalidParameter` for `source = 0`, whose outgoing morphisms all land
/// on 0 and cannot be told apart by target, or when more arrows than the
/// default `max_n` would be listed.
pub fn morphisms_from(source: u32, max_object: u32) -> ToyResult<Vec<Arrow>> {
    if source == 0 {
        return Err(ToyError::invalid_parameter(
            "object 0 has no distinguishable outgoing morphisms",
        ));
    }
    check_listing("arrow count", max_object / source, &FrobenioidConfig::default())?;
    Ok((1..=max_object / source)
        .map(|k| {
            let morphism = Morphism { multiplier: k };
            Arrow {
                source,
                target: source * k,
                morphism,
                degree: morphism.degree(),
            }
        })
        .collect())
}
