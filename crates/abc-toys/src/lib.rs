//! abc-toys - small computable models around the abc conjecture
//!
//! Four independent modules turn minimal inputs into concrete numbers and
//! combinatorial data:
//!
//! | Module | Input | Output |
//! |--------|-------|--------|
//! | [`tate`] | prime `p`, parameter `q`, order | `{a4, a6}`, curve points, group law |
//! | [`monodromy`] | Belyi map or degree `n` | ramification profiles, permutation triples |
//! | [`height`] | rational or projective point, curve | naive heights, bounded point search |
//! | [`frobenioid`] | object bound | two degree functions, multiplicative morphisms |
//!
//! Shared support lives in [`arith`] (gcd, primality, [`Rational`]),
//! [`config`] (search bounds and tolerances), [`error`], and [`report`]
//! (runs every module's worked example and collects the outcomes).
//!
//! # Determinism
//!
//! Every function is pure and single-threaded. Output order is fixed:
//! ascending `n`, lexicographic permutation order, and ascending
//! denominator then numerator in height searches.
//!
//! # Example
//!
//! ```
//! use abc_toys::{frobenioid, height, monodromy, tate, Rational};
//!
//! let coeffs = tate::generate(5, Rational::new(1, 125)?, 10)?;
//! assert!((coeffs.a4 + 0.042953).abs() < 1e-5);
//!
//! assert_eq!(monodromy::enumerate_triples(3)?.len(), 36);
//! assert!((height::rational(-5, 3)? - 5f64.ln()).abs() < 1e-12);
//! assert_eq!(frobenioid::table(5)?[4].alt_scale, 6);
//! # Ok::<(), abc_toys::ToyError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod arith;
pub mod config;
pub mod error;
pub mod frobenioid;
pub mod height;
pub mod monodromy;
pub mod report;
pub mod tate;

pub use arith::Rational;
pub use config::{FrobenioidConfig, HeightConfig, MonodromyConfig, TateConfig, ToyConfig};
pub use error::{ToyError, ToyResult};
pub use frobenioid::{DegreeFunction, Morphism, MonoidObject, ScaleRow};
pub use height::{CurveEquation, HeightEnumeration, HeightStats, ProjectivePoint};
pub use monodromy::{
    BranchPoint, CycleDecomposition, Permutation, PermutationTriple, RationalMap, TripleFilter,
};
pub use report::{run_all, Report, SectionResult, Severity};
pub use tate::{CurvePoint, EllipticCurve, PadicParameter, Point, WeierstrassCoefficients};
