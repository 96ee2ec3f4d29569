//! Property-based tests for the invariants of each model.
//!
//! Uses proptest over small integer ranges; searches stay cheap enough to
//! run every case.

use abc_toys::frobenioid::{self, DegreeFunction};
use abc_toys::height::{self, ProjectivePoint};
use abc_toys::monodromy::{BranchPoint, Permutation, PermutationTriple, RationalMap};
use abc_toys::{tate, Rational};
use proptest::prelude::*;

fn nonzero(range: core::ops::RangeInclusive<i64>) -> impl Strategy<Value = i64> {
    range.prop_filter("non-zero", |v| *v != 0)
}

fn permutation(n: usize) -> impl Strategy<Value = Permutation> {
    Just((1..=n).collect::<Vec<usize>>())
        .prop_shuffle()
        .prop_map(|images| Permutation::from_images(images).unwrap())
}

// =============================================================================
// Heights
// =============================================================================

proptest! {
    /// h(k·a / k·b) = h(a/b)
    #[test]
    fn prop_rational_height_scale_invariant(
        a in -10_000i64..=10_000,
        b in nonzero(-10_000..=10_000),
        k in nonzero(-1_000..=1_000),
    ) {
        let base = height::rational(a, b).unwrap();
        let scaled = height::rational(k * a, k * b).unwrap();
        prop_assert!((base - scaled).abs() < 1e-12);
    }

    /// Height is non-negative and zero exactly at 0 and ±1.
    #[test]
    fn prop_rational_height_nonnegative(a in -1_000i64..=1_000, b in nonzero(-1_000..=1_000)) {
        let r = Rational::new(a, b).unwrap();
        let h = height::of_rational(&r);
        prop_assert!(h >= 0.0);
        let trivial = r.max_abs() == 1;
        prop_assert_eq!(h == 0.0, trivial);
    }

    /// The direct height matches the height of the reduced rational and of
    /// the projective point `[a : b]` across the whole `i64` range.
    #[test]
    fn prop_rational_height_agrees_with_reduced(
        a in any::<i64>(),
        b in any::<i64>().prop_filter("non-zero", |v| *v != 0),
    ) {
        let h = height::rational(a, b).unwrap();
        prop_assert!(h.is_finite() && h >= 0.0);
        prop_assert!((h - height::projective(&[a, b]).unwrap()).abs() < 1e-12);
        if let Ok(r) = Rational::new(a, b) {
            prop_assert!((h - height::of_rational(&r)).abs() < 1e-12);
        }
    }

    /// Canonical projective coordinates are fixed by scaling.
    #[test]
    fn prop_projective_canonical_under_scaling(
        coords in prop::collection::vec(-500i64..=500, 1..5),
        k in nonzero(-50..=50),
    ) {
        prop_assume!(coords.iter().any(|&c| c != 0));
        let scaled: Vec<i64> = coords.iter().map(|c| c * k).collect();
        let p = ProjectivePoint::new(&coords).unwrap();
        let q = ProjectivePoint::new(&scaled).unwrap();
        prop_assert_eq!(p.coords(), q.coords());
        let lead = p.coords().iter().copied().find(|&c| c != 0).unwrap();
        prop_assert!(lead > 0);
    }
}

// =============================================================================
// Frobenioid
// =============================================================================

proptest! {
    /// alt_scale(n) ≥ degree(n), with equality only at 0 and 1.
    #[test]
    fn prop_alt_scale_dominates(n: u32) {
        let (d, t) = (frobenioid::degree(n), frobenioid::alt_scale(n));
        prop_assert!(t >= d);
        prop_assert_eq!(t == d, n <= 1);
        prop_assert_eq!(frobenioid::AltScale.degree(n), t);
    }

    /// Degree of a composite is the product of degrees.
    #[test]
    fn prop_morphism_degree_multiplicative(j in 1u32..=60_000, k in 1u32..=60_000) {
        let f = frobenioid::morphism(j).unwrap();
        let g = frobenioid::morphism(k).unwrap();
        let fg = f.compose(&g).unwrap();
        prop_assert_eq!(fg.degree(), f.degree() * g.degree());
        prop_assert_eq!(fg, g.compose(&f).unwrap());
    }
}

// =============================================================================
// Monodromy
// =============================================================================

proptest! {
    /// σ0 ∘ σ1 ∘ σ∞ = id for any completed pair.
    #[test]
    fn prop_triple_closes((s0, s1) in (1usize..=6).prop_flat_map(|n| (permutation(n), permutation(n)))) {
        let triple = PermutationTriple::from_pair(s0, s1).unwrap();
        let product = triple
            .sigma0
            .compose(&triple.sigma1)
            .and_then(|p| p.compose(&triple.sigma_inf))
            .unwrap();
        prop_assert!(product.is_identity());
        prop_assert_eq!(triple.cycles_inf.total(), triple.degree());
    }

    /// Riemann–Hurwitz: Σ over {0, 1, ∞} of (d − #preimages) = 2d − 2.
    #[test]
    fn prop_ramification_balances(a in 1u32..=40, b in 1u32..=40, power in any::<bool>()) {
        let map = if power {
            RationalMap::Power { degree: a }
        } else {
            RationalMap::Binomial { a, b }
        };
        let d = map.degree() as usize;
        let excess: usize = [BranchPoint::Zero, BranchPoint::One, BranchPoint::Infinity]
            .into_iter()
            .map(|pt| map.fiber(pt).unwrap().ramification_excess())
            .sum();
        prop_assert_eq!(excess, 2 * d - 2);
    }
}

// =============================================================================
// Tate curves
// =============================================================================

proptest! {
    /// Coefficients shrink as q = p^(−k) shrinks.
    #[test]
    fn prop_tate_coefficients_shrink(k in 1u32..=5) {
        let p = 3i64;
        let near = tate::generate(3, Rational::new(1, p.pow(k)).unwrap(), 10).unwrap();
        let far = tate::generate(3, Rational::new(1, p.pow(k + 1)).unwrap(), 10).unwrap();
        prop_assert!(far.a4.abs() < near.a4.abs());
        prop_assert!(far.a6.abs() < near.a6.abs());
    }
}
