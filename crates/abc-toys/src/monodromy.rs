//! Belyi maps, ramification profiles, and monodromy triples.
//!
//! A degree-`n` cover of `P¹ \ {0, 1, ∞}` is described by three permutations
//! `σ0, σ1, σ∞ ∈ S_n` with `σ0 ∘ σ1 ∘ σ∞ = id`. The cycle type of each
//! permutation is the ramification profile over the matching branch point.
//!
//! # Search cost
//!
//! [`enumerate_triples`] visits every pair `(σ0, σ1)` and derives
//! `σ∞ = (σ0 ∘ σ1)⁻¹`, so it produces exactly `n!²` triples in
//! `O(n!² · n)` time:
//!
//! | n | triples |
//! |---|---------|
//! | 1 | 1       |
//! | 2 | 4       |
//! | 3 | 36      |
//! | 4 | 576     |
//! | 5 | 14 400  |
//!
//! Degrees above [`MonodromyConfig::max_degree`] are rejected.
//!
//! # Example
//!
//! ```
//! use abc_toys::monodromy::{self, BranchPoint, RationalMap};
//!
//! let triples = monodromy::enumerate_triples(3)?;
//! assert_eq!(triples.len(), 36);
//!
//! let fibers = monodromy::ramification(
//!     &RationalMap::Power { degree: 2 },
//!     &[BranchPoint::Zero, BranchPoint::One, BranchPoint::Infinity],
//! )?;
//! assert_eq!(fibers[&BranchPoint::Zero].parts(), [2]);
//! assert_eq!(fibers[&BranchPoint::One].parts(), [1, 1]);
//! # Ok::<(), abc_toys::ToyError>(())
//! ```

use core::fmt;
use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::arith::Rational;
use crate::config::MonodromyConfig;
use crate::error::{ToyError, ToyResult};

// ============================================================================
// Permutation
// ============================================================================

/// A permutation of `{1..n}` in one-line notation: `images[i − 1] = σ(i)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    images: Vec<usize>,
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = ToyError;

    fn try_from(images: Vec<usize>) -> ToyResult<Self> {
        Self::from_images(images)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.images
    }
}

impl Permutation {
    /// The identity of `S_n`.
    pub fn identity(n: usize) -> Self {
        Self {
            images: (1..=n).collect(),
        }
    }

    /// Build from one-line notation.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless `images` is a rearrangement of `1..=n`.
    pub fn from_images(images: Vec<usize>) -> ToyResult<Self> {
        let n = images.len();
        let mut seen = vec![false; n];
        for &image in &images {
            if image == 0 || image > n || seen[image - 1] {
                return Err(ToyError::invalid_parameter(format!(
                    "{images:?} is not a permutation of 1..={n}"
                )));
            }
            seen[image - 1] = true;
        }
        Ok(Self { images })
    }

    /// All of `S_n` in lexicographic order of one-line notation.
    pub fn all(n: usize) -> Vec<Self> {
        let mut current: Vec<usize> = (1..=n).collect();
        let mut out = vec![Self {
            images: current.clone(),
        }];
        while next_permutation(&mut current) {
            out.push(Self {
                images: current.clone(),
            });
        }
        out
    }

    /// `n`.
    pub fn degree(&self) -> usize {
        self.images.len()
    }

    /// One-line notation.
    pub fn images(&self) -> &[usize] {
        &self.images
    }

    /// `σ(i)` for `i ∈ 1..=n`.
    pub fn apply(&self, i: usize) -> Option<usize> {
        i.checked_sub(1).and_then(|k| self.images.get(k)).copied()
    }

    /// `self ∘ other`, i.e. `i ↦ self(other(i))`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the degrees differ.
    pub fn compose(&self, other: &Self) -> ToyResult<Self> {
        if self.degree() != other.degree() {
            return Err(ToyError::invalid_parameter(format!(
                "cannot compose permutations of degree {} and {}",
                self.degree(),
                other.degree()
            )));
        }
        Ok(self.compose_same_degree(other))
    }

    fn compose_same_degree(&self, other: &Self) -> Self {
        Self {
            images: other.images.iter().map(|&j| self.images[j - 1]).collect(),
        }
    }

    /// `σ⁻¹`.
    pub fn inverse(&self) -> Self {
        let mut images = vec![0; self.images.len()];
        for (i, &j) in self.images.iter().enumerate() {
            images[j - 1] = i + 1;
        }
        Self { images }
    }

    /// True for the identity.
    pub fn is_identity(&self) -> bool {
        self.images.iter().enumerate().all(|(i, &j)| j == i + 1)
    }

    /// Disjoint cycles, fixed points included. Each cycle starts at its
    /// smallest element; cycles are ordered by that element.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let n = self.images.len();
        let mut seen = vec![false; n];
        let mut cycles = Vec::new();
        for start in 1..=n {
            if seen[start - 1] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut j = start;
            while !seen[j - 1] {
                seen[j - 1] = true;
                cycle.push(j);
                j = self.images[j - 1];
            }
            cycles.push(cycle);
        }
        cycles
    }

    /// Multiset of cycle lengths.
    pub fn cycle_type(&self) -> CycleDecomposition {
        CycleDecomposition::from_parts(self.cycles().iter().map(Vec::len).collect())
    }
}

impl fmt::Display for Permutation {
    /// Cycle notation without fixed points; the identity prints as `()`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for cycle in self.cycles().iter().filter(|c| c.len() > 1) {
            let body: Vec<String> = cycle.iter().map(usize::to_string).collect();
            write!(f, "({})", body.join(" "))?;
            wrote = true;
        }
        if !wrote {
            write!(f, "()")?;
        }
        Ok(())
    }
}

/// Advance `v` to its lexicographic successor; false after the last one.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

// ============================================================================
// CycleDecomposition
// ============================================================================

/// A multiset of positive integers in non-increasing order: the cycle type
/// of a permutation, or the ramification indices over one branch point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct CycleDecomposition(Vec<usize>);

impl From<Vec<usize>> for CycleDecomposition {
    fn from(parts: Vec<usize>) -> Self {
        Self::from_parts(parts)
    }
}

impl From<CycleDecomposition> for Vec<usize> {
    fn from(c: CycleDecomposition) -> Self {
        c.0
    }
}

impl CycleDecomposition {
    /// Sort `parts` into canonical order.
    pub fn from_parts(mut parts: Vec<usize>) -> Self {
        parts.sort_unstable_by(|a, b| b.cmp(a));
        Self(parts)
    }

    /// Parts, largest first.
    pub fn parts(&self) -> &[usize] {
        &self.0
    }

    /// Sum of the parts (the degree).
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Number of parts (cycles, or preimages).
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Contribution `Σ (eᵢ − 1)` to the Riemann–Hurwitz formula.
    pub fn ramification_excess(&self) -> usize {
        self.total() - self.count()
    }
}

impl fmt::Display for CycleDecomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: Vec<String> = self.0.iter().map(usize::to_string).collect();
        write!(f, "[{}]", body.join(", "))
    }
}

// ============================================================================
// Permutation triples
// ============================================================================

/// `(σ0, σ1, σ∞)` with `σ0 ∘ σ1 ∘ σ∞ = id`, plus the three cycle types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermutationTriple {
    /// Monodromy around 0.
    pub sigma0: Permutation,
    /// Monodromy around 1.
    pub sigma1: Permutation,
    /// Monodromy around ∞, `(σ0 ∘ σ1)⁻¹`.
    pub sigma_inf: Permutation,
    /// Cycle type of `σ0`.
    pub cycles0: CycleDecomposition,
    /// Cycle type of `σ1`.
    pub cycles1: CycleDecomposition,
    /// Cycle type of `σ∞`.
    pub cycles_inf: CycleDecomposition,
}

impl PermutationTriple {
    /// Complete `(σ0, σ1)` with `σ∞ = (σ0 ∘ σ1)⁻¹`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the degrees differ.
    pub fn from_pair(sigma0: Permutation, sigma1: Permutation) -> ToyResult<Self> {
        let sigma_inf = sigma0.compose(&sigma1)?.inverse();
        Ok(Self::assemble(sigma0, sigma1, sigma_inf))
    }

    fn assemble(sigma0: Permutation, sigma1: Permutation, sigma_inf: Permutation) -> Self {
        Self {
            cycles0: sigma0.cycle_type(),
            cycles1: sigma1.cycle_type(),
            cycles_inf: sigma_inf.cycle_type(),
            sigma0,
            sigma1,
            sigma_inf,
        }
    }

    /// Degree of the cover.
    pub fn degree(&self) -> usize {
        self.sigma0.degree()
    }

    /// Whether `⟨σ0, σ1⟩` acts transitively, i.e. the dessin is connected.
    pub fn is_transitive(&self) -> bool {
        let n = self.degree();
        if n == 0 {
            return true;
        }
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([1usize]);
        seen[0] = true;
        let mut reached = 1;
        while let Some(i) = queue.pop_front() {
            for sigma in [&self.sigma0, &self.sigma1] {
                let j = sigma.images[i - 1];
                if !seen[j - 1] {
                    seen[j - 1] = true;
                    reached += 1;
                    queue.push_back(j);
                }
            }
        }
        reached == n
    }

    /// Genus of the covering curve by Riemann–Hurwitz; `None` when the
    /// triple is not transitive (the cover is disconnected).
    pub fn genus(&self) -> Option<usize> {
        if !self.is_transitive() {
            return None;
        }
        let excess = self.cycles0.ramification_excess()
            + self.cycles1.ramification_excess()
            + self.cycles_inf.ramification_excess();
        // 2g − 2 = −2n + excess
        (excess + 2)
            .checked_sub(2 * self.degree())
            .filter(|twice| twice % 2 == 0)
            .map(|twice| twice / 2)
    }

    /// The bipartite graph of the triple.
    pub fn dessin(&self) -> Dessin {
        let white = self.sigma0.cycles();
        let black = self.sigma1.cycles();
        let n = self.degree();
        let white_of = cycle_owner(&white, n);
        let black_of = cycle_owner(&black, n);
        let edges = (1..=n)
            .map(|label| DessinEdge {
                label,
                white: white_of[label - 1],
                black: black_of[label - 1],
            })
            .collect();
        Dessin {
            white,
            black,
            edges,
            faces: self.cycles_inf.count(),
        }
    }
}

/// `owner[i − 1]` is the index of the cycle containing `i`.
fn cycle_owner(cycles: &[Vec<usize>], n: usize) -> Vec<usize> {
    let mut owner = vec![0usize; n];
    for (c, cycle) in cycles.iter().enumerate() {
        for &i in cycle {
            owner[i - 1] = c;
        }
    }
    owner
}

/// Bipartite "dessin d'enfant": white vertices are cycles of `σ0`, black
/// vertices are cycles of `σ1`, and each point `i ∈ {1..n}` is an edge
/// joining the two cycles that contain it. Faces correspond to cycles of `σ∞`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dessin {
    /// White vertices (cycles of `σ0`).
    pub white: Vec<Vec<usize>>,
    /// Black vertices (cycles of `σ1`).
    pub black: Vec<Vec<usize>>,
    /// One edge per sheet.
    pub edges: Vec<DessinEdge>,
    /// Number of faces.
    pub faces: usize,
}

impl Dessin {
    /// `V − E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        (self.white.len() + self.black.len() + self.faces) as i64 - self.edges.len() as i64
    }
}

/// An edge of a [`Dessin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DessinEdge {
    /// Sheet `i` this edge stands for.
    pub label: usize,
    /// Index into [`Dessin::white`].
    pub white: usize,
    /// Index into [`Dessin::black`].
    pub black: usize,
}

/// Which triples [`enumerate_triples_with`] keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripleFilter {
    /// Every algebraic solution, connected or not.
    #[default]
    All,
    /// Only triples generating a transitive group (connected dessins).
    Transitive,
}

/// Every triple of degree `n` with the default bound.
///
/// # Errors
///
/// `InvalidParameter` for `n = 0` or `n` above the default `max_degree`.
pub fn enumerate_triples(n: usize) -> ToyResult<Vec<PermutationTriple>> {
    enumerate_triples_with(n, TripleFilter::All, &MonodromyConfig::default())
}

/// Brute-force search over `S_n × S_n` in lexicographic order.
///
/// # Errors
///
/// `InvalidParameter` for `n = 0` or `n > config.max_degree`.
pub fn enumerate_triples_with(
    n: usize,
    filter: TripleFilter,
    config: &MonodromyConfig,
) -> ToyResult<Vec<PermutationTriple>> {
    if n == 0 {
        return Err(ToyError::invalid_parameter("degree must be at least 1"));
    }
    if n > config.max_degree {
        return Err(ToyError::invalid_parameter(format!(
            "degree {n} exceeds max_degree {}; the search visits n!^2 pairs",
            config.max_degree
        )));
    }
    let group = Permutation::all(n);
    let mut out = Vec::new();
    for sigma0 in &group {
        for sigma1 in &group {
            let sigma_inf = sigma0.compose_same_degree(sigma1).inverse();
            let triple = PermutationTriple::assemble(sigma0.clone(), sigma1.clone(), sigma_inf);
            if filter == TripleFilter::Transitive && !triple.is_transitive() {
                continue;
            }
            out.push(triple);
        }
    }
    debug!(n, pairs = group.len() * group.len(), kept = out.len(), ?filter, "triple search");
    Ok(out)
}

// ============================================================================
// Ramification
// ============================================================================

/// A point of `P¹` over which a fiber is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BranchPoint {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// `∞`.
    Infinity,
    /// Any other rational value.
    Finite(Rational),
}

impl BranchPoint {
    /// Fold `Finite(0)` and `Finite(1)` into `Zero` and `One`.
    pub fn normalized(self) -> Self {
        match self {
            Self::Finite(r) if r == Rational::ZERO => Self::Zero,
            Self::Finite(r) if r == Rational::ONE => Self::One,
            other => other,
        }
    }
}

impl fmt::Display for BranchPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "0"),
            Self::One => write!(f, "1"),
            Self::Infinity => write!(f, "∞"),
            Self::Finite(r) => write!(f, "{r}"),
        }
    }
}

impl Serialize for BranchPoint {
    /// As its display string, so fibers serialize as a JSON object.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rational maps whose fibers over `0, 1, ∞` are known in closed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RationalMap {
    /// `f(z) = zᵈ`.
    Power {
        /// `d`.
        degree: u32,
    },
    /// `f(z) = c·zᵃ(1 − z)ᵇ` with `c = (a+b)^(a+b) / (aᵃ bᵇ)`, which sends
    /// its only other critical point `a/(a+b)` to 1.
    Binomial {
        /// Order of vanishing at `z = 0`.
        a: u32,
        /// Order of vanishing at `z = 1`.
        b: u32,
    },
}

impl RationalMap {
    /// Degree of the map.
    pub fn degree(&self) -> u64 {
        match *self {
            Self::Power { degree } => u64::from(degree),
            Self::Binomial { a, b } => u64::from(a) + u64::from(b),
        }
    }

    /// Ramification indices over `point`, with the default degree cap.
    ///
    /// # Errors
    ///
    /// See [`RationalMap::fiber_with`].
    pub fn fiber(&self, point: BranchPoint) -> ToyResult<CycleDecomposition> {
        self.fiber_with(point, &MonodromyConfig::default())
    }

    /// Ramification indices over `point`. An unramified fiber lists one
    /// entry per sheet, so the degree is capped by `max_map_degree`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a degenerate map (zero degree, `a = 0`, or
    /// `b = 0`) or a degree above `config.max_map_degree`;
    /// `ArithmeticOverflow` if the degree does not fit `usize`.
    pub fn fiber_with(
        &self,
        point: BranchPoint,
        config: &MonodromyConfig,
    ) -> ToyResult<CycleDecomposition> {
        let d = self.validated_degree(config)?;
        let unramified = || vec![1usize; d];
        let parts = match (*self, point.normalized()) {
            (Self::Power { .. }, BranchPoint::Zero | BranchPoint::Infinity) => vec![d],
            (Self::Power { .. }, _) => unramified(),
            (Self::Binomial { a, b }, BranchPoint::Zero) => vec![a as usize, b as usize],
            (Self::Binomial { .. }, BranchPoint::One) => {
                let mut parts = vec![1usize; d - 1];
                parts[0] = 2;
                parts
            }
            (Self::Binomial { .. }, BranchPoint::Infinity) => vec![d],
            (Self::Binomial { .. }, BranchPoint::Finite(_)) => unramified(),
        };
        Ok(CycleDecomposition::from_parts(parts))
    }

    fn validated_degree(&self, config: &MonodromyConfig) -> ToyResult<usize> {
        let degenerate = match *self {
            Self::Power { degree } => degree == 0,
            Self::Binomial { a, b } => a == 0 || b == 0,
        };
        if degenerate {
            return Err(ToyError::invalid_parameter(format!(
                "{self} is not a branched cover of positive degree"
            )));
        }
        if self.degree() > config.max_map_degree {
            return Err(ToyError::invalid_parameter(format!(
                "degree {} of {self} exceeds max_map_degree = {}",
                self.degree(),
                config.max_map_degree
            )));
        }
        usize::try_from(self.degree())
            .map_err(|_| ToyError::overflow(format!("degree of {self} does not fit usize")))
    }
}

impl fmt::Display for RationalMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power { degree } => write!(f, "z^{degree}"),
            Self::Binomial { a, b } => write!(f, "c·z^{a}·(1-z)^{b}"),
        }
    }
}

/// Ramification profile of `map` over each requested branch point.
///
/// Points are normalized first, so `Finite(0)` and `Zero` share an entry.
///
/// # Errors
///
/// See [`RationalMap::fiber_with`].
pub fn ramification(
    map: &RationalMap,
    branch_points: &[BranchPoint],
) -> ToyResult<BTreeMap<BranchPoint, CycleDecomposition>> {
    ramification_with(map, branch_points, &MonodromyConfig::default())
}

/// [`ramification`] with an explicit degree cap.
///
/// # Errors
///
/// See [`RationalMap::fiber_with`].
pub fn ramification_with(
    map: &RationalMap,
    branch_points: &[BranchPoint],
    config: &MonodromyConfig,
) -> ToyResult<BTreeMap<BranchPoint, CycleDecomposition>> {
    let mut out = BTreeMap::new();
    for &point in branch_points {
        let point = point.normalized();
        out.insert(point, map.fiber_with(point, config)?);
    }
    debug!(%map, points = out.len(), "ramification");
    Ok(out)
}
