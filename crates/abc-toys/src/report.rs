//! Showcase report: one section per module, run independently.
//!
//! [`run_all`] evaluates each module's worked example with the supplied
//! configuration. A section that fails is recorded as a failure; the
//! remaining sections still run.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::arith::Rational;
use crate::config::ToyConfig;
use crate::error::ToyResult;
use crate::monodromy::{BranchPoint, RationalMap, TripleFilter};
use crate::tate::PadicParameter;
use crate::{frobenioid, height, monodromy};

/// Outcome of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The computation succeeded.
    Pass,
    /// The computation succeeded but produced nothing to show.
    Warning,
    /// The computation returned an error.
    Failure,
}

/// Result of running one module's example.
#[derive(Debug, Clone, Serialize)]
pub struct SectionResult {
    /// Module name.
    pub section: String,
    /// One-line summary.
    pub message: String,
    /// Outcome.
    pub severity: Severity,
    /// Extra lines, e.g. the error chain of a failure.
    pub details: Vec<String>,
    /// Structured output of the section; `null` on failure.
    pub payload: Value,
}

impl SectionResult {
    /// A passing section with its output.
    pub fn pass(section: impl Into<String>, message: impl Into<String>, payload: Value) -> Self {
        Self {
            section: section.into(),
            message: message.into(),
            severity: Severity::Pass,
            details: Vec::new(),
            payload,
        }
    }

    /// A section that ran but found nothing.
    pub fn warn(section: impl Into<String>, message: impl Into<String>, payload: Value) -> Self {
        Self {
            section: section.into(),
            message: message.into(),
            severity: Severity::Warning,
            details: Vec::new(),
            payload,
        }
    }

    /// A failed section.
    pub fn fail(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            message: message.into(),
            severity: Severity::Failure,
            details: Vec::new(),
            payload: Value::Null,
        }
    }

    /// Returns true if this section failed.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated sections.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Sections in run order.
    pub sections: Vec<SectionResult>,
}

impl Report {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one section.
    pub fn push(&mut self, section: SectionResult) {
        self.sections.push(section);
    }

    /// Append every section of `other`.
    pub fn extend(&mut self, other: Report) {
        self.sections.extend(other.sections);
    }

    /// Number of failed sections.
    pub fn failure_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_failure()).count()
    }

    /// True when no section failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Run every module's example.
///
/// Sections, in order:
/// 1. `tate`: `p = 5`, `q = 1/125`, plus a point scan over `[-1, 1]`
/// 2. `monodromy`: degree-3 triples and the fibers of `z³`
/// 3. `height`: `h(3/2)`, `h([2:3:6])`, and points on `y² = x³ + 1`
/// 4. `frobenioid`: the scale table up to 5
pub fn run_all(config: &ToyConfig) -> Report {
    let mut report = Report::new();
    report.push(section("tate", || tate_section(config)));
    report.push(section("monodromy", || monodromy_section(config)));
    report.push(section("height", || height_section(config)));
    report.push(section("frobenioid", || frobenioid_section(config)));
    info!(
        sections = report.sections.len(),
        failures = report.failure_count(),
        "showcase complete"
    );
    report
}

fn section<F>(name: &str, run: F) -> SectionResult
where
    F: FnOnce() -> ToyResult<SectionResult>,
{
    run().unwrap_or_else(|err| {
        warn!(section = name, %err, "section failed");
        let mut failed = SectionResult::fail(name, "computation failed");
        failed.details.push(err.to_string());
        failed
    })
}

fn tate_section(config: &ToyConfig) -> ToyResult<SectionResult> {
    let param = PadicParameter::new(5, Rational::new(1, 125)?)?;
    let coeffs = param.coefficients(config.tate.order)?;
    let points = coeffs.curve(&config.tate).points((-1.0, 1.0), 5)?;
    let payload = json!({
        "parameter": param,
        "order": config.tate.order,
        "coefficients": coeffs,
        "equation": coeffs.to_string(),
        "points": points,
    });
    Ok(SectionResult::pass(
        "tate",
        format!("{coeffs} from q = 1/125 with {} terms", config.tate.order),
        payload,
    ))
}

fn monodromy_section(config: &ToyConfig) -> ToyResult<SectionResult> {
    let n = 3.min(config.monodromy.max_degree);
    let triples = monodromy::enumerate_triples_with(n, TripleFilter::All, &config.monodromy)?;
    let fibers = monodromy::ramification_with(
        &RationalMap::Power { degree: 3 },
        &[BranchPoint::Zero, BranchPoint::One, BranchPoint::Infinity],
        &config.monodromy,
    )?;
    let sample: Vec<_> = triples.iter().take(5).collect();
    let payload = json!({
        "degree": n,
        "triple_count": triples.len(),
        "first_triples": sample,
        "ramification": fibers,
    });
    Ok(SectionResult::pass(
        "monodromy",
        format!("{} triples of degree {n}", triples.len()),
        payload,
    ))
}

fn height_section(config: &ToyConfig) -> ToyResult<SectionResult> {
    let curve = height::CurveEquation::default();
    let found = height::enumerate_with(&curve, 10.5f64.ln(), &config.height)?;
    let payload = json!({
        "rational_3_2": height::rational(3, 2)?,
        "projective_2_3_6": height::projective(&[2, 3, 6])?,
        "curve": curve.to_string(),
        "enumeration": found,
    });
    let message = format!("{} points on {curve}", found.stats.count);
    if found.points.is_empty() {
        Ok(SectionResult::warn("height", message, payload))
    } else {
        Ok(SectionResult::pass("height", message, payload))
    }
}

fn frobenioid_section(config: &ToyConfig) -> ToyResult<SectionResult> {
    let rows = frobenioid::table_with(5, &config.frobenioid)?;
    let composed = frobenioid::morphism(2)?.compose(&frobenioid::morphism(3)?)?;
    let payload = json!({
        "table": rows,
        "composition": {
            "multiplier": composed.multiplier(),
            "degree": composed.degree(),
        },
    });
    Ok(SectionResult::pass(
        "frobenioid",
        format!("{} rows; ×2 ∘ ×3 = {composed}", rows.len()),
        payload,
    ))
}
