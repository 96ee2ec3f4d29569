//! `abc-demo`: runs the abc-toys models and prints their results as JSON.
//!
//! **Usage:**
//! ```text
//! abc-demo [--config <file>] tate [--p 5] [--q 1/125] [--order N]
//! abc-demo triples --n 3 [--transitive] [--limit K]
//! abc-demo ramification power --degree 3 [--points 0,1,inf]
//! abc-demo ramification binomial --a 2 --b 3 [--points 0,1,inf]
//! abc-demo height rational -5 3
//! abc-demo height projective 2 3 6
//! abc-demo height enumerate [--a 0] [--c 1] [--bound-h 2.35]
//! abc-demo height grid --max-abs 10
//! abc-demo frobenioid [--n-max 5]
//! abc-demo all
//! ```
//!
//! Logs go to stderr at `info` unless `RUST_LOG` sets other directives.
//! `all` exits non-zero if any section fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::process;

use abc_toys::monodromy::{self, BranchPoint, RationalMap, TripleFilter};
use abc_toys::{frobenioid, height, run_all, PadicParameter, Rational, ToyConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Compute small instances of Tate curves, monodromy, heights, and degrees.
#[derive(Parser)]
#[command(
    name = "abc-demo",
    about = "Compute toy models around the abc conjecture and print JSON"
)]
struct Args {
    /// JSON configuration file; missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tate curve coefficients and a point scan.
    Tate {
        /// Prime p.
        #[arg(long, default_value_t = 5)]
        p: u64,
        /// Tate parameter q as `a/b`.
        #[arg(long, default_value = "1/125")]
        q: Rational,
        /// Number of series terms (defaults to the configured order).
        #[arg(long)]
        order: Option<u32>,
        /// Start of the sampled x range.
        #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
        x_min: f64,
        /// End of the sampled x range.
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        x_max: f64,
        /// Number of samples.
        #[arg(long, default_value_t = 5)]
        steps: usize,
    },
    /// Enumerate permutation triples of degree n.
    Triples {
        /// Degree.
        #[arg(long, default_value_t = 3)]
        n: usize,
        /// Keep only triples with a connected dessin.
        #[arg(long)]
        transitive: bool,
        /// Print at most this many triples (the count is always exact).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Ramification profile of a Belyi map.
    Ramification {
        #[command(subcommand)]
        map: MapArg,
    },
    /// Naive heights.
    Height {
        #[command(subcommand)]
        query: HeightQuery,
    },
    /// Compare the two degree functions.
    Frobenioid {
        /// Largest object in the table.
        #[arg(long, default_value_t = 5)]
        n_max: u32,
    },
    /// Run every module's worked example.
    All,
}

#[derive(Subcommand)]
enum MapArg {
    /// f(z) = z^d.
    Power {
        /// d.
        #[arg(long)]
        degree: u32,
        /// Branch points: 0, 1, inf, or a rational.
        #[arg(long, value_delimiter = ',', default_value = "0,1,inf", value_parser = parse_branch_point)]
        points: Vec<BranchPoint>,
    },
    /// f(z) = c z^a (1 - z)^b.
    Binomial {
        /// Order at 0.
        #[arg(long)]
        a: u32,
        /// Order at 1.
        #[arg(long)]
        b: u32,
        /// Branch points: 0, 1, inf, or a rational.
        #[arg(long, value_delimiter = ',', default_value = "0,1,inf", value_parser = parse_branch_point)]
        points: Vec<BranchPoint>,
    },
}

#[derive(Subcommand)]
enum HeightQuery {
    /// h(a/b).
    Rational {
        /// Numerator.
        #[arg(allow_negative_numbers = true)]
        a: i64,
        /// Denominator.
        #[arg(allow_negative_numbers = true)]
        b: i64,
    },
    /// Height of a projective point.
    Projective {
        /// Homogeneous coordinates.
        #[arg(required = true, allow_negative_numbers = true)]
        coords: Vec<i64>,
    },
    /// Rational points of y^2 = x^3 + a x + c up to a height bound.
    Enumerate {
        /// Coefficient of x.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        a: i64,
        /// Constant term.
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        c: i64,
        /// Height bound; the search box is floor(exp(bound_h)).
        #[arg(long, default_value_t = 2.35)]
        bound_h: f64,
    },
    /// Heights of every rational in a grid.
    Grid {
        /// Largest |numerator| and denominator.
        #[arg(long, default_value_t = 10)]
        max_abs: u64,
    },
}

fn parse_branch_point(s: &str) -> Result<BranchPoint, String> {
    match s.trim() {
        "inf" | "∞" => Ok(BranchPoint::Infinity),
        other => other
            .parse::<Rational>()
            .map(|r| BranchPoint::Finite(r).normalized())
            .map_err(|e| e.to_string()),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ToyConfig> {
    let Some(path) = path else {
        return Ok(ToyConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    ToyConfig::from_json(&text).with_context(|| format!("Invalid config: {}", path.display()))
}

/// `RUST_LOG` directives when present and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(directives.as_deref()))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let output = match args.command {
        Command::Tate {
            p,
            q,
            order,
            x_min,
            x_max,
            steps,
        } => {
            let param = PadicParameter::new(p, q)?;
            let order = order.unwrap_or(config.tate.order);
            let coeffs = param.coefficients(order)?;
            let points = coeffs.curve(&config.tate).points((x_min, x_max), steps)?;
            json!({
                "parameter": param,
                "order": order,
                "coefficients": coeffs,
                "equation": coeffs.to_string(),
                "discriminant": coeffs.discriminant(),
                "points": points,
            })
        }
        Command::Triples {
            n,
            transitive,
            limit,
        } => {
            let filter = if transitive {
                TripleFilter::Transitive
            } else {
                TripleFilter::All
            };
            let triples = monodromy::enumerate_triples_with(n, filter, &config.monodromy)?;
            let shown: Vec<Value> = triples
                .iter()
                .take(limit.unwrap_or(triples.len()))
                .map(|t| {
                    json!({
                        "sigma0": t.sigma0.to_string(),
                        "sigma1": t.sigma1.to_string(),
                        "sigma_inf": t.sigma_inf.to_string(),
                        "cycles": [t.cycles0, t.cycles1, t.cycles_inf],
                        "genus": t.genus(),
                    })
                })
                .collect();
            json!({ "degree": n, "filter": filter, "count": triples.len(), "triples": shown })
        }
        Command::Ramification { map } => {
            let (map, points) = match map {
                MapArg::Power { degree, points } => (RationalMap::Power { degree }, points),
                MapArg::Binomial { a, b, points } => (RationalMap::Binomial { a, b }, points),
            };
            let fibers = monodromy::ramification_with(&map, &points, &config.monodromy)?;
            json!({ "map": map.to_string(), "degree": map.degree(), "fibers": fibers })
        }
        Command::Height { query } => match query {
            HeightQuery::Rational { a, b } => json!({ "height": height::rational(a, b)? }),
            HeightQuery::Projective { coords } => {
                let height = height::projective(&coords)?;
                // null when the canonical sign flip leaves i64
                let canonical = height::ProjectivePoint::new(&coords).ok();
                json!({ "canonical": canonical, "height": height })
            }
            HeightQuery::Enumerate { a, c, bound_h } => {
                let curve = height::CurveEquation { a, c };
                let found = height::enumerate_with(&curve, bound_h, &config.height)?;
                json!({ "curve": curve.to_string(), "result": found })
            }
            HeightQuery::Grid { max_abs } => {
                let dist = height::grid_distribution_with(max_abs, &config.height)?;
                json!({ "max_abs": max_abs, "stats": dist.stats, "samples": dist.samples })
            }
        },
        Command::Frobenioid { n_max } => {
            json!({ "table": frobenioid::table_with(n_max, &config.frobenioid)? })
        }
        Command::All => {
            let report = run_all(&config);
            println!("{}", serde_json::to_string_pretty(&report)?);
            let failed = report.failure_count();
            if failed > 0 {
                eprintln!("{failed} section(s) failed.");
                process::exit(1);
            }
            info!("all sections passed");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
