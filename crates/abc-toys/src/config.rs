//! Tunables for the numeric and combinatorial searches.
//!
//! Every bound that keeps a search finite, and every tolerance that makes a
//! floating-point comparison reproducible, lives here instead of in the
//! algorithms. Defaults match the worked examples.
//!
//! ```
//! use abc_toys::config::ToyConfig;
//!
//! let config = ToyConfig::from_json(r#"{ "monodromy": { "max_degree": 4 } }"#)?;
//! assert_eq!(config.monodromy.max_degree, 4);
//! assert_eq!(config.tate.order, 10);
//! # Ok::<(), abc_toys::ToyError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ToyResult;

/// Configuration for the modules that search or compare floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ToyConfig {
    /// Tate curve series and group-law settings.
    pub tate: TateConfig,
    /// Permutation search bounds.
    pub monodromy: MonodromyConfig,
    /// Height search bounds and tolerances.
    pub height: HeightConfig,
    /// Degree table bounds.
    pub frobenioid: FrobenioidConfig,
}

impl ToyConfig {
    /// Parse a JSON document; missing sections and fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ToyError::Config` if the document is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(source: &str) -> ToyResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Tate curve settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TateConfig {
    /// Number of q-expansion terms summed when the caller does not choose.
    pub order: u32,
    /// Comparison tolerance. Coordinate equality in the group law uses it
    /// as an absolute bound; curve membership scales it by `1 + |y²|`.
    pub tolerance: f64,
    /// Largest number of `x` samples a point scan accepts.
    pub max_steps: usize,
}

impl Default for TateConfig {
    fn default() -> Self {
        Self {
            order: 10,
            tolerance: 1e-10,
            max_steps: 100_000,
        }
    }
}

/// Permutation-triple search bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonodromyConfig {
    /// Largest degree `n` accepted by the brute-force search. The search
    /// visits `n!²` pairs: 14 400 at `n = 5`, 518 400 at `n = 6`.
    pub max_degree: usize,
    /// Largest map degree whose fibers are materialized as cycle lists.
    pub max_map_degree: u64,
}

impl Default for MonodromyConfig {
    fn default() -> Self {
        Self {
            max_degree: 5,
            max_map_degree: 100_000,
        }
    }
}

/// Height enumeration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    /// Largest `exp(bound_h)` accepted; caps the `O(B²)` candidate count.
    pub max_search_bound: u64,
    /// How close `sqrt(m)` must be to an integer before the integer is
    /// squared back and compared with `m` exactly.
    pub sqrt_tolerance: f64,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            max_search_bound: 2_000,
            sqrt_tolerance: 1e-9,
        }
    }
}

/// Degree table bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrobenioidConfig {
    /// Largest `n_max` accepted by the degree table; one row per object.
    pub max_n: u32,
}

impl Default for FrobenioidConfig {
    fn default() -> Self {
        Self { max_n: 100_000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = ToyConfig::from_json("{}").unwrap();
        assert_eq!(config, ToyConfig::default());
    }

    #[test]
    fn partial_override() {
        let config =
            ToyConfig::from_json(r#"{ "tate": { "order": 3 }, "height": { "sqrt_tolerance": 1e-6 } }"#)
                .unwrap();
        assert_eq!(config.tate.order, 3);
        assert_eq!(config.tate.tolerance, 1e-10);
        assert_eq!(config.height.sqrt_tolerance, 1e-6);
        assert_eq!(config.height.max_search_bound, 2_000);
        assert_eq!(config.monodromy.max_degree, 5);
        assert_eq!(config.monodromy.max_map_degree, 100_000);
        assert_eq!(config.tate.max_steps, 100_000);
        assert_eq!(config.frobenioid.max_n, 100_000);
    }

    #[test]
    fn allocation_bounds_override() {
        let config = ToyConfig::from_json(
            r#"{ "tate": { "max_steps": 50 }, "frobenioid": { "max_n": 12 } }"#,
        )
        .unwrap();
        assert_eq!(config.tate.max_steps, 50);
        assert_eq!(config.tate.order, 10);
        assert_eq!(config.frobenioid.max_n, 12);
    }

    #[test]
    fn wrong_type_is_config_error() {
        let err = ToyConfig::from_json(r#"{ "monodromy": { "max_degree": "five" } }"#).unwrap_err();
        assert!(matches!(err, crate::ToyError::Config(_)));
    }

    #[test]
    fn round_trips_through_json() {
        let config = ToyConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(ToyConfig::from_json(&text).unwrap(), config);
    }
}
