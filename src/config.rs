//! Solver options.
//!
//! Every option has a default, so partial documents deserialize cleanly:
//!
//! ```
//! use equilibria::config::Config;
//!
//! let config: Config = serde_json::from_str(r#"{ "matching": { "max_rounds": 50 } }"#).unwrap();
//!
//! assert_eq!(config.matching.max_rounds, 50);
//! assert_eq!(config.matching.price_step, 1);
//! assert_eq!(config.equilibrium.max_iterations, 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for the traffic equilibrium solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibriumOptions {
    /// Maximum number of flow-shifting iterations.
    pub max_iterations: usize,
    /// Fraction of the slowest path's flow moved to the fastest path per iteration.
    pub shift_fraction: f64,
}

impl Default for EquilibriumOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            shift_fraction: 0.1,
        }
    }
}

impl EquilibriumOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidOption(
                "max_iterations must be at least 1".to_owned(),
            ));
        }

        if !(self.shift_fraction > 0.0 && self.shift_fraction <= 1.0) {
            return Err(Error::InvalidOption(format!(
                "shift_fraction must be in (0, 1], found {}",
                self.shift_fraction
            )));
        }

        Ok(())
    }
}

/// Options for the market-clearing matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingOptions {
    /// Rounds allowed before giving up with [`Error::NonConvergence`].
    pub max_rounds: usize,
    /// Price increase applied to a seller for every pair of buyers contesting it.
    pub price_step: i64,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            max_rounds: 10_000,
            price_step: 1,
        }
    }
}

impl MatchingOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(Error::InvalidOption(
                "max_rounds must be at least 1".to_owned(),
            ));
        }

        if self.price_step < 1 {
            return Err(Error::InvalidOption(format!(
                "price_step must be at least 1, found {}",
                self.price_step
            )));
        }

        Ok(())
    }
}

/// Options for every solver a [`Session`](crate::session::Session) runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub equilibrium: EquilibriumOptions,
    pub matching: MatchingOptions,
}
