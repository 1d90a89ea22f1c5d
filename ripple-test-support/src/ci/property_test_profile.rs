//! Environment overrides for property-based test runs.
//!
//! CI raises the case count on scheduled jobs while local runs keep the
//! suite defaults. Every property suite reads the same variables through
//! [`PropertyRunProfile::from_env`].

use std::env;

/// Overrides the number of cases each property runs.
pub const CASES_ENV_KEY: &str = "RIPPLE_PBT_CASES";
/// Overrides the shrink iteration limit applied after a failure.
pub const MAX_SHRINK_ITERS_ENV_KEY: &str = "RIPPLE_PBT_MAX_SHRINK_ITERS";

const DEFAULT_MAX_SHRINK_ITERS: u32 = 1024;

/// Resolved run settings for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyRunProfile {
    cases: u32,
    max_shrink_iters: u32,
}

impl PropertyRunProfile {
    /// Reads overrides from the environment, falling back to `default_cases`
    /// and the built-in shrink limit. Malformed or zero overrides are logged
    /// and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ripple_test_support::ci::property_test_profile::PropertyRunProfile;
    ///
    /// let profile = PropertyRunProfile::from_env(32);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn from_env(default_cases: u32) -> Self {
        Self {
            cases: positive_override(CASES_ENV_KEY).unwrap_or(default_cases),
            max_shrink_iters: positive_override(MAX_SHRINK_ITERS_ENV_KEY)
                .unwrap_or(DEFAULT_MAX_SHRINK_ITERS),
        }
    }

    /// Cases to run per property.
    #[must_use]
    pub const fn cases(&self) -> u32 {
        self.cases
    }

    /// Upper bound on shrink iterations.
    #[must_use]
    pub const fn max_shrink_iters(&self) -> u32 {
        self.max_shrink_iters
    }
}

fn positive_override(key: &'static str) -> Option<u32> {
    let raw = env::var(key).ok()?;
    match parse_positive(&raw) {
        Ok(value) => Some(value),
        Err(reason) => {
            tracing::warn!(env = key, raw = %raw, reason = %reason, "ignoring property-test override");
            None
        }
    }
}

fn parse_positive(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("value must be at least 1".to_owned()),
        Ok(value) => Ok(value),
        Err(error) => Err(format!("parse error: {error}")),
    }
}
