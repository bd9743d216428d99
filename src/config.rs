//! Validated run configuration, independent of how the values were sourced.

use thiserror::Error;

pub const DEFAULT_THRESHOLD: f64 = 5.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("starting year {start} must be less than or equal to ending year {end}")]
    YearOrder { start: i32, end: i32 },
    #[error("threshold must be a finite, non-negative percentage (got {0})")]
    Threshold(f64),
    #[error("municipality id must not be empty")]
    EmptyMunicipality,
}

/// Mode A: trend report over an inclusive year range.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendConfig {
    pub years: Vec<i32>,
    /// Restrict to one municipality id; `None` means all.
    pub municipality: Option<String>,
}

impl TrendConfig {
    pub fn new(
        start_year: i32,
        end_year: i32,
        municipality: Option<String>,
    ) -> Result<Self, ConfigError> {
        if start_year > end_year {
            return Err(ConfigError::YearOrder {
                start: start_year,
                end: end_year,
            });
        }
        let municipality = match municipality {
            Some(id) if id.trim().is_empty() => return Err(ConfigError::EmptyMunicipality),
            other => other.map(|id| id.trim().to_string()),
        };
        Ok(Self {
            years: (start_year..=end_year).collect(),
            municipality,
        })
    }
}

/// Modes B and C: year-pair delta listing for one municipality.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareConfig {
    pub municipality: String,
    pub year1: i32,
    pub year2: i32,
    pub policy: DeltaPolicy,
}

impl CompareConfig {
    pub fn new(
        municipality: &str,
        year1: i32,
        year2: i32,
        threshold: f64,
        whole_ceiling: u32,
    ) -> Result<Self, ConfigError> {
        let municipality = municipality.trim();
        if municipality.is_empty() {
            return Err(ConfigError::EmptyMunicipality);
        }
        Ok(Self {
            municipality: municipality.to_string(),
            year1,
            year2,
            policy: DeltaPolicy::new(threshold, whole_ceiling)?,
        })
    }
}

/// Inclusion policy for the delta listing.
///
/// A KPI qualifies when its percent change is defined, non-zero and within
/// `threshold` (inclusive), or, with `whole_ceiling > 0`, when both values are
/// whole numbers no larger than the ceiling and they differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaPolicy {
    pub threshold: f64,
    pub whole_ceiling: u32,
}

impl DeltaPolicy {
    pub fn new(threshold: f64, whole_ceiling: u32) -> Result<Self, ConfigError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Threshold(threshold));
        }
        Ok(Self {
            threshold,
            whole_ceiling,
        })
    }
}

impl Default for DeltaPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            whole_ceiling: 0,
        }
    }
}

/// Mode D: cross-municipality summary for a year pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryConfig {
    pub year1: i32,
    pub year2: i32,
}
