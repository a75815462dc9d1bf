//! Core data types for flowcode-rs
//!
//! # Main Types
//!
//! - [`NumericSequence`] - The data flowing between chain stages
//! - [`PlotSeries`] - A sequence prepared for display on an ordinal x axis

use serde::{Deserialize, Serialize};

/// Ordered floating-point values flowing between chain stages.
///
/// May be empty after a filter, or hold a single value after a reduction.
pub type NumericSequence = Vec<f64>;

/// Legend name used when none is given.
pub const DEFAULT_SERIES_NAME: &str = "data";

/// A line series handed to a renderer.
///
/// The x axis is ordinal: `1..=n` for a sequence of `n` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    /// Chart title
    pub title: String,
    /// Series name shown in the legend
    pub name: String,
    /// Ordinal x values (1-based)
    pub x: Vec<u32>,
    /// Values to plot
    pub y: Vec<f64>,
}

impl PlotSeries {
    /// Build a series from a sequence with x values `1..=n`.
    pub fn from_sequence(title: impl Into<String>, values: &[f64]) -> Self {
        Self {
            title: title.into(),
            name: DEFAULT_SERIES_NAME.to_string(),
            x: (1..=values.len() as u32).collect(),
            y: values.to_vec(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// `(x, y)` pairs for plotting.
    pub fn points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Minimum and maximum of the finite values, if any.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.y
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
