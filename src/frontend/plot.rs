//! Result rendering
//!
//! # Main Types
//!
//! - [`Renderer`] - Anything that can display a [`PlotSeries`]
//! - [`TextRenderer`] - Writes the series as a plain-text table

use crate::types::PlotSeries;
use std::io::Write;

/// Displays processing results as a line series
#[cfg_attr(test, mockall::automock)]
pub trait Renderer {
    /// Replace whatever is displayed with `series`
    fn render(&mut self, series: &PlotSeries);

    /// Remove the displayed series
    fn clear(&mut self);
}

/// Renders a series as text to any writer
///
/// Write failures are logged and otherwise ignored; rendering never fails
/// the run that produced the data.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    writer: W,
    /// Number of fractional digits printed for y values
    precision: usize,
    last: Option<PlotSeries>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            precision: 6,
            last: None,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// The series currently displayed
    pub fn last(&self) -> Option<&PlotSeries> {
        self.last.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_series(&mut self, series: &PlotSeries) -> std::io::Result<()> {
        writeln!(self.writer, "== {} ({}) ==", series.title, series.name)?;
        if series.is_empty() {
            writeln!(self.writer, "(no data)")?;
            return Ok(());
        }
        writeln!(self.writer, "{:>6}  {}", "x", "y")?;
        for (x, y) in series.points() {
            writeln!(self.writer, "{:>6}  {:.*}", x, self.precision, y)?;
        }
        self.writer.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, series: &PlotSeries) {
        if let Err(e) = self.write_series(series) {
            tracing::warn!("Failed to render series {:?}: {}", series.title, e);
        }
        self.last = Some(series.clone());
    }

    fn clear(&mut self) {
        self.last = None;
    }
}
