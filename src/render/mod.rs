//! Chart rendering with plotters.
//!
//! Every chart is a PNG written by the bitmap backend. Text is drawn with the
//! font file from the configuration, registered once under the
//! [`FONT_FAMILY`] name so that CJK labels render.

mod chart;
mod heatmap;
mod hourly;
pub mod palette;
pub mod wordcloud;

pub use chart::{render_frequency, ChartKind, ChartSpec};
pub use heatmap::{calendar_cells, render_calendar_heatmap, CalendarCell};
pub use hourly::render_hourly;
pub use wordcloud::{layout_words, render_word_cloud, CloudOptions, PlacedWord};

use crate::error::{ChatStatsError, Result};
use plotters::style::FontStyle;
use std::path::Path;
use tracing::debug;

/// Font family every chart draws with
pub const FONT_FAMILY: &str = "sans-serif";

/// Load a TTF/OTF file and make it the chart font
///
/// The font bytes live for the rest of the process; plotters keeps a
/// reference in its global font table.
pub fn register_font(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).map_err(|e| {
        ChatStatsError::Font(format!("Failed to read font {}: {e}", path.display()))
    })?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());

    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
        ChatStatsError::Font(format!("Not a usable font file: {}", path.display()))
    })?;

    debug!("Registered chart font {}", path.display());
    Ok(())
}
