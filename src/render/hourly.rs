use crate::error::Result;
use crate::models::FrequencyTable;
use plotters::prelude::*;
use std::path::Path;

use super::palette::{HOURLY_BAR, HOURLY_DENSITY};
use super::FONT_FAMILY;

/// Hourly message bars with the density curve on a second y-axis
pub fn render_hourly(
    hourly: &FrequencyTable<u32>,
    density: &[(f64, f64)],
    title: &str,
    path: &Path,
) -> Result<()> {
    let max_count = hourly.counts().max().unwrap_or(0) as f64;
    let max_density = density.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    let x_range = -0.5_f64..23.5_f64;

    let root = BitMapBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), 0.0..(max_count * 1.1).max(1.0))?
        .set_secondary_coord(x_range.clone(), 0.0..(max_density * 1.1).max(1e-3));

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(24)
        .x_label_formatter(&|x| format!("{}", x.round() as i64))
        .x_desc("Hour of the Day")
        .y_desc("Frequency")
        .label_style((FONT_FAMILY, 14))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Density")
        .label_style((FONT_FAMILY, 14))
        .draw()?;

    chart.draw_series(hourly.entries().iter().map(|(hour, count)| {
        let h = f64::from(*hour);
        Rectangle::new([(h - 0.4, 0.0), (h + 0.4, *count as f64)], HOURLY_BAR.filled())
    }))?;

    if !density.is_empty() {
        chart.draw_secondary_series(LineSeries::new(
            density
                .iter()
                .copied()
                .filter(|(x, _)| x_range.contains(x)),
            HOURLY_DENSITY.stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(())
}
