use crate::error::{ChatStatsError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::path::Path;

use super::palette::SKY_BLUE;
use super::FONT_FAMILY;

/// Shape of a frequency chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bars in entry order
    Bar,
    /// One row per entry, first entry on top
    HorizontalBar,
    /// Slices counter-clockwise from the start angle
    Pie,
}

/// How to draw one frequency table
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub size: (u32, u32),
    pub colors: Vec<RGBColor>,
    /// Bar charts label every `label_step`-th bucket
    pub label_step: usize,
    /// Extra lines drawn in the top-left corner
    pub annotations: Vec<String>,
    /// Pie slice offsets as a fraction of the radius
    pub explode: Vec<f64>,
    /// Pie start angle in degrees, counter-clockwise from three o'clock
    pub start_angle: f64,
    pub shadow: bool,
    pub legend: bool,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_desc: String::new(),
            y_desc: String::new(),
            size: (1000, 800),
            colors: vec![SKY_BLUE],
            label_step: 1,
            annotations: Vec::new(),
            explode: Vec::new(),
            start_angle: 0.0,
            shadow: false,
            legend: false,
        }
    }

    #[must_use]
    pub fn bar(title: impl Into<String>) -> Self {
        Self::new(ChartKind::Bar, title)
    }

    #[must_use]
    pub fn horizontal_bar(title: impl Into<String>) -> Self {
        Self::new(ChartKind::HorizontalBar, title)
    }

    #[must_use]
    pub fn pie(title: impl Into<String>) -> Self {
        Self::new(ChartKind::Pie, title)
    }

    #[must_use]
    pub fn axes(mut self, x_desc: impl Into<String>, y_desc: impl Into<String>) -> Self {
        self.x_desc = x_desc.into();
        self.y_desc = y_desc.into();
        self
    }

    #[must_use]
    pub const fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    #[must_use]
    pub fn colors(mut self, colors: &[RGBColor]) -> Self {
        self.colors = colors.to_vec();
        self
    }

    #[must_use]
    pub fn label_step(mut self, step: usize) -> Self {
        self.label_step = step.max(1);
        self
    }

    #[must_use]
    pub fn annotate(mut self, line: impl Into<String>) -> Self {
        self.annotations.push(line.into());
        self
    }

    #[must_use]
    pub fn explode(mut self, offsets: Vec<f64>) -> Self {
        self.explode = offsets;
        self
    }

    #[must_use]
    pub const fn start_angle(mut self, degrees: f64) -> Self {
        self.start_angle = degrees;
        self
    }

    #[must_use]
    pub const fn shadow(mut self, on: bool) -> Self {
        self.shadow = on;
        self
    }

    #[must_use]
    pub const fn legend(mut self, on: bool) -> Self {
        self.legend = on;
        self
    }

    fn color(&self, i: usize) -> RGBColor {
        if self.colors.is_empty() {
            SKY_BLUE
        } else {
            self.colors[i % self.colors.len()]
        }
    }
}

/// Draw a labelled frequency table as `spec` describes and write it to `path`
pub fn render_frequency(entries: &[(String, usize)], spec: &ChartSpec, path: &Path) -> Result<()> {
    if entries.is_empty() {
        return Err(ChatStatsError::Render(format!(
            "Nothing to draw for '{}'",
            spec.title
        )));
    }

    let root = BitMapBackend::new(path, spec.size).into_drawing_area();
    root.fill(&WHITE)?;

    match spec.kind {
        ChartKind::Bar => draw_bars(&root, entries, spec)?,
        ChartKind::HorizontalBar => draw_horizontal_bars(&root, entries, spec)?,
        ChartKind::Pie => draw_pie(&root, entries, spec)?,
    }

    root.present()?;
    Ok(())
}

fn draw_bars(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    entries: &[(String, usize)],
    spec: &ChartSpec,
) -> Result<()> {
    let n = entries.len();
    let max = entries.iter().map(|(_, c)| *c).max().unwrap_or(0) as u32;
    let y_top = max + max / 10 + 1;
    let color = spec.color(0);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n as i32).into_segmented(), 0..y_top)?;

    let label_at = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) if *i >= 0 && (*i as usize) % spec.label_step == 0 => {
            entries.get(*i as usize).map(|(l, _)| l.clone()).unwrap_or_default()
        }
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .x_labels(n)
        .x_label_formatter(&label_at)
        .x_label_style((FONT_FAMILY, 10))
        .y_label_style((FONT_FAMILY, 14))
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, (_, count))| {
        let x0 = SegmentValue::Exact(i as i32);
        let x1 = SegmentValue::Exact(i as i32 + 1);
        let mut bar = Rectangle::new([(x0, 0), (x1, *count as u32)], color.filled());
        bar.set_margin(0, 0, 1, 1);
        bar
    }))?;

    draw_annotations(root, &spec.annotations)
}

fn draw_horizontal_bars(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    entries: &[(String, usize)],
    spec: &ChartSpec,
) -> Result<()> {
    let n = entries.len();
    let max = entries.iter().map(|(_, c)| *c).max().unwrap_or(0) as u32;
    let x_right = max + max / 10 + 1;
    let color = spec.color(0);

    // Row 0 is the bottom of the chart; the first entry goes on top
    let row_of = |i: usize| (n - 1 - i) as i32;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d(0..x_right, (0..n as i32).into_segmented())?;

    let label_at = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(row) if *row >= 0 && (*row as usize) < n => {
            entries[n - 1 - *row as usize].0.clone()
        }
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .y_labels(n)
        .y_label_formatter(&label_at)
        .label_style((FONT_FAMILY, 16))
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, (_, count))| {
        let y0 = SegmentValue::Exact(row_of(i));
        let y1 = SegmentValue::Exact(row_of(i) + 1);
        let mut bar = Rectangle::new([(0, y0), (*count as u32, y1)], color.filled());
        bar.set_margin(2, 2, 0, 0);
        bar
    }))?;

    Ok(())
}

/// Angles of each slice in radians: (start, sweep)
pub(crate) fn slice_angles(counts: &[usize], start_degrees: f64) -> Vec<(f64, f64)> {
    let total: usize = counts.iter().sum();
    let mut angle = start_degrees.to_radians();
    counts
        .iter()
        .map(|c| {
            let sweep = if total == 0 {
                0.0
            } else {
                *c as f64 / total as f64 * 2.0 * PI
            };
            let slice = (angle, sweep);
            angle += sweep;
            slice
        })
        .collect()
}

fn draw_pie(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    entries: &[(String, usize)],
    spec: &ChartSpec,
) -> Result<()> {
    let (width, height) = root.dim_in_pixel();
    let title_style = TextStyle::from((FONT_FAMILY, 28).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(spec.title.clone(), (width as i32 / 2, 15), title_style))?;

    let legend_width = if spec.legend { 180 } else { 0 };
    let center = (
        (width as i32 - legend_width) / 2,
        height as i32 / 2 + 20,
    );
    let radius = f64::from(width.saturating_sub(legend_width as u32).min(height)) * 0.33;

    let counts: Vec<usize> = entries.iter().map(|(_, c)| *c).collect();
    let total: usize = counts.iter().sum();
    let angles = slice_angles(&counts, spec.start_angle);

    // Screen y grows downwards, so subtract the sine to turn counter-clockwise
    let point = |origin: (f64, f64), r: f64, theta: f64| {
        (
            r.mul_add(theta.cos(), origin.0) as i32,
            r.mul_add(-theta.sin(), origin.1) as i32,
        )
    };

    let label_style = TextStyle::from((FONT_FAMILY, 18).into_font()).pos(Pos::new(HPos::Center, VPos::Center));

    for (i, ((label, count), (start, sweep))) in entries.iter().zip(&angles).enumerate() {
        if *count == 0 {
            continue;
        }
        let mid = start + sweep / 2.0;
        let offset = spec.explode.get(i).copied().unwrap_or(0.0) * radius;
        let origin = (
            offset.mul_add(mid.cos(), f64::from(center.0)),
            offset.mul_add(-mid.sin(), f64::from(center.1)),
        );

        let steps = ((sweep * 60.0).ceil() as usize).max(2);
        let mut points = vec![(origin.0 as i32, origin.1 as i32)];
        points.extend((0..=steps).map(|j| {
            let theta = start + sweep * j as f64 / steps as f64;
            point(origin, radius, theta)
        }));

        if spec.shadow {
            let shift = (radius * 0.03) as i32;
            let shadow: Vec<(i32, i32)> = points.iter().map(|(x, y)| (x + shift, y + shift)).collect();
            root.draw(&Polygon::new(shadow, BLACK.mix(0.25).filled()))?;
        }
        root.draw(&Polygon::new(points, spec.color(i).filled()))?;

        let percent = *count as f64 * 100.0 / total as f64;
        root.draw(&Text::new(
            format!("{percent:.1}%"),
            point(origin, radius * 0.6, mid),
            label_style.clone(),
        ))?;
        root.draw(&Text::new(
            label.clone(),
            point(origin, radius * 1.15, mid),
            label_style.clone(),
        ))?;
    }

    if spec.legend {
        let x = width as i32 - legend_width + 20;
        let legend_style = TextStyle::from((FONT_FAMILY, 16).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
        for (i, (label, _)) in entries.iter().enumerate() {
            let y = 80 + i as i32 * 28;
            root.draw(&Rectangle::new([(x, y - 8), (x + 16, y + 8)], spec.color(i).filled()))?;
            root.draw(&Text::new(label.clone(), (x + 24, y), legend_style.clone()))?;
        }
    }

    Ok(())
}

fn draw_annotations(root: &DrawingArea<BitMapBackend<'_>, Shift>, lines: &[String]) -> Result<()> {
    let style = TextStyle::from((FONT_FAMILY, 14).into_font()).color(&BLACK);
    for (i, line) in lines.iter().enumerate() {
        root.draw(&Text::new(line.clone(), (100, 60 + i as i32 * 20), style.clone()))?;
    }
    Ok(())
}
