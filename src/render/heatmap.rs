use crate::error::{ChatStatsError, Result};
use crate::models::FrequencyTable;
use chrono::{Datelike, Duration, NaiveDate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashMap;
use std::path::Path;

use super::palette::heat_color;
use super::FONT_FAMILY;

const CELL: i32 = 18;
const LEFT: i32 = 70;
const TOP: i32 = 60;
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One day of the calendar grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Week column counted from the week holding the first date
    pub column: i32,
    /// Monday is row 0
    pub row: i32,
    pub count: usize,
}

/// Lay out every day from the first to the last date of `daily`
#[must_use]
pub fn calendar_cells(daily: &FrequencyTable<NaiveDate>) -> Vec<CalendarCell> {
    let (Some(first), Some(last)) = (daily.keys().min().copied(), daily.keys().max().copied())
    else {
        return Vec::new();
    };
    let counts: HashMap<NaiveDate, usize> = daily.entries().iter().copied().collect();
    let week_start = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));

    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| CalendarCell {
            date,
            column: ((date - week_start).num_days() / 7) as i32,
            row: date.weekday().num_days_from_monday() as i32,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Draw a horizontal calendar heatmap of daily message counts
pub fn render_calendar_heatmap(daily: &FrequencyTable<NaiveDate>, path: &Path) -> Result<()> {
    let cells = calendar_cells(daily);
    let columns = cells.last().map(|c| c.column + 1).ok_or_else(|| {
        ChatStatsError::Render("Nothing to draw for the calendar heatmap".to_string())
    })?;
    let max = daily.counts().max().unwrap_or(0);

    let width = (LEFT + columns * CELL + 30) as u32;
    let height = (TOP + 7 * CELL + 30) as u32;
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let label = TextStyle::from((FONT_FAMILY, 12).into_font()).color(&BLACK);
    let year_label = TextStyle::from((FONT_FAMILY, 16).into_font()).color(&BLACK);
    let cell_origin = |c: &CalendarCell| (LEFT + c.column * CELL, TOP + c.row * CELL);

    for cell in &cells {
        let (x, y) = cell_origin(cell);
        let mut rect = Rectangle::new(
            [(x, y), (x + CELL, y + CELL)],
            heat_color(cell.count, max).filled(),
        );
        rect.set_margin(1, 1, 1, 1);
        root.draw(&rect)?;
    }

    // Month grid: a line wherever the neighbouring day belongs to another month
    let grid = BLACK.stroke_width(2);
    for cell in &cells {
        let (x, y) = cell_origin(cell);
        let next_week = cell.date + Duration::days(7);
        if cells.last().is_some_and(|l| next_week <= l.date) && next_week.month() != cell.date.month() {
            root.draw(&PathElement::new(vec![(x + CELL, y), (x + CELL, y + CELL)], grid))?;
        }
        let next_day = cell.date + Duration::days(1);
        if cell.row < 6 && next_day.month() != cell.date.month() {
            root.draw(&PathElement::new(vec![(x, y + CELL), (x + CELL, y + CELL)], grid))?;
        }
    }

    // Month and year labels over the column holding the 1st of the month
    for cell in cells.iter().filter(|c| c.date.day() == 1 || c.date == cells[0].date) {
        let x = LEFT + cell.column * CELL;
        let month = MONTH_NAMES[cell.date.month0() as usize];
        root.draw(&Text::new(month, (x, TOP - 16), label.clone()))?;
        if cell.date.month() == 1 || cell.date == cells[0].date {
            root.draw(&Text::new(
                cell.date.year().to_string(),
                (x, TOP - 40),
                year_label.clone(),
            ))?;
        }
    }

    let weekday_style = label.pos(Pos::new(HPos::Right, VPos::Center));
    for (row, name) in WEEKDAY_NAMES.iter().enumerate() {
        let y = TOP + row as i32 * CELL + CELL / 2;
        root.draw(&Text::new(*name, (LEFT - 6, y), weekday_style.clone()))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_calendar_cells_fill_gaps() {
        // 2023-05-03 is a Wednesday
        let daily = FrequencyTable::new(vec![(day("2023-05-03"), 2), (day("2023-05-09"), 5)]);
        let cells = calendar_cells(&daily);
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0].row, 2);
        assert_eq!(cells[0].column, 0);
        assert_eq!(cells[1].count, 0);
        let last = cells.last().unwrap();
        assert_eq!((last.column, last.row, last.count), (1, 1, 5));
    }

    #[test]
    fn test_calendar_cells_empty() {
        let daily: FrequencyTable<NaiveDate> = FrequencyTable::new(Vec::new());
        assert!(calendar_cells(&daily).is_empty());
    }
}
