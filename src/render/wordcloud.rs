//! Word cloud layout and drawing.
//!
//! Font sizes follow the relative frequency of each word: every word is drawn
//! at `(0.5 * freq / prev_freq + 0.5) * prev_size`, starting from the maximum
//! font size. Words are placed along an Archimedean spiral that starts at a
//! seeded random point; a word that finds no free spot is retried smaller
//! until it drops below the minimum font size, at which point the layout
//! stops.

use crate::config::WordCloudConfig;
use crate::error::{ChatStatsError, Result};
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use super::palette::{hex_color, VIRIDIS};
use super::FONT_FAMILY;

const RELATIVE_SCALING: f64 = 0.5;
const SPIRAL_STEP: f64 = 0.1;

/// Word cloud parameters
#[derive(Debug, Clone)]
pub struct CloudOptions {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub max_font_size: u32,
    pub min_font_size: u32,
    pub background: RGBColor,
    pub seed: u64,
}

impl From<&WordCloudConfig> for CloudOptions {
    fn from(config: &WordCloudConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            max_words: config.max_words,
            max_font_size: config.max_font_size,
            min_font_size: config.min_font_size,
            background: hex_color(&config.background),
            seed: config.seed,
        }
    }
}

/// A word with its final size, position and colour
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: u32,
    /// Top-left corner in pixels
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: RGBColor,
}

impl PlacedWord {
    fn overlaps(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        x < self.x + self.width as i32
            && self.x < x + width as i32
            && y < self.y + self.height as i32
            && self.y < y + height as i32
    }
}

/// Place words on the canvas
///
/// `frequencies` must be sorted most frequent first. `measure` returns the
/// pixel box of a word at a font size, or `None` if it cannot be measured.
pub fn layout_words<M>(frequencies: &[(String, usize)], options: &CloudOptions, measure: M) -> Vec<PlacedWord>
where
    M: Fn(&str, u32) -> Option<(u32, u32)>,
{
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut placed: Vec<PlacedWord> = Vec::new();

    let Some(max_freq) = frequencies.first().map(|(_, c)| *c as f64) else {
        return placed;
    };
    let canvas_w = options.width as i32;
    let canvas_h = options.height as i32;
    let max_radius = f64::from(options.width.max(options.height));

    let mut font_size = f64::from(options.max_font_size);
    let mut last_freq = 1.0;

    for (word, count) in frequencies.iter().take(options.max_words) {
        let freq = *count as f64 / max_freq;
        if !placed.is_empty() {
            font_size = (RELATIVE_SCALING * (freq / last_freq) + (1.0 - RELATIVE_SCALING)) * font_size;
            font_size = font_size.round();
        }

        let mut size = font_size.min(f64::from(options.max_font_size)) as u32;
        let spot = loop {
            if size < options.min_font_size {
                break None;
            }
            let Some((w, h)) = measure(word, size) else {
                break None;
            };
            if w <= options.width && h <= options.height {
                let start = (
                    rng.gen_range(0..=(canvas_w - w as i32)),
                    rng.gen_range(0..=(canvas_h - h as i32)),
                );
                if let Some((x, y)) = spiral_search(start, (w, h), (canvas_w, canvas_h), max_radius, &placed) {
                    break Some((x, y, w, h));
                }
            }
            size -= (size / 8).max(1);
        };

        let Some((x, y, w, h)) = spot else {
            // Later words are no larger, so nothing else fits either
            break;
        };

        font_size = f64::from(size);
        last_freq = freq;
        placed.push(PlacedWord {
            word: word.clone(),
            font_size: size,
            x,
            y,
            width: w,
            height: h,
            color: VIRIDIS[rng.gen_range(0..VIRIDIS.len())],
        });
    }

    placed
}

fn spiral_search(
    start: (i32, i32),
    (w, h): (u32, u32),
    (canvas_w, canvas_h): (i32, i32),
    max_radius: f64,
    placed: &[PlacedWord],
) -> Option<(i32, i32)> {
    let mut theta: f64 = 0.0;
    loop {
        let radius = 2.0 * theta;
        if radius > max_radius {
            return None;
        }
        let x = start.0 + (radius * theta.cos()) as i32;
        let y = start.1 + (radius * theta.sin()) as i32;
        let inside = x >= 0 && y >= 0 && x + w as i32 <= canvas_w && y + h as i32 <= canvas_h;
        if inside && !placed.iter().any(|p| p.overlaps(x, y, w, h)) {
            return Some((x, y));
        }
        theta += SPIRAL_STEP;
    }
}

/// Draw a word cloud of `frequencies` to `path`
pub fn render_word_cloud(frequencies: &[(String, usize)], options: &CloudOptions, path: &Path) -> Result<usize> {
    if frequencies.is_empty() {
        return Err(ChatStatsError::Render("Nothing to draw for the word cloud".to_string()));
    }

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&options.background)?;

    let measure = |word: &str, size: u32| {
        let style = TextStyle::from((FONT_FAMILY, f64::from(size)).into_font());
        root.estimate_text_size(word, &style).ok()
    };
    let words = layout_words(frequencies, options, measure);

    for placed in &words {
        let style = TextStyle::from((FONT_FAMILY, f64::from(placed.font_size)).into_font()).color(&placed.color);
        root.draw(&Text::new(placed.word.as_str(), (placed.x, placed.y), style))?;
    }

    root.present()?;
    Ok(words.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CloudOptions {
        CloudOptions {
            width: 400,
            height: 300,
            max_words: 50,
            max_font_size: 60,
            min_font_size: 4,
            background: RGBColor(255, 255, 255),
            seed: 7,
        }
    }

    fn fake_measure(word: &str, size: u32) -> Option<(u32, u32)> {
        Some((word.chars().count() as u32 * size, size))
    }

    fn frequencies() -> Vec<(String, usize)> {
        (0..30)
            .map(|i| (format!("词语{i}"), 100 - i * 3))
            .collect()
    }

    #[test]
    fn test_layout_stays_inside_and_does_not_overlap() {
        let opts = options();
        let words = layout_words(&frequencies(), &opts, fake_measure);
        assert!(!words.is_empty());
        for (i, a) in words.iter().enumerate() {
            assert!(a.x >= 0 && a.y >= 0);
            assert!(a.x + a.width as i32 <= opts.width as i32);
            assert!(a.y + a.height as i32 <= opts.height as i32);
            for b in &words[i + 1..] {
                assert!(!a.overlaps(b.x, b.y, b.width, b.height), "{} overlaps {}", a.word, b.word);
            }
        }
    }

    #[test]
    fn test_layout_sizes_do_not_grow() {
        let words = layout_words(&frequencies(), &options(), fake_measure);
        assert!(words[0].font_size <= 60);
        assert!(words.windows(2).all(|w| w[0].font_size >= w[1].font_size));
    }

    #[test]
    fn test_layout_respects_max_words() {
        let mut opts = options();
        opts.max_words = 3;
        assert!(layout_words(&frequencies(), &opts, fake_measure).len() <= 3);
    }

    #[test]
    fn test_layout_is_deterministic_for_a_seed() {
        let a = layout_words(&frequencies(), &options(), fake_measure);
        let b = layout_words(&frequencies(), &options(), fake_measure);
        assert_eq!(a, b);
    }
}
