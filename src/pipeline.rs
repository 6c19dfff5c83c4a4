//! The analysis pipeline.
//!
//! [`Analyzer`] owns the loaded message table and runs each [`Step`] over
//! it. Steps only read the table; each one writes a single PNG into the
//! output directory, except peak activity which prints to stdout.

use crate::aggregate::{
    daily_frequency, hour_density, hourly_frequency, peak_activity, sender_counts,
    weekday_distribution,
};
use crate::config::AppConfig;
use crate::error::{ChatStatsError, Result};
use crate::loader::{preprocess, read_chat_records};
use crate::logging::OperationTimer;
use crate::metrics::RunMetrics;
use crate::models::MessageTable;
use crate::nlp::{self, load_stop_words, word_frequencies, TextAnalyzer, WordCorpus};
use crate::render::{
    self, palette, render_calendar_heatmap, render_frequency, render_hourly, render_word_cloud,
    ChartSpec, CloudOptions,
};
use crate::report::{write_peak_activity, write_summary, Summary};
use crate::validation::InputValidator;
use chrono::Weekday;
use clap::ValueEnum;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One unit of analysis output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Step {
    DailyFrequency,
    CalendarHeatmap,
    SenderComparison,
    HourlyFrequency,
    WordFrequency,
    WordCloud,
    WeeklyDistribution,
    PeakActivity,
    /// Every step above, in order
    All,
}

impl Step {
    /// The individual steps in the order `All` runs them
    pub const ORDER: [Self; 8] = [
        Self::DailyFrequency,
        Self::CalendarHeatmap,
        Self::SenderComparison,
        Self::HourlyFrequency,
        Self::WordFrequency,
        Self::WordCloud,
        Self::WeeklyDistribution,
        Self::PeakActivity,
    ];

    /// Name used in logs and metric labels
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DailyFrequency => "daily_frequency",
            Self::CalendarHeatmap => "calendar_heatmap",
            Self::SenderComparison => "sender_comparison",
            Self::HourlyFrequency => "hourly_frequency",
            Self::WordFrequency => "word_frequency",
            Self::WordCloud => "word_cloud",
            Self::WeeklyDistribution => "weekly_distribution",
            Self::PeakActivity => "peak_activity",
            Self::All => "all",
        }
    }
}

/// Whose messages a word query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Audience {
    /// Everyone
    All,
    /// The exporting user
    #[value(name = "self")]
    SelfUser,
    /// The other side
    Other,
}

impl Audience {
    /// Name used in file names and metric labels
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::SelfUser => "self",
            Self::Other => "other",
        }
    }

    fn tokens(self, corpus: &WordCorpus) -> &[String] {
        match self {
            Self::All => &corpus.all,
            Self::SelfUser => &corpus.self_user,
            Self::Other => &corpus.other,
        }
    }
}

/// Runs analysis steps over one chat export
pub struct Analyzer {
    config: AppConfig,
    table: MessageTable,
    text: TextAnalyzer,
    corpus: Option<WordCorpus>,
    metrics: RunMetrics,
}

impl Analyzer {
    /// Check inputs, register the chart font, load stop words and messages
    pub fn new(config: AppConfig) -> Result<Self> {
        let input = &config.input;
        InputValidator::validate_input_file("Chat export", &input.chat_csv)?;
        InputValidator::validate_input_file("Stop-word list", &input.stop_words)?;
        InputValidator::validate_input_file("Font file", &input.font)?;
        InputValidator::validate_label(&config.analysis.self_label)?;
        InputValidator::validate_label(&config.analysis.other_label)?;
        InputValidator::validate_output_dir(&config.output.directory)?;

        render::register_font(&input.font)?;

        let mut metrics = RunMetrics::default();
        let stop_words = load_stop_words(&input.stop_words)?;
        metrics.record_stop_words(stop_words.len());
        let text = TextAnalyzer::new(stop_words)?;

        let records = read_chat_records(&input.chat_csv)?;
        let raw_rows = records.len();
        let table = preprocess(records, input.text_record_type)?;
        metrics.record_load(raw_rows, table.len());
        info!(
            raw_rows,
            text_messages = table.len(),
            "Loaded chat export {}",
            input.chat_csv.display()
        );
        if table.is_empty() {
            return Err(ChatStatsError::EmptyDataset);
        }

        std::fs::create_dir_all(&config.output.directory)?;

        Ok(Self {
            config,
            table,
            text,
            corpus: None,
            metrics,
        })
    }

    /// The loaded messages
    #[must_use]
    pub const fn table(&self) -> &MessageTable {
        &self.table
    }

    /// Counters gathered so far
    #[must_use]
    pub const fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Run one step, or all of them in order
    pub fn run(&mut self, step: Step) -> Result<()> {
        if step == Step::All {
            for step in Step::ORDER {
                self.run_step(step)?;
            }
            if self.config.output.write_summary {
                let path = self.output_path("summary.json");
                self.write_summary(&path)?;
            }
            info!(
                charts = self.metrics.charts_rendered,
                skipped = self.metrics.steps_skipped,
                tokens = self.metrics.tokens_produced,
                "Analysis finished"
            );
            return Ok(());
        }
        self.run_step(step)
    }

    fn run_step(&mut self, step: Step) -> Result<()> {
        let timer = OperationTimer::new(step.name());
        let start = Instant::now();

        let result = match step {
            Step::DailyFrequency => self.daily_frequency(),
            Step::CalendarHeatmap => self.calendar_heatmap(),
            Step::SenderComparison => self.sender_comparison(),
            Step::HourlyFrequency => self.hourly_frequency(),
            Step::WordFrequency => self.word_frequency(),
            Step::WordCloud => self.word_cloud(),
            Step::WeeklyDistribution => self.weekly_distribution(),
            Step::PeakActivity => self.print_peaks(&mut std::io::stdout().lock()).map(|()| 0),
            Step::All => return self.run(Step::All),
        };

        match result {
            Ok(charts) => {
                timer.finish();
                self.metrics.record_step(step.name(), start.elapsed(), charts);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_error(step.name());
                Err(e)
            }
        }
    }

    fn output_path(&self, file_name: &str) -> PathBuf {
        self.config.output.directory.join(file_name)
    }

    fn rendered(path: &Path) -> usize {
        info!("Wrote {}", path.display());
        1
    }

    fn daily_frequency(&self) -> Result<usize> {
        let daily = daily_frequency(&self.table);
        let entries: Vec<(String, usize)> = daily
            .entries()
            .iter()
            .map(|(date, count)| (date.format("%Y-%m-%d").to_string(), *count))
            .collect();

        let mut spec = ChartSpec::bar("Daily Message Frequency")
            .axes("Date", "Frequency")
            .size(1500, 800)
            .colors(&[palette::DAILY_BAR])
            .label_step(self.config.analysis.date_label_step)
            .annotate(format!("Total messages: {}", daily.total()));
        if let Some((first, last)) = self.table.date_span() {
            spec = spec.annotate(format!(
                "Range: {} --- {}",
                first.format("%m-%d"),
                last.format("%m-%d")
            ));
        }

        let path = self.output_path("daily_frequency.png");
        render_frequency(&entries, &spec, &path)?;
        Ok(Self::rendered(&path))
    }

    fn calendar_heatmap(&self) -> Result<usize> {
        let path = self.output_path("calendar_heatmap.png");
        render_calendar_heatmap(&daily_frequency(&self.table), &path)?;
        Ok(Self::rendered(&path))
    }

    fn sender_comparison(&self) -> Result<usize> {
        let counts = sender_counts(&self.table);
        let analysis = &self.config.analysis;
        let entries = vec![
            (analysis.self_label.clone(), counts.self_user),
            (analysis.other_label.clone(), counts.other),
        ];
        debug!(self_user = counts.self_user, other = counts.other, "Sender counts");

        let spec = ChartSpec::pie("Message Count Comparison")
            .colors(&palette::SENDER)
            .explode(vec![0.0, 0.05])
            .start_angle(90.0)
            .shadow(true)
            .legend(true);

        let path = self.output_path("sender_comparison.png");
        render_frequency(&entries, &spec, &path)?;
        Ok(Self::rendered(&path))
    }

    fn hourly_frequency(&self) -> Result<usize> {
        let hourly = hourly_frequency(&self.table);
        let density = hour_density(&hourly, self.config.analysis.density_points);
        if density.is_empty() {
            debug!("Not enough spread in message hours for a density curve");
        }

        let path = self.output_path("hourly_frequency.png");
        render_hourly(&hourly, &density, "Hourly Message Frequency", &path)?;
        Ok(Self::rendered(&path))
    }

    fn corpus(&mut self) -> &WordCorpus {
        if self.corpus.is_none() {
            let corpus = self.text.corpus(&self.table);
            for audience in [Audience::All, Audience::SelfUser, Audience::Other] {
                self.metrics
                    .record_tokens(audience.name(), audience.tokens(&corpus).len());
            }
            self.corpus = Some(corpus);
        }
        self.corpus.get_or_insert_with(WordCorpus::default)
    }

    /// The most frequent words for `audience`
    pub fn top_words(&mut self, audience: Audience, limit: usize) -> Result<Vec<(String, usize)>> {
        InputValidator::validate_limit(limit)?;
        Ok(nlp::top_words(audience.tokens(self.corpus()), limit))
    }

    fn word_frequency(&mut self) -> Result<usize> {
        let limit = self.config.analysis.top_words;
        let mut charts = 0;

        for (audience, title) in [
            (Audience::All, "Top Words".to_string()),
            (
                Audience::SelfUser,
                format!("Top Words: {}", self.config.analysis.self_label),
            ),
            (
                Audience::Other,
                format!("Top Words: {}", self.config.analysis.other_label),
            ),
        ] {
            let top = self.top_words(audience, limit)?;
            if top.is_empty() {
                warn!(audience = audience.name(), "No words left after filtering, skipping chart");
                self.metrics.record_skip(Step::WordFrequency.name());
                continue;
            }

            let spec = ChartSpec::horizontal_bar(title)
                .axes("Frequency", "Word")
                .size(1000, 1500)
                .colors(&[palette::SKY_BLUE]);
            let path = self.output_path(&format!("top_words_{}.png", audience.name()));
            render_frequency(&top, &spec, &path)?;
            charts += Self::rendered(&path);
        }

        Ok(charts)
    }

    fn word_cloud(&mut self) -> Result<usize> {
        let frequencies = word_frequencies(&self.corpus().all);
        if frequencies.is_empty() {
            warn!("No words left after filtering, skipping word cloud");
            self.metrics.record_skip(Step::WordCloud.name());
            return Ok(0);
        }

        let options = CloudOptions::from(&self.config.word_cloud);
        let path = self.output_path("word_cloud.png");
        let placed = render_word_cloud(&frequencies, &options, &path)?;
        debug!(placed, candidates = frequencies.len(), "Word cloud laid out");
        Ok(Self::rendered(&path))
    }

    fn weekly_distribution(&self) -> Result<usize> {
        let weekdays = weekday_distribution(&self.table);
        let entries: Vec<(String, usize)> = weekdays
            .entries()
            .iter()
            .map(|(day, count)| (weekday_name(*day).to_string(), *count))
            .collect();

        let mut explode = vec![0.0; entries.len()];
        let busiest = weekdays.max_entry().map(|(day, _)| *day);
        if let Some(i) = weekdays.keys().position(|d| Some(*d) == busiest) {
            explode[i] = 0.1;
        }

        let spec = ChartSpec::pie("Weekly Message Distribution")
            .colors(&palette::PAIRED)
            .explode(explode)
            .start_angle(140.0);

        let path = self.output_path("weekly_distribution.png");
        render_frequency(&entries, &spec, &path)?;
        Ok(Self::rendered(&path))
    }

    /// Write the peak-activity lines to `writer`
    pub fn print_peaks<W: Write>(&self, writer: &mut W) -> Result<()> {
        let peaks = peak_activity(&self.table)?;
        write_peak_activity(writer, &peaks)
    }

    /// Write every aggregation as JSON to `path`
    pub fn write_summary(&mut self, path: &Path) -> Result<()> {
        let limit = self.config.analysis.top_words;
        let words = self.top_words(Audience::All, limit)?;
        let summary = Summary::build(&self.table, words)?;
        write_summary(path, &summary)?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order_excludes_all() {
        assert!(!Step::ORDER.contains(&Step::All));
        assert_eq!(Step::ORDER[0], Step::DailyFrequency);
        assert_eq!(Step::ORDER[7], Step::PeakActivity);
    }

    #[test]
    fn test_audience_names() {
        assert_eq!(Audience::SelfUser.name(), "self");
        assert_eq!(
            Audience::from_str("self", true).unwrap(),
            Audience::SelfUser
        );
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
