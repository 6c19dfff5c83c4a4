use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    pub logging: LoggingConfig,
    pub analysis: AnalysisConfig,
    pub word_cloud: WordCloudConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub chat_csv: PathBuf,
    pub stop_words: PathBuf,
    pub font: PathBuf,
    pub text_record_type: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub top_words: usize,
    pub date_label_step: usize,
    pub density_points: usize,
    pub self_label: String,
    pub other_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudConfig {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub max_font_size: u32,
    pub min_font_size: u32,
    pub background: String,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub write_summary: bool,
}

/// Values given on the command line; they win over every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub chat_csv: Option<PathBuf>,
    pub stop_words: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                chat_csv: PathBuf::from("data/chat.csv"),
                stop_words: PathBuf::from("data/stopwords_hit.txt"),
                font: PathBuf::from("data/font.ttf"),
                text_record_type: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            analysis: AnalysisConfig {
                top_words: 30,
                date_label_step: 7,
                density_points: 200,
                self_label: "Me".to_string(),
                other_label: "Them".to_string(),
            },
            word_cloud: WordCloudConfig {
                width: 800,
                height: 600,
                max_words: 200,
                max_font_size: 100,
                min_font_size: 4,
                background: "#FFFFFF".to_string(),
                seed: 42,
            },
            output: OutputConfig {
                directory: PathBuf::from("./output"),
                write_summary: false,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default`, `config/local` and `config` files,
    /// then `config_file`, then `CHAT_STATS__*` environment variables, then
    /// `overrides`.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Add environment variables with prefix
        builder = builder.add_source(
            Environment::with_prefix("CHAT_STATS")
                .prefix_separator("__")
                .separator("__"),
        );

        if let Some(path) = &overrides.chat_csv {
            builder = builder.set_override("input.chat_csv", path.to_string_lossy().into_owned())?;
        }
        if let Some(path) = &overrides.stop_words {
            builder = builder.set_override("input.stop_words", path.to_string_lossy().into_owned())?;
        }
        if let Some(path) = &overrides.font {
            builder = builder.set_override("input.font", path.to_string_lossy().into_owned())?;
        }
        if let Some(path) = &overrides.output_dir {
            builder = builder.set_override("output.directory", path.to_string_lossy().into_owned())?;
        }
        if let Some(level) = &overrides.log_level {
            builder = builder.set_override("logging.level", level.clone())?;
        }

        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate analysis config
        if self.analysis.top_words == 0 {
            return Err(anyhow::anyhow!("top_words must be greater than 0"));
        }
        if self.analysis.date_label_step == 0 {
            return Err(anyhow::anyhow!("date_label_step must be greater than 0"));
        }
        if self.analysis.density_points < 2 {
            return Err(anyhow::anyhow!("density_points must be at least 2"));
        }

        // Validate word cloud config
        let cloud = &self.word_cloud;
        if cloud.width == 0 || cloud.height == 0 {
            return Err(anyhow::anyhow!("word cloud width and height must be greater than 0"));
        }
        if cloud.max_words == 0 {
            return Err(anyhow::anyhow!("max_words must be greater than 0"));
        }
        if cloud.min_font_size == 0 {
            return Err(anyhow::anyhow!("min_font_size must be greater than 0"));
        }
        if cloud.min_font_size > cloud.max_font_size {
            return Err(anyhow::anyhow!(
                "min_font_size ({}) cannot exceed max_font_size ({})",
                cloud.min_font_size,
                cloud.max_font_size
            ));
        }
        if parse_hex_color(&cloud.background).is_none() {
            return Err(anyhow::anyhow!(
                "Invalid background colour: {}. Expected #RRGGBB",
                cloud.background
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Log file path, if file logging is enabled
    pub fn log_file(&self) -> Option<&Path> {
        self.logging.file_path.as_deref().map(Path::new)
    }

    /// Render the configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Parse a `#RRGGBB` colour into its channels
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
