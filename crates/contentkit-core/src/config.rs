//! Renderer and build configuration management.

use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for contentkit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sanitizer settings.
    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    /// Rich-text transform settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Calendar settings.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Batch build settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Which sanitizer implementation backs the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizerBackend {
    /// Allow-list sanitizer over a full HTML5 tree.
    #[default]
    Tree,
    /// Deny-list rewriter over a streaming tokenizer.
    Streaming,
}

impl SanitizerBackend {
    /// Configuration name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Streaming => "streaming",
        }
    }
}

/// Sanitizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Backend selected once at startup.
    #[serde(default)]
    pub backend: SanitizerBackend,
}

/// Rich-text transform configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Query appended to every image source (without the leading `?`).
    #[serde(default = "default_image_query")]
    pub image_query: String,

    /// `class` value marking a line break that only shows on narrow screens.
    #[serde(default = "default_mobile_break_class")]
    pub mobile_break_class: String,
}

/// Calendar configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Display offset from UTC, e.g. `+09:00`.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    /// Default display format (dayjs-style tokens).
    #[serde(default = "default_date_format")]
    pub default_format: String,
}

/// Batch build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding `*.html` content fragments.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Output directory for rendered fragments.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Rich-text field name in JSON content exports.
    #[serde(default = "default_content_field")]
    pub content_field: String,
}

// Default value functions
fn default_image_query() -> String {
    "fm=webp&w=1200".to_string()
}

fn default_mobile_break_class() -> String {
    "only-sp".to_string()
}

fn default_utc_offset() -> String {
    "+09:00".to_string()
}

fn default_date_format() -> String {
    "YYYY.MM.DD".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_content_field() -> String {
    "content".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_query: default_image_query(),
            mobile_break_class: default_mobile_break_class(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            default_format: default_date_format(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            content_field: default_content_field(),
        }
    }
}

impl CalendarConfig {
    /// Parse the configured UTC offset.
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset).ok_or_else(|| {
            CoreError::config(format!(
                "calendar.utc_offset must look like +HH:MM, got '{}'",
                self.utc_offset
            ))
        })
    }
}

/// Parse `Z`, `UTC`, `+HH:MM`, `-HH:MM` or `+HHMM` into a fixed offset.
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 => (rest.get(..2)?, rest.get(2..)?),
        None => return None,
    };
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering
    /// `CONTENTKIT__SECTION__KEY` environment variables over the file.
    ///
    /// A missing file is not an error: defaults plus the environment apply.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(
            path,
            config::Environment::with_prefix("CONTENTKIT").separator("__"),
        )
    }

    fn load_layered(path: &Path, env: config::Environment) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "configuration file not found, using defaults");
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(env)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let query = &self.render.image_query;
        if query.is_empty() {
            return Err(CoreError::config("render.image_query cannot be empty"));
        }
        if query.starts_with('?') {
            return Err(CoreError::config(
                "render.image_query must not start with '?'",
            ));
        }

        let sentinel = &self.render.mobile_break_class;
        if sentinel.is_empty() || sentinel.chars().any(char::is_whitespace) {
            return Err(CoreError::config(
                "render.mobile_break_class must be a single class name",
            ));
        }

        self.calendar.offset()?;
        if self.calendar.default_format.is_empty() {
            return Err(CoreError::config("calendar.default_format cannot be empty"));
        }

        if self.build.content_field.is_empty() {
            return Err(CoreError::config("build.content_field cannot be empty"));
        }

        if self.build.output_dir == self.build.content_dir {
            tracing::warn!(
                dir = %self.build.output_dir,
                "build.output_dir equals build.content_dir; rendered files will sit next to sources"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[sanitizer]
backend = "streaming"

[render]
image_query = "fm=avif&w=800"
mobile_break_class = "sp-only"

[calendar]
utc_offset = "-05:00"
default_format = "YYYY/MM/DD"

[build]
content_dir = "cms"
output_dir = "dist"
content_field = "body"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("contentkit.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.sanitizer.backend, SanitizerBackend::Streaming);
        assert_eq!(config.render.image_query, "fm=avif&w=800");
        assert_eq!(config.render.mobile_break_class, "sp-only");
        assert_eq!(config.calendar.utc_offset, "-05:00");
        assert_eq!(config.calendar.default_format, "YYYY/MM/DD");
        assert_eq!(config.build.content_dir, "cms");
        assert_eq!(config.build.output_dir, "dist");
        assert_eq!(config.build.content_field, "body");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("contentkit.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config, Config::default());
        assert_eq!(config.sanitizer.backend, SanitizerBackend::Tree);
        assert_eq!(config.render.image_query, "fm=webp&w=1200");
        assert_eq!(config.render.mobile_break_class, "only-sp");
        assert_eq!(config.calendar.utc_offset, "+09:00");
        assert_eq!(config.calendar.default_format, "YYYY.MM.DD");
        assert_eq!(config.build.output_dir, "public");
    }

    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("CONTENTKIT")
            .separator("__")
            .source(Some(vars))
    }

    #[test]
    fn test_load_with_env_missing_file() {
        let config = Config::load_layered(Path::new("/nonexistent/contentkit.toml"), env_with(&[]))
            .expect("defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("contentkit.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let env = env_with(&[
            ("CONTENTKIT__RENDER__IMAGE_QUERY", "fm=png"),
            ("CONTENTKIT__SANITIZER__BACKEND", "tree"),
        ]);
        let config = Config::load_layered(&config_path, env).expect("load config");
        assert_eq!(config.render.image_query, "fm=png");
        assert_eq!(config.sanitizer.backend, SanitizerBackend::Tree);
        assert_eq!(config.calendar.utc_offset, "-05:00");
    }

    #[test]
    fn test_env_values_are_validated() {
        let env = env_with(&[("CONTENTKIT__CALENDAR__UTC_OFFSET", "+1é2")]);
        let err = Config::load_layered(Path::new("/nonexistent/contentkit.toml"), env).unwrap_err();
        assert!(err.to_string().contains("utc_offset"));
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("contentkit.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.render.image_query, "fm=avif&w=800");
    }

    #[test]
    fn test_config_validation_query_with_question_mark() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("contentkit.toml");
        std::fs::write(
            &config_path,
            "[render]\nimage_query = \"?fm=webp\"\n",
        )
        .expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("must not start with '?'")
        );
    }

    #[test]
    fn test_config_validation_bad_sentinel() {
        let mut config = Config::default();
        config.render.mobile_break_class = "only sp".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_offset() {
        let mut config = Config::default();
        config.calendar.utc_offset = "Asia/Tokyo".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("utc_offset"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("contentkit.toml");
        std::fs::write(&config_path, "[sanitizer]\nbackend = \"jsdom\"\n").expect("write");

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+09:00").unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(parse_utc_offset("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("09:00").is_none());
        assert!(parse_utc_offset("+24:00").is_none());
        assert!(parse_utc_offset("+9:00").is_none());
        assert!(parse_utc_offset("+1é2").is_none());
        assert!(parse_utc_offset("+é:00").is_none());
        assert!(parse_utc_offset("++1:00").is_none());
        assert!(parse_utc_offset("+-100").is_none());
        assert!(parse_utc_offset("+09:-1").is_none());
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/contentkit.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
