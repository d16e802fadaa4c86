//! Run-time configuration object + fluent builder.

use std::path::{Path, PathBuf};

use crate::core::{color::AnsiCode, constants::LOG_FILE_NAME, error::ConfigError};

/// Everything the store, aggregator and renderers need to know about their
/// surroundings. Built once at start-up and passed down by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_path: PathBuf,
    pub messages_path: Option<PathBuf>,
    pub color: AnsiCode,
    /// Force plain-text output even on a terminal.
    pub plain: bool,
}

impl AppConfig {
    #[inline]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Where a trend export of `days` days lands by default.
    #[must_use]
    pub fn export_path(&self, days: u32, extension: &str) -> PathBuf {
        self.data_dir.join(format!("trend_last{days}.{extension}"))
    }

    /// Messages file lookup order: explicit path, data dir, working dir.
    #[must_use]
    pub fn message_candidates(&self) -> Vec<PathBuf> {
        let mut out = Vec::with_capacity(4);
        if let Some(p) = &self.messages_path {
            out.push(p.clone());
        }
        out.push(self.data_dir.join("messages.json"));
        out.push(PathBuf::from("messages.json"));
        out.push(PathBuf::from("message.json"));
        out
    }
}

/// Fluent builder; validation happens in `build`.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    data_dir: Option<PathBuf>,
    messages_path: Option<PathBuf>,
    color: Option<String>,
    plain: bool,
}

impl AppConfigBuilder {
    #[inline]
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
    #[inline]
    #[must_use]
    pub fn data_dir_opt(mut self, dir: Option<&Path>) -> Self {
        if let Some(d) = dir {
            self.data_dir = Some(d.to_path_buf());
        }
        self
    }
    #[inline]
    #[must_use]
    pub fn messages_path(mut self, p: Option<PathBuf>) -> Self {
        self.messages_path = p;
        self
    }
    #[inline]
    #[must_use]
    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = Some(c.into());
        self
    }
    #[inline]
    #[must_use]
    pub fn plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let data_dir = self.data_dir.unwrap_or_else(|| PathBuf::from("data"));
        if data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        let color = match self.color {
            Some(name) => AnsiCode::from_name(&name)?,
            None => AnsiCode::default(),
        };
        Ok(AppConfig {
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
            messages_path: self.messages_path,
            color: if self.plain { AnsiCode::none() } else { color },
            plain: self.plain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::builder().build().unwrap();
        assert_eq!(cfg.log_path, Path::new("data").join("mood_log.csv"));
        assert_eq!(cfg.color, AnsiCode::amber());
        assert!(!cfg.plain);
        assert_eq!(
            cfg.export_path(30, "png"),
            Path::new("data").join("trend_last30.png")
        );
    }

    #[test]
    fn test_plain_drops_colour() {
        let cfg = AppConfig::builder().color("red").plain(true).build().unwrap();
        assert!(cfg.color.is_none());
    }

    #[test]
    fn test_bad_colour_rejected() {
        assert!(matches!(
            AppConfig::builder().color("#zz0000").build(),
            Err(ConfigError::Color(_))
        ));
        assert!(matches!(
            AppConfig::builder().data_dir("").build(),
            Err(ConfigError::EmptyDataDir)
        ));
    }

    #[test]
    fn test_message_candidates_order() {
        let cfg = AppConfig::builder()
            .data_dir("/tmp/m")
            .messages_path(Some(PathBuf::from("/etc/mine.json")))
            .build()
            .unwrap();
        let c = cfg.message_candidates();
        assert_eq!(c[0], PathBuf::from("/etc/mine.json"));
        assert_eq!(c[1], PathBuf::from("/tmp/m/messages.json"));
        assert_eq!(c.len(), 4);
    }
}
