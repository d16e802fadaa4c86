//! Optional chart exporters.
//!
//! Each exporter sits behind a cargo feature (`html`, `png`). Which ones
//! exist is settled when the binary is built; `Capabilities::detect`
//! collects them once at start-up and the menu asks it for a format. A
//! missing exporter is an `ExportError::Unavailable`, never a panic.

#[cfg(feature = "html")]
mod html;
#[cfg(feature = "png")]
mod png;

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::{core::error::ExportError, stats::DailySeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Html,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Html => "html",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Html => "HTML",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that can write a daily series to a file.
pub trait ChartExporter {
    fn format(&self) -> ExportFormat;
    fn export(&self, series: &DailySeries, title: &str, path: &Path) -> Result<(), ExportError>;
}

/// The exporters available in this build.
#[derive(Default)]
pub struct Capabilities {
    exporters: Vec<Box<dyn ChartExporter>>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.exporters.iter().map(|e| e.format()))
            .finish()
    }
}

impl Capabilities {
    /// Every exporter compiled into this binary.
    #[must_use]
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut caps = Self::none();
        #[cfg(feature = "html")]
        caps.exporters.push(Box::new(html::HtmlExporter));
        #[cfg(feature = "png")]
        caps.exporters.push(Box::new(png::PngExporter));
        tracing::debug!(exporters = ?caps, "resolved export capabilities");
        caps
    }

    /// No exporters at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, exporter: Box<dyn ChartExporter>) -> Self {
        self.exporters.push(exporter);
        self
    }

    #[must_use]
    pub fn supports(&self, format: ExportFormat) -> bool {
        self.exporters.iter().any(|e| e.format() == format)
    }

    /// Export `series` as `format` to `path`, creating parent directories.
    pub fn export(
        &self,
        format: ExportFormat,
        series: &DailySeries,
        title: &str,
        path: &Path,
    ) -> Result<PathBuf, ExportError> {
        let exporter = self
            .exporters
            .iter()
            .find(|e| e.format() == format)
            .ok_or(ExportError::Unavailable(format.name()))?;
        if !series.has_data() {
            return Err(ExportError::EmptyData);
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ExportError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        exporter.export(series, title, path)?;
        tracing::info!(format = %format, path = %path.display(), "exported chart");
        Ok(path.to_path_buf())
    }
}

/// Runs of consecutive days with data, as `(index, value)` pairs; gaps
/// split the line.
pub(crate) fn segments(series: &DailySeries) -> Vec<Vec<(usize, f64)>> {
    let mut out: Vec<Vec<(usize, f64)>> = Vec::new();
    let mut run = Vec::new();
    for (i, v) in series.values.iter().enumerate() {
        match v {
            Some(v) => run.push((i, *v)),
            None if !run.is_empty() => out.push(std::mem::take(&mut run)),
            None => {}
        }
    }
    if !run.is_empty() {
        out.push(run);
    }
    out
}
