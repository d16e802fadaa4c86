//! Encouragement lines shown after a score is logged.
//!
//! Lines are grouped into three bands by score and can be overridden with a
//! JSON file shaped like `{"low": [...], "mid": [...], "high": [...]}`. Any
//! band the file leaves out keeps its built-in lines.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::core::{entry::Score, rng::Lcg};

const DEFAULT_LOW: &[&str] = &[
    "Hard days pass too. You are doing better than you think.",
    "Look after yourself today, one small step at a time.",
];
const DEFAULT_MID: &[&str] = &[
    "Steady pace, steady progress. That counts.",
    "A decent day. Give yourself some credit.",
];
const DEFAULT_HIGH: &[&str] = &[
    "You are shining today, keep it up!",
    "Hold on to this energy and go make good things happen.",
];

/// Score band a message pool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    #[must_use]
    pub fn of(score: Score) -> Self {
        match score.get() {
            0..=4 => Self::Low,
            5..=7 => Self::Mid,
            _ => Self::High,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MessageFile {
    low: Option<Vec<String>>,
    mid: Option<Vec<String>>,
    high: Option<Vec<String>>,
}

/// Message pools for the three bands; none of them is ever empty.
#[derive(Debug, Clone)]
pub struct Messages {
    low: Vec<String>,
    mid: Vec<String>,
    high: Vec<String>,
}

impl Default for Messages {
    fn default() -> Self {
        let own = |v: &[&str]| v.iter().map(|s| (*s).to_owned()).collect();
        Self {
            low: own(DEFAULT_LOW),
            mid: own(DEFAULT_MID),
            high: own(DEFAULT_HIGH),
        }
    }
}

impl Messages {
    /// Parse a messages document, keeping defaults for absent or empty bands.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: MessageFile = serde_json::from_str(text)?;
        let mut out = Self::default();
        let pick = |v: Option<Vec<String>>, slot: &mut Vec<String>| {
            let v: Vec<String> = v
                .unwrap_or_default()
                .into_iter()
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect();
            if !v.is_empty() {
                *slot = v;
            }
        };
        pick(file.low, &mut out.low);
        pick(file.mid, &mut out.mid);
        pick(file.high, &mut out.high);
        Ok(out)
    }

    /// Load from the first candidate path that exists. Missing or broken
    /// files fall back to the defaults with a warning.
    pub fn load(candidates: &[PathBuf]) -> Self {
        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            tracing::debug!("no messages file found, using built-in lines");
            return Self::default();
        };
        match Self::read(path) {
            Ok(m) => {
                tracing::debug!(path = %path.display(), "loaded messages");
                m
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring messages file");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_json(&text).map_err(|e| e.to_string())
    }

    #[must_use]
    pub fn pool(&self, band: Band) -> &[String] {
        match band {
            Band::Low => &self.low,
            Band::Mid => &self.mid,
            Band::High => &self.high,
        }
    }

    /// Random line for `score`, avoiding anything in `exclude` unless the
    /// whole pool has already been used.
    pub fn choose(&self, score: Score, exclude: &HashSet<String>, rng: &mut Lcg) -> &str {
        let pool = self.pool(Band::of(score));
        let fresh: Vec<&str> = pool
            .iter()
            .map(String::as_str)
            .filter(|m| !exclude.contains(*m))
            .collect();
        match rng.choose(&fresh).copied() {
            Some(m) => m,
            None => rng.choose(pool).map_or("", String::as_str),
        }
    }
}
