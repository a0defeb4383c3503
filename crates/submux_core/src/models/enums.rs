//! Core enums used throughout the application.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of candidate file held in a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Media,
    Subtitle,
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::Media => write!(f, "media"),
            CandidateKind::Subtitle => write!(f, "subtitle"),
        }
    }
}

/// Lifecycle status of a pair.
///
/// A pair starts Pending and is resolved to Success or Failed exactly once
/// by the batch processor; resolved pairs never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairStatus {
    /// Created but not yet attempted.
    #[default]
    Pending,
    /// Tool run completed with exit code 0.
    Success,
    /// Tool run failed; diagnostic text recorded on the pair.
    Failed,
}

impl PairStatus {
    /// Whether the pair has been resolved (attempted by a batch run).
    pub fn is_resolved(&self) -> bool {
        !matches!(self, PairStatus::Pending)
    }

    /// Get display string for summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PairStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Run has not begun.
    #[default]
    NotStarted,
    /// Run is iterating pairs.
    Running,
    /// All pairs were attempted.
    Completed,
    /// The tool became unavailable mid-run; remaining pairs untouched.
    Aborted,
    /// The cancellation flag was observed between invocations.
    Cancelled,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::NotStarted => write!(f, "not started"),
            RunState::Running => write!(f, "running"),
            RunState::Completed => write!(f, "completed"),
            RunState::Aborted => write!(f, "aborted"),
            RunState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Subtitle track language applied uniformly to a batch run.
///
/// The set is closed: these are the languages the tool template supports,
/// each mapped to its ISO 639-2 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackLanguage {
    #[default]
    Persian,
    English,
    French,
    Spanish,
    Portuguese,
    Hebrew,
}

impl TrackLanguage {
    /// The 3-letter code passed to mkvmerge's `--language` option.
    pub fn code(&self) -> &'static str {
        match self {
            TrackLanguage::Persian => "per",
            TrackLanguage::English => "eng",
            TrackLanguage::French => "fre",
            TrackLanguage::Spanish => "spa",
            TrackLanguage::Portuguese => "por",
            TrackLanguage::Hebrew => "heb",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            TrackLanguage::Persian => "Persian",
            TrackLanguage::English => "English",
            TrackLanguage::French => "French",
            TrackLanguage::Spanish => "Spanish",
            TrackLanguage::Portuguese => "Portuguese",
            TrackLanguage::Hebrew => "Hebrew",
        }
    }

    /// All supported languages, in display order.
    pub fn all() -> &'static [TrackLanguage] {
        &[
            TrackLanguage::Persian,
            TrackLanguage::English,
            TrackLanguage::French,
            TrackLanguage::Spanish,
            TrackLanguage::Portuguese,
            TrackLanguage::Hebrew,
        ]
    }
}

impl std::fmt::Display for TrackLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl FromStr for TrackLanguage {
    type Err = String;

    /// Parse either the human-readable name (case-insensitive) or the
    /// 3-letter code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for lang in Self::all() {
            if s.eq_ignore_ascii_case(lang.name()) || s.eq_ignore_ascii_case(lang.code()) {
                return Ok(*lang);
            }
        }
        Err(format!(
            "unknown language '{}' (expected one of: {})",
            s,
            Self::all()
                .iter()
                .map(|l| l.name())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_name_and_code() {
        assert_eq!("Persian".parse::<TrackLanguage>(), Ok(TrackLanguage::Persian));
        assert_eq!("persian".parse::<TrackLanguage>(), Ok(TrackLanguage::Persian));
        assert_eq!("per".parse::<TrackLanguage>(), Ok(TrackLanguage::Persian));
        assert_eq!("ENG".parse::<TrackLanguage>(), Ok(TrackLanguage::English));
        assert!("klingon".parse::<TrackLanguage>().is_err());
    }

    #[test]
    fn language_codes_are_three_letters() {
        for lang in TrackLanguage::all() {
            assert_eq!(lang.code().len(), 3);
        }
    }

    #[test]
    fn pair_status_resolution() {
        assert!(!PairStatus::Pending.is_resolved());
        assert!(PairStatus::Success.is_resolved());
        assert!(PairStatus::Failed.is_resolved());
    }
}
