//! # fmreport-core
//!
//! Core domain model and traits for the fmreport team-performance report
//! generator.
//!
//! This crate provides:
//! - Domain types: `ReportInput`, `MemberRecord`
//! - Input resolution: inline JSON or a path to a JSON file
//! - Score banding and the report colour palette
//! - Error types and the `Renderer` trait
//!
//! ## Example
//!
//! ```rust
//! use fmreport_core::{resolve_input, score_band, ScoreBand};
//!
//! let input = resolve_input(r#"{"teamName":"Alpha","gpData":[{"name":"Jo","score":19}]}"#).unwrap();
//! assert_eq!(input.team_name, "Alpha");
//! assert_eq!(score_band(input.gp_data[0].score), ScoreBand::Green);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of member rows rendered in the attendance table and chart.
/// Entries beyond this are silently dropped, in input order.
pub const MAX_MEMBERS: usize = 15;

/// Banner fill (team/month banners, "Team Management", "Additional Notes")
pub const BANNER_FILL: u32 = 0xC3BBFD;

/// Section-header fill ("FM Performance", attendance table headers)
pub const SECTION_FILL: u32 = 0xC5C8FB;

/// Sub-header fill ("Goals this month", "Team Overview")
pub const SUBHEADER_FILL: u32 = 0xDAD8FE;

/// Score cell fill for scores >= 18
pub const GREEN_FILL: u32 = 0x92D050;

/// Score cell fill for scores >= 15
pub const YELLOW_FILL: u32 = 0xFFC000;

/// Score cell fill for scores > 0 and < 15
pub const RED_FILL: u32 = 0xFF6B6B;

// ============================================================================
// Domain Types
// ============================================================================

/// One team member's monthly attendance and performance record.
///
/// Every field is optional in the JSON payload; missing numerics default to
/// zero and missing strings to empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberRecord {
    pub name: String,
    /// Current month score, expected range roughly 0-20
    pub score: f64,
    /// Previous month score, charted next to the current one
    pub prev_score: f64,
    pub mistakes: i64,
    pub extra_shifts: i64,
    pub lateness: i64,
    pub missed_days: i64,
    pub sick_leave: i64,
    pub attitude: String,
    pub remarks: String,
}

impl MemberRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the current month score
    pub fn score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Set the previous month score
    pub fn prev_score(mut self, prev: f64) -> Self {
        self.prev_score = prev;
        self
    }

    /// Display name for the member at 0-based position `index`.
    ///
    /// Members with an empty name render as `GP <n>` so they still get a
    /// table row and a chart category.
    pub fn display_name(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("GP {}", index + 1)
        } else {
            self.name.clone()
        }
    }
}

/// The full report payload: team identity, narrative sections, and the
/// per-member records feeding the attendance table and chart.
///
/// Unknown JSON keys are ignored; every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportInput {
    pub team_name: String,
    pub month_name: String,
    pub year: i32,
    /// Member records in report order; only the first [`MAX_MEMBERS`] are used
    pub gp_data: Vec<MemberRecord>,
    pub fm_performance: String,
    pub goals_this_month: String,
    pub team_overview: String,
    pub additional_notes: String,
}

impl Default for ReportInput {
    fn default() -> Self {
        Self {
            team_name: "Unknown Team".to_string(),
            month_name: "Unknown Month".to_string(),
            year: 2026,
            gp_data: Vec::new(),
            fm_performance: String::new(),
            goals_this_month: String::new(),
            team_overview: String::new(),
            additional_notes: String::new(),
        }
    }
}

impl ReportInput {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            ..Self::default()
        }
    }

    /// The member records that will actually be rendered: the first
    /// min([`MAX_MEMBERS`], len) entries, in input order.
    pub fn members(&self) -> &[MemberRecord] {
        let n = self.gp_data.len().min(MAX_MEMBERS);
        &self.gp_data[..n]
    }

    /// Chart title: `"<team> - <month> <year> GP Performance"`
    pub fn chart_title(&self) -> String {
        format!(
            "{} - {} {} GP Performance",
            self.team_name, self.month_name, self.year
        )
    }

    /// Current-month series header: `"<month> <year>"`
    pub fn current_series_label(&self) -> String {
        format!("{} {}", self.month_name, self.year)
    }
}

// ============================================================================
// Score Banding
// ============================================================================

/// Fill band for a score cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    /// score >= 18
    Green,
    /// score >= 15
    Yellow,
    /// score > 0 and < 15
    Red,
    /// score == 0 (or negative): no fill
    None,
}

impl ScoreBand {
    /// RGB fill for this band, or `None` for unfilled cells
    pub fn fill(self) -> Option<u32> {
        match self {
            Self::Green => Some(GREEN_FILL),
            Self::Yellow => Some(YELLOW_FILL),
            Self::Red => Some(RED_FILL),
            Self::None => None,
        }
    }
}

/// Band a score into its fill colour. Pure function of the value.
pub fn score_band(score: f64) -> ScoreBand {
    if score >= 18.0 {
        ScoreBand::Green
    } else if score >= 15.0 {
        ScoreBand::Yellow
    } else if score > 0.0 {
        ScoreBand::Red
    } else {
        ScoreBand::None
    }
}

// ============================================================================
// Input Resolution
// ============================================================================

/// Resolve a payload argument into a [`ReportInput`].
///
/// If `payload` names an existing file its contents are parsed as JSON;
/// otherwise `payload` itself is parsed.
pub fn resolve_input(payload: &str) -> Result<ReportInput, InputError> {
    let text = if Path::new(payload).is_file() {
        std::fs::read_to_string(payload)?
    } else {
        payload.to_string()
    };
    serde_json::from_str(&text).map_err(InputError::Json)
}

// ============================================================================
// Errors and Traits
// ============================================================================

/// Payload error: the JSON could not be read or parsed
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Workbook error: {0}")]
    Workbook(String),
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a report to the output format
    fn render(&self, input: &ReportInput) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn score_band_thresholds() {
        let cases = [
            (0.0, ScoreBand::None),
            (1.0, ScoreBand::Red),
            (14.0, ScoreBand::Red),
            (15.0, ScoreBand::Yellow),
            (17.0, ScoreBand::Yellow),
            (18.0, ScoreBand::Green),
            (20.0, ScoreBand::Green),
        ];
        for (score, band) in cases {
            assert_eq!(score_band(score), band, "score {score}");
        }
    }

    #[test]
    fn band_fills() {
        assert_eq!(ScoreBand::Green.fill(), Some(GREEN_FILL));
        assert_eq!(ScoreBand::Yellow.fill(), Some(YELLOW_FILL));
        assert_eq!(ScoreBand::Red.fill(), Some(RED_FILL));
        assert_eq!(ScoreBand::None.fill(), None);
    }

    #[test]
    fn defaults_for_missing_fields() {
        let input: ReportInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.team_name, "Unknown Team");
        assert_eq!(input.month_name, "Unknown Month");
        assert_eq!(input.year, 2026);
        assert!(input.gp_data.is_empty());
        assert_eq!(input.fm_performance, "");
        assert_eq!(input.additional_notes, "");

        let member: MemberRecord = serde_json::from_str(r#"{"name":"Jo"}"#).unwrap();
        assert_eq!(member.score, 0.0);
        assert_eq!(member.prev_score, 0.0);
        assert_eq!(member.mistakes, 0);
        assert_eq!(member.attitude, "");
    }

    #[test]
    fn unknown_keys_ignored() {
        let input: ReportInput =
            serde_json::from_str(r#"{"teamName":"Alpha","shiftPlan":[1,2,3]}"#).unwrap();
        assert_eq!(input.team_name, "Alpha");
    }

    #[test]
    fn camel_case_member_fields() {
        let member: MemberRecord = serde_json::from_str(
            r#"{"name":"Jo","score":19,"prevScore":16,"extraShifts":2,"missedDays":1,"sickLeave":3}"#,
        )
        .unwrap();
        assert_eq!(member.prev_score, 16.0);
        assert_eq!(member.extra_shifts, 2);
        assert_eq!(member.missed_days, 1);
        assert_eq!(member.sick_leave, 3);
    }

    #[test]
    fn members_capped_at_fifteen() {
        let mut input = ReportInput::new("Alpha");
        for i in 0..20 {
            input.gp_data.push(MemberRecord::new(format!("GP{i}")));
        }
        let members = input.members();
        assert_eq!(members.len(), MAX_MEMBERS);
        assert_eq!(members[0].name, "GP0");
        assert_eq!(members[14].name, "GP14");
    }

    #[test]
    fn display_name_falls_back_to_position() {
        let member = MemberRecord::default();
        assert_eq!(member.display_name(0), "GP 1");
        assert_eq!(member.display_name(7), "GP 8");
        assert_eq!(MemberRecord::new("Jo").display_name(3), "Jo");
    }

    #[test]
    fn resolve_inline_json() {
        let input = resolve_input(r#"{"teamName":"Alpha","monthName":"March","year":2026}"#).unwrap();
        assert_eq!(input.team_name, "Alpha");
        assert_eq!(input.chart_title(), "Alpha - March 2026 GP Performance");
        assert_eq!(input.current_series_label(), "March 2026");
    }

    #[test]
    fn resolve_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"teamName":"Beta","gpData":[{{"name":"Ana","score":12}}]}}"#).unwrap();

        let input = resolve_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(input.team_name, "Beta");
        assert_eq!(input.gp_data.len(), 1);
        assert_eq!(input.gp_data[0].score, 12.0);
    }

    #[test]
    fn resolve_invalid_json_fails() {
        let err = resolve_input("not json at all").unwrap_err();
        assert!(matches!(err, InputError::Json(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ broken").unwrap();
        let err = resolve_input(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, InputError::Json(_)));
    }
}
