//! # Planner Configuration
//!
//! Build-time inputs for a planner, usually read from a JSON file and then
//! overridden from the command line. Every field has a default, so `{}` is
//! a complete configuration.
//!
//! [`PlannerConfig`] is what the user writes; [`PageLayout`] is the
//! normalized geometry shared by every page in the tree.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Largest planner the CLI will agree to build. Each year is ~380 pages.
pub const MAX_YEARS: u32 = 100;

/// Largest page side PDF user space allows, in points.
pub const MAX_PAGE_SIDE: f64 = 14400.0;

/// Most blank schedule lines allowed between two labeled hours.
pub const MAX_TIME_GAP_LINES: u32 = 12;

/// Everything needed to build one planner document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    /// First year of the planner; it starts on January 1st.
    pub base_year: i32,
    /// Where the finished document is written.
    pub filename: PathBuf,
    /// How many consecutive years to include.
    pub num_years: u32,
    pub page_height: f64,
    pub page_width: f64,
    pub margin: f64,
    /// 0 = Sunday through 6 = Saturday.
    pub first_day_of_week: u8,
    /// Put navigation grids on the left and notes on the right.
    pub left_handed: bool,
    pub portrait: bool,
    /// Fraction of the page width given to the notes section.
    pub notes_fraction: f64,
    /// Draw schedule hours in the page margin instead of the column.
    pub time_in_margin: bool,
    /// Blank ruled lines between two labeled hours.
    pub time_gap_lines: u32,
    /// First hour on the day schedule (24h clock).
    pub time_start: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_year: 2021,
            filename: PathBuf::from("planner.pdf"),
            num_years: 10,
            // A4
            page_height: 841.89,
            page_width: 595.28,
            margin: 36.0,
            first_day_of_week: 1,
            left_handed: false,
            portrait: true,
            notes_fraction: 0.5,
            time_in_margin: false,
            time_gap_lines: 1,
            time_start: 8,
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject values no sensible planner can be built from.
    ///
    /// The builder itself trusts its inputs; this is the check the command
    /// line runs before handing a configuration over.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(PlannerError::InvalidConfig(msg)) };

        if self.num_years > MAX_YEARS {
            return invalid(format!(
                "numYears must be at most {}, got {}",
                MAX_YEARS, self.num_years
            ));
        }
        if chrono::NaiveDate::from_ymd_opt(self.base_year, 1, 1).is_none() {
            return invalid(format!("baseYear {} is out of range", self.base_year));
        }
        let side_ok = |side: f64| side.is_finite() && side > 0.0 && side <= MAX_PAGE_SIDE;
        if !side_ok(self.page_width) || !side_ok(self.page_height) {
            return invalid(format!(
                "page size must be positive and at most {}pt per side, got {}x{}",
                MAX_PAGE_SIDE, self.page_width, self.page_height
            ));
        }
        let short_side = self.page_width.min(self.page_height);
        if !(self.margin >= 0.0 && self.margin * 2.0 < short_side) {
            return invalid(format!("margin {} does not fit on the page", self.margin));
        }
        if self.first_day_of_week > 6 {
            return invalid(format!(
                "firstDayOfWeek must be 0 (Sunday) to 6 (Saturday), got {}",
                self.first_day_of_week
            ));
        }
        if !(0.0..1.0).contains(&self.notes_fraction) {
            return invalid(format!(
                "notesFraction must be in [0, 1), got {}",
                self.notes_fraction
            ));
        }
        if self.time_start > 23 {
            return invalid(format!("timeStart must be an hour, got {}", self.time_start));
        }
        if self.time_gap_lines > MAX_TIME_GAP_LINES {
            return invalid(format!(
                "timeGapLines must be at most {}, got {}",
                MAX_TIME_GAP_LINES, self.time_gap_lines
            ));
        }
        Ok(())
    }
}

/// Geometry and options shared by every page of one planner.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub height: f64,
    pub width: f64,
    pub margin: f64,
    pub left_handed: bool,
    pub portrait: bool,
    pub first_day_of_week: Weekday,
    pub notes_fraction: f64,
    pub time_in_margin: bool,
    pub time_gap_lines: u32,
    pub time_start: u32,
    pub title_font_size: f64,
    pub note_title_font_size: f64,
    pub label_font_size: f64,
}

impl PageLayout {
    /// Derive the shared layout from a configuration.
    ///
    /// Orientation decides which side is long: the configured dimensions
    /// are swapped when they disagree with `portrait`.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let long = config.page_height.max(config.page_width);
        let short = config.page_height.min(config.page_width);
        let (height, width) = if config.portrait {
            (long, short)
        } else {
            (short, long)
        };

        Self {
            height,
            width,
            margin: config.margin,
            left_handed: config.left_handed,
            portrait: config.portrait,
            first_day_of_week: weekday_from_index(config.first_day_of_week),
            notes_fraction: config.notes_fraction,
            time_in_margin: config.time_in_margin,
            time_gap_lines: config.time_gap_lines,
            time_start: config.time_start,
            title_font_size: 24.0,
            note_title_font_size: 14.0,
            label_font_size: 10.0,
        }
    }

    /// Height of the title band at the top of every page.
    pub fn header_height(&self) -> f64 {
        self.title_font_size * 2.0
    }

    /// X position of the divider between the notes section and the rest.
    /// Notes sit on the left for right-handed pages, on the right otherwise.
    pub fn notes_divider_x(&self) -> f64 {
        if self.left_handed {
            self.width * (1.0 - self.notes_fraction)
        } else {
            self.width * self.notes_fraction
        }
    }
}

/// 0 = Sunday, matching the convention of the configuration file.
fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = PlannerConfig::from_json("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let config = PlannerConfig::from_json(
            r#"{ "baseYear": 2024, "numYears": 2, "leftHanded": true, "filename": "out.pdf" }"#,
        )
        .unwrap();
        assert_eq!(config.base_year, 2024);
        assert_eq!(config.num_years, 2);
        assert!(config.left_handed);
        assert_eq!(config.filename, PathBuf::from("out.pdf"));
        assert_eq!(config.time_start, 8);
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let err = PlannerConfig::from_json(r#"{ "numYears": "ten" }"#).unwrap_err();
        match err {
            PlannerError::ConfigParse { hint, .. } => {
                assert!(hint.contains("doesn't match the planner configuration"))
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let ok = PlannerConfig::default();
        assert!(ok.validate().is_ok());

        let cases = [
            PlannerConfig {
                num_years: MAX_YEARS + 1,
                ..ok.clone()
            },
            PlannerConfig {
                first_day_of_week: 7,
                ..ok.clone()
            },
            PlannerConfig {
                notes_fraction: 1.0,
                ..ok.clone()
            },
            PlannerConfig {
                page_width: 0.0,
                ..ok.clone()
            },
            PlannerConfig {
                page_height: 1.0e7,
                num_years: 0,
                ..ok.clone()
            },
            PlannerConfig {
                page_width: MAX_PAGE_SIDE + 1.0,
                ..ok.clone()
            },
            PlannerConfig {
                margin: 400.0,
                ..ok.clone()
            },
            PlannerConfig {
                time_start: 24,
                ..ok.clone()
            },
            PlannerConfig {
                time_gap_lines: MAX_TIME_GAP_LINES + 1,
                ..ok.clone()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(PlannerError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_validate_accepts_limits() {
        let config = PlannerConfig {
            page_width: MAX_PAGE_SIDE,
            page_height: MAX_PAGE_SIDE,
            time_gap_lines: MAX_TIME_GAP_LINES,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let config = PlannerConfig {
            portrait: false,
            ..Default::default()
        };
        let layout = PageLayout::from_config(&config);
        assert!(layout.width > layout.height);
        assert!((layout.width - 841.89).abs() < 0.001);
    }

    #[test]
    fn test_first_day_of_week_mapping() {
        let sunday = PlannerConfig {
            first_day_of_week: 0,
            ..Default::default()
        };
        assert_eq!(PageLayout::from_config(&sunday).first_day_of_week, Weekday::Sun);
        assert_eq!(
            PageLayout::from_config(&PlannerConfig::default()).first_day_of_week,
            Weekday::Mon
        );
    }
}
