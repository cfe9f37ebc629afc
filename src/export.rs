//! Export of finished grids.
//!
//! The engine stops at a complete [`ScheduleGrid`]; rendering it into a
//! spreadsheet, a web page or a file belongs to an [`ExportSink`]. The
//! crate ships [`LabelTable`], which lays the grid out as text cells with
//! the Chinese status and weekday labels used on the printed roster:
//!
//! ```text
//! Employee | 1 星期二 | 2 星期三 | ...
//! Alice    | 1 工作   | 2 工作   | ...
//! ```
//!
//! [`LabelTable::with_compact_labels`] switches to the web layout, which
//! shortens weekdays and leaves the day number out of the cells:
//!
//! ```text
//! 员工  | 1 [二] | 2 [三] | ...
//! Alice | 工作   | 工作   | ...
//! ```

use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{ScheduleGrid, ShiftStatus};

/// Consumer of a finished grid.
pub trait ExportSink {
    /// What the sink produces.
    type Output;

    /// Renders `grid`.
    fn export(&mut self, grid: &ScheduleGrid) -> Self::Output;
}

/// Weekday label (星期一 .. 星期日).
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

/// Single-character weekday label (一 .. 日).
pub fn short_weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "一",
        Weekday::Tue => "二",
        Weekday::Wed => "三",
        Weekday::Thu => "四",
        Weekday::Fri => "五",
        Weekday::Sat => "六",
        Weekday::Sun => "日",
    }
}

/// A grid rendered as rows of text cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSheet {
    /// Sheet title, e.g. "April 2025" ("4月 2025" when compact). Empty for
    /// a grid without dates.
    pub title: String,
    /// First-column caption followed by one "{day} {weekday}" per date.
    pub header: Vec<String>,
    /// Per employee: name followed by one "{day} {status}" per date, or
    /// the bare status when compact.
    pub rows: Vec<Vec<String>>,
}

impl LabelSheet {
    /// Joins every row with `separator`, header first, one line per row.
    pub fn to_delimited(&self, separator: &str) -> String {
        std::iter::once(&self.header)
            .chain(&self.rows)
            .map(|row| row.join(separator))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Sink producing a [`LabelSheet`].
#[derive(Debug, Clone)]
pub struct LabelTable {
    caption: String,
    compact: bool,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self {
            caption: "Employee".to_string(),
            compact: false,
        }
    }
}

impl LabelTable {
    /// Creates a sink with the default "Employee" caption.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the caption of the first header cell.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Switches to the web layout: "员工" caption, "4月 2025" title,
    /// "{day} [一]" headers and bare status cells.
    pub fn with_compact_labels(mut self) -> Self {
        self.caption = "员工".to_string();
        self.compact = true;
        self
    }

    fn title(&self, first: NaiveDate) -> Option<String> {
        if self.compact {
            return Some(format!("{}月 {}", first.month(), first.year()));
        }
        let month = Month::try_from(u8::try_from(first.month()).ok()?).ok()?;
        Some(format!("{} {}", month.name(), first.year()))
    }

    fn day_header(&self, date: NaiveDate) -> String {
        if self.compact {
            format!("{} [{}]", date.day(), short_weekday_label(date.weekday()))
        } else {
            format!("{} {}", date.day(), weekday_label(date.weekday()))
        }
    }

    fn cell(&self, date: NaiveDate, status: ShiftStatus) -> String {
        if self.compact {
            status.label().to_string()
        } else {
            format!("{} {}", date.day(), status.label())
        }
    }
}

impl ExportSink for LabelTable {
    type Output = LabelSheet;

    fn export(&mut self, grid: &ScheduleGrid) -> LabelSheet {
        let dates = grid.dates();

        let title = dates
            .first()
            .and_then(|first| self.title(*first))
            .unwrap_or_default();

        let mut header = Vec::with_capacity(dates.len() + 1);
        header.push(self.caption.clone());
        header.extend(dates.iter().map(|d| self.day_header(*d)));

        let rows = grid
            .employees()
            .iter()
            .enumerate()
            .map(|(emp, name)| {
                let mut row = Vec::with_capacity(dates.len() + 1);
                row.push(name.clone());
                row.extend(
                    dates
                        .iter()
                        .zip(grid.row(emp))
                        .map(|(d, status)| self.cell(*d, *status)),
                );
                row
            })
            .collect();

        LabelSheet {
            title,
            header,
            rows,
        }
    }
}
