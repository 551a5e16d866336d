//! Six-field clock editor
//!
//! Chains one `Editor` per field, year first and second last. The working
//! record is updated as each field is confirmed, so the preview always shows
//! the whole record with the field under edit at its current value. The
//! record is only handed back once the second has been confirmed.

use larmor_hal::TimeRecord;

use super::machine::{Editor, EditorAction, EditorState};
use crate::clock::seed_year;
use crate::config::Bounds;

/// Lowest and highest year accepted while editing
pub const YEAR_MIN: i32 = 2001;
pub const YEAR_MAX: i32 = 2099;

/// Clock fields in edit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl ClockField {
    pub const ALL: [ClockField; 6] = [
        ClockField::Year,
        ClockField::Month,
        ClockField::Day,
        ClockField::Hour,
        ClockField::Minute,
        ClockField::Second,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClockField::Year => "Year",
            ClockField::Month => "Month",
            ClockField::Day => "Day",
            ClockField::Hour => "Hour",
            ClockField::Minute => "Minute",
            ClockField::Second => "Second",
        }
    }

    /// Edit bounds
    ///
    /// Day runs 1-31 for every month; the clock chip does not check it.
    pub fn bounds(&self) -> Bounds {
        match self {
            ClockField::Year => Bounds::new(YEAR_MIN, YEAR_MAX),
            ClockField::Month => Bounds::new(1, 12),
            ClockField::Day => Bounds::new(1, 31),
            ClockField::Hour => Bounds::new(0, 23),
            ClockField::Minute => Bounds::new(0, 59),
            ClockField::Second => Bounds::new(0, 59),
        }
    }

    /// Read this field as a signed working value
    pub fn get(&self, time: &TimeRecord) -> i32 {
        match self {
            ClockField::Year => time.year as i32,
            ClockField::Month => time.month as i32,
            ClockField::Day => time.day as i32,
            ClockField::Hour => time.hour as i32,
            ClockField::Minute => time.minute as i32,
            ClockField::Second => time.second as i32,
        }
    }

    /// Store a working value back, normalised into the field's bounds
    pub fn set(&self, time: &mut TimeRecord, value: i32) {
        let bounds = self.bounds();
        let value = value.clamp(bounds.lo, bounds.hi);
        match self {
            ClockField::Year => time.year = value as u16,
            ClockField::Month => time.month = value as u8,
            ClockField::Day => time.day = value as u8,
            ClockField::Hour => time.hour = value as u8,
            ClockField::Minute => time.minute = value as u8,
            ClockField::Second => time.second = value as u8,
        }
    }
}

/// Outcome of one clock editor tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockEditStep {
    /// Still on the same field
    Editing,
    /// A field was confirmed and the next one started
    NextField(ClockField),
    /// The last field was confirmed; commit this record
    Complete(TimeRecord),
}

/// Chained editor over all six clock fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockEditor {
    record: TimeRecord,
    field: usize,
    editor: Editor,
}

impl ClockEditor {
    /// Start editing from `start`
    ///
    /// An unset year (2000 or earlier) is replaced with `fallback_year`.
    pub fn new(start: TimeRecord, fallback_year: u16) -> Self {
        let record = seed_year(start, fallback_year);
        let first = ClockField::ALL[0];
        Self {
            record,
            field: 0,
            editor: Editor::new(first.get(&record), first.bounds()),
        }
    }

    /// Field under edit
    pub fn field(&self) -> ClockField {
        ClockField::ALL[self.field]
    }

    /// Editor for the field under edit
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Whole record with the field under edit at its current value
    pub fn preview(&self) -> TimeRecord {
        let mut record = self.record;
        self.field().set(&mut record, self.editor.value());
        record
    }

    /// Run one tick with an optional action
    pub fn tick(&mut self, action: Option<EditorAction>) -> ClockEditStep {
        if self.editor.tick(action) != EditorState::Terminal {
            return ClockEditStep::Editing;
        }

        let field = self.field();
        field.set(&mut self.record, self.editor.value());

        if self.field + 1 >= ClockField::ALL.len() {
            return ClockEditStep::Complete(self.record);
        }

        self.field += 1;
        let next = self.field();
        self.editor = Editor::new(next.get(&self.record), next.bounds());
        ClockEditStep::NextField(next)
    }
}
