use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("a month has 28 to 31 days, got {0}")]
    InvalidDayCount(u32),
}

/// Layout of one month on a Sunday-first, 7-column grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub leading_blanks: u32,
    pub days_in_month: u32,
}

impl MonthGrid {
    pub fn from_layout(first_weekday: Weekday, days_in_month: u32) -> Result<Self, CalendarError> {
        if !(28..=31).contains(&days_in_month) {
            return Err(CalendarError::InvalidDayCount(days_in_month));
        }
        Ok(Self {
            leading_blanks: first_weekday.num_days_from_sunday(),
            days_in_month,
        })
    }

    pub fn for_month(year: i32, month: u32) -> Result<Self, CalendarError> {
        let first = first_of_month(year, month)?;
        Self::from_layout(first.weekday(), days_in_month(year, month)?)
    }

    /// Blank cells followed by the day numbers `1..=days_in_month`.
    pub fn cells(&self) -> Vec<Option<u32>> {
        (0..self.leading_blanks)
            .map(|_| None)
            .chain((1..=self.days_in_month).map(Some))
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.cells()
            .into_iter()
            .map(|cell| cell.map(|d| d.to_string()).unwrap_or_default())
            .collect()
    }

    /// Grid rows; the final row is padded with blanks to a full week.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        self.cells()
            .chunks(7)
            .map(|chunk| {
                let mut row = [None; 7];
                row[..chunk.len()].copy_from_slice(chunk);
                row
            })
            .collect()
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = first_of_month(year, month)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(next) => Ok(next.signed_duration_since(first).num_days() as u32),
        // Last representable month: count forward from the first instead.
        None => Ok(first
            .iter_days()
            .take_while(|d| d.month() == month)
            .count() as u32),
    }
}

/// The month currently shown on the calendar screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn grid(&self) -> Result<MonthGrid, CalendarError> {
        MonthGrid::for_month(self.year, self.month)
    }

    pub fn title(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}
