//! Holiday periods and their day counts.
//! 
//! MIT License
//! 
//! Copyright (c) 2026 66f94eae
//! 
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//! 
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//! 
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;

/// A merged, per-year holiday with derived day counts
#[derive(Clone, Debug, PartialEq)]
pub struct HolidayPeriod {
    pub name: String,
    /// Local year of the first fragment's start; same names in other years stay apart
    pub year: i32,
    pub begin: DateTime<Tz>,
    /// Inclusive
    pub end: DateTime<Tz>,
    pub total_days: i64,
    pub days_excl_makeup: i64,
    pub days_excl_makeup_weekend: i64,
    /// Makeup workdays attributed to this holiday
    pub makeup_dates: BTreeSet<NaiveDate>,
    /// Uid of the first fragment grouped into this period
    pub uid: String,
    pub description: String,
}

impl HolidayPeriod {
    /// Whether `date` lies within the period's inclusive date range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin.date_naive() <= date && date <= self.end.date_naive()
    }
}

/// The three figures reported for one period
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayCounts {
    pub total: i64,
    pub excl_makeup: i64,
    pub excl_makeup_weekend: i64,
}

impl DayCounts {
    /// Counts days for the inclusive span `[begin, end]` with `makeup` attributed workdays.
    ///
    /// Weekend days are counted over the whole span and subtracted
    /// independently of the makeup days, so a makeup day falling on a
    /// weekend is taken off twice in `excl_makeup_weekend`.
    pub fn compute(begin: NaiveDate, end: NaiveDate, makeup: usize) -> Self {
        let total = (end - begin).num_days() + 1;
        let makeup = makeup as i64;
        let weekend = weekend_days(begin, end);

        DayCounts {
            total,
            excl_makeup: (total - makeup).max(0),
            excl_makeup_weekend: (total - makeup - weekend).max(0),
        }
    }
}

/// Number of Saturdays and Sundays in `[begin, end]`
pub fn weekend_days(begin: NaiveDate, end: NaiveDate) -> i64 {
    begin
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64
}

/// Sum of the day counts over every period
pub fn aggregate_totals(periods: &[HolidayPeriod]) -> DayCounts {
    periods.iter().fold(DayCounts::default(), |acc, p| DayCounts {
        total: acc.total + p.total_days,
        excl_makeup: acc.excl_makeup + p.days_excl_makeup,
        excl_makeup_weekend: acc.excl_makeup_weekend + p.days_excl_makeup_weekend,
    })
}
