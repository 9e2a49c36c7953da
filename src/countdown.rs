//! Next-holiday lookup for countdown displays.
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

use std::fmt;

use chrono::TimeDelta;
use chrono_tz::Tz;

use crate::period::HolidayPeriod;
use crate::tz::{time_until, unify, Timestamp};

/// Where `now` stands relative to the finalized holiday list.
///
/// `Nothing` is the explicit "no row" state; there is no placeholder period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Countdown<'a> {
    /// Today lies inside this holiday
    Ongoing(&'a HolidayPeriod),
    /// The next holiday starts in `days` calendar days
    Upcoming { period: &'a HolidayPeriod, days: i64 },
    Nothing,
}

impl<'a> Countdown<'a> {
    /// Picks the first period in `periods` (sorted by begin) that is not over yet
    pub fn at(periods: &'a [HolidayPeriod], now: &Timestamp, zone: &Tz) -> Self {
        let today = unify(now, zone).date_naive();

        match periods.iter().find(|p| p.end.date_naive() >= today) {
            Some(period) if period.contains(today) => Countdown::Ongoing(period),
            Some(period) => Countdown::Upcoming {
                period,
                days: (period.begin.date_naive() - today).num_days(),
            },
            None => Countdown::Nothing,
        }
    }

    pub fn period(&self) -> Option<&'a HolidayPeriod> {
        match self {
            Countdown::Ongoing(period) | Countdown::Upcoming { period, .. } => Some(*period),
            Countdown::Nothing => None,
        }
    }

    /// Exact time left until the next holiday begins; zero while one is ongoing
    pub fn remaining(&self, now: &Timestamp, zone: &Tz) -> Option<TimeDelta> {
        match self {
            Countdown::Ongoing(_) => Some(TimeDelta::zero()),
            Countdown::Upcoming { period, .. } => Some(time_until(&period.begin.into(), now, zone)),
            Countdown::Nothing => None,
        }
    }
}

impl fmt::Display for Countdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Ongoing(period) => write!(f, "today is {}!", period.name),
            Countdown::Upcoming { period, days } => write!(
                f,
                "{} day(s) until {} ({})",
                days,
                period.name,
                period.begin.date_naive()
            ),
            Countdown::Nothing => write!(f, "no upcoming holiday found"),
        }
    }
}
