//! Holiday period reconstruction from public holiday ICS feeds.
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
//!
//! Feeds publishing holidays together with compensatory workdays ("makeup
//! days") split one holiday over many events ("劳动节 第1天/共3天", ...)
//! and list the makeup days as separate events. This crate rebuilds one
//! period per holiday and year with three day counts: the raw span, the
//! span without makeup days, and the span without makeup days and weekends.
//!
//! ```ignore
//! let events = cnholiday::ical::parse_calendar(&text)?;
//! let periods = cnholiday::build_holiday_periods(&events, &now, &zone);
//! let totals = cnholiday::aggregate_totals(&periods);
//! ```

use chrono_tz::Tz;

pub mod cli;
pub mod cnholiday;
pub mod conf;
pub mod countdown;
pub mod error;
pub mod feed;
pub mod ical;
pub mod merge;
pub mod normalize;
pub mod period;
pub mod tz;

pub use countdown::Countdown;
pub use error::{Error, Result};
pub use normalize::{NormalizedFragment, Normalizer, RawEvent};
pub use period::{aggregate_totals, DayCounts, HolidayPeriod};
pub use tz::{time_until, unify, Timestamp};

/// Full pipeline with the built-in keyword sets.
///
/// Deterministic for identical `raw`, `now` and `zone`.
pub fn build_holiday_periods(raw: &[RawEvent], now: &Timestamp, zone: &Tz) -> Vec<HolidayPeriod> {
    build_holiday_periods_with(&Normalizer::default(), raw, now, zone)
}

/// Full pipeline: normalize every event, merge fragments and count days.
pub fn build_holiday_periods_with(
    normalizer: &Normalizer,
    raw: &[RawEvent],
    now: &Timestamp,
    zone: &Tz,
) -> Vec<HolidayPeriod> {
    let now = unify(now, zone);
    let fragments: Vec<NormalizedFragment> = raw
        .iter()
        .filter_map(|event| normalizer.normalize(event, zone, &now))
        .collect();

    log::debug!("{} of {} events kept after normalization", fragments.len(), raw.len());
    merge::merge(&fragments, normalizer, &now)
}
