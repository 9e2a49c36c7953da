//! Timezone unification for every date-only comparison in the pipeline.
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

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// A point in time as it arrives from a feed or a caller.
///
/// Feeds mix floating wall-clock values (`DTSTART:20250501T000000`) with
/// UTC and `TZID` anchored ones, so the two shapes are kept apart until
/// [`unify`] pins them to one zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timestamp {
    /// Wall-clock time with no zone attached
    Floating(NaiveDateTime),
    /// Instant carrying its own offset
    Zoned(DateTime<FixedOffset>),
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Timestamp::Floating(naive)
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for Timestamp {
    fn from(dt: DateTime<Z>) -> Self {
        Timestamp::Zoned(dt.fixed_offset())
    }
}

impl Timestamp {
    /// Moves the timestamp by `delta`, keeping its shape
    pub fn checked_add(self, delta: TimeDelta) -> Option<Self> {
        match self {
            Timestamp::Floating(naive) => naive.checked_add_signed(delta).map(Timestamp::Floating),
            Timestamp::Zoned(dt) => dt.checked_add_signed(delta).map(Timestamp::Zoned),
        }
    }
}

/// Anchors `ts` in `zone`.
///
/// Floating values are read as wall-clock time in `zone` (attached, not
/// shifted); zoned values are converted. Applying it to its own output is a
/// no-op.
pub fn unify(ts: &Timestamp, zone: &Tz) -> DateTime<Tz> {
    match ts {
        Timestamp::Floating(naive) => localize(naive, zone),
        Timestamp::Zoned(dt) => dt.with_timezone(zone),
    }
}

/// Attaches `zone` to a wall-clock value.
///
/// Repeated wall times (DST fall-back) take the earlier instant. Wall times
/// inside a DST gap are read with the offset in force at that moment in UTC,
/// which lands them just past the gap.
pub fn localize(naive: &NaiveDateTime, zone: &Tz) -> DateTime<Tz> {
    match zone.from_local_datetime(naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(early, _) => early,
        LocalResult::None => {
            let offset = zone.offset_from_utc_datetime(naive).fix();
            let utc = *naive - TimeDelta::seconds(offset.local_minus_utc() as i64);
            zone.from_utc_datetime(&utc)
        }
    }
}

/// Parses an IANA zone identifier such as `Asia/Shanghai`.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| Error::UnknownZone(name.to_string()))
}

/// Signed time left from `now` until `target`, both anchored in `zone` first.
pub fn time_until(target: &Timestamp, now: &Timestamp, zone: &Tz) -> TimeDelta {
    unify(target, zone).signed_duration_since(unify(now, zone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike, Utc};
    use chrono_tz::{America::New_York, Asia::Shanghai};
    use proptest::prelude::*;

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn floating_is_attached_not_shifted() {
        let dt = unify(&naive(2025, 5, 1, 0, 0).into(), &Shanghai);
        assert_eq!(dt.naive_local(), naive(2025, 5, 1, 0, 0));
        assert_eq!(dt.offset().fix().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn zoned_is_converted() {
        let utc = Utc.from_utc_datetime(&naive(2025, 4, 30, 16, 0));
        let dt = unify(&utc.into(), &Shanghai);
        assert_eq!(dt.naive_local(), naive(2025, 5, 1, 0, 0));
    }

    #[test]
    fn dst_gap_lands_after_gap() {
        // 2025-03-09 02:30 does not exist in New York
        let dt = localize(&naive(2025, 3, 9, 2, 30), &New_York);
        assert_eq!(dt.hour(), 3);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn dst_overlap_takes_earlier() {
        let dt = localize(&naive(2025, 11, 2, 1, 30), &New_York);
        assert_eq!(dt.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn unknown_zone_is_rejected() {
        assert!(matches!(parse_zone("Mars/Olympus"), Err(Error::UnknownZone(_))));
        assert_eq!(parse_zone(" Asia/Shanghai ").unwrap(), Shanghai);
    }

    #[test]
    fn time_until_anchors_naive_target() {
        let now = Utc.from_utc_datetime(&naive(2025, 4, 30, 15, 0));
        let left = time_until(&naive(2025, 5, 1, 0, 0).into(), &now.into(), &Shanghai);
        assert_eq!(left, TimeDelta::hours(1));
    }

    proptest! {
        #[test]
        fn unify_is_idempotent(secs in 0i64..4_102_444_800, floating in any::<bool>()) {
            let ts: Timestamp = if floating {
                DateTime::from_timestamp(secs, 0).unwrap().naive_utc().into()
            } else {
                DateTime::from_timestamp(secs, 0).unwrap().into()
            };
            for zone in [Shanghai, New_York] {
                let once = unify(&ts, &zone);
                let twice = unify(&once.into(), &zone);
                prop_assert_eq!(once, twice);
                prop_assert_eq!(once.naive_local(), twice.naive_local());
            }
        }
    }
}
