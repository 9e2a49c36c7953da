//! iCalendar parsing into raw holiday events.
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

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use ical::property::Property;
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::normalize::RawEvent;
use crate::tz::Timestamp;

/// iCalendar property key for event uid
const KEY_UID: &str = "UID";
/// iCalendar property key for event summary
const KEY_SUMMARY: &str = "SUMMARY";
/// iCalendar property key for event start time
const KEY_DTSTART: &str = "DTSTART";
/// iCalendar property key for event end time
const KEY_DTEND: &str = "DTEND";
/// iCalendar property key for event duration
const KEY_DURATION: &str = "DURATION";
/// iCalendar property key for event description
const KEY_DESCRIPTION: &str = "DESCRIPTION";

/// iCalendar datetime format: YYYYMMDDTHHMMSS
const DT_FMT: &str = "%Y%m%dT%H%M%S";
/// iCalendar date format: YYYYMMDD
const DATE_FMT: &str = "%Y%m%d";

/// A DTSTART/DTEND value and whether it was a bare date
#[derive(Debug, PartialEq)]
struct DateValue {
    stamp: Timestamp,
    date_only: bool,
}

/// Parses calendar text into raw events, in feed order.
///
/// # Errors
/// * `Error::Parse` when the text is not iCalendar syntax; nothing is
///   returned in that case
///
/// Events whose DTSTART cannot be read are skipped with a warning.
pub fn parse_calendar(text: &str) -> Result<Vec<RawEvent>> {
    if !text.contains("BEGIN:VCALENDAR") {
        return Err(Error::Parse("missing BEGIN:VCALENDAR".to_string()));
    }

    let mut events = Vec::new();
    let parser = ical::IcalParser::new(text.as_bytes());

    for calendar in parser {
        let cal = calendar.map_err(|e| Error::Parse(e.to_string()))?;
        for event in cal.events {
            match raw_event(&event.properties) {
                Ok(raw) => events.push(raw),
                Err(e) => warn!("skip calendar event: {}", e),
            }
        }
    }

    debug!("parsed {} events", events.len());
    Ok(events)
}

/// Builds one raw event from its properties
fn raw_event(properties: &[Property]) -> Result<RawEvent> {
    let mut uid = String::new();
    let mut title = String::new();
    let mut description = String::new();
    let mut start: Option<DateValue> = None;
    let mut end: Option<Timestamp> = None;
    let mut end_seen = false;
    let mut duration: Option<TimeDelta> = None;

    for prop in properties {
        let value = prop.value.as_deref().unwrap_or_default();
        match prop.name.to_uppercase().as_str() {
            KEY_UID => uid = value.to_string(),
            KEY_SUMMARY => title = value.to_string(),
            KEY_DESCRIPTION => description = value.to_string(),
            KEY_DTSTART => start = Some(parse_datetime(prop, true)?),
            KEY_DTEND => {
                end_seen = true;
                end = parse_datetime(prop, false).ok().map(|v| v.stamp);
            }
            KEY_DURATION => duration = parse_duration(value),
            _ => {}
        }
    }

    let Some(start) = start else {
        return Err(Error::Parse(format!("event '{}' has no DTSTART", title)));
    };

    // RFC 5545 3.6.1: DURATION stands in for DTEND, and a missing end lasts
    // one day for dates and zero time for date-times
    if !end_seen {
        end = match (duration, start.date_only) {
            (Some(d), _) => start.stamp.checked_add(d),
            (None, true) => start.stamp.checked_add(TimeDelta::days(1)),
            (None, false) => Some(start.stamp),
        };
    }

    Ok(RawEvent {
        uid,
        title,
        start: start.stamp,
        end,
        all_day: start.date_only,
        description,
    })
}

/// Parses iCalendar date and datetime values
///
/// # Supported Formats
/// * YYYYMMDD or `VALUE=DATE` (all-day events), read as floating midnight
/// * YYYYMMDDTHHMMSS (floating local time)
/// * YYYYMMDDTHHMMSSZ (UTC time)
/// * YYYYMMDDTHHMMSS with TZID parameter
///
/// A TZID wall time repeated by a DST change resolves to the earlier
/// instant for starts and the later one for ends.
fn parse_datetime(prop: &Property, is_dt_start: bool) -> Result<DateValue> {
    let Some(value) = &prop.value else {
        return Err(Error::InvalidTimestamp(format!("{} without value", prop.name)));
    };
    let value = value.trim().to_uppercase();
    let invalid = || Error::InvalidTimestamp(value.clone());

    if value.len() == 8 || param(prop, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE")) {
        let date = NaiveDate::parse_from_str(value.get(..8).unwrap_or(&value), DATE_FMT)
            .map_err(|_| invalid())?;
        return Ok(DateValue {
            stamp: Timestamp::Floating(date.and_time(chrono::NaiveTime::MIN)),
            date_only: true,
        });
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let dt = NaiveDateTime::parse_from_str(utc, DT_FMT).map_err(|_| invalid())?;
        return Ok(DateValue {
            stamp: dt.and_utc().into(),
            date_only: false,
        });
    }

    let dt = NaiveDateTime::parse_from_str(&value, DT_FMT).map_err(|_| invalid())?;

    let stamp: Timestamp = match param(prop, "TZID") {
        Some(tzid) => {
            let tz = tzid
                .parse::<Tz>()
                .map_err(|_| Error::UnknownZone(tzid.to_string()))?;
            match tz.from_local_datetime(&dt) {
                chrono::offset::LocalResult::Single(tz_dt) => tz_dt.into(),
                chrono::offset::LocalResult::Ambiguous(early, later) => {
                    if is_dt_start { early.into() } else { later.into() }
                }
                chrono::offset::LocalResult::None => return Err(invalid()),
            }
        }
        None => Timestamp::Floating(dt),
    };

    Ok(DateValue {
        stamp,
        date_only: false,
    })
}

/// First value of a property parameter, matched case-insensitively
fn param<'a>(prop: &'a Property, name: &str) -> Option<&'a str> {
    prop.params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(|v| v.trim_matches('"'))
}

/// Parses an RFC 5545 duration such as `P1D`, `PT12H` or `-P1W2DT3H`
fn parse_duration(value: &str) -> Option<TimeDelta> {
    let value = value.trim();
    let (negative, rest) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    let rest = rest.strip_prefix('P')?;

    let mut total = TimeDelta::zero();
    let mut digits = String::new();
    let mut in_time = false;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            'T' if digits.is_empty() => in_time = true,
            unit => {
                let n: i64 = digits.parse().ok()?;
                digits.clear();
                let part = match (unit, in_time) {
                    ('W', false) => TimeDelta::try_weeks(n)?,
                    ('D', false) => TimeDelta::try_days(n)?,
                    ('H', true) => TimeDelta::try_hours(n)?,
                    ('M', true) => TimeDelta::try_minutes(n)?,
                    ('S', true) => TimeDelta::try_seconds(n)?,
                    _ => return None,
                };
                total = total.checked_add(&part)?;
            }
        }
    }
    if !digits.is_empty() {
        return None;
    }

    Some(if negative { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::Asia::Shanghai;

    fn prop(name: &str, params: &[(&str, &str)], value: &str) -> Property {
        Property {
            name: name.to_string(),
            params: if params.is_empty() {
                None
            } else {
                Some(
                    params
                        .iter()
                        .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
                        .collect(),
                )
            },
            value: Some(value.to_string()),
        }
    }

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DT_FMT).unwrap()
    }

    #[test]
    fn date_values_are_floating_midnight() {
        let v = parse_datetime(&prop("DTSTART", &[("VALUE", "DATE")], "20250501"), true).unwrap();
        assert!(v.date_only);
        assert_eq!(v.stamp, Timestamp::Floating(naive("20250501T000000")));
    }

    #[test]
    fn utc_and_tzid_values_are_zoned() {
        let v = parse_datetime(&prop("DTSTART", &[], "20250430T160000Z"), true).unwrap();
        assert_eq!(v.stamp, Timestamp::from(Utc.from_utc_datetime(&naive("20250430T160000"))));

        let v = parse_datetime(&prop("DTSTART", &[("TZID", "Asia/Shanghai")], "20250501T000000"), true)
            .unwrap();
        assert_eq!(
            v.stamp,
            Timestamp::from(Shanghai.from_local_datetime(&naive("20250501T000000")).unwrap())
        );
        assert!(!v.date_only);
    }

    #[test]
    fn floating_and_bad_values() {
        let v = parse_datetime(&prop("DTEND", &[], "20250501T090000"), false).unwrap();
        assert_eq!(v.stamp, Timestamp::Floating(naive("20250501T090000")));

        assert!(parse_datetime(&prop("DTEND", &[], "2025-05-01"), false).is_err());
        assert!(matches!(
            parse_datetime(&prop("DTSTART", &[("TZID", "Nowhere/Land")], "20250501T000000"), true),
            Err(Error::UnknownZone(_))
        ));
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("P1D"), Some(TimeDelta::days(1)));
        assert_eq!(parse_duration("PT1H30M"), Some(TimeDelta::minutes(90)));
        assert_eq!(parse_duration("-P1W2DT3H"), Some(-(TimeDelta::days(9) + TimeDelta::hours(3))));
        assert_eq!(parse_duration("P1"), None);
        assert_eq!(parse_duration("1D"), None);
        assert_eq!(parse_duration("P1H"), None);
    }

    #[test]
    fn missing_end_follows_rfc_defaults() {
        let date_only = raw_event(&[
            prop("SUMMARY", &[], "端午节"),
            prop("DTSTART", &[("VALUE", "DATE")], "20250531"),
        ])
        .unwrap();
        assert!(date_only.all_day);
        assert_eq!(date_only.end, Some(Timestamp::Floating(naive("20250601T000000"))));

        let with_duration = raw_event(&[
            prop("DTSTART", &[], "20250531T080000"),
            prop("DURATION", &[], "PT2H"),
        ])
        .unwrap();
        assert_eq!(with_duration.end, Some(Timestamp::Floating(naive("20250531T100000"))));

        let instant = raw_event(&[prop("DTSTART", &[], "20250531T080000")]).unwrap();
        assert_eq!(instant.end, Some(instant.start));
    }

    #[test]
    fn broken_end_and_missing_start() {
        let broken = raw_event(&[
            prop("DTSTART", &[("VALUE", "DATE")], "20250531"),
            prop("DTEND", &[], "garbage"),
        ])
        .unwrap();
        assert_eq!(broken.end, None);

        assert!(raw_event(&[prop("SUMMARY", &[], "no start")]).is_err());
    }

    #[test]
    fn rejects_non_calendar_text() {
        assert!(matches!(parse_calendar("hello"), Err(Error::Parse(_))));
    }
}
