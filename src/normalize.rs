//! Event normalization: canonical holiday names and makeup-day classification.
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

use chrono::{DateTime, Datelike, NaiveTime};
use chrono_tz::Tz;
use log::debug;

use crate::tz::{localize, unify, Timestamp};

/// Keywords marking a compensatory workday ("makeup day")
pub const MAKEUP_KEYWORDS: &[&str] = &["补班", "调休", "上班", "补上班", "调班", "workday", "makeup"];

/// Standalone filler tokens meaning "vacation" that carry no identity
pub const FILLER_WORDS: &[&str] = &["假期", "假日", "放假"];

/// One calendar event as handed over by the calendar parser
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent {
    /// Feed uid, kept for provenance only
    pub uid: String,
    pub title: String,
    pub start: Timestamp,
    /// Exclusive end as found in the feed
    pub end: Option<Timestamp>,
    pub all_day: bool,
    pub description: String,
}

/// An event after name normalization, ready for grouping
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedFragment {
    pub canonical_name: String,
    pub is_makeup_marker: bool,
    pub start: DateTime<Tz>,
    /// Inclusive of the last calendar day
    pub end: DateTime<Tz>,
    pub source_uid: String,
    pub raw_description: String,
}

/// Turns raw events into fragments using a makeup keyword set and a filler word set
#[derive(Clone, Debug)]
pub struct Normalizer {
    /// ASCII-lowercased, longest first so "补上班" goes before "上班" when stripping
    makeup: Vec<String>,
    filler: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(
            MAKEUP_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            FILLER_WORDS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl Normalizer {
    /// Creates a normalizer from custom keyword sets
    pub fn new(makeup: Vec<String>, filler: Vec<String>) -> Self {
        let mut makeup: Vec<String> = makeup
            .into_iter()
            .map(|kw| kw.trim().to_ascii_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        makeup.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        makeup.dedup();

        Self {
            makeup,
            filler: filler.into_iter().map(|w| w.trim().to_string()).collect(),
        }
    }

    /// Reduces an event title to the holiday name used as grouping key
    ///
    /// # Examples
    /// * "劳动节 第1天/共3天" → "劳动节"
    /// * "劳动节 补班 第1天/共1天" → "劳动节 补班"
    /// * "元旦 假期" → "元旦"
    /// * "Labor Day day 1 of 3" → "Labor Day"
    pub fn canonical_name(&self, title: &str) -> String {
        let title = title.trim();
        let head = match ordinal_marker(title) {
            Some(idx) => &title[..idx],
            None => title,
        };

        head.split_whitespace()
            .filter(|token| !self.filler.iter().any(|f| f == token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ASCII case-insensitive check against the makeup keyword set.
    ///
    /// Matches exactly the keywords [`Normalizer::clean_name`] strips.
    pub fn is_makeup(&self, text: &str) -> bool {
        let lower = text.to_ascii_lowercase();
        self.makeup.iter().any(|kw| lower.contains(kw.as_str()))
    }

    /// Strips makeup keywords from a canonical name, e.g. "劳动节 调休" → "劳动节"
    pub fn clean_name(&self, name: &str) -> String {
        let mut out = name.to_string();
        for kw in &self.makeup {
            // ASCII lowering keeps byte offsets aligned with `out`
            while let Some(idx) = out.to_ascii_lowercase().find(kw.as_str()) {
                out.replace_range(idx..idx + kw.len(), " ");
            }
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalizes one raw event against the current time in `zone`.
    ///
    /// Returns `None` for events without an end, titles that normalize to
    /// nothing, and events that ended more than a year before `now`'s year.
    pub fn normalize(
        &self,
        raw: &RawEvent,
        zone: &Tz,
        now: &DateTime<Tz>,
    ) -> Option<NormalizedFragment> {
        let Some(raw_end) = &raw.end else {
            debug!("skip '{}': no end timestamp", raw.title);
            return None;
        };

        let name = self.canonical_name(&raw.title);
        if name.is_empty() {
            debug!("skip uid '{}': empty title", raw.uid);
            return None;
        }

        let mut start = unify(&raw.start, zone);
        let mut end = unify(raw_end, zone);
        if end.year() + 1 < now.year() {
            debug!("skip '{}': stale, ended {}", raw.title, end.date_naive());
            return None;
        }

        if raw.all_day {
            let start_date = start.date_naive();
            let end_date = end
                .date_naive()
                .pred_opt()
                .unwrap_or(start_date)
                .max(start_date);
            start = localize(&start_date.and_time(NaiveTime::MIN), zone);
            end = localize(&end_date.and_hms_opt(23, 59, 59)?, zone);
        }

        // notices of ordinary holiday days mention 调休 too, so the
        // description never classifies
        let is_makeup_marker = self.is_makeup(&name);

        Some(NormalizedFragment {
            canonical_name: name,
            is_makeup_marker,
            start,
            end,
            source_uid: raw.uid.clone(),
            raw_description: raw.description.clone(),
        })
    }
}

/// Byte offset of the first day-ordinal marker: a whitespace followed by
/// `第` or by `day <digit>` in any case.
fn ordinal_marker(title: &str) -> Option<usize> {
    title
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .find(|(idx, c)| {
            let rest = &title[idx + c.len_utf8()..];
            if rest.starts_with('第') {
                return true;
            }
            match rest.get(..3) {
                Some(word) if word.eq_ignore_ascii_case("day") => {
                    let after = &rest[3..];
                    after.starts_with(char::is_whitespace)
                        && after.trim_start().starts_with(|c: char| c.is_ascii_digit())
                }
                _ => false,
            }
        })
        .map(|(idx, _)| idx)
}
