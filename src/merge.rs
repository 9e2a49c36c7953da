//! Merge engine: reassembles fragments into per-year holiday periods and
//! attributes makeup workdays to the holiday they offset.
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

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Days, NaiveDate};
use chrono_tz::Tz;
use log::debug;

use crate::normalize::{NormalizedFragment, Normalizer};
use crate::period::{DayCounts, HolidayPeriod};

/// How far before a holiday's first day or after its last day a makeup
/// workday may sit and still be attributed to it
pub const MAKEUP_WINDOW_DAYS: u64 = 14;

/// A staged makeup workday, alive only between the two merge passes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MakeupMarker {
    /// Canonical name with makeup keywords stripped
    pub related_clean_name: String,
    pub date: NaiveDate,
}

/// Fragments sharing one `(name, start year)` key
#[derive(Debug)]
struct Group {
    name: String,
    year: i32,
    begin: DateTime<Tz>,
    end: DateTime<Tz>,
    uid: String,
    description: String,
    makeup: BTreeSet<NaiveDate>,
}

impl Group {
    fn new(frag: &NormalizedFragment, year: i32) -> Self {
        Group {
            name: frag.canonical_name.clone(),
            year,
            begin: frag.start,
            end: frag.end,
            uid: frag.source_uid.clone(),
            description: frag.raw_description.clone(),
            makeup: BTreeSet::new(),
        }
    }

    /// Widens the span to cover `frag`, whatever the arrival order
    fn extend(&mut self, frag: &NormalizedFragment) {
        self.begin = self.begin.min(frag.start);
        self.end = self.end.max(frag.end);
    }

    fn window_contains(&self, date: NaiveDate) -> bool {
        let window = Days::new(MAKEUP_WINDOW_DAYS);
        let lo = self.begin.date_naive().checked_sub_days(window).unwrap_or(NaiveDate::MIN);
        let hi = self.end.date_naive().checked_add_days(window).unwrap_or(NaiveDate::MAX);
        lo <= date && date <= hi
    }

    fn into_period(self) -> HolidayPeriod {
        let counts = DayCounts::compute(self.begin.date_naive(), self.end.date_naive(), self.makeup.len());
        HolidayPeriod {
            name: self.name,
            year: self.year,
            begin: self.begin,
            end: self.end,
            total_days: counts.total,
            days_excl_makeup: counts.excl_makeup,
            days_excl_makeup_weekend: counts.excl_makeup_weekend,
            makeup_dates: self.makeup,
            uid: self.uid,
            description: self.description,
        }
    }
}

/// Groups fragments and attributes makeup markers
///
/// Groups live in creation order (first fragment seen first); marker
/// attribution scans them in that order and stops at the first match, so a
/// marker inside the windows of two same-named groups goes to the one
/// created earlier rather than the closest one.
pub struct MergeEngine<'a> {
    normalizer: &'a Normalizer,
    groups: Vec<Group>,
    index: HashMap<(String, i32), usize>,
    pending: Vec<MakeupMarker>,
}

impl<'a> MergeEngine<'a> {
    pub fn new(normalizer: &'a Normalizer) -> Self {
        MergeEngine {
            normalizer,
            groups: Vec::new(),
            index: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// First pass: groups an ordinary fragment or stages a makeup marker.
    ///
    /// Fragments ending before `now`'s year are ignored.
    pub fn push(&mut self, frag: &NormalizedFragment, now: &DateTime<Tz>) {
        if frag.end.year() < now.year() {
            debug!("expired fragment '{}' ({})", frag.canonical_name, frag.end.date_naive());
            return;
        }

        if frag.is_makeup_marker {
            self.pending.push(MakeupMarker {
                related_clean_name: self.normalizer.clean_name(&frag.canonical_name),
                date: frag.start.date_naive(),
            });
            return;
        }

        let year = frag.start.year();
        match self.index.get(&(frag.canonical_name.clone(), year)) {
            Some(&idx) => self.groups[idx].extend(frag),
            None => {
                self.index.insert((frag.canonical_name.clone(), year), self.groups.len());
                self.groups.push(Group::new(frag, year));
            }
        }
    }

    /// Second pass and finalization: attributes staged markers, drops
    /// holidays that are over by `now`'s date and returns the rest sorted by
    /// begin, then name.
    pub fn finish(mut self, now: &DateTime<Tz>) -> Vec<HolidayPeriod> {
        let attributed: Vec<(usize, NaiveDate)> = {
            let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
            for (idx, group) in self.groups.iter().enumerate() {
                by_name.entry(group.name.as_str()).or_default().push(idx);
            }

            self.pending
                .iter()
                .filter_map(|marker| {
                    let hit = by_name
                        .get(marker.related_clean_name.as_str())
                        .and_then(|candidates| {
                            candidates
                                .iter()
                                .copied()
                                .find(|&idx| self.groups[idx].window_contains(marker.date))
                        });
                    if hit.is_none() {
                        debug!(
                            "unmatched makeup day '{}' on {}",
                            marker.related_clean_name, marker.date
                        );
                    }
                    hit.map(|idx| (idx, marker.date))
                })
                .collect()
        };

        for (idx, date) in attributed {
            self.groups[idx].makeup.insert(date);
        }

        let today = now.date_naive();
        let mut periods: Vec<HolidayPeriod> = self
            .groups
            .into_iter()
            .filter(|g| g.end.date_naive() >= today)
            .map(Group::into_period)
            .collect();

        periods.sort_by(|a, b| a.begin.cmp(&b.begin).then_with(|| a.name.cmp(&b.name)));
        periods
    }
}

/// Runs both merge passes over `fragments`
pub fn merge(
    fragments: &[NormalizedFragment],
    normalizer: &Normalizer,
    now: &DateTime<Tz>,
) -> Vec<HolidayPeriod> {
    let mut engine = MergeEngine::new(normalizer);
    for frag in fragments {
        engine.push(frag, now);
    }
    engine.finish(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    fn frag(name: &str, start: (i32, u32, u32), end: (i32, u32, u32), makeup: bool) -> NormalizedFragment {
        NormalizedFragment {
            canonical_name: name.to_string(),
            is_makeup_marker: makeup,
            start: Shanghai.with_ymd_and_hms(start.0, start.1, start.2, 0, 0, 0).unwrap(),
            end: Shanghai.with_ymd_and_hms(end.0, end.1, end.2, 23, 59, 59).unwrap(),
            source_uid: format!("{name}-{}{}{}", start.0, start.1, start.2),
            raw_description: String::new(),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Tz> {
        Shanghai.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reassembles_out_of_order_fragments() {
        let n = Normalizer::default();
        let frags = vec![
            frag("国庆节", (2025, 10, 3), (2025, 10, 8), false),
            frag("国庆节", (2025, 10, 1), (2025, 10, 1), false),
            frag("国庆节", (2025, 10, 2), (2025, 10, 2), false),
        ];
        let periods = merge(&frags, &n, &at(2025, 9, 1));
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].begin.date_naive(), date(2025, 10, 1));
        assert_eq!(periods[0].end.date_naive(), date(2025, 10, 8));
        assert_eq!(periods[0].total_days, 8);
        assert_eq!(periods[0].uid, "国庆节-2025103");
    }

    #[test]
    fn same_year_merges_regardless_of_gap() {
        let n = Normalizer::default();
        let frags = vec![
            frag("纪念日", (2025, 2, 1), (2025, 2, 1), false),
            frag("纪念日", (2025, 11, 1), (2025, 11, 1), false),
        ];
        let periods = merge(&frags, &n, &at(2025, 1, 1));
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].total_days, (date(2025, 11, 1) - date(2025, 2, 1)).num_days() + 1);
    }

    #[test]
    fn makeup_markers_are_attributed_not_grouped() {
        let n = Normalizer::default();
        let frags = vec![
            frag("国庆节 补班", (2025, 9, 28), (2025, 9, 28), true),
            frag("国庆节", (2025, 10, 1), (2025, 10, 8), false),
            frag("国庆节 补班", (2025, 10, 11), (2025, 10, 11), true),
        ];
        let periods = merge(&frags, &n, &at(2025, 9, 1));
        assert_eq!(periods.len(), 1);
        let p = &periods[0];
        assert_eq!(p.makeup_dates, BTreeSet::from([date(2025, 9, 28), date(2025, 10, 11)]));
        assert_eq!((p.total_days, p.days_excl_makeup, p.days_excl_makeup_weekend), (8, 6, 4));
    }

    #[test]
    fn duplicate_marker_dates_count_once() {
        let n = Normalizer::default();
        let frags = vec![
            frag("劳动节", (2025, 5, 1), (2025, 5, 5), false),
            frag("劳动节 调休", (2025, 4, 27), (2025, 4, 27), true),
            frag("劳动节 补班", (2025, 4, 27), (2025, 4, 27), true),
        ];
        let periods = merge(&frags, &n, &at(2025, 4, 1));
        assert_eq!(periods[0].makeup_dates.len(), 1);
        assert_eq!(periods[0].days_excl_makeup, 4);
    }

    #[test]
    fn window_edges() {
        let n = Normalizer::default();
        let inside = vec![
            frag("中秋节", (2025, 10, 15), (2025, 10, 16), false),
            frag("中秋节 补班", (2025, 10, 1), (2025, 10, 1), true),
            frag("中秋节 补班", (2025, 10, 30), (2025, 10, 30), true),
        ];
        let p = &merge(&inside, &n, &at(2025, 9, 1))[0];
        assert_eq!(p.makeup_dates.len(), 2);

        let outside = vec![
            frag("中秋节", (2025, 10, 15), (2025, 10, 16), false),
            frag("中秋节 补班", (2025, 9, 30), (2025, 9, 30), true),
            frag("中秋节 补班", (2025, 10, 31), (2025, 10, 31), true),
        ];
        let p = &merge(&outside, &n, &at(2025, 9, 1))[0];
        assert!(p.makeup_dates.is_empty());
        assert_eq!(p.days_excl_makeup, p.total_days);
    }

    #[test]
    fn marker_for_unknown_holiday_is_dropped() {
        let n = Normalizer::default();
        let frags = vec![frag("端午节 补班", (2025, 5, 31), (2025, 5, 31), true)];
        assert!(merge(&frags, &n, &at(2025, 5, 1)).is_empty());
    }

    #[test]
    fn years_never_merge() {
        let n = Normalizer::default();
        let frags = vec![
            frag("元旦", (2026, 1, 1), (2026, 1, 1), false),
            frag("元旦", (2025, 1, 1), (2025, 1, 1), false),
        ];
        let periods = merge(&frags, &n, &at(2024, 12, 1));
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].year, 2025);
        assert_eq!(periods[1].year, 2026);
    }

    #[test]
    fn boundary_marker_goes_to_first_created_group() {
        let n = Normalizer::default();
        // 2025-12-28 sits within 14 days of both groups
        let frags = vec![
            frag("跨年", (2026, 1, 1), (2026, 1, 3), false),
            frag("跨年", (2025, 12, 20), (2025, 12, 20), false),
            frag("跨年 调休", (2025, 12, 28), (2025, 12, 28), true),
        ];
        let periods = merge(&frags, &n, &at(2025, 12, 1));
        let y2026 = periods.iter().find(|p| p.year == 2026).unwrap();
        let y2025 = periods.iter().find(|p| p.year == 2025).unwrap();
        assert_eq!(y2026.makeup_dates.len(), 1);
        assert!(y2025.makeup_dates.is_empty());
    }

    #[test]
    fn past_and_expired_are_dropped() {
        let n = Normalizer::default();
        let frags = vec![
            frag("春节", (2025, 1, 28), (2025, 2, 4), false),
            frag("元旦", (2024, 12, 30), (2024, 12, 31), false),
            frag("劳动节", (2025, 5, 1), (2025, 5, 5), false),
        ];
        let periods = merge(&frags, &n, &at(2025, 3, 1));
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].name, "劳动节");
    }

    #[test]
    fn ongoing_holiday_is_kept() {
        let n = Normalizer::default();
        let frags = vec![frag("劳动节", (2025, 5, 1), (2025, 5, 5), false)];
        assert_eq!(merge(&frags, &n, &at(2025, 5, 5)).len(), 1);
        assert!(merge(&frags, &n, &at(2025, 5, 6)).is_empty());
    }

    #[test]
    fn ties_sort_by_name() {
        let n = Normalizer::default();
        let frags = vec![
            frag("b", (2025, 6, 1), (2025, 6, 1), false),
            frag("a", (2025, 6, 1), (2025, 6, 1), false),
        ];
        let names: Vec<_> = merge(&frags, &n, &at(2025, 1, 1)).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
