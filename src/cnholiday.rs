//! Report assembly: sources in, holiday periods and totals out.
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

use chrono_tz::Tz;
use log::{info, warn};

use crate::{
    cli::Cli,
    conf::Conf,
    countdown::Countdown,
    error::{Error, Result},
    feed, ical,
    normalize::RawEvent,
    period::{aggregate_totals, DayCounts, HolidayPeriod},
    tz::Timestamp,
};

/// Main holiday period reporter
pub struct CnHoliday {
    /// Zone, sources and keyword configuration
    conf: Conf,
    /// Reference time for expiry filtering and the countdown
    now: Timestamp,
}

/// Finalized holiday periods for one refresh
#[derive(Debug)]
pub struct Report {
    pub periods: Vec<HolidayPeriod>,
    pub totals: DayCounts,
    now: Timestamp,
    zone: Tz,
}

impl CnHoliday {
    /// Creates a reporter from command-line arguments
    pub fn new(cli: &Cli) -> Self {
        Self::with(cli.conf().clone(), cli.now())
    }

    /// Creates a reporter from a configuration and a reference time
    pub fn with(conf: Conf, now: Timestamp) -> Self {
        Self { conf, now }
    }

    /// Loads every configured source and builds the report
    /// 
    /// # Errors
    /// * `Error::Fetch` when sources are configured but none could be
    ///   loaded and parsed
    /// 
    /// A source that fails to download or parse is logged and skipped.
    pub async fn report(&self) -> Result<Report> {
        let sources = self.conf.sources();
        let texts = feed::load_all(sources, self.conf.timeout()).await;

        let mut events: Vec<RawEvent> = Vec::new();
        let mut loaded = 0;
        for (uri, text) in sources.iter().zip(texts) {
            match text.and_then(|t| ical::parse_calendar(&t)) {
                Ok(parsed) => {
                    loaded += 1;
                    events.extend(parsed);
                }
                Err(e) => warn!("source '{}' skipped: {}", uri, e),
            }
        }

        if loaded == 0 && !sources.is_empty() {
            return Err(Error::Fetch {
                url: sources.join(", "),
                reason: "no calendar source could be loaded".to_string(),
            });
        }

        Ok(self.report_from(&events))
    }

    /// Builds the report from events already parsed
    pub fn report_from(&self, events: &[RawEvent]) -> Report {
        let zone = self.conf.zone();
        let periods = crate::build_holiday_periods_with(&self.conf.normalizer(), events, &self.now, &zone);
        let totals = aggregate_totals(&periods);
        info!("{} holiday periods from {} events", periods.len(), events.len());

        Report {
            periods,
            totals,
            now: self.now,
            zone,
        }
    }
}

impl Report {
    /// Where the reference time stands relative to the periods
    pub fn countdown(&self) -> Countdown<'_> {
        Countdown::at(&self.periods, &self.now, &self.zone)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "holiday\tbegin\tend\tdays\texcl. makeup\texcl. makeup+weekend")?;
        for p in &self.periods {
            writeln!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}",
                p.name,
                p.begin.date_naive(),
                p.end.date_naive(),
                p.total_days,
                p.days_excl_makeup,
                p.days_excl_makeup_weekend
            )?;
        }
        writeln!(
            f,
            "total\t\t\t{}\t{}\t{}",
            self.totals.total, self.totals.excl_makeup, self.totals.excl_makeup_weekend
        )?;
        write!(f, "{}", self.countdown())
    }
}
