//! Configuration module for the holiday period report.
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

use std::time::Duration;

use chrono_tz::Tz;
use serde::{de::{Error, Visitor}, Deserialize};

use crate::{feed::DEFAULT_TIMEOUT_SECS, normalize::Normalizer};

/// Main configuration structure for the application.
/// 
/// Holds the zone every timestamp is anchored in, the calendar sources and
/// optional keyword overrides for name normalization.
#[derive(Deserialize, Clone, Debug)]
pub struct Conf {
    /// Basic configuration settings
    base: Base,
    /// Calendar configuration for external data sources
    calendar: Option<Calendar>,
    /// Keyword overrides for the normalizer
    keywords: Option<Keywords>,
}

/// Basic configuration settings.
/// 
/// The time zone is mandatory; floating feed times are read in it.
#[derive(Deserialize, Clone, Debug)]
struct Base {
    /// IANA zone identifier such as "Asia/Shanghai"
    #[serde(deserialize_with = "deserialize_zone")]
    timezone: Tz,
}

/// Calendar configuration for external data sources.
#[derive(Deserialize, Clone, Debug)]
struct Calendar {
    /// List of calendar URLs or local file paths
    source: Option<Vec<String>>,
    /// Request timeout in seconds
    timeout: Option<u64>,
}

/// Keyword sets replacing the built-in ones when present
#[derive(Deserialize, Clone, Debug)]
struct Keywords {
    /// Words marking a compensatory workday
    makeup: Option<Vec<String>>,
    /// Standalone words dropped from holiday names
    filler: Option<Vec<String>>,
}

impl Conf {
    /// Returns the zone all timestamps are anchored in.
    pub fn zone(&self) -> Tz {
        self.base.timezone
    }

    /// Returns the list of calendar sources, empty if none configured.
    pub fn sources(&self) -> &[String] {
        self.calendar
            .as_ref()
            .and_then(|cal| cal.source.as_deref())
            .unwrap_or(&[])
    }

    /// Returns the request timeout for remote sources.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .calendar
            .as_ref()
            .and_then(|cal| cal.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Builds a normalizer from the configured keywords, falling back to
    /// the built-in sets for whatever is not configured.
    pub fn normalizer(&self) -> Normalizer {
        let defaults = Normalizer::default();
        let Some(keywords) = &self.keywords else {
            return defaults;
        };

        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Normalizer::new(
            keywords
                .makeup
                .clone()
                .unwrap_or_else(|| owned(crate::normalize::MAKEUP_KEYWORDS)),
            keywords
                .filler
                .clone()
                .unwrap_or_else(|| owned(crate::normalize::FILLER_WORDS)),
        )
    }
}

/// Deserializes an IANA zone identifier into a `Tz`.
fn deserialize_zone<'de, D>(deserializer: D) -> Result<Tz, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_str(ZoneVisitor)
}

/// Error message format for zone deserialization errors.
const ERR_FMT: &str = "an IANA time zone identifier like 'Asia/Shanghai'";

/// Visitor for deserializing zone strings into Tz.
struct ZoneVisitor;

impl<'a> Visitor<'a> for ZoneVisitor {
    type Value = Tz;

    /// Describes the expected format for error messages.
    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", &ERR_FMT)
    }

    /// Resolves the zone name, rejecting empty and unknown identifiers.
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match v.trim().len() {
            0 => Err(Error::invalid_length(0, &ERR_FMT)),
            _ => crate::tz::parse_zone(v)
                .map_err(|_| Error::invalid_value(serde::de::Unexpected::Str(v), &ERR_FMT)),
        }
    }
}
