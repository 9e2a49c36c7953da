//! Command-line interface parser for the holiday period report.
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

use std::{fs::File, io::Read};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{builder::TypedValueParser, Parser};

use crate::{conf::Conf, tz::Timestamp};

/// Help message for time format specification
const HELP_MSG: &str = "Time format must be one of: \"now\", \"YYYYmmDD\", \"YYYYmmDDHHMMss\" or UNIX timestamp(millisecond)\nDates and date-times are wall-clock time in the configured zone";
/// Date format string (YYYYmmDD)
const DATE_FORMAT: &str = "%Y%m%d";
/// Date and time format string (YYYYmmDDHHMMSS)
const DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

const DEFAULT_NOW_VALUE: &str = "now";

/// Command-line interface structure
#[derive(Parser)]
#[command(
    version(env!("CARGO_PKG_VERSION")),
    author(env!("CARGO_PKG_AUTHORS")),
    about(env!("CARGO_PKG_DESCRIPTION")),
    long_about = "Rebuilds holiday periods from ICS feeds that publish holidays \
                 and makeup workdays, and reports day counts per period."
)]
pub struct Cli {
    /// Reference time for expiry filtering and the countdown
    /// 
    /// Supports multiple formats:
    /// - "now": The current instant
    /// - "YYYYmmDD": Midnight of a specific date (e.g., 20250501)
    /// - "YYYYmmDDHHMMSS": Specific date and time
    /// - UNIX timestamp in millisecond
    #[arg(
        long,
        short,
        required = false,
        value_parser = TimestampParser,
        default_value = DEFAULT_NOW_VALUE,
        help = HELP_MSG
    )]
    now: Timestamp,
    
    /// Configuration file path
    /// 
    /// TOML configuration file containing the time zone,
    /// calendar sources and keyword overrides.
    #[arg(
        long,
        short,
        required = true,
        value_parser = ConfParser,
        help = "Path to TOML configuration file"
    )]
    conf: Conf,
}

impl Cli {
    /// Returns a reference to the parsed configuration
    pub fn conf(&self) -> &Conf {
        &self.conf
    }
    
    /// Returns the reference time
    pub fn now(&self) -> Timestamp {
        self.now
    }
}

/// Parses a command-line time value
/// 
/// # Supported Formats
/// * "now": The current instant, zone-aware
/// * "YYYYmmDD": Date only (e.g., 20250501), floating midnight
/// * "YYYYmmDDHHMMSS": Full timestamp (e.g., 20250501143000), floating
/// * UNIX timestamp in millisecond, zone-aware
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    if value == DEFAULT_NOW_VALUE {
        return Some(Local::now().into());
    }

    // Try parsing as date only first (YYYYmmDD)
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date.and_time(NaiveTime::MIN).into());
    }

    // Try parsing as full timestamp (YYYYmmDDHHMMSS)
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return Some(dt.into());
    }

    // Try parsing as unix timestamp
    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(Timestamp::from)
}

/// Custom parser for timestamp values
#[derive(Clone)]
struct TimestampParser;

impl TypedValueParser for TimestampParser {
    type Value = Timestamp;

    /// Parses timestamp strings from command-line arguments
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(value_str) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::DisplayHelp));
        };

        parse_timestamp(value_str).ok_or_else(|| {
            clap::Error::raw(clap::error::ErrorKind::InvalidValue, HELP_MSG)
        })
    }
}

/// Custom parser for configuration file loading
#[derive(Clone)]
struct ConfParser;

impl TypedValueParser for ConfParser {
    type Value = Conf;

    /// Parses configuration file path and loads the configuration
    /// 
    /// # Errors
    /// * File not found or permission denied
    /// * Invalid TOML format
    /// * Missing or unknown time zone
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(file_path) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::DisplayHelp));
        };
        
        // Open configuration file
        let mut file = File::open(file_path).map_err(|e| {
            let error_msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("Configuration file '{}' not found", file_path),
                std::io::ErrorKind::PermissionDenied => format!("Permission denied for '{}'", file_path),
                _ => format!("Cannot access configuration file '{}': {}", file_path, e),
            };
            clap::Error::raw(clap::error::ErrorKind::InvalidValue, error_msg)
        })?;
        
        // Read file contents
        let mut config_content = String::new();
        file.read_to_string(&mut config_content).map_err(|e| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("Failed to read configuration file '{}': {}", file_path, e)
            )
        })?;
        
        // Parse TOML configuration
        toml::from_str(&config_content).map_err(|e| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("Invalid configuration in '{}': {}", file_path, e)
            )
        })
    }
}
