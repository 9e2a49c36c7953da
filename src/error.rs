//! Error types shared by the feed, parser and configuration layers.
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

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the collaborators around the holiday pipeline.
///
/// The pipeline itself never fails: malformed events and unmatched makeup
/// days are skipped, so none of these variants come out of
/// [`crate::build_holiday_periods`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Calendar text is not well-formed iCalendar syntax
    #[error("malformed calendar: {0}")]
    Parse(String),

    /// Feed source answered but could not deliver calendar text
    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Zone identifier is not a known IANA time zone
    #[error("unknown time zone '{0}'")]
    UnknownZone(String),

    /// Timestamp text does not match any accepted layout
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}
