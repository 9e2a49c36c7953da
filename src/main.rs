//! Holiday period report built from public holiday ICS feeds.
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

use clap::Parser;
use cnholiday::{cli::Cli, cnholiday::CnHoliday};
use log::error;

/// Main entry point for the holiday period report
/// 
/// # Usage Examples
/// ```bash
/// # Report holidays from now on using the configured sources
/// cnholiday -c config.toml
/// 
/// # Report as of a specific date
/// cnholiday -c config.toml -n 20250401
/// 
/// # Debug logging of skipped events and unmatched makeup days
/// RUST_LOG=debug cnholiday -c config.toml
/// ```
/// 
/// # Configuration
/// ```toml
/// [base]
/// timezone = "Asia/Shanghai"
/// 
/// [calendar]
/// source = ["https://www.shuyz.com/githubfiles/china-holiday-calender/master/holidayCal.ics"]
/// timeout = 15
/// ```
#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    
    match CnHoliday::new(&cli).report().await {
        Ok(report) => println!("{}", report),
        Err(e) => {
            error!("{}", e);
            // Non-zero exit code when no source could be read
            std::process::exit(1);
        }
    }
}
