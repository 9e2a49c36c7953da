//! Feed sources: remote ICS over HTTP and local ICS files.
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

use log::{debug, info};

use crate::error::{Error, Result};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Downloads calendar text from `url`.
///
/// Non-success status codes are failures; no partial body is returned.
pub async fn fetch(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<String> {
    let resp = client.get(url).timeout(timeout).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        });
    }

    let text = resp.text().await?;
    debug!("downloaded {} bytes from {}", text.len(), url);
    Ok(text)
}

/// Reads one source: sources starting with `http` are fetched, anything
/// else is read as a local file path
pub async fn load(client: &reqwest::Client, uri: &str, timeout: Duration) -> Result<String> {
    if uri.starts_with("http") {
        fetch(client, uri, timeout).await
    } else {
        let text = tokio::fs::read_to_string(uri).await?;
        debug!("read {} bytes from {}", text.len(), uri);
        Ok(text)
    }
}

/// Loads every source concurrently; results keep the order of `sources`.
pub async fn load_all(sources: &[String], timeout: Duration) -> Vec<Result<String>> {
    let client = reqwest::Client::new();

    let tasks: Vec<_> = sources
        .iter()
        .map(|uri| {
            let client = client.clone();
            let uri = uri.clone();
            tokio::spawn(async move { load(&client, &uri, timeout).await })
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for (task, uri) in tasks.into_iter().zip(sources) {
        let result = task.await.unwrap_or_else(|e| {
            Err(Error::Fetch {
                url: uri.clone(),
                reason: e.to_string(),
            })
        });
        results.push(result);
    }

    info!(
        "loaded {}/{} calendar sources",
        results.iter().filter(|r| r.is_ok()).count(),
        sources.len()
    );
    results
}
