// Retrieval of the election data, from a file or over HTTP.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;

use crate::mapsite::*;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DataSource {
    File(PathBuf),
    Http {
        url: String,
        /// Appends a `v=<millis>` parameter so that intermediary caches are
        /// bypassed.
        cache_bust: bool,
        timeout: Duration,
    },
}

impl DataSource {
    pub fn new(location: &str, cache_bust: bool, timeout: Duration) -> DataSource {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Http {
                url: location.to_string(),
                cache_bust,
                timeout,
            }
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

/// The URL actually requested, with the cache-busting parameter if asked for.
pub fn resource_url(url: &str, cache_bust: bool, now_millis: i64) -> String {
    if !cache_bust {
        return url.to_string();
    }
    let (base, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}v={}{}", base, sep, now_millis, fragment)
}

fn fetch_http(url: &str, timeout: Duration) -> MapResult<Vec<u8>> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .context(HttpTransportSnafu { url })?;
    let resp = client
        .get(url)
        .send()
        .context(HttpTransportSnafu { url })?;
    let status = resp.status();
    if !status.is_success() {
        return HttpStatusSnafu {
            status: status.as_u16(),
            url,
        }
        .fail();
    }
    let bytes = resp.bytes().context(HttpTransportSnafu { url })?;
    Ok(bytes.to_vec())
}

/// Issues one read of the resource.
pub fn fetch(source: &DataSource) -> MapResult<Vec<u8>> {
    match source {
        DataSource::File(path) => {
            let p = path.display().to_string();
            info!("Attempting to read election data {:?}", p);
            fs::read(path).context(OpeningFileSnafu { path: p })
        }
        DataSource::Http {
            url,
            cache_bust,
            timeout,
        } => {
            let url = resource_url(url, *cache_bust, Utc::now().timestamp_millis());
            info!("Attempting to fetch election data {:?}", url);
            fetch_http(&url, *timeout)
        }
    }
}

/// Reads and parses the dataset. Nothing partial is returned on failure.
pub fn load(source: &DataSource) -> Result<ElectionDataset, LoadFailure> {
    let bytes = fetch(source).map_err(|e| {
        warn!("load: {}", e);
        LoadFailure::Transport(e.to_string())
    })?;
    debug!("load: read {} bytes", bytes.len());
    ElectionDataset::from_json_slice(&bytes).map_err(|e| {
        warn!("load: {}", e);
        e
    })
}
