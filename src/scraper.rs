//! Update-or-skip caching of the live NYT county dataset.
//!
//! The live file carries a single date stamp on every row. The local cache is
//! rewritten only when its first row's date differs from the live one, or when
//! it is missing or unreadable.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::data::{read_case_records, CaseRecord};

/// Live county-level dataset
pub const LIVE_CASES_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/live/us-counties.csv";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Outcome of a freshness check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    /// Local cache already carries the live date
    UpToDate,
    /// Local cache was (re)written
    Written,
    /// The check failed; whatever cache exists is used as-is
    Skipped,
}

/// Build the HTTP client used for the live fetch
pub fn client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?)
}

/// Download the live CSV body
pub async fn fetch_live(client: &Client, url: &str) -> Result<String> {
    debug!(url, "Fetching live case data");
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Bad status from {}", url))?;
    let body = response.text().await.context("Failed to read response body")?;
    debug!(bytes = body.len(), "Fetched live case data");
    Ok(body)
}

/// Date stamp of the first data row
pub fn updated_date(body: &str) -> Option<String> {
    first_date(&read_case_records(body.as_bytes()).ok()?)
}

fn first_date(records: &[CaseRecord]) -> Option<String> {
    records
        .first()
        .map(|record| record.date.clone())
        .filter(|date| !date.is_empty())
}

/// Parse every live row, stamping each with the live date and filling blanks with zero
pub fn parse_live(body: &str) -> Result<(String, Vec<CaseRecord>)> {
    let records = read_case_records(body.as_bytes()).context("Failed to parse live case data")?;
    let date = first_date(&records).ok_or_else(|| anyhow!("Live case data has no rows"))?;

    let records = records
        .into_iter()
        .map(|record| CaseRecord {
            date: date.clone(),
            ..record.zero_filled()
        })
        .collect();
    Ok((date, records))
}

/// Date stamp of the cached file, `None` when missing, unreadable or empty
pub fn cached_date(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    read_case_records(std::io::BufReader::new(file))
        .ok()?
        .into_iter()
        .next()
        .map(|record| record.date)
}

/// Write records through a sibling temp file so a failed write leaves the old cache intact
pub fn write_cache(path: &Path, records: &[CaseRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }

    let tmp = temp_path(path);
    {
        let mut wtr = csv::Writer::from_path(&tmp)
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        for record in records {
            wtr.serialize(record).context("Failed to write case record")?;
        }
        wtr.flush().context("Failed to flush case cache")?;
    }
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace cache: {}", path.display()))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Compare the live body against the cache and rewrite when stale
pub fn update_cache(path: &Path, body: &str) -> Result<CacheStatus> {
    let (live_date, records) = parse_live(body)?;

    if cached_date(path).as_deref() == Some(live_date.as_str()) {
        info!(date = %live_date, "Existing csv is up to date");
        return Ok(CacheStatus::UpToDate);
    }

    write_cache(path, &records)?;
    info!(date = %live_date, rows = records.len(), path = %path.display(), "COVID case csv written");
    Ok(CacheStatus::Written)
}

/// Fetch the live dataset and update the cache; failures fall back to `Skipped`
pub async fn refresh(url: &str, path: &Path) -> CacheStatus {
    let result = async {
        let client = client()?;
        let body = fetch_live(&client, url).await?;
        update_cache(path, &body)
    }
    .await;

    match result {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Could not check for COVID case update");
            CacheStatus::Skipped
        }
    }
}
