pub mod html;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::SourceError;
use crate::model::RawRow;

/// Where raw rows come from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Live page fetched over HTTP; rows are read out of its table markup.
    Page {
        url: String,
        timeout: Duration,
        user_agent: String,
    },
    /// JSON dump of rows captured by a browser driver: `[["1", "Bitcoin\nBTC", ...], ...]`.
    Capture { path: PathBuf },
}

impl Source {
    pub fn describe(&self) -> String {
        match self {
            Source::Page { url, .. } => url.clone(),
            Source::Capture { path } => path.display().to_string(),
        }
    }

    /// Fetch every row the source has. Truncation to the top N happens later.
    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        let rows = match self {
            Source::Page {
                url,
                timeout,
                user_agent,
            } => fetch_page_rows(url, *timeout, user_agent).await?,
            Source::Capture { path } => read_capture(path)?,
        };
        if rows.is_empty() {
            return Err(SourceError::NoRows(self.describe()));
        }
        info!("Fetched {} raw rows from {}", rows.len(), self.describe());
        Ok(rows)
    }
}

async fn fetch_page_rows(url: &str, timeout: Duration, user_agent: &str) -> Result<Vec<RawRow>, SourceError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;

    debug!("GET {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            status,
            url: url.to_string(),
        });
    }
    let body = response.text().await?;
    debug!(bytes = body.len(), "page downloaded");

    Ok(html::extract_rows(&body))
}

pub fn read_capture(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_capture(&text)
}

pub fn parse_capture(text: &str) -> Result<Vec<RawRow>, SourceError> {
    Ok(serde_json::from_str(text)?)
}
