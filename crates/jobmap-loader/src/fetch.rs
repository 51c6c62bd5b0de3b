//! One-shot retrieval of the raw job file.
//!
//! No retries and no timeout: a failed or slow fetch is surfaced to the
//! caller, and retrying means starting a new session.

use std::path::PathBuf;

use reqwest::Client;

use crate::LoadError;

/// Where the job file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Http(String),
}

impl DataSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Http(s.trim().to_string())
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => f.write_str(url),
        }
    }
}

pub struct DataClient {
    client: Client,
}

impl DataClient {
    /// # Errors
    ///
    /// Returns [`LoadError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str) -> Result<Self, LoadError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Read the whole job file as text.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Io`] if a file cannot be read.
    /// - [`LoadError::Http`] on network failure.
    /// - [`LoadError::UnexpectedStatus`] for any non-2xx response.
    pub async fn fetch_text(&self, source: &DataSource) -> Result<String, LoadError> {
        match source {
            DataSource::File(path) => {
                tracing::debug!(path = %path.display(), "reading job data file");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| LoadError::Io {
                        path: path.display().to_string(),
                        source: e,
                    })
            }
            DataSource::Http(url) => {
                tracing::debug!(url, "fetching job data");
                let response = self
                    .client
                    .get(url)
                    .header(reqwest::header::ACCEPT, "text/csv, text/plain;q=0.9, */*;q=0.1")
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.clone(),
                    });
                }

                Ok(response.text().await?)
            }
        }
    }
}
