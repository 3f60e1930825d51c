use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ScanConfig;
use crate::models::{CatalogEntry, MetadataRecord};
use crate::thumbnail::PosterSource;
use crate::title::TitleGuess;

/// Result of a single catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(CatalogEntry),
    /// The catalog answered but knows no such title.
    NotFound,
    /// Transport failure, non-success status or a body that is not JSON.
    Unavailable(String),
    /// JSON answer lacking a field the record needs.
    Malformed(String),
}

/// Movie lookup by exact title.
pub trait Catalog {
    fn lookup(&self, guess: &TitleGuess) -> LookupOutcome;
}

/// Turn a raw catalog answer into a [`LookupOutcome`].
pub fn interpret_response(status: StatusCode, body: &str) -> LookupOutcome {
    if !status.is_success() {
        return LookupOutcome::Unavailable(format!("HTTP error: {}", status));
    }

    let payload: Value = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => return LookupOutcome::Unavailable(format!("Invalid JSON body: {}", e)),
    };

    match payload.get("Response") {
        None => return LookupOutcome::Malformed("missing field `Response`".to_string()),
        Some(flag) if flag == "False" => return LookupOutcome::NotFound,
        Some(_) => {}
    }

    match serde_json::from_value::<CatalogEntry>(payload) {
        Ok(entry) => LookupOutcome::Found(entry),
        Err(e) => LookupOutcome::Malformed(e.to_string()),
    }
}

/// Look up one title and build the record for `filename`/`filepath`.
///
/// `Ok(None)` means the file should be skipped. A malformed answer is an
/// error: the run cannot trust the catalog any more.
pub fn fetch<C: Catalog + ?Sized>(
    catalog: &C,
    guess: &TitleGuess,
    filename: &str,
    filepath: &str,
) -> Result<Option<MetadataRecord>> {
    match catalog.lookup(guess) {
        LookupOutcome::Found(entry) => {
            let record = entry.into_record(filename, filepath);
            info!(title = %record.title, year = %record.year, "Found metadata");
            Ok(Some(record))
        }
        LookupOutcome::NotFound => {
            info!(title = %guess.title, "No catalog entry, skipping file");
            Ok(None)
        }
        LookupOutcome::Unavailable(reason) => {
            error!("Failed to get metadata for {}: {}", filename, reason);
            info!("Skipping file");
            Ok(None)
        }
        LookupOutcome::Malformed(reason) => Err(anyhow::anyhow!(
            "Malformed catalog response for {}: {}",
            filename,
            reason
        )),
    }
}

/// OMDb-style HTTP catalog, also used to download posters.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn request_url(&self, guess: &TitleGuess) -> Result<Url> {
        let mut params = vec![("t", guess.title.as_str())];
        if let Some(year) = &guess.year {
            params.push(("y", year.as_str()));
        }
        params.push(("plot", "full"));
        params.push(("apikey", self.api_key.as_str()));
        params.push(("type", "movie"));

        Url::parse_with_params(&self.api_url, &params)
            .with_context(|| format!("Invalid catalog URL: {}", self.api_url))
    }

    fn send(&self, url: Url) -> Result<(StatusCode, String)> {
        let response = self
            .client
            .get(url)
            .send()
            .context("Failed to reach catalog")?;
        let status = response.status();
        let body = response.text().context("Failed to read catalog response")?;
        Ok((status, body))
    }
}

impl Catalog for OmdbClient {
    fn lookup(&self, guess: &TitleGuess) -> LookupOutcome {
        let url = match self.request_url(guess) {
            Ok(url) => url,
            Err(e) => return LookupOutcome::Unavailable(format!("{:#}", e)),
        };
        debug!(url = %redact_key(&url), "Catalog request");

        match self.send(url) {
            Ok((status, body)) => interpret_response(status, &body),
            Err(e) => LookupOutcome::Unavailable(format!("{:#}", e)),
        }
    }
}

impl PosterSource for OmdbClient {
    fn fetch_poster(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch poster {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status()));
        }

        let bytes = response.bytes().context("Failed to read poster body")?;
        Ok(bytes.to_vec())
    }
}

fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
