//! Remote score leaderboard
//!
//! The store is a plain JSON collection of `{name, score}` records; ranking
//! is done client-side (descending by score, top N). The game loop treats
//! every store operation as fire-and-forget: a failure is logged and the
//! display degrades to an empty leaderboard, it never touches session state.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How many entries the leaderboard display shows
pub const DEFAULT_TOP_N: usize = 5;

/// One persisted score record; also the JSON wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default = "anonymous")]
    pub name: String,
    pub score: u32,
}

fn anonymous() -> String {
    "Player".to_string()
}

/// Store failure; always recoverable, surfaced as an empty display
#[derive(Debug)]
pub enum StoreError {
    /// Transport or HTTP status failure
    Http(reqwest::Error),
    /// The remote answered with something that is not a list of records
    Malformed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Http(err) => write!(f, "leaderboard request failed: {err}"),
            StoreError::Malformed(detail) => write!(f, "malformed leaderboard data: {detail}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Http(err) => Some(err),
            StoreError::Malformed(_) => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Http(err)
    }
}

/// External score store collaborator
pub trait ScoreStore {
    /// Persist one score record
    fn submit(&self, name: &str, score: u32) -> Result<(), StoreError>;
    /// Fetch the top `n` entries, sorted descending by score
    fn fetch_top(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError>;
}

/// Sort descending by score and keep the top `n`
pub fn rank_top(mut entries: Vec<ScoreEntry>, n: usize) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(n);
    entries
}

/// Parse the remote response body. Anything but a JSON array is malformed.
fn entries_from_value(value: serde_json::Value) -> Result<Vec<ScoreEntry>, StoreError> {
    if !value.is_array() {
        return Err(StoreError::Malformed(format!(
            "expected an array, got {value}"
        )));
    }
    serde_json::from_value(value).map_err(|err| StoreError::Malformed(err.to_string()))
}

/// HTTP-backed store: POST a record to submit, GET the collection to read
#[derive(Debug, Clone)]
pub struct HttpScoreStore {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpScoreStore {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self { url: url.into(), client }
    }
}

impl ScoreStore for HttpScoreStore {
    fn submit(&self, name: &str, score: u32) -> Result<(), StoreError> {
        let entry = ScoreEntry { name: name.to_string(), score };
        self.client
            .post(&self.url)
            .json(&entry)
            .send()?
            .error_for_status()?;
        log::info!("submitted score {score} for {name}");
        Ok(())
    }

    fn fetch_top(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let value: serde_json::Value = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(rank_top(entries_from_value(value)?, n))
    }
}

/// In-memory store, for tests and offline play
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    entries: Mutex<Vec<ScoreEntry>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn submit(&self, name: &str, score: u32) -> Result<(), StoreError> {
        let name = if name.is_empty() { anonymous() } else { name.to_string() };
        self.entries
            .lock()
            .expect("leaderboard mutex poisoned")
            .push(ScoreEntry { name, score });
        Ok(())
    }

    fn fetch_top(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let entries = self
            .entries
            .lock()
            .expect("leaderboard mutex poisoned")
            .clone();
        Ok(rank_top(entries, n))
    }
}
