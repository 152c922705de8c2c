//! Board snapshot sources.
//!
//! # Responsibility
//! - Fetch one complete snapshot (tickets + users) per call.
//! - Validate the payload schema before it reaches the partitioner.
//!
//! # Invariants
//! - A source returns either a complete snapshot or an error, never a
//!   partial list.
//! - One attempt per fetch; failures are logged and returned, not retried.

use crate::model::work_item::{Actor, BoardSnapshot, Priority, WorkItem};
use log::{error, info};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Board endpoint used when no URL is configured.
pub const DEFAULT_BOARD_URL: &str = "https://api.quicksell.co/v1/internal/frontend-assignment";

/// Per-request timeout for HTTP fetches.
pub const FETCH_TIMEOUT_SECONDS: u64 = 30;

pub type SourceResult<T> = Result<T, SourceError>;

/// Snapshot fetch/decode failures. Any of these means "data unavailable".
#[derive(Debug)]
pub enum SourceError {
    Transport(reqwest::Error),
    Status(u16),
    Io { path: PathBuf, source: std::io::Error },
    Decode(serde_json::Error),
    InvalidPriority { item_id: String, value: i64 },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "board fetch failed: {err}"),
            Self::Status(code) => write!(f, "board endpoint returned HTTP {code}"),
            Self::Io { path, source } => {
                write!(f, "failed to read snapshot `{}`: {source}", path.display())
            }
            Self::Decode(err) => write!(f, "malformed board payload: {err}"),
            Self::InvalidPriority { item_id, value } => write!(
                f,
                "item {item_id} has priority {value} outside the 0..=4 scale"
            ),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
            Self::Status(_) | Self::InvalidPriority { .. } => None,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Supplier of complete board snapshots.
pub trait BoardSource {
    fn fetch_snapshot(&self) -> SourceResult<BoardSnapshot>;

    /// Short label for diagnostics (`http`, `file`, `static`).
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct SnapshotPayload {
    tickets: Vec<TicketRecord>,
    users: Vec<Actor>,
}

// Priority is kept raw here so range errors can name the offending item.
#[derive(Debug, Deserialize)]
struct TicketRecord {
    id: String,
    title: String,
    #[serde(default)]
    tag: Vec<String>,
    #[serde(rename = "userId")]
    user_id: String,
    status: String,
    priority: i64,
}

impl TicketRecord {
    fn into_work_item(self) -> SourceResult<WorkItem> {
        let priority =
            Priority::from_value(self.priority).ok_or_else(|| SourceError::InvalidPriority {
                item_id: self.id.clone(),
                value: self.priority,
            })?;
        Ok(WorkItem {
            id: self.id,
            title: self.title,
            tags: self.tag,
            user_id: self.user_id,
            status: self.status,
            priority,
        })
    }
}

/// Decodes and validates a `{tickets, users}` JSON payload.
///
/// # Errors
/// - `Decode` when the JSON does not match the payload shape.
/// - `InvalidPriority` when a ticket priority is outside 0..=4.
pub fn decode_snapshot(raw: &str) -> SourceResult<BoardSnapshot> {
    let payload: SnapshotPayload = serde_json::from_str(raw)?;
    let items = payload
        .tickets
        .into_iter()
        .map(TicketRecord::into_work_item)
        .collect::<SourceResult<Vec<_>>>()?;
    Ok(BoardSnapshot::new(items, payload.users))
}

/// Fetches the snapshot with one blocking HTTP GET.
pub struct HttpBoardSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpBoardSource {
    pub fn new(url: impl Into<String>) -> SourceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch_body(&self) -> SourceResult<String> {
        let response = self.client.get(self.url.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

impl BoardSource for HttpBoardSource {
    fn fetch_snapshot(&self) -> SourceResult<BoardSnapshot> {
        timed_fetch(self.kind(), || decode_snapshot(&self.fetch_body()?))
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}

/// Reads the snapshot from a JSON file with the endpoint's shape.
pub struct JsonFileBoardSource {
    path: PathBuf,
}

impl JsonFileBoardSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl BoardSource for JsonFileBoardSource {
    fn fetch_snapshot(&self) -> SourceResult<BoardSnapshot> {
        timed_fetch(self.kind(), || {
            let raw = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
            decode_snapshot(&raw)
        })
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

/// Serves an already decoded snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticBoardSource {
    snapshot: BoardSnapshot,
}

impl StaticBoardSource {
    pub fn new(snapshot: BoardSnapshot) -> Self {
        Self { snapshot }
    }
}

impl BoardSource for StaticBoardSource {
    fn fetch_snapshot(&self) -> SourceResult<BoardSnapshot> {
        Ok(self.snapshot.clone())
    }

    fn kind(&self) -> &'static str {
        "static"
    }
}

fn timed_fetch(
    kind: &'static str,
    fetch: impl FnOnce() -> SourceResult<BoardSnapshot>,
) -> SourceResult<BoardSnapshot> {
    let started_at = Instant::now();
    info!("event=board_fetch module=source status=start source={kind}");

    match fetch() {
        Ok(snapshot) => {
            info!(
                "event=board_fetch module=source status=ok source={kind} duration_ms={} items={} actors={}",
                started_at.elapsed().as_millis(),
                snapshot.items.len(),
                snapshot.actors.len()
            );
            Ok(snapshot)
        }
        Err(err) => {
            error!(
                "event=board_fetch module=source status=error source={kind} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
