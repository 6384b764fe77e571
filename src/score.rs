use crate::session::TypingSession;
use chrono::Local;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// One finished run, as persisted. Metrics are integer-truncated at the
/// moment of recording; the date format matches the log's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Lang")]
    pub lang: String,
    #[serde(rename = "CPM")]
    pub cpm: i64,
    #[serde(rename = "WPM")]
    pub wpm: i64,
}

impl ScoreRecord {
    /// Snapshot the final metrics of an ended session.
    pub fn from_session(session: &TypingSession, lang: &str) -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            lang: lang.to_string(),
            cpm: session.cpm_corrected as i64,
            wpm: session.wpm as i64,
        }
    }
}

/// Append-only CSV log of finished sessions. The header row is written
/// exactly once, when the file is first created; the read path only ever
/// looks at the most recent row.
///
/// Unlike the word fetch, I/O failures here are surfaced to the caller.
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "retype") {
            pd.config_dir().join("score.csv")
        } else {
            PathBuf::from("score.csv")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ScoreRecord) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    /// Most recent record, or None when the log is missing or holds only
    /// its header.
    pub fn last(&self) -> Result<Option<ScoreRecord>, Box<dyn Error>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut last = None;
        for record in reader.deserialize() {
            last = Some(record?);
        }
        Ok(last)
    }
}
