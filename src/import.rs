use crate::model::{EventTable, ListeningEvent};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use walkdir::WalkDir;

/// One row of the export's JSON schema. Everything except `ts` is nullable
/// in real exports; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStreamRecord {
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub ms_played: Option<u64>,
    #[serde(default)]
    pub master_metadata_track_name: Option<String>,
    #[serde(default)]
    pub master_metadata_album_artist_name: Option<String>,
    #[serde(default)]
    pub master_metadata_album_album_name: Option<String>,
}

/// Loads every streaming-history JSON file under an extracted export
/// directory, in sorted path order, and builds the cleaned event table.
/// Records with unparseable timestamps or missing track names are dropped
/// here so the analytics core never sees them.
pub fn load_export_dir(root: &Path) -> Result<EventTable> {
    let files = export_files(root);
    if files.is_empty() {
        anyhow::bail!(
            "no endsong_*.json or Streaming_History*.json files found under {}",
            root.display()
        );
    }

    let mut raw = Vec::new();
    for path in files {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let records: Vec<RawStreamRecord> = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        raw.extend(records);
    }

    Ok(EventTable::new(events_from_raw(raw)))
}

fn export_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_history_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn is_history_file(path: &Path) -> bool {
    let is_json = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return false;
    }

    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| {
            name.starts_with("endsong_") || name.starts_with("Streaming_History")
        })
}

/// The pure cleaning step: parse timestamps, drop invalid rows, keep the
/// input order.
pub fn events_from_raw(records: Vec<RawStreamRecord>) -> Vec<ListeningEvent> {
    records
        .into_iter()
        .filter_map(|record| {
            let ts = OffsetDateTime::parse(record.ts.as_deref()?, &Rfc3339).ok()?;
            let track = record
                .master_metadata_track_name
                .filter(|name| !name.trim().is_empty())?;
            Some(ListeningEvent {
                ts,
                track,
                artist: record.master_metadata_album_artist_name,
                album: record.master_metadata_album_album_name,
                ms_played: record.ms_played.unwrap_or(0),
            })
        })
        .collect()
}
