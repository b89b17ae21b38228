use crate::model::Track;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: u32,
    pub videos: Vec<Track>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: 1,
            videos: Vec::new(),
        }
    }
}

// Older manifests are a bare array of tracks.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawManifest {
    Versioned {
        #[serde(default)]
        version: Option<u32>,
        videos: Vec<Track>,
    },
    Bare(Vec<Track>),
}

pub fn parse_manifest(raw: &str) -> Result<Manifest> {
    let parsed: RawManifest =
        serde_json::from_str(raw).context("failed to parse track manifest")?;
    let (version, videos) = match parsed {
        RawManifest::Versioned { version, videos } => (version.unwrap_or(1), videos),
        RawManifest::Bare(videos) => (1, videos),
    };

    Ok(Manifest {
        version,
        videos: dedup_by_id(videos),
    })
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    parse_manifest(&raw).with_context(|| format!("invalid manifest {}", path.display()))
}

fn dedup_by_id(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::with_capacity(tracks.len());
    let before = tracks.len();
    let kept: Vec<Track> = tracks
        .into_iter()
        .filter(|track| seen.insert(track.id.clone()))
        .collect();
    if kept.len() != before {
        tracing::warn!(dropped = before - kept.len(), "duplicate track ids in manifest");
    }
    kept
}
