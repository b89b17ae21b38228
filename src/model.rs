use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_BASE_URL: &str = "https://imrichard.com";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Positive values show lyrics earlier.
    #[serde(default, rename = "lyricOffset")]
    pub lyric_offset_ms: Option<i64>,
}

impl Track {
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            artist: None,
            album: None,
            lyric_offset_ms: None,
        }
    }
}

/// Where the player sits inside its playback history.
///
/// `Live` is one past the last entry: nothing is pending in the forward direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPosition {
    #[default]
    Live,
    At(usize),
}

impl HistoryPosition {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Live => None,
            Self::At(idx) => Some(idx),
        }
    }
}

// Stored as a plain integer with -1 for the live end, the format older state files use.
impl Serialize for HistoryPosition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Live => serializer.serialize_i64(-1),
            Self::At(idx) => serializer.serialize_u64(*idx as u64),
        }
    }
}

impl<'de> Deserialize<'de> for HistoryPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        if value < 0 {
            Ok(Self::Live)
        } else {
            Ok(Self::At(value as usize))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            history_limit: default_history_limit(),
        }
    }
}

/// Player state as written to disk. Tracks are referenced by id so a refreshed
/// manifest can be paired with an older snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub current_track_id: Option<String>,
    #[serde(default = "default_shuffled")]
    pub is_shuffled: bool,
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub history_position: HistoryPosition,
    #[serde(default)]
    pub resume_track_id: Option<String>,
    #[serde(default = "default_manifest_version")]
    pub manifest_version: u32,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            current_track_id: None,
            is_shuffled: default_shuffled(),
            history: Vec::new(),
            history_position: HistoryPosition::Live,
            resume_track_id: None,
            manifest_version: default_manifest_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub player: PlayerSnapshot,
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_shuffled() -> bool {
    true
}

fn default_manifest_version() -> u32 {
    1
}
