use crate::history::PlaybackHistory;
use crate::library::Manifest;
use crate::model::{DEFAULT_HISTORY_LIMIT, HistoryPosition, PlayerSnapshot, Track};
use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};
use std::collections::HashSet;

/// Outcome of a random pick in shuffle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShufflePick {
    /// Nothing else to play; keep the current track and leave history alone.
    Stay,
    /// A track not present in history.
    Fresh(usize),
    /// Every other track is in history: start over from an empty history.
    Reset(usize),
}

#[derive(Debug)]
pub struct Player {
    pub tracks: Vec<Track>,
    pub current_index: Option<usize>,
    pub is_shuffled: bool,
    pub is_playing: bool,
    pub manifest_version: u32,
    history: PlaybackHistory,
    // Track that was live when the first step back into history was taken.
    resume_track: Option<String>,
    rng: SmallRng,
}

impl Player {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self::with_rng(tracks, SmallRng::from_rng(&mut rand::rng()))
    }

    pub fn with_rng(tracks: Vec<Track>, rng: SmallRng) -> Self {
        let current_index = (!tracks.is_empty()).then_some(0);
        Self {
            tracks,
            current_index,
            is_shuffled: true,
            is_playing: false,
            manifest_version: 1,
            history: PlaybackHistory::with_limit(DEFAULT_HISTORY_LIMIT),
            resume_track: None,
            rng,
        }
    }

    pub fn with_seed(tracks: Vec<Track>, seed: u64) -> Self {
        Self::with_rng(tracks, SmallRng::seed_from_u64(seed))
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = PlaybackHistory::with_limit(limit);
        self.resume_track = None;
        self
    }

    /// Rebuilds a player from a persisted snapshot. Ids that no longer resolve are kept
    /// in history and skipped when navigating.
    pub fn restore(tracks: Vec<Track>, snapshot: PlayerSnapshot, history_limit: usize) -> Self {
        let mut player = Self::new(tracks).with_history_limit(history_limit);
        player.is_shuffled = snapshot.is_shuffled;
        player.manifest_version = snapshot.manifest_version;
        if let Some(idx) = snapshot
            .current_track_id
            .as_deref()
            .and_then(|id| player.track_index(id))
        {
            player.current_index = Some(idx);
        } else if snapshot.current_track_id.is_some() {
            tracing::warn!("persisted current track is not in the library");
        }
        player.history = PlaybackHistory::from_parts(
            snapshot.history,
            snapshot.history_position,
            history_limit,
        );
        if player.history.position() != HistoryPosition::Live {
            player.resume_track = snapshot.resume_track_id;
        }
        player
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track_id: self.current_track().map(|track| track.id.clone()),
            is_shuffled: self.is_shuffled,
            history: self.history.to_vec(),
            history_position: self.history.position(),
            resume_track_id: self.resume_track.clone(),
            manifest_version: self.manifest_version,
        }
    }

    pub fn history(&self) -> &PlaybackHistory {
        &self.history
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current_index?)
    }

    pub fn track_index(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.id == id)
    }

    pub fn advance(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            self.current_index = None;
            return None;
        }

        let next = if self.is_shuffled {
            match self.replay_forward() {
                Some(idx) => idx,
                None => self.shuffle_step(),
            }
        } else {
            let next = self
                .current_index
                .map_or(0, |current| (current + 1) % self.tracks.len());
            self.record_current();
            next
        };

        self.land_on(next)
    }

    pub fn retreat(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            self.current_index = None;
            return None;
        }

        let len = self.tracks.len();
        let prev = if self.is_shuffled {
            match self.replay_backward() {
                Some(idx) => idx,
                None => self.shuffle_step(),
            }
        } else {
            let prev = self
                .current_index
                .map_or(len - 1, |current| (current + len - 1) % len);
            self.record_current();
            prev
        };

        self.land_on(prev)
    }

    /// Direct selection. Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        if index >= self.tracks.len() {
            tracing::debug!(index, len = self.tracks.len(), "rejected jump outside library");
            return None;
        }

        if self.current_index != Some(index) {
            self.record_current();
        }
        self.current_index = Some(index);
        Some(index)
    }

    pub fn toggle_shuffle(&mut self) {
        self.is_shuffled = !self.is_shuffled;
        self.history.clear();
        self.resume_track = None;
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.retain(|existing| existing.id != track.id);
        self.tracks.insert(0, track);
        self.current_index = Some(0);
        self.is_playing = true;
        self.forget_history();
    }

    pub fn clear_library(&mut self) {
        self.tracks.clear();
        self.current_index = None;
        self.is_playing = false;
        self.forget_history();
    }

    pub fn reset_library(&mut self, manifest: Manifest) {
        self.tracks = manifest.videos;
        self.manifest_version = manifest.version;
        self.current_index = (!self.tracks.is_empty()).then_some(0);
        self.is_playing = false;
        self.forget_history();
    }

    /// Shifts a track's lyric timing. Returns the new offset.
    pub fn adjust_lyric_offset(&mut self, index: usize, delta_ms: i64) -> Option<i64> {
        let track = self.tracks.get_mut(index)?;
        let offset = track.lyric_offset_ms.unwrap_or(0).saturating_add(delta_ms);
        track.lyric_offset_ms = Some(offset);
        Some(offset)
    }

    fn land_on(&mut self, idx: usize) -> Option<usize> {
        self.current_index = Some(idx);
        self.is_playing = true;
        Some(idx)
    }

    fn replay_forward(&mut self) -> Option<usize> {
        if self.history.position() == HistoryPosition::Live {
            return None;
        }

        if let Some(target) = self.history.forward_target() {
            let resolved = self.history.get(target).and_then(|id| self.track_index(id));
            if resolved.is_some() {
                self.history.seek(target);
            } else {
                tracing::debug!(target, "forward history entry no longer in library");
            }
            return resolved;
        }

        let resolved = self
            .resume_track
            .as_deref()
            .and_then(|id| self.track_index(id));
        if resolved.is_some() {
            self.history.return_to_live();
            self.resume_track = None;
        }
        resolved
    }

    fn replay_backward(&mut self) -> Option<usize> {
        let target = self.history.back_target()?;
        let idx = self.history.get(target).and_then(|id| self.track_index(id));
        let Some(idx) = idx else {
            tracing::debug!(target, "history entry no longer in library");
            return None;
        };

        if self.history.position() == HistoryPosition::Live {
            self.resume_track = self.current_track().map(|track| track.id.clone());
        }
        self.history.seek(target);
        Some(idx)
    }

    /// Picks a new random track. A pick made while replaying history branches it.
    fn shuffle_step(&mut self) -> usize {
        let current = self.current_index;
        if self.tracks.len() == 1 {
            return 0;
        }

        self.history.branch();
        match pick_shuffle_target(&self.tracks, &self.history, current, &mut self.rng) {
            ShufflePick::Stay => current.unwrap_or(0),
            ShufflePick::Fresh(idx) => {
                self.record_current();
                idx
            }
            ShufflePick::Reset(idx) => {
                tracing::debug!("every track is in history, starting shuffle over");
                self.history.clear();
                self.record_current();
                idx
            }
        }
    }

    fn record_current(&mut self) {
        if let Some(id) = self.current_track().map(|track| track.id.clone()) {
            self.history.push(id);
        }
        self.resume_track = None;
    }

    fn forget_history(&mut self) {
        self.history.clear();
        self.resume_track = None;
    }
}

/// Prefers tracks absent from history; once every other track has been heard, resets.
pub fn pick_shuffle_target<R: RngExt>(
    tracks: &[Track],
    history: &PlaybackHistory,
    current: Option<usize>,
    rng: &mut R,
) -> ShufflePick {
    let heard: HashSet<&str> = history.iter().collect();
    let others: Vec<usize> = (0..tracks.len())
        .filter(|idx| Some(*idx) != current)
        .collect();
    if others.is_empty() {
        return ShufflePick::Stay;
    }

    let unheard: Vec<usize> = others
        .iter()
        .copied()
        .filter(|idx| !heard.contains(tracks[*idx].id.as_str()))
        .collect();
    if !unheard.is_empty() {
        return ShufflePick::Fresh(unheard[rng.random_range(0..unheard.len())]);
    }

    ShufflePick::Reset(others[rng.random_range(0..others.len())])
}
