#![no_main]

use deskcore::model::{HistoryPosition, Track};
use deskcore::player::Player;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let len = data.first().map_or(0, |byte| usize::from(*byte % 12));
    let tracks = (0..len)
        .map(|idx| Track::new(format!("t{idx}"), format!("https://v/{idx}"), format!("Track {idx}")))
        .collect();
    let mut player = Player::with_seed(tracks, data.len() as u64).with_history_limit(8);

    for byte in data.iter().skip(1) {
        match byte % 6 {
            0 | 1 => {
                let _ = player.advance();
            }
            2 => {
                let _ = player.retreat();
            }
            3 => player.toggle_shuffle(),
            4 => {
                let _ = player.jump_to(usize::from(byte / 6));
            }
            _ => {
                let _ = player.adjust_lyric_offset(usize::from(byte / 6), i64::from(*byte) - 128);
            }
        }

        assert!(player.history().len() <= 8);
        if let HistoryPosition::At(idx) = player.history().position() {
            assert!(idx < player.history().len());
        }
        if let Some(idx) = player.current_index {
            assert!(idx < player.tracks.len());
        }
    }
});
