#![no_main]

use deskcore::content::{ContentProcessor, extract_tab_blocks};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let processor = ContentProcessor::default();
    let rendered = processor.render_content(raw);
    let _ = rendered.segments();
    let _ = processor.process_excerpt(raw);
    let _ = extract_tab_blocks(raw);
});
