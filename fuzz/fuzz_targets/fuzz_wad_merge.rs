#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use wadmerge_rs::core::io::read_wad;
use wadmerge_rs::{Wad, WadKind};

// Split the input in two containers and merge both ways; the merge engine
// must never panic on whatever structure the decoder accepts.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let split = data[0] as usize % data.len();
    let (left, right) = data[1..].split_at(split.min(data.len() - 1));

    let sources: Vec<Wad> = [left, right]
        .iter()
        .filter_map(|bytes| read_wad(&mut Cursor::new(bytes)).ok())
        .collect();

    for allow_duplicates in [false, true] {
        let mut dest = Wad::new(WadKind::Pwad);
        dest.reserve_index(sources.iter().map(Wad::len).sum());
        for source in &sources {
            dest.merge(source, allow_duplicates);
        }
        dest.deduplicate();
    }
});
