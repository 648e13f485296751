#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use wadmerge_rs::core::io::{read_wad, write_wad};

// Arbitrary bytes must either decode or fail cleanly; anything that decodes
// with a known tag must encode again.
fuzz_target!(|data: &[u8]| {
    let mut wad = match read_wad(&mut Cursor::new(data)) {
        Ok(wad) => wad,
        Err(_) => return,
    };

    let mut out = Vec::new();
    if wad.kind().is_known() {
        write_wad(&mut out, &mut wad).unwrap();
        let again = read_wad(&mut Cursor::new(&out)).unwrap();
        assert_eq!(again.len(), wad.len());
    }
});
