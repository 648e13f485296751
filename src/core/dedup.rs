//! Content deduplication
//!
//! Lumps with byte-identical payloads are collapsed so the payload is written
//! once; the later lump keeps its own directory entry but points at the
//! earlier lump's data. Sharing is one level deep: a collapsed lump is never
//! used as a target itself.

use crate::io;
use crate::wad::Wad;
use tracing::{debug, info, warn};

/// Collapse identical payloads in `wad`; returns the number of lumps collapsed
///
/// Quadratic in the lump count with a full payload comparison per candidate
/// pair of equal size. Running it again finds nothing new.
pub fn deduplicate(wad: &mut Wad) -> usize {
    let mut collapsed = 0;
    let mut saved = 0;

    for later in 1..wad.lumps.len() {
        let candidate = &wad.lumps[later];
        if candidate.is_deduplicated() || candidate.size() == 0 {
            continue;
        }

        let target = (0..later).find(|&earlier| {
            let lump = &wad.lumps[earlier];
            !lump.is_deduplicated()
                && lump.size() == candidate.size()
                && lump.data() == candidate.data()
        });

        if let Some(target) = target {
            let (head, tail) = wad.lumps.split_at_mut(later);
            debug!("{} shares data with {}", tail[0].name(), head[target].name());
            saved += tail[0].size();
            tail[0].share(target, &head[target]);
            collapsed += 1;
        }
    }

    if let Err(err) = io::pack_locations(wad) {
        warn!("Locations not repacked: {}", err);
    }

    info!("Deduplicated {} lumps ({} bytes saved)", collapsed, saved);
    collapsed
}
