//! Merge engine
//!
//! Copies every lump of a source container into a destination container.
//! The first lump seen under a name wins: later lumps with the same name are
//! dropped unless duplicates are allowed. Map blocks are handled as a unit,
//! so when a map label turns out to be a duplicate the component lumps that
//! follow it in the source are dropped with it rather than checked one by one.
//!
//! Lumps that belong to a bracketed region are inserted at the end of that
//! region in the destination, so `S_START`..`S_END` and friends stay
//! contiguous no matter how many sources contribute to them.

use crate::dialect::{self, Dialect, MapUnits, DEFAULT_MARKER_MAX_SIZE};
use crate::index::{self, Probe};
use crate::lump::{Lump, LumpName};
use crate::wad::Wad;
use tracing::{debug, info, trace, warn};

/// How a merge treats name collisions and map blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// Keep lumps whose name already exists in the destination
    pub allow_duplicates: bool,

    /// Lumps per map block, keyed by the source's dialect
    pub map_units: MapUnits,

    /// Largest lump still treated as a map label
    pub marker_max_size: usize,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy {
            allow_duplicates: false,
            map_units: MapUnits::default(),
            marker_max_size: DEFAULT_MARKER_MAX_SIZE,
        }
    }
}

/// Outcome of merging one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Lumps copied into the destination
    pub inserted: usize,

    /// Lumps dropped, map block components included
    pub duplicates_discarded: usize,

    /// Map and GL node blocks dropped as a unit
    pub map_blocks_skipped: usize,
}

/// Merge all lumps of `source` into `dest`
pub fn merge_into(dest: &mut Wad, source: &Wad, policy: &MergePolicy) -> MergeStats {
    let mut stats = MergeStats::default();
    let lumps = source.lumps();
    let block_len = policy.map_units.lumps_per_map(source.dialect());

    let mut position = 0;
    while position < lumps.len() {
        let lump = &lumps[position];
        position += 1;

        let name = lump.name();
        let component = dialect::is_map_component(name);

        if !policy.allow_duplicates && !component && is_duplicate(dest, name) {
            let block = block_length(lump, policy, block_len);
            let skipped = block.min(lumps.len() - position);
            if skipped < block {
                warn!(
                    "Map block {} ends after {} of {} lumps",
                    name, skipped, block
                );
            }
            position += skipped;

            if block > 0 {
                stats.map_blocks_skipped += 1;
                debug!("Discarding duplicate block {} ({} lumps)", name, skipped + 1);
            } else {
                debug!("Discarding duplicate lump {}", name);
            }
            stats.duplicates_discarded += skipped + 1;
            continue;
        }

        if policy.allow_duplicates && !component {
            // Keep the index complete so a later strict merge sees this name
            if let Some(index) = dest.index.as_mut() {
                index.probe(name);
            }
        }

        let at = place(dest, lump.detached());
        trace!("Placed {} at {}", name, at);
        stats.inserted += 1;
    }

    dest.duplicates_discarded += stats.duplicates_discarded;
    if dest.dialect == Dialect::Unknown {
        dest.detect_dialect(policy.marker_max_size);
    }

    info!(
        "Merged {} lumps ({} duplicates discarded)",
        stats.inserted, stats.duplicates_discarded
    );
    stats
}

/// Whether `name` already exists in `dest`
///
/// The index answers "definitely new" on its own; anything else is settled
/// by comparing against every name in the destination.
fn is_duplicate(dest: &mut Wad, name: &LumpName) -> bool {
    match index::probe(dest.index.as_mut(), name) {
        Probe::FirstSeen => false,
        Probe::PossibleCollision => {
            trace!("Index collision for {}, scanning", name);
            dest.contains(name)
        }
    }
}

/// Lumps following `lump` that belong to the block it introduces
fn block_length(lump: &Lump, policy: &MergePolicy, map_block_len: usize) -> usize {
    let name = lump.name();
    let size = lump.size();

    if dialect::is_map_marker(name, size, policy.marker_max_size)
        || dialect::is_episode_marker(name, size, policy.marker_max_size)
    {
        map_block_len
    } else if dialect::is_gl_marker(name) {
        policy.map_units.gl_nodes
    } else {
        0
    }
}

/// Insert `lump` at its structural position; returns where it landed
fn place(dest: &mut Wad, lump: Lump) -> usize {
    let appended = dest.lumps.len();

    match lump.group().region() {
        Some(tag) => match dest.region_ends.get(tag) {
            Some(end) => {
                dest.insert_at(end, lump);
                end
            }
            None => {
                dest.insert_at(appended, lump);
                dest.region_ends.track(tag, appended + 1);
                appended
            }
        },
        None => {
            dest.insert_at(appended, lump);
            appended
        }
    }
}
