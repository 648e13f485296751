//! In-memory container
//!
//! Holds the ordered lump list together with the bookkeeping the merge
//! engine needs: where each bracketed region currently ends, the detected
//! map dialect, and the optional name hash index.

use crate::dedup;
use crate::dialect::{self, Dialect, DEFAULT_MARKER_MAX_SIZE};
use crate::error::Result;
use crate::group::{self, RegionEnds};
use crate::header::{WadKind, HEADER_SIZE};
use crate::index::DuplicateIndex;
use crate::io;
use crate::lump::{Lump, LumpName};
use crate::merge::{self, MergePolicy, MergeStats};
use std::path::Path;

/// WAD container
#[derive(Debug, Clone, Default)]
pub struct Wad {
    /// Type tag read from (or written to) the header
    pub(crate) kind: WadKind,

    /// Lumps in directory order
    pub(crate) lumps: Vec<Lump>,

    /// Insertion point per bracketed region
    pub(crate) region_ends: RegionEnds,

    /// Map dialect, detected once per container
    pub(crate) dialect: Dialect,

    /// Name hash index; `None` until sized with `reserve_index`
    pub(crate) index: Option<DuplicateIndex>,

    /// Running count of lumps discarded as duplicates across all merges
    pub(crate) duplicates_discarded: usize,
}

impl Wad {
    /// Create an empty container
    pub fn new(kind: WadKind) -> Self {
        Wad {
            kind,
            ..Default::default()
        }
    }

    /// Build a container from lumps, classifying regions and dialect
    pub fn from_lumps(kind: WadKind, mut lumps: Vec<Lump>) -> Self {
        let groups = group::classify(lumps.iter().map(|lump| lump.name()));
        for (lump, group) in lumps.iter_mut().zip(groups) {
            lump.group = group;
        }

        let region_ends = RegionEnds::from_groups(lumps.iter().map(Lump::group));
        let dialect = dialect::classify(&lumps, DEFAULT_MARKER_MAX_SIZE);

        Wad {
            kind,
            lumps,
            region_ends,
            dialect,
            index: None,
            duplicates_discarded: 0,
        }
    }

    /// Load a container from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        io::load(path)
    }

    /// Write the container to disk, repacking payload offsets
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        io::save(path, self)
    }

    pub fn kind(&self) -> WadKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: WadKind) {
        self.kind = kind;
    }

    pub fn lumps(&self) -> &[Lump] {
        &self.lumps
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Lump> {
        self.lumps.get(position)
    }

    /// Position of the first lump named `name`
    pub fn find(&self, name: &LumpName) -> Option<usize> {
        self.lumps.iter().position(|lump| lump.name() == name)
    }

    pub fn contains(&self, name: &LumpName) -> bool {
        self.find(name).is_some()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Re-run dialect detection with a different map label size threshold
    pub fn detect_dialect(&mut self, max_marker_size: usize) -> Dialect {
        self.dialect = dialect::classify(&self.lumps, max_marker_size);
        self.dialect
    }

    pub fn region_ends(&self) -> &RegionEnds {
        &self.region_ends
    }

    /// Size the duplicate index for `expected` total lumps
    ///
    /// Names already in the container are entered so the index can never
    /// report a name it holds as first seen.
    pub fn reserve_index(&mut self, expected: usize) {
        let mut index = DuplicateIndex::with_capacity(expected);
        for lump in &self.lumps {
            if !dialect::is_map_component(lump.name()) {
                index.probe(lump.name());
            }
        }
        tracing::debug!("Duplicate index sized to {} slots", index.size());
        self.index = Some(index);
    }

    pub fn index(&self) -> Option<&DuplicateIndex> {
        self.index.as_ref()
    }

    pub fn duplicates_discarded(&self) -> usize {
        self.duplicates_discarded
    }

    /// Merge every lump of `source` using the default map block table
    pub fn merge(&mut self, source: &Wad, allow_duplicates: bool) -> MergeStats {
        let policy = MergePolicy {
            allow_duplicates,
            ..MergePolicy::default()
        };
        merge::merge_into(self, source, &policy)
    }

    /// Merge every lump of `source` under an explicit policy
    pub fn merge_with(&mut self, source: &Wad, policy: &MergePolicy) -> MergeStats {
        merge::merge_into(self, source, policy)
    }

    /// Collapse lumps with identical payloads; returns how many were collapsed
    pub fn deduplicate(&mut self) -> usize {
        dedup::deduplicate(self)
    }

    pub fn deduplicated_count(&self) -> usize {
        self.lumps.iter().filter(|lump| lump.is_deduplicated()).count()
    }

    /// Bytes of payload that will be written (shared payloads counted once)
    pub fn payload_size(&self) -> usize {
        self.lumps
            .iter()
            .filter(|lump| !lump.is_deduplicated())
            .map(Lump::size)
            .sum()
    }

    /// Offset the directory will be written at
    pub fn directory_offset(&self) -> usize {
        HEADER_SIZE + self.payload_size()
    }

    /// Insert a lump at `position`, keeping back-references and region ends valid
    pub(crate) fn insert_at(&mut self, position: usize, lump: Lump) {
        let owner = lump.group().region();
        for existing in &mut self.lumps {
            if let Some(target) = existing.shared_with.as_mut() {
                if *target >= position {
                    *target += 1;
                }
            }
        }
        self.lumps.insert(position, lump);
        self.region_ends.record_insert(owner, position);
    }
}
