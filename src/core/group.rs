//! Region bracket classification
//!
//! Flats, sprites, patches and colormaps must sit between paired `*_START` /
//! `*_END` labels for the engine to find them. A sequential scan carries the
//! currently open region: each lump takes the open region's tag, a start
//! label opens its region (and is tagged with it), and any end label closes
//! tracking so the label itself and what follows are general purpose again.

use crate::lump::LumpName;

/// Bracket kinds recognized by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionTag {
    Flats,
    Flats1,
    Flats2,
    Flats3,
    ExtraFlats,
    Sprites,
    ExtraSprites,
    Patches,
    Patches1,
    Patches2,
    Patches3,
    ExtraPatches,
    Colormaps,
}

impl RegionTag {
    pub const COUNT: usize = 13;

    pub const ALL: [RegionTag; RegionTag::COUNT] = [
        RegionTag::Flats,
        RegionTag::Flats1,
        RegionTag::Flats2,
        RegionTag::Flats3,
        RegionTag::ExtraFlats,
        RegionTag::Sprites,
        RegionTag::ExtraSprites,
        RegionTag::Patches,
        RegionTag::Patches1,
        RegionTag::Patches2,
        RegionTag::Patches3,
        RegionTag::ExtraPatches,
        RegionTag::Colormaps,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Structural group of a lump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LumpGroup {
    /// Outside any bracket; appended at the end on merge
    #[default]
    General,
    /// Inside (or opening) a bracketed region
    Region(RegionTag),
}

impl LumpGroup {
    pub fn region(self) -> Option<RegionTag> {
        match self {
            LumpGroup::General => None,
            LumpGroup::Region(tag) => Some(tag),
        }
    }
}

/// Label kind of a bracket lump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Start(RegionTag),
    End(RegionTag),
}

/// Start labels, in the order they are tested
const START_MARKERS: [(&[u8], RegionTag); RegionTag::COUNT] = [
    (b"F_START", RegionTag::Flats),
    (b"F1_START", RegionTag::Flats1),
    (b"F2_START", RegionTag::Flats2),
    (b"F3_START", RegionTag::Flats3),
    (b"FF_START", RegionTag::ExtraFlats),
    (b"S_START", RegionTag::Sprites),
    (b"SS_START", RegionTag::ExtraSprites),
    (b"P_START", RegionTag::Patches),
    (b"P1_START", RegionTag::Patches1),
    (b"P2_START", RegionTag::Patches2),
    (b"P3_START", RegionTag::Patches3),
    (b"PP_START", RegionTag::ExtraPatches),
    (b"C_START", RegionTag::Colormaps),
];

const END_MARKERS: [(&[u8], RegionTag); RegionTag::COUNT] = [
    (b"F_END", RegionTag::Flats),
    (b"F1_END", RegionTag::Flats1),
    (b"F2_END", RegionTag::Flats2),
    (b"F3_END", RegionTag::Flats3),
    (b"FF_END", RegionTag::ExtraFlats),
    (b"S_END", RegionTag::Sprites),
    (b"SS_END", RegionTag::ExtraSprites),
    (b"P_END", RegionTag::Patches),
    (b"P1_END", RegionTag::Patches1),
    (b"P2_END", RegionTag::Patches2),
    (b"P3_END", RegionTag::Patches3),
    (b"PP_END", RegionTag::ExtraPatches),
    (b"C_END", RegionTag::Colormaps),
];

/// Classify a lump name as a bracket label, start labels taking precedence
pub fn marker(name: &LumpName) -> Option<Marker> {
    START_MARKERS
        .iter()
        .find(|(label, _)| name.starts_with(label))
        .map(|&(_, tag)| Marker::Start(tag))
        .or_else(|| {
            END_MARKERS
                .iter()
                .find(|(label, _)| name.starts_with(label))
                .map(|&(_, tag)| Marker::End(tag))
        })
}

/// Group of `name` given the region left open by the lumps before it
pub fn next_group(open: LumpGroup, name: &LumpName) -> LumpGroup {
    match marker(name) {
        Some(Marker::Start(tag)) => LumpGroup::Region(tag),
        Some(Marker::End(_)) => LumpGroup::General,
        None => open,
    }
}

/// Classify a whole lump sequence in order
pub fn classify<'a, I>(names: I) -> Vec<LumpGroup>
where
    I: IntoIterator<Item = &'a LumpName>,
{
    names
        .into_iter()
        .scan(LumpGroup::General, |open, name| {
            *open = next_group(*open, name);
            Some(*open)
        })
        .collect()
}

/// Insertion point for each region: one past its last lump
///
/// `None` means the region has not been seen in the container yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionEnds {
    ends: [Option<usize>; RegionTag::COUNT],
}

impl RegionEnds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute from a classified sequence
    pub fn from_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = LumpGroup>,
    {
        let mut ends = RegionEnds::new();
        for (position, group) in groups.into_iter().enumerate() {
            if let LumpGroup::Region(tag) = group {
                ends.ends[tag.index()] = Some(position + 1);
            }
        }
        ends
    }

    pub fn get(&self, tag: RegionTag) -> Option<usize> {
        self.ends[tag.index()]
    }

    /// Start tracking a region whose last lump now sits at `end - 1`
    pub fn track(&mut self, tag: RegionTag, end: usize) {
        self.ends[tag.index()] = Some(end);
    }

    /// Account for one lump inserted at `position`
    ///
    /// The owning region grows by one; every other region whose end lies
    /// beyond the insertion point moves down by one.
    pub fn record_insert(&mut self, owner: Option<RegionTag>, position: usize) {
        for (index, end) in self.ends.iter_mut().enumerate() {
            let Some(end) = end else { continue };
            let owned = owner.is_some_and(|tag| tag.index() == index);
            if owned || *end > position {
                *end += 1;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionTag, usize)> + '_ {
        RegionTag::ALL
            .iter()
            .filter_map(|&tag| self.get(tag).map(|end| (tag, end)))
    }
}
