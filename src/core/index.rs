//! Name hash index for first-seen duplicate detection
//!
//! A fixed table of one-bit slots, sized to a prime at least as large as the
//! number of lumps expected in the merged output. An unset slot proves a name
//! has never been seen; a set slot only means "maybe", and the caller has to
//! confirm with an exact scan.

use crate::lump::LumpName;

/// Result of probing the index with a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Definitely not seen before; the slot is now set
    FirstSeen,
    /// Slot already set (or index unsized): fall back to an exact comparison
    PossibleCollision,
}

/// Bitmap of name hash slots
#[derive(Debug, Clone)]
pub struct DuplicateIndex {
    /// Slot words (each word = 64 slots)
    slots: Vec<u64>,

    /// Table size (a prime)
    size: usize,
}

impl DuplicateIndex {
    /// Create an index with room for `expected` names
    pub fn with_capacity(expected: usize) -> Self {
        let size = next_prime(expected);
        DuplicateIndex {
            slots: vec![0u64; size.div_ceil(64)],
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Check and mark the slot for `name`
    pub fn probe(&mut self, name: &LumpName) -> Probe {
        let slot = (name_hash(name) % self.size as u64) as usize;
        let word = slot / 64;
        let bit = 1u64 << (slot % 64);

        if self.slots[word] & bit != 0 {
            Probe::PossibleCollision
        } else {
            self.slots[word] |= bit;
            Probe::FirstSeen
        }
    }
}

/// Probe an optional index; an index that was never sized always collides
pub fn probe(index: Option<&mut DuplicateIndex>, name: &LumpName) -> Probe {
    match index {
        Some(index) => index.probe(name),
        None => Probe::PossibleCollision,
    }
}

/// DJB2 over all eight name bytes
pub fn name_hash(name: &LumpName) -> u64 {
    name.as_bytes()
        .iter()
        .fold(5381u64, |h, &b| h.wrapping_mul(33).wrapping_add(u64::from(b)))
}

/// A candidate is prime when exactly two integers in `1..=candidate` divide it
pub fn is_prime(candidate: usize) -> bool {
    (1..=candidate)
        .filter(|divisor| candidate % divisor == 0)
        .take(3)
        .count()
        == 2
}

/// Smallest prime `>= n`
pub fn next_prime(n: usize) -> usize {
    (n..).find(|&candidate| is_prime(candidate)).unwrap_or(2)
}
