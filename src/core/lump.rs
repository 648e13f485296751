//! Lump records and their fixed-width names

use crate::error::{Result, WadError};
use crate::group::LumpGroup;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Width of a lump name on disk
pub const NAME_LEN: usize = 8;

/// Fixed 8-byte lump name
///
/// Names are compared over all eight bytes. Shorter names are NUL padded,
/// but a name read from disk is kept exactly as stored, padding included.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LumpName([u8; NAME_LEN]);

impl LumpName {
    /// Build a NUL-padded name from a string of 1 to 8 bytes
    pub fn new(name: &str) -> Result<Self> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > NAME_LEN {
            return Err(WadError::InvalidName(name.to_string()));
        }

        let mut raw = [0u8; NAME_LEN];
        raw[..bytes.len()].copy_from_slice(bytes);
        Ok(LumpName(raw))
    }

    pub const fn from_bytes(raw: [u8; NAME_LEN]) -> Self {
        LumpName(raw)
    }

    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    /// Name bytes up to the first NUL
    pub fn trimmed(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        &self.0[..end]
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.trimmed().starts_with(prefix)
    }

    /// Exact comparison against a short name, ignoring NUL padding
    pub fn is(&self, name: &str) -> bool {
        self.trimmed() == name.as_bytes()
    }
}

impl FromStr for LumpName {
    type Err = WadError;

    fn from_str(s: &str) -> Result<Self> {
        LumpName::new(s)
    }
}

impl fmt::Display for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.trimmed()))
    }
}

impl fmt::Debug for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LumpName({:?})", String::from_utf8_lossy(self.trimmed()))
    }
}

/// One named record in a container
///
/// The payload is reference counted: lumps copied between containers, and
/// lumps collapsed by content deduplication, share one buffer.
#[derive(Debug, Clone)]
pub struct Lump {
    name: LumpName,
    data: Arc<[u8]>,

    /// Region the lump was classified into when its container was scanned
    pub(crate) group: LumpGroup,

    /// Byte offset of the payload as last loaded or packed
    pub(crate) location: u32,

    /// Index of the earlier lump whose payload this one reuses
    pub(crate) shared_with: Option<usize>,
}

impl Lump {
    pub fn new(name: LumpName, data: impl Into<Arc<[u8]>>) -> Self {
        Lump {
            name,
            data: data.into(),
            group: LumpGroup::General,
            location: 0,
            shared_with: None,
        }
    }

    /// Zero-size lump used as a label (map markers, region brackets)
    pub fn marker(name: LumpName) -> Self {
        Lump::new(name, Vec::new())
    }

    pub fn name(&self) -> &LumpName {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn group(&self) -> LumpGroup {
        self.group
    }

    pub fn location(&self) -> u32 {
        self.location
    }

    pub fn is_deduplicated(&self) -> bool {
        self.shared_with.is_some()
    }

    pub fn shared_with(&self) -> Option<usize> {
        self.shared_with
    }

    /// True when both lumps point at the same payload allocation
    pub fn shares_payload(&self, other: &Lump) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Copy for insertion into another container; positional state is dropped
    pub(crate) fn detached(&self) -> Lump {
        Lump {
            name: self.name,
            data: Arc::clone(&self.data),
            group: self.group,
            location: 0,
            shared_with: None,
        }
    }

    /// Collapse this lump onto `target`'s payload
    pub(crate) fn share(&mut self, target_index: usize, target: &Lump) {
        self.data = Arc::clone(&target.data);
        self.shared_with = Some(target_index);
    }
}
