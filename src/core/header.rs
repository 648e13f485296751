//! Container header (first 12 bytes of every WAD)
//!
//! ```text
//! offset 0:  4 bytes  type tag ("IWAD" or "PWAD")
//! offset 4:  i32 LE   lump count
//! offset 8:  i32 LE   directory offset
//! ```

use crate::error::{Result, WadError};
use std::fmt;

pub const HEADER_SIZE: usize = 12;
pub const IWAD_TAG: [u8; 4] = *b"IWAD";
pub const PWAD_TAG: [u8; 4] = *b"PWAD";

/// Container type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WadKind {
    /// Game data ("internal" WAD)
    Iwad,
    /// Patch WAD
    Pwad,
    /// Any other tag, kept verbatim so it can be reported
    Unknown([u8; 4]),
}

impl WadKind {
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match tag {
            IWAD_TAG => WadKind::Iwad,
            PWAD_TAG => WadKind::Pwad,
            other => WadKind::Unknown(other),
        }
    }

    /// Tag bytes to write, or `UnknownKind` for a tag we refuse to emit
    pub fn tag(&self) -> Result<[u8; 4]> {
        match self {
            WadKind::Iwad => Ok(IWAD_TAG),
            WadKind::Pwad => Ok(PWAD_TAG),
            WadKind::Unknown(tag) => Err(WadError::UnknownKind(*tag)),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WadKind::Unknown(_))
    }
}

impl Default for WadKind {
    fn default() -> Self {
        WadKind::Pwad
    }
}

impl fmt::Display for WadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WadKind::Iwad => f.write_str("IWAD"),
            WadKind::Pwad => f.write_str("PWAD"),
            WadKind::Unknown(tag) => write!(f, "unknown ({:?})", String::from_utf8_lossy(tag)),
        }
    }
}

/// Decoded header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadHeader {
    pub kind: WadKind,
    pub lump_count: u32,
    pub directory_offset: u32,
}

impl WadHeader {
    pub fn new(kind: WadKind, lump_count: u32, directory_offset: u32) -> Self {
        WadHeader {
            kind,
            lump_count,
            directory_offset,
        }
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.kind.tag()?);
        bytes[4..8].copy_from_slice(&to_disk_i32(self.lump_count, "lump count")?.to_le_bytes());
        bytes[8..12].copy_from_slice(
            &to_disk_i32(self.directory_offset, "directory offset")?.to_le_bytes(),
        );
        Ok(bytes)
    }

    /// Deserialize header from bytes
    ///
    /// An unrecognized tag is not an error here; it surfaces as `WadKind::Unknown`.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let tag = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let lump_count = from_disk_i32(&bytes[4..8], "lump count")?;
        let directory_offset = from_disk_i32(&bytes[8..12], "directory offset")?;

        Ok(WadHeader {
            kind: WadKind::from_tag(tag),
            lump_count,
            directory_offset,
        })
    }
}

/// Decode a little-endian signed field, rejecting negative values
pub(crate) fn from_disk_i32(bytes: &[u8], field: &str) -> Result<u32> {
    let raw = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    u32::try_from(raw).map_err(|_| WadError::malformed(format!("negative {field}: {raw}")))
}

/// Encode a field as the signed 32-bit value the format stores
pub(crate) fn to_disk_i32(value: u32, field: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| WadError::malformed(format!("{field} {value} does not fit the format")))
}
