//! Directory entries (16 bytes each, stored at the directory offset)

use crate::error::Result;
use crate::header::{from_disk_i32, to_disk_i32};
use crate::lump::{LumpName, NAME_LEN};

pub const DIRECTORY_ENTRY_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub location: u32,
    pub size: u32,
    pub name: LumpName,
}

impl DirEntry {
    pub fn to_bytes(&self) -> Result<[u8; DIRECTORY_ENTRY_SIZE]> {
        let mut bytes = [0u8; DIRECTORY_ENTRY_SIZE];
        bytes[0..4].copy_from_slice(&to_disk_i32(self.location, "lump location")?.to_le_bytes());
        bytes[4..8].copy_from_slice(&to_disk_i32(self.size, "lump size")?.to_le_bytes());
        bytes[8..16].copy_from_slice(self.name.as_bytes());
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8; DIRECTORY_ENTRY_SIZE]) -> Result<Self> {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&bytes[8..16]);

        Ok(DirEntry {
            location: from_disk_i32(&bytes[0..4], "lump location")?,
            size: from_disk_i32(&bytes[4..8], "lump size")?,
            name: LumpName::from_bytes(name),
        })
    }

    /// First byte past the lump's payload
    pub fn end(&self) -> u64 {
        u64::from(self.location) + u64::from(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WadError;

    #[test]
    fn test_entry_layout() {
        let entry = DirEntry {
            location: 12,
            size: 768,
            name: LumpName::new("PLAYPAL").unwrap(),
        };
        let bytes = entry.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], &[12, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[0, 3, 0, 0]);
        assert_eq!(&bytes[8..16], b"PLAYPAL\0");
        assert_eq!(DirEntry::from_bytes(&bytes).unwrap(), entry);
        assert_eq!(entry.end(), 780);
    }

    #[test]
    fn test_name_bytes_kept_verbatim() {
        let mut bytes = [0u8; DIRECTORY_ENTRY_SIZE];
        bytes[8..16].copy_from_slice(b"DEMO1\0zz");
        let entry = DirEntry::from_bytes(&bytes).unwrap();
        assert_eq!(entry.name.as_bytes(), b"DEMO1\0zz");
        assert_eq!(entry.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_negative_size_rejected() {
        let mut bytes = [0u8; DIRECTORY_ENTRY_SIZE];
        bytes[4..8].copy_from_slice(&(-16i32).to_le_bytes());
        assert!(matches!(
            DirEntry::from_bytes(&bytes),
            Err(WadError::Malformed { .. })
        ));
    }
}
