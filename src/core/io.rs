//! Container codec: reading and writing WAD files
//!
//! Payloads are packed directly after the header in directory order, with
//! no gaps; collapsed lumps contribute no bytes and report the location of
//! the lump they share data with. The directory follows the payload area.

use crate::directory::{DirEntry, DIRECTORY_ENTRY_SIZE};
use crate::error::{Result, WadError};
use crate::header::{WadHeader, HEADER_SIZE};
use crate::lump::Lump;
use crate::wad::Wad;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{info, warn};

/// Load a container from disk
pub fn load<P: AsRef<Path>>(path: P) -> Result<Wad> {
    let path = path.as_ref();
    let read_error = |source| WadError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::new(file);

    let wad = read_wad(&mut reader).map_err(|err| match err {
        WadError::Io(source) => read_error(source),
        other => other,
    })?;

    info!(
        "Loaded {} ({}, {} lumps, {} maps)",
        path.display(),
        wad.kind(),
        wad.len(),
        wad.dialect()
    );
    Ok(wad)
}

/// Decode a container from any seekable reader
pub fn read_wad<R: Read + Seek>(reader: &mut R) -> Result<Wad> {
    let stream_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut header_bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header_bytes)?;
    let header = WadHeader::from_bytes(&header_bytes)?;

    if !header.kind.is_known() {
        warn!("Container has unrecognized type tag: {}", header.kind);
    }

    let directory_len = u64::from(header.lump_count) * DIRECTORY_ENTRY_SIZE as u64;
    let directory_end = u64::from(header.directory_offset) + directory_len;
    if directory_end > stream_len {
        return Err(WadError::malformed(format!(
            "directory of {} entries at offset {} extends past end of file ({} bytes)",
            header.lump_count, header.directory_offset, stream_len
        )));
    }

    reader.seek(SeekFrom::Start(u64::from(header.directory_offset)))?;
    let mut directory = vec![0u8; directory_len as usize];
    reader.read_exact(&mut directory)?;

    let entries = directory
        .chunks_exact(DIRECTORY_ENTRY_SIZE)
        .map(|chunk| {
            let mut raw = [0u8; DIRECTORY_ENTRY_SIZE];
            raw.copy_from_slice(chunk);
            DirEntry::from_bytes(&raw)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut lumps = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.size > 0 && entry.end() > stream_len {
            return Err(WadError::malformed(format!(
                "lump {} ({} bytes at offset {}) extends past end of file",
                entry.name, entry.size, entry.location
            )));
        }

        let mut data = vec![0u8; entry.size as usize];
        if entry.size > 0 {
            reader.seek(SeekFrom::Start(u64::from(entry.location)))?;
            reader.read_exact(&mut data)?;
        }

        let mut lump = Lump::new(entry.name, data);
        lump.location = entry.location;
        lumps.push(lump);
    }

    Ok(Wad::from_lumps(header.kind, lumps))
}

/// Write a container to disk
///
/// Header and directory are encoded before the file is created, so a
/// container that cannot be represented never truncates an existing file.
pub fn save<P: AsRef<Path>>(path: P, wad: &mut Wad) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| WadError::Write {
        path: path.to_path_buf(),
        source,
    };

    let layout = Layout::encode(wad)?;

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    layout.write(&mut writer, wad).map_err(write_error)?;

    let file = writer
        .into_inner()
        .map_err(|err| write_error(err.into_error()))?;
    file.sync_all().map_err(write_error)?;

    info!(
        "Wrote {} ({}, {} lumps, {} payload bytes)",
        path.display(),
        wad.kind(),
        wad.len(),
        wad.payload_size()
    );
    Ok(())
}

/// Encode a container into any writer
pub fn write_wad<W: Write>(writer: &mut W, wad: &mut Wad) -> Result<()> {
    let layout = Layout::encode(wad)?;
    layout.write(writer, wad)?;
    Ok(())
}

/// Assign packed payload offsets; returns the resulting directory offset
///
/// Collapsed lumps take the location of the lump they share with, which
/// always precedes them and has therefore been placed already. Fails when a
/// payload would start beyond what a directory entry can address.
pub(crate) fn pack_locations(wad: &mut Wad) -> Result<u64> {
    let mut cursor = HEADER_SIZE as u64;

    for position in 0..wad.lumps.len() {
        let location = match wad.lumps[position].shared_with {
            Some(target) => wad.lumps[target].location,
            None => {
                let location = u32::try_from(cursor)
                    .ok()
                    .filter(|&location| i32::try_from(location).is_ok())
                    .ok_or_else(|| {
                        WadError::malformed(format!(
                            "lump {} would start at offset {}, past the 2 GiB limit",
                            wad.lumps[position].name(),
                            cursor
                        ))
                    })?;
                cursor += wad.lumps[position].size() as u64;
                location
            }
        };
        wad.lumps[position].location = location;
    }

    Ok(cursor)
}

/// Encoded header and directory for one save
struct Layout {
    header: [u8; HEADER_SIZE],
    directory: Vec<u8>,
}

impl Layout {
    fn encode(wad: &mut Wad) -> Result<Self> {
        let directory_offset = pack_locations(wad)?;

        let header = WadHeader::new(
            wad.kind,
            u32::try_from(wad.lumps.len())
                .map_err(|_| WadError::malformed("too many lumps for the format"))?,
            u32::try_from(directory_offset)
                .map_err(|_| WadError::malformed("payload too large for the format"))?,
        )
        .to_bytes()?;

        let mut directory = Vec::with_capacity(wad.lumps.len() * DIRECTORY_ENTRY_SIZE);
        for lump in &wad.lumps {
            let entry = DirEntry {
                location: lump.location,
                size: u32::try_from(lump.size()).map_err(|_| {
                    WadError::malformed(format!("lump {} is too large", lump.name()))
                })?,
                name: *lump.name(),
            };
            directory.extend_from_slice(&entry.to_bytes()?);
        }

        Ok(Layout { header, directory })
    }

    fn write<W: Write>(&self, writer: &mut W, wad: &Wad) -> std::io::Result<()> {
        writer.write_all(&self.header)?;
        for lump in wad.lumps.iter().filter(|lump| !lump.is_deduplicated()) {
            writer.write_all(lump.data())?;
        }
        writer.write_all(&self.directory)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::WadKind;
    use crate::lump::LumpName;
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn lump(name: &str, data: &[u8]) -> Lump {
        Lump::new(LumpName::new(name).unwrap(), data.to_vec())
    }

    fn encode(wad: &mut Wad) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_wad(&mut bytes, wad).unwrap();
        bytes
    }

    #[test]
    fn test_byte_layout() {
        let mut wad = Wad::from_lumps(
            WadKind::Pwad,
            vec![lump("MAP01", b""), lump("ABC", b"xyz")],
        );
        let bytes = encode(&mut wad);

        let mut expected = Vec::new();
        expected.extend_from_slice(b"PWAD");
        expected.extend_from_slice(&2i32.to_le_bytes());
        expected.extend_from_slice(&15i32.to_le_bytes());
        expected.extend_from_slice(b"xyz");
        // MAP01: zero size, located at the packing cursor
        expected.extend_from_slice(&12i32.to_le_bytes());
        expected.extend_from_slice(&0i32.to_le_bytes());
        expected.extend_from_slice(b"MAP01\0\0\0");
        expected.extend_from_slice(&12i32.to_le_bytes());
        expected.extend_from_slice(&3i32.to_le_bytes());
        expected.extend_from_slice(b"ABC\0\0\0\0\0");

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_read_write_round_trip() {
        let mut wad = Wad::from_lumps(
            WadKind::Iwad,
            vec![
                lump("PLAYPAL", &[7u8; 768]),
                lump("F_START", b""),
                lump("FLOOR0_1", &[3u8; 4096]),
                lump("F_END", b""),
            ],
        );
        let bytes = encode(&mut wad);

        let decoded = read_wad(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(decoded.kind(), WadKind::Iwad);
        assert_eq!(decoded.len(), 4);
        for (a, b) in wad.lumps().iter().zip(decoded.lumps()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.data(), b.data());
            assert_eq!(a.location(), b.location());
            assert_eq!(a.group(), b.group());
        }

        // A second encode of the decoded container is byte-identical
        let mut decoded = decoded;
        assert_eq!(encode(&mut decoded), bytes);
    }

    #[test]
    fn test_reads_unpacked_layout() {
        // Directory first, payload after it, with padding in between
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"PWAD");
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&12i32.to_le_bytes());
        bytes.extend_from_slice(&40i32.to_le_bytes());
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice(b"DATA\0\0\0\0");
        bytes.resize(40, 0xAA);
        bytes.extend_from_slice(b"1234");

        let wad = read_wad(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(wad.lumps()[0].data(), b"1234");
        assert_eq!(wad.lumps()[0].location(), 40);
    }

    #[test]
    fn test_deduplicated_entries_share_location() {
        let mut wad = Wad::from_lumps(
            WadKind::Pwad,
            vec![lump("A", b"same"), lump("B", b"diff"), lump("C", b"same")],
        );
        wad.deduplicate();
        let bytes = encode(&mut wad);

        // Header + two payloads + three directory entries
        assert_eq!(bytes.len(), HEADER_SIZE + 8 + 3 * DIRECTORY_ENTRY_SIZE);

        let decoded = read_wad(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(decoded.lumps()[2].location(), decoded.lumps()[0].location());
        assert_eq!(decoded.lumps()[2].data(), b"same");
    }

    #[test]
    fn test_offsets_past_format_limit_rejected() {
        // One shared 1 MiB buffer, referenced often enough to pass 2 GiB
        let block: Arc<[u8]> = vec![0u8; 1 << 20].into();
        let lumps = (0..2100)
            .map(|i| Lump::new(LumpName::new(&format!("B{i}")).unwrap(), Arc::clone(&block)))
            .collect();
        let mut wad = Wad::from_lumps(WadKind::Pwad, lumps);

        assert!(matches!(
            pack_locations(&mut wad),
            Err(WadError::Malformed { .. })
        ));

        let mut out = Vec::new();
        assert!(matches!(
            write_wad(&mut out, &mut wad),
            Err(WadError::Malformed { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_tag_loads_but_does_not_save() {
        let mut wad = Wad::from_lumps(WadKind::Pwad, vec![lump("A", b"1")]);
        let mut bytes = encode(&mut wad);
        bytes[0..4].copy_from_slice(b"WAD2");

        let mut decoded = read_wad(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(decoded.kind(), WadKind::Unknown(*b"WAD2"));

        let mut out = Vec::new();
        assert!(matches!(
            write_wad(&mut out, &mut decoded),
            Err(WadError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_short_header_is_io_error() {
        let result = read_wad(&mut Cursor::new(b"PWAD\x01\x00"));
        assert!(matches!(result, Err(WadError::Io(_))));
    }

    #[test]
    fn test_directory_past_end_is_malformed() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"PWAD");
        bytes.extend_from_slice(&1000i32.to_le_bytes());
        bytes.extend_from_slice(&12i32.to_le_bytes());

        let result = read_wad(&mut Cursor::new(&bytes));
        assert!(matches!(result, Err(WadError::Malformed { .. })));
    }

    #[test]
    fn test_lump_past_end_is_malformed() {
        let mut wad = Wad::from_lumps(WadKind::Pwad, vec![lump("A", b"abcd")]);
        let mut bytes = encode(&mut wad);
        // Bump the lump size in the directory entry
        let size_at = HEADER_SIZE + 4 + 4;
        bytes[size_at..size_at + 4].copy_from_slice(&400i32.to_le_bytes());

        let result = read_wad(&mut Cursor::new(&bytes));
        assert!(matches!(result, Err(WadError::Malformed { .. })));
    }

    #[test]
    fn test_load_and_save_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.wad");

        let mut wad = Wad::from_lumps(WadKind::Pwad, vec![lump("ENDOOM", &[1u8; 4000])]);
        save(&path, &mut wad).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.lumps()[0].data(), &[1u8; 4000][..]);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = load(temp_dir.path().join("missing.wad"));
        assert!(matches!(result, Err(WadError::Read { .. })));
    }

    #[test]
    fn test_save_into_missing_directory_is_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("out.wad");

        let mut wad = Wad::from_lumps(WadKind::Pwad, vec![lump("A", b"1")]);
        assert!(matches!(save(&path, &mut wad), Err(WadError::Write { .. })));
    }

    #[test]
    fn test_unknown_kind_does_not_touch_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keep.wad");
        std::fs::write(&path, b"existing").unwrap();

        let mut wad = Wad::from_lumps(WadKind::Unknown(*b"JUNK"), vec![lump("A", b"1")]);
        assert!(save(&path, &mut wad).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"existing");
    }
}
