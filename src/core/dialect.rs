//! Game dialect detection and map block sizes
//!
//! A map is stored as a zero-size label (`MAP01`, `E1M1`) followed by a fixed
//! run of component lumps. How long that run is depends on the map format:
//!
//! ```text
//! Doom / Doom 2 / Heretic   THINGS LINEDEFS SIDEDEFS VERTEXES SEGS
//!                           SSECTORS NODES SECTORS REJECT BLOCKMAP      (10)
//! Hexen                     the ten above + BEHAVIOR                     (11)
//! GL nodes (GL_<map>)       GL_VERT GL_SEGS GL_SSECT GL_NODES GL_PVS     (5)
//! ```

use crate::lump::{Lump, LumpName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest lump size still treated as a map label rather than data
pub const DEFAULT_MARKER_MAX_SIZE: usize = 32;

/// Position of `BEHAVIOR` relative to a Hexen map label
pub const HEXEN_BEHAVIOR_OFFSET: usize = 11;

/// Component lumps that belong to a map block and are never name-checked
const MAP_COMPONENTS: [&str; 17] = [
    "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS",
    "REJECT", "BLOCKMAP", "BEHAVIOR", "SCRIPTS", "GL_VERT", "GL_SEGS", "GL_SSECT", "GL_NODES",
    "GL_PVS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Unknown,
    /// Episode/map naming (`ExMy`); covers Doom and Heretic
    Doom,
    Doom2,
    /// Episode naming as well; never produced by detection
    Heretic,
    Hexen,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Unknown => "unknown",
            Dialect::Doom => "Doom",
            Dialect::Doom2 => "Doom 2",
            Dialect::Heretic => "Heretic",
            Dialect::Hexen => "Hexen",
        };
        f.write_str(name)
    }
}

/// Number of lumps following a map label that belong to its block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapUnits {
    pub unknown: usize,
    pub doom: usize,
    pub doom2: usize,
    pub heretic: usize,
    pub hexen: usize,
    /// Lumps following a `GL_<map>` label
    pub gl_nodes: usize,
}

impl MapUnits {
    pub fn lumps_per_map(&self, dialect: Dialect) -> usize {
        match dialect {
            Dialect::Unknown => self.unknown,
            Dialect::Doom => self.doom,
            Dialect::Doom2 => self.doom2,
            Dialect::Heretic => self.heretic,
            Dialect::Hexen => self.hexen,
        }
    }
}

impl Default for MapUnits {
    fn default() -> Self {
        MapUnits {
            unknown: 10,
            doom: 10,
            doom2: 10,
            heretic: 10,
            hexen: 11,
            gl_nodes: 5,
        }
    }
}

/// `MAPxx` label
pub fn is_map_marker(name: &LumpName, size: usize, max_size: usize) -> bool {
    let raw = name.as_bytes();
    size <= max_size
        && raw.starts_with(b"MAP")
        && raw[3].is_ascii_digit()
        && raw[4].is_ascii_digit()
}

/// `ExMy` label
pub fn is_episode_marker(name: &LumpName, size: usize, max_size: usize) -> bool {
    let raw = name.as_bytes();
    size <= max_size
        && raw[0] == b'E'
        && raw[1].is_ascii_digit()
        && raw[2] == b'M'
        && raw[3].is_ascii_digit()
}

/// `GL_<map>` label introducing a GL node block
///
/// Any size: glBSP v5 stores `LEVEL=`/`BUILDER=`/`CHECKSUM=` text in the label.
pub fn is_gl_marker(name: &LumpName) -> bool {
    name.starts_with(b"GL_") && !is_map_component(name)
}

pub fn is_map_component(name: &LumpName) -> bool {
    MAP_COMPONENTS.iter().any(|component| name.is(component))
}

/// Detect the map dialect from the first map label in `lumps`
pub fn classify(lumps: &[Lump], max_marker_size: usize) -> Dialect {
    for (position, lump) in lumps.iter().enumerate() {
        let name = lump.name();

        if is_map_marker(name, lump.size(), max_marker_size) {
            let has_behavior = lumps
                .get(position + HEXEN_BEHAVIOR_OFFSET)
                .is_some_and(|lump| lump.name().is("BEHAVIOR"));

            return if has_behavior {
                Dialect::Hexen
            } else {
                Dialect::Doom2
            };
        }

        if is_episode_marker(name, lump.size(), max_marker_size) {
            return Dialect::Doom;
        }
    }

    Dialect::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lump(name: &str, size: usize) -> Lump {
        Lump::new(LumpName::new(name).unwrap(), vec![0u8; size])
    }

    fn map_block(marker: &str, hexen: bool) -> Vec<Lump> {
        let mut lumps = vec![lump(marker, 0)];
        for component in &MAP_COMPONENTS[..10] {
            lumps.push(lump(component, 16));
        }
        if hexen {
            lumps.push(lump("BEHAVIOR", 24));
        }
        lumps
    }

    #[test]
    fn test_marker_patterns() {
        let name = |n: &str| LumpName::new(n).unwrap();
        assert!(is_map_marker(&name("MAP01"), 0, 32));
        assert!(!is_map_marker(&name("MAPINFO"), 0, 32));
        assert!(!is_map_marker(&name("MAP01"), 33, 32));
        assert!(is_episode_marker(&name("E1M1"), 0, 32));
        assert!(!is_episode_marker(&name("ENDOOM"), 0, 32));
        assert!(is_gl_marker(&name("GL_MAP01")));
        assert!(is_gl_marker(&name("GL_E1M1")));
        assert!(!is_gl_marker(&name("GL_VERT")));
    }

    #[test]
    fn test_map_components() {
        assert!(is_map_component(&LumpName::new("THINGS").unwrap()));
        assert!(is_map_component(&LumpName::new("GL_PVS").unwrap()));
        assert!(!is_map_component(&LumpName::new("MAP01").unwrap()));
        assert!(!is_map_component(&LumpName::new("PLAYPAL").unwrap()));
    }

    #[test]
    fn test_classify_hexen() {
        let lumps = map_block("MAP01", true);
        assert_eq!(lumps[HEXEN_BEHAVIOR_OFFSET].name().to_string(), "BEHAVIOR");
        assert_eq!(classify(&lumps, DEFAULT_MARKER_MAX_SIZE), Dialect::Hexen);
    }

    #[test]
    fn test_classify_doom2() {
        let lumps = map_block("MAP01", false);
        assert_eq!(classify(&lumps, DEFAULT_MARKER_MAX_SIZE), Dialect::Doom2);
    }

    #[test]
    fn test_classify_doom_episode() {
        let lumps = map_block("E1M1", false);
        assert_eq!(classify(&lumps, DEFAULT_MARKER_MAX_SIZE), Dialect::Doom);
    }

    #[test]
    fn test_classify_without_maps() {
        let lumps = vec![lump("PLAYPAL", 768), lump("COLORMAP", 8704)];
        assert_eq!(classify(&lumps, DEFAULT_MARKER_MAX_SIZE), Dialect::Unknown);
    }

    #[test]
    fn test_first_label_wins() {
        let mut lumps = map_block("E2M3", false);
        lumps.extend(map_block("MAP07", true));
        assert_eq!(classify(&lumps, DEFAULT_MARKER_MAX_SIZE), Dialect::Doom);
    }

    #[test]
    fn test_map_unit_table() {
        let units = MapUnits::default();
        assert_eq!(units.lumps_per_map(Dialect::Doom), 10);
        assert_eq!(units.lumps_per_map(Dialect::Doom2), 10);
        assert_eq!(units.lumps_per_map(Dialect::Hexen), 11);
        assert_eq!(units.gl_nodes, 5);
    }
}
