//! WAD container core
//!
//! - [`header`] / [`directory`] / [`io`] - on-disk format and codec
//! - [`lump`] - named records with shared payloads
//! - [`group`] - `*_START`/`*_END` region classification
//! - [`dialect`] - map format detection and map block sizes
//! - [`index`] - name hash index for duplicate detection
//! - [`merge`] - merge engine
//! - [`dedup`] - content deduplication
//! - [`wad`] - the in-memory container tying these together
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ Header (12 bytes)            │
//! │  - "IWAD" / "PWAD"           │
//! │  - lump count                │
//! │  - directory offset          │
//! ├──────────────────────────────┤
//! │ Payloads, packed in order    │
//! ├──────────────────────────────┤
//! │ Directory (16 bytes / lump)  │
//! │  - location, size, name[8]   │
//! └──────────────────────────────┘
//! ```

pub mod config;
pub mod dedup;
pub mod dialect;
pub mod directory;
pub mod error;
pub mod group;
pub mod header;
pub mod index;
pub mod io;
pub mod lump;
pub mod merge;
pub mod wad;

pub use config::{MergeConfig, OutputKind};
pub use dialect::{Dialect, MapUnits};
pub use error::{Result, WadError};
pub use group::{LumpGroup, RegionTag};
pub use header::WadKind;
pub use lump::{Lump, LumpName};
pub use merge::{MergePolicy, MergeStats};
pub use wad::Wad;
