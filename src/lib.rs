//! # wadmerge - Merge Doom-engine WAD archives
//!
//! `wadmerge-rs` joins any number of WAD containers into one, in order:
//!
//! - **First name wins**: a lump whose name is already present is dropped
//!   (unless duplicates are allowed)
//! - **Map blocks move as a unit**: a duplicate `MAP01`/`E1M1` label drops its
//!   whole block of component lumps, sized per map format
//! - **Regions stay contiguous**: lumps inside `S_START`..`S_END`,
//!   `F_START`..`F_END` and friends are inserted at the end of the matching
//!   region in the output
//! - **Content deduplication**: identical payloads can be stored once
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wadmerge_rs::{Result, WadMerger};
//!
//! # fn main() -> Result<()> {
//! let report = WadMerger::new()
//!     .input("doom2.wad")
//!     .input("mymaps.wad")
//!     .deduplicate(true)
//!     .run("merged.wad")?;
//!
//! println!("{} lumps written", report.lumps_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with containers directly
//!
//! ```rust,no_run
//! use wadmerge_rs::{Result, Wad, WadKind};
//!
//! # fn main() -> Result<()> {
//! let base = Wad::load("base.wad")?;
//! let patch = Wad::load("patch.wad")?;
//!
//! let mut out = Wad::new(WadKind::Pwad);
//! out.reserve_index(base.len() + patch.len());
//! out.merge(&base, false);
//! out.merge(&patch, false);
//! out.save("out.wad")?;
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{
    config, dedup, dialect, directory, error, group, header, index, io, lump, merge, wad,
};

pub use crate::core::{
    config::{MergeConfig, OutputKind},
    dialect::{Dialect, MapUnits},
    error::{Result, WadError},
    group::{LumpGroup, RegionTag},
    header::{WadHeader, WadKind},
    lump::{Lump, LumpName},
    merge::{MergePolicy, MergeStats},
    wad::Wad,
};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Crate version, shown in the command line banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Summary of one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of input containers merged
    pub inputs: usize,

    /// Directory entries in the output
    pub lumps_written: usize,

    /// Lumps dropped as duplicates, map block components included
    pub duplicates_discarded: usize,

    /// Lumps sharing another lump's payload
    pub lumps_deduplicated: usize,

    /// Payload bytes stored in the output
    pub payload_bytes: usize,

    pub kind: WadKind,
}

/// Builder for a merge run
///
/// Inputs are merged in the order they are added.
///
/// # Examples
///
/// ```rust,no_run
/// use wadmerge_rs::{MergeConfig, OutputKind, WadMerger};
///
/// # fn main() -> wadmerge_rs::Result<()> {
/// let config = MergeConfig::load("wadmerge.toml")?;
/// let report = WadMerger::new()
///     .config(config)
///     .inputs(["a.wad", "b.wad"])
///     .output_kind(OutputKind::Pwad)
///     .run("out.wad")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WadMerger {
    inputs: Vec<PathBuf>,
    config: MergeConfig,
}

impl WadMerger {
    pub fn new() -> Self {
        WadMerger::default()
    }

    /// Add one input
    pub fn input<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.inputs.push(path.into());
        self
    }

    /// Add several inputs
    pub fn inputs<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.inputs.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.config.allow_duplicates = allow;
        self
    }

    pub fn deduplicate(mut self, enabled: bool) -> Self {
        self.config.deduplicate = enabled;
        self
    }

    pub fn output_kind(mut self, kind: OutputKind) -> Self {
        self.config.output_kind = kind;
        self
    }

    /// Replace every setting with `config`; call before the individual setters
    pub fn config(mut self, config: MergeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn settings(&self) -> &MergeConfig {
        &self.config
    }

    /// Load all inputs, merge them and write the result to `output`
    ///
    /// Every input is read before the output file is touched, so a read
    /// failure never leaves a partial output behind.
    pub fn run<P: AsRef<Path>>(&self, output: P) -> Result<MergeReport> {
        let output = output.as_ref();
        if self.inputs.is_empty() {
            return Err(WadError::Usage("no input files given".to_string()));
        }

        let sources = self
            .inputs
            .iter()
            .map(|path| self.load_input(path))
            .collect::<Result<Vec<_>>>()?;

        let kind = self
            .config
            .output_kind
            .resolve(sources.iter().map(Wad::kind));
        let total: usize = sources.iter().map(Wad::len).sum();

        let mut dest = Wad::new(kind);
        dest.reserve_index(total);

        info!("Merging...");
        let policy = self.config.policy();
        for source in &sources {
            dest.merge_with(source, &policy);
        }

        let lumps_deduplicated = if self.config.deduplicate {
            info!("Deduplicating...");
            dest.deduplicate()
        } else {
            0
        };

        info!("Writing {}...", output.display());
        dest.save(output)?;

        Ok(MergeReport {
            inputs: sources.len(),
            lumps_written: dest.len(),
            duplicates_discarded: dest.duplicates_discarded(),
            lumps_deduplicated,
            payload_bytes: dest.payload_size(),
            kind,
        })
    }

    fn load_input(&self, path: &Path) -> Result<Wad> {
        info!("Loading {}", path.display());
        let mut wad = Wad::load(path)?;

        if let WadKind::Unknown(tag) = wad.kind() {
            if self.config.strict_kind {
                return Err(WadError::UnknownKind(tag));
            }
        }

        if self.config.map_marker_max_size != dialect::DEFAULT_MARKER_MAX_SIZE {
            let dialect = wad.detect_dialect(self.config.map_marker_max_size);
            debug!("{}: dialect re-detected as {}", path.display(), dialect);
        }

        Ok(wad)
    }
}
