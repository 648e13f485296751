//! Merge configuration, loaded from TOML
//!
//! Every field has a default, so an empty file (or no file) behaves like the
//! plain command line. Command line flags are applied on top of whatever the
//! file sets.

use crate::dialect::{MapUnits, DEFAULT_MARKER_MAX_SIZE};
use crate::error::{Result, WadError};
use crate::header::WadKind;
use crate::merge::MergePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Type tag written to the output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// PWAD unless at least one input is an IWAD
    #[default]
    Auto,
    Iwad,
    Pwad,
}

impl OutputKind {
    /// Resolve against the kinds of the loaded inputs
    pub fn resolve<I>(self, inputs: I) -> WadKind
    where
        I: IntoIterator<Item = WadKind>,
    {
        match self {
            OutputKind::Iwad => WadKind::Iwad,
            OutputKind::Pwad => WadKind::Pwad,
            OutputKind::Auto => {
                if inputs.into_iter().any(|kind| kind == WadKind::Iwad) {
                    WadKind::Iwad
                } else {
                    WadKind::Pwad
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Keep lumps whose name is already present
    pub allow_duplicates: bool,

    /// Collapse identical payloads before saving
    pub deduplicate: bool,

    pub output_kind: OutputKind,

    /// Reject inputs whose type tag is neither IWAD nor PWAD
    pub strict_kind: bool,

    /// Largest lump still treated as a map label
    pub map_marker_max_size: usize,

    pub map_units: MapUnits,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            allow_duplicates: false,
            deduplicate: false,
            output_kind: OutputKind::Auto,
            strict_kind: false,
            map_marker_max_size: DEFAULT_MARKER_MAX_SIZE,
            map_units: MapUnits::default(),
        }
    }
}

impl MergeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Merge policy derived from this configuration
    pub fn policy(&self) -> MergePolicy {
        MergePolicy {
            allow_duplicates: self.allow_duplicates,
            map_units: self.map_units,
            marker_max_size: self.map_marker_max_size,
        }
    }
}
