use std::fmt;
use std::path::PathBuf;

use crate::foundation::core::TimeSlot;

/// Subdirectory of the destination that holds the credits variants.
pub const METADATA_DIR: &str = "metadata";

/// Which of a quote's two exports a file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Quote text only.
    Primary,
    /// Quote text plus the title/author line.
    Credits,
}

/// Deterministic base name for the exports of one record.
///
/// `quote_{HHMM}_{ordinal}` with an unpadded ordinal, the names downstream readers look up.
/// File names sort by time slot; [`Ord`] also orders ordinals numerically within a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactName {
    pub slot: TimeSlot,
    pub ordinal: usize,
}

impl ArtifactName {
    pub fn new(slot: TimeSlot, ordinal: usize) -> Self {
        Self { slot, ordinal }
    }

    /// File name of the `kind` export.
    pub fn file_name(&self, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Primary => format!("{self}.png"),
            ArtifactKind::Credits => format!("{self}_credits.png"),
        }
    }

    /// Path of the `kind` export relative to the destination directory.
    pub fn relative_path(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Primary => PathBuf::from(self.file_name(kind)),
            ArtifactKind::Credits => PathBuf::from(METADATA_DIR).join(self.file_name(kind)),
        }
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quote_{}_{}", self.slot.compact(), self.ordinal)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/naming.rs"]
mod tests;
