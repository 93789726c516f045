//! Common trait for checklist file formats.

use std::fmt;
use std::str::FromStr;

use super::FormatError;
use crate::model::ChecklistFile;

/// Identifier of a registered format.
///
/// Writers are addressed by identifier; readers are found by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatId {
    Ace,
    Json,
    Dynon,
    Dynon31,
    Dynon40,
    Afs,
    Grt,
    ForeFlight,
    GarminPilot,
}

impl FormatId {
    pub const ALL: [FormatId; 9] = [
        Self::Ace,
        Self::Json,
        Self::Dynon,
        Self::Dynon31,
        Self::Dynon40,
        Self::Afs,
        Self::Grt,
        Self::ForeFlight,
        Self::GarminPilot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ace => "ace",
            Self::Json => "json",
            Self::Dynon => "dynon",
            Self::Dynon31 => "dynon31",
            Self::Dynon40 => "dynon40",
            Self::Afs => "afd",
            Self::Grt => "grt",
            Self::ForeFlight => "foreflight",
            Self::GarminPilot => "garmin-pilot",
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatId {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormatError::unsupported(format!("unknown format identifier: {s}")))
    }
}

/// Capabilities supported by a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapability {
    /// Can read files.
    pub read: bool,
    /// Can write files.
    pub write: bool,
    /// Writing then reading reproduces the model exactly.
    pub lossless: bool,
}

impl FormatCapability {
    /// Full capability (read, write, lossless).
    pub const FULL: Self = Self {
        read: true,
        write: true,
        lossless: true,
    };

    /// Reads and writes, but some model details do not survive.
    pub const LOSSY: Self = Self {
        read: true,
        write: true,
        lossless: false,
    };
}

/// An uploaded file handed to a reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Original file name, used for extension dispatch and name fallback.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Bytes produced by a writer, with a suggested file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Trait for checklist formats.
///
/// Implementations convert between the canonical [`ChecklistFile`] and one
/// vendor format. They hold no state between calls, so a single instance can
/// serve concurrent reads and writes.
pub trait ChecklistFormat: Send + Sync {
    /// Registry identifier.
    fn id(&self) -> FormatId;

    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension (without the dot) this format reads and writes.
    fn extension(&self) -> &str {
        self.id().as_str()
    }

    /// MIME type for written files.
    fn mime_type(&self) -> &'static str {
        "application/octet-stream"
    }

    /// Capabilities of this format implementation.
    fn capabilities(&self) -> FormatCapability;

    /// Read a checklist file from uploaded bytes.
    fn read(&self, file: &InputFile) -> Result<ChecklistFile, FormatError>;

    /// Write a checklist file.
    ///
    /// Fails before producing any bytes when the file has no name.
    fn write(&self, file: &ChecklistFile) -> Result<OutputFile, FormatError>;

    /// Quick check that the input looks like this format.
    ///
    /// This doesn't fully parse the content.
    fn validate(&self, input: &[u8]) -> Result<(), FormatError> {
        let _ = input;
        Ok(())
    }
}
