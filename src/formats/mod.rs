//! Checklist file formats.
//!
//! Every vendor format converts to and from the canonical
//! [`ChecklistFile`](crate::model::ChecklistFile):
//!
//! - **ACE** - Garmin G3X / GTN binary checklists
//! - **Text** - Dynon, Advanced Flight Systems and GRT line formats
//! - **ForeFlight** - AES encrypted JSON (feature `foreflight`)
//! - **Garmin Pilot** - gzip + tar JSON package (feature `garmin-pilot`)
//! - **JSON** - the canonical model as-is
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌──────────────┐ ┌──────────┐
//! │   ACE    │ │   Text   │ │ ForeFlight │ │ Garmin Pilot │ │   JSON   │
//! └────┬─────┘ └────┬─────┘ └─────┬──────┘ └──────┬───────┘ └────┬─────┘
//!      │            │             │               │              │
//!      ▼            ▼             ▼               ▼              ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       ChecklistFormat trait                         │
//! │  - read(&InputFile) -> Result<ChecklistFile>                        │
//! │  - write(&ChecklistFile) -> Result<OutputFile>                      │
//! └─────────────────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  FormatRegistry: writers by FormatId, readers raced by extension    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use checklist::formats::{FormatId, FormatRegistry, InputFile};
//!
//! let registry = FormatRegistry::with_default_formats();
//! let file = registry
//!     .parse_file(InputFile::new("N12345.ace", std::fs::read("N12345.ace")?))
//!     .await?;
//! let dynon = registry.write_file(FormatId::Dynon, &file).await?;
//! ```

pub mod ace;
mod error;
#[cfg(feature = "foreflight")]
pub mod foreflight;
mod format;
#[cfg(feature = "garmin-pilot")]
pub mod garmin_pilot;
mod json;
pub mod live_data;
pub mod naming;
pub mod prefixes;
mod registry;
pub mod text;

pub use ace::Ace;
pub use error::FormatError;
#[cfg(feature = "foreflight")]
pub use foreflight::ForeFlight;
pub use format::{ChecklistFormat, FormatCapability, FormatId, InputFile, OutputFile};
#[cfg(feature = "garmin-pilot")]
pub use garmin_pilot::GarminPilot;
pub use json::Json;
pub use live_data::LiveDataField;
pub use prefixes::TypePrefixes;
pub use registry::{FormatRegistry, RegistryError};
pub use text::{TextFormat, TextFormatOptions, dialects};
