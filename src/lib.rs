//! # checklist-formats
//!
//! Readers and writers for aircraft checklist files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! formats   → Vendor codecs, format registry and upload dispatch
//!   ↓
//! model     → Canonical checklist model (file, groups, checklists, items)
//! ```

// ============================================================================
// MODULES (dependency order: model → formats)
// ============================================================================

/// Canonical checklist model shared by every format
pub mod model;

/// Format codecs: ACE, text dialects, ForeFlight, Garmin Pilot, JSON
pub mod formats;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use formats::{
    ChecklistFormat, FormatCapability, FormatError, FormatId, FormatRegistry, InputFile,
    OutputFile, RegistryError,
};
pub use model::{
    Checklist, ChecklistFile, ChecklistFileMetadata, ChecklistGroup, ChecklistItem,
    CompletionAction, GroupCategory, ItemType,
};
