//! Line-oriented text checklist formats.
//!
//! Dynon, Advanced Flight Systems and GRT avionics all read plain text files
//! where every line starts with a numbered token identifying a checklist or
//! an item:
//!
//! ```text
//! CHKLST0 NORMAL PROCEDURES: PREFLIGHT
//! ITEM0
//! ITEM1 ** CABIN
//! ITEM2 DOCUMENTS - ON BOARD
//! ITEM3   NOTE: CHECK FUEL QUALITY
//! ```
//!
//! The vendors differ only in details (token templates, separators,
//! numbering base, case, wrap width), so a single engine handles all of them,
//! driven by [`TextFormatOptions`]. The presets live in [`dialects`].
//!
//! File metadata travels as a trailing checklist (titled
//! [`TextFormatOptions::metadata_title`]) with one `Header: value` item per
//! field, followed by a `Last updated:` footer.

pub mod dialects;
mod options;
mod reader;
mod writer;

use chrono::{Local, NaiveDate};

pub use options::{CHECKLIST_NUM, ITEM_NUM, TextFormatOptions};

use super::naming;
use super::{ChecklistFormat, FormatCapability, FormatError, FormatId, InputFile, OutputFile};
use crate::model::ChecklistFile;
use reader::TextReader;
use writer::TextWriter;

/// Headers of the metadata checklist items.
pub(crate) mod headers {
    pub const NAME: &str = "Name:";
    pub const MAKE_AND_MODEL: &str = "Make and model:";
    pub const AIRCRAFT: &str = "Aircraft:";
    pub const MANUFACTURER: &str = "Manufacturer:";
    pub const COPYRIGHT: &str = "Copyright:";
    pub const DESCRIPTION: &str = "Description:";
    pub const LAST_UPDATED: &str = "Last updated:";

    const ALL: [&str; 7] = [
        NAME,
        MAKE_AND_MODEL,
        AIRCRAFT,
        MANUFACTURER,
        COPYRIGHT,
        DESCRIPTION,
        LAST_UPDATED,
    ];

    /// Split `Header: value` (header matched case-insensitively).
    pub fn split(text: &str) -> Option<(&'static str, &str)> {
        ALL.into_iter().find_map(|header| {
            let prefix = text.get(..header.len())?;
            if prefix.eq_ignore_ascii_case(header) {
                Some((header, text[header.len()..].trim()))
            } else {
                None
            }
        })
    }
}

/// A text checklist dialect.
#[derive(Debug, Clone)]
pub struct TextFormat {
    id: FormatId,
    name: &'static str,
    extension: &'static str,
    options: TextFormatOptions,
    date: Option<NaiveDate>,
}

impl TextFormat {
    /// A dialect described by `options`.
    pub fn new(
        id: FormatId,
        name: &'static str,
        extension: &'static str,
        options: TextFormatOptions,
    ) -> Self {
        Self {
            id,
            name,
            extension,
            options,
            date: None,
        }
    }

    /// Dynon with unlimited line length.
    pub fn dynon() -> Self {
        Self::new(FormatId::Dynon, "Dynon", "txt", dialects::dynon())
    }

    /// Dynon wrapped for 31-character displays.
    pub fn dynon31() -> Self {
        Self::new(
            FormatId::Dynon31,
            "Dynon (31 columns)",
            "txt",
            dialects::dynon().with_max_line_length(31),
        )
    }

    /// Dynon wrapped for 40-character displays.
    pub fn dynon40() -> Self {
        Self::new(
            FormatId::Dynon40,
            "Dynon (40 columns)",
            "txt",
            dialects::dynon().with_max_line_length(40),
        )
    }

    /// Advanced Flight Systems.
    pub fn afs() -> Self {
        Self::new(
            FormatId::Afs,
            "Advanced Flight Systems",
            "afd",
            dialects::afs(),
        )
    }

    /// GRT Avionics.
    pub fn grt() -> Self {
        Self::new(FormatId::Grt, "GRT", "txt", dialects::grt())
    }

    /// Stamp written files with a fixed date instead of today.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn options(&self) -> &TextFormatOptions {
        &self.options
    }
}

impl ChecklistFormat for TextFormat {
    fn id(&self) -> FormatId {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn extension(&self) -> &str {
        self.extension
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::LOSSY
    }

    fn read(&self, file: &InputFile) -> Result<ChecklistFile, FormatError> {
        let text = match std::str::from_utf8(&file.bytes) {
            Ok(text) => text.to_string(),
            // Older exports are Latin-1.
            Err(_) => file.bytes.iter().map(|&b| b as char).collect(),
        };
        TextReader::new(self.name, &self.options).read(&text, &file.name)
    }

    fn write(&self, file: &ChecklistFile) -> Result<OutputFile, FormatError> {
        let metadata = file.require_name()?;
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let text = TextWriter::new(self.name, &self.options, date).write(file)?;
        Ok(OutputFile {
            name: naming::output_file_name(&metadata.name, self.extension),
            mime_type: self.mime_type(),
            bytes: text.into_bytes(),
        })
    }
}
