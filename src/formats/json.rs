//! Plain JSON format support.
//!
//! The canonical model serialized as-is (see [`crate::model`] for the JSON
//! shape). This is also the format used for local persistence, so it must
//! accept files written by older versions.

use super::naming;
use super::{ChecklistFormat, FormatCapability, FormatError, FormatId, InputFile, OutputFile};
use crate::model::{ChecklistFile, GroupCategory};

/// JSON format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl ChecklistFormat for Json {
    fn id(&self) -> FormatId {
        FormatId::Json
    }

    fn name(&self) -> &'static str {
        "JSON"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::FULL
    }

    fn read(&self, file: &InputFile) -> Result<ChecklistFile, FormatError> {
        let mut checklist_file: ChecklistFile = serde_json::from_slice(&file.bytes)
            .map_err(|e| FormatError::json(format!("Parse error: {e}")))?;
        repair_categories(&mut checklist_file);
        tracing::debug!(
            groups = checklist_file.groups.len(),
            checklists = checklist_file.checklist_count(),
            "read JSON checklist file"
        );
        Ok(checklist_file)
    }

    fn write(&self, file: &ChecklistFile) -> Result<OutputFile, FormatError> {
        let metadata = file.require_name()?;
        let bytes = serde_json::to_vec_pretty(file)
            .map_err(|e| FormatError::json(format!("Serialization error: {e}")))?;
        Ok(OutputFile {
            name: naming::output_file_name(&metadata.name, self.extension()),
            mime_type: self.mime_type(),
            bytes,
        })
    }

    fn validate(&self, input: &[u8]) -> Result<(), FormatError> {
        let content = std::str::from_utf8(input)
            .map_err(|e| FormatError::json(format!("Invalid UTF-8: {e}")))?;
        if !content.trim_start().starts_with('{') {
            return Err(FormatError::json("Not a JSON object"));
        }
        Ok(())
    }
}

/// Files saved before every group had a category carry `Unknown`.
fn repair_categories(file: &mut ChecklistFile) {
    for group in &mut file.groups {
        if group.category == GroupCategory::Unknown {
            tracing::trace!(title = %group.title, "defaulting group category to normal");
            group.category = GroupCategory::Normal;
        }
    }
}
