//! Canonical checklist model.
//!
//! Every format reads into and writes from these types. The model is a plain
//! ownership tree rooted at [`ChecklistFile`]:
//!
//! ```text
//! ChecklistFile
//! ├── metadata: Option<ChecklistFileMetadata>
//! └── groups: Vec<ChecklistGroup>
//!     └── checklists: Vec<Checklist>
//!         └── items: Vec<ChecklistItem>
//! ```
//!
//! The JSON shape produced by `serde` matches the protobuf JSON mapping used
//! by existing `.json` exports: camelCase field names, upper-case enum names,
//! and default values omitted.

use serde::{Deserialize, Serialize};

use crate::formats::FormatError;

// ============================================================================
// FILE
// ============================================================================

/// A complete checklist file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChecklistFileMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ChecklistGroup>,
}

impl ChecklistFile {
    /// Create an empty file carrying only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: Some(ChecklistFileMetadata::new(name)),
            groups: Vec::new(),
        }
    }

    /// Add a group (builder style).
    pub fn with_group(mut self, group: ChecklistGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// The file name, or `""` when there is no metadata.
    pub fn name(&self) -> &str {
        self.metadata.as_ref().map(|m| m.name.as_str()).unwrap_or("")
    }

    /// Metadata of a file that is about to be written.
    ///
    /// Fails when the metadata or its name is missing; writers call this
    /// before producing any output.
    pub fn require_name(&self) -> Result<&ChecklistFileMetadata, FormatError> {
        match &self.metadata {
            Some(metadata) if !metadata.name.is_empty() => Ok(metadata),
            _ => Err(FormatError::Validation(
                "checklist file has no name".to_string(),
            )),
        }
    }

    /// Metadata, created on demand.
    pub fn metadata_mut(&mut self) -> &mut ChecklistFileMetadata {
        self.metadata.get_or_insert_with(ChecklistFileMetadata::default)
    }

    /// Total number of checklists across all groups.
    pub fn checklist_count(&self) -> usize {
        self.groups.iter().map(|g| g.checklists.len()).sum()
    }

    /// Total number of items across all checklists.
    pub fn item_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.checklists)
            .map(|c| c.items.len())
            .sum()
    }
}

/// File-level metadata.
///
/// `default_group_index` and `default_checklist_index` point into the group
/// and checklist sequences; they are not bounds-checked here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistFileMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub default_group_index: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub default_checklist_index: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub make_and_model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub aircraft_info: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub manufacturer_info: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub copyright_info: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<i64>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl ChecklistFileMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// ============================================================================
// GROUPS AND CHECKLISTS
// ============================================================================

/// Category of a checklist group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupCategory {
    #[default]
    #[serde(rename = "CATEGORY_UNKNOWN")]
    Unknown,
    #[serde(rename = "CATEGORY_NORMAL")]
    Normal,
    #[serde(rename = "CATEGORY_ABNORMAL")]
    Abnormal,
    #[serde(rename = "CATEGORY_EMERGENCY")]
    Emergency,
}

impl GroupCategory {
    /// The categories a file can be sorted into, in display order.
    pub const KNOWN: [GroupCategory; 3] = [Self::Normal, Self::Abnormal, Self::Emergency];

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// A named group of checklists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistGroup {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "GroupCategory::is_unknown")]
    pub category: GroupCategory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checklists: Vec<Checklist>,
}

impl ChecklistGroup {
    pub fn new(title: impl Into<String>, category: GroupCategory) -> Self {
        Self {
            title: title.into(),
            category,
            checklists: Vec::new(),
        }
    }

    pub fn with_checklist(mut self, checklist: Checklist) -> Self {
        self.checklists.push(checklist);
        self
    }
}

/// What the displaying application does once a checklist is completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionAction {
    #[default]
    #[serde(rename = "ACTION_DO_NOTHING")]
    DoNothing,
    #[serde(rename = "ACTION_GO_TO_NEXT_CHECKLIST")]
    GoToNextChecklist,
    #[serde(rename = "ACTION_RETURN_TO_CHECKLIST_LIST")]
    ReturnToChecklistList,
    #[serde(rename = "ACTION_OPEN_MAP")]
    OpenMap,
    #[serde(rename = "ACTION_OPEN_FLIGHT_PLAN")]
    OpenFlightPlan,
    #[serde(rename = "ACTION_OPEN_WEATHER")]
    OpenWeather,
    #[serde(rename = "ACTION_OPEN_CHARTS")]
    OpenCharts,
}

impl CompletionAction {
    pub fn is_do_nothing(&self) -> bool {
        matches!(self, Self::DoNothing)
    }
}

/// A single checklist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checklist {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ChecklistItem>,
    #[serde(skip_serializing_if = "CompletionAction::is_do_nothing")]
    pub completion_action: CompletionAction,
}

impl Checklist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_item(mut self, item: ChecklistItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = ChecklistItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn with_completion_action(mut self, action: CompletionAction) -> Self {
        self.completion_action = action;
        self
    }
}

// ============================================================================
// ITEMS
// ============================================================================

/// Kind of a checklist item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[default]
    #[serde(rename = "ITEM_UNKNOWN")]
    Unknown,
    #[serde(rename = "ITEM_TITLE")]
    Title,
    #[serde(rename = "ITEM_WARNING")]
    Warning,
    #[serde(rename = "ITEM_CAUTION")]
    Caution,
    #[serde(rename = "ITEM_NOTE")]
    Note,
    #[serde(rename = "ITEM_PLAINTEXT")]
    Plaintext,
    #[serde(rename = "ITEM_CHALLENGE")]
    Challenge,
    #[serde(rename = "ITEM_CHALLENGE_RESPONSE")]
    ChallengeResponse,
    #[serde(rename = "ITEM_SPACE")]
    Space,
}

impl ItemType {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Maximum indentation level an item can carry.
pub const MAX_INDENT: u32 = 4;

/// A single line of a checklist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    #[serde(rename = "type", skip_serializing_if = "ItemType::is_unknown")]
    pub item_type: ItemType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    /// Only meaningful for [`ItemType::ChallengeResponse`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expectation: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub indent: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub centered: bool,
}

impl ChecklistItem {
    pub fn new(item_type: ItemType, prompt: impl Into<String>) -> Self {
        Self {
            item_type,
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn challenge(prompt: impl Into<String>) -> Self {
        Self::new(ItemType::Challenge, prompt)
    }

    pub fn challenge_response(prompt: impl Into<String>, expectation: impl Into<String>) -> Self {
        Self {
            expectation: expectation.into(),
            ..Self::new(ItemType::ChallengeResponse, prompt)
        }
    }

    pub fn title(prompt: impl Into<String>) -> Self {
        Self::new(ItemType::Title, prompt)
    }

    pub fn note(prompt: impl Into<String>) -> Self {
        Self::new(ItemType::Note, prompt)
    }

    pub fn warning(prompt: impl Into<String>) -> Self {
        Self::new(ItemType::Warning, prompt)
    }

    pub fn caution(prompt: impl Into<String>) -> Self {
        Self::new(ItemType::Caution, prompt)
    }

    pub fn plaintext(prompt: impl Into<String>) -> Self {
        Self::new(ItemType::Plaintext, prompt)
    }

    pub fn space() -> Self {
        Self::new(ItemType::Space, "")
    }

    /// Set the indentation level, clearing centering.
    pub fn indented(mut self, indent: u32) -> Self {
        self.indent = indent;
        self.centered = false;
        self
    }

    /// Center the item, clearing indentation.
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self.indent = 0;
        self
    }

    /// Indentation as written by formats: centering wins over indent.
    pub fn effective_indent(&self) -> u32 {
        if self.centered { 0 } else { self.indent }
    }

    /// Whether the item carries any layout beyond a flush-left line.
    pub fn is_centered_or_indented(&self) -> bool {
        self.centered || self.indent > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name_rejects_missing_metadata() {
        let file = ChecklistFile::default();
        assert!(matches!(
            file.require_name(),
            Err(FormatError::Validation(_))
        ));

        let file = ChecklistFile::new("");
        assert!(file.require_name().is_err());

        let file = ChecklistFile::new("N12345");
        assert_eq!(file.require_name().unwrap().name, "N12345");
    }

    #[test]
    fn test_centered_clears_indent() {
        let item = ChecklistItem::challenge("Fuel").indented(3).centered();
        assert!(item.centered);
        assert_eq!(item.indent, 0);

        let item = ChecklistItem::challenge("Fuel").centered().indented(2);
        assert!(!item.centered);
        assert_eq!(item.effective_indent(), 2);
    }

    #[test]
    fn test_is_centered_or_indented() {
        assert!(!ChecklistItem::challenge("Fuel").is_centered_or_indented());
        assert!(ChecklistItem::challenge("Fuel").indented(1).is_centered_or_indented());
        assert!(ChecklistItem::challenge("Fuel").centered().is_centered_or_indented());
        assert!(!ChecklistItem::space().indented(0).is_centered_or_indented());
    }

    #[test]
    fn test_json_omits_defaults() {
        let file = ChecklistFile::new("Test").with_group(
            ChecklistGroup::new("Normal", GroupCategory::Normal).with_checklist(
                Checklist::new("Preflight").with_item(ChecklistItem::challenge("Fuel")),
            ),
        );
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "metadata": { "name": "Test" },
                "groups": [{
                    "title": "Normal",
                    "category": "CATEGORY_NORMAL",
                    "checklists": [{
                        "title": "Preflight",
                        "items": [{ "type": "ITEM_CHALLENGE", "prompt": "Fuel" }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_counts() {
        let file = ChecklistFile::new("Test")
            .with_group(
                ChecklistGroup::new("A", GroupCategory::Normal)
                    .with_checklist(Checklist::new("1").with_item(ChecklistItem::space()))
                    .with_checklist(Checklist::new("2")),
            )
            .with_group(ChecklistGroup::new("B", GroupCategory::Emergency).with_checklist(
                Checklist::new("3").with_items([
                    ChecklistItem::warning("Fire"),
                    ChecklistItem::caution("Smoke"),
                ]),
            ));
        assert_eq!(file.checklist_count(), 3);
        assert_eq!(file.item_count(), 3);
    }
}
