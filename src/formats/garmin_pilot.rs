//! Garmin Pilot checklist package support.
//!
//! A `.gplt` file is a gzip-compressed tar archive holding a single
//! `content.json`:
//!
//! ```json
//! {
//!   "dataModelVersion": 1,
//!   "packageTypeVersion": 1,
//!   "name": "N12345",
//!   "type": "checklistPackage",
//!   "objects": [{
//!     "binders": [{ "uuid": "…", "name": "N12345", "sortOrder": 0,
//!                   "sourceTemplateUuid": "…", "checklists": ["…"] }],
//!     "checklists": [{ "uuid": "…", "name": "Preflight", "type": 0,
//!                      "subtype": 0, "checklistItems": ["…"] }],
//!     "checklistItems": [{ "uuid": "…", "itemType": 0, "title": "Fuel",
//!                          "action": "Full" }]
//!   }]
//! }
//! ```
//!
//! Items are a flat list referenced by UUID. Garmin Pilot has no free-form
//! groups: every checklist carries a (type, subtype) pair from a fixed table,
//! and the canonical groups are rebuilt from that pair.

use std::io::Read;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::live_data::LiveDataField;
use super::naming;
use super::{ChecklistFormat, FormatCapability, FormatError, FormatId, InputFile, OutputFile};
use crate::model::{ChecklistFile, CompletionAction, GroupCategory};

const FORMAT: &str = "Garmin Pilot";

/// Package constants.
pub mod package {
    pub const CONTENT_ENTRY: &str = "content.json";
    pub const DATA_MODEL_VERSION: i64 = 1;
    pub const PACKAGE_TYPE_VERSION: i64 = 1;
    pub const PACKAGE_TYPE: &str = "checklistPackage";
    pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
}

/// Garmin Pilot item type codes.
pub mod item_types {
    pub const CHECK: i64 = 0;
    pub const NOTE: i64 = 1;
    pub const SUBTITLE: i64 = 2;
    pub const WARNING: i64 = 3;
    pub const CAUTION: i64 = 4;
    pub const TEXT: i64 = 5;
}

// ============================================================================
// CATEGORY TABLE
// ============================================================================

/// One row of the (type, subtype) ↔ (category, group title) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subtype {
    pub category: GroupCategory,
    pub code: i64,
    pub title: &'static str,
}

const fn subtype(category: GroupCategory, code: i64, title: &'static str) -> Subtype {
    Subtype {
        category,
        code,
        title,
    }
}

/// Title of the catch-all subtype present in every category.
pub const OTHER: &str = "Other";

pub const SUBTYPES: &[Subtype] = &[
    subtype(GroupCategory::Normal, 0, "Preflight"),
    subtype(GroupCategory::Normal, 1, "Before Starting"),
    subtype(GroupCategory::Normal, 2, "Starting"),
    subtype(GroupCategory::Normal, 3, "Before Taxi"),
    subtype(GroupCategory::Normal, 4, "Taxi"),
    subtype(GroupCategory::Normal, 5, "Before Takeoff"),
    subtype(GroupCategory::Normal, 6, "Takeoff"),
    subtype(GroupCategory::Normal, 7, "Climb"),
    subtype(GroupCategory::Normal, 8, "Cruise"),
    subtype(GroupCategory::Normal, 9, "Descent"),
    subtype(GroupCategory::Normal, 10, "Before Landing"),
    subtype(GroupCategory::Normal, 11, "Landing"),
    subtype(GroupCategory::Normal, 12, "After Landing"),
    subtype(GroupCategory::Normal, 13, "Shutdown"),
    subtype(GroupCategory::Normal, 14, OTHER),
    subtype(GroupCategory::Abnormal, 0, "Engine"),
    subtype(GroupCategory::Abnormal, 1, "Fuel"),
    subtype(GroupCategory::Abnormal, 2, "Electrical"),
    subtype(GroupCategory::Abnormal, 3, "Avionics"),
    subtype(GroupCategory::Abnormal, 4, OTHER),
    subtype(GroupCategory::Emergency, 0, "Engine Failure"),
    subtype(GroupCategory::Emergency, 1, "Fire"),
    subtype(GroupCategory::Emergency, 2, "Electrical"),
    subtype(GroupCategory::Emergency, 3, "Landing"),
    subtype(GroupCategory::Emergency, 4, OTHER),
];

fn type_code(category: GroupCategory) -> Option<i64> {
    match category {
        GroupCategory::Normal => Some(0),
        GroupCategory::Abnormal => Some(1),
        GroupCategory::Emergency => Some(2),
        GroupCategory::Unknown => None,
    }
}

fn category_for_type(code: i64) -> Option<GroupCategory> {
    GroupCategory::KNOWN
        .into_iter()
        .find(|c| type_code(*c) == Some(code))
}

fn other_subtype(category: GroupCategory) -> Option<&'static Subtype> {
    SUBTYPES
        .iter()
        .find(|s| s.category == category && s.title == OTHER)
}

impl Subtype {
    /// The subtype for a canonical group, falling back to the category's
    /// `Other` subtype for titles outside the table.
    pub fn for_group(category: GroupCategory, title: &str) -> Option<&'static Subtype> {
        SUBTYPES
            .iter()
            .find(|s| s.category == category && s.title.eq_ignore_ascii_case(title.trim()))
            .or_else(|| {
                tracing::warn!(%title, ?category, "group title has no Garmin Pilot subtype");
                other_subtype(category)
            })
    }

    /// The subtype for a (type, subtype) pair, falling back to the category's
    /// default for unknown subtype codes.
    pub fn from_codes(category: GroupCategory, code: i64) -> Option<&'static Subtype> {
        SUBTYPES
            .iter()
            .find(|s| s.category == category && s.code == code)
            .or_else(|| {
                tracing::debug!(?category, code, "unknown subtype code");
                other_subtype(category)
            })
    }
}

// ============================================================================
// COMPLETION ACTIONS
// ============================================================================

/// Garmin Pilot has no completion action field. The action travels as a
/// trailing note with one of these exact titles.
pub const COMPLETION_ACTION_NOTES: &[(CompletionAction, &str)] = &[
    (
        CompletionAction::GoToNextChecklist,
        "Completion action: go to next checklist",
    ),
    (
        CompletionAction::ReturnToChecklistList,
        "Completion action: return to checklist list",
    ),
    (CompletionAction::OpenMap, "Completion action: open map"),
    (
        CompletionAction::OpenFlightPlan,
        "Completion action: open flight plan",
    ),
    (
        CompletionAction::OpenWeather,
        "Completion action: open weather",
    ),
    (
        CompletionAction::OpenCharts,
        "Completion action: open charts",
    ),
];

fn completion_note(action: CompletionAction) -> Option<&'static str> {
    COMPLETION_ACTION_NOTES
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, note)| *note)
}

fn completion_action_for_note(title: &str) -> Option<CompletionAction> {
    COMPLETION_ACTION_NOTES
        .iter()
        .find(|(_, note)| *note == title)
        .map(|(action, _)| *action)
}

// ============================================================================
// BINDER EXTRAS
// ============================================================================

/// Binder fields with no canonical counterpart.
///
/// They are stored as JSON in the metadata's `copyright_info` so that a
/// package read and written again keeps its place in Garmin Pilot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinderExtras {
    pub sort_order: i64,
    pub source_template_uuid: String,
}

impl BinderExtras {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn from_copyright_info(copyright_info: &str) -> Self {
        if copyright_info.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(copyright_info).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "copyright info does not hold binder extras");
            Self::default()
        })
    }

    pub fn to_copyright_info(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ============================================================================
// FORMAT
// ============================================================================

/// Garmin Pilot format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct GarminPilot;

impl ChecklistFormat for GarminPilot {
    fn id(&self) -> FormatId {
        FormatId::GarminPilot
    }

    fn name(&self) -> &'static str {
        "Garmin Pilot"
    }

    fn extension(&self) -> &str {
        "gplt"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::LOSSY
    }

    fn read(&self, file: &InputFile) -> Result<ChecklistFile, FormatError> {
        self.validate(&file.bytes)?;
        let content = unpack(&file.bytes)?;
        let package: wire::Package = serde_json::from_slice(&content)
            .map_err(|e| FormatError::json(format!("Parse error: {e}")))?;
        let mut checklist_file = reader::from_package(package)?;
        if checklist_file.name().is_empty() {
            checklist_file.metadata_mut().name =
                naming::strip_extension(&file.name, "gplt").to_string();
        }
        tracing::debug!(
            groups = checklist_file.groups.len(),
            checklists = checklist_file.checklist_count(),
            "read Garmin Pilot package"
        );
        Ok(checklist_file)
    }

    fn write(&self, file: &ChecklistFile) -> Result<OutputFile, FormatError> {
        let metadata = file.require_name()?;
        let package = writer::to_package(file)?;
        let content = serde_json::to_vec(&package)
            .map_err(|e| FormatError::json(format!("Serialization error: {e}")))?;
        let bytes = pack(&content)?;
        tracing::debug!(bytes = bytes.len(), "wrote Garmin Pilot package");
        Ok(OutputFile {
            name: naming::output_file_name(&metadata.name, self.extension()),
            mime_type: self.mime_type(),
            bytes,
        })
    }

    fn validate(&self, input: &[u8]) -> Result<(), FormatError> {
        if !input.starts_with(&package::GZIP_MAGIC) {
            return Err(FormatError::archive("Not a gzip archive"));
        }
        Ok(())
    }
}

/// Failures here come from the in-memory writer, not from the content.
fn pack(content: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, package::CONTENT_ENTRY, content)?;
    Ok(builder.into_inner()?.finish()?)
}

fn unpack(input: &[u8]) -> Result<Vec<u8>, FormatError> {
    let archive_error = |e: std::io::Error| FormatError::archive(format!("Read error: {e}"));

    let mut archive = tar::Archive::new(GzDecoder::new(input));
    let mut content = None;
    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path().map_err(archive_error)?.into_owned();
        if path.file_name().and_then(|n| n.to_str()) != Some(package::CONTENT_ENTRY) {
            return Err(FormatError::archive(format!(
                "unexpected entry {}",
                path.display()
            )));
        }
        if content.is_some() {
            return Err(FormatError::archive(format!(
                "more than one {} entry",
                package::CONTENT_ENTRY
            )));
        }
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(archive_error)?;
        content = Some(bytes);
    }
    content.ok_or_else(|| FormatError::missing_entry(package::CONTENT_ENTRY))
}

fn new_uuid() -> String {
    uuid::Uuid::new_v4().hyphenated().to_string().to_uppercase()
}

// ============================================================================
// WIRE TYPES
// ============================================================================

mod wire {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Package {
        pub data_model_version: i64,
        pub package_type_version: i64,
        #[serde(default)]
        pub name: String,
        #[serde(rename = "type")]
        pub package_type: String,
        #[serde(default)]
        pub objects: Vec<Objects>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Objects {
        pub binders: Vec<Binder>,
        pub checklists: Vec<Checklist>,
        pub checklist_items: Vec<Item>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Binder {
        pub uuid: String,
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub sort_order: i64,
        #[serde(default)]
        pub source_template_uuid: String,
        #[serde(default)]
        pub checklists: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Checklist {
        pub uuid: String,
        #[serde(default)]
        pub name: String,
        #[serde(rename = "type")]
        pub checklist_type: i64,
        #[serde(default)]
        pub subtype: i64,
        #[serde(default)]
        pub checklist_items: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Item {
        pub uuid: String,
        pub item_type: i64,
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub live_data_type: Option<i64>,
    }

    impl Item {
        pub fn new(item_type: i64, title: impl Into<String>) -> Self {
            Self {
                uuid: new_uuid(),
                item_type,
                title: title.into(),
                action: String::new(),
                live_data_type: None,
            }
        }
    }
}

// ============================================================================
// WRITER
// ============================================================================

mod writer {
    use super::*;
    use crate::model::{Checklist, ChecklistItem, ItemType};

    pub fn to_package(file: &ChecklistFile) -> Result<wire::Package, FormatError> {
        let metadata = file.require_name()?;
        let mut objects = wire::Objects::default();

        for group in &file.groups {
            let Some(checklist_type) = type_code(group.category) else {
                return Err(FormatError::unsupported(format!(
                    "group {:?} has no category",
                    group.title
                )));
            };
            let subtype = Subtype::for_group(group.category, &group.title).ok_or_else(|| {
                FormatError::unsupported(format!("no subtype for group {:?}", group.title))
            })?;

            for checklist in &group.checklists {
                let items = to_items(checklist)?;
                objects.checklists.push(wire::Checklist {
                    uuid: new_uuid(),
                    name: checklist.title.clone(),
                    checklist_type,
                    subtype: subtype.code,
                    checklist_items: items.iter().map(|item| item.uuid.clone()).collect(),
                });
                objects.checklist_items.extend(items);
            }
        }

        let extras = BinderExtras::from_copyright_info(&metadata.copyright_info);
        objects.binders.push(wire::Binder {
            uuid: new_uuid(),
            name: metadata.name.clone(),
            sort_order: extras.sort_order,
            source_template_uuid: extras.source_template_uuid,
            checklists: objects.checklists.iter().map(|c| c.uuid.clone()).collect(),
        });

        Ok(wire::Package {
            data_model_version: package::DATA_MODEL_VERSION,
            package_type_version: package::PACKAGE_TYPE_VERSION,
            name: metadata.name.clone(),
            package_type: package::PACKAGE_TYPE.to_string(),
            objects: vec![objects],
        })
    }

    /// Garmin items for one checklist, notes merged, completion note last.
    pub(super) fn to_items(checklist: &Checklist) -> Result<Vec<wire::Item>, FormatError> {
        let mut items =
            checklist
                .items
                .iter()
                .try_fold(Vec::<wire::Item>::new(), |mut items, item| {
                    match items.last_mut() {
                        Some(previous)
                            if item.item_type == ItemType::Note
                                && previous.item_type == item_types::NOTE =>
                        {
                            previous.title.push('\n');
                            previous.title.push_str(&item.prompt);
                        }
                        _ => items.push(to_item(item)?),
                    }
                    Ok::<_, FormatError>(items)
                })?;

        if let Some(note) = completion_note(checklist.completion_action) {
            items.push(wire::Item::new(item_types::NOTE, note));
        }
        Ok(items)
    }

    fn to_item(item: &ChecklistItem) -> Result<wire::Item, FormatError> {
        if item.is_centered_or_indented() {
            tracing::trace!(prompt = %item.prompt, "dropping indentation");
        }
        let wire_item = match item.item_type {
            ItemType::Challenge => wire::Item::new(item_types::CHECK, item.prompt.clone()),
            ItemType::ChallengeResponse => {
                let mut check = wire::Item::new(item_types::CHECK, item.prompt.clone());
                match LiveDataField::from_token(&item.expectation) {
                    Some(field) => check.live_data_type = Some(field.garmin_type),
                    None => check.action = item.expectation.clone(),
                }
                check
            }
            ItemType::Note => wire::Item::new(item_types::NOTE, item.prompt.clone()),
            ItemType::Title => wire::Item::new(item_types::SUBTITLE, item.prompt.clone()),
            ItemType::Warning => wire::Item::new(item_types::WARNING, item.prompt.clone()),
            ItemType::Caution => wire::Item::new(item_types::CAUTION, item.prompt.clone()),
            ItemType::Plaintext => wire::Item::new(item_types::TEXT, item.prompt.clone()),
            ItemType::Space => wire::Item::new(item_types::TEXT, ""),
            ItemType::Unknown => {
                return Err(FormatError::unsupported(format!(
                    "item {:?} has no type",
                    item.prompt
                )));
            }
        };
        Ok(wire_item)
    }
}

// ============================================================================
// READER
// ============================================================================

mod reader {
    use super::*;
    use crate::model::{Checklist, ChecklistFileMetadata, ChecklistGroup, ChecklistItem};
    use std::collections::HashMap;

    pub fn from_package(package: wire::Package) -> Result<ChecklistFile, FormatError> {
        if package.package_type != package::PACKAGE_TYPE {
            return Err(FormatError::malformed(
                FORMAT,
                format!("unexpected package type {:?}", package.package_type),
            ));
        }
        if package.data_model_version != package::DATA_MODEL_VERSION {
            return Err(FormatError::malformed(
                FORMAT,
                format!(
                    "unsupported data model version {}",
                    package.data_model_version
                ),
            ));
        }
        let objects = package
            .objects
            .into_iter()
            .next()
            .ok_or_else(|| FormatError::missing_field("objects"))?;

        // One Garmin item may become several canonical items.
        let mut items_by_uuid: HashMap<String, wire::Item> = HashMap::new();
        for item in objects.checklist_items {
            items_by_uuid.insert(item.uuid.clone(), item);
        }
        let checklists_by_uuid: HashMap<&str, &wire::Checklist> = objects
            .checklists
            .iter()
            .map(|c| (c.uuid.as_str(), c))
            .collect();

        let ordered: Vec<&wire::Checklist> = if objects.binders.is_empty() {
            objects.checklists.iter().collect()
        } else {
            let mut ordered = Vec::new();
            for uuid in objects.binders.iter().flat_map(|b| &b.checklists) {
                let checklist = checklists_by_uuid.get(uuid.as_str()).ok_or_else(|| {
                    FormatError::malformed(
                        FORMAT,
                        format!("binder references unknown checklist {uuid}"),
                    )
                })?;
                ordered.push(*checklist);
            }
            ordered
        };

        let mut groups: IndexMap<(GroupCategory, &'static str), ChecklistGroup> = IndexMap::new();
        for checklist in ordered {
            let category = category_for_type(checklist.checklist_type).ok_or_else(|| {
                FormatError::malformed(
                    FORMAT,
                    format!(
                        "checklist {:?} has unknown type {}",
                        checklist.name, checklist.checklist_type
                    ),
                )
            })?;
            let subtype = Subtype::from_codes(category, checklist.subtype).ok_or_else(|| {
                FormatError::malformed(FORMAT, format!("no subtypes for {category:?}"))
            })?;

            let mut garmin_items = Vec::new();
            for uuid in &checklist.checklist_items {
                let item = items_by_uuid.get(uuid).ok_or_else(|| {
                    FormatError::malformed(
                        FORMAT,
                        format!("checklist {:?} references unknown item {uuid}", checklist.name),
                    )
                })?;
                garmin_items.push(item);
            }
            let canonical = to_checklist(&checklist.name, &garmin_items)?;

            groups
                .entry((category, subtype.title))
                .or_insert_with(|| ChecklistGroup::new(subtype.title, category))
                .checklists
                .push(canonical);
        }

        let mut metadata = ChecklistFileMetadata::new(package.name);
        if let Some(binder) = objects.binders.first() {
            if metadata.name.is_empty() {
                metadata.name = binder.name.clone();
            }
            metadata.copyright_info = BinderExtras {
                sort_order: binder.sort_order,
                source_template_uuid: binder.source_template_uuid.clone(),
            }
            .to_copyright_info();
        }

        Ok(ChecklistFile {
            metadata: Some(metadata),
            groups: groups.into_values().collect(),
        })
    }

    pub(super) fn to_checklist(
        title: &str,
        garmin_items: &[&wire::Item],
    ) -> Result<Checklist, FormatError> {
        let (completion_action, garmin_items) = match garmin_items.split_last() {
            Some((last, rest)) if last.item_type == item_types::NOTE => {
                match completion_action_for_note(&last.title) {
                    Some(action) => (action, rest),
                    None => (CompletionAction::DoNothing, garmin_items),
                }
            }
            _ => (CompletionAction::DoNothing, garmin_items),
        };

        let mut items = Vec::new();
        for item in garmin_items {
            items.extend(to_items(item)?);
        }
        Ok(Checklist {
            title: title.to_string(),
            items,
            completion_action,
        })
    }

    pub(super) fn to_items(item: &wire::Item) -> Result<Vec<ChecklistItem>, FormatError> {
        let canonical = match item.item_type {
            item_types::CHECK => match item.live_data_type {
                Some(code) => match LiveDataField::from_garmin_type(code) {
                    Some(field) => ChecklistItem::challenge_response(&item.title, field.token()),
                    None => {
                        tracing::warn!(code, title = %item.title, "unknown live data type");
                        check_item(item)
                    }
                },
                None => check_item(item),
            },
            item_types::NOTE => {
                return Ok(item.title.split('\n').map(ChecklistItem::note).collect());
            }
            item_types::SUBTITLE => ChecklistItem::title(&item.title),
            item_types::WARNING => ChecklistItem::warning(&item.title),
            item_types::CAUTION => ChecklistItem::caution(&item.title),
            item_types::TEXT if item.title.is_empty() => ChecklistItem::space(),
            item_types::TEXT => ChecklistItem::plaintext(&item.title),
            other => {
                return Err(FormatError::malformed(
                    FORMAT,
                    format!("item {:?} has unknown item type {other}", item.title),
                ));
            }
        };
        Ok(vec![canonical])
    }

    fn check_item(item: &wire::Item) -> ChecklistItem {
        if item.action.is_empty() {
            ChecklistItem::challenge(&item.title)
        } else {
            ChecklistItem::challenge_response(&item.title, &item.action)
        }
    }
}
