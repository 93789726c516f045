//! ForeFlight checklist format support.
//!
//! A `.fmd` file is AES-128-CBC encrypted JSON, with the 16-byte IV in front
//! of the ciphertext. The key is fixed and public; it obfuscates rather than
//! protects.
//!
//! ## Payload Structure
//!
//! ```json
//! {
//!   "type": "checklist",
//!   "schemaVersion": "1.0",
//!   "payload": {
//!     "objectId": "…",
//!     "metadata": { "name": "N12345", "detail": "…", "tailNumber": "…" },
//!     "groups": [{
//!       "objectId": "…",
//!       "groupType": "normal",
//!       "items": [{
//!         "objectId": "…", "title": "Preflight",
//!         "items": [{
//!           "objectId": "…", "title": "Cabin",
//!           "items": [
//!             { "objectId": "…", "type": "comment", "title": "Cabin" },
//!             { "objectId": "…", "title": "Fuel", "detail": "On", "note": "…" }
//!           ]
//!         }]
//!       }]
//!     }]
//!   }
//! }
//! ```
//!
//! ForeFlight's top-level groups are the three categories (normal, abnormal,
//! emergency); the canonical groups become its subgroups. ForeFlight has
//! only comments and check items, so notes are folded into the item they
//! follow and split out again on read.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde::{Deserialize, Serialize};

use super::naming;
use super::prefixes::TypePrefixes;
use super::{ChecklistFormat, FormatCapability, FormatError, FormatId, InputFile, OutputFile};
use crate::model::{ChecklistFile, ChecklistItem, GroupCategory, ItemType};

const FORMAT: &str = "ForeFlight";

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Container parameters.
pub mod container {
    pub const KEY: &[u8; 16] = b"81e06e41a93f3848";
    pub const IV: &[u8; 16] = &[
        0x5d, 0x2a, 0x91, 0x0c, 0x47, 0xe3, 0x18, 0xb6, 0x7f, 0x04, 0xc9, 0x33, 0x8a, 0x6e, 0xd1,
        0x25,
    ];
    pub const BLOCK_SIZE: usize = 16;
    pub const TYPE: &str = "checklist";
    pub const SCHEMA_VERSION: &str = "1.0";
}

/// Indentation of canonical notes that belong to the preceding item.
pub const NOTE_INDENT: u32 = 1;

const COMMENT: &str = "comment";

/// ForeFlight format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForeFlight;

impl ChecklistFormat for ForeFlight {
    fn id(&self) -> FormatId {
        FormatId::ForeFlight
    }

    fn name(&self) -> &'static str {
        "ForeFlight"
    }

    fn extension(&self) -> &str {
        "fmd"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::LOSSY
    }

    fn read(&self, file: &InputFile) -> Result<ChecklistFile, FormatError> {
        let json = decrypt(&file.bytes)?;
        let document: wire::Document = serde_json::from_slice(&json)
            .map_err(|e| FormatError::json(format!("Parse error: {e}")))?;
        if document.document_type != container::TYPE {
            return Err(FormatError::malformed(
                FORMAT,
                format!(
                    "expected type {:?}, found {:?}",
                    container::TYPE,
                    document.document_type
                ),
            ));
        }
        if document.schema_version != container::SCHEMA_VERSION {
            return Err(FormatError::malformed(
                FORMAT,
                format!(
                    "expected schema version {:?}, found {:?}",
                    container::SCHEMA_VERSION,
                    document.schema_version
                ),
            ));
        }

        let mut checklist_file = reader::from_payload(document.payload)?;
        if checklist_file.name().is_empty() {
            checklist_file.metadata_mut().name =
                naming::strip_extension(&file.name, "fmd").to_string();
        }
        tracing::debug!(
            groups = checklist_file.groups.len(),
            checklists = checklist_file.checklist_count(),
            "read ForeFlight file"
        );
        Ok(checklist_file)
    }

    fn write(&self, file: &ChecklistFile) -> Result<OutputFile, FormatError> {
        let metadata = file.require_name()?;
        let document = wire::Document {
            document_type: container::TYPE.to_string(),
            schema_version: container::SCHEMA_VERSION.to_string(),
            payload: writer::to_payload(file)?,
        };
        let json = serde_json::to_vec(&document)
            .map_err(|e| FormatError::json(format!("Serialization error: {e}")))?;
        let bytes = encrypt(&json)?;
        tracing::debug!(bytes = bytes.len(), "wrote ForeFlight file");
        Ok(OutputFile {
            name: naming::output_file_name(&metadata.name, self.extension()),
            mime_type: self.mime_type(),
            bytes,
        })
    }

    fn validate(&self, input: &[u8]) -> Result<(), FormatError> {
        if input.len() < 2 * container::BLOCK_SIZE || input.len() % container::BLOCK_SIZE != 0 {
            return Err(FormatError::crypto(format!(
                "{} bytes is not an IV followed by whole cipher blocks",
                input.len()
            )));
        }
        Ok(())
    }
}

fn encrypt(plaintext: &[u8]) -> Result<Vec<u8>, FormatError> {
    let cipher = Aes128CbcEnc::new_from_slices(container::KEY, container::IV)
        .map_err(|e| FormatError::crypto(format!("Invalid key or IV: {e}")))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    let mut out = Vec::with_capacity(container::IV.len() + ciphertext.len());
    out.extend_from_slice(container::IV);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn decrypt(input: &[u8]) -> Result<Vec<u8>, FormatError> {
    ForeFlight.validate(input)?;
    let (iv, ciphertext) = input.split_at(container::BLOCK_SIZE);
    let cipher = Aes128CbcDec::new_from_slices(container::KEY, iv)
        .map_err(|e| FormatError::crypto(format!("Invalid key or IV: {e}")))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|e| FormatError::crypto(format!("Decryption failed: {e}")))
}

fn new_object_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn group_type(category: GroupCategory) -> &'static str {
    match category {
        GroupCategory::Abnormal => "abnormal",
        GroupCategory::Emergency => "emergency",
        GroupCategory::Normal | GroupCategory::Unknown => "normal",
    }
}

fn category_for_group_type(value: &str) -> Result<GroupCategory, FormatError> {
    GroupCategory::KNOWN
        .into_iter()
        .find(|c| group_type(*c) == value)
        .ok_or_else(|| FormatError::malformed(FORMAT, format!("unknown group type {value:?}")))
}

// ============================================================================
// WIRE TYPES
// ============================================================================

mod wire {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Document {
        #[serde(rename = "type")]
        pub document_type: String,
        pub schema_version: String,
        pub payload: Payload,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub object_id: String,
        #[serde(default)]
        pub metadata: Metadata,
        #[serde(default)]
        pub groups: Vec<Group>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Metadata {
        pub name: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        pub detail: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        pub tail_number: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Group {
        pub object_id: String,
        pub group_type: String,
        #[serde(default)]
        pub items: Vec<Subgroup>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Subgroup {
        pub object_id: String,
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub items: Vec<Checklist>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Checklist {
        pub object_id: String,
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub items: Vec<Item>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Item {
        pub object_id: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub item_type: Option<String>,
        #[serde(default)]
        pub title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub detail: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
    }
}

// ============================================================================
// WRITER
// ============================================================================

mod writer {
    use super::*;
    use crate::model::ChecklistGroup;

    /// An item and the indented notes that follow it.
    #[derive(Debug, PartialEq, Eq)]
    pub(super) struct Anchored<'a> {
        pub item: &'a ChecklistItem,
        pub notes: Vec<&'a str>,
    }

    fn is_attached_note(item: &ChecklistItem) -> bool {
        item.item_type == ItemType::Note && item.indent == NOTE_INDENT && !item.centered
    }

    /// Attach every indented note to the item before it.
    ///
    /// A note at [`NOTE_INDENT`] with no preceding item stays on its own.
    pub(super) fn attach_notes(items: &[ChecklistItem]) -> Vec<Anchored<'_>> {
        items.iter().fold(Vec::new(), |mut anchored, item| {
            match anchored.last_mut() {
                Some(anchor) if is_attached_note(item) => anchor.notes.push(&item.prompt),
                _ => anchored.push(Anchored {
                    item,
                    notes: Vec::new(),
                }),
            }
            anchored
        })
    }

    pub fn to_payload(file: &ChecklistFile) -> Result<wire::Payload, FormatError> {
        let metadata = file.require_name()?;

        let mut groups = Vec::new();
        for category in GroupCategory::KNOWN {
            let mut subgroups = Vec::new();
            for group in file.groups.iter().filter(|g| in_category(g, category)) {
                subgroups.push(to_subgroup(group)?);
            }
            groups.push(wire::Group {
                object_id: new_object_id(),
                group_type: group_type(category).to_string(),
                items: subgroups,
            });
        }

        Ok(wire::Payload {
            object_id: new_object_id(),
            metadata: wire::Metadata {
                name: metadata.name.clone(),
                detail: metadata.description.clone(),
                tail_number: metadata.aircraft_info.clone(),
            },
            groups,
        })
    }

    fn in_category(group: &ChecklistGroup, category: GroupCategory) -> bool {
        if group.category == GroupCategory::Unknown {
            return category == GroupCategory::Normal;
        }
        group.category == category
    }

    fn to_subgroup(group: &ChecklistGroup) -> Result<wire::Subgroup, FormatError> {
        if group.category == GroupCategory::Unknown {
            tracing::warn!(title = %group.title, "group without category written as normal");
        }
        let mut checklists = Vec::new();
        for checklist in &group.checklists {
            let items = attach_notes(&checklist.items)
                .into_iter()
                .map(to_item)
                .collect::<Result<Vec<_>, _>>()?;
            checklists.push(wire::Checklist {
                object_id: new_object_id(),
                title: checklist.title.clone(),
                items,
            });
        }
        Ok(wire::Subgroup {
            object_id: new_object_id(),
            title: group.title.clone(),
            items: checklists,
        })
    }

    pub(super) fn to_item(anchored: Anchored<'_>) -> Result<wire::Item, FormatError> {
        let Anchored { item, notes } = anchored;
        let notes = if notes.is_empty() {
            None
        } else {
            Some(notes.join("\n"))
        };
        if item.is_centered_or_indented() && !is_attached_note(item) {
            tracing::trace!(prompt = %item.prompt, "dropping indentation");
        }

        let comment = |title: String| wire::Item {
            object_id: new_object_id(),
            item_type: Some(COMMENT.to_string()),
            title,
            detail: notes.clone(),
            note: None,
        };

        let prefixes = TypePrefixes::standard();
        let wire_item = match item.item_type {
            ItemType::Title | ItemType::Plaintext => comment(item.prompt.clone()),
            ItemType::Space => comment(String::new()),
            ItemType::Warning | ItemType::Caution | ItemType::Note => {
                comment(prefixes.apply(item.item_type, &item.prompt))
            }
            ItemType::Challenge | ItemType::ChallengeResponse => wire::Item {
                object_id: new_object_id(),
                item_type: None,
                title: item.prompt.clone(),
                detail: (item.item_type == ItemType::ChallengeResponse)
                    .then(|| item.expectation.clone()),
                note: notes.clone(),
            },
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
    use crate::model::{Checklist, ChecklistFileMetadata, ChecklistGroup};

    pub fn from_payload(payload: wire::Payload) -> Result<ChecklistFile, FormatError> {
        let metadata = ChecklistFileMetadata {
            name: payload.metadata.name,
            description: payload.metadata.detail,
            aircraft_info: payload.metadata.tail_number,
            ..ChecklistFileMetadata::default()
        };

        let mut groups = Vec::new();
        for group in payload.groups {
            let category = category_for_group_type(&group.group_type)?;
            for subgroup in group.items {
                let mut canonical = ChecklistGroup::new(subgroup.title, category);
                for checklist in subgroup.items {
                    let mut items = Vec::new();
                    for item in &checklist.items {
                        items.extend(from_item(item)?);
                    }
                    canonical.checklists.push(Checklist {
                        title: checklist.title,
                        items,
                        ..Checklist::default()
                    });
                }
                groups.push(canonical);
            }
        }

        Ok(ChecklistFile {
            metadata: Some(metadata),
            groups,
        })
    }

    /// A ForeFlight item and the notes split out of it.
    pub(super) fn from_item(item: &wire::Item) -> Result<Vec<ChecklistItem>, FormatError> {
        let (anchor, notes) = match item.item_type.as_deref() {
            Some(COMMENT) => {
                let anchor = if item.title.is_empty() {
                    ChecklistItem::space()
                } else {
                    match TypePrefixes::standard().classify(&item.title) {
                        Some((item_type, rest)) => ChecklistItem::new(item_type, rest),
                        None => ChecklistItem::title(item.title.clone()),
                    }
                };
                (anchor, item.detail.as_deref())
            }
            None => {
                let anchor = match &item.detail {
                    Some(detail) => ChecklistItem::challenge_response(item.title.clone(), detail),
                    None => ChecklistItem::challenge(item.title.clone()),
                };
                (anchor, item.note.as_deref())
            }
            Some(other) => {
                return Err(FormatError::malformed(
                    FORMAT,
                    format!("unknown item type {other:?}"),
                ));
            }
        };

        let mut items = vec![anchor];
        if let Some(notes) = notes {
            items.extend(
                notes
                    .split('\n')
                    .map(|line| ChecklistItem::note(line).indented(NOTE_INDENT)),
            );
        }
        Ok(items)
    }
}
