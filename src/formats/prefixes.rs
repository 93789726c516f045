//! Textual markers for item types.
//!
//! Formats without a native notion of warnings, cautions or notes encode the
//! item type as a prefix of the item text (`WARNING: Fire`). The same table is
//! used in both directions so that a written prefix is recognised on read.

use crate::model::ItemType;

/// Prefix strings for the item types that are marked up in text.
///
/// An empty prefix means the type is never marked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePrefixes {
    pub note: String,
    pub title: String,
    pub warning: String,
    pub caution: String,
}

impl Default for TypePrefixes {
    fn default() -> Self {
        Self::standard()
    }
}

impl TypePrefixes {
    /// `NOTE: `, `WARNING: ` and `CAUTION: `, with titles left unmarked.
    pub fn standard() -> Self {
        Self {
            note: "NOTE: ".to_string(),
            title: String::new(),
            warning: "WARNING: ".to_string(),
            caution: "CAUTION: ".to_string(),
        }
    }

    /// Standard prefixes plus a marker for titles.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::standard()
        }
    }

    /// The prefix written in front of an item of the given type.
    pub fn prefix(&self, item_type: ItemType) -> &str {
        match item_type {
            ItemType::Note => &self.note,
            ItemType::Title => &self.title,
            ItemType::Warning => &self.warning,
            ItemType::Caution => &self.caution,
            _ => "",
        }
    }

    /// Prepend the type prefix to `text`.
    pub fn apply(&self, item_type: ItemType, text: &str) -> String {
        format!("{}{}", self.prefix(item_type), text)
    }

    /// Recognise a type prefix.
    ///
    /// Prefixes are tried in a fixed order: note, title, warning, caution.
    /// Returns the matched type and the text after the prefix.
    pub fn classify<'a>(&self, text: &'a str) -> Option<(ItemType, &'a str)> {
        [
            (ItemType::Note, &self.note),
            (ItemType::Title, &self.title),
            (ItemType::Warning, &self.warning),
            (ItemType::Caution, &self.caution),
        ]
        .into_iter()
        .filter(|(_, prefix)| !prefix.is_empty())
        .find_map(|(item_type, prefix)| {
            text.strip_prefix(prefix.as_str())
                .map(|rest| (item_type, rest))
        })
    }
}
