//! Text dialect options.

use regex::Regex;

use crate::formats::FormatError;
use crate::formats::prefixes::TypePrefixes;

/// Placeholder for the checklist number in prefix templates.
pub const CHECKLIST_NUM: &str = "{{checklistNum}}";
/// Placeholder for the item number in prefix templates.
pub const ITEM_NUM: &str = "{{itemNum}}";

/// Declarative description of a line-oriented checklist dialect.
///
/// Vendor differences are expressed as values of this struct; the engine in
/// [`TextFormat`](super::TextFormat) is the same for every dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFormatOptions {
    /// Template for the first token of a checklist line.
    pub checklist_prefix: String,
    /// Template for the first token of an item line.
    pub item_prefix: String,
    /// Number checklists and items from 0 instead of 1.
    pub zero_based: bool,
    /// Separates the group title from the checklist title.
    pub group_separator: String,
    /// Every checklist starts with a blank item.
    pub blank_line_at_top: bool,
    /// Item type markers.
    pub prefixes: TypePrefixes,
    /// Separates challenge from response.
    pub expectation_separator: String,
    /// Wrap item text longer than this many characters.
    pub max_line_length: Option<usize>,
    /// Starts the text of a wrapped continuation line.
    pub wrap_marker: String,
    /// Force uppercase output.
    pub uppercase: bool,
    /// Lines starting with this are ignored on read.
    pub comment_prefix: String,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Append a checklist carrying the file metadata.
    pub output_metadata: bool,
    /// Title of the metadata checklist.
    pub metadata_title: String,
}

impl TextFormatOptions {
    /// Number of the first checklist and of the first item.
    pub fn first_index(&self) -> usize {
        if self.zero_based { 0 } else { 1 }
    }

    /// Same dialect with a different wrap width.
    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = Some(max);
        self
    }

    pub(crate) fn checklist_template(&self) -> Result<PrefixTemplate, FormatError> {
        PrefixTemplate::new(&self.checklist_prefix)
    }

    pub(crate) fn item_template(&self) -> Result<PrefixTemplate, FormatError> {
        PrefixTemplate::new(&self.item_prefix)
    }
}

/// A line prefix with number placeholders.
#[derive(Debug, Clone)]
pub(crate) struct PrefixTemplate {
    template: String,
    pattern: Regex,
}

impl PrefixTemplate {
    pub fn new(template: &str) -> Result<Self, FormatError> {
        if template.is_empty() || template.contains(' ') {
            return Err(FormatError::unsupported(format!(
                "line prefix template {template:?} must be a single non-empty token"
            )));
        }
        let escaped = regex::escape(template)
            .replace(&regex::escape(CHECKLIST_NUM), r"\d+")
            .replace(&regex::escape(ITEM_NUM), r"\d+");
        let pattern = Regex::new(&format!("^{escaped}$")).map_err(|e| {
            FormatError::unsupported(format!("invalid line prefix template {template:?}: {e}"))
        })?;
        Ok(Self {
            template: template.to_string(),
            pattern,
        })
    }

    /// Whether a whole token matches the template.
    pub fn matches(&self, token: &str) -> bool {
        self.pattern.is_match(token)
    }

    pub fn render(&self, checklist_num: usize, item_num: usize) -> String {
        self.template
            .replace(CHECKLIST_NUM, &checklist_num.to_string())
            .replace(ITEM_NUM, &item_num.to_string())
    }
}
