//! Line-oriented reader shared by every text dialect.

use super::headers;
use super::options::TextFormatOptions;
use crate::formats::{FormatError, naming};
use crate::model::{
    Checklist, ChecklistFile, ChecklistFileMetadata, ChecklistGroup, ChecklistItem, MAX_INDENT,
};

/// A checklist as it appears in the file, before item classification.
#[derive(Debug)]
struct RawChecklist {
    group: String,
    title: String,
    items: Vec<String>,
    /// Prefix token of the last item line; wrapped lines repeat it.
    last_token: Option<String>,
}

pub(super) struct TextReader<'a> {
    format: &'static str,
    options: &'a TextFormatOptions,
}

impl<'a> TextReader<'a> {
    pub fn new(format: &'static str, options: &'a TextFormatOptions) -> Self {
        Self { format, options }
    }

    pub fn read(&self, text: &str, upload_name: &str) -> Result<ChecklistFile, FormatError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut raw = self.split_checklists(text)?;

        let has_metadata = raw.last().is_some_and(|last| {
            last.title
                .trim()
                .eq_ignore_ascii_case(&self.options.metadata_title)
        });
        let mut metadata = if has_metadata {
            raw.pop()
                .map(|last| parse_metadata(&last.items))
                .unwrap_or_default()
        } else {
            ChecklistFileMetadata::default()
        };
        if metadata.name.is_empty() {
            metadata.name = naming::file_stem(upload_name).to_string();
        }
        if metadata.name.is_empty() {
            return Err(FormatError::missing_field("file name"));
        }

        let mut groups: Vec<ChecklistGroup> = Vec::new();
        for raw_checklist in raw {
            let checklist = self.build_checklist(raw_checklist.title, raw_checklist.items);
            match groups.last_mut() {
                Some(group) if group.title == raw_checklist.group => {
                    group.checklists.push(checklist);
                }
                _ => groups.push(ChecklistGroup {
                    title: raw_checklist.group,
                    checklists: vec![checklist],
                    ..ChecklistGroup::default()
                }),
            }
        }

        let file = ChecklistFile {
            metadata: Some(metadata),
            groups,
        };
        tracing::debug!(
            format = self.format,
            groups = file.groups.len(),
            checklists = file.checklist_count(),
            "read text checklist file"
        );
        Ok(file)
    }

    /// First pass: assign every line to a checklist.
    fn split_checklists(&self, text: &str) -> Result<Vec<RawChecklist>, FormatError> {
        let checklist_template = self.options.checklist_template()?;
        let item_template = self.options.item_template()?;
        let marker = self.options.wrap_marker.as_str();
        let mut checklists: Vec<RawChecklist> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            if !self.options.comment_prefix.is_empty()
                && line.starts_with(&self.options.comment_prefix)
            {
                continue;
            }

            let (token, rest) = line.split_once(' ').unwrap_or((line, ""));
            if checklist_template.matches(token) {
                let (group, title) = match rest.split_once(self.options.group_separator.as_str()) {
                    Some((group, title)) if !self.options.group_separator.is_empty() => {
                        (group.to_string(), title.to_string())
                    }
                    _ => (String::new(), rest.to_string()),
                };
                tracing::trace!(line = line_no, %group, %title, "text checklist");
                checklists.push(RawChecklist {
                    group,
                    title,
                    items: Vec::new(),
                    last_token: None,
                });
            } else if item_template.matches(token) {
                let current = checklists.last_mut().ok_or_else(|| {
                    FormatError::malformed(
                        self.format,
                        format!("item on line {line_no} appears before any checklist"),
                    )
                })?;
                let same_item = current.last_token.as_deref() == Some(token);
                match (rest.strip_prefix(marker), current.items.last_mut()) {
                    (Some(continuation), Some(previous)) if same_item && !marker.is_empty() => {
                        previous.push_str(continuation);
                    }
                    _ => current.items.push(rest.to_string()),
                }
                current.last_token = Some(token.to_string());
            } else {
                return Err(FormatError::malformed(
                    self.format,
                    format!("unrecognized line prefix {token:?} on line {line_no}"),
                ));
            }
        }
        Ok(checklists)
    }

    fn build_checklist(&self, title: String, mut items: Vec<String>) -> Checklist {
        if self.options.blank_line_at_top && items.first().is_some_and(|t| t.trim().is_empty()) {
            items.remove(0);
        }
        Checklist {
            title,
            items: items.iter().map(|text| self.classify(text)).collect(),
            ..Checklist::default()
        }
    }

    /// Turn accumulated item text into an item.
    fn classify(&self, text: &str) -> ChecklistItem {
        let body = text.trim_matches(' ');
        if body.is_empty() {
            return ChecklistItem::space();
        }

        let leading = text.len() - text.trim_start_matches(' ').len();
        let trailing = text.len() - text.trim_end_matches(' ').len();

        let mut item = if let Some((item_type, rest)) = self.options.prefixes.classify(body) {
            ChecklistItem::new(item_type, rest)
        } else {
            match body.split_once(self.options.expectation_separator.as_str()) {
                Some((prompt, expectation)) if !self.options.expectation_separator.is_empty() => {
                    ChecklistItem::challenge_response(prompt, expectation)
                }
                _ => ChecklistItem::challenge(body),
            }
        };

        if leading > 0 && leading == trailing {
            item.centered = true;
        } else {
            let width = self.options.indent_width.max(1);
            item.indent = ((leading / width) as u32).min(MAX_INDENT);
        }
        item
    }
}

/// Metadata fields from the items of the metadata checklist.
fn parse_metadata(items: &[String]) -> ChecklistFileMetadata {
    let mut metadata = ChecklistFileMetadata::default();
    for text in items {
        let text = text.trim();
        let Some((header, value)) = headers::split(text) else {
            if !text.is_empty() {
                tracing::debug!(%text, "ignoring unrecognized metadata line");
            }
            continue;
        };
        let value = value.to_string();
        match header {
            headers::NAME => metadata.name = value,
            headers::MAKE_AND_MODEL => metadata.make_and_model = value,
            headers::AIRCRAFT => metadata.aircraft_info = value,
            headers::MANUFACTURER => metadata.manufacturer_info = value,
            headers::COPYRIGHT => metadata.copyright_info = value,
            headers::DESCRIPTION => metadata.description = value,
            _ => {}
        }
    }
    metadata
}
