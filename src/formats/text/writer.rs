//! Writer shared by every text dialect.

use chrono::NaiveDate;

use super::headers;
use super::options::{PrefixTemplate, TextFormatOptions};
use crate::formats::FormatError;
use crate::model::{ChecklistFile, ChecklistFileMetadata, ChecklistItem, ItemType};

/// Padding on each side of a centered item when it cannot be centered
/// within the maximum line length.
const FALLBACK_CENTER_PAD: usize = 7;

const LINE_ENDING: &str = "\r\n";

pub(super) struct TextWriter<'a> {
    format: &'static str,
    options: &'a TextFormatOptions,
    date: NaiveDate,
}

impl<'a> TextWriter<'a> {
    pub fn new(format: &'static str, options: &'a TextFormatOptions, date: NaiveDate) -> Self {
        Self {
            format,
            options,
            date,
        }
    }

    pub fn write(&self, file: &ChecklistFile) -> Result<String, FormatError> {
        let metadata = file.require_name()?;
        let templates = (
            self.options.checklist_template()?,
            self.options.item_template()?,
        );

        let mut lines = Vec::new();
        let mut checklist_num = self.options.first_index();
        for group in &file.groups {
            for checklist in &group.checklists {
                let title = if group.title.is_empty() {
                    checklist.title.clone()
                } else {
                    format!(
                        "{}{}{}",
                        group.title, self.options.group_separator, checklist.title
                    )
                };
                let texts: Vec<String> =
                    checklist.items.iter().map(|item| self.item_text(item)).collect();
                self.emit_checklist(&mut lines, &templates, checklist_num, &title, &texts);
                checklist_num += 1;
            }
        }

        if self.options.output_metadata {
            let texts = self.metadata_texts(metadata);
            let title = self.options.metadata_title.clone();
            self.emit_checklist(&mut lines, &templates, checklist_num, &title, &texts);
        }

        let mut out = lines.join(LINE_ENDING);
        out.push_str(LINE_ENDING);
        tracing::debug!(
            format = self.format,
            lines = lines.len(),
            "wrote text checklist file"
        );
        Ok(out)
    }

    fn emit_checklist(
        &self,
        lines: &mut Vec<String>,
        (checklist_template, item_template): &(PrefixTemplate, PrefixTemplate),
        checklist_num: usize,
        title: &str,
        texts: &[String],
    ) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        let first = self.options.first_index();
        lines.push(join_token(
            &checklist_template.render(checklist_num, first),
            &self.normalize(title),
        ));

        let mut item_num = first;
        if self.options.blank_line_at_top {
            lines.push(item_template.render(checklist_num, item_num));
            item_num += 1;
        }
        for text in texts {
            let prefix = item_template.render(checklist_num, item_num);
            for chunk in self.wrap(text) {
                lines.push(join_token(&prefix, &chunk));
            }
            item_num += 1;
        }
    }

    /// Full item text: indentation or centering, type marker, content.
    fn item_text(&self, item: &ChecklistItem) -> String {
        let body = match item.item_type {
            ItemType::Space => return String::new(),
            ItemType::ChallengeResponse if !item.expectation.is_empty() => format!(
                "{}{}{}",
                item.prompt, self.options.expectation_separator, item.expectation
            ),
            item_type => self.options.prefixes.apply(item_type, &item.prompt),
        };
        let body = self.normalize(&body);

        if item.centered {
            self.center(body)
        } else {
            // Trailing spaces would read back as centering.
            let indent = " ".repeat(self.options.indent_width * item.indent as usize);
            format!("{indent}{}", body.trim_end_matches(' '))
        }
    }

    fn metadata_texts(&self, metadata: &ChecklistFileMetadata) -> Vec<String> {
        let mut texts = vec![format!("{} {}", headers::NAME, metadata.name)];
        for (header, value) in [
            (headers::MAKE_AND_MODEL, &metadata.make_and_model),
            (headers::AIRCRAFT, &metadata.aircraft_info),
            (headers::MANUFACTURER, &metadata.manufacturer_info),
            (headers::COPYRIGHT, &metadata.copyright_info),
            (headers::DESCRIPTION, &metadata.description),
        ] {
            if !value.is_empty() {
                texts.push(format!("{header} {value}"));
            }
        }
        texts.push(format!(
            "{} {}",
            headers::LAST_UPDATED,
            self.date.format("%Y-%m-%d")
        ));
        texts.iter().map(|text| self.normalize(text)).collect()
    }

    /// Single line, uppercased when the dialect asks for it.
    fn normalize(&self, text: &str) -> String {
        let text = text.replace(['\r', '\n'], " ");
        if self.options.uppercase {
            text.to_uppercase()
        } else {
            text
        }
    }

    fn center(&self, body: String) -> String {
        let len = body.chars().count();
        let pad = match self.options.max_line_length {
            Some(max) if len + 2 <= max => (max - len) / 2,
            _ => FALLBACK_CENTER_PAD,
        };
        let padding = " ".repeat(pad);
        format!("{padding}{body}{padding}")
    }

    /// Greedy word wrap; continuation chunks carry the wrap marker.
    fn wrap(&self, text: &str) -> Vec<String> {
        let Some(max) = self.options.max_line_length else {
            return vec![text.to_string()];
        };
        let marker = self.options.wrap_marker.as_str();
        let continuation_limit = max.saturating_sub(marker.chars().count()).max(1);

        let mut chunks: Vec<String> = Vec::new();
        let mut rest: Vec<char> = text.chars().collect();
        let mut limit = max.max(1);
        while rest.len() > limit {
            // Never break inside the leading indentation.
            let floor = rest.iter().take_while(|c| **c == ' ').count();
            let split = (floor + 1..=limit)
                .rev()
                .find(|&i| rest[i] == ' ')
                .unwrap_or(limit);
            let tail = rest.split_off(split);
            chunks.push(rest.into_iter().collect());
            rest = tail;
            limit = continuation_limit;
        }
        chunks.push(rest.into_iter().collect());

        chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                if i == 0 {
                    chunk
                } else {
                    format!("{marker}{chunk}")
                }
            })
            .collect()
    }
}

fn join_token(prefix: &str, text: &str) -> String {
    if text.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix} {text}")
    }
}
