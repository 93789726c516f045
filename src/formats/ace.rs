//! Garmin ACE checklist format support.
//!
//! ACE is the binary checklist format read by Garmin G3X and GTN avionics.
//! It is a sequence of CRLF-terminated Latin-1 lines with a few binary
//! markers, followed by a checksum:
//!
//! ```text
//! F0 F0 F0 F0 00 01 <group idx> <checklist idx> CRLF
//! <file name> CRLF
//! <make and model> CRLF
//! <aircraft info> CRLF
//! <manufacturer info> CRLF
//! <copyright info> CRLF
//! <0<group title> CRLF
//!   (0<checklist title> CRLF
//!     <type><indent><text> CRLF      (or an empty line for a blank item)
//!   ) CRLF
//! > CRLF
//! END CRLF
//! <!crc32 of everything above, little-endian>
//! ```
//!
//! Files are consumed by certified hardware, so writing mirrors reading
//! byte for byte.

use super::naming;
use super::{ChecklistFormat, FormatCapability, FormatError, FormatId, InputFile, OutputFile};
use crate::model::{ChecklistFile, ItemType};

const FORMAT: &str = "ACE";

/// Byte-level markers of the ACE layout.
pub mod markers {
    pub const HEADER: &[u8] = &[0xF0, 0xF0, 0xF0, 0xF0, 0x00, 0x01];
    pub const CRLF: &[u8] = b"\r\n";
    pub const GROUP_START: &[u8] = b"<0";
    pub const GROUP_END: &[u8] = b">";
    pub const CHECKLIST_START: &[u8] = b"(0";
    pub const CHECKLIST_END: &[u8] = b")";
    pub const FILE_END: &[u8] = b"END";
    pub const CENTERED: u8 = b'c';
    pub const EXPECTATION_SEPARATOR: char = '~';
    pub const CRC_LEN: usize = 4;
}

/// Item type codes.
const TYPE_CODES: &[(u8, ItemType)] = &[
    (b'w', ItemType::Warning),
    (b'a', ItemType::Caution),
    (b'n', ItemType::Note),
    (b'p', ItemType::Plaintext),
    (b'c', ItemType::Challenge),
    (b'r', ItemType::ChallengeResponse),
    (b't', ItemType::Title),
];

fn item_type_for_code(code: u8) -> Option<ItemType> {
    TYPE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, t)| *t)
}

fn code_for_item_type(item_type: ItemType) -> Option<u8> {
    TYPE_CODES
        .iter()
        .find(|(_, t)| *t == item_type)
        .map(|(c, _)| *c)
}

fn checksum(body: &[u8]) -> u32 {
    !crc32fast::hash(body)
}

/// ACE format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ace;

impl ChecklistFormat for Ace {
    fn id(&self) -> FormatId {
        FormatId::Ace
    }

    fn name(&self) -> &'static str {
        "Garmin ACE"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::FULL
    }

    fn read(&self, file: &InputFile) -> Result<ChecklistFile, FormatError> {
        AceReader::new(&file.bytes).read(&file.name)
    }

    fn write(&self, file: &ChecklistFile) -> Result<OutputFile, FormatError> {
        let metadata = file.require_name()?;
        let bytes = AceWriter::new().write(file)?;
        Ok(OutputFile {
            name: naming::output_file_name(&metadata.name, self.extension()),
            mime_type: self.mime_type(),
            bytes,
        })
    }

    fn validate(&self, input: &[u8]) -> Result<(), FormatError> {
        if !input.starts_with(markers::HEADER) {
            return Err(FormatError::malformed(FORMAT, "missing ACE header"));
        }
        Ok(())
    }
}

// ============================================================================
// ACE READER
// ============================================================================

mod reader {
    use super::*;
    use crate::model::{Checklist, ChecklistFileMetadata, ChecklistGroup, ChecklistItem};

    fn latin1(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }

    /// Byte cursor over an ACE file.
    pub struct AceReader<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl<'a> AceReader<'a> {
        pub fn new(data: &'a [u8]) -> Self {
            Self { data, pos: 0 }
        }

        pub fn read(mut self, upload_name: &str) -> Result<ChecklistFile, FormatError> {
            self.verify_checksum()?;

            self.expect_bytes(markers::HEADER, "ACE header")?;
            let default_group_index = self.read_byte("default group index")?;
            let default_checklist_index = self.read_byte("default checklist index")?;
            self.expect_bytes(markers::CRLF, "end of header")?;

            let mut metadata = ChecklistFileMetadata {
                name: latin1(self.read_line()?),
                default_group_index: u32::from(default_group_index),
                default_checklist_index: u32::from(default_checklist_index),
                make_and_model: latin1(self.read_line()?),
                aircraft_info: latin1(self.read_line()?),
                manufacturer_info: latin1(self.read_line()?),
                copyright_info: latin1(self.read_line()?),
                ..ChecklistFileMetadata::default()
            };
            if metadata.name.is_empty() {
                metadata.name = naming::strip_extension(upload_name, "ace").to_string();
            }
            if metadata.name.is_empty() {
                return Err(FormatError::missing_field("file name"));
            }

            let mut groups = Vec::new();
            loop {
                if self.peek_starts_with(markers::GROUP_START) {
                    groups.push(self.read_group()?);
                    continue;
                }
                let line = self.read_line()?;
                if line == markers::FILE_END {
                    break;
                }
                return Err(self.unexpected("group start or END", line));
            }

            let end = self.data.len() - markers::CRC_LEN;
            if self.pos != end {
                return Err(FormatError::malformed(
                    FORMAT,
                    format!("{} unexpected bytes after END", end.saturating_sub(self.pos)),
                ));
            }

            let file = ChecklistFile {
                metadata: Some(metadata),
                groups,
            };
            tracing::debug!(
                groups = file.groups.len(),
                checklists = file.checklist_count(),
                "read ACE file"
            );
            Ok(file)
        }

        fn verify_checksum(&self) -> Result<(), FormatError> {
            let min_len = markers::HEADER.len() + 2 + markers::CRLF.len() + markers::CRC_LEN;
            if self.data.len() < min_len {
                return Err(FormatError::malformed(
                    FORMAT,
                    format!("file too short ({} bytes)", self.data.len()),
                ));
            }
            let (body, trailer) = self.data.split_at(self.data.len() - markers::CRC_LEN);
            let stored = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
            let computed = checksum(body);
            if stored != computed {
                return Err(FormatError::malformed(
                    FORMAT,
                    format!("checksum mismatch: expected {computed:#010x}, found {stored:#010x}"),
                ));
            }
            Ok(())
        }

        fn read_group(&mut self) -> Result<ChecklistGroup, FormatError> {
            self.expect_bytes(markers::GROUP_START, "group start")?;
            let mut group = ChecklistGroup {
                title: latin1(self.read_line()?),
                ..ChecklistGroup::default()
            };
            tracing::trace!(title = %group.title, "ACE group");

            loop {
                if self.peek_starts_with(markers::CHECKLIST_START) {
                    group.checklists.push(self.read_checklist()?);
                    continue;
                }
                let line = self.read_line()?;
                if line == markers::GROUP_END {
                    return Ok(group);
                }
                return Err(self.unexpected("checklist start or group end", line));
            }
        }

        fn read_checklist(&mut self) -> Result<Checklist, FormatError> {
            self.expect_bytes(markers::CHECKLIST_START, "checklist start")?;
            let mut checklist = Checklist::new(latin1(self.read_line()?));

            loop {
                let line = self.read_line()?;
                if line == markers::CHECKLIST_END {
                    return Ok(checklist);
                }
                checklist.items.push(self.parse_item(line)?);
            }
        }

        fn parse_item(&self, line: &[u8]) -> Result<ChecklistItem, FormatError> {
            if line.is_empty() {
                return Ok(ChecklistItem::space());
            }
            if line.len() < 2 {
                return Err(self.unexpected("item type and indent", line));
            }

            let item_type = item_type_for_code(line[0]).ok_or_else(|| {
                FormatError::malformed(
                    FORMAT,
                    format!(
                        "unknown item type code {:?} in line {:?}",
                        line[0] as char,
                        latin1(line)
                    ),
                )
            })?;

            let mut item = ChecklistItem::new(item_type, "");
            match line[1] {
                markers::CENTERED => item.centered = true,
                code @ b'0'..=b'4' => item.indent = u32::from(code - b'0'),
                _ => {
                    return Err(FormatError::malformed(
                        FORMAT,
                        format!(
                            "invalid indent code {:?} in line {:?}",
                            line[1] as char,
                            latin1(line)
                        ),
                    ));
                }
            }

            let text = latin1(&line[2..]);
            if item_type == ItemType::ChallengeResponse {
                match text.split_once(markers::EXPECTATION_SEPARATOR) {
                    Some((prompt, expectation)) => {
                        item.prompt = prompt.to_string();
                        item.expectation = expectation.to_string();
                    }
                    None => item.prompt = text,
                }
            } else {
                item.prompt = text;
            }
            Ok(item)
        }

        // ── Cursor primitives ───────────────────────────────────────────

        fn remaining(&self) -> &'a [u8] {
            &self.data[self.pos..self.data.len() - markers::CRC_LEN]
        }

        fn peek_starts_with(&self, prefix: &[u8]) -> bool {
            self.remaining().starts_with(prefix)
        }

        fn read_byte(&mut self, what: &str) -> Result<u8, FormatError> {
            let byte = *self.remaining().first().ok_or_else(|| {
                FormatError::malformed(FORMAT, format!("unexpected end of file reading {what}"))
            })?;
            self.pos += 1;
            Ok(byte)
        }

        fn expect_bytes(&mut self, expected: &[u8], what: &str) -> Result<(), FormatError> {
            if !self.peek_starts_with(expected) {
                let found = self.current_line();
                return Err(self.unexpected(what, found));
            }
            self.pos += expected.len();
            Ok(())
        }

        /// Read up to the next CRLF and move past it.
        fn read_line(&mut self) -> Result<&'a [u8], FormatError> {
            let remaining = self.remaining();
            let end = remaining
                .windows(markers::CRLF.len())
                .position(|w| w == markers::CRLF)
                .ok_or_else(|| {
                    FormatError::malformed(
                        FORMAT,
                        format!("unterminated line at byte {}", self.pos),
                    )
                })?;
            self.pos += end + markers::CRLF.len();
            Ok(&remaining[..end])
        }

        fn current_line(&self) -> &'a [u8] {
            let remaining = self.remaining();
            let end = remaining
                .windows(markers::CRLF.len())
                .position(|w| w == markers::CRLF)
                .unwrap_or(remaining.len());
            &remaining[..end]
        }

        fn unexpected(&self, expected: &str, line: &[u8]) -> FormatError {
            FormatError::malformed(
                FORMAT,
                format!(
                    "expected {expected} near byte {}, found line {:?}",
                    self.pos,
                    latin1(line)
                ),
            )
        }
    }
}

use reader::AceReader;

// ============================================================================
// ACE WRITER
// ============================================================================

mod writer {
    use super::*;
    use crate::model::{ChecklistItem, MAX_INDENT};

    /// ACE file writer.
    pub struct AceWriter {
        out: Vec<u8>,
    }

    impl AceWriter {
        pub fn new() -> Self {
            Self { out: Vec::new() }
        }

        pub fn write(mut self, file: &ChecklistFile) -> Result<Vec<u8>, FormatError> {
            let metadata = file.require_name()?;

            self.out.extend_from_slice(markers::HEADER);
            self.out
                .push(index_byte(metadata.default_group_index, "default group index")?);
            self.out.push(index_byte(
                metadata.default_checklist_index,
                "default checklist index",
            )?);
            self.out.extend_from_slice(markers::CRLF);

            for line in [
                &metadata.name,
                &metadata.make_and_model,
                &metadata.aircraft_info,
                &metadata.manufacturer_info,
                &metadata.copyright_info,
            ] {
                self.line(line)?;
            }

            for group in &file.groups {
                self.out.extend_from_slice(markers::GROUP_START);
                self.line(&group.title)?;
                for checklist in &group.checklists {
                    self.out.extend_from_slice(markers::CHECKLIST_START);
                    self.line(&checklist.title)?;
                    for item in &checklist.items {
                        self.item(item)?;
                    }
                    self.raw_line(markers::CHECKLIST_END);
                }
                self.raw_line(markers::GROUP_END);
            }
            self.raw_line(markers::FILE_END);

            let crc = checksum(&self.out);
            self.out.extend_from_slice(&crc.to_le_bytes());

            tracing::debug!(
                bytes = self.out.len(),
                checklists = file.checklist_count(),
                "wrote ACE file"
            );
            Ok(self.out)
        }

        fn item(&mut self, item: &ChecklistItem) -> Result<(), FormatError> {
            if item.item_type == ItemType::Space {
                self.raw_line(b"");
                return Ok(());
            }

            let type_code = code_for_item_type(item.item_type).ok_or_else(|| {
                FormatError::unsupported(format!(
                    "item type {:?} cannot be written to ACE",
                    item.item_type
                ))
            })?;
            let indent_code = if item.centered {
                markers::CENTERED
            } else if item.indent <= MAX_INDENT {
                b'0' + item.indent as u8
            } else {
                return Err(FormatError::Validation(format!(
                    "indent {} of item {:?} exceeds {MAX_INDENT}",
                    item.indent, item.prompt
                )));
            };

            self.out.push(type_code);
            self.out.push(indent_code);
            // An empty expectation is written as a bare prompt.
            if item.item_type == ItemType::ChallengeResponse && !item.expectation.is_empty() {
                let text = format!(
                    "{}{}{}",
                    item.prompt,
                    markers::EXPECTATION_SEPARATOR,
                    item.expectation
                );
                self.line(&text)
            } else {
                self.line(&item.prompt)
            }
        }

        /// Encode `text` as Latin-1 followed by CRLF.
        fn line(&mut self, text: &str) -> Result<(), FormatError> {
            for c in text.chars() {
                let byte = u8::try_from(u32::from(c)).map_err(|_| {
                    FormatError::unsupported(format!(
                        "character {c:?} in {text:?} cannot be encoded as Latin-1"
                    ))
                })?;
                self.out.push(byte);
            }
            self.out.extend_from_slice(markers::CRLF);
            Ok(())
        }

        fn raw_line(&mut self, bytes: &[u8]) {
            self.out.extend_from_slice(bytes);
            self.out.extend_from_slice(markers::CRLF);
        }
    }

    fn index_byte(index: u32, what: &str) -> Result<u8, FormatError> {
        u8::try_from(index)
            .map_err(|_| FormatError::Validation(format!("{what} {index} does not fit in a byte")))
    }
}

use writer::AceWriter;
