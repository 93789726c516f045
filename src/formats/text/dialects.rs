//! Vendor dialects of the text format.

use super::options::TextFormatOptions;
use crate::formats::prefixes::TypePrefixes;

/// Dynon SkyView / D10 checklist text.
pub fn dynon() -> TextFormatOptions {
    TextFormatOptions {
        checklist_prefix: "CHKLST{{checklistNum}}".to_string(),
        item_prefix: "ITEM{{itemNum}}".to_string(),
        zero_based: true,
        group_separator: ": ".to_string(),
        blank_line_at_top: true,
        prefixes: TypePrefixes::with_title("** "),
        expectation_separator: " - ".to_string(),
        max_line_length: None,
        wrap_marker: "+".to_string(),
        uppercase: true,
        comment_prefix: "#".to_string(),
        indent_width: 2,
        output_metadata: true,
        metadata_title: "Checklist info".to_string(),
    }
}

/// Advanced Flight Systems: the Dynon layout in mixed case.
pub fn afs() -> TextFormatOptions {
    TextFormatOptions {
        uppercase: false,
        ..dynon()
    }
}

/// GRT Avionics checklist text.
pub fn grt() -> TextFormatOptions {
    TextFormatOptions {
        checklist_prefix: "LIST{{checklistNum}}".to_string(),
        item_prefix: "{{checklistNum}}.{{itemNum}}".to_string(),
        zero_based: false,
        group_separator: " - ".to_string(),
        blank_line_at_top: false,
        prefixes: TypePrefixes::with_title("== "),
        expectation_separator: " ... ".to_string(),
        max_line_length: None,
        wrap_marker: "+".to_string(),
        uppercase: false,
        comment_prefix: "//".to_string(),
        indent_width: 4,
        output_metadata: true,
        metadata_title: "Checklist info".to_string(),
    }
}
