//! ForeFlight against the encrypted reference fixture.

use checklist::formats::foreflight::container;
use checklist::formats::{ChecklistFormat, ForeFlight, InputFile};
use checklist::model::{Checklist, ChecklistFile, ChecklistGroup, ChecklistItem, GroupCategory};

use crate::helpers::{fixtures, models};

fn read(bytes: impl Into<Vec<u8>>) -> ChecklistFile {
    ForeFlight
        .read(&InputFile::new("test.fmd", bytes))
        .unwrap()
}

#[test]
fn test_read_fixture() {
    assert_eq!(
        read(fixtures::FOREFLIGHT),
        models::foreflight_equivalent(models::reference_file())
    );
}

#[test]
fn test_fixture_survives_write_and_read() {
    let original = read(fixtures::FOREFLIGHT);
    let out = ForeFlight.write(&original).unwrap();
    assert_eq!(out.name, "Test Checklists.fmd");
    assert_eq!(&out.bytes[..container::BLOCK_SIZE], container::IV);
    assert_eq!(read(out.bytes), original);
}

#[test]
fn test_write_reference() {
    let out = ForeFlight.write(&models::reference_file()).unwrap();
    assert_eq!(
        read(out.bytes),
        models::foreflight_equivalent(models::reference_file())
    );
}

#[test]
fn test_writes_differ_only_in_object_ids() {
    let first = ForeFlight.write(&models::reference_file()).unwrap();
    let second = ForeFlight.write(&models::reference_file()).unwrap();
    assert_ne!(first.bytes, second.bytes);
    assert_eq!(read(first.bytes), read(second.bytes));
}

#[test]
fn test_stacked_notes_join_and_split() {
    let file = ChecklistFile::new("Notes").with_group(
        ChecklistGroup::new("Abnormal", GroupCategory::Abnormal).with_checklist(
            Checklist::new("Alternator failure").with_items([
                ChecklistItem::title("Indications"),
                ChecklistItem::note("Ammeter discharging").indented(1),
                ChecklistItem::note("Low voltage light").indented(1),
                ChecklistItem::challenge_response("Alternator", "Reset"),
                ChecklistItem::note("").indented(1),
                ChecklistItem::note("Land as soon as practical").indented(1),
            ]),
        ),
    );
    let out = ForeFlight.write(&file).unwrap();
    assert_eq!(read(out.bytes), file);
}

#[test]
fn test_tampered_ciphertext_is_rejected() {
    let mut bytes = fixtures::FOREFLIGHT.to_vec();
    bytes.truncate(bytes.len() - 3);
    let err = ForeFlight
        .read(&InputFile::new("test.fmd", bytes))
        .unwrap_err();
    assert!(err.is_format_error(), "{err}");
}
