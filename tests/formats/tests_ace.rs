//! ACE reads and writes the reference file byte for byte.

use checklist::formats::{Ace, ChecklistFormat, FormatError, InputFile};
use rstest::rstest;

use crate::helpers::{fixtures, models};

#[test]
fn test_write_matches_fixture() {
    let out = Ace.write(&models::reference_file()).unwrap();
    assert_eq!(out.name, "Test Checklists.ace");
    assert_eq!(out.bytes, fixtures::ACE);
}

#[test]
fn test_read_fixture() {
    let file = Ace.read(&InputFile::new("test.ace", fixtures::ACE)).unwrap();
    assert_eq!(file, models::ace_equivalent(models::reference_file()));
}

#[test]
fn test_read_then_write_is_byte_exact() {
    let file = Ace.read(&InputFile::new("test.ace", fixtures::ACE)).unwrap();
    assert_eq!(Ace.write(&file).unwrap().bytes, fixtures::ACE);
}

#[rstest]
#[case::header(0)]
#[case::name(12)]
#[case::item(200)]
#[case::file_end(fixtures::ACE.len() - 6)]
#[case::checksum(fixtures::ACE.len() - 1)]
fn test_any_corrupted_byte_is_detected(#[case] index: usize) {
    let mut bytes = fixtures::ACE.to_vec();
    bytes[index] ^= 0x01;
    let err = Ace.read(&InputFile::new("test.ace", bytes)).unwrap_err();
    assert!(
        err.to_string().contains("checksum mismatch"),
        "byte {index}: {err}"
    );
}

#[test]
fn test_truncated_file_is_rejected() {
    let bytes = &fixtures::ACE[..fixtures::ACE.len() / 2];
    let err = Ace.read(&InputFile::new("test.ace", bytes)).unwrap_err();
    assert!(err.is_format_error(), "{err}");
}

#[test]
fn test_text_file_is_not_ace() {
    let err = Ace
        .read(&InputFile::new("test.ace", fixtures::DYNON))
        .unwrap_err();
    assert!(matches!(err, FormatError::Malformed { .. }), "{err}");
}
