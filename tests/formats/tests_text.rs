//! Text dialects against the Dynon and GRT fixtures.

use checklist::formats::{ChecklistFormat, InputFile, TextFormat};
use checklist::model::ChecklistFile;
use rstest::rstest;

use crate::helpers::{fixtures, models};

#[rstest]
#[case::dynon(TextFormat::dynon(), fixtures::DYNON)]
#[case::grt(TextFormat::grt(), fixtures::GRT)]
fn test_write_matches_fixture(#[case] format: TextFormat, #[case] fixture: &[u8]) {
    let out = format
        .with_date(fixtures::text_date())
        .write(&models::reference_file())
        .unwrap();
    assert_eq!(out.name, "Test Checklists.txt");
    assert_eq!(out.mime_type, "text/plain");
    assert_eq!(fixtures::lines(&out.bytes), fixtures::lines(fixture));
    assert_eq!(out.bytes, fixture);
}

#[rstest]
#[case::dynon(TextFormat::dynon(), fixtures::DYNON, true)]
#[case::dynon31(TextFormat::dynon31(), fixtures::DYNON, true)]
#[case::dynon40(TextFormat::dynon40(), fixtures::DYNON, true)]
#[case::grt(TextFormat::grt(), fixtures::GRT, false)]
fn test_read_fixture(#[case] format: TextFormat, #[case] fixture: &[u8], #[case] uppercase: bool) {
    let file = format.read(&InputFile::new("test.txt", fixture)).unwrap();
    assert_eq!(
        file,
        models::text_equivalent(models::reference_file(), uppercase)
    );
}

/// Wrapping and centering for narrow displays must not change what is read
/// back.
#[rstest]
#[case::dynon31(TextFormat::dynon31(), true)]
#[case::dynon40(TextFormat::dynon40(), true)]
#[case::afs(TextFormat::afs(), false)]
#[case::grt(TextFormat::grt(), false)]
fn test_round_trip(#[case] format: TextFormat, #[case] uppercase: bool) {
    let out = format.write(&models::reference_file()).unwrap();
    let file = format.read(&InputFile::new(out.name, out.bytes)).unwrap();
    assert_eq!(
        file,
        models::text_equivalent(models::reference_file(), uppercase)
    );
}

#[test]
fn test_narrow_dialect_wraps_long_items() {
    let out = TextFormat::dynon31()
        .with_date(fixtures::text_date())
        .write(&models::reference_file())
        .unwrap();
    let lines = fixtures::lines(&out.bytes);
    assert!(lines.contains(&"ITEM17 NOTE: OIL PRESSURE WITHIN 30".to_string()));
    assert!(lines.contains(&"ITEM17 + SECONDS".to_string()));
    let item_texts = lines
        .iter()
        .filter(|line| line.starts_with("ITEM"))
        .filter_map(|line| line.split_once(' '));
    for (_, text) in item_texts {
        assert!(text.chars().count() <= 31, "{text:?}");
    }
}

#[test]
fn test_dialects_do_not_read_each_other() {
    let upload = InputFile::new("test.txt", fixtures::DYNON);
    assert!(TextFormat::grt().read(&upload).is_err());
    let upload = InputFile::new("test.txt", fixtures::GRT);
    assert!(TextFormat::dynon().read(&upload).is_err());
}

#[test]
fn test_upload_name_is_used_without_metadata() {
    let text = "LIST1 Preflight\r\n1.1 Fuel ... Full\r\n";
    let file = TextFormat::grt()
        .read(&InputFile::new("N123.txt", text.as_bytes()))
        .unwrap();
    assert_eq!(file.name(), "N123");
    assert_eq!(file.checklist_count(), 1);
}

#[test]
fn test_write_without_name_is_rejected() {
    assert!(TextFormat::dynon().write(&ChecklistFile::default()).is_err());
}
