//! Upload dispatch through the default registry.

use checklist::formats::{FormatId, FormatRegistry, InputFile, RegistryError};
use checklist::model::ChecklistFile;
use rstest::rstest;

use crate::helpers::{fixtures, models};

#[rstest]
#[case::ace("test.ace", fixtures::ACE)]
#[case::dynon("TEST-DYNON.TXT", fixtures::DYNON)]
#[case::grt("test-grt.txt", fixtures::GRT)]
#[case::afs("test.afd", fixtures::DYNON)]
#[tokio::test]
async fn test_fixture_uploads_are_recognized(#[case] name: &str, #[case] bytes: &[u8]) {
    let registry = FormatRegistry::with_default_formats();
    let file = registry
        .parse_file(InputFile::new(name, bytes))
        .await
        .unwrap();
    assert_eq!(
        file.name().to_lowercase(),
        models::FILE_NAME.to_lowercase()
    );
    assert_eq!(file.checklist_count(), 4);
}

#[cfg(feature = "foreflight")]
#[tokio::test]
async fn test_foreflight_upload() {
    let registry = FormatRegistry::with_default_formats();
    let file = registry
        .parse_file(InputFile::new("test.fmd", fixtures::FOREFLIGHT))
        .await
        .unwrap();
    assert_eq!(
        file,
        models::foreflight_equivalent(models::reference_file())
    );
}

#[cfg(feature = "garmin-pilot")]
#[rstest]
#[case::lowercase("test.gplt")]
#[case::uppercase("TEST.GPLT")]
#[tokio::test]
async fn test_garmin_pilot_upload(#[case] name: &str) {
    let registry = FormatRegistry::with_default_formats();
    let package = registry
        .write_file(FormatId::GarminPilot, &models::reference_file())
        .await
        .unwrap();
    let file = registry
        .parse_file(InputFile::new(name, package.bytes))
        .await
        .unwrap();
    assert_eq!(
        file,
        models::garmin_pilot_equivalent(models::reference_file())
    );
}

#[tokio::test]
async fn test_text_upload_tries_every_dialect() {
    let registry = FormatRegistry::with_default_formats();
    let err = registry
        .parse_file(InputFile::new("notes.txt", b"Buy milk\r\n".to_vec()))
        .await
        .unwrap_err();
    let RegistryError::Unparseable { failures, .. } = &err else {
        panic!("expected Unparseable, got {err:?}");
    };
    let ids: Vec<_> = failures.iter().map(|(id, _)| *id).collect();
    assert_eq!(
        ids,
        [
            FormatId::Dynon,
            FormatId::Dynon31,
            FormatId::Dynon40,
            FormatId::Grt
        ]
    );
}

#[tokio::test]
async fn test_unknown_extension() {
    let registry = FormatRegistry::with_default_formats();
    let err = registry
        .parse_file(InputFile::new("checklist.pdf", b"%PDF-1.7".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownExtension { .. }), "{err}");

    let err = registry
        .parse_file(InputFile::new("README", b"".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownExtension { .. }), "{err}");
}

#[tokio::test]
async fn test_every_format_rejects_a_nameless_file() {
    let registry = FormatRegistry::with_default_formats();
    let nameless = models::reference_file();
    let nameless = ChecklistFile {
        metadata: None,
        ..nameless
    };
    for id in registry.formats().map(|f| f.id()).collect::<Vec<_>>() {
        let err = registry.write_file(id, &nameless).await.unwrap_err();
        assert!(
            matches!(err, RegistryError::Format(ref e) if !e.is_format_error()),
            "{id}: {err}"
        );
    }
}

#[tokio::test]
async fn test_written_files_read_back_through_dispatch() {
    let registry = FormatRegistry::with_default_formats();
    for id in [FormatId::Ace, FormatId::Json, FormatId::Grt] {
        let out = registry
            .write_file(id, &models::reference_file())
            .await
            .unwrap();
        let file = registry
            .parse_file(InputFile::new(out.name, out.bytes))
            .await
            .unwrap();
        assert_eq!(file.name(), models::FILE_NAME, "{id}");
        assert_eq!(file.item_count(), models::reference_file().item_count());
    }
}

#[test]
fn test_extension_of() {
    assert_eq!(FormatRegistry::extension_of("N12345.Ace"), "ace");
    assert_eq!(FormatRegistry::extension_of("archive.tar.gplt"), "gplt");
    assert_eq!(FormatRegistry::extension_of("README"), "");
}
