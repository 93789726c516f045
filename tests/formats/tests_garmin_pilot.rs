//! Garmin Pilot packages written from and read into the canonical model.

use checklist::formats::{ChecklistFormat, FormatError, GarminPilot, InputFile};
use checklist::model::{
    Checklist, ChecklistFile, ChecklistGroup, ChecklistItem, CompletionAction, GroupCategory,
};

use crate::helpers::models;

fn round_trip(file: &ChecklistFile) -> ChecklistFile {
    let out = GarminPilot.write(file).unwrap();
    GarminPilot
        .read(&InputFile::new(out.name, out.bytes))
        .unwrap()
}

#[test]
fn test_reference_round_trip() {
    assert_eq!(
        round_trip(&models::reference_file()),
        models::garmin_pilot_equivalent(models::reference_file())
    );
}

#[test]
fn test_second_round_trip_is_stable() {
    let once = round_trip(&models::reference_file());
    assert_eq!(round_trip(&once), once);
}

/// The completion action is carried as a trailing note with a fixed title,
/// not as a real field of the package.
#[test]
fn test_completion_action_and_live_data() {
    let file = ChecklistFile::new("N12345").with_group(
        ChecklistGroup::new("Before Takeoff", GroupCategory::Normal).with_checklist(
            Checklist::new("Runup")
                .with_items([
                    ChecklistItem::challenge_response("Altimeter", "{{localAltimeter}}"),
                    ChecklistItem::challenge_response("Wind", "{{surfaceWind}}"),
                    ChecklistItem::challenge_response("Mags", "Check"),
                    ChecklistItem::note("Item with 2 blank lines"),
                    ChecklistItem::note(""),
                    ChecklistItem::note(""),
                ])
                .with_completion_action(CompletionAction::OpenWeather),
        ),
    );
    assert_eq!(round_trip(&file), file);
}

#[test]
fn test_groups_are_rebuilt_from_subtypes() {
    let file = ChecklistFile::new("Groups")
        .with_group(
            ChecklistGroup::new("Fire", GroupCategory::Emergency)
                .with_checklist(Checklist::new("Engine fire")),
        )
        .with_group(
            ChecklistGroup::new("Fuel", GroupCategory::Abnormal)
                .with_checklist(Checklist::new("Low fuel")),
        )
        .with_group(
            ChecklistGroup::new("Fire", GroupCategory::Emergency)
                .with_checklist(Checklist::new("Cabin fire")),
        );
    let read = round_trip(&file);
    let groups: Vec<_> = read
        .groups
        .iter()
        .map(|g| (g.category, g.title.as_str(), g.checklists.len()))
        .collect();
    assert_eq!(
        groups,
        [
            (GroupCategory::Emergency, "Fire", 2),
            (GroupCategory::Abnormal, "Fuel", 1),
        ]
    );
}

#[test]
fn test_unknown_category_is_a_hard_error() {
    let file = ChecklistFile::new("X").with_group(
        ChecklistGroup::new("Misc", GroupCategory::Unknown)
            .with_checklist(Checklist::new("Anything")),
    );
    assert!(matches!(
        GarminPilot.write(&file),
        Err(FormatError::Unsupported(_))
    ));
}
