//! Reference checklist file shared by the format tests.
//!
//! The files under `tests/fixtures/` are this model written by each format.
//! Lossy formats read back a reduced model; the `*_equivalent` helpers
//! describe exactly what each one keeps.

use checklist::model::{
    Checklist, ChecklistFile, ChecklistFileMetadata, ChecklistGroup, ChecklistItem,
    GroupCategory, ItemType,
};

pub const FILE_NAME: &str = "Test Checklists";

/// Two groups: one checklist using every item type, indent level and
/// centering, and three single-item checklists.
pub fn reference_file() -> ChecklistFile {
    let preflight = Checklist::new("Preflight").with_items([
        ChecklistItem::title("Cabin"),
        ChecklistItem::challenge_response("Documents", "On board"),
        ChecklistItem::challenge_response("Parking brake", "Set"),
        ChecklistItem::challenge("Control lock removed"),
        ChecklistItem::note("Check fuel quality").indented(1),
        ChecklistItem::warning("Propeller area clear"),
        ChecklistItem::caution("Hot exhaust").indented(1),
        ChecklistItem::plaintext("Walk around the aircraft"),
        ChecklistItem::space(),
        ChecklistItem::title("Engine start").centered(),
        ChecklistItem::challenge_response("Master switch", "On").indented(1),
        ChecklistItem::challenge_response("Beacon", "On").indented(2),
        ChecklistItem::challenge("Throttle cracked").indented(3),
        ChecklistItem::note("Prime as required").indented(4),
        ChecklistItem::warning("Do not overprime").centered(),
        ChecklistItem::caution("Starter limits").indented(2),
        ChecklistItem::note("Oil pressure within 30 seconds"),
        ChecklistItem::challenge_response("Avionics", "On"),
    ]);

    let emergency = ChecklistGroup::new("Emergency procedures", GroupCategory::Emergency)
        .with_checklist(
            Checklist::new("Engine fire")
                .with_item(ChecklistItem::challenge_response("Mixture", "Cutoff")),
        )
        .with_checklist(
            Checklist::new("Engine failure")
                .with_item(ChecklistItem::challenge_response("Airspeed", "68 KIAS")),
        )
        .with_checklist(
            Checklist::new("Electrical fire")
                .with_item(ChecklistItem::challenge("Master switch off")),
        );

    ChecklistFile {
        metadata: Some(ChecklistFileMetadata {
            name: FILE_NAME.to_string(),
            make_and_model: "Cessna 172S".to_string(),
            aircraft_info: "N12345".to_string(),
            manufacturer_info: "Textron Aviation".to_string(),
            copyright_info: "Copyright 2024 Example Flying Club".to_string(),
            ..ChecklistFileMetadata::default()
        }),
        groups: vec![
            ChecklistGroup::new("Normal procedures", GroupCategory::Normal)
                .with_checklist(preflight),
            emergency,
        ],
    }
}

fn map_items(mut file: ChecklistFile, f: impl Fn(&mut ChecklistItem)) -> ChecklistFile {
    for group in &mut file.groups {
        for checklist in &mut group.checklists {
            checklist.items.iter_mut().for_each(&f);
        }
    }
    file
}

/// ACE keeps everything except group categories. A challenge-response with
/// an empty expectation is written without `~`, so a stored `Fuel~` line
/// comes back as `Fuel`.
pub fn ace_equivalent(mut file: ChecklistFile) -> ChecklistFile {
    for group in &mut file.groups {
        group.category = GroupCategory::Unknown;
    }
    file
}

/// Text dialects lose categories and have no plaintext marker. Trailing
/// spaces of an uncentered item are not written.
pub fn text_equivalent(file: ChecklistFile, uppercase: bool) -> ChecklistFile {
    let mut file = map_items(ace_equivalent(file), |item| {
        if item.item_type == ItemType::Plaintext {
            item.item_type = ItemType::Challenge;
        }
        if uppercase {
            item.prompt = item.prompt.to_uppercase();
            item.expectation = item.expectation.to_uppercase();
        }
    });
    if uppercase {
        for group in &mut file.groups {
            group.title = group.title.to_uppercase();
            for checklist in &mut group.checklists {
                checklist.title = checklist.title.to_uppercase();
            }
        }
        let metadata = file.metadata_mut();
        for field in [
            &mut metadata.name,
            &mut metadata.make_and_model,
            &mut metadata.aircraft_info,
            &mut metadata.manufacturer_info,
            &mut metadata.copyright_info,
            &mut metadata.description,
        ] {
            *field = field.to_uppercase();
        }
    }
    file
}

/// ForeFlight drops layout except for notes attached to the item above,
/// and only carries name, description and tail number. A title whose text
/// starts with `WARNING: `, `CAUTION: ` or `NOTE: ` reads back as that type.
pub fn foreflight_equivalent(file: ChecklistFile) -> ChecklistFile {
    let mut file = map_items(file, |item| {
        let attached_note = item.item_type == ItemType::Note && item.indent == 1;
        if !attached_note {
            item.indent = 0;
        }
        item.centered = false;
        if item.item_type == ItemType::Plaintext {
            item.item_type = ItemType::Title;
        }
    });
    let metadata = file.metadata_mut();
    *metadata = ChecklistFileMetadata {
        name: metadata.name.clone(),
        description: metadata.description.clone(),
        aircraft_info: metadata.aircraft_info.clone(),
        ..ChecklistFileMetadata::default()
    };
    file
}

/// Garmin Pilot drops layout, keeps only the name, and files groups under
/// its fixed subtypes (`Other` for titles it does not know).
///
/// A check item has no way to mark an empty response, so a challenge-response
/// without an expectation reads back as a challenge. A trailing note whose
/// text is one of the completion action titles reads back as that action.
pub fn garmin_pilot_equivalent(file: ChecklistFile) -> ChecklistFile {
    let mut file = map_items(file, |item| {
        item.indent = 0;
        item.centered = false;
        if item.item_type == ItemType::ChallengeResponse && item.expectation.is_empty() {
            item.item_type = ItemType::Challenge;
        }
    });
    for group in &mut file.groups {
        group.title = "Other".to_string();
    }
    let name = file.name().to_string();
    file.metadata = Some(ChecklistFileMetadata::new(name));
    file
}
