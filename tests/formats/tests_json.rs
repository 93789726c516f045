//! Plain JSON keeps the whole model.

use checklist::formats::{ChecklistFormat, InputFile, Json};

use crate::helpers::models;

#[test]
fn test_round_trip_is_exact() {
    let out = Json.write(&models::reference_file()).unwrap();
    assert_eq!(out.name, "Test Checklists.json");
    assert_eq!(out.mime_type, "application/json");
    let file = Json.read(&InputFile::new(out.name, out.bytes)).unwrap();
    assert_eq!(file, models::reference_file());
}

#[test]
fn test_serialized_shape() {
    let out = Json.write(&models::reference_file()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out.bytes).unwrap();
    assert_eq!(value["metadata"]["name"], "Test Checklists");
    assert_eq!(value["metadata"]["makeAndModel"], "Cessna 172S");
    assert_eq!(value["groups"][0]["category"], "CATEGORY_NORMAL");
    assert_eq!(value["groups"][1]["category"], "CATEGORY_EMERGENCY");
    let items = &value["groups"][0]["checklists"][0]["items"];
    assert_eq!(items[1]["type"], "ITEM_CHALLENGE_RESPONSE");
    assert_eq!(items[1]["expectation"], "On board");
}
