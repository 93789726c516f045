//! Reference files, each one [`super::models::reference_file`] as written by
//! a format. Text fixtures carry the footer date from [`text_date`].

use chrono::NaiveDate;

pub const ACE: &[u8] = include_bytes!("../fixtures/test.ace");
pub const DYNON: &[u8] = include_bytes!("../fixtures/test-dynon.txt");
pub const GRT: &[u8] = include_bytes!("../fixtures/test-grt.txt");
pub const FOREFLIGHT: &[u8] = include_bytes!("../fixtures/test-foreflight.fmd");

pub fn text_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

/// Lines of a text file, line endings removed.
pub fn lines(bytes: &[u8]) -> Vec<String> {
    std::str::from_utf8(bytes)
        .expect("text fixture is UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}
