//! Format tests against the shared reference model and fixtures.

#[cfg(feature = "foreflight")]
pub mod tests_foreflight;
#[cfg(feature = "garmin-pilot")]
pub mod tests_garmin_pilot;
pub mod tests_ace;
pub mod tests_json;
pub mod tests_registry;
pub mod tests_text;
