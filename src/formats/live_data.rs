//! Live data fields.
//!
//! Some avionics fill an item's response with real-time telemetry such as the
//! local altimeter setting. In the canonical model such a response is the
//! token `{{slug}}` (for example `{{localAltimeter}}`). Garmin Pilot stores
//! the field as a numeric item subtype; every other format keeps the token
//! text as-is. Outside live avionics the token can be replaced with an
//! example value for display.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A well-known telemetry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveDataField {
    /// Token name used in canonical text.
    pub slug: &'static str,
    /// Garmin Pilot `liveDataType` value.
    pub garmin_type: i64,
    pub label: &'static str,
    /// Value shown when no live source is available.
    pub example: &'static str,
}

/// All known live data fields.
pub const LIVE_DATA_FIELDS: &[LiveDataField] = &[
    LiveDataField {
        slug: "localAltimeter",
        garmin_type: 1,
        label: "Local altimeter",
        example: "29.92 inHg",
    },
    LiveDataField {
        slug: "fieldElevation",
        garmin_type: 2,
        label: "Field elevation",
        example: "1,234 ft",
    },
    LiveDataField {
        slug: "surfaceWind",
        garmin_type: 3,
        label: "Surface wind",
        example: "270° @ 10 kt",
    },
    LiveDataField {
        slug: "atisFrequency",
        garmin_type: 4,
        label: "ATIS frequency",
        example: "127.850",
    },
    LiveDataField {
        slug: "towerFrequency",
        garmin_type: 5,
        label: "Tower frequency",
        example: "118.300",
    },
    LiveDataField {
        slug: "groundFrequency",
        garmin_type: 6,
        label: "Ground frequency",
        example: "121.700",
    },
    LiveDataField {
        slug: "fuelOnBoard",
        garmin_type: 7,
        label: "Fuel on board",
        example: "48.0 gal",
    },
    LiveDataField {
        slug: "densityAltitude",
        garmin_type: 8,
        label: "Density altitude",
        example: "2,500 ft",
    },
];

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z][A-Za-z0-9]*)\}\}").expect("valid token regex"));

impl LiveDataField {
    pub fn from_slug(slug: &str) -> Option<&'static LiveDataField> {
        LIVE_DATA_FIELDS.iter().find(|f| f.slug == slug)
    }

    pub fn from_garmin_type(garmin_type: i64) -> Option<&'static LiveDataField> {
        LIVE_DATA_FIELDS.iter().find(|f| f.garmin_type == garmin_type)
    }

    /// The field referenced by text consisting of exactly one token.
    pub fn from_token(text: &str) -> Option<&'static LiveDataField> {
        let caps = TOKEN_RE.captures(text)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != text.len() {
            return None;
        }
        Self::from_slug(&caps[1])
    }

    /// The canonical token text, `{{slug}}`.
    pub fn token(&self) -> String {
        format!("{{{{{}}}}}", self.slug)
    }
}

/// Replace every known live data token in `text` with its example value.
///
/// Unknown tokens are left untouched.
pub fn substitute_example_values(text: &str) -> Cow<'_, str> {
    TOKEN_RE.replace_all(text, |caps: &Captures<'_>| {
        match LiveDataField::from_slug(&caps[1]) {
            Some(field) => field.example.to_string(),
            None => caps[0].to_string(),
        }
    })
}
