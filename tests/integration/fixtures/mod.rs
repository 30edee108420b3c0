// Test fixtures with known inputs and expected cleaned outputs
// WHY: Golden pairs pin the normalizer's observable behavior end to end

/// (raw input, expected cleaned output)
pub const NORMALIZATION_GOLDEN: &[(&str, &str)] = &[
    ("the a an", ""),
    ("Running runners ran", "running runner ran"),
    ("WASHINGTON (Reuters) - The Senate voted", "washington senate voted"),
    ("Visit https://example.com NOW!!! (Reuters) 123", "visit"),
    ("COVID19 cases hit 2020 highs", "covid case hit high"),
    ("Churches and boxes", "church box"),
    ("Women's movies about viruses", "woman movie virus"),
    ("  multiple   spaces\tand\ttabs  ", "multiple space tab"),
];

pub const FAKE_VOCABULARY: &[&str] = &[
    "shocking", "hoax", "conspiracy", "exposed", "insider", "secret", "outrage", "viral",
];

pub const REAL_VOCABULARY: &[&str] = &[
    "senate", "committee", "legislation", "minister", "parliament", "economy", "treaty", "budget",
];
