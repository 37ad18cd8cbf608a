//! ARPABET phoneme classification: vowels, consonant articulation
//! classes and their typical singing durations, stress markers.

/// The fifteen ARPABET vowel nuclei.
pub const VOWELS: [&str; 15] = [
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
];

/// Strips a trailing stress digit (`AH0` -> `AH`). Symbols without one
/// are returned unchanged.
pub fn strip_stress(symbol: &str) -> &str {
    symbol.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Stress digit carried by a dictionary vowel, if any. `1` is primary,
/// `2` secondary, `0` unstressed.
pub fn stress_digit(symbol: &str) -> Option<u8> {
    symbol
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

pub fn is_vowel(symbol: &str) -> bool {
    VOWELS.contains(&strip_stress(symbol))
}

/// Articulation class of a consonant, used to budget how much of a word
/// a consonant may keep before vowels are squeezed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsonantClass {
    Plosive,
    Fricative,
    Liquid,
    Glide,
    Nasal,
    Stop,
}

impl ConsonantClass {
    /// Typical duration of this class in sung English, in seconds.
    pub fn base_duration_s(self) -> f64 {
        match self {
            Self::Plosive => 0.055,
            Self::Fricative => 0.070,
            Self::Liquid => 0.065,
            Self::Glide => 0.060,
            Self::Nasal => 0.060,
            Self::Stop => 0.045,
        }
    }
}

/// Classifies a consonant symbol. Anything not otherwise listed counts
/// as a short stop.
pub fn consonant_class(symbol: &str) -> ConsonantClass {
    match strip_stress(symbol) {
        "B" | "P" => ConsonantClass::Plosive,
        "F" | "V" | "S" | "Z" | "SH" | "ZH" | "TH" | "DH" | "HH" => ConsonantClass::Fricative,
        "L" | "R" => ConsonantClass::Liquid,
        "W" | "WH" | "Y" => ConsonantClass::Glide,
        "M" | "N" | "NG" => ConsonantClass::Nasal,
        _ => ConsonantClass::Stop,
    }
}
