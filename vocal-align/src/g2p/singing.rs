//! Hand-curated pronunciations for words common in song lyrics but
//! missing from the general dictionary: contractions, sung
//! vocalizations, and seasonal vocabulary.

/// Entries keyed by lowercase word. Checked before the general
/// dictionary so sung forms win over spelling-based guesses.
pub(crate) const ENTRIES: &[(&str, &[&str])] = &[
    // Contractions and slang
    ("gonna", &["G", "AH", "N", "AH"]),
    ("wanna", &["W", "AA", "N", "AH"]),
    ("gotta", &["G", "AA", "T", "AH"]),
    ("kinda", &["K", "AY", "N", "D", "AH"]),
    ("lemme", &["L", "EH", "M", "IY"]),
    ("gimme", &["G", "IH", "M", "IY"]),
    ("cause", &["K", "AH", "Z"]),
    ("bout", &["B", "AW", "T"]),
    ("em", &["AH", "M"]),
    ("ya", &["Y", "AH"]),
    ("yeah", &["Y", "EH"]),
    ("yall", &["Y", "AO", "L"]),
    ("aint", &["EY", "N", "T"]),
    ("til", &["T", "IH", "L"]),
    ("nah", &["N", "AA"]),
    ("uh", &["AH"]),
    ("um", &["AH", "M"]),
    ("hmm", &["HH", "AH", "M"]),
    ("shh", &["SH"]),
    ("nope", &["N", "OW", "P"]),
    ("yep", &["Y", "EH", "P"]),
    ("luv", &["L", "AH", "V"]),
    ("nite", &["N", "AY", "T"]),
    ("thru", &["TH", "R", "UW"]),
    // Sung vocalizations
    ("ooh", &["UW"]),
    ("oooh", &["UW"]),
    ("ooooh", &["UW"]),
    ("aah", &["AA"]),
    ("aaah", &["AA"]),
    ("ahh", &["AA"]),
    ("ohh", &["OW"]),
    ("eee", &["IY"]),
    ("mmm", &["M"]),
    ("whoa", &["W", "OW"]),
    ("woah", &["W", "OW"]),
    ("hey", &["HH", "EY"]),
    ("ho", &["HH", "OW"]),
    ("la", &["L", "AA"]),
    ("na", &["N", "AA"]),
    ("da", &["D", "AA"]),
    ("ba", &["B", "AA"]),
    ("sha", &["SH", "AA"]),
    ("doo", &["D", "UW"]),
    ("wop", &["W", "AA", "P"]),
    ("bop", &["B", "AA", "P"]),
    ("dee", &["D", "IY"]),
    ("dum", &["D", "AH", "M"]),
    ("huh", &["HH", "AH"]),
    ("hah", &["HH", "AA"]),
    ("heh", &["HH", "EH"]),
    ("woo", &["W", "UW"]),
    ("yay", &["Y", "EY"]),
    ("bam", &["B", "AE", "M"]),
    ("pow", &["P", "AW"]),
    ("shoo", &["SH", "UW"]),
    ("tra", &["T", "R", "AA"]),
    // Holiday vocabulary
    ("falala", &["F", "AH", "L", "AH", "L", "AH"]),
    (
        "christmastime",
        &["K", "R", "IH", "S", "M", "AH", "S", "T", "AY", "M"],
    ),
    ("wintertime", &["W", "IH", "N", "T", "ER", "T", "AY", "M"]),
    (
        "jinglebell",
        &["JH", "IH", "NG", "G", "AH", "L", "B", "EH", "L"],
    ),
    ("christmasy", &["K", "R", "IH", "S", "M", "AH", "S", "IY"]),
    ("snowman", &["S", "N", "OW", "M", "AE", "N"]),
    ("snowflake", &["S", "N", "OW", "F", "L", "EY", "K"]),
    ("reindeer", &["R", "EY", "N", "D", "IH", "R"]),
    ("sugarplum", &["SH", "UH", "G", "ER", "P", "L", "AH", "M"]),
    ("sleighride", &["S", "L", "EY", "R", "AY", "D"]),
    ("frosty", &["F", "R", "AO", "S", "T", "IY"]),
    ("rudolph", &["R", "UW", "D", "AA", "L", "F"]),
    ("mistletoe", &["M", "IH", "S", "AH", "L", "T", "OW"]),
    ("nutcracker", &["N", "AH", "T", "K", "R", "AE", "K", "ER"]),
    ("marshmallow", &["M", "AA", "R", "SH", "M", "EH", "L", "OW"]),
    ("eggnog", &["EH", "G", "N", "AA", "G"]),
    (
        "gingerbread",
        &["JH", "IH", "N", "JH", "ER", "B", "R", "EH", "D"],
    ),
    ("hallelujah", &["HH", "AE", "L", "AH", "L", "UW", "Y", "AH"]),
    ("bethlehem", &["B", "EH", "TH", "L", "AH", "HH", "EH", "M"]),
    ("noel", &["N", "OW", "EH", "L"]),
    ("yuletide", &["Y", "UW", "L", "T", "AY", "D"]),
    // Halloween vocabulary
    ("spooky", &["S", "P", "UW", "K", "IY"]),
    ("ghostly", &["G", "OW", "S", "T", "L", "IY"]),
    ("boo", &["B", "UW"]),
    ("mwahaha", &["M", "W", "AA", "HH", "AA", "HH", "AA"]),
    ("haha", &["HH", "AA", "HH", "AA"]),
    (
        "muahahaha",
        &["M", "UW", "AA", "HH", "AA", "HH", "AA", "HH", "AA"],
    ),
    ("creepy", &["K", "R", "IY", "P", "IY"]),
    ("eerie", &["IH", "R", "IY"]),
    ("werewolf", &["W", "EH", "R", "W", "UH", "L", "F"]),
    ("zombie", &["Z", "AA", "M", "B", "IY"]),
    ("skeleton", &["S", "K", "EH", "L", "AH", "T", "AH", "N"]),
    ("dracula", &["D", "R", "AE", "K", "Y", "AH", "L", "AH"]),
    (
        "frankenstein",
        &["F", "R", "AE", "NG", "K", "AH", "N", "S", "T", "AY", "N"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_lowercase_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for (word, phonemes) in ENTRIES {
            assert_eq!(*word, word.to_lowercase(), "key not lowercase: {word}");
            assert!(seen.insert(*word), "duplicate key: {word}");
            assert!(!phonemes.is_empty(), "empty pronunciation: {word}");
        }
    }

    #[test]
    fn entries_use_known_symbols() {
        for (word, phonemes) in ENTRIES {
            for p in *phonemes {
                assert!(
                    crate::alignment::arpabet_chars(p).is_some(),
                    "{word}: unmapped symbol {p}"
                );
            }
        }
    }
}
