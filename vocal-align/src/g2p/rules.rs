//! Rule-based grapheme-to-phoneme fallback for words no dictionary
//! knows. Coarse, but good enough for sung nonsense and coined words.

/// Multi-character spelling patterns, tried longest first.
fn multi_char_rule(segment: &str) -> Option<&'static [&'static str]> {
    let phonemes: &'static [&'static str] = match segment {
        "tion" => &["SH", "AH", "N"],
        "sion" => &["ZH", "AH", "N"],
        "ight" => &["AY", "T"],
        "ough" => &["AO"],
        "ous" => &["AH", "S"],
        "ing" => &["IH", "NG"],
        "ck" => &["K"],
        "sh" => &["SH"],
        "ch" => &["CH"],
        "th" => &["TH"],
        "ph" => &["F"],
        "wh" => &["W"],
        "wr" => &["R"],
        "kn" => &["N"],
        "ng" => &["NG"],
        "qu" => &["K", "W"],
        "ee" => &["IY"],
        "oo" => &["UW"],
        "ea" => &["IY"],
        "ou" => &["AW"],
        "ow" => &["OW"],
        "ai" => &["EY"],
        "ay" => &["EY"],
        "oi" => &["OY"],
        "oy" => &["OY"],
        "au" => &["AO"],
        "aw" => &["AO"],
        _ => return None,
    };
    Some(phonemes)
}

fn single_char_rule(c: char) -> Option<&'static [&'static str]> {
    let phonemes: &'static [&'static str] = match c {
        'a' => &["AE"],
        'b' => &["B"],
        'c' => &["K"],
        'd' => &["D"],
        'e' => &["EH"],
        'f' => &["F"],
        'g' => &["G"],
        'h' => &["HH"],
        'i' => &["IH"],
        'j' => &["JH"],
        'k' => &["K"],
        'l' => &["L"],
        'm' => &["M"],
        'n' => &["N"],
        'o' => &["AA"],
        'p' => &["P"],
        'q' => &["K"],
        'r' => &["R"],
        's' => &["S"],
        't' => &["T"],
        'u' => &["AH"],
        'v' => &["V"],
        'w' => &["W"],
        'x' => &["K", "S"],
        'y' => &["Y"],
        'z' => &["Z"],
        _ => return None,
    };
    Some(phonemes)
}

/// Converts a word to ARPABET phonemes by greedy left-to-right pattern
/// matching. A trailing silent `e` is dropped first; characters no rule
/// covers are skipped. Never returns an empty list.
pub fn grapheme_to_phonemes(word: &str) -> Vec<String> {
    let lower = word.trim().to_lowercase();
    let mut chars: Vec<char> = lower.chars().collect();

    if chars.len() > 2
        && chars.last() == Some(&'e')
        && !matches!(chars[chars.len() - 2], 'a' | 'e' | 'i' | 'o' | 'u')
    {
        chars.pop();
    }

    let mut phonemes = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let mut matched = false;
        for length in [4usize, 3, 2] {
            if i + length > chars.len() {
                continue;
            }
            let segment: String = chars[i..i + length].iter().collect();
            if let Some(mapped) = multi_char_rule(&segment) {
                phonemes.extend(mapped.iter().map(|p| p.to_string()));
                i += length;
                matched = true;
                break;
            }
        }
        if !matched {
            if let Some(mapped) = single_char_rule(chars[i]) {
                phonemes.extend(mapped.iter().map(|p| p.to_string()));
            }
            i += 1;
        }
    }

    if phonemes.is_empty() {
        vec!["AH".to_string()]
    } else {
        phonemes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(word: &str) -> Vec<String> {
        grapheme_to_phonemes(word)
    }

    #[test]
    fn multi_char_patterns_win_over_singles() {
        assert_eq!(convert("night"), ["N", "AY", "T"]);
        assert_eq!(convert("singing"), ["S", "IH", "NG", "IH", "NG"]);
        assert_eq!(convert("nation"), ["N", "AE", "SH", "AH", "N"]);
    }

    #[test]
    fn trailing_silent_e_is_dropped() {
        assert_eq!(convert("love"), ["L", "AA", "V"]);
        // `e` after a vowel letter is kept
        assert_eq!(convert("see"), ["S", "IY"]);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert_eq!(convert("a7b"), ["AE", "B"]);
    }

    #[test]
    fn never_returns_empty() {
        assert_eq!(convert("_"), ["AH"]);
        assert_eq!(convert(""), ["AH"]);
    }

    #[test]
    fn x_expands_to_two_phonemes() {
        assert_eq!(convert("box"), ["B", "AA", "K", "S"]);
    }
}
