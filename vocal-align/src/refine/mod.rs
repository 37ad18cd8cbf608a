//! Post-alignment refinement passes. Both passes keep the word list
//! sorted and every word's phonemes tiling its span.

mod onset;
mod vowel;

pub use onset::{refine_with_envelope, refine_word_onsets};
pub use vowel::enforce_vowel_durations;
