//! CTC forced alignment: token construction, Viterbi decoding, and
//! conversion of decoded paths into timed spans.

mod spans;
mod tokenization;
mod viterbi;

pub use spans::{distribute_evenly, enforce_monotonic, fit_phonemes_to_word, path_to_word_timings};
pub use tokenization::{arpabet_chars, build_token_sequence, SeparatorStyle};
pub use viterbi::forced_align_viterbi;
