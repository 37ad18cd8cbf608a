pub mod dto;
pub mod error;
pub mod hints;
pub mod usecase;

pub use dto::*;
pub use error::*;
pub use hints::{parse_line_hints, parse_word_hints};
pub use usecase::{
    AnalyzeStructureUseCase, AnalyzeStructureUseCaseImpl, TimeLyricsUseCase, TimeLyricsUseCaseImpl,
};
