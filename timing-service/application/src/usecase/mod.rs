mod analyze_structure;
mod time_lyrics;

pub use analyze_structure::{AnalyzeStructureUseCase, AnalyzeStructureUseCaseImpl};
pub use time_lyrics::{TimeLyricsUseCase, TimeLyricsUseCaseImpl};
