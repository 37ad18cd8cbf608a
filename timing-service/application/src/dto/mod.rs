mod analyze_structure;
mod time_lyrics;

pub use analyze_structure::*;
pub use time_lyrics::*;

/// Times cross the wire in seconds rounded to 4 decimal places.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::round4;

    #[test]
    fn round4_keeps_four_decimals() {
        assert_eq!(round4(1.234_56), 1.234_6);
        assert_eq!(round4(0.000_04), 0.0);
        assert_eq!(round4(2.0), 2.0);
    }
}
