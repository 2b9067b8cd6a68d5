//! NDC cleanup - canonicalizes raw NDC values into the 10-digit join key.

use crate::error::Result;
use polars::prelude::*;

/// Normalize a raw NDC value to its canonical 10-digit form.
///
/// Strips every non-digit character, keeps the trailing 10 digits when the
/// value is longer (source systems prefix extraneous digits beyond the
/// 10/11-digit NDC encodings), and left-pads with zeros to width 10.
/// An input with no digits at all comes out as ten zeros; that boundary
/// matches the upstream data convention and is relied on by callers.
pub fn normalize_ndc(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail = if digits.len() > 10 {
        &digits[digits.len() - 10..]
    } else {
        digits.as_str()
    };
    format!("{:0>10}", tail)
}

/// Replace the `NDC` column of `df` with its normalized form.
///
/// The column is cast to string first so numeric NDC columns (a common result
/// of CSV schema inference, which also drops leading zeros) normalize the same
/// way as text ones. Null NDC values stay null.
pub fn normalize_ndc_column(df: &mut DataFrame) -> Result<()> {
    let raw = df.column("NDC")?.cast(&DataType::String)?;
    let normalized: StringChunked = raw
        .str()?
        .into_iter()
        .map(|value| value.map(normalize_ndc))
        .collect();
    df.with_column(normalized.with_name("NDC").into_series())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_pads() {
        assert_eq!(normalize_ndc("123-45-6789"), "0123456789");
        assert_eq!(normalize_ndc("123-456-78"), "0012345678");
        assert_eq!(normalize_ndc(" 0012345678 "), "0012345678");
    }

    #[test]
    fn test_keeps_trailing_ten_digits() {
        assert_eq!(normalize_ndc("12345678901234"), "5678901234");
        assert_eq!(normalize_ndc("00123456789"), "0123456789");
    }

    #[test]
    fn test_no_digits_becomes_all_zeros() {
        assert_eq!(normalize_ndc(""), "0000000000");
        assert_eq!(normalize_ndc("--- "), "0000000000");
    }

    #[test]
    fn test_always_ten_digits() {
        for raw in ["1", "abc123", "999999999999999", "12-34"] {
            let normalized = normalize_ndc(raw);
            assert_eq!(normalized.len(), 10);
            assert!(normalized.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_idempotent() {
        for raw in ["123-45-6789", "12345678901234", "", "42"] {
            let once = normalize_ndc(raw);
            assert_eq!(normalize_ndc(&once), once);
        }
    }

    #[test]
    fn test_column_normalization_keeps_nulls() {
        let mut df = df! [
            "NDC" => [Some("123-45-6789"), None, Some("")]
        ]
        .unwrap();

        normalize_ndc_column(&mut df).unwrap();

        let ndc = df.column("NDC").unwrap().str().unwrap();
        assert_eq!(ndc.get(0), Some("0123456789"));
        assert_eq!(ndc.get(1), None);
        assert_eq!(ndc.get(2), Some("0000000000"));
    }

    #[test]
    fn test_column_normalization_casts_numeric_ndc() {
        // Schema inference reads bare NDCs as integers and drops leading
        // zeros; zero-padding must recover them.
        let mut df = df! [
            "NDC" => [Some(12345678i64), None]
        ]
        .unwrap();

        normalize_ndc_column(&mut df).unwrap();

        let ndc = df.column("NDC").unwrap().str().unwrap();
        assert_eq!(ndc.get(0), Some("0012345678"));
        assert_eq!(ndc.get(1), None);
    }
}
