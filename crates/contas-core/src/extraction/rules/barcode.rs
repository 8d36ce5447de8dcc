//! Boleto payment line (linha digitável) extraction.

use super::patterns::BARCODE_PATTERNS;
use super::{Candidate, FieldExtractor};

/// Shortest accepted payment line (raw barcode).
pub const MIN_BARCODE_DIGITS: usize = 44;

/// Longest accepted payment line (utility bills).
pub const MAX_BARCODE_DIGITS: usize = 48;

/// Barcode field extractor.
///
/// Runs on the raw OCR text; letter-to-digit cleanup would corrupt the
/// digit count. Among valid reads the longest wins, since a partial read
/// loses digits rather than gaining them.
pub struct BarcodeExtractor;

impl BarcodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BarcodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BarcodeExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<Candidate<String>> {
        let mut results: Vec<Candidate<String>> = Vec::new();

        for (tier, pattern) in BARCODE_PATTERNS.iter().enumerate() {
            for m in pattern.find_iter(text) {
                let Some(digits) = normalize_barcode(m.as_str()) else { continue };

                // Lower tiers often re-read the same line.
                if results.iter().any(|r| r.value == digits) {
                    continue;
                }

                let priority = digits.len() as f64;
                results.push(
                    Candidate::new(digits, priority, tier, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results.sort_by(|a, b| {
            b.value
                .len()
                .cmp(&a.value.len())
                .then_with(|| a.tier.cmp(&b.tier))
                .then_with(|| a.position.0.cmp(&b.position.0))
        });

        results
    }
}

/// Strip separators and keep the line only if it has 44 to 48 digits.
pub fn normalize_barcode(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if (MIN_BARCODE_DIGITS..=MAX_BARCODE_DIGITS).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}

/// Extract the boleto payment line from text.
pub fn extract_barcode(text: &str) -> Option<String> {
    BarcodeExtractor::new().extract(text).map(|c| c.value)
}

/// Format a 47-digit bank line as printed: `AAAAA.AAAAA BBBBB.BBBBBB CCCCC.CCCCCC D EEEEEEEEEEEEEE`.
///
/// Other lengths are returned unchanged.
pub fn format_payment_line(digits: &str) -> String {
    if digits.len() != 47 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_string();
    }

    format!(
        "{}.{} {}.{} {}.{} {} {}",
        &digits[0..5],
        &digits[5..10],
        &digits[10..15],
        &digits[15..21],
        &digits[21..26],
        &digits[26..32],
        &digits[32..33],
        &digits[33..47],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn digits(n: usize) -> String {
        (0..n).map(|i| char::from(b'0' + (i % 10) as u8)).collect()
    }

    #[test]
    fn test_accepts_47_and_48_digits() {
        for n in [47, 48] {
            let line = digits(n);
            let text = format!("Linha digitavel\n{line}\nAutenticacao mecanica");
            assert_eq!(extract_barcode(&text), Some(line), "{n} digits");
        }
    }

    #[test]
    fn test_rejects_43_and_49_digits() {
        for n in [43, 49] {
            let text = format!("Linha digitavel\n{}\n", digits(n));
            assert_eq!(extract_barcode(&text), None, "{n} digits");
        }
    }

    #[test]
    fn test_loose_44_digit_run() {
        let line = format!("{} {}", digits(20), digits(24));
        assert_eq!(extract_barcode(&line).map(|b| b.len()), Some(44));
    }

    #[test]
    fn test_spaced_boleto_line() {
        let text = "Pague até o vencimento\n23793.38128 60000.123456 78901.234567 8 96610000015000\n";
        assert_eq!(
            extract_barcode(text),
            Some("23793381286000012345678901234567896610000015000".to_string())
        );
    }

    #[test]
    fn test_utility_line() {
        let text = "83640000001-1 50000048100-5 52025031500-7 00000000000-1";
        let barcode = extract_barcode(text).unwrap();
        assert_eq!(barcode.len(), 48);
        assert!(barcode.starts_with("836400000011"));
    }

    #[test]
    fn test_longest_read_wins() {
        let text = format!("{}\n{}", digits(45), digits(48));
        let all = BarcodeExtractor::new().extract_all(&text);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].value.len(), 48);
    }

    #[test]
    fn test_normalize_barcode() {
        assert_eq!(normalize_barcode("1234"), None);
        assert_eq!(normalize_barcode(&format!("{}.{}", digits(22), digits(22))).map(|b| b.len()), Some(44));
    }

    #[test]
    fn test_format_payment_line() {
        let raw = "23793381286000012345678901234567896610000015000";
        assert_eq!(
            format_payment_line(raw),
            "23793.38128 60000.123456 78901.234567 8 96610000015000"
        );
        assert_eq!(format_payment_line("123"), "123");
    }
}
