//! OCR noise cleanup applied before numeric matching.

use std::borrow::Cow;

/// Correct common OCR confusions without changing byte offsets.
///
/// `|` is read as `I`, and a lowercase `l` touching a digit is read as `1`
/// (`1l5,00` becomes `115,00`). Letters inside words are left alone so
/// keyword patterns keep matching.
pub fn clean_ocr_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['|', 'l']) {
        return Cow::Borrowed(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let is_digit_at = |i: Option<usize>| {
        i.and_then(|i| chars.get(i))
            .is_some_and(|c| c.is_ascii_digit())
    };

    let cleaned = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| match c {
            '|' => 'I',
            'l' if is_digit_at(i.checked_sub(1)) || is_digit_at(Some(i + 1)) => '1',
            _ => c,
        })
        .collect();

    Cow::Owned(cleaned)
}
