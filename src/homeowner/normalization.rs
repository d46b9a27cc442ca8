// WHY: standalone normalization so batch callers can reuse one buffer per worker

/// Normalize a raw homeowner line: trim the ends and collapse every whitespace run to one space
/// Case and punctuation are preserved
pub fn normalize_line(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_line_into(text, &mut result);
    result
}

/// Normalize into supplied buffer to avoid allocation
pub fn normalize_line_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    // WHY: split_whitespace covers \t, \r\n and Unicode spaces that spreadsheets leave behind
    for word in text.split_whitespace() {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(word);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_basic() {
        assert_eq!(normalize_line("  Mr   John    Smith  "), "Mr John Smith");
    }

    #[test]
    fn test_normalize_line_into_buffer_reuse() {
        let mut buffer = String::new();

        normalize_line_into("Mr\tJohn Smith", &mut buffer);
        assert_eq!(buffer, "Mr John Smith");

        normalize_line_into("Dr &\r\nMrs Joe Bloggs", &mut buffer);
        assert_eq!(buffer, "Dr & Mrs Joe Bloggs");
    }

    #[test]
    fn test_normalize_line_empty() {
        assert_eq!(normalize_line(""), "");
        assert_eq!(normalize_line(" \t\n "), "");
    }

    #[test]
    fn test_normalize_line_preserves_case_and_punctuation() {
        assert_eq!(normalize_line("mrs  F.  HUGHES-eastwood"), "mrs F. HUGHES-eastwood");
    }

    #[test]
    fn test_normalize_line_unicode_whitespace() {
        let input = "Mr\u{00A0}John\u{2003}Smith";
        assert_eq!(normalize_line(input), "Mr John Smith");
    }
}
