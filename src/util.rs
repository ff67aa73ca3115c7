//! Code point classifications used throughout the parser

/// <https://url.spec.whatwg.org/#c0-control-or-space>
pub(crate) fn is_c0_or_space(c: char) -> bool {
    c == ' ' || c <= '\u{001F}'
}

/// <https://infra.spec.whatwg.org/#ascii-tab-or-newline>
pub(crate) fn is_ascii_tab_or_newline(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
}

/// <https://url.spec.whatwg.org/#url-code-points>
pub(crate) fn is_url_codepoint(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric()
            | matches!(
                c,
                '!' | '$'
                    | '&'
                    | '\''
                    | '('
                    | ')'
                    | '*'
                    | '+'
                    | ','
                    | '-'
                    | '.'
                    | '/'
                    | ':'
                    | ';'
                    | '='
                    | '?'
                    | '@'
                    | '_'
                    | '~'
            );
    }

    // The remaining range is U+00A0 to U+10FFFD, minus noncharacters.
    // Surrogates cannot occur in a char.
    let code_point = c as u32;
    (0xA0..=0x10_FFFD).contains(&code_point)
        && !(0xFDD0..=0xFDEF).contains(&code_point)
        && code_point & 0xFFFE != 0xFFFE
}

/// Whether the next two code points are ASCII hex digits
///
/// Used to validate `%` escapes while parsing; a failed check is only ever
/// a validation error, the escape is kept as-is.
pub(crate) fn starts_with_two_hex_digits<I>(mut chars: I) -> bool
where
    I: Iterator<Item = char>,
{
    chars.next().is_some_and(|c| c.is_ascii_hexdigit())
        && chars.next().is_some_and(|c| c.is_ascii_hexdigit())
}

/// <https://url.spec.whatwg.org/#single-dot-path-segment>
pub(crate) fn is_single_dot_path_segment(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

/// <https://url.spec.whatwg.org/#double-dot-path-segment>
pub(crate) fn is_double_dot_path_segment(segment: &str) -> bool {
    segment.len() <= 6
        && matches!(
            segment.to_ascii_lowercase().as_str(),
            ".." | ".%2e" | "%2e." | "%2e%2e"
        )
}

/// <https://url.spec.whatwg.org/#windows-drive-letter>
pub(crate) fn is_windows_drive_letter(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':' | '|'), None) if letter.is_ascii_alphabetic()
    )
}

/// <https://url.spec.whatwg.org/#normalized-windows-drive-letter>
pub(crate) fn is_normalized_windows_drive_letter(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':'), None) if letter.is_ascii_alphabetic()
    )
}

/// <https://url.spec.whatwg.org/#start-with-a-windows-drive-letter>
pub(crate) fn starts_with_windows_drive_letter(input: &[char]) -> bool {
    input.len() >= 2
        && input[0].is_ascii_alphabetic()
        && matches!(input[1], ':' | '|')
        && (input.len() == 2 || matches!(input[2], '/' | '\\' | '?' | '#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_codepoints() {
        assert!(is_url_codepoint('a'));
        assert!(is_url_codepoint('~'));
        assert!(is_url_codepoint('ü'));
        assert!(is_url_codepoint('💚'));

        assert!(!is_url_codepoint('%'));
        assert!(!is_url_codepoint('"'));
        assert!(!is_url_codepoint('^'));
        assert!(!is_url_codepoint('\u{0000}'));
        assert!(!is_url_codepoint('\u{009F}'));
        assert!(!is_url_codepoint('\u{FDD0}'));
        assert!(!is_url_codepoint('\u{FFFE}'));
        assert!(!is_url_codepoint('\u{FFFF}'));
        assert!(!is_url_codepoint('\u{1FFFE}'));
        assert!(!is_url_codepoint('\u{10FFFF}'));
    }

    #[test]
    fn dot_path_segments() {
        for segment in [".", "%2e", "%2E"] {
            assert!(is_single_dot_path_segment(segment));
            assert!(!is_double_dot_path_segment(segment));
        }

        for segment in [
            "..", ".%2e", ".%2E", "%2e.", "%2e%2e", "%2e%2E", "%2E.", "%2E%2e", "%2E%2E",
        ] {
            assert!(is_double_dot_path_segment(segment));
            assert!(!is_single_dot_path_segment(segment));
        }

        assert!(!is_double_dot_path_segment("..."));
        assert!(!is_single_dot_path_segment("./"));
    }

    #[test]
    fn windows_drive_letters() {
        assert!(is_windows_drive_letter("C:"));
        assert!(is_windows_drive_letter("c|"));
        assert!(!is_windows_drive_letter("C"));
        assert!(!is_windows_drive_letter("C:/"));
        assert!(!is_windows_drive_letter("1:"));

        assert!(is_normalized_windows_drive_letter("C:"));
        assert!(!is_normalized_windows_drive_letter("C|"));

        assert!(starts_with_windows_drive_letter(&['C', ':']));
        assert!(starts_with_windows_drive_letter(&['C', '|', '/', 'x']));
        assert!(starts_with_windows_drive_letter(&['C', ':', '#']));
        assert!(!starts_with_windows_drive_letter(&['C', ':', 'x']));
        assert!(!starts_with_windows_drive_letter(&['C']));
    }
}
