/// Escapes special characters for Telegram's MarkdownV2 parse mode so that
/// user-supplied text is displayed literally.
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("_italic_"), "\\_italic\\_");
        assert_eq!(escape_markdown("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_escape_punctuation() {
        assert_eq!(escape_markdown("done!"), "done\\!");
        assert_eq!(escape_markdown("27.09.2025"), "27\\.09\\.2025");
        assert_eq!(escape_markdown("a - b"), "a \\- b");
    }

    #[test]
    fn test_escape_empty_and_plain_text() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("plain text"), "plain text");
        assert_eq!(escape_markdown("123 ABC"), "123 ABC");
    }

    #[test]
    fn test_escape_complex_text() {
        let input = "Reminder: *Call mom* [27.09] (18:00) - set!";
        let expected = "Reminder: \\*Call mom\\* \\[27\\.09\\] \\(18:00\\) \\- set\\!";
        assert_eq!(escape_markdown(input), expected);
    }
}
