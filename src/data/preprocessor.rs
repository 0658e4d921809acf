// ============================================================
// Layer 4 — Evidence Preprocessor
// ============================================================
// Turns a raw evidence file into a list of clean paragraphs.
//
// TriviaQA evidence files are scraped web pages and Wikipedia
// dumps with one paragraph per line. They carry:
//   - Non-breaking spaces (U+00A0) and zero-width spaces (U+200B)
//   - Byte order marks (U+FEFF)
//   - Carriage returns from Windows line endings
//   - Tabs and runs of spaces left over from HTML layout
//   - Empty lines between paragraphs
//
// Steps (applied in order):
//   1. Map Unicode whitespace variants and control chars to ' '
//      and '\r' to '\n'
//   2. Split into lines
//   3. Collapse runs of spaces, trim each line
//   4. Drop empty lines
//
// Each surviving line is one paragraph.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Map problematic characters to plain ASCII whitespace.
    fn normalise_chars(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\t' | '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                '\r' => '\n',
                c if c.is_control() && c != '\n' => ' ',
                c => c,
            })
            .collect()
    }

    /// Collapse consecutive spaces into one and trim the ends.
    fn clean_line(line: &str) -> String {
        let mut out        = String::with_capacity(line.len());
        let mut last_space = false;

        for c in line.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }

    /// Split an evidence document into cleaned, non-empty paragraphs.
    pub fn paragraphs(&self, text: &str) -> Vec<String> {
        Self::normalise_chars(text)
            .lines()
            .map(Self::clean_line)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_newlines_and_drops_blanks() {
        let p = Preprocessor::new();
        assert_eq!(
            p.paragraphs("first para\n\n\nsecond para\n"),
            vec!["first para", "second para"]
        );
    }

    #[test]
    fn test_windows_line_endings() {
        let p = Preprocessor::new();
        assert_eq!(p.paragraphs("one\r\ntwo"), vec!["one", "two"]);
    }

    #[test]
    fn test_collapses_spaces_and_odd_whitespace() {
        let p = Preprocessor::new();
        assert_eq!(
            p.paragraphs("  Kermit\u{00A0}\u{00A0}the\tfrog  "),
            vec!["Kermit the frog"]
        );
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.paragraphs("hello\x01world"), vec!["hello world"]);
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert!(p.paragraphs("").is_empty());
    }
}
