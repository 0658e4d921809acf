// ============================================================
// Layer 3 — Evidence Document
// ============================================================
// One evidence file attached to a question. TriviaQA ships two
// kinds: web search results and Wikipedia entity pages, stored
// under different directories of the release.

/// Where an evidence document comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceKind {
    /// `evidence/web/<file>` — a search-engine result page
    Web,
    /// `evidence/wikipedia/<file>` — an entity page
    Wikipedia,
}

impl EvidenceKind {
    /// Directory name of this kind under `<root>/evidence/`
    pub fn dir_name(self) -> &'static str {
        match self {
            EvidenceKind::Web       => "web",
            EvidenceKind::Wikipedia => "wikipedia",
        }
    }
}

/// A raw evidence document loaded from disk.
#[derive(Debug, Clone)]
pub struct Document {
    /// The evidence filename, kept for log messages
    pub source: String,

    /// Which evidence directory the file was read from
    pub kind: EvidenceKind,

    /// The full text content before cleaning or paragraph splitting
    pub text: String,
}

impl Document {
    /// Create a new Document.
    ///
    /// Example:
    ///   let doc = Document::new("Kermit.txt", EvidenceKind::Wikipedia, "Kermit is a frog.");
    pub fn new(source: impl Into<String>, kind: EvidenceKind, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            text:   text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_names() {
        assert_eq!(EvidenceKind::Web.dir_name(), "web");
        assert_eq!(EvidenceKind::Wikipedia.dir_name(), "wikipedia");
    }
}
