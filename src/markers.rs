//! Marker-delimited custom section extraction and injection.
//!
//! A "custom section" is a contiguous span of text delimited by an exact
//! start-marker line and an exact end-marker line. These primitives are pure
//! text transforms — all file I/O lives in [`crate::sync`].

/// Whether extracted sections include the marker lines themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Return the full span, marker lines included.
    WithMarkers,
    /// Return only the text between the marker lines.
    PayloadOnly,
}

/// The start/end marker line pair for one owner's custom sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    start: String,
    end: String,
}

/// A matched section span, as byte offsets into the scanned content.
///
/// `start..end` covers the whole span including both marker lines and the
/// newline after the end marker (when present). `payload_start..payload_end`
/// covers only the text between the marker lines.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    payload_start: usize,
    payload_end: usize,
    end: usize,
}

impl Markers {
    /// Build the marker pair for the given owner.
    ///
    /// Produces `# >>> <owner>'s customizations` and
    /// `# <<< <owner>'s customizations`.
    #[must_use]
    pub fn for_owner(owner: &str) -> Self {
        Self {
            start: format!("# >>> {owner}'s customizations"),
            end: format!("# <<< {owner}'s customizations"),
        }
    }

    /// The exact start-marker line.
    #[must_use]
    pub fn start_line(&self) -> &str {
        &self.start
    }

    /// The exact end-marker line.
    #[must_use]
    pub fn end_line(&self) -> &str {
        &self.end
    }

    /// Locate every section span in document order.
    ///
    /// Matching is non-greedy: each span runs from a start-marker line to the
    /// first following end-marker line. Nesting is not supported; a start
    /// marker with no closing end marker matches nothing.
    fn spans(&self, content: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut open: Option<(usize, usize)> = None;
        let mut offset = 0;

        for line in content.split_inclusive('\n') {
            let text = line.trim_end_matches('\n').trim_end_matches('\r');
            match open {
                None if text == self.start => {
                    open = Some((offset, offset + line.len()));
                }
                Some((start, payload_start)) if text == self.end => {
                    spans.push(Span {
                        start,
                        payload_start,
                        payload_end: offset,
                        end: offset + line.len(),
                    });
                    open = None;
                }
                _ => {}
            }
            offset += line.len();
        }

        spans
    }

    /// Extract all custom sections from `content` in document order.
    ///
    /// Returns an empty vector when no complete marker pair is present — that
    /// is not an error. In [`ExtractMode::PayloadOnly`] the payload is
    /// stripped of surrounding newlines but inner whitespace is preserved.
    #[must_use]
    pub fn extract(&self, content: &str, mode: ExtractMode) -> Vec<String> {
        self.spans(content)
            .iter()
            .map(|span| match mode {
                ExtractMode::WithMarkers => content[span.start..span.end].trim_end().to_string(),
                ExtractMode::PayloadOnly => content[span.payload_start..span.payload_end]
                    .trim_matches(['\r', '\n'])
                    .to_string(),
            })
            .collect()
    }

    /// Remove every custom section (markers included) from `content`.
    ///
    /// The result is trimmed of leading and trailing whitespace, so for
    /// marker-free input this is equivalent to `content.trim()`. Idempotent.
    #[must_use]
    pub fn remove(&self, content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        let mut cursor = 0;
        for span in self.spans(content) {
            out.push_str(&content[cursor..span.start]);
            cursor = span.end;
        }
        out.push_str(&content[cursor..]);
        out.trim().to_string()
    }

    /// Append one fresh custom section holding `payload` to `content`.
    ///
    /// `content` is expected to already be free of sections (see
    /// [`Markers::remove`]); exactly one blank line separates prior content
    /// from the new section and the result ends with exactly one newline.
    #[must_use]
    pub fn inject(&self, content: &str, payload: &str) -> String {
        let section = format!("{}\n{}\n{}\n", self.start, payload.trim(), self.end);
        let prior = content.trim_end();
        if prior.is_empty() {
            section
        } else {
            format!("{prior}\n\n{section}")
        }
    }

    /// Whether a payload counts as empty (only whitespace between markers).
    ///
    /// Empty sections are discarded during merges so repeated deploys never
    /// accumulate blank marker pairs.
    #[must_use]
    pub fn is_empty_payload(payload: &str) -> bool {
        payload.trim().is_empty()
    }
}
