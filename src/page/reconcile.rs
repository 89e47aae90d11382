//! Text reconciliation
//!
//! Flattens the fragmented runs of one page into a single string while
//! keeping an exact map from every character offset back to the run that
//! produced it. The map never loses precision here; all fuzzy comparison
//! belongs to the locator.

use super::runs::TextRun;

/// One run's slice of the reconciled flat text.
///
/// Offsets are char offsets, not bytes. `[char_start, char_end)` entries
/// are contiguous and tile the flat text exactly. When a separator space
/// was inserted after the run it is attributed to this entry as trailing
/// filler: `char_end` covers it, while the run's own text occupies
/// `[char_start, char_start + text_char_len)`. The filler has no
/// geometric meaning and is clamped away by the highlight mapper.
#[derive(Debug, Clone)]
pub struct RunEntry {
    pub char_start: usize,
    pub char_end: usize,
    /// Char length of the run's own text, excluding any trailing filler.
    pub text_char_len: usize,
    pub run: TextRun,
}

impl RunEntry {
    /// Exclusive end of the run's own text, excluding trailing filler.
    pub fn text_end(&self) -> usize {
        self.char_start + self.text_char_len
    }
}

/// Flattened page text plus the offset map back to source runs.
///
/// Owned by one render session; rebuilt whenever the run set changes and
/// never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct ReconciledPage {
    pub flat_text: String,
    pub entries: Vec<RunEntry>,
    char_len: usize,
}

impl ReconciledPage {
    /// Reconcile a page's runs in the order given.
    ///
    /// A single space is inserted between adjacent runs when neither side
    /// already has boundary whitespace. Empty and whitespace-only runs
    /// are dropped before reconciliation. Zero runs yield an empty page.
    pub fn from_runs(runs: &[TextRun]) -> Self {
        let mut flat_text = String::new();
        let mut entries: Vec<RunEntry> = Vec::new();
        let mut cursor = 0usize;

        for run in runs {
            if run.text.trim().is_empty() {
                continue;
            }

            let needs_separator = !flat_text.is_empty()
                && !flat_text.ends_with(char::is_whitespace)
                && !run.text.starts_with(char::is_whitespace);
            if needs_separator {
                flat_text.push(' ');
                cursor += 1;
                if let Some(previous) = entries.last_mut() {
                    previous.char_end += 1;
                }
            }

            let text_char_len = run.text.chars().count();
            flat_text.push_str(&run.text);
            entries.push(RunEntry {
                char_start: cursor,
                char_end: cursor + text_char_len,
                text_char_len,
                run: run.clone(),
            });
            cursor += text_char_len;
        }

        Self {
            flat_text,
            entries,
            char_len: cursor,
        }
    }

    /// Length of the flat text in chars.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry containing the given char offset.
    pub fn entry_at(&self, offset: usize) -> Option<&RunEntry> {
        let idx = self.entries.partition_point(|e| e.char_end <= offset);
        self.entries.get(idx).filter(|e| e.char_start <= offset)
    }

    /// Entries overlapping `[start, end)`, in run order.
    pub fn entries_overlapping(&self, start: usize, end: usize) -> impl Iterator<Item = &RunEntry> {
        self.entries
            .iter()
            .skip_while(move |e| e.char_end <= start)
            .take_while(move |e| e.char_start < end)
    }
}
