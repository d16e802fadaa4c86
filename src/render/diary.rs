//! Diary listing: the most recent entries that carry a note.

use crate::core::entry::MoodEntry;

/// Last `k` noted entries, oldest first. Multi-line notes keep their
/// line breaks, indented under the bullet.
#[must_use]
pub fn diary_lines(entries: &[MoodEntry], k: usize) -> Vec<String> {
    let noted: Vec<&MoodEntry> = entries.iter().filter(|e| e.has_note()).collect();
    if noted.is_empty() || k == 0 {
        return vec!["No diary notes yet.".to_owned()];
    }
    let shown = &noted[noted.len().saturating_sub(k)..];

    let mut out = vec![format!("=== Last {} diary notes ===", shown.len())];
    for e in shown {
        out.push(format!(
            "{} (score {})",
            e.timestamp.format("%Y-%m-%d %H:%M"),
            e.score
        ));
        for (i, line) in e.note.lines().enumerate() {
            let bullet = if i == 0 { "- " } else { "  " };
            out.push(format!("{bullet}{line}"));
        }
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::{Score, parse_timestamp};

    fn e(ts: &str, s: i64, note: &str) -> MoodEntry {
        MoodEntry::at(parse_timestamp(ts).unwrap(), Score::try_from(s).unwrap(), note)
    }

    #[test]
    fn test_only_noted_entries_newest_k() {
        let entries = [
            e("2026-06-01 09:00:00", 5, "first"),
            e("2026-06-02 09:00:00", 6, ""),
            e("2026-06-03 09:00:00", 7, "second"),
            e("2026-06-04 21:15:00", 8, "third\nwith more"),
        ];
        let lines = diary_lines(&entries, 2);
        assert_eq!(
            lines,
            vec![
                "=== Last 2 diary notes ===",
                "2026-06-03 09:00 (score 7)",
                "- second",
                "",
                "2026-06-04 21:15 (score 8)",
                "- third",
                "  with more",
                "",
            ]
        );
    }

    #[test]
    fn test_no_notes() {
        let entries = [e("2026-06-02 09:00:00", 6, "")];
        assert_eq!(diary_lines(&entries, 10), vec!["No diary notes yet."]);
        assert_eq!(diary_lines(&[], 10), vec!["No diary notes yet."]);
    }
}
