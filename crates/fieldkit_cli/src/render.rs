//! Plain-text rendering of session state for the terminal.

use chrono::DateTime;
use fieldkit_select::{SpecHistoryEntry, SuggestState, highlight};

/// `2023-11-14 22:13 UTC`, or `-` for out-of-range timestamps.
pub fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One line per preset: `[idx] name · columns  (saved ...)`.
pub fn render_history(entries: &[SpecHistoryEntry]) -> String {
    if entries.is_empty() {
        return "(no presets)\n".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(n_idx, entry)| {
            format!(
                "[{n_idx}] {}  (saved {})\n",
                entry.label(),
                format_timestamp(entry.ts)
            )
        })
        .collect()
}

/// Suggestion list with the active row marked `>` and the match in brackets.
pub fn render_suggestions(suggest: &SuggestState) -> String {
    if !suggest.is_visible() {
        return String::new();
    }
    suggest
        .items()
        .iter()
        .enumerate()
        .map(|(n_idx, c_item)| {
            let c_marker = if suggest.active() == Some(n_idx) { ">" } else { " " };
            let c_text = match highlight(c_item, suggest.query()) {
                Some((c_before, c_match, c_after)) => format!("{c_before}[{c_match}]{c_after}"),
                None => c_item.clone(),
            };
            format!("{c_marker} {n_idx}: {c_text}\n")
        })
        .collect()
}

/// Numbered header list.
pub fn render_headers(headers: &[String]) -> String {
    headers
        .iter()
        .enumerate()
        .map(|(n_idx, c_header)| format!("{n_idx:>3}  {c_header}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_formatted_in_utc() {
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13 UTC");
        assert_eq!(format_timestamp(i64::MAX), "-");
    }

    #[test]
    fn suggestions_mark_active_and_match() {
        let mut suggest = SuggestState::new();
        suggest.update("Name, ag", &["Age".to_string(), "Agency".to_string()]);
        suggest.select_next();
        assert_eq!(render_suggestions(&suggest), "  0: [Ag]e\n> 1: [Ag]ency\n");
    }

    #[test]
    fn history_lists_labels_with_index() {
        let entries = vec![SpecHistoryEntry {
            name: "people".to_string(),
            columns: vec!["City".to_string(), "Name".to_string()],
            ts: 1_700_000_000_000,
        }];
        assert_eq!(
            render_history(&entries),
            "[0] people · City, Name  (saved 2023-11-14 22:13 UTC)\n"
        );
        assert_eq!(render_history(&[]), "(no presets)\n");
    }
}
