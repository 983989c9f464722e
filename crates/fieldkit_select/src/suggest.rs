//! Column-name autocomplete over the free-text input.

use std::sync::LazyLock;

use regex::Regex;

use crate::conf::{C_PATTERN_INPUT_DELIMITERS, C_PATTERN_TOKEN_DELIMITERS, N_SUGGEST_ITEMS_MAX};

static RE_INPUT_DELIMITERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(C_PATTERN_INPUT_DELIMITERS).expect("input delimiter pattern is valid")
});

static RE_TOKEN_DELIMITERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(C_PATTERN_TOKEN_DELIMITERS).expect("token delimiter pattern is valid")
});

////////////////////////////////////////////////////////////////////////////////
// #region InputParsing

/// Split the raw input into candidate names (commas, semicolons, whitespace).
pub fn parse_column_input(raw: &str) -> Vec<String> {
    RE_INPUT_DELIMITERS
        .split(raw)
        .map(str::trim)
        .filter(|c_part| !c_part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fragment after the last token delimiter, trimmed.
///
/// Spaces are not delimiters here, so `"Name, Ci"` yields `"Ci"` and
/// `"First Na"` yields `"First Na"`.
pub fn current_token(input: &str) -> &str {
    RE_TOKEN_DELIMITERS
        .split(input)
        .last()
        .unwrap_or_default()
        .trim()
}

/// Replace only the trailing token of `input` with `choice`.
///
/// Everything up to and including the last delimiter run is kept verbatim;
/// whitespace between that run and the token is dropped, so `"Name, ci"`
/// becomes `"Name,City"`.
pub fn replace_trailing_token(input: &str, choice: &str) -> String {
    match RE_TOKEN_DELIMITERS.find_iter(input).last() {
        Some(m) => format!("{}{choice}", &input[..m.end()]),
        None => choice.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Matching

/// Headers containing `query` case-insensitively, in header order, at most `n_max`.
pub fn match_headers(query: &str, headers: &[String], n_max: usize) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    let c_query = query.to_lowercase();
    headers
        .iter()
        .filter(|c_header| c_header.to_lowercase().contains(&c_query))
        .take(n_max)
        .cloned()
        .collect()
}

/// Byte range of the first case-insensitive occurrence of `query` in `text`.
///
/// Compares char by char with simple lowercase folding, so the range always
/// lies on `text`'s own char boundaries.
pub fn find_case_insensitive(text: &str, query: &str) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }
    let l_query: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    for (n_start, _) in text.char_indices() {
        let mut iter_query = l_query.iter();
        let mut n_end = n_start;
        let mut if_matched = false;
        for (n_offset, ch) in text[n_start..].char_indices() {
            let mut if_mismatch = false;
            for ch_lower in ch.to_lowercase() {
                match iter_query.next() {
                    Some(ch_query) if *ch_query == ch_lower => {}
                    _ => {
                        if_mismatch = true;
                        break;
                    }
                }
            }
            if if_mismatch {
                break;
            }
            n_end = n_start + n_offset + ch.len_utf8();
            if iter_query.as_slice().is_empty() {
                if_matched = true;
                break;
            }
        }
        if if_matched {
            return Some((n_start, n_end));
        }
    }
    None
}

/// Split `text` around the first match of `query` for rendering a highlight.
///
/// Returns `None` when `query` is empty or absent.
pub fn highlight<'a>(text: &'a str, query: &str) -> Option<(&'a str, &'a str, &'a str)> {
    let (n_start, n_end) = find_case_insensitive(text, query)?;
    Some((&text[..n_start], &text[n_start..n_end], &text[n_end..]))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SuggestionState

/// Visible suggestion list with its active row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestState {
    l_items: Vec<String>,
    n_active: Option<usize>,
    c_query: String,
}

impl SuggestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute suggestions for the current input; hides when nothing matches.
    pub fn update(&mut self, input: &str, headers: &[String]) {
        let c_query = current_token(input);
        if c_query.is_empty() || headers.is_empty() {
            self.hide();
            return;
        }
        self.l_items = match_headers(c_query, headers, N_SUGGEST_ITEMS_MAX);
        self.n_active = if self.l_items.is_empty() { None } else { Some(0) };
        self.c_query = c_query.to_string();
    }

    pub fn hide(&mut self) {
        self.l_items.clear();
        self.n_active = None;
        self.c_query.clear();
    }

    pub fn is_visible(&self) -> bool {
        !self.l_items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.l_items
    }

    /// Index of the highlighted row.
    pub fn active(&self) -> Option<usize> {
        self.n_active
    }

    /// Token the list was computed for.
    pub fn query(&self) -> &str {
        &self.c_query
    }

    /// Move the highlight down, wrapping to the first row.
    pub fn select_next(&mut self) {
        let n_len = self.l_items.len();
        if n_len == 0 {
            return;
        }
        self.n_active = Some(self.n_active.map_or(0, |n_idx| (n_idx + 1) % n_len));
    }

    /// Move the highlight up, wrapping to the last row.
    pub fn select_prev(&mut self) {
        let n_len = self.l_items.len();
        if n_len == 0 {
            return;
        }
        self.n_active = Some(self.n_active.map_or(n_len - 1, |n_idx| (n_idx + n_len - 1) % n_len));
    }

    /// Accept row `index` (the active one when `None`).
    ///
    /// Returns the rewritten input and the chosen name, and hides the list.
    /// An out-of-range index leaves everything unchanged.
    pub fn accept(&mut self, index: Option<usize>, input: &str) -> Option<(String, String)> {
        let n_idx = index.or(self.n_active)?;
        let c_choice = self.l_items.get(n_idx)?.clone();
        let c_input = replace_trailing_token(input, &c_choice);
        self.hide();
        Some((c_input, c_choice))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn to_strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_input_splits_on_all_delimiters() {
        assert_eq!(
            parse_column_input("Name, Age，City;Zip\tA\nB  C"),
            to_strings(&["Name", "Age", "City", "Zip", "A", "B", "C"])
        );
        assert!(parse_column_input(" ,; ").is_empty());
    }

    #[test]
    fn current_token_is_trailing_fragment() {
        assert_eq!(current_token("Name, ci"), "ci");
        assert_eq!(current_token("Name,"), "");
        assert_eq!(current_token("First Na"), "First Na");
        assert_eq!(current_token(""), "");
    }

    #[test]
    fn match_is_case_insensitive_and_capped() {
        let l_headers = to_strings(&["Name", "Age", "City", "Agency"]);
        assert_eq!(match_headers("ag", &l_headers, 20), to_strings(&["Age", "Agency"]));
        assert_eq!(match_headers("ag", &l_headers, 1), to_strings(&["Age"]));
        assert!(match_headers("", &l_headers, 20).is_empty());
    }

    #[test]
    fn accept_replaces_only_trailing_token() {
        let l_headers = to_strings(&["Name", "Age", "City"]);
        let mut state = SuggestState::new();
        state.update("Name，Age; ci", &l_headers);
        assert_eq!(state.items(), to_strings(&["City"]).as_slice());
        assert_eq!(state.query(), "ci");

        let (c_input, c_choice) = state.accept(None, "Name，Age; ci").unwrap();
        assert_eq!(c_input, "Name，Age;City");
        assert_eq!(c_choice, "City");
        assert!(!state.is_visible());
    }

    #[test]
    fn accept_after_trailing_delimiter_appends_choice() {
        assert_eq!(replace_trailing_token("Name,", "City"), "Name,City");
        assert_eq!(replace_trailing_token("Name; \t", "City"), "Name; \tCity");
        assert_eq!(replace_trailing_token("ci", "City"), "City");

        let l_headers = to_strings(&["Name", "City"]);
        let mut state = SuggestState::new();
        state.update("ci", &l_headers);
        let (c_input, _) = state.accept(None, "Name,").unwrap();
        assert_eq!(c_input, "Name,City");

        state.update("Name,", &l_headers);
        assert!(!state.is_visible());
        assert!(state.accept(None, "Name,").is_none());
    }

    #[test]
    fn accept_out_of_range_is_rejected() {
        let l_headers = to_strings(&["Name"]);
        let mut state = SuggestState::new();
        state.update("na", &l_headers);
        assert!(state.accept(Some(3), "na").is_none());
        assert!(state.is_visible());
        assert_eq!(state.accept(Some(0), "na"), Some(("Name".to_string(), "Name".to_string())));
    }

    #[test]
    fn navigation_wraps_around() {
        let l_headers = to_strings(&["a1", "a2", "a3"]);
        let mut state = SuggestState::new();
        state.update("a", &l_headers);
        assert_eq!(state.active(), Some(0));
        state.select_prev();
        assert_eq!(state.active(), Some(2));
        state.select_next();
        assert_eq!(state.active(), Some(0));
        state.select_next();
        assert_eq!(state.active(), Some(1));
    }

    #[test]
    fn update_hides_on_trailing_delimiter() {
        let l_headers = to_strings(&["Name"]);
        let mut state = SuggestState::new();
        state.update("na", &l_headers);
        assert!(state.is_visible());
        state.update("Name,", &l_headers);
        assert!(!state.is_visible());
        assert_eq!(state.active(), None);
    }

    #[test]
    fn highlight_splits_around_match() {
        assert_eq!(highlight("Agency", "GEN"), Some(("A", "gen", "cy")));
        assert_eq!(highlight("城市名称", "名"), Some(("城市", "名", "称")));
        assert_eq!(highlight("Name", "x"), None);
        assert_eq!(highlight("Name", ""), None);
    }
}
