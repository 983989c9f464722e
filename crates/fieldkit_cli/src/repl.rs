//! Line-driven interactive session: one input line, one frame.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fieldkit_select::{AppState, EnumAction, StorageBackend, parse_column_input};

use crate::host::run_effects;
use crate::render::{render_headers, render_history, render_suggestions};

const C_HELP: &str = "\
commands:
  load PATH          import the first sheet of a workbook
  headers            list headers with their index
  pick N             add the header at index N
  add A, B ...       add columns by name
  rm NAME            remove a selected column
  mv FROM TO         move the selected column at FROM to TO
  order A, B ...     set the selection order (same names)
  type TEXT          set the input box text and show suggestions
  next | prev        move the suggestion highlight
  accept [N]         accept the highlighted (or N-th) suggestion
  esc                hide suggestions
  enter              accept the highlight, else add the input text
  sheet NAME         set the output sheet name (blank for default)
  export             write the selected columns to a new workbook
  history            list presets
  preset N           apply preset N
  clear-history      drop all presets
  show               print selection and preview
  help | quit";

/// Parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumReplCommand {
    Load(PathBuf),
    Headers,
    Pick(Option<usize>),
    Add(String),
    Remove(String),
    Move(Option<usize>, Option<usize>),
    Order(String),
    Type(String),
    Next,
    Prev,
    Accept(Option<usize>),
    Esc,
    Enter,
    Sheet(String),
    Export,
    History,
    Preset(Option<usize>),
    ClearHistory,
    Show,
    Help,
    Quit,
}

/// Parse one input line; `Ok(None)` for blank lines.
pub fn parse_repl_command(line: &str) -> Result<Option<EnumReplCommand>, String> {
    let c_line = line.trim_start().trim_end_matches(['\r', '\n']);
    if c_line.trim().is_empty() {
        return Ok(None);
    }
    let (c_verb, c_rest) = c_line.split_once(' ').unwrap_or((c_line, ""));
    let parse_index = |c_raw: &str| c_raw.trim().parse::<usize>().ok();

    let command = match c_verb.trim() {
        "load" => {
            let c_path = c_rest.trim();
            if c_path.is_empty() {
                return Err("usage: load PATH".to_string());
            }
            EnumReplCommand::Load(PathBuf::from(c_path))
        }
        "headers" => EnumReplCommand::Headers,
        "pick" => EnumReplCommand::Pick(parse_index(c_rest)),
        "add" => EnumReplCommand::Add(c_rest.to_string()),
        "rm" => EnumReplCommand::Remove(c_rest.trim().to_string()),
        "mv" => {
            let mut it_args = c_rest.split_whitespace();
            EnumReplCommand::Move(
                it_args.next().and_then(parse_index),
                it_args.next().and_then(parse_index),
            )
        }
        "order" => EnumReplCommand::Order(c_rest.to_string()),
        "type" => EnumReplCommand::Type(c_rest.to_string()),
        "next" => EnumReplCommand::Next,
        "prev" => EnumReplCommand::Prev,
        "accept" => EnumReplCommand::Accept(parse_index(c_rest)),
        "esc" => EnumReplCommand::Esc,
        "enter" => EnumReplCommand::Enter,
        "sheet" => EnumReplCommand::Sheet(c_rest.to_string()),
        "export" => EnumReplCommand::Export,
        "history" => EnumReplCommand::History,
        "preset" => EnumReplCommand::Preset(parse_index(c_rest)),
        "clear-history" => EnumReplCommand::ClearHistory,
        "show" => EnumReplCommand::Show,
        "help" | "?" => EnumReplCommand::Help,
        "quit" | "exit" => EnumReplCommand::Quit,
        c_other => return Err(format!("unknown command `{c_other}`; try `help`")),
    };
    Ok(Some(command))
}

/// Drive `state` from `reader` until `quit` or EOF.
pub fn run_session<B, R, W>(
    state: &mut AppState<B>,
    reader: R,
    writer: &mut W,
    path_dir_out: &Path,
) -> Result<()>
where
    B: StorageBackend,
    R: BufRead,
    W: Write,
{
    flush_frame(state, writer, false)?;
    for res_line in reader.lines() {
        let c_line = res_line.context("Failed to read session input")?;
        let command = match parse_repl_command(&c_line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(c_msg) => {
                writeln!(writer, "{c_msg}")?;
                continue;
            }
        };
        tracing::debug!(command = ?command, "session command");

        let Some(l_actions) = derive_actions(state, command, writer)? else {
            break;
        };
        let c_status_before = state.status().clone();
        for action in l_actions {
            let l_effects = state.dispatch(action);
            run_effects(state, l_effects, path_dir_out);
        }
        if *state.status() != c_status_before {
            writeln!(writer, "{}", state.status())?;
        }
        write!(writer, "{}", render_suggestions(state.suggest()))?;
        flush_frame(state, writer, false)?;
    }
    Ok(())
}

/// Translate a command into actions; `None` ends the session.
///
/// Read-only commands print directly and yield no actions.
fn derive_actions<B: StorageBackend, W: Write>(
    state: &mut AppState<B>,
    command: EnumReplCommand,
    writer: &mut W,
) -> Result<Option<Vec<EnumAction>>> {
    let l_actions = match command {
        EnumReplCommand::Load(path) => vec![EnumAction::BeginImport { path }],
        EnumReplCommand::Headers => {
            write!(writer, "{}", render_headers(state.store().headers()))?;
            vec![]
        }
        EnumReplCommand::Pick(index) => {
            match index.and_then(|n_idx| state.store().headers().get(n_idx)) {
                Some(c_header) => vec![EnumAction::AddNames(vec![c_header.clone()])],
                None => {
                    writeln!(writer, "no header at that index")?;
                    vec![]
                }
            }
        }
        EnumReplCommand::Add(c_raw) => vec![EnumAction::AddNames(parse_column_input(&c_raw))],
        EnumReplCommand::Remove(c_name) => vec![EnumAction::Remove(c_name)],
        EnumReplCommand::Move(from, to) => vec![EnumAction::MoveItem { from, to }],
        EnumReplCommand::Order(c_raw) => vec![EnumAction::Reorder(parse_column_input(&c_raw))],
        EnumReplCommand::Type(c_input) => vec![EnumAction::InputChanged(c_input)],
        EnumReplCommand::Next => vec![EnumAction::SuggestNext],
        EnumReplCommand::Prev => vec![EnumAction::SuggestPrev],
        EnumReplCommand::Accept(index) => vec![EnumAction::SuggestAccept(index)],
        EnumReplCommand::Esc => vec![EnumAction::SuggestHide],
        EnumReplCommand::Enter => vec![EnumAction::InputSubmit],
        EnumReplCommand::Sheet(c_name) => vec![EnumAction::SetSheetName(c_name)],
        EnumReplCommand::Export => vec![EnumAction::Export],
        EnumReplCommand::History => {
            write!(writer, "{}", render_history(&state.history_entries()))?;
            vec![]
        }
        EnumReplCommand::Preset(Some(n_idx)) => vec![EnumAction::ApplyPreset(n_idx)],
        EnumReplCommand::Preset(None) => {
            writeln!(writer, "usage: preset N")?;
            vec![]
        }
        EnumReplCommand::ClearHistory => vec![EnumAction::ClearHistory],
        EnumReplCommand::Show => {
            flush_frame(state, writer, true)?;
            vec![]
        }
        EnumReplCommand::Help => {
            writeln!(writer, "{C_HELP}")?;
            vec![]
        }
        EnumReplCommand::Quit => return Ok(None),
    };
    Ok(Some(l_actions))
}

/// Run one frame; print the preview when it was re-rendered (or when forced).
fn flush_frame<B: StorageBackend, W: Write>(
    state: &mut AppState<B>,
    writer: &mut W,
    if_force: bool,
) -> Result<()> {
    let if_rendered = state.frame();
    if !(if_rendered || if_force) {
        return Ok(());
    }
    if !state.selection().is_empty() {
        writeln!(writer, "selected: {}", state.selection().names().join(", "))?;
    }
    let preview = state.preview();
    if !preview.is_empty() {
        write!(writer, "{preview}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fieldkit_select::{HistoryStore, MemoryStorage};

    use super::*;
    use crate::test_util::write_people_workbook;

    #[test]
    fn parse_handles_arguments_and_unknown_verbs() {
        assert_eq!(parse_repl_command("   "), Ok(None));
        assert_eq!(
            parse_repl_command("mv 2 x"),
            Ok(Some(EnumReplCommand::Move(Some(2), None)))
        );
        assert_eq!(
            parse_repl_command("type Name, ci"),
            Ok(Some(EnumReplCommand::Type("Name, ci".to_string())))
        );
        assert_eq!(
            parse_repl_command("accept"),
            Ok(Some(EnumReplCommand::Accept(None)))
        );
        assert!(parse_repl_command("load").is_err());
        assert!(parse_repl_command("frobnicate").is_err());
    }

    #[test]
    fn scripted_session_exports_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path_src = write_people_workbook(dir.path());
        let c_script = format!(
            "load {}\ntype Name, ci\nenter\nenter\nadd Age Age\nrm Age\nsheet Out\nexport\nhistory\nquit\nadd Name\n",
            path_src.display()
        );

        let mut state = AppState::new(HistoryStore::new(MemoryStorage::new()));
        let mut v_out: Vec<u8> = Vec::new();
        run_session(&mut state, Cursor::new(c_script), &mut v_out, dir.path()).unwrap();
        let c_out = String::from_utf8(v_out).unwrap();

        assert!(c_out.contains("> 0: [Ci]ty"));
        assert!(c_out.contains("[info] added 1, skipped 1 (unknown or duplicate)"));
        assert!(c_out.contains("City | Name\n"));
        assert!(c_out.contains("NYC  | Alice"));
        assert!(c_out.contains("[info] Exported: people-extracted.xlsx"));
        assert!(c_out.contains("[0] people · City, Name"));
        assert!(dir.path().join("people-extracted.xlsx").is_file());
        assert_eq!(
            state.selection().names().to_vec(),
            vec!["City".to_string(), "Name".to_string()]
        );
    }
}
