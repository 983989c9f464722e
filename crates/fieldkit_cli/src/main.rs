//! `fieldkit` executable: pick columns from the first sheet of an `.xlsx`
//! workbook, preview them and export them to a new workbook.
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use fieldkit_select::{AppState, EnumAction, FileStorage, HistoryStore};

mod commands;
mod conf;
mod host;
mod render;
mod repl;
#[cfg(test)]
mod test_util;

use commands::EnumColumnSource;
use conf::{C_ENV_HISTORY_DIR, resolve_history_dir, resolve_out_dir};

#[derive(Parser, Debug)]
#[command(name = "fieldkit", version, about)]
struct Cli {
    /// Log filter directive (`warn`, `debug`, `fieldkit_select=trace`, `off`).
    #[arg(long, global = true, env = fieldkit_log::C_ENV_LOG_LEVEL)]
    log_level: Option<String>,

    /// Directory holding saved column presets.
    #[arg(long, global = true, value_name = "DIR", env = C_ENV_HISTORY_DIR)]
    history_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: EnumCliCommand,
}

#[derive(Subcommand, Debug)]
enum EnumCliCommand {
    /// List the header row of the first sheet.
    Headers {
        /// Input workbook.
        file: PathBuf,
    },
    /// Show the first rows of the selected (or all) columns.
    Preview {
        /// Input workbook.
        file: PathBuf,
        /// Columns separated by commas, semicolons or whitespace.
        #[arg(long)]
        columns: Option<String>,
    },
    /// Write the selected columns to `<stem>-extracted.xlsx`.
    Extract {
        /// Input workbook.
        file: PathBuf,
        /// Columns separated by commas, semicolons or whitespace.
        #[arg(long, required_unless_present = "preset", conflicts_with = "preset")]
        columns: Option<String>,
        /// Use saved preset N (see `history list`).
        #[arg(long)]
        preset: Option<usize>,
        /// Output sheet name.
        #[arg(long)]
        sheet_name: Option<String>,
        /// Output directory.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Interactive session reading commands from stdin (`help` lists them).
    Session {
        /// Workbook to load on start.
        file: Option<PathBuf>,
        /// Output directory for exports.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Inspect or clear saved presets.
    History {
        #[command(subcommand)]
        command: EnumHistoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EnumHistoryCommand {
    /// List presets, newest first.
    List,
    /// Remove all presets.
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    fieldkit_log::init_logger(cli.log_level.as_deref())?;

    let open_history = || -> Result<HistoryStore<FileStorage>> {
        let path_dir = resolve_history_dir(cli.history_dir.clone())?;
        tracing::debug!(dir = %path_dir.display(), "preset storage");
        Ok(HistoryStore::new(FileStorage::new(path_dir)))
    };
    let mut stdout = io::stdout().lock();

    match cli.command {
        EnumCliCommand::Headers { ref file } => commands::cmd_headers(file, &mut stdout),
        EnumCliCommand::Preview {
            ref file,
            ref columns,
        } => commands::cmd_preview(file, columns.as_deref(), &mut stdout),
        EnumCliCommand::Extract {
            ref file,
            ref columns,
            preset,
            ref sheet_name,
            ref out_dir,
        } => {
            let source = match (columns, preset) {
                (_, Some(n_idx)) => EnumColumnSource::Preset(n_idx),
                (Some(c_columns), None) => EnumColumnSource::Names(c_columns.clone()),
                (None, None) => return Err(anyhow!("pass --columns or --preset")),
            };
            commands::cmd_extract(
                open_history()?,
                file,
                source,
                sheet_name.as_deref(),
                &resolve_out_dir(out_dir.clone()),
                &mut stdout,
            )
            .map(|_| ())
        }
        EnumCliCommand::Session {
            ref file,
            ref out_dir,
        } => {
            let mut state = AppState::new(open_history()?);
            let path_dir_out = resolve_out_dir(out_dir.clone());
            if let Some(path_src) = file {
                let l_effects = state.dispatch(EnumAction::BeginImport {
                    path: path_src.clone(),
                });
                host::run_effects(&mut state, l_effects, &path_dir_out);
                writeln!(stdout, "{}", state.status())?;
            }
            repl::run_session(&mut state, io::stdin().lock(), &mut stdout, &path_dir_out)
        }
        EnumCliCommand::History { ref command } => match command {
            EnumHistoryCommand::List => commands::cmd_history_list(&open_history()?, &mut stdout),
            EnumHistoryCommand::Clear => {
                commands::cmd_history_clear(&mut open_history()?, &mut stdout)
            }
        },
    }
}
