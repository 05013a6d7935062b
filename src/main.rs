//! Main entry point for the ziptext CLI.
//!
//! One-shot modes list an archive or print a single entry, in the spirit of
//! a classic unzip front end. Without them the binary runs a small
//! interactive loop playing the role of the viewer UI: it shows the current
//! entry's text and takes single-letter navigation commands on stdin.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

use ziptext::config::{self, ExtensionList, Settings};
use ziptext::scan::{self, EntryDescriptor, SourceKind};
use ziptext::session::{Session, Update};
use ziptext::{content, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_path = config::settings_path();

    // Settings mode: persist a normalized allow-list and exit.
    if let Some(list) = &cli.save_extensions {
        let settings = Settings {
            extensions: list.clone(),
        };
        settings.save(&settings_path)?;
        if !cli.is_quiet() {
            println!(
                "Saved extension allow-list: {}",
                Settings::load(&settings_path).extensions
            );
        }
        return Ok(());
    }

    let file = PathBuf::from(cli.file.as_deref().context("FILE is required")?);

    // The allow-list is read once per invocation and passed into every scan;
    // -x overrides the stored setting without touching it.
    let extensions = match &cli.extensions {
        Some(raw) => ExtensionList::parse(raw),
        None => ExtensionList::parse(&Settings::load(&settings_path).extensions),
    };

    if cli.is_one_shot() {
        return run_one_shot(&cli, &file, &extensions).await;
    }

    run_interactive(&cli, file, extensions).await
}

/// List entries or print one entry, then exit.
async fn run_one_shot(cli: &Cli, file: &Path, extensions: &ExtensionList) -> Result<()> {
    let result = match scan::source_kind(file) {
        SourceKind::Archive => scan::scan_archive(file, extensions, cli.show_dirs).await?,
        SourceKind::Folder => scan::scan_folder(file).await?,
    };

    if let Some(entry_name) = &cli.entry {
        let descriptor = result
            .entries
            .iter()
            .find(|e| &e.name == entry_name)
            .with_context(|| format!("No entry named {entry_name}"))?;
        let text = content::load_content(file, descriptor).await?;
        print!("{text}");
        return Ok(());
    }

    for entry in &result.entries {
        if cli.verbose {
            let kind = if entry.is_directory { "dir" } else { "file" };
            println!("{:>16}  {:>4}  {}", format_entry_time(entry), kind, entry.name);
        } else {
            println!("{}", entry.name);
        }
    }
    Ok(())
}

/// Drive a session from stdin commands until quit or end of input.
async fn run_interactive(cli: &Cli, file: PathBuf, extensions: ExtensionList) -> Result<()> {
    let quiet = cli.is_quiet();
    let (mut session, mut completions) = Session::new(extensions, cli.show_dirs);
    session.open(file);

    if !quiet {
        println!("Commands: n)ext p)rev g)oto <N> l)ist d)irs o)pen <file> c)opy i)nfo q)uit");
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut displayed = String::new();

    loop {
        tokio::select! {
            Some(outcome) = completions.recv() => {
                for update in session.apply(outcome) {
                    render_update(update, &session, &mut displayed, quiet);
                }
            }
            line = lines.next_line() => {
                match line? {
                    None => break,
                    Some(line) => {
                        if !handle_command(line.trim(), &mut session, &displayed, quiet) {
                            break;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Dispatch one interactive command. Returns `false` to quit.
fn handle_command(line: &str, session: &mut Session, displayed: &str, quiet: bool) -> bool {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        None => {}
        Some("n") => session.next(),
        Some("p") => session.prev(),
        Some("g") => match tokens.next().and_then(|t| t.parse::<usize>().ok()) {
            Some(index) => session.jump_to(index),
            None => println!("usage: g <index>"),
        },
        Some("l") => print_listing(session),
        Some("d") => session.toggle_dirs(),
        Some("o") => match tokens.next() {
            Some(path) => session.open(PathBuf::from(path)),
            None => println!("usage: o <file>"),
        },
        Some("c") => match copy_to_clipboard(displayed) {
            Ok(()) => {
                if !quiet {
                    println!("Copied {} chars to clipboard", displayed.chars().count());
                }
            }
            Err(err) => println!("Error: {err:#}"),
        },
        Some("i") => print_info(session),
        Some("q") => return false,
        Some(_) => {
            println!("Commands: n)ext p)rev g)oto <N> l)ist d)irs o)pen <file> c)opy i)nfo q)uit");
        }
    }
    true
}

fn render_update(update: Update, session: &Session, displayed: &mut String, quiet: bool) {
    match update {
        Update::ScanComplete { total, .. } => {
            if !quiet {
                println!("Scanned {total} entries");
            }
        }
        Update::Content(text) => {
            if !quiet {
                if let (Some(entry), Some(index)) = (session.current(), session.cursor()) {
                    println!(
                        "=== FILE: {} ({}/{}) ===",
                        entry.name,
                        index + 1,
                        session.entries().len()
                    );
                }
            }
            println!("{text}");
            *displayed = text;
        }
        Update::Error(message) => {
            let rendered = format!("Error: {message}");
            println!("{rendered}");
            *displayed = rendered;
        }
    }
}

fn print_listing(session: &Session) {
    for (index, entry) in session.entries().iter().enumerate() {
        let marker = if session.cursor() == Some(index) { '>' } else { ' ' };
        println!("{marker} {index:>3}  {}", entry.name);
    }
}

fn print_info(session: &Session) {
    match session.current() {
        Some(entry) => {
            let kind = if entry.is_directory {
                "directory"
            } else if entry.in_archive {
                "archive entry"
            } else {
                "file"
            };
            println!("{}  {}  {}", entry.name, kind, format_entry_time(entry));
        }
        None => println!("No entry selected"),
    }
}

/// Format an entry timestamp: packed DOS date/time for archive entries,
/// epoch milliseconds for folder entries.
fn format_entry_time(entry: &EntryDescriptor) -> String {
    if entry.in_archive {
        let date = (entry.last_modified >> 16) as u16;
        let time = (entry.last_modified & 0xFFFF) as u16;
        let day = date & 0x1F;
        let month = (date >> 5) & 0x0F;
        let year = ((date >> 9) & 0x7F) + 1980;
        let minute = (time >> 5) & 0x3F;
        let hour = time >> 11;
        format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")
    } else {
        chrono::DateTime::from_timestamp_millis(entry.last_modified as i64)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    if text.is_empty() {
        bail!("nothing to copy");
    }
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}
