use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;

use crate::{
    config::Config,
    domain::track::Track,
    player::{
        process::MpvBackend,
        session::{PlayOutcome, Session},
    },
    storage::catalog::{Catalog, SortColumn, SortOrder, TrackQuery},
};

#[derive(Parser)]
#[command(name = "mtsp")]
#[command(version = "0.1")]
#[command(about = "Terminal music library manager and playback controller")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Music directory to scan, overrides the configured library root
    #[arg(short = 'd', long)]
    pub dir: Option<PathBuf>,
}

/// Entrypoint for the interactive shell.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load_or_default(cli.config.as_deref())?;

    // The catalog is required for everything; failing to open it is fatal.
    let mut catalog =
        Catalog::new(&cfg.database).with_context(|| "failed to open the track catalog")?;

    let music_root = cli
        .dir
        .or_else(|| cfg.library.resolve_root())
        .ok_or_else(|| anyhow::anyhow!("no music directory configured"))?;

    let mut session = Session::new(Box::new(MpvBackend::new(cfg.player.binary.clone())));

    ignore_sigint();

    shell(
        &mut catalog,
        &mut session,
        &music_root,
        cfg.library.follow_symlinks,
    )
}

/// Ctrl-C must not tear down the shell mid-command; the playback session and
/// playlist stay untouched and the loop keeps reading.
#[cfg(unix)]
fn ignore_sigint() {
    use nix::sys::signal::{SigHandler, Signal, signal};

    // SAFETY: installing SigIgn for SIGINT does not touch any Rust state.
    unsafe {
        let _ = signal(Signal::SIGINT, SigHandler::SigIgn);
    }
}

#[cfg(not(unix))]
fn ignore_sigint() {}

enum ShellFlow {
    Continue,
    Exit,
}

fn shell(
    catalog: &mut Catalog,
    session: &mut Session,
    music_root: &Path,
    follow_symlinks: bool,
) -> anyhow::Result<()> {
    println!("mtsp - terminal soundtrack player");
    println!("Type 'help' for available commands");

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("mtsp> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&cmd) = words.first() else {
            continue;
        };

        match dispatch(
            catalog,
            session,
            music_root,
            follow_symlinks,
            &cmd.to_lowercase(),
            &words[1..],
        ) {
            Ok(ShellFlow::Continue) => {}
            Ok(ShellFlow::Exit) => break,
            // Command-level failure: report and keep the shell alive.
            Err(e) => println!("Error: {e:#}"),
        }
    }

    if let Err(e) = session.stop() {
        log::warn!("failed to stop playback on exit: {e}");
    }
    Ok(())
}

fn dispatch(
    catalog: &mut Catalog,
    session: &mut Session,
    music_root: &Path,
    follow_symlinks: bool,
    cmd: &str,
    args: &[&str],
) -> anyhow::Result<ShellFlow> {
    match cmd {
        "scan" => {
            let added = catalog.scan_library(music_root, follow_symlinks)?;
            println!("Added {added} new tracks to library");
        }

        "list" => {
            let order_by = match args.first() {
                Some(s) => s.parse::<SortColumn>()?,
                None => SortColumn::Filename,
            };
            let sort = match args.get(1) {
                Some(s) => s.parse::<SortOrder>()?,
                None => SortOrder::Ascending,
            };
            let tracks = catalog.query(&TrackQuery {
                order_by,
                sort,
                limit: 20,
                ..Default::default()
            })?;
            display_tracks(&tracks);
        }

        "play" => {
            let tracks = match args.first() {
                Some(pos) => {
                    let position: u32 = pos
                        .parse()
                        .ok()
                        .filter(|&p| p >= 1)
                        .with_context(|| format!("invalid position '{pos}'"))?;
                    let found = catalog.query(&TrackQuery {
                        limit: 1,
                        offset: position - 1,
                        ..Default::default()
                    })?;
                    if found.is_empty() {
                        println!("No track at position {position}.");
                        return Ok(ShellFlow::Continue);
                    }
                    found
                }
                None => catalog.query(&TrackQuery {
                    limit: 10,
                    ..Default::default()
                })?,
            };
            report_play(session.play(Some(tracks))?, session);
        }

        "pause" => {
            if session.pause()? {
                println!("Playback paused.");
            } else {
                println!("Nothing is playing.");
            }
        }

        "resume" => {
            if session.resume()? {
                println!("Playback resumed.");
            } else {
                println!("Nothing is paused.");
            }
        }

        "stop" => {
            session.stop()?;
            println!("Playback stopped.");
        }

        "next" => report_play(session.next()?, session),

        "prev" => report_play(session.previous()?, session),

        "shuffle" => {
            if session.shuffle_playlist() {
                println!("Playlist shuffled.");
            } else {
                println!("Playlist is empty.");
            }
        }

        "search" => {
            if args.is_empty() {
                println!("usage: search <term>");
                return Ok(ShellFlow::Continue);
            }
            let term = args.join(" ");
            let tracks = catalog.query(&TrackQuery {
                search: Some(term),
                ..Default::default()
            })?;
            display_tracks(&tracks);
        }

        "help" => print_help(),

        "exit" => return Ok(ShellFlow::Exit),

        other => println!("Unknown command '{other}'. Type 'help' for available commands."),
    }

    Ok(ShellFlow::Continue)
}

fn report_play(outcome: PlayOutcome, session: &Session) {
    match outcome {
        PlayOutcome::Started => {
            if let Some(track) = session.current_track() {
                println!("Now playing: {} - {}", track.filename, track.artist);
            }
        }
        PlayOutcome::NothingToPlay => println!("No tracks to play."),
    }
}

const ID_WIDTH: usize = 5;
const FILENAME_WIDTH: usize = 30;
const ARTIST_WIDTH: usize = 20;
const ALBUM_WIDTH: usize = 20;
const DURATION_WIDTH: usize = 10;

fn display_tracks(tracks: &[Track]) {
    println!(
        "{:<ID_WIDTH$} {:<FILENAME_WIDTH$} {:<ARTIST_WIDTH$} {:<ALBUM_WIDTH$} {:<DURATION_WIDTH$}",
        "ID", "Filename", "Artist", "Album", "Duration (s)"
    );
    println!(
        "{}",
        "-".repeat(ID_WIDTH + FILENAME_WIDTH + ARTIST_WIDTH + ALBUM_WIDTH + DURATION_WIDTH + 15)
    );

    for track in tracks {
        println!(
            "{:<ID_WIDTH$} {:<FILENAME_WIDTH$} {:<ARTIST_WIDTH$} {:<ALBUM_WIDTH$} {:<DURATION_WIDTH$}",
            track.id,
            truncate_cell(&track.filename, FILENAME_WIDTH),
            truncate_cell(&track.artist, ARTIST_WIDTH),
            truncate_cell(&track.album, ALBUM_WIDTH),
            format_duration(track.duration),
        );
    }
}

/// Trims a cell to the column width, marking cut-off values with an ellipsis.
fn truncate_cell(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let head: String = s.chars().take(width - 3).collect();
        format!("{head}...")
    }
}

fn format_duration(seconds: f64) -> String {
    if seconds > 0.0 {
        format!("{seconds:.2}")
    } else {
        "N/A".to_string()
    }
}

fn print_help() {
    println!(
        "
Available commands:
  scan                  - Scan music library
  list [col] [sort]     - List tracks (optional: sort column, asc/desc)
  play [position]       - Play tracks (optional: start from listing position)
  pause                 - Pause playback
  resume                - Resume playback
  stop                  - Stop playback
  next                  - Next track
  prev                  - Previous track
  shuffle               - Shuffle playlist
  search <term>         - Search tracks
  help                  - Show this help
  exit                  - Exit application
"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_cell_leaves_short_values_alone() {
        assert_eq!(truncate_cell("song.mp3", 30), "song.mp3");
        assert_eq!(truncate_cell("", 5), "");
    }

    #[test]
    fn truncate_cell_cuts_to_width_with_ellipsis() {
        let long = "a-very-long-filename-that-overflows.mp3";
        let cell = truncate_cell(long, 30);

        assert_eq!(cell.chars().count(), 30);
        assert!(cell.ends_with("..."));
        assert!(long.starts_with(cell.trim_end_matches("...")));
    }

    #[test]
    fn truncate_cell_is_safe_on_multibyte_strings() {
        let cell = truncate_cell("Бьорк и её очень длинный альбом", 20);
        assert_eq!(cell.chars().count(), 20);
        assert!(cell.ends_with("..."));
    }

    #[test]
    fn format_duration_renders_missing_as_na() {
        assert_eq!(format_duration(180.0), "180.00");
        assert_eq!(format_duration(0.0), "N/A");
    }
}
