//! CLI commands and terminal rendering.
//!
//! The interactive session (no subcommand) stands in for the new-tab page:
//! it shows an idiom immediately and then takes single-letter commands, the
//! way the page takes button clicks. One-shot subcommands cover the rest of
//! the surface.

use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};

use idiom_core::IdiomRecord;

use crate::session::{Selection, Session};

/// One-shot commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show the next idiom and exit
    Next,

    /// List saved idioms
    Saved {
        /// Number of saved idioms to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Credential and cache settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

/// Settings operations.
#[derive(Debug, Clone, Subcommand)]
pub enum SettingsCommands {
    /// Store the generation API key
    SetKey {
        /// The API key to store
        key: String,
    },

    /// Issue a minimal generation request to verify the stored key
    Test,

    /// Clear the idiom cache and seen history (favorites survive)
    ClearCache,
}

/// Render one idiom card to stdout.
pub fn render_card(record: &IdiomRecord) {
    println!();
    println!("  [{}]", record.language_name);
    println!();
    println!("  {}", record.idiom);
    if let Some(transliteration) = &record.transliteration {
        println!("  {transliteration}");
    }
    println!();
    println!("  {}", record.meaning_en);
    if !record.example_native.is_empty() {
        println!();
        println!("  \u{201c}{}\u{201d}", record.example_native);
        println!("  \u{201c}{}\u{201d}", record.example_en);
    }
    if let Some(origin) = &record.origin {
        println!();
        println!("  Origin: {origin}");
    }
    println!();
}

/// Render a selection outcome, leaving prior output untouched on failure.
pub fn render_selection(selection: &Selection) {
    match selection {
        Selection::Idiom(record) => render_card(record),
        Selection::Unavailable { notice } => println!("{notice}"),
        Selection::Busy => {}
    }
}

/// Render the saved list.
pub fn render_saved(saved: &[IdiomRecord], count: usize) {
    if saved.is_empty() {
        println!("No saved idioms yet.");
        return;
    }
    for (index, record) in saved.iter().take(count).enumerate() {
        println!(
            "{:>3}. {} ({}) - {}",
            index + 1,
            record.idiom,
            record.language_name,
            record.meaning_en
        );
    }
}

/// Run the interactive session loop.
///
/// Shows an idiom on entry, then: `n`/enter for the next idiom, `f` to
/// toggle favorite, `s` to list saved idioms, `s <n>` to re-display a saved
/// one, `q` to quit.
pub async fn interactive(session: &Session) -> Result<(), crate::store::StoreError> {
    render_selection(&session.next().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("[n]ext  [f]avorite  [s]aved  [q]uit");
        let Ok(Some(line)) = lines.next_line().await else {
            break;
        };

        match line.trim() {
            "" | "n" => render_selection(&session.next().await?),
            "f" => match session.toggle_favorite().await? {
                Some(true) => println!("Saved!"),
                Some(false) => println!("Removed from saved"),
                None => println!("Nothing on display yet"),
            },
            "s" => render_saved(&session.saved().await, usize::MAX),
            "q" => break,
            other => match other.strip_prefix("s ").and_then(|n| n.trim().parse::<usize>().ok()) {
                Some(n) if n >= 1 => match session.show_saved(n - 1).await {
                    Some(record) => render_card(&record),
                    None => println!("No saved idiom #{n}"),
                },
                _ => println!("Unknown command: {other}"),
            },
        }
    }
    Ok(())
}
