use std::env;
use std::path::PathBuf;
use std::process::exit;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use wordcards_backend::app_settings::ThemeName;
use wordcards_backend::logger::{self, Level};
use wordcards_backend::lookup::lookup_links;
use wordcards_backend::preferences::{JsonFilePreferences, UserPreferences};
use wordcards_backend::session::{WordSession, open_session};
use wordcards_backend::types::{CatalogEntry, CefrLevel, PoolKind, Selection, TopicFilter, ALL_TOPICS};
use wordcards_backend::{get_app_globals, get_create_wordcards_dir, init_app_globals};

type Session = WordSession<JsonFilePreferences>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vocabulary flashcards from JSON word lists", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optional path to the data directory with the word lists and preferences.
    /// If not provided, the WORDCARDS_DIR environment variable will be used.
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "WORDCARDS_DIR")]
    wordcards_dir: Option<PathBuf>,

    /// Log level for this run (silent, error, warn, info, debug). Overrides LOG_LEVEL.
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a random sample of words. Omitted options use the last saved selection.
    Generate {
        /// Topic label, or "all"
        #[arg(long)]
        topic: Option<String>,

        /// CEFR level (A1, A2, B1, B2, C1, C2)
        #[arg(long, conflicts_with = "level_index")]
        level: Option<CefrLevel>,

        /// Level position from 0 (A1) to 5 (C2)
        #[arg(long)]
        level_index: Option<usize>,

        /// Ignore the level
        #[arg(long, conflicts_with = "no_any_level")]
        any_level: bool,

        /// Filter by level again
        #[arg(long)]
        no_any_level: bool,

        /// Only show favorite words
        #[arg(long, conflicts_with = "all_words")]
        favorites_only: bool,

        /// Show all words, not only favorites
        #[arg(long)]
        all_words: bool,

        /// Number of cards
        #[arg(long)]
        count: Option<usize>,

        /// Seed for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the topic labels
    Topics,

    /// Print catalog counts per topic and level
    Stats,

    /// Add or remove a word from the favorites
    #[command(arg_required_else_help = true)]
    Favorite {
        term: String,
    },

    /// Hide a known word from future samples
    #[command(arg_required_else_help = true)]
    Hide {
        term: String,
    },

    /// Show all hidden words again
    ResetHidden,

    /// Set the theme, or toggle it when no name is given
    Theme {
        name: Option<ThemeName>,
    },
}

struct GenerateOptions {
    topic: Option<String>,
    level: Option<CefrLevel>,
    level_index: Option<usize>,
    any_level: Option<bool>,
    favorites_only: Option<bool>,
    count: Option<usize>,
    seed: Option<u64>,
}

fn parse_log_level(s: &str) -> Result<Level, String> {
    Level::from_name(s).ok_or_else(|| format!("Invalid log level: {}", s))
}

fn flag_choice(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Saves the given options as the new saved selection. The topic is already checked.
fn apply_selection(
    prefs: &mut UserPreferences<JsonFilePreferences>,
    topic: Option<&TopicFilter>,
    opts: &GenerateOptions,
) -> Result<()> {
    if let Some(topic) = topic {
        prefs.set_last_topic(topic)?;
    }

    let level_index = opts.level.map(|l| l.index()).or(opts.level_index);
    if let Some(idx) = level_index {
        prefs.set_level_index(idx)?;
    }

    match opts.any_level {
        Some(any) => prefs.set_any_level(any)?,
        // choosing a level turns the level filter back on
        None if level_index.is_some() => prefs.set_any_level(false)?,
        None => {}
    }

    if let Some(fav_only) = opts.favorites_only {
        prefs.set_favorites_only(fav_only)?;
    }

    Ok(())
}

fn print_card(entry: &CatalogEntry, is_favorite: bool) {
    let star = if is_favorite { "★" } else { "☆" };

    let mut badges = String::new();
    if !entry.part_of_speech.is_empty() {
        badges.push_str(&format!(" [{}]", entry.part_of_speech));
    }
    if !entry.level.is_empty() {
        badges.push_str(&format!(" [{}]", entry.level));
    }

    println!("{} {}{}  ({})", star, entry.term, badges, entry.topic);
    for link in lookup_links(&entry.term) {
        println!("    {} ↗ {}", link.label, link.url);
    }
}

fn print_selection(session: &Session, selection: &Selection) {
    if selection.is_empty() {
        println!("No words found for this selection.");
        return;
    }

    if selection.pool == PoolKind::Fallback {
        println!("No exact matches, showing other words of the topic.\n");
    }

    for entry in selection.entries.iter() {
        print_card(entry, session.preferences().is_favorite(&entry.term));
    }
}

fn generate(session: &mut Session, opts: GenerateOptions) -> Result<()> {
    // nothing is saved when the topic is unknown
    let topic = opts.topic.as_deref().map(|t| session.resolve_topic(t)).transpose()?;
    apply_selection(session.preferences_mut(), topic.as_ref(), &opts)?;
    session.forget_unknown_topic()?;

    if let Some(seed) = opts.seed {
        session.set_seed(seed);
    }
    if let Some(count) = opts.count {
        session.set_sample_size(count);
    }

    let selection = session.generate_saved();
    print_selection(session, &selection);

    Ok(())
}

fn list_topics(session: &Session) -> Result<()> {
    let current = session.preferences().last_topic();
    println!("{}{}", ALL_TOPICS, if current == TopicFilter::All { " *" } else { "" });
    for t in session.topics() {
        let mark = if current.as_value() == t { " *" } else { "" };
        println!("{}{}", t, mark);
    }
    Ok(())
}

fn print_stats(session: &mut Session) -> Result<()> {
    let catalog = session.catalog();
    println!("Entries: {}", catalog.len());

    println!("\nTopics:");
    for (topic, n) in catalog.count_by_topic() {
        println!("  {}: {}", topic, n);
    }

    println!("\nLevels:");
    for (level, n) in catalog.count_by_level() {
        let label = if level.is_empty() { "(none)".to_string() } else { level };
        println!("  {}: {}", label, n);
    }

    Ok(())
}

fn set_theme(session: &mut Session, name: Option<ThemeName>) -> Result<()> {
    let theme = match name {
        Some(t) => {
            session.preferences_mut().set_theme(t)?;
            t
        }
        None => session.toggle_theme()?,
    };
    println!("Theme: {} (toggle: {})", theme.as_str(), theme.toggle_label());
    Ok(())
}

fn main() {
    if dotenv().is_err() {
        eprintln!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    // The logger and the app globals read the data directory from the environment.
    if let Some(ref dir) = cli.wordcards_dir {
        unsafe { env::set_var("WORDCARDS_DIR", dir); }
    }

    let wordcards_dir = match get_create_wordcards_dir() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to get the wordcards directory: {:#}", e);
            eprintln!("Use the --wordcards-dir option or set the WORDCARDS_DIR environment variable.");
            exit(1);
        }
    };

    if let Some(level) = cli.log_level {
        logger::set_log_level(level);
    }

    init_app_globals();
    let g = get_app_globals();

    let mut session = open_session(&wordcards_dir, g.request_timeout)
        .with_sample_size(g.sample_size);

    let command_result = match cli.command {
        Commands::Generate {
            topic, level, level_index, any_level, no_any_level,
            favorites_only, all_words, count, seed,
        } => {
            let opts = GenerateOptions {
                topic,
                level,
                level_index,
                any_level: flag_choice(any_level, no_any_level),
                favorites_only: flag_choice(favorites_only, all_words),
                count,
                seed,
            };
            generate(&mut session, opts)
        }

        Commands::Topics => list_topics(&session),

        Commands::Stats => print_stats(&mut session),

        Commands::Favorite { term } => {
            session.toggle_favorite(&term).map(|on| {
                if on {
                    println!("★ {} added to favorites", term.trim());
                } else {
                    println!("☆ {} removed from favorites", term.trim());
                }
            })
        }

        Commands::Hide { term } => {
            session.hide(&term).map(|_| println!("{} is hidden", term.trim()))
        }

        Commands::ResetHidden => {
            session.reset_hidden().map(|_| println!("Hidden words reset"))
        }

        Commands::Theme { name } => set_theme(&mut session, name),
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
