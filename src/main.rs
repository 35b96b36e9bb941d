use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use wellbeing_store::config::AppConfig;
use wellbeing_store::logging::{init_logging, OperationTimer};
use wellbeing_store::models::{ActivityCategory, Mood, NewJournalEntry, NewMoodEntry};
use wellbeing_store::search::JournalFilter;
use wellbeing_store::validation::InputValidator;
use wellbeing_store::WellbeingService;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// User whose data is read and written
    #[arg(short, long, global = true, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mood log
    Mood {
        #[command(subcommand)]
        command: MoodCommands,
    },
    /// Journal entries
    Journal {
        #[command(subcommand)]
        command: JournalCommands,
    },
    /// Activities and sessions
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },
    /// List every stored key
    Keys,
    /// Delete all local data for every user
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum MoodCommands {
    /// Record a mood
    Log {
        /// Mood name, e.g. calm or anxious
        mood: Mood,

        /// Intensity from 1 to 10
        #[arg(short, long, default_value = "5")]
        intensity: u8,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List mood entries, newest first
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,
    },
    /// Summary statistics
    Stats,
}

#[derive(Subcommand)]
enum JournalCommands {
    /// Write a journal entry
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,

        /// Tags, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(short, long)]
        mood: Option<Mood>,
    },
    /// Search journal entries
    Search {
        /// Text to look for in title or content
        #[arg(short, long)]
        text: Option<String>,

        /// Required tags, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(short, long)]
        mood: Option<Mood>,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Every distinct tag
    Tags,
}

#[derive(Subcommand)]
enum ActivityCommands {
    /// List built-in and custom activities
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<ActivityCategory>,
    },
    /// Start a session
    Start {
        activity_id: String,
    },
    /// Complete a session
    Complete {
        session_id: String,

        /// Rating from 1 to 5
        #[arg(short, long)]
        rating: Option<u8>,
    },
    /// Progress for one activity
    Progress {
        activity_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _guard = init_logging(&config.logging)?;

    info!("Starting wellbeing-store");

    // Parse command line arguments
    let cli = Cli::parse();

    let service = WellbeingService::open(&config)?;
    let timer = OperationTimer::new("command");

    match cli.command {
        Commands::Mood { command } => run_mood(&service, &cli.user, command).await?,
        Commands::Journal { command } => run_journal(&service, &cli.user, command).await?,
        Commands::Activity { command } => run_activity(&service, &cli.user, command).await?,
        Commands::Keys => emit(&service.settings.list_keys().await?)?,
        Commands::Clear { yes } => {
            if yes {
                service.settings.clear_all_local_data().await?;
            } else {
                warn!("Refusing to clear local data without --yes");
            }
        },
    }

    timer.finish();
    Ok(())
}

async fn run_mood(service: &WellbeingService, user: &str, command: MoodCommands) -> Result<()> {
    match command {
        MoodCommands::Log { mood, intensity, notes } => {
            let entry = service
                .moods
                .create_mood_entry(
                    user,
                    NewMoodEntry {
                        mood,
                        intensity,
                        date: None,
                        notes,
                    },
                )
                .await?;
            emit(&entry)
        },
        MoodCommands::List { start_date, end_date } => {
            let entries = if start_date.is_some() || end_date.is_some() {
                let (start, end) = parse_date_range(start_date.as_deref(), end_date.as_deref())?;
                let start = start.unwrap_or(DateTime::<Utc>::MIN_UTC);
                let end = end.unwrap_or(DateTime::<Utc>::MAX_UTC);
                service.moods.get_mood_entries_in_range(user, start, end).await?
            } else {
                service.moods.get_all_mood_entries(user).await?
            };
            emit(&entries)
        },
        MoodCommands::Stats => emit(&service.moods.get_mood_statistics(user).await?),
    }
}

async fn run_journal(service: &WellbeingService, user: &str, command: JournalCommands) -> Result<()> {
    match command {
        JournalCommands::Add {
            title,
            content,
            tags,
            mood,
        } => {
            let entry = service
                .journal
                .create_journal_entry(
                    user,
                    NewJournalEntry {
                        title,
                        content,
                        tags,
                        mood,
                        ..NewJournalEntry::default()
                    },
                )
                .await?;
            emit(&entry)
        },
        JournalCommands::Search {
            text,
            tags,
            mood,
            start_date,
            end_date,
            favorites,
        } => {
            let (date_from, date_to) = parse_date_range(start_date.as_deref(), end_date.as_deref())?;
            let filter = JournalFilter {
                tags: (!tags.is_empty()).then_some(tags),
                date_from,
                date_to,
                mood,
                search_text: text,
                favorites_only: favorites,
            };
            emit(&service.journal.search_journal(user, &filter).await?)
        },
        JournalCommands::Tags => emit(&service.journal.get_all_tags(user).await?),
    }
}

async fn run_activity(service: &WellbeingService, user: &str, command: ActivityCommands) -> Result<()> {
    match command {
        ActivityCommands::List { category } => {
            let activities = match category {
                Some(category) => service.activities.get_activities_by_category(user, category).await?,
                None => service.activities.get_all_activities(user).await?,
            };
            emit(&activities)
        },
        ActivityCommands::Start { activity_id } => {
            if service.activities.get_activity_by_id(user, &activity_id).await?.is_none() {
                return Err(anyhow::anyhow!("Activity not found: {}", activity_id));
            }
            emit(&service.sessions.start_activity_session(user, &activity_id).await?)
        },
        ActivityCommands::Complete { session_id, rating } => {
            let session = service
                .sessions
                .complete_activity_session(user, &session_id, rating)
                .await?
                .with_context(|| format!("Session not found: {session_id}"))?;
            emit(&session)
        },
        ActivityCommands::Progress { activity_id } => {
            emit(&service.sessions.get_activity_progress(user, &activity_id).await?)
        },
    }
}

/// Parse optional start and end dates, rejecting an end before the start
fn parse_date_range(start_date: Option<&str>, end_date: Option<&str>) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let start = parse_date(start_date, false)?;
    let end = parse_date(end_date, true)?;
    InputValidator::validate_date_range(start, end)?;
    Ok((start, end))
}

/// Parse a YYYY-MM-DD date as the start or the end of that UTC day
fn parse_date(date: Option<&str>, end_of_day: bool) -> Result<Option<DateTime<Utc>>> {
    let Some(date) = date else {
        return Ok(None);
    };

    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").context("Invalid date format, use YYYY-MM-DD")?;
    let time = if end_of_day {
        day.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        day.and_hms_opt(0, 0, 0)
    };

    Ok(time.map(|t| t.and_utc()))
}

/// Write command output to stdout as pretty JSON
#[allow(clippy::print_stdout)]
fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
