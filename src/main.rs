// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

mod app_config;
mod apod;
mod database;
mod date_utils;
mod errors;
mod language_utils;
mod notify;
mod preferences;
mod sync;
mod translation;

use app_config::{Config, LogLevel};
use apod::{ApodRepository, NasaClient};
use database::models::ApodRecord;
use database::{ContentStore, DatabaseConnection, SyncStateStore, TranslationStore};
use notify::LogNotifier;
use preferences::Preferences;
use sync::{HttpProbe, SyncScheduler, SyncWorker};
use translation::{TranslateClient, TranslationRepository};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch items from the remote endpoint into the local store
    Fetch {
        /// Date to fetch (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Range start date (requires --end)
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Range end date (requires --start)
        #[arg(long, requires = "start")]
        end: Option<String>,

        /// Fetch N random items instead of a date
        #[arg(short, long, conflicts_with_all = ["date", "start", "end"])]
        count: Option<u32>,
    },

    /// Show one stored item, fetching it on a local miss
    Show {
        /// Date to show (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List stored items
    List {
        /// Number of recent items to list
        #[arg(short, long, default_value_t = 7)]
        recent: usize,

        /// List favorites instead of recent items
        #[arg(short, long)]
        favorites: bool,
    },

    /// Search stored items by title and description
    Search {
        /// Keyword to search for
        keyword: String,
    },

    /// Mark or unmark an item as favorite
    Favorite {
        /// Date of the item
        date: String,

        /// Remove the favorite mark instead of setting it
        #[arg(long)]
        remove: bool,
    },

    /// Translate an item's caption or arbitrary text
    Translate {
        /// Target language code (defaults to the configured one)
        #[arg(short, long)]
        to: Option<String>,

        /// Translate the stored item for this date
        #[arg(short, long, conflicts_with = "text")]
        date: Option<String>,

        /// Translate this literal text
        #[arg(long)]
        text: Option<String>,

        /// Source language code (auto-detected when omitted)
        #[arg(short, long)]
        from: Option<String>,
    },

    /// Run the background sync once, or as a daemon
    Sync {
        /// Keep running on the configured schedule until interrupted
        #[arg(long)]
        daemon: bool,
    },

    /// Translation cache maintenance
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Inspect or change user preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },

    /// Generate shell completions for astropod
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Show cache and store statistics
    Stats,
    /// Delete cached translations older than the freshness window
    Purge,
    /// Delete all cached translations
    Clear,
}

#[derive(Subcommand, Debug)]
enum PrefsCommands {
    /// Print the current preferences
    Show,
    /// Enable or disable sync notifications
    Notifications {
        #[arg(value_parser = clap::value_parser!(bool))]
        enabled: bool,
    },
    /// Add a watched keyword
    AddKeyword { keyword: String },
    /// Remove a watched keyword
    RemoveKeyword { keyword: String },
    /// Set the content API key (empty clears the override)
    ApiKey { key: String },
    /// Set the app display language
    Language { code: String },
    /// Set the screen-saver delay in seconds
    ScreenSaverDelay { seconds: u32 },
    /// Enable or disable the dark theme
    DarkTheme {
        #[arg(value_parser = clap::value_parser!(bool))]
        enabled: bool,
    },
}

/// astropod - Astronomy Picture of the Day, offline-first
///
/// Fetches NASA's daily astronomy pictures into a local store, keeps
/// favorites, translates captions, and syncs daily in the background.
#[derive(Parser, Debug)]
#[command(name = "astropod")]
#[command(version = "1.0.0")]
#[command(about = "Astronomy Picture of the Day browser and sync tool")]
#[command(long_about = "astropod keeps a local, searchable history of NASA's Astronomy Picture
of the Day, with favorites, caption translation, and a daily background sync.

EXAMPLES:
    astropod fetch                          # Fetch today's item
    astropod fetch -d 2024-03-01            # Fetch a specific date
    astropod fetch --start 2024-03-01 --end 2024-03-07
    astropod fetch -c 5                     # Fetch 5 random items
    astropod show                           # Show today's item
    astropod list -r 14                     # List the last 14 stored items
    astropod favorite 2024-03-01            # Mark a favorite
    astropod translate -d 2024-03-01 -t fr  # Translate a caption to French
    astropod sync --daemon                  # Run the daily sync loop
    astropod completions bash > astropod.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\u{274c} ",
            Level::Warn => "\u{1f6a7} ",
            Level::Info => " ",
            Level::Debug => "\u{1f50d} ",
            Level::Trace => "\u{1f4cb} ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Composition root: every component wired once at startup
struct App {
    config: Config,
    preferences: Arc<Preferences>,
    db: DatabaseConnection,
    content: Arc<ApodRepository<NasaClient>>,
    translations: TranslationRepository<TranslateClient>,
}

impl App {
    fn build(config: Config) -> Result<Self> {
        let db = match &config.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };

        let preferences = Arc::new(match &config.preferences_path {
            Some(path) => Preferences::load(path)?,
            None => Preferences::load_default()?,
        });

        let content = Arc::new(ApodRepository::new(
            NasaClient::with_base_url(config.content_endpoint.clone()),
            ContentStore::new(db.clone()),
            preferences.clone(),
        ));

        let translations = TranslationRepository::new(
            TranslateClient::new(),
            TranslationStore::new(db.clone()),
        );

        Ok(Self {
            config,
            preferences,
            db,
            content,
            translations,
        })
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("spinner template is valid"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_item(item: &ApodRecord) {
    let marker = if item.is_favorite { "\u{2605}" } else { " " };
    println!("{} {}  {}", marker, item.date, item.title);
    println!("    {} | {}", item.media_type, item.url);
    if let Some(thumbnail) = &item.thumbnail_url {
        println!("    thumbnail: {}", thumbnail);
    }
    if let Some(copyright) = &item.copyright {
        println!("    \u{00a9} {}", copyright);
    }
    println!();
    println!("{}", item.explanation);
}

fn print_item_line(item: &ApodRecord) {
    let marker = if item.is_favorite { "\u{2605}" } else { " " };
    println!("{} {}  {}", marker, item.date, item.title);
}

fn resolve_date(date: Option<String>) -> Result<String> {
    let date = date.unwrap_or_else(date_utils::today_key);
    if !date_utils::is_valid_key(&date) {
        return Err(anyhow!(
            "'{}' is not a valid date (expected YYYY-MM-DD, {} or later)",
            date,
            date_utils::ARCHIVE_START
        ));
    }
    Ok(date)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // Completions don't need config or storage
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "astropod", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = Config::load_or_create(&cli.config_path)
        .with_context(|| format!("Failed to load config: {}", cli.config_path))?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let app = App::build(config)?;
    run_command(app, cli.command).await
}

async fn run_command(app: App, command: Commands) -> Result<()> {
    match command {
        Commands::Fetch { date, start, end, count } => run_fetch(&app, date, start, end, count).await,
        Commands::Show { date } => run_show(&app, date).await,
        Commands::List { recent, favorites } => run_list(&app, recent, favorites).await,
        Commands::Search { keyword } => run_search(&app, &keyword).await,
        Commands::Favorite { date, remove } => run_favorite(&app, &date, remove).await,
        Commands::Translate { to, date, text, from } => {
            run_translate(&app, to, date, text, from).await
        }
        Commands::Sync { daemon } => run_sync(app, daemon).await,
        Commands::Cache { command } => run_cache(&app, command).await,
        Commands::Prefs { command } => run_prefs(&app, command),
        Commands::Completions { .. } => unreachable!("handled before config load"),
    }
}

async fn run_fetch(
    app: &App,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    count: Option<u32>,
) -> Result<()> {
    if let Some(count) = count {
        let bar = spinner(&format!("Fetching {} random items...", count));
        let items = app.content.refresh_count(count).await?;
        bar.finish_and_clear();

        for item in &items {
            print_item_line(item);
        }
        info!("Fetched {} items", items.len());
        return Ok(());
    }

    if let (Some(start), Some(end)) = (start, end) {
        let start = resolve_date(Some(start))?;
        let end = resolve_date(Some(end))?;

        let bar = spinner(&format!("Fetching items from {} to {}...", start, end));
        let items = app.content.refresh_range(&start, &end).await?;
        bar.finish_and_clear();

        for item in &items {
            print_item_line(item);
        }
        info!("Fetched {} items", items.len());
        return Ok(());
    }

    let date = resolve_date(date)?;
    let bar = spinner(&format!("Fetching item for {}...", date));
    let item = app.content.refresh(&date).await?;
    bar.finish_and_clear();

    print_item(&item);
    Ok(())
}

async fn run_show(app: &App, date: Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    let item = app.content.get(&date).await?;
    print_item(&item);
    Ok(())
}

async fn run_list(app: &App, recent: usize, favorites: bool) -> Result<()> {
    let items = if favorites {
        app.content.favorites().await?
    } else {
        app.content.recent(recent).await?
    };

    if items.is_empty() {
        println!("Nothing stored yet. Try `astropod fetch` first.");
        return Ok(());
    }

    for item in &items {
        print_item_line(item);
    }
    Ok(())
}

async fn run_search(app: &App, keyword: &str) -> Result<()> {
    let items = app.content.search(keyword).await?;

    if items.is_empty() {
        println!("No stored items match '{}'.", keyword);
        return Ok(());
    }

    for item in &items {
        print_item_line(item);
    }
    Ok(())
}

async fn run_favorite(app: &App, date: &str, remove: bool) -> Result<()> {
    let date = resolve_date(Some(date.to_string()))?;
    app.content.set_favorite(&date, !remove).await?;

    if remove {
        println!("Removed favorite mark from {}", date);
    } else {
        println!("Marked {} as favorite", date);
    }
    Ok(())
}

async fn run_translate(
    app: &App,
    to: Option<String>,
    date: Option<String>,
    text: Option<String>,
    from: Option<String>,
) -> Result<()> {
    let target = to.unwrap_or_else(|| app.config.translation.default_target_language.clone());

    if let Some(text) = text {
        let bar = spinner(&format!(
            "Translating to {}...",
            language_utils::display_name(&target)
        ));
        let result = app
            .translations
            .translate_one(&text, &target, from.as_deref())
            .await?;
        bar.finish_and_clear();

        println!("{}", result.translated_text);
        app.preferences.add_recent_language(&target)?;
        return Ok(());
    }

    // Translate a stored item's caption: title and explanation together
    let date = resolve_date(date)?;
    let item = app.content.get(&date).await?;

    let bar = spinner(&format!(
        "Translating caption to {}...",
        language_utils::display_name(&target)
    ));
    let texts = vec![item.title.clone(), item.explanation.clone()];
    let results = app
        .translations
        .translate_many(&texts, &target, from.as_deref())
        .await?;
    bar.finish_and_clear();

    // Output order is unspecified, so match results back by source text
    let translated_for = |source: &str| {
        results
            .iter()
            .find(|record| record.source_text == source)
            .map(|record| record.translated_text.clone())
            .unwrap_or_else(|| source.to_string())
    };

    println!("{}  {}", item.date, translated_for(&item.title));
    println!();
    println!("{}", translated_for(&item.explanation));

    app.preferences.add_recent_language(&target)?;
    Ok(())
}

async fn run_sync(app: App, daemon: bool) -> Result<()> {
    let worker = SyncWorker::new(
        app.content.clone(),
        app.preferences.clone(),
        Arc::new(LogNotifier),
    );

    if !daemon {
        worker.run_once().await?;
        return Ok(());
    }

    let scheduler = SyncScheduler::new(
        worker,
        SyncStateStore::new(app.db.clone()),
        Arc::new(HttpProbe::new(app.config.content_endpoint.clone())),
    )
    .with_timing(
        Duration::from_secs(app.config.sync.period_hours * 60 * 60),
        Duration::from_secs(app.config.sync.poll_interval_secs),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    scheduler.run(shutdown_rx).await
}

async fn run_cache(app: &App, command: CacheCommands) -> Result<()> {
    match command {
        CacheCommands::Stats => {
            let stats = app.db.stats()?;
            println!("{}", stats);
        }
        CacheCommands::Purge => {
            let cutoff =
                chrono::Utc::now().timestamp_millis() - translation::CACHE_MAX_AGE_MS;
            let deleted = app.translations.cache().purge_older_than(cutoff).await?;
            println!("Purged {} expired translations", deleted);
        }
        CacheCommands::Clear => {
            let deleted = app.translations.cache().clear().await?;
            println!("Cleared {} cached translations", deleted);
        }
    }
    Ok(())
}

fn run_prefs(app: &App, command: PrefsCommands) -> Result<()> {
    match command {
        PrefsCommands::Show => {
            let snapshot = app.preferences.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        PrefsCommands::Notifications { enabled } => {
            app.preferences.set_notifications_enabled(enabled)?;
            println!("Notifications {}", if enabled { "enabled" } else { "disabled" });
        }
        PrefsCommands::AddKeyword { keyword } => {
            app.preferences.add_watched_keyword(&keyword)?;
            println!("Watching '{}'", keyword.trim());
        }
        PrefsCommands::RemoveKeyword { keyword } => {
            app.preferences.remove_watched_keyword(&keyword)?;
            println!("Stopped watching '{}'", keyword.trim());
        }
        PrefsCommands::ApiKey { key } => {
            app.preferences.set_api_key(&key)?;
            if key.trim().is_empty() {
                println!("Cleared custom API key");
            } else {
                println!("Custom API key saved");
            }
        }
        PrefsCommands::Language { code } => {
            if !code.trim().is_empty() && !language_utils::is_valid_code(&code) {
                return Err(anyhow!("'{}' is not a valid language code", code));
            }
            app.preferences.set_app_language(&code)?;
            println!("App language set to '{}'", code.trim().to_lowercase());
        }
        PrefsCommands::ScreenSaverDelay { seconds } => {
            app.preferences.set_screen_saver_delay(seconds)?;
            println!("Screen-saver delay set to {} seconds", seconds);
        }
        PrefsCommands::DarkTheme { enabled } => {
            app.preferences.set_dark_theme(enabled)?;
            println!("Dark theme {}", if enabled { "enabled" } else { "disabled" });
        }
    }
    Ok(())
}
