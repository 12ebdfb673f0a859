// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use editorjs_translator::app_config::{self, Config, TranslationProvider};
use editorjs_translator::{Controller, RunOptions};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
    Anthropic,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a block document (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for editorjs-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Language of the stored document (e.g., 'en', 'fra')
    #[arg(short = 's', long)]
    input_language: Option<String>,

    /// Language to translate into (e.g., 'fr', 'deu')
    #[arg(short = 't', long)]
    desired_language: Option<String>,

    /// SQLite database holding the documents
    #[arg(long, env = "EDITORJS_DATABASE")]
    database: Option<PathBuf>,

    /// PostgreSQL host, used when no SQLite database is given
    #[arg(long, env = "PGHOST")]
    pg_host: Option<String>,

    /// PostgreSQL port
    #[arg(long, env = "PGPORT")]
    pg_port: Option<u16>,

    /// PostgreSQL database name
    #[arg(long, env = "PGDB")]
    pg_database: Option<String>,

    /// PostgreSQL user
    #[arg(long, env = "PGUSER")]
    pg_user: Option<String>,

    /// PostgreSQL password
    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    pg_password: Option<String>,

    /// File containing the SQL query returning one row per language
    #[arg(long)]
    sql_query_path: Option<PathBuf>,

    /// Column holding the document JSON
    #[arg(long)]
    column_name: Option<String>,

    /// Column holding the language code of each row
    #[arg(long)]
    language_column_name: Option<String>,

    /// Read the document from a JSON file instead of the database
    #[arg(long, value_name = "FILE")]
    input_file: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name for LLM providers
    #[arg(short, long)]
    model: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// List the fields that would be translated without calling the provider
    #[arg(long)]
    dry_run: bool,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,
}

/// editorjs-translator - translate EditorJS block documents
///
/// Reads a block document from a SQLite or PostgreSQL query, or a JSON file,
/// translates the text fields of its blocks and writes the translated document
/// as JSON.
#[derive(Parser, Debug)]
#[command(name = "editorjs-translator")]
#[command(version)]
#[command(about = "Translate EditorJS block documents")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "editorjs-translator translates the text fields of an EditorJS block document.

EXAMPLES:
    editorjs-translator -s en -t fr --input-file page.json
    editorjs-translator -s en -t fr --database site.db --sql-query-path page.sql \\
        --column-name body --language-column-name lang
    PGHOST=db PGDB=cms PGUSER=editor editorjs-translator -s en -t fr \\
        --sql-query-path page.sql --column-name body --language-column-name lang
    editorjs-translator -s en -t de --input-file page.json --dry-run
    editorjs-translator -p ollama -m llama3.2:3b -s en -t es --input-file page.json
    editorjs-translator completions bash > editorjs-translator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one without languages is created, so -s and -t are required until they are
    filled in. Command line flags override it.

SUPPORTED PROVIDERS:
    google    - Google Translate web endpoint (default)
    ollama    - Local Ollama server (default: llama3.2:3b)
    anthropic - Anthropic Claude API (requires API key)
    mock      - Offline provider that tags text with the target language")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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
        // The logger accepts everything; filtering happens through set_max_level
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "editorjs-translator", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        // Default behavior - top-level args are the translate args
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // A log level given on the command line applies right away
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    let run_options = RunOptions {
        dry_run: options.dry_run,
        force_overwrite: options.force_overwrite,
        quiet: false,
    };

    controller.run(&run_options).await?;
    Ok(())
}

// Override config with CLI options if provided
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(source_language) = &options.input_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &options.desired_language {
        config.target_language = target_language.clone();
    }

    if let Some(input_file) = &options.input_file {
        config.source.input_file = Some(input_file.clone());
    }
    if let Some(database) = &options.database {
        config.source.database_path = Some(database.clone());
    }
    if options.pg_host.is_some()
        || options.pg_port.is_some()
        || options.pg_database.is_some()
        || options.pg_user.is_some()
        || options.pg_password.is_some()
    {
        let settings = config.source.postgres.get_or_insert_with(Default::default);
        if let Some(host) = &options.pg_host {
            settings.host = host.clone();
        }
        if let Some(port) = options.pg_port {
            settings.port = Some(port);
        }
        if let Some(database) = &options.pg_database {
            settings.database = database.clone();
        }
        if let Some(user) = &options.pg_user {
            settings.user = Some(user.clone());
        }
        if let Some(password) = &options.pg_password {
            settings.password = Some(password.clone());
        }
    }
    if let Some(sql_query_path) = &options.sql_query_path {
        config.source.sql_query_path = Some(sql_query_path.clone());
    }
    if let Some(column_name) = &options.column_name {
        config.source.column_name = Some(column_name.clone());
    }
    if let Some(language_column_name) = &options.language_column_name {
        config.source.language_column_name = Some(language_column_name.clone());
    }

    if let Some(output) = &options.output {
        config.output.path = output.clone();
    }
    if options.pretty {
        config.output.pretty = true;
    }

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        let active_provider = config.translation.provider.clone();
        config.translation.provider_config_mut(&active_provider).model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.provider_config_mut(&TranslationProvider::Anthropic).api_key = api_key.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
