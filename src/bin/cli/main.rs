mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use hifdh_lib::storage::{ChapterId, ScriptType, VerseNumber, DEFAULT_DIFFICULTY};

#[derive(Parser)]
#[command(name = "hifdh-cli", about = "Quran memorization tracker", version)]
struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ScriptArg {
    Uthmani,
    Indopak,
    Tajweed,
}

impl From<ScriptArg> for ScriptType {
    fn from(arg: ScriptArg) -> Self {
        match arg {
            ScriptArg::Uthmani => ScriptType::Uthmani,
            ScriptArg::Indopak => ScriptType::Indopak,
            ScriptArg::Tajweed => ScriptType::Tajweed,
        }
    }
}

fn chapter_arg() -> clap::builder::RangedI64ValueParser<ChapterId> {
    clap::value_parser!(u16).range(1..=114)
}

fn verse_arg() -> clap::builder::RangedI64ValueParser<VerseNumber> {
    clap::value_parser!(u16).range(1..)
}

#[derive(Subcommand)]
enum Command {
    /// Mark an ayah as memorized
    Mark {
        #[arg(value_parser = chapter_arg())]
        chapter: ChapterId,
        #[arg(value_parser = verse_arg())]
        verse: VerseNumber,
        /// Difficulty rating
        #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: u8,
    },

    /// Remove an ayah's memorized mark
    Unmark {
        #[arg(value_parser = chapter_arg())]
        chapter: ChapterId,
        #[arg(value_parser = verse_arg())]
        verse: VerseNumber,
    },

    /// Flip an ayah between memorized and not
    Toggle {
        #[arg(value_parser = chapter_arg())]
        chapter: ChapterId,
        #[arg(value_parser = verse_arg())]
        verse: VerseNumber,
    },

    /// Show whether an ayah is memorized
    Status {
        #[arg(value_parser = chapter_arg())]
        chapter: ChapterId,
        #[arg(value_parser = verse_arg())]
        verse: VerseNumber,
    },

    /// Totals, today's progress and current streak
    Stats,

    /// Ayahs memorized on each of the last seven days
    History,

    /// List surahs with memorization progress
    Surahs {
        /// Filter by number, transliterated name or Arabic name
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show a surah's verses with memorized markers
    Read {
        #[arg(value_parser = chapter_arg())]
        chapter: ChapterId,
        /// Reciter for audio links (default: selected reciter setting)
        #[arg(long)]
        reciter: Option<u32>,
        /// Script type (default: script setting)
        #[arg(long)]
        script: Option<ScriptArg>,
    },

    /// Show a mushaf page
    Page {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=604))]
        number: u32,
        #[arg(long)]
        script: Option<ScriptArg>,
    },

    /// List available reciters
    Reciters,

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Sign up, sign in or sign out of the sync account
    #[command(subcommand)]
    Account(AccountCommand),

    /// Permanently delete all local progress and settings
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,

    /// Change one setting (e.g. `dailyGoal 5`, `scriptType indopak`)
    Set { key: String, value: String },
}

#[derive(Subcommand)]
enum AccountCommand {
    /// Create an account (password read from stdin)
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Sign in to an existing account (password read from stdin)
    Login {
        #[arg(long)]
        email: String,
    },

    /// Forget the stored session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Mark { chapter, verse, difficulty } => {
            commands::ayah::run_mark(&app, chapter, verse, difficulty, &cli.format, use_color).await?;
        }
        Command::Unmark { chapter, verse } => {
            commands::ayah::run_unmark(&app, chapter, verse, &cli.format, use_color).await?;
        }
        Command::Toggle { chapter, verse } => {
            commands::ayah::run_toggle(&app, chapter, verse, &cli.format, use_color).await?;
        }
        Command::Status { chapter, verse } => {
            commands::ayah::run_status(&app, chapter, verse, &cli.format, use_color)?;
        }
        Command::Stats => {
            commands::stats::run_stats(&app, &cli.format, use_color)?;
        }
        Command::History => {
            commands::stats::run_history(&app, &cli.format, use_color)?;
        }
        Command::Surahs { search } => {
            commands::surahs::run(&app, search.as_deref(), &cli.format, use_color).await?;
        }
        Command::Read { chapter, reciter, script } => {
            commands::read::run(&app, chapter, reciter, script.map(Into::into), &cli.format, use_color)
                .await?;
        }
        Command::Page { number, script } => {
            commands::page::run(&app, number, script.map(Into::into), &cli.format, use_color).await?;
        }
        Command::Reciters => {
            commands::reciters::run(&app, &cli.format).await?;
        }
        Command::Settings(SettingsCommand::Show) => {
            commands::settings::run_show(&app, &cli.format)?;
        }
        Command::Settings(SettingsCommand::Set { key, value }) => {
            commands::settings::run_set(&app, &key, &value, &cli.format).await?;
        }
        Command::Account(AccountCommand::Signup { name, email }) => {
            commands::account::run_signup(&app, &name, &email, &cli.format).await?;
        }
        Command::Account(AccountCommand::Login { email }) => {
            commands::account::run_login(&app, &email, &cli.format).await?;
        }
        Command::Account(AccountCommand::Logout) => {
            commands::account::run_logout(&app)?;
        }
        Command::Reset { yes } => {
            commands::reset::run(&app, yes)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
