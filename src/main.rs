//! `guildkeep` command-line front end.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use guildkeep::config::{AppConfig, StorageBackend};
use guildkeep::core::character_gen::{CharacterRequest, Gender};
use guildkeep::core::guild::{Guild, GuildError};
use guildkeep::core::logging::{self, print_error, print_info, print_panel, print_success};
use guildkeep::core::name_gen;
use guildkeep::core::text_gen::{TextGenClient, TextGenError};
use guildkeep::database::{open_store, CharacterRecord};
use miette::{IntoDiagnostic, WrapErr};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

/// `guildkeep` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "guildkeep",
    about = "Keep guild notes and generate D&D 5e characters",
    version
)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true, value_name = "path")]
    config: Option<PathBuf>,
    /// Storage backend, overriding the config file.
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Sqlite,
    Json,
}

impl From<BackendArg> for StorageBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sqlite => StorageBackend::Sqlite,
            BackendArg::Json => StorageBackend::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Guild notes.
    #[command(subcommand)]
    Notes(NotesCommand),
    /// Generated characters.
    #[command(subcommand)]
    Characters(CharactersCommand),
    /// Roll a random character name.
    Name {
        /// male, female or unknown.
        #[arg(long)]
        gender: Option<String>,
    },
    /// Send a prompt to the text-generation endpoint.
    Prompt {
        text: String,
        /// Conversation so far.
        #[arg(long, default_value = "")]
        history: String,
    },
}

#[derive(Debug, Subcommand)]
enum NotesCommand {
    /// List notes, newest first.
    List,
    /// Add a note.
    Add { title: String },
    /// Delete a note by id.
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
enum CharactersCommand {
    /// List characters by name.
    List,
    /// Generate and save a character.
    Create {
        #[arg(long)]
        race: Option<String>,
        #[arg(long = "class")]
        class_name: Option<String>,
        /// Left blank, a name is rolled.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// Delete every character.
    Clear,
}

#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Guild(#[from] GuildError),
    #[error(transparent)]
    TextGen(#[from] TextGenError),
}

fn load_config(cli: &Cli) -> AppConfig {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if let Some(backend) = cli.backend {
        config.storage.backend = backend.into();
    }
    config
}

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli);

    let _log_guard = logging::init(&config.data_dir());
    tracing::info!("{} v{} starting", guildkeep::NAME, guildkeep::VERSION);

    let store = open_store(&config)
        .await
        .into_diagnostic()
        .wrap_err("Could not open the local database.")?;
    let guild = Guild::new(store);

    match run(cli.command, &guild, &config).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            print_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(command: Command, guild: &Guild, config: &AppConfig) -> Result<(), CommandError> {
    match command {
        Command::Notes(cmd) => {
            guild.open().await?;
            run_notes(cmd, guild).await?;
        }
        Command::Characters(cmd) => {
            guild.open().await?;
            run_characters(cmd, guild).await?;
        }
        Command::Name { gender } => {
            let gender = gender.as_deref().map(Gender::parse);
            println!("{}", name_gen::random_character_name(gender));
        }
        Command::Prompt { text, history } => {
            let client = TextGenClient::from_config(&config.text_gen);
            let reply = client.generate(&text, &history).await?;
            if reply.is_empty() {
                print_info("No reply.");
            } else {
                print_panel("Reply", &reply);
            }
        }
    }
    Ok(())
}

async fn run_notes(command: NotesCommand, guild: &Guild) -> Result<(), GuildError> {
    match command {
        NotesCommand::List => {
            let notes = guild.notes().await?;
            if notes.is_empty() {
                print_info("No notes yet.");
                return Ok(());
            }
            let body = notes
                .iter()
                .map(|n| format!("#{:<4} {}  ({})", n.id, n.title, n.created_at))
                .collect::<Vec<_>>()
                .join("\n");
            print_panel("Notes", &body);
        }
        NotesCommand::Add { title } => match guild.add_note(&title).await? {
            Some(note) => print_success(&format!("Added note #{}", note.id)),
            None => print_info("Empty note ignored."),
        },
        NotesCommand::Delete { id } => {
            guild.delete_note(id).await?;
            print_success(&format!("Deleted note #{id}"));
        }
    }
    Ok(())
}

async fn run_characters(command: CharactersCommand, guild: &Guild) -> Result<(), GuildError> {
    match command {
        CharactersCommand::List => {
            let characters = guild.characters().await?;
            if characters.is_empty() {
                print_info("No characters yet.");
            }
            for character in &characters {
                print_panel(&character.character_name, &character_summary(character));
            }
        }
        CharactersCommand::Create {
            race,
            class_name,
            name,
            gender,
        } => {
            let request = CharacterRequest {
                name: name.unwrap_or_default(),
                race: race.unwrap_or_default(),
                class_name: class_name.unwrap_or_default(),
                gender: gender.as_deref().map(Gender::parse).unwrap_or_default(),
            };
            let mut rng = StdRng::from_entropy();
            let character = guild.create_character(&request, &mut rng).await?;
            print_success("Character created!");
            print_panel(&character.character_name, &character_summary(&character));
        }
        CharactersCommand::Clear => {
            guild.clear_characters().await?;
            print_success("All characters deleted.");
        }
    }
    Ok(())
}

fn character_summary(character: &CharacterRecord) -> String {
    format!(
        "{} {} {}\n{}",
        character.gender, character.race, character.class_name, character.scores
    )
}
