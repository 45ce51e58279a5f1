use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;
use crate::core::instance::Instance;
use crate::core::repo_mod::InstallMode;
use crate::models::error::Error;
use crate::models::event::ModEvent;
use crate::models::metadata::{Mod, ModMetadata};

#[derive(Parser)]
#[command(name = "mod_manager", about = "A mod manager for Stellaris.", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Game directory to install into (overrides the settings file).
    #[arg(long, global = true, value_name = "DIR")]
    game_dir: Option<Utf8PathBuf>,

    /// Repository directory holding mod archives (overrides the settings file).
    #[arg(long, global = true, value_name = "DIR")]
    repo_dir: Option<Utf8PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List mods in the repository and the game directory.
    List {
        #[arg(short, long, value_enum, default_value_t = Source::All)]
        source: Source,
    },
    /// Install repository mods into the game directory and register them.
    Install {
        #[arg(short, long, value_enum, default_value_t = InstallMode::Keep)]
        mode: InstallMode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    All,
    Game,
    Repo,
}

pub fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.game_dir, cli.repo_dir)?;
    let mut instance = Instance::new(settings.game_dir, settings.repo_dir)?;

    match cli.command {
        Command::List { source } => list(&mut instance, source),
        Command::Install { mode } => install(&mut instance, mode),
    }
}

fn list(instance: &mut Instance, source: Source) -> Result<(), Error> {
    match source {
        Source::All => {
            print_mod_list("Installed", instance.game_mods()?);
            print_mod_list("Repository", instance.repo_mods()?);
        }
        Source::Game => print_mod_list("List", instance.game_mods()?),
        Source::Repo => print_mod_list("List", instance.repo_mods()?),
    }
    Ok(())
}

fn install(instance: &mut Instance, mode: InstallMode) -> Result<(), Error> {
    instance.install(mode, render_event)?;
    // Install materialized new descriptors; re-scan before registering.
    instance.reload();
    instance.register(render_event)
}

fn print_mod_list<M: Mod>(title: &str, mods: &[M]) {
    println!("{:-^80}", title);
    for (index, entry) in mods.iter().enumerate() {
        println!("{}. {}", index + 1, describe(entry.metadata()));
    }
}

fn describe(metadata: &ModMetadata) -> String {
    format!(
        "{} (id: {}, for {} {})",
        metadata.name, metadata.remote_file_id, metadata.game.name, metadata.game.version
    )
}

fn render_event(event: ModEvent) {
    match event {
        ModEvent::InstallStart { metadata } | ModEvent::RegisterStart { metadata } => {
            println!("{}", describe(&metadata));
        }
        ModEvent::InstallEnd { outcome, .. } => match outcome {
            Ok(result) => println!("\t{result}"),
            Err(err) => println!("\terror: {err}"),
        },
        ModEvent::RegisterEnd { outcome, .. } => match outcome {
            Ok(()) => println!("\tok"),
            Err(err) => println!("\terror: {err}"),
        },
    }
}
