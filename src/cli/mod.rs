pub mod list;

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use list::print_chore_list;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    store::{
        backend::{FileKeyValueStore, KeyValueStore},
        chore_store::ChoreStore,
        entities::Frequency,
    },
    utils::{clock::DefaultClock, dir::create_application_default_path, logging::enable_logging},
};

#[derive(Parser, Debug)]
#[command(name = "Choretab", version, long_about = None)]
#[command(about = "Tracker for recurring chores", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_DATA_HOME or $HOME/.local/share"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Add a new chore")]
    Add {
        #[arg(help = "Name shown in the list")]
        name: String,
        #[arg(help = "How often the chore has to be done, in days")]
        frequency: Frequency,
    },
    #[command(about = "Show all chores with their due dates")]
    List {},
    #[command(about = "Mark a chore as completed today")]
    Done {
        #[arg(help = "Id of the chore, as shown by list")]
        id: String,
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Delete a chore from the list")]
    Remove {
        #[arg(help = "Id of the chore, as shown by list")]
        id: String,
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let data_path = match args.dir {
        Some(dir) => dir,
        None => create_application_default_path()?,
    };
    enable_logging(&data_path, args.log)?;

    let backend = FileKeyValueStore::new(data_path)?;
    let mut store = ChoreStore::new(backend, Box::new(DefaultClock));

    match args.commands {
        Commands::Add { name, frequency } => {
            process_add_command(&mut store, &name, frequency).await
        }
        Commands::List {} => process_list_command(&mut store).await,
        Commands::Done { id, yes } => process_done_command(&mut store, &id, yes).await,
        Commands::Remove { id, yes } => process_remove_command(&mut store, &id, yes).await,
    }
}

async fn process_add_command<S: KeyValueStore>(
    store: &mut ChoreStore<S>,
    name: &str,
    frequency: Frequency,
) -> Result<()> {
    let chore = store.add(name, frequency).await?;
    println!("Added {:?} with id {}", chore.name, chore.id);
    Ok(())
}

async fn process_list_command<S: KeyValueStore>(store: &mut ChoreStore<S>) -> Result<()> {
    let chores = store.load().await?;
    if chores.is_empty() {
        println!("No chores yet. Add one with: choretab add <name> <days>");
        return Ok(());
    }
    print_chore_list(chores, &Local::now());
    Ok(())
}

async fn process_done_command<S: KeyValueStore>(
    store: &mut ChoreStore<S>,
    id: &str,
    yes: bool,
) -> Result<()> {
    let Some(name) = chore_name(store, id).await? else {
        println!("There is no chore with id {id}");
        return Ok(());
    };

    if !yes && !confirm(&format!("Mark {name:?} as done for today?")).await? {
        println!("Nothing changed");
        return Ok(());
    }

    store.complete(id).await?;
    println!("Completed {name:?}");
    Ok(())
}

async fn process_remove_command<S: KeyValueStore>(
    store: &mut ChoreStore<S>,
    id: &str,
    yes: bool,
) -> Result<()> {
    let Some(name) = chore_name(store, id).await? else {
        println!("There is no chore with id {id}");
        return Ok(());
    };

    if !yes && !confirm(&format!("Delete {name:?}? This can't be undone.")).await? {
        println!("Nothing changed");
        return Ok(());
    }

    store.remove(id).await?;
    println!("Removed {name:?}");
    Ok(())
}

async fn chore_name<S: KeyValueStore>(
    store: &mut ChoreStore<S>,
    id: &str,
) -> Result<Option<String>> {
    store.load().await?;
    Ok(store
        .chores()
        .iter()
        .find(|v| v.id == id)
        .map(|v| v.name.clone()))
}

async fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
