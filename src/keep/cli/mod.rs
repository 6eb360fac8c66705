//! # CLI Layer
//!
//! One possible UI client for keep. This is the only place that parses
//! arguments, touches stdout/stderr, and turns errors into exit codes.
//!
//! - `run()`: dispatch, called by `main.rs`
//! - `init_context()`: resolves the base directory, loads config, starts logging
//! - `handle_*()`: per-command handlers that call the API and print
//! - `print::*`: output formatting

mod args;
mod print;

use args::{Cli, Commands, GroupCommands};
use clap::Parser;
use directories::BaseDirs;
use keep::api::{ConfigAction, KeepApi};
use keep::config::KeepConfig;
use keep::error::{KeepError, Result};
use keep::logging::init_logging;
use keep::model::{Order, Target};
use keep::store::fs::FileStore;
use print::{
    print_config, print_full_notes, print_groups, print_header, print_messages, print_notes,
};
use std::path::PathBuf;

const HOME_ENV: &str = "KEEP_HOME";
const LOG_ENV: &str = "KEEP_LOG";
const BASE_DIR_NAME: &str = ".keep";

struct AppContext {
    api: KeepApi<FileStore>,
    target: Target,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add { texts }) => handle_add(&mut ctx, texts),
        Some(Commands::Read { ids }) => handle_read(&ctx, ids),
        Some(Commands::All { inc }) => handle_all(&ctx, inc),
        Some(Commands::Forget { ids }) => handle_forget(&mut ctx, ids),
        Some(Commands::Group { action }) => handle_group(&mut ctx, action),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Init) => handle_init(&ctx),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        None => handle_all(&ctx, false),
    }
}

/// `$KEEP_HOME` when set, `~/.keep` otherwise.
fn base_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(BASE_DIR_NAME))
        .ok_or_else(|| KeepError::NotFound("could not determine home directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = base_dir()?;
    let config = KeepConfig::load(&root)?;

    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| config.log_level.clone());
    if let Err(e) = init_logging(&level, &root.join("logs")) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let store = FileStore::new(root.clone()).with_layout(config.layout());
    Ok(AppContext {
        api: KeepApi::new(store, root),
        target: Target::from_group(cli.group.clone()),
    })
}

fn handle_add(ctx: &mut AppContext, texts: Vec<String>) -> Result<()> {
    let result = ctx.api.create_notes(&ctx.target, &texts)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_read(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.view_notes(&ctx.target, &ids)?;
    print_full_notes(&result.listed_notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_all(ctx: &AppContext, inc: bool) -> Result<()> {
    let order = if inc {
        Order::Ascending
    } else {
        Order::Descending
    };
    let result = ctx.api.list_notes(&ctx.target, order)?;
    print_notes(result.header.as_ref(), &result.listed_notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_forget(ctx: &mut AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_notes(&ctx.target, &ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_group(ctx: &mut AppContext, action: GroupCommands) -> Result<()> {
    let result = match action {
        GroupCommands::New { name, description } => ctx.api.create_group(&name, &description)?,
        GroupCommands::Ls => {
            let result = ctx.api.list_groups()?;
            print_groups(&result.groups);
            result
        }
        GroupCommands::Desc { name } => {
            let result = ctx.api.describe_group(&name)?;
            if let Some(header) = &result.header {
                print_header(header);
            }
            result
        }
        GroupCommands::Rm { name } => ctx.api.delete_group(&name)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if let (true, Some(config)) = (show_all, &result.config) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    if let Some(root) = &result.store_root {
        println!("  {}", root.display());
    }
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor(&ctx.target)?;
    print_messages(&result.messages);
    Ok(())
}
