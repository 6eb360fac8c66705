//! # API Facade
//!
//! A thin layer over [`crate::commands`] and the single entry point for all
//! keep operations, whichever UI drives them.
//!
//! The facade dispatches to the matching command and normalizes inputs: note
//! ids arrive as strings from the outside world and are parsed here. It does
//! no printing and holds no business logic.
//!
//! `KeepApi<S: DataStore>` is generic over the storage backend:
//! - Production: `KeepApi<FileStore>`
//! - Testing: `KeepApi<InMemoryStore>`

use crate::commands;
use crate::error::{KeepError, Result};
use crate::model::{Order, Target};
use crate::store::DataStore;
use std::path::PathBuf;

/// The main API facade for keep operations.
pub struct KeepApi<S: DataStore> {
    store: S,
    root: PathBuf,
}

impl<S: DataStore> KeepApi<S> {
    /// `root` is the base directory that holds the config file.
    pub fn new(store: S, root: PathBuf) -> Self {
        Self { store, root }
    }

    pub fn create_notes<T: AsRef<str>>(
        &mut self,
        target: &Target,
        texts: &[T],
    ) -> Result<commands::CmdResult> {
        let texts: Vec<String> = texts.iter().map(|t| t.as_ref().to_string()).collect();
        commands::create::run(&mut self.store, target, &texts)
    }

    pub fn view_notes<I: AsRef<str>>(
        &self,
        target: &Target,
        ids: &[I],
    ) -> Result<commands::CmdResult> {
        let ids = parse_ids(ids)?;
        commands::view::run(&self.store, target, &ids)
    }

    pub fn list_notes(&self, target: &Target, order: Order) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, target, order)
    }

    pub fn delete_notes<I: AsRef<str>>(
        &mut self,
        target: &Target,
        ids: &[I],
    ) -> Result<commands::CmdResult> {
        let ids = parse_ids(ids)?;
        commands::delete::run(&mut self.store, target, &ids)
    }

    pub fn create_group(&mut self, name: &str, description: &str) -> Result<commands::CmdResult> {
        commands::groups::create(&mut self.store, name, description)
    }

    pub fn list_groups(&self) -> Result<commands::CmdResult> {
        commands::groups::list(&self.store)
    }

    pub fn describe_group(&self, name: &str) -> Result<commands::CmdResult> {
        commands::groups::describe(&self.store, name)
    }

    pub fn delete_group(&mut self, name: &str) -> Result<commands::CmdResult> {
        commands::groups::delete(&mut self.store, name)
    }

    pub fn doctor(&mut self, target: &Target) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.store, target)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.root, action)
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.root)
    }
}

/// Parses user-supplied note ids. Range checks happen in the store.
fn parse_ids<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<i64>> {
    inputs
        .iter()
        .map(|s| {
            let s = s.as_ref().trim();
            s.parse::<i64>()
                .map_err(|_| KeepError::InvalidId(format!("'{}' is not a note id", s)))
        })
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
