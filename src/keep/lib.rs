//! # Keep Architecture
//!
//! Keep is a small note keeper. Notes live in flat binary files, one file per
//! group, each made of a fixed-size header followed by fixed-size note slots
//! addressed by id. Like most of its kind it is a library with a CLI client on
//! top, not the other way around.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, sets up logging        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, parses note ids               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One `run` per operation, returns `CmdResult`             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, header.rs, codec.rs)                │
//! │  - DataStore trait: FileStore, InMemoryStore                │
//! │  - Record I/O over any Read + Write + Seek handle           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing exits
//! the process. Diagnostics go through the `log` facade; the binary decides
//! where they end up (see [`logging`]).
//!
//! ## Testing
//!
//! Commands are tested against [`store::memory::InMemoryStore`], which runs
//! the same record code over byte buffers. The record and header layers are
//! tested over `std::io::Cursor`, and file-backed behavior with `tempfile`.
//! The binary is exercised end to end from `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction, record I/O and implementations
//! - [`header`]: Reading and writing file headers
//! - [`codec`]: Byte layout of headers and notes
//! - [`model`]: `Note`, `FileHeader`, `Group`, `Target`
//! - [`config`]: Configuration management
//! - [`logging`]: File logger setup for the binary
//! - [`error`]: Error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod header;
pub mod logging;
pub mod model;
pub mod store;
