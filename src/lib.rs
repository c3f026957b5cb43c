//! A simulated shell over a blog's posts.
//!
//! Posts are exposed as a read-only file tree (`posts/`, `series/`, `tags/`,
//! `archives/`, `search`). Commands are stateless and return a
//! [`CommandResult`]; the [`Engine`] applies those results through a
//! [`Host`], which renders output and performs page transitions.

pub mod command;
pub mod command_call;
pub mod commands;
pub mod context;
pub mod engine;
pub mod path;
pub mod post;
pub mod render;
pub mod storage;

#[cfg(test)]
mod fixtures;

pub use command::{Command, CommandRegistry, CommandResult};
pub use commands::theme::Theme;
pub use context::{CommandContext, Profile};
pub use engine::{BufferHost, Dispatch, Engine, Host, Key, OutputBlock, PromptLine, TerminalConfig};
pub use path::BlogPath;
pub use post::{Post, PostError};
pub use render::EmbeddedCommand;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
