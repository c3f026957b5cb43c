//! The built-in command set.

pub mod cat;
pub mod cd;
pub mod complete;
pub mod find;
pub mod grep;
pub mod help;
pub mod history;
pub mod ls;
pub mod theme;
pub mod tree;
pub mod utils;

use crate::command::{Command, CommandRegistry};

/// Every built-in command, in registration order.
pub fn all_commands() -> Vec<Command> {
    let mut cmds = vec![
        ls::LS,
        cd::CD,
        cat::CAT,
        grep::GREP,
        tree::TREE,
        find::FIND,
        help::HELP,
        theme::THEME,
        history::HISTORY,
    ];
    cmds.extend(utils::ALL);
    cmds
}

/// A fresh registry holding [`all_commands`].
pub fn command_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register_all(all_commands());
    registry
}
