use std::collections::HashMap;

use crate::commands::theme::Theme;
use crate::context::CommandContext;

pub type ExecuteFn = fn(&CommandContext<'_>) -> CommandResult;
pub type CompleteFn = fn(&CommandContext<'_>, &str) -> Vec<String>;

/// A named, stateless capability. Commands are plain data plus function
/// pointers, so the whole set can live in `const` items.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: Option<&'static str>,
    pub execute: ExecuteFn,
    pub autocomplete: Option<CompleteFn>,
}

impl Command {
    pub fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        (self.execute)(ctx)
    }

    /// `None` when the command has no completion of its own.
    pub fn complete(&self, ctx: &CommandContext<'_>, partial: &str) -> Option<Vec<String>> {
        self.autocomplete.map(|complete| complete(ctx, partial))
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("autocomplete", &self.autocomplete.is_some())
            .finish()
    }
}

/// What a command asks the engine to do.
///
/// `html` is always pre-escaped markup. The engine applies the other fields
/// in a fixed order: `go_back`, `navigate`, `clear`, `new_path`, `theme`,
/// then shows `html`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub html: String,
    pub new_path: Option<String>,
    pub navigate: Option<String>,
    pub go_back: bool,
    pub clear: bool,
    pub error: bool,
    pub theme: Option<Theme>,
}

impl CommandResult {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    pub fn error(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            error: true,
            ..Self::default()
        }
    }

    pub fn navigate(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            navigate: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn go_back() -> Self {
        Self {
            go_back: true,
            ..Self::default()
        }
    }

    pub fn clear() -> Self {
        Self {
            clear: true,
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.new_path = Some(path.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// Case-insensitive lookup of commands by name or alias.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    cmds: HashMap<String, Command>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `cmd` under its lowercased name and records its aliases.
    /// Registering a name again replaces the earlier command.
    pub fn register(&mut self, cmd: Command) {
        let name = cmd.name.to_lowercase();
        for alias in cmd.aliases {
            self.aliases.insert(alias.to_lowercase(), name.clone());
        }
        self.cmds.insert(name, cmd);
    }

    pub fn register_all(&mut self, cmds: impl IntoIterator<Item = Command>) {
        for cmd in cmds {
            self.register(cmd);
        }
    }

    /// Direct names win over aliases.
    pub fn get(&self, name: &str) -> Option<&Command> {
        let name = name.to_lowercase();
        self.cmds.get(&name).or_else(|| {
            self.aliases
                .get(&name)
                .and_then(|primary| self.cmds.get(primary))
        })
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Primary commands only, in no particular order.
    pub fn list(&self) -> Vec<&Command> {
        self.cmds.values().collect()
    }

    /// Every name and alias, sorted.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .cmds
            .keys()
            .chain(self.aliases.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.list_names()
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .collect()
    }
}
