use std::fmt;
use std::str::FromStr;

use crate::command::{Command, CommandResult};
use crate::context::CommandContext;
use crate::render::{error_line, escape_html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Default,
    Ubuntu,
    Dracula,
    Matrix,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Ubuntu, Theme::Dracula, Theme::Matrix];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Ubuntu => "ubuntu",
            Theme::Dracula => "dracula",
            Theme::Matrix => "matrix",
        }
    }

    /// Value for the host's theme attribute; the default look has none.
    pub fn attribute(self) -> Option<&'static str> {
        match self {
            Theme::Default => None,
            other => Some(other.as_str()),
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|theme| theme.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == wanted)
            .ok_or(UnknownTheme(wanted))
    }
}

pub const THEME: Command = Command {
    name: "theme",
    aliases: &[],
    description: "Switch terminal theme",
    usage: Some("theme [name]"),
    execute,
    autocomplete: None,
};

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(requested) = ctx.arg(0) else {
        return CommandResult::html(render_current(ctx.theme.unwrap_or("default")));
    };

    match requested.parse::<Theme>() {
        Ok(theme) => CommandResult::html(format!(
            r#"<span class="text-term-green">Theme switched to '{}'</span>"#,
            theme
        ))
        .with_theme(theme),
        Err(UnknownTheme(name)) => CommandResult::error(format!(
            r#"{}
<div class="text-term-fg-dark mt-1">Available themes: {}</div>"#,
            error_line(&format!("Theme '{name}' not found.")),
            Theme::names().collect::<Vec<_>>().join(", ")
        )),
    }
}

fn render_current(current: &str) -> String {
    let choices: Vec<String> = Theme::names()
        .map(|name| {
            format!(
                r#"<span class="text-term-green cursor-pointer hover:underline" data-cmd="theme {name}">{name}</span>"#
            )
        })
        .collect();

    format!(
        r#"<div class="text-term-fg">
  <div>Current theme: <span class="text-term-yellow">{}</span></div>
  <div class="mt-2">Available themes:</div>
  <div class="flex flex-wrap gap-2 mt-1">{}</div>
</div>"#,
        escape_html(current),
        choices.join(" ")
    )
}

/// Theme names starting with `partial`.
pub fn complete(partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    Theme::names()
        .filter(|name| name.starts_with(&partial))
        .map(String::from)
        .collect()
}
