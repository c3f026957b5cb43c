use crate::command::{Command, CommandResult};
use crate::context::CommandContext;
use crate::render::{escape_html, hint_line};

/// Entries shown by `history`.
pub const DISPLAYED: usize = 20;

const EMPTY: &str = "No commands in history";

/// Registered so `help` and completion know the name. The engine answers
/// `history` itself, since the command list lives there.
pub const HISTORY: Command = Command {
    name: "history",
    aliases: &[],
    description: "Show command history",
    usage: None,
    execute,
    autocomplete: None,
};

fn execute(_ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::html(hint_line(EMPTY))
}

/// The last [`DISPLAYED`] entries, numbered by their position in the whole
/// history.
pub fn render_history(history: &[String]) -> String {
    if history.is_empty() {
        return hint_line(EMPTY);
    }

    let start = history.len().saturating_sub(DISPLAYED);
    let mut out = String::from(r#"<div class="space-y-1">"#);
    for (index, entry) in history.iter().enumerate().skip(start) {
        out.push_str(&format!(
            r#"
<div><span class="text-term-fg-dark">{:>4}</span>  <span class="text-term-fg">{}</span></div>"#,
            index + 1,
            escape_html(entry)
        ));
    }
    out.push_str("\n</div>");
    out
}
