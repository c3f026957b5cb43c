use crate::command::{Command, CommandResult};
use crate::context::CommandContext;
use crate::render::{error_line, escape_html, hint_line};

pub const HELP: Command = Command {
    name: "help",
    aliases: &["man", "?"],
    description: "Show this help message",
    usage: Some("help [command]"),
    execute,
    autocomplete: Some(autocomplete),
};

const TIPS: &str = r#"<div class="text-term-fg-dark text-sm mt-4">
<div>Tips:</div>
<div>• Use <span class="text-term-yellow">help &lt;command&gt;</span> for detailed help on a specific command</div>
<div>• Use <span class="text-term-yellow">Tab</span> for auto-completion</div>
<div>• Use <span class="text-term-yellow">↑/↓</span> to navigate command history</div>
<div>• Use <span class="text-term-yellow">Ctrl+L</span> to clear screen</div>
<div>• Click on any file/directory to interact with it</div>
</div>"#;

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    match ctx.arg(0) {
        Some(name) => detail(ctx, name),
        None => CommandResult::html(overview(ctx)),
    }
}

fn overview(ctx: &CommandContext<'_>) -> String {
    let mut commands = ctx.registry.list();
    commands.sort_by_key(|cmd| cmd.name);

    let rows: Vec<String> = commands
        .iter()
        .map(|cmd| {
            let aliases = if cmd.aliases.is_empty() {
                String::new()
            } else {
                format!(
                    r#" <span class="text-term-fg-dark text-xs">({})</span>"#,
                    escape_html(&cmd.aliases.join(", "))
                )
            };
            format!(
                r#"<div class="grid grid-cols-[120px_1fr] gap-2"><span class="text-term-green">{}</span><span class="text-term-fg-dark">{}{aliases}</span></div>"#,
                escape_html(cmd.usage.unwrap_or(cmd.name)),
                escape_html(cmd.description)
            )
        })
        .collect();

    format!(
        r#"<div class="space-y-4">
<div class="text-term-cyan font-medium">Available Commands:</div>
<div class="space-y-2 text-sm">
{}
</div>
{TIPS}
</div>"#,
        rows.join("\n")
    )
}

fn detail(ctx: &CommandContext<'_>, name: &str) -> CommandResult {
    let name = name.to_lowercase();
    let Some(cmd) = ctx.registry.get(&name) else {
        return CommandResult::error(format!(
            "{}\n{}",
            error_line(&format!("help: no help for '{name}'")),
            hint_line("Type 'help' for available commands.")
        ));
    };

    let mut out = format!(
        r#"<div class="space-y-2">
<div><span class="text-term-cyan font-medium">{}</span> — {}</div>"#,
        escape_html(cmd.name),
        escape_html(cmd.description)
    );
    if let Some(usage) = cmd.usage {
        out.push_str(&format!(
            "\n<div><span class=\"text-term-fg-dark\">Usage:</span> <span class=\"text-term-green\">{}</span></div>",
            escape_html(usage)
        ));
    }
    if !cmd.aliases.is_empty() {
        out.push_str(&format!(
            "\n<div><span class=\"text-term-fg-dark\">Aliases:</span> <span class=\"text-term-yellow\">{}</span></div>",
            escape_html(&cmd.aliases.join(", "))
        ));
    }
    out.push_str("\n</div>");
    CommandResult::html(out)
}

fn autocomplete(ctx: &CommandContext<'_>, partial: &str) -> Vec<String> {
    ctx.registry.completions(partial)
}
