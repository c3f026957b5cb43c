//! Small commands with fixed or nearly fixed output.

use chrono::Local;

use crate::command::{Command, CommandResult};
use crate::context::CommandContext;
use crate::render::{error_line, escape_html, hint_line};

pub const PWD: Command = Command {
    name: "pwd",
    aliases: &[],
    description: "Print current directory",
    usage: None,
    execute: pwd,
    autocomplete: None,
};

pub const WHOAMI: Command = Command {
    name: "whoami",
    aliases: &[],
    description: "Display current user",
    usage: None,
    execute: whoami,
    autocomplete: None,
};

pub const DATE: Command = Command {
    name: "date",
    aliases: &[],
    description: "Show current date and time",
    usage: None,
    execute: date,
    autocomplete: None,
};

pub const ECHO: Command = Command {
    name: "echo",
    aliases: &[],
    description: "Print text to terminal",
    usage: Some("echo <text>"),
    execute: echo,
    autocomplete: None,
};

pub const CLEAR: Command = Command {
    name: "clear",
    aliases: &[],
    description: "Clear the terminal",
    usage: None,
    execute: clear,
    autocomplete: None,
};

pub const EXIT: Command = Command {
    name: "exit",
    aliases: &["logout"],
    description: "Exit the terminal",
    usage: None,
    execute: exit,
    autocomplete: None,
};

pub const SUDO: Command = Command {
    name: "sudo",
    aliases: &[],
    description: "Run command as superuser",
    usage: None,
    execute: sudo,
    autocomplete: None,
};

pub const RM: Command = Command {
    name: "rm",
    aliases: &[],
    description: "Remove files",
    usage: None,
    execute: rm,
    autocomplete: None,
};

pub const EDITOR: Command = Command {
    name: "vim",
    aliases: &["nano", "vi"],
    description: "Text editor",
    usage: None,
    execute: editor,
    autocomplete: None,
};

pub const NEOFETCH: Command = Command {
    name: "neofetch",
    aliases: &[],
    description: "Display system info",
    usage: None,
    execute: neofetch,
    autocomplete: None,
};

pub const ALL: [Command; 10] = [PWD, WHOAMI, DATE, ECHO, CLEAR, EXIT, SUDO, RM, EDITOR, NEOFETCH];

fn blue(text: &str) -> String {
    format!(r#"<span class="text-term-blue">{}</span>"#, escape_html(text))
}

fn user_at_host(ctx: &CommandContext<'_>, user_class: &str) -> String {
    format!(
        r#"<span class="{user_class}">{}</span>@<span class="text-term-purple">{}</span>"#,
        escape_html(&ctx.profile.user),
        escape_html(&ctx.profile.host)
    )
}

fn pwd(ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::html(blue(&ctx.profile.working_dir(ctx.current_path)))
}

fn whoami(ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::html(user_at_host(ctx, "text-term-green"))
}

fn date(_ctx: &CommandContext<'_>) -> CommandResult {
    let now = Local::now().format("%a %b %d %Y %H:%M:%S GMT%z");
    CommandResult::html(format!(r#"<span class="text-term-yellow">{now}</span>"#))
}

fn clear(_ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::clear()
}

fn exit(_ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::html(hint_line("Nice try! Refresh the page to start over."))
}

fn sudo(_ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::error(error_line("Permission denied. Nice try though!"))
}

fn rm(_ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::error(error_line("rm: cannot remove: Read-only file system"))
}

fn editor(_ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::html(hint_line("Editor not available. Try reading with `cat` instead!"))
}

/// Only whole-line `$USER`, `$PWD`, `$HOME` and `$SHELL` (or lowercase) are
/// expanded.
fn echo(ctx: &CommandContext<'_>) -> CommandResult {
    let text = ctx.args.join(" ");
    let profile = ctx.profile;
    let html = match text.as_str() {
        "$USER" | "$user" => format!(
            r#"<span class="text-term-green">{}</span>"#,
            escape_html(&profile.user)
        ),
        "$PWD" | "$pwd" => blue(&profile.working_dir(ctx.current_path)),
        "$HOME" | "$home" => blue(&profile.home),
        "$SHELL" | "$shell" => format!(
            r#"<span class="text-term-fg">{}</span>"#,
            escape_html(&profile.shell)
        ),
        _ => format!(r#"<span class="text-term-fg">{}</span>"#, escape_html(&text)),
    };
    CommandResult::html(html)
}

const LOGO: &str = r"   ___       __
  / _ \___ _/ /
 / , _/ _ `/ /
/_/|_|\_,_/_/";

fn neofetch(ctx: &CommandContext<'_>) -> CommandResult {
    let field = |label: &str, value: &str| {
        format!(
            r#"<div><span class="text-term-green">{label}:</span> <span class="text-term-fg">{}</span></div>"#,
            escape_html(value)
        )
    };
    let rows = [
        field("OS", "Blog Shell"),
        field("Host", &ctx.profile.site),
        field("Shell", ctx.profile.shell.as_str()),
        field("Theme", ctx.theme.unwrap_or("default")),
        field("Posts", &ctx.posts.len().to_string()),
        field("Series", &ctx.series_names().len().to_string()),
        field("Tags", &ctx.all_tags().len().to_string()),
    ];

    CommandResult::html(format!(
        r#"<div class="flex gap-6 items-start flex-wrap">
<pre class="text-term-cyan text-xs leading-tight">{}</pre>
<div class="text-sm space-y-1">
<div>{}</div>
<div class="text-term-fg-dark">-----------</div>
{}
</div>
</div>"#,
        escape_html(LOGO),
        user_at_host(ctx, "text-term-cyan"),
        rows.join("\n")
    ))
}
