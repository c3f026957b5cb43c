use crate::command::{Command, CommandResult};
use crate::context::CommandContext;
use crate::post::Post;
use crate::render::{error_line, escape_html, highlight, hint_line};

pub const GREP: Command = Command {
    name: "grep",
    aliases: &[],
    description: "Search posts by title, description, or tags",
    usage: Some("grep [-i] <pattern>"),
    execute,
    autocomplete: None,
};

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    let pattern = ctx.args.join(" ");
    if pattern.is_empty() {
        return CommandResult::error(format!(
            "{}\n{}",
            error_line("grep: missing pattern"),
            hint_line("Usage: grep [-i] pattern")
        ));
    }

    let case_insensitive = ctx.has_flag('i');
    let matches = ctx.search_posts(&pattern, case_insensitive);
    if matches.is_empty() {
        return CommandResult::error(error_line(&format!(
            "grep: no matches found for '{pattern}'"
        )));
    }

    let mut out = format!(
        r#"<div class="text-term-fg-dark text-sm mb-3">{} match{} for '{}'</div>
<div class="space-y-3">"#,
        matches.len(),
        if matches.len() == 1 { "" } else { "es" },
        escape_html(&pattern)
    );
    for post in matches {
        out.push('\n');
        out.push_str(&render_match(post, &pattern, case_insensitive));
    }
    out.push_str("\n</div>");

    CommandResult::html(out)
}

fn render_match(post: &Post, pattern: &str, case_insensitive: bool) -> String {
    let mut out = format!(
        r#"<div class="border-l-2 border-term-fg-dark pl-3">
<div class="flex items-center gap-2 flex-wrap"><span class="text-term-purple">./posts/</span><a href="/posts/{}" class="text-term-cyan hover:text-term-blue">{}</a></div>"#,
        escape_html(&post.slug),
        highlight(&post.title, pattern, case_insensitive)
    );

    if !post.description.is_empty() {
        out.push_str(&format!(
            "\n<div class=\"text-term-fg-dark text-sm mt-1\">{}</div>",
            highlight(&post.description, pattern, case_insensitive)
        ));
    }

    if !post.tags.is_empty() {
        let needle = fold(pattern, case_insensitive);
        let tags: Vec<String> = post
            .tags
            .iter()
            .map(|tag| {
                let class = if fold(tag, case_insensitive).contains(&needle) {
                    "term-grep-match"
                } else {
                    "text-term-green"
                };
                format!(r#"<span class="{class}">#{}</span>"#, escape_html(tag))
            })
            .collect();
        out.push_str(&format!("\n<div class=\"text-sm mt-1\">{}</div>", tags.join(" ")));
    }

    out.push_str("\n</div>");
    out
}

fn fold(text: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}
