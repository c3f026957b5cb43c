use crate::command::{Command, CommandResult};
use crate::context::CommandContext;
use crate::post::{sort_by_date, Order, Post};
use crate::render::{error_line, escape_html, format_filename};

pub const FIND: Command = Command {
    name: "find",
    aliases: &[],
    description: "Find posts matching pattern",
    usage: Some("find <pattern>"),
    execute,
    autocomplete: None,
};

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    let pattern = ctx.args.join(" ");
    if pattern.is_empty() {
        return CommandResult::html(render_found(&sort_by_date(ctx.posts, Order::NewestFirst)));
    }

    let matches = ctx.search_posts(&pattern, true);
    if matches.is_empty() {
        return CommandResult::error(error_line(&format!("find: no matches for '{pattern}'")));
    }
    CommandResult::html(render_found(&matches))
}

fn render_found(posts: &[&Post]) -> String {
    let mut out = format!(
        r#"<div class="text-term-fg-dark text-sm mb-2">{} file(s) found:</div>
<div class="space-y-1">"#,
        posts.len()
    );
    for post in posts {
        out.push_str(&format!(
            r#"
<div><span class="text-term-purple">./posts/</span><a href="/posts/{}" class="text-term-cyan hover:text-term-blue transition-colors">{}</a></div>"#,
            escape_html(&post.slug),
            escape_html(&format_filename(&post.title))
        ));
    }
    out.push_str("\n</div>");
    out
}
