use crate::command::{Command, CommandResult};
use crate::commands::complete::post_matches;
use crate::context::CommandContext;
use crate::path::strip_md;
use crate::post::Post;
use crate::render::{error_line, escape_html, format_date, format_filename, preview, slugify};

pub const CAT: Command = Command {
    name: "cat",
    aliases: &[],
    description: "Preview a post's content",
    usage: Some("cat <file>"),
    execute,
    autocomplete: Some(autocomplete),
};

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(requested) = ctx.arg(0) else {
        return CommandResult::error(error_line("cat: missing file operand"));
    };

    let slug = strip_md(requested.strip_prefix("posts/").unwrap_or(requested)).to_lowercase();
    let found = ctx.posts.iter().find(|post| {
        post.slug.to_lowercase() == slug || strip_md(&format_filename(&post.title)) == slug
    });

    match found {
        Some(post) => CommandResult::html(render_post(post)),
        None => CommandResult::error(error_line(&format!(
            "cat: {requested}: No such file or directory"
        ))),
    }
}

fn render_post(post: &Post) -> String {
    let slug = escape_html(&post.slug);
    let mut out = format!(
        r#"<div class="term-cat">
<div class="term-cat-header mb-2"><span class="text-term-fg-dark">---</span></div>
<div class="term-cat-title mb-2"><a href="/posts/{slug}" class="text-term-cyan hover:text-term-blue text-lg font-medium">{}</a></div>
<div class="term-cat-meta text-sm mb-3"><span class="text-term-yellow">{}</span>"#,
        escape_html(&post.title),
        format_date(&post.date),
    );
    if let Some(series) = &post.series {
        out.push_str(&format!(
            r#"<span class="text-term-fg-dark mx-2">|</span><span class="text-term-purple">{}</span>"#,
            escape_html(series)
        ));
    }
    out.push_str("</div>");

    if !post.description.is_empty() {
        out.push_str(&format!(
            "\n<p class=\"text-term-fg mb-3\">{}</p>",
            escape_html(&post.description)
        ));
    }
    if !post.body.is_empty() {
        out.push_str(&format!(
            "\n<div class=\"text-term-fg-dark text-sm mb-3 whitespace-pre-wrap\">{}</div>",
            escape_html(&preview(&post.body))
        ));
    }
    if !post.tags.is_empty() {
        let tags: Vec<String> = post
            .tags
            .iter()
            .map(|tag| {
                format!(
                    r#"<a href="/tags/{}" class="text-term-purple hover:text-term-cyan">#{}</a>"#,
                    escape_html(&slugify(tag)),
                    escape_html(tag)
                )
            })
            .collect();
        out.push_str(&format!("\n<div class=\"mb-3\">{}</div>", tags.join(" ")));
    }

    out.push_str(&format!(
        r#"
<div class="mt-3"><a href="/posts/{slug}" class="term-link">[Read full post →]</a></div>
<div class="term-cat-footer mt-2"><span class="text-term-fg-dark">---</span></div>
</div>"#
    ));
    out
}

fn autocomplete(ctx: &CommandContext<'_>, partial: &str) -> Vec<String> {
    match partial.strip_prefix("posts/") {
        Some(rest) => post_matches(ctx.posts, rest)
            .into_iter()
            .map(|slug| format!("posts/{slug}"))
            .collect(),
        None => post_matches(ctx.posts, partial),
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{mock_posts, Fixture};
    use crate::render::PREVIEW_CHARS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cat_renders_post() {
        let result = Fixture::new().run("cat 2023-goals", "~");
        assert!(!result.error);
        assert!(result.html.contains("/posts/2023-goals"));
        assert!(result.html.contains("#Goals"));
        assert!(result.html.contains("#Productivity"));
        assert!(result.html.contains("Read full post"));
        assert!(result.html.contains("Dec 31 2022"));
        assert!(result.html.contains("Ready, Set, Go!"));
    }

    #[test]
    fn test_cat_accepts_path_forms() {
        let fixture = Fixture::new();
        for line in [
            "cat posts/2023-goals.md",
            "cat 2023-GOALS",
            "cat ready-set-go-my-goals-for-a-productive-and-fu.md",
        ] {
            let result = fixture.run(line, "~");
            assert!(!result.error, "{line}");
            assert!(result.html.contains("/posts/2023-goals"), "{line}");
        }
    }

    #[test]
    fn test_cat_series_and_tag_links() {
        let result = Fixture::new().run("cat advent-of-code-2022-day-1", "~");
        assert!(result.html.contains(r#"<span class="text-term-purple">Advent of Code 2022</span>"#));
        assert!(result.html.contains(r#"href="/tags/advent-of-code""#));
    }

    #[test]
    fn test_cat_missing_operand() {
        let result = Fixture::new().run("cat", "~");
        assert!(result.error);
        assert!(result.html.contains("cat: missing file operand"));
    }

    #[test]
    fn test_cat_missing_post() {
        let result = Fixture::new().run("cat missing-post", "~");
        assert!(result.error);
        assert!(result.html.contains("missing-post"));
        assert!(result.html.contains("No such file or directory"));
    }

    #[test]
    fn test_cat_escapes_every_field() {
        let mut posts = mock_posts();
        posts[0].title = "<script>alert(1)</script>".into();
        posts[0].description = "a <b> & c".into();
        posts[0].tags = vec!["<i>".into()];
        posts[0].series = Some("<s>".into());
        let result = Fixture::with_posts(posts).run("cat 2023-goals", "~");
        assert!(!result.html.contains("<script>"));
        assert!(!result.html.contains("<b>"));
        assert!(!result.html.contains("<i>"));
        assert!(!result.html.contains("<s>"));
        assert!(result.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_cat_preview_is_capped() {
        let mut posts = mock_posts();
        posts[0].body = "x".repeat(PREVIEW_CHARS + 50);
        let result = Fixture::with_posts(posts).run("cat 2023-goals", "~");
        assert!(result.html.contains(&format!("{}...", "x".repeat(PREVIEW_CHARS))));
        assert!(!result.html.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn test_cat_short_body_has_no_ellipsis() {
        let mut posts = mock_posts();
        posts[0].body = "short".into();
        let result = Fixture::with_posts(posts).run("cat 2023-goals", "~");
        assert!(result.html.contains(">short</div>"));
    }

    #[test]
    fn test_autocomplete() {
        let fixture = Fixture::new();
        assert_eq!(fixture.complete("cat", "2", "~/tags"), vec!["2023-goals"]);
        assert_eq!(fixture.complete("cat", "posts/d", "~"), vec!["posts/data-structures-doubly-linked-list"]);
    }
}
