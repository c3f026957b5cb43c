use crate::command::{Command, CommandResult};
use crate::commands::complete::PathCompletion;
use crate::context::CommandContext;
use crate::path::{resolve_path, BlogPath, TOP_LEVEL};
use crate::post::{group_by_year, sort_by_date, Order, Post};
use crate::render::{error_line, escape_html, format_date, slugify};

pub const LS: Command = Command {
    name: "ls",
    aliases: &[],
    description: "List directory contents",
    usage: Some("ls [-la] [path]"),
    execute,
    autocomplete: Some(autocomplete),
};

const PATHS: PathCompletion = PathCompletion {
    directories: &TOP_LEVEL,
    posts_at_root: false,
};

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    let detailed = ctx.has_flag('l');
    let input = ctx.arg(0).unwrap_or(".");
    let resolved = resolve_path(input, ctx.current_path);

    let html = match BlogPath::parse(&resolved) {
        Some(BlogPath::Root) => render_root(ctx, detailed),
        Some(BlogPath::Posts) => render_files(&sort_by_date(ctx.posts, Order::NewestFirst), detailed),
        Some(BlogPath::Archives) => render_archives(ctx.posts, detailed),
        Some(BlogPath::Search) => render_search(detailed),
        Some(BlogPath::Series) => render_series(ctx, detailed),
        Some(BlogPath::Tags) => render_tags(ctx, detailed),
        Some(BlogPath::Post(slug)) => match ctx.find_post(&slug) {
            Some(post) => render_files(&[post], detailed),
            None => return not_found(input),
        },
        Some(BlogPath::SeriesItem(name)) => match ctx.find_series(&name) {
            Some(series) => render_series_posts(ctx, series, detailed),
            None => return not_found(&format!("series/{name}")),
        },
        Some(BlogPath::TagItem(tag)) => match ctx.find_tag(&tag) {
            Some(tag) => render_tag_posts(ctx, tag, detailed),
            None => return not_found(&format!("tags/{tag}")),
        },
        // a bare series slug lists that series from anywhere
        None => match ctx.find_series(&resolved) {
            Some(series) => render_series_posts(ctx, series, detailed),
            None => return not_found(input),
        },
    };

    CommandResult::html(html)
}

fn not_found(input: &str) -> CommandResult {
    CommandResult::error(error_line(&format!(
        "ls: cannot access '{input}': No such file or directory"
    )))
}

fn render_root(ctx: &CommandContext<'_>, detailed: bool) -> String {
    let posts = ctx.posts.len();
    let entries = [
        ("drwxr-xr-x", "ls archives/", "archives/", format!("{posts} files")),
        ("drwxr-xr-x", "ls posts/", "posts/", format!("{posts} files")),
        ("-rwxr-xr-x", "cd search", "search", "interactive".to_string()),
        ("drwxr-xr-x", "ls series/", "series/", format!("{} dirs", ctx.series_names().len())),
        ("drwxr-xr-x", "ls tags/", "tags/", format!("{} items", ctx.all_tags().len())),
    ];

    if !detailed {
        let names: Vec<String> = entries
            .iter()
            .map(|(_, cmd, name, _)| {
                format!(r#"<span class="term-ls-dir cursor-pointer hover:text-term-cyan" data-cmd="{cmd}">{name}</span>"#)
            })
            .collect();
        return format!(r#"<div class="flex flex-wrap gap-4">{}</div>"#, names.join("\n"));
    }

    let mut out = format!(
        r#"<div class="term-ls">
<div class="text-term-fg-dark text-sm mb-2">total {}</div>"#,
        entries.len()
    );
    for (perms, cmd, name, size) in &entries {
        out.push_str(&format!(
            r#"
<div class="term-ls-entry"><span class="term-ls-perms">{perms}</span> <span class="term-ls-name term-ls-dir cursor-pointer hover:text-term-cyan" data-cmd="{cmd}">{name}</span> <span class="text-term-fg-dark text-sm">{size}</span></div>"#
        ));
    }
    out.push_str("\n</div>");
    out
}

fn file_entry(post: &Post, detailed: bool) -> String {
    let slug = escape_html(&post.slug);
    let name = escape_html(&post.file_name());
    if detailed {
        format!(
            r#"<div class="term-ls-entry"><span class="term-ls-perms">-rw-r--r--</span> <a href="/posts/{slug}" class="term-ls-name hover:text-term-cyan" data-cmd="cat {slug}">{name}</a> <span class="term-ls-date">{}</span></div>"#,
            format_date(&post.date)
        )
    } else {
        format!(
            r#"<div class="term-ls-entry-simple"><a href="/posts/{slug}" class="text-term-fg hover:text-term-cyan" data-cmd="cat {slug}">{name}</a></div>"#
        )
    }
}

fn total(count: usize, unit: &str) -> String {
    format!(r#"<div class="text-term-fg-dark text-sm mb-2">total {count}{unit}</div>"#)
}

fn render_files(posts: &[&Post], detailed: bool) -> String {
    let mut out = String::from(r#"<div class="term-ls">"#);
    out.push_str(&total(posts.len(), ""));
    for post in posts {
        out.push('\n');
        out.push_str(&file_entry(post, detailed));
    }
    out.push_str("\n</div>");
    out
}

fn render_archives(posts: &[Post], detailed: bool) -> String {
    let mut out = String::from(r#"<div class="term-ls">"#);
    out.push_str(&total(posts.len(), ""));
    for (year, bucket) in group_by_year(posts) {
        let year = year.map_or_else(|| "undated".to_string(), |y| y.to_string());
        out.push_str(&format!(
            r#"
<div class="term-ls-dir mt-2">{year}/ <span class="text-term-fg-dark text-sm">({} posts)</span></div>"#,
            bucket.len()
        ));
        for post in bucket {
            out.push('\n');
            out.push_str(&file_entry(post, detailed));
        }
    }
    out.push_str("\n</div>");
    out
}

fn render_search(detailed: bool) -> String {
    let name = r#"<span class="term-ls-name cursor-pointer hover:text-term-cyan" data-cmd="cd search">search</span>"#;
    if detailed {
        format!(
            r#"<div class="term-ls-entry"><span class="term-ls-perms">-rwxr-xr-x</span> {name} <span class="text-term-fg-dark text-sm">interactive</span></div>"#
        )
    } else {
        name.to_string()
    }
}

fn render_series(ctx: &CommandContext<'_>, detailed: bool) -> String {
    let names = ctx.series_names();
    let mut out = String::from(r#"<div class="term-ls">"#);
    out.push_str(&total(names.len(), ""));

    for series in names {
        let slug = escape_html(&slugify(series));
        let label = escape_html(series);
        let count = ctx
            .posts
            .iter()
            .filter(|post| post.series.as_deref() == Some(series))
            .count();
        out.push('\n');
        if detailed {
            out.push_str(&format!(
                r#"<div class="term-ls-entry"><span class="term-ls-perms">drwxr-xr-x</span> <a href="/series/{slug}" class="term-ls-name term-ls-dir hover:text-term-cyan" data-cmd="ls series/{slug}">{label}/</a> <span class="text-term-fg-dark text-sm">{count} posts</span></div>"#
            ));
        } else {
            out.push_str(&format!(
                r#"<div><a href="/series/{slug}" class="term-ls-dir hover:text-term-cyan" data-cmd="ls series/{slug}">{label}/</a></div>"#
            ));
        }
    }
    out.push_str("\n</div>");
    out
}

fn render_series_posts(ctx: &CommandContext<'_>, series: &str, detailed: bool) -> String {
    let posts = sort_by_date(
        ctx.posts.iter().filter(|post| post.series.as_deref() == Some(series)),
        Order::OldestFirst,
    );
    render_files(&posts, detailed)
}

fn render_tag_posts(ctx: &CommandContext<'_>, tag: &str, detailed: bool) -> String {
    let posts = sort_by_date(
        ctx.posts.iter().filter(|post| post.has_tag_slug(tag)),
        Order::NewestFirst,
    );
    render_files(&posts, detailed)
}

/// Tags with counts, most used first.
pub(crate) fn sorted_tag_counts<'a>(ctx: &CommandContext<'a>) -> Vec<(&'a str, usize)> {
    let mut counts = ctx.tag_counts();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn render_tags(ctx: &CommandContext<'_>, detailed: bool) -> String {
    let counts = sorted_tag_counts(ctx);
    let mut out = String::from(r#"<div class="term-ls">"#);
    out.push_str(&total(counts.len(), " tags"));

    for (tag, count) in counts {
        let slug = escape_html(&slugify(tag));
        let label = escape_html(tag);
        out.push('\n');
        if detailed {
            out.push_str(&format!(
                r#"<div class="term-ls-entry"><span class="text-term-yellow w-8 text-right mr-4">{count:>3}</span> <a href="/tags/{slug}" class="text-term-green hover:text-term-cyan" data-cmd="ls tags/{slug}">#{label}</a></div>"#
            ));
        } else {
            out.push_str(&format!(
                r#"<a href="/tags/{slug}" class="inline-block mr-3 mb-1 text-term-green hover:text-term-cyan" data-cmd="ls tags/{slug}">#{label}</a>"#
            ));
        }
    }
    out.push_str("\n</div>");
    out
}

fn autocomplete(ctx: &CommandContext<'_>, partial: &str) -> Vec<String> {
    if partial.starts_with('-') {
        let partial = partial.to_lowercase();
        return ["-l", "-la"]
            .into_iter()
            .filter(|flag| flag.starts_with(&partial))
            .map(String::from)
            .collect();
    }
    PATHS.candidates(ctx, partial)
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{mock_posts, Fixture};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_compact() {
        let result = Fixture::new().run("ls", "~");
        assert!(!result.error);
        for dir in ["archives/", "posts/", "series/", "tags/", "search"] {
            assert!(result.html.contains(dir), "{dir}");
        }
        assert!(!result.html.contains("drwxr-xr-x"));
    }

    #[test]
    fn test_root_detailed() {
        let result = Fixture::new().run("ls -l", "~");
        assert!(result.html.contains("drwxr-xr-x"));
        assert!(result.html.contains("total 5"));
        assert!(result.html.contains(&format!("{} files", mock_posts().len())));
        assert!(result.html.contains("3 dirs"));
    }

    #[test]
    fn test_combined_flag_is_detailed() {
        let result = Fixture::new().run("ls -la posts", "~");
        assert!(result.html.contains("-rw-r--r--"));
        assert!(result.html.contains("term-ls-date"));
        assert!(result.html.contains("Dec 31 2022"));
    }

    #[test]
    fn test_posts_newest_first() {
        let result = Fixture::new().run("ls posts", "~");
        assert!(result.html.contains(&format!("total {}", mock_posts().len())));
        for post in mock_posts() {
            assert!(result.html.contains(&format!("/posts/{}", post.slug)));
        }
        let newest = result.html.find("2023-goals.md").unwrap();
        let oldest = result.html.find("the-five-dysfunctions-of-a-team.md").unwrap();
        assert!(newest < oldest);
    }

    #[test]
    fn test_dot_in_posts_directory() {
        let result = Fixture::new().run("ls .", "~/posts");
        assert!(result.html.contains(&format!("total {}", mock_posts().len())));
    }

    #[test]
    fn test_series_listing() {
        let result = Fixture::new().run("ls -l series", "~");
        assert!(result.html.contains("Learning Go/"));
        assert!(result.html.contains("Advent of Code 2022/"));
        assert!(result.html.contains("2 posts"));
        let advent = result.html.find("Advent of Code 2022/").unwrap();
        let learning = result.html.find("Learning Go/").unwrap();
        assert!(advent < learning);
    }

    #[test]
    fn test_series_posts_oldest_first() {
        let fixture = Fixture::new();
        for line in ["ls series/advent-of-code-2022", "ls advent-of-code-2022", "ls ./Advent-Of-Code-2022"] {
            let cwd = if line.contains("./") { "~/series" } else { "~" };
            let result = fixture.run(line, cwd);
            assert!(!result.error, "{line}");
            assert!(result.html.contains("total 2"));
            let day1 = result.html.find("day-1.md").unwrap();
            let day2 = result.html.find("day-2.md").unwrap();
            assert!(day1 < day2, "{line}");
        }
    }

    #[test]
    fn test_missing_series() {
        let result = Fixture::new().run("ls series/nope", "~");
        assert!(result.error);
        assert!(result.html.contains("series/nope"));
    }

    #[test]
    fn test_tags_by_count() {
        let result = Fixture::new().run("ls tags", "~");
        assert!(result.html.contains("#Programming"));
        let programming = result.html.find("#Programming").unwrap();
        let books = result.html.find("#Books").unwrap();
        assert!(programming < books);
        assert!(result.html.contains("total 13 tags"));
    }

    #[test]
    fn test_tag_item() {
        let result = Fixture::new().run("ls tags/typescript", "~");
        assert!(!result.error);
        assert!(result.html.contains("total 3"));
    }

    #[test]
    fn test_archives_group_by_year() {
        let result = Fixture::new().run("ls archives", "~");
        assert!(result.html.contains("2022/"));
        assert!(result.html.contains("(7 posts)"));
    }

    #[test]
    fn test_single_post() {
        let result = Fixture::new().run("ls posts/2023-goals.md", "~");
        assert!(result.html.contains("total 1"));
        assert!(result.html.contains("2023-goals.md"));
    }

    #[test]
    fn test_unknown_path() {
        let result = Fixture::new().run("ls <nowhere>", "~");
        assert!(result.error);
        assert!(result.html.contains("No such file or directory"));
        assert!(result.html.contains("&lt;nowhere&gt;"));
    }

    #[test]
    fn test_escapes_series_names() {
        let mut posts = mock_posts();
        posts[0].series = Some("<b>Bold</b>".into());
        let result = Fixture::with_posts(posts).run("ls series", "~");
        assert!(!result.html.contains("<b>"));
        assert!(result.html.contains("&lt;b&gt;Bold&lt;/b&gt;/"));
    }

    #[test]
    fn test_slash_names_stay_one_segment() {
        let mut posts = mock_posts();
        posts[0].tags.push("CI/CD".into());
        posts[0].series = Some("Rust/WASM".into());
        let fixture = Fixture::with_posts(posts);

        let tags = fixture.run("ls tags", "~");
        assert!(tags.html.contains(r#"data-cmd="ls tags/ci-cd""#));
        assert!(tags.html.contains(r#"href="/tags/ci-cd""#));
        let tagged = fixture.run("ls tags/ci-cd", "~");
        assert!(!tagged.error);
        assert!(tagged.html.contains("total 1"));
        assert!(tagged.html.contains("2023-goals.md"));

        let series = fixture.run("ls series", "~");
        assert!(series.html.contains(r#"data-cmd="ls series/rust-wasm""#));
        for line in ["ls series/rust-wasm", "ls rust-wasm"] {
            let result = fixture.run(line, "~");
            assert!(!result.error, "{line}");
            assert!(result.html.contains("2023-goals.md"), "{line}");
        }
    }

    #[test]
    fn test_autocomplete() {
        let fixture = Fixture::new();
        assert_eq!(fixture.complete("ls", "-", "~"), vec!["-l", "-la"]);
        assert_eq!(fixture.complete("ls", "a", "~"), vec!["archives/"]);
        assert_eq!(fixture.complete("ls", "series/d", "~"), vec!["series/data-structures"]);
        assert_eq!(fixture.complete("ls", "l", "~/series"), vec!["learning-go"]);
        assert!(fixture.complete("ls", "2", "~").is_empty());
    }
}
