use crate::command::{Command, CommandResult};
use crate::commands::complete::PathCompletion;
use crate::context::CommandContext;
use crate::path::{extract_directory, parent_dir, resolve_path, strip_md, to_prompt_path, BlogPath};
use crate::render::{error_line, hint_line, slugify};

pub const CD: Command = Command {
    name: "cd",
    aliases: &[],
    description: "Navigate to a post or section",
    usage: Some("cd <path>"),
    execute,
    autocomplete: Some(autocomplete),
};

const PATHS: PathCompletion = PathCompletion {
    directories: &["posts", "series", "tags"],
    posts_at_root: true,
};

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    let raw = ctx.arg(0).unwrap_or("~");
    let trimmed = raw.trim_end_matches('/');

    match trimmed {
        "~" | "" => return home(),
        ".." => return parent(ctx),
        _ => {}
    }

    let resolved = resolve_path(trimmed, ctx.current_path);

    // a post slug wins over a directory of the same name
    let slug = strip_md(resolved.strip_prefix("posts/").unwrap_or(&resolved));
    if let Some(post) = ctx.find_post(slug) {
        return CommandResult::navigate(
            post.url(),
            hint_line(&format!("Opening {}...", post.title)),
        );
    }

    let target = match BlogPath::parse(&resolved) {
        Some(BlogPath::Root) => return home(),
        Some(BlogPath::Post(_)) => None,
        Some(BlogPath::SeriesItem(name)) => ctx.find_series(&name).map(series_target),
        Some(BlogPath::TagItem(tag)) => ctx.find_tag(&tag).map(|tag| {
            let url = BlogPath::TagItem(slugify(tag)).url();
            (url, format!("Navigating to tag: #{tag}..."))
        }),
        Some(dir) => {
            let url = dir.url();
            let message = format!("Navigating to {url}...");
            Some((url, message))
        }
        None => ctx.find_series(&resolved).map(series_target),
    };

    match target {
        Some((url, message)) => CommandResult::navigate(url, hint_line(&message)),
        None => CommandResult::error(error_line(&format!(
            "cd: no such file or directory: {raw}"
        ))),
    }
}

fn series_target(series: &str) -> (String, String) {
    let url = BlogPath::SeriesItem(slugify(series)).url();
    (url, format!("Navigating to series: {series}..."))
}

fn home() -> CommandResult {
    CommandResult::navigate("/", "").with_path("~")
}

/// `..` on a post page goes back in browser history; elsewhere it moves to
/// the parent directory, and root stays put.
fn parent(ctx: &CommandContext<'_>) -> CommandResult {
    let current = extract_directory(ctx.current_path);
    if current.is_empty() {
        return CommandResult::html("").with_path("~");
    }
    if matches!(BlogPath::parse(&current), Some(BlogPath::Post(_))) {
        return CommandResult::go_back();
    }

    let parent = parent_dir(&current);
    CommandResult::navigate(format!("/{parent}"), "").with_path(to_prompt_path(&parent))
}

fn autocomplete(ctx: &CommandContext<'_>, partial: &str) -> Vec<String> {
    PATHS.candidates(ctx, partial)
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{mock_posts, Fixture};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_home_variants() {
        let fixture = Fixture::new();
        for line in ["cd", "cd ~", "cd /", "cd ~/"] {
            let result = fixture.run(line, "~/series/learning-go");
            assert_eq!(result.navigate.as_deref(), Some("/"), "{line}");
            assert_eq!(result.new_path.as_deref(), Some("~"), "{line}");
            assert!(!result.error);
        }
    }

    #[test]
    fn test_top_level_directories() {
        let fixture = Fixture::new();
        for dir in ["posts", "series", "tags", "archives", "search"] {
            let result = fixture.run(&format!("cd {dir}"), "~");
            assert_eq!(result.navigate, Some(format!("/{dir}")));
            assert!(result.html.contains(&format!("Navigating to /{dir}...")));
        }
        let relative = fixture.run("cd ./posts/", "~");
        assert_eq!(relative.navigate.as_deref(), Some("/posts"));
        let upper = fixture.run("cd POSTS", "~");
        assert_eq!(upper.navigate.as_deref(), Some("/posts"));
    }

    #[test]
    fn test_slash_names_navigate_to_one_segment() {
        let mut posts = mock_posts();
        posts[0].tags.push("CI/CD".into());
        posts[0].series = Some("Rust/WASM".into());
        let fixture = Fixture::with_posts(posts);
        let tag = fixture.run("cd tags/ci-cd", "~");
        assert_eq!(tag.navigate.as_deref(), Some("/tags/ci-cd"));
        let series = fixture.run("cd series/rust-wasm", "~");
        assert_eq!(series.navigate.as_deref(), Some("/series/rust-wasm"));
    }

    #[test]
    fn test_post_slug_beats_directory() {
        let mut posts = mock_posts();
        posts[0].slug = "posts".into();
        let result = Fixture::with_posts(posts).run("cd posts", "~");
        assert_eq!(result.navigate.as_deref(), Some("/posts/posts"));
    }

    #[test]
    fn test_post_navigation() {
        let fixture = Fixture::new();
        for line in ["cd 2023-goals", "cd posts/2023-goals", "cd 2023-GOALS.md"] {
            let result = fixture.run(line, "~");
            assert_eq!(result.navigate.as_deref(), Some("/posts/2023-goals"), "{line}");
            assert!(result.html.contains("Opening Ready, Set, Go!"));
        }
        let inside = fixture.run("cd ./2023-goals", "~/posts");
        assert_eq!(inside.navigate.as_deref(), Some("/posts/2023-goals"));
    }

    #[test]
    fn test_series_navigation() {
        let fixture = Fixture::new();
        for line in ["cd series/learning-go", "cd learning-go", "cd Series/Learning-Go"] {
            let result = fixture.run(line, "~");
            assert_eq!(result.navigate.as_deref(), Some("/series/learning-go"), "{line}");
            assert!(result.html.contains("Navigating to series: Learning Go..."));
        }
        let relative = fixture.run("cd ./advent-of-code-2022", "~/series");
        assert_eq!(relative.navigate.as_deref(), Some("/series/advent-of-code-2022"));
    }

    #[test]
    fn test_tag_navigation() {
        let result = Fixture::new().run("cd tags/advent-of-code", "~");
        assert_eq!(result.navigate.as_deref(), Some("/tags/advent-of-code"));
        assert!(result.html.contains("#Advent of Code"));
    }

    #[test]
    fn test_parent_from_post_goes_back() {
        let result = Fixture::new().run("cd ..", "~/posts/2023-goals");
        assert!(result.go_back);
        assert_eq!(result.new_path, None);
        assert_eq!(result.navigate, None);
    }

    #[test]
    fn test_parent_directories() {
        let fixture = Fixture::new();
        let from_series = fixture.run("cd ..", "~/series/learning-go");
        assert_eq!(from_series.new_path.as_deref(), Some("~/series"));
        assert_eq!(from_series.navigate.as_deref(), Some("/series"));

        let from_posts = fixture.run("cd ..", "~/posts");
        assert_eq!(from_posts.new_path.as_deref(), Some("~"));
        assert_eq!(from_posts.navigate.as_deref(), Some("/"));

        let at_root = fixture.run("cd ..", "~");
        assert_eq!(at_root.new_path.as_deref(), Some("~"));
        assert_eq!(at_root.navigate, None);
        assert!(!at_root.go_back);
    }

    #[test]
    fn test_unknown_target() {
        let fixture = Fixture::new();
        for target in ["nowhere", "series/nope", "tags/nope", "posts/nope"] {
            let result = fixture.run(&format!("cd {target}"), "~");
            assert!(result.error, "{target}");
            assert_eq!(result.navigate, None);
            assert_eq!(result.new_path, None);
            assert!(result.html.contains(&format!("cd: no such file or directory: {target}")));
        }
    }

    #[test]
    fn test_error_escapes_input() {
        let result = Fixture::new().run("cd <script>", "~");
        assert!(result.error);
        assert!(!result.html.contains("<script>"));
        assert!(result.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_autocomplete_at_root_offers_directories_and_posts() {
        let fixture = Fixture::new();
        assert_eq!(fixture.complete("cd", "", "~").len(), 3 + mock_posts().len());
        assert_eq!(fixture.complete("cd", "t", "~"), vec!["tags/", "the-five-dysfunctions-of-a-team"]);
        assert_eq!(fixture.complete("cd", "tags/pro", "~"), vec!["tags/productivity", "tags/programming"]);
        assert!(fixture.complete("cd", "x", "~/series/learning-go").is_empty());
    }
}
