//! Path resolution for the blog's virtual directory tree.
//!
//! Prompt paths look like `~` or `~/series/learning-go`. Commands work on the
//! logical directory underneath: the same path without `~` and without
//! leading or trailing slashes (`series/learning-go`, or `""` for root).

use std::fmt;

/// Top-level directories, in listing order.
pub const TOP_LEVEL: [&str; 5] = ["archives", "posts", "search", "series", "tags"];

/// Strips `~` and empty segments from a prompt path: `~/posts/` → `posts`.
pub fn extract_directory(path: &str) -> String {
    let rest = path.strip_prefix('~').unwrap_or(path);
    rest.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parent of a logical directory; parent of a single segment (or root) is root.
pub fn parent_dir(dir: &str) -> String {
    let segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    match segments.split_last() {
        Some((_, parents)) => parents.join("/"),
        None => String::new(),
    }
}

/// Turns a logical directory back into a prompt path: `posts` → `~/posts`.
pub fn to_prompt_path(dir: &str) -> String {
    let dir = extract_directory(dir);
    if dir.is_empty() {
        "~".to_string()
    } else {
        format!("~/{dir}")
    }
}

/// Resolves a path token typed by the user against the current prompt path.
///
/// - `.` or empty: the current directory.
/// - `..`: its parent (root stays root).
/// - `~` or `/`: root.
/// - `./rest`, `../rest`: walked segment by segment from the current directory.
/// - `~/rest`, `/rest`: `rest`, relative to root.
/// - anything else is returned as typed (already root-relative, or a bare
///   slug the caller will look up).
///
/// The result never has a leading `~`/`/` or a trailing `/`.
pub fn resolve_path(token: &str, current_path: &str) -> String {
    let current = extract_directory(current_path);

    let resolved = match token {
        "" | "." => current,
        ".." => parent_dir(&current),
        "~" | "/" => String::new(),
        _ if token.starts_with("./") || token.starts_with("../") => walk(&current, token),
        _ => token.to_string(),
    };

    resolved
        .trim_start_matches(['~', '/'])
        .trim_end_matches('/')
        .to_string()
}

fn walk(start: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = start.split('/').filter(|s| !s.is_empty()).collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Typed form of a logical directory.
///
/// Directory names compare case-insensitively; series, tag and post
/// segments keep the casing they were typed with and are matched against
/// the post collection by the commands themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogPath {
    Root,
    Archives,
    Search,
    Posts,
    Post(String),
    Series,
    SeriesItem(String),
    Tags,
    TagItem(String),
}

impl BlogPath {
    /// Parses a logical directory (`""`, `posts`, `series/<name>`, ...).
    /// Returns `None` for anything outside the grammar.
    pub fn parse(dir: &str) -> Option<Self> {
        let segments: Vec<&str> = dir
            .trim_start_matches('~')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let Some((first, rest)) = segments.split_first() else {
            return Some(BlogPath::Root);
        };

        let path = match (first.to_lowercase().as_str(), rest) {
            ("archives", []) => BlogPath::Archives,
            ("search", []) => BlogPath::Search,
            ("posts", []) => BlogPath::Posts,
            ("posts", [slug]) => BlogPath::Post(strip_md(slug).to_string()),
            ("series", []) => BlogPath::Series,
            ("series", [name]) => BlogPath::SeriesItem((*name).to_string()),
            ("tags", []) => BlogPath::Tags,
            ("tags", [tag]) => BlogPath::TagItem((*tag).to_string()),
            _ => return None,
        };
        Some(path)
    }

    /// Parses a site URL such as `/series/learning-go`.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        Self::parse(path)
    }

    /// Logical directory string, `""` for root.
    pub fn dir(&self) -> String {
        match self {
            BlogPath::Root => String::new(),
            BlogPath::Archives => "archives".to_string(),
            BlogPath::Search => "search".to_string(),
            BlogPath::Posts => "posts".to_string(),
            BlogPath::Post(slug) => format!("posts/{slug}"),
            BlogPath::Series => "series".to_string(),
            BlogPath::SeriesItem(name) => format!("series/{name}"),
            BlogPath::Tags => "tags".to_string(),
            BlogPath::TagItem(tag) => format!("tags/{tag}"),
        }
    }

    /// Site URL for a page transition.
    pub fn url(&self) -> String {
        format!("/{}", self.dir())
    }

    /// Prompt form, `~` or `~/<dir>`.
    pub fn prompt(&self) -> String {
        to_prompt_path(&self.dir())
    }
}

impl fmt::Display for BlogPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prompt())
    }
}

pub(crate) fn strip_md(name: &str) -> &str {
    name.strip_suffix(".md").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_current_directory() {
        assert_eq!(resolve_path(".", "~/posts"), "posts");
        assert_eq!(resolve_path(".", "~"), "");
        assert_eq!(resolve_path("", "~/series/learning-go"), "series/learning-go");
    }

    #[test]
    fn test_resolve_parent() {
        assert_eq!(resolve_path("..", "~/posts"), "");
        assert_eq!(resolve_path("..", "~/series/learning-go"), "series");
        assert_eq!(resolve_path("..", "~"), "");
    }

    #[test]
    fn test_resolve_home() {
        assert_eq!(resolve_path("~", "~/tags/go"), "");
        assert_eq!(resolve_path("/", "~/tags/go"), "");
        assert_eq!(resolve_path("~/series", "~/tags/go"), "series");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_path("./learning-go", "~/series"), "series/learning-go");
        assert_eq!(resolve_path("./posts", "~"), "posts");
        assert_eq!(resolve_path("../tags", "~/series"), "tags");
        assert_eq!(resolve_path("../../posts", "~/series/learning-go"), "posts");
        assert_eq!(resolve_path("../learning-go", "~/series/other"), "series/learning-go");
    }

    #[test]
    fn test_resolve_passthrough() {
        assert_eq!(resolve_path("series/aoc", "~"), "series/aoc");
        assert_eq!(resolve_path("2023-goals", "~/posts"), "2023-goals");
        assert_eq!(resolve_path("posts/", "~"), "posts");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("posts"), "");
        assert_eq!(parent_dir("series/aoc"), "series");
        assert_eq!(parent_dir(""), "");
    }

    #[test]
    fn test_parse_blog_paths() {
        assert_eq!(BlogPath::parse(""), Some(BlogPath::Root));
        assert_eq!(BlogPath::parse("POSTS"), Some(BlogPath::Posts));
        assert_eq!(
            BlogPath::parse("posts/2023-goals.md"),
            Some(BlogPath::Post("2023-goals".into()))
        );
        assert_eq!(
            BlogPath::parse("Series/Learning-Go"),
            Some(BlogPath::SeriesItem("Learning-Go".into()))
        );
        assert_eq!(BlogPath::parse("tags/go"), Some(BlogPath::TagItem("go".into())));
        assert_eq!(BlogPath::parse("nowhere"), None);
        assert_eq!(BlogPath::parse("posts/a/b"), None);
    }

    #[test]
    fn test_url_round_trip() {
        let path = BlogPath::from_url("/series/learning-go?ref=x").unwrap();
        assert_eq!(path, BlogPath::SeriesItem("learning-go".into()));
        assert_eq!(path.url(), "/series/learning-go");
        assert_eq!(path.prompt(), "~/series/learning-go");
        assert_eq!(BlogPath::from_url("/").unwrap().prompt(), "~");
    }

    fn token() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(".".to_string()),
            Just("..".to_string()),
            Just("~".to_string()),
            Just(String::new()),
            "[a-z]{1,6}(/[a-z]{1,6}){0,2}/?",
            "\\./[a-z]{1,6}(/[a-z]{1,6})?",
            "\\.\\./[a-z]{1,6}",
            "~/[a-z]{1,6}",
        ]
    }

    proptest! {
        #[test]
        fn test_resolved_paths_are_clean(
            tok in token(),
            cwd in "~(/[a-z]{1,6}){0,3}",
        ) {
            let resolved = resolve_path(&tok, &cwd);
            prop_assert!(!resolved.starts_with('~'));
            prop_assert!(!resolved.starts_with('/'));
            prop_assert!(!resolved.ends_with('/'));
        }

        #[test]
        fn test_repeated_parent_reaches_root(
            tok in token(),
            cwd in "~(/[a-z]{1,6}){0,3}",
        ) {
            let mut dir = resolve_path(&tok, &cwd);
            for _ in 0..8 {
                dir = resolve_path("..", &to_prompt_path(&dir));
            }
            prop_assert_eq!(dir.as_str(), "");
            prop_assert_eq!(resolve_path("..", &to_prompt_path(&dir)), "");
        }
    }
}
