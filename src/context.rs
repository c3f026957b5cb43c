//! The read-only view handed to every command invocation.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::command::CommandRegistry;
use crate::command_call::has_flag;
use crate::path::extract_directory;
use crate::post::Post;
use crate::render::slugify;

/// Identity strings the terminal pretends to run as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: String,
    pub host: String,
    pub home: String,
    pub blog_dir: String,
    pub shell: String,
    pub site: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            user: "gal".into(),
            host: "blog".into(),
            home: "/home/gal".into(),
            blog_dir: "/home/gal/blog".into(),
            shell: "bash".into(),
            site: "gal.sh".into(),
        }
    }
}

impl Profile {
    /// Absolute-looking working directory for `pwd` and `$PWD`.
    pub fn working_dir(&self, current_path: &str) -> String {
        let dir = extract_directory(current_path);
        if dir.is_empty() {
            self.blog_dir.clone()
        } else {
            format!("{}/{dir}", self.blog_dir)
        }
    }
}

static DEFAULT_PROFILE: LazyLock<Profile> = LazyLock::new(Profile::default);

/// Built fresh for each command from engine state and the post list; owns
/// nothing.
#[derive(Debug, Clone)]
pub struct CommandContext<'a> {
    pub registry: &'a CommandRegistry,
    pub posts: &'a [Post],
    pub current_path: &'a str,
    pub args: Vec<String>,
    pub flags: Vec<String>,
    pub profile: &'a Profile,
    /// Active theme name, `None` for the default look.
    pub theme: Option<&'a str>,
}

impl<'a> CommandContext<'a> {
    pub fn new(registry: &'a CommandRegistry, posts: &'a [Post], current_path: &'a str) -> Self {
        Self {
            registry,
            posts,
            current_path,
            args: Vec::new(),
            flags: Vec::new(),
            profile: &DEFAULT_PROFILE,
            theme: None,
        }
    }

    pub fn with_call(mut self, args: Vec<String>, flags: Vec<String>) -> Self {
        self.args = args;
        self.flags = flags;
        self
    }

    pub fn with_profile(mut self, profile: &'a Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_theme(mut self, theme: Option<&'a str>) -> Self {
        self.theme = theme;
        self
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn has_flag(&self, switch: char) -> bool {
        has_flag(&self.flags, switch)
    }

    /// Distinct series names, sorted.
    pub fn series_names(&self) -> Vec<&'a str> {
        self.posts
            .iter()
            .filter_map(|post| post.series.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct tags, sorted.
    pub fn all_tags(&self) -> Vec<&'a str> {
        self.posts
            .iter()
            .flat_map(|post| post.tags.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Occurrences of each tag, in order of first appearance.
    pub fn tag_counts(&self) -> Vec<(&'a str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for tag in self.posts.iter().flat_map(|post| post.tags.iter()) {
            match counts.iter().position(|(name, _)| *name == tag.as_str()) {
                Some(index) => counts[index].1 += 1,
                None => counts.push((tag.as_str(), 1)),
            }
        }
        counts
    }

    /// Substring search over title, description, tags, body and series.
    pub fn search_posts(&self, pattern: &str, case_insensitive: bool) -> Vec<&'a Post> {
        let fold = |text: &str| {
            if case_insensitive {
                text.to_lowercase()
            } else {
                text.to_string()
            }
        };
        let needle = fold(pattern);

        self.posts
            .iter()
            .filter(|post| {
                fold(&post.title).contains(&needle)
                    || fold(&post.description).contains(&needle)
                    || post.tags.iter().any(|tag| fold(tag).contains(&needle))
                    || fold(&post.body).contains(&needle)
                    || post
                        .series
                        .as_deref()
                        .is_some_and(|series| fold(series).contains(&needle))
            })
            .collect()
    }

    /// Case-insensitive slug lookup.
    pub fn find_post(&self, slug: &str) -> Option<&'a Post> {
        self.posts
            .iter()
            .find(|post| post.slug.to_lowercase() == slug.to_lowercase())
    }

    /// Series whose slug matches `slug` (case-insensitive).
    pub fn find_series(&self, slug: &str) -> Option<&'a str> {
        let wanted = slugify(slug);
        self.series_names()
            .into_iter()
            .find(|name| slugify(name) == wanted)
    }

    /// Tag whose slug matches `slug` (case-insensitive).
    pub fn find_tag(&self, slug: &str) -> Option<&'a str> {
        let wanted = slugify(slug);
        self.all_tags()
            .into_iter()
            .find(|tag| slugify(tag) == wanted)
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::Fixture;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_series_names_sorted_and_distinct() {
        let fixture = Fixture::new();
        let ctx = fixture.context("ls", "~");
        assert_eq!(
            ctx.series_names(),
            vec!["Advent of Code 2022", "Data Structures", "Learning Go"]
        );
    }

    #[test]
    fn test_tag_counts_in_first_seen_order() {
        let fixture = Fixture::new();
        let ctx = fixture.context("ls", "~");
        let counts = ctx.tag_counts();
        assert_eq!(counts[0], ("Goals", 1));
        assert_eq!(counts[1], ("Productivity", 2));
        assert!(counts.contains(&("Programming", 4)));
        assert_eq!(counts.len(), ctx.all_tags().len());
    }

    #[test]
    fn test_search_posts_case_rules() {
        let fixture = Fixture::new();
        let ctx = fixture.context("grep", "~");
        assert_eq!(ctx.search_posts("typescript", false).len(), 0);
        assert_eq!(ctx.search_posts("typescript", true).len(), 3);
        assert_eq!(ctx.search_posts("Learning Go", false).len(), 1);
    }

    #[test]
    fn test_search_posts_matches_series() {
        let fixture = Fixture::new();
        let ctx = fixture.context("grep", "~");
        let hits = ctx.search_posts("data structures", true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "data-structures-doubly-linked-list");
    }

    #[test]
    fn test_lookups() {
        let fixture = Fixture::new();
        let ctx = fixture.context("cd", "~");
        assert_eq!(ctx.find_post("2023-GOALS").map(|p| p.slug.as_str()), Some("2023-goals"));
        assert_eq!(ctx.find_series("learning-go"), Some("Learning Go"));
        assert_eq!(ctx.find_tag("Advent-of-Code"), Some("Advent of Code"));
        assert_eq!(ctx.find_tag("missing"), None);
    }

    #[test]
    fn test_working_dir() {
        let fixture = Fixture::new();
        let ctx = fixture.context("pwd", "~/posts");
        assert_eq!(ctx.profile.working_dir(ctx.current_path), "/home/gal/blog/posts");
        assert_eq!(ctx.profile.working_dir("~"), "/home/gal/blog");
    }
}
