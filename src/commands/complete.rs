//! Completion helpers shared by the path-accepting commands.

use std::collections::BTreeSet;

use crate::context::CommandContext;
use crate::path::{extract_directory, BlogPath};
use crate::post::Post;
use crate::render::slugify;

fn starts_with_ci(candidate: &str, prefix: &str) -> bool {
    candidate.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Post slugs starting with `prefix`, sorted.
pub fn post_matches(posts: &[Post], prefix: &str) -> Vec<String> {
    let mut slugs: Vec<String> = posts
        .iter()
        .filter(|post| starts_with_ci(&post.slug, prefix))
        .map(|post| post.slug.clone())
        .collect();
    slugs.sort();
    slugs
}

/// Distinct series slugs starting with `prefix`, sorted.
pub fn series_matches(posts: &[Post], prefix: &str) -> Vec<String> {
    posts
        .iter()
        .filter_map(|post| post.series_slug())
        .filter(|slug| starts_with_ci(slug, prefix))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct tag slugs starting with `prefix`, sorted.
pub fn tag_matches(posts: &[Post], prefix: &str) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().map(|tag| slugify(tag)))
        .filter(|slug| starts_with_ci(slug, prefix))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `dir/` for each directory starting with `prefix`.
pub fn directory_matches(directories: &[&str], prefix: &str) -> Vec<String> {
    directories
        .iter()
        .filter(|dir| starts_with_ci(dir, prefix))
        .map(|dir| format!("{dir}/"))
        .collect()
}

/// How a command completes a path argument.
#[derive(Debug, Clone, Copy)]
pub struct PathCompletion {
    /// Directories offered at root.
    pub directories: &'static [&'static str],
    /// Also offer bare post slugs at root.
    pub posts_at_root: bool,
}

impl PathCompletion {
    /// `series/`, `tags/` and `posts/` prefixes complete their items; with no
    /// slash the candidates depend on the current directory.
    pub fn candidates(&self, ctx: &CommandContext<'_>, partial: &str) -> Vec<String> {
        if partial.contains('/') {
            let prefixed = |dir: &str, matches: fn(&[Post], &str) -> Vec<String>| {
                partial.strip_prefix(dir).map(|rest| {
                    matches(ctx.posts, rest)
                        .into_iter()
                        .map(|item| format!("{dir}{item}"))
                        .collect::<Vec<_>>()
                })
            };
            return prefixed("series/", series_matches)
                .or_else(|| prefixed("tags/", tag_matches))
                .or_else(|| prefixed("posts/", post_matches))
                .unwrap_or_default();
        }

        match BlogPath::parse(&extract_directory(ctx.current_path)) {
            Some(BlogPath::Posts) => post_matches(ctx.posts, partial),
            Some(BlogPath::Series) => series_matches(ctx.posts, partial),
            Some(BlogPath::Tags) => tag_matches(ctx.posts, partial),
            Some(BlogPath::Root) => {
                let mut candidates = directory_matches(self.directories, partial);
                if self.posts_at_root {
                    candidates.extend(post_matches(ctx.posts, partial));
                }
                candidates
            }
            _ => Vec::new(),
        }
    }
}
