//! The post collection handed to the terminal by the site.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::{Datelike, DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::slugify;

/// A published post. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO date (`2022-12-31`) or RFC 3339 timestamp.
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub body: String,
}

impl Post {
    /// Publication time, if `date` parses.
    pub fn published(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    pub fn url(&self) -> String {
        format!("/posts/{}", self.slug)
    }

    /// `ls` style file name, `<slug>.md`.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }

    pub fn series_slug(&self) -> Option<String> {
        self.series.as_deref().map(slugify)
    }

    /// True when any tag slugifies to the same slug as `slug`.
    pub fn has_tag_slug(&self, slug: &str) -> bool {
        let wanted = slugify(slug);
        self.tags.iter().any(|tag| slugify(tag) == wanted)
    }
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    NewestFirst,
    OldestFirst,
}

/// Sorts by publication date. Undated posts go last for newest-first and
/// first for oldest-first; ties keep collection order.
pub fn sort_by_date<'a, I>(posts: I, order: Order) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut sorted: Vec<&Post> = posts.into_iter().collect();
    match order {
        Order::OldestFirst => sorted.sort_by_key(|post| post.published()),
        Order::NewestFirst => sorted.sort_by(|a, b| b.published().cmp(&a.published())),
    }
    sorted
}

/// Posts grouped by series name, names in byte order.
pub fn group_by_series(posts: &[Post]) -> BTreeMap<&str, Vec<&Post>> {
    let mut groups: BTreeMap<&str, Vec<&Post>> = BTreeMap::new();
    for post in posts {
        if let Some(series) = post.series.as_deref() {
            groups.entry(series).or_default().push(post);
        }
    }
    groups
}

/// Posts grouped by publication year, newest year first. Undated posts are
/// grouped under `None` at the end.
pub fn group_by_year(posts: &[Post]) -> Vec<(Option<i32>, Vec<&Post>)> {
    let mut groups: Vec<(Option<i32>, Vec<&Post>)> = Vec::new();
    for post in sort_by_date(posts, Order::NewestFirst) {
        let year = post.published().map(|date| date.year());
        match groups.last_mut() {
            Some((last, bucket)) if *last == year => bucket.push(post),
            _ => groups.push((year, vec![post])),
        }
    }
    groups
}

#[derive(Debug, Error)]
pub enum PostError {
    #[error("failed to read posts from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse posts: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate post slug '{0}'")]
    DuplicateSlug(String),
    #[error("post '{0}' has an empty slug")]
    EmptySlug(String),
}

/// Parses a JSON array of posts and checks that slugs are unique.
pub fn parse_posts(json: &str) -> Result<Vec<Post>, PostError> {
    let posts: Vec<Post> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for post in &posts {
        if post.slug.trim().is_empty() {
            return Err(PostError::EmptySlug(post.title.clone()));
        }
        if !seen.insert(post.slug.as_str()) {
            return Err(PostError::DuplicateSlug(post.slug.clone()));
        }
    }

    Ok(posts)
}

pub fn load_posts(path: impl AsRef<Path>) -> Result<Vec<Post>, PostError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| PostError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let posts = parse_posts(&json)?;
    tracing::debug!(path = %path.display(), count = posts.len(), "loaded posts");
    Ok(posts)
}
