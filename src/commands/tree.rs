use crate::command::{Command, CommandResult};
use crate::commands::ls::sorted_tag_counts;
use crate::context::CommandContext;
use crate::path::{resolve_path, BlogPath};
use crate::post::{group_by_series, group_by_year, sort_by_date, Order, Post};
use crate::render::{error_line, escape_html, format_filename, slugify};

pub const TREE: Command = Command {
    name: "tree",
    aliases: &[],
    description: "Show directory tree structure",
    usage: Some("tree [path]"),
    execute,
    autocomplete: None,
};

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

fn execute(ctx: &CommandContext<'_>) -> CommandResult {
    let input = ctx.arg(0).unwrap_or(".");
    let resolved = resolve_path(input, ctx.current_path);

    let html = match BlogPath::parse(&resolved) {
        Some(BlogPath::Root) => render_root(ctx),
        Some(BlogPath::Posts) => render_files("posts/", &sort_by_date(ctx.posts, Order::NewestFirst)),
        Some(BlogPath::Post(slug)) => match ctx.find_post(&slug) {
            Some(post) => render_files("posts/", &[post]),
            None => return not_found(input),
        },
        Some(BlogPath::Series) => render_series(ctx.posts),
        Some(BlogPath::SeriesItem(name)) => match ctx.find_series(&name) {
            Some(series) => render_series_posts(ctx, series),
            None => return not_found(input),
        },
        Some(BlogPath::Tags) => render_tags(ctx),
        Some(BlogPath::TagItem(tag)) => match ctx.find_tag(&tag) {
            Some(tag) => render_files(
                &format!("#{}/", escape_html(tag)),
                &sort_by_date(
                    ctx.posts.iter().filter(|post| post.has_tag_slug(tag)),
                    Order::NewestFirst,
                ),
            ),
            None => return not_found(input),
        },
        Some(BlogPath::Archives) => render_archives(ctx.posts),
        Some(BlogPath::Search) => render_tree(
            ".",
            vec![Node::leaf(r#"<span class="term-tree-file">search</span>"#.to_string())],
            "0 directories, 1 file".to_string(),
        ),
        // a bare series slug, as `ls` accepts it
        None => match ctx.find_series(&resolved) {
            Some(series) => render_series_posts(ctx, series),
            None => return not_found(input),
        },
    };

    CommandResult::html(html)
}

fn not_found(input: &str) -> CommandResult {
    CommandResult::error(error_line(&format!("tree: '{input}' not found")))
}

/// One line of the tree plus anything nested under it.
struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

fn render_tree(root: &str, nodes: Vec<Node>, footer: String) -> String {
    let mut out = format!(
        r#"<div class="term-tree">
<div class="text-term-blue font-medium">{root}</div>"#
    );
    push_nodes(&mut out, &nodes, "");
    out.push_str(&format!(
        "\n<div class=\"text-term-fg-dark mt-2 text-sm\">{footer}</div>\n</div>"
    ));
    out
}

fn push_nodes(out: &mut String, nodes: &[Node], indent: &str) {
    for (index, node) in nodes.iter().enumerate() {
        let last = index + 1 == nodes.len();
        out.push_str(&format!(
            "\n<div><span class=\"term-tree-branch\">{indent}{}</span>{}</div>",
            if last { LAST } else { BRANCH },
            node.label
        ));
        if !node.children.is_empty() {
            let nested = format!("{indent}{}", if last { BLANK } else { PIPE });
            push_nodes(out, &node.children, &nested);
        }
    }
}

fn file_node(post: &Post) -> Node {
    Node::leaf(format!(
        r#"<a href="/posts/{}" class="term-tree-file hover:text-term-cyan">{}</a>"#,
        escape_html(&post.slug),
        escape_html(&format_filename(&post.title))
    ))
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

fn render_files(root: &str, posts: &[&Post]) -> String {
    render_tree(
        root,
        posts.iter().map(|post| file_node(post)).collect(),
        format!("0 directories, {}", plural(posts.len(), "file", "files")),
    )
}

fn render_series_posts(ctx: &CommandContext<'_>, series: &str) -> String {
    render_files(
        &format!("{}/", escape_html(series)),
        &sort_by_date(
            ctx.posts.iter().filter(|post| post.series.as_deref() == Some(series)),
            Order::OldestFirst,
        ),
    )
}

fn render_root(ctx: &CommandContext<'_>) -> String {
    let posts = ctx.posts.len();
    let dir = |name: &str, detail: String| {
        Node::leaf(format!(
            r#"<span class="term-tree-dir cursor-pointer" data-cmd="tree {name}/">{name}/</span> <span class="text-term-fg-dark text-sm">({detail})</span>"#
        ))
    };
    let nodes = vec![
        dir("archives", plural(posts, "file", "files")),
        dir("posts", plural(posts, "file", "files")),
        Node::leaf(r#"<span class="term-tree-file cursor-pointer" data-cmd="cd search">search</span>"#.to_string()),
        dir("series", plural(ctx.series_names().len(), "dir", "dirs")),
        dir("tags", plural(ctx.all_tags().len(), "item", "items")),
    ];
    render_tree(".", nodes, format!("4 directories, {}", plural(posts, "file", "files")))
}

fn render_series(posts: &[Post]) -> String {
    let groups = group_by_series(posts);
    let files: usize = groups.values().map(Vec::len).sum();
    let nodes = groups
        .iter()
        .map(|(series, members)| Node {
            label: format!(
                r#"<a href="/series/{}" class="term-tree-dir hover:text-term-cyan">{}/</a>"#,
                escape_html(&slugify(series)),
                escape_html(series)
            ),
            children: sort_by_date(members.iter().copied(), Order::OldestFirst)
                .into_iter()
                .map(file_node)
                .collect(),
        })
        .collect();
    render_tree(
        "series/",
        nodes,
        format!(
            "{}, {}",
            plural(groups.len(), "directory", "directories"),
            plural(files, "file", "files")
        ),
    )
}

fn render_tags(ctx: &CommandContext<'_>) -> String {
    let counts = sorted_tag_counts(ctx);
    let total = counts.len();
    let nodes = counts
        .into_iter()
        .map(|(tag, count)| {
            Node::leaf(format!(
                r#"<a href="/tags/{}" class="text-term-green hover:text-term-cyan">#{}</a> <span class="text-term-fg-dark text-sm">({count})</span>"#,
                escape_html(&slugify(tag)),
                escape_html(tag)
            ))
        })
        .collect();
    render_tree("tags/", nodes, format!("0 directories, {}", plural(total, "tag", "tags")))
}

fn render_archives(posts: &[Post]) -> String {
    let years = group_by_year(posts);
    let nodes: Vec<Node> = years
        .iter()
        .map(|(year, bucket)| Node {
            label: format!(
                r#"<span class="term-tree-dir">{}/</span>"#,
                year.map_or_else(|| "undated".to_string(), |y| y.to_string())
            ),
            children: bucket.iter().map(|post| file_node(post)).collect(),
        })
        .collect();
    render_tree(
        "archives/",
        nodes,
        format!(
            "{}, {}",
            plural(years.len(), "directory", "directories"),
            plural(posts.len(), "file", "files")
        ),
    )
}
