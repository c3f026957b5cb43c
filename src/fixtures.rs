//! Shared test data.

use crate::command::{CommandRegistry, CommandResult};
use crate::command_call::parse_command;
use crate::commands::command_registry;
use crate::context::CommandContext;
use crate::post::Post;

fn post(
    slug: &str,
    title: &str,
    description: &str,
    date: &str,
    tags: &[&str],
    series: Option<&str>,
    body: &str,
) -> Post {
    Post {
        slug: slug.into(),
        title: title.into(),
        description: description.into(),
        date: date.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        series: series.map(Into::into),
        body: body.into(),
    }
}

pub(crate) fn mock_posts() -> Vec<Post> {
    vec![
        post(
            "2023-goals",
            "Ready, Set, Go! My Goals for a Productive and Fulfilling 2023",
            "As the new year approaches, it's natural to think about our goals and aspirations.",
            "2022-12-31",
            &["Goals", "Productivity"],
            None,
            "As the new year approaches, it's natural to think about our goals and aspirations for the coming year...",
        ),
        post(
            "learning-go-intro",
            "Learning Go - Introduction",
            "Getting started with the Go programming language.",
            "2022-12-15",
            &["Go", "Programming", "Learning"],
            Some("Learning Go"),
            "Go is a statically typed, compiled programming language designed at Google...",
        ),
        post(
            "advent-of-code-2022-day-1",
            "Advent of Code 2022 - Day 1",
            "Solving the first day of Advent of Code 2022.",
            "2022-12-01",
            &["Advent of Code", "Programming", "TypeScript"],
            Some("Advent of Code 2022"),
            "Day 1 of Advent of Code 2022 involves counting calories...",
        ),
        post(
            "advent-of-code-2022-day-2",
            "Advent of Code 2022 - Day 2",
            "Rock Paper Scissors tournament simulation.",
            "2022-12-02",
            &["Advent of Code", "Programming", "TypeScript"],
            Some("Advent of Code 2022"),
            "Day 2 involves simulating a Rock Paper Scissors tournament...",
        ),
        post(
            "5-cli-tools-that-will-increase-your-velocity-and-code-quality",
            "5 CLI Tools That Will Increase Your Velocity and Code Quality",
            "Essential command-line tools for developers.",
            "2022-11-15",
            &["CLI", "Tools", "Productivity"],
            None,
            "As developers, we spend a lot of time in the terminal. Here are 5 CLI tools...",
        ),
        post(
            "data-structures-doubly-linked-list",
            "Data Structures - Doubly Linked List",
            "Understanding and implementing a doubly linked list.",
            "2022-10-20",
            &["Data Structures", "Programming", "TypeScript"],
            Some("Data Structures"),
            "A doubly linked list is a linked data structure that consists of nodes...",
        ),
        post(
            "the-five-dysfunctions-of-a-team",
            "The Five Dysfunctions of a Team",
            "Book review and key takeaways from Patrick Lencioni's book.",
            "2022-09-10",
            &["Books", "Leadership", "Management"],
            None,
            "The Five Dysfunctions of a Team by Patrick Lencioni is a leadership fable...",
        ),
    ]
}

/// Registry plus posts, so tests can run a command line in one call.
pub(crate) struct Fixture {
    pub registry: CommandRegistry,
    pub posts: Vec<Post>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_posts(mock_posts())
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            registry: command_registry(),
            posts,
        }
    }

    pub fn context<'a>(&'a self, line: &str, current_path: &'a str) -> CommandContext<'a> {
        let call = parse_command(line);
        CommandContext::new(&self.registry, &self.posts, current_path).with_call(call.args, call.flags)
    }

    /// Parses and executes `line` at `current_path`. Panics on unknown commands.
    pub fn run(&self, line: &str, current_path: &str) -> CommandResult {
        let call = parse_command(line);
        let command = self
            .registry
            .get(&call.name)
            .unwrap_or_else(|| panic!("unknown command {}", call.name));
        let ctx = self.context(line, current_path);
        command.execute(&ctx)
    }

    /// Autocomplete candidates of the command named in `line` for `partial`.
    pub fn complete(&self, line: &str, partial: &str, current_path: &str) -> Vec<String> {
        let call = parse_command(line);
        let command = self
            .registry
            .get(&call.name)
            .unwrap_or_else(|| panic!("unknown command {}", call.name));
        let ctx = CommandContext::new(&self.registry, &self.posts, current_path);
        command.complete(&ctx, partial).unwrap_or_default()
    }
}
