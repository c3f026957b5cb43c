//! The stateful side of the terminal.
//!
//! [`Engine`] owns the current path, the command history, the input line and
//! the tab-completion cursor. Everything visible goes through a [`Host`]:
//! the engine never renders or navigates on its own, so the same engine runs
//! behind a browser bridge, the REPL in `main.rs`, or a [`BufferHost`] in
//! tests.

use tracing::{debug, info, trace, warn};

use crate::command::{CommandRegistry, CommandResult};
use crate::command_call::parse_command;
use crate::commands::command_registry;
use crate::commands::complete::{post_matches, PathCompletion};
use crate::commands::history::{render_history, HISTORY};
use crate::commands::ls::LS;
use crate::commands::theme::{self, Theme, THEME};
use crate::commands::{find::FIND, grep::GREP, tree::TREE};
use crate::context::{CommandContext, Profile};
use crate::path::to_prompt_path;
use crate::post::Post;
use crate::render::{embedded_commands, error_line, escape_html, hint_line, strip_tags, EmbeddedCommand};
use crate::storage::{MemoryStorage, Storage};

/// Session key holding the JSON list of recent commands.
pub const HISTORY_KEY: &str = "terminal-history";
/// Preference key holding the theme name; absent means default.
pub const THEME_KEY: &str = "terminal-theme";
/// Commands kept in session storage.
pub const PERSISTED_HISTORY: usize = 50;

const PATH_ARGUMENTS: PathCompletion = PathCompletion {
    directories: &["posts", "series", "tags"],
    posts_at_root: false,
};

/// Everything the engine needs at start-up.
pub struct TerminalConfig {
    pub posts: Vec<Post>,
    /// Prompt path of the page the terminal is embedded in, `~` for root.
    pub prompt_path: String,
    /// Pages that already render their own listing skip the initial `ls`.
    pub skip_initial_listing: bool,
    pub profile: Profile,
    /// Session-scoped store for the command history.
    pub session: Box<dyn Storage>,
    /// Long-lived store for the theme preference.
    pub preferences: Box<dyn Storage>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            prompt_path: "~".to_string(),
            skip_initial_listing: false,
            profile: Profile::default(),
            session: Box::new(MemoryStorage::new()),
            preferences: Box::new(MemoryStorage::new()),
        }
    }
}

impl TerminalConfig {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn with_prompt_path(mut self, path: impl Into<String>) -> Self {
        self.prompt_path = path.into();
        self
    }

    pub fn skip_initial_listing(mut self) -> Self {
        self.skip_initial_listing = true;
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_session(mut self, storage: impl Storage + 'static) -> Self {
        self.session = Box::new(storage);
        self
    }

    pub fn with_preferences(mut self, storage: impl Storage + 'static) -> Self {
        self.preferences = Box::new(storage);
        self
    }
}

/// The echoed command line, as shown above its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLine {
    pub user: String,
    pub host: String,
    pub path: String,
    pub command: String,
}

impl PromptLine {
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="term-history-entry mb-1"><span class="term-prompt"><span class="text-term-green">{}</span><span class="text-term-fg-dark">@</span><span class="text-term-purple">{}</span> <span class="text-term-blue ml-1">{}</span> <span class="text-term-cyan ml-1">(main)</span> <span class="text-term-fg ml-1">$</span></span> <span class="text-term-green ml-2">{}</span></div>"#,
            escape_html(&self.user),
            escape_html(&self.host),
            escape_html(&self.path),
            escape_html(&self.command)
        )
    }

    pub fn to_text(&self) -> String {
        format!("{}@{} {} (main) $ {}", self.user, self.host, self.path, self.command)
    }
}

/// One unit of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBlock {
    Prompt(PromptLine),
    /// Pre-escaped command output. `spaced` blocks get a wider bottom margin;
    /// the automatic listing is tight.
    Markup { html: String, spaced: bool },
}

impl OutputBlock {
    pub fn to_html(&self) -> String {
        match self {
            OutputBlock::Prompt(prompt) => prompt.to_html(),
            OutputBlock::Markup { html, spaced } => format!(
                r#"<div class="term-output {}">{html}</div>"#,
                if *spaced { "mb-2" } else { "mb-1" }
            ),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            OutputBlock::Prompt(prompt) => prompt.to_text(),
            OutputBlock::Markup { html, .. } => strip_tags(html),
        }
    }

    /// Clickable commands inside this block.
    pub fn embedded_commands(&self) -> Vec<EmbeddedCommand> {
        match self {
            OutputBlock::Prompt(_) => Vec::new(),
            OutputBlock::Markup { html, .. } => embedded_commands(html),
        }
    }
}

/// The display and navigation side the engine drives.
pub trait Host {
    fn append(&mut self, block: OutputBlock);

    /// Wipes every block shown so far.
    fn clear(&mut self);

    /// A real page transition to `url`.
    fn navigate(&mut self, url: &str);

    /// Browser-history back.
    fn go_back(&mut self);

    fn scroll_to_bottom(&mut self) {}

    /// `None` restores the default look.
    fn apply_theme(&mut self, theme: Option<&str>);
}

/// Host that records everything in memory.
#[derive(Debug, Default)]
pub struct BufferHost {
    pub blocks: Vec<OutputBlock>,
    pub navigations: Vec<String>,
    pub back_requests: usize,
    pub theme: Option<String>,
    pub scrolls: usize,
}

impl BufferHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All blocks as one markup string.
    pub fn html(&self) -> String {
        self.blocks.iter().map(OutputBlock::to_html).collect::<Vec<_>>().join("\n")
    }

    /// Every clickable command currently on screen, in order.
    pub fn embedded_commands(&self) -> Vec<EmbeddedCommand> {
        self.blocks.iter().flat_map(OutputBlock::embedded_commands).collect()
    }
}

impl Host for BufferHost {
    fn append(&mut self, block: OutputBlock) {
        self.blocks.push(block);
    }

    fn clear(&mut self) {
        self.blocks.clear();
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn go_back(&mut self) {
        self.back_requests += 1;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }

    fn apply_theme(&mut self, theme: Option<&str>) {
        self.theme = theme.map(String::from);
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Up,
    Down,
    Tab,
    Char(char),
    Backspace,
    /// Ctrl+L, same as typing `clear`.
    CtrlL,
}

/// How a command line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank input, or a key that runs nothing.
    Ignored,
    WentBack,
    Navigated(String),
    Cleared,
    Displayed { error: bool },
}

#[derive(Debug)]
struct Completion {
    candidates: Vec<String>,
    index: usize,
}

impl Completion {
    fn current(&self) -> Option<&str> {
        self.candidates.get(self.index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy)]
enum Recall {
    Older,
    Newer,
}

pub struct Engine<H: Host> {
    host: H,
    registry: CommandRegistry,
    posts: Vec<Post>,
    profile: Profile,
    session: Box<dyn Storage>,
    preferences: Box<dyn Storage>,
    current_path: String,
    history: Vec<String>,
    /// `None` while not browsing history.
    history_index: Option<usize>,
    input: String,
    completion: Option<Completion>,
    theme: Theme,
}

impl<H: Host> Engine<H> {
    /// Restores history and theme, then shows the listing for the current
    /// path unless the config skips it.
    pub fn init(config: TerminalConfig, host: H) -> Self {
        let TerminalConfig {
            posts,
            prompt_path,
            skip_initial_listing,
            profile,
            session,
            preferences,
        } = config;

        let history = load_history(session.as_ref());
        let mut engine = Self {
            host,
            registry: command_registry(),
            posts,
            profile,
            session,
            preferences,
            current_path: to_prompt_path(&prompt_path),
            history,
            history_index: None,
            input: String::new(),
            completion: None,
            theme: Theme::Default,
        };

        engine.restore_theme();
        info!(
            posts = engine.posts.len(),
            path = %engine.current_path,
            history = engine.history.len(),
            "terminal initialised"
        );

        if !skip_initial_listing {
            engine.show_listing();
        }
        engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input line, as if the user had typed it.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.completion = None;
    }

    pub fn handle_key(&mut self, key: Key) -> Dispatch {
        if key != Key::Tab {
            self.completion = None;
        }

        match key {
            Key::Enter => return self.submit(),
            Key::Up => self.recall(Recall::Older),
            Key::Down => self.recall(Recall::Newer),
            Key::Tab => self.complete(),
            Key::Char(c) => self.input.push(c),
            Key::Backspace => {
                self.input.pop();
            }
            Key::CtrlL => return self.execute_command("clear"),
        }
        Dispatch::Ignored
    }

    /// Runs the input line, records it in history and resets the line.
    pub fn submit(&mut self) -> Dispatch {
        let line = std::mem::take(&mut self.input);
        let line = line.trim();
        self.history_index = None;
        self.completion = None;

        if line.is_empty() {
            return Dispatch::Ignored;
        }

        let dispatch = self.execute_command(line);
        self.history.push(line.to_string());
        self.save_history();
        dispatch
    }

    /// Activates a clickable element: links navigate, everything else runs
    /// its command through [`Engine::execute_command`].
    pub fn activate(&mut self, element: &EmbeddedCommand) -> Dispatch {
        if let Some(href) = &element.href {
            self.host.navigate(href);
            return Dispatch::Navigated(href.clone());
        }
        let dispatch = self.execute_command(&element.command);
        self.input.clear();
        dispatch
    }

    /// The single entry point for running a command line, typed or clicked.
    pub fn execute_command(&mut self, input: &str) -> Dispatch {
        let line = input.trim();
        if line.is_empty() {
            return Dispatch::Ignored;
        }

        let call = parse_command(line);
        if call.name == HISTORY.name {
            self.echo(line);
            let html = render_history(&self.history);
            self.host.append(OutputBlock::Markup { html, spaced: true });
            self.host.scroll_to_bottom();
            return Dispatch::Displayed { error: false };
        }

        let result = match self.registry.get(&call.name).copied() {
            Some(cmd) => {
                let ctx = self.context().with_call(call.args, call.flags);
                cmd.execute(&ctx)
            }
            None => CommandResult::error(format!(
                "{}\n{}",
                error_line(&format!("command not found: {}", call.name)),
                hint_line("Type 'help' for available commands.")
            )),
        };

        debug!(command = %call.name, error = result.error, "dispatched");
        self.apply(line, result)
    }

    fn apply(&mut self, line: &str, result: CommandResult) -> Dispatch {
        if result.go_back {
            self.host.go_back();
            return Dispatch::WentBack;
        }
        if let Some(url) = result.navigate {
            self.host.navigate(&url);
            return Dispatch::Navigated(url);
        }

        self.echo(line);

        if result.clear {
            self.host.clear();
            self.show_listing();
            return Dispatch::Cleared;
        }
        if let Some(path) = result.new_path {
            self.current_path = path;
        }
        if let Some(theme) = result.theme {
            self.set_theme(theme);
        }
        if !result.html.is_empty() {
            self.host.append(OutputBlock::Markup {
                html: result.html,
                spaced: true,
            });
        }
        self.host.scroll_to_bottom();

        Dispatch::Displayed {
            error: result.error,
        }
    }

    fn context(&self) -> CommandContext<'_> {
        CommandContext::new(&self.registry, &self.posts, &self.current_path)
            .with_profile(&self.profile)
            .with_theme(self.theme.attribute())
    }

    fn echo(&mut self, line: &str) {
        self.host.append(OutputBlock::Prompt(PromptLine {
            user: self.profile.user.clone(),
            host: self.profile.host.clone(),
            path: self.current_path.clone(),
            command: line.to_string(),
        }));
    }

    /// `ls` of the current path, without an echoed prompt.
    fn show_listing(&mut self) {
        let result = LS.execute(&self.context());
        self.host.append(OutputBlock::Markup {
            html: result.html,
            spaced: false,
        });
    }

    fn recall(&mut self, direction: Recall) {
        let Some(last) = self.history.len().checked_sub(1) else {
            return;
        };
        let index = match (self.history_index, direction) {
            (None, Recall::Older) => last,
            (None, Recall::Newer) => return,
            (Some(index), Recall::Older) => index.saturating_sub(1),
            (Some(index), Recall::Newer) => (index + 1).min(last),
        };
        self.history_index = Some(index);
        self.input = self.history[index].clone();
    }

    /// Replaces the last token of the input with the next candidate. Repeated
    /// presses cycle while the token is still the last inserted candidate.
    fn complete(&mut self) {
        let mut parts: Vec<String> = self.input.split(' ').map(String::from).collect();
        let last = parts.last().cloned().unwrap_or_default();

        let cycling = self
            .completion
            .as_ref()
            .is_some_and(|completion| completion.current() == Some(last.as_str()));

        if cycling {
            if let Some(completion) = self.completion.as_mut() {
                completion.index = (completion.index + 1) % completion.candidates.len();
            }
        } else {
            let first_token = parts.len() == 1;
            let candidates = self.candidates(&parts[0], &last, first_token);
            trace!(partial = %last, count = candidates.len(), "completion candidates");
            self.completion = (!candidates.is_empty()).then_some(Completion {
                candidates,
                index: 0,
            });
        }

        let Some(next) = self.completion.as_ref().and_then(Completion::current) else {
            return;
        };
        if let Some(slot) = parts.last_mut() {
            *slot = next.to_string();
        }
        self.input = parts.join(" ");
    }

    /// Completion candidates for `partial`, the last token of a line whose
    /// first token is `command`.
    pub fn candidates(&self, command: &str, partial: &str, first_token: bool) -> Vec<String> {
        if first_token {
            return self.registry.completions(partial);
        }

        let ctx = self.context();
        let Some(cmd) = self.registry.get(command) else {
            return Vec::new();
        };
        if let Some(candidates) = cmd.complete(&ctx, partial) {
            return candidates;
        }

        match cmd.name {
            name if name == THEME.name => theme::complete(partial),
            name if name == TREE.name || name == FIND.name => PATH_ARGUMENTS.candidates(&ctx, partial),
            name if name == GREP.name && !partial.is_empty() && !partial.starts_with('-') => {
                post_matches(&self.posts, partial)
            }
            _ => Vec::new(),
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.host.apply_theme(theme.attribute());

        let saved = match theme.attribute() {
            Some(name) => self.preferences.set(THEME_KEY, name),
            None => self.preferences.remove(THEME_KEY),
        };
        if let Err(error) = saved {
            warn!(storage = self.preferences.name(), %error, "failed to save theme");
        }
    }

    fn restore_theme(&mut self) {
        let stored = match self.preferences.get(THEME_KEY) {
            Ok(stored) => stored,
            Err(error) => {
                warn!(storage = self.preferences.name(), %error, "failed to load theme");
                return;
            }
        };
        let Some(name) = stored else {
            return;
        };

        match name.parse::<Theme>() {
            Ok(theme) => {
                self.theme = theme;
                if let Some(attribute) = theme.attribute() {
                    self.host.apply_theme(Some(attribute));
                }
            }
            Err(_) => warn!(theme = %name, "ignoring unknown stored theme"),
        }
    }

    fn save_history(&self) {
        let start = self.history.len().saturating_sub(PERSISTED_HISTORY);
        let saved = serde_json::to_string(&self.history[start..])
            .map_err(|e| e.to_string())
            .and_then(|json| self.session.set(HISTORY_KEY, &json).map_err(|e| e.to_string()));
        if let Err(error) = saved {
            warn!(storage = self.session.name(), %error, "failed to save history");
        }
    }
}

fn load_history(storage: &dyn Storage) -> Vec<String> {
    match storage.get(HISTORY_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|error| {
            warn!(%error, "discarding unreadable history");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(error) => {
            warn!(storage = storage.name(), %error, "failed to load history");
            Vec::new()
        }
    }
}
