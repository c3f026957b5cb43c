use std::env;
use std::error::Error;
use std::io::{stdin, stdout, Stdout, Write};
use std::sync::Arc;

use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use blog_shell::post::load_posts;
use blog_shell::{
    BlogPath, Dispatch, EmbeddedCommand, Engine, FileStorage, Host, MemoryStorage, OutputBlock,
    Post, Profile, Storage, TerminalConfig,
};

const DEFAULT_POSTS: &str = "demos/posts.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// Prints blocks as plain text and remembers what the engine asked for, so
/// the loop can act on page transitions after each command.
struct ConsoleHost {
    out: Stdout,
    clickable: Vec<EmbeddedCommand>,
    navigation: Option<String>,
    back: bool,
}

impl ConsoleHost {
    fn new() -> Self {
        Self {
            out: stdout(),
            clickable: Vec::new(),
            navigation: None,
            back: false,
        }
    }

    fn print(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(%error, "failed to write output");
        }
    }
}

impl Host for ConsoleHost {
    fn append(&mut self, block: OutputBlock) {
        let commands = block.embedded_commands();
        if !commands.is_empty() {
            self.clickable = commands;
        }
        // the prompt was already typed on this line
        if let OutputBlock::Markup { .. } = block {
            self.print(&block.to_text());
        }
    }

    fn clear(&mut self) {
        self.clickable.clear();
        self.print("\x1b[2J\x1b[H");
    }

    fn navigate(&mut self, url: &str) {
        self.navigation = Some(url.to_string());
    }

    fn go_back(&mut self) {
        self.back = true;
    }

    fn apply_theme(&mut self, theme: Option<&str>) {
        debug!(theme = theme.unwrap_or("default"), "theme applied");
    }
}

struct Session {
    posts: Vec<Post>,
    profile: Profile,
    history: Arc<MemoryStorage>,
    preferences: Arc<dyn Storage>,
    /// Visited URLs, oldest first; the last one is the current page.
    pages: Vec<String>,
}

impl Session {
    fn open(&self, host: ConsoleHost) -> Engine<ConsoleHost> {
        let url = self.pages.last().map_or("/", String::as_str);
        let prompt_path = BlogPath::from_url(url).map_or_else(|| "~".to_string(), |path| path.prompt());
        let config = TerminalConfig::new(self.posts.clone())
            .with_prompt_path(prompt_path)
            .with_profile(self.profile.clone())
            .with_session(Arc::clone(&self.history))
            .with_preferences(Arc::clone(&self.preferences));
        Engine::init(config, host)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BLOG_SHELL_LOG")
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn profile_from_env() -> Profile {
    let mut profile = Profile::default();
    if let Ok(user) = env::var("BLOG_SHELL_USER") {
        profile.home = format!("/home/{user}");
        profile.blog_dir = format!("/home/{user}/blog");
        profile.user = user;
    }
    if let Ok(host) = env::var("BLOG_SHELL_HOST") {
        profile.host = host;
    }
    profile
}

fn preferences_from_env() -> FileStorage {
    match env::var("BLOG_SHELL_STATE_DIR") {
        Ok(dir) => FileStorage::new(std::path::Path::new(&dir).join(PREFERENCES_FILE)),
        Err(_) => FileStorage::default_for(PREFERENCES_FILE),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let posts_path = env::var("BLOG_SHELL_POSTS")
        .ok()
        .or_else(|| env::args().nth(1))
        .unwrap_or_else(|| DEFAULT_POSTS.to_string());
    let posts = load_posts(&posts_path)?;

    let preferences = preferences_from_env();
    debug!(posts = posts.len(), preferences = %preferences.path().display(), "starting session");
    let preferences: Arc<dyn Storage> = Arc::new(preferences);
    let mut session = Session {
        posts,
        profile: profile_from_env(),
        history: Arc::new(MemoryStorage::new()),
        preferences,
        pages: vec!["/".to_string()],
    };

    let stdin = stdin();
    let mut engine = session.open(ConsoleHost::new());

    loop {
        let prompt = format!(
            "{}@{} {} (main) $ ",
            engine.profile().user,
            engine.profile().host,
            engine.current_path()
        );
        let out = &mut engine.host_mut().out;
        out.write_all(prompt.as_bytes())?;
        out.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        // `!` lists the clickable commands of the last output, `!N` runs one
        let dispatch = match line.strip_prefix('!') {
            Some("") => {
                let listing: Vec<String> = engine
                    .host()
                    .clickable
                    .iter()
                    .enumerate()
                    .map(|(i, element)| format!("  [{}] {}", i + 1, element.command))
                    .collect();
                engine.host_mut().print(&listing.join("\n"));
                continue;
            }
            Some(index) => {
                let chosen = index
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|n| engine.host().clickable.get(n).cloned());
                match chosen {
                    Some(element) => engine.activate(&element),
                    None => {
                        engine.host_mut().print(&format!("{line}: no such link"));
                        continue;
                    }
                }
            }
            None => {
                engine.set_input(line);
                engine.submit()
            }
        };

        match dispatch {
            Dispatch::Navigated(_) | Dispatch::WentBack => {
                let mut host = engine.into_host();
                if let Some(url) = host.navigation.take() {
                    session.pages.push(url);
                }
                if std::mem::take(&mut host.back) && session.pages.len() > 1 {
                    session.pages.pop();
                }
                engine = session.open(host);
            }
            Dispatch::Ignored | Dispatch::Cleared | Dispatch::Displayed { .. } => {}
        }
    }

    Ok(())
}
