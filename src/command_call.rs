/// Represents a parsed command line with its name, flags, and arguments.
///
/// Flags are separated from arguments so commands can check for switches
/// without caring where on the line they were typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandCall {
    /// The name of the command (e.g., "ls", "cat"). Always lowercase.
    pub name: String,
    /// Positional arguments (e.g., paths, slugs, grep patterns).
    pub args: Vec<String>,
    /// Tokens starting with `-`, kept exactly as typed (`-la` stays `-la`).
    pub flags: Vec<String>,
}

impl CommandCall {
    /// True when any flag contains the given switch letter, so `-l`, `-la`
    /// and `-al` all count as `l`.
    pub fn has_flag(&self, switch: char) -> bool {
        has_flag(&self.flags, switch)
    }
}

pub(crate) fn has_flag(flags: &[String], switch: char) -> bool {
    flags
        .iter()
        .any(|flag| flag.trim_start_matches('-').contains(switch))
}

/// Parses a line of input into a single command call.
///
/// The first token, lowercased, is the command name. Every later token that
/// starts with `-` is a flag and everything else is an argument; relative
/// order inside each group is preserved.
///
/// # Example
/// ```
/// use blog_shell::command_call::parse_command;
///
/// let call = parse_command("grep -i \"rust async\"");
/// assert_eq!(call.name, "grep");
/// assert_eq!(call.flags, vec!["-i"]);
/// assert_eq!(call.args, vec!["rust async"]);
/// ```
pub fn parse_command(input: &str) -> CommandCall {
    let mut tokens = tokenize(input).into_iter();

    let name = match tokens.next() {
        Some(first) => first.to_lowercase(),
        None => return CommandCall::default(),
    };

    let (flags, args): (Vec<String>, Vec<String>) =
        tokens.partition(|token| token.starts_with('-'));

    CommandCall { name, args, flags }
}

/// Tokenizes a raw command string.
///
/// - Single (`'`) or double (`"`) quotes group their content into one token;
///   the other quote character is literal inside them.
/// - Whitespace separates tokens unless quoted.
/// - An unterminated quote runs to the end of the line.
/// - Quotes produce no token on their own, so `''` is dropped.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), c) if c == open => quote = None,
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
