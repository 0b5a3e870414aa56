use nuance_types::Tab;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bare text: a search, or a question while the assistant is open
    Text(String),
    Search(String),
    Topics,
    Topic(usize),
    Retry,
    Reset,
    Save(usize),
    Tab(Tab),
    Chat,
    Ask(String),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Command::Text(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "search" | "s" => Command::Search(arg.to_string()),
        "topics" => Command::Topics,
        "topic" | "t" => parse_index(arg).map_or_else(|| invalid(line), Command::Topic),
        "retry" => Command::Retry,
        "reset" => Command::Reset,
        "save" => parse_index(arg).map_or_else(|| invalid(line), Command::Save),
        "tab" => match arg {
            "explore" | "e" => Command::Tab(Tab::Explore),
            "dictionary" | "dict" | "d" => Command::Tab(Tab::Dictionary),
            _ => invalid(line),
        },
        "chat" => Command::Chat,
        "ask" => Command::Ask(arg.to_string()),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => invalid(line),
    }
}

/// 1-based index as typed by the user
fn parse_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|&n| n > 0)
}

fn invalid(line: &str) -> Command {
    Command::Invalid(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_text_is_kept_verbatim() {
        assert_eq!(parse("  ধৈর্য  "), Command::Text("ধৈর্য".to_string()));
        assert_eq!(parse(""), Command::Empty);
    }

    #[test]
    fn slash_commands_take_arguments() {
        assert_eq!(parse("/search মৃত্যু"), Command::Search("মৃত্যু".to_string()));
        assert_eq!(parse("/ask কালব মানে কী?"), Command::Ask("কালব মানে কী?".to_string()));
        assert_eq!(parse("/topic 3"), Command::Topic(3));
        assert_eq!(parse("/save 1"), Command::Save(1));
        assert_eq!(parse("/tab dictionary"), Command::Tab(Tab::Dictionary));
        assert_eq!(parse("/q"), Command::Quit);
    }

    #[test]
    fn bad_indexes_are_invalid() {
        assert!(matches!(parse("/save 0"), Command::Invalid(_)));
        assert!(matches!(parse("/topic x"), Command::Invalid(_)));
        assert!(matches!(parse("/tab nowhere"), Command::Invalid(_)));
        assert!(matches!(parse("/dance"), Command::Invalid(_)));
    }
}
