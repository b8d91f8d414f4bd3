//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Navigation
    View(String),

    // Connections
    AddConnection {
        provider: String,
        label: String,
        key: String,
    },
    Test(String),
    Delete(String),

    // Pools
    CreatePool {
        name: String,
        token_limit: Option<String>,
        cost_limit: Option<String>,
    },
    Leave(String),

    // Chat and routing
    Send(String),
    Model(String),

    // Display
    Period(String),
    Theme,
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        "view" | "v" | "go" => match args {
            Some(view) => Command::View(view.to_lowercase()),
            None => Command::Unknown(input.to_string()),
        },
        "dashboard" | "connections" | "pools" | "usage" | "chat" | "settings" => {
            Command::View(cmd.to_lowercase())
        }

        "add" | "add-connection" => {
            let words = args.as_deref().map(split_words).unwrap_or_default();
            match words.as_slice() {
                [provider, label, key] => Command::AddConnection {
                    provider: provider.clone(),
                    label: label.clone(),
                    key: key.clone(),
                },
                _ => Command::Unknown(input.to_string()),
            }
        }
        "test" => match args {
            Some(id) => Command::Test(id),
            None => Command::Unknown(input.to_string()),
        },
        "delete" | "del" | "rm" => match args {
            Some(id) => Command::Delete(id),
            None => Command::Unknown(input.to_string()),
        },

        "pool" | "create-pool" => {
            let mut words = args
                .as_deref()
                .map(split_words)
                .unwrap_or_default()
                .into_iter();
            match words.next() {
                Some(name) => Command::CreatePool {
                    name,
                    token_limit: words.next(),
                    cost_limit: words.next(),
                },
                None => Command::Unknown(input.to_string()),
            }
        }
        "leave" => match args {
            Some(id) => Command::Leave(id),
            None => Command::Unknown(input.to_string()),
        },

        "send" | "say" => match args {
            Some(text) => Command::Send(text),
            None => Command::Unknown(input.to_string()),
        },
        "model" | "route" => Command::Model(args.unwrap_or_else(|| "auto".to_string())),

        "period" => match args {
            Some(period) => Command::Period(period),
            None => Command::Unknown(input.to_string()),
        },
        "theme" => Command::Theme,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}

/// Split on whitespace, keeping "double quoted" runs together.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => {
                if quoted {
                    words.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation_commands() {
        assert_eq!(parse_command("view pools"), Command::View("pools".to_string()));
        assert_eq!(parse_command("usage"), Command::View("usage".to_string()));
        assert_eq!(parse_command("view"), Command::Unknown("view".to_string()));
    }

    #[test]
    fn test_parse_connection_commands() {
        assert_eq!(
            parse_command("add openai \"My Key\" sk-xxx"),
            Command::AddConnection {
                provider: "openai".to_string(),
                label: "My Key".to_string(),
                key: "sk-xxx".to_string(),
            }
        );
        assert_eq!(parse_command("test conn-1"), Command::Test("conn-1".to_string()));
        assert_eq!(parse_command("rm conn-2"), Command::Delete("conn-2".to_string()));
        assert!(matches!(parse_command("add openai"), Command::Unknown(_)));
    }

    #[test]
    fn test_parse_pool_commands() {
        assert_eq!(
            parse_command("pool \"Night Owls\" 50000 25"),
            Command::CreatePool {
                name: "Night Owls".to_string(),
                token_limit: Some("50000".to_string()),
                cost_limit: Some("25".to_string()),
            }
        );
        assert_eq!(
            parse_command("pool Solo"),
            Command::CreatePool {
                name: "Solo".to_string(),
                token_limit: None,
                cost_limit: None,
            }
        );
        assert_eq!(parse_command("leave pool-1"), Command::Leave("pool-1".to_string()));
    }

    #[test]
    fn test_parse_chat_and_display_commands() {
        assert_eq!(
            parse_command("send hello there"),
            Command::Send("hello there".to_string())
        );
        assert_eq!(parse_command("model"), Command::Model("auto".to_string()));
        assert_eq!(parse_command("model gpt-4"), Command::Model("gpt-4".to_string()));
        assert_eq!(parse_command("period 30d"), Command::Period("30d".to_string()));
        assert_eq!(parse_command("theme"), Command::Theme);
        assert_eq!(parse_command("q"), Command::Quit);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
