//! Line commands read from stdin in interactive mode.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Sort(String),
    PerPage(u32),
    Page(u32),
    Next,
    Prev,
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "commands: search <text> | sort <field> | per-page <n> | page <n> | next | prev | refresh | help | quit";

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            // An empty search clears the filter.
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "sort" | "o" => {
                if rest.is_empty() {
                    Err("sort needs a field name, e.g. `sort display_name`".into())
                } else {
                    Ok(Command::Sort(rest.trim_start_matches('-').to_string()))
                }
            }
            "per-page" | "limit" => parse_positive(rest, "per-page").map(Command::PerPage),
            "page" | "p" => parse_positive(rest, "page").map(Command::Page),
            "next" | "n" => Ok(Command::Next),
            "prev" | "previous" => Ok(Command::Prev),
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            "" => Err(HELP.to_string()),
            other => Err(format!("unknown command `{other}`; {HELP}")),
        }
    }
}

fn parse_positive(raw: &str, name: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(format!("{name} needs a positive number, got `{raw}`")),
    }
}
