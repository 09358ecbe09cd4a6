use tictactoe_engine::tictactoe::CellIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Place(CellIndex),
    Reset,
    Hint,
    Quit,
    Unknown(String),
}

/// Range checking is left to the engine so out-of-range cells surface as `InvalidMove`.
pub fn parse_command(line: &str) -> ConsoleCommand {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "r" | "reset" => ConsoleCommand::Reset,
        "h" | "hint" => ConsoleCommand::Hint,
        "q" | "quit" | "exit" => ConsoleCommand::Quit,
        other => match other.parse::<CellIndex>() {
            Ok(index) => ConsoleCommand::Place(index),
            Err(_) => ConsoleCommand::Unknown(trimmed.to_string()),
        },
    }
}
