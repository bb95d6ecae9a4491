//! Line commands understood by the interactive session

use std::path::PathBuf;

use crate::domain::model::OutputKind;

/// One form action typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Pick a video file
    Open(PathBuf),
    /// Close control
    Close,
    /// Radio selection
    Kind(OutputKind),
    Name(String),
    Start(String),
    Time(String),
    Submit,
    Show,
    Help,
    Quit,
}

pub const SESSION_HELP: &str = "\
commands:
  open <path>    select a video
  close          discard the selected video
  gif | mp3      choose the output kind
  name <text>    name to download (empty resets to default)
  start <secs>   start offset
  time <secs>    duration
  submit         convert and download
  show           print the form
  help           print this help
  quit           leave the session";

impl SessionCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "open" => {
                if rest.is_empty() {
                    return Err("open needs a file path".to_string());
                }
                SessionCommand::Open(PathBuf::from(rest))
            }
            "close" => SessionCommand::Close,
            "gif" => SessionCommand::Kind(OutputKind::Gif),
            "mp3" => SessionCommand::Kind(OutputKind::Mp3),
            "name" => SessionCommand::Name(rest.to_string()),
            "start" => SessionCommand::Start(rest.to_string()),
            "time" => SessionCommand::Time(rest.to_string()),
            "submit" => SessionCommand::Submit,
            "show" => SessionCommand::Show,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(format!("unknown command: {} (try 'help')", other)),
        };
        Ok(Some(command))
    }
}
