use crate::interpreter::{self, Event, Session};
use crate::tokens;
use ansi_term::Colour;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::fs::read_to_string;
use std::path::PathBuf;

const PROMPT: &str = "parens> ";
const CONTINUATION_PROMPT: &str = "   ...> ";

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Script(PathBuf, interpreter::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "Error: io error: {}", e),
            Error::Script(path, e) => write!(f, "{}: Error: {}", path.display(), e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("parens")?;
    interface.set_prompt(PROMPT)?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".parens_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// Reads lines until the parentheses balance, then submits them as one unit.
pub fn repl<T: Terminal>(interface: &Interface<T>, session: &mut Session) {
    let mut pending = String::new();
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if !pending.is_empty() {
                    pending.push('\n');
                }
                pending.push_str(&line);
                if !tokens::is_balanced(&pending) {
                    interface.set_prompt(CONTINUATION_PROMPT).ok();
                    continue;
                }
                interface.set_prompt(PROMPT).ok();
                let code = std::mem::take(&mut pending);
                if code.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(code.clone());
                writeln!(interface, "{}", render(session, &code)).ok();
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

fn render(session: &mut Session, code: &str) -> String {
    match session.submit(code) {
        Ok(value) => value.to_string(),
        Err(e) => highlight_error(format!("Error: {}", e), atty::Stream::Stdout),
    }
}

/// Formats a failed launch for stderr.
pub fn report(e: &Error) -> String {
    highlight_error(e.to_string(), atty::Stream::Stderr)
}

fn highlight_error(text: String, stream: atty::Stream) -> String {
    match atty::is(stream) {
        true => Colour::Red.paint(text).to_string(),
        false => text,
    }
}

/// With no arguments, starts a REPL. Otherwise each argument is a file
/// submitted in turn to one session; the result of the last is printed.
pub fn launch(args: Vec<String>) -> Result<(), Error> {
    let mut session = Session::new();
    session.add_listener(|event| {
        if let Event::Stdout(text) = event {
            println!("{}", text);
        }
    });

    if args.len() <= 1 {
        let interface = setup()?;
        repl(&interface, &mut session);
        save_history(&interface)?;
        return Ok(());
    }

    let mut last = None;
    for arg in &args[1..] {
        let path = PathBuf::from(arg);
        let source = read_to_string(&path)?;
        log::debug!("running {}", path.display());
        let value = session
            .submit(&source)
            .map_err(|e| Error::Script(path, e))?;
        last = Some(value);
    }
    if let Some(value) = last {
        println!("{}", value);
    }
    Ok(())
}
