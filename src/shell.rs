use std::process;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::exec::{execute, Flow};
use crate::jobs::CommandStatus;
use crate::parser::parse_command_line;

/// Global prompt string.
pub static PROMPT: &str = ": ";

/// State that lives for the whole session. Per-command state (arguments,
/// redirections, the background request) lives on the `Command` instead
/// and is rebuilt every iteration.
pub struct Session {
    /// Decoded status of the most recent foreground child, also updated
    /// when a background child is reaped. Starts as a plain zero exit so
    /// `status` has something to report before any command has run.
    pub last_status: CommandStatus,
}

impl Session {
    pub fn new() -> Session {
        Session {
            last_status: CommandStatus::Exited(0),
        }
    }
}

/// Runs the main shell loop: prints the prompt, reads one line, parses
/// it, and executes the command, until `exit` or end of input.
///
/// Interrupting the line read (Ctrl-C) never ends the session; it just
/// yields a fresh prompt.
pub fn run_shell() {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("smallsh: cannot read input: {}", err);
            process::exit(1);
        }
    };

    let mut session = Session::new();

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("smallsh: input error: {}", err);
                break;
            }
        };

        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        match parse_command_line(&line) {
            Ok(command) => {
                if execute(command, &mut session) == Flow::Exit {
                    break;
                }
            }
            Err(err) => eprintln!("smallsh: {}", err),
        }
    }
}
