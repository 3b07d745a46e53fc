use std::path::PathBuf;

use nix::unistd::chdir;

use crate::exec::Flow;
use crate::parser::Command;
use crate::shell::Session;

/// Checks if the command is a built-in and, if so, executes it in the
/// shell's own process. Supported built-ins are `exit`, `cd`, and
/// `status`; the empty command (blank or comment line) is a no-op.
/// Returns `None` if the command is not a built-in.
pub fn try_builtin(cmd: &Command, session: &mut Session) -> Option<Flow> {
    let name = match cmd.argv.first() {
        Some(name) => name,
        None => return Some(Flow::Continue),
    };
    match name.as_str() {
        "exit" => {
            // Background children still running are left alone.
            println!("exiting shell");
            Some(Flow::Exit)
        }
        "cd" => {
            change_directory(cmd.argv.get(1).map(String::as_str));
            Some(Flow::Continue)
        }
        "status" => {
            println!("{}", session.last_status);
            Some(Flow::Continue)
        }
        _ => None,
    }
}

/// With no argument, changes to the user's home directory; with one,
/// to that path. A failure is reported and the session continues with
/// its recorded status untouched.
fn change_directory(target: Option<&str>) {
    let dest = match target {
        Some(path) => PathBuf::from(path),
        None => match dirs_next::home_dir() {
            Some(home) => home,
            None => {
                eprintln!("cd: cannot determine home directory");
                return;
            }
        },
    };
    if let Err(err) = chdir(dest.as_path()) {
        eprintln!("cd: {}: {}", dest.display(), err);
    }
}
