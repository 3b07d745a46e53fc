use std::ffi::CString;
use std::process;

use nix::errno::Errno;
use nix::sys::wait::waitpid;
use nix::unistd::{execvp, fork, ForkResult, Pid};

use crate::builtins::try_builtin;
use crate::jobs::{reap_finished, CommandStatus};
use crate::parser::Command;
use crate::redirect::{redirect_input, redirect_output};
use crate::shell::Session;
use crate::signals;

const NULL_DEVICE: &str = "/dev/null";

/// Whether the read loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Runs one parsed command: a built-in executes in place, anything else
/// is launched as a child process. Afterwards every finished background
/// child is reaped and reported, whatever kind of command this was.
pub fn execute(cmd: Command, session: &mut Session) -> Flow {
    let flow = match try_builtin(&cmd, session) {
        Some(flow) => flow,
        None => {
            run_external(&cmd, session);
            Flow::Continue
        }
    };

    for (pid, status) in reap_finished() {
        println!("background pid {} is done: {}", pid, status);
        session.last_status = status;
    }

    flow
}

/// Forks and execs an external command. A `&` request is honored only
/// while foreground-only mode is off; a foreground child is waited for
/// here, a background child is announced and left to the reaper.
fn run_external(cmd: &Command, session: &mut Session) {
    let background = cmd.background && !signals::foreground_only();

    match unsafe { fork() } {
        Err(err) => {
            // Cannot run anything anymore; this is fatal to the shell.
            eprintln!("smallsh: fork: {}", err);
            process::exit(1);
        }
        Ok(ForkResult::Child) => run_child(cmd, background),
        Ok(ForkResult::Parent { child }) => {
            if background {
                println!("background pid is {}", child);
            } else {
                let status = wait_foreground(child);
                session.last_status = status;
                if status != CommandStatus::Exited(0) {
                    println!("{}", status);
                }
            }
        }
    }
}

/// Child side of the fork. Signal dispositions first, then descriptor
/// rewiring, then the exec; every failure ends the child, never the
/// shell. The executor only launches commands with a non-empty argv.
fn run_child(cmd: &Command, background: bool) -> ! {
    let roles = if background {
        signals::adopt_background_child_dispositions()
    } else {
        signals::adopt_foreground_child_dispositions()
    };
    if let Err(err) = roles {
        eprintln!("smallsh: signal setup: {}", err);
        process::exit(1);
    }

    // A background child without explicit redirections must not contend
    // for the terminal: both streams go to the null device. Explicit
    // redirections are applied after and take precedence.
    if background {
        if cmd.infile.is_none() {
            exit_unless(redirect_input(NULL_DEVICE), NULL_DEVICE);
        }
        if cmd.outfile.is_none() {
            exit_unless(redirect_output(NULL_DEVICE), NULL_DEVICE);
        }
    }
    if let Some(path) = &cmd.infile {
        exit_unless(redirect_input(path), path);
    }
    if let Some(path) = &cmd.outfile {
        exit_unless(redirect_output(path), path);
    }

    let argv: Vec<CString> = match cmd
        .argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect()
    {
        Ok(argv) => argv,
        Err(_) => {
            eprintln!("{}: argument contains an interior nul byte", cmd.argv[0]);
            process::exit(2);
        }
    };

    // execvp only returns on failure.
    if let Err(err) = execvp(&argv[0], &argv) {
        eprintln!("{}: {}", cmd.argv[0], err);
    }
    process::exit(2);
}

fn exit_unless(result: nix::Result<()>, path: &str) {
    if let Err(err) = result {
        eprintln!("smallsh: {}: {}", path, err);
        process::exit(1);
    }
}

/// Blocks until the given child terminates and returns its decoded
/// status. The wait is restarted if a signal interrupts it.
fn wait_foreground(child: Pid) -> CommandStatus {
    loop {
        match waitpid(child, None) {
            Ok(status) => {
                if let Some(decoded) = CommandStatus::from_wait(status) {
                    return decoded;
                }
            }
            Err(Errno::EINTR) => continue,
            Err(err) => {
                eprintln!("smallsh: waitpid: {}", err);
                return CommandStatus::Exited(1);
            }
        }
    }
}
