use std::fmt;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// Decoded termination status of a child process.
///
/// The `Display` impl is the one decoding site shared by the `status`
/// built-in, the background-done report, and the immediate report of an
/// abnormal foreground exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The child terminated by calling exit with this code.
    Exited(i32),
    /// The child was terminated by this uncaught signal.
    Signaled(i32),
}

impl CommandStatus {
    /// Decodes a wait status. Returns `None` for statuses that are not a
    /// termination (nothing here waits with WUNTRACED or WCONTINUED).
    pub fn from_wait(status: WaitStatus) -> Option<CommandStatus> {
        match status {
            WaitStatus::Exited(_, code) => Some(CommandStatus::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => Some(CommandStatus::Signaled(signal as i32)),
            _ => None,
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Exited(code) => write!(f, "exit value {}", code),
            CommandStatus::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

/// Collects every child that has terminated, without blocking.
///
/// There is no job table: the kernel's own child bookkeeping is queried
/// with `waitpid(-1, WNOHANG)` until nothing finished remains. Each call
/// retires the children it returns; a child observed here was not waited
/// on anywhere else.
pub fn reap_finished() -> Vec<(Pid, CommandStatus)> {
    let mut finished = Vec::new();
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => match (status.pid(), CommandStatus::from_wait(status)) {
                (Some(pid), Some(decoded)) => finished.push((pid, decoded)),
                _ => break,
            },
            Err(Errno::ECHILD) => break,
            Err(err) => {
                eprintln!("smallsh: wait: {}", err);
                break;
            }
        }
    }
    finished
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_exit() {
        let status = WaitStatus::Exited(Pid::from_raw(42), 3);
        assert_eq!(CommandStatus::from_wait(status), Some(CommandStatus::Exited(3)));
    }

    #[test]
    fn decodes_signal_termination() {
        let status = WaitStatus::Signaled(Pid::from_raw(42), nix::sys::signal::Signal::SIGTERM, false);
        assert_eq!(
            CommandStatus::from_wait(status),
            Some(CommandStatus::Signaled(15))
        );
    }

    #[test]
    fn still_alive_is_not_a_termination() {
        assert_eq!(CommandStatus::from_wait(WaitStatus::StillAlive), None);
    }

    #[test]
    fn reports_exit_value() {
        assert_eq!(CommandStatus::Exited(0).to_string(), "exit value 0");
        assert_eq!(CommandStatus::Exited(2).to_string(), "exit value 2");
    }

    #[test]
    fn reports_terminating_signal() {
        assert_eq!(
            CommandStatus::Signaled(11).to_string(),
            "terminated by signal 11"
        );
    }

    #[test]
    fn reap_with_no_children_is_empty() {
        assert!(reap_finished().is_empty());
    }
}
