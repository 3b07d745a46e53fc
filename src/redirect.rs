use std::os::unix::io::RawFd;

use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};

const STDIN_FILENO: RawFd = 0;
const STDOUT_FILENO: RawFd = 1;

/// Opens `path` read-only and rebinds it as standard input.
///
/// Only ever called in a freshly forked child; the rebinding is
/// irreversible and the caller exits on failure.
pub fn redirect_input(path: &str) -> nix::Result<()> {
    let fd = open(path, OFlag::O_RDONLY, Mode::empty())?;
    rebind(fd, STDIN_FILENO)
}

/// Opens `path` write-only, creating it if absent and truncating it if
/// present (mode 0777 before umask), and rebinds it as standard output.
pub fn redirect_output(path: &str) -> nix::Result<()> {
    let fd = open(
        path,
        OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
        Mode::from_bits_truncate(0o777),
    )?;
    rebind(fd, STDOUT_FILENO)
}

fn rebind(fd: RawFd, target: RawFd) -> nix::Result<()> {
    dup2(fd, target)?;
    close(fd)
}
