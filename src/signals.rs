use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::write;
use signal_hook::low_level;

/// Session-wide toggle: while set, every command runs in the foreground
/// and a trailing `&` is ignored. Flipped only by the SIGTSTP handler,
/// read by the launcher before each background decision.
static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

const ENTER_FOREGROUND_ONLY: &[u8] = b"Entering foreground-only mode (& is now ignored)\n";
const EXIT_FOREGROUND_ONLY: &[u8] = b"Exiting foreground-only mode\n";

/// How a signal is treated for one role in the shell's process tree.
#[derive(Debug, Clone, Copy)]
pub enum Disposition {
    /// Default OS action, re-armed as one-shot: the disposition reverts
    /// to default after the first delivery.
    DefaultOneShot,
    /// Delivery has no effect.
    Ignore,
    /// Custom handler: flip foreground-only mode and announce the change.
    ToggleForegroundOnly,
}

/// Applies a disposition to one signal for the current process.
pub fn apply(signal: Signal, disposition: Disposition) -> io::Result<()> {
    match disposition {
        Disposition::DefaultOneShot => {
            set_action(signal, SigHandler::SigDfl, SaFlags::SA_RESETHAND)
        }
        Disposition::Ignore => set_action(signal, SigHandler::SigIgn, SaFlags::SA_RESTART),
        Disposition::ToggleForegroundOnly => {
            unsafe { low_level::register(signal as i32, toggle_foreground_only) }.map(|_| ())
        }
    }
}

/// Dispositions for the interpreter itself, installed once at startup:
/// SIGINT never kills the prompt, SIGTSTP toggles foreground-only mode.
pub fn adopt_interpreter_dispositions() -> io::Result<()> {
    apply(Signal::SIGINT, Disposition::Ignore)?;
    apply(Signal::SIGTSTP, Disposition::ToggleForegroundOnly)
}

/// Dispositions for a child about to exec in the foreground: it must die
/// on SIGINT like any ordinary program, and never react to SIGTSTP.
pub fn adopt_foreground_child_dispositions() -> io::Result<()> {
    apply(Signal::SIGTSTP, Disposition::Ignore)?;
    apply(Signal::SIGINT, Disposition::DefaultOneShot)
}

/// Dispositions for a background child: SIGTSTP ignored like every child,
/// SIGINT left as inherited from the interpreter (ignored).
pub fn adopt_background_child_dispositions() -> io::Result<()> {
    apply(Signal::SIGTSTP, Disposition::Ignore)
}

/// Reads the foreground-only flag.
pub fn foreground_only() -> bool {
    FOREGROUND_ONLY.load(Ordering::SeqCst)
}

/// Runs in signal context: one atomic flip and one direct write to the
/// standard output descriptor, nothing else.
fn toggle_foreground_only() {
    let was_active = FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst);
    let message = if was_active {
        EXIT_FOREGROUND_ONLY
    } else {
        ENTER_FOREGROUND_ONLY
    };
    let _ = write(1, message);
}

fn set_action(signal: Signal, handler: SigHandler, flags: SaFlags) -> io::Result<()> {
    let action = SigAction::new(handler, flags, SigSet::all());
    unsafe { sigaction(signal, &action) }
        .map(|_| ())
        .map_err(io::Error::from)
}
