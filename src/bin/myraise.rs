/*
 * myraise.rs - A handy routine for testing the shell
 *
 * usage: myraise <signum>
 * Sends signal <signum> to itself.
 */

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <signum>", args[0]);
        process::exit(0);
    }

    let signum = args[1].parse::<i32>().unwrap_or_else(|_| {
        eprintln!("Error: <signum> must be a signal number");
        process::exit(1);
    });

    let signal = Signal::try_from(signum).unwrap_or_else(|_| {
        eprintln!("Error: {} is not a valid signal number", signum);
        process::exit(1);
    });

    let pid = Pid::from_raw(process::id() as i32);

    if let Err(err) = signal::kill(pid, signal) {
        eprintln!("kill error: {}", err);
    }

    process::exit(0);
}
