mod builtins;
mod exec;
mod jobs;
mod parser;
mod redirect;
mod shell;
mod signals;

fn main() {
    // The interpreter's own dispositions: ignore SIGINT, catch SIGTSTP.
    // Children re-adjust both for themselves right after the fork.
    if let Err(err) = signals::adopt_interpreter_dispositions() {
        eprintln!("smallsh: cannot install signal handlers: {}", err);
        std::process::exit(1);
    }

    shell::run_shell();
}
