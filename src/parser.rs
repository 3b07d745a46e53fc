use nix::unistd::getpid;
use once_cell::sync::Lazy;

/// The shell's own pid, rendered once for `$$` substitution.
static SHELL_PID: Lazy<String> = Lazy::new(|| getpid().to_string());

/// Represents a parsed command, built once per input line and consumed
/// by the executor.
#[derive(Debug, Default)]
pub struct Command {
    /// Command and its arguments.
    pub argv: Vec<String>,
    /// Input redirection file, if any.
    pub infile: Option<String>,
    /// Output redirection file, if any.
    pub outfile: Option<String>,
    /// Background execution requested with a trailing `&`.
    pub background: bool,
}

/// Parses one input line into a `Command`. This function handles:
///
/// - Tokenization on whitespace
/// - Input redirection (`<` file) and output redirection (`>` file)
/// - A background request: `&` as the final token
/// - `$$` tokens, substituted with the shell's own pid
///
/// A blank line, or a line whose first token begins with `#`, yields the
/// empty command (no argv, nothing interpreted after the `#`).
///
/// Returns `Err(String)` when a redirection operator has no target.
pub fn parse_command_line(cmdline: &str) -> Result<Command, String> {
    let mut tokens: Vec<&str> = cmdline.split_whitespace().collect();

    let mut command = Command::default();

    // The background request is positional: only a trailing & counts.
    if tokens.last() == Some(&"&") {
        command.background = true;
        tokens.pop();
    }

    match tokens.first() {
        None => return Ok(Command::default()),
        Some(first) if first.starts_with('#') => return Ok(Command::default()),
        Some(_) => {}
    }

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        match token {
            "<" => {
                let file = iter.next().ok_or("no input file specified after '<'")?;
                command.infile = Some(file.to_string());
            }
            ">" => {
                let file = iter.next().ok_or("no output file specified after '>'")?;
                command.outfile = Some(file.to_string());
            }
            _ => command.argv.push(expand_token(token)),
        }
    }

    Ok(command)
}

/// Substitutes a token that is exactly `$$` with the shell's pid;
/// any other token passes through unchanged.
fn expand_token(token: &str) -> String {
    if token == "$$" {
        SHELL_PID.clone()
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_command() {
        let cmd = parse_command_line("ls -l").unwrap();
        assert_eq!(cmd.argv, vec!["ls", "-l"]);
        assert_eq!(cmd.infile, None);
        assert_eq!(cmd.outfile, None);
        assert!(!cmd.background);
    }

    #[test]
    fn captures_redirection_targets() {
        let cmd = parse_command_line("sort < names.txt > sorted.txt").unwrap();
        assert_eq!(cmd.argv, vec!["sort"]);
        assert_eq!(cmd.infile, Some("names.txt".to_string()));
        assert_eq!(cmd.outfile, Some("sorted.txt".to_string()));
    }

    #[test]
    fn trailing_ampersand_requests_background() {
        let cmd = parse_command_line("sleep 5 &").unwrap();
        assert_eq!(cmd.argv, vec!["sleep", "5"]);
        assert!(cmd.background);
    }

    #[test]
    fn ampersand_mid_line_is_an_ordinary_argument() {
        let cmd = parse_command_line("echo a & b").unwrap();
        assert_eq!(cmd.argv, vec!["echo", "a", "&", "b"]);
        assert!(!cmd.background);
    }

    #[test]
    fn expands_pid_token() {
        let cmd = parse_command_line("echo $$").unwrap();
        assert_eq!(cmd.argv[1], getpid().to_string());
    }

    #[test]
    fn pid_must_be_the_whole_token() {
        let cmd = parse_command_line("echo x$$").unwrap();
        assert_eq!(cmd.argv[1], "x$$");
    }

    #[test]
    fn blank_line_is_a_noop() {
        let cmd = parse_command_line("   ").unwrap();
        assert!(cmd.argv.is_empty());
        assert!(!cmd.background);
    }

    #[test]
    fn comment_line_is_a_noop() {
        let cmd = parse_command_line("# rm -rf > junk.txt &").unwrap();
        assert!(cmd.argv.is_empty());
        assert_eq!(cmd.outfile, None);
        assert!(!cmd.background);
    }

    #[test]
    fn missing_redirect_target_is_an_error() {
        assert!(parse_command_line("cat <").is_err());
        assert!(parse_command_line("cat >").is_err());
    }
}
