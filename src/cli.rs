//! Command-line options
//!
//! Arguments are parsed by hand; there are only three flags. Anything else is
//! ignored, so every invocation prints the transcript and exits 0.

use crate::script::Narration;
use tracing::debug;

/// Where the lessons are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print the transcript to stdout and exit
    #[default]
    Print,
    /// Open the step-through terminal UI
    Tui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub mode: Mode,
    pub narration: Narration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunOptions),
    Help,
}

/// Parse arguments, program name excluded
pub fn parse_args<I, S>(args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = RunOptions::default();
    for arg in args {
        match arg.as_ref() {
            "--tui" => options.mode = Mode::Tui,
            "--explain" => options.narration = Narration::Explained,
            "-h" | "--help" => return Command::Help,
            other => debug!(argument = other, "ignoring argument"),
        }
    }
    Command::Run(options)
}

pub fn usage(program_name: &str) -> String {
    format!(
        "Usage: {program_name} [--explain] [--tui]\n\
         \n\
         Runs the pointer cheat sheet lessons and prints what each one observes.\n\
         \n\
         Options:\n\
         \x20 --explain   print each lesson's title and commentary before its output\n\
         \x20 --tui       step through the lessons in a terminal UI\n\
         \x20 -h, --help  show this message\n\
         \n\
         Other arguments are ignored."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_prints_brief_transcript() {
        let cmd = parse_args(Vec::<String>::new());
        assert_eq!(cmd, Command::Run(RunOptions::default()));
    }

    #[test]
    fn flags_combine_in_any_order() {
        let cmd = parse_args(["--tui", "--explain"]);
        assert_eq!(
            cmd,
            Command::Run(RunOptions {
                mode: Mode::Tui,
                narration: Narration::Explained,
            })
        );
    }

    #[test]
    fn help_wins_over_other_flags() {
        assert_eq!(parse_args(["--explain", "-h"]), Command::Help);
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        assert_eq!(
            parse_args(["foo"]),
            Command::Run(RunOptions::default())
        );
        assert_eq!(
            parse_args(["--verbose", "--explain", "bar"]),
            Command::Run(RunOptions {
                mode: Mode::Print,
                narration: Narration::Explained,
            })
        );
    }

    #[test]
    fn usage_names_every_flag() {
        let text = usage("pointer-cheatsheet");
        assert!(text.starts_with("Usage: pointer-cheatsheet"));
        for flag in ["--explain", "--tui", "--help"] {
            assert!(text.contains(flag), "missing {}", flag);
        }
    }
}
