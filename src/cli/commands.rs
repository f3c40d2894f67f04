//! Command definitions for pomodoro-desk.
//!
//! Uses clap derive macro for argument parsing, both for the process
//! arguments and for the commands typed into the running session.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

// ============================================================================
// Process arguments
// ============================================================================

/// pomodoro-desk - A Pomodoro timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-desk",
    version,
    about = "Pomodoro timer with a floating widget and persisted settings",
    long_about = "Alternates work and break intervals, counts today's completed sessions\n\
                  and keeps its settings between runs. Type `help` once it is running.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (runs the timer when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the settings files
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Never play the alert sound
    #[arg(long)]
    pub no_sound: bool,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Session commands
// ============================================================================

/// One line typed into the running session.
#[derive(Parser, Debug)]
#[command(
    name = "command",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Commands accepted while the timer is running.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Start or resume the countdown
    Start {
        /// Work duration in minutes
        #[arg(short, long)]
        work: Option<String>,

        /// Break duration in minutes
        #[arg(short = 'b', long = "break")]
        break_time: Option<String>,
    },

    /// Pause the countdown
    Pause,

    /// Stop and return to a full work phase
    Reset,

    /// Set the work duration used by the next start or reset
    Work {
        /// Minutes, any positive whole number
        #[arg(allow_negative_numbers = true)]
        minutes: String,
    },

    /// Set the break duration used by the next start or reset
    Break {
        /// Minutes, any positive whole number
        #[arg(allow_negative_numbers = true)]
        minutes: String,
    },

    /// Set the subject label (empty clears it)
    Subject {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Open or close the floating timer
    Float,

    /// Set the floating timer opacity (0.1-1.0)
    FloatOpacity {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Show the timer and settings
    Status,

    /// Set the theme
    Theme {
        /// dark or light
        name: String,
    },

    /// Set a custom color
    Color {
        /// primary, secondary, accent, text or warning
        role: String,
        /// Hex value like #7AA2F7
        hex: String,
    },

    /// Set the font family
    Font {
        #[arg(required = true, trailing_var_arg = true)]
        family: Vec<String>,
    },

    /// Set the font size
    FontSize {
        #[arg(allow_negative_numbers = true)]
        size: String,
    },

    /// Set the main window transparency (0.5-1.0)
    Opacity {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Turn the alert sound on or off
    Sound {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Save the appearance settings
    Save,

    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

/// On/off argument.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl CommandLine {
    /// Parses one typed line.
    ///
    /// Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown commands or bad arguments, and for
    /// `help` (which clap reports as an error carrying the help text).
    pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }
        Self::try_parse_from(words).map(|parsed| Some(parsed.command))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["pomodoro-desk"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(!cli.no_sound);
            assert!(cli.config_dir.is_none());
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["pomodoro-desk", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_config_dir() {
            let cli = Cli::parse_from(["pomodoro-desk", "--config-dir", "/tmp/pd", "--no-sound"]);
            assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/pd")));
            assert!(cli.no_sound);
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["pomodoro-desk", "completions", "zsh"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Zsh
                })
            ));
        }

        #[test]
        fn test_cli_debug_assert() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
            CommandLine::command().debug_assert();
        }
    }

    // ------------------------------------------------------------------------
    // Session command tests
    // ------------------------------------------------------------------------

    mod session_command_tests {
        use super::*;

        fn parse(line: &str) -> SessionCommand {
            CommandLine::parse_line(line).unwrap().unwrap()
        }

        #[test]
        fn test_blank_line() {
            assert!(CommandLine::parse_line("   ").unwrap().is_none());
        }

        #[test]
        fn test_start_plain() {
            assert_eq!(
                parse("start"),
                SessionCommand::Start {
                    work: None,
                    break_time: None
                }
            );
        }

        #[test]
        fn test_start_with_durations() {
            assert_eq!(
                parse("start --work 50 -b 10"),
                SessionCommand::Start {
                    work: Some("50".to_string()),
                    break_time: Some("10".to_string())
                }
            );
        }

        #[test]
        fn test_durations_are_raw_text() {
            // Validation happens in the session so it can raise a notice
            assert_eq!(
                parse("work abc"),
                SessionCommand::Work {
                    minutes: "abc".to_string()
                }
            );
            assert_eq!(
                parse("break -5"),
                SessionCommand::Break {
                    minutes: "-5".to_string()
                }
            );
        }

        #[test]
        fn test_subject_words() {
            assert_eq!(
                parse("subject Linear algebra ch. 3"),
                SessionCommand::Subject {
                    words: vec![
                        "Linear".to_string(),
                        "algebra".to_string(),
                        "ch.".to_string(),
                        "3".to_string()
                    ]
                }
            );
            assert_eq!(parse("subject"), SessionCommand::Subject { words: vec![] });
        }

        #[test]
        fn test_kebab_case_commands() {
            assert_eq!(parse("float-opacity 0.5"), SessionCommand::FloatOpacity { value: 0.5 });
            assert_eq!(
                parse("font-size 18"),
                SessionCommand::FontSize {
                    size: "18".to_string()
                }
            );
        }

        #[test]
        fn test_color() {
            assert_eq!(
                parse("color accent #FF0000"),
                SessionCommand::Color {
                    role: "accent".to_string(),
                    hex: "#FF0000".to_string()
                }
            );
        }

        #[test]
        fn test_sound_toggle() {
            assert_eq!(parse("sound off"), SessionCommand::Sound { state: Toggle::Off });
            assert!(CommandLine::parse_line("sound maybe").is_err());
        }

        #[test]
        fn test_quit_alias() {
            assert_eq!(parse("exit"), SessionCommand::Quit);
        }

        #[test]
        fn test_unknown_command() {
            assert!(CommandLine::parse_line("dance").is_err());
        }

        #[test]
        fn test_help_is_reported_as_error() {
            let err = CommandLine::parse_line("help").unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        }
    }
}
