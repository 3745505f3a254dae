//! Interactive prompt loop
//!
//! Each line is parsed by its own `Args` value, so nothing typed in one cycle
//! can leak into the next. Ctrl-C is only observed while waiting for input; a
//! conversion that is already running finishes first.

use crate::batch::run_conversion;
use crate::cli::{render_help, tokenize, Args};
use crate::constants::{EXIT_WORDS, FAREWELL, HELP_FLAGS, HELP_WORDS, PROMPT};
use crate::error::Result;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// What a single prompt line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Exit,
    Help,
    Blank,
    Run(Box<Args>),
    Invalid(String),
}

/// Logging switches given at launch. Every prompt line inherits them on top
/// of its own `--quiet`/`--verbose`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub quiet: bool,
    pub verbose: bool,
}

impl SessionFlags {
    pub fn from_args(args: &Args) -> Self {
        Self {
            quiet: args.quiet,
            verbose: args.verbose,
        }
    }

    fn apply(&self, args: &mut Args) {
        args.quiet |= self.quiet;
        args.verbose |= self.verbose;
    }
}

/// Why the shell stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    Quit,
    Interrupted,
    EndOfInput,
}

pub fn interpret_line(line: &str) -> ShellCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Blank;
    }

    let lower = trimmed.to_lowercase();
    if EXIT_WORDS.contains(&lower.as_str()) {
        return ShellCommand::Exit;
    }

    let asks_for_help = HELP_WORDS.contains(&lower.as_str())
        || tokenize(&lower).iter().any(|token| HELP_FLAGS.contains(token));
    if asks_for_help {
        return ShellCommand::Help;
    }

    match Args::from_line(trimmed) {
        Ok(args) => ShellCommand::Run(Box::new(args)),
        Err(e) => ShellCommand::Invalid(e.to_string().trim_end().to_string()),
    }
}

/// Starts the prompt on stdin with Ctrl-C as the interrupt.
pub fn run_interactive(session: SessionFlags) -> Result<ShellExit> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_shell(
        BufReader::new(tokio::io::stdin()),
        ctrl_c(),
        session,
    ))
}

/// Resolves on the first Ctrl-C. If the handler cannot be installed the
/// future never resolves and the shell simply runs without it.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Runs prompt cycles until `exit`/`quit`, end of input, or `interrupt` resolves.
pub async fn run_shell<R, F>(reader: R, interrupt: F, session: SessionFlags) -> Result<ShellExit>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    print_banner();

    let mut lines = reader.lines();
    tokio::pin!(interrupt);

    loop {
        show_prompt()?;

        let line = tokio::select! {
            _ = &mut interrupt => {
                println!("\n{}", FAREWELL);
                return Ok(ShellExit::Interrupted);
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            println!("\n{}", FAREWELL);
            return Ok(ShellExit::EndOfInput);
        };

        match interpret_line(&line) {
            ShellCommand::Exit => {
                println!("{}", FAREWELL);
                return Ok(ShellExit::Quit);
            }
            ShellCommand::Help => println!("{}", render_help()),
            ShellCommand::Blank => {}
            ShellCommand::Invalid(message) => {
                error!("Parameter parsing error: {}", message);
                error!("Please check your input parameters (name/value/count) and try again.");
            }
            ShellCommand::Run(mut args) => {
                session.apply(&mut args);
                if let Err(e) = run_conversion(&args) {
                    error!("Error occurred during processing: {}", e);
                }
                println!();
            }
        }
    }
}

fn print_banner() {
    println!("Welcome to the Image to WebP Converter!\n");
    println!("Usage examples:");
    println!("  - Convert single file: -i <file path>");
    println!("  - Convert directory: -d <directory path>");
    println!("  - More parameters, view help: -h/h or --help/help");
    println!("  - Exit program: exit or quit\n");
}

fn show_prompt() -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", PROMPT)?;
    stdout.flush()?;
    Ok(())
}
