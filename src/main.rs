use std::io;

use clap::Parser;

use testsum::relay;
use testsum::summary::SummaryMatcher;

/// Exit status for a closed downstream pipe, as if killed by SIGPIPE.
const BROKEN_PIPE_EXIT: i32 = 128 + 13;

#[derive(Parser)]
#[command(
    name = "testsum",
    version,
    about = "Pass cargo test output through, adding running totals after each test result line",
    long_about = "Reads lines from stdin and writes them unchanged to stdout. After every \
                  `test result:` summary line, prints a `sum:` line with the passed, failed, \
                  ignored, measured and filtered out counts accumulated so far.\n\n\
                  Example: cargo test --workspace 2>&1 | testsum"
)]
struct Cli {}

fn cmd_relay() -> anyhow::Result<()> {
    let matcher = SummaryMatcher::new()?;
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    relay::relay(&matcher, stdin, stdout)?;
    Ok(())
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

fn main() {
    let _cli = Cli::parse();
    let exit_code = match cmd_relay() {
        Ok(()) => 0,
        Err(e) if is_broken_pipe(&e) => BROKEN_PIPE_EXIT,
        Err(e) => {
            eprintln!("[testsum] error: {e:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
