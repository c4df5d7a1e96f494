use std::io::{BufRead, Write};

use anyhow::Context;

use crate::summary::{RunningTotals, SummaryMatcher};


/// Strip a trailing `\n` or `\r\n` from a raw line.
fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Copy every line of `input` to `output` unchanged, and after each
/// `test result:` summary line write one extra line carrying the cumulative
/// totals so far.
///
/// Lines are handled as raw bytes: terminators (`\n` or `\r\n`) and bytes
/// that are not valid UTF-8 are relayed exactly as read. Runs until `input`
/// reaches end-of-stream, flushes `output` and returns the final totals.
///
/// # Errors
///
/// Returns an error if reading from `input` or writing to `output` fails.
/// Nothing is retried.
pub fn relay<R, W>(
    matcher: &SummaryMatcher,
    mut input: R,
    mut output: W,
) -> anyhow::Result<RunningTotals>
where
    R: BufRead,
    W: Write,
{
    let mut totals = RunningTotals::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = input
            .read_until(b'\n', &mut line)
            .context("failed to read input")?;
        if read == 0 {
            break;
        }

        output.write_all(&line).context("failed to write output")?;

        let Some(counts) = matcher.parse(trim_terminator(&line)) else {
            continue;
        };
        totals.add(&counts);

        // An unterminated final line still gets its summary on a line of its own.
        if !line.ends_with(b"\n") {
            output.write_all(b"\n").context("failed to write output")?;
        }
        writeln!(output, "{}", totals.summary_line()).context("failed to write output")?;
    }

    output.flush().context("failed to write output")?;
    Ok(totals)
}
