use std::fmt;

use anyhow::Context;
use regex::bytes::{Captures, Regex};

/// Shape of the per-binary summary line printed by the libtest harness, e.g.
/// `test result: ok. 3 passed; 0 failed; 1 ignored; 0 measured; 2 filtered out; finished in 0.01s`.
///
/// Unicode mode is off so `.` also steps over bytes that are not valid UTF-8,
/// and the counts only accept ASCII digits.
const SUMMARY_PATTERN: &str = r"(?-u)test result:.*\. ([0-9]+) passed; ([0-9]+) failed; ([0-9]+) ignored; ([0-9]+) measured; ([0-9]+) filtered out";

/// Indentation and tag that set a derived line apart from the harness output.
const SUM_PREFIX: &str = "            sum: ";

/// Counts parsed from a single `test result:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestCounts {
    pub passed: u64,
    pub failed: u64,
    pub ignored: u64,
    pub measured: u64,
    pub filtered_out: u64,
}

/// Cumulative counts across every summary line seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunningTotals {
    pub passed: u64,
    pub failed: u64,
    pub ignored: u64,
    pub measured: u64,
    pub filtered_out: u64,
}

fn write_counts(
    f: &mut fmt::Formatter<'_>,
    [passed, failed, ignored, measured, filtered_out]: [u64; 5],
) -> fmt::Result {
    write!(
        f,
        "{passed} passed; {failed} failed; {ignored} ignored; {measured} measured; {filtered_out} filtered out"
    )
}

impl fmt::Display for TestCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(
            f,
            [
                self.passed,
                self.failed,
                self.ignored,
                self.measured,
                self.filtered_out,
            ],
        )
    }
}

impl fmt::Display for RunningTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(
            f,
            [
                self.passed,
                self.failed,
                self.ignored,
                self.measured,
                self.filtered_out,
            ],
        )
    }
}

impl RunningTotals {
    /// Fold one parsed summary into the totals. Saturates at `u64::MAX`.
    pub const fn add(&mut self, counts: &TestCounts) {
        self.passed = self.passed.saturating_add(counts.passed);
        self.failed = self.failed.saturating_add(counts.failed);
        self.ignored = self.ignored.saturating_add(counts.ignored);
        self.measured = self.measured.saturating_add(counts.measured);
        self.filtered_out = self.filtered_out.saturating_add(counts.filtered_out);
    }

    /// The derived line emitted after each matched summary, without a terminator.
    pub fn summary_line(&self) -> String {
        format!("{SUM_PREFIX}{self}")
    }
}

/// Recognises `test result:` summary lines.
#[derive(Debug, Clone)]
pub struct SummaryMatcher {
    re: Regex,
}

impl SummaryMatcher {
    /// Compile the summary pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> anyhow::Result<Self> {
        let re = Regex::new(SUMMARY_PATTERN).context("invalid summary pattern")?;
        Ok(Self { re })
    }

    /// Search `line` for a summary and parse its five counts.
    ///
    /// The search is unanchored: text before `test result:` or after
    /// `filtered out` is ignored. `line` should not include its terminator.
    /// Returns `None` when the line does not have the exact five-field shape
    /// or when a count does not fit in a `u64`.
    pub fn parse(&self, line: &[u8]) -> Option<TestCounts> {
        let caps = self.re.captures(line)?;
        Some(TestCounts {
            passed: count_at(&caps, 1)?,
            failed: count_at(&caps, 2)?,
            ignored: count_at(&caps, 3)?,
            measured: count_at(&caps, 4)?,
            filtered_out: count_at(&caps, 5)?,
        })
    }
}

fn count_at(caps: &Captures<'_>, index: usize) -> Option<u64> {
    let digits = std::str::from_utf8(caps.get(index)?.as_bytes()).ok()?;
    digits.parse().ok()
}
