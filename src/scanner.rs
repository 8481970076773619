//! Groups benchmark lines by package.
//!
//! A package's results are only known to be complete once its `ok` line
//! appears, so benchmark lines are buffered until then:
//!
//! ```text
//! ?   	pkg/a	[no test files]      -> pkg/a excluded
//! ok  	pkg/b	0.015s               -> pkg/b: []
//! BenchmarkParse-4	200000	5324 ns/op   -> buffered
//! ok  	pkg/c	1.152s               -> pkg/c: [Parse]
//! ```
//!
//! Every other line (`PASS`, `goos: ...`, blank, tool chatter) is ignored.

use crate::benchmark::{Benchmark, PackageResults};
use crate::error::{ParseError, ParseResult};
use crate::line::{is_benchmark_line, parse_line};
use crate::reader::LineReader;
use std::io::Read;
use tracing::{debug, warn};

const NO_TEST_FILES: &str = "[no test files]";
const CACHED: &str = "(cached)";
const DURATION_UNITS: &[&str] = &["ns", "us", "\u{b5}s", "\u{3bc}s", "ms", "s", "m", "h"];

/// Classification of one line of harness output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    NoTestFiles { package: &'a str },
    PackageOk { package: &'a str, elapsed: &'a str },
    Benchmark,
    Other,
}

/// Classify a line. Checks run in priority order, first match wins.
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim_end();

    if let Some(head) = trimmed.strip_suffix(NO_TEST_FILES) {
        let mut fields = head.split_whitespace();
        if let (Some(_status), Some(package), None) = (fields.next(), fields.next(), fields.next())
        {
            return LineKind::NoTestFiles { package };
        }
    }

    let mut fields = trimmed.split_whitespace();
    if let (Some("ok"), Some(package), Some(elapsed)) = (fields.next(), fields.next(), fields.next())
    {
        if elapsed == CACHED || is_duration(elapsed) {
            return LineKind::PackageOk { package, elapsed };
        }
    }

    if is_benchmark_line(line) {
        return LineKind::Benchmark;
    }

    LineKind::Other
}

/// True for a Go duration such as `0.015s`, `150ms` or `1m0.5s`.
fn is_duration(token: &str) -> bool {
    let mut rest = token;
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let mut len = int_len;
        if rest[len..].starts_with('.') {
            let frac_len = rest[len + 1..].bytes().take_while(u8::is_ascii_digit).count();
            if frac_len == 0 {
                return false;
            }
            len += 1 + frac_len;
        }
        if len == 0 {
            return false;
        }
        rest = &rest[len..];

        // Longest unit first so "ms" is not read as "m" followed by "s".
        let unit = DURATION_UNITS
            .iter()
            .filter(|u| rest.starts_with(**u))
            .max_by_key(|u| u.len());
        match unit {
            Some(u) => rest = &rest[u.len()..],
            None => return false,
        }
    }
    true
}

/// Push-style scanner: feed lines in order, then [`finish`](Scanner::finish).
#[derive(Debug, Default)]
pub struct Scanner {
    pending: Vec<Benchmark>,
    results: PackageResults,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one line; `line_number` is only used for error context.
    pub fn feed_line(&mut self, line_number: usize, line: &str) -> ParseResult<()> {
        match classify(line) {
            LineKind::NoTestFiles { package } => {
                if !self.pending.is_empty() {
                    debug!(
                        package,
                        dropped = self.pending.len(),
                        "no test files notice cleared buffered benchmarks"
                    );
                }
                self.pending.clear();
            }
            LineKind::PackageOk { package, elapsed } => {
                let benchmarks = std::mem::take(&mut self.pending);
                debug!(package, elapsed, benchmarks = benchmarks.len(), "package complete");
                self.results.insert(package.to_string(), benchmarks);
            }
            LineKind::Benchmark => {
                let b = parse_line(line).map_err(|source| ParseError::Line {
                    line: line_number,
                    text: line.to_string(),
                    source,
                })?;
                self.pending.push(b);
            }
            LineKind::Other => {}
        }
        Ok(())
    }

    /// Benchmarks seen since the last `ok` or no-test-files line.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Return the completed packages. Benchmarks still buffered (the stream
    /// ended without an `ok` line) are dropped.
    pub fn finish(self) -> PackageResults {
        if !self.pending.is_empty() {
            warn!(
                dropped = self.pending.len(),
                "input ended before a package completion line; discarding trailing benchmarks"
            );
        }
        self.results
    }
}

/// Parse a whole harness output stream.
pub fn parse_multiple_benchmarks<R: Read>(reader: R) -> ParseResult<PackageResults> {
    let mut scanner = Scanner::new();
    for line in LineReader::new(reader) {
        let (number, text) = line?;
        scanner.feed_line(number, &text)?;
    }
    Ok(scanner.finish())
}

/// Parse harness output already held in memory.
pub fn parse_str(input: &str) -> ParseResult<PackageResults> {
    parse_multiple_benchmarks(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::Measured;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("?   \tpkg/a\t[no test files]"),
            LineKind::NoTestFiles { package: "pkg/a" }
        );
        assert_eq!(
            classify("ok  \tpkg/b\t0.015s"),
            LineKind::PackageOk {
                package: "pkg/b",
                elapsed: "0.015s"
            }
        );
        assert_eq!(
            classify("ok  \tpkg/b\t(cached)"),
            LineKind::PackageOk {
                package: "pkg/b",
                elapsed: "(cached)"
            }
        );
        assert_eq!(
            classify("ok  \tpkg/b\t0.2s\tcoverage: 81.0% of statements"),
            LineKind::PackageOk {
                package: "pkg/b",
                elapsed: "0.2s"
            }
        );
        assert_eq!(classify("BenchmarkX-4\t10\t1 ns/op"), LineKind::Benchmark);
        assert_eq!(classify("PASS"), LineKind::Other);
        assert_eq!(classify("FAIL\tpkg/e\t0.1s"), LineKind::Other);
        assert_eq!(classify("goos: linux"), LineKind::Other);
        assert_eq!(classify(""), LineKind::Other);
        assert_eq!(classify("ok"), LineKind::Other);
        assert_eq!(classify("ok pkg/only"), LineKind::Other);
        assert_eq!(classify("[no test files]"), LineKind::Other);
        assert_eq!(classify("okay pkg 1s"), LineKind::Other);
        assert_eq!(classify("ok so far everything"), LineKind::Other);
        assert_eq!(classify("ok  \tpkg/b\t12"), LineKind::Other);
        assert_eq!(
            classify("note: vendored pkg/x has [no test files]"),
            LineKind::Other
        );
    }

    #[test]
    fn test_duration_tokens() {
        for token in ["0.015s", "1s", "150ms", "1m0.5s", "2h3m4.5s", "12\u{b5}s", "7ns", ".5s"] {
            assert!(is_duration(token), "{token}");
        }
        for token in ["", "s", "12", "1.s", "1.5", "far", "1x", "1s!", "+1s", "1e3s"] {
            assert!(!is_duration(token), "{token}");
        }
    }

    #[test]
    fn test_chatter_does_not_move_benchmarks() {
        let results =
            parse_str("BenchmarkA-4\t100\t10 ns/op\nok so far everything\nok  \tpkg/real\t1.0s\n")
                .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results["pkg/real"].len(), 1);

        let results = parse_str(
            "BenchmarkA-4\t100\t10 ns/op\nnote: vendored pkg/x has [no test files]\nok  \tpkg/real\t1.0s\n",
        )
        .unwrap();
        assert_eq!(results["pkg/real"].len(), 1);
    }

    #[test]
    fn test_completion_flushes_in_order() {
        let mut s = Scanner::new();
        s.feed_line(1, "BenchmarkA  10  1 ns/op").unwrap();
        s.feed_line(2, "BenchmarkB  20  2 ns/op").unwrap();
        assert_eq!(s.pending(), 2);
        s.feed_line(3, "ok  \tpkg/x\t1s").unwrap();
        assert_eq!(s.pending(), 0);

        let results = s.finish();
        let names: Vec<_> = results["pkg/x"].iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_no_test_files_never_emits() {
        let mut s = Scanner::new();
        s.feed_line(1, "BenchmarkA  10  1 ns/op").unwrap();
        s.feed_line(2, "?   \tpkg/none\t[no test files]").unwrap();
        assert_eq!(s.pending(), 0);
        s.feed_line(3, "ok  \tpkg/next\t1s").unwrap();

        let results = s.finish();
        assert!(!results.contains_key("pkg/none"));
        assert_eq!(results["pkg/next"], Vec::<Benchmark>::new());
    }

    #[test]
    fn test_trailing_buffer_is_dropped() {
        let results = parse_str("ok  \tpkg/a\t1s\nBenchmarkLost-2  10  5 ns/op\n").unwrap();
        assert_eq!(results.len(), 1);
        assert!(results["pkg/a"].is_empty());
    }

    #[test]
    fn test_bad_line_reports_position() {
        let err = parse_str("PASS\nBenchmarkA-4  oops  1 ns/op\nok  \tpkg/a\t1s\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        match err {
            ParseError::Line { text, .. } => assert_eq!(text, "BenchmarkA-4  oops  1 ns/op"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_str("").unwrap().is_empty());
    }

    #[test]
    fn test_crlf_input() {
        let results = parse_str("BenchmarkA-4\t10\t1 ns/op\r\nok  \tpkg/a\t1s\r\n").unwrap();
        assert_eq!(results["pkg/a"][0].measured, Measured::NS_PER_OP);
        assert_eq!(results["pkg/a"][0].procs, 4);
    }
}
