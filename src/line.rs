//! Decoder for a single `Benchmark...` result line.
//!
//! ```text
//! BenchmarkAppendFloat/Decimal-4   20000000   64.8 ns/op   2 B/op   4 allocs/op
//! ^name                        ^procs ^n      ^(value, unit) pairs, any subset/order
//! ```

use crate::benchmark::{Benchmark, Unit};
use thiserror::Error;

const PREFIX: &str = "Benchmark";

/// Why a benchmark line could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("line does not start with a Benchmark name")]
    NotABenchmark,

    #[error("benchmark name is empty in {token:?}")]
    EmptyName { token: String },

    #[error("invalid procs suffix in {token:?}")]
    InvalidProcs { token: String },

    #[error("missing iteration count")]
    MissingIterations,

    #[error("invalid iteration count {token:?}")]
    InvalidIterations { token: String },

    #[error("value {token:?} has no unit")]
    MissingUnit { token: String },

    #[error("unknown unit {token:?}")]
    UnknownUnit { token: String },

    #[error("invalid {unit} value {token:?}")]
    InvalidValue { unit: Unit, token: String },
}

/// Decode one benchmark result line.
pub fn parse_line(line: &str) -> Result<Benchmark, LineError> {
    let mut fields = line.split_whitespace();

    let head = fields.next().ok_or(LineError::NotABenchmark)?;
    let (name, procs) = split_name(head)?;

    let n_token = fields.next().ok_or(LineError::MissingIterations)?;
    let n = parse_uint(n_token).ok_or_else(|| LineError::InvalidIterations {
        token: n_token.to_string(),
    })?;

    let mut b = Benchmark::new(name, procs, n);

    while let Some(value) = fields.next() {
        let unit_token = fields.next().ok_or_else(|| LineError::MissingUnit {
            token: value.to_string(),
        })?;
        let unit = Unit::from_token(unit_token).ok_or_else(|| LineError::UnknownUnit {
            token: unit_token.to_string(),
        })?;
        apply(&mut b, unit, value)?;
    }

    Ok(b)
}

/// Split `BenchmarkName/sub-4` into `("Name/sub", 4)`.
fn split_name(token: &str) -> Result<(&str, u32), LineError> {
    let rest = token
        .strip_prefix(PREFIX)
        .filter(|r| !r.is_empty())
        .ok_or(LineError::NotABenchmark)?;

    // Only a dash followed by digits through the end of the token is a suffix.
    let (name, procs) = match rest.rfind('-') {
        Some(i)
            if i + 1 < rest.len() && rest[i + 1..].bytes().all(|c| c.is_ascii_digit()) =>
        {
            let procs = rest[i + 1..]
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| LineError::InvalidProcs {
                    token: token.to_string(),
                })?;
            (&rest[..i], procs)
        }
        _ => (rest, 1),
    };

    if name.is_empty() {
        return Err(LineError::EmptyName {
            token: token.to_string(),
        });
    }
    Ok((name, procs))
}

fn apply(b: &mut Benchmark, unit: Unit, token: &str) -> Result<(), LineError> {
    let invalid = || LineError::InvalidValue {
        unit,
        token: token.to_string(),
    };
    match unit {
        Unit::NsPerOp => b.ns_per_op = parse_float(token).ok_or_else(invalid)?,
        Unit::MbPerS => b.mb_per_s = parse_float(token).ok_or_else(invalid)?,
        Unit::AllocedBytesPerOp => {
            b.alloced_bytes_per_op = parse_uint(token).ok_or_else(invalid)?
        }
        Unit::AllocsPerOp => b.allocs_per_op = parse_uint(token).ok_or_else(invalid)?,
    }
    b.measured |= unit.flag();
    Ok(())
}

// The harness prints plain digits only: no sign, exponent, "inf" or "NaN".
fn parse_uint(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_float(token: &str) -> Option<f64> {
    let (int, frac) = token.split_once('.').unwrap_or((token, ""));
    let digits = |s: &str| s.bytes().all(|c| c.is_ascii_digit());
    if int.is_empty() || !digits(int) || !digits(frac) || token.ends_with('.') {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True if `line` has the shape of a benchmark result line.
pub fn is_benchmark_line(line: &str) -> bool {
    line.strip_prefix(PREFIX)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_whitespace())
}
