//! Parse `go test -bench` output into per-package benchmark records.
//!
//! ```rust
//! let input = "\
//! ?   \tpkg/a\t[no test files]
//! BenchmarkParse-4\t  200000\t      5324 ns/op\t    1680 B/op\t      32 allocs/op
//! ok  \tpkg/c\t1.152s
//! ";
//! let results = grade::parse_multiple_benchmarks(input.as_bytes()).unwrap();
//! assert!(!results.contains_key("pkg/a"));
//! assert_eq!(results["pkg/c"][0].name, "Parse");
//! assert_eq!(results["pkg/c"][0].procs, 4);
//! ```

pub mod benchmark;
pub mod config;
pub mod error;
pub mod line;
pub mod reader;
pub mod scanner;
pub mod schema;
pub mod synth;

pub use benchmark::{Benchmark, Measured, PackageResults, Unit};
pub use config::{ConfigError, RunConfig};
pub use error::{ParseError, ParseResult};
pub use line::{parse_line, LineError};
pub use scanner::{parse_multiple_benchmarks, parse_str, Scanner};
