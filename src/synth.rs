//! Deterministic synthetic harness output.
//!
//! Produces text shaped like `go test -bench` output across many packages,
//! together with the [`PackageResults`] a correct parser must recover from it.
//! Used by the throughput benches and by the scanner's property tests.

use crate::benchmark::{Benchmark, PackageResults, Unit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

const BASES: &[&str] = &[
    "Parse", "Encode", "Decode", "Marshal", "Query", "Insert", "Lookup", "Hash",
];
const SUBS: &[&str] = &["Small", "Large", "Decimal", "Float", "cold-cache", "warm"];
const PROCS: &[u32] = &[1, 2, 4, 8, 16];

/// Configuration for synthetic output generation.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Number of packages in the stream.
    pub packages: usize,
    /// Upper bound on benchmark lines per package.
    pub max_benchmarks: usize,
    /// Random seed for deterministic generation.
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            packages: 32,
            max_benchmarks: 16,
            seed: 42,
        }
    }
}

/// Generated text and the results it encodes.
#[derive(Debug, Clone)]
pub struct SynthOutput {
    pub text: String,
    pub expected: PackageResults,
}

enum Outcome {
    NoTestFiles,
    Ok(Vec<Benchmark>),
}

struct Package {
    path: String,
    text: String,
    outcome: Outcome,
}

fn per_package_seed(master_seed: u64, index: usize) -> u64 {
    master_seed
        .wrapping_add(index as u64)
        .wrapping_mul(0x517cc1b727220a95)
}

/// Generate output for every package, in package order.
pub fn generate(config: &SynthConfig) -> SynthOutput {
    let packages: Vec<Package> = (0..config.packages)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(per_package_seed(config.seed, i));
            generate_package(&mut rng, i, config.max_benchmarks)
        })
        .collect();

    let mut text = String::new();
    let mut expected = PackageResults::new();
    for pkg in packages {
        text.push_str(&pkg.text);
        if let Outcome::Ok(benchmarks) = pkg.outcome {
            expected.insert(pkg.path, benchmarks);
        }
    }

    SynthOutput { text, expected }
}

fn generate_package(rng: &mut ChaCha8Rng, index: usize, max_benchmarks: usize) -> Package {
    let path = format!("example.com/synth/pkg{index:03}");

    if rng.gen_ratio(1, 6) {
        return Package {
            text: format!("?   \t{path}\t[no test files]\n"),
            path,
            outcome: Outcome::NoTestFiles,
        };
    }

    let count = rng.gen_range(0..=max_benchmarks);
    let mut text = String::new();
    if count > 0 {
        text.push_str(&format!("goos: linux\ngoarch: amd64\npkg: {path}\n"));
    }

    let mut benchmarks = Vec::with_capacity(count);
    for _ in 0..count {
        let (line, b) = generate_benchmark(rng);
        text.push_str(&line);
        text.push('\n');
        benchmarks.push(b);
    }

    text.push_str("PASS\n");
    let elapsed = rng.gen_range(1..100_000) as f64 / 1000.0;
    text.push_str(&format!("ok  \t{path}\t{elapsed:.3}s\n"));

    Package {
        path,
        text,
        outcome: Outcome::Ok(benchmarks),
    }
}

fn generate_benchmark(rng: &mut ChaCha8Rng) -> (String, Benchmark) {
    let base = BASES.choose(rng).copied().unwrap_or("Parse");
    let name = if rng.gen_bool(0.4) {
        let sub = SUBS.choose(rng).copied().unwrap_or("Small");
        format!("{base}/{sub}")
    } else {
        base.to_string()
    };
    let procs = PROCS.choose(rng).copied().unwrap_or(1);
    let n: u64 = rng.gen_range(1..50_000_000);

    let mut line = if procs == 1 && rng.gen_bool(0.5) {
        format!("Benchmark{name}\t{n:>10}")
    } else {
        format!("Benchmark{name}-{procs}\t{n:>10}")
    };

    let mut b = Benchmark::new(name, procs, n);
    for unit in Unit::ALL {
        if !rng.gen_bool(0.75) {
            continue;
        }
        let value = match unit {
            Unit::NsPerOp => {
                // The harness switches to one decimal for fast benchmarks.
                let tenths: u64 = rng.gen_range(1..10_000_000);
                if tenths < 1_000 {
                    b.ns_per_op = tenths as f64 / 10.0;
                    format!("{:.1}", b.ns_per_op)
                } else {
                    b.ns_per_op = (tenths / 10) as f64;
                    format!("{}", tenths / 10)
                }
            }
            Unit::MbPerS => {
                let cents: u64 = rng.gen_range(1..10_000_000);
                b.mb_per_s = cents as f64 / 100.0;
                format!("{:.2}", b.mb_per_s)
            }
            Unit::AllocedBytesPerOp => {
                b.alloced_bytes_per_op = rng.gen_range(0..1_000_000);
                b.alloced_bytes_per_op.to_string()
            }
            Unit::AllocsPerOp => {
                b.allocs_per_op = rng.gen_range(0..10_000);
                b.allocs_per_op.to_string()
            }
        };
        b.measured |= unit.flag();
        line.push_str(&format!("\t{value:>10} {unit}"));
    }

    (line, b)
}
