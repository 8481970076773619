use clap::{Parser, Subcommand};
use grade::config::{RunConfig, DEFAULT_DATABASE};
use grade::schema::{GradeReport, InputReport, RunMeta};
use grade::synth::{self, SynthConfig};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STDIN: &str = "-";

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse benchmark output into a JSON report of per-package results.
    Parse {
        /// Files or directories of `go test -bench` output; `-` or nothing reads stdin.
        #[arg(value_name = "PATH")]
        input: Vec<PathBuf>,

        /// Name of the database the results are destined for.
        #[arg(long, env = "GRADE_DATABASE", default_value = DEFAULT_DATABASE)]
        database: String,

        /// Go version used to run the benchmarks.
        #[arg(long, env = "GRADE_GO_VERSION", default_value = "")]
        go_version: String,

        /// Unix epoch timestamp to apply to all results.
        #[arg(long, env = "GRADE_TIMESTAMP", default_value_t = 0)]
        timestamp: i64,

        /// Revision of the repository used to generate the results.
        #[arg(long, env = "GRADE_REVISION", default_value = "")]
        revision: String,

        /// User-specified string identifying the hardware the benchmarks ran on.
        #[arg(long, env = "GRADE_HARDWARE_ID", default_value = "")]
        hardware_id: String,
    },

    /// Write deterministic synthetic benchmark output (for load testing the parser).
    Generate {
        /// Number of packages.
        #[arg(long, default_value_t = 32)]
        packages: usize,

        /// Maximum benchmark lines per package.
        #[arg(long, default_value_t = 16)]
        benchmarks: usize,

        /// Random seed for deterministic generation.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Parser, Debug)]
#[command(name = "grade")]
#[command(version)]
#[command(about = "Convert Go benchmark output into structured per-package records")]
struct Args {
    /// Where to write the output. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut s = String::with_capacity(64);
    for b in digest {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("input not found: {}", root.display()),
        ));
    }

    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            out.push(entry.path().to_path_buf());
        }
    }
    out.sort();
    Ok(out)
}

/// Load every input as `(source label, raw bytes)`; stdin first, then paths in argument order.
fn load_inputs(inputs: &[PathBuf]) -> io::Result<Vec<(String, Vec<u8>)>> {
    let mut loaded = Vec::new();
    if inputs.is_empty() || inputs.iter().any(|p| p.as_os_str() == STDIN) {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        loaded.push((STDIN.to_string(), buf));
    }

    for input in inputs.iter().filter(|p| p.as_os_str() != STDIN) {
        for file in collect_files(input)? {
            debug!(path = %file.display(), "reading input");
            let bytes = fs::read(&file)?;
            loaded.push((file.to_string_lossy().to_string(), bytes));
        }
    }
    Ok(loaded)
}

fn parse_inputs(loaded: &[(String, Vec<u8>)]) -> io::Result<Vec<InputReport>> {
    // Inputs are independent streams.
    loaded
        .par_iter()
        .map(|(source, bytes)| {
            let results = grade::parse_multiple_benchmarks(bytes.as_slice())
                .map_err(|e| io::Error::other(format!("{source}: {e}")))?;
            Ok::<_, io::Error>(InputReport::new(
                source.clone(),
                sha256_hex(bytes),
                &results,
            ))
        })
        .collect()
}

fn write_output(out: Option<&Path>, text: &str) -> io::Result<()> {
    if let Some(out) = out {
        fs::write(out, text)
    } else {
        print!("{text}");
        Ok(())
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("grade=info".parse().expect("valid log directive")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match args.cmd {
        Command::Parse {
            input,
            database,
            go_version,
            timestamp,
            revision,
            hardware_id,
        } => {
            let cfg = RunConfig {
                database,
                go_version,
                timestamp,
                revision,
                hardware_id,
            };
            cfg.validate()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

            let loaded = load_inputs(&input)?;
            let inputs = parse_inputs(&loaded)?;
            for report in &inputs {
                info!(
                    source = %report.source,
                    packages = report.packages.len(),
                    benchmarks = report.benchmark_count(),
                    "parsed input"
                );
            }

            let report = GradeReport {
                run: RunMeta::new(&cfg),
                inputs,
            };
            let mut json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
            json.push('\n');
            write_output(args.out.as_deref(), &json)
        }
        Command::Generate {
            packages,
            benchmarks,
            seed,
        } => {
            let generated = synth::generate(&SynthConfig {
                packages,
                max_benchmarks: benchmarks,
                seed,
            });
            info!(
                packages = generated.expected.len(),
                bytes = generated.text.len(),
                "generated synthetic output"
            );
            write_output(args.out.as_deref(), &generated.text)
        }
    }
}
