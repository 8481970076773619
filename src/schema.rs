use crate::benchmark::{Benchmark, PackageResults};
use crate::config::RunConfig;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub tool_version: String,
    pub database: String,
    pub go_version: String,
    pub revision: String,
    pub hardware_id: String,
    pub timestamp: i64,
}

impl RunMeta {
    pub fn new(cfg: &RunConfig) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            database: cfg.database.clone(),
            go_version: cfg.go_version.clone(),
            revision: cfg.revision.clone(),
            hardware_id: cfg.hardware_id.clone(),
            timestamp: cfg.timestamp,
        }
    }
}

/// Serialized form of [`Benchmark`]; unmeasured fields are omitted, not zeroed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkEntry {
    pub name: String,
    pub procs: u32,
    pub n: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns_per_op: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mb_per_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alloced_bytes_per_op: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocs_per_op: Option<u64>,
}

impl From<&Benchmark> for BenchmarkEntry {
    fn from(b: &Benchmark) -> Self {
        Self {
            name: b.name.clone(),
            procs: b.procs,
            n: b.n,
            ns_per_op: b.measured_ns_per_op(),
            mb_per_s: b.measured_mb_per_s(),
            alloced_bytes_per_op: b.measured_alloced_bytes_per_op(),
            allocs_per_op: b.measured_allocs_per_op(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InputReport {
    /// File path, or `-` for stdin.
    pub source: String,
    /// Hex SHA-256 of the raw input bytes.
    pub sha256: String,
    pub packages: BTreeMap<String, Vec<BenchmarkEntry>>,
}

impl InputReport {
    pub fn new(source: String, sha256: String, results: &PackageResults) -> Self {
        let packages = results
            .iter()
            .map(|(pkg, bs)| (pkg.clone(), bs.iter().map(BenchmarkEntry::from).collect()))
            .collect();
        Self {
            source,
            sha256,
            packages,
        }
    }

    pub fn benchmark_count(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    pub run: RunMeta,
    pub inputs: Vec<InputReport>,
}
