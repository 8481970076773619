//! Decoded benchmark records.
//!
//! Any subset of the four measurements may be missing from a harness line, so
//! each [`Benchmark`] carries a [`Measured`] set recording which ones were
//! actually read. A clear bit means "not reported", never "zero".

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Package path -> benchmarks in the order they appeared in the stream.
pub type PackageResults = BTreeMap<String, Vec<Benchmark>>;

/// Bitmask of the optional measurements present on a benchmark line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Measured(u8);

impl Measured {
    pub const NS_PER_OP: Measured = Measured(1 << 0);
    pub const MB_PER_S: Measured = Measured(1 << 1);
    pub const ALLOCED_BYTES_PER_OP: Measured = Measured(1 << 2);
    pub const ALLOCS_PER_OP: Measured = Measured(1 << 3);

    pub const fn empty() -> Self {
        Measured(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Measured) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Measured) {
        self.0 |= other.0;
    }

    /// Units whose bit is set, in canonical column order.
    pub fn units(self) -> impl Iterator<Item = Unit> {
        Unit::ALL.into_iter().filter(move |u| self.contains(u.flag()))
    }
}

impl BitOr for Measured {
    type Output = Measured;

    fn bitor(self, rhs: Measured) -> Measured {
        Measured(self.0 | rhs.0)
    }
}

impl BitOrAssign for Measured {
    fn bitor_assign(&mut self, rhs: Measured) {
        self.0 |= rhs.0;
    }
}

/// Unit token following a measurement value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    NsPerOp,
    MbPerS,
    AllocedBytesPerOp,
    AllocsPerOp,
}

impl Unit {
    pub const ALL: [Unit; 4] = [
        Unit::NsPerOp,
        Unit::MbPerS,
        Unit::AllocedBytesPerOp,
        Unit::AllocsPerOp,
    ];

    pub fn from_token(token: &str) -> Option<Unit> {
        match token {
            "ns/op" => Some(Unit::NsPerOp),
            "MB/s" => Some(Unit::MbPerS),
            "B/op" => Some(Unit::AllocedBytesPerOp),
            "allocs/op" => Some(Unit::AllocsPerOp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::NsPerOp => "ns/op",
            Unit::MbPerS => "MB/s",
            Unit::AllocedBytesPerOp => "B/op",
            Unit::AllocsPerOp => "allocs/op",
        }
    }

    pub fn flag(&self) -> Measured {
        match self {
            Unit::NsPerOp => Measured::NS_PER_OP,
            Unit::MbPerS => Measured::MB_PER_S,
            Unit::AllocedBytesPerOp => Measured::ALLOCED_BYTES_PER_OP,
            Unit::AllocsPerOp => Measured::ALLOCS_PER_OP,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One benchmark result line.
#[derive(Clone, Debug, PartialEq)]
pub struct Benchmark {
    /// Name without the `Benchmark` prefix and `-N` suffix; may contain `/` segments.
    pub name: String,
    /// Parallelism suffix (`-4`), 1 when absent.
    pub procs: u32,
    /// Iterations run.
    pub n: u64,
    pub ns_per_op: f64,
    pub mb_per_s: f64,
    pub alloced_bytes_per_op: u64,
    pub allocs_per_op: u64,
    pub measured: Measured,
}

impl Benchmark {
    /// A record with nothing measured yet.
    pub fn new(name: impl Into<String>, procs: u32, n: u64) -> Self {
        Self {
            name: name.into(),
            procs,
            n,
            ns_per_op: 0.0,
            mb_per_s: 0.0,
            alloced_bytes_per_op: 0,
            allocs_per_op: 0,
            measured: Measured::empty(),
        }
    }

    pub fn measured_ns_per_op(&self) -> Option<f64> {
        self.measured
            .contains(Measured::NS_PER_OP)
            .then_some(self.ns_per_op)
    }

    pub fn measured_mb_per_s(&self) -> Option<f64> {
        self.measured
            .contains(Measured::MB_PER_S)
            .then_some(self.mb_per_s)
    }

    pub fn measured_alloced_bytes_per_op(&self) -> Option<u64> {
        self.measured
            .contains(Measured::ALLOCED_BYTES_PER_OP)
            .then_some(self.alloced_bytes_per_op)
    }

    pub fn measured_allocs_per_op(&self) -> Option<u64> {
        self.measured
            .contains(Measured::ALLOCS_PER_OP)
            .then_some(self.allocs_per_op)
    }
}
