use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use std::env::VarError;
use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// The error categories the fiesta knows how to provoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    Syntax,
    Indentation,
    Name,
    Type,
    Value,
    Index,
    Key,
    ZeroDivision,
    Attribute,
    ModuleNotFound,
    FileNotFound,
    Os,
    Recursion,
    Overflow,
    Memory,
    Assertion,
    Runtime,
    NotImplemented,
    UnicodeDecode,
    UnicodeEncode,
    StopIteration,
    Permission,
    FloatingPoint,
    Lookup,
}

impl FaultKind {
    pub fn name(self) -> &'static str {
        match self {
            FaultKind::Syntax => "SyntaxError",
            FaultKind::Indentation => "IndentationError",
            FaultKind::Name => "NameError",
            FaultKind::Type => "TypeError",
            FaultKind::Value => "ValueError",
            FaultKind::Index => "IndexError",
            FaultKind::Key => "KeyError",
            FaultKind::ZeroDivision => "ZeroDivisionError",
            FaultKind::Attribute => "AttributeError",
            FaultKind::ModuleNotFound => "ModuleNotFoundError",
            FaultKind::FileNotFound => "FileNotFoundError",
            FaultKind::Os => "OSError",
            FaultKind::Recursion => "RecursionError",
            FaultKind::Overflow => "OverflowError",
            FaultKind::Memory => "MemoryError",
            FaultKind::Assertion => "AssertionError",
            FaultKind::Runtime => "RuntimeError",
            FaultKind::NotImplemented => "NotImplementedError",
            FaultKind::UnicodeDecode => "UnicodeDecodeError",
            FaultKind::UnicodeEncode => "UnicodeEncodeError",
            FaultKind::StopIteration => "StopIteration",
            FaultKind::Permission => "PermissionError",
            FaultKind::FloatingPoint => "FloatingPointError",
            FaultKind::Lookup => "LookupError",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failure caught while running a probe.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ParseIntError> for Fault {
    fn from(e: ParseIntError) -> Self {
        Fault::new(FaultKind::Value, e.to_string())
    }
}

impl From<io::Error> for Fault {
    fn from(e: io::Error) -> Self {
        let kind = match e.kind() {
            io::ErrorKind::NotFound => FaultKind::FileNotFound,
            io::ErrorKind::PermissionDenied => FaultKind::Permission,
            _ => FaultKind::Os,
        };
        Fault::new(kind, e.to_string())
    }
}

impl From<FromUtf8Error> for Fault {
    fn from(e: FromUtf8Error) -> Self {
        Fault::new(FaultKind::UnicodeDecode, e.to_string())
    }
}

impl From<TryReserveError> for Fault {
    fn from(e: TryReserveError) -> Self {
        Fault::new(FaultKind::Memory, e.to_string())
    }
}

impl From<VarError> for Fault {
    fn from(e: VarError) -> Self {
        Fault::new(FaultKind::Name, e.to_string())
    }
}

impl From<serde_json::Error> for Fault {
    fn from(e: serde_json::Error) -> Self {
        use serde_json::error::Category;
        let kind = match e.classify() {
            Category::Syntax | Category::Eof => FaultKind::Syntax,
            Category::Data => FaultKind::Type,
            Category::Io => FaultKind::Os,
        };
        Fault::new(kind, e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Caught { fault: Fault },
    NotRaised,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub expected: FaultKind,
    pub outcome: Outcome,
}

impl ReportEntry {
    /// True when the probe raised exactly the category it was built for.
    pub fn matched(&self) -> bool {
        matches!(&self.outcome, Outcome::Caught { fault } if fault.kind == self.expected)
    }

    pub fn result_text(&self) -> String {
        match &self.outcome {
            Outcome::Caught { fault } => fault.to_string(),
            Outcome::NotRaised => "NO EXCEPTION (unexpected)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiestaReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub entries: Vec<ReportEntry>,
}

impl FiestaReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn caught(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Caught { .. }))
            .count()
    }

    pub fn not_raised(&self) -> usize {
        self.total() - self.caught()
    }

    pub fn mismatched(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Caught { .. }) && !e.matched())
            .count()
    }

    pub fn all_matched(&self) -> bool {
        self.entries.iter().all(ReportEntry::matched)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub base_score: i64,
    pub commits: u32,
    pub build_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_score: i64,
    pub commits: u32,
    pub speed_bonus: i64,
    pub efficiency_penalty: i64,
    pub final_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCase {
    pub name: String,
    #[serde(flatten)]
    pub input: ScoreInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub results: Vec<ScoredCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCase {
    pub name: String,
    pub breakdown: ScoreBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_classify_by_kind() {
        let not_found = Fault::from(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(not_found.kind, FaultKind::FileNotFound);

        let denied = Fault::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.kind, FaultKind::Permission);

        let other = Fault::from(io::Error::other("boom"));
        assert_eq!(other.kind, FaultKind::Os);
    }

    #[test]
    fn test_json_errors_classify_syntax_and_type() {
        let syntax = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Fault::from(syntax).kind, FaultKind::Syntax);

        let data = serde_json::from_str::<i64>("\"five\"").unwrap_err();
        assert_eq!(Fault::from(data).kind, FaultKind::Type);
    }

    #[test]
    fn test_fault_display_uses_kind_name() {
        let fault = Fault::new(FaultKind::ZeroDivision, "division by zero");
        assert_eq!(fault.to_string(), "ZeroDivisionError: division by zero");
    }

    #[test]
    fn test_report_counts() {
        let report = FiestaReport {
            generated_at: chrono::Utc::now(),
            entries: vec![
                ReportEntry {
                    name: "KeyError".to_string(),
                    expected: FaultKind::Key,
                    outcome: Outcome::Caught {
                        fault: Fault::new(FaultKind::Key, "'missing'"),
                    },
                },
                ReportEntry {
                    name: "IndexError".to_string(),
                    expected: FaultKind::Index,
                    outcome: Outcome::Caught {
                        fault: Fault::new(FaultKind::Lookup, "not found"),
                    },
                },
                ReportEntry {
                    name: "OverflowError".to_string(),
                    expected: FaultKind::Overflow,
                    outcome: Outcome::NotRaised,
                },
            ],
        };

        assert_eq!(report.total(), 3);
        assert_eq!(report.caught(), 2);
        assert_eq!(report.not_raised(), 1);
        assert_eq!(report.mismatched(), 1);
        assert!(!report.all_matched());
        assert_eq!(report.entries[2].result_text(), "NO EXCEPTION (unexpected)");
    }
}
