//! The probe catalog: one deliberately failing operation per error category.
//!
//! Every probe returns `Err(Fault)` when it behaves; `Ok(())` means the
//! operation unexpectedly succeeded and the runner reports it as such.

use crate::domain::model::{Fault, FaultKind};
use std::cell::Cell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::panic::{self, UnwindSafe};
use std::sync::Once;

pub const DEFAULT_RECURSION_LIMIT: usize = 1000;
pub const DEFAULT_MISSING_FILE: &str = "definitely_nonexistent_file_xyz.txt";

const MISSING_PROGRAM: &str = "this_module_does_not_exist_12345";
const UNDEFINED_VARIABLE: &str = "ERROR_FIESTA_UNDEFINED_VARIABLE";

#[derive(Debug, Clone)]
pub struct ProbeContext {
    pub recursion_limit: usize,
    pub missing_file: String,
}

impl Default for ProbeContext {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            missing_file: DEFAULT_MISSING_FILE.to_string(),
        }
    }
}

pub type Trigger = fn(&ProbeContext) -> Result<(), Fault>;

#[derive(Clone, Copy)]
pub struct Probe {
    pub name: &'static str,
    pub expected: FaultKind,
    pub trigger: Trigger,
}

impl Probe {
    pub fn run(&self, ctx: &ProbeContext) -> Result<(), Fault> {
        (self.trigger)(ctx)
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("expected", &self.expected)
            .finish()
    }
}

/// All probes, in the order they run.
pub fn catalog() -> Vec<Probe> {
    vec![
        probe("SyntaxError", FaultKind::Syntax, syntax_error),
        probe("IndentationError", FaultKind::Indentation, indentation_error),
        probe("NameError", FaultKind::Name, name_error),
        probe("TypeError", FaultKind::Type, type_error),
        probe("ValueError", FaultKind::Value, value_error),
        probe("IndexError", FaultKind::Index, index_error),
        probe("KeyError", FaultKind::Key, key_error),
        probe("ZeroDivisionError", FaultKind::ZeroDivision, zero_division_error),
        probe("AttributeError", FaultKind::Attribute, attribute_error),
        probe("ModuleNotFoundError", FaultKind::ModuleNotFound, module_not_found_error),
        probe("FileNotFoundError", FaultKind::FileNotFound, file_not_found_error),
        probe("OSError", FaultKind::Os, os_error),
        probe("RecursionError", FaultKind::Recursion, recursion_error),
        probe("OverflowError", FaultKind::Overflow, overflow_error),
        probe("MemoryError", FaultKind::Memory, memory_error),
        probe("AssertionError", FaultKind::Assertion, assertion_error),
        probe("RuntimeError", FaultKind::Runtime, runtime_error),
        probe("NotImplementedError", FaultKind::NotImplemented, not_implemented_error),
        probe("UnicodeDecodeError", FaultKind::UnicodeDecode, unicode_decode_error),
        probe("UnicodeEncodeError", FaultKind::UnicodeEncode, unicode_encode_error),
        probe("StopIteration", FaultKind::StopIteration, stop_iteration),
        probe("PermissionError", FaultKind::Permission, permission_error),
        probe("FloatingPointError", FaultKind::FloatingPoint, floating_point_error),
        probe("LookupError", FaultKind::Lookup, lookup_error),
        probe("Extra ValueError (slice)", FaultKind::Value, zero_step_slice_error),
    ]
}

fn probe(name: &'static str, expected: FaultKind, trigger: Trigger) -> Probe {
    Probe {
        name,
        expected,
        trigger,
    }
}

pub fn find(name: &str) -> Option<Probe> {
    catalog().into_iter().find(|p| p.name == name)
}

fn syntax_error(_: &ProbeContext) -> Result<(), Fault> {
    let _: serde_json::Value = serde_json::from_str(r#"{"broken": ("#)?;
    Ok(())
}

fn indentation_error(_: &ProbeContext) -> Result<(), Fault> {
    check_block_indentation("def f():\nprint('no indent')")
}

/// Every line ending in `:` opens a block whose next non-blank line must be
/// indented deeper than the header.
fn check_block_indentation(source: &str) -> Result<(), Fault> {
    let indent = |line: &str| line.len() - line.trim_start().len();
    let lines: Vec<(usize, &str)> = source
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    for pair in lines.windows(2) {
        let (header_no, header) = pair[0];
        let (body_no, body) = pair[1];
        if header.trim_end().ends_with(':') && indent(body) <= indent(header) {
            return Err(Fault::new(
                FaultKind::Indentation,
                format!(
                    "expected an indented block after line {} (line {})",
                    header_no + 1,
                    body_no + 1
                ),
            ));
        }
    }

    if let Some((no, last)) = lines.last() {
        if last.trim_end().ends_with(':') {
            return Err(Fault::new(
                FaultKind::Indentation,
                format!("expected an indented block after line {}", no + 1),
            ));
        }
    }

    Ok(())
}

fn name_error(_: &ProbeContext) -> Result<(), Fault> {
    std::env::var(UNDEFINED_VARIABLE).map_err(|e| {
        Fault::new(
            FaultKind::Name,
            format!("name '{}' is not defined ({})", UNDEFINED_VARIABLE, e),
        )
    })?;
    Ok(())
}

fn type_error(_: &ProbeContext) -> Result<(), Fault> {
    let operand = serde_json::json!("five");
    let rhs: i64 = serde_json::from_value(operand)?;
    let _ = 5 + rhs;
    Ok(())
}

fn value_error(_: &ProbeContext) -> Result<(), Fault> {
    let _: i64 = "not-an-int".parse()?;
    Ok(())
}

fn index_error(_: &ProbeContext) -> Result<(), Fault> {
    let items = [1, 2, 3];
    let index = 10;
    items.get(index).ok_or_else(|| {
        Fault::new(
            FaultKind::Index,
            format!("index {} out of range for length {}", index, items.len()),
        )
    })?;
    Ok(())
}

fn key_error(_: &ProbeContext) -> Result<(), Fault> {
    let map: HashMap<&str, i32> = HashMap::from([("a", 1)]);
    let key = "missing";
    map.get(key)
        .ok_or_else(|| Fault::new(FaultKind::Key, format!("'{}'", key)))?;
    Ok(())
}

fn zero_division_error(_: &ProbeContext) -> Result<(), Fault> {
    let divisor = 0i64;
    1i64.checked_div(divisor)
        .ok_or_else(|| Fault::new(FaultKind::ZeroDivision, "division by zero"))?;
    Ok(())
}

#[derive(Debug, serde::Deserialize)]
#[allow(dead_code)]
struct Nope {
    nope: i64,
}

fn attribute_error(_: &ProbeContext) -> Result<(), Fault> {
    let record = serde_json::json!({ "value": 42 });
    serde_json::from_value::<Nope>(record).map_err(|e| {
        Fault::new(
            FaultKind::Attribute,
            format!("object has no attribute 'nope' ({})", e),
        )
    })?;
    Ok(())
}

fn module_not_found_error(_: &ProbeContext) -> Result<(), Fault> {
    locate_program(MISSING_PROGRAM)?;
    Ok(())
}

fn locate_program(name: &str) -> Result<std::path::PathBuf, Fault> {
    let search_path = std::env::var_os("PATH").unwrap_or_default();
    std::env::split_paths(&search_path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            Fault::new(
                FaultKind::ModuleNotFound,
                format!("No module named '{}'", name),
            )
        })
}

fn file_not_found_error(ctx: &ProbeContext) -> Result<(), Fault> {
    std::fs::File::open(&ctx.missing_file)?;
    Ok(())
}

fn os_error(_: &ProbeContext) -> Result<(), Fault> {
    Err(std::io::Error::other("simulated OSError").into())
}

fn recursion_error(ctx: &ProbeContext) -> Result<(), Fault> {
    fn recurse(depth: usize, limit: usize) -> Result<usize, Fault> {
        if depth >= limit {
            return Err(Fault::new(
                FaultKind::Recursion,
                format!("maximum recursion depth exceeded ({})", limit),
            ));
        }
        recurse(depth + 1, limit)
    }

    recurse(0, ctx.recursion_limit)?;
    Ok(())
}

fn overflow_error(_: &ProbeContext) -> Result<(), Fault> {
    let value = 10_000f64.exp();
    if value.is_infinite() {
        return Err(Fault::new(FaultKind::Overflow, "math range error"));
    }
    Ok(())
}

fn memory_error(_: &ProbeContext) -> Result<(), Fault> {
    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve(usize::MAX)?;
    Ok(())
}

fn assertion_error(_: &ProbeContext) -> Result<(), Fault> {
    catch_quietly(|| {
        let ready = false;
        assert!(ready, "simulated assertion");
    })
    .map_err(|msg| Fault::new(FaultKind::Assertion, msg))
}

fn runtime_error(_: &ProbeContext) -> Result<(), Fault> {
    let outcome: anyhow::Result<()> = Err(anyhow::anyhow!("simulated runtime error"));
    outcome.map_err(|e| Fault::new(FaultKind::Runtime, e.to_string()))
}

fn not_implemented_error(_: &ProbeContext) -> Result<(), Fault> {
    catch_quietly(|| unimplemented!("simulated not implemented"))
        .map_err(|msg| Fault::new(FaultKind::NotImplemented, msg))
}

fn unicode_decode_error(_: &ProbeContext) -> Result<(), Fault> {
    String::from_utf8(vec![0xff])?;
    Ok(())
}

fn unicode_encode_error(_: &ProbeContext) -> Result<(), Fault> {
    encode_latin1("😊")?;
    Ok(())
}

fn encode_latin1(text: &str) -> Result<Vec<u8>, Fault> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| {
            u8::try_from(ch).map_err(|e| {
                Fault::new(
                    FaultKind::UnicodeEncode,
                    format!(
                        "'latin-1' codec can't encode character '{}' in position {}: {}",
                        ch.escape_unicode(),
                        position,
                        e
                    ),
                )
            })
        })
        .collect()
}

fn stop_iteration(_: &ProbeContext) -> Result<(), Fault> {
    let mut it = std::iter::empty::<i32>();
    it.next()
        .ok_or_else(|| Fault::new(FaultKind::StopIteration, "iterator is exhausted"))?;
    Ok(())
}

fn permission_error(_: &ProbeContext) -> Result<(), Fault> {
    Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "simulated permission denied",
    )
    .into())
}

fn floating_point_error(_: &ProbeContext) -> Result<(), Fault> {
    let numerator = 0.0f64;
    let denominator = 0.0f64;
    let quotient = numerator / denominator;
    if quotient.is_nan() {
        return Err(Fault::new(
            FaultKind::FloatingPoint,
            "invalid floating point operation (0.0 / 0.0 is NaN)",
        ));
    }
    Ok(())
}

fn lookup_error(_: &ProbeContext) -> Result<(), Fault> {
    let sorted = [1, 3, 5, 7];
    let needle = 4;
    sorted.binary_search(&needle).map_err(|insert_at| {
        Fault::new(
            FaultKind::Lookup,
            format!("{} not found (would insert at {})", needle, insert_at),
        )
    })?;
    Ok(())
}

fn zero_step_slice_error(_: &ProbeContext) -> Result<(), Fault> {
    let items = [1, 2, 3, 4];
    let step = NonZeroUsize::new(0)
        .ok_or_else(|| Fault::new(FaultKind::Value, "slice step cannot be zero"))?;
    let _: Vec<_> = items.iter().step_by(step.get()).collect();
    Ok(())
}

thread_local! {
    static QUIET: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Runs `f`, turning a panic into its message. The panic hook stays silent
/// for the current thread while `f` runs; other threads report as usual.
fn catch_quietly<F: FnOnce() + UnwindSafe>(f: F) -> Result<(), String> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET.with(Cell::get) {
                previous(info);
            }
        }));
    });

    QUIET.with(|q| q.set(true));
    let result = panic::catch_unwind(f);
    QUIET.with(|q| q.set(false));

    result.map_err(|payload| {
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with non-string payload".to_string()
        }
    })
}
