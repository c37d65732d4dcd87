//! Canonical single-line representation
//!
//! `TypeName(field=value, ...)` in schema field order. The output depends
//! only on field values, never on addresses.

use crate::node::Node;
use crate::registry::Registry;
use crate::value::Value;
use rustc_hash::FxHashSet;
use std::fmt::{self, Write};
use tessera_runtime::{ObjRef, RawValue};

/// Pending output, popped in order
enum Step<'r> {
    Value(RawValue),
    Text(&'r str),
    /// Close the frame of the object at this address
    Leave(usize),
}

/// Prints with an explicit stack of open frames, so nesting depth is bounded
/// by memory rather than by the thread's stack
struct Printer<'r> {
    registry: &'r Registry,
    /// Objects currently being printed
    active: FxHashSet<usize>,
    steps: Vec<Step<'r>>,
}

impl<'r> Printer<'r> {
    fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            active: FxHashSet::default(),
            steps: Vec::new(),
        }
    }

    fn print(mut self, out: &mut dyn Write, root: RawValue) -> fmt::Result {
        self.steps.push(Step::Value(root));
        while let Some(step) = self.steps.pop() {
            match step {
                Step::Text(text) => out.write_str(text)?,
                Step::Leave(addr) => {
                    self.active.remove(&addr);
                    out.write_char(')')?;
                }
                Step::Value(value) => self.value(out, value)?,
            }
        }
        Ok(())
    }

    fn open(&mut self, out: &mut dyn Write, obj: &ObjRef) -> fmt::Result {
        if !self.active.insert(obj.addr()) {
            tracing::warn!(tag = %obj.tag(), "cycle detected during representation");
            return out.write_str("...");
        }
        let registry = self.registry;
        let schema = registry.schema_of(obj.tag());
        out.write_str(schema.type_name())?;
        out.write_char('(')?;

        self.steps.push(Step::Leave(obj.addr()));
        let values = obj.with_fields(|values| values.to_vec());
        let fields = schema.full_fields().iter().zip(values).enumerate().rev();
        for (i, (field, value)) in fields {
            self.steps.push(Step::Value(value));
            self.steps.push(Step::Text("="));
            self.steps.push(Step::Text(field.name()));
            if i > 0 {
                self.steps.push(Step::Text(", "));
            }
        }
        Ok(())
    }

    fn value(&mut self, out: &mut dyn Write, value: RawValue) -> fmt::Result {
        match value {
            RawValue::None => out.write_str("None"),
            RawValue::Bool(b) => write_bool(out, b),
            RawValue::Int(i) => write!(out, "{i}"),
            RawValue::Float(x) => write_float(out, x),
            RawValue::Str(s) => write_quoted(out, &s),
            RawValue::DType(dt) => write!(out, "dtype('{dt}')"),
            RawValue::Object(obj) => self.open(out, &obj),
            RawValue::List(items) => {
                out.write_char('[')?;
                self.steps.push(Step::Text("]"));
                for (i, item) in items.into_iter().enumerate().rev() {
                    self.steps.push(Step::Value(item));
                    if i > 0 {
                        self.steps.push(Step::Text(", "));
                    }
                }
                Ok(())
            }
        }
    }
}

fn write_bool(out: &mut dyn Write, b: bool) -> fmt::Result {
    out.write_str(if b { "True" } else { "False" })
}

/// Python float literal: positional for exponents in `-4..16`, otherwise
/// scientific with a signed, two-digit exponent (`1e+20`, `1.5e-07`)
fn write_float(out: &mut dyn Write, x: f64) -> fmt::Result {
    if x.is_nan() {
        return out.write_str("nan");
    }
    if x.is_infinite() {
        return out.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }

    let scientific = format!("{x:e}");
    let Some((mantissa, exp)) = scientific
        .split_once('e')
        .and_then(|(mantissa, exp)| Some((mantissa, exp.parse::<i32>().ok()?)))
    else {
        return write!(out, "{x:?}");
    };

    if (-4..16).contains(&exp) {
        let positional = x.to_string();
        out.write_str(&positional)?;
        if !positional.contains('.') {
            out.write_str(".0")?;
        }
        Ok(())
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(out, "{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

/// Quote with single quotes unless only double quotes avoid escaping
fn write_quoted(out: &mut dyn Write, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    out.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c == quote => {
                out.write_char('\\')?;
                out.write_char(c)?;
            }
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    write!(out, "\\x{code:02x}")?;
                } else {
                    write!(out, "\\u{code:04x}")?;
                }
            }
            c => out.write_char(c)?,
        }
    }
    out.write_char(quote)
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(self.registry()).print(f, RawValue::Object(self.obj().clone()))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write_bool(f, *b),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write_float(f, *x),
            Value::Str(s) => write_quoted(f, s),
            Value::DType(dt) => write!(f, "dtype('{dt}')"),
            Value::Node(node) => fmt::Display::fmt(node, f),
            Value::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_char(']')
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
