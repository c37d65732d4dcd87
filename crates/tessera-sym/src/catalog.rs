//! The expression node catalog
//!
//! ```text
//! Expr
//! ├── Op(name)          ├── Var(name) ── SizeVar
//! ├── IntImm(value)     ├── FloatImm(value)      ├── StringImm(value)
//! ├── CastDType(value, dtype)
//! ├── Add Sub Mul Div Mod FloorDiv FloorMod Min Max
//! │   EQ NE LT LE GT GE And Or            (a, b)
//! ├── Not(a)            ├── Select(cond, true_value, false_value)
//! ├── Ramp(base, stride, lanes)           ├── Broadcast(value, lanes)
//! ├── Shuffle(vectors: [Expr], indices: [Expr])
//! ├── Let(var: Var, value, body)          └── Call(op: any, args: [Expr])
//! Range(min, extent)
//! ```
//!
//! Types are registered under their bare names (`Var`, `Add`), with no
//! dotted namespace prefix.

use once_cell::sync::Lazy;
use std::fmt;
use tessera_core::{BridgeResult, FieldType, Node, Registry, RegistryBuilder};

/// Concrete expression node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ExprKind {
    Op,
    Var,
    SizeVar,
    IntImm,
    FloatImm,
    StringImm,
    CastDType,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    FloorDiv,
    FloorMod,
    Min,
    Max,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Select,
    Ramp,
    Broadcast,
    Shuffle,
    Let,
    Call,
}

impl ExprKind {
    /// Binary nodes, all shaped `(a: Expr, b: Expr)`
    pub const BINARY: [ExprKind; 17] = [
        ExprKind::Add,
        ExprKind::Sub,
        ExprKind::Mul,
        ExprKind::Div,
        ExprKind::Mod,
        ExprKind::FloorDiv,
        ExprKind::FloorMod,
        ExprKind::Min,
        ExprKind::Max,
        ExprKind::Eq,
        ExprKind::Ne,
        ExprKind::Lt,
        ExprKind::Le,
        ExprKind::Gt,
        ExprKind::Ge,
        ExprKind::And,
        ExprKind::Or,
    ];

    /// Registered type name
    pub const fn type_name(self) -> &'static str {
        match self {
            ExprKind::Op => "Op",
            ExprKind::Var => "Var",
            ExprKind::SizeVar => "SizeVar",
            ExprKind::IntImm => "IntImm",
            ExprKind::FloatImm => "FloatImm",
            ExprKind::StringImm => "StringImm",
            ExprKind::CastDType => "CastDType",
            ExprKind::Add => "Add",
            ExprKind::Sub => "Sub",
            ExprKind::Mul => "Mul",
            ExprKind::Div => "Div",
            ExprKind::Mod => "Mod",
            ExprKind::FloorDiv => "FloorDiv",
            ExprKind::FloorMod => "FloorMod",
            ExprKind::Min => "Min",
            ExprKind::Max => "Max",
            ExprKind::Eq => "EQ",
            ExprKind::Ne => "NE",
            ExprKind::Lt => "LT",
            ExprKind::Le => "LE",
            ExprKind::Gt => "GT",
            ExprKind::Ge => "GE",
            ExprKind::And => "And",
            ExprKind::Or => "Or",
            ExprKind::Not => "Not",
            ExprKind::Select => "Select",
            ExprKind::Ramp => "Ramp",
            ExprKind::Broadcast => "Broadcast",
            ExprKind::Shuffle => "Shuffle",
            ExprKind::Let => "Let",
            ExprKind::Call => "Call",
        }
    }

    /// Kind for a registered type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "Op" => ExprKind::Op,
            "Var" => ExprKind::Var,
            "SizeVar" => ExprKind::SizeVar,
            "IntImm" => ExprKind::IntImm,
            "FloatImm" => ExprKind::FloatImm,
            "StringImm" => ExprKind::StringImm,
            "CastDType" => ExprKind::CastDType,
            "Not" => ExprKind::Not,
            "Select" => ExprKind::Select,
            "Ramp" => ExprKind::Ramp,
            "Broadcast" => ExprKind::Broadcast,
            "Shuffle" => ExprKind::Shuffle,
            "Let" => ExprKind::Let,
            "Call" => ExprKind::Call,
            _ => return Self::BINARY.into_iter().find(|kind| kind.type_name() == name),
        };
        Some(kind)
    }

    /// Kind of a node's concrete type
    pub fn of(node: &Node) -> Option<Self> {
        Self::from_type_name(node.type_name())
    }

    /// Check for a `(a, b)` node
    pub fn is_binary(self) -> bool {
        Self::BINARY.contains(&self)
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Declare the catalog on `builder`, root types first
pub fn install(builder: &mut RegistryBuilder) -> BridgeResult<()> {
    let expr = || FieldType::node("Expr");
    let exprs = || FieldType::list("Expr");
    let before = builder.len();

    builder.declare("Expr").finish()?;
    builder
        .declare("Range")
        .field("min", expr())
        .field("extent", expr())
        .finish()?;

    builder.declare("Op").extends("Expr").field("name", FieldType::Str).finish()?;
    builder.declare("Var").extends("Expr").field("name", FieldType::Str).finish()?;
    builder.declare("SizeVar").extends("Var").finish()?;
    builder.declare("IntImm").extends("Expr").field("value", FieldType::Int).finish()?;
    builder.declare("FloatImm").extends("Expr").field("value", FieldType::Float).finish()?;
    builder.declare("StringImm").extends("Expr").field("value", FieldType::Str).finish()?;
    builder
        .declare("CastDType")
        .extends("Expr")
        .field("value", expr())
        .field("dtype", FieldType::DType)
        .finish()?;

    for kind in ExprKind::BINARY {
        builder
            .declare(kind.type_name())
            .extends("Expr")
            .field("a", expr())
            .field("b", expr())
            .finish()?;
    }

    builder.declare("Not").extends("Expr").field("a", expr()).finish()?;
    builder
        .declare("Select")
        .extends("Expr")
        .field("cond", expr())
        .field("true_value", expr())
        .field("false_value", expr())
        .finish()?;
    builder
        .declare("Ramp")
        .extends("Expr")
        .field("base", expr())
        .field("stride", expr())
        .field("lanes", expr())
        .finish()?;
    builder
        .declare("Broadcast")
        .extends("Expr")
        .field("value", expr())
        .field("lanes", expr())
        .finish()?;
    builder
        .declare("Shuffle")
        .extends("Expr")
        .field("vectors", exprs())
        .field("indices", exprs())
        .finish()?;
    builder
        .declare("Let")
        .extends("Expr")
        .field("var", FieldType::node("Var"))
        .field("value", expr())
        .field("body", expr())
        .finish()?;
    builder
        .declare("Call")
        .extends("Expr")
        .field("op", FieldType::Any)
        .field("args", exprs())
        .finish()?;

    tracing::debug!(types = builder.len() - before, "installed expression catalog");
    Ok(())
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut builder = RegistryBuilder::new();
    install(&mut builder).unwrap_or_else(|err| panic!("expression catalog is ill-formed: {err}"));
    builder.build()
});

/// Process-wide registry holding exactly the catalog types
pub fn registry() -> &'static Registry {
    &REGISTRY
}
