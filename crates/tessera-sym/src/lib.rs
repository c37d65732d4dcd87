//! Tessera symbolic expressions
//!
//! A catalog of expression node types declared through the object bridge,
//! together with:
//! - Typed constructors and interned ops ([`expr`])
//! - Constant-folding arithmetic ([`fold`])
//! - Schema-driven visitors and rewriters ([`visitor`])
//!
//! ```
//! use tessera_sym::{binary, fold, int_imm, ExprKind};
//!
//! let one = int_imm(1).unwrap();
//! let two = int_imm(2).unwrap();
//! assert_eq!(fold::add(&one, &two).unwrap(), int_imm(3).unwrap());
//! assert_eq!(
//!     binary(ExprKind::Add, &one, &two).unwrap().to_string(),
//!     "Add(a=IntImm(value=1), b=IntImm(value=2))"
//! );
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod catalog;
pub mod error;
pub mod expr;
pub mod fold;
pub mod visitor;

pub use catalog::{install, registry, ExprKind};
pub use error::{SymError, SymResult};
pub use expr::{
    as_float_imm, as_int_imm, binary, broadcast, call, cast, float_imm, int_imm, is_neg_inf,
    is_pos_inf, let_, neg_inf, not, op, pos_inf, ramp, range, select, shuffle, size_var,
    string_imm, var,
};
pub use visitor::{collect_vars, mutate_children, substitute, walk_children, ExprMutator, ExprVisitor};
