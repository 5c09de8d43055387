//! Dialect independent building blocks: integer types, literal
//! attributes, the `builtin.module` container and common interfaces.

pub mod attr_interfaces;
pub mod attributes;
pub mod op_interfaces;
pub mod ops;
pub mod types;

use crate::{
    context::Context,
    dialect::{Dialect, DialectName},
};

pub const DIALECT_NAME: &str = "builtin";

/// Attribute holding the name of the symbol an op defines.
pub const ATTR_KEY_SYM_NAME: &str = "builtin.sym_name";

/// Register the builtin dialect, if it isn't already.
pub fn register(ctx: &mut Context) {
    let name = DialectName::new(DIALECT_NAME);
    if ctx.has_dialect(&name) {
        return;
    }
    let mut dialect = Dialect::new(name);
    ops::register(ctx, &mut dialect);
    types::register(&mut dialect);
    attributes::register(&mut dialect);
    dialect.register(ctx);
}
