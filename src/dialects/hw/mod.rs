//! The hardware dialect: modules with parameters, integer constants and
//! parameter valued constants. These are the operations that
//! [arc](crate::dialects::arc) constants materialize into.

pub mod attributes;
pub mod ops;
pub mod params;
pub mod types;

use crate::{
    context::Context,
    dialect::{Dialect, DialectName},
    dialects::builtin,
};

pub const DIALECT_NAME: &str = "hw";

/// Register the hw dialect and, first, the builtin dialect.
pub fn register(ctx: &mut Context) {
    builtin::register(ctx);
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
