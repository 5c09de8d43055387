//! The arc dialect: state transfer arcs, models and their simulation.
//!
//! Registering it also registers the dialects its constants lower to
//! ([hw](crate::dialects::hw) and [builtin](crate::dialects::builtin)),
//! and installs [ArcConstantMaterializer](materialize::ArcConstantMaterializer).

pub mod attributes;
pub mod catalog;
pub mod materialize;
pub mod types;

use log::debug;

use crate::{
    context::Context,
    dialect::{Dialect, DialectName},
    dialects::hw,
};

/// Name of the arc dialect.
pub const DIALECT_NAME: &str = "arc";

/// Register the arc dialect, if it isn't already.
pub fn register(ctx: &mut Context) {
    let name = DialectName::new(DIALECT_NAME);
    if ctx.has_dialect(&name) {
        return;
    }
    hw::register(ctx);

    let mut dialect = Dialect::new(name);
    catalog::register_ops(ctx, &mut dialect, catalog::CATALOG);
    types::register(&mut dialect);
    attributes::register(&mut dialect);
    dialect.set_constant_materializer(materialize::ArcConstantMaterializer);
    debug!(
        "Registered dialect {} with {} ops",
        DIALECT_NAME,
        dialect.ops.len()
    );
    dialect.register(ctx);
}
