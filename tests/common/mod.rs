//! Common utils for tests

use apint::ApInt;
use arc_dialect::{
    context::{Context, Ptr},
    dialects::{
        arc,
        builtin::{
            attributes::IntegerAttr,
            types::{IntegerType, Signedness},
        },
        hw::{
            attributes::{ParamDeclAttr, ParamDeclRefAttr, ParamExprAttr, ParamExprOpcode},
            ops::HWModuleOp,
        },
    },
    r#type::TypeObj,
};

/// Initialize the logger for tests
pub fn init_env_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A [Context] with the arc dialect, and everything it depends on, registered.
pub fn setup_context_dialects() -> Context {
    let mut ctx = Context::new();
    arc::register(&mut ctx);
    ctx
}

pub fn i32_type(ctx: &mut Context) -> Ptr<TypeObj> {
    IntegerType::get(ctx, 32, Signedness::Signless)
}

/// A `hw.module @top` declaring a single `WIDTH: i32` parameter.
pub fn module_with_width(ctx: &mut Context) -> HWModuleOp {
    let i32_ty = i32_type(ctx);
    let width = ParamDeclAttr::new("WIDTH".try_into().unwrap(), i32_ty);
    HWModuleOp::new(ctx, "top", vec![width])
}

/// `name - 1`, where `name` is an `i32` parameter.
pub fn param_minus_one(ctx: &mut Context, name: &str) -> ParamExprAttr {
    let i32_ty = i32_type(ctx);
    let param = ParamDeclRefAttr::new(name.try_into().unwrap(), i32_ty);
    let one = IntegerAttr::new(i32_ty, ApInt::from_i32(1));
    ParamExprAttr::new(
        ParamExprOpcode::Sub,
        vec![Box::new(param), Box::new(one)],
        i32_ty,
    )
}
