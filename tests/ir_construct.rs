use apint::ApInt;
use arc_dialect::{
    common_traits::Verify,
    context::Context,
    dialects::{
        builtin::{attributes::IntegerAttr, op_interfaces::OneResultInterface},
        hw::ops::{ConstantOp, HWModuleOp},
    },
    linked_list::ContainsLinkedList,
    op::Op,
    operation::Operation,
    printable::Printable,
    result::Result,
};
use expect_test::expect;

use crate::common::{i32_type, init_env_logger, module_with_width, setup_context_dialects};

mod common;

// Create a module "top", holding constants 0 and 1, in that order.
fn two_constants_in_mod(ctx: &mut Context) -> Result<(HWModuleOp, ConstantOp, ConstantOp)> {
    let module = module_with_width(ctx);
    let i32_ty = i32_type(ctx);
    let body = module.get_body(ctx);

    let one = ConstantOp::new(ctx, i32_ty, IntegerAttr::new(i32_ty, ApInt::from_i32(1)));
    one.get_operation().insert_at_back(body, ctx);
    let zero = ConstantOp::new(ctx, i32_ty, IntegerAttr::new(i32_ty, ApInt::from_i32(0)));
    zero.get_operation().insert_before(ctx, one.get_operation());

    module.get_operation().verify(ctx)?;
    Ok((module, zero, one))
}

#[test]
fn construct_and_print() -> Result<()> {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let (module, zero, one) = two_constants_in_mod(ctx)?;

    let ops: Vec<_> = module.get_body(ctx).deref(ctx).iter(ctx).collect();
    assert!(ops == vec![zero.get_operation(), one.get_operation()]);
    assert!(zero.get_result(ctx) != one.get_result(ctx));
    assert!(one.get_result(ctx).get_defining_op() == Some(one.get_operation()));

    expect![[r#"
        hw.module @top<WIDTH: i32> {
          ^block_1():
            %op_3_res0 = hw.constant() [hw.constant.value = 0x0: i32] : i32
            %op_2_res0 = hw.constant() [hw.constant.value = 0x1: i32] : i32
        }"#]]
    .assert_eq(&module.disp(ctx).to_string());
    Ok(())
}

// Erasing the top module frees everything inside it.
#[test]
fn construct_and_erase() -> Result<()> {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = two_constants_in_mod(ctx)?.0.get_operation();
    Operation::erase(module, ctx);
    assert!(ctx.operations.is_empty() && ctx.basic_blocks.is_empty() && ctx.regions.is_empty());
    Ok(())
}

#[test]
fn unlink_and_reinsert() -> Result<()> {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let (module, zero, one) = two_constants_in_mod(ctx)?;

    zero.get_operation().unlink(ctx);
    assert!(!zero.get_operation().is_linked(ctx));
    zero.get_operation().insert_after(ctx, one.get_operation());

    let ops: Vec<_> = module.get_body(ctx).deref(ctx).iter(ctx).rev().collect();
    assert!(ops == vec![zero.get_operation(), one.get_operation()]);
    module.get_operation().verify(ctx)
}

// A constant with no result fails interface verification.
#[test]
fn check_intrf_verify_errs() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let (module, _, one) = two_constants_in_mod(ctx).unwrap();

    let no_result = Operation::new(ctx, ConstantOp::get_opid_static(), vec![], vec![], 0);
    no_result.insert_after(ctx, one.get_operation());

    let err = module.get_operation().verify(ctx).unwrap_err();
    expect!["Op hw.constant must have single result"].assert_eq(&err.err.to_string());
}
