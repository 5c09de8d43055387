use apint::ApInt;
use arc_dialect::{
    attribute::{AttrObj, Attribute},
    common_traits::Verify,
    context::{Context, Ptr},
    dialect::{Dialect, DialectName},
    dialects::{
        builtin::{
            attributes::{FloatAttr, IntegerAttr, StringAttr},
            ops::ModuleOp,
            types::{IntegerType, Signedness},
        },
        hw::{
            attributes::{ParamDeclRefAttr, ParamExprAttr, ParamExprOpcode},
            ops::{ConstantOp, HWModuleOp, ParamValueOp},
            types::IntType,
        },
    },
    irbuild::inserter::{IRInserter, OpInsertionPoint},
    linked_list::ContainsLinkedList,
    location::{Located, Location},
    op::{self, Op},
    operation::Operation,
    printable::Printable,
    r#type::TypeObj,
};
use expect_test::expect;

use crate::common::{
    i32_type, init_env_logger, module_with_width, param_minus_one, setup_context_dialects,
};

mod common;

fn materialize(
    ctx: &mut Context,
    inserter: &mut IRInserter,
    value: &dyn Attribute,
    ty: Ptr<TypeObj>,
) -> Option<Ptr<Operation>> {
    Dialect::materialize_constant(
        ctx,
        &DialectName::new("arc"),
        inserter,
        value,
        ty,
        Location::file_line_col("top.sv", 3, 7),
    )
}

/// `hw.int<WIDTH>`, a type whose width depends on a parameter.
fn width_dependent_type(ctx: &mut Context) -> Ptr<TypeObj> {
    let i32_ty = i32_type(ctx);
    let width = ParamDeclRefAttr::new("WIDTH".try_into().unwrap(), i32_ty);
    IntType::get(ctx, Box::new(width))
}

#[test]
fn integer_literal_becomes_constant() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let i32_ty = i32_type(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    let seven = IntegerAttr::new(i32_ty, ApInt::from_i32(7));
    let op = materialize(ctx, &mut inserter, &seven, i32_ty).unwrap();

    let constant = op::from_operation(ctx, op)
        .downcast::<ConstantOp>()
        .ok()
        .unwrap();
    assert!(constant.get_int_attr(ctx).unwrap() == seven);
    assert!(op.deref(ctx).get_num_operands() == 0);
    assert!(op.deref(ctx).get_result_type(0) == Some(i32_ty));
    assert!(op.deref(ctx).loc() == Location::file_line_col("top.sv", 3, 7));
    module.get_operation().verify(ctx).unwrap();

    expect![[r#"
        hw.module @top<WIDTH: i32> {
          ^block_1():
            %op_2_res0 = hw.constant() [hw.constant.value = 0x7: i32] : i32
        }"#]]
    .assert_eq(&module.disp(ctx).to_string());
    expect!["%op_2_res0 = hw.constant 0x7: i32"].assert_eq(&constant.disp(ctx).to_string());
}

#[test]
fn parameter_expression_becomes_param_value() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let ty = width_dependent_type(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    let expr = param_minus_one(ctx, "WIDTH");
    let op = materialize(ctx, &mut inserter, &expr, ty).unwrap();

    let param_value = op::from_operation(ctx, op)
        .downcast::<ParamValueOp>()
        .ok()
        .unwrap();
    assert!(op.deref(ctx).get_result_type(0) == Some(ty));
    assert!(op.deref(ctx).get_num_operands() == 0);
    module.get_operation().verify(ctx).unwrap();

    expect![[r#"%op_2_res0 = hw.param.value #hw.param.expr.sub<#hw.param.decl.ref<"WIDTH">: i32, 0x1: i32>: i32 : hw.int<#hw.param.decl.ref<"WIDTH">: i32>"#]]
    .assert_eq(&param_value.disp(ctx).to_string());
}

#[test]
fn no_enclosing_module_declines() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = ModuleOp::new(ctx, "outer");
    let ty = width_dependent_type(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    let expr = param_minus_one(ctx, "WIDTH");
    assert!(materialize(ctx, &mut inserter, &expr, ty).is_none());
    assert!(module.get_body(ctx).deref(ctx).get_num_ops(ctx) == 0);
}

#[test]
fn undeclared_parameter_declines() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let ty = width_dependent_type(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    let expr = param_minus_one(ctx, "FOO");
    assert!(materialize(ctx, &mut inserter, &expr, ty).is_none());
    assert!(module.get_body(ctx).deref(ctx).get_num_ops(ctx) == 0);
}

#[test]
fn nested_undeclared_parameter_declines() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let ty = width_dependent_type(ctx);
    let i32_ty = i32_type(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    let param_ref = |ctx: &mut Context, name: &str| -> AttrObj {
        let i32_ty = i32_type(ctx);
        Box::new(ParamDeclRefAttr::new(name.try_into().unwrap(), i32_ty))
    };
    let clog2 = |ctx: &mut Context, name: &str| -> AttrObj {
        let operand = param_ref(ctx, name);
        Box::new(ParamExprAttr::new(ParamExprOpcode::CLog2, vec![operand], i32_ty))
    };

    // add(WIDTH, clog2(FOO))
    let width = param_ref(ctx, "WIDTH");
    let clog2_foo = clog2(ctx, "FOO");
    let expr = ParamExprAttr::new(ParamExprOpcode::Add, vec![width, clog2_foo], i32_ty);
    assert!(materialize(ctx, &mut inserter, &expr, ty).is_none());
    assert!(module.get_body(ctx).deref(ctx).get_num_ops(ctx) == 0);

    // add(WIDTH, clog2(WIDTH))
    let width = param_ref(ctx, "WIDTH");
    let clog2_width = clog2(ctx, "WIDTH");
    let expr = ParamExprAttr::new(ParamExprOpcode::Add, vec![width, clog2_width], i32_ty);
    let op = materialize(ctx, &mut inserter, &expr, ty).unwrap();
    assert!(op::from_operation(ctx, op).is::<ParamValueOp>());
}

#[test]
fn mistyped_parameter_reference_declines() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let ty = width_dependent_type(ctx);
    let i64_ty = IntegerType::get(ctx, 64, Signedness::Signless);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    // WIDTH is declared as an i32.
    let width = ParamDeclRefAttr::new("WIDTH".try_into().unwrap(), i64_ty);
    assert!(materialize(ctx, &mut inserter, &width, ty).is_none());
}

#[test]
fn malformed_expression_declines() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let ty = width_dependent_type(ctx);
    let i32_ty = i32_type(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    let width = ParamDeclRefAttr::new("WIDTH".try_into().unwrap(), i32_ty);
    let lonely_sub = ParamExprAttr::new(ParamExprOpcode::Sub, vec![Box::new(width)], i32_ty);
    assert!(materialize(ctx, &mut inserter, &lonely_sub, ty).is_none());
}

#[test]
fn non_integer_type_never_yields_constant() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let ty = width_dependent_type(ctx);
    let i32_ty = i32_type(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

    // An integer literal with a non-integer target type falls through
    // to the parameter path, where literals are valid.
    let seven = IntegerAttr::new(i32_ty, ApInt::from_i32(7));
    let op = materialize(ctx, &mut inserter, &seven, ty).unwrap();
    assert!(op.deref(ctx).get_opid() == ParamValueOp::get_opid_static());
    assert!(op.deref(ctx).get_opid() != ConstantOp::get_opid_static());
}

#[test]
fn non_integer_value_falls_through() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let i32_ty = i32_type(ctx);

    // Inside a hw.module, the literal is a valid parameter value.
    let module = module_with_width(ctx);
    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));
    let half = FloatAttr::new(0.5);
    let op = materialize(ctx, &mut inserter, &half, i32_ty).unwrap();
    assert!(op.deref(ctx).get_opid() == ParamValueOp::get_opid_static());

    // Without one, nothing is produced.
    let outer = ModuleOp::new(ctx, "outer");
    let mut inserter = IRInserter::new_at_block_end(outer.get_body(ctx));
    let name = StringAttr::new("seven".to_string());
    assert!(materialize(ctx, &mut inserter, &name, i32_ty).is_none());
}

#[test]
fn repeated_materialization() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let i32_ty = i32_type(ctx);
    let mut inserter = IRInserter::new_at_block_start(module.get_body(ctx));
    let point = inserter.get_insertion_point();

    let seven = IntegerAttr::new(i32_ty, ApInt::from_i32(7));
    let first = materialize(ctx, &mut inserter, &seven, i32_ty).unwrap();
    assert!(inserter.get_insertion_point() == point);
    let second = materialize(ctx, &mut inserter, &seven, i32_ty).unwrap();
    assert!(inserter.get_insertion_point() == point);

    assert!(first != second);
    let value_of = |ctx: &Context, op| {
        op::from_operation(ctx, op)
            .downcast::<ConstantOp>()
            .ok()
            .and_then(|constant| constant.get_int_attr(ctx))
    };
    assert!(value_of(ctx, first) == value_of(ctx, second));
    assert!(module.get_body(ctx).deref(ctx).get_num_ops(ctx) == 2);
}

#[test]
fn nested_insertion_point_finds_module() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let ty = width_dependent_type(ctx);

    // A builtin.module nested in the hw.module body.
    let inner = ModuleOp::new(ctx, "inner");
    inner
        .get_operation()
        .insert_at_back(module.get_body(ctx), ctx);
    let mut inserter = IRInserter::new_at_block_end(inner.get_body(ctx));

    let expr = param_minus_one(ctx, "WIDTH");
    let op = materialize(ctx, &mut inserter, &expr, ty).unwrap();
    assert!(op.deref(ctx).get_parent_block() == Some(inner.get_body(ctx)));
    let enclosing = op.deref(ctx).get_parent_op_of_type::<HWModuleOp>(ctx).unwrap();
    assert!(enclosing.get_operation() == module.get_operation());
}

#[test]
fn relative_insertion_points() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let module = module_with_width(ctx);
    let i32_ty = i32_type(ctx);
    let seven = IntegerAttr::new(i32_ty, ApInt::from_i32(7));

    let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));
    let anchor = materialize(ctx, &mut inserter, &seven, i32_ty).unwrap();

    inserter.set_insertion_point(OpInsertionPoint::BeforeOperation(anchor));
    let before = materialize(ctx, &mut inserter, &seven, i32_ty).unwrap();
    inserter.set_insertion_point(OpInsertionPoint::AfterOperation(anchor));
    let after = materialize(ctx, &mut inserter, &seven, i32_ty).unwrap();

    let order: Vec<_> = module.get_body(ctx).deref(ctx).iter(ctx).collect();
    assert!(order == vec![before, anchor, after]);
}

#[test]
fn unset_insertion_point_declines() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let i32_ty = i32_type(ctx);
    let mut inserter = IRInserter::default();

    let seven = IntegerAttr::new(i32_ty, ApInt::from_i32(7));
    assert!(materialize(ctx, &mut inserter, &seven, i32_ty).is_none());
}
