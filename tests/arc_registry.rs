use arc_dialect::{
    common_traits::Verify,
    context::Context,
    dialect::{Dialect, DialectName},
    dialects::{
        arc::{
            self,
            catalog::{self, DefineOp, OutputOp, StateOp, CATALOG},
        },
        builtin::types::{IntegerType, Signedness},
    },
    linked_list::ContainsLinkedList,
    op::{Op, OpId, OpName},
    printable::Printable,
};
use expect_test::expect;

use crate::common::{init_env_logger, setup_context_dialects};

mod common;

#[test]
fn dependencies_registered() {
    init_env_logger();
    let ctx = &setup_context_dialects();
    for name in ["builtin", "hw", "arc"] {
        assert!(Dialect::get_ref(ctx, &DialectName::new(name)).is_some());
    }
    let arc = Dialect::get_ref(ctx, &DialectName::new("arc")).unwrap();
    assert!(arc.has_constant_materializer());
    assert!(!Dialect::get_ref(ctx, &DialectName::new("hw"))
        .unwrap()
        .has_constant_materializer());
}

#[test]
fn registration_is_idempotent() {
    init_env_logger();
    let ctx = &mut Context::new();
    arc::register(ctx);
    let num_ops = ctx.ops.len();
    let num_arc_ops = Dialect::get_ref(ctx, &DialectName::new("arc"))
        .unwrap()
        .ops
        .len();

    arc::register(ctx);
    assert!(ctx.ops.len() == num_ops);
    let arc = Dialect::get_ref(ctx, &DialectName::new("arc")).unwrap();
    assert!(arc.ops.len() == num_arc_ops);
    assert!(arc.has_constant_materializer());
}

#[test]
fn catalog_is_registered() {
    init_env_logger();
    let ctx = &setup_context_dialects();
    let arc = Dialect::get_ref(ctx, &DialectName::new("arc")).unwrap();
    assert!(arc.ops.len() == CATALOG.len());
    for spec in CATALOG {
        let opid = OpId {
            dialect: DialectName::new("arc"),
            name: OpName::new(spec.name),
        };
        assert!(arc.ops.contains(&opid), "{} not registered", opid);
        assert!(ctx.ops.contains_key(&opid));
    }
    assert!(catalog::lookup("sim.step").is_some());
    assert!(catalog::lookup("vectorize.return").unwrap().is_terminator);
}

#[test]
fn build_and_verify_catalog_ops() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let i8_ty = IntegerType::get(ctx, 8, Signedness::Signless);

    let define = DefineOp::new(ctx, vec![], vec![]);
    let body = define
        .get_operation()
        .deref(ctx)
        .get_region(0)
        .unwrap()
        .deref(ctx)
        .iter(ctx)
        .next()
        .unwrap();

    let state = StateOp::new(ctx, vec![i8_ty], vec![]);
    state.get_operation().insert_at_back(body, ctx);
    let output = OutputOp::new(ctx, vec![], vec![]);
    output.get_operation().insert_at_back(body, ctx);
    define.get_operation().verify(ctx).unwrap();

    expect![[r#"
        arc.define() {
          ^block_1():
            %op_2_res0 = arc.state() : i8
            arc.output()
        }"#]]
    .assert_eq(&define.disp(ctx).to_string());

    // A terminator must come last.
    let late = StateOp::new(ctx, vec![i8_ty], vec![]);
    late.get_operation().insert_at_back(body, ctx);
    assert!(define.get_operation().verify(ctx).is_err());
}

#[test]
fn region_count_is_checked() {
    init_env_logger();
    let ctx = &mut setup_context_dialects();
    let opid = DefineOp::get_opid_static();
    let op = arc_dialect::operation::Operation::new(ctx, opid, vec![], vec![], 0);
    let err = op.verify(ctx).unwrap_err();
    expect!["Op arc.define must have 1 region(s), but has 0"].assert_eq(&err.err.to_string());
}
