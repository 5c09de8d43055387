//! Turning constant values into operations, on behalf of the arc dialect.
//!
//! Integer literals become `hw.constant`. Anything that is a valid parameter
//! expression in the enclosing `hw.module` becomes `hw.param.value`.
//! Everything else is declined.

use log::{debug, trace};

use crate::{
    attribute::Attribute,
    basic_block::BasicBlock,
    context::{Context, Ptr},
    dialect::ConstantMaterializer,
    dialects::{
        builtin::{attributes::IntegerAttr, types::IntegerType},
        hw::{
            ops::{ConstantOp, HWModuleOp, ParamValueOp},
            params::is_valid_parameter_expression,
        },
    },
    irbuild::inserter::IRInserter,
    location::{Located, Location},
    op::{self, Op},
    operation::Operation,
    printable::Printable,
    r#type::TypeObj,
};

/// The [ConstantMaterializer] installed on the arc dialect.
#[derive(Clone, Copy, Default, Debug)]
pub struct ArcConstantMaterializer;

/// The nearest `hw.module` around `block`.
fn enclosing_module(ctx: &Context, block: Ptr<BasicBlock>) -> Option<HWModuleOp> {
    let parent = block.deref(ctx).get_parent_op(ctx)?;
    trace!("Looking for a hw.module from {}", parent.deref(ctx).get_opid().disp(ctx));
    let module_id = HWModuleOp::get_opid_static();
    let module = std::iter::successors(Some(parent), |op| op.deref(ctx).get_parent_op(ctx))
        .find(|op| op.deref(ctx).get_opid() == module_id)?;
    op::from_operation(ctx, module)
        .downcast::<HWModuleOp>()
        .ok()
        .map(|module| *module)
}

fn insert(
    ctx: &mut Context,
    inserter: &mut IRInserter,
    op: &impl Op,
    loc: Location,
) -> Ptr<Operation> {
    let operation = op.get_operation();
    operation.deref_mut(ctx).set_loc(loc);
    inserter.insert_op(ctx, op);
    operation
}

impl ConstantMaterializer for ArcConstantMaterializer {
    fn materialize_constant(
        &self,
        ctx: &mut Context,
        inserter: &mut IRInserter,
        value: &dyn Attribute,
        ty: Ptr<TypeObj>,
        loc: Location,
    ) -> Option<Ptr<Operation>> {
        let Some(block) = inserter.get_insertion_block(ctx) else {
            debug!("No insertion block, cannot materialize {}", value.disp(ctx));
            return None;
        };

        if ty.deref(ctx).is::<IntegerType>() {
            if let Some(int_attr) = value.downcast_ref::<IntegerAttr>() {
                debug!("Materializing {} as hw.constant", int_attr.disp(ctx));
                let constant = ConstantOp::new(ctx, ty, int_attr.clone());
                return Some(insert(ctx, inserter, &constant, loc));
            }
        }

        let Some(module) = enclosing_module(ctx, block) else {
            debug!("No enclosing hw.module for {}", value.disp(ctx));
            return None;
        };
        if !is_valid_parameter_expression(ctx, value, module) {
            return None;
        }
        debug!("Materializing {} as hw.param.value", value.disp(ctx));
        let param_value = ParamValueOp::new(ctx, ty, dyn_clone::clone_box(value));
        Some(insert(ctx, inserter, &param_value, loc))
    }
}
