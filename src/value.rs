//! SSA values: results of [Operation]s and arguments of [BasicBlock]s.

use crate::{
    basic_block::BasicBlock,
    common_traits::Named,
    context::{Context, Ptr},
    operation::Operation,
    printable::{self, Printable},
    r#type::{TypeObj, Typed},
};

/// A value that can be used as an [Operation] operand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Value {
    /// The `res_idx`'th result of `op`.
    OpResult {
        op: Ptr<Operation>,
        res_idx: usize,
    },
    /// The `arg_idx`'th argument of `block`.
    BlockArgument {
        block: Ptr<BasicBlock>,
        arg_idx: usize,
    },
}

impl Value {
    /// The operation that defines this value, if it is an operation result.
    pub fn get_defining_op(&self) -> Option<Ptr<Operation>> {
        match self {
            Value::OpResult { op, .. } => Some(*op),
            Value::BlockArgument { .. } => None,
        }
    }

    /// The block in which this value is defined.
    pub fn get_parent_block(&self, ctx: &Context) -> Option<Ptr<BasicBlock>> {
        match self {
            Value::OpResult { op, .. } => op.deref(ctx).get_parent_block(),
            Value::BlockArgument { block, .. } => Some(*block),
        }
    }
}

impl Typed for Value {
    fn get_type(&self, ctx: &Context) -> Ptr<TypeObj> {
        match self {
            Value::OpResult { op, res_idx } => op
                .deref(ctx)
                .get_result_type(*res_idx)
                .expect("Value refers to a non-existent operation result"),
            Value::BlockArgument { block, arg_idx } => block
                .deref(ctx)
                .get_argument_type(*arg_idx)
                .expect("Value refers to a non-existent block argument"),
        }
    }
}

impl Named for Value {
    fn given_name(&self, _ctx: &Context) -> Option<String> {
        None
    }

    fn id(&self, ctx: &Context) -> String {
        match self {
            Value::OpResult { op, res_idx } => format!("{}_res{}", op.make_name("op"), res_idx),
            Value::BlockArgument { block, arg_idx } => {
                format!("{}_arg{}", block.deref(ctx).unique_name(ctx), arg_idx)
            }
        }
    }
}

impl Printable for Value {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "%{}", self.unique_name(ctx))
    }
}
