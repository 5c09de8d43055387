//! Placing newly built [Operation]s into blocks.

use crate::{
    basic_block::BasicBlock,
    common_traits::Named,
    context::{Context, Ptr},
    op::Op,
    operation::Operation,
    printable::{self, Printable},
};

/// Where an [IRInserter] puts the next operation.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum OpInsertionPoint {
    #[default]
    Unset,
    AtBlockStart(Ptr<BasicBlock>),
    AtBlockEnd(Ptr<BasicBlock>),
    AfterOperation(Ptr<Operation>),
    BeforeOperation(Ptr<Operation>),
}

impl Printable for OpInsertionPoint {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let (relation, anchor) = match self {
            OpInsertionPoint::Unset => return write!(f, "<unset>"),
            OpInsertionPoint::AtBlockStart(block) => {
                ("start of", block.deref(ctx).unique_name(ctx))
            }
            OpInsertionPoint::AtBlockEnd(block) => ("end of", block.deref(ctx).unique_name(ctx)),
            OpInsertionPoint::AfterOperation(op) => ("after", op.deref(ctx).unique_name(ctx)),
            OpInsertionPoint::BeforeOperation(op) => ("before", op.deref(ctx).unique_name(ctx)),
        };
        write!(f, "{relation} {anchor}")
    }
}

/// Inserts [Operation]s at an [OpInsertionPoint].
/// Inserting never moves the insertion point.
#[derive(Default)]
pub struct IRInserter {
    point: OpInsertionPoint,
}

impl IRInserter {
    pub fn new(point: OpInsertionPoint) -> Self {
        IRInserter { point }
    }

    pub fn new_at_block_start(block: Ptr<BasicBlock>) -> Self {
        Self::new(OpInsertionPoint::AtBlockStart(block))
    }

    pub fn new_at_block_end(block: Ptr<BasicBlock>) -> Self {
        Self::new(OpInsertionPoint::AtBlockEnd(block))
    }

    pub fn new_after_operation(op: Ptr<Operation>) -> Self {
        Self::new(OpInsertionPoint::AfterOperation(op))
    }

    /// Link `operation` in at the insertion point.
    ///
    /// # Panics
    /// If `operation` is already in a block, or the insertion point is unset.
    pub fn insert_operation(&mut self, ctx: &Context, operation: Ptr<Operation>) {
        match self.point {
            OpInsertionPoint::AtBlockStart(block) => operation.insert_at_front(block, ctx),
            OpInsertionPoint::AtBlockEnd(block) => operation.insert_at_back(block, ctx),
            OpInsertionPoint::AfterOperation(mark) => operation.insert_after(ctx, mark),
            OpInsertionPoint::BeforeOperation(mark) => operation.insert_before(ctx, mark),
            OpInsertionPoint::Unset => panic!(
                "Cannot insert {} without an insertion point",
                operation.deref(ctx).unique_name(ctx)
            ),
        }
    }

    pub fn insert_op(&mut self, ctx: &Context, op: &impl Op) {
        self.insert_operation(ctx, op.get_operation());
    }

    pub fn get_insertion_point(&self) -> OpInsertionPoint {
        self.point
    }

    pub fn set_insertion_point(&mut self, point: OpInsertionPoint) {
        self.point = point;
    }

    /// The block that the next operation goes into. [None] when the
    /// point is unset or relative to an operation that is not in a block.
    pub fn get_insertion_block(&self, ctx: &Context) -> Option<Ptr<BasicBlock>> {
        match self.point {
            OpInsertionPoint::AtBlockStart(block) | OpInsertionPoint::AtBlockEnd(block) => {
                Some(block)
            }
            OpInsertionPoint::AfterOperation(mark) | OpInsertionPoint::BeforeOperation(mark) => {
                mark.deref(ctx).get_parent_block()
            }
            OpInsertionPoint::Unset => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::{IRInserter, OpInsertionPoint};
    use crate::{
        basic_block::BasicBlock, context::Context, linked_list::ContainsLinkedList,
        printable::Printable,
    };

    #[test]
    fn insertion_points() {
        let ctx = &mut Context::new();
        let block = BasicBlock::new(ctx, None, vec![]);
        let op_id = || crate::op::OpId {
            dialect: crate::dialect::DialectName::new("test"),
            name: crate::op::OpName::new("nop"),
        };
        let [first, last, mid] =
            [(); 3].map(|_| crate::operation::Operation::new(ctx, op_id(), vec![], vec![], 0));

        let mut inserter = IRInserter::new_at_block_end(block);
        inserter.insert_operation(ctx, last);
        inserter.set_insertion_point(OpInsertionPoint::AtBlockStart(block));
        inserter.insert_operation(ctx, first);
        inserter.set_insertion_point(OpInsertionPoint::BeforeOperation(last));
        inserter.insert_operation(ctx, mid);
        assert!(inserter.get_insertion_block(ctx) == Some(block));

        let order: Vec<_> = block.deref(ctx).iter(ctx).collect();
        assert!(order == vec![first, mid, last]);
        expect!["before op_2"].assert_eq(&inserter.get_insertion_point().disp(ctx).to_string());
        expect!["<unset>"].assert_eq(&OpInsertionPoint::Unset.disp(ctx).to_string());
    }
}
