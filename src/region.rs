//! A [Region] is a list of [BasicBlock]s, owned by an [Operation].

use crate::{
    basic_block::BasicBlock,
    common_traits::Verify,
    context::{private::ArenaObj, ArenaCell, Context, Ptr},
    indented_block,
    linked_list::{
        private::{self, ListEnds},
        ContainsLinkedList,
    },
    operation::Operation,
    printable::{self, fmt_indented_newline, Printable},
    result::Result,
};

/// Blocks nested inside an [Operation]. A region always
/// belongs to the operation it was created for.
pub struct Region {
    pub(crate) self_ptr: Ptr<Region>,
    pub(crate) blocks: ListEnds<BasicBlock>,
    pub(crate) parent_op: Ptr<Operation>,
}

impl Region {
    /// A region without blocks, owned by `parent_op`.
    /// Only [Operation::new] creates regions, and records them in the owner.
    pub(crate) fn new(ctx: &mut Context, parent_op: Ptr<Operation>) -> Ptr<Region> {
        Self::alloc(ctx, |self_ptr| Region {
            self_ptr,
            blocks: ListEnds::default(),
            parent_op,
        })
    }

    pub fn get_parent_op(&self) -> Ptr<Operation> {
        self.parent_op
    }
}

impl private::ContainsLinkedList<BasicBlock> for Region {
    fn list_ends(&self) -> &ListEnds<BasicBlock> {
        &self.blocks
    }

    fn list_ends_mut(&mut self) -> &mut ListEnds<BasicBlock> {
        &mut self.blocks
    }
}

impl ArenaObj for Region {
    fn get_arena(ctx: &Context) -> &ArenaCell<Self> {
        &ctx.regions
    }

    fn get_arena_mut(ctx: &mut Context) -> &mut ArenaCell<Self> {
        &mut ctx.regions
    }

    fn get_self_ptr(&self, _ctx: &Context) -> Ptr<Self> {
        self.self_ptr
    }

    fn dealloc_sub_objects(ptr: Ptr<Self>, ctx: &mut Context) {
        let blocks: Vec<_> = ptr.deref(ctx).iter(ctx).collect();
        for block in blocks {
            block.unlink(ctx);
            ArenaObj::dealloc(block, ctx);
        }
    }
}

impl Verify for Region {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.iter(ctx).try_for_each(|block| block.verify(ctx))
    }
}

impl Printable for Region {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "{{")?;
        indented_block!(state, {
            for block in self.iter(ctx) {
                fmt_indented_newline(state, f)?;
                block.fmt(ctx, state, f)?;
            }
        });
        fmt_indented_newline(state, f)?;
        write!(f, "}}")
    }
}
