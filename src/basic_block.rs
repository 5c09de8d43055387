//! A [BasicBlock] is a list of [Operation]s, with typed arguments.

use crate::{
    common_traits::{Named, Verify},
    context::{private::ArenaObj, ArenaCell, Context, Ptr},
    identifier::Identifier,
    indented_block,
    linked_list::{
        private::{self, ListEnds, ListLinks},
        ContainsLinkedList, LinkedList,
    },
    operation::Operation,
    printable::{self, fmt_indented_newline, fmt_iter, ListSeparator, Printable},
    r#type::TypeObj,
    region::Region,
    result::Result,
    value::Value,
};

/// Straight line sequence of [Operation]s, with typed arguments.
pub struct BasicBlock {
    pub(crate) self_ptr: Ptr<BasicBlock>,
    pub(crate) label: Option<Identifier>,
    pub(crate) ops: ListEnds<Operation>,
    pub(crate) arg_types: Vec<Ptr<TypeObj>>,
    /// Position in the parent region's list of blocks.
    pub(crate) links: ListLinks<BasicBlock, Region>,
}

impl PartialEq for BasicBlock {
    fn eq(&self, other: &Self) -> bool {
        self.self_ptr == other.self_ptr
    }
}

impl BasicBlock {
    /// A fresh, empty block outside of any region.
    pub fn new(
        ctx: &mut Context,
        label: Option<Identifier>,
        arg_types: Vec<Ptr<TypeObj>>,
    ) -> Ptr<BasicBlock> {
        Self::alloc(ctx, |self_ptr| BasicBlock {
            self_ptr,
            label,
            ops: ListEnds::default(),
            arg_types,
            links: ListLinks::default(),
        })
    }

    pub fn get_parent_region(&self) -> Option<Ptr<Region>> {
        self.get_container()
    }

    /// Owner of the region this block is in.
    pub fn get_parent_op(&self, ctx: &Context) -> Option<Ptr<Operation>> {
        let region = self.get_parent_region()?;
        Some(region.deref(ctx).get_parent_op())
    }

    pub fn get_num_arguments(&self) -> usize {
        self.arg_types.len()
    }

    pub fn get_argument(&self, arg_idx: usize) -> Option<Value> {
        self.arg_types.get(arg_idx).map(|_| Value::BlockArgument {
            block: self.self_ptr,
            arg_idx,
        })
    }

    pub fn get_argument_type(&self, arg_idx: usize) -> Option<Ptr<TypeObj>> {
        self.arg_types.get(arg_idx).copied()
    }

    pub fn get_num_ops(&self, ctx: &Context) -> usize {
        self.iter(ctx).count()
    }
}

impl Named for BasicBlock {
    fn given_name(&self, _ctx: &Context) -> Option<String> {
        self.label.as_ref().map(|label| label.to_string())
    }

    fn id(&self, _ctx: &Context) -> String {
        self.self_ptr.make_name("block")
    }
}

impl private::ContainsLinkedList<Operation> for BasicBlock {
    fn list_ends(&self) -> &ListEnds<Operation> {
        &self.ops
    }

    fn list_ends_mut(&mut self) -> &mut ListEnds<Operation> {
        &mut self.ops
    }
}

impl private::LinkedList for BasicBlock {
    type ContainerType = Region;

    fn list_links(&self) -> &ListLinks<Self, Region> {
        &self.links
    }

    fn list_links_mut(&mut self) -> &mut ListLinks<Self, Region> {
        &mut self.links
    }
}

impl ArenaObj for BasicBlock {
    fn get_arena(ctx: &Context) -> &ArenaCell<Self> {
        &ctx.basic_blocks
    }

    fn get_arena_mut(ctx: &mut Context) -> &mut ArenaCell<Self> {
        &mut ctx.basic_blocks
    }

    fn get_self_ptr(&self, _ctx: &Context) -> Ptr<Self> {
        self.self_ptr
    }

    fn dealloc_sub_objects(ptr: Ptr<Self>, ctx: &mut Context) {
        let ops: Vec<_> = ptr.deref(ctx).iter(ctx).collect();
        for op in ops {
            op.unlink(ctx);
            ArenaObj::dealloc(op, ctx);
        }
    }
}

impl Verify for BasicBlock {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.iter(ctx).try_for_each(|op| op.verify(ctx))
    }
}

struct BlockArg(Value, Ptr<TypeObj>);

impl Printable for BlockArg {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "{}: {}", self.0.disp(ctx), self.1.disp(ctx))
    }
}

impl Printable for BasicBlock {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "^{}(", self.unique_name(ctx))?;
        let args = self
            .arg_types
            .iter()
            .enumerate()
            .filter_map(|(arg_idx, ty)| self.get_argument(arg_idx).map(|arg| BlockArg(arg, *ty)));
        fmt_iter(args, ctx, state, ListSeparator::CharSpace(','), f)?;
        write!(f, "):")?;

        indented_block!(state, {
            for op in self.iter(ctx) {
                fmt_indented_newline(state, f)?;
                op.fmt(ctx, state, f)?;
            }
        });
        Ok(())
    }
}
