//! An [Operation] is the unit of computation in the IR. Its semantics
//! are defined by its [OpId], and [Op]s provide typed access to it.

use crate::{
    attribute::AttributeDict,
    basic_block::BasicBlock,
    common_traits::{Named, Verify},
    context::{private::ArenaObj, ArenaCell, Context, Ptr},
    linked_list::{
        private::{self, ListLinks},
        LinkedList,
    },
    location::{Located, Location},
    op::{self, Op, OpId},
    printable::{self, fmt_iter, ListSeparator, Printable},
    r#type::TypeObj,
    region::Region,
    result::Result,
    value::Value,
};

/// Consumes [Value]s (operands), defines new ones (results) and may
/// own nested [Region]s. What it means is decided by its [OpId].
pub struct Operation {
    pub(crate) opid: OpId,
    pub(crate) self_ptr: Ptr<Operation>,
    pub(crate) result_types: Vec<Ptr<TypeObj>>,
    pub(crate) operands: Vec<Value>,
    /// Position in the parent block's list of operations.
    pub(crate) links: ListLinks<Operation, BasicBlock>,
    pub attributes: AttributeDict,
    pub(crate) regions: Vec<Ptr<Region>>,
    pub(crate) loc: Location,
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.self_ptr == other.self_ptr
    }
}

impl Operation {
    /// Allocate an operation that is not yet in any block.
    /// It starts out with `num_regions` regions, none with any blocks.
    pub fn new(
        ctx: &mut Context,
        opid: OpId,
        result_types: Vec<Ptr<TypeObj>>,
        operands: Vec<Value>,
        num_regions: usize,
    ) -> Ptr<Operation> {
        let op = Self::alloc(ctx, |self_ptr| Operation {
            opid,
            self_ptr,
            result_types,
            operands,
            links: ListLinks::default(),
            attributes: AttributeDict::default(),
            regions: Vec::with_capacity(num_regions),
            loc: Location::Unknown,
        });
        for _ in 0..num_regions {
            let region = Region::new(ctx, op);
            op.deref_mut(ctx).regions.push(region);
        }
        op
    }

    pub fn get_opid(&self) -> OpId {
        self.opid.clone()
    }

    pub fn get_num_results(&self) -> usize {
        self.result_types.len()
    }

    /// The `res_idx`'th result, if there is one.
    pub fn get_result(&self, res_idx: usize) -> Option<Value> {
        (res_idx < self.result_types.len()).then_some(Value::OpResult {
            op: self.self_ptr,
            res_idx,
        })
    }

    pub fn get_result_type(&self, res_idx: usize) -> Option<Ptr<TypeObj>> {
        self.result_types.get(res_idx).copied()
    }

    pub fn get_num_operands(&self) -> usize {
        self.operands.len()
    }

    pub fn get_operand(&self, opd_idx: usize) -> Option<Value> {
        self.operands.get(opd_idx).copied()
    }

    pub fn get_num_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn get_region(&self, reg_idx: usize) -> Option<Ptr<Region>> {
        self.regions.get(reg_idx).copied()
    }

    /// The block this operation is in, if it has been inserted into one.
    pub fn get_parent_block(&self) -> Option<Ptr<BasicBlock>> {
        self.get_container()
    }

    /// The operation owning the region of the block this operation is in.
    pub fn get_parent_op(&self, ctx: &Context) -> Option<Ptr<Operation>> {
        self.get_parent_block()
            .and_then(|block| block.deref(ctx).get_parent_op(ctx))
    }

    /// Walk outward from this operation and return the first
    /// enclosing operation that is a `T`.
    pub fn get_parent_op_of_type<T: Op>(&self, ctx: &Context) -> Option<T> {
        let wanted = T::get_opid_static();
        std::iter::successors(self.get_parent_op(ctx), |op| op.deref(ctx).get_parent_op(ctx))
            .find(|op| op.deref(ctx).opid == wanted)
            .and_then(|found| op::from_operation(ctx, found).downcast::<T>().ok())
            .map(|found| *found)
    }

    /// Free `ptr` and everything nested in it, taking it out of its block first.
    pub fn erase(ptr: Ptr<Operation>, ctx: &mut Context) {
        if ptr.is_linked(ctx) {
            ptr.unlink(ctx);
        }
        ArenaObj::dealloc(ptr, ctx);
    }
}

impl Located for Operation {
    fn loc(&self) -> Location {
        self.loc.clone()
    }

    fn set_loc(&mut self, loc: Location) {
        self.loc = loc;
    }
}

impl Named for Operation {
    fn given_name(&self, _ctx: &Context) -> Option<String> {
        None
    }

    fn id(&self, _ctx: &Context) -> String {
        self.self_ptr.make_name("op")
    }
}

impl private::LinkedList for Operation {
    type ContainerType = BasicBlock;

    fn list_links(&self) -> &ListLinks<Self, BasicBlock> {
        &self.links
    }

    fn list_links_mut(&mut self) -> &mut ListLinks<Self, BasicBlock> {
        &mut self.links
    }
}

impl ArenaObj for Operation {
    fn get_arena(ctx: &Context) -> &ArenaCell<Self> {
        &ctx.operations
    }

    fn get_arena_mut(ctx: &mut Context) -> &mut ArenaCell<Self> {
        &mut ctx.operations
    }

    fn get_self_ptr(&self, _ctx: &Context) -> Ptr<Self> {
        self.self_ptr
    }

    fn dealloc_sub_objects(ptr: Ptr<Self>, ctx: &mut Context) {
        let regions = std::mem::take(&mut ptr.deref_mut(ctx).regions);
        for region in regions {
            ArenaObj::dealloc(region, ctx);
        }
    }
}

impl Verify for Operation {
    fn verify(&self, ctx: &Context) -> Result<()> {
        let op = op::from_operation(ctx, self.self_ptr);
        op.verify_interfaces(ctx)?;
        op.verify(ctx)?;
        for region in &self.regions {
            region.verify(ctx)?;
        }
        Ok(())
    }
}

impl Printable for Operation {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        let results: Vec<_> = (0..self.get_num_results())
            .filter_map(|idx| self.get_result(idx))
            .collect();
        if !results.is_empty() {
            fmt_iter(results.iter(), ctx, state, ListSeparator::CharSpace(','), f)?;
            write!(f, " = ")?;
        }
        write!(f, "{}(", self.opid)?;
        fmt_iter(self.operands.iter(), ctx, state, ListSeparator::CharSpace(','), f)?;
        write!(f, ")")?;
        if !self.attributes.is_empty() {
            write!(f, " {}", self.attributes.print(ctx, state))?;
        }
        if !self.result_types.is_empty() {
            write!(f, " : ")?;
            fmt_iter(
                self.result_types.iter(),
                ctx,
                state,
                ListSeparator::CharSpace(','),
                f,
            )?;
        }
        for region in &self.regions {
            write!(f, " ")?;
            region.fmt(ctx, state, f)?;
        }
        Ok(())
    }
}
