use crate::{
    basic_block::BasicBlock,
    context::{Context, Ptr},
    declare_op,
    dialect::Dialect,
    impl_op_interface, impl_verify_succ,
    op::Op,
    operation::Operation,
    printable::{self, Printable},
};

use super::op_interfaces::{OneRegionInterface, SingleBlockRegionInterface, SymbolOpInterface};

declare_op!(
    /// A named, top level container: one region with one block,
    /// with no terminator.
    ///
    /// | attribute | value |
    /// |-----------|-------|
    /// | [ATTR_KEY_SYM_NAME](super::ATTR_KEY_SYM_NAME) | [StringAttr](super::attributes::StringAttr) |
    ModuleOp,
    "module",
    "builtin"
);

impl Printable for ModuleOp {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        let name = self.get_symbol_name(ctx);
        write!(f, "{} @{name} ", self.get_opid())?;
        self.get_region(ctx).fmt(ctx, state, f)
    }
}

impl_verify_succ!(ModuleOp);

impl ModuleOp {
    /// An empty module named `name`, not inside any block.
    pub fn new(ctx: &mut Context, name: &str) -> ModuleOp {
        let module = ModuleOp {
            op: Operation::new(ctx, Self::get_opid_static(), vec![], vec![], 1),
        };
        module.set_symbol_name(ctx, name);
        let body = BasicBlock::new(ctx, None, vec![]);
        body.insert_at_back(module.get_region(ctx), ctx);
        module
    }

    pub fn get_body(&self, ctx: &Context) -> Ptr<BasicBlock> {
        SingleBlockRegionInterface::get_body(self, ctx, 0)
    }
}

impl_op_interface!(OneRegionInterface for ModuleOp {});
impl_op_interface!(SingleBlockRegionInterface for ModuleOp {});
impl_op_interface!(SymbolOpInterface for ModuleOp {});

pub fn register(ctx: &mut Context, dialect: &mut Dialect) {
    ModuleOp::register(ctx, dialect);
}
