//! Structural properties that many [Op]s share.
//!
//! An [Op] opts in with [impl_op_interface](crate::impl_op_interface).
//! The interface's `verify` then runs whenever the op is verified,
//! and an [OpObj](crate::op::OpObj) can be [cast](crate::op::op_cast) to it.

use thiserror::Error;

use crate::{
    attribute::AttrObj,
    basic_block::BasicBlock,
    context::{Context, Ptr},
    linked_list::ContainsLinkedList,
    location::Located,
    op::Op,
    operation::Operation,
    r#type::TypeObj,
    region::Region,
    result::Result,
    value::Value,
    verify_err,
};

use super::{attributes::StringAttr, ATTR_KEY_SYM_NAME};

#[derive(Error, Debug)]
pub enum InterfaceVerifyErr {
    #[error("Op {0} must have a single region")]
    NotOneRegion(String),
    #[error("Op {0} must only have regions with single block")]
    NotSingleBlockRegions(String),
    #[error("Op {0} must have a symbol name")]
    MissingSymbol(String),
    #[error("Op {0} must have single result")]
    NotOneResult(String),
    #[error("Op {0} must not have any operand")]
    HasOperands(String),
}

/// Fail verification of `op` with `err(<opid>)` unless `holds`.
fn check(op: &Operation, holds: bool, err: fn(String) -> InterfaceVerifyErr) -> Result<()> {
    if holds {
        return Ok(());
    }
    verify_err!(op.loc(), err(op.get_opid().to_string()))
}

pub trait OneRegionInterface: Op {
    fn get_region(&self, ctx: &Context) -> Ptr<Region> {
        self.get_operation()
            .deref(ctx)
            .get_region(0)
            .expect("OneRegion op without its region")
    }

    fn verify(op: &dyn Op, ctx: &Context) -> Result<()>
    where
        Self: Sized,
    {
        let op = &*op.get_operation().deref(ctx);
        check(op, op.get_num_regions() == 1, InterfaceVerifyErr::NotOneRegion)
    }
}

/// Every region holds exactly one block, the body.
pub trait SingleBlockRegionInterface: Op {
    fn get_body(&self, ctx: &Context, region_idx: usize) -> Ptr<BasicBlock> {
        let region = self
            .get_operation()
            .deref(ctx)
            .get_region(region_idx)
            .expect("No region at this index");
        let body = region.deref(ctx).get_head();
        body.expect("SingleBlockRegion op with an empty region")
    }

    fn verify(op: &dyn Op, ctx: &Context) -> Result<()>
    where
        Self: Sized,
    {
        let op = &*op.get_operation().deref(ctx);
        let single_blocks = op
            .regions
            .iter()
            .all(|region| region.deref(ctx).iter(ctx).count() == 1);
        check(op, single_blocks, InterfaceVerifyErr::NotSingleBlockRegions)
    }
}

/// Defines a symbol, named by the [ATTR_KEY_SYM_NAME] attribute.
pub trait SymbolOpInterface: Op {
    fn get_symbol_name(&self, ctx: &Context) -> String {
        let op = self.get_operation().deref(ctx);
        let name = op
            .attributes
            .get_as::<StringAttr>(ATTR_KEY_SYM_NAME)
            .expect("Symbol op without a symbol name");
        String::from(name.clone())
    }

    fn set_symbol_name(&self, ctx: &mut Context, name: &str) {
        let name = Box::new(StringAttr::new(name.to_string()));
        self.get_operation()
            .deref_mut(ctx)
            .attributes
            .set(ATTR_KEY_SYM_NAME, name);
    }

    fn verify(op: &dyn Op, ctx: &Context) -> Result<()>
    where
        Self: Sized,
    {
        let op = &*op.get_operation().deref(ctx);
        let named = op.attributes.get_as::<StringAttr>(ATTR_KEY_SYM_NAME).is_some();
        check(op, named, InterfaceVerifyErr::MissingSymbol)
    }
}

pub trait OneResultInterface: Op {
    fn get_result(&self, ctx: &Context) -> Value {
        self.get_operation()
            .deref(ctx)
            .get_result(0)
            .expect("OneResult op without its result")
    }

    fn result_type(&self, ctx: &Context) -> Ptr<TypeObj> {
        self.get_operation()
            .deref(ctx)
            .get_result_type(0)
            .expect("OneResult op without its result")
    }

    fn verify(op: &dyn Op, ctx: &Context) -> Result<()>
    where
        Self: Sized,
    {
        let op = &*op.get_operation().deref(ctx);
        check(op, op.get_num_results() == 1, InterfaceVerifyErr::NotOneResult)
    }
}

pub trait ZeroOpdInterface: Op {
    fn verify(op: &dyn Op, ctx: &Context) -> Result<()>
    where
        Self: Sized,
    {
        let op = &*op.get_operation().deref(ctx);
        check(op, op.get_num_operands() == 0, InterfaceVerifyErr::HasOperands)
    }
}

/// Pure, operand free ops with one result, fully described by an attribute.
/// These are what a dialect's constant materializer builds.
pub trait ConstantLikeInterface: ZeroOpdInterface + OneResultInterface {
    fn get_value(&self, ctx: &Context) -> AttrObj;

    fn verify(_op: &dyn Op, _ctx: &Context) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}
