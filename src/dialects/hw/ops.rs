use log::warn;
use thiserror::Error;

use crate::{
    attribute::AttrObj,
    basic_block::BasicBlock,
    common_traits::Verify,
    context::{Context, Ptr},
    declare_op,
    dialect::Dialect,
    dialects::builtin::{
        attr_interfaces::TypedAttrInterface,
        attributes::{ArrayAttr, IntegerAttr},
        op_interfaces::{
            ConstantLikeInterface, OneRegionInterface, OneResultInterface,
            SingleBlockRegionInterface, SymbolOpInterface, ZeroOpdInterface,
        },
    },
    impl_op_interface,
    location::Located,
    op::Op,
    operation::Operation,
    printable::{self, fmt_iter, ListSeparator, Printable},
    r#type::TypeObj,
    result::Result,
    verify_err,
};

use super::{attributes::ParamDeclAttr, params::check_parameter_in_context};

declare_op!(
    /// A hardware module with (possibly) parameters.
    /// Parameter expressions within the module body are
    /// checked against the parameters it declares.
    ///
    /// Attributes:
    ///
    /// | key | value |
    /// |-----|-------|
    /// | [ATTR_KEY_SYM_NAME](crate::dialects::builtin::ATTR_KEY_SYM_NAME) | [StringAttr](crate::dialects::builtin::attributes::StringAttr) |
    /// | [ATTR_KEY_PARAMETERS](HWModuleOp::ATTR_KEY_PARAMETERS) | [ArrayAttr] of [ParamDeclAttr] |
    HWModuleOp,
    "module",
    "hw"
);

impl HWModuleOp {
    /// Attribute key for the list of declared parameters.
    pub const ATTR_KEY_PARAMETERS: &'static str = "hw.parameters";

    /// Create a new [HWModuleOp] with an empty body.
    /// The underlying [Operation] is not linked to a [BasicBlock].
    pub fn new(ctx: &mut Context, name: &str, params: Vec<ParamDeclAttr>) -> HWModuleOp {
        let op = Operation::new(ctx, Self::get_opid_static(), vec![], vec![], 1);
        let params = params
            .into_iter()
            .map(|param| -> AttrObj { Box::new(param) })
            .collect();
        op.deref_mut(ctx)
            .attributes
            .set(Self::ATTR_KEY_PARAMETERS, Box::new(ArrayAttr::new(params)));
        let opop = HWModuleOp { op };
        opop.set_symbol_name(ctx, name);

        let block = BasicBlock::new(ctx, None, vec![]);
        block.insert_at_front(opop.get_region(ctx), ctx);
        opop
    }

    /// The parameters declared by this module, in declaration order.
    pub fn get_parameters(&self, ctx: &Context) -> Vec<ParamDeclAttr> {
        self.get_operation()
            .deref(ctx)
            .attributes
            .get_as::<ArrayAttr>(Self::ATTR_KEY_PARAMETERS)
            .map(|params| {
                params
                    .elems()
                    .iter()
                    .filter_map(|param| param.downcast_ref::<ParamDeclAttr>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The block holding this module's operations.
    pub fn get_body(&self, ctx: &Context) -> Ptr<BasicBlock> {
        SingleBlockRegionInterface::get_body(self, ctx, 0)
    }
}

impl Printable for HWModuleOp {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(
            f,
            "{} @{}<",
            self.get_opid().disp(ctx),
            self.get_symbol_name(ctx)
        )?;
        fmt_iter(
            self.get_parameters(ctx).iter(),
            ctx,
            state,
            ListSeparator::CharSpace(','),
            f,
        )?;
        write!(f, "> ")?;
        self.get_region(ctx).fmt(ctx, state, f)
    }
}

#[derive(Error, Debug)]
pub enum HWModuleOpVerifyErr {
    #[error("Module parameters must be an array of parameter declarations")]
    MalformedParameters,
}

impl Verify for HWModuleOp {
    fn verify(&self, ctx: &Context) -> Result<()> {
        let op = &*self.get_operation().deref(ctx);
        let Some(params) = op.attributes.get_as::<ArrayAttr>(Self::ATTR_KEY_PARAMETERS) else {
            return verify_err!(op.loc(), HWModuleOpVerifyErr::MalformedParameters);
        };
        if !params.elems().iter().all(|param| param.is::<ParamDeclAttr>()) {
            return verify_err!(op.loc(), HWModuleOpVerifyErr::MalformedParameters);
        }
        // Default values may not refer to other parameters.
        for param in self.get_parameters(ctx) {
            if let Some(value) = param.get_value() {
                check_parameter_in_context(ctx, &**value, &[], true, &op.loc()).inspect_err(
                    |err| warn!("Bad default for parameter {}: {}", param.get_name(), err.err),
                )?;
            }
        }
        Ok(())
    }
}

impl_op_interface!(OneRegionInterface for HWModuleOp {});
impl_op_interface!(SingleBlockRegionInterface for HWModuleOp {});
impl_op_interface!(SymbolOpInterface for HWModuleOp {});

declare_op!(
    /// An integer constant.
    ///
    /// Attributes:
    ///
    /// | key | value |
    /// |-----|-------|
    /// | [ATTR_KEY_VALUE](ConstantOp::ATTR_KEY_VALUE) | [IntegerAttr] |
    ///
    /// Results:
    ///
    /// | result | description |
    /// |-----|-------|
    /// | `result` | integer of the value's type |
    ConstantOp,
    "constant",
    "hw"
);

impl ConstantOp {
    /// Attribute key for the constant value.
    pub const ATTR_KEY_VALUE: &'static str = "hw.constant.value";

    /// Create a new [ConstantOp] producing `value` as a `ty`.
    /// The underlying [Operation] is not linked to a [BasicBlock].
    pub fn new(ctx: &mut Context, ty: Ptr<TypeObj>, value: IntegerAttr) -> ConstantOp {
        let op = Operation::new(ctx, Self::get_opid_static(), vec![ty], vec![], 0);
        op.deref_mut(ctx)
            .attributes
            .set(Self::ATTR_KEY_VALUE, Box::new(value));
        ConstantOp { op }
    }

    /// Get the integer this constant defines.
    pub fn get_int_attr(&self, ctx: &Context) -> Option<IntegerAttr> {
        self.get_operation()
            .deref(ctx)
            .attributes
            .get_as::<IntegerAttr>(Self::ATTR_KEY_VALUE)
            .cloned()
    }
}

impl Printable for ConstantOp {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(
            f,
            "{} = {} {}",
            self.get_result(ctx).disp(ctx),
            self.get_opid().disp(ctx),
            self.get_value(ctx).disp(ctx)
        )
    }
}

#[derive(Error, Debug)]
pub enum ConstantOpVerifyErr {
    #[error("Constant value must be an integer attribute")]
    NotAnInteger,
    #[error("Constant value of type {value_ty} does not match result type {result_ty}")]
    TypeMismatch { value_ty: String, result_ty: String },
}

impl Verify for ConstantOp {
    fn verify(&self, ctx: &Context) -> Result<()> {
        let loc = self.get_operation().deref(ctx).loc();
        let Some(value) = self.get_int_attr(ctx) else {
            return verify_err!(loc, ConstantOpVerifyErr::NotAnInteger);
        };
        let value_ty = value.get_type();
        let result_ty = self.result_type(ctx);
        if value_ty != result_ty {
            return verify_err!(
                loc,
                ConstantOpVerifyErr::TypeMismatch {
                    value_ty: value_ty.disp(ctx).to_string(),
                    result_ty: result_ty.disp(ctx).to_string(),
                }
            );
        }
        value.verify(ctx)
    }
}

impl_op_interface!(ZeroOpdInterface for ConstantOp {});
impl_op_interface!(OneResultInterface for ConstantOp {});
impl_op_interface!(ConstantLikeInterface for ConstantOp {
    fn get_value(&self, ctx: &Context) -> AttrObj {
        self.get_operation()
            .deref(ctx)
            .attributes
            .get(Self::ATTR_KEY_VALUE)
            .cloned()
            .expect("hw.constant without a value")
    }
});

declare_op!(
    /// A constant whose value is a parameter expression,
    /// resolved against the parameters of the enclosing [HWModuleOp].
    ///
    /// Attributes:
    ///
    /// | key | value |
    /// |-----|-------|
    /// | [ATTR_KEY_VALUE](ParamValueOp::ATTR_KEY_VALUE) | any parameter value |
    ///
    /// Results:
    ///
    /// | result | description |
    /// |-----|-------|
    /// | `result` | any type |
    ParamValueOp,
    "param.value",
    "hw"
);

impl ParamValueOp {
    /// Attribute key for the parameter value.
    pub const ATTR_KEY_VALUE: &'static str = "hw.param.value";

    /// Create a new [ParamValueOp] producing `value` as a `ty`.
    /// The underlying [Operation] is not linked to a [BasicBlock].
    pub fn new(ctx: &mut Context, ty: Ptr<TypeObj>, value: AttrObj) -> ParamValueOp {
        let op = Operation::new(ctx, Self::get_opid_static(), vec![ty], vec![], 0);
        op.deref_mut(ctx)
            .attributes
            .set(Self::ATTR_KEY_VALUE, value);
        ParamValueOp { op }
    }
}

impl Printable for ParamValueOp {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(
            f,
            "{} = {} {} : {}",
            self.get_result(ctx).disp(ctx),
            self.get_opid().disp(ctx),
            self.get_value(ctx).disp(ctx),
            self.result_type(ctx).disp(ctx)
        )
    }
}

#[derive(Error, Debug)]
pub enum ParamValueOpVerifyErr {
    #[error("Parameter value has no value attribute")]
    MissingValue,
    #[error("Parameter value used outside of a hw.module")]
    NoEnclosingModule,
}

impl Verify for ParamValueOp {
    fn verify(&self, ctx: &Context) -> Result<()> {
        let op = &*self.get_operation().deref(ctx);
        let Some(value) = op.attributes.get(Self::ATTR_KEY_VALUE) else {
            return verify_err!(op.loc(), ParamValueOpVerifyErr::MissingValue);
        };
        let Some(module) = op.get_parent_op_of_type::<HWModuleOp>(ctx) else {
            return verify_err!(op.loc(), ParamValueOpVerifyErr::NoEnclosingModule);
        };
        check_parameter_in_context(ctx, &**value, &module.get_parameters(ctx), false, &op.loc())
            .inspect_err(|err| warn!("Rejected parameter value: {}", err.err))
    }
}

impl_op_interface!(ZeroOpdInterface for ParamValueOp {});
impl_op_interface!(OneResultInterface for ParamValueOp {});
impl_op_interface!(ConstantLikeInterface for ParamValueOp {
    fn get_value(&self, ctx: &Context) -> AttrObj {
        self.get_operation()
            .deref(ctx)
            .attributes
            .get(Self::ATTR_KEY_VALUE)
            .cloned()
            .expect("hw.param.value without a value")
    }
});

pub fn register(ctx: &mut Context, dialect: &mut Dialect) {
    HWModuleOp::register(ctx, dialect);
    ConstantOp::register(ctx, dialect);
    ParamValueOp::register(ctx, dialect);
}
