//! Checking parameter values against the parameters a module declares.

use log::{debug, trace};
use thiserror::Error;

use crate::{
    attribute::Attribute,
    context::Context,
    dialects::builtin::{
        attr_interfaces::TypedAttrInterface,
        attributes::{FloatAttr, IntegerAttr, StringAttr},
    },
    location::Location,
    printable::Printable,
    result::Result,
    verify_err,
};

use super::{
    attributes::{
        ParamDeclAttr, ParamDeclRefAttr, ParamExprArityErr, ParamExprAttr, ParamVerbatimAttr,
    },
    ops::HWModuleOp,
};

#[derive(Error, Debug)]
pub enum ParamCheckErr {
    #[error("parameter {name} used with type {used}; should have type {declared}")]
    TypeMismatch {
        name: String,
        used: String,
        declared: String,
    },
    #[error("use of unknown parameter {0}")]
    UnknownParameter(String),
    #[error("parameter reference {0} is not allowed here")]
    ReferenceNotAllowed(String),
    #[error("invalid parameter value {0}")]
    InvalidValue(String),
    #[error(transparent)]
    MalformedExpr(#[from] ParamExprArityErr),
}

/// Check that `value` is a well formed parameter value whose references all
/// resolve to one of `module_params`, with matching types.
/// With `disallow_param_refs`, any reference at all is an error.
pub fn check_parameter_in_context(
    ctx: &Context,
    value: &dyn Attribute,
    module_params: &[ParamDeclAttr],
    disallow_param_refs: bool,
    loc: &Location,
) -> Result<()> {
    // Literals are always fine.
    if value.is::<IntegerAttr>()
        || value.is::<FloatAttr>()
        || value.is::<StringAttr>()
        || value.is::<ParamVerbatimAttr>()
    {
        return Ok(());
    }

    if let Some(expr) = value.downcast_ref::<ParamExprAttr>() {
        if !expr.is_well_formed() {
            return verify_err!(
                loc.clone(),
                ParamCheckErr::MalformedExpr(ParamExprArityErr {
                    opcode: expr.get_opcode(),
                    num_operands: expr.get_operands().len(),
                })
            );
        }
        return expr.get_operands().iter().try_for_each(|operand| {
            check_parameter_in_context(ctx, &**operand, module_params, disallow_param_refs, loc)
        });
    }

    if let Some(param_ref) = value.downcast_ref::<ParamDeclRefAttr>() {
        let name = param_ref.get_name();
        if disallow_param_refs {
            return verify_err!(
                loc.clone(),
                ParamCheckErr::ReferenceNotAllowed(name.to_string())
            );
        }

        let ref_ty = param_ref.get_type();
        return match module_params.iter().find(|decl| decl.get_name() == name) {
            Some(decl) if decl.get_type() == ref_ty => {
                trace!("Parameter {} resolved", name);
                Ok(())
            }
            Some(decl) => verify_err!(
                loc.clone(),
                ParamCheckErr::TypeMismatch {
                    name: name.to_string(),
                    used: ref_ty.disp(ctx).to_string(),
                    declared: decl.get_type().disp(ctx).to_string(),
                }
            ),
            None => verify_err!(
                loc.clone(),
                ParamCheckErr::UnknownParameter(name.to_string())
            ),
        };
    }

    verify_err!(
        loc.clone(),
        ParamCheckErr::InvalidValue(value.disp(ctx).to_string())
    )
}

/// Is `value` a valid parameter value inside `module`?
/// Collapses [check_parameter_in_context] to a yes or no.
pub fn is_valid_parameter_expression(
    ctx: &Context,
    value: &dyn Attribute,
    module: HWModuleOp,
) -> bool {
    let params = module.get_parameters(ctx);
    match check_parameter_in_context(ctx, value, &params, false, &Location::Unknown) {
        Ok(()) => true,
        Err(err) => {
            debug!("Not a valid parameter expression: {}", err.err);
            false
        }
    }
}
