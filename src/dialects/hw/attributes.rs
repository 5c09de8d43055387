//! Parameter attributes: declarations of module parameters,
//! references to them, and symbolic expressions over them.
//!
//! See CIRCT's [HW parameters](https://circt.llvm.org/docs/Dialects/HW/RationaleHW/#parameterized-modules).

use std::fmt::Display;

use thiserror::Error;

use crate::{
    attribute::{AttrObj, Attribute},
    common_traits::Verify,
    context::{Context, Ptr},
    dialect::Dialect,
    dialects::builtin::attr_interfaces::TypedAttrInterface,
    identifier::Identifier,
    impl_attr, impl_attr_interface,
    printable::{self, fmt_iter, ListSeparator, Printable},
    r#type::TypeObj,
    result::Result,
    verify_err_noloc,
};

/// A parameter declared by a module: a name, a type and an optional default value.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct ParamDeclAttr {
    name: Identifier,
    ty: Ptr<TypeObj>,
    value: Option<AttrObj>,
}
impl_attr!(ParamDeclAttr, "param.decl", "hw");

impl ParamDeclAttr {
    /// Declare a parameter without a default value.
    pub fn new(name: Identifier, ty: Ptr<TypeObj>) -> Self {
        ParamDeclAttr {
            name,
            ty,
            value: None,
        }
    }

    /// Declare a parameter with a default value.
    pub fn new_with_default(name: Identifier, ty: Ptr<TypeObj>, value: AttrObj) -> Self {
        ParamDeclAttr {
            name,
            ty,
            value: Some(value),
        }
    }

    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    /// The default value, if any.
    pub fn get_value(&self) -> Option<&AttrObj> {
        self.value.as_ref()
    }
}

impl Printable for ParamDeclAttr {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty.disp(ctx))?;
        if let Some(value) = &self.value {
            write!(f, " = ")?;
            value.fmt(ctx, state, f)?;
        }
        Ok(())
    }
}

impl Verify for ParamDeclAttr {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.value.iter().try_for_each(|value| value.verify(ctx))
    }
}

impl_attr_interface!(TypedAttrInterface for ParamDeclAttr {
    fn get_type(&self) -> Ptr<TypeObj> {
        self.ty
    }
});

/// A use of a parameter declared by the enclosing module.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct ParamDeclRefAttr {
    name: Identifier,
    ty: Ptr<TypeObj>,
}
impl_attr!(ParamDeclRefAttr, "param.decl.ref", "hw");

impl ParamDeclRefAttr {
    pub fn new(name: Identifier, ty: Ptr<TypeObj>) -> Self {
        ParamDeclRefAttr { name, ty }
    }

    /// Name of the referenced parameter.
    pub fn get_name(&self) -> &Identifier {
        &self.name
    }
}

impl Printable for ParamDeclRefAttr {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "#hw.param.decl.ref<{:?}>: {}", self.name.as_str(), self.ty.disp(ctx))
    }
}

impl Verify for ParamDeclRefAttr {
    fn verify(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }
}

impl_attr_interface!(TypedAttrInterface for ParamDeclRefAttr {
    fn get_type(&self) -> Ptr<TypeObj> {
        self.ty
    }
});

/// Operators of a [ParamExprAttr].
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum ParamExprOpcode {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    Shl,
    ShrU,
    ShrS,
    DivU,
    DivS,
    ModU,
    ModS,
    CLog2,
    StrConcat,
}

impl ParamExprOpcode {
    /// Name of the opcode, as printed.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamExprOpcode::Add => "add",
            ParamExprOpcode::Sub => "sub",
            ParamExprOpcode::Mul => "mul",
            ParamExprOpcode::And => "and",
            ParamExprOpcode::Or => "or",
            ParamExprOpcode::Xor => "xor",
            ParamExprOpcode::Shl => "shl",
            ParamExprOpcode::ShrU => "shru",
            ParamExprOpcode::ShrS => "shrs",
            ParamExprOpcode::DivU => "divu",
            ParamExprOpcode::DivS => "divs",
            ParamExprOpcode::ModU => "modu",
            ParamExprOpcode::ModS => "mods",
            ParamExprOpcode::CLog2 => "clog2",
            ParamExprOpcode::StrConcat => "str.concat",
        }
    }

    /// Is `num_operands` an acceptable number of operands for this opcode?
    pub fn accepts_arity(&self, num_operands: usize) -> bool {
        match self {
            ParamExprOpcode::CLog2 => num_operands == 1,
            ParamExprOpcode::Add
            | ParamExprOpcode::Mul
            | ParamExprOpcode::And
            | ParamExprOpcode::Or
            | ParamExprOpcode::Xor
            | ParamExprOpcode::StrConcat => num_operands >= 2,
            ParamExprOpcode::Sub
            | ParamExprOpcode::Shl
            | ParamExprOpcode::ShrU
            | ParamExprOpcode::ShrS
            | ParamExprOpcode::DivU
            | ParamExprOpcode::DivS
            | ParamExprOpcode::ModU
            | ParamExprOpcode::ModS => num_operands == 2,
        }
    }
}

impl Display for ParamExprOpcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A symbolic expression over parameters and literals.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct ParamExprAttr {
    opcode: ParamExprOpcode,
    operands: Vec<AttrObj>,
    ty: Ptr<TypeObj>,
}
impl_attr!(ParamExprAttr, "param.expr", "hw");

impl ParamExprAttr {
    /// Build an expression. The operand count isn't checked here,
    /// verification and parameter checks reject a malformed one.
    pub fn new(opcode: ParamExprOpcode, operands: Vec<AttrObj>, ty: Ptr<TypeObj>) -> Self {
        ParamExprAttr {
            opcode,
            operands,
            ty,
        }
    }

    pub fn get_opcode(&self) -> ParamExprOpcode {
        self.opcode
    }

    pub fn get_operands(&self) -> &[AttrObj] {
        &self.operands
    }

    /// Does the operand count match what the opcode needs?
    pub fn is_well_formed(&self) -> bool {
        self.opcode.accepts_arity(self.operands.len())
    }
}

impl Printable for ParamExprAttr {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "#hw.param.expr.{}<", self.opcode)?;
        fmt_iter(self.operands.iter(), ctx, state, ListSeparator::CharSpace(','), f)?;
        write!(f, ">: {}", self.ty.disp(ctx))
    }
}

#[derive(Error, Debug)]
#[error("Parameter expression {opcode} cannot have {num_operands} operand(s)")]
pub struct ParamExprArityErr {
    pub opcode: ParamExprOpcode,
    pub num_operands: usize,
}

impl Verify for ParamExprAttr {
    fn verify(&self, ctx: &Context) -> Result<()> {
        if !self.is_well_formed() {
            return verify_err_noloc!(ParamExprArityErr {
                opcode: self.opcode,
                num_operands: self.operands.len(),
            });
        }
        self.operands
            .iter()
            .try_for_each(|operand| operand.verify(ctx))
    }
}

impl_attr_interface!(TypedAttrInterface for ParamExprAttr {
    fn get_type(&self) -> Ptr<TypeObj> {
        self.ty
    }
});

/// Opaque text standing for a parameter value.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct ParamVerbatimAttr {
    text: String,
    ty: Ptr<TypeObj>,
}
impl_attr!(ParamVerbatimAttr, "param.verbatim", "hw");

impl ParamVerbatimAttr {
    pub fn new(text: String, ty: Ptr<TypeObj>) -> Self {
        ParamVerbatimAttr { text, ty }
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }
}

impl Printable for ParamVerbatimAttr {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "#hw.param.verbatim<{:?}>: {}", self.text, self.ty.disp(ctx))
    }
}

impl Verify for ParamVerbatimAttr {
    fn verify(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }
}

impl_attr_interface!(TypedAttrInterface for ParamVerbatimAttr {
    fn get_type(&self) -> Ptr<TypeObj> {
        self.ty
    }
});

pub fn register(dialect: &mut Dialect) {
    ParamDeclAttr::register_attr_in_dialect(dialect);
    ParamDeclRefAttr::register_attr_in_dialect(dialect);
    ParamExprAttr::register_attr_in_dialect(dialect);
    ParamVerbatimAttr::register_attr_in_dialect(dialect);
}

#[cfg(test)]
mod tests {
    use super::ParamExprOpcode;

    #[test]
    fn opcode_arity() {
        assert!(ParamExprOpcode::CLog2.accepts_arity(1));
        assert!(!ParamExprOpcode::CLog2.accepts_arity(2));
        assert!(ParamExprOpcode::Add.accepts_arity(3));
        assert!(!ParamExprOpcode::Add.accepts_arity(1));
        assert!(ParamExprOpcode::Sub.accepts_arity(2));
        assert!(!ParamExprOpcode::Sub.accepts_arity(3));
        assert!(!ParamExprOpcode::StrConcat.accepts_arity(0));
        assert_eq!(ParamExprOpcode::StrConcat.to_string(), "str.concat");
    }
}
