use std::hash::{Hash, Hasher};

use apint::{ApInt, Width};
use thiserror::Error;

use crate::{
    attribute::{AttrObj, Attribute},
    common_traits::Verify,
    context::{Context, Ptr},
    dialect::Dialect,
    impl_attr, impl_attr_interface,
    printable::{self, fmt_iter, ListSeparator, Printable},
    r#type::TypeObj,
    result::Result,
    verify_err_noloc,
};

use super::{attr_interfaces::TypedAttrInterface, types::IntegerType};

/// A string, printed quoted and escaped. Also used for symbol names.
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct StringAttr(String);
impl_attr!(StringAttr, "string", "builtin");

impl StringAttr {
    pub fn new(value: String) -> Self {
        StringAttr(value)
    }
}

impl From<StringAttr> for String {
    fn from(value: StringAttr) -> Self {
        value.0
    }
}

impl Printable for StringAttr {
    fn fmt(
        &self,
        _ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Verify for StringAttr {
    fn verify(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }
}

/// An integer literal of an [IntegerType], printed in hex (`0x7: i32`).
/// The value's width must match the type's.
#[derive(PartialEq, Eq, Clone)]
pub struct IntegerAttr {
    ty: Ptr<TypeObj>,
    val: ApInt,
}
impl_attr!(IntegerAttr, "integer", "builtin");

impl Hash for IntegerAttr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        format!("{:x}", self.val).hash(state);
    }
}

impl Printable for IntegerAttr {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "0x{:x}: {}", self.val, self.ty.disp(ctx))
    }
}

#[derive(Error, Debug)]
pub enum IntegerAttrVerifyErr {
    #[error("Value of IntegerAttr must be of IntegerType")]
    NotIntegerType,
    #[error("IntegerAttr value is {val_width} bits wide, but its type is {ty_width} bits wide")]
    WidthMismatch { val_width: usize, ty_width: u32 },
}

impl Verify for IntegerAttr {
    fn verify(&self, ctx: &Context) -> Result<()> {
        let ty = self.ty.deref(ctx);
        let Some(int_ty) = ty.downcast_ref::<IntegerType>() else {
            return verify_err_noloc!(IntegerAttrVerifyErr::NotIntegerType);
        };
        let val_width = self.val.width().to_usize();
        if val_width != int_ty.get_width() as usize {
            return verify_err_noloc!(IntegerAttrVerifyErr::WidthMismatch {
                val_width,
                ty_width: int_ty.get_width(),
            });
        }
        Ok(())
    }
}

impl IntegerAttr {
    pub fn new(ty: Ptr<TypeObj>, val: ApInt) -> Self {
        IntegerAttr { ty, val }
    }

    pub fn value(&self) -> &ApInt {
        &self.val
    }
}

impl From<IntegerAttr> for ApInt {
    fn from(value: IntegerAttr) -> Self {
        value.val
    }
}

impl_attr_interface!(TypedAttrInterface for IntegerAttr {
    fn get_type(&self) -> Ptr<TypeObj> {
        self.ty
    }
});

/// A double. Compared and hashed bitwise: identical `NaN`s are equal, `0.0` and `-0.0` are not.
#[derive(Clone, Copy, Debug)]
pub struct FloatAttr(f64);
impl_attr!(FloatAttr, "float", "builtin");

impl FloatAttr {
    pub fn new(value: f64) -> Self {
        FloatAttr(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for FloatAttr {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatAttr {}

impl Hash for FloatAttr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Printable for FloatAttr {
    fn fmt(
        &self,
        _ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "{:e}", self.0)
    }
}

impl Verify for FloatAttr {
    fn verify(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }
}

/// A type used as a value, e.g. as the type of a parameter declaration.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct TypeAttr(Ptr<TypeObj>);
impl_attr!(TypeAttr, "type", "builtin");

impl TypeAttr {
    pub fn new(ty: Ptr<TypeObj>) -> Self {
        TypeAttr(ty)
    }
}

impl Printable for TypeAttr {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        self.0.fmt(ctx, state, f)
    }
}

impl Verify for TypeAttr {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.0.verify(ctx)
    }
}

impl_attr_interface!(TypedAttrInterface for TypeAttr {
    fn get_type(&self) -> Ptr<TypeObj> {
        self.0
    }
});

/// A list of attributes, such as the parameters of a module.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct ArrayAttr(Vec<AttrObj>);
impl_attr!(ArrayAttr, "array", "builtin");

impl ArrayAttr {
    pub fn new(elems: Vec<AttrObj>) -> Self {
        ArrayAttr(elems)
    }

    pub fn elems(&self) -> &[AttrObj] {
        &self.0
    }
}

impl Printable for ArrayAttr {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "[")?;
        fmt_iter(self.0.iter(), ctx, state, ListSeparator::CharSpace(','), f)?;
        write!(f, "]")
    }
}

impl Verify for ArrayAttr {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.0.iter().try_for_each(|elem| elem.verify(ctx))
    }
}

pub fn register(dialect: &mut Dialect) {
    StringAttr::register_attr_in_dialect(dialect);
    IntegerAttr::register_attr_in_dialect(dialect);
    FloatAttr::register_attr_in_dialect(dialect);
    TypeAttr::register_attr_in_dialect(dialect);
    ArrayAttr::register_attr_in_dialect(dialect);
}
