use thiserror::Error;

use crate::{
    common_traits::Verify,
    context::{Context, Ptr},
    dialect::Dialect,
    impl_type,
    printable::{self, Printable},
    r#type::{Type, TypeObj},
    result::Result,
    verify_err_noloc,
};

/// How the bits of an [IntegerType] are interpreted.
/// Hardware values are almost always [Signless](Signedness::Signless).
#[derive(Hash, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Signedness {
    Signed,
    Unsigned,
    Signless,
}

impl Signedness {
    fn prefix(self) -> &'static str {
        match self {
            Signedness::Signed => "si",
            Signedness::Unsigned => "ui",
            Signedness::Signless => "i",
        }
    }
}

/// Integers of any fixed, non-zero width, printed as `i8`, `si16`, `ui32`...
#[derive(Hash, PartialEq, Eq, Debug)]
pub struct IntegerType {
    width: u32,
    signedness: Signedness,
}
impl_type!(IntegerType, "integer", "builtin");

impl IntegerType {
    /// The interned integer type of this `width` and `signedness`.
    pub fn get(ctx: &mut Context, width: u32, signedness: Signedness) -> Ptr<TypeObj> {
        Type::register_instance(IntegerType { width, signedness }, ctx)
    }

    /// Like [get](Self::get), but never interns a new type.
    pub fn get_existing(ctx: &Context, width: u32, signedness: Signedness) -> Option<Ptr<TypeObj>> {
        Type::get_instance(IntegerType { width, signedness }, ctx)
    }

    pub fn get_width(&self) -> u32 {
        self.width
    }

    pub fn get_signedness(&self) -> Signedness {
        self.signedness
    }
}

impl Printable for IntegerType {
    fn fmt(
        &self,
        _ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "{}{}", self.signedness.prefix(), self.width)
    }
}

#[derive(Error, Debug)]
#[error("Integer types cannot be zero bits wide")]
pub struct ZeroWidthIntegerErr;

impl Verify for IntegerType {
    fn verify(&self, _ctx: &Context) -> Result<()> {
        match self.width {
            0 => verify_err_noloc!(ZeroWidthIntegerErr),
            _ => Ok(()),
        }
    }
}

pub fn register(dialect: &mut Dialect) {
    IntegerType::register_type_in_dialect(dialect);
}

#[cfg(test)]
mod tests {
    use super::{IntegerType, Signedness};
    use crate::{common_traits::Verify, context::Context, printable::Printable};

    #[test]
    fn integer_types_are_interned() {
        let ctx = &mut Context::new();
        let i8_ty = IntegerType::get(ctx, 8, Signedness::Signless);
        let si8_ty = IntegerType::get(ctx, 8, Signedness::Signed);
        let i16_ty = IntegerType::get(ctx, 16, Signedness::Signless);

        assert!(IntegerType::get(ctx, 8, Signedness::Signless) == i8_ty);
        assert!(i8_ty != si8_ty && i8_ty != i16_ty);
        assert!(IntegerType::get_existing(ctx, 16, Signedness::Signless) == Some(i16_ty));
        assert!(IntegerType::get_existing(ctx, 16, Signedness::Unsigned).is_none());

        let printed: Vec<_> = [i8_ty, si8_ty, IntegerType::get(ctx, 1, Signedness::Unsigned)]
            .iter()
            .map(|ty| ty.disp(ctx).to_string())
            .collect();
        assert_eq!(printed, ["i8", "si8", "ui1"]);
    }

    #[test]
    fn zero_width_rejected() {
        let ctx = &mut Context::new();
        let i0 = IntegerType::get(ctx, 0, Signedness::Signless);
        assert!(i0.verify(ctx).is_err());
        assert!(IntegerType::get(ctx, 1, Signedness::Signless).verify(ctx).is_ok());
    }
}
