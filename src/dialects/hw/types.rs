use apint::ApInt;

use crate::{
    attribute::AttrObj,
    common_traits::Verify,
    context::{Context, Ptr},
    dialect::Dialect,
    dialects::builtin::{
        attributes::IntegerAttr,
        types::{IntegerType, Signedness},
    },
    impl_type,
    printable::{self, Printable},
    r#type::{Type, TypeObj},
    result::Result,
};

/// An integer whose width is given by a parameter expression.
/// Similar to CIRCT's `hw.int`.
#[derive(Hash, Eq)]
pub struct IntType {
    width: AttrObj,
}

impl PartialEq for IntType {
    fn eq(&self, other: &Self) -> bool {
        self.width.eq(&other.width)
    }
}
impl_type!(IntType, "int", "hw");

impl IntType {
    /// Get or create an integer type of the given width.
    /// A constant width yields the signless builtin [IntegerType] instead.
    pub fn get(ctx: &mut Context, width: AttrObj) -> Ptr<TypeObj> {
        if let Some(const_width) = width
            .downcast_ref::<IntegerAttr>()
            .and_then(|int_attr| u32::try_from(ApInt::resize_to_i64(int_attr.value())).ok())
        {
            return IntegerType::get(ctx, const_width, Signedness::Signless);
        }
        Type::register_instance(IntType { width }, ctx)
    }

    /// The width expression.
    pub fn get_width(&self) -> &AttrObj {
        &self.width
    }
}

impl Printable for IntType {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "hw.int<")?;
        self.width.fmt(ctx, state, f)?;
        write!(f, ">")
    }
}

impl Verify for IntType {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.width.verify(ctx)
    }
}

pub fn register(dialect: &mut Dialect) {
    IntType::register_type_in_dialect(dialect);
}

#[cfg(test)]
mod tests {
    use apint::ApInt;

    use super::IntType;
    use crate::{
        context::Context,
        dialects::{
            builtin::{
                attributes::IntegerAttr,
                types::{IntegerType, Signedness},
            },
            hw::attributes::ParamDeclRefAttr,
        },
        printable::Printable,
    };

    #[test]
    fn constant_width_folds_to_builtin() {
        let ctx = &mut Context::new();
        let i32_ty = IntegerType::get(ctx, 32, Signedness::Signless);
        let eight = Box::new(IntegerAttr::new(i32_ty, ApInt::from_i32(8)));
        let i8_ty = IntType::get(ctx, eight);
        assert!(i8_ty == IntegerType::get(ctx, 8, Signedness::Signless));
    }

    #[test]
    fn parametric_width() {
        let ctx = &mut Context::new();
        let i32_ty = IntegerType::get(ctx, 32, Signedness::Signless);
        let width = || Box::new(ParamDeclRefAttr::new("WIDTH".try_into().unwrap(), i32_ty));
        let ty_1 = IntType::get(ctx, width());
        let ty_2 = IntType::get(ctx, width());
        assert!(ty_1 == ty_2);
        assert!(ty_1.deref(ctx).is::<IntType>());

        let depth = Box::new(ParamDeclRefAttr::new("DEPTH".try_into().unwrap(), i32_ty));
        assert!(IntType::get(ctx, depth) != ty_1);
        assert_eq!(
            ty_1.disp(ctx).to_string(),
            "hw.int<#hw.param.decl.ref<\"WIDTH\">: i32>"
        );
    }
}
