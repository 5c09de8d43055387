//! Properties shared by [Attribute]s of different kinds.
//! Attach one with [impl_attr_interface](crate::impl_attr_interface).

use crate::{
    attribute::Attribute,
    context::{Context, Ptr},
    r#type::TypeObj,
    result::Result,
};

/// Attributes that denote a value of some IR type: integer
/// literals, parameter references and expressions.
pub trait TypedAttrInterface: Attribute {
    fn get_type(&self) -> Ptr<TypeObj>;

    fn verify(_attr: &dyn Attribute, _ctx: &Context) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}
