use std::fmt::Display;

use crate::{
    attribute::Attribute,
    context::Context,
    dialect::Dialect,
    impl_attr, impl_verify_succ,
    printable::{self, Printable},
};

/// Which end of an integer `arc.zero_count` counts zeros from.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum ZeroCountPredicate {
    Leading,
    Trailing,
}

impl Display for ZeroCountPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZeroCountPredicate::Leading => write!(f, "leading"),
            ZeroCountPredicate::Trailing => write!(f, "trailing"),
        }
    }
}

/// A [ZeroCountPredicate], as an attribute.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub struct ZeroCountPredicateAttr(pub ZeroCountPredicate);
impl_attr!(ZeroCountPredicateAttr, "zero_count_predicate", "arc");

impl Printable for ZeroCountPredicateAttr {
    fn fmt(
        &self,
        _ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "#arc<zero_count_predicate {}>", self.0)
    }
}

impl_verify_succ!(ZeroCountPredicateAttr);

pub fn register(dialect: &mut Dialect) {
    ZeroCountPredicateAttr::register_attr_in_dialect(dialect);
}
