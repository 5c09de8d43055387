//! A [Dialect] is a namespace of ops, types and attributes, such as `hw` or `arc`.
//!
//! Dialects may also know how to build constants: given a value and a type,
//! their [ConstantMaterializer] creates the op that defines that constant.
//! Code that folds ops across dialects goes through [Dialect::materialize_constant]
//! and never needs to know which op that is.

use std::{fmt::Display, ops::Deref, rc::Rc};

use rustc_hash::FxHashSet;

use crate::{
    attribute::{AttrId, Attribute},
    context::{Context, Ptr},
    identifier::Identifier,
    irbuild::inserter::IRInserter,
    location::Location,
    op::OpId,
    operation::Operation,
    printable::{self, Printable},
    r#type::{TypeId, TypeObj},
};

/// Name of a dialect. The prefix in `hw.constant`.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct DialectName(Identifier);

impl DialectName {
    /// # Panics
    /// If `name` is not an [Identifier].
    pub fn new(name: &str) -> DialectName {
        match Identifier::try_from(name) {
            Ok(name) => DialectName(name),
            Err(err) => panic!("Bad dialect name: {err}"),
        }
    }
}

impl Display for DialectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

crate::impl_printable_for_display!(DialectName);

impl Deref for DialectName {
    type Target = String;

    fn deref(&self) -> &String {
        &self.0
    }
}

/// Build a constant [Operation] for a value of a given type.
///
/// Implementations either insert exactly one operation at the inserter's
/// current position (without moving that position) and return it,
/// or insert nothing and return [None].
pub trait ConstantMaterializer {
    fn materialize_constant(
        &self,
        ctx: &mut Context,
        inserter: &mut IRInserter,
        value: &dyn Attribute,
        ty: Ptr<TypeObj>,
        loc: Location,
    ) -> Option<Ptr<Operation>>;
}

/// Everything registered under one [DialectName].
pub struct Dialect {
    pub name: DialectName,
    pub ops: FxHashSet<OpId>,
    pub types: FxHashSet<TypeId>,
    pub attributes: FxHashSet<AttrId>,
    constant_materializer: Option<Rc<dyn ConstantMaterializer>>,
}

impl Printable for Dialect {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        Printable::fmt(&self.name, ctx, state, f)
    }
}

impl Dialect {
    /// A dialect with nothing in it, not yet known to any [Context].
    pub fn new(name: DialectName) -> Dialect {
        Dialect {
            name,
            ops: FxHashSet::default(),
            types: FxHashSet::default(),
            attributes: FxHashSet::default(),
            constant_materializer: None,
        }
    }

    /// Hand the dialect over to `ctx`.
    /// If `ctx` already has a dialect of this name, that one is kept.
    pub fn register(self, ctx: &mut Context) {
        ctx.dialects.entry(self.name.clone()).or_insert(self);
    }

    pub fn add_op(&mut self, op: OpId) {
        assert!(op.dialect == self.name, "{op} does not belong to {}", self.name);
        self.ops.insert(op);
    }

    pub fn add_type(&mut self, ty: TypeId) {
        assert!(ty.dialect == self.name, "{ty} does not belong to {}", self.name);
        self.types.insert(ty);
    }

    pub fn add_attr(&mut self, attr: AttrId) {
        assert!(attr.dialect == self.name, "{attr} does not belong to {}", self.name);
        self.attributes.insert(attr);
    }

    /// Install the hook used by [Dialect::materialize_constant].
    /// Replaces any previously installed hook.
    pub fn set_constant_materializer(&mut self, materializer: impl ConstantMaterializer + 'static) {
        self.constant_materializer = Some(Rc::new(materializer));
    }

    pub fn has_constant_materializer(&self) -> bool {
        self.constant_materializer.is_some()
    }

    /// The dialect `ctx` has registered as `name`.
    pub fn get_ref<'a>(ctx: &'a Context, name: &DialectName) -> Option<&'a Dialect> {
        ctx.dialects.get(name)
    }

    /// Ask the registered dialect `dialect` to materialize `value` as a constant of type `ty`
    /// at the current position of `inserter`.
    ///
    /// Returns [None] if the dialect isn't registered, has no [ConstantMaterializer],
    /// or its materializer declines.
    pub fn materialize_constant(
        ctx: &mut Context,
        dialect: &DialectName,
        inserter: &mut IRInserter,
        value: &dyn Attribute,
        ty: Ptr<TypeObj>,
        loc: Location,
    ) -> Option<Ptr<Operation>> {
        let materializer = ctx.dialects.get(dialect)?.constant_materializer.clone()?;
        materializer.materialize_constant(ctx, inserter, value, ty, loc)
    }
}

#[cfg(test)]
mod tests {
    use apint::ApInt;

    use crate::{
        attribute::Attribute,
        context::{Context, Ptr},
        dialect::{ConstantMaterializer, Dialect, DialectName},
        dialects::builtin::{
            self,
            attributes::IntegerAttr,
            ops::ModuleOp,
            types::{IntegerType, Signedness},
        },
        irbuild::inserter::IRInserter,
        location::Location,
        operation::Operation,
        printable::Printable,
        r#type::TypeObj,
    };

    struct Declines;

    impl ConstantMaterializer for Declines {
        fn materialize_constant(
            &self,
            _ctx: &mut Context,
            _inserter: &mut IRInserter,
            _value: &dyn Attribute,
            _ty: Ptr<TypeObj>,
            _loc: Location,
        ) -> Option<Ptr<Operation>> {
            None
        }
    }

    #[test]
    fn materializer_lookup() {
        let ctx = &mut Context::new();
        builtin::register(ctx);

        let i64_ty = IntegerType::get(ctx, 64, Signedness::Signless);
        let value = IntegerAttr::new(i64_ty, ApInt::from_i64(3));
        let module = ModuleOp::new(ctx, "top");
        let mut inserter = IRInserter::new_at_block_end(module.get_body(ctx));

        let builtin_name = DialectName::new("builtin");
        // builtin has no hook.
        assert!(Dialect::materialize_constant(
            ctx,
            &builtin_name,
            &mut inserter,
            &value,
            i64_ty,
            Location::Unknown
        )
        .is_none());
        // Neither does an unregistered dialect.
        assert!(Dialect::materialize_constant(
            ctx,
            &DialectName::new("nowhere"),
            &mut inserter,
            &value,
            i64_ty,
            Location::Unknown
        )
        .is_none());

        let mut test_dialect = Dialect::new(DialectName::new("test"));
        test_dialect.set_constant_materializer(Declines);
        assert!(test_dialect.has_constant_materializer());
        test_dialect.register(ctx);
        assert!(Dialect::materialize_constant(
            ctx,
            &DialectName::new("test"),
            &mut inserter,
            &value,
            i64_ty,
            Location::Unknown
        )
        .is_none());
        assert_eq!(
            Dialect::get_ref(ctx, &builtin_name).unwrap().disp(ctx).to_string(),
            "builtin"
        );
    }
}
