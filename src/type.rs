//! Every SSA value, such as operation results or block arguments
//! has a type defined by the type system.
//!
//! The type system is open, with no fixed list of types,
//! and there are no restrictions on the abstractions they represent.
//!
//! See [MLIR Types](https://mlir.llvm.org/docs/DefiningDialects/AttributesAndTypes/#types)
//!
//! The [impl_type](crate::impl_type) macro can be used to implement [Type] for a rust type.
//! Types are uniqued in the [Context]: requesting the same type twice yields the same
//! [`Ptr<TypeObj>`](Ptr).

use std::{fmt::Display, ops::Deref};

use downcast_rs::{impl_downcast, Downcast};

use crate::{
    common_traits::Verify,
    context::{private::ArenaObj, ArenaCell, Context, Ptr},
    dialect::{Dialect, DialectName},
    identifier::Identifier,
    printable::{self, Printable},
    result::Result,
    storage_uniquer::TypeValueHash,
};

/// Basic functionality that every type in the IR must implement.
/// Type objects (instances of a Type) are (mostly) immutable once created,
/// and are uniqued globally. Uniquing is based on the type name (i.e.,
/// the rust type being defined) and its contents.
///
/// So, for example, if we have
/// ```rust,ignore
/// struct IntType {
///     width: u64
/// }
/// ```
/// the uniquing will include
///   - [`std::any::TypeId::of::<IntType>()`](std::any::TypeId)
///   - `width`
pub trait Type: Printable + Verify + Downcast {
    /// Compute and get the hash for this instance of Self.
    fn hash_type(&self) -> TypeValueHash;
    /// Is self equal to an other Type?
    fn eq_type(&self, other: &dyn Type) -> bool;

    /// Get a copyable pointer to this type. Unlike in other [ArenaObj]s,
    /// we do not store a self pointer inside the object itself
    /// because that can upset taking automatic hashes of the object.
    fn get_self_ptr(&self, ctx: &Context) -> Ptr<TypeObj> {
        let idx = ctx
            .type_store
            .lookup(self.hash_type(), |other| self.eq_type(&**other))
            .expect("Unregistered type object in existence");
        Ptr::from_index(idx)
    }

    /// Register an instance of a type in the provided [Context]
    /// Returns a pointer to self. If the type was already registered,
    /// a pointer to the existing object is returned.
    fn register_instance(t: Self, ctx: &mut Context) -> Ptr<TypeObj>
    where
        Self: Sized,
    {
        let hash = t.hash_type();
        let idx = ctx
            .type_store
            .intern(Box::new(t), hash, |t1, t2| t1.eq_type(&**t2));
        Ptr::from_index(idx)
    }

    /// If an instance of `t` already exists, get a [Ptr] to it.
    /// Consumes `t` either way.
    fn get_instance(t: Self, ctx: &Context) -> Option<Ptr<TypeObj>>
    where
        Self: Sized,
    {
        ctx.type_store
            .lookup(t.hash_type(), |other| t.eq_type(&**other))
            .map(Ptr::from_index)
    }

    /// Get a Type's static name. This is *not* per instance.
    fn get_type_id(&self) -> TypeId;

    /// Get a Type's static name. This is *not* per instance.
    fn get_type_id_static() -> TypeId
    where
        Self: Sized;

    /// Register this type's [TypeId] in the dialect it belongs to.
    fn register_type_in_dialect(dialect: &mut Dialect)
    where
        Self: Sized,
    {
        dialect.add_type(Self::get_type_id_static());
    }
}
impl_downcast!(Type);

/// Since we can't store the [Type] trait in the arena,
/// we store boxed dyn objects of it instead.
pub type TypeObj = Box<dyn Type>;

impl PartialEq for TypeObj {
    fn eq(&self, other: &Self) -> bool {
        (**self).eq_type(&**other)
    }
}

impl Eq for TypeObj {}

impl Printable for TypeObj {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        (**self).fmt(ctx, state, f)
    }
}

impl Verify for TypeObj {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.as_ref().verify(ctx)
    }
}

impl ArenaObj for TypeObj {
    fn get_arena(ctx: &Context) -> &ArenaCell<Self> {
        &ctx.type_store.arena
    }

    fn get_arena_mut(ctx: &mut Context) -> &mut ArenaCell<Self> {
        &mut ctx.type_store.arena
    }

    fn get_self_ptr(&self, ctx: &Context) -> Ptr<Self> {
        self.as_ref().get_self_ptr(ctx)
    }

    fn dealloc_sub_objects(_ptr: Ptr<Self>, _ctx: &mut Context) {
        panic!("Cannot dealloc arena sub-objects of types")
    }
}

/// A [Type]'s name (not including its dialect).
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct TypeName(Identifier);

impl TypeName {
    /// Create a new TypeName.
    pub fn new(name: &str) -> TypeName {
        TypeName(Identifier::try_from(name).expect("Type name must be an identifier"))
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for TypeName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A combination of a Type's name and its dialect.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct TypeId {
    pub dialect: DialectName,
    pub name: TypeName,
}

impl Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.dialect, self.name)
    }
}

crate::impl_printable_for_display!(TypeId);

/// Every entity that has a type must implement this.
pub trait Typed {
    fn get_type(&self, ctx: &Context) -> Ptr<TypeObj>;
}

impl Typed for Ptr<TypeObj> {
    fn get_type(&self, _ctx: &Context) -> Ptr<TypeObj> {
        *self
    }
}

/// impl [Type] for a rust type.
///
/// Usage:
/// ```
/// #[derive(Hash, PartialEq, Eq)]
/// struct MyType { }
/// impl_type!(
///     /// MyType is mine
///     MyType,
///     "name",
///     "dialect"
/// );
/// # use arc_dialect::{
/// #     impl_type, printable::{self, Printable}, context::Context,
/// #     result::Result, common_traits::Verify,
/// # };
/// # impl Printable for MyType {
/// #    fn fmt(&self, _ctx: &Context, _state: &printable::State, f: &mut core::fmt::Formatter<'_>)
/// #        -> core::fmt::Result
/// #    {
/// #        write!(f, "my")
/// #    }
/// # }
/// # impl Verify for MyType {
/// #   fn verify(&self, _ctx: &Context) -> Result<()> {
/// #        Ok(())
/// #    }
/// # }
/// ```
/// **Note**: pre-requisite traits for [Type] must already be implemented.
///     Additionally, [Hash](core::hash::Hash) and [Eq] must be implemented by the rust type.
#[macro_export]
macro_rules! impl_type {
    (   $(#[$outer:meta])*
        $structname: ident, $type_name: literal, $dialect_name: literal) => {
        $(#[$outer])*
        impl $crate::r#type::Type for $structname {
            fn hash_type(&self) -> $crate::storage_uniquer::TypeValueHash {
                $crate::storage_uniquer::TypeValueHash::new(self)
            }

            fn eq_type(&self, other: &dyn $crate::r#type::Type) -> bool {
                other
                    .downcast_ref::<Self>()
                    .map_or(false, |other| other == self)
            }

            fn get_type_id(&self) -> $crate::r#type::TypeId {
                Self::get_type_id_static()
            }

            fn get_type_id_static() -> $crate::r#type::TypeId {
                $crate::r#type::TypeId {
                    name: $crate::r#type::TypeName::new($type_name),
                    dialect: $crate::dialect::DialectName::new($dialect_name),
                }
            }
        }
    }
}
