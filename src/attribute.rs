//! Attributes: constant data attached to operations, or standing
//! for a value (an integer literal, a parameter expression).
//!
//! Attributes are not interned. They are boxed as [AttrObj]s, compared
//! structurally with [Attribute::eq_attr] and cloned freely. Since they
//! can be hashed, interned types may carry them too.
//!
//! [impl_attr](crate::impl_attr) implements [Attribute] for a Rust type, and
//! [impl_attr_interface](crate::impl_attr_interface) attaches an interface,
//! so that [attr_cast] to it works and its verifier runs with the attribute's.

use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    ops::Deref,
};

use downcast_rs::{impl_downcast, Downcast};
use dyn_clone::DynClone;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::{
    common_traits::Verify,
    context::Context,
    dialect::{Dialect, DialectName},
    identifier::Identifier,
    printable::{self, fmt_iter, ListSeparator, Printable},
    result::Result,
    utils::trait_cast::any_to_trait,
};

pub trait Attribute: Printable + Verify + Downcast + DynClone {
    fn eq_attr(&self, other: &dyn Attribute) -> bool;

    /// Hash both the Rust type and the contents of `self` into `state`.
    fn hash_attr(&self, state: &mut dyn Hasher);

    fn get_attr_id(&self) -> AttrId;

    fn get_attr_id_static() -> AttrId
    where
        Self: Sized;

    /// Run the verifiers of every interface this attribute implements.
    fn verify_interfaces(&self, ctx: &Context) -> Result<()>;

    fn register_attr_in_dialect(dialect: &mut Dialect)
    where
        Self: Sized,
    {
        dialect.add_attr(Self::get_attr_id_static());
    }
}
impl_downcast!(Attribute);
dyn_clone::clone_trait_object!(Attribute);

pub type AttrObj = Box<dyn Attribute>;

impl PartialEq for AttrObj {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref().eq_attr(other.as_ref())
    }
}

impl Eq for AttrObj {}

impl Hash for AttrObj {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ref().hash_attr(state)
    }
}

impl Printable for AttrObj {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        self.as_ref().fmt(ctx, state, f)
    }
}

/// Verifies interfaces first, then the attribute itself.
impl Verify for AttrObj {
    fn verify(&self, ctx: &Context) -> Result<()> {
        let attr = self.as_ref();
        attr.verify_interfaces(ctx)?;
        attr.verify(ctx)
    }
}

/// View `attr` as the interface `T` (a `dyn Interface`), if it implements it.
pub fn attr_cast<T: ?Sized + 'static>(attr: &dyn Attribute) -> Option<&T> {
    any_to_trait::<T>(attr.as_any())
}

/// Name of an attribute kind within its dialect, e.g. `param.expr`.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct AttrName(Identifier);

impl AttrName {
    /// # Panics
    /// If `name` is not an [Identifier].
    pub fn new(name: &str) -> AttrName {
        match Identifier::try_from(name) {
            Ok(name) => AttrName(name),
            Err(err) => panic!("Bad attribute name: {err}"),
        }
    }
}

impl Display for AttrName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Deref for AttrName {
    type Target = String;

    fn deref(&self) -> &String {
        &self.0
    }
}

/// Fully qualified attribute kind, `<dialect>.<name>`.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct AttrId {
    pub dialect: DialectName,
    pub name: AttrName,
}

impl Display for AttrId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.dialect, self.name)
    }
}

crate::impl_printable_for_display!(AttrId);

/// Attributes of an [Operation](crate::operation::Operation), by key.
/// Keys are conventionally `<dialect>.<op>.<what>`, like `hw.constant.value`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AttributeDict(FxHashMap<String, AttrObj>);

impl AttributeDict {
    pub fn get(&self, key: &str) -> Option<&AttrObj> {
        self.0.get(key)
    }

    /// The attribute at `key`, if there is one and it is a `T`.
    pub fn get_as<T: Attribute>(&self, key: &str) -> Option<&T> {
        self.get(key)?.downcast_ref::<T>()
    }

    /// Insert `attr` at `key`, replacing what was there.
    pub fn set(&mut self, key: &str, attr: AttrObj) {
        self.0.insert(key.to_string(), attr);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Printable for AttributeDict {
    /// Prints `[key = attr, ...]`, sorted by key.
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        struct Entry<'a>(&'a str, &'a AttrObj);

        impl Printable for Entry<'_> {
            fn fmt(
                &self,
                ctx: &Context,
                state: &printable::State,
                f: &mut core::fmt::Formatter<'_>,
            ) -> core::fmt::Result {
                write!(f, "{} = ", self.0)?;
                self.1.fmt(ctx, state, f)
            }
        }

        let mut entries: Vec<_> = self.0.iter().map(|(key, attr)| Entry(key, attr)).collect();
        entries.sort_by_key(|entry| entry.0);
        write!(f, "[")?;
        fmt_iter(entries.iter(), ctx, state, ListSeparator::CharSpace(','), f)?;
        write!(f, "]")
    }
}

/// Type of the `verify` function every attribute interface defines.
pub type AttrInterfaceVerifier = fn(&dyn Attribute, &Context) -> Result<()>;

pub type AttrInterfaceVerifierInfo = (AttrId, AttrInterfaceVerifier);

#[doc(hidden)]
#[linkme::distributed_slice]
pub static ATTR_INTERFACE_VERIFIERS: [Lazy<AttrInterfaceVerifierInfo>] = [..];

#[doc(hidden)]
pub static ATTR_INTERFACE_VERIFIERS_MAP: Lazy<FxHashMap<AttrId, Vec<AttrInterfaceVerifier>>> =
    Lazy::new(|| {
        let mut by_attr = FxHashMap::<AttrId, Vec<AttrInterfaceVerifier>>::default();
        for (attr_id, verifier) in ATTR_INTERFACE_VERIFIERS.iter().map(|info| &**info) {
            by_attr.entry(attr_id.clone()).or_default().push(*verifier);
        }
        by_attr
    });

/// Implement [Attribute] for a type that already implements
/// [Printable], [Verify], [PartialEq], [Clone] and [Hash].
///
/// ```
/// # use arc_dialect::{
/// #     impl_attr, printable::{self, Printable},
/// #     context::Context, result::Result, common_traits::Verify,
/// #     attribute::{Attribute, AttrObj},
/// # };
/// #[derive(PartialEq, Eq, Clone, Hash)]
/// struct ResetValue(u64);
/// impl_attr!(
///     /// Value a register takes on reset.
///     ResetValue,
///     "reset_value",
///     "counter"
/// );
/// # impl Printable for ResetValue {
/// #    fn fmt(&self, _ctx: &Context, _state: &printable::State, f: &mut core::fmt::Formatter<'_>)
/// #        -> core::fmt::Result
/// #    {
/// #        write!(f, "{}", self.0)
/// #    }
/// # }
/// # impl Verify for ResetValue {
/// #   fn verify(&self, _ctx: &Context) -> Result<()> {
/// #        Ok(())
/// #    }
/// # }
/// let zero: AttrObj = Box::new(ResetValue(0));
/// assert!(zero.eq_attr(&ResetValue(0)));
/// assert!(!zero.eq_attr(&ResetValue(1)));
/// assert_eq!(zero.get_attr_id().to_string(), "counter.reset_value");
/// ```
#[macro_export]
macro_rules! impl_attr {
    (   $(#[$outer:meta])*
        $structname: ident, $attr_name: literal, $dialect_name: literal) => {
        $(#[$outer])*
        impl $crate::attribute::Attribute for $structname {
            fn eq_attr(&self, other: &dyn $crate::attribute::Attribute) -> bool {
                other.downcast_ref::<Self>().is_some_and(|other| other == self)
            }

            fn hash_attr(&self, mut state: &mut dyn std::hash::Hasher) {
                std::hash::Hash::hash(&std::any::TypeId::of::<Self>(), &mut state);
                std::hash::Hash::hash(self, &mut state);
            }

            fn get_attr_id(&self) -> $crate::attribute::AttrId {
                Self::get_attr_id_static()
            }

            fn get_attr_id_static() -> $crate::attribute::AttrId {
                $crate::attribute::AttrId {
                    dialect: $crate::dialect::DialectName::new($dialect_name),
                    name: $crate::attribute::AttrName::new($attr_name),
                }
            }

            fn verify_interfaces(&self, ctx: &$crate::context::Context) -> $crate::result::Result<()> {
                $crate::attribute::ATTR_INTERFACE_VERIFIERS_MAP
                    .get(&Self::get_attr_id_static())
                    .into_iter()
                    .flatten()
                    .try_for_each(|verify| verify(self, ctx))
            }
        }
    }
}

/// `impl $intr_name for $attr_name { ... }`, and register the interface's
/// `verify` (an [AttrInterfaceVerifier]) to run whenever the attribute is verified.
///
/// ```
/// # use arc_dialect::{
/// #     impl_attr, impl_attr_interface, printable::{self, Printable},
/// #     context::Context, result::Result, common_traits::Verify,
/// #     attribute::{Attribute, AttrObj, attr_cast},
/// # };
/// #[derive(PartialEq, Eq, Clone, Hash)]
/// struct ResetValue(u64);
/// impl_attr!(ResetValue, "reset_value", "counter");
/// trait Resettable: Attribute {
///     fn reset_to(&self) -> u64;
///     fn verify(_attr: &dyn Attribute, _ctx: &Context) -> Result<()>
///     where
///         Self: Sized,
///     {
///         Ok(())
///     }
/// }
/// impl_attr_interface!(Resettable for ResetValue {
///     fn reset_to(&self) -> u64 { self.0 }
/// });
/// let attr: AttrObj = Box::new(ResetValue(3));
/// assert_eq!(attr_cast::<dyn Resettable>(&*attr).map(|r| r.reset_to()), Some(3));
/// # impl Printable for ResetValue {
/// #    fn fmt(&self, _ctx: &Context, _state: &printable::State, f: &mut core::fmt::Formatter<'_>)
/// #        -> core::fmt::Result
/// #    {
/// #        write!(f, "{}", self.0)
/// #    }
/// # }
/// # impl Verify for ResetValue {
/// #   fn verify(&self, _ctx: &Context) -> Result<()> {
/// #        Ok(())
/// #    }
/// # }
/// ```
#[macro_export]
macro_rules! impl_attr_interface {
    ($intr_name:ident for $attr_name:ident { $($tt:tt)* }) => {
        $crate::type_to_trait!($attr_name, $intr_name);

        const _: () = {
            #[linkme::distributed_slice($crate::attribute::ATTR_INTERFACE_VERIFIERS)]
            static VERIFIER: once_cell::sync::Lazy<$crate::attribute::AttrInterfaceVerifierInfo> =
                once_cell::sync::Lazy::new(|| {
                    let verify: $crate::attribute::AttrInterfaceVerifier =
                        <$attr_name as $intr_name>::verify;
                    (<$attr_name as $crate::attribute::Attribute>::get_attr_id_static(), verify)
                });
        };

        impl $intr_name for $attr_name {
            $($tt)*
        }
    };
}
