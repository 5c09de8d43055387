//! Casting `&dyn Any` to `&dyn Trait`.
//!
//! Rust cannot ask an `Any` whether its concrete type implements some trait.
//! Instead, every (type, trait) pair that should be castable registers a
//! caster with [type_to_trait](crate::type_to_trait), at link time, and
//! [any_to_trait] looks the pair up. Interface casts of ops and attributes
//! go through here.

use std::any::{Any, TypeId};

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Key of a caster: the concrete type and the `dyn Trait` it casts to.
pub type CastKey = (TypeId, TypeId);

/// A caster, stored as `&'static fn(&dyn Any) -> Option<&dyn Trait>` behind `Any`.
pub type TraitCasterInfo = (CastKey, &'static (dyn Any + Sync + Send));

#[doc(hidden)]
#[linkme::distributed_slice]
pub static TRAIT_CASTERS: [Lazy<TraitCasterInfo>] = [..];

static CASTERS_BY_KEY: Lazy<FxHashMap<CastKey, &'static (dyn Any + Sync + Send)>> =
    Lazy::new(|| TRAIT_CASTERS.iter().map(|entry| **entry).collect());

type Caster<T> = for<'a> fn(&'a (dyn Any + 'static)) -> Option<&'a T>;

/// View `r` as a `&T`, where `T` is a `dyn Trait`.
/// [None] unless `r`'s concrete type was registered with
/// [type_to_trait](crate::type_to_trait) for that trait.
///
/// ```
/// # use arc_dialect::{type_to_trait, utils::trait_cast::any_to_trait};
/// # use std::any::Any;
/// trait Clocked {
///     fn period(&self) -> u32;
/// }
/// struct Counter;
/// impl Clocked for Counter {
///     fn period(&self) -> u32 { 10 }
/// }
/// type_to_trait!(Counter, Clocked);
/// struct Wire;
///
/// let counter: &dyn Any = &Counter;
/// assert_eq!(any_to_trait::<dyn Clocked>(counter).map(|c| c.period()), Some(10));
/// let wire: &dyn Any = &Wire;
/// assert!(any_to_trait::<dyn Clocked>(wire).is_none());
/// ```
pub fn any_to_trait<T: ?Sized + 'static>(r: &dyn Any) -> Option<&T> {
    let caster = CASTERS_BY_KEY.get(&(r.type_id(), TypeId::of::<T>()))?;
    let caster = caster.downcast_ref::<Caster<T>>()?;
    caster(r)
}

/// Make `$ty_name` castable to `dyn $to_trait_name` with [any_to_trait](crate::utils::trait_cast::any_to_trait).
#[macro_export]
macro_rules! type_to_trait {
    ($ty_name:ty, $to_trait_name:path) => {
        const _: () = {
            fn cast<'a>(
                r: &'a (dyn std::any::Any + 'static),
            ) -> Option<&'a (dyn $to_trait_name + 'static)> {
                r.downcast_ref::<$ty_name>()
                    .map(|concrete| concrete as &dyn $to_trait_name)
            }

            #[linkme::distributed_slice($crate::utils::trait_cast::TRAIT_CASTERS)]
            static CASTER: once_cell::sync::Lazy<$crate::utils::trait_cast::TraitCasterInfo> =
                once_cell::sync::Lazy::new(|| {
                    let key = (
                        std::any::TypeId::of::<$ty_name>(),
                        std::any::TypeId::of::<dyn $to_trait_name>(),
                    );
                    let caster: &'static (dyn std::any::Any + Sync + Send) = &(cast
                        as for<'a> fn(
                            &'a (dyn std::any::Any + 'static),
                        )
                            -> Option<&'a (dyn $to_trait_name + 'static)>);
                    (key, caster)
                });
        };
    };
}
