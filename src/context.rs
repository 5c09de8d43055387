//! Every IR object lives in an arena of the [Context] and is referred to through a [Ptr].
//! Types are interned, everything else (operations, blocks and regions)
//! is explicitly allocated and freed.

use crate::{
    basic_block::BasicBlock,
    common_traits::Verify,
    dialect::{Dialect, DialectName},
    op::{OpCreator, OpId},
    operation::Operation,
    printable::{self, Printable},
    r#type::TypeObj,
    region::Region,
    result::Result,
    storage_uniquer::UniqueStore,
};
use rustc_hash::FxHashMap;
use slotmap::{DefaultKey, Key, SlotMap};
use std::{
    any::TypeId,
    cell::{Ref, RefCell, RefMut},
    hash::Hash,
    marker::PhantomData,
};

pub type ArenaCell<T> = SlotMap<DefaultKey, RefCell<T>>;
pub type ArenaIndex = DefaultKey;

/// Owner of all IR, and of the registry of dialects and ops.
#[derive(Default)]
pub struct Context {
    pub operations: ArenaCell<Operation>,
    pub basic_blocks: ArenaCell<BasicBlock>,
    pub regions: ArenaCell<Region>,
    /// Registered [Dialect]s, by name.
    pub dialects: FxHashMap<DialectName, Dialect>,
    /// How to wrap an [Operation] of each registered [OpId] into its [Op](crate::op::Op).
    pub ops: FxHashMap<OpId, OpCreator>,
    pub type_store: UniqueStore<TypeObj>,
}

impl Context {
    pub fn new() -> Context {
        Self::default()
    }

    /// Is a dialect named `name` registered?
    pub fn has_dialect(&self, name: &DialectName) -> bool {
        self.dialects.contains_key(name)
    }
}

pub(crate) mod private {
    use std::{cell::RefCell, marker::PhantomData};

    use super::{ArenaCell, Context, Ptr};

    /// An object allocated in one of the [Context]'s arenas.
    pub trait ArenaObj
    where
        Self: Sized,
    {
        fn get_arena(ctx: &Context) -> &ArenaCell<Self>;
        fn get_arena_mut(ctx: &mut Context) -> &mut ArenaCell<Self>;
        fn get_self_ptr(&self, ctx: &Context) -> Ptr<Self>;
        /// Free every arena object owned by `ptr`.
        /// Runs just before `ptr` itself is freed.
        fn dealloc_sub_objects(ptr: Ptr<Self>, ctx: &mut Context);

        /// Allocate the object built by `build`, which gets to know its own [Ptr].
        fn alloc(ctx: &mut Context, build: impl FnOnce(Ptr<Self>) -> Self) -> Ptr<Self> {
            let idx = Self::get_arena_mut(ctx)
                .insert_with_key(|idx| RefCell::new(build(Ptr::from_index(idx))));
            Ptr {
                idx,
                _dummy: PhantomData,
            }
        }

        /// Free `ptr` and everything it owns.
        fn dealloc(ptr: Ptr<Self>, ctx: &mut Context) {
            Self::dealloc_sub_objects(ptr, ctx);
            Self::get_arena_mut(ctx).remove(ptr.idx);
        }
    }
}

use private::ArenaObj;

/// A copyable handle to an arena object.
pub struct Ptr<T: ArenaObj> {
    pub(crate) idx: ArenaIndex,
    pub(crate) _dummy: PhantomData<T>,
}

impl<'a, T: ArenaObj> Ptr<T> {
    pub(crate) fn from_index(idx: ArenaIndex) -> Ptr<T> {
        Ptr {
            idx,
            _dummy: PhantomData,
        }
    }

    /// Borrow the object.
    ///
    /// # Panics
    /// If the object was freed, or is currently mutably borrowed.
    pub fn deref(&self, ctx: &'a Context) -> Ref<'a, T> {
        T::get_arena(ctx)
            .get(self.idx)
            .expect("Ptr to a freed object")
            .borrow()
    }

    /// Mutably borrow the object.
    ///
    /// # Panics
    /// If the object was freed, or is currently borrowed.
    pub fn deref_mut(&self, ctx: &'a Context) -> RefMut<'a, T> {
        T::get_arena(ctx)
            .get(self.idx)
            .expect("Ptr to a freed object")
            .borrow_mut()
    }

    /// A name, unique within the arena, of the form `{prefix}_{index}`.
    pub(crate) fn make_name(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.idx.data().as_ffi() & 0xffff_ffff)
    }
}

impl<T: ArenaObj> std::fmt::Debug for Ptr<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ptr({:?})", self.idx)
    }
}

impl<T: ArenaObj> Clone for Ptr<T> {
    fn clone(&self) -> Ptr<T> {
        *self
    }
}

impl<T: ArenaObj> Copy for Ptr<T> {}

impl<T: ArenaObj> PartialEq for Ptr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl<T: ArenaObj> Eq for Ptr<T> {}

impl<T: ArenaObj + 'static> Hash for Ptr<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        TypeId::of::<T>().hash(state);
        self.idx.hash(state);
    }
}

impl<T: ArenaObj + Printable> Printable for Ptr<T> {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        self.deref(ctx).fmt(ctx, state, f)
    }
}

impl<T: ArenaObj + Verify> Verify for Ptr<T> {
    fn verify(&self, ctx: &Context) -> Result<()> {
        self.deref(ctx).verify(ctx)
    }
}
