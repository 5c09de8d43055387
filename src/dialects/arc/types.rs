use thiserror::Error;

use crate::{
    common_traits::Verify,
    context::{Context, Ptr},
    dialect::Dialect,
    dialects::builtin::types::IntegerType,
    identifier::Identifier,
    impl_type,
    printable::{self, Printable},
    r#type::{Type, TypeObj},
    result::Result,
    verify_err_noloc,
};

/// Number of bytes needed to store `ty`, if it has a known size.
fn byte_width(ctx: &Context, ty: Ptr<TypeObj>) -> Option<u32> {
    ty.deref(ctx)
        .downcast_ref::<IntegerType>()
        .map(|int_ty| int_ty.get_width().div_ceil(8))
}

#[derive(Error, Debug)]
pub enum ArcTypeVerifyErr {
    #[error("State type must have a known bit width")]
    UnsizedState,
    #[error("Memory word and address types must be integers")]
    NonIntegerMemory,
}

/// The allocated state of a value, stored in a model's storage.
#[derive(Hash, PartialEq, Eq)]
pub struct StateType {
    ty: Ptr<TypeObj>,
}
impl_type!(StateType, "state", "arc");

impl StateType {
    /// Get or create a new state type.
    pub fn get(ctx: &mut Context, ty: Ptr<TypeObj>) -> Ptr<TypeObj> {
        Type::register_instance(StateType { ty }, ctx)
    }

    /// The type of the stored value.
    pub fn get_type(&self) -> Ptr<TypeObj> {
        self.ty
    }

    /// Bytes of storage this state occupies.
    pub fn get_byte_width(&self, ctx: &Context) -> Option<u32> {
        byte_width(ctx, self.ty)
    }
}

impl Printable for StateType {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "!arc.state<{}>", self.ty.disp(ctx))
    }
}

impl Verify for StateType {
    fn verify(&self, ctx: &Context) -> Result<()> {
        if self.get_byte_width(ctx).is_none() {
            return verify_err_noloc!(ArcTypeVerifyErr::UnsizedState);
        }
        Ok(())
    }
}

/// A memory of `num_words` words of `word_type`, addressed by `addr_type`.
#[derive(Hash, PartialEq, Eq)]
pub struct MemoryType {
    num_words: u32,
    word_type: Ptr<TypeObj>,
    addr_type: Ptr<TypeObj>,
}
impl_type!(MemoryType, "memory", "arc");

impl MemoryType {
    /// Get or create a new memory type.
    pub fn get(
        ctx: &mut Context,
        num_words: u32,
        word_type: Ptr<TypeObj>,
        addr_type: Ptr<TypeObj>,
    ) -> Ptr<TypeObj> {
        Type::register_instance(
            MemoryType {
                num_words,
                word_type,
                addr_type,
            },
            ctx,
        )
    }

    pub fn get_num_words(&self) -> u32 {
        self.num_words
    }

    pub fn get_word_type(&self) -> Ptr<TypeObj> {
        self.word_type
    }

    pub fn get_addr_type(&self) -> Ptr<TypeObj> {
        self.addr_type
    }

    /// Bytes between consecutive words: the word's byte size,
    /// aligned to a power of two no larger than 16.
    pub fn get_stride(&self, ctx: &Context) -> Option<u32> {
        let stride = byte_width(ctx, self.word_type)?;
        let align = stride.min(16).next_power_of_two();
        Some(stride.next_multiple_of(align))
    }
}

impl Printable for MemoryType {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(
            f,
            "!arc.memory<{} x {}, {}>",
            self.num_words,
            self.word_type.disp(ctx),
            self.addr_type.disp(ctx)
        )
    }
}

impl Verify for MemoryType {
    fn verify(&self, ctx: &Context) -> Result<()> {
        let is_int = |ty: Ptr<TypeObj>| ty.deref(ctx).is::<IntegerType>();
        if !is_int(self.word_type) || !is_int(self.addr_type) {
            return verify_err_noloc!(ArcTypeVerifyErr::NonIntegerMemory);
        }
        Ok(())
    }
}

/// A block of `size` bytes of model storage.
#[derive(Hash, PartialEq, Eq)]
pub struct StorageType {
    size: u32,
}
impl_type!(StorageType, "storage", "arc");

impl StorageType {
    /// Get or create a new storage type.
    pub fn get(ctx: &mut Context, size: u32) -> Ptr<TypeObj> {
        Type::register_instance(StorageType { size }, ctx)
    }

    pub fn get_size(&self) -> u32 {
        self.size
    }
}

impl Printable for StorageType {
    fn fmt(
        &self,
        _ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "!arc.storage<{}>", self.size)
    }
}

crate::impl_verify_succ!(StorageType);

/// An instance of a simulated model, named by the model's symbol.
#[derive(Hash, PartialEq, Eq)]
pub struct SimModelInstanceType {
    model: Identifier,
}
impl_type!(SimModelInstanceType, "sim.instance", "arc");

impl SimModelInstanceType {
    /// Get or create a new model instance type.
    pub fn get(ctx: &mut Context, model: Identifier) -> Ptr<TypeObj> {
        Type::register_instance(SimModelInstanceType { model }, ctx)
    }

    pub fn get_model(&self) -> &Identifier {
        &self.model
    }
}

impl Printable for SimModelInstanceType {
    fn fmt(
        &self,
        _ctx: &Context,
        _state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "!arc.sim.instance<@{}>", self.model)
    }
}

crate::impl_verify_succ!(SimModelInstanceType);

pub fn register(dialect: &mut Dialect) {
    StateType::register_type_in_dialect(dialect);
    MemoryType::register_type_in_dialect(dialect);
    StorageType::register_type_in_dialect(dialect);
    SimModelInstanceType::register_type_in_dialect(dialect);
}

#[cfg(test)]
mod tests {
    use super::{MemoryType, SimModelInstanceType, StateType, StorageType};
    use crate::{
        common_traits::Verify,
        context::Context,
        dialects::builtin::types::{IntegerType, Signedness},
        printable::Printable,
    };

    #[test]
    fn state_and_storage() {
        let ctx = &mut Context::new();
        let i17 = IntegerType::get(ctx, 17, Signedness::Signless);
        let state = StateType::get(ctx, i17);
        assert!(state == StateType::get(ctx, i17));
        assert_eq!(state.disp(ctx).to_string(), "!arc.state<i17>");
        assert_eq!(
            state
                .deref(ctx)
                .downcast_ref::<StateType>()
                .and_then(|state| state.get_byte_width(ctx)),
            Some(3)
        );
        assert!(state.verify(ctx).is_ok());

        // A state of a state has no known size.
        let nested = StateType::get(ctx, state);
        assert!(nested.verify(ctx).is_err());

        let storage = StorageType::get(ctx, 16);
        assert_eq!(storage.disp(ctx).to_string(), "!arc.storage<16>");

        let inst = SimModelInstanceType::get(ctx, "counter".try_into().unwrap());
        assert_eq!(inst.disp(ctx).to_string(), "!arc.sim.instance<@counter>");
    }

    #[test]
    fn memory_stride() {
        let ctx = &mut Context::new();
        let i2 = IntegerType::get(ctx, 2, Signedness::Signless);
        let stride = |ctx: &mut Context, word_width| {
            let word = IntegerType::get(ctx, word_width, Signedness::Signless);
            let mem = MemoryType::get(ctx, 4, word, i2);
            let stride = mem
                .deref(ctx)
                .downcast_ref::<MemoryType>()
                .and_then(|mem| mem.get_stride(ctx));
            stride
        };
        assert_eq!(stride(ctx, 8), Some(1));
        assert_eq!(stride(ctx, 24), Some(4));
        assert_eq!(stride(ctx, 40), Some(8));
        assert_eq!(stride(ctx, 200), Some(32));

        let i8_ty = IntegerType::get(ctx, 8, Signedness::Signless);
        let mem = MemoryType::get(ctx, 4, i8_ty, i2);
        assert_eq!(mem.disp(ctx).to_string(), "!arc.memory<4 x i8, i2>");
        assert!(mem.verify(ctx).is_ok());
    }
}
