//! Typed views of [Operation]s.
//!
//! Every registered [OpId] has a Rust type implementing [Op], which
//! holds nothing but a [`Ptr<Operation>`](Operation) and gives typed access
//! to it. [from_operation] wraps a generic operation into its [OpObj].
//!
//! Interfaces (see [op_interfaces](crate::dialects::builtin::op_interfaces))
//! are attached with [impl_op_interface](crate::impl_op_interface), which
//! also registers the interface's verifier for the op and makes
//! [op_cast] to the interface work.

use std::{collections::hash_map::Entry, fmt::Display, ops::Deref};

use downcast_rs::{impl_downcast, Downcast};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::{
    common_traits::Verify,
    context::{Context, Ptr},
    dialect::{Dialect, DialectName},
    identifier::Identifier,
    operation::Operation,
    printable::{self, Printable},
    result::Result,
    utils::trait_cast::any_to_trait,
};

/// Name of an op within its dialect, such as `constant` in `hw.constant`.
/// Dotted names (`vectorize.return`) are allowed.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct OpName(Identifier);

impl OpName {
    /// # Panics
    /// If `name` is not an [Identifier].
    pub fn new(name: &str) -> OpName {
        match Identifier::try_from(name) {
            Ok(name) => OpName(name),
            Err(err) => panic!("Bad op name: {err}"),
        }
    }
}

impl Deref for OpName {
    type Target = String;

    fn deref(&self) -> &String {
        &self.0
    }
}

impl Display for OpName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Fully qualified op name, `<dialect>.<name>`.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct OpId {
    pub dialect: DialectName,
    pub name: OpName,
}

impl Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.dialect, self.name)
    }
}

crate::impl_printable_for_display!(OpId);

/// Registered per [OpId] in [Context::ops], to build the [OpObj] of an operation.
pub type OpCreator = fn(Ptr<Operation>) -> OpObj;

pub trait Op: Downcast + Verify + Printable {
    fn get_operation(&self) -> Ptr<Operation>;

    fn wrap_operation(op: Ptr<Operation>) -> OpObj
    where
        Self: Sized;

    fn get_opid(&self) -> OpId;

    fn get_opid_static() -> OpId
    where
        Self: Sized;

    /// Run the verifiers of every interface this op implements.
    fn verify_interfaces(&self, ctx: &Context) -> Result<()>;

    /// Make the op known to `ctx` and list it in `dialect`.
    /// Does nothing if its [OpId] is already known.
    fn register(ctx: &mut Context, dialect: &mut Dialect)
    where
        Self: Sized,
    {
        let opid = Self::get_opid_static();
        if let Entry::Vacant(slot) = ctx.ops.entry(opid.clone()) {
            slot.insert(Self::wrap_operation);
            dialect.add_op(opid);
        }
    }
}
impl_downcast!(Op);

pub type OpObj = Box<dyn Op>;

/// The [Op] of `op`, according to its [OpId].
///
/// # Panics
/// If the [OpId] was never registered.
pub fn from_operation(ctx: &Context, op: Ptr<Operation>) -> OpObj {
    let opid = op.deref(ctx).get_opid();
    let Some(create) = ctx.ops.get(&opid) else {
        panic!("Op {opid} is not registered");
    };
    create(op)
}

impl Printable for OpObj {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        self.as_ref().fmt(ctx, state, f)
    }
}

/// View `op` as the interface `T` (a `dyn Interface`), if it implements it.
pub fn op_cast<T: ?Sized + 'static>(op: &dyn Op) -> Option<&T> {
    any_to_trait::<T>(op.as_any())
}

/// Type of the `verify` function every op interface defines.
pub type OpInterfaceVerifier = fn(&dyn Op, &Context) -> Result<()>;

pub type OpInterfaceVerifierInfo = (OpId, OpInterfaceVerifier);

#[doc(hidden)]
#[linkme::distributed_slice]
pub static OP_INTERFACE_VERIFIERS: [Lazy<OpInterfaceVerifierInfo>] = [..];

#[doc(hidden)]
pub static OP_INTERFACE_VERIFIERS_MAP: Lazy<FxHashMap<OpId, Vec<OpInterfaceVerifier>>> =
    Lazy::new(|| {
        let mut by_op = FxHashMap::<OpId, Vec<OpInterfaceVerifier>>::default();
        for (opid, verifier) in OP_INTERFACE_VERIFIERS.iter().map(|info| &**info) {
            by_op.entry(opid.clone()).or_default().push(*verifier);
        }
        by_op
    });

/// Define the struct for an op and implement [Op] for it.
/// [Printable] and [Verify] are left to the caller.
///
/// ```
/// # use arc_dialect::{
/// #     declare_op, printable::{self, Printable}, context::Context,
/// #     result::Result, common_traits::Verify, op::Op,
/// # };
/// declare_op!(
///     /// Resets a counter.
///     ResetOp,
///     "reset",
///     "counter"
/// );
/// # impl Printable for ResetOp {
/// #    fn fmt(&self, _ctx: &Context, _state: &printable::State, f: &mut core::fmt::Formatter<'_>)
/// #        -> core::fmt::Result
/// #    {
/// #        write!(f, "counter.reset")
/// #    }
/// # }
/// # impl Verify for ResetOp {
/// #   fn verify(&self, _ctx: &Context) -> Result<()> {
/// #        Ok(())
/// #    }
/// # }
/// assert_eq!(ResetOp::get_opid_static().to_string(), "counter.reset");
/// ```
#[macro_export]
macro_rules! declare_op {
    (   $(#[$outer:meta])*
        $structname: ident, $op_name: literal, $dialect_name: literal) => {
        #[derive(Clone, Copy)]
        $(#[$outer])*
        pub struct $structname { op: $crate::context::Ptr<$crate::operation::Operation> }

        impl $crate::op::Op for $structname {
            fn get_operation(&self) -> $crate::context::Ptr<$crate::operation::Operation> {
                self.op
            }

            fn wrap_operation(op: $crate::context::Ptr<$crate::operation::Operation>) -> $crate::op::OpObj {
                Box::new($structname { op })
            }

            fn get_opid(&self) -> $crate::op::OpId {
                Self::get_opid_static()
            }

            fn get_opid_static() -> $crate::op::OpId {
                $crate::op::OpId {
                    dialect: $crate::dialect::DialectName::new($dialect_name),
                    name: $crate::op::OpName::new($op_name),
                }
            }

            fn verify_interfaces(&self, ctx: &$crate::context::Context) -> $crate::result::Result<()> {
                $crate::op::OP_INTERFACE_VERIFIERS_MAP
                    .get(&Self::get_opid_static())
                    .into_iter()
                    .flatten()
                    .try_for_each(|verify| verify(self, ctx))
            }
        }
    }
}

/// `impl $intr_name for $op_name { ... }`, and register the interface's
/// `verify` (an [OpInterfaceVerifier]) to run whenever the op is verified.
///
/// The calling crate needs `linkme` and `once_cell` as dependencies.
///
/// ```
/// # use arc_dialect::{
/// #     op::Op, declare_op, impl_op_interface, printable::{self, Printable},
/// #     context::Context, result::Result, common_traits::Verify
/// # };
/// declare_op!(ResetOp, "reset", "counter");
/// trait ResetValueInterface: Op {
///     fn reset_value(&self) -> u32;
///     fn verify(_op: &dyn Op, _ctx: &Context) -> Result<()>
///     where
///         Self: Sized,
///     {
///         Ok(())
///     }
/// }
/// impl_op_interface!(ResetValueInterface for ResetOp {
///     fn reset_value(&self) -> u32 { 0 }
/// });
/// # impl Printable for ResetOp {
/// #    fn fmt(&self, _ctx: &Context, _state: &printable::State, f: &mut core::fmt::Formatter<'_>)
/// #        -> core::fmt::Result
/// #    {
/// #        write!(f, "counter.reset")
/// #    }
/// # }
/// # impl Verify for ResetOp {
/// #   fn verify(&self, _ctx: &Context) -> Result<()> {
/// #        Ok(())
/// #    }
/// # }
/// ```
#[macro_export]
macro_rules! impl_op_interface {
    ($intr_name:ident for $op_name:ident { $($tt:tt)* }) => {
        $crate::type_to_trait!($op_name, $intr_name);

        const _: () = {
            #[linkme::distributed_slice($crate::op::OP_INTERFACE_VERIFIERS)]
            static VERIFIER: once_cell::sync::Lazy<$crate::op::OpInterfaceVerifierInfo> =
                once_cell::sync::Lazy::new(|| {
                    let verify: $crate::op::OpInterfaceVerifier = <$op_name as $intr_name>::verify;
                    (<$op_name as $crate::op::Op>::get_opid_static(), verify)
                });
        };

        impl $intr_name for $op_name {
            $($tt)*
        }
    };
}
