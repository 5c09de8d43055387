//! Utility traits such as [Verify], [Named] etc.

use crate::{context::Context, result::Result};

/// Check and ensure correctness.
pub trait Verify {
    fn verify(&self, ctx: &Context) -> Result<()>;
}

/// Anything that has a name.
pub trait Named {
    fn given_name(&self, ctx: &Context) -> Option<String>;
    fn id(&self, ctx: &Context) -> String;
    /// The given name if present, an arena derived one otherwise.
    fn unique_name(&self, ctx: &Context) -> String {
        self.given_name(ctx).unwrap_or_else(|| self.id(ctx))
    }
}

/// Implement [Verify] for a type, with the verifier always succeeding.
#[macro_export]
macro_rules! impl_verify_succ {
    ($ty_name:ty) => {
        impl $crate::common_traits::Verify for $ty_name {
            fn verify(&self, _ctx: &$crate::context::Context) -> $crate::result::Result<()> {
                Ok(())
            }
        }
    };
}
