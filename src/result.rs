//! Errors reported while building and verifying IR.

use std::fmt::Display;

use thiserror::Error;

use crate::{
    context::Context,
    location::{Located, Location},
    printable::{Printable, State},
};

/// What went wrong, broadly.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Some IR object broke one of its invariants.
    #[error("verification failed")]
    VerificationFailed,
    /// An API was called with arguments it cannot work with.
    #[error("invalid argument")]
    InvalidArgument,
}

/// An [ErrorKind], the [Location] it was found at,
/// and a more specific [std::error::Error] describing it.
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    /// The specific error. Usually a `thiserror` type from the module that raised it.
    pub err: Box<dyn std::error::Error + Send + Sync>,
    pub loc: Location,
}

impl Error {
    /// Is the specific error a `T`?
    pub fn is<T: std::error::Error + 'static>(&self) -> bool {
        self.err.is::<T>()
    }
}

/// Without the [Location]. Use [Printable::disp] to get that too.
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.err)
    }
}

impl std::error::Error for Error {}

impl Printable for Error {
    fn fmt(
        &self,
        ctx: &Context,
        _state: &State,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{} at {}", self, self.loc.disp(ctx))
    }
}

impl Located for Error {
    fn loc(&self) -> Location {
        self.loc.clone()
    }

    fn set_loc(&mut self, loc: Location) {
        self.loc = loc;
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[doc(hidden)]
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

/// Build an [struct@Error] of the given [ErrorKind] at a [Location], from either
/// an [std::error::Error] value or [format!] style arguments.
#[macro_export]
macro_rules! create_error {
    ($loc: expr, $kind: expr, $str: literal $($t:tt)*) => {
        $crate::create_error!($loc, $kind, $crate::result::StringError(format!($str $($t)*)))
    };
    ($loc: expr, $kind: expr, $err: expr) => {
        $crate::result::Error {
            kind: $kind,
            err: Box::new($err),
            loc: $loc,
        }
    };
}

/// [ErrorKind::VerificationFailed] [struct@Error].
/// ```rust
/// use thiserror::Error;
/// use arc_dialect::{verify_error, result::{ErrorKind, Error}, location::Location};
///
/// #[derive(Error, Debug)]
/// #[error("width must be positive")]
/// pub struct ZeroWidthErr;
///
/// let err = verify_error!(Location::Unknown, ZeroWidthErr);
/// assert_eq!(err.kind, ErrorKind::VerificationFailed);
/// assert!(err.is::<ZeroWidthErr>());
///
/// let err: Error = verify_error!(Location::Unknown, "{} is not a parameter", "FOO");
/// assert_eq!(err.err.to_string(), "FOO is not a parameter");
/// ```
#[macro_export]
macro_rules! verify_error {
    ($loc: expr, $($t:tt)*) => {
        $crate::create_error!($loc, $crate::result::ErrorKind::VerificationFailed, $($t)*)
    }
}

/// [ErrorKind::VerificationFailed] [Result].
#[macro_export]
macro_rules! verify_err {
    ($loc: expr, $($t:tt)*) => {
        Err($crate::verify_error!($loc, $($t)*))
    }
}

/// [verify_err] at [Location::Unknown].
#[macro_export]
macro_rules! verify_err_noloc {
    ($($t:tt)*) => {
        $crate::verify_err!($crate::location::Location::Unknown, $($t)*)
    }
}

/// [ErrorKind::InvalidArgument] [Result].
/// ```rust
/// use arc_dialect::{arg_err, result::{Result, ErrorKind}, location::Location};
///
/// let res: Result<()> = arg_err!(Location::Unknown, "no dialect named {}", "seq");
/// let err = res.unwrap_err();
/// assert_eq!(err.kind, ErrorKind::InvalidArgument);
/// assert_eq!(err.to_string(), "invalid argument: no dialect named seq");
/// ```
#[macro_export]
macro_rules! arg_err {
    ($loc: expr, $($t:tt)*) => {
        Err($crate::create_error!($loc, $crate::result::ErrorKind::InvalidArgument, $($t)*))
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use thiserror::Error;

    use crate::{context::Context, location::Location, printable::Printable};

    #[derive(Debug, Error)]
    #[error("parameter WIDTH is declared twice")]
    pub struct DuplicateParamErr;

    #[test]
    fn located_err() {
        let ctx = &Context::new();
        let loc = Location::file_line_col("counter.sv", 4, 9);
        let err = verify_error!(loc, DuplicateParamErr);
        assert!(err.is::<DuplicateParamErr>());
        expect!["verification failed: parameter WIDTH is declared twice"]
            .assert_eq(&err.to_string());
        expect!["verification failed: parameter WIDTH is declared twice at counter.sv: line: 4, column: 9"]
            .assert_eq(&err.disp(ctx).to_string());
    }
}
