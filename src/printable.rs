//! Printing IR objects, which need a [Context] to be printed.

use std::{
    cell::Cell,
    fmt::{self, Display},
    rc::Rc,
};

use crate::context::Context;

/// Printer state shared by everything printed as part of one top level object.
/// Currently, just the indentation.
#[derive(Clone)]
pub struct State {
    indent_width: Rc<Cell<u16>>,
    cur_indent: Rc<Cell<u16>>,
}

impl Default for State {
    fn default() -> Self {
        State {
            indent_width: Rc::new(Cell::new(2)),
            cur_indent: Rc::new(Cell::new(0)),
        }
    }
}

impl State {
    /// Another handle to this same state.
    pub fn share(&self) -> Self {
        self.clone()
    }

    pub fn set_indent_width(&self, indent_width: u16) {
        self.indent_width.set(indent_width);
    }

    pub fn get_current_indent(&self) -> u16 {
        self.cur_indent.get()
    }

    pub fn push_indent(&self) {
        self.cur_indent.set(self.cur_indent.get() + self.indent_width.get());
    }

    pub fn pop_indent(&self) {
        self.cur_indent.set(self.cur_indent.get() - self.indent_width.get());
    }
}

/// Run the statements one indentation level deeper.
#[macro_export]
macro_rules! indented_block {
    ($state:ident, { $($tt:tt)* }) => {
        $state.push_indent();
        $($tt)*
        $state.pop_indent();
    }
}

struct Displayable<'t, 'c, T: Printable + ?Sized> {
    t: &'t T,
    ctx: &'c Context,
    state: State,
}

impl<T: Printable + ?Sized> Display for Displayable<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.t.fmt(self.ctx, &self.state, f)
    }
}

/// Something that can be printed, given a [Context].
///
/// ```
/// use arc_dialect::{context::Context, printable::{State, Printable}};
/// use std::fmt;
/// struct Width(u32);
/// impl Printable for Width {
///     fn fmt(&self, _ctx: &Context, _state: &State, f: &mut fmt::Formatter<'_>)
///     -> fmt::Result
///     {
///         write!(f, "i{}", self.0)
///     }
/// }
///
/// let ctx = Context::new();
/// assert_eq!(Width(17).disp(&ctx).to_string(), "i17");
/// ```
pub trait Printable {
    fn fmt(&self, ctx: &Context, state: &State, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// [print](Self::print) with a fresh [State].
    fn disp<'t, 'c>(&'t self, ctx: &'c Context) -> Box<dyn Display + 'c>
    where
        't: 'c,
    {
        self.print(ctx, &State::default())
    }

    /// Wrap `self` in something that [Display]s it.
    fn print<'t, 'c>(&'t self, ctx: &'c Context, state: &State) -> Box<dyn Display + 'c>
    where
        't: 'c,
    {
        Box::new(Displayable {
            t: self,
            ctx,
            state: state.share(),
        })
    }
}

/// Implement [Printable] by deferring to [Display].
#[macro_export]
macro_rules! impl_printable_for_display {
    ($ty_name:ty) => {
        impl $crate::printable::Printable for $ty_name {
            fn fmt(
                &self,
                _ctx: &$crate::context::Context,
                _state: &$crate::printable::State,
                f: &mut std::fmt::Formatter<'_>,
            ) -> std::fmt::Result {
                write!(f, "{}", self)
            }
        }
    };
}

impl_printable_for_display!(&str);
impl_printable_for_display!(String);
impl_printable_for_display!(u32);

impl<T: Printable + ?Sized> Printable for &T {
    fn fmt(&self, ctx: &Context, state: &State, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self).fmt(ctx, state, f)
    }
}

/// What goes between the items printed by [fmt_iter].
#[derive(Clone, Copy)]
pub enum ListSeparator {
    /// A line break, at the current indentation.
    Newline,
    /// The character followed by a space.
    CharSpace(char),
}

impl ListSeparator {
    fn fmt(&self, state: &State, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListSeparator::Newline => fmt_indented_newline(state, f),
            ListSeparator::CharSpace(c) => write!(f, "{c} "),
        }
    }
}

/// Print every item of `iter`, separated by `sep`.
pub fn fmt_iter<I>(
    iter: I,
    ctx: &Context,
    state: &State,
    sep: ListSeparator,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result
where
    I: Iterator,
    I::Item: Printable,
{
    for (idx, item) in iter.enumerate() {
        if idx != 0 {
            sep.fmt(state, f)?;
        }
        item.fmt(ctx, state, f)?;
    }
    Ok(())
}

/// Start a new line, indented to the current level.
pub fn fmt_indented_newline(state: &State, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = usize::from(state.get_current_indent());
    write!(f, "\n{:indent$}", "")
}
