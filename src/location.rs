//! Where in the source an IR object came from.

use crate::{
    context::Context,
    printable::{self, fmt_iter, ListSeparator, Printable},
};

/// A source location. Materialized constants take over the
/// location of whatever they replace, so these get copied around a lot.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Default)]
pub enum Location {
    FileLineCol {
        file: String,
        line: u32,
        column: u32,
    },
    /// Several source locations merged into one IR object.
    Fused(Vec<Location>),
    /// A location labelled with a name, such as the signal it belongs to.
    Named {
        name: String,
        child_loc: Box<Location>,
    },
    #[default]
    Unknown,
}

impl Location {
    pub fn file_line_col(file: &str, line: u32, column: u32) -> Location {
        Location::FileLineCol {
            file: file.to_string(),
            line,
            column,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Location::Unknown)
    }
}

impl Printable for Location {
    fn fmt(
        &self,
        ctx: &Context,
        state: &printable::State,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Location::FileLineCol { file, line, column } => {
                write!(f, "{file}: line: {line}, column: {column}")
            }
            Location::Fused(locations) => {
                write!(f, "fused[")?;
                fmt_iter(locations.iter(), ctx, state, ListSeparator::CharSpace(','), f)?;
                write!(f, "]")
            }
            Location::Named { name, child_loc } => {
                write!(f, "\"{}\"(", name)?;
                child_loc.fmt(ctx, state, f)?;
                write!(f, ")")
            }
            Location::Unknown => write!(f, "<unknown>"),
        }
    }
}

pub trait Located {
    fn loc(&self) -> Location;
    fn set_loc(&mut self, loc: Location);
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::Location;
    use crate::{context::Context, printable::Printable};

    #[test]
    fn print_locations() {
        let ctx = Context::new();
        let flc = Location::file_line_col("top.mlir", 3, 7);
        let named = Location::Named {
            name: "width_m1".to_string(),
            child_loc: Box::new(flc.clone()),
        };
        let fused = Location::Fused(vec![flc, Location::Unknown]);

        expect![[r#""width_m1"(top.mlir: line: 3, column: 7)"#]]
            .assert_eq(&named.disp(&ctx).to_string());
        expect![[r#"fused[top.mlir: line: 3, column: 7, <unknown>]"#]]
            .assert_eq(&fused.disp(&ctx).to_string());
        assert!(Location::default().is_unknown());
    }
}
