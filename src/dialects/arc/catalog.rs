//! The closed catalog of operations in the arc dialect.
//!
//! Every entry is a fixed shape: a name, a one line summary, the number of
//! (single block) regions the op carries and whether it terminates its block.
//! The ops themselves are opaque: they are built and verified only against
//! that shape.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{
    basic_block::BasicBlock,
    common_traits::Verify,
    context::{Context, Ptr},
    declare_op,
    dialect::Dialect,
    linked_list::LinkedList,
    location::Located,
    op::{Op, OpId},
    operation::Operation,
    printable::{self, Printable},
    r#type::TypeObj,
    result::Result,
    value::Value,
    verify_err,
};

/// One entry of the arc operation catalog.
#[derive(Clone, Copy)]
pub struct OpSpec {
    /// Name of the op, without the dialect prefix.
    pub name: &'static str,
    pub summary: &'static str,
    /// Regions every instance has. Each holds a single block.
    pub num_regions: usize,
    /// Must be the last operation of its block.
    pub is_terminator: bool,
    register: fn(&mut Context, &mut Dialect),
}

/// Find the catalog entry for `name`.
pub fn lookup(name: &str) -> Option<&'static OpSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// Create an unlinked operation whose regions each hold an empty block.
fn new_catalog_operation(
    ctx: &mut Context,
    opid: OpId,
    result_types: Vec<Ptr<TypeObj>>,
    operands: Vec<Value>,
    num_regions: usize,
) -> Ptr<Operation> {
    let op = Operation::new(ctx, opid, result_types, operands, num_regions);
    for region_idx in 0..num_regions {
        let region = op
            .deref(ctx)
            .get_region(region_idx)
            .expect("Operation::new allocates every region");
        let block = BasicBlock::new(ctx, None, vec![]);
        block.insert_at_back(region, ctx);
    }
    op
}

#[derive(Error, Debug)]
pub enum CatalogOpVerifyErr {
    #[error("Op {opid} must have {expected} region(s), but has {found}")]
    RegionCount {
        opid: String,
        expected: usize,
        found: usize,
    },
    #[error("Terminator {0} must be the last operation in its block")]
    TerminatorNotLast(String),
}

fn verify_catalog_op(
    ctx: &Context,
    op: Ptr<Operation>,
    num_regions: usize,
    is_terminator: bool,
) -> Result<()> {
    let op = &*op.deref(ctx);
    if op.get_num_regions() != num_regions {
        return verify_err!(
            op.loc(),
            CatalogOpVerifyErr::RegionCount {
                opid: op.get_opid().to_string(),
                expected: num_regions,
                found: op.get_num_regions(),
            }
        );
    }
    if is_terminator && op.get_next().is_some() {
        return verify_err!(
            op.loc(),
            CatalogOpVerifyErr::TerminatorNotLast(op.get_opid().to_string())
        );
    }
    Ok(())
}

macro_rules! arc_op_catalog {
    ($($name:ident => $op_name:literal, regions: $regions:literal, terminator: $term:literal, $summary:literal;)*) => {
        paste::paste! {
            $(
                declare_op!(
                    #[doc = $summary]
                    [<$name Op>],
                    $op_name,
                    "arc"
                );

                impl [<$name Op>] {
                    /// Create a new, unlinked, instance.
                    pub fn new(
                        ctx: &mut Context,
                        result_types: Vec<Ptr<TypeObj>>,
                        operands: Vec<Value>,
                    ) -> Self {
                        let op = new_catalog_operation(
                            ctx,
                            Self::get_opid_static(),
                            result_types,
                            operands,
                            $regions,
                        );
                        Self { op }
                    }
                }

                impl Printable for [<$name Op>] {
                    fn fmt(
                        &self,
                        ctx: &Context,
                        state: &printable::State,
                        f: &mut core::fmt::Formatter<'_>,
                    ) -> core::fmt::Result {
                        self.get_operation().fmt(ctx, state, f)
                    }
                }

                impl Verify for [<$name Op>] {
                    fn verify(&self, ctx: &Context) -> Result<()> {
                        verify_catalog_op(ctx, self.get_operation(), $regions, $term)
                    }
                }
            )*

            /// Every operation of the arc dialect, in definition order.
            pub static CATALOG: &[OpSpec] = &[
                $(
                    OpSpec {
                        name: $op_name,
                        summary: $summary,
                        num_regions: $regions,
                        is_terminator: $term,
                        register: <[<$name Op>] as Op>::register,
                    },
                )*
            ];
        }
    };
}

arc_op_catalog! {
    Define => "define", regions: 1, terminator: false, "State transfer arc definition";
    Output => "output", regions: 0, terminator: true, "Arc terminator";
    State => "state", regions: 0, terminator: false, "State transfer arc";
    Call => "call", regions: 0, terminator: false, "Calls an arc";
    Memory => "memory", regions: 0, terminator: false, "Memory";
    MemoryReadPort => "memory_read_port", regions: 0, terminator: false, "Read port from a memory";
    MemoryWritePort => "memory_write_port", regions: 0, terminator: false, "Write port to a memory";
    MemoryRead => "memory_read", regions: 0, terminator: false, "Read a word from a memory";
    MemoryWrite => "memory_write", regions: 0, terminator: false, "Write a word to a memory";
    ClockGate => "clock_gate", regions: 0, terminator: false, "Clock gate";
    ClockInv => "clock_inv", regions: 0, terminator: false, "Clock inverter";
    ClockTree => "clock_tree", regions: 1, terminator: false, "A clock tree";
    ClockDomain => "clock_domain", regions: 1, terminator: false, "A clock domain";
    Passthrough => "passthrough", regions: 1, terminator: false, "Clock-less passthrough operations";
    Tap => "tap", regions: 0, terminator: false, "A tap to observe a value in the model's state";
    Model => "model", regions: 1, terminator: false, "A model with stratified clocks";
    Lut => "lut", regions: 1, terminator: false, "A lookup table";
    ZeroCount => "zero_count", regions: 0, terminator: false, "Leading or trailing zero count";
    Vectorize => "vectorize", regions: 1, terminator: false, "Isolated subgraph of operations to be vectorized";
    VectorizeReturn => "vectorize.return", regions: 0, terminator: true, "Vectorized boundary terminator";
    RootInput => "root_input", regions: 0, terminator: false, "A root input";
    RootOutput => "root_output", regions: 0, terminator: false, "A root output";
    AllocState => "alloc_state", regions: 0, terminator: false, "Allocate internal state";
    AllocMemory => "alloc_memory", regions: 0, terminator: false, "Allocate a memory";
    AllocStorage => "alloc_storage", regions: 0, terminator: false, "Allocate a slice of a larger storage";
    StorageGet => "storage.get", regions: 0, terminator: false, "Access an allocated state, memory or storage slice";
    StateRead => "state_read", regions: 0, terminator: false, "Get a state's current value";
    StateWrite => "state_write", regions: 0, terminator: false, "Update a state's value";
    SimInstantiate => "sim.instantiate", regions: 1, terminator: false, "Instantiate a model for simulation";
    SimSetInput => "sim.set_input", regions: 0, terminator: false, "Set an input of a model instance";
    SimGetPort => "sim.get_port", regions: 0, terminator: false, "Get the value of a port of a model instance";
    SimStep => "sim.step", regions: 0, terminator: false, "Evaluate one step of a model instance";
    SimEmit => "sim.emit", regions: 0, terminator: false, "Send a value to the simulation driver";
}

/// Register every op in `catalog` with `dialect`.
///
/// # Panics
/// If `catalog` lists a name twice.
pub(super) fn register_ops(ctx: &mut Context, dialect: &mut Dialect, catalog: &[OpSpec]) {
    let mut seen = FxHashSet::default();
    for spec in catalog {
        assert!(
            seen.insert(spec.name),
            "Malformed arc op catalog: {} is listed twice",
            spec.name
        );
        (spec.register)(ctx, dialect);
    }
}

#[cfg(test)]
mod tests {
    use super::{lookup, register_ops, CATALOG};
    use crate::{
        context::Context,
        dialect::{Dialect, DialectName},
    };

    #[test]
    #[should_panic(expected = "listed twice")]
    fn duplicate_entry_is_fatal() {
        let ctx = &mut Context::new();
        let mut dialect = Dialect::new(DialectName::new("arc"));
        register_ops(ctx, &mut dialect, &[CATALOG[0], CATALOG[1], CATALOG[0]]);
    }

    #[test]
    fn lookup_entries() {
        let define = lookup("define").unwrap();
        assert_eq!(define.num_regions, 1);
        assert!(!define.is_terminator);
        assert!(lookup("output").unwrap().is_terminator);
        assert!(lookup("constant").is_none());
    }
}
