//! This module contains the IR data flow graph.
use cranelift_entity::{entity_impl, packed_option::PackedOption, PrimaryMap, SecondaryMap};
use smallvec::SmallVec;

use crate::{
    inst::{InstData, InstId},
    module::ModuleCtx,
    types::SilType,
    value::{Value, ValueId},
};

#[derive(Debug)]
pub struct DataFlowGraph {
    pub ctx: ModuleCtx,
    #[doc(hidden)]
    pub blocks: PrimaryMap<BlockId, Block>,
    #[doc(hidden)]
    pub values: PrimaryMap<ValueId, Value>,
    insts: PrimaryMap<InstId, InstData>,
    inst_results: SecondaryMap<InstId, PackedOption<ValueId>>,
}

impl DataFlowGraph {
    pub fn new(ctx: ModuleCtx) -> Self {
        Self {
            ctx,
            blocks: PrimaryMap::default(),
            values: PrimaryMap::default(),
            insts: PrimaryMap::default(),
            inst_results: SecondaryMap::default(),
        }
    }

    pub fn make_block(&mut self) -> BlockId {
        self.blocks.push(Block::new())
    }

    pub fn make_value(&mut self, value: Value) -> ValueId {
        self.values.push(value)
    }

    pub fn make_inst(&mut self, inst: impl Into<InstData>) -> InstId {
        self.insts.push(inst.into())
    }

    /// Makes a result value of type `ty` for `inst_id` and attaches it.
    pub fn make_result(&mut self, inst_id: InstId, ty: SilType) -> ValueId {
        let value = self.make_value(Value::Inst { inst: inst_id, ty });
        self.attach_result(inst_id, value);
        value
    }

    pub fn attach_result(&mut self, inst_id: InstId, value_id: ValueId) {
        debug_assert!(self.inst_results[inst_id].is_none());
        self.inst_results[inst_id] = value_id.into();
    }

    /// Detaches the result of `inst_id`, returning it if there was one.
    pub fn detach_result(&mut self, inst_id: InstId) -> Option<ValueId> {
        std::mem::take(&mut self.inst_results[inst_id]).expand()
    }

    pub fn append_block_param(&mut self, block: BlockId, ty: SilType) -> ValueId {
        let idx = self.blocks[block].params.len();
        let value = self.make_value(Value::Arg { block, idx, ty });
        self.blocks[block].params.push(value);
        value
    }

    pub fn block_params(&self, block: BlockId) -> &[ValueId] {
        &self.blocks[block].params
    }

    pub fn has_block(&self, block: BlockId) -> bool {
        self.blocks.is_valid(block)
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn replace_inst(&mut self, inst_id: InstId, new: impl Into<InstData>) -> InstData {
        std::mem::replace(&mut self.insts[inst_id], new.into())
    }

    pub fn inst(&self, inst_id: InstId) -> &InstData {
        &self.insts[inst_id]
    }

    pub fn get_inst(&self, inst_id: InstId) -> Option<&InstData> {
        self.insts.get(inst_id)
    }

    pub fn inst_mut(&mut self, inst_id: InstId) -> &mut InstData {
        &mut self.insts[inst_id]
    }

    pub fn inst_result(&self, inst_id: InstId) -> Option<ValueId> {
        self.inst_results[inst_id].expand()
    }

    pub fn value(&self, value_id: ValueId) -> &Value {
        &self.values[value_id]
    }

    /// Returns `None` if `value_id` doesn't refer to a value of this graph.
    pub fn get_value(&self, value_id: ValueId) -> Option<&Value> {
        self.values.get(value_id)
    }

    pub fn value_ty(&self, value_id: ValueId) -> SilType {
        self.values[value_id].ty()
    }

    pub fn value_inst(&self, value_id: ValueId) -> Option<InstId> {
        self.values[value_id].defining_inst()
    }

    pub fn is_terminator(&self, inst_id: InstId) -> bool {
        self.inst(inst_id).is_terminator()
    }
}

/// An opaque reference to [`Block`]
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);
entity_impl!(BlockId, "bb");

/// A block data definition.
/// A Block data doesn't hold any information for layout of a program. It is managed by
/// [`super::layout::Layout`].
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub params: SmallVec<[ValueId; 4]>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }
}
