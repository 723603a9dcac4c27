//! This module contains function layout information including block order and
//! instruction order.
use cranelift_entity::SecondaryMap;

use crate::{dfg::BlockId, inst::InstId};

#[derive(Debug, Clone, Default)]
pub struct Layout {
    blocks: SecondaryMap<BlockId, BlockNode>,
    insts: SecondaryMap<InstId, InstNode>,
    entry_block: Option<BlockId>,
    last_block: Option<BlockId>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first block in layout order. The function starts executing there.
    pub fn entry_block(&self) -> Option<BlockId> {
        self.entry_block
    }

    pub fn last_block(&self) -> Option<BlockId> {
        self.last_block
    }

    pub fn is_block_empty(&self, block: BlockId) -> bool {
        self.first_inst_of(block).is_none()
    }

    pub fn next_block_of(&self, block: BlockId) -> Option<BlockId> {
        debug_assert!(self.is_block_inserted(block));
        self.blocks[block].next
    }

    pub fn prev_block_of(&self, block: BlockId) -> Option<BlockId> {
        debug_assert!(self.is_block_inserted(block));
        self.blocks[block].prev
    }

    pub fn is_block_inserted(&self, block: BlockId) -> bool {
        Some(block) == self.entry_block || self.blocks[block] != BlockNode::default()
    }

    pub fn first_inst_of(&self, block: BlockId) -> Option<InstId> {
        self.blocks[block].first_inst
    }

    pub fn last_inst_of(&self, block: BlockId) -> Option<InstId> {
        self.blocks[block].last_inst
    }

    pub fn prev_inst_of(&self, inst: InstId) -> Option<InstId> {
        debug_assert!(self.is_inst_inserted(inst));
        self.insts[inst].prev
    }

    pub fn next_inst_of(&self, inst: InstId) -> Option<InstId> {
        debug_assert!(self.is_inst_inserted(inst));
        self.insts[inst].next
    }

    /// Returns the block containing `inst`, or `None` if `inst` is detached.
    pub fn inst_block(&self, inst: InstId) -> Option<BlockId> {
        self.insts[inst].block
    }

    pub fn is_inst_inserted(&self, inst: InstId) -> bool {
        self.insts[inst].block.is_some()
    }

    pub fn iter_block(&self) -> impl Iterator<Item = BlockId> + '_ {
        BlockIter {
            next: self.entry_block,
            blocks: &self.blocks,
        }
    }

    pub fn iter_inst(&self, block: BlockId) -> impl Iterator<Item = InstId> + '_ {
        InstIter {
            next: self.blocks[block].first_inst,
            insts: &self.insts,
        }
    }

    pub fn append_block(&mut self, block: BlockId) {
        debug_assert!(!self.is_block_inserted(block));

        let mut block_node = BlockNode::default();
        match self.last_block {
            Some(last_block) => {
                self.blocks[last_block].next = Some(block);
                block_node.prev = Some(last_block);
            }
            None => self.entry_block = Some(block),
        }

        self.blocks[block] = block_node;
        self.last_block = Some(block);
    }

    /// Unlinks `block` from the block order. Instructions of the block are
    /// left untouched.
    pub fn remove_block(&mut self, block: BlockId) {
        debug_assert!(self.is_block_inserted(block));

        let BlockNode { prev, next, .. } = self.blocks[block];
        match prev {
            Some(prev) => self.blocks[prev].next = next,
            None => self.entry_block = next,
        }
        match next {
            Some(next) => self.blocks[next].prev = prev,
            None => self.last_block = prev,
        }

        self.blocks[block] = BlockNode::default();
    }

    pub fn append_inst(&mut self, inst: InstId, block: BlockId) {
        debug_assert!(self.is_block_inserted(block));
        debug_assert!(!self.is_inst_inserted(inst));

        let mut inst_node = InstNode::with_block(block);
        let block_node = &mut self.blocks[block];
        match block_node.last_inst {
            Some(last_inst) => {
                inst_node.prev = Some(last_inst);
                self.insts[last_inst].next = Some(inst);
            }
            None => block_node.first_inst = Some(inst),
        }

        block_node.last_inst = Some(inst);
        self.insts[inst] = inst_node;
    }

    pub fn insert_inst_before(&mut self, inst: InstId, before: InstId) {
        debug_assert!(!self.is_inst_inserted(inst));
        let InstNode { block, prev, .. } = self.insts[before];
        let Some(block) = block else {
            panic!("{before} is not inserted in the layout");
        };

        let mut inst_node = InstNode::with_block(block);
        match prev {
            Some(prev) => {
                inst_node.prev = Some(prev);
                self.insts[prev].next = Some(inst);
            }
            None => self.blocks[block].first_inst = Some(inst),
        }
        inst_node.next = Some(before);
        self.insts[before].prev = Some(inst);
        self.insts[inst] = inst_node;
    }

    /// Remove instruction from the layout.
    pub fn remove_inst(&mut self, inst: InstId) {
        let InstNode { block, prev, next } = self.insts[inst];
        let Some(block) = block else {
            panic!("{inst} is not inserted in the layout");
        };

        match prev {
            Some(prev) => self.insts[prev].next = next,
            None => self.blocks[block].first_inst = next,
        }
        match next {
            Some(next) => self.insts[next].prev = prev,
            None => self.blocks[block].last_inst = prev,
        }

        self.insts[inst] = InstNode::default();
    }
}

struct BlockIter<'a> {
    next: Option<BlockId>,
    blocks: &'a SecondaryMap<BlockId, BlockNode>,
}

impl Iterator for BlockIter<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<BlockId> {
        let next = self.next?;
        self.next = self.blocks[next].next;
        Some(next)
    }
}

struct InstIter<'a> {
    next: Option<InstId>,
    insts: &'a SecondaryMap<InstId, InstNode>,
}

impl Iterator for InstIter<'_> {
    type Item = InstId;

    fn next(&mut self) -> Option<InstId> {
        let next = self.next?;
        self.next = self.insts[next].next;
        Some(next)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
struct BlockNode {
    prev: Option<BlockId>,
    next: Option<BlockId>,
    first_inst: Option<InstId>,
    last_inst: Option<InstId>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
struct InstNode {
    /// The block in which the inst exists.
    block: Option<BlockId>,
    prev: Option<InstId>,
    next: Option<InstId>,
}

impl InstNode {
    fn with_block(block: BlockId) -> Self {
        Self {
            block: Some(block),
            prev: None,
            next: None,
        }
    }
}
