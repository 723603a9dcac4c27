//! This module contains IR value definition.
use cranelift_entity::entity_impl;

use crate::{dfg::BlockId, inst::InstId, types::SilType};

/// An opaque reference to [`Value`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Copy, Hash)]
pub struct ValueId(pub u32);
entity_impl!(ValueId, "%");

/// An value data definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The value is defined by an instruction.
    Inst { inst: InstId, ty: SilType },

    /// The value is a block argument.
    Arg {
        block: BlockId,
        idx: usize,
        ty: SilType,
    },
}

impl Value {
    pub fn ty(&self) -> SilType {
        match self {
            Self::Inst { ty, .. } | Self::Arg { ty, .. } => *ty,
        }
    }

    /// Returns the instruction defining the value, if any.
    pub fn defining_inst(&self) -> Option<InstId> {
        match self {
            Self::Inst { inst, .. } => Some(*inst),
            Self::Arg { .. } => None,
        }
    }
}
