use smallvec::SmallVec;

use crate::{dfg::BlockId, ValueId};

define_inst! {
    /// Returns from the function. A missing value is malformed IR.
    Return = "return" {
        #[value] value: Option<ValueId>,
    }
}

define_inst! {
    Branch = "br" {
        dest: BlockId,
        #[value] args: SmallVec<[ValueId; 4]>,
    }
}

define_inst! {
    CondBranch = "cond_br" {
        #[value] cond: Option<ValueId>,
        then_dest: BlockId,
        #[value] then_args: SmallVec<[ValueId; 4]>,
        else_dest: BlockId,
        #[value] else_args: SmallVec<[ValueId; 4]>,
    }
}
