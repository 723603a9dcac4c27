use smallvec::SmallVec;

use crate::ValueId;

define_inst! {
    Apply = "apply" {
        #[value] callee: ValueId,
        #[value] args: SmallVec<[ValueId; 8]>,
    }
}

define_inst! {
    /// Instantiates a polymorphic function. The substitutions are carried by
    /// the result type.
    Specialize = "specialize" {
        #[value] operand: ValueId,
    }
}
