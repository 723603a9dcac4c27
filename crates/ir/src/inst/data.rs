use smallvec::SmallVec;

use crate::ValueId;

define_inst! {
    IntegerLiteral = "integer_literal" {
        value: i128,
    }
}

define_inst! {
    /// Materializes an integer constant.
    IntegerValue = "integer_value" {
        value: i128,
    }
}

define_inst! {
    ZeroValue = "zero_value" {}
}

define_inst! {
    /// A reference to a declared function.
    ConstantRef = "constant_ref" {
        decl: String,
    }
}

define_inst! {
    Tuple = "tuple" {
        #[value] elements: SmallVec<[ValueId; 8]>,
    }
}

define_inst! {
    /// Extracts a field from an aggregate value.
    Extract = "extract" {
        #[value] operand: ValueId,
        field_no: u32,
    }
}

define_inst! {
    Metatype = "metatype" {}
}

define_inst! {
    /// Derives the metatype of an associated type from the metatype of a
    /// generic parameter.
    AssociatedMetatype = "associated_metatype" {
        #[value] operand: ValueId,
        member: String,
    }
}
