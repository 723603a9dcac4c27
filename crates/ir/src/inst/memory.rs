//! Memory and reference counting instructions.
use crate::ValueId;

define_inst! {
    /// Allocates an uninitialized stack slot. The result is its address.
    AllocVar = "alloc_var" {}
}

define_inst! {
    /// Allocates a heap object. The result is a reference to it.
    AllocRef = "alloc_ref" {}
}

define_inst! {
    /// Loads the value stored at the address `lvalue`.
    Load = "load" {
        #[value] lvalue: ValueId,
    }
}

define_inst! {
    /// Stores `src` into the memory at address `dest`.
    Store = "store" {
        #[value] src: ValueId,
        #[value] dest: ValueId,
    }
}

define_inst! {
    /// Copies the value at `src` into `dest`. `is_take` moves the source out,
    /// `is_initialize` treats the destination as uninitialized memory.
    CopyAddr = "copy_addr" {
        #[value] src: ValueId,
        #[value] dest: ValueId,
        is_take: bool,
        is_initialize: bool,
    }
}

define_inst! {
    ZeroAddr = "zero_addr" {
        #[value] dest: ValueId,
    }
}

define_inst! {
    DeallocVar = "dealloc_var" {
        #[value] operand: ValueId,
    }
}

define_inst! {
    DeallocRef = "dealloc_ref" {
        #[value] operand: ValueId,
    }
}

define_inst! {
    /// Destroys the value stored at an address in place.
    DestroyAddr = "destroy_addr" {
        #[value] operand: ValueId,
    }
}

define_inst! {
    IndexAddr = "index_addr" {
        #[value] operand: ValueId,
        index: i64,
    }
}

define_inst! {
    /// Projects the address of a field from the address of an aggregate.
    ElementAddr = "element_addr" {
        #[value] operand: ValueId,
        field_no: u32,
    }
}

define_inst! {
    /// Projects the address of a field from a reference.
    RefElementAddr = "ref_element_addr" {
        #[value] operand: ValueId,
        field_no: u32,
    }
}

define_inst! {
    Retain = "retain" {
        #[value] operand: ValueId,
    }
}

define_inst! {
    Release = "release" {
        #[value] operand: ValueId,
    }
}
