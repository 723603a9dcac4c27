//! Archetype and existential instructions.
use crate::{Type, ValueId};

define_inst! {
    /// Looks up a method of an archetype, either through the address of an
    /// archetype value or through an archetype metatype.
    ArchetypeMethod = "archetype_method" {
        #[value] operand: ValueId,
        member: String,
    }
}

define_inst! {
    /// Looks up a protocol witness of an existential container.
    ProtocolMethod = "protocol_method" {
        #[value] operand: ValueId,
        member: String,
    }
}

define_inst! {
    ProjectExistential = "project_existential" {
        #[value] operand: ValueId,
    }
}

define_inst! {
    /// Prepares an existential container for a value of type `concrete`. The
    /// result is the address of the payload.
    InitExistential = "init_existential" {
        #[value] existential: ValueId,
        concrete: Type,
    }
}

define_inst! {
    DeinitExistential = "deinit_existential" {
        #[value] existential: ValueId,
    }
}

define_inst! {
    ArchetypeToSuper = "archetype_to_super" {
        #[value] operand: ValueId,
    }
}

define_inst! {
    /// Stores the reference `src` into the archetype address `dest`.
    SuperToArchetype = "super_to_archetype" {
        #[value] src: ValueId,
        #[value] dest: ValueId,
    }
}

define_inst! {
    Downcast = "downcast" {
        #[value] operand: ValueId,
    }
}
