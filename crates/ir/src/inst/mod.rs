//! This module contains the instruction set of the IR.
//!
//! Every instruction kind is a plain struct with strongly typed operand
//! accessors, and [`InstData`] is the closed set of all kinds.

/// Defines an instruction struct with a constructor and operand accessors.
///
/// Fields marked with `#[value]` hold value operands and are visited by
/// `visit_values`.
macro_rules! define_inst {
    (@visit value, $this:ident . $field:ident, $f:ident) => {
        $crate::inst::ValueOperand::visit_values(&$this.$field, $f)
    };

    (
        $(#[$meta:meta])*
        $name:ident = $text:literal {
            $( $(#[$kind:ident])? $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            $($field: $ty),*
        }

        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new($($field: $ty),*) -> Self {
                Self { $($field),* }
            }

            pub const fn inst_name() -> &'static str {
                $text
            }

            $(
                pub fn $field(&self) -> &$ty {
                    &self.$field
                }
            )*

            #[allow(unused_variables)]
            pub fn visit_values(&self, f: &mut dyn FnMut($crate::ValueId)) {
                $( $( define_inst!(@visit $kind, self.$field, f); )? )*
            }
        }
    };
}

/// Defines [`InstData`] over the given instruction kinds.
macro_rules! inst_set {
    ($($kind:ident),* $(,)?) => {
        /// The closed set of instruction kinds.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum InstData {
            $($kind($kind)),*
        }

        impl InstData {
            pub fn as_text(&self) -> &'static str {
                match self {
                    $(Self::$kind(_) => $kind::inst_name()),*
                }
            }

            /// Calls `f` with every value operand in operand order.
            pub fn visit_values(&self, f: &mut dyn FnMut(ValueId)) {
                match self {
                    $(Self::$kind(inst) => inst.visit_values(f)),*
                }
            }
        }

        $(
            impl From<$kind> for InstData {
                fn from(inst: $kind) -> Self {
                    Self::$kind(inst)
                }
            }
        )*
    };
}

pub mod call;
pub mod control_flow;
pub mod data;
pub mod existential;
pub mod memory;

use cranelift_entity::entity_impl;
use smallvec::SmallVec;

use crate::{dfg::BlockId, ValueId};

pub use call::{Apply, Specialize};
pub use control_flow::{Branch, CondBranch, Return};
pub use data::{
    AssociatedMetatype, ConstantRef, Extract, IntegerLiteral, IntegerValue, Metatype, Tuple,
    ZeroValue,
};
pub use existential::{
    ArchetypeMethod, ArchetypeToSuper, DeinitExistential, Downcast, InitExistential,
    ProjectExistential, ProtocolMethod, SuperToArchetype,
};
pub use memory::{
    AllocRef, AllocVar, CopyAddr, DeallocRef, DeallocVar, DestroyAddr, ElementAddr, IndexAddr,
    Load, RefElementAddr, Release, Retain, Store, ZeroAddr,
};

/// An opaque reference to [`InstData`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Copy, Hash)]
pub struct InstId(pub u32);
entity_impl!(InstId, "inst");

inst_set! {
    AllocVar,
    AllocRef,
    Load,
    Store,
    CopyAddr,
    ZeroAddr,
    DeallocVar,
    DeallocRef,
    DestroyAddr,
    IndexAddr,
    ElementAddr,
    RefElementAddr,
    Retain,
    Release,
    IntegerLiteral,
    IntegerValue,
    ZeroValue,
    ConstantRef,
    Tuple,
    Extract,
    Metatype,
    AssociatedMetatype,
    Apply,
    Specialize,
    ArchetypeMethod,
    ProtocolMethod,
    ProjectExistential,
    InitExistential,
    DeinitExistential,
    ArchetypeToSuper,
    SuperToArchetype,
    Downcast,
    Return,
    Branch,
    CondBranch,
}

impl InstData {
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::Return(_) | Self::Branch(_) | Self::CondBranch(_)
        )
    }

    /// Returns `true` if an instruction of this kind produces a value.
    pub fn has_result(&self) -> bool {
        !matches!(
            self,
            Self::Store(_)
                | Self::CopyAddr(_)
                | Self::ZeroAddr(_)
                | Self::DeallocVar(_)
                | Self::DeallocRef(_)
                | Self::DestroyAddr(_)
                | Self::Retain(_)
                | Self::Release(_)
                | Self::DeinitExistential(_)
                | Self::SuperToArchetype(_)
                | Self::Return(_)
                | Self::Branch(_)
                | Self::CondBranch(_)
        )
    }

    /// Returns the branch destinations together with the arguments passed to
    /// each of them.
    pub fn branch_dests(&self) -> SmallVec<[(BlockId, &[ValueId]); 2]> {
        let mut dests = SmallVec::new();
        match self {
            Self::Branch(br) => dests.push((*br.dest(), br.args().as_slice())),
            Self::CondBranch(br) => {
                dests.push((*br.then_dest(), br.then_args().as_slice()));
                dests.push((*br.else_dest(), br.else_args().as_slice()));
            }
            _ => {}
        }
        dests
    }

    pub fn collect_values(&self) -> SmallVec<[ValueId; 4]> {
        let mut values = SmallVec::new();
        self.visit_values(&mut |value| values.push(value));
        values
    }
}

/// An operand slot holding zero or more values.
pub trait ValueOperand {
    fn visit_values(&self, f: &mut dyn FnMut(ValueId));
}

impl ValueOperand for ValueId {
    fn visit_values(&self, f: &mut dyn FnMut(ValueId)) {
        f(*self)
    }
}

impl ValueOperand for Option<ValueId> {
    fn visit_values(&self, f: &mut dyn FnMut(ValueId)) {
        if let Some(value) = self {
            f(*value)
        }
    }
}

impl<A> ValueOperand for SmallVec<A>
where
    A: smallvec::Array<Item = ValueId>,
{
    fn visit_values(&self, f: &mut dyn FnMut(ValueId)) {
        for value in self {
            f(*value)
        }
    }
}
