use std::fmt;

use sil_ir::{module::FuncRef, BlockId, InstId, ValueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    InvalidValueRef,
    MissingEntryBlock,
    EmptyBlock,
    MissingTerminator,
    TerminatorNotLast,
    NonTerminatorAtEnd,
    BranchToMissingBlock,
    BranchArgCountMismatch,
    BranchArgTypeMismatch,
    InstOperandTypeMismatch,
    InstResultTypeMismatch,
    CallArgTypeMismatch,
    CallArityMismatch,
    CallResultTypeMismatch,
    UnexpectedTypeKind,
    TupleArityMismatch,
    MissingOperand,
    InstResultMapBroken,
}

/// The category of invariant a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Block and terminator placement.
    Structural,
    /// Dangling value or block references.
    Referential,
    /// Wrong operand count, or a type of the wrong structural kind.
    Shape,
    /// An operand or result type disagrees with the instruction contract.
    TypeMismatch,
}

impl DiagnosticCode {
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::InvalidValueRef => 1,
            Self::MissingEntryBlock => 105,
            Self::EmptyBlock => 200,
            Self::MissingTerminator => 201,
            Self::TerminatorNotLast => 202,
            Self::NonTerminatorAtEnd => 203,
            Self::BranchToMissingBlock => 300,
            Self::BranchArgCountMismatch => 302,
            Self::BranchArgTypeMismatch => 303,
            Self::InstOperandTypeMismatch => 600,
            Self::InstResultTypeMismatch => 601,
            Self::CallArgTypeMismatch => 602,
            Self::CallArityMismatch => 603,
            Self::CallResultTypeMismatch => 604,
            Self::UnexpectedTypeKind => 605,
            Self::TupleArityMismatch => 606,
            Self::MissingOperand => 607,
            Self::InstResultMapBroken => 701,
        }
    }

    pub const fn kind(self) -> ViolationKind {
        match self {
            Self::MissingEntryBlock
            | Self::EmptyBlock
            | Self::MissingTerminator
            | Self::TerminatorNotLast
            | Self::NonTerminatorAtEnd
            | Self::InstResultMapBroken => ViolationKind::Structural,
            Self::InvalidValueRef | Self::BranchToMissingBlock => ViolationKind::Referential,
            Self::BranchArgCountMismatch
            | Self::CallArityMismatch
            | Self::UnexpectedTypeKind
            | Self::TupleArityMismatch
            | Self::MissingOperand => ViolationKind::Shape,
            Self::BranchArgTypeMismatch
            | Self::InstOperandTypeMismatch
            | Self::InstResultTypeMismatch
            | Self::CallArgTypeMismatch
            | Self::CallResultTypeMismatch => ViolationKind::TypeMismatch,
        }
    }

    pub fn as_str(self) -> String {
        format!("IR{:04}", self.as_u16())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Module,
    Function(FuncRef),
    Block {
        func: FuncRef,
        block: BlockId,
    },
    Inst {
        func: FuncRef,
        block: Option<BlockId>,
        inst: InstId,
    },
    Value {
        func: FuncRef,
        value: ValueId,
    },
}

impl Location {
    pub fn func(&self) -> Option<FuncRef> {
        match self {
            Self::Module => None,
            Self::Function(func)
            | Self::Block { func, .. }
            | Self::Inst { func, .. }
            | Self::Value { func, .. } => Some(*func),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => f.write_str("module"),
            Self::Function(func) => write!(f, "{func}"),
            Self::Block { func, block } => write!(f, "{func}:{block}"),
            Self::Inst { func, block, inst } => {
                if let Some(block) = block {
                    write!(f, "{func}:{block}:{inst}")
                } else {
                    write!(f, "{func}:{inst}")
                }
            }
            Self::Value { func, value } => write!(f, "{func}:{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticContext {
    pub function_name: Option<String>,
    pub inst_text: Option<String>,
}

/// A violated invariant. Every diagnostic is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub primary: Location,
    pub notes: Vec<Note>,
    pub context: Option<DiagnosticContext>,
    pub snippet: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, primary: Location) -> Self {
        Self {
            code,
            message: message.into(),
            primary,
            notes: Vec::new(),
            context: None,
            snippet: None,
        }
    }

    pub fn with_note(mut self, message: impl Into<String>) -> Self {
        self.notes.push(Note {
            message: message.into(),
        });
        self
    }

    pub fn with_context(mut self, context: DiagnosticContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_snippet(mut self, snippet: Option<String>) -> Self {
        self.snippet = snippet;
        self
    }

    pub fn kind(&self) -> ViolationKind {
        self.code.kind()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}] {} @ {}", self.code, self.message, self.primary)?;

        if let Some(context) = &self.context {
            match (&context.function_name, &context.inst_text) {
                (Some(function_name), Some(inst_text)) => {
                    write!(f, " ({function_name}, {inst_text})")?;
                }
                (Some(function_name), None) => {
                    write!(f, " ({function_name})")?;
                }
                (None, Some(inst_text)) => {
                    write!(f, " ({inst_text})")?;
                }
                (None, None) => {}
            }
        }

        writeln!(f)?;

        for note in &self.notes {
            writeln!(f, "  note: {}", note.message)?;
        }

        if let Some(snippet) = &self.snippet {
            writeln!(f, "{snippet}")?;
        }

        Ok(())
    }
}
