use sil_ir::{InstData, InstId};

use crate::diagnostic::{Diagnostic, DiagnosticCode, Location};

use super::FunctionVerifier;

impl FunctionVerifier<'_> {
    pub(super) fn check_block_structure(&mut self) {
        if self.block_order.is_empty() {
            self.emit(Diagnostic::new(
                DiagnosticCode::MissingEntryBlock,
                "function must have an entry block",
                Location::Function(self.func_ref),
            ));
            return;
        }

        for block in self.block_order.clone() {
            let insts = self.block_to_insts.get(&block).cloned().unwrap_or_default();
            let Some((&last, rest)) = insts.split_last() else {
                self.emit(Diagnostic::new(
                    DiagnosticCode::EmptyBlock,
                    "block must not be empty",
                    self.block_location(block),
                ));
                continue;
            };

            let mut seen_terminator = false;
            for &inst in rest {
                if self.is_terminator(inst) {
                    seen_terminator = true;
                    self.emit(Diagnostic::new(
                        DiagnosticCode::TerminatorNotLast,
                        "terminator must be the last instruction of its block",
                        self.inst_location(inst),
                    ));
                }
            }

            if self.is_terminator(last) {
                continue;
            }

            if seen_terminator {
                self.emit(Diagnostic::new(
                    DiagnosticCode::NonTerminatorAtEnd,
                    "instruction after a terminator must not end the block",
                    self.inst_location(last),
                ));
            } else {
                self.emit(
                    Diagnostic::new(
                        DiagnosticCode::MissingTerminator,
                        "block must end in terminator",
                        self.block_location(block),
                    )
                    .with_note(format!("last instruction is {}", self.inst_text(last))),
                );
            }
        }
    }

    fn is_terminator(&self, inst: InstId) -> bool {
        self.func
            .dfg
            .get_inst(inst)
            .is_some_and(InstData::is_terminator)
    }
}
