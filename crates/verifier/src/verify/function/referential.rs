use sil_ir::{BlockId, InstId};

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::FunctionVerifier;

impl FunctionVerifier<'_> {
    pub(super) fn check_referential_integrity(&mut self) {
        let func = self.func;
        for inst_id in self.insts_in_order() {
            let Some(inst) = func.dfg.get_inst(inst_id) else {
                continue;
            };

            for value in inst.collect_values() {
                if func.dfg.get_value(value).is_none() {
                    self.emit(
                        Diagnostic::new(
                            DiagnosticCode::InvalidValueRef,
                            "instruction references a value outside the function",
                            self.inst_location(inst_id),
                        )
                        .with_note(format!("{value} is not defined")),
                    );
                }
            }

            for (dest, _) in inst.branch_dests() {
                self.check_branch_dest(inst_id, dest);
            }
        }
    }

    fn check_branch_dest(&mut self, inst_id: InstId, dest: BlockId) {
        let note = if !self.func.dfg.has_block(dest) {
            format!("{dest} is not a block of this function")
        } else if !self.func.layout.is_block_inserted(dest) {
            format!("{dest} is not placed in the layout")
        } else {
            return;
        };

        self.emit(
            Diagnostic::new(
                DiagnosticCode::BranchToMissingBlock,
                "branch destination must be a block of the function",
                self.inst_location(inst_id),
            )
            .with_note(note),
        );
    }
}
