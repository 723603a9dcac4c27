use sil_ir::{BlockId, InstId, ValueId};

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::FunctionVerifier;

impl FunctionVerifier<'_> {
    pub(super) fn check_branch_args(&mut self) {
        let func = self.func;
        for inst_id in self.insts_in_order() {
            let Some(inst) = func.dfg.get_inst(inst_id) else {
                continue;
            };

            for (dest, args) in inst.branch_dests() {
                // Missing destinations are reported by the referential checks.
                if !func.dfg.has_block(dest) {
                    continue;
                }
                self.check_dest_args(inst_id, dest, args);
            }
        }
    }

    fn check_dest_args(&mut self, inst_id: InstId, dest: BlockId, args: &[ValueId]) {
        let func = self.func;
        let params = func.dfg.block_params(dest);
        if args.len() != params.len() {
            self.emit(
                Diagnostic::new(
                    DiagnosticCode::BranchArgCountMismatch,
                    "branch argument count must match destination parameters",
                    self.inst_location(inst_id),
                )
                .with_note(format!(
                    "{dest} expects {}, found {}",
                    params.len(),
                    args.len()
                )),
            );
            return;
        }

        for (idx, (arg, param)) in args.iter().zip(params).enumerate() {
            let (Some(arg_ty), Some(param_ty)) = (self.value_ty(*arg), self.value_ty(*param))
            else {
                continue;
            };

            if arg_ty != param_ty {
                self.emit(
                    Diagnostic::new(
                        DiagnosticCode::BranchArgTypeMismatch,
                        "branch argument type must match destination parameter",
                        self.inst_location(inst_id),
                    )
                    .with_note(format!(
                        "argument {idx} to {dest}: expected {}, found {}",
                        self.ty_text(param_ty),
                        self.ty_text(arg_ty)
                    )),
                );
            }
        }
    }
}
