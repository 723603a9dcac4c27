use sil_ir::{
    inst::{Apply, Specialize},
    InstId,
};
use tracing::trace;

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::{dispatch::VerifyInst, FunctionVerifier};

impl VerifyInst for Apply {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let result = verifier.ensure_result(inst_id);
        let Some(callee) = verifier.value_ty(*self.callee()) else {
            return;
        };

        verifier.require(
            inst_id,
            !callee.is_address(),
            DiagnosticCode::InstOperandTypeMismatch,
            "apply callee must not be an address",
            callee,
        );

        let Some(info) = verifier.ctx.func_type_info(callee.formal()) else {
            verifier.require(
                inst_id,
                false,
                DiagnosticCode::UnexpectedTypeKind,
                "apply callee must have a concrete function type",
                callee,
            );
            return;
        };

        trace!(
            callee = %verifier.ty_text(callee),
            inputs = info.input_types().len(),
            args = self.args().len(),
            "apply"
        );

        let inputs = info.input_types();
        if inputs.len() != self.args().len() {
            verifier.emit(
                Diagnostic::new(
                    DiagnosticCode::CallArityMismatch,
                    "apply argument count mismatch",
                    verifier.inst_location(inst_id),
                )
                .with_note(format!(
                    "expected {}, found {}",
                    inputs.len(),
                    self.args().len()
                )),
            );
        } else {
            for (idx, (arg, input)) in self.args().iter().zip(inputs).enumerate() {
                let Some(arg_ty) = verifier.value_ty(*arg) else {
                    continue;
                };
                trace!(idx, arg = %verifier.ty_text(arg_ty), input = %verifier.ty_text(*input));

                if arg_ty != *input {
                    verifier.emit(
                        Diagnostic::new(
                            DiagnosticCode::CallArgTypeMismatch,
                            "apply argument type mismatch",
                            verifier.inst_location(inst_id),
                        )
                        .with_note(format!(
                            "argument {idx}: expected {}, found {}",
                            verifier.ty_text(*input),
                            verifier.ty_text(arg_ty)
                        )),
                    );
                }
            }
        }

        if let Some(result) = result {
            verifier.require_eq(
                inst_id,
                DiagnosticCode::CallResultTypeMismatch,
                "apply result type mismatch",
                info.result_type(),
                result,
            );
        }
    }
}

impl VerifyInst for Specialize {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        if let Some(result) = verifier.ensure_result(inst_id) {
            let is_func = verifier.ctx.is_func(result.formal());
            verifier.require(
                inst_id,
                is_func,
                DiagnosticCode::UnexpectedTypeKind,
                "specialize result must have a concrete function type",
                result,
            );
        }

        if let Some(operand) = verifier.value_ty(*self.operand()) {
            let is_poly = verifier.ctx.is_poly_func(operand.formal());
            verifier.require(
                inst_id,
                is_poly,
                DiagnosticCode::UnexpectedTypeKind,
                "specialize operand must have a polymorphic function type",
                operand,
            );
        }
    }
}
