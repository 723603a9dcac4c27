use sil_ir::{
    inst::{Branch, CondBranch, Return},
    InstId,
};

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::{dispatch::VerifyInst, FunctionVerifier};

impl VerifyInst for Return {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        // TODO: check the value against the lowered result type of the
        // function once curried entry points carry their uncurried type.
        if self.value().is_none() {
            verifier.emit(Diagnostic::new(
                DiagnosticCode::MissingOperand,
                "return value must be present",
                verifier.inst_location(inst_id),
            ));
        }
    }
}

impl VerifyInst for Branch {
    fn verify_inst(&self, _verifier: &mut FunctionVerifier<'_>, _inst_id: InstId) {}
}

impl VerifyInst for CondBranch {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        if self.cond().is_none() {
            verifier.emit(Diagnostic::new(
                DiagnosticCode::MissingOperand,
                "cond_br condition must be present",
                verifier.inst_location(inst_id),
            ));
        }
    }
}
