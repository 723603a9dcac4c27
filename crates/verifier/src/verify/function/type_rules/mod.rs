use sil_ir::{InstId, SilType, ValueId};
use tracing::trace;

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::FunctionVerifier;

mod call;
mod control_flow;
mod data;
mod dispatch;
mod existential;
mod memory;

impl FunctionVerifier<'_> {
    pub(super) fn check_type_rules(&mut self) {
        let func = self.func;
        for inst_id in self.insts_in_order() {
            let Some(inst) = func.dfg.get_inst(inst_id) else {
                continue;
            };

            trace!(inst = %self.inst_text(inst_id), "check type rules");
            if !inst.has_result() {
                self.expect_no_result(inst_id);
            }
            dispatch::rule_for(inst).verify_inst(self, inst_id);
        }
    }

    /// Reports `message` at `inst_id` unless `holds`. `found` is the type
    /// that broke the rule.
    fn require(
        &mut self,
        inst_id: InstId,
        holds: bool,
        code: DiagnosticCode,
        message: &str,
        found: SilType,
    ) {
        if holds {
            return;
        }

        self.emit(
            Diagnostic::new(code, message, self.inst_location(inst_id))
                .with_note(format!("found {}", self.ty_text(found))),
        );
    }

    fn require_eq(
        &mut self,
        inst_id: InstId,
        code: DiagnosticCode,
        message: &str,
        expected: SilType,
        found: SilType,
    ) {
        if expected == found {
            return;
        }

        self.emit(
            Diagnostic::new(code, message, self.inst_location(inst_id)).with_note(format!(
                "expected {}, found {}",
                self.ty_text(expected),
                self.ty_text(found)
            )),
        );
    }

    fn require_operand_address(&mut self, inst_id: InstId, operand: ValueId, message: &str) {
        if let Some(ty) = self.value_ty(operand) {
            self.require(
                inst_id,
                ty.is_address(),
                DiagnosticCode::InstOperandTypeMismatch,
                message,
                ty,
            );
        }
    }

    fn require_operand_object(&mut self, inst_id: InstId, operand: ValueId, message: &str) {
        if let Some(ty) = self.value_ty(operand) {
            self.require(
                inst_id,
                !ty.is_address(),
                DiagnosticCode::InstOperandTypeMismatch,
                message,
                ty,
            );
        }
    }

    fn require_operand_reference(&mut self, inst_id: InstId, operand: ValueId, message: &str) {
        if let Some(ty) = self.value_ty(operand) {
            let holds = self.ctx.has_reference_semantics(ty.formal());
            self.require(
                inst_id,
                holds,
                DiagnosticCode::InstOperandTypeMismatch,
                message,
                ty,
            );
        }
    }

    /// Checks that `operand` is the address of an existential.
    fn require_existential_address(&mut self, inst_id: InstId, operand: ValueId, name: &str) {
        let Some(ty) = self.value_ty(operand) else {
            return;
        };

        self.require(
            inst_id,
            ty.is_address(),
            DiagnosticCode::InstOperandTypeMismatch,
            &format!("{name} operand must be an address"),
            ty,
        );
        let is_existential = self.ctx.is_existential(ty.formal());
        self.require(
            inst_id,
            is_existential,
            DiagnosticCode::UnexpectedTypeKind,
            &format!("{name} operand must be existential"),
            ty,
        );
    }

    /// Checks that `ty` is a concrete function type returning a function, and
    /// returns its input type.
    fn require_method_type(&mut self, inst_id: InstId, ty: SilType, name: &str) -> Option<SilType> {
        let Some((input, result)) = self.ctx.func_signature(ty.formal()) else {
            self.require(
                inst_id,
                false,
                DiagnosticCode::UnexpectedTypeKind,
                &format!("{name} result must have a concrete function type"),
                ty,
            );
            return None;
        };

        let returns_func = self.ctx.is_any_func(result);
        self.require(
            inst_id,
            returns_func,
            DiagnosticCode::UnexpectedTypeKind,
            &format!("{name} result must return a function"),
            SilType::object(result),
        );

        Some(SilType::object(input))
    }
}
