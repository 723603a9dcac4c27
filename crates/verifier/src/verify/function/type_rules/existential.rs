use sil_ir::{
    inst::{
        ArchetypeMethod, ArchetypeToSuper, DeinitExistential, Downcast, InitExistential,
        ProjectExistential, ProtocolMethod, SuperToArchetype,
    },
    InstId, SilType,
};

use crate::diagnostic::DiagnosticCode;

use super::{dispatch::VerifyInst, FunctionVerifier};

impl VerifyInst for ArchetypeMethod {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let operand = verifier.value_ty(*self.operand());

        if let Some(result) = verifier.ensure_result(inst_id) {
            let input = verifier.require_method_type(inst_id, result, "archetype_method");
            if let (Some(input), Some(operand)) = (input, operand) {
                verifier.require_eq(
                    inst_id,
                    DiagnosticCode::InstResultTypeMismatch,
                    "archetype_method result input must match its operand",
                    SilType::object(operand.formal()),
                    input,
                );
            }
        }

        let Some(operand) = operand else {
            return;
        };

        if operand.is_address() {
            let is_archetype = verifier.ctx.is_archetype(operand.formal());
            verifier.require(
                inst_id,
                is_archetype,
                DiagnosticCode::UnexpectedTypeKind,
                "archetype_method operand must be an archetype address",
                operand,
            );
        } else if let Some(instance) = verifier.ctx.metatype_instance(operand.formal()) {
            let is_archetype = verifier.ctx.is_archetype(instance);
            verifier.require(
                inst_id,
                is_archetype,
                DiagnosticCode::UnexpectedTypeKind,
                "archetype_method operand must be the metatype of an archetype",
                operand,
            );
        } else {
            unreachable!(
                "archetype_method operand {} is neither an address nor a metatype",
                verifier.ty_text(operand)
            );
        }
    }
}

impl VerifyInst for ProtocolMethod {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        if let Some(result) = verifier.ensure_result(inst_id) {
            if let Some(input) = verifier.require_method_type(inst_id, result, "protocol_method") {
                let raw_pointer = SilType::object(verifier.ctx.raw_pointer_type());
                verifier.require_eq(
                    inst_id,
                    DiagnosticCode::InstResultTypeMismatch,
                    "protocol_method result input must be a raw pointer",
                    raw_pointer,
                    input,
                );
            }
        }

        verifier.require_existential_address(inst_id, *self.operand(), "protocol_method");
    }
}

impl VerifyInst for ProjectExistential {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.ensure_result(inst_id);
        verifier.require_existential_address(inst_id, *self.operand(), "project_existential");
    }
}

impl VerifyInst for InitExistential {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.ensure_result(inst_id);
        verifier.require_existential_address(inst_id, *self.existential(), "init_existential");
    }
}

impl VerifyInst for DeinitExistential {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_existential_address(inst_id, *self.existential(), "deinit_existential");
    }
}

impl VerifyInst for ArchetypeToSuper {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        if let Some(operand) = verifier.value_ty(*self.operand()) {
            let is_address_only = verifier.ctx.is_address_only(operand.formal());
            verifier.require(
                inst_id,
                is_address_only,
                DiagnosticCode::InstOperandTypeMismatch,
                "archetype_to_super operand must be address-only",
                operand,
            );
            let is_archetype = verifier.ctx.is_archetype(operand.formal());
            verifier.require(
                inst_id,
                is_archetype,
                DiagnosticCode::UnexpectedTypeKind,
                "archetype_to_super operand must be an archetype",
                operand,
            );
        }

        if let Some(result) = verifier.ensure_result(inst_id) {
            let is_ref = verifier.ctx.has_reference_semantics(result.formal());
            verifier.require(
                inst_id,
                is_ref,
                DiagnosticCode::InstResultTypeMismatch,
                "archetype_to_super result must have reference semantics",
                result,
            );
        }
    }
}

impl VerifyInst for SuperToArchetype {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_reference(
            inst_id,
            *self.src(),
            "super_to_archetype source must have reference semantics",
        );

        let Some(dest) = verifier.value_ty(*self.dest()) else {
            return;
        };
        verifier.require(
            inst_id,
            dest.is_address(),
            DiagnosticCode::InstOperandTypeMismatch,
            "super_to_archetype destination must be an address",
            dest,
        );
        let is_archetype = verifier.ctx.is_archetype(dest.formal());
        verifier.require(
            inst_id,
            is_archetype,
            DiagnosticCode::UnexpectedTypeKind,
            "super_to_archetype destination must be an archetype",
            dest,
        );
    }
}

impl VerifyInst for Downcast {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_reference(
            inst_id,
            *self.operand(),
            "downcast operand must have reference semantics",
        );

        if let Some(result) = verifier.ensure_result(inst_id) {
            let is_ref = verifier.ctx.has_reference_semantics(result.formal());
            verifier.require(
                inst_id,
                is_ref,
                DiagnosticCode::InstResultTypeMismatch,
                "downcast result must have reference semantics",
                result,
            );
        }
    }
}
