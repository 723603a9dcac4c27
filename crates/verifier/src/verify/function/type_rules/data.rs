use sil_ir::{
    inst::{
        AssociatedMetatype, ConstantRef, Extract, IntegerLiteral, IntegerValue, Metatype, Tuple,
        ZeroValue,
    },
    InstId,
};

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::{dispatch::VerifyInst, FunctionVerifier};

macro_rules! impl_integer_rule {
    ($($ty:ty => $opname:literal),+ $(,)?) => {
        $(
            impl VerifyInst for $ty {
                fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
                    let Some(result) = verifier.ensure_result(inst_id) else {
                        return;
                    };

                    verifier.require(
                        inst_id,
                        result.formal().is_builtin_integer(),
                        DiagnosticCode::UnexpectedTypeKind,
                        concat!($opname, " result must be a builtin integer"),
                        result,
                    );
                }
            }
        )+
    };
}

impl_integer_rule!(
    IntegerLiteral => "integer_literal",
    IntegerValue => "integer_value",
);

impl VerifyInst for ZeroValue {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(result) = verifier.ensure_result(inst_id) else {
            return;
        };

        verifier.require(
            inst_id,
            !result.is_address(),
            DiagnosticCode::InstResultTypeMismatch,
            "zero_value result must not be an address",
            result,
        );
    }
}

impl VerifyInst for ConstantRef {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(result) = verifier.ensure_result(inst_id) else {
            return;
        };

        let is_func = verifier.ctx.is_any_func(result.formal());
        verifier.require(
            inst_id,
            is_func,
            DiagnosticCode::UnexpectedTypeKind,
            "constant_ref result must have a function type",
            result,
        );
    }
}

impl VerifyInst for Tuple {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(result) = verifier.ensure_result(inst_id) else {
            return;
        };

        let Some(fields) = verifier.ctx.tuple_fields(result.formal()) else {
            verifier.require(
                inst_id,
                false,
                DiagnosticCode::UnexpectedTypeKind,
                "tuple result must have a tuple type",
                result,
            );
            return;
        };

        if fields.len() != self.elements().len() {
            verifier.emit(
                Diagnostic::new(
                    DiagnosticCode::TupleArityMismatch,
                    "tuple element count must match its tuple type",
                    verifier.inst_location(inst_id),
                )
                .with_note(format!(
                    "expected {}, found {}",
                    fields.len(),
                    self.elements().len()
                )),
            );
        }
    }
}

impl VerifyInst for Extract {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_object(
            inst_id,
            *self.operand(),
            "extract operand must not be an address",
        );
        if let Some(operand) = verifier.value_ty(*self.operand()) {
            let is_ref = verifier.ctx.has_reference_semantics(operand.formal());
            verifier.require(
                inst_id,
                !is_ref,
                DiagnosticCode::InstOperandTypeMismatch,
                "extract operand must not have reference semantics",
                operand,
            );
        }

        if let Some(result) = verifier.ensure_result(inst_id) {
            verifier.require(
                inst_id,
                !result.is_address(),
                DiagnosticCode::InstResultTypeMismatch,
                "extract result must not be an address",
                result,
            );
        }
    }
}

impl VerifyInst for Metatype {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(result) = verifier.ensure_result(inst_id) else {
            return;
        };

        let is_metatype = verifier.ctx.is_metatype(result.formal());
        verifier.require(
            inst_id,
            is_metatype,
            DiagnosticCode::UnexpectedTypeKind,
            "metatype result must be a metatype",
            result,
        );
    }
}

impl VerifyInst for AssociatedMetatype {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        if let Some(result) = verifier.ensure_result(inst_id) {
            let is_metatype = verifier.ctx.is_metatype(result.formal());
            verifier.require(
                inst_id,
                is_metatype,
                DiagnosticCode::UnexpectedTypeKind,
                "associated_metatype result must be a metatype",
                result,
            );
        }

        if let Some(operand) = verifier.value_ty(*self.operand()) {
            let is_metatype = verifier.ctx.is_metatype(operand.formal());
            verifier.require(
                inst_id,
                is_metatype,
                DiagnosticCode::UnexpectedTypeKind,
                "associated_metatype operand must be a metatype",
                operand,
            );
        }
    }
}
