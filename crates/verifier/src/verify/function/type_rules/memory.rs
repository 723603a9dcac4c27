use sil_ir::{
    inst::{
        AllocRef, AllocVar, CopyAddr, DeallocRef, DeallocVar, DestroyAddr, ElementAddr, IndexAddr,
        Load, RefElementAddr, Release, Retain, Store, ZeroAddr,
    },
    InstId,
};

use crate::diagnostic::DiagnosticCode;

use super::{dispatch::VerifyInst, FunctionVerifier};

impl VerifyInst for AllocVar {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(result) = verifier.ensure_result(inst_id) else {
            return;
        };

        verifier.require(
            inst_id,
            result.is_address(),
            DiagnosticCode::InstResultTypeMismatch,
            "alloc_var result must be an address",
            result,
        );
    }
}

impl VerifyInst for AllocRef {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(result) = verifier.ensure_result(inst_id) else {
            return;
        };

        let is_ref = verifier.ctx.has_reference_semantics(result.formal());
        verifier.require(
            inst_id,
            is_ref,
            DiagnosticCode::InstResultTypeMismatch,
            "alloc_ref result must have reference semantics",
            result,
        );
        verifier.require(
            inst_id,
            !result.is_address(),
            DiagnosticCode::InstResultTypeMismatch,
            "alloc_ref result must not be an address",
            result,
        );
    }
}

impl VerifyInst for Load {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let result = verifier.ensure_result(inst_id);
        if let Some(result) = result {
            verifier.require(
                inst_id,
                !result.is_address(),
                DiagnosticCode::InstResultTypeMismatch,
                "load result must not be an address",
                result,
            );
        }

        let Some(src) = verifier.value_ty(*self.lvalue()) else {
            return;
        };
        verifier.require(
            inst_id,
            src.is_address(),
            DiagnosticCode::InstOperandTypeMismatch,
            "load operand must be an address",
            src,
        );

        if let Some(result) = result {
            verifier.require_eq(
                inst_id,
                DiagnosticCode::InstResultTypeMismatch,
                "load result must be the object type of its operand",
                src.object_type(),
                result,
            );
        }
    }
}

impl VerifyInst for Store {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let src = verifier.value_ty(*self.src());
        let dest = verifier.value_ty(*self.dest());

        verifier.require_operand_object(
            inst_id,
            *self.src(),
            "store source must not be an address",
        );
        verifier.require_operand_address(
            inst_id,
            *self.dest(),
            "store destination must be an address",
        );

        if let (Some(src), Some(dest)) = (src, dest) {
            verifier.require_eq(
                inst_id,
                DiagnosticCode::InstOperandTypeMismatch,
                "store source must be the object type of its destination",
                dest.object_type(),
                src,
            );
        }
    }
}

impl VerifyInst for CopyAddr {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_address(
            inst_id,
            *self.src(),
            "copy_addr source must be an address",
        );
        verifier.require_operand_address(
            inst_id,
            *self.dest(),
            "copy_addr destination must be an address",
        );

        let src = verifier.value_ty(*self.src());
        let dest = verifier.value_ty(*self.dest());
        if let (Some(src), Some(dest)) = (src, dest) {
            verifier.require_eq(
                inst_id,
                DiagnosticCode::InstOperandTypeMismatch,
                "copy_addr source and destination types must match",
                dest,
                src,
            );
        }
    }
}

impl VerifyInst for ZeroAddr {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_address(
            inst_id,
            *self.dest(),
            "zero_addr destination must be an address",
        );
    }
}

impl VerifyInst for DeallocVar {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_address(
            inst_id,
            *self.operand(),
            "dealloc_var operand must be an address",
        );
    }
}

impl VerifyInst for DeallocRef {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_object(
            inst_id,
            *self.operand(),
            "dealloc_ref operand must not be an address",
        );
        verifier.require_operand_reference(
            inst_id,
            *self.operand(),
            "dealloc_ref operand must have reference semantics",
        );
    }
}

impl VerifyInst for DestroyAddr {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(ty) = verifier.value_ty(*self.operand()) else {
            return;
        };

        let is_address_only = verifier.ctx.is_address_only(ty.formal());
        verifier.require(
            inst_id,
            is_address_only,
            DiagnosticCode::InstOperandTypeMismatch,
            "destroy_addr operand must be address-only",
            ty,
        );
    }
}

impl VerifyInst for IndexAddr {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        let Some(result) = verifier.ensure_result(inst_id) else {
            return;
        };

        verifier.require(
            inst_id,
            result.is_address(),
            DiagnosticCode::InstResultTypeMismatch,
            "index_addr result must be an address",
            result,
        );
        if let Some(operand) = verifier.value_ty(*self.operand()) {
            verifier.require_eq(
                inst_id,
                DiagnosticCode::InstResultTypeMismatch,
                "index_addr result type must match its operand",
                operand,
                result,
            );
        }
    }
}

impl VerifyInst for ElementAddr {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_address(
            inst_id,
            *self.operand(),
            "element_addr operand must be an address",
        );
        if let Some(operand) = verifier.value_ty(*self.operand()) {
            let is_ref = verifier.ctx.has_reference_semantics(operand.formal());
            verifier.require(
                inst_id,
                !is_ref,
                DiagnosticCode::InstOperandTypeMismatch,
                "element_addr operand must not have reference semantics",
                operand,
            );
        }

        if let Some(result) = verifier.ensure_result(inst_id) {
            verifier.require(
                inst_id,
                result.is_address(),
                DiagnosticCode::InstResultTypeMismatch,
                "element_addr result must be an address",
                result,
            );
        }
    }
}

impl VerifyInst for RefElementAddr {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
        verifier.require_operand_object(
            inst_id,
            *self.operand(),
            "ref_element_addr operand must not be an address",
        );
        verifier.require_operand_reference(
            inst_id,
            *self.operand(),
            "ref_element_addr operand must have reference semantics",
        );

        if let Some(result) = verifier.ensure_result(inst_id) {
            verifier.require(
                inst_id,
                result.is_address(),
                DiagnosticCode::InstResultTypeMismatch,
                "ref_element_addr result must be an address",
                result,
            );
        }
    }
}

macro_rules! impl_refcount_rule {
    ($($ty:ty => $opname:literal),+ $(,)?) => {
        $(
            impl VerifyInst for $ty {
                fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId) {
                    verifier.require_operand_object(
                        inst_id,
                        *self.operand(),
                        concat!($opname, " operand must not be an address"),
                    );
                    verifier.require_operand_reference(
                        inst_id,
                        *self.operand(),
                        concat!($opname, " operand must have reference semantics"),
                    );
                }
            }
        )+
    };
}

impl_refcount_rule!(
    Retain => "retain",
    Release => "release",
);
