use sil_ir::{InstData, InstId};

use super::FunctionVerifier;

/// Kind-specific invariants of an instruction.
pub(super) trait VerifyInst {
    fn verify_inst(&self, verifier: &mut FunctionVerifier<'_>, inst_id: InstId);
}

/// Every instruction kind has a rule, so adding a kind to [`InstData`]
/// without one fails to compile here.
pub(super) fn rule_for(inst: &InstData) -> &dyn VerifyInst {
    match inst {
        InstData::AllocVar(inst) => inst,
        InstData::AllocRef(inst) => inst,
        InstData::Load(inst) => inst,
        InstData::Store(inst) => inst,
        InstData::CopyAddr(inst) => inst,
        InstData::ZeroAddr(inst) => inst,
        InstData::DeallocVar(inst) => inst,
        InstData::DeallocRef(inst) => inst,
        InstData::DestroyAddr(inst) => inst,
        InstData::IndexAddr(inst) => inst,
        InstData::ElementAddr(inst) => inst,
        InstData::RefElementAddr(inst) => inst,
        InstData::Retain(inst) => inst,
        InstData::Release(inst) => inst,
        InstData::IntegerLiteral(inst) => inst,
        InstData::IntegerValue(inst) => inst,
        InstData::ZeroValue(inst) => inst,
        InstData::ConstantRef(inst) => inst,
        InstData::Tuple(inst) => inst,
        InstData::Extract(inst) => inst,
        InstData::Metatype(inst) => inst,
        InstData::AssociatedMetatype(inst) => inst,
        InstData::Apply(inst) => inst,
        InstData::Specialize(inst) => inst,
        InstData::ArchetypeMethod(inst) => inst,
        InstData::ProtocolMethod(inst) => inst,
        InstData::ProjectExistential(inst) => inst,
        InstData::InitExistential(inst) => inst,
        InstData::DeinitExistential(inst) => inst,
        InstData::ArchetypeToSuper(inst) => inst,
        InstData::SuperToArchetype(inst) => inst,
        InstData::Downcast(inst) => inst,
        InstData::Return(inst) => inst,
        InstData::Branch(inst) => inst,
        InstData::CondBranch(inst) => inst,
    }
}
