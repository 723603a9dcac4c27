use sil_ir::{Module, ModuleBuilder};

use crate::{verify_module, VerificationReport, VerifierConfig};

/// Builds the module and verifies it, returning the report if it has errors.
pub fn build_and_verify(
    builder: ModuleBuilder,
    cfg: &VerifierConfig,
) -> Result<Module, VerificationReport> {
    let module = builder.build();
    let report = verify_module(&module, cfg);
    if report.has_errors() {
        return Err(report);
    }
    Ok(module)
}

pub trait ModuleBuilderVerifyExt {
    fn build_verified(self, cfg: &VerifierConfig) -> Result<Module, VerificationReport>;
}

impl ModuleBuilderVerifyExt for ModuleBuilder {
    fn build_verified(self, cfg: &VerifierConfig) -> Result<Module, VerificationReport> {
        build_and_verify(self, cfg)
    }
}
