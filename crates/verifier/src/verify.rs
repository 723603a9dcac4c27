use rayon::prelude::*;
use sil_ir::{
    module::{FuncRef, ModuleCtx},
    Function, Module,
};

use crate::{report::VerificationReport, VerifierConfig};

mod function;

pub fn verify_module(module: &Module, cfg: &VerifierConfig) -> VerificationReport {
    let mut report = VerificationReport::default();
    if !cfg.enabled {
        return report;
    }

    let func_refs: Vec<FuncRef> = module.iter_functions().collect();
    let mut func_reports: Vec<_> = func_refs
        .into_par_iter()
        .map(|func_ref| {
            let func = &module.funcs[func_ref];
            (
                func_ref,
                function::verify_function(&module.ctx, func_ref, func, cfg),
            )
        })
        .collect();

    func_reports.sort_by_key(|(func_ref, _)| func_ref.as_u32());
    for (_, func_report) in func_reports {
        report.extend_with_limit(func_report.diagnostics, cfg.max_diagnostics);
        if report.is_full(cfg.max_diagnostics) {
            break;
        }
    }

    report
}

/// Verifies a single function. Diagnostics are grouped by check, and each
/// group follows the layout order of blocks and instructions.
pub fn verify_function(
    ctx: &ModuleCtx,
    func_ref: FuncRef,
    func: &Function,
    cfg: &VerifierConfig,
) -> VerificationReport {
    if !cfg.enabled {
        return VerificationReport::default();
    }

    function::verify_function(ctx, func_ref, func, cfg)
}

pub fn verify_module_or_panic(module: &Module, cfg: &VerifierConfig) {
    let report = verify_module(module, cfg);
    if report.has_errors() {
        eprintln!("SIL_IR_VERIFY_FAILURE: module");
        eprintln!("{report}");
        panic!("SIL_IR_VERIFY_FAILURE");
    }
}

pub fn verify_function_or_panic(
    ctx: &ModuleCtx,
    func_ref: FuncRef,
    func: &Function,
    cfg: &VerifierConfig,
) {
    let report = verify_function(ctx, func_ref, func, cfg);
    if report.has_errors() {
        eprintln!("SIL_IR_VERIFY_FAILURE: function @{}", func.sig.name());
        eprintln!("{report}");
        panic!("SIL_IR_VERIFY_FAILURE");
    }
}
