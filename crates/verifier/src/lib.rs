mod config;
mod diagnostic;
mod pipeline;
mod report;
mod verify;

pub use config::{ParseLevelError, VerificationLevel, VerifierConfig, VERIFY_ENV_VAR};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticContext, Location, Note, ViolationKind};
pub use pipeline::{build_and_verify, ModuleBuilderVerifyExt};
pub use report::VerificationReport;
pub use verify::{
    verify_function, verify_function_or_panic, verify_module, verify_module_or_panic,
};

/// Verifies `$module` at full level when [`VerifierConfig::build_enabled`]
/// holds, and panics on any diagnostic.
#[macro_export]
macro_rules! debug_verify_module {
    ($module:expr) => {{
        let cfg = $crate::VerifierConfig::from_build();
        if cfg.enabled {
            let report = $crate::verify_module($module, &cfg);
            if report.has_errors() {
                eprintln!("SIL_IR_VERIFY_FAILURE: module");
                eprintln!("{report}");
                panic!("SIL_IR_VERIFY_FAILURE");
            }
        }
    }};
}

#[macro_export]
macro_rules! debug_verify_func {
    ($ctx:expr, $func_ref:expr, $func:expr) => {{
        let cfg = $crate::VerifierConfig::from_build();
        if cfg.enabled {
            let report = $crate::verify_function($ctx, $func_ref, $func, &cfg);
            if report.has_errors() {
                eprintln!("SIL_IR_VERIFY_FAILURE: function {}", $func_ref);
                eprintln!("{report}");
                panic!("SIL_IR_VERIFY_FAILURE");
            }
        }
    }};
}
