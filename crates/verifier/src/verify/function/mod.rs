use cranelift_entity::{packed_option::PackedOption, SecondaryMap};
use rustc_hash::FxHashMap;
use sil_ir::{
    ir_writer::inst_to_string,
    module::{FuncRef, ModuleCtx},
    BlockId, Function, InstId, SilType, ValueId,
};
use tracing::{debug, debug_span};

use crate::{
    diagnostic::{Diagnostic, DiagnosticCode, Location},
    report::VerificationReport,
    VerifierConfig,
};

mod block;
mod branch_args;
mod referential;
mod type_rules;

pub(super) fn verify_function(
    ctx: &ModuleCtx,
    func_ref: FuncRef,
    func: &Function,
    cfg: &VerifierConfig,
) -> VerificationReport {
    let span = debug_span!("verify_function", func = %func.sig.name());
    let _enter = span.enter();

    let mut verifier = FunctionVerifier::new(ctx, func_ref, func, cfg);
    verifier.run();

    debug!(diagnostics = verifier.report.len(), "function verified");
    verifier.report
}

pub(super) struct FunctionVerifier<'a> {
    pub(super) ctx: &'a ModuleCtx,
    pub(super) func_ref: FuncRef,
    pub(super) func: &'a Function,
    pub(super) cfg: &'a VerifierConfig,
    pub(super) report: VerificationReport,

    pub(super) block_order: Vec<BlockId>,
    pub(super) block_to_insts: FxHashMap<BlockId, Vec<InstId>>,
    pub(super) inst_to_block: SecondaryMap<InstId, PackedOption<BlockId>>,
}

trait FunctionPass {
    fn enabled(_cfg: &VerifierConfig) -> bool {
        true
    }

    fn run(verifier: &mut FunctionVerifier<'_>);
}

struct LayoutPass;
struct BlockPass;
struct ReferentialPass;
struct TypePass;
struct BranchArgsPass;

impl FunctionPass for LayoutPass {
    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.scan_layout();
    }
}

impl FunctionPass for BlockPass {
    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_block_structure();
    }
}

impl FunctionPass for ReferentialPass {
    fn enabled(cfg: &VerifierConfig) -> bool {
        cfg.should_check_refs()
    }

    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_referential_integrity();
    }
}

impl FunctionPass for TypePass {
    fn enabled(cfg: &VerifierConfig) -> bool {
        cfg.should_check_types()
    }

    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_type_rules();
    }
}

impl FunctionPass for BranchArgsPass {
    fn enabled(cfg: &VerifierConfig) -> bool {
        cfg.should_check_branch_args()
    }

    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_branch_args();
    }
}

impl<'a> FunctionVerifier<'a> {
    fn new(
        ctx: &'a ModuleCtx,
        func_ref: FuncRef,
        func: &'a Function,
        cfg: &'a VerifierConfig,
    ) -> Self {
        Self {
            ctx,
            func_ref,
            func,
            cfg,
            report: VerificationReport::default(),
            block_order: Vec::new(),
            block_to_insts: FxHashMap::default(),
            inst_to_block: SecondaryMap::default(),
        }
    }

    fn run(&mut self) {
        self.run_pass::<LayoutPass>();
        self.run_pass::<BlockPass>();
        self.run_pass::<ReferentialPass>();
        self.run_pass::<TypePass>();
        self.run_pass::<BranchArgsPass>();
    }

    fn run_pass<P: FunctionPass>(&mut self) {
        if P::enabled(self.cfg) {
            P::run(self);
        }
    }

    fn scan_layout(&mut self) {
        for block in self.func.layout.iter_block() {
            let insts: Vec<_> = self.func.layout.iter_inst(block).collect();
            for inst in &insts {
                self.inst_to_block[*inst] = block.into();
            }
            self.block_order.push(block);
            self.block_to_insts.insert(block, insts);
        }
    }

    /// Instructions of the function in layout order.
    pub(super) fn insts_in_order(&self) -> Vec<InstId> {
        self.block_order
            .iter()
            .flat_map(|block| {
                self.block_to_insts
                    .get(block)
                    .into_iter()
                    .flatten()
                    .copied()
            })
            .collect()
    }

    pub(super) fn emit(&mut self, diagnostic: Diagnostic) {
        let diagnostic = self.with_diagnostic_context(diagnostic);
        self.report.push(diagnostic, self.cfg.max_diagnostics);
    }

    fn with_diagnostic_context(&self, mut diagnostic: Diagnostic) -> Diagnostic {
        let mut context = diagnostic.context.take().unwrap_or_default();

        if context.function_name.is_none() {
            context.function_name = Some(format!("@{}", self.func.sig.name()));
        }

        if let Location::Inst { inst, .. } = diagnostic.primary {
            if context.inst_text.is_none() {
                context.inst_text = Some(self.inst_text(inst));
            }
            if diagnostic.snippet.is_none() && self.cfg.should_render_snippets() {
                diagnostic.snippet = self.snippet_for_inst(inst);
            }
        }

        diagnostic.with_context(context)
    }

    pub(super) fn inst_location(&self, inst: InstId) -> Location {
        Location::Inst {
            func: self.func_ref,
            block: self.inst_to_block[inst].expand(),
            inst,
        }
    }

    pub(super) fn block_location(&self, block: BlockId) -> Location {
        Location::Block {
            func: self.func_ref,
            block,
        }
    }

    pub(super) fn inst_text(&self, inst: InstId) -> String {
        inst_to_string(self.func, inst)
    }

    /// Renders the instruction with up to two neighbours on either side.
    pub(super) fn snippet_for_inst(&self, inst: InstId) -> Option<String> {
        let block = self.inst_to_block[inst].expand()?;
        let insts = self.block_to_insts.get(&block)?;
        let pos = insts.iter().position(|candidate| *candidate == inst)?;

        let mut snippet = format!("  {block}:\n");
        let start = pos.saturating_sub(2);
        let end = (pos + 3).min(insts.len());
        for (idx, inst_id) in insts[start..end].iter().enumerate() {
            let marker = if start + idx == pos { '>' } else { ' ' };
            snippet.push_str(&format!("  {marker} {}\n", self.inst_text(*inst_id)));
        }

        Some(snippet)
    }

    /// Returns the type of `value`, or `None` for a dangling reference.
    pub(super) fn value_ty(&self, value: ValueId) -> Option<SilType> {
        self.func.dfg.get_value(value).map(|value| value.ty())
    }

    pub(super) fn ty_text(&self, ty: SilType) -> String {
        self.ctx.ty_text(ty)
    }

    /// Returns the type of the result of `inst`, reporting a broken result map
    /// instead.
    pub(super) fn ensure_result(&mut self, inst: InstId) -> Option<SilType> {
        let func = self.func;
        let location = self.inst_location(inst);
        let Some(result) = func.dfg.inst_result(inst) else {
            self.emit(Diagnostic::new(
                DiagnosticCode::InstResultMapBroken,
                "instruction is expected to produce a result value",
                location,
            ));
            return None;
        };

        let Some(value) = func.dfg.get_value(result) else {
            self.emit(Diagnostic::new(
                DiagnosticCode::InstResultMapBroken,
                "instruction result is not a value of this function",
                Location::Value {
                    func: self.func_ref,
                    value: result,
                },
            ));
            return None;
        };

        if value.defining_inst() != Some(inst) {
            self.emit(
                Diagnostic::new(
                    DiagnosticCode::InstResultMapBroken,
                    "instruction result is defined elsewhere",
                    location,
                )
                .with_note(format!("{result} is not defined by {inst}")),
            );
            return None;
        }

        Some(value.ty())
    }

    pub(super) fn expect_no_result(&mut self, inst: InstId) {
        if let Some(result) = self.func.dfg.inst_result(inst) {
            self.emit(
                Diagnostic::new(
                    DiagnosticCode::InstResultMapBroken,
                    "instruction must not produce a result value",
                    self.inst_location(inst),
                )
                .with_note(format!("found {result}")),
            );
        }
    }
}
