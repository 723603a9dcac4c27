use std::io;

use crate::{
    ir_writer::IrWrite, module::ModuleCtx, types::SilType, value::ValueId, DataFlowGraph, Layout,
};

#[derive(Debug)]
pub struct Function {
    pub sig: Signature,
    pub dfg: DataFlowGraph,
    pub layout: Layout,
}

impl Function {
    pub fn new(ctx: &ModuleCtx, sig: Signature) -> Self {
        Self {
            sig,
            dfg: DataFlowGraph::new(ctx.clone()),
            layout: Layout::default(),
        }
    }

    pub fn ctx(&self) -> &ModuleCtx {
        &self.dfg.ctx
    }

    /// Function arguments are the parameters of the entry block.
    pub fn arg_values(&self) -> &[ValueId] {
        match self.layout.entry_block() {
            Some(entry) => self.dfg.block_params(entry),
            None => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Name of the function.
    name: String,

    /// Lowered type of the function itself.
    ty: SilType,
}

impl Signature {
    pub fn new(name: &str, ty: SilType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> SilType {
        self.ty
    }
}

impl<Ctx> IrWrite<Ctx> for Signature
where
    Ctx: AsRef<ModuleCtx>,
{
    fn write<W>(&self, w: &mut W, ctx: &Ctx) -> io::Result<()>
    where
        W: io::Write,
    {
        write!(w, "func @{} : ", self.name)?;
        self.ty.write(w, ctx)
    }
}
