//! Textual form of the IR.
use std::io;

use crate::{
    dfg::BlockId,
    inst::{InstData, InstId},
    module::{FuncRef, ModuleCtx},
    types::{SilType, Type},
    Function, Module, ValueId,
};

pub trait IrWrite<Ctx> {
    fn write<W>(&self, w: &mut W, ctx: &Ctx) -> io::Result<()>
    where
        W: io::Write;

    fn dump_string(&self, ctx: &Ctx) -> String {
        let mut s = Vec::new();
        // Writing into a `Vec` only fails if the item itself reports an error.
        let _ = self.write(&mut s, ctx);
        String::from_utf8_lossy(&s).into_owned()
    }
}

impl<Ctx> IrWrite<Ctx> for Type
where
    Ctx: AsRef<ModuleCtx>,
{
    fn write<W>(&self, w: &mut W, ctx: &Ctx) -> io::Result<()>
    where
        W: io::Write,
    {
        ctx.as_ref().with_ty_store(|s| s.write_ty(*self, w))
    }
}

impl<Ctx> IrWrite<Ctx> for SilType
where
    Ctx: AsRef<ModuleCtx>,
{
    fn write<W>(&self, w: &mut W, ctx: &Ctx) -> io::Result<()>
    where
        W: io::Write,
    {
        if self.is_address() {
            write!(w, "$*")?;
        } else {
            write!(w, "$")?;
        }
        self.formal().write(w, ctx)
    }
}

impl AsRef<ModuleCtx> for ModuleCtx {
    fn as_ref(&self) -> &ModuleCtx {
        self
    }
}

impl AsRef<ModuleCtx> for Function {
    fn as_ref(&self) -> &ModuleCtx {
        self.ctx()
    }
}

pub struct ModuleWriter<'a> {
    module: &'a Module,
}

impl<'a> ModuleWriter<'a> {
    pub fn new(module: &'a Module) -> Self {
        Self { module }
    }

    pub fn write(&self, mut w: impl io::Write) -> io::Result<()> {
        let mut delim = "";
        for func_ref in self.module.funcs.keys() {
            write!(w, "{delim}")?;
            FuncWriter::new(func_ref, &self.module.funcs[func_ref]).write(&mut w)?;
            delim = "\n";
        }
        Ok(())
    }

    pub fn dump_string(&self) -> io::Result<String> {
        let mut s = Vec::new();
        self.write(&mut s)?;
        Ok(String::from_utf8_lossy(&s).into_owned())
    }
}

pub struct FuncWriter<'a> {
    pub func_ref: FuncRef,
    pub func: &'a Function,
}

impl<'a> FuncWriter<'a> {
    pub fn new(func_ref: FuncRef, func: &'a Function) -> Self {
        Self { func_ref, func }
    }

    pub fn write(&self, mut w: impl io::Write) -> io::Result<()> {
        self.func.sig.write(&mut w, self.func)?;
        writeln!(w, " {{")?;

        let mut delim = "";
        for block in self.func.layout.iter_block() {
            write!(w, "{delim}")?;
            self.write_block_with_inst(block, &mut w)?;
            delim = "\n";
        }

        writeln!(w, "}}")
    }

    pub fn dump_string(&self) -> io::Result<String> {
        let mut s = Vec::new();
        self.write(&mut s)?;
        Ok(String::from_utf8_lossy(&s).into_owned())
    }

    pub fn write_block_with_inst(&self, block: BlockId, mut w: impl io::Write) -> io::Result<()> {
        write!(w, "{block}")?;
        let params = self.func.dfg.block_params(block);
        if !params.is_empty() {
            write!(w, "(")?;
            let mut delim = "";
            for param in params {
                write!(w, "{delim}{param} : ")?;
                self.func.dfg.value_ty(*param).write(&mut w, self.func)?;
                delim = ", ";
            }
            write!(w, ")")?;
        }
        writeln!(w, ":")?;

        for inst in self.func.layout.iter_inst(block) {
            write!(w, "  ")?;
            inst.write(&mut w, self.func)?;
            writeln!(w)?;
        }

        Ok(())
    }
}

impl IrWrite<Function> for InstId {
    fn write<W>(&self, w: &mut W, func: &Function) -> io::Result<()>
    where
        W: io::Write,
    {
        let Some(data) = func.dfg.get_inst(*self) else {
            return write!(w, "<invalid {self}>");
        };

        let result = func.dfg.inst_result(*self);
        if let Some(result) = result {
            write!(w, "{result} = ")?;
        }

        write!(w, "{}", data.as_text())?;
        write_operands(data, w, func)?;

        if let Some(ty) = result
            .and_then(|result| func.dfg.get_value(result))
            .map(|v| v.ty())
        {
            write!(w, " : ")?;
            ty.write(w, func)?;
        }
        Ok(())
    }
}

/// Returns the textual form of `inst`, e.g. `%2 = load %1 : $Builtin.Int64`.
pub fn inst_to_string(func: &Function, inst: InstId) -> String {
    inst.dump_string(func)
}

fn write_operands<W>(data: &InstData, w: &mut W, func: &Function) -> io::Result<()>
where
    W: io::Write,
{
    match data {
        InstData::AllocVar(_)
        | InstData::AllocRef(_)
        | InstData::ZeroValue(_)
        | InstData::Metatype(_) => Ok(()),

        InstData::Load(inst) => write!(w, " {}", inst.lvalue()),
        InstData::Store(inst) => write!(w, " {} to {}", inst.src(), inst.dest()),
        InstData::CopyAddr(inst) => {
            let take = if *inst.is_take() { "[take] " } else { "" };
            let init = if *inst.is_initialize() {
                "[initialization] "
            } else {
                ""
            };
            write!(w, " {take}{} to {init}{}", inst.src(), inst.dest())
        }
        InstData::ZeroAddr(inst) => write!(w, " {}", inst.dest()),
        InstData::DeallocVar(inst) => write!(w, " {}", inst.operand()),
        InstData::DeallocRef(inst) => write!(w, " {}", inst.operand()),
        InstData::DestroyAddr(inst) => write!(w, " {}", inst.operand()),
        InstData::IndexAddr(inst) => write!(w, " {}, {}", inst.operand(), inst.index()),
        InstData::ElementAddr(inst) => write!(w, " {}, {}", inst.operand(), inst.field_no()),
        InstData::RefElementAddr(inst) => write!(w, " {}, {}", inst.operand(), inst.field_no()),
        InstData::Retain(inst) => write!(w, " {}", inst.operand()),
        InstData::Release(inst) => write!(w, " {}", inst.operand()),

        InstData::IntegerLiteral(inst) => write!(w, " {}", inst.value()),
        InstData::IntegerValue(inst) => write!(w, " {}", inst.value()),
        InstData::ConstantRef(inst) => write!(w, " @{}", inst.decl()),
        InstData::Tuple(inst) => {
            write!(w, " ")?;
            write_value_list(inst.elements(), w)
        }
        InstData::Extract(inst) => write!(w, " {}, {}", inst.operand(), inst.field_no()),
        InstData::AssociatedMetatype(inst) => {
            write!(w, " {}, #{}", inst.operand(), inst.member())
        }

        InstData::Apply(inst) => {
            write!(w, " {}", inst.callee())?;
            write_value_list(inst.args(), w)
        }
        InstData::Specialize(inst) => write!(w, " {}", inst.operand()),

        InstData::ArchetypeMethod(inst) => write!(w, " {}, #{}", inst.operand(), inst.member()),
        InstData::ProtocolMethod(inst) => write!(w, " {}, #{}", inst.operand(), inst.member()),
        InstData::ProjectExistential(inst) => write!(w, " {}", inst.operand()),
        InstData::InitExistential(inst) => {
            write!(w, " {}, ", inst.existential())?;
            SilType::object(*inst.concrete()).write(w, func)
        }
        InstData::DeinitExistential(inst) => write!(w, " {}", inst.existential()),
        InstData::ArchetypeToSuper(inst) => write!(w, " {}", inst.operand()),
        InstData::SuperToArchetype(inst) => write!(w, " {} to {}", inst.src(), inst.dest()),
        InstData::Downcast(inst) => write!(w, " {}", inst.operand()),

        InstData::Return(inst) => {
            write!(w, " ")?;
            write_opt_value(*inst.value(), w)
        }
        InstData::Branch(inst) => {
            write!(w, " ")?;
            write_dest(*inst.dest(), inst.args(), w)
        }
        InstData::CondBranch(inst) => {
            write!(w, " ")?;
            write_opt_value(*inst.cond(), w)?;
            write!(w, ", ")?;
            write_dest(*inst.then_dest(), inst.then_args(), w)?;
            write!(w, ", ")?;
            write_dest(*inst.else_dest(), inst.else_args(), w)
        }
    }
}

fn write_opt_value<W>(value: Option<ValueId>, w: &mut W) -> io::Result<()>
where
    W: io::Write,
{
    match value {
        Some(value) => write!(w, "{value}"),
        None => write!(w, "<null>"),
    }
}

fn write_value_list<W>(values: &[ValueId], w: &mut W) -> io::Result<()>
where
    W: io::Write,
{
    write!(w, "(")?;
    let mut delim = "";
    for value in values {
        write!(w, "{delim}{value}")?;
        delim = ", ";
    }
    write!(w, ")")
}

fn write_dest<W>(dest: BlockId, args: &[ValueId], w: &mut W) -> io::Result<()>
where
    W: io::Write,
{
    write!(w, "{dest}")?;
    if args.is_empty() {
        Ok(())
    } else {
        write_value_list(args, w)
    }
}
