use smallvec::SmallVec;

use crate::{
    inst::{
        Apply, Branch, CondBranch, InstData, InstId, IntegerLiteral, Load, Release, Retain, Return,
        Store,
    },
    module::ModuleCtx,
    BlockId, Function, SilType, Type, ValueId,
};

/// Appends blocks and instructions to a function declared in a
/// [`super::ModuleBuilder`].
///
/// The builder doesn't check anything about the instructions it inserts, so
/// it can also be used to produce malformed IR.
pub struct FunctionBuilder<'a> {
    pub ctx: ModuleCtx,
    pub func: &'a mut Function,
    current_block: Option<BlockId>,
}

impl<'a> FunctionBuilder<'a> {
    pub fn new(ctx: ModuleCtx, func: &'a mut Function) -> Self {
        Self {
            ctx,
            func,
            current_block: None,
        }
    }

    /// Makes a block and appends it to the layout.
    pub fn append_block(&mut self) -> BlockId {
        let block = self.func.dfg.make_block();
        self.func.layout.append_block(block);
        block
    }

    /// Makes a block without placing it in the layout.
    pub fn make_block(&mut self) -> BlockId {
        self.func.dfg.make_block()
    }

    pub fn append_block_param(&mut self, block: BlockId, ty: SilType) -> ValueId {
        self.func.dfg.append_block_param(block, ty)
    }

    pub fn switch_to_block(&mut self, block: BlockId) {
        self.current_block = Some(block);
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    /// Inserts an instruction at the end of the current block and returns a
    /// `ValueId` for its result of type `ty`.
    ///
    /// # Panics
    /// Panics if no block was selected with [`Self::switch_to_block`].
    pub fn insert_inst(&mut self, inst: impl Into<InstData>, ty: SilType) -> ValueId {
        let inst_id = self.insert_inst_no_result(inst);
        self.func.dfg.make_result(inst_id, ty)
    }

    /// Inserts an instruction at the end of the current block without creating
    /// a result value.
    ///
    /// Please refer to [`Self::insert_inst`] if the instruction has a result.
    pub fn insert_inst_no_result(&mut self, inst: impl Into<InstData>) -> InstId {
        let Some(block) = self.current_block else {
            panic!("no block to insert into: call `switch_to_block` first");
        };

        let inst_id = self.func.dfg.make_inst(inst);
        self.func.layout.append_inst(inst_id, block);
        inst_id
    }

    pub fn value_ty(&self, value: ValueId) -> SilType {
        self.func.dfg.value_ty(value)
    }

    pub fn integer_literal(&mut self, value: i128, ty: Type) -> ValueId {
        self.insert_inst(IntegerLiteral::new(value), SilType::object(ty))
    }

    /// Loads from `addr`. The result has the object type of `addr`.
    pub fn load(&mut self, addr: ValueId) -> ValueId {
        let ty = self.value_ty(addr).object_type();
        self.insert_inst(Load::new(addr), ty)
    }

    pub fn store(&mut self, src: ValueId, dest: ValueId) -> InstId {
        self.insert_inst_no_result(Store::new(src, dest))
    }

    pub fn retain(&mut self, operand: ValueId) -> InstId {
        self.insert_inst_no_result(Retain::new(operand))
    }

    pub fn release(&mut self, operand: ValueId) -> InstId {
        self.insert_inst_no_result(Release::new(operand))
    }

    pub fn apply(&mut self, callee: ValueId, args: &[ValueId], ret_ty: SilType) -> ValueId {
        let args: SmallVec<[ValueId; 8]> = args.into();
        self.insert_inst(Apply::new(callee, args), ret_ty)
    }

    pub fn ret(&mut self, value: Option<ValueId>) -> InstId {
        self.insert_inst_no_result(Return::new(value))
    }

    pub fn br(&mut self, dest: BlockId, args: &[ValueId]) -> InstId {
        self.insert_inst_no_result(Branch::new(dest, args.into()))
    }

    pub fn cond_br(&mut self, cond: ValueId, then_dest: BlockId, else_dest: BlockId) -> InstId {
        self.insert_inst_no_result(CondBranch::new(
            Some(cond),
            then_dest,
            SmallVec::new(),
            else_dest,
            SmallVec::new(),
        ))
    }
}
