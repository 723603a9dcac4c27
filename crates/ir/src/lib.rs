pub mod builder;
pub mod dfg;
pub mod function;
pub mod inst;
pub mod ir_writer;
pub mod layout;
pub mod module;
pub mod types;
pub mod value;

pub use builder::{FunctionBuilder, ModuleBuilder};
pub use dfg::{Block, BlockId, DataFlowGraph};
pub use function::{Function, Signature};
pub use inst::{InstData, InstId};
pub use layout::Layout;
pub use module::{FuncRef, Module, ModuleCtx};
pub use types::{CompoundType, FunctionTypeInfo, SilType, Type, TypeStore, ValueCategory};
pub use value::{Value, ValueId};
