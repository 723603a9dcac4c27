mod func_builder;
mod module_builder;

pub use func_builder::FunctionBuilder;
pub use module_builder::ModuleBuilder;

pub mod test_util {
    use super::*;

    use crate::{
        ir_writer::FuncWriter,
        module::{FuncRef, Module, ModuleCtx},
        Function, Signature, SilType, Type,
    };

    #[derive(Default)]
    pub struct TestModuleBuilder {
        module_builder: ModuleBuilder,
        func_ref: Option<FuncRef>,
    }

    impl TestModuleBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn ctx(&self) -> &ModuleCtx {
            &self.module_builder.ctx
        }

        pub fn module_builder(&mut self) -> &mut ModuleBuilder {
            &mut self.module_builder
        }

        /// Declares a function named `name` of formal type `ty` and returns a
        /// builder for it.
        pub fn func_builder(&mut self, name: &str, ty: Type) -> FunctionBuilder<'_> {
            let sig = Signature::new(name, SilType::object(ty));
            let func_ref = self.module_builder.declare_function(sig);
            self.func_ref = Some(func_ref);
            self.module_builder.func_builder(func_ref)
        }

        /// Returns the most recently declared function.
        pub fn func_ref(&self) -> Option<FuncRef> {
            self.func_ref
        }

        pub fn build(self) -> Module {
            self.module_builder.build()
        }
    }

    pub fn dump_func(func_ref: FuncRef, func: &Function) -> String {
        FuncWriter::new(func_ref, func)
            .dump_string()
            .unwrap_or_default()
    }
}
