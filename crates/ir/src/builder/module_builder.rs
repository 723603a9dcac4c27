use cranelift_entity::PrimaryMap;
use rustc_hash::FxHashMap;

use super::FunctionBuilder;
use crate::{
    module::{FuncRef, ModuleCtx},
    Function, Module, Signature, Type,
};

#[derive(Debug, Default)]
pub struct ModuleBuilder {
    pub ctx: ModuleCtx,

    funcs: PrimaryMap<FuncRef, Function>,

    /// Map function name -> FuncRef to avoid duplicated declaration.
    declared_funcs: FxHashMap<String, FuncRef>,
}

impl ModuleBuilder {
    pub fn new(ctx: ModuleCtx) -> Self {
        Self {
            ctx,
            funcs: PrimaryMap::default(),
            declared_funcs: FxHashMap::default(),
        }
    }

    /// Declares a function. Declaring a name twice returns the first
    /// declaration.
    pub fn declare_function(&mut self, sig: Signature) -> FuncRef {
        if let Some(func_ref) = self.declared_funcs.get(sig.name()) {
            return *func_ref;
        }

        let name = sig.name().to_string();
        let func_ref = self.funcs.push(Function::new(&self.ctx, sig));
        self.declared_funcs.insert(name, func_ref);
        func_ref
    }

    pub fn lookup_func(&self, name: &str) -> Option<FuncRef> {
        self.declared_funcs.get(name).copied()
    }

    pub fn sig(&self, func_ref: FuncRef) -> &Signature {
        &self.funcs[func_ref].sig
    }

    pub fn unit_type(&self) -> Type {
        self.ctx.unit_type()
    }

    pub fn declare_tuple_type(&self, fields: &[Type]) -> Type {
        self.ctx.with_ty_store_mut(|s| s.make_tuple(fields))
    }

    pub fn declare_struct_type(&self, name: &str, fields: &[Type]) -> Type {
        self.ctx.with_ty_store_mut(|s| s.make_struct(name, fields))
    }

    pub fn declare_class_type(&self, name: &str) -> Type {
        self.ctx.with_ty_store_mut(|s| s.make_class(name))
    }

    pub fn declare_protocol_type(&self, name: &str) -> Type {
        self.ctx.with_ty_store_mut(|s| s.make_protocol(name))
    }

    pub fn declare_archetype(&self, name: &str, class_bound: Option<Type>) -> Type {
        self.ctx
            .with_ty_store_mut(|s| s.make_archetype(name, class_bound))
    }

    pub fn declare_func_type(&self, input: Type, result: Type) -> Type {
        self.ctx.with_ty_store_mut(|s| s.make_func(input, result))
    }

    pub fn declare_poly_func_type(
        &self,
        generic_params: &[Type],
        input: Type,
        result: Type,
    ) -> Type {
        self.ctx
            .with_ty_store_mut(|s| s.make_poly_func(generic_params, input, result))
    }

    pub fn metatype(&self, instance: Type) -> Type {
        self.ctx.with_ty_store_mut(|s| s.make_metatype(instance))
    }

    pub fn func_builder(&mut self, func_ref: FuncRef) -> FunctionBuilder<'_> {
        FunctionBuilder::new(self.ctx.clone(), &mut self.funcs[func_ref])
    }

    pub fn build(self) -> Module {
        Module {
            ctx: self.ctx,
            funcs: self.funcs,
        }
    }
}
