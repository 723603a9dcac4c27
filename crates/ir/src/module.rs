use std::sync::{Arc, PoisonError, RwLock};

use cranelift_entity::{entity_impl, PrimaryMap};

use crate::{
    ir_writer::IrWrite,
    types::{FunctionTypeInfo, SilType, Type, TypeStore},
    Function,
};

/// Context shared by all functions of a module.
#[derive(Debug, Clone, Default)]
pub struct ModuleCtx {
    type_store: Arc<RwLock<TypeStore>>,
}

impl ModuleCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ty_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&TypeStore) -> R,
    {
        let store = self.type_store.read().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    pub fn with_ty_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut TypeStore) -> R,
    {
        let mut store = self
            .type_store
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    pub fn unit_type(&self) -> Type {
        self.with_ty_store(|s| s.unit())
    }

    pub fn raw_pointer_type(&self) -> Type {
        Type::RawPointer
    }

    pub fn is_func(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.is_func(ty))
    }

    pub fn is_any_func(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.is_any_func(ty))
    }

    pub fn is_poly_func(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.is_poly_func(ty))
    }

    pub fn is_metatype(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.is_metatype(ty))
    }

    pub fn is_archetype(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.is_archetype(ty))
    }

    pub fn is_existential(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.is_existential(ty))
    }

    pub fn has_reference_semantics(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.has_reference_semantics(ty))
    }

    pub fn is_address_only(&self, ty: Type) -> bool {
        self.with_ty_store(|s| s.is_address_only(ty))
    }

    pub fn tuple_fields(&self, ty: Type) -> Option<Vec<Type>> {
        self.with_ty_store(|s| s.tuple_fields(ty).map(<[Type]>::to_vec))
    }

    pub fn metatype_instance(&self, ty: Type) -> Option<Type> {
        self.with_ty_store(|s| s.metatype_instance(ty))
    }

    pub fn func_signature(&self, ty: Type) -> Option<(Type, Type)> {
        self.with_ty_store(|s| s.func_signature(ty))
    }

    pub fn func_type_info(&self, ty: Type) -> Option<FunctionTypeInfo> {
        self.with_ty_store(|s| s.func_type_info(ty))
    }

    /// Renders a lowered type as it appears in textual IR, e.g. `$*Builtin.Int64`.
    pub fn ty_text(&self, ty: SilType) -> String {
        ty.dump_string(self)
    }
}

#[derive(Debug, Default)]
pub struct Module {
    pub ctx: ModuleCtx,

    /// Holds all function declared in the module.
    pub funcs: PrimaryMap<FuncRef, Function>,
}

impl Module {
    pub fn new(ctx: ModuleCtx) -> Self {
        Self {
            ctx,
            funcs: PrimaryMap::default(),
        }
    }

    /// Returns `func_ref` in the module.
    pub fn iter_functions(&self) -> impl Iterator<Item = FuncRef> {
        self.funcs.keys()
    }

    /// Returns the first function with the given name.
    pub fn lookup_func(&self, name: &str) -> Option<FuncRef> {
        self.funcs
            .iter()
            .find(|(_, func)| func.sig.name() == name)
            .map(|(func_ref, _)| func_ref)
    }
}

impl AsRef<ModuleCtx> for Module {
    fn as_ref(&self) -> &ModuleCtx {
        &self.ctx
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuncRef(u32);
entity_impl!(FuncRef, "func");
