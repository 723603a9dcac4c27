//! This module contains IR type definitions.
//!
//! A [`Type`] is a formal type, hash-consed in a [`TypeStore`]. A [`SilType`]
//! pairs a formal type with a value category, distinguishing a value from the
//! address of a memory location holding such a value.
use std::io;

use cranelift_entity::{entity_impl, PrimaryMap};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Debug)]
pub struct TypeStore {
    compounds: PrimaryMap<CompoundTypeRef, CompoundType>,
    rev_types: FxHashMap<CompoundType, CompoundTypeRef>,
    nominal_types: IndexMap<String, CompoundTypeRef>,
    unit: CompoundTypeRef,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    pub fn new() -> Self {
        let mut compounds = PrimaryMap::new();
        let mut rev_types = FxHashMap::default();
        let unit_data = CompoundType::Tuple(SmallVec::new());
        let unit = compounds.push(unit_data.clone());
        rev_types.insert(unit_data, unit);

        Self {
            compounds,
            rev_types,
            nominal_types: IndexMap::new(),
            unit,
        }
    }

    /// Returns the empty tuple type.
    pub fn unit(&self) -> Type {
        Type::Compound(self.unit)
    }

    pub fn make_tuple(&mut self, fields: &[Type]) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::Tuple(fields.into()));
        Type::Compound(cmpd_ref)
    }

    pub fn make_func(&mut self, input: Type, result: Type) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::Func { input, result });
        Type::Compound(cmpd_ref)
    }

    pub fn make_poly_func(&mut self, generic_params: &[Type], input: Type, result: Type) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::PolyFunc {
            generic_params: generic_params.into(),
            input,
            result,
        });
        Type::Compound(cmpd_ref)
    }

    pub fn make_metatype(&mut self, instance: Type) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::Metatype(instance));
        Type::Compound(cmpd_ref)
    }

    pub fn make_protocol(&mut self, name: &str) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::Protocol(name.to_string()));
        Type::Compound(cmpd_ref)
    }

    /// Makes an archetype. An archetype with a class bound is always
    /// represented by a reference.
    pub fn make_archetype(&mut self, name: &str, class_bound: Option<Type>) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::Archetype(ArchetypeData {
            name: name.to_string(),
            class_bound,
        }));
        Type::Compound(cmpd_ref)
    }

    pub fn make_class(&mut self, name: &str) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::Class(name.to_string()));
        Type::Compound(cmpd_ref)
    }

    pub fn make_struct(&mut self, name: &str, fields: &[Type]) -> Type {
        let cmpd_ref = self.make_compound(CompoundType::Struct(StructData {
            name: name.to_string(),
            fields: fields.to_vec(),
        }));
        Type::Compound(cmpd_ref)
    }

    /// Lookup a class or struct type by name.
    pub fn lookup_nominal(&self, name: &str) -> Option<Type> {
        self.nominal_types.get(name).copied().map(Type::Compound)
    }

    pub fn make_compound(&mut self, data: CompoundType) -> CompoundTypeRef {
        if let Some(cmpd_ref) = self.rev_types.get(&data) {
            return *cmpd_ref;
        }

        let cmpd_ref = self.compounds.push(data.clone());
        if let Some(name) = data.nominal_name() {
            assert!(
                !self.nominal_types.contains_key(name),
                "nominal type {name} is already defined"
            );
            self.nominal_types.insert(name.to_string(), cmpd_ref);
        }

        self.rev_types.insert(data, cmpd_ref);
        cmpd_ref
    }

    pub fn resolve_compound(&self, cmpd_ref: CompoundTypeRef) -> &CompoundType {
        &self.compounds[cmpd_ref]
    }

    pub fn compound(&self, ty: Type) -> Option<&CompoundType> {
        match ty {
            Type::Compound(cmpd_ref) => Some(&self.compounds[cmpd_ref]),
            _ => None,
        }
    }

    pub fn all_compounds(&self) -> impl Iterator<Item = (CompoundTypeRef, &CompoundType)> {
        self.compounds.iter()
    }

    /// Returns `true` if `ty` is a concrete (non-generic) function type.
    pub fn is_func(&self, ty: Type) -> bool {
        matches!(self.compound(ty), Some(CompoundType::Func { .. }))
    }

    pub fn is_poly_func(&self, ty: Type) -> bool {
        matches!(self.compound(ty), Some(CompoundType::PolyFunc { .. }))
    }

    /// Returns `true` if `ty` is a function type, generic or not.
    pub fn is_any_func(&self, ty: Type) -> bool {
        self.is_func(ty) || self.is_poly_func(ty)
    }

    pub fn is_tuple(&self, ty: Type) -> bool {
        self.tuple_fields(ty).is_some()
    }

    pub fn tuple_fields(&self, ty: Type) -> Option<&[Type]> {
        match self.compound(ty) {
            Some(CompoundType::Tuple(fields)) => Some(fields),
            _ => None,
        }
    }

    pub fn is_metatype(&self, ty: Type) -> bool {
        self.metatype_instance(ty).is_some()
    }

    pub fn metatype_instance(&self, ty: Type) -> Option<Type> {
        match self.compound(ty) {
            Some(CompoundType::Metatype(instance)) => Some(*instance),
            _ => None,
        }
    }

    pub fn is_archetype(&self, ty: Type) -> bool {
        matches!(self.compound(ty), Some(CompoundType::Archetype(_)))
    }

    pub fn is_existential(&self, ty: Type) -> bool {
        matches!(self.compound(ty), Some(CompoundType::Protocol(_)))
    }

    /// Returns `true` if values of `ty` are heap allocated and reference
    /// counted.
    pub fn has_reference_semantics(&self, ty: Type) -> bool {
        match ty {
            Type::ObjectPointer => true,
            Type::Int(_) | Type::RawPointer => false,
            Type::Compound(cmpd_ref) => match &self.compounds[cmpd_ref] {
                CompoundType::Class(_)
                | CompoundType::Func { .. }
                | CompoundType::PolyFunc { .. } => true,
                CompoundType::Archetype(data) => data.class_bound.is_some(),
                CompoundType::Tuple(_)
                | CompoundType::Metatype(_)
                | CompoundType::Protocol(_)
                | CompoundType::Struct(_) => false,
            },
        }
    }

    /// Returns `true` if values of `ty` can only be manipulated indirectly
    /// through an address, because their layout is not statically known.
    pub fn is_address_only(&self, ty: Type) -> bool {
        let Type::Compound(cmpd_ref) = ty else {
            return false;
        };

        match &self.compounds[cmpd_ref] {
            CompoundType::Archetype(data) => data.class_bound.is_none(),
            CompoundType::Protocol(_) => true,
            CompoundType::Tuple(fields) => fields.iter().any(|field| self.is_address_only(*field)),
            CompoundType::Struct(data) => data
                .fields
                .iter()
                .any(|field| self.is_address_only(*field)),
            CompoundType::Func { .. }
            | CompoundType::PolyFunc { .. }
            | CompoundType::Metatype(_)
            | CompoundType::Class(_) => false,
        }
    }

    /// Returns input and result of a concrete function type.
    pub fn func_signature(&self, ty: Type) -> Option<(Type, Type)> {
        match self.compound(ty) {
            Some(CompoundType::Func { input, result }) => Some((*input, *result)),
            _ => None,
        }
    }

    /// Lowers a formal type to the category it is passed in.
    pub fn lower(&self, ty: Type) -> SilType {
        if self.is_address_only(ty) {
            SilType::address(ty)
        } else {
            SilType::object(ty)
        }
    }

    /// Resolves the lowered calling convention of a concrete function type.
    ///
    /// A tuple input is exploded into one input per field. Address-only
    /// inputs are passed by address, and an address-only result is returned
    /// through a trailing address input while the function itself returns the
    /// empty tuple.
    pub fn func_type_info(&self, ty: Type) -> Option<FunctionTypeInfo> {
        let (input, result) = self.func_signature(ty)?;

        let mut inputs: SmallVec<[SilType; 8]> = match self.tuple_fields(input) {
            Some(fields) => fields.iter().map(|field| self.lower(*field)).collect(),
            None => [self.lower(input)].into_iter().collect(),
        };

        let indirect_return = self.is_address_only(result);
        let result = if indirect_return {
            inputs.push(SilType::address(result));
            SilType::object(self.unit())
        } else {
            SilType::object(result)
        };

        Some(FunctionTypeInfo {
            inputs,
            result,
            indirect_return,
        })
    }

    pub fn write_ty<W>(&self, ty: Type, w: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        match ty {
            Type::Int(width) => write!(w, "Builtin.Int{width}"),
            Type::RawPointer => write!(w, "Builtin.RawPointer"),
            Type::ObjectPointer => write!(w, "Builtin.ObjectPointer"),
            Type::Compound(cmpd_ref) => match &self.compounds[cmpd_ref] {
                CompoundType::Tuple(fields) => {
                    write!(w, "(")?;
                    self.write_ty_list(fields, w)?;
                    write!(w, ")")
                }
                CompoundType::Func { input, result } => {
                    self.write_ty(*input, w)?;
                    write!(w, " -> ")?;
                    self.write_ty(*result, w)
                }
                CompoundType::PolyFunc {
                    generic_params,
                    input,
                    result,
                } => {
                    write!(w, "<")?;
                    self.write_ty_list(generic_params, w)?;
                    write!(w, "> ")?;
                    self.write_ty(*input, w)?;
                    write!(w, " -> ")?;
                    self.write_ty(*result, w)
                }
                CompoundType::Metatype(instance) => {
                    self.write_ty(*instance, w)?;
                    write!(w, ".metatype")
                }
                CompoundType::Protocol(name) | CompoundType::Class(name) => write!(w, "{name}"),
                CompoundType::Archetype(data) => write!(w, "{}", data.name),
                CompoundType::Struct(data) => write!(w, "{}", data.name),
            },
        }
    }

    fn write_ty_list<W>(&self, tys: &[Type], w: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        let mut delim = "";
        for ty in tys {
            write!(w, "{delim}")?;
            self.write_ty(*ty, w)?;
            delim = ", ";
        }
        Ok(())
    }
}

/// IR formal type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Builtin integer with the given bit width.
    Int(u16),
    RawPointer,
    /// Builtin reference counted object pointer.
    ObjectPointer,
    Compound(CompoundTypeRef),
}

impl Type {
    pub const I1: Type = Type::Int(1);
    pub const I8: Type = Type::Int(8);
    pub const I32: Type = Type::Int(32);
    pub const I64: Type = Type::Int(64);

    pub fn is_builtin_integer(self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub fn is_compound(self) -> bool {
        matches!(self, Self::Compound(_))
    }
}

/// An opaque reference to [`CompoundType`].
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct CompoundTypeRef(u32);
entity_impl!(CompoundTypeRef);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompoundType {
    Tuple(SmallVec<[Type; 4]>),
    Func {
        input: Type,
        result: Type,
    },
    PolyFunc {
        generic_params: SmallVec<[Type; 4]>,
        input: Type,
        result: Type,
    },
    Metatype(Type),
    /// An existential type.
    Protocol(String),
    Archetype(ArchetypeData),
    Class(String),
    Struct(StructData),
}

impl CompoundType {
    fn nominal_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Struct(data) => Some(&data.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchetypeData {
    pub name: String,
    pub class_bound: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructData {
    pub name: String,
    pub fields: Vec<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    Object,
    Address,
}

/// A formal type lowered to a value category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SilType {
    ty: Type,
    category: ValueCategory,
}

impl SilType {
    pub fn object(ty: Type) -> Self {
        Self {
            ty,
            category: ValueCategory::Object,
        }
    }

    pub fn address(ty: Type) -> Self {
        Self {
            ty,
            category: ValueCategory::Address,
        }
    }

    pub fn formal(self) -> Type {
        self.ty
    }

    pub fn category(self) -> ValueCategory {
        self.category
    }

    pub fn is_address(self) -> bool {
        self.category == ValueCategory::Address
    }

    /// Returns the type of the value stored at an address. Object types are
    /// returned unchanged.
    pub fn object_type(self) -> Self {
        Self::object(self.ty)
    }

    pub fn address_type(self) -> Self {
        Self::address(self.ty)
    }
}

/// Lowered input and result types of a concrete function type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTypeInfo {
    inputs: SmallVec<[SilType; 8]>,
    result: SilType,
    indirect_return: bool,
}

impl FunctionTypeInfo {
    pub fn input_types(&self) -> &[SilType] {
        &self.inputs
    }

    pub fn result_type(&self) -> SilType {
        self.result
    }

    pub fn has_indirect_return(&self) -> bool {
        self.indirect_return
    }
}
