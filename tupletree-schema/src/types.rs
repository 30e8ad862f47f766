//! Schema type definitions.
//!
//! This module contains the strict, typed model of a schema: the scalar
//! registry, composite and enum definitions, and the fields referencing them.
//! Nothing here is resolved yet; see [`crate::ir`] for that.

use crate::error::SchemaError;
use indexmap::{IndexMap, IndexSet};

/// Scalar type names known to every registry.
pub const BUILTIN_SCALARS: &[&str] = &[
    "bool",
    "char",
    "int",
    "unsigned",
    "float",
    "double",
    "int8_t",
    "int16_t",
    "int32_t",
    "int64_t",
    "uint8_t",
    "uint16_t",
    "uint32_t",
    "uint64_t",
    "std::string",
];

/// Set of type names treated as opaque leaves.
///
/// Scalars are emitted verbatim and never generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarRegistry {
    names: IndexSet<String>,
}

impl ScalarRegistry {
    /// Creates a registry holding only the built-in scalars.
    #[must_use]
    pub fn new() -> Self {
        Self::empty().with_scalars(BUILTIN_SCALARS.iter().copied())
    }

    /// Creates a registry with no scalars at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: IndexSet::new(),
        }
    }

    /// Adds the given names to the registry.
    #[must_use]
    pub fn with_scalars<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.register(name);
        }
        self
    }

    /// Registers a single scalar name.
    pub fn register(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Returns true if `name` is a registered scalar.
    #[must_use]
    pub fn is_scalar(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterates over registered names in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns the number of registered scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no scalar is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ScalarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete schema definition.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Namespace the generated types live in.
    pub namespace: String,
    /// Name of the tree root type.
    pub root_type: String,
    /// Scalar registry.
    pub scalars: ScalarRegistry,
    /// Type definitions, in declaration order.
    types: IndexMap<String, TypeDef>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        root_type: impl Into<String>,
        scalars: ScalarRegistry,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            root_type: root_type.into(),
            scalars,
            types: IndexMap::new(),
        }
    }

    /// Adds a type definition to the schema.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateType` if the name is already taken by a
    /// declared type or a scalar.
    pub fn add_type(&mut self, type_def: TypeDef) -> Result<(), SchemaError> {
        let name = type_def.name().to_string();
        if self.types.contains_key(&name) || self.scalars.is_scalar(&name) {
            return Err(SchemaError::duplicate_type(name));
        }
        self.types.insert(name, type_def);
        Ok(())
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Looks up a composite type by name.
    #[must_use]
    pub fn get_composite(&self, name: &str) -> Option<&CompositeDef> {
        match self.types.get(name) {
            Some(TypeDef::Composite(c)) => Some(c),
            _ => None,
        }
    }

    /// Returns true if a type with the given name is declared.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Iterates over all declared types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Iterates over composite types in declaration order.
    pub fn composites(&self) -> impl Iterator<Item = &CompositeDef> {
        self.types.values().filter_map(|t| match t {
            TypeDef::Composite(c) => Some(c),
            TypeDef::Enum(_) => None,
        })
    }

    /// Iterates over enum types in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDef> {
        self.types.values().filter_map(|t| match t {
            TypeDef::Enum(e) => Some(e),
            TypeDef::Composite(_) => None,
        })
    }

    /// Returns the declaration index of a type.
    #[must_use]
    pub fn declaration_index(&self, name: &str) -> Option<usize> {
        self.types.get_index_of(name)
    }
}

/// Type definition variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    /// Composite (class) type.
    Composite(CompositeDef),
    /// Enumeration type.
    Enum(EnumDef),
}

impl TypeDef {
    /// Returns the name of the type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Composite(c) => &c.name,
            Self::Enum(e) => &e.name,
        }
    }

    /// Returns the documentation of the type.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        match self {
            Self::Composite(c) => c.doc.as_deref(),
            Self::Enum(e) => e.doc.as_deref(),
        }
    }

    /// Returns true if this is a composite type.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// Returns true if this is an enum type.
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }
}

/// Composite type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeDef {
    /// Type name.
    pub name: String,
    /// Documentation.
    pub doc: Option<String>,
    /// Base type name, if any.
    pub base: Option<String>,
    /// Whether the type can only be instantiated through a derived type.
    pub is_abstract: bool,
    /// Own fields, in declared order.
    pub fields: Vec<FieldDef>,
}

impl CompositeDef {
    /// Creates a new composite with no base and no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            base: None,
            is_abstract: false,
            fields: Vec::new(),
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Marks the type abstract.
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// Field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Referenced type.
    pub type_ref: TypeRef,
    /// Documentation.
    pub doc: Option<String>,
}

impl FieldDef {
    /// Creates a new field.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            doc: None,
        }
    }
}

/// Textual, not yet resolved, type reference of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A plain type name.
    Named(String),
    /// A sequence of the inner reference.
    Sequence(Box<TypeRef>),
    /// An optional inner reference.
    Optional(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a plain named reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps the reference in a sequence.
    #[must_use]
    pub fn sequence(inner: TypeRef) -> Self {
        Self::Sequence(Box::new(inner))
    }

    /// Wraps the reference in an optional.
    #[must_use]
    pub fn optional(inner: TypeRef) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Returns the innermost type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Sequence(inner) | Self::Optional(inner) => inner.type_name(),
        }
    }
}

/// Enumeration type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Documentation.
    pub doc: Option<String>,
    /// Members, in declared order.
    pub members: Vec<EnumMember>,
}

/// Enumeration member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Documentation.
    pub doc: Option<String>,
}
