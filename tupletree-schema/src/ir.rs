//! Intermediate representation for code generation.
//!
//! This module provides a resolved representation of the schema that is
//! easier to use for code generation: types come in emission order, every
//! field carries a resolved [`FieldKind`], and every composite knows its
//! hierarchy.
//!
//! A composite-typed field is embedded by value unless that is impossible:
//! when the target is polymorphic (embedding would slice) or when the target
//! can reach the owner through the embedding graph (embedding would make the
//! owner contain itself). Such fields become references and do not constrain
//! the emission order; they are satisfied by forward declarations.

use crate::error::SchemaError;
use crate::order::topological_order;
use crate::types::{EnumDef, ScalarRegistry, Schema, TypeDef, TypeRef};
use crate::validation::validate_schema;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolved kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Opaque scalar.
    Scalar,
    /// Schema-declared enumeration.
    Enum,
    /// Composite embedded by value; must be defined before the owner.
    CompositeValue,
    /// Composite held through an owning pointer; only needs a forward
    /// declaration.
    CompositeReference,
    /// Sequence of the inner kind.
    SequenceOf(Box<FieldKind>),
    /// Optional inner kind.
    OptionalOf(Box<FieldKind>),
}

impl FieldKind {
    /// Returns the innermost kind.
    #[must_use]
    pub fn leaf(&self) -> &FieldKind {
        match self {
            Self::SequenceOf(inner) | Self::OptionalOf(inner) => inner.leaf(),
            other => other,
        }
    }

    /// Returns true if the innermost kind is a composite value.
    #[must_use]
    pub fn embeds_value(&self) -> bool {
        matches!(self.leaf(), Self::CompositeValue)
    }

    /// Returns true if the innermost kind is a composite reference.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self.leaf(), Self::CompositeReference)
    }

    /// Returns true if the innermost kind is a composite.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self.leaf(), Self::CompositeValue | Self::CompositeReference)
    }
}

/// Resolved field information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// Field name.
    pub name: String,
    /// Documentation.
    pub doc: Option<String>,
    /// Innermost referenced type name.
    pub type_name: String,
    /// Resolved kind.
    pub kind: FieldKind,
}

/// Resolved composite type information.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    /// Type name.
    pub name: String,
    /// Documentation.
    pub doc: Option<String>,
    /// Base type name, if any.
    pub base: Option<String>,
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Own fields, in declared order.
    pub fields: Vec<ResolvedField>,
    /// Topmost ancestor (the type itself when it has no base).
    pub hierarchy_root: String,
    /// Direct derived types, in emission order.
    pub children: Vec<String>,
    /// Concrete types in the subtree rooted here, self included when
    /// concrete, in emission order.
    pub concrete_descendants: Vec<String>,
    /// Types that must be emitted before this one (base first).
    pub value_dependencies: Vec<String>,
    /// Composites referenced only through forward declarations.
    pub reference_dependencies: Vec<String>,
    /// Whether the type is reachable from the root type.
    pub reachable_from_root: bool,
    /// Position in the original document.
    pub declaration_index: usize,
}

impl ResolvedType {
    /// Returns true if instances may be of a derived type.
    #[must_use]
    pub fn is_polymorphic(&self) -> bool {
        self.is_abstract || !self.children.is_empty()
    }

    /// Returns true if the type has a base or derived types.
    #[must_use]
    pub fn in_hierarchy(&self) -> bool {
        self.base.is_some() || !self.children.is_empty()
    }

    /// Returns true if the type tops its own hierarchy.
    #[must_use]
    pub fn is_hierarchy_root(&self) -> bool {
        self.base.is_none()
    }
}

/// A hierarchy of types sharing one topmost ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    /// Topmost ancestor.
    pub root: String,
    /// Concrete members, in emission order.
    pub members: Vec<String>,
}

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    /// Namespace the generated types live in.
    pub namespace: String,
    /// Tree root type.
    pub root_type: String,
    /// Scalar registry.
    pub scalars: ScalarRegistry,
    /// Enumerations, in declaration order.
    pub enums: Vec<EnumDef>,
    /// Composite types, in emission order.
    types: IndexMap<String, ResolvedType>,
}

impl SchemaIr {
    /// Validates and resolves a parsed schema.
    ///
    /// # Errors
    /// Returns `SchemaError` for unknown references, a missing or invalid
    /// root, cyclic inheritance or duplicate fields.
    pub fn from_schema(schema: &Schema) -> Result<Self, SchemaError> {
        validate_schema(schema)?;
        Resolver::new(schema).resolve()
    }

    /// Gets a resolved type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&ResolvedType> {
        self.types.get(name)
    }

    /// Gets an enum by name.
    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Iterates over composite types in emission order.
    pub fn types(&self) -> impl Iterator<Item = &ResolvedType> {
        self.types.values()
    }

    /// Returns the type names in emission order.
    #[must_use]
    pub fn emission_order(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Returns the emission index of a type.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.types.get_index_of(name)
    }

    /// Returns the root type.
    #[must_use]
    pub fn root(&self) -> Option<&ResolvedType> {
        self.types.get(&self.root_type)
    }

    /// Returns every hierarchy, in emission order of their roots.
    #[must_use]
    pub fn hierarchies(&self) -> Vec<Hierarchy> {
        self.types()
            .filter(|t| t.is_hierarchy_root())
            .map(|t| Hierarchy {
                root: t.name.clone(),
                members: t.concrete_descendants.clone(),
            })
            .collect()
    }

    /// Returns the inheritance chain of a type, topmost ancestor first.
    #[must_use]
    pub fn chain(&self, name: &str) -> Vec<&ResolvedType> {
        let mut chain = Vec::new();
        let mut current = self.types.get(name);
        while let Some(resolved) = current {
            chain.push(resolved);
            current = resolved.base.as_deref().and_then(|b| self.types.get(b));
        }
        chain.reverse();
        chain
    }

    /// Returns every field of a type, inherited ones first, paired with the
    /// type declaring it.
    #[must_use]
    pub fn all_fields(&self, name: &str) -> Vec<(&ResolvedType, &ResolvedField)> {
        self.chain(name)
            .into_iter()
            .flat_map(|owner| owner.fields.iter().map(move |field| (owner, field)))
            .collect()
    }

    /// Returns the names of types not reachable from the root.
    #[must_use]
    pub fn unreachable_types(&self) -> Vec<&str> {
        self.types()
            .filter(|t| !t.reachable_from_root)
            .map(|t| t.name.as_str())
            .collect()
    }
}

/// Builds a [`SchemaIr`] from a validated schema.
struct Resolver<'a> {
    schema: &'a Schema,
    /// Owner -> embedded composites (base and every composite field target).
    embeds: IndexMap<&'a str, Vec<&'a str>>,
    /// Base -> direct derived types, in declaration order.
    children: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Resolver<'a> {
    fn new(schema: &'a Schema) -> Self {
        let mut embeds: IndexMap<&str, Vec<&str>> = IndexMap::new();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();

        for composite in schema.composites() {
            let targets = embeds.entry(composite.name.as_str()).or_default();
            if let Some(base) = composite.base.as_deref() {
                targets.push(base);
                children.entry(base).or_default().push(&composite.name);
            }
            for field in &composite.fields {
                let target = field.type_ref.type_name();
                if schema.get_composite(target).is_some() && !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }

        Self {
            schema,
            embeds,
            children,
        }
    }

    fn resolve(self) -> Result<SchemaIr, SchemaError> {
        let declared: Vec<String> = self.schema.composites().map(|c| c.name.clone()).collect();

        let mut fields: HashMap<&str, Vec<ResolvedField>> = HashMap::new();
        let mut dependencies: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut references: HashMap<&str, Vec<String>> = HashMap::new();

        for composite in self.schema.composites() {
            let mut value_deps: Vec<String> = composite.base.iter().cloned().collect();
            let mut reference_deps: Vec<String> = Vec::new();
            let mut resolved_fields = Vec::with_capacity(composite.fields.len());

            for field in &composite.fields {
                let kind = self.resolve_kind(&field.type_ref, &composite.name);
                let target = field.type_ref.type_name().to_string();
                if kind.embeds_value() {
                    if !value_deps.contains(&target) {
                        value_deps.push(target.clone());
                    }
                } else if kind.is_reference() && !reference_deps.contains(&target) {
                    tracing::trace!(
                        owner = %composite.name,
                        field = %field.name,
                        target = %target,
                        "field resolved as reference"
                    );
                    reference_deps.push(target.clone());
                }
                resolved_fields.push(ResolvedField {
                    name: field.name.clone(),
                    doc: field.doc.clone(),
                    type_name: target,
                    kind,
                });
            }

            fields.insert(&composite.name, resolved_fields);
            references.insert(&composite.name, reference_deps);
            dependencies.insert(composite.name.clone(), value_deps);
        }

        let order = topological_order(&declared, &dependencies)?;
        tracing::debug!(order = ?order, "resolved emission order");

        let reachable = self.reachable_from(&self.schema.root_type);
        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut types = IndexMap::with_capacity(order.len());
        for name in &order {
            let Some(composite) = self.schema.get_composite(name) else {
                continue;
            };

            let mut children: Vec<String> = self
                .children
                .get(name.as_str())
                .map(|c| c.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default();
            children.sort_by_key(|c| position.get(c.as_str()).copied());

            types.insert(
                name.clone(),
                ResolvedType {
                    name: name.clone(),
                    doc: composite.doc.clone(),
                    base: composite.base.clone(),
                    is_abstract: composite.is_abstract,
                    fields: fields.remove(name.as_str()).unwrap_or_default(),
                    hierarchy_root: self.hierarchy_root(name).to_string(),
                    children,
                    concrete_descendants: Vec::new(),
                    value_dependencies: dependencies.get(name).cloned().unwrap_or_default(),
                    reference_dependencies: references.remove(name.as_str()).unwrap_or_default(),
                    reachable_from_root: reachable.contains(name.as_str()),
                    declaration_index: self.schema.declaration_index(name).unwrap_or_default(),
                },
            );
        }

        // Bases precede derived types, so walking in emission order appends
        // descendants in emission order.
        for name in &order {
            let Some(composite) = self.schema.get_composite(name) else {
                continue;
            };
            if composite.is_abstract {
                continue;
            }
            let mut current = Some(name.as_str());
            while let Some(ancestor) = current {
                if let Some(resolved) = types.get_mut(ancestor) {
                    resolved.concrete_descendants.push(name.clone());
                }
                current = self
                    .schema
                    .get_composite(ancestor)
                    .and_then(|c| c.base.as_deref());
            }
        }

        Ok(SchemaIr {
            namespace: self.schema.namespace.clone(),
            root_type: self.schema.root_type.clone(),
            scalars: self.schema.scalars.clone(),
            enums: self.schema.enums().cloned().collect(),
            types,
        })
    }

    fn resolve_kind(&self, type_ref: &TypeRef, owner: &str) -> FieldKind {
        match type_ref {
            TypeRef::Sequence(inner) => FieldKind::SequenceOf(Box::new(self.resolve_kind(inner, owner))),
            TypeRef::Optional(inner) => FieldKind::OptionalOf(Box::new(self.resolve_kind(inner, owner))),
            TypeRef::Named(name) => match self.schema.get_type(name) {
                Some(TypeDef::Enum(_)) => FieldKind::Enum,
                Some(TypeDef::Composite(target)) => {
                    let polymorphic =
                        target.is_abstract || self.children.contains_key(target.name.as_str());
                    if polymorphic || self.embeds_transitively(name, owner) {
                        FieldKind::CompositeReference
                    } else {
                        FieldKind::CompositeValue
                    }
                }
                None => FieldKind::Scalar,
            },
        }
    }

    /// Returns true if `from` reaches `to` in the embedding graph.
    fn embeds_transitively(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![from];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            for next in self.embeds.get(node).into_iter().flatten().copied() {
                if next == to {
                    return true;
                }
                stack.push(next);
            }
        }
        false
    }

    fn hierarchy_root<'s>(&'s self, name: &'s str) -> &'s str {
        let mut current = name;
        while let Some(base) = self
            .schema
            .get_composite(current)
            .and_then(|c| c.base.as_deref())
        {
            current = base;
        }
        current
    }

    /// Collects every composite reachable from `root` through fields, bases
    /// and derived types.
    fn reachable_from(&self, root: &'a str) -> HashSet<&'a str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            if !seen.insert(node) {
                continue;
            }
            for next in self.embeds.get(node).into_iter().flatten().copied() {
                queue.push_back(next);
            }
            for next in self.children.get(node).into_iter().flatten().copied() {
                queue.push_back(next);
            }
        }
        seen
    }
}
