//! Naming and type spelling shared by the C++ emitters.

use tupletree_schema::ir::{FieldKind, ResolvedField};

/// Members every generated class declares; no identifier generated for a
/// field may use these names.
pub const RESERVED_MEMBERS: &[&str] = &[
    "Name",
    "Kind",
    "TheKind",
    "Dirty",
    "DirtySites",
    "AssociatedKind",
    "Fields",
    "FieldCount",
    "kind",
    "classof",
    "cloneBoxed",
    "destroyBoxed",
    "equalBoxed",
    "lessBoxed",
    "visitFields",
    "serialize",
    "deserialize",
    "isDirty",
    "hasDirtyFields",
    "resetTracking",
    "dumpTracking",
    "markDirty",
];

/// Converts a field name to PascalCase (`self_ref` becomes `SelfRef`).
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = true;

    for c in name.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Name of the private data member backing a field.
#[must_use]
pub fn member_name(field: &str) -> String {
    format!("The{}", to_pascal_case(field))
}

/// Name of the setter of a field.
#[must_use]
pub fn setter_name(field: &str) -> String {
    format!("set{}", to_pascal_case(field))
}

/// Name of a constructor parameter initializing a field.
///
/// The prefix keeps the parameter from hiding the owning class, whose name
/// the delegating constructors spell.
#[must_use]
pub fn parameter_name(field: &str) -> String {
    format!("New{}", to_pascal_case(field))
}

/// Every class-scope identifier generated for a field: the accessor, the
/// data member, the setter and the constructor parameter.
#[must_use]
pub fn field_spellings(field: &str) -> [String; 4] {
    [
        field.to_string(),
        member_name(field),
        setter_name(field),
        parameter_name(field),
    ]
}

/// Namespace holding the discriminator of the hierarchy rooted at `root`.
#[must_use]
pub fn kind_namespace(root: &str) -> String {
    format!("{root}Kind")
}

/// Fully spelled discriminator enumerator of `name` in the hierarchy rooted
/// at `root`.
#[must_use]
pub fn kind_value(root: &str, name: &str) -> String {
    format!("{}::{}", kind_namespace(root), name)
}

/// Discriminator type of the hierarchy rooted at `root`.
#[must_use]
pub fn kind_type(root: &str) -> String {
    format!("{}::Values", kind_namespace(root))
}

/// Spells a schema type fully qualified, so that a member or parameter
/// named after the type cannot hide it.
#[must_use]
pub fn qualified(namespace: &str, type_name: &str) -> String {
    format!("::{namespace}::{type_name}")
}

/// Spells the C++ type of a field.
///
/// Schema types are qualified with `namespace`; scalars are spelled as
/// declared. An optional reference collapses to the nullable box itself.
#[must_use]
pub fn cpp_type(field: &ResolvedField, namespace: &str) -> String {
    let type_name = match field.kind.leaf() {
        FieldKind::Scalar => field.type_name.clone(),
        _ => qualified(namespace, &field.type_name),
    };
    spell_kind(&field.kind, &type_name)
}

fn spell_kind(kind: &FieldKind, type_name: &str) -> String {
    match kind {
        FieldKind::Scalar | FieldKind::Enum | FieldKind::CompositeValue => type_name.to_string(),
        FieldKind::CompositeReference => format!("Box<{type_name}>"),
        FieldKind::SequenceOf(inner) => format!("std::vector<{}>", spell_kind(inner, type_name)),
        FieldKind::OptionalOf(inner) if **inner == FieldKind::CompositeReference => {
            spell_kind(inner, type_name)
        }
        FieldKind::OptionalOf(inner) => format!("std::optional<{}>", spell_kind(inner, type_name)),
    }
}

/// Include guard macro of an emitted unit.
///
/// `model::v2` and `ForwardDecls.h` give `MODEL_V2_GENERATED_FORWARDDECLS_H`.
#[must_use]
pub fn include_guard(namespace: &str, unit_path: &str) -> String {
    let namespace = namespace.replace("::", "_").to_ascii_uppercase();
    let stem = unit_path
        .rsplit_once('.')
        .map_or(unit_path, |(stem, _)| stem)
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .to_ascii_uppercase();
    format!("{namespace}_GENERATED_{stem}_H")
}

/// Joins the include path prefix and a unit path.
#[must_use]
pub fn include_path(prefix: &str, unit_path: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        format!("{prefix}{unit_path}")
    } else {
        format!("{prefix}/{unit_path}")
    }
}

/// Renders a documentation string as `///` lines at the given indentation.
#[must_use]
pub fn doc_comment(doc: Option<&str>, indent: &str) -> String {
    let Some(doc) = doc else {
        return String::new();
    };
    let mut output = String::new();
    for line in doc.trim_end().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
    output
}
