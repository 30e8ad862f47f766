//! Synthetic schema documents.
//!
//! The generated schema has a `Root` type holding a sequence of the first
//! item, a chain of items where each embeds the next one, an enum, and every
//! fourth item refined by a derived type. Items are declared in chain order,
//! so resolution has to reverse the declaration order to place embedded
//! items first.

use tupletree_codegen::GeneratorOptions;

/// Name of the root type of every synthetic schema.
pub const ROOT_TYPE: &str = "Root";

/// Scalar types cycled through by item fields.
const FIELD_TYPES: &[&str] = &["uint64_t", "std::string", "Color", "bool"];

/// Builds a schema document with `items` chained items of `fields` scalar
/// fields each.
#[must_use]
pub fn synthetic_schema(items: usize, fields: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("- name: {ROOT_TYPE}\n  type: struct\n  fields:\n"));
    output.push_str("    - {name: version, type: uint64_t}\n");
    if items > 0 {
        output.push_str("    - {name: items, sequence: {elementType: Item0}}\n");
    }

    for index in 0..items {
        output.push_str(&format!("- name: Item{index}\n  type: struct\n"));
        output.push_str(&format!("  doc: Item number {index}.\n"));
        output.push_str("  fields:\n");
        for field in 0..fields {
            let field_type = FIELD_TYPES[field % FIELD_TYPES.len()];
            output.push_str(&format!(
                "    - name: field{field}\n      type: {field_type}\n"
            ));
        }
        if index + 1 < items {
            output.push_str(&format!(
                "    - {{name: next, type: Item{}, optional: true}}\n",
                index + 1
            ));
        }

        if index % 4 == 0 {
            output.push_str(&format!(
                "- name: Item{index}Derived\n  type: struct\n  inherits: Item{index}\n  fields:\n    - {{name: extra, type: uint64_t}}\n"
            ));
        }
    }

    output.push_str("- name: Color\n  type: enum\n  members:\n");
    for member in ["Red", "Green", "Blue"] {
        output.push_str(&format!("    - {{name: {member}}}\n"));
    }
    output
}

/// Generator options for the synthetic schemas.
///
/// # Panics
/// Panics if the fixed options fail validation.
#[must_use]
pub fn bench_options(tracking: bool, tracking_debug: bool) -> GeneratorOptions {
    GeneratorOptions::builder()
        .namespace("bench::model")
        .root_type(ROOT_TYPE)
        .tracking(tracking)
        .tracking_debug(tracking_debug)
        .build()
        .expect("benchmark options are valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupletree_schema::{SchemaIr, decode_document, parse_schema};

    fn resolve(items: usize, fields: usize) -> SchemaIr {
        let options = bench_options(false, false);
        let document = decode_document(&synthetic_schema(items, fields)).expect("Failed to decode");
        let schema = parse_schema(
            &document,
            &options.namespace,
            &options.root_type,
            options.scalar_registry(),
        )
        .expect("Failed to parse");
        SchemaIr::from_schema(&schema).expect("Failed to resolve")
    }

    #[test]
    fn test_synthetic_schema_resolves() {
        let ir = resolve(9, 5);
        // Root, nine items and three derived items.
        assert_eq!(ir.types().count(), 13);
        assert_eq!(ir.enums.len(), 1);
        assert!(ir.unreachable_types().is_empty());
    }

    #[test]
    fn test_chain_is_reversed() {
        let ir = resolve(3, 1);
        let item1 = ir.index_of("Item1").expect("Item1");
        let item2 = ir.index_of("Item2").expect("Item2");
        assert!(item2 < item1);
    }

    #[test]
    fn test_synthetic_schema_generates() {
        let source = synthetic_schema(8, 4);
        let sources = tupletree_codegen::generate_from_str(&source, &bench_options(true, true))
            .expect("Failed to generate");
        assert_eq!(sources.len(), 3);
    }
}
