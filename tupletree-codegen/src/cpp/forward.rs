//! Forward declaration generation.

use tupletree_schema::ir::SchemaIr;

/// Generator for the forward declarations of every schema type.
pub struct ForwardDeclGenerator<'a> {
    ir: &'a SchemaIr,
}

impl<'a> ForwardDeclGenerator<'a> {
    /// Creates a new forward declaration generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self { ir }
    }

    /// Generates the namespace body of the forward declaration unit.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        for enum_def in &self.ir.enums {
            output.push_str(&format!("enum class {} : uint8_t;\n", enum_def.name));
        }
        if !self.ir.enums.is_empty() {
            output.push('\n');
        }

        for resolved in self.ir.types() {
            output.push_str(&format!("class {};\n", resolved.name));
        }

        output.push_str("\ntemplate <typename T> class Box;\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupletree_schema::{ScalarRegistry, SchemaIr, decode_document, parse_schema};

    fn create_test_ir() -> SchemaIr {
        let yaml = r#"
- {name: Binary, type: struct, fields: [{name: functions, sequence: {elementType: Function}}]}
- {name: Function, type: struct, fields: [{name: attribute, type: Kind}]}
- {name: Kind, type: enum, members: [{name: Regular}, {name: NoReturn}]}
"#;
        let document = decode_document(yaml).expect("Failed to decode");
        let schema = parse_schema(&document, "model", "Binary", ScalarRegistry::new())
            .expect("Failed to parse");
        SchemaIr::from_schema(&schema).expect("Failed to resolve")
    }

    #[test]
    fn test_forward_declarations() {
        let ir = create_test_ir();
        let output = ForwardDeclGenerator::new(&ir).generate();

        assert!(output.contains("enum class Kind : uint8_t;"));
        assert!(output.contains("class Binary;"));
        assert!(output.contains("class Function;"));
        assert!(output.contains("template <typename T> class Box;"));
        assert!(!output.contains('{'));
    }

    #[test]
    fn test_forward_declarations_follow_emission_order() {
        let ir = create_test_ir();
        let output = ForwardDeclGenerator::new(&ir).generate();
        let function = output.find("class Function;").expect("Function declared");
        let binary = output.find("class Binary;").expect("Binary declared");
        assert!(function < binary);
    }
}
