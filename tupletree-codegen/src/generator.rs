//! Output assembly.
//!
//! The generated sources are split into three units, each including the
//! previous one:
//! - `ForwardDecls.h`: forward declarations of every type
//! - `Early.h`: enums, hierarchy discriminators and `Box`
//! - `Generated.h`: class definitions in emission order, then their
//!   out-of-line members and the tree root alias

use crate::cpp::names::{RESERVED_MEMBERS, field_spellings, include_guard, include_path};
use crate::cpp::{ClassGenerator, EarlyGenerator, ForwardDeclGenerator, TrackingGenerator};
use crate::error::{CodegenError, EmissionError};
use crate::options::GeneratorOptions;
use indexmap::IndexMap;
use tupletree_schema::order::topological_order;
use tupletree_schema::{SchemaError, SchemaIr};

/// Path of the forward declaration unit.
pub const FORWARD_DECLS_UNIT: &str = "ForwardDecls.h";
/// Path of the early unit.
pub const EARLY_UNIT: &str = "Early.h";
/// Path of the class definition unit.
pub const GENERATED_UNIT: &str = "Generated.h";

const BANNER: &str = "// This file is generated by tuple-tree-generate-cpp. Do not edit.\n";

/// One emitted source file before assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionUnit {
    /// Output path, relative to the output directory.
    pub path: String,
    /// Units this one includes.
    pub depends_on: Vec<String>,
    /// System headers.
    pub system_includes: Vec<&'static str>,
    /// Schema types this unit defines or declares.
    pub types: Vec<String>,
    /// Namespace body.
    pub body: String,
}

/// Assembled output: file path to file contents, in dependency order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSources {
    files: IndexMap<String, String>,
}

impl GeneratedSources {
    /// Gets the contents of a file.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Iterates over `(path, contents)` pairs in dependency order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Returns the file paths in dependency order.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    /// Returns the number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if nothing was generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.files
    }
}

impl FromIterator<(String, String)> for GeneratedSources {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// C++ source generator.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    options: &'a GeneratorOptions,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, options: &'a GeneratorOptions) -> Self {
        Self { ir, options }
    }

    /// Generates every unit.
    ///
    /// # Errors
    /// Returns `CodegenError::ReservedName` if a field collides with a
    /// generated member or a class name, `CodegenError::NameCollision` if two
    /// fields of one class generate the same identifier, or `CodegenError::Emission` if an emitter invariant
    /// does not hold.
    pub fn generate(&self) -> Result<GeneratedSources, CodegenError> {
        self.check_member_names()?;

        let tracking = TrackingGenerator::from_options(self.options);
        let units = vec![
            self.forward_unit(),
            self.early_unit(),
            self.generated_unit(tracking)?,
        ];
        let sources = assemble(units, self.options)?;

        tracing::info!(
            namespace = %self.options.namespace,
            types = self.ir.types().count(),
            enums = self.ir.enums.len(),
            files = sources.len(),
            "generated sources"
        );
        Ok(sources)
    }

    /// Checks the identifiers generated for every field visible in a class,
    /// inherited ones included.
    fn check_member_names(&self) -> Result<(), CodegenError> {
        for resolved in self.ir.types() {
            let chain = self.ir.chain(&resolved.name);
            let mut seen: IndexMap<String, &str> = IndexMap::new();

            for (_, field) in self.ir.all_fields(&resolved.name) {
                for spelling in field_spellings(&field.name) {
                    if RESERVED_MEMBERS.contains(&spelling.as_str())
                        || chain.iter().any(|owner| owner.name == spelling)
                    {
                        return Err(CodegenError::ReservedName {
                            type_name: resolved.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                    match seen.get(&spelling) {
                        Some(other) if *other != field.name => {
                            return Err(CodegenError::NameCollision {
                                type_name: resolved.name.clone(),
                                field: field.name.clone(),
                                other: (*other).to_string(),
                                spelling,
                            });
                        }
                        Some(_) => {}
                        None => {
                            seen.insert(spelling, &field.name);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn all_type_names(&self) -> Vec<String> {
        self.ir
            .enums
            .iter()
            .map(|e| e.name.clone())
            .chain(self.ir.types().map(|t| t.name.clone()))
            .collect()
    }

    fn forward_unit(&self) -> EmissionUnit {
        EmissionUnit {
            path: FORWARD_DECLS_UNIT.to_string(),
            depends_on: Vec::new(),
            system_includes: vec!["<cstdint>"],
            types: self.all_type_names(),
            body: ForwardDeclGenerator::new(self.ir).generate(),
        }
    }

    fn early_unit(&self) -> EmissionUnit {
        let mut types: Vec<String> = self.ir.enums.iter().map(|e| e.name.clone()).collect();
        types.extend(
            self.ir
                .types()
                .filter(|t| t.is_hierarchy_root() && t.is_polymorphic())
                .map(|t| t.name.clone()),
        );

        EmissionUnit {
            path: EARLY_UNIT.to_string(),
            depends_on: vec![FORWARD_DECLS_UNIT.to_string()],
            system_includes: vec![
                "<cstddef>",
                "<cstdint>",
                "<memory>",
                "<string_view>",
                "<type_traits>",
                "<utility>",
            ],
            types,
            body: EarlyGenerator::new(self.ir).generate(),
        }
    }

    fn generated_unit(
        &self,
        tracking: Option<TrackingGenerator>,
    ) -> Result<EmissionUnit, EmissionError> {
        let classes = ClassGenerator::new(self.ir, tracking);
        let root = self
            .ir
            .root()
            .ok_or_else(|| EmissionError::unresolved(&self.ir.root_type, "the root alias"))?;

        let mut body = classes.generate_classes()?;
        body.push_str(&classes.generate_definitions()?);
        body.push_str("/// Root of the tuple tree.\n");
        body.push_str(&format!("using TupleTreeRoot = {};\n", root.name));
        body.push_str(&format!(
            "inline constexpr const char *RootName = \"{}\";\n",
            root.name
        ));

        let mut system_includes = vec![
            "<cstddef>",
            "<cstdint>",
            "<optional>",
            "<string>",
            "<utility>",
            "<vector>",
        ];
        if let Some(tracking) = &tracking {
            system_includes.extend(tracking.includes());
            system_includes.sort_unstable();
        }

        Ok(EmissionUnit {
            path: GENERATED_UNIT.to_string(),
            depends_on: vec![EARLY_UNIT.to_string()],
            system_includes,
            types: self.ir.emission_order().into_iter().map(str::to_string).collect(),
            body,
        })
    }
}

/// Orders units so every unit follows the units it includes, and renders
/// each one.
///
/// # Errors
/// Returns `EmissionError::UnresolvedType` if a unit includes an unknown
/// unit, or `EmissionError::CyclicUnits` if the includes form a cycle.
pub fn assemble(
    units: Vec<EmissionUnit>,
    options: &GeneratorOptions,
) -> Result<GeneratedSources, EmissionError> {
    let mut by_path: IndexMap<String, EmissionUnit> = IndexMap::with_capacity(units.len());
    for unit in units {
        by_path.insert(unit.path.clone(), unit);
    }

    let mut dependencies: IndexMap<String, Vec<String>> = IndexMap::new();
    for unit in by_path.values() {
        if let Some(missing) = unit.depends_on.iter().find(|d| !by_path.contains_key(*d)) {
            return Err(EmissionError::unresolved(
                missing,
                format!("includes of '{}'", unit.path),
            ));
        }
        dependencies.insert(unit.path.clone(), unit.depends_on.clone());
    }

    let paths: Vec<String> = by_path.keys().cloned().collect();
    let order = topological_order(&paths, &dependencies).map_err(|err| match err {
        SchemaError::CyclicInheritance { cycle } => EmissionError::CyclicUnits { cycle },
        other => EmissionError::CyclicUnits {
            cycle: other.to_string(),
        },
    })?;

    let mut files = IndexMap::with_capacity(order.len());
    for path in order {
        if let Some(unit) = by_path.get(&path) {
            tracing::debug!(path = %unit.path, types = unit.types.len(), "rendering unit");
            files.insert(path.clone(), render_unit(unit, options));
        }
    }
    Ok(GeneratedSources { files })
}

fn render_unit(unit: &EmissionUnit, options: &GeneratorOptions) -> String {
    let guard = include_guard(&options.namespace, &unit.path);
    let mut output = String::new();

    output.push_str(BANNER);
    output.push('\n');
    output.push_str(&format!("#ifndef {guard}\n"));
    output.push_str(&format!("#define {guard}\n\n"));

    for include in &unit.system_includes {
        output.push_str(&format!("#include {include}\n"));
    }
    if !unit.system_includes.is_empty() {
        output.push('\n');
    }
    for dependency in &unit.depends_on {
        output.push_str(&format!(
            "#include \"{}\"\n",
            include_path(&options.include_path_prefix, dependency)
        ));
    }
    if !unit.depends_on.is_empty() {
        output.push('\n');
    }

    output.push_str(&format!("namespace {} {{\n\n", options.namespace));
    output.push_str(&unit.body);
    if !unit.body.ends_with("\n\n") {
        output.push('\n');
    }
    output.push_str(&format!("}} // namespace {}\n\n", options.namespace));
    output.push_str(&format!("#endif // {guard}\n"));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupletree_schema::{decode_document, parse_schema};

    fn options(tracking: bool, debug: bool) -> GeneratorOptions {
        GeneratorOptions::builder()
            .namespace("model")
            .root_type("Binary")
            .include_path_prefix("model/")
            .tracking(tracking)
            .tracking_debug(debug)
            .build()
            .expect("valid options")
    }

    fn generate(yaml: &str, options: &GeneratorOptions) -> Result<GeneratedSources, CodegenError> {
        let document = decode_document(yaml).expect("Failed to decode");
        let schema = parse_schema(
            &document,
            &options.namespace,
            &options.root_type,
            options.scalar_registry(),
        )?;
        let ir = SchemaIr::from_schema(&schema)?;
        Generator::new(&ir, options).generate()
    }

    fn unit(path: &str, depends_on: &[&str]) -> EmissionUnit {
        EmissionUnit {
            path: path.to_string(),
            depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
            system_includes: Vec::new(),
            types: Vec::new(),
            body: String::new(),
        }
    }

    const SCHEMA: &str = r#"
- {name: Binary, type: struct, fields: [{name: functions, sequence: {elementType: Function}}]}
- {name: Function, type: struct, fields: [{name: entry, type: uint64_t}]}
"#;

    #[test]
    fn test_units_in_dependency_order() {
        let sources = generate(SCHEMA, &options(false, false)).expect("Failed to generate");
        assert_eq!(
            sources.paths(),
            vec![FORWARD_DECLS_UNIT, EARLY_UNIT, GENERATED_UNIT]
        );
    }

    #[test]
    fn test_includes_use_prefix() {
        let sources = generate(SCHEMA, &options(false, false)).expect("Failed to generate");
        let early = sources.get(EARLY_UNIT).expect("early unit");
        let generated = sources.get(GENERATED_UNIT).expect("generated unit");

        assert!(early.contains("#include \"model/ForwardDecls.h\"\n"));
        assert!(generated.contains("#include \"model/Early.h\"\n"));
        assert!(generated.contains("#ifndef MODEL_GENERATED_GENERATED_H\n"));
        assert!(generated.ends_with("#endif // MODEL_GENERATED_GENERATED_H\n"));
        assert!(generated.contains("using TupleTreeRoot = Binary;"));
    }

    #[test]
    fn test_tracking_disabled_leaves_no_trace() {
        let sources = generate(SCHEMA, &options(false, false)).expect("Failed to generate");
        for (path, contents) in sources.iter() {
            assert!(!contents.contains("Dirty"), "{path} mentions dirty state");
            assert!(!contents.contains("resetTracking"), "{path} resets tracking");
            assert!(!contents.contains("<bitset>"), "{path} includes bitset");
        }
    }

    #[test]
    fn test_tracking_without_debug_has_no_diagnostics() {
        let sources = generate(SCHEMA, &options(true, false)).expect("Failed to generate");
        let generated = sources.get(GENERATED_UNIT).expect("generated unit");
        assert!(generated.contains("#include <bitset>"));
        assert!(generated.contains("resetTracking"));
        for (_, contents) in sources.iter() {
            assert!(!contents.contains("dumpTracking"));
            assert!(!contents.contains("source_location"));
        }
    }

    #[test]
    fn test_tracking_debug() {
        let sources = generate(SCHEMA, &options(true, true)).expect("Failed to generate");
        let generated = sources.get(GENERATED_UNIT).expect("generated unit");
        assert!(generated.contains("#include <source_location>"));
        assert!(generated.contains("dumpTracking"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let first = generate(SCHEMA, &options(true, false)).expect("Failed to generate");
        let second = generate(SCHEMA, &options(true, false)).expect("Failed to generate");
        assert_eq!(first, second);
    }

    #[test]
    fn test_reserved_field_name() {
        let yaml = "- {name: Binary, type: struct, fields: [{name: kind, type: int}]}";
        let result = generate(yaml, &options(false, false));
        assert!(matches!(result, Err(CodegenError::ReservedName { .. })));
    }

    #[test]
    fn test_pascal_case_collision() {
        let yaml =
            "- {name: Binary, type: struct, fields: [{name: entry_point, type: int}, {name: entryPoint, type: int}]}";
        let err = generate(yaml, &options(false, false)).expect_err("colliding fields");
        match err {
            CodegenError::NameCollision {
                type_name,
                field,
                other,
                spelling,
            } => {
                assert_eq!(type_name, "Binary");
                assert_eq!(field, "entryPoint");
                assert_eq!(other, "entry_point");
                assert_eq!(spelling, "TheEntryPoint");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collision_across_inheritance() {
        let yaml = r#"
- {name: Binary, type: struct, fields: [{name: entry_point, type: int}]}
- {name: Function, type: struct, inherits: Binary, fields: [{name: EntryPoint, type: int}]}
"#;
        let result = generate(yaml, &options(false, false));
        assert!(matches!(
            result,
            Err(CodegenError::NameCollision { ref type_name, .. }) if type_name == "Function"
        ));
    }

    #[test]
    fn test_field_named_after_class_or_generated_member() {
        let own_class = "- {name: Binary, type: struct, fields: [{name: Binary, type: int}]}";
        assert!(matches!(
            generate(own_class, &options(false, false)),
            Err(CodegenError::ReservedName { .. })
        ));

        let kind_member = "- {name: Binary, type: struct, fields: [{name: Kind, type: int}]}";
        assert!(matches!(
            generate(kind_member, &options(false, false)),
            Err(CodegenError::ReservedName { .. })
        ));
    }

    #[test]
    fn test_field_named_after_its_type() {
        let yaml = r#"
- {name: Binary, type: struct, fields: [{name: color, type: Color}, {name: other, type: Color}]}
- {name: Color, type: enum, members: [{name: Red}]}
"#;
        let sources = generate(yaml, &options(false, false)).expect("Failed to generate");
        let generated = sources.get(GENERATED_UNIT).expect("generated unit");
        assert!(generated.contains("Binary(::model::Color NewColor, ::model::Color NewOther)"));
    }

    #[test]
    fn test_missing_root() {
        let result = generate("- {name: Function, type: struct}", &options(false, false));
        assert!(matches!(
            result,
            Err(CodegenError::Schema(SchemaError::MissingRoot { .. }))
        ));
    }

    #[test]
    fn test_assemble_rejects_cyclic_units() {
        let result = assemble(
            vec![unit("A.h", &["B.h"]), unit("B.h", &["A.h"])],
            &options(false, false),
        );
        assert_eq!(
            result,
            Err(EmissionError::CyclicUnits {
                cycle: "A.h -> B.h -> A.h".to_string()
            })
        );
    }

    #[test]
    fn test_assemble_rejects_unknown_unit() {
        let result = assemble(vec![unit("A.h", &["Missing.h"])], &options(false, false));
        assert!(matches!(result, Err(EmissionError::UnresolvedType { .. })));
    }

    #[test]
    fn test_assemble_orders_dependencies_first() {
        let sources = assemble(
            vec![unit("C.h", &["B.h"]), unit("B.h", &["A.h"]), unit("A.h", &[])],
            &options(false, false),
        )
        .expect("Failed to assemble");
        assert_eq!(sources.paths(), vec!["A.h", "B.h", "C.h"]);
    }
}
