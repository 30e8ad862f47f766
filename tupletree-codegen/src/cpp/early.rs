//! Generation of the early unit: enums, hierarchy discriminators and the
//! owning pointer used by reference fields.

use crate::cpp::names::{doc_comment, kind_namespace};
use tupletree_schema::EnumDef;
use tupletree_schema::ir::{Hierarchy, SchemaIr};
use tupletree_schema::validation::RESERVED_ENUM_MEMBER;

/// Generator for the definitions every class depends on.
pub struct EarlyGenerator<'a> {
    ir: &'a SchemaIr,
}

impl<'a> EarlyGenerator<'a> {
    /// Creates a new early unit generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self { ir }
    }

    /// Generates the namespace body of the early unit.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        if !self.ir.enums.is_empty() {
            output.push_str("template <typename T> T fromName(std::string_view Name);\n\n");
        }
        for enum_def in &self.ir.enums {
            output.push_str(&self.generate_enum(enum_def));
        }

        let hierarchies: Vec<Hierarchy> = self
            .ir
            .hierarchies()
            .into_iter()
            .filter(|h| self.is_polymorphic_root(&h.root))
            .collect();
        for hierarchy in &hierarchies {
            output.push_str(&self.generate_discriminator(hierarchy));
        }

        output.push_str(&self.generate_box());
        if !hierarchies.is_empty() {
            output.push_str(&self.generate_casts());
        }

        output
    }

    fn is_polymorphic_root(&self, name: &str) -> bool {
        self.ir.get_type(name).is_some_and(|t| t.is_polymorphic())
    }

    /// Generates an enum with its name conversions.
    fn generate_enum(&self, enum_def: &EnumDef) -> String {
        let mut output = String::new();
        let name = &enum_def.name;
        let members: Vec<&str> = std::iter::once(RESERVED_ENUM_MEMBER)
            .chain(enum_def.members.iter().map(|m| m.name.as_str()))
            .collect();

        output.push_str(&doc_comment(enum_def.doc.as_deref(), ""));
        output.push_str(&format!("enum class {name} : uint8_t {{\n"));
        output.push_str(&format!("  {RESERVED_ENUM_MEMBER},\n"));
        for member in &enum_def.members {
            output.push_str(&doc_comment(member.doc.as_deref(), "  "));
            output.push_str(&format!("  {},\n", member.name));
        }
        output.push_str("};\n\n");

        output.push_str(&format!("inline const char *getName({name} Value) {{\n"));
        output.push_str("  switch (Value) {\n");
        for member in &members {
            output.push_str(&format!("  case {name}::{member}:\n"));
            output.push_str(&format!("    return \"{member}\";\n"));
        }
        output.push_str("  }\n");
        output.push_str(&format!("  return \"{RESERVED_ENUM_MEMBER}\";\n"));
        output.push_str("}\n\n");

        output.push_str(&format!(
            "template <> inline {name} fromName<{name}>(std::string_view Name) {{\n"
        ));
        for member in enum_def.members.iter().map(|m| m.name.as_str()) {
            output.push_str(&format!("  if (Name == \"{member}\")\n"));
            output.push_str(&format!("    return {name}::{member};\n"));
        }
        output.push_str(&format!("  return {name}::{RESERVED_ENUM_MEMBER};\n"));
        output.push_str("}\n\n");

        output
    }

    /// Generates the discriminator of a polymorphic hierarchy.
    fn generate_discriminator(&self, hierarchy: &Hierarchy) -> String {
        let mut output = String::new();
        let namespace = kind_namespace(&hierarchy.root);

        output.push_str(&format!(
            "/// Discriminator of the types deriving from {}.\n",
            hierarchy.root
        ));
        output.push_str(&format!("namespace {namespace} {{\n"));
        output.push_str("enum Values : uint8_t {\n");
        for member in &hierarchy.members {
            output.push_str(&format!("  {member},\n"));
        }
        output.push_str("};\n\n");

        output.push_str("inline const char *getName(Values Kind) {\n");
        output.push_str("  switch (Kind) {\n");
        for member in &hierarchy.members {
            output.push_str(&format!("  case {member}:\n"));
            output.push_str(&format!("    return \"{member}\";\n"));
        }
        output.push_str("  }\n");
        output.push_str("  return \"\";\n");
        output.push_str("}\n");
        output.push_str(&format!("}} // namespace {namespace}\n\n"));

        output
    }

    /// Generates `Box`, the deep-copying owning pointer.
    ///
    /// Copies, comparisons and destruction dispatch through static members of
    /// the pointee so a box of a base type handles every derived type without
    /// virtual functions.
    fn generate_box(&self) -> String {
        let mut output = String::new();

        output.push_str("template <typename T> struct BoxDeleter {\n");
        output.push_str("  void operator()(T *Object) const { T::destroyBoxed(Object); }\n");
        output.push_str("};\n\n");

        output.push_str("/// Owning pointer with deep-copy semantics.\n");
        output.push_str("template <typename T> class Box {\n");
        output.push_str("public:\n");
        output.push_str("  Box() = default;\n");
        output.push_str("  Box(std::nullptr_t) {}\n");
        output.push_str("  template <typename U>\n");
        output.push_str("    requires std::is_convertible_v<U *, T *>\n");
        output.push_str("  Box(std::unique_ptr<U> Object) : Pointer(Object.release()) {}\n");
        output.push_str("  template <typename U>\n");
        output.push_str("    requires std::is_convertible_v<U *, T *>\n");
        output.push_str("  Box(Box<U> &&Other) : Pointer(Other.release()) {}\n");
        output.push_str("  template <typename U>\n");
        output.push_str("    requires std::is_convertible_v<U *, T *>\n");
        output.push_str("  Box(const Box<U> &Other)\n");
        output.push_str("    : Pointer(Other ? T::cloneBoxed(*Other) : nullptr) {}\n");
        output.push_str("  Box(const Box &Other)\n");
        output.push_str("    : Pointer(Other ? T::cloneBoxed(*Other) : nullptr) {}\n");
        output.push_str("  Box(Box &&) = default;\n");
        output.push_str("  Box &operator=(const Box &Other) {\n");
        output.push_str("    if (this != &Other)\n");
        output.push_str("      Pointer.reset(Other ? T::cloneBoxed(*Other) : nullptr);\n");
        output.push_str("    return *this;\n");
        output.push_str("  }\n");
        output.push_str("  Box &operator=(Box &&) = default;\n");
        output.push_str("  ~Box() = default;\n\n");

        output.push_str("  explicit operator bool() const { return Pointer != nullptr; }\n");
        output.push_str("  T *get() { return Pointer.get(); }\n");
        output.push_str("  const T *get() const { return Pointer.get(); }\n");
        output.push_str("  T &operator*() { return *Pointer; }\n");
        output.push_str("  const T &operator*() const { return *Pointer; }\n");
        output.push_str("  T *operator->() { return Pointer.get(); }\n");
        output.push_str("  const T *operator->() const { return Pointer.get(); }\n");
        output.push_str("  T *release() { return Pointer.release(); }\n\n");

        output.push_str("  bool operator==(const Box &Other) const {\n");
        output.push_str("    if (!Pointer || !Other.Pointer)\n");
        output.push_str("      return !Pointer && !Other.Pointer;\n");
        output.push_str("    return T::equalBoxed(*Pointer, *Other.Pointer);\n");
        output.push_str("  }\n");
        output.push_str("  bool operator!=(const Box &Other) const { return !(*this == Other); }\n");
        output.push_str("  bool operator<(const Box &Other) const {\n");
        output.push_str("    if (!Pointer || !Other.Pointer)\n");
        output.push_str("      return !Pointer && Other.Pointer;\n");
        output.push_str("    return T::lessBoxed(*Pointer, *Other.Pointer);\n");
        output.push_str("  }\n\n");

        output.push_str("private:\n");
        output.push_str("  std::unique_ptr<T, BoxDeleter<T>> Pointer;\n");
        output.push_str("};\n\n");

        output.push_str("template <typename T, typename... ArgTypes>\n");
        output.push_str("Box<T> makeBox(ArgTypes &&...Arguments) {\n");
        output.push_str("  return Box<T>(std::make_unique<T>(std::forward<ArgTypes>(Arguments)...));\n");
        output.push_str("}\n\n");

        output
    }

    /// Generates the kind-checked casts over polymorphic hierarchies.
    fn generate_casts(&self) -> String {
        let mut output = String::new();

        output.push_str("template <typename To, typename From> bool isa(const From *Object) {\n");
        output.push_str("  return Object != nullptr && To::classof(Object);\n");
        output.push_str("}\n\n");

        output.push_str("template <typename To, typename From> To *dyn_cast(From *Object) {\n");
        output.push_str("  return isa<To>(Object) ? static_cast<To *>(Object) : nullptr;\n");
        output.push_str("}\n\n");

        output.push_str(
            "template <typename To, typename From> const To *dyn_cast(const From *Object) {\n",
        );
        output.push_str("  return isa<To>(Object) ? static_cast<const To *>(Object) : nullptr;\n");
        output.push_str("}\n\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupletree_schema::{ScalarRegistry, SchemaIr, decode_document, parse_schema};

    fn create_test_ir(yaml: &str, root: &str) -> SchemaIr {
        let document = decode_document(yaml).expect("Failed to decode");
        let schema =
            parse_schema(&document, "model", root, ScalarRegistry::new()).expect("Failed to parse");
        SchemaIr::from_schema(&schema).expect("Failed to resolve")
    }

    #[test]
    fn test_generate_enum() {
        let ir = create_test_ir(
            r#"
- {name: Binary, type: struct, fields: [{name: color, type: Color}]}
- name: Color
  type: enum
  doc: Paint color.
  members:
    - {name: Red, doc: Warm.}
    - {name: Blue}
"#,
            "Binary",
        );
        let output = EarlyGenerator::new(&ir).generate();

        assert!(output.contains("/// Paint color.\nenum class Color : uint8_t {\n  Invalid,\n"));
        assert!(output.contains("  /// Warm.\n  Red,\n  Blue,\n};"));
        assert!(output.contains("inline const char *getName(Color Value)"));
        assert!(output.contains("case Color::Invalid:"));
        assert!(output.contains("template <> inline Color fromName<Color>(std::string_view Name)"));
        assert!(output.contains("  if (Name == \"Blue\")\n    return Color::Blue;\n"));
        assert!(output.contains("  return Color::Invalid;\n"));
    }

    #[test]
    fn test_discriminator_only_for_polymorphic_hierarchies() {
        let ir = create_test_ir(
            r#"
- {name: Binary, type: struct, fields: [{name: shape, type: Shape}]}
- {name: Shape, type: struct, abstract: true}
- {name: Circle, type: struct, inherits: Shape}
- {name: Square, type: struct, inherits: Shape}
"#,
            "Binary",
        );
        let output = EarlyGenerator::new(&ir).generate();

        assert!(output.contains("namespace ShapeKind {\nenum Values : uint8_t {\n  Circle,\n  Square,\n};"));
        assert!(output.contains("} // namespace ShapeKind"));
        assert!(!output.contains("BinaryKind"));
        assert!(output.contains("To::classof(Object)"));
    }

    #[test]
    fn test_no_casts_without_hierarchies() {
        let ir = create_test_ir("- {name: Binary, type: struct}", "Binary");
        let output = EarlyGenerator::new(&ir).generate();

        assert!(output.contains("template <typename T> class Box {"));
        assert!(!output.contains("dyn_cast"));
        assert!(!output.contains("fromName"));
    }

    #[test]
    fn test_box_converts_from_derived_box() {
        let ir = create_test_ir("- {name: Binary, type: struct}", "Binary");
        let output = EarlyGenerator::new(&ir).generate();

        assert!(output.contains(
            "  template <typename U>\n    requires std::is_convertible_v<U *, T *>\n  Box(Box<U> &&Other) : Pointer(Other.release()) {}\n"
        ));
        assert!(output.contains(
            "  Box(const Box<U> &Other)\n    : Pointer(Other ? T::cloneBoxed(*Other) : nullptr) {}\n"
        ));
        assert!(output.contains("  T *release() { return Pointer.release(); }\n"));
    }
}
