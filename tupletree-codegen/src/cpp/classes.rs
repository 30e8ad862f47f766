//! Class generation for composite types.

use crate::cpp::names::{
    cpp_type, doc_comment, kind_type, kind_value, member_name, parameter_name, setter_name,
};
use crate::cpp::tracking::TrackingGenerator;
use crate::error::EmissionError;
use tupletree_schema::ir::{FieldKind, ResolvedField, ResolvedType, SchemaIr};

/// Generator for class definitions and their out-of-line members.
pub struct ClassGenerator<'a> {
    ir: &'a SchemaIr,
    tracking: Option<TrackingGenerator>,
}

/// Everything a class definition needs besides the type itself.
struct ClassShape<'a> {
    resolved: &'a ResolvedType,
    root: &'a ResolvedType,
    has_kind: bool,
    inherited: Vec<&'a ResolvedField>,
}

impl ClassShape<'_> {
    fn name(&self) -> &str {
        &self.resolved.name
    }

    fn is_kind_holder(&self) -> bool {
        self.has_kind && self.resolved.is_hierarchy_root()
    }

    fn all_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.inherited
            .iter()
            .copied()
            .chain(self.resolved.fields.iter())
    }

    fn field_count(&self) -> usize {
        self.inherited.len() + self.resolved.fields.len()
    }
}

impl<'a> ClassGenerator<'a> {
    /// Creates a new class generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, tracking: Option<TrackingGenerator>) -> Self {
        Self { ir, tracking }
    }

    /// Generates the class definitions, in emission order.
    ///
    /// # Errors
    /// Returns `EmissionError` if a type refers to something the resolver did
    /// not resolve.
    pub fn generate_classes(&self) -> Result<String, EmissionError> {
        let mut output = String::new();
        for resolved in self.ir.types() {
            output.push_str(&self.generate_class(resolved)?);
        }
        Ok(output)
    }

    /// Generates the out-of-line member definitions of every class.
    ///
    /// These follow all class definitions so that dispatch over a hierarchy
    /// sees every derived type complete.
    ///
    /// # Errors
    /// Returns `EmissionError` if a type refers to something the resolver did
    /// not resolve.
    pub fn generate_definitions(&self) -> Result<String, EmissionError> {
        let mut output = String::new();
        for resolved in self.ir.types() {
            output.push_str(&self.generate_definition(resolved)?);
        }
        Ok(output)
    }

    fn shape(&self, resolved: &'a ResolvedType) -> Result<ClassShape<'a>, EmissionError> {
        let root = self.ir.get_type(&resolved.hierarchy_root).ok_or_else(|| {
            EmissionError::unresolved(
                &resolved.hierarchy_root,
                format!("hierarchy of '{}'", resolved.name),
            )
        })?;
        if let Some(base) = &resolved.base
            && self.ir.get_type(base).is_none()
        {
            return Err(EmissionError::unresolved(
                base,
                format!("base of '{}'", resolved.name),
            ));
        }

        for field in &resolved.fields {
            let known = match field.kind.leaf() {
                FieldKind::Enum => self.ir.get_enum(&field.type_name).is_some(),
                FieldKind::CompositeValue | FieldKind::CompositeReference => {
                    self.ir.get_type(&field.type_name).is_some()
                }
                _ => true,
            };
            if !known {
                return Err(EmissionError::unresolved(
                    &field.type_name,
                    format!("field '{}.{}'", resolved.name, field.name),
                ));
            }
        }

        let inherited = self
            .ir
            .all_fields(&resolved.name)
            .into_iter()
            .filter(|(owner, _)| owner.name != resolved.name)
            .map(|(_, field)| field)
            .collect();

        Ok(ClassShape {
            resolved,
            root,
            has_kind: root.is_polymorphic(),
            inherited,
        })
    }

    /// Generates one class definition.
    fn generate_class(&self, resolved: &'a ResolvedType) -> Result<String, EmissionError> {
        let shape = self.shape(resolved)?;
        let name = shape.name();
        let mut output = String::new();
        tracing::trace!(name, has_kind = shape.has_kind, "emitting class");

        output.push_str(&doc_comment(resolved.doc.as_deref(), ""));
        match &resolved.base {
            Some(base) => output.push_str(&format!("class {name} : public {base} {{\n")),
            None => output.push_str(&format!("class {name} {{\n")),
        }
        output.push_str("public:\n");
        output.push_str(&self.generate_metadata(&shape));
        output.push_str(&self.generate_data(&shape));
        output.push_str(&self.generate_constructors(&shape));
        output.push_str(&self.generate_accessors(&shape));
        output.push_str(&self.generate_declarations(&shape));
        output.push_str(&self.generate_hooks(&shape));

        if let Some(tracking) = &self.tracking {
            output.push('\n');
            output.push_str(&tracking.methods(resolved));
            output.push_str("\nprivate:\n");
            output.push_str(&tracking.helpers());
        }

        output.push_str("};\n\n");
        Ok(output)
    }

    fn generate_metadata(&self, shape: &ClassShape<'_>) -> String {
        let mut output = String::new();
        let name = shape.name();

        output.push_str(&format!("  static constexpr const char *Name = \"{name}\";\n"));
        if shape.has_kind && !shape.resolved.is_abstract {
            output.push_str(&format!(
                "  static constexpr {} AssociatedKind = {};\n",
                kind_type(&shape.root.name),
                kind_value(&shape.root.name, name)
            ));
        }

        if shape.resolved.fields.is_empty() {
            output.push_str("  enum class Fields : uint8_t {};\n");
        } else {
            output.push_str("  enum class Fields : uint8_t {\n");
            for field in &shape.resolved.fields {
                output.push_str(&format!("    {},\n", field.name));
            }
            output.push_str("  };\n");
        }
        output.push_str(&format!(
            "  static constexpr std::size_t FieldCount = {};\n",
            shape.resolved.fields.len()
        ));
        output
    }

    fn generate_data(&self, shape: &ClassShape<'_>) -> String {
        let mut output = String::new();

        if shape.is_kind_holder() {
            output.push_str(&format!("  {} TheKind;\n", kind_type(&shape.root.name)));
        }
        for field in &shape.resolved.fields {
            output.push_str(&doc_comment(field.doc.as_deref(), "  "));
            output.push_str(&format!(
                "  {} {}{{}};\n",
                cpp_type(field, &self.ir.namespace),
                member_name(&field.name)
            ));
        }
        if let Some(tracking) = &self.tracking {
            output.push_str(&tracking.members(shape.resolved));
        }

        if output.is_empty() {
            output
        } else {
            format!("\nprivate:\n{output}")
        }
    }

    fn generate_constructors(&self, shape: &ClassShape<'_>) -> String {
        let mut output = String::from("\npublic:\n");
        let name = shape.name();

        let parameters: Vec<String> = shape
            .all_fields()
            .map(|f| {
                format!(
                    "{} {}",
                    cpp_type(f, &self.ir.namespace),
                    parameter_name(&f.name)
                )
            })
            .collect();
        let arguments: Vec<String> = shape
            .all_fields()
            .map(|f| format!("std::move({})", parameter_name(&f.name)))
            .collect();
        let own_initializers: Vec<String> = shape
            .resolved
            .fields
            .iter()
            .map(|f| {
                format!(
                    "{}(std::move({}))",
                    member_name(&f.name),
                    parameter_name(&f.name)
                )
            })
            .collect();
        let explicit = if shape.field_count() == 1 { "explicit " } else { "" };

        if !shape.has_kind {
            output.push_str(&format!("  {name}() = default;\n"));
            if !parameters.is_empty() {
                output.push_str(&format!(
                    "  {explicit}{name}({})\n    : {} {{}}\n",
                    parameters.join(", "),
                    own_initializers.join(", ")
                ));
            }
            return output;
        }

        let root = &shape.root.name;
        let kind = kind_value(root, name);
        if !shape.resolved.is_abstract {
            output.push_str(&format!("  {name}() : {name}({kind}) {{}}\n"));
            if !parameters.is_empty() {
                output.push_str(&format!(
                    "  {explicit}{name}({})\n    : {name}({kind}, {}) {{}}\n",
                    parameters.join(", "),
                    arguments.join(", ")
                ));
            }
            output.push('\n');
        }

        let (kind_initializer, full_initializer) = match &shape.resolved.base {
            Some(base) => {
                let inherited = &arguments[..shape.inherited.len()];
                let full = if inherited.is_empty() {
                    format!("{base}(Kind)")
                } else {
                    format!("{base}(Kind, {})", inherited.join(", "))
                };
                (format!("{base}(Kind)"), full)
            }
            None => ("TheKind(Kind)".to_string(), "TheKind(Kind)".to_string()),
        };
        let full_initializers: Vec<String> = std::iter::once(full_initializer)
            .chain(own_initializers)
            .collect();

        output.push_str("protected:\n");
        output.push_str(&format!(
            "  explicit {name}({} Kind) : {kind_initializer} {{}}\n",
            kind_type(root)
        ));
        if !parameters.is_empty() {
            output.push_str(&format!(
                "  {name}({} Kind, {})\n    : {} {{}}\n",
                kind_type(root),
                parameters.join(", "),
                full_initializers.join(", ")
            ));
        }
        output.push_str("\npublic:\n");
        output
    }

    fn generate_accessors(&self, shape: &ClassShape<'_>) -> String {
        let mut output = String::new();

        for field in &shape.resolved.fields {
            let field_type = cpp_type(field, &self.ir.namespace);
            let member = member_name(&field.name);
            let getter = &field.name;
            let setter = setter_name(&field.name);

            output.push_str(&doc_comment(field.doc.as_deref(), "  "));
            output.push_str(&format!(
                "  const {field_type} &{getter}() const {{ return {member}; }}\n"
            ));
            match &self.tracking {
                None => {
                    output.push_str(&format!("  {field_type} &{getter}() {{ return {member}; }}\n"));
                    output.push_str(&format!(
                        "  void {setter}({field_type} Value) {{ {member} = std::move(Value); }}\n"
                    ));
                }
                Some(tracking) => {
                    output.push_str(&format!(
                        "  {field_type} &{getter}({}) {{\n",
                        tracking.accessor_parameters()
                    ));
                    output.push_str(&tracking.mark(&field.name));
                    output.push_str(&format!("    return {member};\n"));
                    output.push_str("  }\n");
                    output.push_str(&format!(
                        "  void {setter}({field_type} Value{}) {{\n",
                        tracking.setter_parameter()
                    ));
                    output.push_str(&format!("    {member} = std::move(Value);\n"));
                    output.push_str(&tracking.mark(&field.name));
                    output.push_str("  }\n");
                }
            }
            output.push('\n');
        }

        if shape.is_kind_holder() {
            output.push_str(&format!(
                "  {} kind() const {{ return TheKind; }}\n\n",
                kind_type(&shape.root.name)
            ));
        }
        output
    }

    fn generate_declarations(&self, shape: &ClassShape<'_>) -> String {
        let mut output = String::new();
        let name = shape.name();

        if shape.has_kind {
            output.push_str(&format!(
                "  static bool classof(const {} *Object);\n\n",
                shape.root.name
            ));
        }

        output.push_str(&format!("  bool operator==(const {name} &Other) const;\n"));
        output.push_str(&format!(
            "  bool operator!=(const {name} &Other) const {{ return !(*this == Other); }}\n"
        ));
        output.push_str(&format!("  bool operator<(const {name} &Other) const;\n\n"));

        output.push_str(&format!("  static {name} *cloneBoxed(const {name} &Object);\n"));
        output.push_str(&format!("  static void destroyBoxed({name} *Object);\n"));
        output.push_str(&format!(
            "  static bool equalBoxed(const {name} &Left, const {name} &Right);\n"
        ));
        output.push_str(&format!(
            "  static bool lessBoxed(const {name} &Left, const {name} &Right);\n\n"
        ));
        output
    }

    /// Generates field visitation and the serialization hooks, base first.
    fn generate_hooks(&self, shape: &ClassShape<'_>) -> String {
        let mut output = String::new();
        let base = shape.resolved.base.as_deref();
        let fields = &shape.resolved.fields;
        let empty = base.is_none() && fields.is_empty();

        for qualifier in ["", " const"] {
            if empty {
                output.push_str(&format!(
                    "  template <typename Visitor> void visitFields(Visitor &&){qualifier} {{}}\n"
                ));
                continue;
            }
            output.push_str(&format!(
                "  template <typename Visitor> void visitFields(Visitor &&V){qualifier} {{\n"
            ));
            if let Some(base) = base {
                output.push_str(&format!("    {base}::visitFields(V);\n"));
            }
            for field in fields {
                output.push_str(&format!(
                    "    V(\"{}\", {});\n",
                    field.name,
                    member_name(&field.name)
                ));
            }
            output.push_str("  }\n");
        }

        for (method, qualifier, call) in [
            ("serialize", " const", "write"),
            ("deserialize", "", "read"),
        ] {
            if empty {
                output.push_str(&format!(
                    "  template <typename Archive> void {method}(Archive &){qualifier} {{}}\n"
                ));
                continue;
            }
            output.push_str(&format!(
                "  template <typename Archive> void {method}(Archive &A){qualifier} {{\n"
            ));
            if let Some(base) = base {
                output.push_str(&format!("    {base}::{method}(A);\n"));
            }
            for field in fields {
                output.push_str(&format!(
                    "    A.{call}(\"{}\", {});\n",
                    field.name,
                    member_name(&field.name)
                ));
            }
            output.push_str("  }\n");
        }
        output
    }

    /// Generates the out-of-line members of one class.
    fn generate_definition(&self, resolved: &'a ResolvedType) -> Result<String, EmissionError> {
        let shape = self.shape(resolved)?;
        let mut output = String::new();

        output.push_str(&self.generate_equality(&shape));
        output.push_str(&self.generate_ordering(&shape));
        if resolved.is_polymorphic() {
            output.push_str(&self.generate_dispatch(&shape));
        } else {
            output.push_str(&self.generate_direct_boxing(&shape));
        }
        if shape.has_kind {
            output.push_str(&self.generate_classof(&shape));
        }
        Ok(output)
    }

    fn generate_equality(&self, shape: &ClassShape<'_>) -> String {
        let name = shape.name();
        let base = shape.resolved.base.as_deref();
        let fields = &shape.resolved.fields;

        if base.is_none() && !shape.is_kind_holder() && fields.is_empty() {
            return format!(
                "inline bool {name}::operator==(const {name} &) const {{ return true; }}\n\n"
            );
        }

        let mut output = format!("inline bool {name}::operator==(const {name} &Other) const {{\n");
        if let Some(base) = base {
            output.push_str(&format!("  if (!{base}::operator==(Other))\n"));
            output.push_str("    return false;\n");
        }
        if shape.is_kind_holder() {
            output.push_str("  if (TheKind != Other.TheKind)\n");
            output.push_str("    return false;\n");
        }
        for field in fields {
            let member = member_name(&field.name);
            output.push_str(&format!("  if (!({member} == Other.{member}))\n"));
            output.push_str("    return false;\n");
        }
        output.push_str("  return true;\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_ordering(&self, shape: &ClassShape<'_>) -> String {
        let name = shape.name();
        let base = shape.resolved.base.as_deref();
        let fields = &shape.resolved.fields;

        if base.is_none() && !shape.is_kind_holder() && fields.is_empty() {
            return format!(
                "inline bool {name}::operator<(const {name} &) const {{ return false; }}\n\n"
            );
        }

        let mut output = format!("inline bool {name}::operator<(const {name} &Other) const {{\n");
        if let Some(base) = base {
            output.push_str(&format!("  if ({base}::operator<(Other))\n"));
            output.push_str("    return true;\n");
            output.push_str(&format!("  if (Other.{base}::operator<(*this))\n"));
            output.push_str("    return false;\n");
        }
        if shape.is_kind_holder() {
            output.push_str("  if (TheKind != Other.TheKind)\n");
            output.push_str("    return TheKind < Other.TheKind;\n");
        }
        for field in fields {
            let member = member_name(&field.name);
            output.push_str(&format!("  if ({member} < Other.{member})\n"));
            output.push_str("    return true;\n");
            output.push_str(&format!("  if (Other.{member} < {member})\n"));
            output.push_str("    return false;\n");
        }
        output.push_str("  return false;\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_direct_boxing(&self, shape: &ClassShape<'_>) -> String {
        let name = shape.name();
        let mut output = String::new();

        output.push_str(&format!(
            "inline {name} *{name}::cloneBoxed(const {name} &Object) {{ return new {name}(Object); }}\n"
        ));
        output.push_str(&format!(
            "inline void {name}::destroyBoxed({name} *Object) {{ delete Object; }}\n"
        ));
        output.push_str(&format!(
            "inline bool {name}::equalBoxed(const {name} &Left, const {name} &Right) {{\n"
        ));
        output.push_str("  return Left == Right;\n");
        output.push_str("}\n");
        output.push_str(&format!(
            "inline bool {name}::lessBoxed(const {name} &Left, const {name} &Right) {{\n"
        ));
        output.push_str("  return Left < Right;\n");
        output.push_str("}\n\n");
        output
    }

    /// Generates boxing members that switch over the discriminator so a
    /// pointer to a base type handles every concrete descendant.
    fn generate_dispatch(&self, shape: &ClassShape<'_>) -> String {
        let name = shape.name();
        let root = &shape.root.name;
        let descendants = &shape.resolved.concrete_descendants;
        let mut output = String::new();

        output.push_str(&format!(
            "inline {name} *{name}::cloneBoxed(const {name} &Object) {{\n"
        ));
        output.push_str("  switch (Object.kind()) {\n");
        for concrete in descendants {
            output.push_str(&format!("  case {}:\n", kind_value(root, concrete)));
            output.push_str(&format!(
                "    return new {concrete}(static_cast<const {concrete} &>(Object));\n"
            ));
        }
        output.push_str("  default:\n    break;\n  }\n");
        output.push_str("  return nullptr;\n");
        output.push_str("}\n\n");

        output.push_str(&format!("inline void {name}::destroyBoxed({name} *Object) {{\n"));
        output.push_str("  if (Object == nullptr)\n    return;\n");
        output.push_str("  switch (Object->kind()) {\n");
        for concrete in descendants {
            output.push_str(&format!("  case {}:\n", kind_value(root, concrete)));
            output.push_str(&format!("    delete static_cast<{concrete} *>(Object);\n"));
            output.push_str("    return;\n");
        }
        output.push_str("  default:\n    break;\n  }\n");
        output.push_str("}\n\n");

        for (method, operator, mismatch) in [
            ("equalBoxed", "==", "false"),
            ("lessBoxed", "<", "Left.kind() < Right.kind()"),
        ] {
            output.push_str(&format!(
                "inline bool {name}::{method}(const {name} &Left, const {name} &Right) {{\n"
            ));
            output.push_str("  if (Left.kind() != Right.kind())\n");
            output.push_str(&format!("    return {mismatch};\n"));
            output.push_str("  switch (Left.kind()) {\n");
            for concrete in descendants {
                output.push_str(&format!("  case {}:\n", kind_value(root, concrete)));
                output.push_str(&format!(
                    "    return static_cast<const {concrete} &>(Left) {operator}\n           static_cast<const {concrete} &>(Right);\n"
                ));
            }
            output.push_str("  default:\n    break;\n  }\n");
            output.push_str("  return false;\n");
            output.push_str("}\n\n");
        }
        output
    }

    fn generate_classof(&self, shape: &ClassShape<'_>) -> String {
        let name = shape.name();
        let root = &shape.root.name;
        let mut output = String::new();

        output.push_str(&format!(
            "inline bool {name}::classof(const {root} *Object) {{\n"
        ));
        output.push_str("  switch (Object->kind()) {\n");
        for concrete in &shape.resolved.concrete_descendants {
            output.push_str(&format!("  case {}:\n", kind_value(root, concrete)));
        }
        if !shape.resolved.concrete_descendants.is_empty() {
            output.push_str("    return true;\n");
        }
        output.push_str("  default:\n    return false;\n  }\n");
        output.push_str("}\n\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GeneratorOptions;
    use tupletree_schema::{ScalarRegistry, SchemaIr, decode_document, parse_schema};

    const HIERARCHY: &str = r#"
- name: Base
  type: struct
  doc: Common part.
  fields: [{name: id, type: int}]
- name: Derived
  type: struct
  inherits: Base
  fields:
    - name: name
      type: std::string
      doc: Display name.
"#;

    fn create_test_ir(yaml: &str, root: &str) -> SchemaIr {
        let document = decode_document(yaml).expect("Failed to decode");
        let schema =
            parse_schema(&document, "model", root, ScalarRegistry::new()).expect("Failed to parse");
        SchemaIr::from_schema(&schema).expect("Failed to resolve")
    }

    fn tracking(tracking: bool, debug: bool) -> Option<TrackingGenerator> {
        let options = GeneratorOptions::builder()
            .namespace("model")
            .root_type("Base")
            .tracking(tracking)
            .tracking_debug(debug)
            .build()
            .expect("valid options");
        TrackingGenerator::from_options(&options)
    }

    #[test]
    fn test_generate_hierarchy_classes() {
        let ir = create_test_ir(HIERARCHY, "Base");
        let output = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");

        assert!(output.contains("/// Common part.\nclass Base {\n"));
        assert!(output.contains("class Derived : public Base {\n"));
        assert!(output.contains("static constexpr const char *Name = \"Derived\";"));
        assert!(output.contains(
            "static constexpr BaseKind::Values AssociatedKind = BaseKind::Derived;"
        ));
        assert!(output.contains("  BaseKind::Values TheKind;\n"));
        assert!(output.contains("  int TheId{};\n"));
        assert!(output.contains("  /// Display name.\n  std::string TheName{};\n"));
        assert!(output.contains("  BaseKind::Values kind() const { return TheKind; }"));
        assert!(output.contains("static bool classof(const Base *Object);"));

        let base = output.find("class Base {").expect("Base emitted");
        let derived = output.find("class Derived").expect("Derived emitted");
        assert!(base < derived);
    }

    #[test]
    fn test_constructors_take_base_fields_first() {
        let ir = create_test_ir(HIERARCHY, "Base");
        let output = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");

        assert!(output.contains("  Derived() : Derived(BaseKind::Derived) {}\n"));
        assert!(output.contains(
            "  Derived(int NewId, std::string NewName)\n    : Derived(BaseKind::Derived, std::move(NewId), std::move(NewName)) {}\n"
        ));
        assert!(output.contains(
            "  Derived(BaseKind::Values Kind, int NewId, std::string NewName)\n    : Base(Kind, std::move(NewId)), TheName(std::move(NewName)) {}\n"
        ));
        assert!(output.contains("  explicit Base(int NewId)\n    : Base(BaseKind::Base, std::move(NewId)) {}\n"));
        assert!(output.contains("  explicit Base(BaseKind::Values Kind) : TheKind(Kind) {}\n"));
    }

    #[test]
    fn test_accessors_without_tracking() {
        let ir = create_test_ir(HIERARCHY, "Base");
        let output = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");

        assert!(output.contains("  const std::string &name() const { return TheName; }\n"));
        assert!(output.contains("  std::string &name() { return TheName; }\n"));
        assert!(output.contains("  void setName(std::string Value) { TheName = std::move(Value); }\n"));
        assert!(!output.contains("Dirty"));
        assert!(!output.contains("resetTracking"));
    }

    #[test]
    fn test_accessors_with_tracking() {
        let ir = create_test_ir(HIERARCHY, "Base");
        let output = ClassGenerator::new(&ir, tracking(true, false))
            .generate_classes()
            .expect("Failed to generate");

        assert!(output.contains("  std::string &name() {\n    markDirty(Fields::name);\n    return TheName;\n  }\n"));
        assert!(output.contains(
            "  void setName(std::string Value) {\n    TheName = std::move(Value);\n    markDirty(Fields::name);\n  }\n"
        ));
        assert!(output.contains("  std::bitset<1> Dirty;\n"));
        assert!(output.contains("using Base::isDirty;"));
        assert!(!output.contains("source_location"));
    }

    #[test]
    fn test_accessors_with_tracking_debug() {
        let ir = create_test_ir(HIERARCHY, "Base");
        let output = ClassGenerator::new(&ir, tracking(true, true))
            .generate_classes()
            .expect("Failed to generate");

        assert!(output.contains(
            "  std::string &name(std::source_location Site = std::source_location::current()) {\n    markDirty(Fields::name, Site);\n"
        ));
        assert!(output.contains("void dumpTracking(std::ostream &OS) const"));
    }

    #[test]
    fn test_hooks_visit_base_first() {
        let ir = create_test_ir(HIERARCHY, "Base");
        let output = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");

        assert!(output.contains(
            "  template <typename Visitor> void visitFields(Visitor &&V) {\n    Base::visitFields(V);\n    V(\"name\", TheName);\n  }\n"
        ));
        assert!(output.contains(
            "  template <typename Archive> void serialize(Archive &A) const {\n    Base::serialize(A);\n    A.write(\"name\", TheName);\n  }\n"
        ));
        assert!(output.contains("    A.read(\"id\", TheId);\n"));
    }

    #[test]
    fn test_definitions_compare_base_first() {
        let ir = create_test_ir(HIERARCHY, "Base");
        let output = ClassGenerator::new(&ir, None)
            .generate_definitions()
            .expect("Failed to generate");

        assert!(output.contains(
            "inline bool Derived::operator==(const Derived &Other) const {\n  if (!Base::operator==(Other))\n    return false;\n  if (!(TheName == Other.TheName))\n    return false;\n  return true;\n}\n"
        ));
        assert!(output.contains("  if (TheKind != Other.TheKind)\n    return TheKind < Other.TheKind;\n"));
        assert!(output.contains("  case BaseKind::Derived:\n    return new Derived(static_cast<const Derived &>(Object));\n"));
        assert!(output.contains("inline Derived *Derived::cloneBoxed(const Derived &Object) { return new Derived(Object); }"));
        assert!(output.contains(
            "inline bool Derived::classof(const Base *Object) {\n  switch (Object->kind()) {\n  case BaseKind::Derived:\n    return true;\n"
        ));
    }

    #[test]
    fn test_abstract_type_has_protected_constructors_only() {
        let ir = create_test_ir(
            r#"
- {name: Binary, type: struct, fields: [{name: shape, type: Shape}]}
- {name: Shape, type: struct, abstract: true, fields: [{name: sides, type: int}]}
- {name: Circle, type: struct, inherits: Shape}
"#,
            "Binary",
        );
        let output = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");

        let shape_start = output.find("class Shape {").expect("Shape emitted");
        let shape_end = shape_start + output[shape_start..].find("};\n").expect("class end");
        let shape = &output[shape_start..shape_end];
        assert!(!shape.contains("Shape() :"));
        assert!(!shape.contains("AssociatedKind"));
        assert!(shape.contains("protected:\n  explicit Shape(ShapeKind::Values Kind) : TheKind(Kind) {}\n"));

        assert!(output.contains("  Box<::model::Shape> TheShape{};\n"));
        assert!(output.contains("  Circle() : Circle(ShapeKind::Circle) {}\n"));
    }

    #[test]
    fn test_plain_type_has_no_discriminator() {
        let ir = create_test_ir(
            "- {name: Binary, type: struct, fields: [{name: entry, type: uint64_t}]}",
            "Binary",
        );
        let classes = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");
        let definitions = ClassGenerator::new(&ir, None)
            .generate_definitions()
            .expect("Failed to generate");

        assert!(classes.contains("  Binary() = default;\n"));
        assert!(classes.contains("  explicit Binary(uint64_t NewEntry)\n    : TheEntry(std::move(NewEntry)) {}\n"));
        assert!(!classes.contains("Kind"));
        assert!(!classes.contains("classof"));
        assert!(definitions.contains("inline void Binary::destroyBoxed(Binary *Object) { delete Object; }"));
    }

    #[test]
    fn test_empty_type() {
        let ir = create_test_ir("- {name: Binary, type: struct}", "Binary");
        let classes = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");
        let definitions = ClassGenerator::new(&ir, None)
            .generate_definitions()
            .expect("Failed to generate");

        assert!(classes.contains("  enum class Fields : uint8_t {};\n"));
        assert!(classes.contains("template <typename Visitor> void visitFields(Visitor &&) {}"));
        assert!(!classes.contains("private:"));
        assert!(definitions.contains("inline bool Binary::operator==(const Binary &) const { return true; }"));
    }

    #[test]
    fn test_field_named_after_its_type() {
        let ir = create_test_ir(
            r#"
- name: Binary
  type: struct
  fields:
    - {name: color, type: Color}
    - {name: other, type: Color}
    - {name: maybe_color, type: Color, optional: true}
    - {name: point, type: Point}
- {name: Point, type: struct, fields: [{name: x, type: int}]}
- {name: Color, type: enum, members: [{name: Red}]}
"#,
            "Binary",
        );
        let output = ClassGenerator::new(&ir, None)
            .generate_classes()
            .expect("Failed to generate");

        assert!(output.contains(
            "  Binary(::model::Color NewColor, ::model::Color NewOther, std::optional<::model::Color> NewMaybeColor, ::model::Point NewPoint)\n"
        ));
        assert!(output.contains("    : TheColor(std::move(NewColor)), TheOther(std::move(NewOther)),"));
        assert!(output.contains("  ::model::Color TheColor{};\n"));
        assert!(output.contains("  const ::model::Point &point() const { return ThePoint; }\n"));
        assert!(output.contains("  void setColor(::model::Color Value) { TheColor = std::move(Value); }\n"));
        assert!(!output.contains(" Color Color"));
    }
}
