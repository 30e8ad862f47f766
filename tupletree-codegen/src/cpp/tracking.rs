//! Dirty-bit instrumentation of generated classes.
//!
//! Every generated class records which of its own fields were handed out
//! mutably or assigned. With diagnostics enabled it also records the call
//! site of the last modification and can print the dirty state.

use crate::options::GeneratorOptions;
use tupletree_schema::ir::ResolvedType;

const SITE_PARAMETER: &str = "std::source_location Site = std::source_location::current()";

/// Generator for the tracking fragments of a class.
#[derive(Debug, Clone, Copy)]
pub struct TrackingGenerator {
    debug: bool,
}

impl TrackingGenerator {
    /// Returns a tracking generator, or `None` if tracking is disabled.
    #[must_use]
    pub fn from_options(options: &GeneratorOptions) -> Option<Self> {
        options.tracking.then_some(Self {
            debug: options.tracking_debug,
        })
    }

    /// System headers the instrumentation needs.
    #[must_use]
    pub fn includes(&self) -> Vec<&'static str> {
        if self.debug {
            vec!["<array>", "<bitset>", "<ostream>", "<source_location>"]
        } else {
            vec!["<bitset>"]
        }
    }

    /// Private data members.
    #[must_use]
    pub fn members(&self, resolved: &ResolvedType) -> String {
        let count = resolved.fields.len();
        let mut output = format!("  std::bitset<{count}> Dirty;\n");
        if self.debug {
            output.push_str(&format!(
                "  std::array<std::source_location, {count}> DirtySites;\n"
            ));
        }
        output
    }

    /// Parameter list of a mutating accessor.
    #[must_use]
    pub fn accessor_parameters(&self) -> &'static str {
        if self.debug { SITE_PARAMETER } else { "" }
    }

    /// Trailing parameter of a setter.
    #[must_use]
    pub fn setter_parameter(&self) -> String {
        if self.debug {
            format!(", {SITE_PARAMETER}")
        } else {
            String::new()
        }
    }

    /// Statement marking a field dirty.
    #[must_use]
    pub fn mark(&self, field: &str) -> String {
        if self.debug {
            format!("    markDirty(Fields::{field}, Site);\n")
        } else {
            format!("    markDirty(Fields::{field});\n")
        }
    }

    /// Public tracking queries, chained to the base type.
    #[must_use]
    pub fn methods(&self, resolved: &ResolvedType) -> String {
        let mut output = String::new();
        let base = resolved.base.as_deref();

        if let Some(base) = base {
            output.push_str(&format!("  using {base}::isDirty;\n"));
        }
        output.push_str("  bool isDirty(Fields Field) const {\n");
        output.push_str("    return Dirty.test(static_cast<std::size_t>(Field));\n");
        output.push_str("  }\n");

        output.push_str("  bool hasDirtyFields() const {\n");
        match base {
            Some(base) => {
                output.push_str(&format!("    return {base}::hasDirtyFields() || Dirty.any();\n"))
            }
            None => output.push_str("    return Dirty.any();\n"),
        }
        output.push_str("  }\n");

        output.push_str("  void resetTracking() {\n");
        if let Some(base) = base {
            output.push_str(&format!("    {base}::resetTracking();\n"));
        }
        output.push_str("    Dirty.reset();\n");
        output.push_str("  }\n");

        if self.debug {
            output.push_str(&self.dump(resolved));
        }
        output
    }

    fn dump(&self, resolved: &ResolvedType) -> String {
        let mut output = String::new();

        output.push_str("  void dumpTracking(std::ostream &OS) const {\n");
        if let Some(base) = &resolved.base {
            output.push_str(&format!("    {base}::dumpTracking(OS);\n"));
        }
        for (index, field) in resolved.fields.iter().enumerate() {
            output.push_str(&format!("    if (Dirty.test({index}))\n"));
            output.push_str(&format!(
                "      OS << \"{}::{} dirty, last modified at \" << DirtySites[{index}].file_name()\n",
                resolved.name, field.name
            ));
            output.push_str(&format!(
                "         << \":\" << DirtySites[{index}].line() << \"\\n\";\n"
            ));
        }
        if resolved.fields.is_empty() && resolved.base.is_none() {
            output.push_str("    (void)OS;\n");
        }
        output.push_str("  }\n");
        output
    }

    /// Private helpers used by accessors and setters.
    #[must_use]
    pub fn helpers(&self) -> String {
        let mut output = String::new();
        if self.debug {
            output.push_str("  void markDirty(Fields Field, std::source_location Site) {\n");
            output.push_str("    Dirty.set(static_cast<std::size_t>(Field));\n");
            output.push_str("    DirtySites[static_cast<std::size_t>(Field)] = Site;\n");
        } else {
            output.push_str("  void markDirty(Fields Field) {\n");
            output.push_str("    Dirty.set(static_cast<std::size_t>(Field));\n");
        }
        output.push_str("  }\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupletree_schema::ir::{FieldKind, ResolvedField};

    fn options(tracking: bool, debug: bool) -> GeneratorOptions {
        GeneratorOptions::builder()
            .namespace("model")
            .root_type("Binary")
            .tracking(tracking)
            .tracking_debug(debug)
            .build()
            .expect("valid options")
    }

    fn resolved(base: Option<&str>) -> ResolvedType {
        ResolvedType {
            name: "Function".to_string(),
            doc: None,
            base: base.map(str::to_string),
            is_abstract: false,
            fields: vec![ResolvedField {
                name: "entry".to_string(),
                doc: None,
                type_name: "uint64_t".to_string(),
                kind: FieldKind::Scalar,
            }],
            hierarchy_root: base.unwrap_or("Function").to_string(),
            children: Vec::new(),
            concrete_descendants: vec!["Function".to_string()],
            value_dependencies: Vec::new(),
            reference_dependencies: Vec::new(),
            reachable_from_root: true,
            declaration_index: 0,
        }
    }

    #[test]
    fn test_disabled_tracking() {
        assert!(TrackingGenerator::from_options(&options(false, false)).is_none());
    }

    #[test]
    fn test_tracking_without_debug() {
        let tracking = TrackingGenerator::from_options(&options(true, false)).expect("enabled");
        let members = tracking.members(&resolved(None));
        assert_eq!(members, "  std::bitset<1> Dirty;\n");
        assert_eq!(tracking.accessor_parameters(), "");
        assert_eq!(tracking.mark("entry"), "    markDirty(Fields::entry);\n");

        let methods = tracking.methods(&resolved(None));
        assert!(methods.contains("return Dirty.any();"));
        assert!(!methods.contains("dumpTracking"));
        assert!(!methods.contains("source_location"));
        assert_eq!(tracking.includes(), vec!["<bitset>"]);
    }

    #[test]
    fn test_tracking_chains_to_base() {
        let tracking = TrackingGenerator::from_options(&options(true, false)).expect("enabled");
        let methods = tracking.methods(&resolved(Some("Symbol")));
        assert!(methods.contains("using Symbol::isDirty;"));
        assert!(methods.contains("return Symbol::hasDirtyFields() || Dirty.any();"));
        assert!(methods.contains("    Symbol::resetTracking();\n    Dirty.reset();\n"));
    }

    #[test]
    fn test_tracking_debug() {
        let tracking = TrackingGenerator::from_options(&options(true, true)).expect("enabled");
        let members = tracking.members(&resolved(None));
        assert!(members.contains("std::array<std::source_location, 1> DirtySites;"));
        assert!(tracking.setter_parameter().contains("std::source_location::current()"));

        let methods = tracking.methods(&resolved(Some("Symbol")));
        assert!(methods.contains("void dumpTracking(std::ostream &OS) const {"));
        assert!(methods.contains("Symbol::dumpTracking(OS);"));
        assert!(methods.contains("Function::entry dirty, last modified at"));
        assert!(tracking.helpers().contains("DirtySites[static_cast<std::size_t>(Field)] = Site;"));
    }
}
