//! Inheritance checks and emission ordering.
//!
//! Two graphs matter here. The inheritance graph (base edges) must be acyclic.
//! The emission graph adds value-embedding edges on top of it; the resolver
//! only adds those for fields it classified as values, so a cycle in it means
//! a cycle through inheritance.

use crate::error::SchemaError;
use crate::types::{CompositeDef, Schema};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Checks that no base chain revisits itself.
///
/// Base references must already be known to resolve to composites.
///
/// # Errors
/// Returns `SchemaError::CyclicInheritance` naming the first cycle found, in
/// declaration order.
pub fn check_inheritance(schema: &Schema) -> Result<(), SchemaError> {
    for composite in schema.composites() {
        let mut path: Vec<&str> = vec![&composite.name];
        let mut current = composite.base.as_deref();

        while let Some(base) = current {
            if let Some(start) = path.iter().position(|name| *name == base) {
                let mut cycle: Vec<&str> = path[start..].to_vec();
                cycle.push(base);
                return Err(SchemaError::CyclicInheritance {
                    cycle: cycle.join(" -> "),
                });
            }
            path.push(base);
            current = schema.get_composite(base).and_then(|c| c.base.as_deref());
        }
    }
    Ok(())
}

/// Returns the inheritance chain of `name`, topmost ancestor first and the
/// type itself last.
///
/// Must only be called once [`check_inheritance`] succeeded.
#[must_use]
pub fn inheritance_chain<'a>(schema: &'a Schema, name: &str) -> Vec<&'a CompositeDef> {
    let mut chain = Vec::new();
    let mut current = schema.get_composite(name);
    while let Some(composite) = current {
        chain.push(composite);
        current = composite
            .base
            .as_deref()
            .and_then(|base| schema.get_composite(base));
    }
    chain.reverse();
    chain
}

/// Orders nodes so every node comes after all of its dependencies.
///
/// The sort is a depth-first post-order over `nodes` in the given order,
/// visiting dependencies in their listed order, so ties are broken by
/// declaration order and the result is deterministic.
///
/// # Errors
/// Returns `SchemaError::CyclicInheritance` if the graph has a cycle.
pub fn topological_order(
    nodes: &[String],
    dependencies: &IndexMap<String, Vec<String>>,
) -> Result<Vec<String>, SchemaError> {
    let mut sorter = Sorter {
        dependencies,
        done: HashSet::new(),
        in_progress: Vec::new(),
        order: Vec::with_capacity(nodes.len()),
    };
    for node in nodes {
        sorter.visit(node)?;
    }
    Ok(sorter.order)
}

struct Sorter<'a> {
    dependencies: &'a IndexMap<String, Vec<String>>,
    done: HashSet<&'a str>,
    in_progress: Vec<&'a str>,
    order: Vec<String>,
}

impl<'a> Sorter<'a> {
    fn visit(&mut self, node: &'a str) -> Result<(), SchemaError> {
        if self.done.contains(node) {
            return Ok(());
        }
        if let Some(start) = self.in_progress.iter().position(|n| *n == node) {
            let mut cycle: Vec<&str> = self.in_progress[start..].to_vec();
            cycle.push(node);
            return Err(SchemaError::CyclicInheritance {
                cycle: cycle.join(" -> "),
            });
        }

        self.in_progress.push(node);
        let dependencies = self.dependencies;
        if let Some(deps) = dependencies.get(node) {
            for dep in deps {
                self.visit(dep)?;
            }
        }
        self.in_progress.pop();

        self.done.insert(node);
        self.order.push(node.to_string());
        Ok(())
    }
}
