//! Schema derivation.
//!
//! Every collected section becomes one component: bound data fields first,
//! in encounter order, then one `bloks` field per child section.

use crate::collector::{SectionGraph, collect_sections};
use crate::error::{SchemaError, SchemaResult};
use crate::pluralize::pluralize;
use sectionforge_model::{DerivedComponent, DerivedField};
use sectionforge_types::Namespace;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Derives component schemas for one namespace.
#[derive(Debug, Clone)]
pub struct SchemaDeriver {
    namespace: Namespace,
}

impl SchemaDeriver {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    /// Derives one component per template section, in discovery order.
    pub fn derive(&self, template: &Value) -> SchemaResult<Vec<DerivedComponent>> {
        let graph = collect_sections(template, &self.namespace)?;
        self.derive_from_graph(&graph)
    }

    /// Derives components from an already collected graph.
    pub fn derive_from_graph(&self, graph: &SectionGraph) -> SchemaResult<Vec<DerivedComponent>> {
        let root_name = self.namespace.root_section().canonical();
        check_collisions(graph)?;
        let mut components = Vec::with_capacity(graph.len());

        for section in graph.iter() {
            let name = section.qualified.canonical();
            let mut component = DerivedComponent::new(&name, section.qualified.display_name());
            component.is_nestable = name == root_name;

            let mut pos = 0u32;
            for info in &section.fields {
                let mut field = DerivedField::new(&info.premade_field, info.spec.field_type, pos);
                if let Some(filetypes) = info.spec.filetypes {
                    field = field.with_filetypes(filetypes.iter().map(|s| s.to_string()).collect());
                }
                component.insert_field(field);
                pos += 1;
            }

            for child_name in &section.children {
                let Some(child) = graph.get(child_name) else {
                    continue;
                };
                let field_name = pluralize(child.qualified.local());
                if component.field(&field_name).is_some() {
                    return Err(SchemaError::FieldCollision {
                        component: name,
                        field: field_name,
                    });
                }
                component.insert_field(DerivedField::bloks(
                    field_name,
                    pos,
                    child.qualified.canonical(),
                ));
                pos += 1;
            }

            debug!("Derived component {} with {} fields", name, component.schema.len());
            components.push(component);
        }

        Ok(components)
    }
}

/// Fails if two raw section names resolve to one canonical name.
pub(crate) fn check_collisions(graph: &SectionGraph) -> SchemaResult<()> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    for section in graph.iter() {
        let name = section.qualified.canonical();
        if let Some(first) = claimed.insert(name.clone(), &section.name) {
            return Err(SchemaError::Collision {
                name,
                first: first.to_string(),
                second: section.name.clone(),
            });
        }
    }
    Ok(())
}

/// Derives the component schemas of a template.
pub fn derive_components(
    template: &Value,
    namespace: &Namespace,
) -> SchemaResult<Vec<DerivedComponent>> {
    SchemaDeriver::new(namespace.clone()).derive(template)
}
