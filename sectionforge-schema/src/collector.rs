//! Section/field collection.
//!
//! Walks a template keeping track of the section every node belongs to and
//! builds the [`SectionGraph`]: each section's bound data fields plus the
//! sections nested inside it.

use crate::error::{SchemaError, SchemaResult};
use crate::walker::walk;
use sectionforge_model::{FieldSpec, infer_field_type};
use sectionforge_types::node::{field_bindings, is_content_node, kind, section_marker};
use sectionforge_types::{Namespace, QualifiedName};
use std::collections::HashMap;
use tracing::debug;

/// A data field observed through a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub premade_field: String,
    pub spec: FieldSpec,
}

/// A named, repeatable region of a template.
#[derive(Debug, Clone)]
pub struct Section {
    /// Name as written in the template.
    pub name: String,
    pub qualified: QualifiedName,
    /// Bound fields in encounter order.
    pub fields: Vec<FieldInfo>,
    /// Raw names of nested sections, in encounter order.
    pub children: Vec<String>,
    pub parent: Option<String>,
    pub is_root: bool,
}

impl Section {
    fn new(name: &str, qualified: QualifiedName, is_root: bool) -> Self {
        Self {
            name: name.to_string(),
            qualified,
            fields: Vec::new(),
            children: Vec::new(),
            parent: None,
            is_root,
        }
    }

    /// Looks up a bound field by its data name.
    pub fn field(&self, premade_field: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.premade_field == premade_field)
    }
}

/// All sections of one template, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct SectionGraph {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl SectionGraph {
    /// Returns the root section.
    pub fn root(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.is_root)
    }

    /// Looks up a section by its raw name.
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&i| &self.sections[i])
    }

    /// Iterates sections in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn register(&mut self, name: &str, ns: &Namespace, is_root: bool) -> SchemaResult<usize> {
        if let Some(&i) = self.index.get(name) {
            return Ok(i);
        }
        let qualified = ns.qualify(name)?;
        debug!("Registered section {} as {}", name, qualified);
        self.sections.push(Section::new(name, qualified, is_root));
        let i = self.sections.len() - 1;
        self.index.insert(name.to_string(), i);
        Ok(i)
    }

    /// Links `child` under `parent` unless the child is already nested
    /// somewhere (first parent wins) or is the root.
    fn link(&mut self, parent: &str, child: &str) {
        let (Some(&p), Some(&c)) = (self.index.get(parent), self.index.get(child)) else {
            return;
        };
        if p == c || self.sections[c].is_root || self.sections[c].parent.is_some() {
            return;
        }
        self.sections[c].parent = Some(parent.to_string());
        self.sections[p].children.push(child.to_string());
    }

    /// Records a field on a section. The first binding for a name wins.
    fn record_field(&mut self, section: usize, premade_field: &str, spec: FieldSpec) {
        let section = &mut self.sections[section];
        if section.field(premade_field).is_some() {
            return;
        }
        section.fields.push(FieldInfo {
            premade_field: premade_field.to_string(),
            spec,
        });
    }
}

/// Returns the raw root section name of a template: its own marker, or the
/// synthesized `{namespace}_section`.
pub(crate) fn root_section_name(template: &serde_json::Value, ns: &Namespace) -> String {
    section_marker(template)
        .map(str::to_string)
        .unwrap_or_else(|| ns.root_section().canonical())
}

/// Collects the section graph of a template.
pub fn collect_sections(
    template: &serde_json::Value,
    ns: &Namespace,
) -> SchemaResult<SectionGraph> {
    if !is_content_node(template) {
        return Err(SchemaError::InvalidTemplate(
            "template root must be an object with a component tag".to_string(),
        ));
    }

    let mut graph = SectionGraph::default();
    let root = root_section_name(template, ns);
    graph.register(&root, ns, true)?;

    walk(template, &root, &mut |node, current: &String| -> SchemaResult<String> {
        let mut current = current.clone();

        if let Some(marker) = section_marker(node) {
            if marker != current {
                graph.register(marker, ns, false)?;
                graph.link(&current, marker);
            }
            current = marker.to_string();
        }

        let host = kind(node).unwrap_or_default();
        for binding in field_bindings(node) {
            let target = binding.target_section().unwrap_or(&current).to_string();
            let section = graph.register(&target, ns, false)?;
            let spec = infer_field_type(host, &binding.builder_field);
            graph.record_field(section, &binding.premade_field, spec);
        }

        Ok(current)
    })?;

    debug!("Collected {} sections", graph.len());
    Ok(graph)
}
