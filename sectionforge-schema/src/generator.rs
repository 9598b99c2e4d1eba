//! Structure generation, the inverse of derivation.
//!
//! Given a template and the data record instantiating its root section,
//! produces a concrete content tree: repeatable sections are cloned once per
//! data entry, bound fields are stamped in, structural markers are stripped
//! and every node gets a fresh identity.
//!
//! The "which entry are we on" state is an explicit [`SectionContext`]
//! threaded through the recursion; each child call gets its own extended
//! copy, so nothing is shared or mutated across siblings.

use crate::collector::{collect_sections, root_section_name};
use crate::deriver::check_collisions;
use crate::error::{SchemaError, SchemaResult};
use crate::pluralize::pluralize;
use sectionforge_types::node::{
    MAPPING_KEY, SECTION_KEY, UID_KEY, child_nodes, fresh_uid, is_content_node, is_non_structural,
    kind, parse_bindings, section_marker, uid,
};
use sectionforge_types::{Namespace, QualifiedName};
use serde_json::{Map, Value};
use tracing::debug;

/// The data entries bound to the sections enclosing a node.
#[derive(Debug, Clone, Default)]
pub struct SectionContext {
    /// Outermost first.
    bound: Vec<(QualifiedName, Value)>,
    current: Option<QualifiedName>,
}

impl SectionContext {
    /// A context with the root section bound to the data record.
    pub fn root(section: QualifiedName, record: Value) -> Self {
        Self {
            bound: vec![(section.clone(), record)],
            current: Some(section),
        }
    }

    /// Returns a copy with `section` bound to `entry` and made current.
    #[must_use]
    pub fn bind(&self, section: &QualifiedName, entry: &Value) -> Self {
        let mut next = self.clone();
        next.bound.push((section.clone(), entry.clone()));
        next.current = Some(section.clone());
        next
    }

    /// Returns a copy with `section` current but no new entry bound.
    #[must_use]
    pub fn enter(&self, section: &QualifiedName) -> Self {
        let mut next = self.clone();
        next.current = Some(section.clone());
        next
    }

    /// The section bindings resolve against by default.
    pub fn current(&self) -> Option<&QualifiedName> {
        self.current.as_ref()
    }

    /// The innermost entry bound to a matching section.
    pub fn entry(&self, section: &QualifiedName) -> Option<&Value> {
        self.bound
            .iter()
            .rev()
            .find(|(name, _)| name.matches(section))
            .map(|(_, entry)| entry)
    }

    /// Finds the data array for a section.
    ///
    /// Scans bound entries innermost first for an array whose first element's
    /// kind matches the section. Falls back to the array stored under the
    /// section's derived field name (`post` -> `posts`), which also covers
    /// empty arrays and entries without kind tags.
    pub fn data_for(&self, section: &QualifiedName, ns: &Namespace) -> Option<&[Value]> {
        let by_kind = self.bound.iter().rev().find_map(|(_, entry)| {
            entry.as_object()?.values().find_map(|value| {
                let items = value.as_array()?;
                let first_kind = items.first().and_then(kind)?;
                let matches = ns
                    .qualify(first_kind)
                    .is_ok_and(|name| name.matches(section));
                matches.then_some(items.as_slice())
            })
        });
        if by_kind.is_some() {
            return by_kind;
        }

        let field = pluralize(section.local());
        self.bound.iter().rev().find_map(|(_, entry)| {
            entry
                .get(&field)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
        })
    }
}

/// How a node's content-node children are emitted.
enum Children<'a> {
    /// Each child once, expanding nested sections.
    Expand,
    /// Each child once per entry, bound to `section`.
    Repeat {
        section: &'a QualifiedName,
        entries: &'a [Value],
    },
}

/// Generates content trees from templates for one namespace.
#[derive(Debug, Clone)]
pub struct StructureGenerator {
    namespace: Namespace,
}

impl StructureGenerator {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    /// Instantiates `template` against the root-section data `record`.
    ///
    /// Templates whose section names collide are rejected with the same
    /// error derivation reports.
    pub fn generate(&self, template: &Value, record: &Value) -> SchemaResult<Value> {
        let Some(root) = template.as_object().filter(|_| is_content_node(template)) else {
            return Err(SchemaError::InvalidTemplate(
                "template root must be an object with a component tag".to_string(),
            ));
        };
        check_collisions(&collect_sections(template, &self.namespace)?)?;

        let section = self.namespace.qualify(&root_section_name(template, &self.namespace))?;
        let ctx = SectionContext::root(section, record.clone());
        let out = self.process_node(root, &ctx, uid(record), Children::Expand)?;
        Ok(Value::Object(out))
    }

    fn process_node(
        &self,
        node: &Map<String, Value>,
        ctx: &SectionContext,
        identity: Option<&str>,
        children: Children<'_>,
    ) -> SchemaResult<Map<String, Value>> {
        let mut out = Map::new();

        for (key, value) in node {
            match key.as_str() {
                SECTION_KEY | MAPPING_KEY | UID_KEY => {}
                _ => {
                    let value = match value {
                        Value::Array(items)
                            if !is_non_structural(key) && items.iter().any(is_content_node) =>
                        {
                            Value::Array(self.process_children(items, ctx, &children)?)
                        }
                        other => other.clone(),
                    };
                    out.insert(key.clone(), value);
                }
            }
        }

        out.insert(
            UID_KEY.to_string(),
            Value::String(identity.map_or_else(fresh_uid, str::to_string)),
        );

        let bindings = node.get(MAPPING_KEY).map(parse_bindings).unwrap_or_default();
        for binding in bindings {
            let target = match binding.target_section() {
                Some(raw) => Some(self.namespace.qualify(raw)?),
                None => ctx.current().cloned(),
            };
            let bound = target
                .as_ref()
                .and_then(|section| ctx.entry(section))
                .and_then(|entry| entry.get(&binding.premade_field));
            if let Some(value) = bound {
                out.insert(binding.builder_field.clone(), value.clone());
            }
        }

        Ok(out)
    }

    fn expand(
        &self,
        node: &Map<String, Value>,
        ctx: &SectionContext,
        identity: Option<&str>,
    ) -> SchemaResult<Value> {
        Ok(Value::Object(self.process_node(node, ctx, identity, Children::Expand)?))
    }

    fn process_children(
        &self,
        items: &[Value],
        ctx: &SectionContext,
        mode: &Children<'_>,
    ) -> SchemaResult<Vec<Value>> {
        let mut out = Vec::with_capacity(items.len());

        for item in items {
            let Some(obj) = item.as_object().filter(|_| is_content_node(item)) else {
                out.push(item.clone());
                continue;
            };

            if let Children::Repeat { section, entries } = mode {
                for entry in *entries {
                    let bound = ctx.bind(section, entry);
                    out.push(self.expand(obj, &bound, uid(entry))?);
                }
                continue;
            }

            let Some(marker) = section_marker(item) else {
                out.push(self.expand(obj, ctx, None)?);
                continue;
            };

            let section = self.namespace.qualify(marker)?;
            if ctx.entry(&section).is_some() {
                out.push(self.expand(obj, &ctx.enter(&section), None)?);
                continue;
            }

            match ctx.data_for(&section, &self.namespace) {
                Some(entries) if is_wrapper(obj) => {
                    debug!("Repeating {} entries of {} inside wrapper", entries.len(), section);
                    let repeat = Children::Repeat {
                        section: &section,
                        entries,
                    };
                    out.push(Value::Object(self.process_node(obj, ctx, None, repeat)?));
                }
                Some(entries) => {
                    debug!("Cloning {} for {} entries", section, entries.len());
                    for entry in entries {
                        let bound = ctx.bind(&section, entry);
                        out.push(self.expand(obj, &bound, uid(entry))?);
                    }
                }
                None => {
                    debug!("No data for section {}; keeping placeholder", section);
                    out.push(self.expand(obj, &ctx.enter(&section), None)?);
                }
            }
        }

        Ok(out)
    }
}

/// A section node is a wrapper when its only content child carries no
/// section marker of its own.
fn is_wrapper(node: &Map<String, Value>) -> bool {
    let mut children = child_nodes(node);
    match (children.next(), children.next()) {
        (Some(only), None) => section_marker(only).is_none(),
        _ => false,
    }
}

/// Instantiates a template against a root-section data record.
pub fn generate_structure(
    template: &Value,
    record: &Value,
    namespace: &Namespace,
) -> SchemaResult<Value> {
    StructureGenerator::new(namespace.clone()).generate(template, record)
}
