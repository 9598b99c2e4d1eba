//! Generic traversal over content trees.
//!
//! Only array-valued properties are structure, and only array entries that
//! are content nodes are visited. Editor markers, the binding array and known
//! non-block fields are never descended into (see
//! [`sectionforge_types::node::NON_STRUCTURAL_KEYS`]).

use sectionforge_types::node::{child_nodes, is_content_node, is_non_structural};
use serde_json::{Map, Value};

/// Depth-first, pre-order walk.
///
/// The visitor receives each content node with its parent's context and
/// returns the context for the node's descendants. A visitor error stops the
/// walk. Non-node roots are ignored.
pub fn walk<C, E, F>(node: &Value, ctx: &C, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&Value, &C) -> Result<C, E>,
{
    let Some(obj) = node.as_object().filter(|_| is_content_node(node)) else {
        return Ok(());
    };

    let child_ctx = visit(node, ctx)?;
    for child in child_nodes(obj) {
        walk(child, &child_ctx, visit)?;
    }
    Ok(())
}

/// Pure bottom-up rewrite.
///
/// Returns a new tree in which every content node has been passed through
/// `f` after its children were rewritten. Values that are not content nodes,
/// and everything under non-structural keys, are copied unchanged.
pub fn transform<F>(node: &Value, f: &mut F) -> Value
where
    F: FnMut(Map<String, Value>) -> Map<String, Value>,
{
    let Some(obj) = node.as_object().filter(|_| is_content_node(node)) else {
        return node.clone();
    };

    let mut rebuilt = Map::new();
    for (key, value) in obj {
        let value = match value {
            Value::Array(items) if !is_non_structural(key) => Value::Array(
                items
                    .iter()
                    .map(|item| {
                        if is_content_node(item) {
                            transform(item, f)
                        } else {
                            item.clone()
                        }
                    })
                    .collect(),
            ),
            other => other.clone(),
        };
        rebuilt.insert(key.clone(), value);
    }

    Value::Object(f(rebuilt))
}

/// Counts the content nodes in a tree, root included.
pub fn count_nodes(node: &Value) -> usize {
    let mut count = 0usize;
    let _ = walk::<(), std::convert::Infallible, _>(node, &(), &mut |_, _| {
        count += 1;
        Ok(())
    });
    count
}
