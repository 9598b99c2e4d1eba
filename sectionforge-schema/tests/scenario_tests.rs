//! The blog layout, end to end through derivation and generation.

mod common;

use pretty_assertions::assert_eq;
use sectionforge_model::{DerivedField, FieldType};
use sectionforge_schema::{derive_components, diff_components, generate_structure};
use sectionforge_types::Namespace;
use serde_json::json;

#[test]
fn blog_schema_and_structure() {
    let ns = Namespace::new("blog");
    let template = common::blog_template();

    let components = derive_components(&template, &ns).unwrap();
    let section = components.iter().find(|c| c.name == "blog_section").unwrap();
    let posts = section.field("posts").unwrap();
    assert_eq!(posts.field_type, FieldType::Bloks);
    assert_eq!(posts.component_whitelist, Some(vec!["blog_post".to_string()]));

    let post = components.iter().find(|c| c.name == "blog_post").unwrap();
    assert_eq!(post.field("title"), Some(&DerivedField::text("title", 0)));

    let tree = generate_structure(&template, &common::blog_record(), &ns).unwrap();
    let contents: Vec<_> = tree["body"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["content"].clone())
        .collect();
    assert_eq!(contents, vec![json!("Hello"), json!("World")]);
}

#[test]
fn editing_a_binding_renames_the_field() {
    let ns = Namespace::new("blog");
    let before = derive_components(&common::blog_template(), &ns).unwrap();

    let mut edited = common::blog_template();
    edited["body"][0]["data_mapping"][0]["premade_field"] = json!("headline");
    let after = derive_components(&edited, &ns).unwrap();

    let diff = diff_components(&before, &after);
    assert_eq!(diff.field_renames.len(), 1);
    assert_eq!(diff.field_renames[0].component, "blog_post");
    assert_eq!(diff.field_renames[0].old_field, "title");
    assert_eq!(diff.field_renames[0].new_field, "headline");
    assert!(diff.field_deletions.is_empty());
    assert!(diff.new_components.is_empty());
    assert!(diff.removed_components.is_empty());
}

#[test]
fn dropping_a_section_removes_its_component() {
    let ns = Namespace::new("blog");
    let before = derive_components(&common::blog_template(), &ns).unwrap();

    let mut edited = common::blog_template();
    edited["body"] = json!([]);
    let after = derive_components(&edited, &ns).unwrap();

    let diff = diff_components(&before, &after);
    assert_eq!(diff.removed_components, vec!["blog_post".to_string()]);
    // the `posts` array disappears from the section without a deletion
    assert!(diff.field_deletions.is_empty());
    assert_eq!(diff.changed_components.len(), 1);
    assert_eq!(diff.changed_components[0].name, "blog_section");
}
