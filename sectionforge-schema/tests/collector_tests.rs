mod common;

use sectionforge_model::FieldType;
use sectionforge_schema::{SchemaError, collect_sections};
use sectionforge_types::Namespace;
use serde_json::json;

// ── Root section ──────────────────────────────────────────────────

#[test]
fn root_marker_names_the_root_section() {
    let graph = collect_sections(&common::blog_template(), &Namespace::new("blog")).unwrap();
    let root = graph.root().unwrap();
    assert_eq!(root.name, "blog_section");
    assert!(root.is_root);
    assert_eq!(root.children, vec!["blog_post".to_string()]);
}

#[test]
fn root_section_is_synthesized_without_marker() {
    let graph = collect_sections(&common::magazine_template(), &Namespace::new("mag")).unwrap();
    let root = graph.root().unwrap();
    assert_eq!(root.name, "mag_section");
    assert_eq!(root.fields.len(), 1);
    assert_eq!(root.fields[0].premade_field, "headline");
}

#[test]
fn non_node_template_is_rejected() {
    let err = collect_sections(&json!({"body": []}), &Namespace::new("blog")).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidTemplate(_)));
}

// ── Sections and fields ───────────────────────────────────────────

#[test]
fn fields_are_recorded_on_current_section() {
    let graph = collect_sections(&common::magazine_template(), &Namespace::new("mag")).unwrap();
    let article = graph.get("mag_article").unwrap();
    let names: Vec<_> = article.fields.iter().map(|f| f.premade_field.as_str()).collect();
    assert_eq!(names, vec!["title", "cover", "date", "url"]);
    assert_eq!(article.field("cover").unwrap().spec.field_type, FieldType::Asset);
    assert_eq!(article.field("url").unwrap().spec.field_type, FieldType::Multilink);
    assert_eq!(article.parent.as_deref(), Some("mag_section"));
}

#[test]
fn explicit_section_override_wins_over_current() {
    // The byline opens the author section but sends `date` to the article.
    let graph = collect_sections(&common::magazine_template(), &Namespace::new("mag")).unwrap();
    let author = graph.get("mag_author").unwrap();
    assert_eq!(author.fields.len(), 1);
    assert!(author.field("date").is_none());
    let article = graph.get("mag_article").unwrap();
    assert_eq!(article.field("date").unwrap().spec.field_type, FieldType::Datetime);
    assert_eq!(author.parent.as_deref(), Some("mag_article"));
}

#[test]
fn first_binding_wins() {
    let template = json!({
        "component": "page",
        "body": [
            {"component": "image", "data_mapping": [{"premade_field": "photo", "builder_field": "image"}]},
            {"component": "heading", "data_mapping": [{"premade_field": "photo", "builder_field": "content"}]}
        ]
    });
    let graph = collect_sections(&template, &Namespace::new("x")).unwrap();
    let root = graph.root().unwrap();
    assert_eq!(root.fields.len(), 1);
    assert_eq!(root.fields[0].spec.field_type, FieldType::Asset);
}

#[test]
fn child_links_to_first_parent_only() {
    let template = json!({
        "component": "page",
        "body": [
            {"component": "a", "data_section": "one", "body": [{"component": "x", "data_section": "shared"}]},
            {"component": "b", "data_section": "two", "body": [{"component": "y", "data_section": "shared"}]}
        ]
    });
    let graph = collect_sections(&template, &Namespace::new("ns")).unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.get("one").unwrap().children, vec!["shared".to_string()]);
    assert!(graph.get("two").unwrap().children.is_empty());
    assert_eq!(graph.get("shared").unwrap().parent.as_deref(), Some("one"));
}

#[test]
fn binding_to_unknown_section_registers_it() {
    let template = json!({
        "component": "page",
        "data_mapping": [{"builder_section": "settings", "premade_field": "theme", "builder_field": "class"}]
    });
    let graph = collect_sections(&template, &Namespace::new("site")).unwrap();
    let settings = graph.get("settings").unwrap();
    assert!(settings.parent.is_none());
    assert_eq!(settings.qualified.canonical(), "site_settings");
    assert_eq!(settings.fields[0].premade_field, "theme");
}

#[test]
fn bindings_inside_non_structural_keys_are_ignored() {
    let template = json!({
        "component": "page",
        "options": [{"component": "x", "data_section": "hidden"}],
        "settings": {"component": "y", "data_section": "also_hidden"}
    });
    let graph = collect_sections(&template, &Namespace::new("ns")).unwrap();
    assert_eq!(graph.len(), 1);
}
