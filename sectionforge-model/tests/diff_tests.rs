use sectionforge_model::{DerivedComponent, FieldDeletion, FieldRename, SchemaDiff};

fn rename(component: &str, old: &str, new: &str) -> FieldRename {
    FieldRename {
        component: component.into(),
        old_field: old.into(),
        new_field: new.into(),
    }
}

#[test]
fn default_diff_is_empty() {
    let diff = SchemaDiff::default();
    assert!(diff.is_empty());
    assert!(!diff.requires_migration());
    assert_eq!(diff.registry_operations(), 0);
}

#[test]
fn affected_components_is_a_union() {
    let diff = SchemaDiff {
        field_renames: vec![rename("blog_post", "x", "y"), rename("blog_post", "a", "b")],
        field_deletions: vec![FieldDeletion {
            component: "blog_author".into(),
            field: "z".into(),
        }],
        removed_components: vec!["blog_tag".into()],
        ..Default::default()
    };
    let affected: Vec<_> = diff.affected_components().into_iter().collect();
    assert_eq!(affected, vec!["blog_author", "blog_post", "blog_tag"]);
    assert!(diff.requires_migration());
}

#[test]
fn registry_operation_count() {
    let diff = SchemaDiff {
        new_components: vec![DerivedComponent::new("a", "A")],
        changed_components: vec![DerivedComponent::new("b", "B")],
        removed_components: vec!["c".into(), "d".into()],
        ..Default::default()
    };
    assert!(!diff.is_empty());
    assert!(!diff.requires_migration());
    assert_eq!(diff.registry_operations(), 4);
}
