use sectionforge_model::{FieldType, infer_field_type};

#[test]
fn unknown_pair_defaults_to_text() {
    let spec = infer_field_type("heading", "content");
    assert_eq!(spec.field_type, FieldType::Text);
    assert!(spec.filetypes.is_none());
}

#[test]
fn exact_pair_wins_over_wildcard() {
    assert_eq!(infer_field_type("rich_text", "content").field_type, FieldType::Richtext);
    assert_eq!(infer_field_type("markdown", "content").field_type, FieldType::Markdown);
    assert_eq!(infer_field_type("video", "src").filetypes, Some(&["videos"][..]));
}

#[test]
fn wildcard_applies_to_any_host() {
    let spec = infer_field_type("teaser", "image");
    assert_eq!(spec.field_type, FieldType::Asset);
    assert_eq!(spec.filetypes, Some(&["images"][..]));
    assert_eq!(infer_field_type("card", "link").field_type, FieldType::Multilink);
}

#[test]
fn host_specific_pairs_do_not_leak() {
    // "src" is only an asset on image/video hosts.
    assert_eq!(infer_field_type("iframe", "src").field_type, FieldType::Text);
    assert_eq!(infer_field_type("toggle", "checked").field_type, FieldType::Boolean);
    assert_eq!(infer_field_type("checkbox", "checked").field_type, FieldType::Text);
}
