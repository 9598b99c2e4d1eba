//! Static field-type inference table.
//!
//! A binding writes a data field into a host node's local field; the host's
//! kind and the local field name decide what editor type the data field
//! needs. Lookups try the exact `(kind, field)` pair first, then the
//! `("*", field)` wildcard, and fall back to plain text.

use crate::field::FieldType;

const ANY: &str = "*";
const IMAGES: &[&str] = &["images"];
const VIDEOS: &[&str] = &["videos"];

/// The inferred type of a bound field plus its asset restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field_type: FieldType,
    pub filetypes: Option<&'static [&'static str]>,
}

impl FieldSpec {
    const fn plain(field_type: FieldType) -> Self {
        Self {
            field_type,
            filetypes: None,
        }
    }

    const fn asset(field_type: FieldType, filetypes: &'static [&'static str]) -> Self {
        Self {
            field_type,
            filetypes: Some(filetypes),
        }
    }
}

const TABLE: &[(&str, &str, FieldSpec)] = &[
    ("image", "image", FieldSpec::asset(FieldType::Asset, IMAGES)),
    ("image", "src", FieldSpec::asset(FieldType::Asset, IMAGES)),
    ("gallery", "images", FieldSpec::asset(FieldType::Multiasset, IMAGES)),
    ("video", "video", FieldSpec::asset(FieldType::Asset, VIDEOS)),
    ("video", "src", FieldSpec::asset(FieldType::Asset, VIDEOS)),
    ("button", "link", FieldSpec::plain(FieldType::Multilink)),
    ("rich_text", "content", FieldSpec::plain(FieldType::Richtext)),
    ("markdown", "content", FieldSpec::plain(FieldType::Markdown)),
    ("paragraph", "content", FieldSpec::plain(FieldType::Textarea)),
    ("date", "value", FieldSpec::plain(FieldType::Datetime)),
    ("counter", "value", FieldSpec::plain(FieldType::Number)),
    ("toggle", "checked", FieldSpec::plain(FieldType::Boolean)),
    (ANY, "image", FieldSpec::asset(FieldType::Asset, IMAGES)),
    (ANY, "images", FieldSpec::asset(FieldType::Multiasset, IMAGES)),
    (ANY, "video", FieldSpec::asset(FieldType::Asset, VIDEOS)),
    (ANY, "link", FieldSpec::plain(FieldType::Multilink)),
    (ANY, "url", FieldSpec::plain(FieldType::Multilink)),
    (ANY, "description", FieldSpec::plain(FieldType::Textarea)),
    (ANY, "date", FieldSpec::plain(FieldType::Datetime)),
];

/// Infers the field type for data bound into `bound_field` on a node of
/// kind `host_kind`.
pub fn infer_field_type(host_kind: &str, bound_field: &str) -> FieldSpec {
    TABLE
        .iter()
        .find(|(kind, field, _)| *kind == host_kind && *field == bound_field)
        .or_else(|| {
            TABLE
                .iter()
                .find(|(kind, field, _)| *kind == ANY && *field == bound_field)
        })
        .map(|(_, _, spec)| *spec)
        .unwrap_or(FieldSpec::plain(FieldType::Text))
}
