//! Shared template fixtures.

#![allow(dead_code)]

use serde_json::{Value, json};

/// The minimal blog layout: a page section with one repeatable heading
/// bound to each post's title.
pub fn blog_template() -> Value {
    json!({
        "component": "page",
        "_uid": "t-root",
        "data_section": "blog_section",
        "body": [{
            "component": "heading",
            "_uid": "t-heading",
            "data_section": "blog_post",
            "data_mapping": [{
                "builder_section": "blog_post",
                "premade_field": "title",
                "builder_field": "content"
            }]
        }]
    })
}

/// The data record instantiating [`blog_template`].
pub fn blog_record() -> Value {
    json!({
        "name": "blog",
        "posts": [
            {"_uid": "p1", "title": "Hello"},
            {"_uid": "p2", "title": "World"}
        ]
    })
}

/// A richer layout: root fields, a wrapper grid of cards, nested authors.
pub fn magazine_template() -> Value {
    json!({
        "component": "page",
        "_uid": "t-root",
        "_editable": "<!--#storyblok#-->",
        "data_mapping": [{"premade_field": "headline", "builder_field": "title"}],
        "body": [{
            "component": "grid",
            "_uid": "t-grid",
            "data_section": "mag_article",
            "columns": [{
                "component": "card",
                "_uid": "t-card",
                "data_mapping": [
                    {"premade_field": "title", "builder_field": "content"},
                    {"premade_field": "cover", "builder_field": "image"}
                ],
                "body": [{
                    "component": "byline",
                    "_uid": "t-byline",
                    "data_section": "mag_author",
                    "data_mapping": [
                        {"premade_field": "name", "builder_field": "content"},
                        {"builder_section": "mag_article", "premade_field": "date", "builder_field": "date"}
                    ]
                }, {
                    "component": "button",
                    "_uid": "t-button",
                    "data_mapping": [{"builder_section": "mag_article", "premade_field": "url", "builder_field": "link"}]
                }]
            }]
        }]
    })
}
