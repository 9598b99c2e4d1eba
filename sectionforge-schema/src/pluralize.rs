//! Child-array naming.
//!
//! A heuristic English pluralizer, not a morphological one: `category` ->
//! `categories`, `box` -> `boxes`, `post` -> `posts`. Irregular nouns come
//! out wrong (`person` -> `persons`).

/// Pluralizes the last word of a snake_case name.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| c.is_ascii_alphabetic() && !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{word}es");
    }

    format!("{word}s")
}
