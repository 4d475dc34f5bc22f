//! Text heuristic deciding whether a type was written through an alias.
//!
//! The reconstructed name (`app::Widget`, `std::shared_ptr<app::Widget>`)
//! is compared with the frontend's spelling of the reference
//! (`const app::Widget &`, `WidgetPtr`). Namespace qualifiers are erased on
//! both sides; if the whitespace-separated tokens of the name do not occur
//! as a contiguous run within the spelling, the spelling is recorded as the
//! entity's original typedef.

use once_cell::sync::Lazy;
use regex::Regex;

static NAMESPACE_QUALIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z_0-9]+::").unwrap());

pub fn remove_namespace(spelling: &str) -> String {
    NAMESPACE_QUALIFIER.replace_all(spelling, "").into_owned()
}

/// Whether `needle` occurs as a contiguous run inside `haystack`.
pub fn is_sublist<T: PartialEq>(needle: &[T], haystack: &[T]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

pub fn typedef_present(complete_name: &str, original_spelling: &str) -> bool {
    let name = remove_namespace(complete_name);
    let name_tokens: Vec<&str> = name.split_whitespace().collect();

    let original_tokens: Vec<String> = original_spelling
        .split_whitespace()
        .map(remove_namespace)
        .collect();
    let original_tokens: Vec<&str> = original_tokens.iter().map(String::as_str).collect();

    !is_sublist(&name_tokens, &original_tokens)
}
