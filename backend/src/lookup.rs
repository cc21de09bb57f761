use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

pub const CAMBRIDGE_BASE_URL: &str = "https://dictionary.cambridge.org/dictionary/english/";
pub const OXFORD_BASE_URL: &str = "https://www.oxfordlearnersdictionaries.com/definition/english/";

lazy_static! {
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    // ASCII word characters, hyphen and apostrophe
    static ref RE_NOT_SLUG: Regex = Regex::new(r"[^A-Za-z0-9_\-']").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupLink {
    pub label: String,
    pub url: String,
}

/// Dictionary URL slug of a term.
///
/// The result only contains `[A-Za-z0-9_'-]`, so it can be appended to a URL
/// path as it is.
///
/// ```
/// use wordcards_backend::lookup::slugify;
///
/// assert_eq!(slugify("rule of thumb"), "rule-of-thumb");
/// assert_eq!(slugify("self-confidence "), "self-confidence");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(term: &str) -> String {
    let lower = term.trim().to_lowercase();
    let hyphenated = RE_WHITESPACE.replace_all(&lower, "-");
    RE_NOT_SLUG.replace_all(&hyphenated, "").to_string()
}

pub fn cambridge_url(term: &str) -> String {
    format!("{}{}", CAMBRIDGE_BASE_URL, slugify(term))
}

pub fn oxford_url(term: &str) -> String {
    format!("{}{}", OXFORD_BASE_URL, slugify(term))
}

pub fn lookup_links(term: &str) -> Vec<LookupLink> {
    vec![
        LookupLink { label: "Cambridge".to_string(), url: cambridge_url(term) },
        LookupLink { label: "Oxford".to_string(), url: oxford_url(term) },
    ]
}
