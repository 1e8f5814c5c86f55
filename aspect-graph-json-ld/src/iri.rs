//! Lexical IRI helpers shared by context parsing and expansion

use aspect_vocab::jsonld::BLANK_PREFIX;

/// Split a compact IRI like "sor:Row1" into (prefix, suffix).
///
/// Returns None for absolute IRIs (suffix starting with `//`), for prefixes
/// containing `/`, and for strings without a colon.
pub fn parse_prefix(s: &str) -> Option<(&str, &str)> {
    let (prefix, suffix) = s.split_once(':')?;
    if prefix.is_empty() || prefix.contains('/') || suffix.starts_with("//") {
        return None;
    }
    Some((prefix, suffix))
}

/// True if the string contains a colon (absolute or compact IRI)
pub fn any_iri(s: &str) -> bool {
    s.contains(':')
}

/// True if the IRI starts with an RFC 3986 scheme followed by `:`
///
/// Compact IRIs such as `sor:Row1` also satisfy this; `parse_prefix` is what
/// tells the two apart during expansion.
pub fn is_absolute(iri: &str) -> bool {
    match iri.split_once(':') {
        Some((scheme, _)) => {
            let mut bytes = scheme.bytes();
            bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
                && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
        }
        None => false,
    }
}

/// True for `_:label` blank node identifiers
pub fn is_blank_node(id: &str) -> bool {
    id.starts_with(BLANK_PREFIX)
}

/// Ensure a namespace IRI ends with '/' or '#'
pub fn add_trailing_slash(iri: &str) -> String {
    if iri.ends_with('/') || iri.ends_with('#') {
        iri.to_string()
    } else {
        format!("{}/", iri)
    }
}

/// Resolve `relative` against `base`
pub fn join(base: &str, relative: &str) -> String {
    if is_absolute(relative) {
        relative.to_string()
    } else if relative.starts_with('#') {
        format!("{}{}", base.trim_end_matches(['/', '#']), relative)
    } else {
        format!("{}{}", add_trailing_slash(base), relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix() {
        assert_eq!(parse_prefix("sor:Row1"), Some(("sor", "Row1")));
        assert_eq!(parse_prefix("rdfs:label"), Some(("rdfs", "label")));
        assert_eq!(parse_prefix("http://rdf.equinor.com/data"), None);
        assert_eq!(parse_prefix(":local"), None);
        assert_eq!(parse_prefix("noColon"), None);
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://rdf.equinor.com/ontology/sor#Row1"));
        assert!(is_absolute("urn:isbn:0451450523"));
        assert!(is_absolute("sor:Row1"));
        assert!(!is_absolute("_:b0"));
        assert!(!is_absolute("Row1"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn test_blank_node() {
        assert!(is_blank_node("_:b0"));
        assert!(!is_blank_node("http://example.org/_:b0"));
    }

    #[test]
    fn test_join() {
        assert_eq!(join("http://example.org", "row"), "http://example.org/row");
        assert_eq!(join("http://example.org/", "#frag"), "http://example.org#frag");
        assert_eq!(join("http://example.org/", "urn:x:y"), "urn:x:y");
    }
}
