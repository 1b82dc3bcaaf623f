//! IDL attribute resolution.
//!
//! JSX spells attributes as IDL property names (`className`, `htmlFor`);
//! rules match against content attribute names (`class`, `for`). This
//! table resolves between the two spellings.

/// `(IDL property name, content attribute name)` pairs where the two
/// spellings differ beyond case.
const IDL_ATTRIBUTES: &[(&str, &str)] = &[
    ("acceptCharset", "accept-charset"),
    ("autoComplete", "autocomplete"),
    ("className", "class"),
    ("colSpan", "colspan"),
    ("contentEditable", "contenteditable"),
    ("crossOrigin", "crossorigin"),
    ("dateTime", "datetime"),
    ("htmlFor", "for"),
    ("httpEquiv", "http-equiv"),
    ("maxLength", "maxlength"),
    ("readOnly", "readonly"),
    ("rowSpan", "rowspan"),
    ("spellCheck", "spellcheck"),
    ("srcSet", "srcset"),
    ("tabIndex", "tabindex"),
];

/// Resolve a written attribute name to its
/// `(idl_prop_name, content_attr_name)` pair.
///
/// Unknown names resolve to themselves, with the content spelling
/// lowercased the way markup serializes it.
#[must_use]
pub fn search_idl_attribute(name: &str) -> (String, String) {
    for &(idl, content) in IDL_ATTRIBUTES {
        if name == idl || name.eq_ignore_ascii_case(content) {
            return (idl.to_string(), content.to_string());
        }
    }
    (name.to_string(), name.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_idl_spellings_to_content_attributes() {
        assert_eq!(
            search_idl_attribute("className"),
            ("className".to_string(), "class".to_string())
        );
        assert_eq!(
            search_idl_attribute("htmlFor"),
            ("htmlFor".to_string(), "for".to_string())
        );
    }

    #[test]
    fn content_spellings_resolve_to_the_same_pair() {
        assert_eq!(
            search_idl_attribute("class"),
            ("className".to_string(), "class".to_string())
        );
    }

    #[test]
    fn unknown_names_resolve_to_themselves() {
        assert_eq!(
            search_idl_attribute("id"),
            ("id".to_string(), "id".to_string())
        );
        assert_eq!(
            search_idl_attribute("onClick"),
            ("onClick".to_string(), "onclick".to_string())
        );
    }
}
