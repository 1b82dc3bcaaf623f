//! Element namespace resolution.
//!
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
//!
//! The default content namespace is XHTML. An `svg` or `math` root
//! switches its descendants into the foreign namespace until an HTML
//! integration point is entered, at which point descendants revert.

use quokka_ast::Namespace;

/// SVG elements whose children are parsed as HTML.
///
/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
/// "An html integration point is ... an SVG foreignObject element, an SVG
/// desc element, an SVG title element."
const SVG_INTEGRATION_POINTS: &[&str] = &["foreignObject", "desc", "title"];

/// MathML elements whose children are parsed as HTML.
///
/// WHATWG scopes this to `annotation-xml` with an HTML-ish encoding;
/// the encoding check needs attribute values, which namespace resolution
/// runs before, so the element name alone decides here.
const MATHML_INTEGRATION_POINTS: &[&str] = &["annotation-xml"];

/// Resolve the namespace of an element from its name and its nearest
/// element ancestor.
#[must_use]
pub fn get_namespace(node_name: &str, parent_name: Option<&str>, parent_namespace: Namespace) -> Namespace {
    if node_name.eq_ignore_ascii_case("svg") {
        return Namespace::Svg;
    }
    if node_name.eq_ignore_ascii_case("math") {
        return Namespace::MathMl;
    }
    match parent_namespace {
        Namespace::Svg => {
            if parent_name.is_some_and(|name| SVG_INTEGRATION_POINTS.iter().any(|p| p.eq_ignore_ascii_case(name))) {
                Namespace::Html
            } else {
                Namespace::Svg
            }
        }
        Namespace::MathMl => {
            if parent_name.is_some_and(|name| MATHML_INTEGRATION_POINTS.iter().any(|p| p.eq_ignore_ascii_case(name))) {
                Namespace::Html
            } else {
                Namespace::MathMl
            }
        }
        Namespace::Html => Namespace::Html,
    }
}
