//! HTML parsing and markup query helpers.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! the service's pages and pulling text or attribute values out of them
//! with CSS selectors. A missing match is a normal outcome and is reported
//! as `None`; only an invalid selector is an error.
//!
//! # Example
//!
//! ```rust
//! use ordbog_core::parse::{Document, compile_selector};
//!
//! let html = r#"
//!     <div class="word"><span class="wordclass"> sb. </span><input value="kat"></div>
//! "#;
//!
//! let doc = Document::parse(html);
//! let wordclass = compile_selector("span.wordclass").unwrap();
//! let input = compile_selector("input").unwrap();
//!
//! assert_eq!(doc.text_at(&wordclass, 0), Some("sb.".to_string()));
//! assert_eq!(doc.attribute_at(&input, "value", 0), Some("kat".to_string()));
//! assert_eq!(doc.text_at(&wordclass, 1), None);
//! ```

use scraper::{Html, Selector};

use crate::{OrdbogError, Result};

/// Compiles a CSS selector string.
///
/// # Errors
///
/// Returns [`OrdbogError::HtmlParseError`] if the selector is invalid.
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| OrdbogError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// html5ever recovers from malformed markup, so parsing itself never fails.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements using a CSS selector string.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.select_compiled(&sel))
    }

    /// Selects elements using an already compiled selector.
    pub fn select_compiled(&'_ self, selector: &Selector) -> Vec<Element<'_>> {
        self.html.select(selector).map(Element::from).collect()
    }

    /// Returns the `index`-th element matching `selector`, if there is one.
    pub fn nth(&'_ self, selector: &Selector, index: usize) -> Option<Element<'_>> {
        self.html.select(selector).nth(index).map(Element::from)
    }

    /// Trimmed text of the `index`-th match of `selector`.
    pub fn text_at(&self, selector: &Selector, index: usize) -> Option<String> {
        self.nth(selector, index).map(|el| el.trimmed_text())
    }

    /// Value of `attribute` on the `index`-th match of `selector`.
    ///
    /// `None` both when there are too few matches and when the element lacks the attribute.
    pub fn attribute_at(&self, selector: &Selector, attribute: &str, index: usize) -> Option<String> {
        self.nth(selector, index)
            .and_then(|el| el.attr(attribute).map(str::to_string))
    }
}

/// A wrapper around scraper's ElementRef.
///
/// Element represents a single node in the HTML document tree and offers the
/// same query helpers as [`Document`], scoped to its own subtree.
///
/// # Example
///
/// ```rust
/// use ordbog_core::parse::Document;
///
/// let html = r#"<li class="articleHover"><span class="example">en sort kat</span></li>"#;
/// let doc = Document::parse(html);
/// let item = &doc.select("li").unwrap()[0];
///
/// assert_eq!(item.text(), "en sort kat");
/// assert_eq!(item.attr("class"), Some("articleHover"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> From<scraper::ElementRef<'a>> for Element<'a> {
    fn from(element: scraper::ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Text content with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Gets the value of an attribute.
    ///
    /// Returns `None` if the attribute is not present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Whether this element itself matches `selector`.
    pub fn matches(&self, selector: &Selector) -> bool {
        selector.matches(&self.element)
    }

    /// Selects descendant elements using a CSS selector string.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.select_compiled(&sel))
    }

    /// Selects descendant elements using an already compiled selector.
    pub fn select_compiled(&self, selector: &Selector) -> Vec<Element<'a>> {
        self.element.select(selector).map(Element::from).collect()
    }

    /// Returns the `index`-th descendant matching `selector`, if there is one.
    pub fn nth(&self, selector: &Selector, index: usize) -> Option<Element<'a>> {
        self.element.select(selector).nth(index).map(Element::from)
    }

    /// Trimmed text of the `index`-th descendant matching `selector`.
    pub fn text_at(&self, selector: &Selector, index: usize) -> Option<String> {
        self.nth(selector, index).map(|el| el.trimmed_text())
    }

    /// Value of `attribute` on the `index`-th descendant matching `selector`.
    pub fn attribute_at(&self, selector: &Selector, attribute: &str, index: usize) -> Option<String> {
        self.nth(selector, index)
            .and_then(|el| el.attr(attribute).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="da">
        <head><title>Opslag</title></head>
        <body>
            <select id="dict">
                <option value="auto">Automatisk</option>
                <option value="a000">Engelsk</option>
            </select>
            <p class="content">  Paragraph 1 </p>
            <p class="content">Paragraph 2</p>
            <input class="wordBox" value="hund">
            <input class="wordBox">
        </body>
        </html>
    "#;

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].trimmed_text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_text_at_index() {
        let doc = Document::parse(SAMPLE_HTML);
        let sel = compile_selector("p.content").unwrap();

        assert_eq!(doc.text_at(&sel, 0), Some("Paragraph 1".to_string()));
        assert_eq!(doc.text_at(&sel, 1), Some("Paragraph 2".to_string()));
        assert_eq!(doc.text_at(&sel, 2), None);
    }

    #[test]
    fn test_attribute_at_missing_attribute() {
        let doc = Document::parse(SAMPLE_HTML);
        let sel = compile_selector("input.wordBox").unwrap();

        assert_eq!(doc.attribute_at(&sel, "value", 0), Some("hund".to_string()));
        assert_eq!(doc.attribute_at(&sel, "value", 1), None);
        assert_eq!(doc.attribute_at(&sel, "value", 5), None);
    }

    #[test]
    fn test_element_scoped_queries() {
        let doc = Document::parse(SAMPLE_HTML);
        let select = &doc.select("#dict").unwrap()[0];
        let option = compile_selector("option").unwrap();

        assert_eq!(select.attribute_at(&option, "value", 1), Some("a000".to_string()));
        assert_eq!(select.text_at(&option, 0), Some("Automatisk".to_string()));
        assert_eq!(select.text_at(&option, 2), None);
    }

    #[test]
    fn test_element_matches() {
        let doc = Document::parse(SAMPLE_HTML);
        let paragraph = compile_selector("p.content").unwrap();
        let elements = doc.select("body > *").unwrap();

        let matching = elements.iter().filter(|el| el.matches(&paragraph)).count();
        assert_eq!(matching, 2);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(OrdbogError::HtmlParseError(_))));
    }
}
