//! Lookup result model and the result page reconstructor.
//!
//! The service renders a lookup as one result container holding a flat run
//! of language headings and word blocks. A heading applies to every word
//! block after it until the next heading, so the grouping only exists in
//! document order. [`ResultParser`] walks headings and blocks together in
//! that order, carrying the active heading along, and rebuilds the
//! language → word → usage detail hierarchy as a [`LookupResult`].
//!
//! # Example
//!
//! ```rust
//! use ordbog_core::parse_lookup;
//!
//! let html = r#"
//!     <div class="searchArticleResult">
//!         <h5>Dansk-Engelsk</h5>
//!         <div class="articlePadding"><input value="kat"><span class="wordclass">sb.</span></div>
//!         <div class="articlePadding"><input value="killing"></div>
//!     </div>
//! "#;
//!
//! let result = parse_lookup(html).unwrap();
//! assert_eq!(result.len(), 2);
//! assert_eq!(result.get("Dansk-Engelsk").unwrap()[0].word, "kat");
//! ```

use scraper::Selector;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tracing::debug;

use crate::parse::{Document, Element, compile_selector};
use crate::{DictionaryCode, OrdbogError, Result};

/// One example or usage entry attached to a [`TranslatedWord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageDetail {
    pub category: Option<String>,
    pub example: Option<String>,
    pub explanation: Option<String>,
    pub combination: Option<String>,
    /// Word form the example belongs to.
    pub word: Option<String>,
}

/// One translation found on a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedWord {
    /// The headword; empty when the block carried no word input.
    pub word: String,
    /// Language-pair label of the heading the block appeared under.
    pub language: String,
    pub wordclass: Option<String>,
    pub inflection: Option<String>,
    /// Grammatical comment, when the dictionary supplies one.
    pub comment: Option<String>,
    /// Usage details in document order.
    pub details: Vec<UsageDetail>,
}

/// Words found under one language-pair label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageGroup {
    pub language: String,
    pub words: Vec<TranslatedWord>,
}

/// Mapping from language-pair label to the words found under it.
///
/// Labels keep the order in which they first appear on the page, and words
/// keep document order within their label. Serializes as a JSON object
/// keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    groups: Vec<LanguageGroup>,
}

impl LookupResult {
    /// Appends a word under `language`, creating the label on first use.
    pub fn push(&mut self, word: TranslatedWord) {
        match self.groups.iter_mut().find(|group| group.language == word.language) {
            Some(group) => group.words.push(word),
            None => self.groups.push(LanguageGroup { language: word.language.clone(), words: vec![word] }),
        }
    }

    /// Total number of words across all labels.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.words.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Labels in first-seen order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.language.as_str())
    }

    pub fn groups(&self) -> &[LanguageGroup] {
        &self.groups
    }

    /// Words recorded under `language`.
    pub fn get(&self, language: &str) -> Option<&[TranslatedWord]> {
        self.groups
            .iter()
            .find(|group| group.language == language)
            .map(|group| group.words.as_slice())
    }

    /// Every word, grouped by label in first-seen order.
    pub fn words(&self) -> impl Iterator<Item = &TranslatedWord> {
        self.groups.iter().flat_map(|group| group.words.iter())
    }

    /// The `number`-th word of [`words`](Self::words), counting from 1.
    pub fn word(&self, number: usize) -> Option<&TranslatedWord> {
        number.checked_sub(1).and_then(|idx| self.words().nth(idx))
    }
}

impl Serialize for LookupResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.language, &group.words)?;
        }
        map.end()
    }
}

/// CSS selectors describing the result page layout.
#[derive(Debug, Clone)]
pub struct ResultSelectors {
    /// Region holding every result of one lookup.
    pub container: String,
    /// Language-pair heading.
    pub heading: String,
    /// One word and its details.
    pub block: String,
    /// Element whose `value` attribute is the headword.
    pub word: String,
    pub wordclass: String,
    pub inflection: String,
    pub comment: String,
    /// One usage detail inside a block.
    pub detail: String,
    pub category: String,
    pub example: String,
    pub explanation: String,
    pub combination: String,
    /// Element whose `value` attribute is the detail's word form.
    pub detail_word: String,
}

impl Default for ResultSelectors {
    fn default() -> Self {
        Self {
            container: "div.searchArticleResult".to_string(),
            heading: "h5".to_string(),
            block: "div.articlePadding".to_string(),
            word: "input".to_string(),
            wordclass: "span.wordclass".to_string(),
            inflection: "span.inflection".to_string(),
            comment: "div.gramComment".to_string(),
            detail: "div.examples li.articleHover".to_string(),
            category: "span.category".to_string(),
            example: "span.example".to_string(),
            explanation: "span.explanation".to_string(),
            combination: "span.combination".to_string(),
            detail_word: "input.wordBox".to_string(),
        }
    }
}

struct CompiledSelectors {
    container: Selector,
    heading: Selector,
    block: Selector,
    heading_or_block: Selector,
    word: Selector,
    wordclass: Selector,
    inflection: Selector,
    comment: Selector,
    detail: Selector,
    category: Selector,
    example: Selector,
    explanation: Selector,
    combination: Selector,
    detail_word: Selector,
}

/// Rebuilds a [`LookupResult`] from a result page.
pub struct ResultParser {
    selectors: CompiledSelectors,
}

impl ResultParser {
    /// Compiles the given selectors.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::HtmlParseError`] if any selector is invalid.
    pub fn new(selectors: &ResultSelectors) -> Result<Self> {
        let selectors = CompiledSelectors {
            container: compile_selector(&selectors.container)?,
            heading: compile_selector(&selectors.heading)?,
            block: compile_selector(&selectors.block)?,
            heading_or_block: compile_selector(&format!("{}, {}", selectors.heading, selectors.block))?,
            word: compile_selector(&selectors.word)?,
            wordclass: compile_selector(&selectors.wordclass)?,
            inflection: compile_selector(&selectors.inflection)?,
            comment: compile_selector(&selectors.comment)?,
            detail: compile_selector(&selectors.detail)?,
            category: compile_selector(&selectors.category)?,
            example: compile_selector(&selectors.example)?,
            explanation: compile_selector(&selectors.explanation)?,
            combination: compile_selector(&selectors.combination)?,
            detail_word: compile_selector(&selectors.detail_word)?,
        };
        Ok(Self { selectors })
    }

    /// Parses a result page.
    ///
    /// A page without a result container, or a container without word
    /// blocks, yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::MalformedResponse`] when word blocks appear
    /// before the first language heading, since no label can be assigned.
    pub fn parse(&self, html: &str) -> Result<LookupResult> {
        let doc = Document::parse(html);
        let mut result = LookupResult::default();

        let Some(container) = doc.nth(&self.selectors.container, 0) else {
            debug!("no result container on page");
            return Ok(result);
        };

        let mut active: Option<String> = None;
        let mut unlabelled = 0;

        // Headings and blocks come back in document order, so each block
        // sees the nearest heading before it.
        for element in container.select_compiled(&self.selectors.heading_or_block) {
            if element.matches(&self.selectors.heading) {
                active = Some(element.trimmed_text());
            } else if element.matches(&self.selectors.block) {
                match &active {
                    Some(language) => result.push(self.parse_word(&element, language)),
                    None => unlabelled += 1,
                }
            }
        }

        if unlabelled > 0 {
            return Err(OrdbogError::MalformedResponse(format!(
                "{} word block(s) before the first language heading",
                unlabelled
            )));
        }

        debug!(words = result.len(), languages = result.groups.len(), "parsed lookup page");
        Ok(result)
    }

    fn parse_word(&self, block: &Element<'_>, language: &str) -> TranslatedWord {
        let sel = &self.selectors;
        let details = block
            .select_compiled(&sel.detail)
            .iter()
            .map(|item| UsageDetail {
                category: non_empty(item.text_at(&sel.category, 0)),
                example: non_empty(item.text_at(&sel.example, 0)),
                explanation: non_empty(item.text_at(&sel.explanation, 0)),
                combination: non_empty(item.text_at(&sel.combination, 0)),
                word: non_empty(item.attribute_at(&sel.detail_word, "value", 0)),
            })
            .collect();

        TranslatedWord {
            word: block.attribute_at(&sel.word, "value", 0).unwrap_or_default(),
            language: language.to_string(),
            wordclass: non_empty(block.text_at(&sel.wordclass, 0)),
            inflection: non_empty(block.text_at(&sel.inflection, 0)),
            comment: non_empty(block.text_at(&sel.comment, 0)),
            details,
        }
    }
}

/// Treats an empty string the same as a missing element.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Parses a result page with the default selectors.
pub fn parse_lookup(html: &str) -> Result<LookupResult> {
    ResultParser::new(&ResultSelectors::default())?.parse(html)
}

/// Dictionaries that reported hits on a result page.
///
/// The page lists them as `#dictsmenu li` items whose id is the dictionary
/// code followed by a five character suffix. Unknown codes are skipped.
pub fn dictionaries_with_hits(html: &str) -> Result<Vec<DictionaryCode>> {
    let doc = Document::parse(html);
    let items = doc.select("#dictsmenu li")?;

    Ok(items
        .iter()
        .filter_map(|li| li.attr("id"))
        .filter_map(|id| id.len().checked_sub(5).and_then(|end| id.get(..end)))
        .filter_map(DictionaryCode::lookup)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn block(word: &str) -> String {
        format!(r#"<div class="articlePadding"><input value="{}"></div>"#, word)
    }

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><div class="searchArticleResult"><div>{}</div></div></body></html>"#,
            body
        )
    }

    #[test]
    fn test_single_heading_keeps_document_order() {
        let html = page(&format!("<h5>Dansk-Engelsk</h5>{}{}{}", block("a"), block("b"), block("c")));
        let result = parse_lookup(&html).unwrap();

        assert_eq!(result.languages().collect::<Vec<_>>(), vec!["Dansk-Engelsk"]);
        let words: Vec<_> = result.get("Dansk-Engelsk").unwrap().iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_headings_apply_until_next_heading() {
        let html = page(&format!(
            "<h5>Danish–English</h5>{}{}<h5>Danish–German</h5>{}",
            block("w1"),
            block("w2"),
            block("w3")
        ));
        let result = parse_lookup(&html).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.languages().collect::<Vec<_>>(), vec!["Danish–English", "Danish–German"]);
        assert_eq!(result.get("Danish–English").unwrap().len(), 2);
        assert_eq!(result.get("Danish–German").unwrap()[0].word, "w3");
        assert!(result.words().all(|w| result.get(&w.language).is_some()));
    }

    #[test]
    fn test_repeated_heading_accumulates() {
        let html = page(&format!(
            "<h5>A</h5>{}<h5>B</h5>{}<h5>A</h5>{}",
            block("1"),
            block("2"),
            block("3")
        ));
        let result = parse_lookup(&html).unwrap();

        let a: Vec<_> = result.get("A").unwrap().iter().map(|w| w.word.as_str()).collect();
        assert_eq!(a, vec!["1", "3"]);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_nested_blocks_take_nearest_heading() {
        let html = page(
            r#"<h5> Dansk-Tysk </h5>
               <div class="article"><div class="articlePadding"><input value="hund"></div></div>
               <h5>Tysk-Dansk</h5>
               <div class="article"><div class="articlePadding"><input value="Hund"></div></div>"#,
        );
        let result = parse_lookup(&html).unwrap();

        assert_eq!(result.get("Dansk-Tysk").unwrap()[0].word, "hund");
        assert_eq!(result.get("Tysk-Dansk").unwrap()[0].word, "Hund");
    }

    #[rstest]
    #[case::no_container("<html><body><p>Ingen resultater</p></body></html>".to_string())]
    #[case::empty_container(page(""))]
    #[case::heading_only(page("<h5>Dansk-Engelsk</h5>"))]
    fn test_no_results_is_empty(#[case] html: String) {
        let result = parse_lookup(&html).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_block_before_heading_is_malformed() {
        let html = page(&format!("{}<h5>Dansk-Engelsk</h5>{}", block("x"), block("y")));
        let result = parse_lookup(&html);

        assert!(matches!(result, Err(OrdbogError::MalformedResponse(msg)) if msg.starts_with("1 word")));
    }

    #[test]
    fn test_word_fields_and_details() {
        let html = page(
            r#"<h5>Dansk-Engelsk</h5>
               <div class="articlePadding">
                   <input value="kat">
                   <span class="wordclass"> sb. </span>
                   <span class="inflection">-ten, -te, -tene</span>
                   <div class="gramComment"></div>
                   <div class="examples"><ul>
                       <li class="articleHover">
                           <span class="category">zool.</span>
                           <span class="example">cat</span>
                           <input class="wordBox" value="cat">
                       </li>
                       <li class="articleHover">
                           <span class="explanation">(om person)</span>
                           <span class="combination">sort kat</span>
                       </li>
                   </ul></div>
               </div>"#,
        );
        let result = parse_lookup(&html).unwrap();
        let word = result.word(1).unwrap();

        assert_eq!(word.word, "kat");
        assert_eq!(word.wordclass.as_deref(), Some("sb."));
        assert_eq!(word.inflection.as_deref(), Some("-ten, -te, -tene"));
        assert_eq!(word.comment, None);
        assert_eq!(word.details.len(), 2);
        assert_eq!(
            word.details[0],
            UsageDetail {
                category: Some("zool.".to_string()),
                example: Some("cat".to_string()),
                word: Some("cat".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(word.details[1].combination.as_deref(), Some("sort kat"));
        assert_eq!(word.details[1].word, None);
    }

    #[test]
    fn test_word_numbering_is_one_based() {
        let html = page(&format!("<h5>A</h5>{}<h5>B</h5>{}", block("first"), block("second")));
        let result = parse_lookup(&html).unwrap();

        assert!(result.word(0).is_none());
        assert_eq!(result.word(2).unwrap().word, "second");
        assert!(result.word(3).is_none());
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let html = page(&format!("<h5>B</h5>{}<h5>A</h5>{}", block("x"), block("y")));
        let result = parse_lookup(&html).unwrap();
        let json = serde_json::to_string(&result).unwrap();

        assert!(json.starts_with(r#"{"B":[{"word":"x""#));
        assert!(json.find("\"B\"").unwrap() < json.find("\"A\"").unwrap());
    }

    #[test]
    fn test_invalid_selectors_are_rejected() {
        let selectors = ResultSelectors { heading: "[[bad".to_string(), ..Default::default() };
        assert!(matches!(ResultParser::new(&selectors), Err(OrdbogError::HtmlParseError(_))));
    }

    #[test]
    fn test_dictionaries_with_hits() {
        let html = r#"<ul id="dictsmenu">
            <li id="a000_menu">Engelsk</li>
            <li id="ddob_menu">DDO</li>
            <li id="zzzz_menu">Ukendt</li>
            <li id="ab">Kort</li>
        </ul>"#;
        let codes: Vec<_> = dictionaries_with_hits(html).unwrap().iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["a000", "ddob"]);
    }
}
