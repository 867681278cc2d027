use crate::lookup::{LookupResult, TranslatedWord, UsageDetail};

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Print each word's usage details under it
    pub include_details: bool,

    /// Spaces before each word line
    pub indent: usize,

    /// Wrap detail lines at specified width (0 = no wrapping)
    pub line_width: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { include_details: false, indent: 4, line_width: 0 }
    }
}

/// Plain text formatter for lookup results
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &LookupResult) -> String {
        convert_to_text(result, &self.config)
    }
}

/// Render a lookup result as a numbered word list grouped by language.
///
/// Numbers run across languages in the order of [`LookupResult::words`], so
/// they can be fed back to [`LookupResult::word`].
pub fn convert_to_text(result: &LookupResult, config: &TextConfig) -> String {
    let pad = " ".repeat(config.indent);
    let mut output = String::new();
    let mut number = 1;

    for group in result.groups() {
        output.push_str(&group.language);
        output.push('\n');

        for word in &group.words {
            output.push_str(&pad);
            output.push_str(&word_line(word, number));
            output.push('\n');

            if config.include_details {
                for detail in &word.details {
                    for line in wrap_text(&detail_line(detail), config.line_width) {
                        output.push_str(&pad);
                        output.push_str(&pad);
                        output.push_str(&line);
                        output.push('\n');
                    }
                }
            }
            number += 1;
        }
    }

    output.trim_end().to_string()
}

/// `"{n}. {word} {wordclass} {inflection}"`, skipping absent parts.
pub fn word_line(word: &TranslatedWord, number: usize) -> String {
    let mut parts = vec![format!("{}.", number), word.word.clone()];
    parts.extend(word.wordclass.iter().cloned());
    parts.extend(word.inflection.iter().cloned());
    parts.join(" ")
}

/// `"- {explanation} {combination} {word} - {example}"`, skipping absent parts.
pub fn detail_line(detail: &UsageDetail) -> String {
    let head: Vec<&str> = [&detail.category, &detail.explanation, &detail.combination, &detail.word]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();

    match &detail.example {
        Some(example) if head.is_empty() => format!("- {}", example),
        Some(example) => format!("- {} - {}", head.join(" "), example),
        None => format!("- {}", head.join(" ")),
    }
}

/// Every detail line of `word`, one per usage detail.
pub fn details_to_text(word: &TranslatedWord) -> String {
    word.details.iter().map(detail_line).collect::<Vec<_>>().join("\n")
}

/// Wrap text to specified line width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut result = Vec::new();
    let mut current_line = String::new();
    let mut current_length = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push_str(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_length += 1 + word_len;
        } else {
            result.push(current_line);
            current_line = format!("  {}", word);
            current_length = word_len + 2;
        }
    }

    if !current_line.is_empty() {
        result.push(current_line);
    }

    result
}
