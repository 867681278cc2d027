use std::collections::BTreeMap;

use ordbog_core::{DictionaryCode, LookupResult, TranslatedWord, UsageDetail, WordSuggestion};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Ordbog".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Look words up on ordbogen.com\n".dimmed());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Print one numbered word line
pub fn print_word(word: &TranslatedWord, number: usize) {
    println!(
        "    {}. {} {} {}",
        number,
        word.word.red(),
        or_empty(&word.wordclass).blue(),
        or_empty(&word.inflection).cyan()
    );
}

/// Colored counterpart of the plain text detail line, with the same fields.
fn detail_line(detail: &UsageDetail) -> String {
    let head: Vec<String> = [
        detail.category.as_deref().map(|s| s.yellow().to_string()),
        detail.explanation.as_deref().map(|s| s.green().to_string()),
        detail.combination.as_deref().map(|s| s.cyan().to_string()),
        detail.word.as_deref().map(|s| s.dimmed().to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    match &detail.example {
        Some(example) if head.is_empty() => format!("- {}", example.magenta()),
        Some(example) => format!("- {} - {}", head.join(" "), example.magenta()),
        None => format!("- {}", head.join(" ")),
    }
}

/// Print one usage detail line
pub fn print_detail(detail: &UsageDetail) {
    println!("{}", detail_line(detail));
}

/// Print a lookup result grouped by language, numbering words from 1
pub fn print_result(result: &LookupResult) {
    if result.is_empty() {
        print_info("No results");
        return;
    }

    let mut number = 1;
    for group in result.groups() {
        println!("{}", group.language.bold());
        for word in &group.words {
            print_word(word, number);
            number += 1;
        }
    }
}

/// Print the usage details of one word
pub fn print_details(word: &TranslatedWord) {
    println!("{} {}", word.word.red().bold(), or_empty(&word.comment).dimmed());
    if word.details.is_empty() {
        print_info("No usage details");
    }
    for detail in &word.details {
        print_detail(detail);
    }
}

/// Print word suggestions
pub fn print_suggestions(suggestions: &[WordSuggestion]) {
    for suggestion in suggestions {
        println!("{} {}", suggestion.word, format!("({})", suggestion.dictionary).dimmed());
    }
}

/// Print dictionaries with their codes
pub fn print_dictionaries(dictionaries: &BTreeMap<DictionaryCode, &'static str>, active: DictionaryCode) {
    for (code, name) in dictionaries {
        let marker = if *code == active { "*" } else { " " };
        println!("{} {} {}", marker.green(), code.as_str().bright_white(), name.dimmed());
    }
}

/// Print the interactive command reference
pub fn print_help() {
    println!("{}", "Commands".bold().cyan());
    println!("  {:<12} {}", ".exit", "quit".dimmed());
    println!("  {:<12} {}", ".dicts", "list available dictionaries".dimmed());
    println!("  {:<12} {}", "_dict=CODE", "switch dictionary".dimmed());
    println!("  {:<12} {}", "N", "show details for word N of the last lookup".dimmed());
    println!("  {:<12} {}", ".help", "show this help".dimmed());
    println!("  {}", "Anything else is looked up.".dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_line_shows_every_field() {
        let detail = UsageDetail {
            category: Some("zoologi".to_string()),
            example: Some("a cat".to_string()),
            explanation: Some("(dyr)".to_string()),
            combination: Some("sort kat".to_string()),
            word: Some("cat".to_string()),
        };
        let line = detail_line(&detail);

        for part in ["zoologi", "(dyr)", "sort kat", "cat", "a cat"] {
            assert!(line.contains(part), "missing {part} in {line}");
        }
        assert!(line.find("zoologi").unwrap() < line.find("(dyr)").unwrap());
    }

    #[test]
    fn test_detail_line_without_example() {
        let detail = UsageDetail { category: Some("zoologi".to_string()), ..Default::default() };
        let line = detail_line(&detail);
        assert!(line.starts_with("- "));
        assert!(line.contains("zoologi"));
        assert!(!line.contains(" - "));
    }
}
