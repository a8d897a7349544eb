//! Output rendering for command results.
//!
//! Text output keeps the classic `snippets` wording; JSON output serializes
//! core types directly.

use crate::args::OutputFormat;
use snippets_core::Snippet;

/// Successful command result, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Stored(Snippet),
    Retrieved(Snippet),
    Catalog(Vec<String>),
    Matches(Vec<Snippet>),
}

pub fn render(output: &CommandOutput, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(output)),
        OutputFormat::Json => render_json(output),
    }
}

/// Warning printed when `get` finds nothing.
pub fn not_available(keyword: &str) -> String {
    format!("Keyword: {} not available", quote(keyword))
}

fn render_text(output: &CommandOutput) -> String {
    match output {
        CommandOutput::Stored(snippet) => format!(
            "Stored {} as {}",
            quote(&snippet.message),
            quote(&snippet.keyword)
        ),
        CommandOutput::Retrieved(snippet) => {
            format!("Retrieved snippet: {}", quote(&snippet.message))
        }
        CommandOutput::Catalog(keywords) => {
            let quoted = keywords
                .iter()
                .map(|keyword| quote(keyword))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Available keywords: [{quoted}]")
        }
        CommandOutput::Matches(snippets) => snippets
            .iter()
            .map(|snippet| {
                format!(
                    "Keyword:{}  Snippet:{}",
                    quote(&snippet.keyword),
                    quote(&snippet.message)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_json(output: &CommandOutput) -> Result<String, serde_json::Error> {
    match output {
        CommandOutput::Stored(snippet) | CommandOutput::Retrieved(snippet) => {
            serde_json::to_string_pretty(snippet)
        }
        CommandOutput::Catalog(keywords) => serde_json::to_string_pretty(keywords),
        CommandOutput::Matches(snippets) => serde_json::to_string_pretty(snippets),
    }
}

/// Single-quotes `value`, escaping backslashes, quotes and control characters.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            ch if ch.is_control() => quoted.push_str(&format!("\\x{:02x}", u32::from(ch))),
            ch => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::{not_available, quote, render, CommandOutput};
    use crate::args::OutputFormat;
    use snippets_core::Snippet;

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b\nc"), "'a\\\\b\\nc'");
        assert_eq!(quote("bell\u{7}"), "'bell\\x07'");
    }

    #[test]
    fn text_output_matches_classic_wording() {
        let stored = CommandOutput::Stored(Snippet::new("greet", "hi"));
        assert_eq!(
            render(&stored, OutputFormat::Text).unwrap(),
            "Stored 'hi' as 'greet'"
        );

        let catalog = CommandOutput::Catalog(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            render(&catalog, OutputFormat::Text).unwrap(),
            "Available keywords: ['a', 'b']"
        );

        let matches = CommandOutput::Matches(vec![
            Snippet::new("x", "Hello World"),
            Snippet::new("y", "goodbye"),
        ]);
        assert_eq!(
            render(&matches, OutputFormat::Text).unwrap(),
            "Keyword:'x'  Snippet:'Hello World'\nKeyword:'y'  Snippet:'goodbye'"
        );

        assert_eq!(not_available("nope"), "Keyword: 'nope' not available");
    }

    #[test]
    fn json_output_serializes_snippets() {
        let retrieved = CommandOutput::Retrieved(Snippet::new("k", "50% off"));
        let rendered = render(&retrieved, OutputFormat::Json).unwrap();
        let parsed: Snippet = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, Snippet::new("k", "50% off"));
    }
}
