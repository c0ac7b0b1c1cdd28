//! Printing tokenized lines.

use std::io::{self, Write};

use glint_profile::TokenClass;
use glint_tokenizer::TokenizedLine;
use serde::Serialize;

/// How tokens are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One `line:start..end class "text"` row per token.
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct LineReport<'a> {
    line: usize,
    #[serde(flatten)]
    result: &'a TokenizedLine,
}

/// Writes the tokens of one line. `number` is 1-based.
pub fn write_line(
    out: &mut impl Write,
    format: Format,
    number: usize,
    text: &str,
    result: &TokenizedLine,
    show_plain: bool,
) -> io::Result<()> {
    match format {
        Format::Json => {
            let report = LineReport {
                line: number,
                result,
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)
        }
        Format::Text => {
            for token in &result.tokens {
                if token.class == TokenClass::Plain && !show_plain {
                    continue;
                }
                writeln!(
                    out,
                    "{}:{}..{} {} {:?}",
                    number,
                    token.start,
                    token.end,
                    token.class,
                    token.text(text)
                )?;
            }
            for anomaly in &result.anomalies {
                writeln!(
                    out,
                    "{}:{}..{} ! {:?}",
                    number, anomaly.start, anomaly.end, anomaly.kind
                )?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_profile::ProfileRegistry;
    use glint_tokenizer::{ContinuationState, tokenize_line};

    fn render(format: Format, line: &str, show_plain: bool) -> String {
        let registry = ProfileRegistry::builtin().unwrap();
        let rust = registry.get("rust").unwrap();
        let result = tokenize_line(&rust, line, ContinuationState::None);

        let mut out = Vec::new();
        write_line(&mut out, format, 3, line, &result, show_plain).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_output() {
        let out = render(Format::Text, "let x", false);
        assert_eq!(out, "3:0..3 keyword_weak \"let\"\n3:4..5 identifier_lower \"x\"\n");
    }

    #[test]
    fn test_text_output_with_plain() {
        let out = render(Format::Text, "let x", true);
        assert!(out.contains("3:3..4 plain \" \""));
    }

    #[test]
    fn test_json_output() {
        let out = render(Format::Json, "\"abc", false);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["line"], 3);
        assert_eq!(value["tokens"][0]["class"], "string_normal");
        assert_eq!(value["outgoing"]["in_string"], 5);
    }
}
