//! Keyword-card geometry deck parser.
//!
//! Decks are line oriented: a header line starting with `*` names a card and
//! carries comma-separated `KEY=VALUE` parameters, followed by data lines
//! until the next header. Lines starting with `**` are comments.

use std::fs;
use std::path::Path;

use crate::GridError;

#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub parameters: Vec<Parameter>,
    pub data_lines: Vec<String>,
    /// 1-based line number of the card header, for error reporting.
    pub line_start: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub key: String,
    pub value: Option<String>,
}

impl Card {
    /// Look up a parameter value by (case-insensitive) key.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key == key.to_ascii_uppercase())
            .and_then(|p| p.value.as_deref())
    }
}

impl Deck {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_str(&raw)
    }

    pub fn parse_str(raw: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = raw.lines().collect();
        let mut cards = Vec::new();
        let mut i = 0usize;

        while i < lines.len() {
            let trimmed = lines[i].trim();

            if trimmed.is_empty() || is_comment(trimmed) {
                i += 1;
                continue;
            }

            if !trimmed.starts_with('*') {
                return Err(GridError::parse(
                    i + 1,
                    "expected card header starting with '*'",
                ));
            }

            let line_start = i + 1;
            let header = trimmed.trim_start_matches('*').trim();
            i += 1;
            if header.is_empty() {
                // Bare "*" lines are tolerated as visual separators.
                continue;
            }

            let (keyword, parameters) = parse_header(header, line_start)?;

            let mut data_lines = Vec::new();
            while i < lines.len() {
                let candidate = lines[i].trim();
                if candidate.is_empty() || is_comment(candidate) {
                    i += 1;
                    continue;
                }
                if candidate.starts_with('*') {
                    break;
                }
                data_lines.push(candidate.to_string());
                i += 1;
            }

            cards.push(Card {
                keyword,
                parameters,
                data_lines,
                line_start,
            });
        }

        Ok(Deck { cards })
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with("**")
}

fn parse_header(header: &str, line: usize) -> Result<(String, Vec<Parameter>), GridError> {
    let mut fields = header.split(',');
    let keyword_raw = fields.next().unwrap_or("").trim();
    if keyword_raw.is_empty() {
        return Err(GridError::parse(line, "empty card keyword"));
    }
    let keyword = keyword_raw.to_ascii_uppercase();

    let mut parameters = Vec::new();
    for part in fields {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if let Some((k, v)) = item.split_once('=') {
            parameters.push(Parameter {
                key: k.trim().to_ascii_uppercase(),
                value: Some(v.trim().to_string()),
            });
        } else {
            parameters.push(Parameter {
                key: item.to_ascii_uppercase(),
                value: None,
            });
        }
    }

    Ok((keyword, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cards_and_data() {
        let src = r#"
** unit square
*NODE
1, 0.0, 0.0, 0.0
2, 1.0, 0.0, 0.0
*ELEMENT, TYPE=TET4, ELSET=Inner
1, 1, 2, 3, 4
"#;

        let deck = Deck::parse_str(src).expect("deck should parse");
        assert_eq!(deck.cards.len(), 2);
        assert_eq!(deck.cards[0].keyword, "NODE");
        assert_eq!(deck.cards[0].data_lines.len(), 2);
        assert_eq!(deck.cards[1].keyword, "ELEMENT");
        assert_eq!(deck.cards[1].parameter("TYPE"), Some("TET4"));
        assert_eq!(deck.cards[1].parameter("elset"), Some("Inner"));
    }

    #[test]
    fn rejects_orphan_data_before_first_card() {
        let src = "1,2,3\n*NODE\n1,0,0,0\n";
        let err = Deck::parse_str(src).expect_err("should fail");
        match err {
            GridError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tolerates_separator_star_and_comments() {
        let src = "**header\n*\n*NSET, NSET=bnd\n1, 2\n";
        let deck = Deck::parse_str(src).expect("deck should parse");
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].keyword, "NSET");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Deck::parse_file("does/not/exist.grid").expect_err("should fail");
        assert!(matches!(err, GridError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.grid"));
    }
}
