pub mod splitter;

use std::path::Path;

use anyhow::{Context, Result};

use splitter::{closes_fence, opens_fence};

#[derive(Debug, Clone)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone)]
pub struct Slide {
    /// Text of the first heading, if any.
    pub title: Option<String>,
    /// Content elements, revealed one by one as they become visible.
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String> },
    Code { language: Option<String>, code: String },
    Quote { text: String },
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let deck = Self::parse(&content);
        if deck.slides.is_empty() {
            anyhow::bail!("No slides found in {}", path.display());
        }
        tracing::info!(path = %path.display(), slides = deck.len(), "deck loaded");
        Ok(deck)
    }

    pub fn parse(source: &str) -> Self {
        let slides = splitter::split(source)
            .iter()
            .map(|raw| Slide::parse(raw))
            .collect();
        Self { slides }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Number of content elements on each slide.
    pub fn element_counts(&self) -> Vec<usize> {
        self.slides.iter().map(|s| s.blocks.len()).collect()
    }

    pub fn title(&self) -> Option<&str> {
        self.slides.first().and_then(|s| s.title.as_deref())
    }
}

impl Slide {
    pub fn parse(raw: &str) -> Self {
        let blocks = parse_blocks(raw);
        let title = blocks.iter().find_map(|b| match b {
            Block::Heading { text, .. } => Some(text.clone()),
            _ => None,
        });
        Self { title, blocks }
    }
}

fn parse_blocks(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut lines = raw.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if let Some((c, len)) = opens_fence(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let language = trimmed.trim_start_matches(c).trim();
            let language = (!language.is_empty()).then(|| language.to_string());
            let mut code = Vec::new();
            for inner in lines.by_ref() {
                if closes_fence(inner.trim(), c, len) {
                    break;
                }
                code.push(inner);
            }
            blocks.push(Block::Code {
                language,
                code: code.join("\n"),
            });
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some((level, text)) = heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
            continue;
        }

        paragraph.push(trimmed);
    }
    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?;
    Some((level as u8, text.trim()))
}

fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    let block = if lines.iter().all(|l| list_item(l).is_some()) {
        Block::List {
            items: lines
                .iter()
                .filter_map(|l| list_item(l))
                .map(|s| s.trim().to_string())
                .collect(),
        }
    } else if lines.iter().all(|l| l.starts_with('>')) {
        Block::Quote {
            text: lines
                .iter()
                .map(|l| l.trim_start_matches('>').trim())
                .collect::<Vec<_>>()
                .join(" "),
        }
    } else {
        Block::Paragraph {
            text: lines.join(" "),
        }
    };
    blocks.push(block);
    lines.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slides_and_titles() {
        let deck = Deck::parse("# Intro\n\nHello there\n\n# Second\n\nMore");
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.title(), Some("Intro"));
        assert_eq!(deck.slides[1].title.as_deref(), Some("Second"));
        assert_eq!(deck.element_counts(), vec![2, 2]);
    }

    #[test]
    fn test_block_kinds() {
        let slide = Slide::parse(
            "## Agenda\n\n- one\n- two\n\n> be brief\n\nplain\ntext\n\n```rust\nfn main() {}\n\n```",
        );
        assert_eq!(
            slide.blocks,
            vec![
                Block::Heading {
                    level: 2,
                    text: "Agenda".into()
                },
                Block::List {
                    items: vec!["one".into(), "two".into()]
                },
                Block::Quote {
                    text: "be brief".into()
                },
                Block::Paragraph {
                    text: "plain text".into()
                },
                Block::Code {
                    language: Some("rust".into()),
                    code: "fn main() {}\n".into()
                },
            ]
        );
    }

    #[test]
    fn test_hash_without_space_is_text() {
        let slide = Slide::parse("#hashtag");
        assert_eq!(slide.title, None);
        assert!(matches!(slide.blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_unterminated_fence_takes_rest() {
        let slide = Slide::parse("```\nline one\nline two");
        assert_eq!(slide.blocks.len(), 1);
        assert!(matches!(&slide.blocks[0], Block::Code { language: None, code } if code == "line one\nline two"));
    }

    #[test]
    fn test_empty_source_has_no_slides() {
        assert_eq!(Deck::parse("").len(), 0);
    }

    #[test]
    fn test_sample_presentation_parses() {
        let source = include_str!("../../../../sample-presentations/github-actions.md");
        let deck = Deck::parse(source);
        assert_eq!(deck.len(), 12);
        assert_eq!(deck.title(), Some("GitHub Actions"));
        assert!(deck.element_counts().iter().all(|n| *n >= 2));
        assert!(deck.slides[5]
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Code { language: Some(l), .. } if l == "yaml")));
    }

    #[test]
    fn test_load_rejects_deck_without_slides() {
        let dir = std::env::temp_dir().join(format!("slidedeck-deck-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("blank.md");
        std::fs::write(&path, "\n\n   \n\n").unwrap();

        let err = Deck::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("No slides found in"), "{err}");

        std::fs::write(&path, "# Only\n").unwrap();
        assert_eq!(Deck::load(&path).unwrap().len(), 1);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let path = std::env::temp_dir().join("slidedeck-missing-deck.md");
        let err = Deck::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"), "{err}");
    }
}

