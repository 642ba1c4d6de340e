//! Estimated reading time

use lazy_static::lazy_static;
use regex::Regex;

/// Average reading speed
const WORDS_PER_MINUTE: usize = 225;

lazy_static! {
    static ref CODE_BLOCK: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`]*`").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref SYMBOLS: Regex = Regex::new(r"[#*_~\[\]()]").unwrap();
    static ref CITATION: Regex = Regex::new(r"【[^】]*】").unwrap();
}

/// Reading time in whole minutes (at least one) for markdown or plain text
pub fn calculate(content: &str) -> u32 {
    let clean = CODE_BLOCK.replace_all(content, "");
    let clean = INLINE_CODE.replace_all(&clean, "");
    let clean = LINK.replace_all(&clean, "$1");
    let clean = SYMBOLS.replace_all(&clean, "");
    let clean = CITATION.replace_all(&clean, "");

    let words = clean.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Format as "N min read"
pub fn format(minutes: u32) -> String {
    format!("{} min read", minutes)
}

/// Strip citation markers like `【772938094626183†L36-L39】`
pub fn remove_citation_markers(content: &str) -> String {
    CITATION.replace_all(content, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_one_minute() {
        assert_eq!(calculate(""), 1);
        assert_eq!(calculate("just a few words"), 1);
    }

    #[test]
    fn test_rounds_up() {
        let text = "word ".repeat(226);
        assert_eq!(calculate(&text), 2);
        let text = "word ".repeat(450);
        assert_eq!(calculate(&text), 2);
    }

    #[test]
    fn test_code_blocks_not_counted() {
        let code = format!("```\n{}\n```", "token ".repeat(1000));
        let text = format!("Intro paragraph.\n\n{}\n\nDone.", code);
        assert_eq!(calculate(&text), 1);
    }

    #[test]
    fn test_format_and_citations() {
        assert_eq!(format(5), "5 min read");
        assert_eq!(
            remove_citation_markers("Claim【772938094626183†L36-L39】 holds."),
            "Claim holds."
        );
    }
}
