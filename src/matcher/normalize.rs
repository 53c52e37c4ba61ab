

use std::collections::HashSet;


/// Lower-cases, blanks everything outside `[a-z0-9]` and whitespace, collapses and trims.
pub fn normalize(text: &str) -> String {
    let blanked: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();

    blanked.split_whitespace().collect::<Vec<_>>().join(" ")
}


/// Naive singularization: long tokens lose one trailing `s`.
pub fn stem(token: &str) -> &str {
    if token.chars().count() > 4 && token.ends_with('s') {
        &token[..token.len() - 1]
    } else {
        token
    }
}


#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
}

impl Tokenizer {
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: stop_words.into_iter().map(Into::into).collect(),
        }
    }


    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }


    pub fn tokenize(&self, text: &str) -> Vec<String> {
        normalize(text)
            .split(' ')
            .filter(|t| !t.is_empty() && !self.is_stop_word(t))
            .map(|t| stem(t).to_string())
            .collect()
    }


    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::patterns::STOP_WORDS;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(STOP_WORDS.iter().copied())
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("  What's your E-mail?! "), "what s your e mail");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("Full\t\tName\n(required)"), "full name required");
    }

    #[test]
    fn test_normalize_non_ascii_becomes_space() {
        assert_eq!(normalize("Prénom"), "pr nom");
        assert_eq!(normalize("名前"), "");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!."), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Your full legal name",
            "E-mail / Phone #",
            "  DOB (dd/mm/yyyy)  ",
            "Ünïcödé — text",
            "",
            "linkedin.com/in/someone",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_tokenize_drops_stop_words() {
        assert_eq!(
            tokenizer().tokenize("Please enter your full legal name"),
            vec!["full", "legal", "name"]
        );
    }

    #[test]
    fn test_tokenize_stems_long_plurals() {
        assert_eq!(tokenizer().tokenize("Skills and Hobbies"), vec!["skill", "hobbie"]);
        assert_eq!(tokenizer().tokenize("Years"), vec!["year"]);
        assert_eq!(tokenizer().tokenize("Bus gas"), vec!["bus", "gas"]);
    }

    #[test]
    fn test_tokenize_stop_words_checked_before_stemming() {
        assert!(tokenizer().tokenize("the of and").is_empty());
    }
}
