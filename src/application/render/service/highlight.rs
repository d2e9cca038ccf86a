use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};
use thiserror::Error;

/// Why a code block could not be highlighted. Callers treat every variant the
/// same way and fall back to escaped plain text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    #[error("language `{language}` is not supported")]
    Unsupported { language: String },
    #[error("highlighting `{language}` failed: {message}")]
    Failed { language: String, message: String },
}

/// Syntax highlighting collaborator used for `codeBlock` nodes.
pub trait Highlighter: Send + Sync {
    /// Produce escaped, highlighted markup for `code` in `language`.
    fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError>;

    /// Language tokens this highlighter understands.
    fn languages(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Syntect-backed highlighter emitting `syntax-` prefixed CSS classes.
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    class_style: ClassStyle,
}

impl SyntectHighlighter {
    pub fn new(syntax_set: SyntaxSet) -> Self {
        Self {
            syntax_set,
            class_style: ClassStyle::SpacedPrefixed { prefix: "syntax-" },
        }
    }

    fn find_syntax(&self, token: &str) -> Option<&SyntaxReference> {
        let lowercase = token.to_ascii_lowercase();
        self.syntax_set
            .find_syntax_by_token(&lowercase)
            .or_else(|| self.syntax_set.find_syntax_by_name(token))
            .or_else(|| self.syntax_set.find_syntax_by_extension(&lowercase))
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError> {
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| HighlightError::Unsupported {
                language: language.to_string(),
            })?;

        let appended_newline = !code.ends_with('\n');
        let mut code_with_newline = code.to_string();
        if appended_newline {
            code_with_newline.push('\n');
        }

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, self.class_style);

        for line in LinesWithEndings::from(code_with_newline.as_str()) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|err| HighlightError::Failed {
                    language: language.to_string(),
                    message: err.to_string(),
                })?;
        }

        let html = generator.finalize();
        Ok(if appended_newline {
            strip_trailing_newline(html)
        } else {
            html
        })
    }

    fn languages(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .syntax_set
            .syntaxes()
            .iter()
            .flat_map(|syntax| syntax.file_extensions.iter().cloned())
            .collect();
        tokens.sort();
        tokens.dedup();
        tokens
    }
}

/// Drop the final newline when only closing tags follow it.
fn strip_trailing_newline(mut html: String) -> String {
    if let Some(index) = html.rfind('\n')
        && html[index + 1..].split("</span>").all(str::is_empty)
    {
        html.remove(index);
    }
    html
}

/// Highlighter that supports no language; every code block renders as plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextHighlighter;

impl Highlighter for PlainTextHighlighter {
    fn highlight(&self, language: &str, _code: &str) -> Result<String, HighlightError> {
        Err(HighlightError::Unsupported {
            language: language.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntect::dumps::from_uncompressed_data;

    fn highlighter() -> SyntectHighlighter {
        let syntax_set: SyntaxSet =
            from_uncompressed_data(include_bytes!(env!("SYNTAX_PACK_FILE")))
                .expect("syntax pack must be valid");
        SyntectHighlighter::new(syntax_set)
    }

    #[test]
    fn highlights_known_language_with_prefixed_classes() {
        let html = highlighter()
            .highlight("rust", "fn main() {}")
            .expect("rust is supported");

        assert!(html.contains("class=\"syntax-"), "{html}");
        assert!(html.contains("main"));
    }

    #[test]
    fn highlighted_output_keeps_the_source_line_count() {
        let single = highlighter()
            .highlight("rust", "fn main() {}")
            .expect("rust is supported");
        assert!(!single.contains('\n'), "{single:?}");

        let two_lines = highlighter()
            .highlight("rust", "let a = 1;\nlet b = 2;")
            .expect("rust is supported");
        assert_eq!(two_lines.matches('\n').count(), 1, "{two_lines:?}");

        let trailing = highlighter()
            .highlight("rust", "let a = 1;\n")
            .expect("rust is supported");
        assert_eq!(trailing.matches('\n').count(), 1, "{trailing:?}");
    }

    #[test]
    fn trailing_newline_is_only_stripped_before_closing_tags() {
        assert_eq!(
            strip_trailing_newline("<span>x\n</span></span>".to_string()),
            "<span>x</span></span>"
        );
        assert_eq!(strip_trailing_newline("x\n".to_string()), "x");
        assert_eq!(
            strip_trailing_newline("a\n<span>b</span>".to_string()),
            "a\n<span>b</span>"
        );
    }

    #[test]
    fn resolves_tokens_case_insensitively() {
        assert!(highlighter().highlight("Python", "x = 1").is_ok());
    }

    #[test]
    fn escapes_markup_inside_highlighted_code() {
        let html = highlighter()
            .highlight("html", "<b>bold</b>")
            .expect("html is supported");
        assert!(!html.contains("<b>"), "{html}");
        assert!(html.contains("&lt;"), "{html}");
    }

    #[test]
    fn unknown_language_is_unsupported() {
        let err = highlighter()
            .highlight("unknownlang", "<b>")
            .expect_err("language is not bundled");
        assert_eq!(
            err,
            HighlightError::Unsupported {
                language: "unknownlang".into()
            }
        );
    }

    #[test]
    fn plain_text_highlighter_supports_nothing() {
        assert!(PlainTextHighlighter.highlight("rust", "fn x() {}").is_err());
        assert!(PlainTextHighlighter.languages().is_empty());
    }

    #[test]
    fn lists_bundled_language_tokens() {
        let languages = highlighter().languages();
        assert!(languages.iter().any(|token| token == "rs"));
        assert!(languages.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
