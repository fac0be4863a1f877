// Chunk: docs/chunks/syntax_highlighting - Highlighter construction errors

use thiserror::Error;

/// Why a highlighter could not be built for a document.
///
/// None of these are fatal to editing: the engine falls back to a plain
/// grid that stays shape-correct but uncolored.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("no grammar for {language}")]
    NoGrammar { language: &'static str },

    #[error("parser rejected the {language} grammar: {source}")]
    Grammar {
        language: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },

    #[error("{language} highlight query failed to compile: {source}")]
    Query {
        language: &'static str,
        #[source]
        source: tree_sitter::QueryError,
    },

    #[error("initial parse of {language} source failed")]
    Parse { language: &'static str },
}
