// Chunk: docs/chunks/syntax_highlighting - Closed language set with grammars and comment rules

//! The languages the editor knows about.
//!
//! A document picks its [`Language`] once, from the file extension, when it
//! is opened. Everything language-specific hangs off that enum: the
//! tree-sitter grammar, the highlight query, the comment syntax and the id
//! reported to protocol clients.

use std::path::Path;
use std::sync::OnceLock;

/// Comment syntax used by the comment toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// A token that comments out the rest of the line, e.g. `//`.
    Line(&'static str),
    /// A delimiter pair wrapped around the line, e.g. `<!--` and `-->`.
    Block {
        open: &'static str,
        close: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Rust,
    C,
    Cpp,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    Json,
    Toml,
    Html,
    Css,
    Bash,
    #[default]
    PlainText,
}

impl Language {
    pub const ALL: [Language; 14] = [
        Language::Rust,
        Language::C,
        Language::Cpp,
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Tsx,
        Language::Go,
        Language::Json,
        Language::Toml,
        Language::Html,
        Language::Css,
        Language::Bash,
        Language::PlainText,
    ];

    /// Maps a file extension (with or without the leading dot) to a language.
    /// Unknown extensions are plain text.
    pub fn from_extension(ext: &str) -> Language {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Language::Rust,
            "c" => Language::C,
            // .h is ambiguous, default to C++
            "cpp" | "cc" | "cxx" | "hpp" | "h" => Language::Cpp,
            "py" => Language::Python,
            "js" | "jsx" | "mjs" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "go" => Language::Go,
            "json" => Language::Json,
            "toml" => Language::Toml,
            "html" | "htm" => Language::Html,
            "css" => Language::Css,
            "sh" | "bash" | "zsh" => Language::Bash,
            _ => Language::PlainText,
        }
    }

    /// Picks the language for a path from its extension.
    pub fn from_path(path: &Path) -> Language {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Language::PlainText, Language::from_extension)
    }

    /// The language identifier reported to protocol clients.
    pub fn id(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "typescriptreact",
            Language::Go => "go",
            Language::Json => "json",
            Language::Toml => "toml",
            Language::Html => "html",
            Language::Css => "css",
            Language::Bash => "shellscript",
            Language::PlainText => "plaintext",
        }
    }

    /// Returns the tree-sitter grammar, or `None` for plain text.
    pub fn grammar(self) -> Option<tree_sitter::Language> {
        let lang = match self {
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Json => tree_sitter_json::LANGUAGE.into(),
            Language::Toml => tree_sitter_toml_ng::LANGUAGE.into(),
            Language::Html => tree_sitter_html::LANGUAGE.into(),
            Language::Css => tree_sitter_css::LANGUAGE.into(),
            Language::Bash => tree_sitter_bash::LANGUAGE.into(),
            Language::PlainText => return None,
        };
        Some(lang)
    }

    /// Returns the highlight query source, or `None` for plain text.
    pub fn highlights_query(self) -> Option<&'static str> {
        let query = match self {
            Language::Rust => tree_sitter_rust::HIGHLIGHTS_QUERY,
            Language::C => tree_sitter_c::HIGHLIGHT_QUERY,
            // The C++ query only covers C++-specific constructs; types,
            // keywords and functions come from the C query.
            Language::Cpp => layered(&CPP_QUERY, tree_sitter_c::HIGHLIGHT_QUERY, tree_sitter_cpp::HIGHLIGHT_QUERY),
            Language::Python => tree_sitter_python::HIGHLIGHTS_QUERY,
            Language::JavaScript => tree_sitter_javascript::HIGHLIGHT_QUERY,
            // TypeScript (and TSX) layer on top of the JavaScript query.
            Language::TypeScript | Language::Tsx => layered(
                &TS_QUERY,
                tree_sitter_javascript::HIGHLIGHT_QUERY,
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
            ),
            Language::Go => tree_sitter_go::HIGHLIGHTS_QUERY,
            Language::Json => tree_sitter_json::HIGHLIGHTS_QUERY,
            Language::Toml => tree_sitter_toml_ng::HIGHLIGHTS_QUERY,
            Language::Html => tree_sitter_html::HIGHLIGHTS_QUERY,
            Language::Css => tree_sitter_css::HIGHLIGHTS_QUERY,
            Language::Bash => tree_sitter_bash::HIGHLIGHT_QUERY,
            Language::PlainText => return None,
        };
        Some(query)
    }

    /// Returns the comment syntax, or `None` if the language has no comments.
    pub fn comment_style(self) -> Option<CommentStyle> {
        match self {
            Language::Rust
            | Language::C
            | Language::Cpp
            | Language::JavaScript
            | Language::TypeScript
            | Language::Tsx
            | Language::Go => Some(CommentStyle::Line("//")),
            Language::Python | Language::Toml | Language::Bash => Some(CommentStyle::Line("#")),
            Language::Html => Some(CommentStyle::Block {
                open: "<!--",
                close: "-->",
            }),
            Language::Css => Some(CommentStyle::Block {
                open: "/*",
                close: "*/",
            }),
            Language::Json | Language::PlainText => None,
        }
    }
}

static CPP_QUERY: OnceLock<String> = OnceLock::new();
static TS_QUERY: OnceLock<String> = OnceLock::new();

fn layered(cell: &'static OnceLock<String>, base: &str, extra: &str) -> &'static str {
    cell.get_or_init(|| format!("{base}\n{extra}")).as_str()
}
