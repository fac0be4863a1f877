// Chunk: docs/chunks/syntax_highlighting - Catppuccin Mocha color buckets for the color grid

//! Syntax theme mapping capture names and node kinds to color ids.
//!
//! The theme owns a palette of styles. A `ColorId` is an index into that
//! palette. Two lookup tables feed the grid:
//!
//! - capture names from highlight queries ("keyword", "string", ...), with
//!   dotted names falling back to their prefixes;
//! - node kinds from the syntax tree ("line_comment", "string_literal", ...),
//!   used by the structural pass before queries run.

use crate::color_grid::{ColorId, UNRESOLVED};
use quill_buffer::Style;
use std::collections::HashMap;

/// Catppuccin Mocha color palette constants.
mod catppuccin {
    use quill_buffer::Color;

    // Accent colors
    pub const MAUVE: Color = Color::hex(0xcba6f7);
    pub const BLUE: Color = Color::hex(0x89b4fa);
    pub const SAPPHIRE: Color = Color::hex(0x74c7ec);
    pub const GREEN: Color = Color::hex(0xa6e3a1);
    pub const PINK: Color = Color::hex(0xf5c2e7);
    pub const PEACH: Color = Color::hex(0xfab387);
    pub const YELLOW: Color = Color::hex(0xf9e2af);
    pub const MAROON: Color = Color::hex(0xeba0ac);
    pub const RED: Color = Color::hex(0xf38ba8);
    pub const LAVENDER: Color = Color::hex(0xb4befe);
    pub const SKY: Color = Color::hex(0x89dceb);

    // Surface/text colors
    pub const OVERLAY0: Color = Color::hex(0x6c7086);
    pub const SUBTEXT0: Color = Color::hex(0xa6adc8);
}

/// Capture name and style of every color bucket. The position in this
/// table is the bucket's `ColorId`.
const MOCHA: &[(&str, Style)] = &[
    ("keyword", Style::fg(catppuccin::MAUVE)),
    ("function", Style::fg(catppuccin::BLUE)),
    ("function.method", Style::fg(catppuccin::BLUE)),
    ("function.macro", Style::fg(catppuccin::MAUVE)),
    ("type", Style::fg(catppuccin::YELLOW)),
    ("type.builtin", Style::fg(catppuccin::YELLOW).italic()),
    ("constructor", Style::fg(catppuccin::SAPPHIRE)),
    ("string", Style::fg(catppuccin::GREEN)),
    ("escape", Style::fg(catppuccin::PINK)),
    ("constant", Style::fg(catppuccin::PEACH)),
    ("constant.builtin", Style::fg(catppuccin::PEACH)),
    ("number", Style::fg(catppuccin::PEACH)),
    ("comment", Style::fg(catppuccin::OVERLAY0).italic()),
    ("comment.documentation", Style::fg(catppuccin::OVERLAY0).italic()),
    ("variable.parameter", Style::fg(catppuccin::MAROON).italic()),
    ("variable.builtin", Style::fg(catppuccin::RED)),
    ("property", Style::fg(catppuccin::LAVENDER)),
    ("label", Style::fg(catppuccin::SAPPHIRE).italic()),
    ("punctuation.bracket", Style::fg(catppuccin::SUBTEXT0)),
    ("punctuation.delimiter", Style::fg(catppuccin::SUBTEXT0)),
    ("punctuation.special", Style::fg(catppuccin::SUBTEXT0)),
    ("operator", Style::fg(catppuccin::SKY)),
    ("attribute", Style::fg(catppuccin::YELLOW)),
    ("tag", Style::fg(catppuccin::BLUE).bold()),
];

/// Node kinds colored by the structural pass, and the bucket they take.
///
/// Only leaf-ish kinds whose meaning is the same in every grammar belong
/// here. Anything finer is left to the highlight query.
const NODE_KINDS: &[(&str, &str)] = &[
    ("comment", "comment"),
    ("line_comment", "comment"),
    ("block_comment", "comment"),
    ("string", "string"),
    ("string_literal", "string"),
    ("raw_string_literal", "string"),
    ("char_literal", "string"),
    ("template_string", "string"),
    ("interpreted_string_literal", "string"),
    ("raw_string", "string"),
    ("attribute_value", "string"),
    ("escape_sequence", "escape"),
    ("integer_literal", "number"),
    ("float_literal", "number"),
    ("number_literal", "number"),
    ("int_literal", "number"),
    ("number", "number"),
    ("integer", "number"),
    ("float", "number"),
    ("primitive_type", "type.builtin"),
    ("type_identifier", "type"),
    ("boolean_literal", "constant.builtin"),
    ("true", "constant.builtin"),
    ("false", "constant.builtin"),
    ("null", "constant.builtin"),
    ("none", "constant.builtin"),
    ("tag_name", "tag"),
];

/// Maps capture names and node kinds to palette entries.
///
/// When looking up a capture like "function.method.call", it first tries
/// the exact match, then falls back to prefix matches ("function.method",
/// then "function").
#[derive(Debug, Clone)]
pub struct SyntaxTheme {
    palette: Vec<Style>,
    captures: HashMap<&'static str, ColorId>,
    node_kinds: HashMap<&'static str, ColorId>,
}

impl SyntaxTheme {
    /// Creates the Catppuccin Mocha syntax theme.
    pub fn catppuccin_mocha() -> Self {
        let mut palette = Vec::with_capacity(MOCHA.len());
        let mut captures = HashMap::with_capacity(MOCHA.len());
        for (id, (name, style)) in MOCHA.iter().enumerate() {
            palette.push(*style);
            captures.insert(*name, id as ColorId);
        }

        let node_kinds = NODE_KINDS
            .iter()
            .filter_map(|(kind, capture)| captures.get(capture).map(|id| (*kind, *id)))
            .collect();

        Self {
            palette,
            captures,
            node_kinds,
        }
    }

    /// Returns the color id for a capture name, trying progressively shorter
    /// dotted prefixes. `UNRESOLVED` if nothing matches.
    pub fn color_for_capture(&self, name: &str) -> ColorId {
        if let Some(id) = self.captures.get(name) {
            return *id;
        }

        let mut prefix = name;
        while let Some(dot_pos) = prefix.rfind('.') {
            prefix = &prefix[..dot_pos];
            if let Some(id) = self.captures.get(prefix) {
                return *id;
            }
        }

        UNRESOLVED
    }

    /// Returns the color id the structural pass assigns to a node kind.
    pub fn color_for_node_kind(&self, kind: &str) -> Option<ColorId> {
        self.node_kinds.get(kind).copied()
    }

    /// Resolves a color id to its style. `UNRESOLVED` and unknown ids are
    /// the default style.
    pub fn style(&self, id: ColorId) -> Style {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.palette.get(i))
            .copied()
            .unwrap_or_default()
    }

    /// Number of color buckets.
    pub fn len(&self) -> usize {
        self.palette.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}
