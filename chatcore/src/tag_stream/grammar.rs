//! Bracketed tag grammar: `[NAME]` opens a section, `[/NAME]` closes it.
//!
//! `NAME` is matched case-insensitively against a closed set — there is no
//! open-ended tag-handler registry. Two of the eight kinds are synthetic:
//! `FullText` and `Debug` are never opened by the model, only emitted by the
//! processor itself.

/// Maximum size of the carry buffer before an unresolved `[` prefix is
/// flushed as literal content. Guards against a pathological stream that
/// never closes a bracket.
pub(super) const MAX_CARRY: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    Plan,
    Reasoning,
    Tool,
    Status,
    Summary,
    Text,
    /// Synthetic companion to `Text`, emitted once at end of stream.
    FullText,
    /// Synthetic, emitted once at end of stream with the raw concatenation
    /// of every token fed to the processor.
    Debug,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TagMode {
    Stream,
    Buffer,
}

impl TagKind {
    /// Matches a bracket body's tag name case-insensitively. Returns `None`
    /// for anything outside the closed set (including `full_text` and
    /// `debug`, which a model is never allowed to open directly).
    pub(super) fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "PLAN" => Some(TagKind::Plan),
            "REASONING" => Some(TagKind::Reasoning),
            "TOOL" => Some(TagKind::Tool),
            "STATUS" => Some(TagKind::Status),
            "SUMMARY" => Some(TagKind::Summary),
            "TEXT" => Some(TagKind::Text),
            _ => None,
        }
    }

    pub(super) fn mode(self) -> TagMode {
        match self {
            TagKind::Text => TagMode::Stream,
            TagKind::Plan
            | TagKind::Reasoning
            | TagKind::Tool
            | TagKind::Status
            | TagKind::Summary
            | TagKind::FullText
            | TagKind::Debug => TagMode::Buffer,
        }
    }
}

/// Body between `[` and `]`, split into close-flag and name.
pub(super) struct BracketBody<'a> {
    pub is_close: bool,
    pub name: &'a str,
}

pub(super) fn split_bracket_body(body: &str) -> BracketBody<'_> {
    match body.strip_prefix('/') {
        Some(rest) => BracketBody {
            is_close: true,
            name: rest,
        },
        None => BracketBody {
            is_close: false,
            name: body,
        },
    }
}
