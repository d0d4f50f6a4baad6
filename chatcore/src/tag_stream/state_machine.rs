use super::grammar::{split_bracket_body, TagKind, TagMode, MAX_CARRY};
use super::TagEvent;

/// Streaming tag demultiplexer.
///
/// Feed it LLM tokens as they arrive via [`Self::feed`]; call
/// [`Self::finish`] once at end of stream to flush any open section and
/// obtain the synthetic `full_text` and `debug` events.
///
/// Outside of any explicit section the processor behaves as though a
/// `[TEXT]` section were already open, so leading content and unknown
/// markers both fall through as plain text.
pub struct TagStreamProcessor {
    /// Bytes received but not yet classified: either plain content waiting
    /// for the next `[`, or an unresolved `[...` prefix.
    carry: String,
    current: TagKind,
    section: String,
    full_text: String,
    raw_all: String,
}

impl Default for TagStreamProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagStreamProcessor {
    pub fn new() -> Self {
        Self {
            carry: String::new(),
            current: TagKind::Text,
            section: String::new(),
            full_text: String::new(),
            raw_all: String::new(),
        }
    }

    /// Feeds one token (or arbitrarily-sized chunk) of LLM output, returning
    /// whatever events can now be emitted unambiguously.
    pub fn feed(&mut self, token: &str) -> Vec<TagEvent> {
        self.raw_all.push_str(token);
        self.carry.push_str(token);
        self.drain(false)
    }

    /// Ends the stream: implicitly closes any open section, then emits the
    /// `full_text` and `debug` synthetic events.
    pub fn finish(mut self) -> Vec<TagEvent> {
        let mut events = self.drain(true);
        self.close_current(&mut events);
        events.push(TagEvent {
            tag: TagKind::FullText,
            content: self.full_text,
        });
        events.push(TagEvent {
            tag: TagKind::Debug,
            content: self.raw_all,
        });
        events
    }

    fn emit_content(&mut self, events: &mut Vec<TagEvent>, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.current.mode() {
            TagMode::Stream => {
                self.full_text.push_str(text);
                events.push(TagEvent {
                    tag: self.current,
                    content: text.to_string(),
                });
            }
            TagMode::Buffer => self.section.push_str(text),
        }
    }

    /// Closes the current section, emitting its buffered event if it has
    /// one, and resets to the default `Text` section.
    fn close_current(&mut self, events: &mut Vec<TagEvent>) {
        if self.current.mode() == TagMode::Buffer {
            events.push(TagEvent {
                tag: self.current,
                content: std::mem::take(&mut self.section),
            });
        }
        self.current = TagKind::Text;
        self.section.clear();
    }

    fn open(&mut self, events: &mut Vec<TagEvent>, tag: TagKind) {
        // A new recognized opening marker always closes whatever was open,
        // even a same-named section reopened without a close.
        self.close_current(events);
        self.current = tag;
        self.section.clear();
    }

    /// Consumes as much of `self.carry` as can be unambiguously classified,
    /// returning the events produced. When `is_final`, any trailing
    /// unresolved `[` prefix is instead flushed as literal content.
    fn drain(&mut self, is_final: bool) -> Vec<TagEvent> {
        let mut events = Vec::new();
        loop {
            match self.carry.find('[') {
                None => {
                    let rest = std::mem::take(&mut self.carry);
                    self.emit_content(&mut events, &rest);
                    break;
                }
                Some(open_idx) => {
                    let before = self.carry[..open_idx].to_string();
                    self.emit_content(&mut events, &before);

                    match self.carry[open_idx..].find(']') {
                        None => {
                            if is_final || self.carry.len() - open_idx > MAX_CARRY {
                                let literal = self.carry[open_idx..].to_string();
                                self.carry.clear();
                                self.emit_content(&mut events, &literal);
                            } else {
                                self.carry = self.carry[open_idx..].to_string();
                            }
                            break;
                        }
                        Some(close_rel) => {
                            let close_idx = open_idx + close_rel;
                            let body = self.carry[open_idx + 1..close_idx].to_string();
                            let after = close_idx + 1;
                            let bracket = split_bracket_body(&body);

                            if bracket.is_close {
                                match TagKind::from_name(bracket.name) {
                                    Some(tag) if tag == self.current => {
                                        self.close_current(&mut events)
                                    }
                                    _ => {
                                        let literal = format!("[{}]", body);
                                        self.emit_content(&mut events, &literal);
                                    }
                                }
                            } else {
                                match TagKind::from_name(bracket.name) {
                                    Some(tag) => self.open(&mut events, tag),
                                    None => {
                                        let literal = format!("[{}]", body);
                                        self.emit_content(&mut events, &literal);
                                    }
                                }
                            }

                            self.carry = self.carry[after..].to_string();
                        }
                    }
                }
            }
        }
        events
    }
}
