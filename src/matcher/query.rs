//! The trigger matcher
//!
//! A pure function over an immutable snapshot. Candidate anchors are every
//! occurrence of a key literal inside `[look_back, cursor]` that starts the
//! text or follows whitespace. The active match's anchor wins over later
//! occurrences of its own literal; otherwise the anchor nearest to the cursor
//! wins. Anchors whose single-word capture contains whitespace are skipped.

use tracing::trace;

use super::key::{Key, KeySet, Match};

/// Everything besides the text and keys that the matcher looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext<'a> {
    /// Cursor offset in chars
    pub cursor: usize,
    /// Inclusive lower bound for anchors
    pub look_back: usize,
    /// Match currently believed in progress
    pub active: Option<&'a Match>,
}

impl<'a> MatchContext<'a> {
    /// Context with no lookback boundary and no active match
    pub fn at_cursor(cursor: usize) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    pub fn with_look_back(mut self, look_back: usize) -> Self {
        self.look_back = look_back;
        self
    }

    pub fn with_active(mut self, active: Option<&'a Match>) -> Self {
        self.active = active;
        self
    }
}

/// Find the mention in progress at the cursor, if any
///
/// # Arguments
/// * `text` - Current editor text
/// * `keys` - Configured trigger keys
/// * `ctx` - Cursor, lookback boundary and active match
///
/// # Returns
/// * `Option<Match>` - The match, or `None` when no trigger is in progress
pub fn find_match(text: &str, keys: &KeySet, ctx: MatchContext<'_>) -> Option<Match> {
    let mut chars: Vec<char> = text.chars().collect();
    while chars.last() == Some(&'\n') {
        chars.pop();
    }
    let cursor = ctx.cursor.min(chars.len());

    let mut candidates = anchors(&chars, keys, ctx.look_back, cursor);
    if let Some(active) = ctx.active {
        keep_active_anchor(&mut candidates, active, &chars, cursor);
    }

    // Nearest to the cursor first; a longer literal wins a tie.
    candidates.sort_by(|a, b| {
        b.offset
            .cmp(&a.offset)
            .then_with(|| b.key.char_len().cmp(&a.key.char_len()))
    });

    let found = candidates
        .iter()
        .find_map(|anchor| anchor.capture(&chars, cursor));
    trace!(cursor, look_back = ctx.look_back, ?found, "trigger scan");
    found
}

/// A key literal occurrence satisfying the boundary rule
#[derive(Debug, Clone, Copy)]
struct Anchor<'k> {
    offset: usize,
    key: &'k Key,
}

impl Anchor<'_> {
    fn content_start(&self) -> usize {
        self.offset + self.key.char_len()
    }

    /// Captured text up to the cursor, unless whitespace broke a single-word run
    fn capture(&self, chars: &[char], cursor: usize) -> Option<Match> {
        let captured = &chars[self.content_start()..cursor];
        if !self.key.multi_word && captured.iter().any(|c| c.is_whitespace()) {
            return None;
        }

        Some(Match {
            text: captured.iter().collect(),
            key: self.key.literal.clone(),
            position: self.content_start(),
        })
    }
}

fn anchors<'k>(
    chars: &[char],
    keys: &'k KeySet,
    look_back: usize,
    cursor: usize,
) -> Vec<Anchor<'k>> {
    let mut found = Vec::new();

    for key in keys.iter() {
        let literal: Vec<char> = key.literal.chars().collect();
        if literal.is_empty() || literal.len() > cursor {
            continue;
        }

        for offset in look_back..=cursor - literal.len() {
            if chars[offset..offset + literal.len()] == literal[..] && at_boundary(chars, offset) {
                found.push(Anchor { offset, key });
            }
        }
    }

    found
}

fn at_boundary(chars: &[char], offset: usize) -> bool {
    offset == 0 || chars[offset - 1].is_whitespace()
}

/// Drop later occurrences of the active key when its own anchor still holds.
///
/// A literal typed again inside the captured text is content, not a new
/// trigger.
fn keep_active_anchor(
    candidates: &mut Vec<Anchor<'_>>,
    active: &Match,
    chars: &[char],
    cursor: usize,
) {
    let anchor = active.anchor();
    let holds = candidates
        .iter()
        .find(|c| c.offset == anchor && c.key.literal == active.key)
        .is_some_and(|c| c.capture(chars, cursor).is_some());

    if holds {
        candidates.retain(|c| c.key.literal != active.key || c.offset <= anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi_word_keys() -> KeySet {
        KeySet::new(vec![Key::single("@"), Key::multi("#"), Key::multi("[[")])
    }

    fn at_end(text: &str, keys: &KeySet) -> Option<Match> {
        find_match(text, keys, MatchContext::at_cursor(text.chars().count()))
    }

    #[test]
    fn test_single_char_key_on_empty_capture() {
        let keys = KeySet::new(vec![Key::single(":")]);
        let found = at_end(":", &keys).unwrap();

        assert_eq!(found.key, ":");
        assert_eq!(found.text, "");
        assert_eq!(found.position, 1);
    }

    #[test]
    fn test_two_char_key_grows() {
        let keys = KeySet::new(vec![Key::single("[[")]);
        let texts: Vec<String> = ["[[", "[[a", "[[ab"]
            .iter()
            .map(|t| at_end(t, &keys).unwrap().text)
            .collect();

        assert_eq!(texts, vec!["", "a", "ab"]);
    }

    #[test]
    fn test_no_key_present() {
        let keys = multi_word_keys();
        assert_eq!(at_end("plain text", &keys), None);
        assert_eq!(at_end("", &keys), None);
    }

    #[test]
    fn test_trigger_mid_word_ignored() {
        let keys = multi_word_keys();
        assert_eq!(at_end("mail@host", &keys), None);
    }

    #[test]
    fn test_trigger_after_newline() {
        let keys = multi_word_keys();
        let found = at_end("hello\n@bo", &keys).unwrap();
        assert_eq!(found.text, "bo");
        assert_eq!(found.position, 7);
    }

    #[test]
    fn test_trigger_after_punctuation_is_not_an_anchor() {
        let keys = multi_word_keys();
        assert_eq!(at_end("(@bob", &keys), None);
        assert_eq!(at_end("x.#tag", &keys), None);
    }

    #[test]
    fn test_nearest_anchor_wins() {
        let keys = multi_word_keys();
        let found = at_end("@match #some text", &keys).unwrap();

        assert_eq!(found.key, "#");
        assert_eq!(found.text, "some text");
    }

    #[test]
    fn test_single_word_after_multi_word() {
        let keys = multi_word_keys();
        let found = at_end("#some text @match", &keys).unwrap();

        assert_eq!(found.key, "@");
        assert_eq!(found.text, "match");
    }

    #[test]
    fn test_broken_single_word_falls_back() {
        let keys = multi_word_keys();
        let found = at_end("#some text @match word", &keys).unwrap();

        assert_eq!(found.key, "#");
        assert_eq!(found.text, "some text @match word");
    }

    #[test]
    fn test_space_breaks_single_word() {
        let keys = KeySet::new(vec![Key::single("@")]);
        assert!(at_end("@bob", &keys).is_some());
        assert_eq!(at_end("@bob ", &keys), None);
    }

    #[test]
    fn test_continuity_keeps_first_anchor() {
        let keys = multi_word_keys();
        let mut active = at_end("#step 1", &keys);

        for text in ["#step 1 #step 2", "#step 1 #step 2 #step 3"] {
            let ctx = MatchContext::at_cursor(text.chars().count()).with_active(active.as_ref());
            let found = find_match(text, &keys, ctx).unwrap();
            assert_eq!(found.key, "#");
            assert_eq!(found.position - found.key.len(), 0);
            active = Some(found);
        }

        assert_eq!(active.unwrap().text, "step 1 #step 2 #step 3");
    }

    #[test]
    fn test_without_active_match_nearest_same_key_wins() {
        let keys = multi_word_keys();
        let found = at_end("#step 1 #step 2", &keys).unwrap();
        assert_eq!(found.text, "step 2");
    }

    #[test]
    fn test_continuity_yields_to_other_key() {
        let keys = multi_word_keys();
        let active = at_end("#topic", &keys);
        let text = "#topic @al";
        let ctx = MatchContext::at_cursor(10).with_active(active.as_ref());

        let found = find_match(text, &keys, ctx).unwrap();
        assert_eq!(found.key, "@");
        assert_eq!(found.text, "al");
    }

    #[test]
    fn test_broken_active_single_word_allows_new_anchor() {
        let keys = KeySet::new(vec![Key::single("@")]);
        let active = at_end("@ab", &keys);
        let ctx = MatchContext::at_cursor(6).with_active(active.as_ref());

        let found = find_match("@ab @c", &keys, ctx).unwrap();
        assert_eq!(found.position, 5);
        assert_eq!(found.text, "c");
    }

    #[test]
    fn test_look_back_excludes_earlier_anchors() {
        let keys = multi_word_keys();
        let ctx = MatchContext::at_cursor(4).with_look_back(4);
        assert_eq!(find_match("@abc", &keys, ctx), None);

        let ctx = MatchContext::at_cursor(7).with_look_back(4);
        let found = find_match("@abc @x", &keys, ctx).unwrap();
        assert_eq!(found.position, 6);
    }

    #[test]
    fn test_cursor_inside_text() {
        let keys = multi_word_keys();
        let found = find_match("@bob rest", &keys, MatchContext::at_cursor(3)).unwrap();
        assert_eq!(found.text, "bo");
    }

    #[test]
    fn test_cursor_inside_key_literal() {
        let keys = KeySet::new(vec![Key::single("[[")]);
        assert_eq!(find_match("[[", &keys, MatchContext::at_cursor(1)), None);
    }

    #[test]
    fn test_trailing_newlines_ignored() {
        let keys = multi_word_keys();
        let found = find_match("@bob\n\n", &keys, MatchContext::at_cursor(6)).unwrap();
        assert_eq!(found.text, "bob");
    }

    #[test]
    fn test_longer_literal_wins_tie() {
        let keys = KeySet::new(vec![Key::single("["), Key::single("[[")]);
        let found = at_end("[[x", &keys).unwrap();
        assert_eq!(found.key, "[[");
        assert_eq!(found.text, "x");
    }

    #[test]
    fn test_offsets_in_chars() {
        let keys = multi_word_keys();
        let found = at_end("héllo @wörld", &keys).unwrap();
        assert_eq!(found.position, 7);
        assert_eq!(found.text, "wörld");
        assert_eq!(found.replaced_range(), 6..12);
    }
}
