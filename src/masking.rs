//! Input Masking - Keystroke Shaping
//!
//! Maskers accept or suppress keystrokes and reflow formatting.
//! They never raise user-visible errors.

use serde::{Deserialize, Serialize};

use crate::specs::MaskPolicy;

/// A single raw keystroke, before the field's editing model applies it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Keystroke {
    Char(char),
    Backspace,
}

/// Pre-edit verdict on a keystroke.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeyDecision {
    Accept,
    Suppress,
}

/// Masking trait - a two-phase state machine over the live value.
///
/// `filter` runs before the edit is applied and gates the keystroke.
/// `reflow` runs after the edit has landed (the deferred continuation) and
/// sees the post-edit value; returning `None` leaves the value unchanged.
pub trait Masker {
    fn name(&self) -> &'static str;
    fn filter(&self, value: &str, key: Keystroke) -> KeyDecision;
    fn reflow(&self, value: &str, key: Keystroke) -> Option<String>;
}

/// Resolve the masker for a spec's policy.
pub fn masker_for(policy: MaskPolicy) -> Box<dyn Masker> {
    match policy {
        MaskPolicy::DigitsOnly => Box::new(DigitsOnlyMasker),
        MaskPolicy::GroupedDigits => Box::new(GroupedDigitsMasker),
    }
}

// --- Concrete Maskers ---

/// Phone-style fields: digits pass, everything else is swallowed.
pub struct DigitsOnlyMasker;

impl Masker for DigitsOnlyMasker {
    fn name(&self) -> &'static str { "digits_only" }

    fn filter(&self, _value: &str, key: Keystroke) -> KeyDecision {
        match key {
            Keystroke::Char(c) if !c.is_ascii_digit() => KeyDecision::Suppress,
            _ => KeyDecision::Accept,
        }
    }

    fn reflow(&self, _value: &str, _key: Keystroke) -> Option<String> {
        None
    }
}

/// Card-number fields: space-separated groups of 4 digits, at most 4 groups.
///
/// Invariant on the live value: every complete group holds exactly
/// [`GROUP_LEN`] digits, total digits never exceed [`MAX_GROUPS`] * GROUP_LEN.
pub struct GroupedDigitsMasker;

pub const GROUP_LEN: usize = 4;
pub const MAX_GROUPS: usize = 4;

impl GroupedDigitsMasker {
    fn digit_count(value: &str) -> usize {
        value.chars().filter(|c| c.is_ascii_digit()).count()
    }
}

impl Masker for GroupedDigitsMasker {
    fn name(&self) -> &'static str { "grouped_digits" }

    fn filter(&self, value: &str, key: Keystroke) -> KeyDecision {
        match key {
            Keystroke::Backspace => KeyDecision::Accept,
            Keystroke::Char(c) if !c.is_ascii_digit() => KeyDecision::Suppress,
            Keystroke::Char(_) if Self::digit_count(value) >= GROUP_LEN * MAX_GROUPS => {
                KeyDecision::Suppress
            }
            Keystroke::Char(_) => KeyDecision::Accept,
        }
    }

    fn reflow(&self, value: &str, key: Keystroke) -> Option<String> {
        let groups: Vec<&str> = value.split(' ').collect();
        let last = groups.last().copied().unwrap_or("");
        match key {
            // Backspacing across a boundary takes the separator with it,
            // not just the phantom empty group behind it.
            Keystroke::Backspace if !value.is_empty() && last.is_empty() => {
                Some(value[..value.len() - 1].to_string())
            }
            Keystroke::Char(_) if last.len() == GROUP_LEN && groups.len() < MAX_GROUPS => {
                Some(format!("{} ", value))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only_suppresses_letters() {
        let m = DigitsOnlyMasker;
        assert_eq!(m.filter("", Keystroke::Char('a')), KeyDecision::Suppress);
        assert_eq!(m.filter("", Keystroke::Char('5')), KeyDecision::Accept);
        assert_eq!(m.filter("123", Keystroke::Backspace), KeyDecision::Accept);
        assert_eq!(m.reflow("123", Keystroke::Char('3')), None);
    }

    #[test]
    fn grouped_appends_separator_after_full_group() {
        let m = GroupedDigitsMasker;
        assert_eq!(m.reflow("1234", Keystroke::Char('4')), Some("1234 ".to_string()));
        assert_eq!(m.reflow("123", Keystroke::Char('3')), None);
    }

    #[test]
    fn grouped_no_separator_after_final_group() {
        let m = GroupedDigitsMasker;
        assert_eq!(m.reflow("1234 5678 1234 5678", Keystroke::Char('8')), None);
    }

    #[test]
    fn grouped_suppresses_seventeenth_digit() {
        let m = GroupedDigitsMasker;
        assert_eq!(
            m.filter("1234 5678 1234 5678", Keystroke::Char('9')),
            KeyDecision::Suppress
        );
    }

    #[test]
    fn grouped_backspace_collapses_dangling_separator() {
        let m = GroupedDigitsMasker;
        assert_eq!(m.reflow("1234 ", Keystroke::Backspace), Some("1234".to_string()));
        assert_eq!(m.reflow("1234", Keystroke::Backspace), None);
        assert_eq!(m.reflow("", Keystroke::Backspace), None);
    }
}
