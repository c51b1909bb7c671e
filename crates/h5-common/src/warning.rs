//! Deduplicated warnings on stderr.
//!
//! Tokenizer diagnostics tend to repeat (the same malformed construct shows up
//! hundreds of times in a real page), so each distinct message is printed only
//! once until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Messages already printed, keyed by `"[component] message"`.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Print a warning for `component` unless the same message was already printed.
///
/// Returns `true` if the warning was printed by this call.
///
/// # Example
/// ```
/// use h5_common::warning::warn_once;
///
/// assert!(warn_once("Tokenizer", "duplicate-attribute at 1:12"));
/// assert!(!warn_once("Tokenizer", "duplicate-attribute at 1:12"));
/// ```
#[must_use]
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        let label = format!("[h5 {component}]");
        eprintln!("{} {}", label.yellow().bold(), message.yellow());
    }
    first_time
}

/// Forget every recorded warning, e.g. before tokenizing a new document.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_message_is_printed_once() {
        let message = "unit-test-only message";
        let _ = warn_once("Test", message);
        assert!(!warn_once("Test", message));
    }

    #[test]
    fn test_component_is_part_of_the_key() {
        let _ = warn_once("A", "shared text");
        let _ = warn_once("B", "shared text");
        assert!(!warn_once("A", "shared text"));
        assert!(!warn_once("B", "shared text"));
    }
}
