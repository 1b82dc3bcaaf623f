//! Parse warnings with colored terminal output.
//!
//! Parsing never stops for a recoverable oddity (a stray end tag, an
//! unknown control keyword); it reports the condition here instead.
//! Messages are deduplicated so a pathological document cannot flood
//! stderr with the same complaint.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use owo_colors::OwoColorize;

/// Messages that have already been printed in this process.
static SEEN: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Report a non-fatal parse oddity (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("markup", "stray end tag </span> has no open element");
/// ```
///
/// # Panics
/// Panics if the warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("{component}:{message}");
    let first_time = SEEN
        .get_or_init(|| Mutex::new(HashSet::new()))
        .lock()
        .unwrap()
        .insert(key);

    if first_time {
        eprintln!("{} {message}", format!("[quokka:{component}]").yellow());
    }
}

/// Forget all recorded warnings (call between unrelated documents).
///
/// # Panics
/// Panics if the warning set mutex is poisoned.
pub fn clear_warnings() {
    if let Some(seen) = SEEN.get() {
        seen.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_repeated_messages() {
        clear_warnings();
        warn_once("test", "same message");
        warn_once("test", "same message");
        let seen = SEEN.get().unwrap().lock().unwrap();
        assert_eq!(seen.len(), 1);
    }
}
