//! Primary-key and slug derivation over already-scanned key sets.

use std::collections::HashSet;

/// Coerces a stored primary key to a number; non-numeric keys count as 0.
pub fn coerce_primary_key(key: &str) -> u64 {
    key.trim().parse::<u64>().unwrap_or(0)
}

/// Returns `max(keys) + 1` as a string, treating an empty key set as max 0.
///
/// Not atomic with any subsequent write: two callers scanning the same key set get the same
/// answer.
pub fn next_primary_key_from<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let max = keys
        .into_iter()
        .map(|key| coerce_primary_key(key.as_ref()))
        .max()
        .unwrap_or(0);
    max.saturating_add(1).to_string()
}

/// Returns `candidate` if it is not taken, else the first free `candidate-N` for N = 2, 3, ...
pub fn unique_slug_from(candidate: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(candidate) {
        return candidate.to_string();
    }

    let mut suffix = 2_u64;
    loop {
        let probe = format!("{candidate}-{suffix}");
        if !taken.contains(&probe) {
            return probe;
        }
        suffix += 1;
    }
}
