//! Token estimation

/// Estimate tokens using a simple heuristic (chars / 4).
///
/// Counts Unicode scalar values rather than bytes so multi-byte text is not
/// over-counted.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}
