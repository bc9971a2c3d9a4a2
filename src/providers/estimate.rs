//! Token and cost estimation.
//!
//! A deterministic character-count proxy used both for viability cost
//! projection (prompt only) and recorded cost (prompt + response). Four
//! characters approximate one token; not intended to match any backend
//! tokenizer.

/// Estimated token count for a piece of text.
pub fn estimate_tokens(text: &str) -> u64 {
    chars_to_tokens(text.chars().count())
}

/// Token count for an already-computed character total.
pub fn chars_to_tokens(chars: usize) -> u64 {
    (chars as u64).div_ceil(4)
}

/// Cost of a token count at the given per-token price.
pub fn cost_for_tokens(tokens: u64, cost_per_token: f64) -> f64 {
    tokens as f64 * cost_per_token / 1000.0
}

/// Estimated cost of `text` at the given per-token price.
pub fn estimate_cost(text: &str, cost_per_token: f64) -> f64 {
    cost_for_tokens(estimate_tokens(text), cost_per_token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("hi"), 1);
        assert_eq!(estimate_tokens("hiya"), 1);
        assert_eq!(estimate_tokens("hello"), 2);
        assert_eq!(estimate_tokens("hihello"), 2);
        assert_eq!(estimate_tokens("12345678"), 2);
        assert_eq!(estimate_tokens("123456789"), 3);
    }

    #[test]
    fn test_estimate_tokens_counts_characters_not_bytes() {
        // Four multi-byte characters are still one token.
        assert_eq!(estimate_tokens("日本語だ"), 1);
    }

    #[test]
    fn test_estimate_cost() {
        // 7 chars -> 2 tokens; 2 * 0.0001 / 1000 = 2e-7
        let cost = estimate_cost("hihello", 0.0001);
        assert!((cost - 2e-7).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_cost_zero_price() {
        assert_eq!(estimate_cost("some prompt", 0.0), 0.0);
    }
}
