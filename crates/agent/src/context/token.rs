//! Token estimation.
//!
//! Character heuristic: roughly four characters per token, rounded up.
//! Close enough for budgeting a Gemini prompt without a tokenizer.

use lexdesk_core::message::Message;

/// Per-message overhead for role and framing.
const MESSAGE_OVERHEAD: usize = 4;

/// Estimate the token count for a string.
pub fn estimate_tokens(text: &str) -> usize {
    estimate_tokens_for_chars(text.chars().count())
}

/// Estimate tokens for a text of `chars` characters.
pub fn estimate_tokens_for_chars(chars: usize) -> usize {
    chars.div_ceil(4)
}

/// Estimate tokens for a single message including framing overhead.
pub fn estimate_message_tokens(message: &Message) -> usize {
    MESSAGE_OVERHEAD + estimate_tokens(&message.content)
}

pub fn estimate_messages_tokens(messages: &[Message]) -> usize {
    messages.iter().map(estimate_message_tokens).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn four_chars_is_one_token() {
        assert_eq!(estimate_tokens("lien"), 1);
    }

    #[test]
    fn partial_tokens_round_up() {
        assert_eq!(estimate_tokens_for_chars(5), 2);
        assert_eq!(estimate_tokens_for_chars(8), 2);
        assert_eq!(estimate_tokens("ééééé"), 2);
    }

    #[test]
    fn five_chars_rounds_up() {
        assert_eq!(estimate_tokens("plaint"), 2);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 8 chars, 16 bytes
        assert_eq!(estimate_tokens(&"é".repeat(8)), 2);
    }

    #[test]
    fn message_includes_overhead() {
        let msg = Message::user("deed"); // 1 token + 4 overhead
        assert_eq!(estimate_message_tokens(&msg), 5);
    }

    #[test]
    fn multiple_messages() {
        let msgs = vec![Message::system("hello"), Message::user("world")];
        assert_eq!(estimate_messages_tokens(&msgs), 12);
    }
}
