//! Size-bounded text chunker.
//!
//! Splits long text into contiguous pieces at natural boundaries:
//! paragraph breaks first, sentence breaks second, raw cut last.
//! Pieces are lossless; concatenating them reproduces the input
//! exactly.

/// Split `text` into ordered pieces of at most `max_chars` bytes.
///
/// Each window is cut at the last paragraph break (`\n\n`) inside it;
/// if there is none, at the last sentence terminator (`. `, cut after
/// the space); otherwise at the raw boundary, adjusted down to a UTF-8
/// character boundary.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.len() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = start + max_chars;
        if end >= text.len() {
            end = text.len();
        } else {
            while end > start && !text.is_char_boundary(end) {
                end -= 1;
            }
            if end == start {
                // A single character is wider than the window; emit it
                // whole rather than split it.
                end = start + 1;
                while !text.is_char_boundary(end) {
                    end += 1;
                }
            } else {
                let window = &text[start..end];
                let breakpoint = match window.rfind("\n\n") {
                    Some(pos) => Some(pos),
                    None => window.rfind(". ").map(|pos| pos + 2),
                };
                if let Some(pos) = breakpoint {
                    if pos > 0 {
                        end = start + pos;
                    }
                }
            }
        }
        chunks.push(text[start..end].to_string());
        start = end;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_a_single_piece() {
        let chunks = chunk_text("Meeting called to order.", 20_000);
        assert_eq!(chunks, vec!["Meeting called to order.".to_string()]);
    }

    #[test]
    fn exact_fit_is_a_single_piece() {
        let text = "x".repeat(100);
        assert_eq!(chunk_text(&text, 100).len(), 1);
    }

    #[test]
    fn pieces_concatenate_to_input() {
        let text = "First paragraph.\n\nSecond paragraph. More text here.\n\nThird paragraph."
            .repeat(50);
        let chunks = chunk_text(&text, 200);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn cuts_prefer_paragraph_breaks() {
        let paragraph = "word ".repeat(30).trim_end().to_string();
        let text = format!("{paragraph}\n\n{paragraph}\n\n{paragraph}");
        let chunks = chunk_text(&text, 200);
        assert!(chunks.len() > 1);
        // Every piece but the last ends right before a paragraph break
        // that the following piece starts with.
        for piece in &chunks[..chunks.len() - 1] {
            assert!(!piece.ends_with('\n'));
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn cuts_fall_back_to_sentence_breaks() {
        let text = "One sentence here. Another sentence there. ".repeat(20);
        let chunks = chunk_text(&text, 100);
        assert!(chunks.len() > 1);
        for piece in &chunks[..chunks.len() - 1] {
            assert!(piece.ends_with(". "), "piece ended with {:?}", &piece[piece.len().saturating_sub(5)..]);
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn unbroken_text_is_cut_raw() {
        let text = "x".repeat(450);
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.len() <= 100));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn multibyte_text_never_splits_a_character() {
        let text = "Überlegung über die Tagesordnung. ".repeat(30);
        let chunks = chunk_text(&text, 50);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn forty_five_thousand_chars_make_three_pieces() {
        let sentence = "The board discussed the budget resolution. ";
        let mut text = String::new();
        while text.len() < 45_000 {
            text.push_str(sentence);
        }
        text.truncate(45_000);

        let chunks = chunk_text(&text, 20_000);
        assert_eq!(chunks.len(), 3);
        for piece in &chunks[..chunks.len() - 1] {
            assert!(piece.len() <= 20_000);
            assert!(piece.ends_with(". "));
        }
        assert_eq!(chunks.concat(), text);
    }

    proptest! {
        #[test]
        fn concatenation_is_lossless(text in ".{0,2000}", max in 1usize..500) {
            let chunks = chunk_text(&text, max);
            prop_assert_eq!(chunks.concat(), text);
        }

        #[test]
        fn fitting_text_is_one_piece(text in ".{0,300}") {
            let chunks = chunk_text(&text, 400);
            prop_assert_eq!(chunks.len(), 1);
        }
    }
}
