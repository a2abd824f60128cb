//! Text helpers: slugs, AI post titles and transport-sized chunks

/// Telegram's per-message text limit
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Maximum length of a title derived from a generation prompt
pub const MAX_TITLE_LENGTH: usize = 100;

/// Title used when a generation prompt is blank
pub const FALLBACK_AI_TITLE: &str = "AI post";

/// Separator placed between slug words
pub const SLUG_SEPARATOR: char = '-';

/// Derive a URL-safe slug from a post title
///
/// Non-ASCII letters are transliterated, everything is lowercased,
/// apostrophes are dropped and any other run of non-alphanumeric characters
/// becomes a single `-`. Leading and trailing separators are stripped, so
/// `slugify(&slugify(t)) == slugify(t)`.
pub fn slugify(title: &str) -> String {
    let ascii = deunicode::deunicode(title);

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SLUG_SEPARATOR);
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c != '\'' {
            pending_separator = true;
        }
    }

    slug
}

/// Title for a generated post: the first 100 chars of the trimmed prompt
pub fn derive_title(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return FALLBACK_AI_TITLE.to_string();
    }
    trimmed.chars().take(MAX_TITLE_LENGTH).collect()
}

/// Split `text` into pieces of at most `max_len` chars
///
/// Splits at fixed offsets without looking for word boundaries. An empty
/// input yields no chunks.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "chunk size must be positive");

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_len)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust 2024: what's new?  "), "rust-2024-whats-new");
        assert_eq!(slugify("a---b___c"), "a-b-c");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Привет мир"), "privet-mir");
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
    }

    #[test]
    fn test_slugify_only_symbols() {
        assert_eq!(slugify("!!! ???"), "");
    }

    #[test]
    fn test_derive_title_truncates_trimmed_prompt() {
        let prompt = format!("   {}   ", "x".repeat(150));
        let title = derive_title(&prompt);
        assert_eq!(title.chars().count(), MAX_TITLE_LENGTH);
        assert_eq!(title, "x".repeat(100));
    }

    #[test]
    fn test_derive_title_short_prompt() {
        assert_eq!(derive_title("  Write about Rust  "), "Write about Rust");
    }

    #[test]
    fn test_derive_title_counts_chars() {
        let prompt = "я".repeat(120);
        assert_eq!(derive_title(&prompt), "я".repeat(100));
    }

    #[test]
    fn test_derive_title_blank_prompt() {
        assert_eq!(derive_title("   "), FALLBACK_AI_TITLE);
    }

    #[test]
    fn test_chunk_text_boundaries() {
        assert!(chunk_text("", MAX_MESSAGE_LENGTH).is_empty());
        assert_eq!(chunk_text("abc", MAX_MESSAGE_LENGTH), vec!["abc"]);

        let exact = "a".repeat(MAX_MESSAGE_LENGTH);
        assert_eq!(chunk_text(&exact, MAX_MESSAGE_LENGTH).len(), 1);

        let over = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let chunks = chunk_text(&over, MAX_MESSAGE_LENGTH);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "a");
    }

    proptest! {
        #[test]
        fn prop_slug_is_lowercase_alnum_and_separator(title in "\\PC{1,80}") {
            let slug = slugify(&title);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == SLUG_SEPARATOR));
            prop_assert!(!slug.starts_with(SLUG_SEPARATOR));
            prop_assert!(!slug.ends_with(SLUG_SEPARATOR));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_slug_is_deterministic_and_idempotent(title in "\\PC{1,80}") {
            let slug = slugify(&title);
            prop_assert_eq!(&slug, &slugify(&title));
            prop_assert_eq!(&slug, &slugify(&slug));
        }

        #[test]
        fn prop_chunks_cover_text(text in "\\PC{0,300}", max_len in 1usize..64) {
            let chunks = chunk_text(&text, max_len);
            let total = text.chars().count();
            prop_assert_eq!(chunks.len(), total.div_ceil(max_len));
            prop_assert!(chunks.iter().all(|c| c.chars().count() <= max_len));
            prop_assert_eq!(chunks.concat(), text);
        }
    }
}
