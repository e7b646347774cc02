/// Split `text` into consecutive groups of at most `max_words` whitespace-separated
/// words, each rejoined with single spaces. Empty input yields no chunks.
///
/// # Panics
/// Panics if `max_words` is zero.
pub fn chunk(text: &str, max_words: usize) -> Vec<String> {
    assert!(max_words > 0, "max_words must be positive");

    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(max_words).map(|group| group.join(" ")).collect()
}
