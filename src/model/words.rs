/// Counts whitespace-delimited words, ignoring leading, trailing, and repeated whitespace.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
