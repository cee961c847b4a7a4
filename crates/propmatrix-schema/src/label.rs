//! Human labels derived from field names.

const SEPARATORS: [char; 4] = ['_', '-', ' ', '.'];

/// Turns a declared field name into a human label.
///
/// Splits on separators and case boundaries (keeping acronyms together),
/// upper-cases the first letter of each word and joins with spaces:
/// `isDisabled` becomes `Is Disabled`, `max_width` becomes `Max Width`
/// and `innerHTMLContent` becomes `Inner HTML Content`.
pub fn humanize(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        if SEPARATORS.contains(&ch) {
            flush(&mut words, &mut current);
            continue;
        }
        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                flush(&mut words, &mut current);
            }
        }
        current.push(ch);
    }
    flush(&mut words, &mut current);
    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
