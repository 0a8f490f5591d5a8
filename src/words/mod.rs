use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Most frequent words in `text`, highest count first
///
/// Words are runs of Unicode word characters, compared case-insensitively.
/// Equal counts keep the order in which the words first appear.
pub fn top_k(text: &str, k: usize) -> Vec<(String, usize)> {
    if k == 0 {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    // word -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, m) in WORD.find_iter(&lowered).enumerate() {
        counts.entry(m.as_str()).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(k)
        .map(|(word, count, _)| (word.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Hello world! Hello everyone. This is a simple test. Test, test, hello.";

    #[test]
    fn test_top_two_of_sample() {
        let top = top_k(SAMPLE, 2);
        assert_eq!(top.len(), 2);
        assert!(top.contains(&("hello".to_string(), 3)));
        assert!(top.contains(&("test".to_string(), 3)));
    }

    #[test]
    fn test_ties_follow_first_appearance() {
        assert_eq!(
            top_k(SAMPLE, 4),
            vec![
                ("hello".to_string(), 3),
                ("test".to_string(), 3),
                ("world".to_string(), 1),
                ("everyone".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(top_k("", 3).is_empty());
        assert!(top_k("   ...!!", 3).is_empty());
        assert!(top_k(SAMPLE, 0).is_empty());
    }

    #[test]
    fn test_k_larger_than_vocabulary() {
        let top = top_k("b a b", 10);
        assert_eq!(top, vec![("b".to_string(), 2), ("a".to_string(), 1)]);
    }

    #[test]
    fn test_digits_and_underscores_are_word_characters() {
        let top = top_k("snake_case 42 Snake_Case", 1);
        assert_eq!(top, vec![("snake_case".to_string(), 2)]);
    }
}
