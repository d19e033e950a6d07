use std::collections::HashMap;

use segmented_word_count::*;

const VOCABULARY: &[&str] = &[
    "Hello,", "hello", "world!", "WORLD", "(rust)", "rust.", "\"quoted\"", "—", "a", "b", "--",
    "don't", "[x]", "{y}", "Über", "über", "e.g.", "x",
];
const GAPS: &[&str] = &[" ", "  ", "\t", "\n", " \n\t "];

/// Deterministic pseudo-random texts of varying length and shape.
fn sample_texts() -> Vec<String> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move |bound: usize| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % bound as u64) as usize
    };

    let mut texts = vec![
        "".to_owned(),
        " ".to_owned(),
        "word".to_owned(),
        "   leading and trailing   ".to_owned(),
        "Hello, hello world! WORLD world.".to_owned(),
    ];
    for _ in 0..40 {
        let words = next(60);
        let mut text = String::new();
        if next(2) == 0 {
            text.push_str(GAPS[next(GAPS.len())]);
        }
        for i in 0..words {
            if i > 0 {
                text.push_str(GAPS[next(GAPS.len())]);
            }
            text.push_str(VOCABULARY[next(VOCABULARY.len())]);
        }
        texts.push(text);
    }
    texts
}

fn is_boundary_safe(text: &str, boundary: usize) -> bool {
    boundary == 0
        || boundary == text.len()
        || text.as_bytes()[boundary].is_ascii_whitespace()
        || text.as_bytes()[boundary - 1].is_ascii_whitespace()
}

async fn run(text: &str, n: usize, k: usize) -> Result<WordCount, WordCountError> {
    count_parallel(&Text::from(text), n, k, |_| {}).await
}

#[cfg(test)]
mod partition_tests {
    use super::*;

    #[test]
    fn test_segments_reconstruct_text() {
        for text in sample_texts() {
            for n in 1..=12 {
                let segments = partition(&Text::from(text.as_str()), n).unwrap();
                let joined: String = segments.iter().map(|s| s.as_str().unwrap()).collect();
                assert_eq!(joined, text, "n = {}", n);
                if !text.is_empty() {
                    assert_eq!(segments.len(), n);
                }
            }
        }
    }

    #[test]
    fn test_no_word_is_split() {
        for text in sample_texts() {
            for n in 1..=12 {
                let segments = partition(&Text::from(text.as_str()), n).unwrap();
                let mut boundary = 0;
                for segment in &segments {
                    boundary += segment.len();
                    assert!(
                        is_boundary_safe(&text, boundary),
                        "split inside a word at {} of {:?} with n = {}",
                        boundary,
                        text,
                        n
                    );
                }
            }
        }
    }

    #[test]
    fn test_six_words_three_segments() {
        let segments = partition(&Text::from("a b c d e f"), 3).unwrap();
        let words: Vec<Vec<String>> = segments
            .iter()
            .map(|s| {
                s.as_str()
                    .unwrap()
                    .split_whitespace()
                    .map(str::to_owned)
                    .collect()
            })
            .collect();
        assert_eq!(words, vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]]);
    }
}

#[cfg(test)]
mod aggregate_tests {
    use super::*;

    #[test]
    fn test_merge_order_is_irrelevant() {
        for text in sample_texts().into_iter().filter(|t| !t.is_empty()) {
            let segments = partition(&Text::from(text.as_str()), 5).unwrap();
            let tables: Vec<(usize, SegmentFrequencyTable)> = segments
                .iter()
                .map(|s| (s.index(), count_segment(s).unwrap().table))
                .collect();

            let forward = aggregate(tables.clone(), 5).unwrap();
            let mut rotated = tables.clone();
            rotated.rotate_left(2);
            let mut reversed = tables;
            reversed.reverse();

            assert_eq!(aggregate(rotated, 5).unwrap().to_hash_map(), forward.to_hash_map());
            assert_eq!(aggregate(reversed, 5).unwrap(), forward);
        }
    }

    #[test]
    fn test_global_total_is_sum_of_segments() {
        let text = Text::from("one two two three three three");
        let segments = partition(&text, 4).unwrap();
        let tables: Vec<(usize, SegmentFrequencyTable)> = segments
            .iter()
            .map(|s| (s.index(), count_segment(s).unwrap().table))
            .collect();
        let segment_sum: u64 = tables.iter().map(|(_, t)| t.total()).sum();
        let global = aggregate(tables, 4).unwrap();
        assert_eq!(global.total(), segment_sum);
        assert_eq!(global.total(), 6);
    }
}

#[cfg(test)]
mod parallel_count_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_hello_world_scenario() {
        let result = run("Hello, hello world! WORLD world.", 1, DEFAULT_TOP_K)
            .await
            .unwrap();
        let mut expected = HashMap::new();
        expected.insert("hello".to_owned(), 2);
        expected.insert("world".to_owned(), 3);
        assert_eq!(result.table.to_hash_map(), expected);
        assert_eq!(result.total_words(), 5);
        assert_eq!(result.unique_words(), 2);

        assert_eq!(result.ranking.len(), 2);
        assert_eq!(result.ranking[0].word, "world");
        assert_eq!(result.ranking[0].rank, 1);
        assert_eq!(result.ranking[1].word, "hello");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_six_words_merge() {
        let result = run("a b c d e f", 3, DEFAULT_TOP_K).await.unwrap();
        for word in &["a", "b", "c", "d", "e", "f"] {
            assert_eq!(result.table.get(word), Some(1), "{}", word);
        }
        assert_eq!(result.unique_words(), 6);
        assert_eq!(result.segments.len(), 3);
        for stats in &result.segments {
            assert_eq!(stats.total_words, 2);
        }
        let ranked: Vec<&str> = result.ranking.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(ranked, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_empty_input_starts_no_worker() {
        let mut progress_calls = 0;
        let result = count_parallel(&Text::from(""), 8, 20, |_| progress_calls += 1)
            .await
            .unwrap();
        assert_eq!(progress_calls, 0);
        assert!(result.table.is_empty());
        assert!(result.ranking.is_empty());
        assert!(result.segments.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_more_segments_than_words() {
        let text = "Three words, only.";
        let result = run(text, 16, 5).await.unwrap();
        assert_eq!(result.segments.len(), 16);
        assert!(result.segments.iter().any(|s| s.length == 0));
        assert_eq!(result.table, count_words(text));
        assert_eq!(result.total_words(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_segmenting_preserves_counts() {
        for text in sample_texts() {
            let whole = count_words(&text);
            for n in &[1, 2, 3, 7, 12] {
                let result = run(&text, *n, 1).await.unwrap();
                assert_eq!(result.total_words(), whole.total(), "n = {} {:?}", n, text);
                // same counts and the same first-seen order
                assert_eq!(result.table, whole, "n = {} {:?}", n, text);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_ranking_is_sorted_and_reproducible() {
        for text in sample_texts() {
            let first = run(&text, 6, 7).await.unwrap();
            let second = run(&text, 6, 7).await.unwrap();
            assert_eq!(first.ranking, second.ranking);
            assert_eq!(first.ranking.len(), first.unique_words().min(7));
            for pair in first.ranking.windows(2) {
                assert!(pair[0].count >= pair[1].count);
                assert_eq!(pair[0].rank + 1, pair[1].rank);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_progress_sees_every_segment() {
        let mut seen = Vec::new();
        let result = count_parallel(&Text::from("x y z x y x"), 3, 3, |stats| {
            seen.push(stats.index)
        })
        .await
        .unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
        let indices: Vec<usize> = result.segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected() {
        assert!(matches!(
            run("a b", 0, 5).await,
            Err(WordCountError::InvalidArgument(_))
        ));
        assert!(matches!(
            run("a b", 2, 0).await,
            Err(WordCountError::InvalidArgument(_))
        ));
    }
}
