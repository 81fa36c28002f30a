//! Offset resolution consistency
//!
//! Random segmented documents (text runs mixed with embedded objects) are edited at random and
//! checked against a plain `String` reference after every step:
//! 1. The projection matches the reference.
//! 2. The linear walk and the prefix-sum index agree on every offset.
//! 3. `range(o, n).text()` equals the reference substring.

use range_engine::{Document, MatchSpan, OffsetIndex, Segment, resolve};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &["abc", "你好", "👋", "x", "line\n", "é"];

fn random_document(rng: &mut StdRng) -> (Document, String) {
    let mut segments = Vec::new();
    let mut reference = String::new();
    for _ in 0..rng.gen_range(1..12) {
        if rng.gen_bool(0.3) {
            segments.push(Segment::embedded("object"));
        } else {
            let word = WORDS[rng.gen_range(0..WORDS.len())];
            reference.push_str(word);
            segments.push(Segment::text(word));
        }
    }
    (Document::from_segments(segments), reference)
}

fn substring(reference: &str, offset: usize, len: usize) -> String {
    reference.chars().skip(offset).take(len).collect()
}

fn check(document: &Document, reference: &str) {
    assert_eq!(document.text(), reference);
    let total = reference.chars().count();
    assert_eq!(document.char_count(), total);

    let index = OffsetIndex::new(document);
    assert_eq!(index.char_count(), total);

    for offset in 0..=total + 2 {
        let walked = document.position_at(offset);
        let indexed = index.position_at(offset);
        assert_eq!(walked.offset(), offset.min(total));
        assert_eq!(walked.segment_index(), indexed.segment_index(), "offset {offset}");
        assert_eq!(
            walked.offset_in_segment(),
            indexed.offset_in_segment(),
            "offset {offset}"
        );

        // Chained resolution lands on the same place as resolving from the start.
        if offset <= total {
            let half = offset / 2;
            let chained = resolve(document.position_at(half), offset - half);
            assert_eq!(chained.segment_index(), walked.segment_index());
            assert_eq!(chained.offset_in_segment(), walked.offset_in_segment());
        }
    }

    for offset in 0..total {
        let len = (total - offset).min(3);
        assert_eq!(
            document.range(offset, len).text(),
            substring(reference, offset, len)
        );
        assert_eq!(
            index.range(MatchSpan::new(offset, len)).offsets(),
            offset..offset + len
        );
    }
}

#[test]
fn test_random_documents_resolve_consistently() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let (document, reference) = random_document(&mut rng);
        check(&document, &reference);
    }
}

#[test]
fn test_random_edits_keep_projection_consistent() {
    let mut rng = StdRng::seed_from_u64(42);
    let (mut document, reference) = random_document(&mut rng);
    let mut reference: Vec<char> = reference.chars().collect();

    for _ in 0..300 {
        let len = reference.len();
        if rng.gen_bool(0.6) || len == 0 {
            let word = WORDS[rng.gen_range(0..WORDS.len())];
            let offset = rng.gen_range(0..=len);
            document.insert(offset, word);
            for (i, ch) in word.chars().enumerate() {
                reference.insert(offset + i, ch);
            }
        } else {
            let start = rng.gen_range(0..len);
            let count = rng.gen_range(1..=(len - start).min(5));
            document.delete(start, count);
            reference.drain(start..start + count);
        }

        let reference: String = reference.iter().collect();
        check(&document, &reference);
    }
}

#[test]
fn test_boundary_offsets_use_earlier_run() {
    let document = Document::from_segments(vec![
        Segment::text("ab"),
        Segment::embedded("image"),
        Segment::embedded("image"),
        Segment::text("cd"),
    ]);

    let boundary = document.position_at(2);
    assert_eq!(boundary.segment_index(), 0);
    assert_eq!(boundary.offset_in_segment(), 2);

    let next = document.position_at(3);
    assert_eq!(next.segment_index(), 3);
    assert_eq!(next.offset_in_segment(), 1);
}

#[test]
fn test_document_without_text_runs() {
    let document = Document::from_segments(vec![Segment::embedded("a"), Segment::embedded("b")]);
    assert_eq!(document.text(), "");
    assert_eq!(document.position_at(5).offset(), 0);
    assert!(document.full_range().is_empty());
}
