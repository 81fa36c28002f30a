use range_engine::{
    AttributeCategory, AttributeLayer, EditorHost, EditorSession, EngineConfig, FindOutcome,
    SyntaxState, TextRange,
};
use range_engine_highlight_simple::RegexHighlightProcessor;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Surface {
    selected: Vec<std::ops::Range<usize>>,
}

impl EditorHost for Surface {
    fn select_range(&mut self, range: TextRange<'_>) {
        self.selected.push(range.offsets());
    }

    fn notify_user(&mut self, _message: &str) {}
}

fn session() -> EditorSession<Surface, RegexHighlightProcessor> {
    EditorSession::new(
        Surface::default(),
        RegexHighlightProcessor::csharp().unwrap(),
        EngineConfig::default(),
    )
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_typing_a_keyword_colors_after_quiescence() {
    let t0 = Instant::now();
    let mut session = session();

    for (i, ch) in "return".chars().enumerate() {
        let end = session.document().char_count();
        session.insert_text(end, &ch.to_string(), t0 + ms(i as u64 * 150));
    }
    // Partial words never got colored: nothing ran yet.
    assert_eq!(session.syntax_engine().recompute_count(), 0);
    assert_eq!(session.syntax_engine().state(), SyntaxState::Pending);

    assert!(!session.tick(t0 + ms(949)).unwrap());
    assert!(session.tick(t0 + ms(950)).unwrap());
    assert_eq!(session.syntax_engine().recompute_count(), 1);
    assert_eq!(
        session.attributes().category_at(0, AttributeLayer::SYNTAX),
        AttributeCategory::Keyword
    );
}

#[test]
fn test_find_and_syntax_layers_are_independent() {
    let t0 = Instant::now();
    let mut session = session();
    session
        .load_text("// note\nstring s = \"hi\";\nif (s != null) return;")
        .unwrap();
    let syntax_before = session.attributes().spans(AttributeLayer::SYNTAX).to_vec();
    assert_eq!(syntax_before.len(), 6);

    assert_eq!(session.on_search_text_changed("s"), FindOutcome::Matches(3));
    assert_eq!(session.find_engine().cursor(), None);
    assert_eq!(session.find_next(), Some(0));
    assert_eq!(session.host().selected, vec![8..9]);

    // Search highlights leave syntax colors untouched.
    assert_eq!(
        session.attributes().spans(AttributeLayer::SYNTAX),
        syntax_before.as_slice()
    );

    // A recolor leaves search highlights untouched.
    session.insert_text(0, " ", t0);
    assert!(session.tick(t0 + ms(200)).unwrap());
    assert_eq!(session.attributes().spans(AttributeLayer::SEARCH).len(), 3);
    assert_eq!(
        session.attributes().category_at(9, AttributeLayer::SEARCH),
        AttributeCategory::SearchHighlight
    );

    session.clear_highlights();
    assert!(session.attributes().spans(AttributeLayer::SEARCH).is_empty());
    assert_eq!(session.attributes().spans(AttributeLayer::SYNTAX).len(), 6);
}
