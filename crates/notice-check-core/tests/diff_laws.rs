use notice_check_core::{DiffRenderer, Document};
use proptest::prelude::*;
use proptest::test_runner::Config;

/// Short documents over a tiny alphabet so blank and repeated lines are common
fn document() -> impl Strategy<Value = Document> {
    let line = prop::sample::select(vec!["a", "b", "c", ""]);
    let terminator = prop::sample::select(vec!["\n", "\n", "\n", "\r\n", ""]);
    prop::collection::vec((line, terminator), 0..12).prop_map(|parts| {
        let text: String = parts
            .into_iter()
            .map(|(line, term)| format!("{line}{term}"))
            .collect();
        Document::new(text)
    })
}

proptest! {
    #![proptest_config(Config::with_cases(512))]
    #[test]
    fn edit_script_rebuilds_existing_lines(expected in document(), existing in document()) {
        let script = DiffRenderer::new().edit_script(&expected, &existing).unwrap();
        let rebuilt = script.apply(&expected.lines());
        prop_assert_eq!(rebuilt, Ok(existing.lines().iter().map(|l| l.to_string()).collect()));
    }

    #[test]
    fn differing_documents_render_non_empty(expected in document(), existing in document()) {
        let diff = DiffRenderer::new().render(&expected, &existing).unwrap();
        prop_assert_eq!(diff.is_empty(), expected == existing);
    }

    #[test]
    fn render_is_idempotent(expected in document(), existing in document()) {
        let renderer = DiffRenderer::new();
        let first = renderer.render(&expected, &existing).unwrap();
        let second = renderer.render(&expected, &existing).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_rendered_line_is_newline_terminated(expected in document(), existing in document()) {
        let diff = DiffRenderer::new().render(&expected, &existing).unwrap();
        prop_assert!(diff.is_empty() || diff.ends_with('\n'));
        for line in diff.lines() {
            let is_body = line.starts_with("< ") || line.starts_with("> ");
            let is_header = line.contains(['a', 'c', 'd'])
                && line.chars().next().is_some_and(|c| c.is_ascii_digit());
            prop_assert!(is_body || is_header, "unexpected line {:?}", line);
        }
    }
}
