use mdcode_content::{BlockAction, Error, InfoString, parse_blocks, rewrite_blocks};
use proptest::prelude::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

/// Markdown built from prose lines and fenced blocks
fn document() -> impl Strategy<Value = String> {
    let prose = "[a-zA-Z #*-]{0,20}".prop_map(|s| format!("{s}\n"));
    let fence = (
        prop::sample::select(vec!["```", "````"]),
        "[a-z]{0,5}( [a-z]{1,4}=[a-z.]{0,6}){0,3}",
        prop::collection::vec("[a-zA-Z0-9 =;(){}]{0,20}", 0..5),
    )
        .prop_map(|(ticks, info, body)| {
            let mut out = format!("{ticks}{info}\n");
            for line in body {
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str(ticks);
            out.push('\n');
            out
        });
    prop::collection::vec(prop_oneof![prose, fence], 0..8).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn identity_rewrite_is_a_no_op(doc in document()) {
        let rewrite = block_on(rewrite_blocks(&doc, None, |block| async move {
            Ok::<_, Error>(BlockAction::Replace(block.content))
        }))
        .unwrap();
        prop_assert!(!rewrite.modified);
        prop_assert_eq!(rewrite.text, doc);
    }

    #[test]
    fn rewriting_last_block_only_touches_its_span(doc in document(), new in "[a-z]{1,10}") {
        let blocks = parse_blocks(&doc, None);
        prop_assume!(!blocks.is_empty());
        let last = blocks.last().unwrap().clone();

        let target = last.index;
        let rewrite = block_on(rewrite_blocks(&doc, None, |block| {
            let new = new.clone();
            async move {
                if block.index == target {
                    Ok::<_, Error>(BlockAction::Replace(new))
                } else {
                    Ok(BlockAction::Keep)
                }
            }
        }))
        .unwrap();

        let suffix = &doc[last.span.end..];
        prop_assert!(rewrite.text.starts_with(&doc[..last.span.start]));
        prop_assert!(rewrite.text.ends_with(suffix));

        let reparsed = parse_blocks(&rewrite.text, None);
        prop_assert_eq!(reparsed.len(), blocks.len());
        prop_assert_eq!(&reparsed[target].content, &new);
    }

    #[test]
    fn scanner_never_panics(doc in "(\\PC|\n|`){0,200}") {
        for block in parse_blocks(&doc, None) {
            prop_assert!(block.span.start <= block.span.end);
            prop_assert!(doc.is_char_boundary(block.span.start));
            prop_assert!(doc.is_char_boundary(block.span.end));
        }
    }

    #[test]
    fn info_string_render_round_trips(
        language in "[a-z]{1,6}",
        pairs in prop::collection::btree_map("[a-z]{1,5}", "[a-z0-9.=]{0,6}", 0..4),
    ) {
        let info = InfoString { language, metadata: pairs };
        prop_assert_eq!(InfoString::parse(&info.render()), info);
    }
}
