#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shakesearch::index::Corpus;
use shakesearch::query::{Snippet, View};

#[derive(Arbitrary, Debug)]
struct Input {
    text: Vec<u8>,
    query: String,
    context: u8,
}

fuzz_target!(|input: Input| {
    let Ok(corpus) = Corpus::from_bytes(input.text.clone()) else {
        return;
    };
    let view = View::unrestricted(corpus).with_context(input.context as usize);

    let offsets = view.match_offsets(&input.query);
    assert_eq!(offsets.len(), view.search(&input.query).len());

    for offset in offsets {
        let snippet = Snippet::extract(&input.text, offset, input.context as usize);
        assert!(snippet.start <= offset);
    }
});
