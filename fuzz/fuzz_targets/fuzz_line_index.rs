#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shakesearch::index::{Bound, LineIndex};

#[derive(Arbitrary, Debug)]
struct Input {
    text: Vec<u8>,
    start_line: usize,
    end_line: usize,
}

fuzz_target!(|input: Input| {
    let lines = LineIndex::build(&input.text);
    let count = lines.line_count();
    let (start, end) = (input.start_line % (count + 2), input.end_line % (count + 2));

    // Either a valid byte range or an error, never a panic
    if let Ok(bound) = Bound::from_lines(start, end, &lines) {
        assert!(bound.start <= bound.end);
        assert!(bound.end <= input.text.len());
    }
});
