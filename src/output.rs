//! Terminal output for search results

use crate::index::LineIndex;
use crate::query::Snippet;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print snippets with the match highlighted, separated by `--`
///
/// With `lines`, each snippet is headed by the 1-based line of its match.
pub fn print_snippets(
    snippets: &[Snippet],
    query_len: usize,
    lines: Option<&LineIndex>,
    choice: ColorChoice,
) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_snippets(&mut stdout, snippets, query_len, lines)
}

/// Print snippet texts as returned by the server
pub fn print_texts(texts: &[String], choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);

    for (i, text) in texts.iter().enumerate() {
        if i > 0 {
            write_separator(&mut stdout)?;
        }
        writeln!(stdout, "{}", text)?;
    }

    Ok(())
}

/// Print a match count line, e.g. `hamlet:474`
pub fn print_count(work: &str, count: usize, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    write!(stdout, "{}", work)?;
    stdout.reset()?;
    write!(stdout, ":")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(stdout, "{}", count)?;
    stdout.reset()
}

pub fn write_snippets<W: WriteColor>(
    out: &mut W,
    snippets: &[Snippet],
    query_len: usize,
    lines: Option<&LineIndex>,
) -> io::Result<()> {
    for (i, snippet) in snippets.iter().enumerate() {
        if i > 0 {
            write_separator(out)?;
        }

        if let Some(line) = lines.and_then(|l| l.line_of(snippet.offset)) {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "{}", line + 1)?;
            out.reset()?;
            writeln!(out, ":")?;
        }

        write_highlighted(out, snippet, query_len)?;
    }

    Ok(())
}

fn write_separator<W: WriteColor>(out: &mut W) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    writeln!(out, "--")?;
    out.reset()
}

/// Write one snippet with its match in bold red
fn write_highlighted<W: WriteColor>(out: &mut W, snippet: &Snippet, query_len: usize) -> io::Result<()> {
    let text = &snippet.text;
    let range = snippet.match_range(query_len);

    // Lossy decoding can shift bytes; fall back to plain text
    if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
        return writeln!(out, "{}", text);
    }

    write!(out, "{}", &text[..range.start])?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "{}", &text[range.clone()])?;
    out.reset()?;
    writeln!(out, "{}", &text[range.end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::{Ansi, NoColor};

    fn snippet(text: &str, offset: usize, start: usize) -> Snippet {
        Snippet {
            offset,
            start,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_plain_output() {
        let snippets = vec![snippet("a Romeo b", 12, 10), snippet("c Romeo d", 42, 40)];
        let mut out = NoColor::new(Vec::new());
        write_snippets(&mut out, &snippets, 5, None).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "a Romeo b\n--\nc Romeo d\n");
    }

    #[test]
    fn test_line_numbers() {
        let lines = LineIndex::from(vec![0, 10, 20]);
        let snippets = vec![snippet("Juliet", 12, 12)];
        let mut out = NoColor::new(Vec::new());
        write_snippets(&mut out, &snippets, 6, Some(&lines)).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "2:\nJuliet\n");
    }

    #[test]
    fn test_highlight_wraps_match() {
        let snippets = vec![snippet("to be or not", 3, 0)];
        let mut out = Ansi::new(Vec::new());
        write_snippets(&mut out, &snippets, 2, None).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with("to "));
        assert!(text.contains("be\x1b[0m"));
        assert!(text.ends_with(" or not\n"));
    }
}
