//! PGN movetext tokenising and rendering.
//!
//! Only the movetext of a single game is handled here. Tag pairs are split
//! off and handed back untouched; multi-game framing belongs to the caller.

/// Game termination markers. They end the movetext and are never decoded as
/// moves.
pub const TERMINATION_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

pub fn is_termination_marker(token: &str) -> bool {
    TERMINATION_MARKERS.contains(&token)
}

/// Separates leading `[Tag "value"]` lines from the movetext that follows.
///
/// Tag lines are returned trimmed and unparsed. The remaining lines are
/// joined with single spaces.
pub fn split_tags(pgn: &str) -> (Vec<&str>, String) {
    let mut tags = Vec::new();
    let mut lines = pgn.lines().peekable();

    while let Some(line) = lines.peek() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            tags.push(trimmed);
        } else if !trimmed.is_empty() {
            break;
        }
        lines.next();
    }

    let movetext = lines
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (tags, movetext)
}

/// Splits movetext into move tokens.
///
/// Comments (`{...}` and `;` to end of line), variations in parentheses,
/// move numbers, ellipses and `$n` annotation glyphs are dropped. Castling
/// written with zeros is rewritten with the letter O. Termination markers
/// are kept so the caller can see where the game ended.
pub fn movetext_tokens(movetext: &str) -> Vec<String> {
    strip_comments(movetext)
        .split_whitespace()
        .filter_map(clean_token)
        .collect()
}

fn strip_comments(movetext: &str) -> String {
    let mut out = String::with_capacity(movetext.len());
    let mut in_brace = false;
    let mut in_line_comment = false;
    let mut depth = 0usize;

    for c in movetext.chars() {
        if in_brace {
            if c == '}' {
                in_brace = false;
                out.push(' ');
            }
            continue;
        }
        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
                out.push(' ');
            }
            continue;
        }
        match c {
            '{' => in_brace = true,
            ';' => in_line_comment = true,
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                out.push(' ');
            }
            _ if depth > 0 => {}
            _ => out.push(c),
        }
    }
    out
}

fn clean_token(word: &str) -> Option<String> {
    if is_termination_marker(word) {
        return Some(word.to_string());
    }
    if word.starts_with('$') {
        return None;
    }

    // "12." / "12..." / "12.e4" / "..."
    let digits = word.bytes().take_while(u8::is_ascii_digit).count();
    let rest = if word[digits..].starts_with('.') {
        word[digits..].trim_start_matches('.')
    } else {
        word
    };
    if rest.is_empty() {
        return None;
    }

    let token = if let Some(tail) = rest.strip_prefix("0-0-0") {
        format!("O-O-O{}", tail)
    } else if let Some(tail) = rest.strip_prefix("0-0") {
        format!("O-O{}", tail)
    } else {
        rest.to_string()
    };
    Some(token)
}

/// Renders SAN moves as numbered movetext, e.g. `1. e4 e5 2. Nf3`.
///
/// `first_move` is the fullmove number of the first entry and `black_first`
/// marks a game whose first recorded move is Black's (`5... e5 6. Nf3`).
pub fn write_movetext<S: AsRef<str>>(
    sans: &[S],
    first_move: u32,
    black_first: bool,
    result: Option<&str>,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(sans.len() + sans.len() / 2 + 1);
    let mut number = first_move;
    let mut white_to_move = !black_first;

    for (i, san) in sans.iter().enumerate() {
        if white_to_move {
            parts.push(format!("{}.", number));
        } else if i == 0 {
            parts.push(format!("{}...", number));
        }
        parts.push(san.as_ref().to_string());
        if !white_to_move {
            number += 1;
        }
        white_to_move = !white_to_move;
    }

    if let Some(marker) = result {
        parts.push(marker.to_string());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_drop_numbers_and_comments() {
        let tokens = movetext_tokens("1. e4 {best by test} e5 2. Nf3 $1 Nc6 3... a6 1-0");
        assert_eq!(tokens, ["e4", "e5", "Nf3", "Nc6", "a6", "1-0"]);
    }

    #[test]
    fn tokens_drop_variations_and_line_comments() {
        let tokens = movetext_tokens("1. e4 (1. d4 d5 (1... Nf6)) e5 ; a comment\n2. Nf3 *");
        assert_eq!(tokens, ["e4", "e5", "Nf3", "*"]);
    }

    #[test]
    fn tokens_glued_to_move_numbers() {
        assert_eq!(movetext_tokens("1.e4 1...e5 2.Nf3"), ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn zero_castling_is_normalised() {
        assert_eq!(
            movetext_tokens("5. 0-0 0-0-0+ 0-1"),
            ["O-O", "O-O-O+", "0-1"]
        );
    }

    #[test]
    fn termination_markers() {
        for marker in ["1-0", "0-1", "1/2-1/2", "*"] {
            assert!(is_termination_marker(marker));
        }
        assert!(!is_termination_marker("O-O"));
        assert!(!is_termination_marker("1-1"));
    }

    #[test]
    fn split_tags_from_movetext() {
        let pgn = "[Event \"Casual\"]\n[White \"A\"]\n\n1. e4 e5\n2. Nf3 1-0\n";
        let (tags, movetext) = split_tags(pgn);
        assert_eq!(tags, ["[Event \"Casual\"]", "[White \"A\"]"]);
        assert_eq!(movetext, "1. e4 e5 2. Nf3 1-0");
    }

    #[test]
    fn split_tags_without_tags() {
        let (tags, movetext) = split_tags("1. f3 e5 2. g4 Qh4#");
        assert!(tags.is_empty());
        assert_eq!(movetext, "1. f3 e5 2. g4 Qh4#");
    }

    #[test]
    fn write_numbered_movetext() {
        assert_eq!(
            write_movetext(&["e4", "e5", "Nf3"], 1, false, None),
            "1. e4 e5 2. Nf3"
        );
        assert_eq!(
            write_movetext(&["f3", "e5", "g4", "Qh4#"], 1, false, Some("0-1")),
            "1. f3 e5 2. g4 Qh4# 0-1"
        );
    }

    #[test]
    fn write_movetext_black_first() {
        assert_eq!(
            write_movetext(&["e5", "Nf3", "Nc6"], 5, true, None),
            "5... e5 6. Nf3 Nc6"
        );
    }

    #[test]
    fn write_empty_movetext() {
        let none: [&str; 0] = [];
        assert_eq!(write_movetext(&none, 1, false, Some("*")), "*");
    }
}
