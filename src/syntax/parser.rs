//! Lightweight C# scanner producing the tree model.
//!
//! This is not a C# parser. It knows just enough of the lexical grammar to
//! find every string construct reliably: comments, regular, verbatim and
//! raw string literals, character literals, interpolated strings of every
//! flavor, and the bracket structure needed to find the end of a hole.
//! Everything else becomes opaque token runs.
//!
//! Offsets are character offsets, matching [`LineIndex`]. A leading byte
//! order mark keeps offset 0 but is never scanned.

use super::span::{LineIndex, TextRange, BYTE_ORDER_MARK};
use super::tree::{
    Delimiter, Expr, Group, HoleSegment, InterpolatedStringNode, LiteralSegment, NodeId, Segment,
    StringKind, SyntaxTree,
};
use crate::error::ParseError;

/// Stop characters while scanning a hole expression.
const HOLE_EXPR_STOPS: &[char] = &[',', ':', '}'];
/// Stop characters while scanning an alignment clause.
const ALIGNMENT_STOPS: &[char] = &[':', '}'];

/// Scan C# source text into a [`SyntaxTree`].
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    let mut scanner = Scanner::new(source);
    let items = scanner.parse_items(&[])?;
    Ok(SyntaxTree::new(items, LineIndex::new(source)))
}

fn bracket_pair(open: char) -> Option<(Delimiter, char)> {
    match open {
        '(' => Some((Delimiter::Paren, ')')),
        '[' => Some((Delimiter::Bracket, ']')),
        '{' => Some((Delimiter::Brace, '}')),
        _ => None,
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    next_id: u32,
}

impl Scanner {
    fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let pos = usize::from(chars.first() == Some(&BYTE_ORDER_MARK));
        Self {
            chars,
            pos,
            next_id: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    /// Number of consecutive `c` starting at `at`.
    fn run_length(&self, at: usize, c: char) -> usize {
        self.chars
            .get(at..)
            .map(|rest| rest.iter().take_while(|&&x| x == c).count())
            .unwrap_or(0)
    }

    fn text(&self, range: TextRange) -> String {
        self.chars[range.start..range.end].iter().collect()
    }

    /// Scan items until end of input or an unnested character in `stops`.
    ///
    /// A closing bracket that is not a stop is an error.
    fn parse_items(&mut self, stops: &[char]) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();

        while let Some(c) = self.peek() {
            if stops.contains(&c) && !self.at_scope_qualifier() {
                break;
            }
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }
            if self.skip_comment()? || self.skip_directive() {
                continue;
            }
            if let Some(item) = self.parse_item()? {
                items.push(item);
                continue;
            }
            if matches!(c, ')' | ']' | '}') {
                return Err(ParseError::UnbalancedDelimiter {
                    found: c,
                    offset: self.pos,
                });
            }
            items.push(self.opaque_run(stops));
        }

        Ok(items)
    }

    /// `::` in `global::System` must not end a hole expression.
    fn at_scope_qualifier(&self) -> bool {
        self.peek() == Some(':') && self.peek_at(1) == Some(':')
    }

    /// Skip a preprocessor line (`#region`, `#if`, `#error`, ...). Its
    /// text is free-form and may hold unbalanced quotes.
    fn skip_directive(&mut self) -> bool {
        if self.peek() != Some('#') || !self.at_line_start() {
            return false;
        }
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
        true
    }

    /// Only blanks precede the cursor on its line.
    fn at_line_start(&self) -> bool {
        self.chars[..self.pos]
            .iter()
            .rev()
            .take_while(|&&c| c != '\n')
            .all(|&c| c == ' ' || c == '\t' || c == BYTE_ORDER_MARK)
    }

    fn skip_comment(&mut self) -> Result<bool, ParseError> {
        match (self.peek(), self.peek_at(1)) {
            (Some('/'), Some('/')) => {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.pos += 1;
                }
                Ok(true)
            }
            (Some('/'), Some('*')) => {
                let start = self.pos;
                self.pos += 2;
                loop {
                    match (self.peek(), self.peek_at(1)) {
                        (Some('*'), Some('/')) => {
                            self.pos += 2;
                            return Ok(true);
                        }
                        (Some(_), _) => self.pos += 1,
                        (None, _) => return Err(ParseError::UnterminatedComment(start)),
                    }
                }
            }
            _ => Ok(false),
        }
    }

    /// Scan one structured item at the cursor, if one starts here.
    fn parse_item(&mut self) -> Result<Option<Expr>, ParseError> {
        if let Some((kind, open_len)) = self.interpolated_opening() {
            let node = self.interpolated_string(kind, open_len)?;
            return Ok(Some(Expr::Interpolated(node)));
        }

        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        if let Some((delimiter, close)) = bracket_pair(c) {
            return self.group(delimiter, close).map(Some);
        }

        match c {
            '"' => self.string_literal()?,
            '@' if self.peek_at(1) == Some('"') => self.verbatim_literal()?,
            '\'' => self.char_literal()?,
            c if c.is_ascii_digit() => self.numeric_literal(),
            _ => return Ok(None),
        }

        Ok(Some(Expr::Literal(TextRange::new(start, self.pos))))
    }

    /// Recognize the opening marker of an interpolated string.
    ///
    /// Returns the string kind and the length of the marker.
    fn interpolated_opening(&self) -> Option<(StringKind, usize)> {
        match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some('$'), Some('@'), Some('"')) | (Some('@'), Some('$'), Some('"')) => {
                return Some((StringKind::Verbatim, 3));
            }
            _ => {}
        }

        let dollars = self.run_length(self.pos, '$');
        if dollars == 0 {
            return None;
        }
        let quotes = self.run_length(self.pos + dollars, '"');
        if quotes >= 3 {
            Some((StringKind::Raw { dollars, quotes }, dollars + quotes))
        } else if dollars == 1 && quotes >= 1 {
            Some((StringKind::Regular, 2))
        } else {
            None
        }
    }

    fn interpolated_string(
        &mut self,
        kind: StringKind,
        open_len: usize,
    ) -> Result<InterpolatedStringNode, ParseError> {
        let start = self.pos;
        let id = NodeId(self.next_id);
        self.next_id += 1;

        self.pos += open_len;
        let content_start = self.pos;
        let mut segments = Vec::new();
        let mut literal_start = self.pos;

        loop {
            let c = self
                .peek()
                .ok_or(ParseError::UnterminatedString(start))?;

            let hole_braces = match kind {
                StringKind::Regular | StringKind::Verbatim => {
                    let verbatim = kind == StringKind::Verbatim;
                    match c {
                        '"' if verbatim && self.peek_at(1) == Some('"') => {
                            self.pos += 2;
                            continue;
                        }
                        '"' => break,
                        '\\' if !verbatim => {
                            self.pos += 2;
                            continue;
                        }
                        '\n' if !verbatim => return Err(ParseError::UnterminatedString(start)),
                        '{' | '}' if self.peek_at(1) == Some(c) => {
                            self.pos += 2;
                            continue;
                        }
                        '{' => 1,
                        _ => {
                            self.pos += 1;
                            continue;
                        }
                    }
                }
                StringKind::Raw { dollars, quotes } => match c {
                    '"' => {
                        let run = self.run_length(self.pos, '"');
                        if run >= quotes {
                            self.pos += run - quotes;
                            break;
                        }
                        self.pos += run;
                        continue;
                    }
                    '{' => {
                        let run = self.run_length(self.pos, '{');
                        if run < dollars {
                            self.pos += run;
                            continue;
                        }
                        // Only the innermost `dollars` braces open the hole.
                        self.pos += run - dollars;
                        dollars
                    }
                    _ => {
                        self.pos += 1;
                        continue;
                    }
                },
            };

            self.push_literal(&mut segments, literal_start);
            let hole = self.hole(hole_braces)?;
            segments.push(Segment::Hole(hole));
            literal_start = self.pos;
        }

        self.push_literal(&mut segments, literal_start);
        let content = TextRange::new(content_start, self.pos);
        self.pos += match kind {
            StringKind::Raw { quotes, .. } => quotes,
            _ => 1,
        };

        Ok(InterpolatedStringNode {
            id,
            kind,
            range: TextRange::new(start, self.pos),
            content,
            segments,
        })
    }

    /// Close the pending literal segment, if it is not empty.
    fn push_literal(&self, segments: &mut Vec<Segment>, start: usize) {
        if start < self.pos {
            let range = TextRange::new(start, self.pos);
            segments.push(Segment::Literal(LiteralSegment {
                text: self.text(range),
                range,
            }));
        }
    }

    /// Scan a hole opened by `braces` braces at the cursor.
    fn hole(&mut self, braces: usize) -> Result<HoleSegment, ParseError> {
        let start = self.pos;
        self.pos += braces;

        let expression = self.hole_expr(HOLE_EXPR_STOPS)?;

        let alignment = if self.peek() == Some(',') {
            self.pos += 1;
            Some(self.hole_expr(ALIGNMENT_STOPS)?)
        } else {
            None
        };

        let format = if self.peek() == Some(':') {
            self.pos += 1;
            let format_start = self.pos;
            while let Some(c) = self.peek() {
                if c == '}' {
                    break;
                }
                self.pos += 1;
            }
            Some(TextRange::new(format_start, self.pos))
        } else {
            None
        };

        if self.run_length(self.pos, '}') < braces {
            return Err(ParseError::UnterminatedHole(start));
        }
        self.pos += braces;

        Ok(HoleSegment {
            expression,
            alignment,
            format,
            range: TextRange::new(start, self.pos),
        })
    }

    fn hole_expr(&mut self, stops: &[char]) -> Result<Expr, ParseError> {
        let mut items = self.parse_items(stops)?;
        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        let range = match (items.first(), items.last()) {
            (Some(first), Some(last)) => TextRange::new(first.range().start, last.range().end),
            _ => TextRange::new(self.pos, self.pos),
        };
        Ok(Expr::Group(Group {
            delimiter: Delimiter::None,
            range,
            children: items,
        }))
    }

    fn group(&mut self, delimiter: Delimiter, close: char) -> Result<Expr, ParseError> {
        let start = self.pos;
        let open = self.chars[start];
        self.pos += 1;

        let children = self.parse_items(&[close])?;
        if self.peek() != Some(close) {
            return Err(ParseError::UnbalancedDelimiter {
                found: open,
                offset: start,
            });
        }
        self.pos += 1;

        Ok(Expr::Group(Group {
            delimiter,
            range: TextRange::new(start, self.pos),
            children,
        }))
    }

    /// Regular `"..."` or raw `"""..."""` string literal.
    fn string_literal(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let quotes = self.run_length(start, '"');

        if quotes >= 3 {
            self.pos += quotes;
            loop {
                match self.peek() {
                    None => return Err(ParseError::UnterminatedString(start)),
                    Some('"') => {
                        let run = self.run_length(self.pos, '"');
                        self.pos += run;
                        if run >= quotes {
                            return Ok(());
                        }
                    }
                    Some(_) => self.pos += 1,
                }
            }
        }

        self.pos += 1;
        loop {
            match self.peek() {
                None | Some('\n') => return Err(ParseError::UnterminatedString(start)),
                Some('\\') => self.pos += 2,
                Some('"') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn verbatim_literal(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 2;
        loop {
            match self.peek() {
                None => return Err(ParseError::UnterminatedString(start)),
                Some('"') if self.peek_at(1) == Some('"') => self.pos += 2,
                Some('"') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn char_literal(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some('\n') => return Err(ParseError::UnterminatedString(start)),
                Some('\\') => self.pos += 2,
                Some('\'') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn numeric_literal(&mut self) {
        while let Some(c) = self.peek() {
            let fraction = c == '.' && self.peek_at(1).map_or(false, |n| n.is_ascii_digit());
            if !(c.is_ascii_alphanumeric() || c == '_' || fraction) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Whether a string, character literal or comment starts at the cursor.
    fn starts_item(&self) -> bool {
        match self.peek() {
            Some('"') | Some('\'') => true,
            Some('/') => matches!(self.peek_at(1), Some('/') | Some('*')),
            Some('@') => self.peek_at(1) == Some('"') || self.interpolated_opening().is_some(),
            Some('$') => self.interpolated_opening().is_some(),
            _ => false,
        }
    }

    /// Consume a run of tokens that carry no structure.
    fn opaque_run(&mut self, stops: &[char]) -> Expr {
        let start = self.pos;
        self.pos += if self.at_scope_qualifier() { 2 } else { 1 };

        while let Some(c) = self.peek() {
            if self.at_scope_qualifier() {
                self.pos += 2;
                continue;
            }
            if c.is_whitespace()
                || stops.contains(&c)
                || matches!(c, '(' | ')' | '[' | ']' | '{' | '}')
                || self.starts_item()
            {
                break;
            }
            self.pos += 1;
        }

        Expr::Opaque(TextRange::new(start, self.pos))
    }
}
