//! Turtle lexer implementation using winnow.
//!
//! Tokenizes Turtle input into a stream of tokens with source spans.
//! Fails fast on the first lexical error with a positioned message.

use std::sync::Arc;

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, peek, preceded};
use winnow::error::ContextError;
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::token::{Token, TokenKind};
use crate::error::{FormatError, Result};

/// Input type for the lexer - tracks position for spans.
type Input<'a> = LocatingSlice<&'a str>;

fn backtrack() -> winnow::error::ErrMode<ContextError> {
    winnow::error::ErrMode::Backtrack(ContextError::new())
}

/// Tokenize a Turtle document string.
///
/// Returns an error immediately on the first invalid token, with a
/// line/column message pointing at the offending character.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = LocatingSlice::new(input);

    loop {
        skip_ws_and_comments(&mut rest);

        if rest.is_empty() {
            let pos = rest.current_token_start();
            tokens.push(Token::new(TokenKind::Eof, pos, pos));
            break;
        }

        let start = rest.current_token_start();
        match next_token(&mut rest) {
            Ok(kind) => {
                let end = rest.current_token_start();
                tokens.push(Token::new(kind, start, end));
            }
            Err(_) => return Err(lex_error(input, start, &rest)),
        }
    }

    Ok(tokens)
}

/// Build a positioned lexer error for the character at `position`.
fn lex_error(source: &str, position: usize, rest: &Input<'_>) -> FormatError {
    let bad_char = rest.as_ref().chars().next().unwrap_or('?');
    let (line, col) = line_col(source, position);
    let message = match bad_char {
        '"' => format!("unterminated string literal at line {line}, column {col}"),
        '<' => format!("invalid or unterminated IRI at line {line}, column {col}"),
        c => format!("unexpected character '{c}' at line {line}, column {col}"),
    };
    FormatError::Lexer { position, message }
}

/// Convert a byte position to (line, column), 1-indexed.
fn line_col(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in source.char_indices() {
        if i >= position {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Skip whitespace and comments.
fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str, ContextError> =
                take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
            let _: ModalResult<Option<char>, ContextError> =
                opt(one_of(['\n', '\r'])).parse_next(input);
        } else {
            break;
        }
    }
}

/// Parse the next token.
fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        // Multi-char operators first
        parse_double_caret,
        parse_iri_ref,
        // Blank nodes before prefixed names
        parse_blank_node_label,
        parse_anon,
        // @prefix, @base, language tags
        parse_at_directive,
        // Default prefix (:name or :)
        parse_default_prefix,
        // Prefixed names and keywords (a, true, false)
        parse_prefixed_name_or_keyword,
        parse_string_literal,
        parse_number,
        parse_punctuation,
    ))
    .parse_next(input)
}

/// Parse an IRI reference: `<...>`
fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('<', parse_iri_content, '>')
        .map(|s: String| TokenKind::Iri(Arc::from(s)))
        .parse_next(input)
}

/// Parse the content inside an IRI (validates characters, handles \u escapes).
fn parse_iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with('>') {
            break;
        }

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            match parse_unicode_escape(input)? {
                Some(c) => result.push(c),
                None => return Err(backtrack()),
            }
        } else {
            return Err(backtrack());
        }
    }

    // Empty IRIs (relative reference) are lexed fine; the parser rejects them
    Ok(result)
}

/// Parse a Unicode escape sequence (\uXXXX or \UXXXXXXXX).
fn parse_unicode_escape(input: &mut Input<'_>) -> ModalResult<Option<char>> {
    if input.starts_with('u') {
        'u'.parse_next(input)?;
        let hex: &str = take_while(4..=4, AsChar::is_hex_digit).parse_next(input)?;
        let code = u32::from_str_radix(hex, 16).unwrap_or(0xFFFD);
        Ok(char::from_u32(code))
    } else if input.starts_with('U') {
        'U'.parse_next(input)?;
        let hex: &str = take_while(8..=8, AsChar::is_hex_digit).parse_next(input)?;
        let code = u32::from_str_radix(hex, 16).unwrap_or(0xFFFD);
        Ok(char::from_u32(code))
    } else {
        Ok(None)
    }
}

/// Parse @ directives and language tags.
fn parse_at_directive(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '@'.parse_next(input)?;

    let word: &str =
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-').parse_next(input)?;

    match word.to_lowercase().as_str() {
        "prefix" => Ok(TokenKind::KwPrefix),
        "base" => Ok(TokenKind::KwBase),
        _ => Ok(TokenKind::LangTag(Arc::from(word))),
    }
}

/// Parse a default prefix name (`:local`) or default prefix namespace (`:`).
fn parse_default_prefix(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;

    let local = opt(parse_pn_local).parse_next(input)?;

    match local {
        Some(local) => Ok(TokenKind::PrefixedName {
            prefix: Arc::from(""),
            local: Arc::from(local.as_str()),
        }),
        None => Ok(TokenKind::PrefixedNameNs(Arc::from(""))),
    }
}

/// Parse a prefixed name or a bare keyword (a, true, false).
fn parse_prefixed_name_or_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let start = input.checkpoint();

    let first_char = input.chars().next().ok_or_else(backtrack)?;
    let is_valid_prefix_start = is_pn_prefix_start(first_char);

    let mut word = String::new();
    let c: char = any.parse_next(input)?;
    word.push(c);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        // A dot is part of the name only when followed by another name char
        if input.starts_with('.') {
            let rest = &input.as_ref()[1..];
            if rest.chars().next().is_some_and(is_pn_chars) {
                '.'.parse_next(input)?;
                word.push('.');
                continue;
            }
        }
        break;
    }

    if peek(opt(':')).parse_next(input)?.is_some() {
        if !is_valid_prefix_start {
            input.reset(&start);
            return Err(backtrack());
        }

        ':'.parse_next(input)?;
        let local = opt(parse_pn_local).parse_next(input)?;

        match local {
            Some(local) => Ok(TokenKind::PrefixedName {
                prefix: Arc::from(word.as_str()),
                local: Arc::from(local.as_str()),
            }),
            None => Ok(TokenKind::PrefixedNameNs(Arc::from(word.as_str()))),
        }
    } else {
        match word.as_str() {
            "a" => Ok(TokenKind::KwA),
            "true" => Ok(TokenKind::KwTrue),
            "false" => Ok(TokenKind::KwFalse),
            _ => {
                input.reset(&start);
                Err(backtrack())
            }
        }
    }
}

/// Parse a local name (after the colon in a prefixed name).
fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    let first_char = input.chars().next().ok_or_else(backtrack)?;

    if !is_pn_local_start(first_char) {
        return Err(backtrack());
    }

    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        result.push_str(chunk);

        // Interior dots are allowed, trailing dots terminate the name
        if input.starts_with('.') {
            let rest = &input.as_ref()[1..];
            if rest.chars().next().is_some_and(is_pn_chars) {
                '.'.parse_next(input)?;
                result.push('.');
                continue;
            }
        }
        break;
    }

    if result.is_empty() {
        return Err(backtrack());
    }

    Ok(result)
}

/// Parse a blank node label: `_:name`
fn parse_blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded("_:", parse_blank_node_name)
        .map(|name: &str| TokenKind::BlankNodeLabel(Arc::from(name)))
        .parse_next(input)
}

/// Parse a blank node name (after `_:`).
fn parse_blank_node_name<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    let result: &str = (
        take_while(1, |c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
        take_while(0.., |c: char| is_pn_chars(c) || c == '.'),
    )
        .take()
        .parse_next(input)?;

    if result.ends_with('.') {
        return Err(backtrack());
    }

    Ok(result)
}

/// Parse anonymous blank node: `[]`
fn parse_anon(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('[', take_while(0.., is_ws), ']')
        .map(|_| TokenKind::Anon)
        .parse_next(input)
}

/// Parse a double-quoted string literal.
fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('"', parse_string_content, '"')
        .map(|s| TokenKind::String(Arc::from(s)))
        .parse_next(input)
}

fn parse_string_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., |c| c != '"' && c != '\\' && c != '\n' && c != '\r')
            .parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with('"') {
            break;
        }

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let escaped = parse_escape_char(input)?;
            result.push(escaped);
        } else {
            break;
        }
    }

    Ok(result)
}

fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    let c: char = any.parse_next(input)?;
    match c {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        'u' => {
            let hex: &str = take_while(4..=4, AsChar::is_hex_digit).parse_next(input)?;
            let code = u32::from_str_radix(hex, 16).map_err(|_| backtrack())?;
            char::from_u32(code).ok_or_else(backtrack)
        }
        'U' => {
            let hex: &str = take_while(8..=8, AsChar::is_hex_digit).parse_next(input)?;
            let code = u32::from_str_radix(hex, 16).map_err(|_| backtrack())?;
            char::from_u32(code).ok_or_else(backtrack)
        }
        _ => Err(backtrack()),
    }
}

fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((parse_double, parse_decimal, parse_integer)).parse_next(input)
}

fn parse_integer(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let sign = opt(one_of(['+', '-'])).parse_next(input)?;
    let digits: &str = digit1.parse_next(input)?;

    if peek(opt(one_of(['e', 'E']))).parse_next(input)?.is_some() {
        return Err(backtrack());
    }

    if input.starts_with('.') {
        let rest = &input.as_ref()[1..];
        if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(backtrack());
        }
    }

    let mut num_str = String::new();
    if let Some(s) = sign {
        num_str.push(s);
    }
    num_str.push_str(digits);

    let value = num_str.parse::<i64>().map_err(|_| backtrack())?;
    Ok(TokenKind::Integer(value))
}

fn parse_decimal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let sign = opt(one_of(['+', '-'])).parse_next(input)?;

    let (whole, frac): (&str, &str) = (digit1, preceded('.', digit1)).parse_next(input)?;

    if peek(opt(one_of(['e', 'E']))).parse_next(input)?.is_some() {
        return Err(backtrack());
    }

    let mut num_str = String::new();
    if let Some(s) = sign {
        num_str.push(s);
    }
    num_str.push_str(whole);
    num_str.push('.');
    num_str.push_str(frac);

    Ok(TokenKind::Decimal(Arc::from(num_str)))
}

fn parse_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let sign = opt(one_of(['+', '-'])).parse_next(input)?;

    let mantissa = alt(((digit1, '.', opt(digit1)).take(), ('.', digit1).take(), digit1))
        .parse_next(input)?;

    one_of(['e', 'E']).parse_next(input)?;
    let exp_sign = opt(one_of(['+', '-'])).parse_next(input)?;
    let exp_digits: &str = digit1.parse_next(input)?;

    let mut num_str = String::new();
    if let Some(s) = sign {
        num_str.push(s);
    }
    num_str.push_str(mantissa);
    num_str.push('e');
    if let Some(s) = exp_sign {
        num_str.push(s);
    }
    num_str.push_str(exp_digits);

    let value = num_str.parse::<f64>().map_err(|_| backtrack())?;
    Ok(TokenKind::Double(value))
}

fn parse_double_caret(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "^^".map(|_| TokenKind::DoubleCaret).parse_next(input)
}

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        _ => None,
    })
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Eof))
            .collect()
    }

    #[test]
    fn iri() {
        assert_eq!(
            tok("<http://example.org/>"),
            vec![TokenKind::Iri(Arc::from("http://example.org/"))]
        );
    }

    #[test]
    fn prefixed_names() {
        assert_eq!(
            tok("sim:Maggie"),
            vec![TokenKind::PrefixedName {
                prefix: Arc::from("sim"),
                local: Arc::from("Maggie"),
            }]
        );
        assert_eq!(tok("sim:"), vec![TokenKind::PrefixedNameNs(Arc::from("sim"))]);
        assert_eq!(
            tok(":name"),
            vec![TokenKind::PrefixedName {
                prefix: Arc::from(""),
                local: Arc::from("name"),
            }]
        );
    }

    #[test]
    fn blank_nodes() {
        assert_eq!(tok("_:b1"), vec![TokenKind::BlankNodeLabel(Arc::from("b1"))]);
        assert_eq!(tok("[]"), vec![TokenKind::Anon]);
        assert_eq!(tok("[ ]"), vec![TokenKind::Anon]);
    }

    #[test]
    fn keywords() {
        assert_eq!(tok("a"), vec![TokenKind::KwA]);
        assert_eq!(tok("true"), vec![TokenKind::KwTrue]);
        assert_eq!(tok("false"), vec![TokenKind::KwFalse]);
        assert_eq!(tok("@prefix"), vec![TokenKind::KwPrefix]);
        assert_eq!(tok("@base"), vec![TokenKind::KwBase]);
    }

    #[test]
    fn lang_tags() {
        assert_eq!(tok("@en"), vec![TokenKind::LangTag(Arc::from("en"))]);
        assert_eq!(tok("@en-US"), vec![TokenKind::LangTag(Arc::from("en-US"))]);
    }

    #[test]
    fn strings_and_escapes() {
        assert_eq!(tok("\"hello\""), vec![TokenKind::String(Arc::from("hello"))]);
        assert_eq!(
            tok("\"hello\\nworld\""),
            vec![TokenKind::String(Arc::from("hello\nworld"))]
        );
        assert_eq!(
            tok("\"quote \\\" here\""),
            vec![TokenKind::String(Arc::from("quote \" here"))]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(tok("42"), vec![TokenKind::Integer(42)]);
        assert_eq!(tok("-42"), vec![TokenKind::Integer(-42)]);
        assert_eq!(tok("3.14"), vec![TokenKind::Decimal(Arc::from("3.14"))]);
        assert_eq!(tok("1e10"), vec![TokenKind::Double(1e10)]);
        assert_eq!(tok("1.5e0"), vec![TokenKind::Double(1.5)]);
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            tok(".;,"),
            vec![TokenKind::Dot, TokenKind::Semicolon, TokenKind::Comma]
        );
        assert_eq!(tok("^^"), vec![TokenKind::DoubleCaret]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            tok("sim:Herb # the lost brother\nsim:Abe"),
            vec![
                TokenKind::PrefixedName {
                    prefix: Arc::from("sim"),
                    local: Arc::from("Herb"),
                },
                TokenKind::PrefixedName {
                    prefix: Arc::from("sim"),
                    local: Arc::from("Abe"),
                },
            ]
        );
    }

    #[test]
    fn error_has_line_info() {
        let err = tokenize("sim:name \"ok\" .\nsim:other $ .").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains('$'), "{msg}");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(tokenize("sim:name \"unterminated").is_err());
    }
}
