//! Recursive-descent parser for the grammar of §4.3:
//! `E := E "|" T | T;  T := T F | F;  F := P ("*"|"+"|"?")? ;  P := literal |
//! escape | "(" E ")"`. No backtracking; reports the leftmost failure.

use super::ast::{Ast, ClassKind};
use crate::error::{Error, RegexSyntaxKind, Result};

pub fn parse(pattern: &str) -> Result<Ast> {
    let mut p = Parser { chars: pattern.chars().collect(), pos: 0 };
    let ast = p.parse_union()?;
    if p.pos != p.chars.len() {
        // Only reachable via an unmatched ')'.
        return Err(p.err(RegexSyntaxKind::UnbalancedParens));
    }
    Ok(ast)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn err(&self, kind: RegexSyntaxKind) -> Error {
        Error::RegexSyntaxError { position: self.pos, kind }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// `E := E "|" T | T`, implemented iteratively (left fold).
    fn parse_union(&mut self) -> Result<Ast> {
        let mut lhs = self.parse_concat()?;
        while self.peek() == Some('|') {
            self.bump();
            let rhs = self.parse_concat()?;
            lhs = Ast::Union(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// `T := T F | F`, implemented as repeated `F` until a delimiter.
    fn parse_concat(&mut self) -> Result<Ast> {
        let mut parts = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            parts.push(self.parse_term()?);
        }
        if parts.is_empty() {
            return Err(self.err(RegexSyntaxKind::UnexpectedEnd));
        }
        Ok(Ast::concat(parts))
    }

    /// `F := P ("*"|"+"|"?")?` — at most one postfix operator.
    fn parse_term(&mut self) -> Result<Ast> {
        let atom = self.parse_atom()?;
        match self.peek() {
            Some('*') => {
                self.bump();
                Ok(Ast::Star(Box::new(atom)))
            }
            Some('+') => {
                self.bump();
                Ok(Ast::Plus(Box::new(atom)))
            }
            Some('?') => {
                self.bump();
                Ok(Ast::Question(Box::new(atom)))
            }
            _ => Ok(atom),
        }
    }

    /// `P := literal | escape | "(" E ")"`.
    fn parse_atom(&mut self) -> Result<Ast> {
        match self.peek() {
            None => Err(self.err(RegexSyntaxKind::UnexpectedEnd)),
            Some('*') | Some('+') | Some('?') => {
                Err(self.err(RegexSyntaxKind::TrailingPostfixOperator))
            }
            Some('(') => {
                self.bump();
                if self.peek() == Some(')') {
                    return Err(self.err(RegexSyntaxKind::EmptyGroup));
                }
                let inner = self.parse_union()?;
                match self.bump() {
                    Some(')') => Ok(inner),
                    _ => Err(self.err(RegexSyntaxKind::UnbalancedParens)),
                }
            }
            Some(')') => Err(self.err(RegexSyntaxKind::UnbalancedParens)),
            Some('\\') => {
                self.bump();
                self.parse_escape()
            }
            Some(c) => {
                self.bump();
                Ok(Ast::Literal(c))
            }
        }
    }

    fn parse_escape(&mut self) -> Result<Ast> {
        let pos_of_backslash = self.pos - 1;
        let c = self.bump().ok_or_else(|| Error::RegexSyntaxError {
            position: pos_of_backslash,
            kind: RegexSyntaxKind::UnexpectedEnd,
        })?;
        match c {
            'd' => Ok(Ast::CharClass(ClassKind::Digit)),
            'w' => Ok(Ast::CharClass(ClassKind::Word)),
            's' => Ok(Ast::CharClass(ClassKind::Space)),
            '.' | '*' | '(' | ')' | '\\' | '|' | '+' | '?' => Ok(Ast::Literal(c)),
            other => Err(Error::RegexSyntaxError {
                position: pos_of_backslash,
                kind: RegexSyntaxKind::UnknownEscape(other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_union_and_concat_with_correct_precedence() {
        // ab|c  ==  (a.b)|c
        let ast = parse("ab|c").unwrap();
        match ast {
            Ast::Union(lhs, rhs) => {
                assert_eq!(*lhs, Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('b')]));
                assert_eq!(*rhs, Ast::Literal('c'));
            }
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn postfix_binds_tighter_than_concat() {
        // ab* == a.(b*)
        let ast = parse("ab*").unwrap();
        assert_eq!(
            ast,
            Ast::Concat(vec![Ast::Literal('a'), Ast::Star(Box::new(Ast::Literal('b')))])
        );
    }

    #[test]
    fn unbalanced_parens_is_reported() {
        let err = parse("(ab").unwrap_err();
        assert!(matches!(
            err,
            Error::RegexSyntaxError { kind: RegexSyntaxKind::UnbalancedParens, .. }
        ));
    }

    #[test]
    fn trailing_postfix_operator_is_reported() {
        let err = parse("*ab").unwrap_err();
        assert!(matches!(
            err,
            Error::RegexSyntaxError { kind: RegexSyntaxKind::TrailingPostfixOperator, .. }
        ));
    }

    #[test]
    fn unknown_escape_is_reported() {
        let err = parse(r"\q").unwrap_err();
        assert!(matches!(
            err,
            Error::RegexSyntaxError { kind: RegexSyntaxKind::UnknownEscape('q'), .. }
        ));
    }

    #[test]
    fn leftmost_failure_is_reported_first() {
        // Two problems: unknown escape at 1, then unbalanced paren later.
        // The parser must fail at the leftmost one.
        let err = parse(r"\q(ab").unwrap_err();
        assert!(matches!(
            err,
            Error::RegexSyntaxError { position: 0, kind: RegexSyntaxKind::UnknownEscape('q') }
        ));
    }
}
