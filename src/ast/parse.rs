//! Parse formulas and proof scripts.

use std::fmt::Display;
use std::sync::Arc;

use thiserror::Error;

use crate::ast::{Command, LineDecl};
use crate::formula::{is_variable, BinaryOp, Formula};
use crate::proofs::InferenceRule;
use crate::util::Symbol;

pub fn parse_program(filename: Option<String>, input: &str) -> Result<Vec<Command>, ParseError> {
    let (out, rest) = program(&Context::new(filename, input))?;
    rest.expect_end()?;
    Ok(out)
}

pub fn parse_formula(filename: Option<String>, input: &str) -> Result<Formula, ParseError> {
    let (out, rest) = formula(&Context::new(filename, input))?;
    rest.expect_end()?;
    Ok(out)
}

/// A [`Span`] contains the file name and a pair of offsets representing the start and the end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span(Arc<SrcFile>, usize, usize);

impl Span {
    pub fn string(&self) -> &str {
        &self.0.contents[self.1..self.2]
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SrcFile {
    name: Option<String>,
    contents: String,
}

struct Location {
    line: usize,
    col: usize,
}

impl SrcFile {
    fn get_location(&self, offset: usize) -> Location {
        let mut line = 1;
        let mut col = 1;
        for (i, c) in self.contents.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        Location { line, col }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = self.0.get_location(self.1);
        let end = self.0.get_location(self.2.saturating_sub(1).max(self.1));
        let quote = self.string();
        match (&self.0.name, start.line == end.line) {
            (Some(filename), true) => write!(
                f,
                "In {}:{}-{} of {filename}: {quote}",
                start.line, start.col, end.col
            ),
            (Some(filename), false) => write!(
                f,
                "In {}:{}-{}:{} of {filename}: {quote}",
                start.line, start.col, end.line, end.col
            ),
            (None, false) => write!(
                f,
                "In {}:{}-{}:{}: {quote}",
                start.line, start.col, end.line, end.col
            ),
            (None, true) => write!(f, "In {}:{}-{}: {quote}", start.line, start.col, end.col),
        }
    }
}

#[derive(Clone, Debug)]
struct Context {
    source: Arc<SrcFile>,
    index: usize,
    /// Number of enclosing formulas.
    depth: usize,
}

impl Context {
    fn new(name: Option<String>, contents: &str) -> Context {
        let mut next = Context {
            source: Arc::new(SrcFile {
                name,
                contents: contents.to_string(),
            }),
            index: 0,
            depth: 0,
        };
        next.advance_past_whitespace();
        next
    }

    fn rest(&self) -> &str {
        &self.source.contents[self.index..]
    }

    fn span_to(&self, end: usize) -> Span {
        Span(self.source.clone(), self.index, end)
    }

    fn advance_text(&self, s: &str, skip_whitespace: bool) -> Option<(Span, Context)> {
        if self.rest().starts_with(s) {
            let mut next = self.clone();
            next.index += s.len();
            let span = self.span_to(next.index);
            if skip_whitespace {
                next.advance_past_whitespace();
            }
            Some((span, next))
        } else {
            None
        }
    }

    /// Consumes the longest prefix whose characters satisfy `pred`.
    fn advance_word(&self, pred: impl Fn(char) -> bool) -> (Span, Context) {
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.rest().len(), |(i, _)| i);
        let mut next = self.clone();
        next.index += len;
        let span = self.span_to(next.index);
        next.advance_past_whitespace();
        (span, next)
    }

    fn advance_past_whitespace(&mut self) {
        let mut iter = self.source.contents[self.index..].char_indices();
        loop {
            let end = match iter.next() {
                Some((_, c)) if c.is_whitespace() => None,
                Some((_, ';')) => {
                    loop {
                        if matches!(iter.next(), Some((_, '\n' | '\r')) | None) {
                            break;
                        }
                    }
                    None
                }
                Some((i, _)) => Some(self.index + i),
                None => Some(self.source.contents.len()),
            };
            if let Some(i) = end {
                self.index = i;
                return;
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.index == self.source.contents.len()
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(ParseError::TrailingInput(
                self.span_to(self.source.contents.len()),
            ))
        }
    }
}

type Res<T> = Result<(T, Context), ParseError>;

trait Parser<T>: Fn(&Context) -> Res<T> + Clone {}
impl<T, F: Fn(&Context) -> Res<T> + Clone> Parser<T> for F {}

fn text_exact(s: &str) -> impl Parser<Span> + '_ {
    text_internal(s, false)
}

fn text(s: &str) -> impl Parser<Span> + '_ {
    text_internal(s, true)
}

fn text_internal(s: &str, skip_whitespace: bool) -> impl Parser<Span> + '_ {
    move |ctx| {
        if let Some((span, next)) = ctx.advance_text(s, skip_whitespace) {
            Ok((span, next))
        } else {
            let span = ctx.span_to(ctx.index);
            Err(ParseError::ExpectedText(span, s.to_string()))
        }
    }
}

fn repeat<T>(parser: impl Parser<T>) -> impl Parser<Vec<T>> {
    move |ctx| {
        let mut vec = Vec::new();
        let mut next = ctx.clone();
        loop {
            match parser(&next) {
                Ok((x, rest)) => {
                    vec.push(x);
                    next = rest;
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(_) => return Ok((vec, next)),
            }
        }
    }
}

fn repeat1<T>(parser: impl Parser<T>) -> impl Parser<Vec<T>> {
    move |ctx| {
        let (x, next) = (parser.clone())(ctx)?;
        let (mut xs, next) = repeat(parser.clone())(&next)?;
        xs.insert(0, x);
        Ok((xs, next))
    }
}

fn repeat_all<T>(parser: impl Parser<T>) -> impl Parser<Vec<T>> {
    move |ctx| {
        let mut vec = Vec::new();
        let mut next = ctx.clone();
        while !next.is_at_end() {
            let (x, rest) = parser(&next)?;
            vec.push(x);
            next = rest;
        }
        Ok((vec, next))
    }
}

fn choice<T>(a: impl Parser<T>, b: impl Parser<T>) -> impl Parser<T> {
    move |ctx| match a(ctx) {
        Err(err) if !err.is_fatal() => b(ctx),
        res => res,
    }
}

macro_rules! choices {
    ( $x:expr , ) => { $x };
    ( $x:expr $( , $xs:expr )+ , ) => {
        choice( $x, choices!( $( $xs , )+ ) )
    };
}

fn map<T, U>(parser: impl Parser<T>, f: impl Fn(T) -> U + Clone) -> impl Parser<U> {
    move |ctx| {
        let (x, next) = parser(ctx)?;
        Ok((f(x), next))
    }
}

fn sequence<T, U>(a: impl Parser<T>, b: impl Parser<U>) -> impl Parser<(T, U)> {
    move |ctx| {
        let (x, next) = a(ctx)?;
        let (y, next) = b(&next)?;
        Ok(((x, y), next))
    }
}

fn sequence3<T, U, V>(
    a: impl Parser<T>,
    b: impl Parser<U>,
    c: impl Parser<V>,
) -> impl Parser<(T, U, V)> {
    move |ctx| {
        let (x, next) = a(ctx)?;
        let (y, next) = b(&next)?;
        let (z, next) = c(&next)?;
        Ok(((x, y, z), next))
    }
}

macro_rules! sequences {
    ( $x:expr , ) => { $x };
    ( $x:expr $( , $xs:expr )+ , ) => {
        sequence( $x, sequences!( $( $xs , )+ ) )
    };
}

fn parens_span<T>(f: impl Parser<T>) -> impl Parser<(Span, T)> {
    move |ctx| {
        let ((lo, x, hi), next) = choice(
            sequence3(text("("), f.clone(), text(")")),
            sequence3(text("["), f.clone(), text("]")),
        )(ctx)?;
        Ok(((Span(lo.0, lo.1, hi.2), x), next))
    }
}

fn parens<T>(f: impl Parser<T>) -> impl Parser<T> {
    move |ctx| {
        let ((_span, x), next) = parens_span(f.clone())(ctx)?;
        Ok((x, next))
    }
}

fn list<T>(f: impl Parser<T>) -> impl Parser<Vec<T>> {
    parens(repeat(f))
}

fn program(ctx: &Context) -> Res<Vec<Command>> {
    repeat_all(command)(ctx)
}

fn command(ctx: &Context) -> Res<Command> {
    choices!(
        map(
            parens_span(sequence3(text("rule"), ident, sequence(list(formula), formula))),
            |(span, (_, name, (assumptions, conclusion)))| Command::Rule {
                span,
                name,
                rule: InferenceRule::new(assumptions, conclusion),
            }
        ),
        map(
            parens_span(sequences!(
                text("proof"),
                ident,
                list(formula),
                formula,
                list(ident),
                repeat(line),
            )),
            |(span, (_, (name, (assumptions, (conclusion, (rules, lines))))))| Command::Proof {
                span,
                name,
                statement: InferenceRule::new(assumptions, conclusion),
                rules,
                lines,
            }
        ),
        map(parens_span(sequence(text("check"), ident)), |(span, (_, name))| {
            Command::Check(span, name)
        }),
        map(parens_span(sequence(text("print"), ident)), |(span, (_, name))| {
            Command::Print(span, name)
        }),
        map(
            parens_span(sequences!(text("corollary"), ident, ident, formula, ident,)),
            |(span, (_, (name, (from, (consequent, conditional)))))| Command::Corollary {
                span,
                name,
                from,
                consequent,
                conditional,
            }
        ),
        map(
            parens_span(sequences!(text("combine"), ident, ident, ident, formula, ident,)),
            |(span, (_, (name, (first, (second, (consequent, double_conditional))))))| {
                Command::Combine {
                    span,
                    name,
                    first,
                    second,
                    consequent,
                    double_conditional,
                }
            }
        ),
        map(
            parens_span(sequence3(text("remove-assumption"), ident, ident)),
            |(span, (_, name, from))| Command::RemoveAssumption { span, name, from }
        ),
        map(
            parens_span(sequences!(text("from-opposites"), ident, ident, ident, formula,)),
            |(span, (_, (name, (affirmation, (negation, conclusion)))))| {
                Command::FromOpposites {
                    span,
                    name,
                    affirmation,
                    negation,
                    conclusion,
                }
            }
        ),
        map(
            parens_span(sequence3(text("by-contradiction"), ident, ident)),
            |(span, (_, name, from))| Command::ByContradiction { span, name, from }
        ),
        map(parens_span(sequence(text("fail"), command)), |(span, (_, cmd))| {
            Command::Fail(span, Box::new(cmd))
        }),
    )(ctx)
}

fn line(ctx: &Context) -> Res<LineDecl> {
    choice(
        map(parens_span(sequence(text("assume"), formula)), |(span, (_, f))| {
            LineDecl::Assume(span, f)
        }),
        map(
            parens_span(sequences!(text("apply"), formula, ident, repeat(unum),)),
            |(span, (_, (f, (rule, references))))| LineDecl::Apply(span, f, rule, references),
        ),
    )(ctx)
}

/// Formulas nested deeper than this are rejected rather than risking the stack.
pub const MAX_FORMULA_DEPTH: usize = 128;

fn formula(ctx: &Context) -> Res<Formula> {
    if ctx.depth >= MAX_FORMULA_DEPTH {
        return Err(ParseError::TooDeep(ctx.span_to(ctx.index)));
    }
    let nested = Context {
        depth: ctx.depth + 1,
        ..ctx.clone()
    };
    let (formula, mut next) = formula_node(&nested)?;
    next.depth = ctx.depth;
    Ok((formula, next))
}

fn formula_node(ctx: &Context) -> Res<Formula> {
    choices!(
        map(variable, Formula::Var),
        map(text("T"), |_| Formula::constant(true)),
        map(text("F"), |_| Formula::constant(false)),
        map(sequence(text("~"), formula), |(_, f)| Formula::not(f)),
        map(
            sequence3(text("("), sequence3(formula, binary_op, formula), text(")")),
            |(_, (lhs, op, rhs), _)| Formula::binary(op, lhs, rhs)
        ),
    )(ctx)
}

fn variable(ctx: &Context) -> Res<Symbol> {
    let (span, next) = ctx.advance_word(|c| c.is_alphanumeric() || c == '_');
    if is_variable(span.string()) {
        Ok((Symbol::from(span.string()), next))
    } else {
        Err(ParseError::ExpectedVariable(span))
    }
}

fn binary_op(ctx: &Context) -> Res<BinaryOp> {
    for op in BinaryOp::ALL {
        if let Some((_, next)) = ctx.advance_text(op.symbol(), true) {
            return Ok((op, next));
        }
    }
    Err(ParseError::ExpectedOperator(ctx.span_to(ctx.index)))
}

fn digit(ctx: &Context) -> Res<Span> {
    choices!(
        text_exact("0"),
        text_exact("1"),
        text_exact("2"),
        text_exact("3"),
        text_exact("4"),
        text_exact("5"),
        text_exact("6"),
        text_exact("7"),
        text_exact("8"),
        text_exact("9"),
    )(ctx)
}

fn unum(ctx: &Context) -> Res<usize> {
    let (_, mut next) = repeat1(digit)(ctx)?;
    let span = ctx.span_to(next.index);
    let i = span
        .string()
        .parse()
        .map_err(|_| ParseError::ExpectedUint(span.clone()))?;
    next.advance_past_whitespace();
    Ok((i, next))
}

fn ident(ctx: &Context) -> Res<Symbol> {
    let (span, next) =
        ctx.advance_word(|c| c.is_alphanumeric() || "-+*/?!=<>&|^%_".contains(c));
    if span.string().is_empty() {
        return Err(ParseError::ExpectedIdent(span));
    }
    Ok((Symbol::from(span.string()), next))
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}\nexpected {1}, found {}", .0.string())]
    ExpectedText(Span, String),
    #[error("{0}\nexpected identifier")]
    ExpectedIdent(Span),
    #[error("{0}\nexpected unsigned integer")]
    ExpectedUint(Span),
    #[error("{0}\nexpected a variable name (p..z followed by digits)")]
    ExpectedVariable(Span),
    #[error("{0}\nexpected a binary operator")]
    ExpectedOperator(Span),
    #[error("{0}\nunexpected trailing input")]
    TrailingInput(Span),
    #[error("{0}\nformula nested deeper than {} levels", MAX_FORMULA_DEPTH)]
    TooDeep(Span),
}

impl ParseError {
    /// Fatal errors end the parse instead of letting another alternative be tried.
    fn is_fatal(&self) -> bool {
        matches!(self, ParseError::TooDeep(_))
    }
}
