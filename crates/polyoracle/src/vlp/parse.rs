//! Line-oriented VLP reader.
//!
//! Statements (after normalization, see `normalize_line`):
//! - `c <comment>`; comments before the `p` line are surfaced as warnings
//! - `p vlp min|max <rows> <cols> <ignored> <objs> <ignored>`
//! - `j <col> f | l v | u v | s v | d v1 v2`, `i <row> …` (same grammar)
//! - `a <row> <col> <value>`, `o <obj> <col> <value>`, `x <obj> <value>`
//! - `e` ends the file
//!
//! Numeric fields are read left to right and reading stops at the first
//! token that does not parse; trailing tokens beyond what a statement needs
//! are ignored.

use std::io::BufRead;
use std::str::SplitWhitespace;

use super::error::{FormatError, LoadError};
use super::load::check_size;
use crate::lp::Bound;

/// Longest statement kept; the rest of a longer line is dropped.
pub const MAX_LINE_LEN: usize = 80;

/// Declared optimization direction of the objectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    /// Sign applied to objective coefficients so the model is always "min".
    pub fn sign(self) -> f64 {
        match self {
            Direction::Min => 1.0,
            Direction::Max => -1.0,
        }
    }
}

/// Parsed VLP file. Indices are the declared 1-based ones.
#[derive(Clone, Debug)]
pub struct VlpProblem {
    pub direction: Direction,
    pub rows: usize,
    pub cols: usize,
    pub objs: usize,
    pub row_bounds: Vec<(usize, Bound)>,
    pub col_bounds: Vec<(usize, Bound)>,
    /// `a` entries `(row, col, value)`.
    pub entries: Vec<(usize, usize, f64)>,
    /// `o` entries `(obj, col, value)`, sign already adjusted for `max`.
    pub obj_entries: Vec<(usize, usize, f64)>,
    pub interior: Vec<f64>,
    /// Comments seen before the `p` line.
    pub comments: Vec<String>,
}

/// Lowercase, collapse blanks, drop control and non-ASCII bytes, truncate.
pub fn normalize_line(raw: &[u8]) -> String {
    let mut out = String::with_capacity(MAX_LINE_LEN);
    let mut blank = false;
    for &ch in raw {
        if ch == b' ' || ch == b'\t' {
            blank = true;
            continue;
        }
        if ch <= 0x20 || ch > 126 {
            continue;
        }
        if blank && !out.is_empty() && out.len() < MAX_LINE_LEN {
            out.push(' ');
        }
        blank = false;
        if out.len() < MAX_LINE_LEN {
            out.push(ch.to_ascii_lowercase() as char);
        }
    }
    out
}

/// Sequential field reader in the spirit of `scanf`.
struct Fields<'a> {
    toks: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        let mut toks = line.split_whitespace();
        toks.next(); // statement letter
        Self { toks }
    }

    fn int(&mut self) -> Option<i64> {
        self.toks.next()?.parse().ok()
    }

    fn float(&mut self) -> Option<f64> {
        self.toks.next()?.parse().ok()
    }

    fn word(&mut self) -> Option<&'a str> {
        self.toks.next()
    }

    /// Up to `max` leading floats.
    fn floats(&mut self, max: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(max);
        while out.len() < max {
            match self.float() {
                Some(v) => out.push(v),
                None => break,
            }
        }
        out
    }
}

/// 1-based index in `1..=count`.
fn index_in(v: Option<i64>, count: usize) -> Option<usize> {
    let v = usize::try_from(v?).ok()?;
    (1..=count).contains(&v).then_some(v)
}

/// Bound code plus its values; the code fixes how many values are allowed.
fn bound_of(code: &str, vals: &[f64]) -> Option<Bound> {
    match (code, vals) {
        ("f", []) => Some(Bound::Free),
        ("l", [v]) => Some(Bound::Lower(*v)),
        ("u", [v]) => Some(Bound::Upper(*v)),
        ("s", [v]) => Some(Bound::Fixed(*v)),
        ("d", [lo, hi]) => Some(Bound::Double(*lo, *hi)),
        _ => None,
    }
}

/// `j`/`i` statement: `<index> <code> [values]`.
fn bound_statement(line: &str, count: usize) -> Option<(usize, Bound)> {
    let mut f = Fields::new(line);
    let idx = index_in(f.int(), count)?;
    let code = f.word()?;
    let vals = f.floats(2);
    Some((idx, bound_of(code, &vals)?))
}

/// `p vlp min|max rows cols _ objs [_]`.
fn problem_line(line: &str) -> Option<(Direction, usize, usize, usize)> {
    let mut f = Fields::new(line);
    if f.word()? != "vlp" {
        return None;
    }
    let direction = match f.word()? {
        "min" => Direction::Min,
        "max" => Direction::Max,
        _ => return None,
    };
    let rows = f.int()?;
    let cols = f.int()?;
    f.int()?;
    let objs = f.int()?;
    if rows <= 1 || cols <= 1 || objs < 1 {
        return None;
    }
    Some((
        direction,
        usize::try_from(rows).ok()?,
        usize::try_from(cols).ok()?,
        usize::try_from(objs).ok()?,
    ))
}

/// Parse a whole VLP source. Fatal errors are reported before returning.
pub fn parse<R: BufRead>(reader: R, source: &str) -> Result<VlpProblem, LoadError> {
    parse_inner(reader, source).map_err(LoadError::reported)
}

fn parse_inner<R: BufRead>(reader: R, source: &str) -> Result<VlpProblem, LoadError> {
    let mut prob: Option<VlpProblem> = None;
    let mut comments = Vec::new();

    for (lineno, raw) in reader.split(b'\n').enumerate() {
        let raw = raw.map_err(|err| LoadError::Io {
            source: source.to_string(),
            err,
        })?;
        let line = normalize_line(&raw);
        let Some(first) = line.chars().next() else {
            continue;
        };
        let fail = |kind: FormatError| LoadError::Format {
            source: source.to_string(),
            line: lineno + 1,
            text: line.clone(),
            kind,
        };
        match first {
            'c' => {
                let text = line[1..].trim();
                if prob.is_none() && !text.is_empty() {
                    tracing::warn!("C {text}");
                    comments.push(text.to_string());
                }
                continue;
            }
            'e' => break,
            'p' => {
                if prob.is_some() {
                    return Err(fail(FormatError::SecondProblemLine));
                }
                let (direction, rows, cols, objs) =
                    problem_line(&line).ok_or_else(|| fail(FormatError::BadProblemLine))?;
                check_size(rows, cols, objs)?;
                prob = Some(VlpProblem {
                    direction,
                    rows,
                    cols,
                    objs,
                    row_bounds: Vec::new(),
                    col_bounds: Vec::new(),
                    entries: Vec::new(),
                    obj_entries: Vec::new(),
                    interior: vec![0.0; objs],
                    comments: std::mem::take(&mut comments),
                });
                continue;
            }
            'a' | 'i' | 'j' | 'o' | 'x' => {}
            _ => return Err(fail(FormatError::UnknownStatement)),
        }

        let Some(p) = prob.as_mut() else {
            return Err(fail(FormatError::BeforeProblemLine { statement: first }));
        };
        let bad = || fail(FormatError::BadStatement { statement: first });
        match first {
            'j' => {
                let b = bound_statement(&line, p.cols).ok_or_else(bad)?;
                p.col_bounds.push(b);
            }
            'i' => {
                let b = bound_statement(&line, p.rows).ok_or_else(bad)?;
                p.row_bounds.push(b);
            }
            'a' => {
                let mut f = Fields::new(&line);
                let row = index_in(f.int(), p.rows).ok_or_else(bad)?;
                let col = index_in(f.int(), p.cols).ok_or_else(bad)?;
                let v = f.float().ok_or_else(bad)?;
                p.entries.push((row, col, v));
            }
            'o' => {
                let mut f = Fields::new(&line);
                let obj = index_in(f.int(), p.objs).ok_or_else(bad)?;
                let col = index_in(f.int(), p.cols).ok_or_else(bad)?;
                let v = f.float().ok_or_else(bad)?;
                p.obj_entries.push((obj, col, p.direction.sign() * v));
            }
            'x' => {
                let mut f = Fields::new(&line);
                let obj = index_in(f.int(), p.objs).ok_or_else(bad)?;
                let v = f.float().ok_or_else(bad)?;
                p.interior[obj - 1] = v;
            }
            _ => unreachable!("statement letters filtered above"),
        }
    }

    prob.ok_or_else(|| LoadError::MissingProblemLine {
        source: source.to_string(),
    })
}
