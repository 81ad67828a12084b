//! Fail-fast conversion between host terms and native scalar types.
//!
//! Decoding never substitutes a default: a term of the wrong shape is a
//! [`BridgeError::BadArgument`]. The one documented shorthand is [`Pos3`], whose short
//! vectors are zero-padded. Encoding is total.

use crate::foundation::core::{Color, Pos3};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::registry::handle::Handle;
use crate::term::value::Term;

/// Decode a native value from a host term.
pub trait FromTerm: Sized {
    /// Convert `term`, failing on any shape outside the contract.
    fn from_term(term: &Term) -> BridgeResult<Self>;
}

/// Encode a native value as a host term.
pub trait IntoTerm {
    /// Convert `self`; never fails.
    fn into_term(self) -> Term;
}

fn mismatch(want: &str, got: &Term) -> BridgeError {
    BridgeError::bad_argument(format!("expected {want}, got {}", got.kind_name()))
}

fn int_in_range(term: &Term, want: &str, lo: i64, hi: i64) -> BridgeResult<i64> {
    match *term {
        Term::Int(v) if (lo..=hi).contains(&v) => Ok(v),
        Term::Int(v) => Err(BridgeError::bad_argument(format!(
            "expected {want}, got out-of-range integer {v}"
        ))),
        _ => Err(mismatch(want, term)),
    }
}

impl FromTerm for u8 {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        int_in_range(term, "byte (0..=255)", 0, 255).map(|v| v as u8)
    }
}

impl FromTerm for u32 {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        int_in_range(term, "unsigned integer", 0, i64::from(u32::MAX)).map(|v| v as u32)
    }
}

impl FromTerm for i32 {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        int_in_range(term, "integer", i64::from(i32::MIN), i64::from(i32::MAX)).map(|v| v as i32)
    }
}

impl FromTerm for i64 {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        match *term {
            Term::Int(v) => Ok(v),
            _ => Err(mismatch("integer", term)),
        }
    }
}

/// Numbers accept both integer and float encodings; the host does not distinguish them
/// statically.
impl FromTerm for f64 {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        match *term {
            Term::Int(v) => Ok(v as f64),
            Term::Float(v) => Ok(v),
            _ => Err(mismatch("number", term)),
        }
    }
}

/// `false` and `nil` are false; every other atom is true. Non-atoms fail.
impl FromTerm for bool {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        match term {
            Term::Atom(a) => Ok(a != "false" && a != "nil"),
            _ => Err(mismatch("boolean atom", term)),
        }
    }
}

impl FromTerm for String {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        match term {
            Term::Binary(bytes) => String::from_utf8(bytes.clone())
                .map_err(|_| BridgeError::bad_argument("string binary is not valid UTF-8")),
            _ => Err(mismatch("string", term)),
        }
    }
}

/// Exactly `{r, g, b}` with each component in `0..=255`.
impl FromTerm for Color {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        let Term::Tuple(items) = term else {
            return Err(mismatch("color tuple {r, g, b}", term));
        };
        if items.len() != 3 {
            return Err(BridgeError::bad_argument(format!(
                "color tuple must have 3 elements, got {}",
                items.len()
            )));
        }
        Ok(Color([
            u8::from_term(&items[0])?,
            u8::from_term(&items[1])?,
            u8::from_term(&items[2])?,
        ]))
    }
}

/// A list of 1 to 3 integers; missing trailing components are zero.
impl FromTerm for Pos3 {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        let Term::List(items) = term else {
            return Err(mismatch("position list", term));
        };
        if !(1..=3).contains(&items.len()) {
            return Err(BridgeError::bad_argument(format!(
                "position list must have 1..=3 elements, got {}",
                items.len()
            )));
        }
        let mut out = [0i32; 3];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = i32::from_term(item)?;
        }
        Ok(Pos3(out))
    }
}

/// A resource term, or a map carrying one under the `handle` key.
impl FromTerm for Handle {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        match term {
            Term::Resource(h) => Ok(*h),
            Term::Map(_) => match term.map_get("handle") {
                Some(Term::Resource(h)) => Ok(*h),
                Some(other) => Err(mismatch("resource under :handle", other)),
                None => Err(BridgeError::bad_argument("map has no :handle key")),
            },
            _ => Err(mismatch("handle", term)),
        }
    }
}

impl<A: FromTerm, B: FromTerm> FromTerm for (A, B) {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        match term {
            Term::Tuple(items) if items.len() == 2 => {
                Ok((A::from_term(&items[0])?, B::from_term(&items[1])?))
            }
            _ => Err(mismatch("2-tuple", term)),
        }
    }
}

impl<T: FromTerm> FromTerm for Vec<T> {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        list(term)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                T::from_term(item).map_err(|e| match e {
                    BridgeError::BadArgument(msg) => {
                        BridgeError::bad_argument(format!("list element {i}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// Borrow the name of an atom term.
pub fn atom_name(term: &Term) -> BridgeResult<&str> {
    match term {
        Term::Atom(a) => Ok(a),
        _ => Err(mismatch("atom", term)),
    }
}

/// Borrow the bytes of a binary term.
pub fn binary(term: &Term) -> BridgeResult<&[u8]> {
    match term {
        Term::Binary(b) => Ok(b),
        _ => Err(mismatch("binary", term)),
    }
}

/// Borrow the elements of a list term.
pub fn list(term: &Term) -> BridgeResult<&[Term]> {
    match term {
        Term::List(items) => Ok(items),
        _ => Err(mismatch("list", term)),
    }
}

/// Borrow the elements of a tuple term.
pub fn tuple(term: &Term) -> BridgeResult<&[Term]> {
    match term {
        Term::Tuple(items) => Ok(items),
        _ => Err(mismatch("tuple", term)),
    }
}

/// Positional argument cursor with an exact arity check.
pub struct Args<'a> {
    op: &'a str,
    items: &'a [Term],
    pos: usize,
}

impl<'a> Args<'a> {
    /// Start decoding `items` for operation `op`, which takes exactly `arity` arguments.
    pub fn exact(op: &'a str, items: &'a [Term], arity: usize) -> BridgeResult<Self> {
        if items.len() != arity {
            return Err(BridgeError::bad_argument(format!(
                "{op}: expected {arity} arguments, got {}",
                items.len()
            )));
        }
        Ok(Self { op, items, pos: 0 })
    }

    /// Number of arguments not decoded yet.
    pub fn remaining(&self) -> usize {
        self.items.len() - self.pos
    }

    /// Borrow the next raw term.
    pub fn term(&mut self) -> BridgeResult<&'a Term> {
        let item = self.items.get(self.pos).ok_or_else(|| {
            BridgeError::bad_argument(format!("{}: missing argument {}", self.op, self.pos))
        })?;
        self.pos += 1;
        Ok(item)
    }

    /// Decode the next argument.
    pub fn next<T: FromTerm>(&mut self) -> BridgeResult<T> {
        let pos = self.pos;
        let term = self.term()?;
        T::from_term(term).map_err(|e| self.annotate(pos, e))
    }

    /// Decode the next argument as an atom name.
    pub fn atom(&mut self) -> BridgeResult<&'a str> {
        let pos = self.pos;
        let term = self.term()?;
        atom_name(term).map_err(|e| self.annotate(pos, e))
    }

    /// Decode the next argument as a binary.
    pub fn binary(&mut self) -> BridgeResult<&'a [u8]> {
        let pos = self.pos;
        let term = self.term()?;
        binary(term).map_err(|e| self.annotate(pos, e))
    }

    /// Decode the next argument as a list.
    pub fn list(&mut self) -> BridgeResult<&'a [Term]> {
        let pos = self.pos;
        let term = self.term()?;
        list(term).map_err(|e| self.annotate(pos, e))
    }

    /// Decode the next argument as a tuple.
    pub fn tuple(&mut self) -> BridgeResult<&'a [Term]> {
        let pos = self.pos;
        let term = self.term()?;
        tuple(term).map_err(|e| self.annotate(pos, e))
    }

    /// Decode the next argument as a palette color name (`None` = transparent).
    pub fn color_name(&mut self) -> BridgeResult<Option<Color>> {
        let pos = self.pos;
        let name = self.atom()?;
        Color::from_name(name).map_err(|e| self.annotate(pos, e))
    }

    fn annotate(&self, pos: usize, err: BridgeError) -> BridgeError {
        match err {
            BridgeError::BadArgument(msg) => {
                BridgeError::bad_argument(format!("{}: argument {pos}: {msg}", self.op))
            }
            other => other,
        }
    }
}

impl IntoTerm for Term {
    fn into_term(self) -> Term {
        self
    }
}

impl IntoTerm for u8 {
    fn into_term(self) -> Term {
        Term::Int(i64::from(self))
    }
}

impl IntoTerm for u32 {
    fn into_term(self) -> Term {
        Term::Int(i64::from(self))
    }
}

impl IntoTerm for i32 {
    fn into_term(self) -> Term {
        Term::Int(i64::from(self))
    }
}

impl IntoTerm for i64 {
    fn into_term(self) -> Term {
        Term::Int(self)
    }
}

impl IntoTerm for u64 {
    fn into_term(self) -> Term {
        // Host integers are arbitrary precision; values past i64 saturate here.
        Term::Int(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl IntoTerm for usize {
    fn into_term(self) -> Term {
        (self as u64).into_term()
    }
}

impl IntoTerm for f64 {
    fn into_term(self) -> Term {
        Term::Float(self)
    }
}

impl IntoTerm for bool {
    fn into_term(self) -> Term {
        Term::bool(self)
    }
}

impl IntoTerm for &str {
    fn into_term(self) -> Term {
        Term::string(self)
    }
}

impl IntoTerm for String {
    fn into_term(self) -> Term {
        Term::string(self)
    }
}

impl IntoTerm for Vec<u8> {
    fn into_term(self) -> Term {
        Term::Binary(self)
    }
}

impl IntoTerm for Color {
    fn into_term(self) -> Term {
        let [r, g, b] = self.0;
        Term::tuple(vec![r.into_term(), g.into_term(), b.into_term()])
    }
}

impl IntoTerm for Pos3 {
    fn into_term(self) -> Term {
        Term::List(self.0.iter().map(|&v| v.into_term()).collect())
    }
}

impl IntoTerm for Handle {
    fn into_term(self) -> Term {
        Term::Resource(self)
    }
}

impl<A: IntoTerm, B: IntoTerm> IntoTerm for (A, B) {
    fn into_term(self) -> Term {
        Term::tuple(vec![self.0.into_term(), self.1.into_term()])
    }
}

impl<A: IntoTerm, B: IntoTerm, C: IntoTerm> IntoTerm for (A, B, C) {
    fn into_term(self) -> Term {
        Term::tuple(vec![
            self.0.into_term(),
            self.1.into_term(),
            self.2.into_term(),
        ])
    }
}

impl<A: IntoTerm, B: IntoTerm, C: IntoTerm, D: IntoTerm> IntoTerm for (A, B, C, D) {
    fn into_term(self) -> Term {
        Term::tuple(vec![
            self.0.into_term(),
            self.1.into_term(),
            self.2.into_term(),
            self.3.into_term(),
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/term/marshal.rs"]
mod tests;
