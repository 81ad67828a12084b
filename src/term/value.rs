use crate::registry::handle::Handle;

/// A host-side value as seen at the boundary.
///
/// The host's own encoding is not modelled; this is the decoded shape every entry point
/// receives and returns. UTF-8 strings travel as [`Term::Binary`].
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    /// Integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Interned symbol (`:ok`, `:x`, `:false`, ...).
    Atom(String),
    /// Raw bytes, also used for strings.
    Binary(Vec<u8>),
    /// Fixed-size tuple.
    Tuple(Vec<Term>),
    /// Proper list.
    List(Vec<Term>),
    /// Key/value map in insertion order.
    Map(Vec<(Term, Term)>),
    /// Opaque reference to a registry entry.
    Resource(Handle),
}

impl Term {
    /// Build an atom.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Build a binary holding UTF-8 text.
    pub fn string(s: impl Into<String>) -> Self {
        Self::Binary(s.into().into_bytes())
    }

    /// Build a tuple.
    pub fn tuple(items: Vec<Term>) -> Self {
        Self::Tuple(items)
    }

    /// `:ok`.
    pub fn ok() -> Self {
        Self::atom("ok")
    }

    /// `:error`.
    pub fn error() -> Self {
        Self::atom("error")
    }

    /// `:nil`.
    pub fn nil() -> Self {
        Self::atom("nil")
    }

    /// `{:ok, value}`.
    pub fn ok_tuple(value: Term) -> Self {
        Self::Tuple(vec![Self::ok(), value])
    }

    /// `{:error, reason}`.
    pub fn error_tuple(reason: Term) -> Self {
        Self::Tuple(vec![Self::error(), reason])
    }

    /// Boolean as the `true`/`false` atoms.
    pub fn bool(v: bool) -> Self {
        Self::atom(if v { "true" } else { "false" })
    }

    /// Return `true` if this is the atom `name`.
    pub fn is_atom(&self, name: &str) -> bool {
        matches!(self, Self::Atom(a) if a == name)
    }

    /// Short shape name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Atom(_) => "atom",
            Self::Binary(_) => "binary",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Resource(_) => "resource",
        }
    }

    /// Look up a map value by atom key.
    pub fn map_get(&self, key: &str) -> Option<&Term> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.is_atom(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<Handle> for Term {
    fn from(h: Handle) -> Self {
        Self::Resource(h)
    }
}
