use std::fmt;

/// Native resource type carried by every handle.
///
/// Handles of different kinds are never accepted interchangeably.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// 8-bit pixel buffer.
    Image,
    /// 32-bit signed integer buffer (pixel transfer maps).
    IntMap,
    /// Display window.
    Display,
}

impl ResourceKind {
    /// Lowercase name used in messages and in the JSON rendering of handles.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::IntMap => "int_map",
            Self::Display => "display",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque token for one registry entry.
///
/// The host may copy it freely; it never grants access on its own. Every use goes through
/// [`crate::Registry::resolve`], which checks the slot generation and the resource kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Handle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
    pub(crate) kind: ResourceKind,
}

impl Handle {
    /// Resource kind this handle was issued for.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}<{}.{}>", self.kind, self.index, self.generation)
    }
}

/// A native object type the registry can own.
pub trait Resource: Send + 'static {
    /// Kind tag stamped on handles to values of this type.
    const KIND: ResourceKind;
}
