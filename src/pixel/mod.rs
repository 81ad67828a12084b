pub(crate) mod buffer;
pub(crate) mod draw;
pub(crate) mod font;
pub(crate) mod io;
pub(crate) mod lut;
pub(crate) mod ops;
