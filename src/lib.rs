#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! pixbridge drives a native image engine from a managed host runtime.
//!
//! The host never sees native memory. It holds opaque [`Handle`]s issued by a
//! generation-checked [`Registry`], passes arguments as [`Term`]s, and gets every outcome
//! back as a term: a success payload or `{:error, {kind, "message"}}`.
//!
//! Entry points:
//! - [`Bridge::call`] dispatches one boundary function by name (`create`, `fill`,
//!   `to_bin`, `draw_line`, ...).
//! - [`Bridge::run`] executes a whole command script against one pipeline image. Creation
//!   commands come first, then mutations, and the first extraction command ends the script
//!   with its result.
//! - `to_bin` / `from_bin` move pixels across the boundary as a flat `u1` or `f4` tensor in
//!   NCHW or NHWC order, optionally BGR-swapped and normalized.
//!
//! ```
//! use pixbridge::{Bridge, Term};
//!
//! let bridge = Bridge::new();
//! let ints = |v: &[i64]| v.iter().map(|&i| Term::Int(i)).collect::<Vec<_>>();
//! let mut create = vec![Term::atom("create")];
//! create.extend(ints(&[2, 2, 1, 3, 0]));
//! let script = Term::List(vec![
//!     Term::Tuple(create),
//!     Term::tuple(vec![Term::atom("fill"), Term::Int(7)]),
//!     Term::tuple(vec![Term::atom("get_size")]),
//! ]);
//! assert_eq!(bridge.call("run", &[script]), Term::Int(12));
//! ```

mod codec;
mod command;
mod display;
mod foundation;
mod nif;
mod pixel;
mod registry;
mod term;

pub use codec::tensor::{ElemType, Encoded, Layout, Normalization};
pub use command::table::{Phase, names as command_names, phase_of as command_phase};
pub use display::window::{
    Display, DisplayController, DisplayEvent, Normalization as DisplayNormalization,
};
pub use foundation::config::BridgeOpts;
pub use foundation::core::{Axis, Boundary, Color, Pos3};
pub use foundation::error::{BridgeError, BridgeResult};
pub use nif::bridge::Bridge;
pub use nif::funcs::names as function_names;
pub use pixel::buffer::{Dims, Image, IntMap, PixelBuffer, Sample};
pub use pixel::io::EncodeFormat;
pub use registry::handle::{Handle, Resource, ResourceKind};
pub use registry::table::{Registry, RegistryStats, Shared};
pub use term::json::{script_from_json, term_from_json, term_to_json};
pub use term::marshal::{Args, FromTerm, IntoTerm};
pub use term::value::Term;
