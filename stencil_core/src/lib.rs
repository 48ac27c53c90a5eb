//! `stencil_core` is the built-in function library for stencil templates. The
//! functions are pure: they take template data and return new values without
//! touching their input or performing I/O.
//!
//! ## Modules
//!
//! - [`plural`] resolves a number to its CLDR plural category for a locale.
//! - [`datetime`] renders timestamps with reference-time layouts such as
//!   `"Mon Jan 2 2006 15:04"`, plus a few calendar helpers.
//! - [`image`] picks the best pre-sized rendition of an image for a desired
//!   size.
//! - [`sort`] sorts and groups records by dotted field paths with
//!   locale-aware string ordering.
//! - [`config`] loads defaults from `stencil.toml`.
//! - [`funcs`] registers everything with a [`minijinja`] environment.
//!
//! ## Quick Start
//!
//! ```rust
//! use stencil_core::StencilConfig;
//! use stencil_core::render_str;
//!
//! let context = serde_json::json!({
//! 	"people": [{ "name": "Zoe" }, { "name": "adam" }],
//! });
//! let rendered = render_str(
//! 	"{% for p in sortListByKeys(people, ['name']) %}{{ p.name }} {% endfor %}",
//! 	&context,
//! 	&StencilConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(rendered, "adam Zoe ");
//! ```

pub use collate::*;
pub use config::*;
pub use datetime::*;
pub use error::*;
pub use funcs::*;
pub use image::*;
pub use lookup::lookup;
pub use plural::Operands;
pub use plural::PluralCategory;
pub use plural::PluralRule;
pub use plural::PluralSelection;
pub use sort::*;

mod collate;
pub mod config;
pub mod datetime;
#[allow(unused_assignments)]
mod error;
pub mod funcs;
pub mod image;
mod lookup;
pub mod plural;
pub mod sort;
