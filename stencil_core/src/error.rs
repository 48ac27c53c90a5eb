use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StencilError {
	#[error(transparent)]
	#[diagnostic(code(stencil::io_error))]
	Io(#[from] std::io::Error),

	#[error("non-zero length image candidate list required")]
	#[diagnostic(
		code(stencil::empty_candidates),
		help("pass at least one image size, or give the image a url, width and height")
	)]
	EmptyCandidates,

	#[error("invalid desired size: `{0}`")]
	#[diagnostic(
		code(stencil::invalid_desired_size),
		help("use the form `<width>x<height>`, either side may be empty, e.g. `300x` or `x200`")
	)]
	InvalidDesiredSize(String),

	#[error("invalid width specified: `{0}`")]
	#[diagnostic(code(stencil::invalid_width))]
	InvalidWidth(String),

	#[error("invalid height specified: `{0}`")]
	#[diagnostic(code(stencil::invalid_height))]
	InvalidHeight(String),

	#[error("expected a list of primitive types, found {found}")]
	#[diagnostic(
		code(stencil::non_primitive_list),
		help("`sortList` only sorts numbers, booleans or strings; use `sortListByKeys` for objects")
	)]
	NonPrimitiveList { found: &'static str },

	#[error("mixed list: expected every item to be {expected}, found {found} at index {index}")]
	#[diagnostic(code(stencil::mixed_list))]
	MixedList {
		expected: &'static str,
		found: &'static str,
		index: usize,
	},

	#[error("no group key found at `{path}` for item {index}")]
	#[diagnostic(
		code(stencil::missing_group_key),
		help("supply a fallback key so items without `{path}` can still be grouped")
	)]
	MissingGroupKey { path: String, index: usize },

	#[error("invalid date: {year:04}-{month:02}-{day:02}")]
	#[diagnostic(code(stencil::invalid_date))]
	InvalidDate { year: i32, month: u32, day: u32 },

	#[error("invalid argument for `{function}`: {reason}")]
	#[diagnostic(code(stencil::invalid_argument))]
	InvalidArgument {
		function: &'static str,
		reason: String,
	},

	#[error("template render error: {0}")]
	#[diagnostic(code(stencil::template_render))]
	TemplateRender(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(stencil::config_parse),
		help("check that stencil.toml is valid TOML with [plural], [sort] and/or [datetime] sections")
	)]
	ConfigParse(String),
}

pub type StencilResult<T> = Result<T, StencilError>;
