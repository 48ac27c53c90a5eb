use serde::Deserialize;
use serde::Serialize;

use crate::StencilError;
use crate::StencilResult;

/// A desired side of `-1` means the side was left out.
const UNCONSTRAINED: i64 = -1;

/// One available rendition of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCandidate {
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<u32>,
}

impl ImageCandidate {
	pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
		Self {
			url: url.into(),
			width: Some(width),
			height: Some(height),
		}
	}

	/// Candidates without a usable width or height (vector images, images
	/// resized on demand) satisfy every size constraint.
	pub fn is_size_agnostic(&self) -> bool {
		!matches!((self.width, self.height), (Some(width), Some(height)) if width > 0 && height > 0)
	}
}

/// An image record with its own dimensions and optional pre-sized
/// thumbnails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntity {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub width: Option<u32>,
	#[serde(default)]
	pub height: Option<u32>,
	#[serde(default)]
	pub thumbnails: Vec<ImageCandidate>,
}

impl ImageEntity {
	/// The thumbnails followed by the image itself, when the image has a
	/// url and both dimensions.
	pub fn candidates(&self) -> Vec<ImageCandidate> {
		let mut candidates = self.thumbnails.clone();

		if let (Some(url), Some(width), Some(height)) = (&self.url, self.width, self.height) {
			candidates.push(ImageCandidate::new(url.clone(), width, height));
		}

		candidates
	}
}

/// The requested dimensions. `None` or `-1` leaves a side unconstrained.
///
/// Any other side that is not positive can never be satisfied, so a search
/// with such a side always ends at the fallback candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DesiredSize {
	pub width: Option<i64>,
	pub height: Option<i64>,
}

impl DesiredSize {
	/// Parse a `"<width>x<height>"` string. Either side may be empty. A side
	/// is read as a leading integer, so `"300px"` is `300`.
	pub fn parse(value: &str) -> StencilResult<Self> {
		let mut sides = value.split('x');
		let (Some(width), Some(height)) = (sides.next(), sides.next()) else {
			return Err(StencilError::InvalidDesiredSize(value.to_string()));
		};

		let width = match width {
			"" => None,
			side => Some(parse_leading_int(side).ok_or_else(|| StencilError::InvalidWidth(side.to_string()))?),
		};
		let height = match height {
			"" => None,
			side => Some(parse_leading_int(side).ok_or_else(|| StencilError::InvalidHeight(side.to_string()))?),
		};

		Ok(Self { width, height })
	}

	/// Build a size from numeric dimensions where zero or negative means
	/// unconstrained.
	pub fn from_dimensions(width: i64, height: i64) -> Self {
		Self {
			width: (width > 0).then_some(width),
			height: (height > 0).then_some(height),
		}
	}
}

/// Read an optionally signed integer prefix, ignoring leading whitespace and
/// anything after the digits.
fn parse_leading_int(text: &str) -> Option<i64> {
	let trimmed = text.trim_start();
	let (sign, digits) = match trimmed.as_bytes().first() {
		Some(b'-') => (-1, &trimmed[1..]),
		Some(b'+') => (1, &trimmed[1..]),
		_ => (1, trimmed),
	};
	let end = digits
		.find(|ch: char| !ch.is_ascii_digit())
		.unwrap_or(digits.len());

	if end == 0 {
		return None;
	}

	digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

/// Pick the best candidate for a desired size.
///
/// `candidates` must be ordered from smallest to largest. With
/// `at_least_as_large` the walk starts at the largest candidate and moves
/// down while candidates are still at least as large as every constrained
/// side; the last one that fit is the smallest adequate image. When even the
/// largest candidate is too small the smallest candidate is returned.
/// Otherwise the walk starts at the smallest candidate and moves up while
/// candidates are at most as large, returning the largest that fit, or the
/// largest candidate when even the smallest is too big.
///
/// A size-agnostic candidate met during the walk is returned immediately.
pub fn select_by_size(
	candidates: &[ImageCandidate],
	desired: DesiredSize,
	at_least_as_large: bool,
) -> StencilResult<&str> {
	let (Some(smallest), Some(largest)) = (candidates.first(), candidates.last()) else {
		return Err(StencilError::EmptyCandidates);
	};

	let side_fits = |actual: Option<u32>, wanted: Option<i64>| {
		match wanted {
			None | Some(UNCONSTRAINED) => true,
			Some(wanted) if wanted <= 0 => false,
			Some(wanted) => {
				let actual = i64::from(actual.unwrap_or_default());
				if at_least_as_large {
					actual >= wanted
				} else {
					actual <= wanted
				}
			}
		}
	};

	let walk: Box<dyn Iterator<Item = &ImageCandidate> + '_> = if at_least_as_large {
		Box::new(candidates.iter().rev())
	} else {
		Box::new(candidates.iter())
	};
	let mut best: Option<&ImageCandidate> = None;

	for candidate in walk {
		if candidate.is_size_agnostic() {
			tracing::debug!(url = %candidate.url, "size agnostic image candidate selected");
			return Ok(&candidate.url);
		}

		if !side_fits(candidate.width, desired.width) || !side_fits(candidate.height, desired.height) {
			break;
		}

		best = Some(candidate);
	}

	if let Some(best) = best {
		return Ok(&best.url);
	}

	let fallback = if at_least_as_large { smallest } else { largest };
	tracing::debug!(url = %fallback.url, at_least_as_large, "no image candidate fits, using fallback");

	Ok(&fallback.url)
}

/// Pick a candidate for a `"<width>x<height>"` size string.
pub fn image_by_size<'a>(
	candidates: &'a [ImageCandidate],
	desired_size: &str,
	at_least_as_large: bool,
) -> StencilResult<&'a str> {
	let desired = DesiredSize::parse(desired_size)?;
	select_by_size(candidates, desired, at_least_as_large)
}

/// Pick a candidate for numeric dimensions. Zero or negative dimensions are
/// unconstrained.
///
/// Only the listed candidates are considered: a single candidate is returned
/// as is, without rewriting its url to a dynamically resized rendition.
pub fn image_by_dimensions(
	candidates: &[ImageCandidate],
	width: i64,
	height: i64,
	at_least_as_large: bool,
) -> StencilResult<&str> {
	select_by_size(
		candidates,
		DesiredSize::from_dimensions(width, height),
		at_least_as_large,
	)
}

/// Pick a rendition of an image record, treating the record itself as the
/// largest candidate after its thumbnails. The record is not modified.
pub fn image_by_size_entity(
	image: &ImageEntity,
	desired_size: &str,
	at_least_as_large: bool,
) -> StencilResult<String> {
	let desired = DesiredSize::parse(desired_size)?;
	let candidates = image.candidates();

	select_by_size(&candidates, desired, at_least_as_large).map(str::to_string)
}
