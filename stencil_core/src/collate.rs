use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::decompose_canonical;
use unicode_normalization::char::is_combining_mark;

/// Letters that a language sorts as separate letters after `z`, in order.
const NORDIC_SV_FI: &[char] = &['å', 'ä', 'ö'];
const NORDIC_DA_NO: &[char] = &['æ', 'ø', 'å'];

/// Primary weight classes. Spaces sort before punctuation, punctuation before
/// digits, digits before letters.
const CLASS_SPACE: u32 = 0;
const CLASS_PUNCTUATION: u32 = 1;
const CLASS_DIGIT: u32 = 2;
const CLASS_LETTER: u32 = 3;

/// Language-specific adjustments to the root ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tailoring {
	#[default]
	Root,
	/// Extra letters appended after `z`.
	AfterZ(&'static [char]),
	/// `ñ` is its own letter between `n` and `o`.
	Spanish,
}

/// Locale-sensitive string comparison.
///
/// Strings are compared in three levels, like a UCA collator: base letters
/// first (ignoring accents and case), then accents, then case with lowercase
/// first. Equal keys at all three levels fall back to code point order of the
/// decomposed strings so the ordering stays total.
///
/// The optional BCP 47 tag selects a tailoring for languages whose alphabet
/// differs from the root order (`sv`, `fi`, `da`, `nb`, `nn`, `no`, `es`).
/// Every other tag uses the root ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collator {
	tailoring: Tailoring,
}

impl Collator {
	pub fn new(tag: Option<&str>) -> Self {
		let language = tag
			.and_then(|tag| tag.split(['-', '_']).next())
			.map(str::to_ascii_lowercase);

		let tailoring = match language.as_deref() {
			Some("sv" | "fi") => Tailoring::AfterZ(NORDIC_SV_FI),
			Some("da" | "nb" | "nn" | "no") => Tailoring::AfterZ(NORDIC_DA_NO),
			Some("es") => Tailoring::Spanish,
			_ => Tailoring::Root,
		};

		Self { tailoring }
	}

	pub fn compare(&self, left: &str, right: &str) -> Ordering {
		self.key(left).cmp(&self.key(right))
	}

	/// Build the sort key for a string. Keys of two strings order the same
	/// way [`Collator::compare`] orders the strings.
	pub fn key(&self, text: &str) -> CollationKey {
		let mut elements: Vec<Element> = Vec::with_capacity(text.len());

		for ch in text.nfc() {
			let lower = ch.to_lowercase().next().unwrap_or(ch);
			let case = u8::from(ch.is_uppercase());

			if let Some(primary) = self.tailored_weight(lower) {
				elements.push(Element {
					primary,
					marks: Vec::new(),
					case,
				});
				continue;
			}

			let mut decomposed = Vec::with_capacity(2);
			decompose_canonical(lower, |part| decomposed.push(part));

			for part in decomposed {
				if is_combining_mark(part) {
					match elements.last_mut() {
						Some(previous) => previous.marks.push(part),
						None => {
							elements.push(Element {
								primary: 0,
								marks: vec![part],
								case,
							});
						}
					}
				} else {
					elements.push(Element {
						primary: root_weight(part),
						marks: Vec::new(),
						case,
					});
				}
			}
		}

		CollationKey {
			primary: elements.iter().map(|element| element.primary).collect(),
			secondary: elements.iter().map(|element| element.marks.clone()).collect(),
			tertiary: elements.iter().map(|element| element.case).collect(),
			identical: text.nfd().collect(),
		}
	}

	fn tailored_weight(&self, ch: char) -> Option<u32> {
		match self.tailoring {
			Tailoring::Root => None,
			Tailoring::AfterZ(letters) => {
				letters
					.iter()
					.position(|letter| *letter == ch)
					.map(|position| letter_weight('z') + 1 + position as u32)
			}
			Tailoring::Spanish => (ch == 'ñ').then_some(letter_weight('n') + 1),
		}
	}
}

/// A comparable collation key. Field order is the comparison order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
	primary: Vec<u32>,
	secondary: Vec<Vec<char>>,
	tertiary: Vec<u8>,
	identical: String,
}

struct Element {
	primary: u32,
	marks: Vec<char>,
	case: u8,
}

fn letter_weight(ch: char) -> u32 {
	(CLASS_LETTER << 28) | ((ch as u32) << 2)
}

fn root_weight(ch: char) -> u32 {
	let class = if ch.is_whitespace() {
		CLASS_SPACE
	} else if ch.is_numeric() {
		CLASS_DIGIT
	} else if ch.is_alphabetic() {
		CLASS_LETTER
	} else {
		CLASS_PUNCTUATION
	};

	(class << 28) | ((ch as u32) << 2)
}
