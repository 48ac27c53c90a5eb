//! Date and time formatting with reference-time layouts.
//!
//! A layout is written as the reference time `Mon Jan 2 15:04:05 -0700 2006`
//! would be displayed. The layout is tokenized once, left to right, taking
//! the longest vocabulary entry at each position; the text between tokens is
//! kept as literal spans. Rendering maps each token to a calendar field and
//! never rescans substituted text.

use std::ops::Range;

use chrono::DateTime;
use chrono::Datelike;
use chrono::FixedOffset;
use chrono::Local;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeDelta;
use chrono::TimeZone;
use chrono::Timelike;
use chrono::Utc;
use derive_more::Deref;
use logos::Logos;
use serde::Deserialize;
use serde::Serialize;

use crate::StencilError;
use crate::StencilResult;

const WEEKDAYS: [&str; 7] = [
	"Sunday",
	"Monday",
	"Tuesday",
	"Wednesday",
	"Thursday",
	"Friday",
	"Saturday",
];

const MONTHS: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

/// The layout vocabulary. Logos matches the longest token at each position,
/// so `2006` wins over `2` and `Monday` over `Mon` and `Mo`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutToken {
	/// `2006` four digit year
	#[token("2006")]
	LongYear,
	/// `06` two digit year
	#[token("06")]
	ShortYear,
	/// `January` full month name
	#[token("January")]
	LongMonth,
	/// `Jan` three letter month name
	#[token("Jan")]
	ShortMonth,
	/// `01` zero padded month number
	#[token("01")]
	ZeroMonth,
	/// `1` month number
	#[token("1")]
	NumMonth,
	/// `02` zero padded day of the month
	#[token("02")]
	ZeroDay,
	/// `2` day of the month
	#[token("2")]
	Day,
	/// `15` zero padded 24 hour clock
	#[token("15")]
	Hour,
	/// `03` zero padded 12 hour clock
	#[token("03")]
	ZeroHour12,
	/// `3` 12 hour clock
	#[token("3")]
	Hour12,
	/// `PM` upper case meridiem
	#[token("PM")]
	UpperMeridiem,
	/// `pm` lower case meridiem
	#[token("pm")]
	LowerMeridiem,
	/// `04` zero padded minute
	#[token("04")]
	ZeroMinute,
	/// `05` zero padded second
	#[token("05")]
	ZeroSecond,
	/// `-0700` offset from UTC in minutes
	#[token("-0700")]
	Offset,
	/// `Monday` full weekday name
	#[token("Monday")]
	LongWeekday,
	/// `Mon` three letter weekday name
	#[token("Mon")]
	ShortWeekday,
	/// `Mo` two letter weekday name
	#[token("Mo")]
	TwoLetterWeekday,
}

/// A piece of a parsed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
	/// Text copied to the output unchanged.
	Literal(&'a str),
	/// A calendar field.
	Token(LayoutToken),
}

/// A tokenized layout. Parse once, render against any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Layout<'a>(Vec<Span<'a>>);

impl<'a> Layout<'a> {
	/// Split a layout into literal and token spans in a single left to right
	/// pass. Text the lexer cannot match becomes literal, and adjacent literal
	/// text is merged.
	pub fn parse(pattern: &'a str) -> Self {
		let mut spans = Vec::new();
		let mut literal: Option<Range<usize>> = None;

		for (token, span) in LayoutToken::lexer(pattern).spanned() {
			match token {
				Ok(token) => {
					if let Some(range) = literal.take() {
						spans.push(Span::Literal(&pattern[range]));
					}

					spans.push(Span::Token(token));
				}
				Err(()) => {
					literal = Some(literal.map_or(span.clone(), |range| range.start..span.end));
				}
			}
		}

		if let Some(range) = literal {
			spans.push(Span::Literal(&pattern[range]));
		}

		Self(spans)
	}

	/// Render the layout for a moment in time. Calendar fields come from the
	/// wall clock of `moment`; the offset token reports the minutes to add to
	/// that wall clock to reach UTC, so `+02:00` renders as `-120`.
	pub fn render(&self, moment: &DateTime<FixedOffset>) -> String {
		let mut output = String::new();

		for span in &self.0 {
			match span {
				Span::Literal(text) => output.push_str(text),
				Span::Token(token) => output.push_str(&render_token(*token, moment)),
			}
		}

		output
	}
}

fn render_token(token: LayoutToken, moment: &DateTime<FixedOffset>) -> String {
	let month_name = MONTHS[moment.month0() as usize];
	let weekday_name = WEEKDAYS[moment.weekday().num_days_from_sunday() as usize];
	let hour = moment.hour();
	let hour12 = match hour % 12 {
		0 => 12,
		other => other,
	};

	match token {
		LayoutToken::LongYear => format!("{:04}", moment.year()),
		LayoutToken::ShortYear => format!("{:02}", moment.year().rem_euclid(100)),
		LayoutToken::LongMonth => month_name.to_string(),
		LayoutToken::ShortMonth => month_name[..3].to_string(),
		LayoutToken::ZeroMonth => format!("{:02}", moment.month()),
		LayoutToken::NumMonth => moment.month().to_string(),
		LayoutToken::ZeroDay => format!("{:02}", moment.day()),
		LayoutToken::Day => moment.day().to_string(),
		LayoutToken::Hour => format!("{hour:02}"),
		LayoutToken::ZeroHour12 => format!("{hour12:02}"),
		LayoutToken::Hour12 => hour12.to_string(),
		LayoutToken::UpperMeridiem => String::from(if hour >= 12 { "PM" } else { "AM" }),
		LayoutToken::LowerMeridiem => String::from(if hour >= 12 { "pm" } else { "am" }),
		LayoutToken::ZeroMinute => format!("{:02}", moment.minute()),
		LayoutToken::ZeroSecond => format!("{:02}", moment.second()),
		LayoutToken::Offset => (-moment.offset().local_minus_utc() / 60).to_string(),
		LayoutToken::LongWeekday => weekday_name.to_string(),
		LayoutToken::ShortWeekday => weekday_name[..3].to_string(),
		LayoutToken::TwoLetterWeekday => weekday_name[..2].to_string(),
	}
}

/// Format a millisecond timestamp in the host's local time zone.
///
/// Timestamps outside the supported calendar range render the layout text
/// unchanged.
pub fn format_timestamp(pattern: &str, timestamp_millis: i64) -> String {
	let Some(moment) = Local.timestamp_millis_opt(timestamp_millis).single() else {
		tracing::debug!(timestamp_millis, "timestamp out of range, rendering layout verbatim");
		return pattern.to_string();
	};

	Layout::parse(pattern).render(&moment.fixed_offset())
}

/// Format a millisecond timestamp at a fixed UTC offset.
pub fn format_timestamp_with_offset(
	pattern: &str,
	timestamp_millis: i64,
	offset: FixedOffset,
) -> String {
	let Some(moment) = offset.timestamp_millis_opt(timestamp_millis).single() else {
		tracing::debug!(timestamp_millis, "timestamp out of range, rendering layout verbatim");
		return pattern.to_string();
	};

	Layout::parse(pattern).render(&moment)
}

/// Format a time of day encoded as `hour * 100 + minute` (`304` is 3:04) in
/// the host's local time zone.
///
/// The date fields of the result are not meaningful. Minutes past 59 roll
/// over into the next hour.
pub fn format_time_of_day(pattern: &str, hhmm: i64) -> String {
	let moment = time_of_day(hhmm)
		.and_then(|naive| Local.from_local_datetime(&naive).earliest())
		.map(|moment| moment.fixed_offset());

	match moment {
		Some(moment) => Layout::parse(pattern).render(&moment),
		None => pattern.to_string(),
	}
}

/// Format a time of day encoded as `hour * 100 + minute` at a fixed UTC
/// offset.
pub fn format_time_of_day_with_offset(pattern: &str, hhmm: i64, offset: FixedOffset) -> String {
	let moment = time_of_day(hhmm).and_then(|naive| offset.from_local_datetime(&naive).single());

	match moment {
		Some(moment) => Layout::parse(pattern).render(&moment),
		None => pattern.to_string(),
	}
}

/// The wall clock time `hhmm` on the anchor date 2006-02-01.
pub(crate) fn time_of_day(hhmm: i64) -> Option<NaiveDateTime> {
	let anchor = NaiveDate::from_ymd_opt(2006, 2, 1)?.and_hms_opt(0, 0, 0)?;
	let delta = TimeDelta::try_hours(hhmm / 100)?.checked_add(&TimeDelta::try_minutes(hhmm % 100)?)?;

	anchor.checked_add_signed(delta)
}

/// A calendar date as supplied by template data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
	pub year: i32,
	/// 1-indexed month.
	pub month: u32,
	pub day: u32,
}

/// The second timestamp of midnight UTC on `date`.
pub fn date_to_timestamp(date: &Date) -> StencilResult<i64> {
	let invalid = || {
		StencilError::InvalidDate {
			year: date.year,
			month: date.month,
			day: date.day,
		}
	};
	let midnight = NaiveDate::from_ymd_opt(date.year, date.month, date.day)
		.ok_or_else(invalid)?
		.and_hms_opt(0, 0, 0)
		.ok_or_else(invalid)?;

	Ok(midnight.and_utc().timestamp())
}

fn utc(timestamp: i64) -> Option<DateTime<Utc>> {
	DateTime::from_timestamp(timestamp, 0)
}

/// Whether two second timestamps fall on the same UTC calendar day.
pub fn same_day(start: i64, end: i64) -> bool {
	match (utc(start), utc(end)) {
		(Some(start), Some(end)) => start.date_naive() == end.date_naive(),
		_ => false,
	}
}

/// Whether two second timestamps fall in the same UTC calendar month.
pub fn same_month(start: i64, end: i64) -> bool {
	match (utc(start), utc(end)) {
		(Some(start), Some(end)) => start.year() == end.year() && start.month() == end.month(),
		_ => false,
	}
}

/// Whether two second timestamps fall in the same UTC calendar year.
pub fn same_year(start: i64, end: i64) -> bool {
	match (utc(start), utc(end)) {
		(Some(start), Some(end)) => start.year() == end.year(),
		_ => false,
	}
}

/// The current year in the host's local time zone.
pub fn current_year() -> i32 {
	Local::now().year()
}
