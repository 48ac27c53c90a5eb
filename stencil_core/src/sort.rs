//! Sorting, grouping and list helpers over template data.
//!
//! Every function takes its input by reference and returns a new list. Items
//! are `serde_json::Value`s so they can come straight from a template
//! context.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Collator;
use crate::StencilError;
use crate::StencilResult;
use crate::lookup;
use crate::lookup::display_key;
use crate::lookup::is_truthy;

/// One sort key: a dotted field path and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey<'a> {
	pub path: &'a str,
	pub descending: bool,
}

impl<'a> SortKey<'a> {
	/// Parse a sort key. A leading `-` requests descending order.
	pub fn parse(key: &'a str) -> Self {
		match key.strip_prefix('-') {
			Some(path) => {
				Self {
					path,
					descending: true,
				}
			}
			None => {
				Self {
					path: key,
					descending: false,
				}
			}
		}
	}
}

/// Rank of a value kind when two values of different kinds meet. Strings
/// rank last so they sort after every non-string.
fn kind_rank(value: Option<&Value>) -> u8 {
	match value {
		None => 0,
		Some(Value::Null) => 1,
		Some(Value::Bool(_) | Value::Number(_)) => 2,
		Some(Value::Array(_)) => 3,
		Some(Value::Object(_)) => 4,
		Some(Value::String(_)) => 5,
	}
}

fn numeric(value: &Value) -> Option<f64> {
	match value {
		Value::Bool(flag) => Some(f64::from(u8::from(*flag))),
		Value::Number(number) => number.as_f64(),
		_ => None,
	}
}

/// Compare two looked-up field values in ascending order.
///
/// Strings compare with `collator`, numbers and booleans numerically, and
/// values of different kinds by [`kind_rank`]. Arrays and objects tie with
/// each other so the ordering stays a total preorder.
fn compare_field(left: Option<&Value>, right: Option<&Value>, collator: &Collator) -> Ordering {
	match (left, right) {
		(Some(Value::String(left)), Some(Value::String(right))) => collator.compare(left, right),
		(Some(left_value), Some(right_value)) => {
			match (numeric(left_value), numeric(right_value)) {
				(Some(left), Some(right)) => left.total_cmp(&right),
				_ => kind_rank(left).cmp(&kind_rank(right)),
			}
		}
		_ => kind_rank(left).cmp(&kind_rank(right)),
	}
}

fn compare_by_keys(left: &Value, right: &Value, keys: &[SortKey<'_>], collator: &Collator) -> Ordering {
	for key in keys {
		let ordering = compare_field(lookup(left, key.path), lookup(right, key.path), collator);
		let ordering = if key.descending {
			ordering.reverse()
		} else {
			ordering
		};

		if ordering != Ordering::Equal {
			return ordering;
		}
	}

	Ordering::Equal
}

/// Sort records by one or more dotted field paths.
///
/// Each key is compared in turn and ties fall through to the next key. Prefix
/// a key with `-` for descending order. `collation_tag` selects the string
/// ordering (see [`Collator`]). Items that tie on every key keep their input
/// order.
pub fn sort_list_by_keys<S: AsRef<str>>(list: &[Value], keys: &[S], collation_tag: Option<&str>) -> Vec<Value> {
	let mut sorted = list.to_vec();

	if keys.is_empty() || sorted.len() < 2 {
		return sorted;
	}

	let keys: Vec<SortKey<'_>> = keys.iter().map(|key| SortKey::parse(key.as_ref())).collect();
	let collator = Collator::new(collation_tag);
	sorted.sort_by(|left, right| compare_by_keys(left, right, &keys, &collator));

	sorted
}

fn kind_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Sort a list of numbers, booleans or strings.
///
/// Every item must share the kind of the first item. Strings compare with the
/// collator for `collation_tag`.
pub fn sort_list(list: &[Value], ascending: bool, collation_tag: Option<&str>) -> StencilResult<Vec<Value>> {
	let Some(first) = list.first() else {
		return Ok(Vec::new());
	};

	let expected = kind_name(first);

	if !matches!(first, Value::Bool(_) | Value::Number(_) | Value::String(_)) {
		return Err(StencilError::NonPrimitiveList { found: expected });
	}

	if let Some((index, item)) = list
		.iter()
		.enumerate()
		.find(|(_, item)| kind_name(item) != expected)
	{
		return Err(StencilError::MixedList {
			expected,
			found: kind_name(item),
			index,
		});
	}

	let collator = Collator::new(collation_tag);
	let mut sorted = list.to_vec();
	sorted.sort_by(|left, right| {
		let ordering = compare_field(Some(left), Some(right), &collator);
		if ascending { ordering } else { ordering.reverse() }
	});

	Ok(sorted)
}

/// A bucket produced by [`group_list_by_key`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
	pub key: Value,
	pub values: Vec<Value>,
}

/// Group records by the value at a dotted field path.
///
/// With a `fallback`, items whose value is falsy (absent, `null`, `false`,
/// `0` or `""`) are grouped under the fallback. Without one, items missing
/// the field are grouped under `null`. A falsy fallback counts as no
/// fallback. Items keep their input order inside a group and the groups are
/// sorted ascending by key.
pub fn group_list_by_key(list: &[Value], path: &str, fallback: Option<&Value>) -> Vec<Group> {
	let fallback = fallback.filter(|fallback| is_truthy(Some(*fallback)));
	let mut groups: Vec<Group> = Vec::new();

	for item in list {
		let found = lookup(item, path);
		let key = match fallback {
			Some(fallback) if !is_truthy(found) => fallback.clone(),
			_ => found.cloned().unwrap_or(Value::Null),
		};

		match groups.iter_mut().find(|group| group.key == key) {
			Some(group) => group.values.push(item.clone()),
			None => {
				groups.push(Group {
					key,
					values: vec![item.clone()],
				});
			}
		}
	}

	let collator = Collator::default();
	groups.sort_by(|left, right| compare_field(Some(&left.key), Some(&right.key), &collator));

	groups
}

/// Group records into a map keyed by the display string of the value at a
/// dotted field path, so `1` and `"1"` land in the same group.
///
/// Items whose value is falsy use `fallback` when one is supplied and not
/// empty. An item without a usable key and no fallback is an error.
pub fn group_list_by_key_map(
	list: &[Value],
	path: &str,
	fallback: Option<&str>,
) -> StencilResult<BTreeMap<String, Vec<Value>>> {
	let fallback = fallback.filter(|fallback| !fallback.is_empty());
	let mut groups: BTreeMap<String, Vec<Value>> = BTreeMap::new();

	for (index, item) in list.iter().enumerate() {
		let found = lookup(item, path);
		let key = match fallback {
			Some(fallback) if !is_truthy(found) => Some(fallback.to_string()),
			_ => found.and_then(display_key),
		};

		let Some(key) = key else {
			return Err(StencilError::MissingGroupKey {
				path: path.to_string(),
				index,
			});
		};

		groups.entry(key).or_default().push(item.clone());
	}

	Ok(groups)
}

/// Whether two opening hours entries describe the same hours. Entries
/// without `intervals` compare their `time` field instead.
fn same_hours(previous: &Map<String, Value>, current: &Map<String, Value>) -> bool {
	let Some(previous_intervals) = previous.get("intervals") else {
		return previous.get("time") == current.get("time");
	};

	match (previous_intervals, current.get("intervals")) {
		(Value::Array(previous), Some(Value::Array(current))) => {
			previous.len() == current.len()
				&& previous.iter().zip(current).all(|(left, right)| {
					lookup(left, "start") == lookup(right, "start") && lookup(left, "end") == lookup(right, "end")
				})
		}
		_ => false,
	}
}

/// Merge runs of consecutive days with identical opening hours.
///
/// Each entry is an object with a `day` and either `intervals` (a list of
/// `{start, end}`) or a `time`. A run of equal entries, none marked
/// `holiday`, collapses into its first entry with `through` set to the last
/// day of the run.
pub fn collapse_days(hours: &[Value]) -> Vec<Value> {
	let mut output: Vec<Value> = Vec::with_capacity(hours.len());

	for current in hours {
		let merged = match (output.last_mut(), current) {
			(Some(Value::Object(previous)), Value::Object(current_map))
				if !previous.contains_key("holiday")
					&& !current_map.contains_key("holiday")
					&& same_hours(previous, current_map) =>
			{
				let through = current_map.get("day").cloned().unwrap_or(Value::Null);
				previous.insert("through".to_string(), through);
				true
			}
			_ => false,
		};

		if !merged {
			output.push(current.clone());
		}
	}

	output
}

/// Flatten `sections[].items[]` into a single list of items.
///
/// Entries without the field are skipped and non-list values are kept as a
/// single item.
pub fn list_items(list: &[Value]) -> Vec<Value> {
	fn flatten(list: &[Value], key: &str) -> Vec<Value> {
		let mut output = Vec::new();

		for item in list {
			match item.get(key) {
				Some(Value::Array(children)) => output.extend(children.iter().cloned()),
				Some(child) => output.push(child.clone()),
				None => {}
			}
		}

		output
	}

	flatten(&flatten(list, "sections"), "items")
}

/// Whether `list` holds an item equal to `value`.
pub fn contains(list: &[Value], value: &Value) -> bool {
	list.iter().any(|item| item == value)
}

/// The items of `first` followed by the items of `second`.
pub fn augment_list(first: &[Value], second: &[Value]) -> Vec<Value> {
	first.iter().chain(second).cloned().collect()
}
