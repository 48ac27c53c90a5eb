use serde_json::Value;

/// Resolve a dotted field path (`"address.city"`) against a nested value.
///
/// Each segment indexes into an object by key. A segment made only of digits
/// may also index into an array. Returns `None` as soon as a step is absent,
/// including when an intermediate value is a scalar.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
	path.split('.').try_fold(value, |current, segment| {
		match current {
			Value::Object(map) => map.get(segment),
			Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
			_ => None,
		}
	})
}

/// Whether a value counts as "truthy" when deciding if a group fallback
/// applies. Absent values, `null`, `false`, `0` and `""` are falsy.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(flag)) => *flag,
		Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
		Some(Value::String(text)) => !text.is_empty(),
		Some(Value::Array(_) | Value::Object(_)) => true,
	}
}

/// Render a value the way a template would when using it as a map key.
///
/// Whole numbers drop their fractional part (`1.0` becomes `"1"`), arrays
/// are comma joined and objects collapse to a fixed placeholder. `null`
/// has no string form.
pub(crate) fn display_key(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::Bool(flag) => Some(flag.to_string()),
		Value::Number(number) => Some(display_number(number)),
		Value::String(text) => Some(text.clone()),
		Value::Array(items) => {
			Some(
				items
					.iter()
					.map(|item| display_key(item).unwrap_or_default())
					.collect::<Vec<_>>()
					.join(","),
			)
		}
		Value::Object(_) => Some("[object Object]".to_string()),
	}
}

fn display_number(number: &serde_json::Number) -> String {
	if let Some(int) = number.as_i64() {
		return int.to_string();
	}

	if let Some(uint) = number.as_u64() {
		return uint.to_string();
	}

	match number.as_f64() {
		Some(float) if float.fract() == 0.0 && float.abs() < 1e21 => format!("{float:.0}"),
		Some(float) => float.to_string(),
		None => number.to_string(),
	}
}
