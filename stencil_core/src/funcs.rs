//! Registration of the built-in functions with a minijinja environment.
//!
//! Function names follow the template vocabulary (`timestampf`,
//! `imageBySize`, `sortListByKeys`, ...). Arguments arrive as minijinja
//! values and are converted through serde; failures surface as
//! [`ErrorKind::InvalidOperation`] errors carrying the [`StencilError`]
//! message.

use minijinja::Environment;
use minijinja::Error;
use minijinja::ErrorKind;
use minijinja::Value;
use minijinja::value::ViaDeserialize;
use serde::Serialize;

use crate::Date;
use crate::ImageCandidate;
use crate::ImageEntity;
use crate::StencilConfig;
use crate::StencilError;
use crate::StencilResult;
use crate::augment_list;
use crate::collapse_days;
use crate::contains;
use crate::current_year;
use crate::date_to_timestamp;
use crate::format_time_of_day;
use crate::format_time_of_day_with_offset;
use crate::format_timestamp;
use crate::format_timestamp_with_offset;
use crate::group_list_by_key;
use crate::group_list_by_key_map;
use crate::image_by_dimensions;
use crate::image_by_size;
use crate::image_by_size_entity;
use crate::list_items;
use crate::plural;
use crate::same_day;
use crate::same_month;
use crate::same_year;
use crate::sort_list;
use crate::sort_list_by_keys;

type Json = serde_json::Value;

fn template_error(error: StencilError) -> Error {
	Error::new(ErrorKind::InvalidOperation, error.to_string())
}

fn to_value<T: Serialize>(value: T) -> Value {
	Value::from_serialize(value)
}

fn to_json(value: &Value) -> Result<Json, Error> {
	serde_json::to_value(value).map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

/// Add every built-in function to `env`. Calls that leave out a locale,
/// collation tag or time zone use the defaults from `config`.
pub fn register(env: &mut Environment<'_>, config: &StencilConfig) {
	let default_locale = config.plural.default_locale.clone();
	env.add_function(
		"pluralSelect",
		move |n: Value, locale: Option<String>, precision: Option<u32>| -> Result<Value, Error> {
			let n = f64::try_from(n.clone()).map_err(|_| {
				template_error(StencilError::InvalidArgument {
					function: "pluralSelect",
					reason: format!("expected a number, found `{n}`"),
				})
			})?;
			let locale = locale.as_deref().unwrap_or(&default_locale);

			Ok(to_value(plural::select(locale, n, precision)))
		},
	);

	let offset = config.utc_offset();
	env.add_function("timestampf", move |pattern: String, timestamp: i64| {
		match offset {
			Some(offset) => format_timestamp_with_offset(&pattern, timestamp, offset),
			None => format_timestamp(&pattern, timestamp),
		}
	});
	env.add_function("timef", move |pattern: String, hhmm: i64| {
		match offset {
			Some(offset) => format_time_of_day_with_offset(&pattern, hhmm, offset),
			None => format_time_of_day(&pattern, hhmm),
		}
	});
	env.add_function("sameDay", same_day);
	env.add_function("sameMonth", same_month);
	env.add_function("sameYear", same_year);
	env.add_function("dateToTimestamp", |date: ViaDeserialize<Date>| {
		date_to_timestamp(&date).map_err(template_error)
	});
	env.add_function("currentYear", current_year);

	env.add_function(
		"imageBySize",
		|sizes: ViaDeserialize<Vec<ImageCandidate>>, desired_size: String, at_least: Option<bool>| {
			image_by_size(&sizes, &desired_size, at_least.unwrap_or(true))
				.map(str::to_string)
				.map_err(template_error)
		},
	);
	env.add_function(
		"imageBySizeEntity",
		|image: ViaDeserialize<ImageEntity>, desired_size: String, at_least: Option<bool>| {
			image_by_size_entity(&image, &desired_size, at_least.unwrap_or(true)).map_err(template_error)
		},
	);
	// Picks among the given sizes only. A single-size list returns that size's
	// url as is; no resized-image CDN url is generated for it.
	env.add_function(
		"dynamicImageBySize",
		|sizes: ViaDeserialize<Vec<ImageCandidate>>, width: i64, height: i64, at_least: Option<bool>| {
			image_by_dimensions(&sizes, width, height, at_least.unwrap_or(true))
				.map(str::to_string)
				.map_err(template_error)
		},
	);

	let collation = config.sort.collation.clone();
	env.add_function(
		"sortListByKeys",
		move |list: ViaDeserialize<Vec<Json>>, keys: Vec<String>, tag: Option<String>| {
			let tag = tag.as_deref().or(collation.as_deref());
			to_value(sort_list_by_keys(&list, &keys, tag))
		},
	);
	let collation = config.sort.collation.clone();
	env.add_function(
		"sortList",
		move |list: ViaDeserialize<Vec<Json>>, ascending: Option<bool>| -> Result<Value, Error> {
			sort_list(&list, ascending.unwrap_or(true), collation.as_deref())
				.map(to_value)
				.map_err(template_error)
		},
	);
	env.add_function(
		"groupListByKey",
		|list: ViaDeserialize<Vec<Json>>, key: String, fallback: Option<Value>| -> Result<Value, Error> {
			let fallback = fallback.as_ref().map(to_json).transpose()?;
			Ok(to_value(group_list_by_key(&list, &key, fallback.as_ref())))
		},
	);
	env.add_function(
		"groupListByKeyMap",
		|list: ViaDeserialize<Vec<Json>>, key: String, fallback: Option<String>| -> Result<Value, Error> {
			group_list_by_key_map(&list, &key, fallback.as_deref())
				.map(to_value)
				.map_err(template_error)
		},
	);

	env.add_function("collapseDays", |hours: ViaDeserialize<Vec<Json>>| {
		to_value(collapse_days(&hours))
	});
	env.add_function("listItems", |list: ViaDeserialize<Vec<Json>>| {
		to_value(list_items(&list))
	});
	env.add_function(
		"contains",
		|list: ViaDeserialize<Vec<Json>>, value: Value| -> Result<bool, Error> {
			Ok(contains(&list, &to_json(&value)?))
		},
	);
	env.add_function(
		"augmentList",
		|first: ViaDeserialize<Vec<Json>>, second: ViaDeserialize<Vec<Json>>| {
			to_value(augment_list(&first, &second))
		},
	);
}

/// Render a one-off template with every built-in function registered.
pub fn render_str<S: Serialize>(source: &str, context: S, config: &StencilConfig) -> StencilResult<String> {
	let mut env = Environment::new();
	env.set_keep_trailing_newline(true);
	register(&mut env, config);
	env.add_template("__inline__", source)
		.map_err(|e| StencilError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template("__inline__")
		.map_err(|e| StencilError::TemplateRender(e.to_string()))?;

	template
		.render(Value::from_serialize(context))
		.map_err(|e| StencilError::TemplateRender(e.to_string()))
}
