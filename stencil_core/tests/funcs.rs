use rstest::rstest;
use serde_json::json;
use similar_asserts::assert_eq;
use stencil_core::StencilConfig;
use stencil_core::StencilError;
use stencil_core::StencilResult;
use stencil_core::render_str;

fn utc_config() -> StencilConfig {
	StencilConfig::from_toml("[datetime]\nutc_offset_minutes = 0\n")
		.unwrap_or_else(|e| panic!("config: {e}"))
}

fn context() -> serde_json::Value {
	json!({
		"sizes": [
			{ "url": "s", "width": 100, "height": 100 },
			{ "url": "m", "width": 300, "height": 300 },
			{ "url": "l", "width": 800, "height": 800 },
		],
		"image": {
			"url": "original",
			"width": 1000,
			"height": 1000,
			"thumbnails": [{ "url": "thumb", "width": 150, "height": 150 }],
		},
		"items": [
			{ "t": "y", "v": 2 },
			{ "t": "x", "v": 1 },
			{ "t": "x", "v": 3 },
		],
		"ids": [{ "id": 1 }, { "id": "1" }, { "id": 2 }],
		"names": [{ "name": "ö" }, { "name": "z" }, { "name": "a" }],
		"hours": [
			{ "day": "MONDAY", "time": "24h" },
			{ "day": "TUESDAY", "time": "24h" },
		],
		"menus": [{ "sections": [{ "items": ["soup", "bread"] }] }],
	})
}

#[rstest]
#[case::plural_default_locale("{{ pluralSelect(1).category }}", "one")]
#[case::plural_locale("{{ pluralSelect(2, 'ar').category }}", "two")]
#[case::plural_index("{{ pluralSelect(11, 'ar').index }}", "4")]
#[case::plural_precision("{{ pluralSelect(1, 'en', 2).category }}", "other")]
#[case::timestampf("{{ timestampf('Monday 2006-01-02', 1677974400000) }}", "Sunday 2023-03-05")]
#[case::timef("{{ timef('3:04 PM', 1504) }}", "3:04 PM")]
#[case::same_day("{{ sameDay(1677974400, 1678000000) }}", "true")]
#[case::same_month("{{ sameMonth(1677974400, 1680393600) }}", "false")]
#[case::same_year("{{ sameYear(1677974400, 1680393600) }}", "true")]
#[case::date_to_timestamp("{{ dateToTimestamp({'year': 2023, 'month': 3, 'day': 5}) }}", "1677974400")]
#[case::current_year("{{ currentYear() > 2000 }}", "true")]
#[case::image_by_size("{{ imageBySize(sizes, '250x250') }}", "m")]
#[case::image_by_size_at_most("{{ imageBySize(sizes, '250x250', false) }}", "s")]
#[case::image_by_size_entity("{{ imageBySizeEntity(image, '500x') }}", "original")]
#[case::dynamic_image_by_size("{{ dynamicImageBySize(sizes, 250, 0) }}", "m")]
#[case::dynamic_image_single_size(
	"{{ dynamicImageBySize([{'url': 'https://dynl.mktgcdn.com/p/a/100x100.jpg', 'width': 100, 'height': 100}], 500, 500) }}",
	"https://dynl.mktgcdn.com/p/a/100x100.jpg"
)]
#[case::sort_list_by_keys(
	"{% for item in sortListByKeys(items, ['t', '-v']) %}{{ item.v }}{% endfor %}",
	"312"
)]
#[case::sort_list("{{ sortList([3, 1, 2], false) | join(',') }}", "3,2,1")]
#[case::group_list_by_key(
	"{% for group in groupListByKey(items, 't') %}{{ group.key }}={{ group['values'] | length }} {% endfor %}",
	"x=2 y=1 "
)]
#[case::group_list_by_key_fallback(
	"{% for group in groupListByKey(ids, 'missing', 'none') %}{{ group.key }}{% endfor %}",
	"none"
)]
#[case::group_list_by_key_map("{{ groupListByKeyMap(ids, 'id')['1'] | length }}", "2")]
#[case::collapse_days("{{ collapseDays(hours)[0].through }}", "TUESDAY")]
#[case::list_items("{{ listItems(menus) | join(', ') }}", "soup, bread")]
#[case::contains("{{ contains([1, 2, 3], 2) }}", "true")]
#[case::augment_list("{{ augmentList([1], [2, 3]) | join('') }}", "123")]
fn renders_builtin_functions(#[case] source: &str, #[case] expected: &str) -> StencilResult<()> {
	let rendered = render_str(source, context(), &utc_config())?;
	assert_eq!(rendered, expected);

	Ok(())
}

#[test]
fn config_defaults_apply_to_calls() -> StencilResult<()> {
	let config = StencilConfig::from_toml(
		"[plural]\ndefault_locale = \"fr\"\n\n[sort]\ncollation = \"sv\"\n\n[datetime]\nutc_offset_minutes = 120\n",
	)?;
	let source = "{{ pluralSelect(0).category }} {{ timestampf('15:04 -0700', 0) }} {% for n in sortListByKeys(names, ['name']) %}{{ n.name }}{% endfor %}";

	insta::assert_snapshot!(render_str(source, context(), &config)?, @"one 02:00 -120 azö");

	let root = "{% for n in sortListByKeys(names, ['name'], 'en') %}{{ n.name }}{% endfor %}";
	assert_eq!(render_str(root, context(), &config)?, "aöz");

	Ok(())
}

#[rstest]
#[case::timestampf(
	"{{ timestampf('Mon Jan 2 15:04:05 -0700 2006', 1677974400000) }}",
	stencil_core::format_timestamp("Mon Jan 2 15:04:05 -0700 2006", 1_677_974_400_000)
)]
#[case::timef(
	"{{ timef('Mon Jan 2 15:04 -0700', 1504) }}",
	stencil_core::format_time_of_day("Mon Jan 2 15:04 -0700", 1504)
)]
fn default_config_uses_host_time_zone(#[case] source: &str, #[case] expected: String) -> StencilResult<()> {
	let rendered = render_str(source, context(), &StencilConfig::default())?;
	assert_eq!(rendered, expected);

	Ok(())
}

#[rstest]
#[case::mixed_list("{{ sortList([1, 'a']) }}", "mixed list")]
#[case::empty_candidates("{{ imageBySize([], '10x10') }}", "non-zero length image candidate list required")]
#[case::bad_size("{{ imageBySize(sizes, '250') }}", "invalid desired size")]
#[case::missing_group_key("{{ groupListByKeyMap(items, 'missing') }}", "no group key found")]
#[case::invalid_date("{{ dateToTimestamp({'year': 2023, 'month': 2, 'day': 30}) }}", "invalid date")]
#[case::plural_not_a_number("{{ pluralSelect('many') }}", "expected a number")]
fn reports_function_errors(#[case] source: &str, #[case] message: &str) {
	let result = render_str(source, context(), &utc_config());

	match result {
		Err(StencilError::TemplateRender(reason)) => {
			assert!(reason.contains(message), "`{reason}` does not mention `{message}`");
		}
		other => panic!("expected a render error, found {other:?}"),
	}
}

#[test]
fn render_leaves_context_untouched() -> StencilResult<()> {
	let context = context();
	let before = context.clone();
	let source = "{{ sortListByKeys(items, ['-v']) | length }}{{ groupListByKey(items, 't') | length }}";

	assert_eq!(render_str(source, &context, &utc_config())?, "32");
	assert_eq!(context, before);

	Ok(())
}
