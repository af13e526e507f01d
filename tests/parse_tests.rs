mod common;

use common::{data, init_logging};
use serde_json::json;
use tailor::{DataMap, ParseConfig, Template};

// ============================================================================
// Scanning and substitution
// ============================================================================

#[test]
fn test_fragment_without_tags_is_returned_unchanged() {
    init_logging();

    let fragment = "Plain text.\nNo tags at all, not even one.\n";
    let mut data = DataMap::new();
    assert_eq!(Template::parse_text(fragment, &mut data), fragment);
}

#[test]
fn test_escaped_escape_renders_single_escape() {
    init_logging();

    let mut data = data(json!({"pct": "99"}));
    assert_eq!(
        Template::parse_text("CPU at %{pct}%%, disk at 100%%", &mut data),
        "CPU at 99%, disk at 100%"
    );
}

#[test]
fn test_stray_escape_passes_through() {
    init_logging();

    let mut data = DataMap::new();
    assert_eq!(Template::parse_text("50% off", &mut data), "50% off");
    assert_eq!(Template::parse_text("trailing %", &mut data), "trailing %");
}

#[test]
fn test_variable_renders_exactly_once() {
    init_logging();

    let mut data = data(json!({"x": "val"}));
    assert_eq!(Template::parse_text(">%{x}<", &mut data), ">val<");
    assert_eq!(Template::parse_text("%{x}%{x}", &mut data), "valval");
}

#[test]
fn test_non_string_scalars_render_via_json_form() {
    init_logging();

    let mut data = data(json!({"num": 12345, "flag": true, "frac": 0.5}));
    assert_eq!(
        Template::parse_text("%{num} %{flag} %{frac}", &mut data),
        "12345 true 0.5"
    );
}

#[test]
fn test_unterminated_tag_is_a_hard_stop() {
    init_logging();

    let mut data = data(json!({"a": "1"}));
    let out = Template::parse_text("ok %{a} bad %{oops and much more text", &mut data);
    assert_eq!(
        out,
        "ok 1 bad {{+++ERROR: SUBSTITUTION VAR NOT TERMINATED +++}}"
    );
}

#[test]
fn test_control_bytes_in_tag_name_become_underscores() {
    init_logging();

    let mut data = data(json!({"a_b": "joined"}));
    assert_eq!(Template::parse_text("%{a\tb}", &mut data), "joined");
}

// ============================================================================
// Unresolved variables
// ============================================================================

#[test]
fn test_unresolved_variable_yields_named_marker() {
    init_logging();

    let mut data = DataMap::new();
    let out = Template::parse_text("%{ghost}", &mut data);
    assert_eq!(out, "{{+++ERROR: 'ghost' SUBSTITUTION VAR NOT FOUND +++}}");
    assert!(data.is_empty());
}

#[test]
fn test_ignore_unresolved_round_trip() {
    init_logging();

    let config = ParseConfig {
        ignore_unresolved: true,
    };
    let fragment = "Hello %{name}, today is %{date}.";

    // First pass: only `name` is known; the unresolved tag survives.
    let mut pass_one = data(json!({"name": "Bob"}));
    let intermediate = Template::parse_text_with(fragment, &mut pass_one, &config);
    assert_eq!(intermediate, "Hello Bob, today is %{date}.");

    // Re-parsing with the same unresolved state is idempotent.
    let mut same = data(json!({}));
    assert_eq!(
        Template::parse_text_with(&intermediate, &mut same, &config),
        intermediate
    );

    // Second pass with the missing value completes the output.
    let mut pass_two = data(json!({"date": "Thursday"}));
    assert_eq!(
        Template::parse_text_with(&intermediate, &mut pass_two, &config),
        "Hello Bob, today is Thursday."
    );
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_if_def_renders_iff_defined() {
    init_logging();

    let fragment = "%{ifDef#abc}yes(%{abc})%{fi#}%{ifUnDef#abc}no%{fi#}";

    let mut defined = data(json!({"abc": "--abc--"}));
    assert_eq!(Template::parse_text(fragment, &mut defined), "yes(--abc--)");

    let mut undefined = DataMap::new();
    assert_eq!(Template::parse_text(fragment, &mut undefined), "no");
}

#[test]
fn test_if_def_sequence_with_set_and_unset() {
    init_logging();

    // The data edits are visible to the conditionals that follow them.
    let fragment = concat!(
        "1%{ifDef#abc}a%{fi#}",
        "%{set#xyz=123}2%{ifDef#xyz}x%{fi#}",
        "%{unSet#xyz}3%{ifDef#xyz}x%{fi#}",
        "%{unSet#abc}4%{ifDef#abc}a%{fi#}",
    );
    let mut data = data(json!({"abc": "set"}));
    assert_eq!(Template::parse_text(fragment, &mut data), "1a2x34");
}

#[test]
fn test_suppressed_block_nesting_is_inert() {
    init_logging();

    // Inside a suppressed region, nested conditionals must not re-enable
    // output no matter what their own condition says.
    let fragment = "A%{ifUnDef#on}hidden %{ifDef#on}deep%{fi#}%{ifUnDef#off}deeper%{fi#} hidden%{fi#}B";
    let mut data = data(json!({"on": "1"}));
    assert_eq!(Template::parse_text(fragment, &mut data), "AB");
}

#[test]
fn test_marker_valued_variable_is_not_defined() {
    init_logging();

    let mut data = data(json!({
        "propagated": "{{+++ERROR: 'other' SUBSTITUTION VAR NOT FOUND +++}}"
    }));
    let out = Template::parse_text(
        "%{ifDef#propagated}present%{fi#}%{ifUnDef#propagated}missing%{fi#}",
        &mut data,
    );
    assert_eq!(out, "missing");
}

// ============================================================================
// Data edits
// ============================================================================

#[test]
fn test_set_then_substitute_then_unset() {
    init_logging();

    let mut data = DataMap::new();
    let out = Template::parse_text("%{set#a=1}%{a}|%{unSet#a}%{a}", &mut data);
    assert_eq!(out, "1|{{+++ERROR: 'a' SUBSTITUTION VAR NOT FOUND +++}}");
}

#[test]
fn test_set_mutations_outlive_the_parse() {
    init_logging();

    let mut data = data(json!({"seed": "grow"}));
    Template::parse_text("%{set#copied=literal}%{set?aliased=seed}%{unSet#seed}", &mut data);
    assert_eq!(data.get("copied"), Some(&json!("literal")));
    assert_eq!(data.get("aliased"), Some(&json!("grow")));
    assert!(!data.contains_key("seed"));
}

#[test]
fn test_malformed_set_expressions_leave_map_unmodified() {
    init_logging();

    let mut data = data(json!({"only": "entry"}));

    let out = Template::parse_text("%{set#nothing-to-assign}", &mut data);
    assert_eq!(
        out,
        "{{+++ERROR: set# expression nothing-to-assign is invalid +++}}"
    );

    let out = Template::parse_text("%{set?=var}", &mut data);
    assert_eq!(out, "{{+++ERROR: set? expression =var is invalid +++}}");

    assert_eq!(data.len(), 1);
}

#[test]
fn test_set_var_copies_lists_usable_by_repeat() {
    init_logging();

    let provider = common::store(&[("main.txt", "%{set?rows=source}%{repeat#rows}"), ("rows", "<%{n}>")]);
    let template = Template::new(provider, "main.txt").unwrap();
    let mut data = data(json!({"source": [{"n": "1"}, {"n": "2"}]}));
    assert_eq!(template.parse(&mut data), "<1><2>");
    assert_eq!(data.get("rows"), Some(&json!([{"n": "1"}, {"n": "2"}])));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_list_data_dumps_primary_map() {
    init_logging();

    let mut data = data(json!({"a": "1", "b": 2}));
    let out = Template::parse_text("%{listData}", &mut data);
    assert!(out.starts_with("Primary data ----------------"));
    assert!(out.contains("Data size = 2"));
    assert!(out.contains("a=1"));
    assert!(out.contains("b=2"));
}

#[test]
fn test_list_data_inside_repeat_shows_override_first() {
    init_logging();

    let provider = common::store(&[("main.txt", "%{repeat#rows}")]);
    let store_template = Template::new(provider.clone(), "main.txt").unwrap();
    provider.add("rows", b"%{listData}".to_vec()).unwrap();

    let mut data = data(json!({"rows": [{"n": "7"}]}));
    let out = store_template.parse(&mut data);
    let override_pos = out.find("Override data").expect("override section");
    let primary_pos = out.find("Primary data").expect("primary section");
    assert!(override_pos < primary_pos);
    assert!(out.contains("n=7"));
}
