use rstest::rstest;

use super::utils::{Recorder, Scripted, ScriptedSource, captured_events, new_log, take};
use crate::{
    Dispatcher, JsonHandler, LoggingHandler, ParserOptions, PathBuilder, RegistrationError,
    ScanState,
};

/// Scans `json` with a [`Recorder`] at each of `paths`, labelled by its path.
fn dispatch(json: &str, paths: &[&'static str]) -> Vec<String> {
    let log = new_log();
    let mut dispatcher = Dispatcher::from_str(json);
    for &path in paths {
        dispatcher.register(path, Recorder::new(path, &log)).unwrap();
    }
    dispatcher.scan().expect("scan failed");
    assert_eq!(dispatcher.state(), ScanState::Done);
    take(&log)
}

#[test]
fn array_elements_reach_the_array_handler() {
    assert_eq!(
        dispatch(r#"{"items":[1,2]}"#, &["{items["]),
        [
            "{items[ begin",
            "{items[ value None Some(\"1\")",
            "{items[ value None Some(\"2\")",
            "{items[ end",
        ]
    );
}

#[test]
fn scalar_elements_do_not_begin_or_end() {
    let log = dispatch(r#"{"items":[1,2]}"#, &["{items["]);
    let values: Vec<_> = log.iter().filter(|l| l.contains("value")).collect();
    assert_eq!(values.len(), 2);
    // one begin/end pair for the array itself, none per element
    assert_eq!(log.iter().filter(|l| l.ends_with("begin")).count(), 1);
    assert_eq!(log.iter().filter(|l| l.ends_with("end")).count(), 1);
}

#[test]
fn nested_object_begin_value_end() {
    assert_eq!(
        dispatch(r#"{"a":{"b":1}}"#, &["{a{"]),
        ["{a{ begin", "{a{ value Some(\"b\") Some(\"1\")", "{a{ end"]
    );
}

#[test]
fn unmatched_path_is_never_invoked() {
    assert!(dispatch(r#"{"items":[1,2],"other":{"missing":[]}}"#, &["{missing["]).is_empty());
}

#[rstest]
#[case::number("42")]
#[case::string(r#""text""#)]
#[case::boolean("true")]
#[case::null("null")]
fn root_scalar_reaches_no_handler(#[case] json: &str) {
    assert!(dispatch(json, &["[", "{"]).is_empty());
}

#[test]
fn root_scalar_has_empty_path_and_no_name() {
    let mut dispatcher = Dispatcher::new(ScriptedSource::new([Scripted::Num("7")]));
    assert_eq!(dispatcher.current_path(), "");
    assert!(dispatcher.step().unwrap());
    assert!(dispatcher.stack().is_empty());
    assert!(!dispatcher.step().unwrap());
}

#[test]
fn root_containers_use_bare_dividers() {
    assert_eq!(
        dispatch("[[1], {\"k\": true}]", &["[", "[[", "[{"]),
        [
            "[ begin",
            "[[ begin",
            "[[ value None Some(\"1\")",
            "[[ end",
            "[{ begin",
            "[{ value Some(\"k\") Some(\"true\")",
            "[{ end",
            "[ end",
        ]
    );
}

#[test]
fn null_is_distinct_from_empty_string() {
    assert_eq!(
        dispatch(r#"{"a": null, "b": "", "c": false}"#, &["{"]),
        [
            "{ begin",
            "{ value Some(\"a\") None",
            "{ value Some(\"b\") Some(\"\")",
            "{ value Some(\"c\") Some(\"false\")",
            "{ end",
        ]
    );
}

#[test]
fn numbers_keep_their_source_text() {
    assert_eq!(
        dispatch("[1.50, -0, 2E+3]", &["["])[1..4],
        [
            "[ value None Some(\"1.50\")",
            "[ value None Some(\"-0\")",
            "[ value None Some(\"2E+3\")",
        ]
    );
}

#[test]
fn builder_paths_address_nested_elements() {
    let log = new_log();
    let mut dispatcher =
        Dispatcher::from_str(r#"{"items": [{"id": 1, "tags": ["x"]}, {"id": 2}]}"#);
    let element = PathBuilder::new()
        .add_object(None)
        .add_array(Some("items"))
        .add_object(None);
    let tags = element.clone().add_array(Some("tags"));
    dispatcher
        .register(element, Recorder::new("element", &log))
        .unwrap();
    dispatcher.register(tags, Recorder::new("tags", &log)).unwrap();
    dispatcher.scan().unwrap();

    assert_eq!(
        take(&log),
        [
            "element begin",
            "element value Some(\"id\") Some(\"1\")",
            "tags begin",
            "tags value None Some(\"x\")",
            "tags end",
            "element end",
            "element begin",
            "element value Some(\"id\") Some(\"2\")",
            "element end",
        ]
    );
}

#[test]
fn last_registration_wins() {
    let log = new_log();
    let mut dispatcher = Dispatcher::from_str("[1]");
    dispatcher.register("[", Recorder::new("first", &log)).unwrap();
    dispatcher.register("[", Recorder::new("second", &log)).unwrap();
    assert_eq!(dispatcher.registry().len(), 1);
    dispatcher.scan().unwrap();

    assert_eq!(
        take(&log),
        ["second begin", "second value None Some(\"1\")", "second end"]
    );
}

#[test]
fn only_replacement_is_logged_at_registration() {
    let out = captured_events(|| {
        let mut dispatcher = Dispatcher::from_str("[1]");
        dispatcher.register("[", LoggingHandler).unwrap();
        dispatcher.register("{a[", LoggingHandler).unwrap();
        dispatcher.register("[", LoggingHandler).unwrap();
        assert_eq!(dispatcher.registry().len(), 2);
    });
    let replacements: Vec<&str> = out.lines().filter(|l| l.contains("replacing handler")).collect();
    assert_eq!(replacements.len(), 1, "{out}");
    assert!(replacements[0].contains(r#"path="[""#), "{out}");
}

#[test]
fn empty_path_is_rejected_at_registration() {
    let mut dispatcher = Dispatcher::from_str("1");
    assert_eq!(
        dispatcher.register("", LoggingHandler),
        Err(RegistrationError::EmptyPath)
    );
    assert!(dispatcher.registry().is_empty());
}

#[test]
fn borrowed_handler_is_usable_after_scan() {
    let log = new_log();
    let mut recorder = Recorder::new("", &log);
    {
        let mut dispatcher = Dispatcher::from_str(r#"{"x": "y"}"#);
        dispatcher.register("{", &mut recorder).unwrap();
        dispatcher.scan().unwrap();
    }
    recorder.value(None, Some("after")).unwrap();
    assert_eq!(
        take(&log),
        ["begin", "value Some(\"x\") Some(\"y\")", "end", "value None Some(\"after\")"]
    );
}

#[test]
fn multiple_values_dispatch_in_turn() {
    let log = new_log();
    let options = ParserOptions {
        allow_multiple_json_values: true,
        ..Default::default()
    };
    let mut dispatcher = Dispatcher::from_str_with_options("[1]\n[2] 3", options);
    dispatcher.register("[", Recorder::new("", &log)).unwrap();
    dispatcher.scan().unwrap();

    assert_eq!(
        take(&log),
        [
            "begin",
            "value None Some(\"1\")",
            "end",
            "begin",
            "value None Some(\"2\")",
            "end",
        ]
    );
}

#[test]
fn scan_after_done_is_a_no_op() {
    let log = new_log();
    let mut dispatcher = Dispatcher::from_str("[true]");
    dispatcher.register("[", Recorder::new("", &log)).unwrap();
    dispatcher.scan().unwrap();
    assert_eq!(take(&log).len(), 3);

    dispatcher.scan().unwrap();
    assert!(take(&log).is_empty());
    assert_eq!(dispatcher.state(), ScanState::Done);
}

#[test]
fn other_tokens_are_skipped_silently() {
    let log = new_log();
    let source = ScriptedSource::new([
        Scripted::BeginObject,
        Scripted::Name("skipped"),
        Scripted::Other,
        Scripted::Name("kept"),
        Scripted::BeginArray,
        Scripted::Other,
        Scripted::Str("s"),
        Scripted::Other,
        Scripted::EndArray,
        Scripted::EndObject,
    ]);
    let mut dispatcher = Dispatcher::new(source);
    dispatcher.register("{", Recorder::new("{", &log)).unwrap();
    dispatcher.register("{kept[", Recorder::new("{kept[", &log)).unwrap();
    dispatcher.scan().unwrap();

    assert_eq!(
        take(&log),
        [
            "{ begin",
            "{kept[ begin",
            "{kept[ value None Some(\"s\")",
            "{kept[ end",
            "{ end",
        ]
    );
    assert_eq!(dispatcher.into_source().remaining(), 0);
}

#[test]
fn scripted_scalars_render_like_the_reader() {
    let log = new_log();
    let source = ScriptedSource::new([
        Scripted::BeginArray,
        Scripted::Bool(false),
        Scripted::Null,
        Scripted::Num("1e3"),
        Scripted::EndArray,
    ]);
    let mut dispatcher = Dispatcher::new(source);
    dispatcher.register("[", Recorder::new("", &log)).unwrap();
    dispatcher.scan().unwrap();

    assert_eq!(
        take(&log),
        [
            "begin",
            "value None Some(\"false\")",
            "value None None",
            "value None Some(\"1e3\")",
            "end",
        ]
    );
}

#[test]
fn depth_limit_allows_documents_within_it() {
    let options = ParserOptions {
        max_depth: Some(2),
        ..Default::default()
    };
    let mut dispatcher = Dispatcher::from_str_with_options("[[1], {}]", options);
    assert_eq!(dispatcher.scan().map_err(|e| e.to_string()), Ok(()));
}

#[test]
fn into_source_returns_the_reader_position() {
    let mut dispatcher = Dispatcher::from_str("[1,\n 2]");
    dispatcher.scan().unwrap();
    assert_eq!(dispatcher.into_source().position(), (2, 4));
}
