//! JSON report shape stability.

use throwscan::report::build_json;
use throwscan::{AnnotateOptions, Config, DecorationStyle, Engine, Language};

fn report_value(source: &str, config: &Config) -> serde_json::Value {
    let engine = Engine::new(AnnotateOptions::default()).unwrap();
    let file = engine
        .analyze_source("app.ts", Language::Typescript, source.as_bytes())
        .unwrap();
    let style = DecorationStyle::from_config(config);
    let report = build_json("app.ts", "defaults", &[file], &style);
    serde_json::to_value(&report).unwrap()
}

#[test]
fn test_json_report_fields() {
    let value = report_value(
        "function f() { throw new Error(\"x\"); }\nfunction h() { f(); }\n",
        &Config::default(),
    );

    assert_eq!(value["path"], "app.ts");
    assert_eq!(value["config"], "defaults");
    assert_eq!(value["files_scanned"], 1);
    assert_eq!(value["total_highlights"], 3);

    let file = &value["files"][0];
    assert_eq!(file["file"], "app.ts");
    assert_eq!(file["language"], "typescript");

    let highlights = file["highlights"].as_array().unwrap();
    assert_eq!(highlights.len(), 3);
    assert_eq!(highlights[0]["target"], "declaration");
    assert_eq!(highlights[0]["text"], "f");
    assert_eq!(highlights[0]["start_line"], 1);
    assert_eq!(highlights[0]["start_col"], 10);
    assert_eq!(highlights[0]["end_line"], 1);
    assert_eq!(highlights[0]["end_col"], 11);
    assert_eq!(highlights[2]["target"], "call");
}

#[test]
fn test_json_style_block() {
    let value = report_value("let x = 1;\n", &Config::default());
    assert_eq!(value["total_highlights"], 0);
    assert_eq!(value["style"]["text"], "!");
    assert_eq!(value["style"]["color"], "#ff8800");
    assert_eq!(value["style"]["background"], "rgba(255, 136, 0, 0.2)");
}

#[test]
fn test_json_style_honors_configured_color() {
    let config = Config {
        highlight_color: "#0f0".to_string(),
        decoration: "⚠".to_string(),
        ..Config::default()
    };
    let value = report_value("let x = 1;\n", &config);
    assert_eq!(value["style"]["color"], "#0f0");
    assert_eq!(value["style"]["background"], "rgba(0, 255, 0, 0.2)");
    assert_eq!(value["style"]["text"], "⚠");
}
