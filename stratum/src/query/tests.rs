//! Unit tests for the built-in path query evaluator.

use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

use super::{PathQuery, QueryError, QueryEvaluator};

#[fixture]
fn scope() -> Map<String, Value> {
    match json!({
        "Hello": {"World": 42, "list": [1, 2, 3]},
        "Seq": [{"name": "first"}, {"name": "second"}],
        "my-key": {"inner": "quoted"},
        "_private": true,
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[rstest]
#[case("Hello.World", json!(42))]
#[case("Hello.list[1]", json!(2))]
#[case("Hello.list[-1]", json!(3))]
#[case("Seq[1].name", json!("second"))]
#[case(r#""my-key".inner"#, json!("quoted"))]
#[case("_private", json!(true))]
#[case("  Hello.World  ", json!(42))]
#[case("Hello", json!({"World": 42, "list": [1, 2, 3]}))]
fn resolves_paths(scope: Map<String, Value>, #[case] expression: &str, #[case] expected: Value) {
    let found = PathQuery
        .evaluate(expression, &scope)
        .expect("expression is valid");
    assert_eq!(found, Some(expected));
}

#[rstest]
#[case("Missing")]
#[case("Hello.Missing")]
#[case("Hello.list[3]")]
#[case("Hello.list[-4]")]
#[case("Hello.World.deeper")]
#[case("Hello[0]")]
fn missing_paths_are_not_found(scope: Map<String, Value>, #[case] expression: &str) {
    let found = PathQuery
        .evaluate(expression, &scope)
        .expect("expression is valid");
    assert_eq!(found, None);
}

#[rstest]
#[case("", "unexpected end of expression at offset 0")]
#[case("Hello.", "unexpected end of expression at offset 6")]
#[case("1abc", "unexpected character '1' at offset 0")]
#[case("Hello World", "unexpected character ' ' at offset 5")]
#[case("Hello[1", "unexpected end of expression at offset 7")]
#[case("Hello[x]", "unexpected character 'x' at offset 6")]
#[case(r#""open"#, "unterminated quoted identifier starting at offset 0")]
#[case("a[99999999999999999999]", "invalid sequence index '99999999999999999999'")]
fn rejects_malformed_expressions(
    scope: Map<String, Value>,
    #[case] expression: &str,
    #[case] message: &str,
) {
    let err = PathQuery
        .evaluate(expression, &scope)
        .expect_err("expression is malformed");
    assert_eq!(err.to_string(), message);
}

fn upper_case(expression: &str, scope: &Map<String, Value>) -> Result<Option<Value>, QueryError> {
    if expression.is_empty() {
        return Err(QueryError::other("empty expression"));
    }
    Ok(scope.get(&expression.to_uppercase()).cloned())
}

#[rstest]
fn functions_act_as_evaluators() {
    let scope: Map<String, Value> = [("KEY".to_owned(), json!(1))].into_iter().collect();
    let evaluator: &dyn QueryEvaluator = &upper_case;
    assert_eq!(
        evaluator.evaluate("key", &scope).expect("lookup succeeds"),
        Some(json!(1))
    );
    let err = evaluator
        .evaluate("", &scope)
        .expect_err("empty expressions fail");
    assert_eq!(err.to_string(), "empty expression");
}
