use super::root;
use super::schema_builder;
use super::variables;
use crate::config::EngineConfig;
use crate::config::ExecutionOptions;
use crate::object;
use crate::resolver::sync_resolver;
use crate::resolver::FieldValue;
use crate::resolver::ObjectValue;
use crate::resolver::ResolverContext;
use crate::resolver::ResolverResult;
use crate::response::Cancelled;
use crate::response::Request;
use crate::response::Response;
use crate::schema::SchemaBuilder;
use crate::Engine;
use crate::Value;
use indexmap::IndexMap;
use serde_json::json;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn engine() -> Engine {
    Engine::new(schema_builder().build().unwrap())
}

async fn execute(engine: &Engine, query: &str, vars: serde_json::Value) -> Response {
    let document = crate::parse(query).unwrap();
    engine
        .execute(&document, None, &variables(vars), root())
        .await
        .unwrap()
}

async fn execute_json(engine: &Engine, query: &str) -> serde_json::Value {
    serde_json::to_value(execute(engine, query, json!({})).await).unwrap()
}

mod results {
    use super::*;

    #[tokio::test]
    async fn nested_objects_and_lists() {
        let response = execute_json(
            &engine(),
            "query { user(id: \"1\") { name friends { name } } }",
        )
        .await;

        assert_eq!(
            response,
            json!({"data": {"user": {"name": "Ann", "friends": [{"name": "Bo"}]}}}),
        );
    }

    #[tokio::test]
    async fn response_keys_follow_first_occurrence() {
        let response = execute(
            &engine(),
            concat!(
                "{ b: greeting(name: \"B\") a: greeting user(id: \"1\") { name } ",
                "user(id: \"1\") { friends { name } } }",
            ),
            json!({}),
        )
        .await;

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            concat!(
                r#"{"data":{"b":"Hello, B!","a":"Hello, world!","#,
                r#""user":{"name":"Ann","friends":[{"name":"Bo"}]}}}"#,
            ),
        );
    }

    #[tokio::test]
    async fn fragment_for_other_type_contributes_nothing() {
        let response = execute_json(&engine(), "query { widget { id ... on Gadget { power } } }").await;

        assert_eq!(response, json!({"data": {"widget": {"id": "w1"}}}));
    }

    #[tokio::test]
    async fn fragments_on_matching_types_are_expanded() {
        let response = execute_json(
            &engine(),
            concat!(
                "{ widget { ...WidgetParts ... on Sprocket { teeth } } }\n",
                "fragment WidgetParts on Widget { __typename id }\n",
            ),
        )
        .await;

        assert_eq!(
            response,
            json!({"data": {"widget": {"__typename": "Sprocket", "id": "w1", "teeth": 12}}}),
        );
    }

    #[tokio::test]
    async fn union_members_report_their_type() {
        let response = execute_json(
            &engine(),
            "{ search(text: \"a\") { __typename ... on User { name } ... on Post { title } } }",
        )
        .await;

        assert_eq!(
            response,
            json!({"data": {"search": [
                {"__typename": "User", "name": "Ann"},
                {"__typename": "Post", "title": "Hello"},
            ]}}),
        );
    }

    #[tokio::test]
    async fn typename_of_root() {
        let response = execute_json(&engine(), "{ __typename }").await;

        assert_eq!(response, json!({"data": {"__typename": "Query"}}));
    }

    #[tokio::test]
    async fn skip_and_include() {
        let query = "query Q($flag: Boolean!) { greeting @skip(if: $flag) count(n: 1) @include(if: $flag) }";

        let flagged = serde_json::to_value(execute(&engine(), query, json!({"flag": true})).await).unwrap();
        let unflagged =
            serde_json::to_value(execute(&engine(), query, json!({"flag": false})).await).unwrap();

        assert_eq!(flagged, json!({"data": {"count": 1}}));
        assert_eq!(unflagged, json!({"data": {"greeting": "Hello, world!"}}));
    }

    #[tokio::test]
    async fn skipped_fragment_spread() {
        let response = execute_json(
            &engine(),
            "{ user(id: \"1\") { id ...Names @skip(if: true) } } fragment Names on User { name }",
        )
        .await;

        assert_eq!(response, json!({"data": {"user": {"id": "1"}}}));
    }

    #[tokio::test]
    async fn missing_property_is_null() {
        let response = execute_json(&engine(), "{ slow }").await;

        assert_eq!(response, json!({"data": {"slow": null}}));
    }

    #[tokio::test]
    async fn root_may_be_null() {
        let document = crate::parse("{ greeting }").unwrap();

        let response = engine()
            .execute(&document, None, &IndexMap::new(), FieldValue::Null)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"data": {"greeting": "Hello, world!"}}),
        );
    }

    #[tokio::test]
    async fn opaque_values_are_read_by_resolvers() {
        struct Account {
            handle: String,
        }

        let schema = SchemaBuilder::from_str("type Query { me: Account } type Account { handle: String id: ID }")
            .unwrap()
            .resolver(
                "Query",
                "me",
                sync_resolver(|_| {
                    Ok(ObjectValue::opaque(Account {
                        handle: "ann".to_string(),
                    })
                    .into())
                }),
            )
            .resolver(
                "Account",
                "handle",
                sync_resolver(|ctx| {
                    let account = ctx
                        .parent()
                        .downcast_ref::<Account>()
                        .ok_or("not an account")?;
                    Ok(FieldValue::from(account.handle.clone()))
                }),
            )
            .build()
            .unwrap();

        let response = execute_json(&Engine::new(schema), "{ me { handle id } }").await;

        assert_eq!(
            response,
            json!({
                "data": {"me": {"handle": "ann", "id": null}},
                "errors": [{
                    "message": "no resolver is bound for field `id` and the parent value has no properties",
                    "locations": [{"line": 1, "column": 15}],
                    "path": ["me", "id"],
                }],
            }),
        );
    }
}

mod arguments {
    use super::*;

    #[tokio::test]
    async fn absent_variable_falls_back_to_argument_default() {
        let query = "query Q($name: String) { greeting(name: $name) }";

        let absent = serde_json::to_value(execute(&engine(), query, json!({})).await).unwrap();
        let null = serde_json::to_value(execute(&engine(), query, json!({"name": null})).await).unwrap();
        let given = serde_json::to_value(execute(&engine(), query, json!({"name": "Di"})).await).unwrap();

        assert_eq!(absent, json!({"data": {"greeting": "Hello, world!"}}));
        assert_eq!(null, json!({"data": {"greeting": "Hello, nobody!"}}));
        assert_eq!(given, json!({"data": {"greeting": "Hello, Di!"}}));
    }

    #[tokio::test]
    async fn variables_are_coerced_to_declared_types() {
        let response = execute(
            &engine(),
            "query Q($values: [ID!]) { ids(values: $values) }",
            json!({"values": 7}),
        )
        .await;

        assert_eq!(serde_json::to_value(response).unwrap(), json!({"data": {"ids": ["7"]}}));
    }

    #[tokio::test]
    async fn missing_required_variable_runs_no_resolver() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let schema = SchemaBuilder::from_str("type Query { user(id: ID!): String }")
            .unwrap()
            .resolver(
                "Query",
                "user",
                sync_resolver(move |_| {
                    counted.fetch_add(1, Ordering::SeqCst);
                    Ok(FieldValue::from("someone"))
                }),
            )
            .build()
            .unwrap();

        let response = execute(
            &Engine::new(schema),
            "query Q($id: ID!) { user(id: $id) }",
            json!({}),
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "data": null,
                "errors": [{
                    "message": "Variable \"$id\" of required type \"ID!\" was not provided.",
                    "locations": [{"line": 1, "column": 9}],
                }],
            }),
        );
    }

    #[tokio::test]
    async fn invalid_variable_value() {
        let response = execute(
            &engine(),
            "query Q($n: Int) { count(n: $n) }",
            json!({"n": "x"}),
        )
        .await;

        assert!(response.data.is_none());
        assert_eq!(
            response.errors[0].message,
            "Variable \"$n\" got invalid value \"x\"; Int cannot represent non-integer value: \"x\"",
        );
    }

    #[tokio::test]
    async fn null_for_non_null_variable() {
        let response = execute(
            &engine(),
            "query Q($id: ID!) { user(id: $id) { name } }",
            json!({"id": null}),
        )
        .await;

        assert!(response.data.is_none());
        assert_eq!(
            response.errors[0].message,
            "Variable \"$id\" of non-null type \"ID!\" must not be null.",
        );
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn resolver_failure_is_a_field_error() {
        let response = execute_json(&engine(), "{ count(n: 3) failing }").await;

        assert_eq!(
            response,
            json!({
                "data": {"count": 3, "failing": null},
                "errors": [{
                    "message": "boom",
                    "locations": [{"line": 1, "column": 15}],
                    "path": ["failing"],
                }],
            }),
        );
    }

    #[tokio::test]
    async fn non_null_field_nulls_nearest_nullable_parent() {
        let response = execute_json(&engine(), "{ user(id: \"3\") { name email } }").await;

        assert_eq!(
            response,
            json!({
                "data": {"user": null},
                "errors": [{
                    "message": "Cannot return null for non-nullable field User.email.",
                    "locations": [{"line": 1, "column": 24}],
                    "path": ["user", "email"],
                }],
            }),
        );
    }

    #[tokio::test]
    async fn null_propagates_to_the_root() {
        let response = execute(&engine(), "{ count(n: 1) required }", json!({})).await;

        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
        assert_eq!(
            response.errors[0].message,
            "Cannot return null for non-nullable field Query.required.",
        );
        assert_eq!(response.errors[0].path_string(), "required");
        assert_eq!(serde_json::to_value(&response).unwrap()["data"], json!(null));
    }

    #[tokio::test]
    async fn nullable_list_elements_fail_independently() {
        let response = execute_json(&engine(), "{ users { name email } }").await;

        assert_eq!(response["data"], json!({"users": [
            {"name": "Ann", "email": "ann@example.com"},
            {"name": "Bo", "email": "bo@example.com"},
            null,
        ]}));
        assert_eq!(response["errors"][0]["path"], json!(["users", 2, "email"]));
    }

    #[tokio::test]
    async fn non_null_list_elements_null_the_list() {
        let response = execute_json(&engine(), "{ strictUsers { name email } }").await;

        assert_eq!(response["data"], json!({"strictUsers": null}));
        assert_eq!(response["errors"][0]["path"], json!(["strictUsers", 2, "email"]));
    }

    #[tokio::test]
    async fn scalar_coercion_failure_in_a_list() {
        let response = execute_json(&engine(), "{ scores }").await;

        assert_eq!(
            response,
            json!({
                "data": {"scores": [1, 2, null]},
                "errors": [{
                    "message": "Int cannot represent non-integer value: \"x\"",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["scores", 2],
                }],
            }),
        );
    }

    #[tokio::test]
    async fn abstract_value_without_type_name() {
        let document = crate::parse("{ widget { id } }").unwrap();
        let root = FieldValue::from(object! { widget: object! { id: "w1" } });

        let response = engine()
            .execute(&document, None, &IndexMap::new(), root)
            .await
            .unwrap();

        assert_eq!(response.data.as_ref().and_then(|data| data.get("widget")), Some(&crate::ResultNode::Null));
        assert!(response.errors[0]
            .message
            .starts_with("Abstract type \"Widget\" must resolve to an Object type at runtime"));
    }

    #[tokio::test]
    async fn abstract_value_with_impossible_type() {
        let document = crate::parse("{ widget { id } }").unwrap();
        let root = FieldValue::from(object! {
            widget: object! { id: "w1" }.with_type_name("User"),
        });

        let response = engine()
            .execute(&document, None, &IndexMap::new(), root)
            .await
            .unwrap();

        assert_eq!(
            response.errors[0].message,
            "Runtime Object type \"User\" is not a possible type for \"Widget\".",
        );
    }

    #[tokio::test]
    async fn validation_errors_prevent_execution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let schema = SchemaBuilder::from_str("type Query { user(id: ID!): User } type User { name: String }")
            .unwrap()
            .resolver(
                "Query",
                "user",
                sync_resolver(move |_| {
                    counted.fetch_add(1, Ordering::SeqCst);
                    Ok(object! { name: "Ann" }.into())
                }),
            )
            .build()
            .unwrap();

        let response = execute(
            &Engine::new(schema),
            "{ user(id: \"1\") { nickname } }",
            json!({}),
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].path_string(), "user.nickname");
    }

    #[tokio::test]
    async fn root_must_be_an_object() {
        let document = crate::parse("{ greeting }").unwrap();

        let response = engine()
            .execute(&document, None, &IndexMap::new(), FieldValue::from(5))
            .await
            .unwrap();

        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "The root value must be an object.");
    }
}

mod operations {
    use super::*;

    const TWO_OPERATIONS: &str = "query A { count(n: 1) } query B { count(n: 2) }";

    #[tokio::test]
    async fn named_operation_is_selected() {
        let document = crate::parse(TWO_OPERATIONS).unwrap();

        let response = engine()
            .execute(&document, Some("B"), &IndexMap::new(), root())
            .await
            .unwrap();

        assert_eq!(serde_json::to_value(response).unwrap(), json!({"data": {"count": 2}}));
    }

    #[tokio::test]
    async fn operation_name_is_required_for_multiple_operations() {
        let response = execute(&engine(), TWO_OPERATIONS, json!({})).await;

        assert!(response.data.is_none());
        assert_eq!(
            response.errors[0].message,
            "Must provide operation name if query contains multiple operations.",
        );
    }

    #[tokio::test]
    async fn unknown_operation_name() {
        let document = crate::parse(TWO_OPERATIONS).unwrap();

        let response = engine()
            .execute(&document, Some("C"), &IndexMap::new(), root())
            .await
            .unwrap();

        assert_eq!(response.errors[0].message, "Unknown operation named \"C\".");
    }

    #[tokio::test]
    async fn invalid_sibling_operation_does_not_block_selected_one() {
        let document = crate::parse(
            "query A { user(id: \"1\") { name } } query B { nope ...Broken } \
             fragment Broken on Nowhere { id }",
        )
        .unwrap();

        let response = engine()
            .execute(&document, Some("A"), &IndexMap::new(), root())
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"data": {"user": {"name": "Ann"}}}),
        );
    }

    #[tokio::test]
    async fn selected_invalid_operation_is_rejected() {
        let document =
            crate::parse("query A { user(id: \"1\") { name } } query B { nope }").unwrap();

        let response = engine()
            .execute(&document, Some("B"), &IndexMap::new(), root())
            .await
            .unwrap();

        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Cannot query field \"nope\" on type \"Query\".");
    }

    #[tokio::test]
    async fn mutation_fields_run_serially_in_document_order() {
        let total = Arc::new(AtomicI64::new(0));
        let resolver_total = Arc::clone(&total);
        let schema = schema_builder()
            .resolver("Mutation", "increment", move |ctx: ResolverContext| {
                let total = Arc::clone(&resolver_total);
                async move {
                    let by = ctx.argument("by").and_then(Value::as_i64).unwrap_or(0);
                    // Earlier fields sleep longer; concurrent execution would
                    // reorder the additions.
                    tokio::time::sleep(Duration::from_millis((10 - by.min(10)) as u64 * 5)).await;
                    ResolverResult::Ok(FieldValue::from(total.fetch_add(by, Ordering::SeqCst) + by))
                }
            })
            .build()
            .unwrap();

        let response = execute(
            &Engine::new(schema),
            "mutation { a: increment(by: 2) b: increment c: increment(by: 5) }",
            json!({}),
        )
        .await;

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"data":{"a":2,"b":3,"c":8}}"#,
        );
    }

    #[tokio::test]
    async fn execute_request_reads_operation_and_variables() {
        let request: Request = serde_json::from_value(json!({
            "query": "query A { count(n: 1) } query B($n: Int) { count(n: $n) }",
            "operationName": "B",
            "variables": {"n": 42},
        }))
        .unwrap();

        let response = engine().execute_request(&request, root()).await.unwrap();

        assert_eq!(serde_json::to_value(response).unwrap(), json!({"data": {"count": 42}}));
    }

    #[tokio::test]
    async fn execute_request_built_in_code() {
        let request = Request::new("query A { count(n: 1) } query B($n: Int) { count(n: $n) }")
            .with_operation_name("B")
            .with_variable("n", 7);

        let response = engine().execute_request(&request, root()).await.unwrap();

        assert_eq!(serde_json::to_value(response).unwrap(), json!({"data": {"count": 7}}));
    }

    #[tokio::test]
    async fn execute_request_reports_parse_errors() {
        let request = Request::new("{ count(n: ");

        let response = engine().execute_request(&request, root()).await.unwrap();

        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].locations.len(), 1);
        assert!(response.errors[0].path.is_empty());
    }

    #[tokio::test]
    async fn max_depth_is_enforced() {
        let engine = engine().with_config(EngineConfig {
            execution: ExecutionOptions {
                max_depth: Some(2),
                ..Default::default()
            },
            ..Default::default()
        });

        let response = execute(&engine, "{ user(id: \"1\") { friends { name } } }", json!({})).await;

        assert!(response.data.is_none());
        assert_eq!(
            response.errors[0].message,
            "Operation has depth 3, which exceeds the maximum depth of 2.",
        );
    }
}

mod concurrency {
    use super::*;

    fn order_recording_engine(log: &Arc<Mutex<Vec<&'static str>>>) -> SchemaBuilder {
        let slow_log = Arc::clone(log);
        let fast_log = Arc::clone(log);
        schema_builder()
            .resolver("Query", "slow", move |_ctx: ResolverContext| {
                let log = Arc::clone(&slow_log);
                async move {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    log.lock().unwrap().push("slow");
                    ResolverResult::Ok(FieldValue::from("slow"))
                }
            })
            .resolver(
                "Query",
                "fast",
                sync_resolver(move |_| {
                    fast_log.lock().unwrap().push("fast");
                    Ok(FieldValue::from("fast"))
                }),
            )
    }

    #[tokio::test]
    async fn siblings_resolve_concurrently() {
        let log = Arc::new(Mutex::new(vec![]));
        let engine = Engine::new(order_recording_engine(&log).build().unwrap());

        let response = execute_json(&engine, "{ slow fast }").await;

        assert_eq!(response, json!({"data": {"slow": "slow", "fast": "fast"}}));
        assert_eq!(*log.lock().unwrap(), vec!["fast", "slow"]);
    }

    #[tokio::test]
    async fn siblings_resolve_in_order_when_not_concurrent() {
        let log = Arc::new(Mutex::new(vec![]));
        let engine = Engine::new(order_recording_engine(&log).build().unwrap()).with_config(
            EngineConfig {
                execution: ExecutionOptions {
                    concurrent_fields: false,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let response = execute_json(&engine, "{ slow fast }").await;

        assert_eq!(response, json!({"data": {"slow": "slow", "fast": "fast"}}));
        assert_eq!(*log.lock().unwrap(), vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn cancellation_abandons_execution() {
        let schema = schema_builder()
            .resolver("Query", "slow", |_ctx: ResolverContext| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                ResolverResult::Ok(FieldValue::from("too late"))
            })
            .build()
            .unwrap();
        let document = crate::parse("{ count(n: 1) slow }").unwrap();
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = Engine::new(schema)
            .execute_with_cancellation(&document, None, &IndexMap::new(), root(), token)
            .await;

        assert_eq!(result, Err(Cancelled));
    }

    #[tokio::test]
    async fn cancelled_token_runs_nothing() {
        let document = crate::parse("{ greeting }").unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = engine()
            .execute_with_cancellation(&document, None, &IndexMap::new(), root(), token)
            .await;

        assert_eq!(result, Err(Cancelled));
    }
}
