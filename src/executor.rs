use std::fmt;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use crate::resolver::{ResolutionError, Resolvers};
use crate::types::definition::TypeRef;
use crate::types::value::Value;
use crate::validator::{FieldSelection, Query, TYPENAME_FIELD};

/// A request-fatal error: the binding table does not cover the query.
#[derive(PartialEq, Debug, Clone, thiserror::Error)]
pub enum ExecutionError {
    #[error("no resolver bound to `{type_name}.{field}`")]
    MissingResolver { type_name: String, field: String },
}

#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct ExecutorOptions {
    /// Resolve sibling fields on the rayon thread pool.
    pub parallel: bool,
}

#[derive(PartialEq, Eq, Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PathSegment::Key(ref key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// An error recorded while resolving one field, with the path of the field
/// in the response.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct FieldError {
    pub message: String,
    pub path: Vec<PathSegment>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResultValue {
    Null,
    Scalar(Value),
    Object(ResultNode),
    List(Vec<ResultValue>),
}

/// Response keys in selection order.
pub type ResultNode = IndexMap<String, ResultValue>;

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Response {
    pub data: Option<ResultNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl Response {
    /// A response for a request rejected before execution: no data, one
    /// error without a path.
    pub fn rejected<S: Into<String>>(message: S) -> Response {
        Response {
            data: None,
            errors: vec![FieldError {
                message: message.into(),
                path: vec![],
            }],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

type Completed = Result<(ResultValue, Vec<FieldError>), ExecutionError>;

pub struct Executor<'a> {
    resolvers: &'a Resolvers,
    options: ExecutorOptions,
}

impl<'a> Executor<'a> {
    pub fn new(resolvers: &'a Resolvers) -> Executor<'a> {
        Executor::with_options(resolvers, ExecutorOptions::default())
    }

    pub fn with_options(resolvers: &'a Resolvers, options: ExecutorOptions) -> Executor<'a> {
        Executor {
            resolvers: resolvers,
            options: options,
        }
    }

    /// Resolves `query` starting from `root`, the parent value of every
    /// root field.
    pub fn execute(&self, query: &Query, root: &Value) -> Result<Response, ExecutionError> {
        debug!(
            "executing {} with {} root selection(s)",
            query.name.as_deref().unwrap_or("anonymous query"),
            query.selections.len()
        );

        let (data, errors) = self.execute_selection_set(&query.root_type, root, &query.selections, &[])?;
        debug!("execution finished with {} recorded error(s)", errors.len());

        Ok(Response {
            data: Some(data),
            errors: errors,
        })
    }

    fn execute_selection_set(
        &self,
        type_name: &str,
        parent: &Value,
        selections: &[FieldSelection],
        path: &[PathSegment],
    ) -> Result<(ResultNode, Vec<FieldError>), ExecutionError> {
        let resolve = |selection: &FieldSelection| self.execute_field(type_name, parent, selection, path);

        let outcomes: Vec<Completed> = match self.options.parallel && selections.len() > 1 {
            true => selections.par_iter().map(resolve).collect(),
            false => selections.iter().map(resolve).collect(),
        };

        let mut node = ResultNode::with_capacity(selections.len());
        let mut errors = vec![];
        for (selection, outcome) in selections.iter().zip(outcomes) {
            let (value, mut field_errors) = outcome?;
            node.insert(selection.response_key.clone(), value);
            errors.append(&mut field_errors);
        }
        Ok((node, errors))
    }

    fn execute_field(
        &self,
        type_name: &str,
        parent: &Value,
        selection: &FieldSelection,
        path: &[PathSegment],
    ) -> Completed {
        let mut field_path = path.to_vec();
        field_path.push(PathSegment::Key(selection.response_key.clone()));
        let field = format!("{}.{}", type_name, selection.field_name);
        trace!("resolving {}", field);

        let resolved = match selection.field_name == TYPENAME_FIELD {
            true => Ok(Value::str(type_name)),
            false => match self.resolvers.get(type_name, &selection.field_name) {
                Some(resolver) => resolver.resolve(parent, &selection.arguments),
                None => {
                    error!("no resolver bound to {}", field);
                    return Err(ExecutionError::MissingResolver {
                        type_name: type_name.to_string(),
                        field: selection.field_name.clone(),
                    });
                }
            },
        };

        let mut errors = vec![];
        let value = match resolved {
            Ok(value) => self.complete_value(&selection.type_ref, &field, selection, value, &field_path, &mut errors)?,
            Err(error) => {
                record(&mut errors, error, &field_path);
                ResultValue::Null
            }
        };
        Ok((value, errors))
    }

    /// Shapes a resolved value according to `type_ref`. Failures are
    /// recorded in `errors` and null out the value being completed.
    fn complete_value(
        &self,
        type_ref: &TypeRef,
        field: &str,
        selection: &FieldSelection,
        value: Value,
        path: &[PathSegment],
        errors: &mut Vec<FieldError>,
    ) -> Result<ResultValue, ExecutionError> {
        if let TypeRef::NonNull(ref of) = *type_ref {
            if value.is_null() {
                record(errors, ResolutionError::NonNullViolation(field.to_string()), path);
                return Ok(ResultValue::Null);
            }
            return self.complete_value(of, field, selection, value, path, errors);
        }

        if value.is_null() {
            return Ok(ResultValue::Null);
        }

        match *type_ref {
            TypeRef::List(ref of) => {
                let items = match value {
                    Value::List(items) => items,
                    other => {
                        record(errors, mismatch(type_ref, &other), path);
                        return Ok(ResultValue::Null);
                    }
                };

                let mut completed = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let mut item_path = path.to_vec();
                    item_path.push(PathSegment::Index(index));
                    completed.push(self.complete_value(of, field, selection, item, &item_path, errors)?);
                }
                Ok(ResultValue::List(completed))
            }
            _ => match (selection.object_type.as_ref(), value) {
                (_, other @ Value::List(_)) | (None, other @ Value::Object(_)) => {
                    record(errors, mismatch(type_ref, &other), path);
                    Ok(ResultValue::Null)
                }
                (Some(_), other) if !matches!(other, Value::Object(_)) => {
                    record(errors, mismatch(type_ref, &other), path);
                    Ok(ResultValue::Null)
                }
                (Some(object_type), parent) => {
                    let (node, mut nested) =
                        self.execute_selection_set(object_type, &parent, &selection.selections, path)?;
                    errors.append(&mut nested);
                    Ok(ResultValue::Object(node))
                }
                (None, scalar) => Ok(ResultValue::Scalar(scalar)),
            },
        }
    }
}

fn mismatch(type_ref: &TypeRef, found: &Value) -> ResolutionError {
    ResolutionError::TypeMismatch {
        expected: format!("a value of type `{}`", type_ref),
        found: found.kind_name().to_string(),
    }
}

fn record(errors: &mut Vec<FieldError>, error: ResolutionError, path: &[PathSegment]) {
    let joined: Vec<String> = path.iter().map(PathSegment::to_string).collect();
    warn!("resolution failed at {}: {}", joined.join("."), error);
    errors.push(FieldError {
        message: error.to_string(),
        path: path.to_vec(),
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::language::lexer::Source;
    use crate::language::parser::{ParseOptions, Parser};
    use crate::resolver::ResolverResult;
    use crate::sample;
    use crate::types::definition::{FieldDefinition, TypeDefinition};
    use crate::types::registry::{Schema, SchemaRegistry};
    use crate::types::value::Arguments;
    use crate::validator::validate;

    fn query(schema: &Schema, text: &str) -> Query {
        let document = Parser::parse(Source::new(text), ParseOptions::new()).unwrap();
        validate(&document, schema).unwrap()
    }

    fn run(schema: &Schema, resolvers: &Resolvers, text: &str, options: ExecutorOptions) -> Result<Response, ExecutionError> {
        Executor::with_options(resolvers, options).execute(&query(schema, text), &Value::Null)
    }

    fn sample_json(text: &str) -> serde_json::Value {
        run(&sample::schema().unwrap(), &sample::resolvers(), text, ExecutorOptions::default())
            .unwrap()
            .to_json().unwrap()
    }

    /// Two object fields and two scalars on the root, one of each failing.
    fn failing_schema() -> (Schema, Resolvers) {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                TypeDefinition::object("Query")
                    .field(FieldDefinition::new("good", TypeRef::named("Thing")))
                    .field(FieldDefinition::new("bad", TypeRef::named("Thing")))
                    .field(FieldDefinition::new("count", TypeRef::named("Int")))
                    .field(FieldDefinition::new("strict", TypeRef::non_null(TypeRef::named("Int"))))
                    .field(FieldDefinition::new("things", "[Thing]".parse().unwrap())),
            )
            .unwrap();
        registry
            .register(TypeDefinition::object("Thing").field(FieldDefinition::new("name", TypeRef::named("String"))))
            .unwrap();
        let schema = registry.validate_closure("Query").unwrap();

        fn good(_: &Value, _: &Arguments) -> ResolverResult {
            Ok(Value::object(vec![("name", Value::str("good"))]))
        }
        fn bad(_: &Value, _: &Arguments) -> ResolverResult {
            Err(ResolutionError::new("thing exploded"))
        }
        fn count(_: &Value, _: &Arguments) -> ResolverResult {
            Ok(Value::list(vec![Value::int(1)]))
        }
        fn strict(_: &Value, _: &Arguments) -> ResolverResult {
            Ok(Value::Null)
        }
        fn things(_: &Value, _: &Arguments) -> ResolverResult {
            Ok(Value::list(vec![
                Value::object(vec![("name", Value::str("first"))]),
                Value::int(7),
                Value::Null,
            ]))
        }

        let mut resolvers = Resolvers::new();
        resolvers
            .bind("Query", "good", good)
            .bind("Query", "bad", bad)
            .bind("Query", "count", count)
            .bind("Query", "strict", strict)
            .bind("Query", "things", things)
            .bind_properties("Thing", &["name"]);
        (schema, resolvers)
    }

    #[test]
    fn it_resolves_the_sample_user() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(
            sample_json("{ user(id: 1) { name } }"),
            serde_json::json!({ "data": { "user": { "name": "John Doe" } } })
        );
    }

    #[test]
    fn it_returns_null_for_a_missing_user() {
        assert_eq!(
            sample_json("{ user(id: 99) { name } }"),
            serde_json::json!({ "data": { "user": null } })
        );
    }

    #[test]
    fn it_keeps_query_order_not_schema_order() {
        let text = "{ users { posts { content title id } age name } hello }";
        for parallel in [false, true] {
            let response = run(&sample::schema().unwrap(), &sample::resolvers(), text, ExecutorOptions { parallel: parallel }).unwrap();
            let data = response.data.unwrap();
            assert_eq!(data.keys().collect::<Vec<_>>(), vec!["users", "hello"]);

            let users = match data["users"] {
                ResultValue::List(ref users) => users,
                ref other => panic!("expected a list, got {:?}", other),
            };
            for user in users {
                match *user {
                    ResultValue::Object(ref user) => {
                        assert_eq!(user.keys().collect::<Vec<_>>(), vec!["posts", "age", "name"])
                    }
                    ref other => panic!("expected an object, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let text = "{ a: user(id: 2) { name posts { title } } users { id } b: username(id: 1) hello }";
        let sequential = run(&sample::schema().unwrap(), &sample::resolvers(), text, ExecutorOptions { parallel: false }).unwrap();
        let parallel = run(&sample::schema().unwrap(), &sample::resolvers(), text, ExecutorOptions { parallel: true }).unwrap();
        assert_eq!(
            serde_json::to_string(&sequential).unwrap(),
            serde_json::to_string(&parallel).unwrap()
        );
    }

    #[test]
    fn repeated_execution_is_identical() {
        let schema = sample::schema().unwrap();
        let resolvers = sample::resolvers();
        let query = query(&schema, "{ users { name posts { title } } }");
        let executor = Executor::new(&resolvers);

        let first = serde_json::to_string(&executor.execute(&query, &Value::Null).unwrap()).unwrap();
        let second = serde_json::to_string(&executor.execute(&query, &Value::Null).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn a_failing_field_does_not_take_its_siblings_down() {
        let (schema, resolvers) = failing_schema();
        let response = run(&schema, &resolvers, "{ good { name } bad { name } }", ExecutorOptions::default()).unwrap();

        assert_eq!(
            response.to_json().unwrap(),
            serde_json::json!({
                "data": { "good": { "name": "good" }, "bad": null },
                "errors": [{ "message": "thing exploded", "path": ["bad"] }]
            })
        );
    }

    #[test]
    fn shape_mismatches_are_recorded() {
        let (schema, resolvers) = failing_schema();
        let response = run(&schema, &resolvers, "{ count strict things { name } }", ExecutorOptions::default()).unwrap();

        assert_eq!(
            response.to_json().unwrap(),
            serde_json::json!({
                "data": {
                    "count": null,
                    "strict": null,
                    "things": [{ "name": "first" }, null, null]
                },
                "errors": [
                    { "message": "expected a value of type `Int`, found list", "path": ["count"] },
                    { "message": "cannot return null for non-null field `Query.strict`", "path": ["strict"] },
                    { "message": "expected a value of type `Thing`, found int", "path": ["things", 1] }
                ]
            })
        );
    }

    #[test]
    fn missing_resolvers_abort_the_request() {
        let (schema, _) = failing_schema();
        let mut resolvers = Resolvers::new();
        resolvers.bind_properties("Thing", &["name"]);
        assert_eq!(
            run(&schema, &resolvers, "{ count }", ExecutorOptions::default()),
            Err(ExecutionError::MissingResolver {
                type_name: "Query".to_string(),
                field: "count".to_string(),
            })
        );
    }

    #[test]
    fn typename_needs_no_resolver() {
        assert_eq!(
            sample_json("{ __typename kind: __typename user(id: 2) { __typename name } }"),
            serde_json::json!({
                "data": {
                    "__typename": "Query",
                    "kind": "Query",
                    "user": { "__typename": "User", "name": "Jane Doe" }
                }
            })
        );
    }

    #[test]
    fn rejected_responses_have_no_data() {
        assert_eq!(
            Response::rejected("Syntax Error: Empty selection set at location 0").to_json().unwrap(),
            serde_json::json!({
                "data": null,
                "errors": [{ "message": "Syntax Error: Empty selection set at location 0", "path": [] }]
            })
        );
    }
}
