//! Static validation of a parsed document against a closed `Schema`.
//!
//! Validation checks every selection against the field definitions of the
//! type it is made on and coerces argument literals (and variable values) to
//! the declared argument types. Its output, a `Query`, is everything the
//! executor needs: the executor never looks at the AST or the schema.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::language::ast::{self, Document, OperationDefinition, SelectionSet};
use crate::types::definition::{FieldDefinition, ScalarKind, TypeDefinition, TypeRef};
use crate::types::registry::{Schema, SchemaError};
use crate::types::value::{Arguments, Value};

/// The implicit field every object type answers with its own name.
pub const TYPENAME_FIELD: &str = "__typename";

/// Variable values supplied alongside a query, as decoded JSON.
pub type Variables = serde_json::Map<String, serde_json::Value>;

#[derive(PartialEq, Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown operation named `{0}`")]
    UnknownOperation(String),

    #[error("document holds several operations, an operation name is required")]
    AmbiguousOperation,

    #[error("cannot query field `{field}` on type `{type_name}`")]
    UnknownField { type_name: String, field: String },

    #[error("unknown argument `{argument}` on field `{field}`")]
    UnknownArgument { field: String, argument: String },

    #[error("argument `{argument}` given more than once to field `{field}`")]
    DuplicateArgument { field: String, argument: String },

    #[error("argument `{argument}` expects {expected}, found {found}")]
    ArgumentType { argument: String, expected: String, found: String },

    #[error("field `{field}` requires argument `{argument}`")]
    MissingRequiredArgument { field: String, argument: String },

    #[error("invalid selection on field `{field}`: {reason}")]
    InvalidSelection { field: String, reason: String },

    #[error("variable `${0}` is not defined")]
    UndefinedVariable(String),

    #[error("variable `${0}` is defined more than once")]
    DuplicateVariable(String),

    #[error("variable `${variable}` {reason}")]
    VariableType { variable: String, reason: String },

    #[error("variable `${0}` of non-null type has no value")]
    MissingVariable(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A validated query: the selections to execute against the query root.
#[derive(PartialEq, Debug, Clone)]
pub struct Query {
    pub name: Option<String>,
    /// The object type the root selections are made on.
    pub root_type: String,
    pub selections: Vec<FieldSelection>,
}

/// One validated field selection.
#[derive(PartialEq, Debug, Clone)]
pub struct FieldSelection {
    /// Alias if one was given, otherwise the field name.
    pub response_key: String,
    pub field_name: String,
    pub arguments: Arguments,
    pub type_ref: TypeRef,
    /// Name of the object type the field's values are, `None` for scalars.
    pub object_type: Option<String>,
    pub selections: Vec<FieldSelection>,
}

pub fn validate(document: &Document, schema: &Schema) -> Result<Query, ValidationError> {
    validate_with_variables(document, schema, None, &Variables::new())
}

/// Validates the operation named `operation_name` (or the document's only
/// operation), coercing `variables` to the types the operation declares.
pub fn validate_with_variables(
    document: &Document,
    schema: &Schema,
    operation_name: Option<&str>,
    variables: &Variables,
) -> Result<Query, ValidationError> {
    let operation = match document.operation(operation_name) {
        Some(operation) => operation,
        None => {
            return Err(match operation_name {
                Some(name) => ValidationError::UnknownOperation(name.to_string()),
                None => ValidationError::AmbiguousOperation,
            })
        }
    };

    let mut validator = Validator {
        schema: schema,
        variable_types: IndexMap::new(),
        variable_values: IndexMap::new(),
    };
    validator.coerce_variables(operation, variables)?;

    let selections = validator.validate_selection_set(schema.query_type(), &operation.selection_set)?;
    debug!("validated {} root selection(s)", selections.len());

    Ok(Query {
        name: operation.name.as_ref().map(|name| name.value.clone()),
        root_type: schema.query_type().name.clone(),
        selections: selections,
    })
}

struct Validator<'a> {
    schema: &'a Schema,
    variable_types: IndexMap<String, (TypeRef, bool)>,
    /// Coerced values of the variables that have one. A variable missing
    /// here was neither supplied nor defaulted.
    variable_values: IndexMap<String, Value>,
}

impl<'a> Validator<'a> {
    fn coerce_variables(
        &mut self,
        operation: &OperationDefinition,
        variables: &Variables,
    ) -> Result<(), ValidationError> {
        for definition in &operation.variable_definitions {
            let name = definition.variable.value.clone();
            if self.variable_types.contains_key(&name) {
                return Err(ValidationError::DuplicateVariable(name));
            }

            let base = self.schema.resolve_type(definition.type_ref.base_name())?;
            if base.is_object() {
                return Err(ValidationError::VariableType {
                    variable: name,
                    reason: format!("cannot have object type `{}`", base.name),
                });
            }

            let value = match (variables.get(&name), definition.default_value.as_ref()) {
                (Some(json), _) => Some(self.coerce_input(json, &definition.type_ref, &name)?),
                (None, Some(default)) => Some(self.coerce_literal(default, &definition.type_ref, &name)?),
                (None, None) if definition.type_ref.is_non_null() => {
                    return Err(ValidationError::MissingVariable(name));
                }
                (None, None) => None,
            };

            let has_default = definition.default_value.is_some();
            self.variable_types.insert(name.clone(), (definition.type_ref.clone(), has_default));
            if let Some(value) = value {
                self.variable_values.insert(name, value);
            }
        }
        Ok(())
    }

    fn validate_selection_set(
        &self,
        parent: &TypeDefinition,
        selection_set: &SelectionSet,
    ) -> Result<Vec<FieldSelection>, ValidationError> {
        let mut selections = vec![];
        for selection in &selection_set.selections {
            let validated = self.validate_selection(parent, selection)?;
            merge_selection(&mut selections, validated)?;
        }
        Ok(selections)
    }

    fn validate_selection(
        &self,
        parent: &TypeDefinition,
        selection: &ast::Selection,
    ) -> Result<FieldSelection, ValidationError> {
        let field_name = selection.name.value.as_str();
        let qualified = format!("{}.{}", parent.name, field_name);

        if field_name == TYPENAME_FIELD {
            return self.validate_typename(selection, qualified);
        }

        let field = parent.get_field(field_name).ok_or_else(|| ValidationError::UnknownField {
            type_name: parent.name.clone(),
            field: field_name.to_string(),
        })?;

        let arguments = self.coerce_arguments(field, &qualified, &selection.arguments)?;
        let field_type = self.schema.resolve_type(field.type_ref.base_name())?;

        let selections = match (field_type.is_object(), selection.selection_set.as_ref()) {
            (true, Some(selection_set)) => self.validate_selection_set(field_type, selection_set)?,
            (true, None) => {
                return Err(ValidationError::InvalidSelection {
                    field: qualified,
                    reason: format!("type `{}` must have a selection of subfields", field.type_ref),
                });
            }
            (false, Some(_)) => {
                return Err(ValidationError::InvalidSelection {
                    field: qualified,
                    reason: format!("scalar type `{}` cannot have a selection of subfields", field.type_ref),
                });
            }
            (false, None) => vec![],
        };

        Ok(FieldSelection {
            response_key: selection.response_key().to_string(),
            field_name: field_name.to_string(),
            arguments: arguments,
            type_ref: field.type_ref.clone(),
            object_type: match field_type.is_object() {
                true => Some(field_type.name.clone()),
                false => None,
            },
            selections: selections,
        })
    }

    fn validate_typename(
        &self,
        selection: &ast::Selection,
        qualified: String,
    ) -> Result<FieldSelection, ValidationError> {
        if let Some(argument) = selection.arguments.first() {
            return Err(ValidationError::UnknownArgument {
                field: qualified,
                argument: argument.name.value.clone(),
            });
        }
        if selection.selection_set.is_some() {
            return Err(ValidationError::InvalidSelection {
                field: qualified,
                reason: "scalar type `String!` cannot have a selection of subfields".to_string(),
            });
        }

        Ok(FieldSelection {
            response_key: selection.response_key().to_string(),
            field_name: TYPENAME_FIELD.to_string(),
            arguments: Arguments::new(),
            type_ref: TypeRef::non_null(TypeRef::named("String")),
            object_type: None,
            selections: vec![],
        })
    }

    fn coerce_arguments(
        &self,
        field: &FieldDefinition,
        qualified: &str,
        supplied: &[ast::Argument],
    ) -> Result<Arguments, ValidationError> {
        let mut seen = HashSet::new();
        for argument in supplied {
            let name = argument.name.value.as_str();
            if !field.arguments.contains_key(name) {
                return Err(ValidationError::UnknownArgument {
                    field: qualified.to_string(),
                    argument: name.to_string(),
                });
            }
            if !seen.insert(name) {
                return Err(ValidationError::DuplicateArgument {
                    field: qualified.to_string(),
                    argument: name.to_string(),
                });
            }
        }

        let mut arguments = Arguments::new();
        for definition in field.arguments.values() {
            let literal = supplied
                .iter()
                .find(|argument| argument.name.value == definition.name)
                .map(|argument| &argument.value);

            let value = match literal {
                Some(&ast::Value::VariableValue { ref name, .. }) => {
                    self.variable(&name.value, &definition.type_ref)?.cloned()
                }
                Some(literal) => Some(self.coerce_literal(literal, &definition.type_ref, &definition.name)?),
                None => None,
            };

            match value.or_else(|| definition.default_value.clone()) {
                Some(value) => arguments.insert(&definition.name, value),
                None if definition.is_required() => {
                    return Err(ValidationError::MissingRequiredArgument {
                        field: qualified.to_string(),
                        argument: definition.name.clone(),
                    });
                }
                None => {}
            }
        }
        Ok(arguments)
    }

    /// The value of a variable used where `expected` is required, `None`
    /// when the variable has no value.
    fn variable(&self, name: &str, expected: &TypeRef) -> Result<Option<&Value>, ValidationError> {
        let &(ref declared, has_default) = self
            .variable_types
            .get(name)
            .ok_or_else(|| ValidationError::UndefinedVariable(name.to_string()))?;

        let allowed = match (expected, declared) {
            (&TypeRef::NonNull(ref of), declared) if !declared.is_non_null() && has_default => {
                is_assignable(declared, of)
            }
            (expected, declared) => is_assignable(declared, expected),
        };
        if !allowed {
            return Err(ValidationError::VariableType {
                variable: name.to_string(),
                reason: format!("of type `{}` cannot be used where `{}` is expected", declared, expected),
            });
        }

        let value = self.variable_values.get(name);
        if expected.is_non_null() && value.map_or(false, Value::is_null) {
            return Err(ValidationError::VariableType {
                variable: name.to_string(),
                reason: format!("is null where `{}` is expected", expected),
            });
        }
        Ok(value)
    }

    fn coerce_literal(
        &self,
        literal: &ast::Value,
        expected: &TypeRef,
        argument: &str,
    ) -> Result<Value, ValidationError> {
        if let ast::Value::VariableValue { ref name, .. } = *literal {
            return Ok(self.variable(&name.value, expected)?.cloned().unwrap_or(Value::Null));
        }

        let mismatch = || ValidationError::ArgumentType {
            argument: argument.to_string(),
            expected: expected.to_string(),
            found: literal.describe(),
        };

        match *expected {
            TypeRef::NonNull(ref of) => match *literal {
                ast::Value::NullValue { .. } => Err(mismatch()),
                _ => self.coerce_literal(literal, of, argument),
            },
            TypeRef::List(ref of) => match *literal {
                ast::Value::NullValue { .. } => Ok(Value::Null),
                ast::Value::ListValue { ref values, .. } => values
                    .iter()
                    .map(|value| self.coerce_literal(value, of, argument))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                _ => Ok(Value::List(vec![self.coerce_literal(literal, of, argument)?])),
            },
            TypeRef::Named(ref name) => match *literal {
                ast::Value::NullValue { .. } => Ok(Value::Null),
                _ => {
                    let kind = self.schema.resolve_type(name)?.scalar_kind().unwrap_or(ScalarKind::Custom);
                    coerce_scalar_literal(literal, kind).ok_or_else(mismatch)
                }
            },
        }
    }

    /// Coerces a JSON variable value, the same way `coerce_literal` coerces
    /// a literal written in the query.
    fn coerce_input(
        &self,
        json: &serde_json::Value,
        expected: &TypeRef,
        variable: &str,
    ) -> Result<Value, ValidationError> {
        let mismatch = || ValidationError::ArgumentType {
            argument: format!("${}", variable),
            expected: expected.to_string(),
            found: json.to_string(),
        };

        match *expected {
            TypeRef::NonNull(ref of) => match *json {
                serde_json::Value::Null => Err(mismatch()),
                _ => self.coerce_input(json, of, variable),
            },
            TypeRef::List(ref of) => match *json {
                serde_json::Value::Null => Ok(Value::Null),
                serde_json::Value::Array(ref values) => values
                    .iter()
                    .map(|value| self.coerce_input(value, of, variable))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                _ => Ok(Value::List(vec![self.coerce_input(json, of, variable)?])),
            },
            TypeRef::Named(ref name) => match *json {
                serde_json::Value::Null => Ok(Value::Null),
                _ => {
                    let kind = self.schema.resolve_type(name)?.scalar_kind().unwrap_or(ScalarKind::Custom);
                    coerce_scalar_input(json, kind).ok_or_else(mismatch)
                }
            },
        }
    }
}

/// Whether a variable of type `declared` may be used where `expected` is.
fn is_assignable(declared: &TypeRef, expected: &TypeRef) -> bool {
    match (declared, expected) {
        (&TypeRef::NonNull(ref declared), &TypeRef::NonNull(ref expected)) => is_assignable(declared, expected),
        (_, &TypeRef::NonNull(_)) => false,
        (&TypeRef::NonNull(ref declared), expected) => is_assignable(declared, expected),
        (&TypeRef::List(ref declared), &TypeRef::List(ref expected)) => is_assignable(declared, expected),
        (&TypeRef::Named(ref declared), &TypeRef::Named(ref expected)) => declared == expected,
        _ => false,
    }
}

/// Parses an Int literal: base 10, an optional minus sign, no leading zeros
/// other than `0` itself, within 32 bits.
fn parse_int_literal(literal: &str) -> Option<i64> {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    match well_formed {
        true => literal.parse::<i32>().ok().map(i64::from),
        false => None,
    }
}

fn coerce_scalar_literal(literal: &ast::Value, kind: ScalarKind) -> Option<Value> {
    match (kind, literal) {
        (ScalarKind::Int, &ast::Value::IntValue { ref value, .. }) => parse_int_literal(value).map(Value::Int),
        (ScalarKind::Float, &ast::Value::IntValue { ref value, .. })
        | (ScalarKind::Float, &ast::Value::FloatValue { ref value, .. }) => {
            value.parse::<f64>().ok().filter(|f| f.is_finite()).map(Value::Float)
        }
        (ScalarKind::String, &ast::Value::StringValue { ref value, .. }) => Some(Value::str(value)),
        (ScalarKind::Boolean, &ast::Value::BooleanValue { value, .. }) => Some(Value::Boolean(value)),
        (ScalarKind::Id, &ast::Value::StringValue { ref value, .. }) => Some(Value::str(value)),
        (ScalarKind::Id, &ast::Value::IntValue { ref value, .. }) => {
            parse_int_literal(value).map(|_| Value::str(value))
        }
        (ScalarKind::Custom, &ast::Value::IntValue { ref value, .. }) => value.parse::<i64>().ok().map(Value::Int),
        (ScalarKind::Custom, &ast::Value::FloatValue { ref value, .. }) => value.parse::<f64>().ok().map(Value::Float),
        (ScalarKind::Custom, &ast::Value::StringValue { ref value, .. }) => Some(Value::str(value)),
        (ScalarKind::Custom, &ast::Value::BooleanValue { value, .. }) => Some(Value::Boolean(value)),
        _ => None,
    }
}

fn coerce_scalar_input(json: &serde_json::Value, kind: ScalarKind) -> Option<Value> {
    use serde_json::Value as Json;

    match (kind, json) {
        (ScalarKind::Int, &Json::Number(ref n)) => n
            .as_i64()
            .filter(|i| i32::try_from(*i).is_ok())
            .map(Value::Int),
        (ScalarKind::Float, &Json::Number(ref n)) => n.as_f64().map(Value::Float),
        (ScalarKind::String, &Json::String(ref s)) => Some(Value::str(s)),
        (ScalarKind::Boolean, &Json::Bool(b)) => Some(Value::Boolean(b)),
        (ScalarKind::Id, &Json::String(ref s)) => Some(Value::str(s)),
        (ScalarKind::Id, &Json::Number(ref n)) => n.as_i64().map(|i| Value::string(i.to_string())),
        (ScalarKind::Custom, json) => Some(Value::from(json.clone())),
        _ => None,
    }
}

/// Adds `selection` to `selections`, merging it into an earlier selection
/// with the same response key. Two selections may share a key only when they
/// ask for the same field with the same arguments.
fn merge_selection(
    selections: &mut Vec<FieldSelection>,
    selection: FieldSelection,
) -> Result<(), ValidationError> {
    let existing = match selections.iter_mut().find(|s| s.response_key == selection.response_key) {
        Some(existing) => existing,
        None => {
            selections.push(selection);
            return Ok(());
        }
    };

    if existing.field_name != selection.field_name || existing.arguments != selection.arguments {
        return Err(ValidationError::InvalidSelection {
            field: selection.response_key.clone(),
            reason: format!(
                "`{}` conflicts with an earlier selection under the same response key",
                selection.field_name
            ),
        });
    }

    for child in selection.selections {
        merge_selection(&mut existing.selections, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::language::lexer::Source;
    use crate::language::parser::{ParseOptions, Parser};
    use crate::sample;

    fn check(query: &str) -> Result<Query, ValidationError> {
        let document = Parser::parse(Source::new(query), ParseOptions::new()).unwrap();
        validate(&document, &sample::schema().unwrap())
    }

    fn check_with(query: &str, variables: serde_json::Value) -> Result<Query, ValidationError> {
        let document = Parser::parse(Source::new(query), ParseOptions::new()).unwrap();
        let variables = match variables {
            serde_json::Value::Object(map) => map,
            _ => Variables::new(),
        };
        validate_with_variables(&document, &sample::schema().unwrap(), None, &variables)
    }

    #[test]
    fn it_builds_the_selection_tree() {
        let query = check("{ user(id: 1) { name posts { title } } hello }").unwrap();
        assert_eq!(query.selections.len(), 2);

        let user = &query.selections[0];
        assert_eq!(user.field_name, "user");
        assert_eq!(user.arguments.get_int("id"), Some(1));
        assert_eq!(user.object_type, Some("User".to_string()));
        assert_eq!(user.selections[1].type_ref, "[Post]".parse().unwrap());
        assert_eq!(user.selections[1].selections[0].field_name, "title");
        assert_eq!(query.selections[1].object_type, None);
    }

    #[test]
    fn it_rejects_unknown_fields() {
        assert_eq!(
            check("{ user(id: 1) { email } }"),
            Err(ValidationError::UnknownField {
                type_name: "User".to_string(),
                field: "email".to_string(),
            })
        );
    }

    #[test]
    fn it_coerces_int_arguments() {
        assert!(check("{ user(id: 7) { name } }").is_ok());
        assert!(check("{ user(id: 0) { name } }").is_ok());
        assert!(check("{ user(id: -3) { name } }").is_ok());

        for literal in &["\"7\"", "007", "7.0", "true", "2147483648", "[1, 2]"] {
            match check(&format!("{{ user(id: {}) {{ name }} }}", literal)) {
                Err(ValidationError::ArgumentType { ref argument, ref expected, .. }) => {
                    assert_eq!(argument, "id");
                    assert_eq!(expected, "Int");
                }
                other => panic!("{} should not coerce to Int, got {:?}", literal, other),
            }
        }
    }

    #[test]
    fn it_requires_non_null_arguments() {
        assert_eq!(
            check("{ user { name } }"),
            Err(ValidationError::MissingRequiredArgument {
                field: "Query.user".to_string(),
                argument: "id".to_string(),
            })
        );
        assert_eq!(
            check("{ user(id: null) { name } }"),
            Err(ValidationError::ArgumentType {
                argument: "id".to_string(),
                expected: "Int!".to_string(),
                found: "null".to_string(),
            })
        );
    }

    #[test]
    fn it_rejects_unknown_and_repeated_arguments() {
        assert_eq!(
            check("{ user(id: 1, name: \"x\") { name } }"),
            Err(ValidationError::UnknownArgument {
                field: "Query.user".to_string(),
                argument: "name".to_string(),
            })
        );
        assert_eq!(
            check("{ user(id: 1, id: 2) { name } }"),
            Err(ValidationError::DuplicateArgument {
                field: "Query.user".to_string(),
                argument: "id".to_string(),
            })
        );
    }

    #[test]
    fn it_checks_selection_shape() {
        match check("{ hello { length } }") {
            Err(ValidationError::InvalidSelection { ref field, .. }) => assert_eq!(field, "Query.hello"),
            other => panic!("expected invalid selection, got {:?}", other),
        }
        match check("{ users }") {
            Err(ValidationError::InvalidSelection { ref field, ref reason }) => {
                assert_eq!(field, "Query.users");
                assert_eq!(reason, "type `[User]` must have a selection of subfields");
            }
            other => panic!("expected invalid selection, got {:?}", other),
        }
    }

    #[test]
    fn it_merges_identical_selections_and_rejects_conflicts() {
        let query = check("{ user(id: 1) { name } user(id: 1) { age } }").unwrap();
        assert_eq!(query.selections.len(), 1);
        let keys: Vec<&str> = query.selections[0].selections.iter().map(|s| s.response_key.as_str()).collect();
        assert_eq!(keys, vec!["name", "age"]);

        assert!(check("{ a: user(id: 1) { name } b: user(id: 2) { name } }").is_ok());
        match check("{ user(id: 1) { name } user(id: 2) { name } }") {
            Err(ValidationError::InvalidSelection { ref field, .. }) => assert_eq!(field, "user"),
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn it_accepts_typename_anywhere() {
        let query = check("{ __typename user(id: 1) { __typename } }").unwrap();
        assert_eq!(query.selections[0].field_name, TYPENAME_FIELD);
        assert!(check("{ __typename(x: 1) }").is_err());
    }

    #[test]
    fn it_coerces_variables() {
        let query = check_with("query ($id: Int!) { user(id: $id) { name } }", serde_json::json!({ "id": 2 })).unwrap();
        assert_eq!(query.selections[0].arguments.get_int("id"), Some(2));

        assert_eq!(
            check_with("query ($id: Int!) { user(id: $id) { name } }", serde_json::json!({})),
            Err(ValidationError::MissingVariable("id".to_string()))
        );
        assert_eq!(
            check_with("query ($id: Int!) { user(id: $id) { name } }", serde_json::json!({ "id": "2" })),
            Err(ValidationError::ArgumentType {
                argument: "$id".to_string(),
                expected: "Int".to_string(),
                found: "\"2\"".to_string(),
            })
        );
        assert_eq!(
            check_with("{ user(id: $id) { name } }", serde_json::json!({ "id": 2 })),
            Err(ValidationError::UndefinedVariable("id".to_string()))
        );
    }

    #[test]
    fn it_checks_variable_positions() {
        let query = check_with("query ($id: Int = 1) { user(id: $id) { name } }", serde_json::json!({})).unwrap();
        assert_eq!(query.selections[0].arguments.get_int("id"), Some(1));

        match check_with("query ($id: Int) { user(id: $id) { name } }", serde_json::json!({ "id": 1 })) {
            Err(ValidationError::VariableType { ref variable, .. }) => assert_eq!(variable, "id"),
            other => panic!("expected a variable type error, got {:?}", other),
        }
        match check_with("query ($id: String!) { user(id: $id) { name } }", serde_json::json!({ "id": "1" })) {
            Err(ValidationError::VariableType { ref variable, .. }) => assert_eq!(variable, "id"),
            other => panic!("expected a variable type error, got {:?}", other),
        }
        assert_eq!(
            check_with("query ($id: Int = 1) { user(id: $id) { name } }", serde_json::json!({ "id": null })),
            Err(ValidationError::VariableType {
                variable: "id".to_string(),
                reason: "is null where `Int!` is expected".to_string(),
            })
        );
    }

    #[test]
    fn it_selects_operations_by_name() {
        let document = Parser::parse(
            Source::new("query A { hello } query B { users { name } }"),
            ParseOptions::new(),
        )
        .unwrap();
        let schema = sample::schema().unwrap();

        assert_eq!(
            validate(&document, &schema),
            Err(ValidationError::AmbiguousOperation)
        );
        let query = validate_with_variables(&document, &schema, Some("B"), &Variables::new()).unwrap();
        assert_eq!(query.name, Some("B".to_string()));
        assert_eq!(
            validate_with_variables(&document, &schema, Some("C"), &Variables::new()),
            Err(ValidationError::UnknownOperation("C".to_string()))
        );
    }

    #[test]
    fn int_literals_follow_base_ten_rules() {
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("-0"), Some(0));
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("-2147483648"), Some(-2147483648));
        assert_eq!(parse_int_literal("01"), None);
        assert_eq!(parse_int_literal("-"), None);
        assert_eq!(parse_int_literal("1e3"), None);
    }
}
