use indexmap::IndexMap;

use crate::types::definition::{ScalarKind, TypeDefinition, TypeRef, BUILTIN_SCALARS};
use crate::types::value::Value;

#[derive(PartialEq, Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("type `{0}` is already registered")]
    DuplicateType(String),

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("`{owner}` references unregistered type `{missing}`")]
    DanglingTypeReference { owner: String, missing: String },

    #[error("query root `{0}` must be an object type")]
    InvalidRootType(String),

    #[error("argument `{owner}` must have a scalar type, found `{type_name}`")]
    InvalidArgumentType { owner: String, type_name: String },

    #[error("field `{field}` is defined more than once on type `{type_name}`")]
    DuplicateField { type_name: String, field: String },

    #[error("argument `{owner}` is defined more than once")]
    DuplicateArgument { owner: String },

    #[error("scalar type `{type_name}` cannot have field `{field}`")]
    FieldOnScalar { type_name: String, field: String },

    #[error("default value of argument `{owner}` must be `{expected}`, found {found}")]
    InvalidDefaultValue { owner: String, expected: String, found: String },
}

/// The mutable, pre-closure set of types. Consumed by `validate_closure`,
/// after which no type can be added.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: IndexMap<String, TypeDefinition>,
}

impl Default for SchemaRegistry {
    fn default() -> SchemaRegistry {
        SchemaRegistry::new()
    }
}

impl SchemaRegistry {
    /// A registry holding only the builtin scalars.
    pub fn new() -> SchemaRegistry {
        let types = BUILTIN_SCALARS
            .iter()
            .map(|scalar| (scalar.name().to_string(), TypeDefinition::scalar(scalar.name())))
            .collect();
        SchemaRegistry { types: types }
    }

    pub fn register(&mut self, type_def: TypeDefinition) -> Result<(), SchemaError> {
        if self.types.contains_key(&type_def.name) {
            return Err(SchemaError::DuplicateType(type_def.name));
        }
        type_def.check()?;
        debug!("registering type {}", type_def.name);
        self.types.insert(type_def.name.clone(), type_def);
        Ok(())
    }

    pub fn resolve_type(&self, name: &str) -> Result<&TypeDefinition, SchemaError> {
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Checks that every field and argument points at a registered type and
    /// seals the registry into a `Schema` rooted at `query_type`.
    pub fn validate_closure(self, query_type: &str) -> Result<Schema, SchemaError> {
        let root = self.resolve_type(query_type)?;
        if !root.is_object() {
            return Err(SchemaError::InvalidRootType(query_type.to_string()));
        }

        for type_def in self.types.values() {
            let fields = match type_def.fields() {
                Some(fields) => fields,
                None => continue,
            };

            for field in fields.values() {
                let owner = format!("{}.{}", type_def.name, field.name);
                self.check_reference(&owner, &field.type_ref)?;

                for argument in field.arguments.values() {
                    let owner = format!("{}({}:)", owner, argument.name);
                    self.check_reference(&owner, &argument.type_ref)?;

                    let argument_type = &self.types[argument.type_ref.base_name()];
                    if argument_type.is_object() {
                        return Err(SchemaError::InvalidArgumentType {
                            owner: owner,
                            type_name: argument_type.name.clone(),
                        });
                    }

                    if let Some(ref default) = argument.default_value {
                        if !self.accepts(&argument.type_ref, default) {
                            return Err(SchemaError::InvalidDefaultValue {
                                owner: owner,
                                expected: argument.type_ref.to_string(),
                                found: default.to_string(),
                            });
                        }
                    }
                }
            }
        }

        debug!("schema closed over {} types, rooted at {}", self.types.len(), query_type);
        Ok(Schema {
            query_type: query_type.to_string(),
            types: self.types,
        })
    }

    /// Whether `value` is a valid default for an argument of `type_ref`.
    /// Defaults are used as given, so a list type needs a list value.
    fn accepts(&self, type_ref: &TypeRef, value: &Value) -> bool {
        match (type_ref, value) {
            (&TypeRef::NonNull(_), &Value::Null) => false,
            (&TypeRef::NonNull(ref of), value) => self.accepts(of, value),
            (_, &Value::Null) => true,
            (&TypeRef::List(ref of), &Value::List(ref items)) => items.iter().all(|item| self.accepts(of, item)),
            (&TypeRef::List(_), _) => false,
            (&TypeRef::Named(ref name), value) => {
                match self.types.get(name).and_then(TypeDefinition::scalar_kind) {
                    Some(kind) => scalar_accepts(kind, value),
                    None => false,
                }
            }
        }
    }

    fn check_reference(&self, owner: &str, type_ref: &TypeRef) -> Result<(), SchemaError> {
        let name = type_ref.base_name();
        if self.types.contains_key(name) {
            Ok(())
        } else {
            Err(SchemaError::DanglingTypeReference {
                owner: owner.to_string(),
                missing: name.to_string(),
            })
        }
    }
}

fn scalar_accepts(kind: ScalarKind, value: &Value) -> bool {
    match (kind, value) {
        (ScalarKind::Int, &Value::Int(i)) => i32::try_from(i).is_ok(),
        (ScalarKind::Float, &Value::Int(_)) | (ScalarKind::Float, &Value::Float(_)) => true,
        (ScalarKind::String, &Value::String(_)) => true,
        (ScalarKind::Boolean, &Value::Boolean(_)) => true,
        (ScalarKind::Id, &Value::String(_)) | (ScalarKind::Id, &Value::Int(_)) => true,
        (ScalarKind::Custom, _) => true,
        _ => false,
    }
}

/// A closed, immutable schema. Only `SchemaRegistry::validate_closure` can
/// build one, so every type reference inside it resolves.
#[derive(Debug, Clone)]
pub struct Schema {
    query_type: String,
    types: IndexMap<String, TypeDefinition>,
}

impl Schema {
    pub fn query_type(&self) -> &TypeDefinition {
        &self.types[&self.query_type]
    }

    pub fn resolve_type(&self, name: &str) -> Result<&TypeDefinition, SchemaError> {
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::definition::{ArgumentDefinition, FieldDefinition};

    fn user() -> TypeDefinition {
        TypeDefinition::object("User")
            .field(FieldDefinition::new("id", TypeRef::named("Int")))
            .field(FieldDefinition::new("posts", "[Post]".parse().unwrap()))
    }

    fn post() -> TypeDefinition {
        TypeDefinition::object("Post").field(FieldDefinition::new("title", TypeRef::named("String")))
    }

    fn query() -> TypeDefinition {
        TypeDefinition::object("Query").field(
            FieldDefinition::new("user", TypeRef::named("User"))
                .argument(ArgumentDefinition::new("id", "Int!".parse().unwrap())),
        )
    }

    #[test]
    fn it_rejects_duplicate_types() {
        let mut registry = SchemaRegistry::new();
        registry.register(user()).unwrap();
        assert_eq!(registry.register(user()), Err(SchemaError::DuplicateType("User".to_string())));
        assert_eq!(
            registry.register(TypeDefinition::scalar("Int")),
            Err(SchemaError::DuplicateType("Int".to_string()))
        );
    }

    #[test]
    fn it_resolves_registered_types() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.resolve_type("Boolean").unwrap().name, "Boolean");
        assert_eq!(
            registry.resolve_type("User").err(),
            Some(SchemaError::UnknownType("User".to_string()))
        );
    }

    #[test]
    fn closure_succeeds_when_every_reference_is_registered() {
        let mut registry = SchemaRegistry::new();
        registry.register(query()).unwrap();
        registry.register(user()).unwrap();
        registry.register(post()).unwrap();

        let schema = registry.validate_closure("Query").unwrap();
        assert_eq!(schema.query_type().name, "Query");
        assert!(schema.resolve_type("Post").is_ok());
    }

    #[test]
    fn closure_fails_for_each_missing_type() {
        for missing in ["User", "Post"] {
            let mut registry = SchemaRegistry::new();
            registry.register(query()).unwrap();
            for type_def in vec![user(), post()] {
                if type_def.name != missing {
                    registry.register(type_def).unwrap();
                }
            }

            match registry.validate_closure("Query") {
                Err(SchemaError::DanglingTypeReference { missing: name, .. }) => {
                    assert_eq!(name, missing)
                }
                other => panic!("expected a dangling reference to {}, got {:?}", missing, other),
            }
        }
    }

    #[test]
    fn closure_checks_argument_types() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(TypeDefinition::object("Query").field(
                FieldDefinition::new("echo", TypeRef::named("String"))
                    .argument(ArgumentDefinition::new("at", TypeRef::named("Date"))),
            ))
            .unwrap();
        assert_eq!(
            registry.clone().validate_closure("Query").err(),
            Some(SchemaError::DanglingTypeReference {
                owner: "Query.echo(at:)".to_string(),
                missing: "Date".to_string(),
            })
        );

        registry.register(TypeDefinition::object("Date")).unwrap();
        assert_eq!(
            registry.validate_closure("Query").err(),
            Some(SchemaError::InvalidArgumentType {
                owner: "Query.echo(at:)".to_string(),
                type_name: "Date".to_string(),
            })
        );
    }

    #[test]
    fn registration_rejects_conflicting_definitions() {
        let mut registry = SchemaRegistry::new();
        let user = TypeDefinition::object("User")
            .field(FieldDefinition::new("id", TypeRef::named("Int")))
            .field(FieldDefinition::new("id", TypeRef::named("String")));
        assert_eq!(
            registry.register(user),
            Err(SchemaError::DuplicateField {
                type_name: "User".to_string(),
                field: "id".to_string(),
            })
        );
        assert!(registry.resolve_type("User").is_err());

        let query = TypeDefinition::object("Query").field(
            FieldDefinition::new("user", TypeRef::named("User"))
                .argument(ArgumentDefinition::new("id", TypeRef::named("Int")))
                .argument(ArgumentDefinition::new("id", TypeRef::named("Int"))),
        );
        assert_eq!(
            registry.register(query),
            Err(SchemaError::DuplicateArgument { owner: "Query.user(id:)".to_string() })
        );

        let date = TypeDefinition::scalar("Date").field(FieldDefinition::new("year", TypeRef::named("Int")));
        assert_eq!(
            registry.register(date),
            Err(SchemaError::FieldOnScalar {
                type_name: "Date".to_string(),
                field: "year".to_string(),
            })
        );
    }

    #[test]
    fn closure_checks_default_values() {
        let close = |argument: ArgumentDefinition| {
            let mut registry = SchemaRegistry::new();
            registry
                .register(TypeDefinition::object("Query").field(
                    FieldDefinition::new("echo", TypeRef::named("String")).argument(argument),
                ))
                .unwrap();
            registry.validate_closure("Query").err()
        };
        let int = || TypeRef::non_null(TypeRef::named("Int"));

        assert_eq!(close(ArgumentDefinition::new("at", int()).with_default(Value::int(1))), None);
        assert_eq!(
            close(ArgumentDefinition::new("at", int()).with_default(Value::str("one"))),
            Some(SchemaError::InvalidDefaultValue {
                owner: "Query.echo(at:)".to_string(),
                expected: "Int!".to_string(),
                found: "\"one\"".to_string(),
            })
        );
        assert!(close(ArgumentDefinition::new("at", int()).with_default(Value::Null)).is_some());
        assert!(close(ArgumentDefinition::new("at", int()).with_default(Value::int(1 << 40))).is_some());

        let ids = || "[ID!]".parse::<TypeRef>().unwrap();
        assert_eq!(
            close(ArgumentDefinition::new("at", ids()).with_default(Value::list(vec![Value::int(1), Value::str("2")]))),
            None
        );
        assert!(close(ArgumentDefinition::new("at", ids()).with_default(Value::int(1))).is_some());
        assert_eq!(close(ArgumentDefinition::new("at", TypeRef::named("Float")).with_default(Value::int(2))), None);
    }

    #[test]
    fn closure_requires_an_object_root() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.clone().validate_closure("Query").err(),
            Some(SchemaError::UnknownType("Query".to_string()))
        );
        assert_eq!(
            registry.validate_closure("Int").err(),
            Some(SchemaError::InvalidRootType("Int".to_string()))
        );
    }
}
