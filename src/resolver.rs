use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::types::registry::Schema;
use crate::types::value::{Arguments, Value};

/// Why a single field could not be resolved. Recorded against the field's
/// path in the response; siblings still resolve.
#[derive(PartialEq, Debug, Clone, thiserror::Error)]
pub enum ResolutionError {
    #[error("{0}")]
    Failed(String),

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("cannot return null for non-null field `{0}`")]
    NonNullViolation(String),
}

impl ResolutionError {
    pub fn new<S: Into<String>>(message: S) -> ResolutionError {
        ResolutionError::Failed(message.into())
    }
}

pub type ResolverResult = Result<Value, ResolutionError>;

/// Produces the value of one field from its parent value and the coerced
/// arguments of the selection.
pub trait Resolver: Send + Sync {
    fn resolve(&self, parent: &Value, arguments: &Arguments) -> ResolverResult;
}

impl<F> Resolver for F
where
    F: Fn(&Value, &Arguments) -> ResolverResult + Send + Sync,
{
    fn resolve(&self, parent: &Value, arguments: &Arguments) -> ResolverResult {
        self(parent, arguments)
    }
}

/// Reads a property of the parent object. A parent without the property
/// resolves to null.
#[derive(Debug, Clone)]
pub struct Property(pub String);

impl Resolver for Property {
    fn resolve(&self, parent: &Value, _arguments: &Arguments) -> ResolverResult {
        match *parent {
            Value::Object(ref fields) => Ok(fields.get(&self.0).cloned().unwrap_or(Value::Null)),
            Value::Null => Ok(Value::Null),
            ref other => Err(ResolutionError::TypeMismatch {
                expected: format!("an object with property `{}`", self.0),
                found: other.kind_name().to_string(),
            }),
        }
    }
}

/// The binding table from (type, field) to resolver. Built once at startup
/// and shared read-only by every request.
#[derive(Default, Clone)]
pub struct Resolvers {
    types: HashMap<String, HashMap<String, Arc<dyn Resolver>>>,
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut bound: Vec<String> = self
            .types
            .iter()
            .flat_map(|(type_name, fields)| fields.keys().map(move |field| format!("{}.{}", type_name, field)))
            .collect();
        bound.sort();
        f.debug_struct("Resolvers").field("bound", &bound).finish()
    }
}

impl Resolvers {
    pub fn new() -> Resolvers {
        Resolvers::default()
    }

    /// Binds `resolver` to `type_name.field_name`, replacing an earlier
    /// binding.
    pub fn bind<R: Resolver + 'static>(&mut self, type_name: &str, field_name: &str, resolver: R) -> &mut Resolvers {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .insert(field_name.to_string(), Arc::new(resolver));
        self
    }

    /// Binds each of `field_names` on `type_name` to a `Property` resolver
    /// reading the same-named property of the parent.
    pub fn bind_properties(&mut self, type_name: &str, field_names: &[&str]) -> &mut Resolvers {
        for field_name in field_names {
            self.bind(type_name, field_name, Property(field_name.to_string()));
        }
        self
    }

    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&dyn Resolver> {
        self.types
            .get(type_name)
            .and_then(|fields| fields.get(field_name))
            .map(|resolver| resolver.as_ref())
    }

    /// Every `Type.field` of `schema` that has no resolver, in schema order.
    pub fn unbound_fields(&self, schema: &Schema) -> Vec<String> {
        schema
            .types()
            .filter_map(|type_def| type_def.fields().map(|fields| (type_def, fields)))
            .flat_map(|(type_def, fields)| {
                fields
                    .keys()
                    .filter(move |field| self.get(&type_def.name, field).is_none())
                    .map(move |field| format!("{}.{}", type_def.name, field))
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sample;

    #[test]
    fn closures_are_resolvers() {
        let mut resolvers = Resolvers::new();
        resolvers.bind("Query", "hello", |_: &Value, _: &Arguments| -> ResolverResult {
            Ok(Value::str("Hello, world!"))
        });

        let hello = resolvers.get("Query", "hello").unwrap();
        assert_eq!(hello.resolve(&Value::Null, &Arguments::new()), Ok(Value::str("Hello, world!")));
        assert!(resolvers.get("Query", "users").is_none());
    }

    #[test]
    fn properties_read_the_parent() {
        let parent = Value::object(vec![("name", Value::str("Jane Doe"))]);
        let args = Arguments::new();
        assert_eq!(Property("name".to_string()).resolve(&parent, &args), Ok(Value::str("Jane Doe")));
        assert_eq!(Property("age".to_string()).resolve(&parent, &args), Ok(Value::Null));
        assert_eq!(Property("age".to_string()).resolve(&Value::Null, &args), Ok(Value::Null));
        assert!(Property("age".to_string()).resolve(&Value::int(1), &args).is_err());
    }

    #[test]
    fn it_reports_unbound_fields() {
        let schema = sample::schema().unwrap();
        assert_eq!(sample::resolvers().unbound_fields(&schema), Vec::<String>::new());

        let mut partial = Resolvers::new();
        partial.bind_properties("Post", &["id", "title", "content"]);
        let unbound = partial.unbound_fields(&schema);
        assert!(unbound.contains(&"Query.user".to_string()));
        assert!(unbound.contains(&"User.posts".to_string()));
        assert!(!unbound.iter().any(|field| field.starts_with("Post.")));
    }
}
