//! The users and posts demo dataset, its schema and resolver bindings.
//!
//! ```text
//! type Query {
//!   hello: String
//!   user(id: Int!): User
//!   users: [User]
//!   username(id: Int!): String
//! }
//!
//! type User {
//!   id: Int
//!   name: String
//!   age: Int
//!   posts: [Post]
//! }
//!
//! type Post {
//!   id: Int
//!   title: String
//!   content: String
//! }
//! ```

use crate::resolver::{ResolutionError, ResolverResult, Resolvers};
use crate::types::definition::{ArgumentDefinition, FieldDefinition, TypeDefinition, TypeRef};
use crate::types::registry::{Schema, SchemaError, SchemaRegistry};
use crate::types::value::{Arguments, Value};

fn post(id: i64, title: &str, content: &str) -> Value {
    Value::object(vec![
        ("id", Value::int(id)),
        ("title", Value::str(title)),
        ("content", Value::str(content)),
    ])
}

fn user(id: i64, name: &str, age: i64, posts: Vec<Value>) -> Value {
    Value::object(vec![
        ("id", Value::int(id)),
        ("name", Value::str(name)),
        ("age", Value::int(age)),
        ("posts", Value::list(posts)),
    ])
}

/// The two sample users, each with one post.
pub fn users() -> Vec<Value> {
    vec![
        user(1, "John Doe", 30, vec![post(1, "First Post", "Hello World")]),
        user(2, "Jane Doe", 25, vec![post(2, "Second Post", "GraphQL is great!")]),
    ]
}

/// Registers the sample types, without closing the registry.
pub fn register(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    let id_argument = || ArgumentDefinition::new("id", TypeRef::non_null(TypeRef::named("Int")));

    registry.register(
        TypeDefinition::object("Query")
            .field(FieldDefinition::new("hello", TypeRef::named("String")))
            .field(FieldDefinition::new("user", TypeRef::named("User")).argument(id_argument()))
            .field(FieldDefinition::new("users", TypeRef::list(TypeRef::named("User"))))
            .field(FieldDefinition::new("username", TypeRef::named("String")).argument(id_argument())),
    )?;
    registry.register(
        TypeDefinition::object("User")
            .field(FieldDefinition::new("id", TypeRef::named("Int")))
            .field(FieldDefinition::new("name", TypeRef::named("String")))
            .field(FieldDefinition::new("age", TypeRef::named("Int")))
            .field(FieldDefinition::new("posts", TypeRef::list(TypeRef::named("Post")))),
    )?;
    registry.register(
        TypeDefinition::object("Post")
            .field(FieldDefinition::new("id", TypeRef::named("Int")))
            .field(FieldDefinition::new("title", TypeRef::named("String")))
            .field(FieldDefinition::new("content", TypeRef::named("String"))),
    )?;
    Ok(())
}

/// The closed sample schema.
pub fn schema() -> Result<Schema, SchemaError> {
    let mut registry = SchemaRegistry::new();
    register(&mut registry)?;
    registry.validate_closure("Query")
}

fn find_user(arguments: &Arguments) -> Result<Option<Value>, ResolutionError> {
    let id = arguments
        .get_int("id")
        .ok_or_else(|| ResolutionError::new("argument `id` must be an Int"))?;
    Ok(users().into_iter().find(|user| user.get("id") == Some(&Value::int(id))))
}

fn hello(_: &Value, _: &Arguments) -> ResolverResult {
    Ok(Value::str("Hello, world!"))
}

/// A lookup miss resolves to null, not an error.
fn user_by_id(_: &Value, arguments: &Arguments) -> ResolverResult {
    Ok(find_user(arguments)?.unwrap_or(Value::Null))
}

fn all_users(_: &Value, _: &Arguments) -> ResolverResult {
    Ok(Value::list(users()))
}

fn username(_: &Value, arguments: &Arguments) -> ResolverResult {
    Ok(find_user(arguments)?
        .and_then(|user| user.get("name").cloned())
        .unwrap_or(Value::Null))
}

/// Resolver bindings for every field of the sample schema.
pub fn resolvers() -> Resolvers {
    let mut resolvers = Resolvers::new();
    resolvers
        .bind("Query", "hello", hello)
        .bind("Query", "user", user_by_id)
        .bind("Query", "users", all_users)
        .bind("Query", "username", username)
        .bind_properties("User", &["id", "name", "age", "posts"])
        .bind_properties("Post", &["id", "title", "content"]);
    resolvers
}
