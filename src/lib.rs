#[macro_use]
extern crate log;

pub mod language;
pub mod types;
pub mod validator;
pub mod resolver;
pub mod executor;
pub mod sample;

use language::errors::ParseError;
use language::lexer::Source;
use language::parser::{ParseOptions, Parser};
use executor::{ExecutionError, Executor, ExecutorOptions, Response};
use resolver::Resolvers;
use types::registry::{Schema, SchemaError};
use types::value::Value;
use validator::{ValidationError, Variables};

/// Any error that rejects a whole request (or, for `Schema`, startup).
#[derive(PartialEq, Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl Error {
    /// Renders the error the way a transport reports a rejected request.
    pub fn into_response(self) -> Response {
        Response::rejected(self.to_string())
    }
}

/// A request: the query text plus what a transport may send alongside it.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Request {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Variables,
}

impl Request {
    pub fn new(query: &str) -> Request {
        Request {
            query: query.to_string(),
            ..Request::default()
        }
    }

    pub fn operation(mut self, name: &str) -> Request {
        self.operation_name = Some(name.to_string());
        self
    }

    pub fn variables(mut self, variables: Variables) -> Request {
        self.variables = variables;
        self
    }
}

/// Runs a query through parsing, validation and execution.
pub struct GraphQL<'a> {
    schema: &'a Schema,
    resolvers: &'a Resolvers,
    parse_options: ParseOptions,
    executor_options: ExecutorOptions,
}

impl<'a> GraphQL<'a> {
    pub fn new(schema: &'a Schema, resolvers: &'a Resolvers) -> GraphQL<'a> {
        GraphQL {
            schema: schema,
            resolvers: resolvers,
            parse_options: ParseOptions::new(),
            executor_options: ExecutorOptions::default(),
        }
    }

    pub fn parse_options(mut self, options: ParseOptions) -> GraphQL<'a> {
        self.parse_options = options;
        self
    }

    pub fn executor_options(mut self, options: ExecutorOptions) -> GraphQL<'a> {
        self.executor_options = options;
        self
    }

    /// Executes `request` with `root` as the parent of the root fields.
    pub fn execute(&self, request: &Request, root: &Value) -> Result<Response, Error> {
        let document = Parser::parse(Source::new(&request.query), self.parse_options)?;
        let query = validator::validate_with_variables(
            &document,
            self.schema,
            request.operation_name.as_deref(),
            &request.variables,
        )?;
        let executor = Executor::with_options(self.resolvers, self.executor_options);
        Ok(executor.execute(&query, root)?)
    }

    /// Like `execute`, but a rejected request becomes a response carrying
    /// the error instead of an `Err`.
    pub fn respond(&self, request: &Request, root: &Value) -> Response {
        self.execute(request, root).unwrap_or_else(|error| {
            info!("request rejected: {}", error);
            error.into_response()
        })
    }

    /// Shorthand for executing a bare query string against a null root.
    pub fn query(schema: &Schema, resolvers: &Resolvers, query: &str) -> Result<Response, Error> {
        GraphQL::new(schema, resolvers).execute(&Request::new(query), &Value::Null)
    }
}
