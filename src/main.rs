//! Runs one query against the sample users and posts dataset and prints the
//! JSON response.
use std::io::Read;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;

use graphql::executor::ExecutorOptions;
use graphql::language::parser::ParseOptions;
use graphql::types::value::Value;
use graphql::{sample, GraphQL, Request};

#[derive(Parser, Debug)]
#[command(name = "mini-graphql", about = "execute a GraphQL query against the sample users and posts")]
struct CommandLineInterface {
    /// query text; read from stdin if omitted
    #[arg(long, short)]
    query: Option<String>,

    /// JSON object of variable values
    #[arg(long)]
    variables: Option<String>,

    /// operation to run when the document holds several
    #[arg(long)]
    operation: Option<String>,

    /// resolve sibling fields in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// deepest selection nesting accepted
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// pretty-print the response
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = CommandLineInterface::parse();

    let query = match cli.query {
        Some(query) => query,
        None => {
            let mut query = String::new();
            std::io::stdin()
                .read_to_string(&mut query)
                .context("failed to read the query from stdin")?;
            query
        }
    };

    let mut request = Request::new(&query);
    if let Some(variables) = cli.variables.as_deref() {
        match serde_json::from_str::<serde_json::Value>(variables).context("failed to parse --variables")? {
            serde_json::Value::Object(variables) => request = request.variables(variables),
            other => bail!("--variables must be a JSON object, got {}", other),
        }
    }
    if let Some(operation) = cli.operation.as_deref() {
        request = request.operation(operation);
    }

    let schema = sample::schema().context("failed to build the sample schema")?;
    let resolvers = sample::resolvers();
    let unbound = resolvers.unbound_fields(&schema);
    if !unbound.is_empty() {
        bail!("fields without resolvers: {}", unbound.join(", "));
    }

    let graphql = GraphQL::new(&schema, &resolvers)
        .parse_options(ParseOptions { max_depth: cli.max_depth, ..ParseOptions::new() })
        .executor_options(ExecutorOptions { parallel: cli.parallel });
    info!("executing query of {} bytes", query.len());
    let response = graphql.respond(&request, &Value::Null);

    let rendered = match cli.pretty {
        true => serde_json::to_string_pretty(&response),
        false => serde_json::to_string(&response),
    };
    println!("{}", rendered.context("failed to serialize the response")?);
    Ok(())
}
