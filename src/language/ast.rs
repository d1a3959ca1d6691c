use crate::language::kinds::Kinds;
use crate::types::definition::TypeRef;

#[derive(PartialEq, Debug, Clone)]
pub struct Document {
    pub kind: Kinds,
    pub loc: Option<Location>,
    pub definitions: Vec<OperationDefinition>
}

impl Document {
    /// The operation to run: the only one in the document, or the one named
    /// `name`. `None` when there is no such operation, or the choice is
    /// ambiguous.
    pub fn operation(&self, name: Option<&str>) -> Option<&OperationDefinition> {
        match name {
            Some(name) => self.definitions.iter()
                .find(|operation| operation.name.as_ref().map(|n| n.value.as_str()) == Some(name)),
            None if self.definitions.len() == 1 => self.definitions.first(),
            None => None
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct OperationDefinition {
    pub kind: Kinds,
    pub name: Option<Name>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub selection_set: SelectionSet,
    pub loc: Option<Location>
}

#[derive(PartialEq, Debug, Clone)]
pub struct VariableDefinition {
    pub kind: Kinds,
    pub variable: Name,
    pub type_ref: TypeRef,
    pub default_value: Option<Value>,
    pub loc: Option<Location>
}

#[derive(PartialEq, Debug, Clone)]
pub struct SelectionSet {
    pub kind: Kinds,
    pub selections: Vec<Selection>,
    pub loc: Option<Location>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Selection {
    pub kind: Kinds,
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub selection_set: Option<SelectionSet>,
    pub loc: Option<Location>
}

impl Selection {
    /// The key this selection occupies in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.name).value.as_str()
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Location {
    pub start: usize,
    pub end: usize
}

#[derive(PartialEq, Debug, Clone)]
pub struct Name {
    pub kind: Kinds,
    pub value: String,
    pub loc: Option<Location>
}

#[derive(PartialEq, Debug, Clone)]
pub struct Argument {
    pub kind: Kinds,
    pub name: Name,
    pub value: Value,
    pub loc: Option<Location>
}

/// An argument literal as written in the query. Coercion to a typed value
/// happens during validation.
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    IntValue { kind: Kinds, value: String, loc: Option<Location> },
    FloatValue { kind: Kinds, value: String, loc: Option<Location> },
    StringValue { kind: Kinds, value: String, loc: Option<Location> },
    BooleanValue { kind: Kinds, value: bool, loc: Option<Location> },
    NullValue { kind: Kinds, loc: Option<Location> },
    ListValue { kind: Kinds, values: Vec<Value>, loc: Option<Location> },
    VariableValue { kind: Kinds, name: Name, loc: Option<Location> },
}

impl Value {
    /// How the literal reads in the query, for error messages.
    pub fn describe(&self) -> String {
        match *self {
            Value::IntValue { ref value, .. } | Value::FloatValue { ref value, .. } => value.clone(),
            Value::StringValue { ref value, .. } => format!("{:?}", value),
            Value::BooleanValue { value, .. } => value.to_string(),
            Value::NullValue { .. } => "null".to_string(),
            Value::ListValue { ref values, .. } => {
                let items: Vec<String> = values.iter().map(Value::describe).collect();
                format!("[{}]", items.join(", "))
            }
            Value::VariableValue { ref name, .. } => format!("${}", name.value),
        }
    }
}
