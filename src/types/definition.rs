use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::types::registry::SchemaError;
use crate::types::value::Value;

/// Names of the scalars every registry starts out with.
pub const BUILTIN_SCALARS: [ScalarKind; 5] = [
    ScalarKind::Int,
    ScalarKind::Float,
    ScalarKind::String,
    ScalarKind::Boolean,
    ScalarKind::Id,
];

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    Id,
    /// A user registered scalar. Literals pass through uncoerced.
    Custom,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match *self {
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::String => "String",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Id => "ID",
            ScalarKind::Custom => "Custom",
        }
    }
}

/// A reference from a field or argument to a named type, possibly wrapped.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> TypeRef {
        TypeRef::Named(name.to_string())
    }

    pub fn list(of: TypeRef) -> TypeRef {
        TypeRef::List(Box::new(of))
    }

    pub fn non_null(of: TypeRef) -> TypeRef {
        match of {
            TypeRef::NonNull(_) => of,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// The innermost named type, with every wrapper stripped.
    pub fn base_name(&self) -> &str {
        match *self {
            TypeRef::Named(ref name) => name,
            TypeRef::List(ref of) | TypeRef::NonNull(ref of) => of.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(*self, TypeRef::NonNull(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TypeRef::Named(ref name) => write!(f, "{}", name),
            TypeRef::List(ref of) => write!(f, "[{}]", of),
            TypeRef::NonNull(ref of) => write!(f, "{}!", of),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, thiserror::Error)]
#[error("invalid type reference `{0}`")]
pub struct TypeRefParseError(pub String);

impl FromStr for TypeRef {
    type Err = TypeRefParseError;

    /// Parses GraphQL type notation: `Int`, `[Post]`, `Int!`, `[Int!]!`.
    fn from_str(s: &str) -> Result<TypeRef, TypeRefParseError> {
        let trimmed = s.trim();
        let invalid = || TypeRefParseError(s.to_string());

        if let Some(inner) = trimmed.strip_suffix('!') {
            let of: TypeRef = inner.parse().map_err(|_| invalid())?;
            return match of {
                TypeRef::NonNull(_) => Err(invalid()),
                other => Ok(TypeRef::non_null(other)),
            };
        }

        if let Some(inner) = trimmed.strip_prefix('[') {
            let inner = inner.strip_suffix(']').ok_or_else(invalid)?;
            let of: TypeRef = inner.parse().map_err(|_| invalid())?;
            return Ok(TypeRef::list(of));
        }

        let mut chars = trimmed.chars();
        let valid_start = chars.next().map_or(false, |c| c == '_' || c.is_ascii_alphabetic());
        if valid_start && chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
            Ok(TypeRef::named(trimmed))
        } else {
            Err(invalid())
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub type_ref: TypeRef,
    pub default_value: Option<Value>,
}

impl ArgumentDefinition {
    pub fn new(name: &str, type_ref: TypeRef) -> ArgumentDefinition {
        ArgumentDefinition {
            name: name.to_string(),
            type_ref: type_ref,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> ArgumentDefinition {
        self.default_value = Some(value);
        self
    }

    /// Non-null arguments without a default must be supplied by the caller.
    pub fn is_required(&self) -> bool {
        self.type_ref.is_non_null() && self.default_value.is_none()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub type_ref: TypeRef,
    pub arguments: IndexMap<String, ArgumentDefinition>,
    duplicate_arguments: Vec<String>,
}

impl FieldDefinition {
    pub fn new(name: &str, type_ref: TypeRef) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            type_ref: type_ref,
            arguments: IndexMap::new(),
            duplicate_arguments: vec![],
        }
    }

    /// Adds an argument. A second argument of the same name is kept out and
    /// reported when the owning type is registered.
    pub fn argument(mut self, argument: ArgumentDefinition) -> FieldDefinition {
        match self.arguments.contains_key(&argument.name) {
            true => self.duplicate_arguments.push(argument.name),
            false => {
                self.arguments.insert(argument.name.clone(), argument);
            }
        }
        self
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum TypeKind {
    Scalar(ScalarKind),
    Object(IndexMap<String, FieldDefinition>),
}

#[derive(PartialEq, Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    conflicts: Vec<SchemaError>,
}

impl TypeDefinition {
    pub fn scalar(name: &str) -> TypeDefinition {
        let kind = BUILTIN_SCALARS
            .iter()
            .find(|scalar| scalar.name() == name)
            .copied()
            .unwrap_or(ScalarKind::Custom);

        TypeDefinition {
            name: name.to_string(),
            kind: TypeKind::Scalar(kind),
            conflicts: vec![],
        }
    }

    pub fn object(name: &str) -> TypeDefinition {
        TypeDefinition {
            name: name.to_string(),
            kind: TypeKind::Object(IndexMap::new()),
            conflicts: vec![],
        }
    }

    /// Adds a field to an object type. Duplicate fields and arguments, and
    /// fields added to a scalar, are kept out and make `check` fail.
    pub fn field(mut self, field: FieldDefinition) -> TypeDefinition {
        for argument in &field.duplicate_arguments {
            self.conflicts.push(SchemaError::DuplicateArgument {
                owner: format!("{}.{}({}:)", self.name, field.name, argument),
            });
        }

        match self.kind {
            TypeKind::Object(ref fields) if fields.contains_key(&field.name) => {
                self.conflicts.push(SchemaError::DuplicateField {
                    type_name: self.name.clone(),
                    field: field.name,
                });
            }
            TypeKind::Object(ref mut fields) => {
                fields.insert(field.name.clone(), field);
            }
            TypeKind::Scalar(_) => {
                self.conflicts.push(SchemaError::FieldOnScalar {
                    type_name: self.name.clone(),
                    field: field.name,
                });
            }
        }
        self
    }

    /// Fails with the first definition the builders had to keep out.
    pub fn check(&self) -> Result<(), SchemaError> {
        match self.conflicts.first() {
            Some(conflict) => Err(conflict.clone()),
            None => Ok(()),
        }
    }

    pub fn fields(&self) -> Option<&IndexMap<String, FieldDefinition>> {
        match self.kind {
            TypeKind::Object(ref fields) => Some(fields),
            TypeKind::Scalar(_) => None,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().and_then(|fields| fields.get(name))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_))
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.kind {
            TypeKind::Scalar(kind) => Some(kind),
            TypeKind::Object(_) => None,
        }
    }
}
