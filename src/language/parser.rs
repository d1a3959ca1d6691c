use crate::language::ast::{
    Argument, Document, Location, Name, OperationDefinition, Selection, SelectionSet, Value,
    VariableDefinition,
};
use crate::language::errors::ParseError;
use crate::language::kinds::Kinds;
use crate::language::lexer::{Lexer, NameKind, Source, Token, TokenKind};
use crate::types::definition::TypeRef;

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Leave `loc` empty on every node.
    pub no_location: bool,
    /// Deepest selection-set nesting accepted.
    pub max_depth: usize
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions::new()
    }
}

impl ParseOptions {
    pub fn new() -> ParseOptions {
        ParseOptions {
            no_location: false,
            max_depth: 64
        }
    }

    pub fn no_location() -> ParseOptions {
        ParseOptions {
            no_location: true,
            ..ParseOptions::new()
        }
    }
}

pub struct Parser {
    lex_token: Lexer,
    options: ParseOptions,
    prev_end: usize,
    depth: usize,
    token: Token
}

impl Parser {
    pub fn parse(source: Source, options: ParseOptions) -> Result<Document, ParseError> {
        let mut lexer = Lexer::lex(source);
        let token = lexer.next()?;
        let mut parser = Parser {
            lex_token: lexer,
            options: options,
            prev_end: 0,
            depth: 0,
            token: token
        };
        let document = parser.parse_document()?;
        debug!("parsed document with {} operation(s)", document.definitions.len());
        Ok(document)
    }

    /// Document : OperationDefinition+
    fn parse_document(&mut self) -> Result<Document, ParseError> {
        let start = self.token.start;
        let mut definitions = vec![];

        // rust doesn't have do/while so we make our own
        let mut cont = true;
        while cont {
            definitions.push(self.parse_operation_definition()?);
            cont = !self.skip(TokenKind::EOF)?;
        }

        Ok(Document {
            kind: Kinds::Document,
            loc: self.loc(start),
            definitions: definitions
        })
    }

    /// OperationDefinition :
    ///   - SelectionSet
    ///   - query Name? VariableDefinitions? SelectionSet
    fn parse_operation_definition(&mut self) -> Result<OperationDefinition, ParseError> {
        let start = self.token.start;

        if self.peek(TokenKind::BraceL) {
            return Ok(OperationDefinition {
                kind: Kinds::OperationDefinition,
                name: None,
                variable_definitions: vec![],
                selection_set: self.parse_selection_set()?,
                loc: self.loc(start)
            });
        }

        match self.token.name_kind_from_value() {
            Some(NameKind::Query) => self.advance()?,
            Some(NameKind::Mutation) | Some(NameKind::Subscription) => {
                return parse_error!(start, "Unsupported operation `{}`", self.token);
            }
            Some(NameKind::Fragment) => {
                return parse_error!(start, "Fragments are not supported");
            }
            None => return self.unexpected(),
        }

        let name = match self.peek(TokenKind::Name) {
            true => Some(self.parse_name()?),
            false => None
        };

        Ok(OperationDefinition {
            kind: Kinds::OperationDefinition,
            name: name,
            variable_definitions: self.parse_variable_definitions()?,
            selection_set: self.parse_selection_set()?,
            loc: self.loc(start)
        })
    }

    /// VariableDefinitions : ( VariableDefinition+ )
    fn parse_variable_definitions(&mut self) -> Result<Vec<VariableDefinition>, ParseError> {
        let mut definitions = vec![];
        if self.skip(TokenKind::ParenL)? {
            loop {
                definitions.push(self.parse_variable_definition()?);
                if self.skip(TokenKind::ParenR)? {
                    break;
                }
            }
        }
        Ok(definitions)
    }

    /// VariableDefinition : Variable : Type DefaultValue?
    fn parse_variable_definition(&mut self) -> Result<VariableDefinition, ParseError> {
        let start = self.token.start;
        self.expect(TokenKind::Dollar)?;
        let variable = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let type_ref = self.parse_type_ref()?;
        let default_value = match self.skip(TokenKind::Equals)? {
            true => Some(self.parse_value_literal(true)?),
            false => None
        };

        Ok(VariableDefinition {
            kind: Kinds::VariableDefinition,
            variable: variable,
            type_ref: type_ref,
            default_value: default_value,
            loc: self.loc(start)
        })
    }

    /// Type : NamedType | [ Type ] | Type !
    fn parse_type_ref(&mut self) -> Result<TypeRef, ParseError> {
        let type_ref = if self.peek(TokenKind::BracketL) {
            self.descend("Type")?;
            self.advance()?;
            let of = self.parse_type_ref()?;
            self.expect(TokenKind::BracketR)?;
            self.depth -= 1;
            TypeRef::list(of)
        } else {
            TypeRef::Named(self.parse_name()?.value)
        };

        match self.skip(TokenKind::Bang)? {
            true => Ok(TypeRef::non_null(type_ref)),
            false => Ok(type_ref)
        }
    }

    /// SelectionSet : { Selection+ }
    fn parse_selection_set(&mut self) -> Result<SelectionSet, ParseError> {
        let start = self.token.start;
        self.descend("Selection")?;
        self.expect(TokenKind::BraceL)?;

        if self.peek(TokenKind::BraceR) {
            return parse_error!(start, "Empty selection set");
        }

        let mut selections = vec![];
        while !self.skip(TokenKind::BraceR)? {
            selections.push(self.parse_selection()?);
        }
        self.depth -= 1;

        Ok(SelectionSet {
            kind: Kinds::SelectionSet,
            selections: selections,
            loc: self.loc(start)
        })
    }

    /// Selection : Alias? Name Arguments? SelectionSet?
    fn parse_selection(&mut self) -> Result<Selection, ParseError> {
        let start = self.token.start;

        if self.peek(TokenKind::Spread) {
            return parse_error!(start, "Fragments are not supported");
        }

        let name_or_alias = self.parse_name()?;
        let (alias, name) = match self.skip(TokenKind::Colon)? {
            true => (Some(name_or_alias), self.parse_name()?),
            false => (None, name_or_alias)
        };

        let arguments = self.parse_arguments()?;

        if self.peek(TokenKind::At) {
            return parse_error!(self.token.start, "Directives are not supported");
        }

        let selection_set = match self.peek(TokenKind::BraceL) {
            true => Some(self.parse_selection_set()?),
            false => None
        };

        Ok(Selection {
            kind: Kinds::Field,
            alias: alias,
            name: name,
            arguments: arguments,
            selection_set: selection_set,
            loc: self.loc(start)
        })
    }

    /// Arguments : ( Argument+ )
    fn parse_arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut arguments = vec![];
        if self.skip(TokenKind::ParenL)? {
            loop {
                arguments.push(self.parse_argument()?);
                if self.skip(TokenKind::ParenR)? {
                    break;
                }
            }
        }
        Ok(arguments)
    }

    /// Argument : Name : Value
    fn parse_argument(&mut self) -> Result<Argument, ParseError> {
        let start = self.token.start;
        let name = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_value_literal(false)?;

        Ok(Argument {
            kind: Kinds::Argument,
            name: name,
            value: value,
            loc: self.loc(start)
        })
    }

    /// Value[Const] :
    ///   - [~Const] Variable
    ///   - IntValue | FloatValue | StringValue | BooleanValue | NullValue
    ///   - ListValue[?Const]
    fn parse_value_literal(&mut self, is_const: bool) -> Result<Value, ParseError> {
        let start = self.token.start;
        let token = self.token.clone();

        match token.kind {
            TokenKind::BracketL => {
                self.descend("List")?;
                self.advance()?;
                let mut values = vec![];
                while !self.skip(TokenKind::BracketR)? {
                    values.push(self.parse_value_literal(is_const)?);
                }
                self.depth -= 1;
                Ok(Value::ListValue { kind: Kinds::List, values: values, loc: self.loc(start) })
            }
            TokenKind::Int => {
                self.advance()?;
                Ok(Value::IntValue { kind: Kinds::Int, value: token.value.unwrap_or_default(), loc: self.loc(start) })
            }
            TokenKind::Float => {
                self.advance()?;
                Ok(Value::FloatValue { kind: Kinds::Float, value: token.value.unwrap_or_default(), loc: self.loc(start) })
            }
            TokenKind::String => {
                self.advance()?;
                Ok(Value::StringValue { kind: Kinds::String, value: token.value.unwrap_or_default(), loc: self.loc(start) })
            }
            TokenKind::Name => {
                let literal = token.value.as_deref().unwrap_or_default();
                if !matches!(literal, "true" | "false" | "null") {
                    return parse_error!(start, "Enum values are not supported, found `{}`", token);
                }
                self.advance()?;
                let loc = self.loc(start);
                Ok(match literal {
                    "null" => Value::NullValue { kind: Kinds::Null, loc: loc },
                    other => Value::BooleanValue { kind: Kinds::Boolean, value: other == "true", loc: loc }
                })
            }
            TokenKind::Dollar if !is_const => {
                self.advance()?;
                let name = self.parse_name()?;
                Ok(Value::VariableValue { kind: Kinds::Variable, name: name, loc: self.loc(start) })
            }
            TokenKind::BraceL => parse_error!(start, "Input objects are not supported"),
            _ => self.unexpected()
        }
    }

    fn parse_name(&mut self) -> Result<Name, ParseError> {
        let token = self.expect(TokenKind::Name)?;
        Ok(Name {
            kind: Kinds::Name,
            value: token.value.unwrap_or_default(),
            loc: self.loc(token.start)
        })
    }

    /// Enters one level of selection, list or type nesting. Every kind
    /// counts against the same `max_depth`.
    fn descend(&mut self, what: &str) -> Result<(), ParseError> {
        self.depth += 1;
        match self.depth > self.options.max_depth {
            true => parse_error!(
                self.token.start,
                "{} nesting exceeds the maximum depth of {}",
                what,
                self.options.max_depth
            ),
            false => Ok(())
        }
    }

    fn loc(&self, start: usize) -> Option<Location> {
        match self.options.no_location {
            true => None,
            false => Some(Location { start: start, end: self.prev_end })
        }
    }

    /// Consumes the current token if it is of `kind`.
    fn skip(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        match self.token.kind == kind {
            true => {
                if kind != TokenKind::EOF {
                    self.advance()?;
                }
                Ok(true)
            }
            false => Ok(false)
        }
    }

    /// Consumes the current token, failing unless it is of `kind`.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.token.kind != kind {
            return self.unexpected();
        }
        let token = self.token.clone();
        self.advance()?;
        Ok(token)
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.prev_end = self.token.end;
        self.token = self.lex_token.next()?;
        Ok(())
    }

    fn peek(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    fn unexpected<T>(&self) -> Result<T, ParseError> {
        parse_error!(self.token.start, "Unexpected {}", self.token)
    }
}
