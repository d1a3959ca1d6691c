#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Kinds {
    Document,

    OperationDefinition,

    VariableDefinition,

    SelectionSet,

    Field,

    Argument,

    Name,

    Int,
    Float,
    String,
    Boolean,
    Null,
    List,
    Variable
}
