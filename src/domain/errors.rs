#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    UnknownField(String),
    WrongKind {
        field: String,
        expected: &'static str,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::UnknownField(field_id) => {
                write!(f, "Unknown field id: {}", field_id)
            }
            DomainError::WrongKind { field, expected } => {
                write!(f, "Field {} does not hold a {}", field, expected)
            }
        }
    }
}

impl std::error::Error for DomainError {}
