#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    InvalidQuantity(u32),
    InvalidPrice(f64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidQuantity(quantity) => {
                write!(f, "Invalid quantity: {}", quantity)
            }
            DomainError::InvalidPrice(price) => {
                write!(f, "Invalid unit price: {}", price)
            }
        }
    }
}

impl std::error::Error for DomainError {}

pub type DomainResult<T> = Result<T, DomainError>;
