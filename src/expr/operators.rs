/// Expression operators a value can be combined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // Comparison
    /// Equal (`$eq`)
    Equal,
    /// Not equal (`$ne`)
    NotEqual,
    /// Greater than (`$gt`)
    GreaterThan,
    /// Greater than or equal (`$gte`)
    GreaterEqual,
    /// Less than (`$lt`)
    LessThan,
    /// Less than or equal (`$lte`)
    LessEqual,

    // Arithmetic
    /// Remainder (`$mod`)
    Modulo,
    /// Addition (`$add`)
    Add,
    /// Multiplication (`$multiply`)
    Multiply,
}

impl Operator {
    /// The operator key as it appears in the wire document.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "$eq",
            Operator::NotEqual => "$ne",
            Operator::GreaterThan => "$gt",
            Operator::GreaterEqual => "$gte",
            Operator::LessThan => "$lt",
            Operator::LessEqual => "$lte",
            Operator::Modulo => "$mod",
            Operator::Add => "$add",
            Operator::Multiply => "$multiply",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::GreaterThan
                | Operator::GreaterEqual
                | Operator::LessThan
                | Operator::LessEqual
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
