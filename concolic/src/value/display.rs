use crate::value::SymbolicValue;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

impl Display for SymbolicValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl Debug for SymbolicValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SymbolicValue")
            .field(&format_args!("{}", self.expr))
            .finish()
    }
}

// Keyed on the serialized term, never on the symbolic `==`.
impl PartialEq for SymbolicValue {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for SymbolicValue {}

impl Hash for SymbolicValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state)
    }
}
