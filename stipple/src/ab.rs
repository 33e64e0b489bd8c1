//! The two roles a dither cell can take.

/// A binary symbol. Each [`Patch`](crate::patch::Patch) maps `A` to its first
/// color and `B` to its second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    A,
    B,
}

impl Symbol {
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Symbol::A => Symbol::B,
            Symbol::B => Symbol::A,
        }
    }
}

/// Cells outside a shape are "off", i.e., `A`.
impl Default for Symbol {
    #[inline]
    fn default() -> Self {
        Symbol::A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip() {
        assert_eq!(Symbol::A.flip(), Symbol::B);
        assert_eq!(Symbol::B.flip(), Symbol::A);
        assert_eq!(Symbol::default().flip().flip(), Symbol::A);
    }
}
