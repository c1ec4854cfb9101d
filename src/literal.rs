pub use logicrs::{Lit, Var};

/// Largest variable whose literals still fit the 32-bit AIGER numbering.
pub const MAX_VAR: u32 = u32::MAX >> 1;

/// AIGER numbering of a literal: `2 * var + negated`.
pub trait AigerLit: Copy {
    fn from_aiger(raw: u32) -> Self;

    fn aiger(self) -> u32;

    /// The positive literal of the same variable.
    fn strip(self) -> Self;

    fn is_negated(self) -> bool;

    /// Either constant, `0` or `1`.
    fn is_const(self) -> bool;
}

impl AigerLit for Lit {
    #[inline]
    fn from_aiger(raw: u32) -> Self {
        Lit::new(Var(raw >> 1), raw & 1 == 0)
    }

    #[inline]
    fn aiger(self) -> u32 {
        u32::from(self)
    }

    #[inline]
    fn strip(self) -> Self {
        self.var().lit()
    }

    #[inline]
    fn is_negated(self) -> bool {
        !self.polarity()
    }

    #[inline]
    fn is_const(self) -> bool {
        self.var().is_constant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_keeps_variable() {
        for raw in 0..64 {
            let l = Lit::from_aiger(raw);
            assert_eq!(l.aiger(), raw);
            assert_eq!((!l).strip(), l.strip());
            assert_ne!((!l).is_negated(), l.is_negated());
            assert_eq!(l.var(), (!l).var());
        }
    }

    #[test]
    fn constants_follow_aiger_numbering() {
        assert_eq!(Lit::constant(false).aiger(), 0);
        assert_eq!(Lit::constant(true).aiger(), 1);
        assert!(Lit::from_aiger(1).is_const());
        assert!(!Lit::from_aiger(2).is_const());
    }

    #[test]
    fn var_lit_conversion() {
        let v = Var(7);
        assert_eq!(v.lit().aiger(), 14);
        assert_eq!((!v.lit()).aiger(), 15);
        assert_eq!(Lit::from_aiger(15).var(), v);
        assert_eq!(Lit::from_aiger(15).not_if(true), v.lit());
        assert_eq!(Lit::from_aiger(MAX_VAR << 1 | 1).var(), Var(MAX_VAR));
    }
}
