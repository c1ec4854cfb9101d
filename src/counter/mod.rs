mod binary;
mod smv;

pub use binary::BinaryCounter;
pub use smv::{DEFAULT_PIPELINE, SmvPipeline};

use crate::{
    error::{Error, Result},
    literal::{Lit, Var},
    netlist::Netlist,
};
use std::fmt::{self, Display};

/// Which counter is spliced, decided by the property being reduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterKind {
    /// Input `reset` only; counts every step.
    Fairness,
    /// Inputs `reset` and `inc`; counts when `inc` holds.
    Justice,
}

impl CounterKind {
    #[inline]
    pub fn num_inputs(self) -> usize {
        match self {
            CounterKind::Fairness => 1,
            CounterKind::Justice => 2,
        }
    }
}

impl Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKind::Fairness => write!(f, "fairness"),
            CounterKind::Justice => write!(f, "justice"),
        }
    }
}

/// Produces a counter circuit for a bound and a kind.
///
/// The counter starts at 0, returns to 0 whenever `reset` holds, otherwise
/// counts up (when `inc` holds, for a justice counter) and saturates at `k`.
/// Its single overflow signal is true iff the count equals `k`.
pub trait CounterSource {
    fn generate(&mut self, k: u32, kind: CounterKind) -> Result<Netlist>;
}

impl<F> CounterSource for F
where
    F: FnMut(u32, CounterKind) -> Result<Netlist>,
{
    fn generate(&mut self, k: u32, kind: CounterKind) -> Result<Netlist> {
        self(k, kind)
    }
}

/// A validated counter circuit in its own literal numbering.
#[derive(Clone, Debug)]
pub struct CounterFragment {
    kind: CounterKind,
    netlist: Netlist,
    reset: Var,
    inc: Option<Var>,
    overflow: Lit,
}

impl CounterFragment {
    /// Inputs named `reset` and `inc` are picked by name, otherwise the first
    /// input is `reset` and the second `inc`.
    pub fn new(kind: CounterKind, netlist: Netlist) -> Result<Self> {
        netlist
            .check()
            .map_err(|e| Error::Generation(format!("counter circuit: {e}")))?;
        let inputs = netlist.inputs();
        if inputs.is_empty() || inputs.len() > 2 {
            return Err(Error::Generation(format!(
                "counter circuit has {} inputs, expected reset and at most one increment",
                inputs.len()
            )));
        }
        if netlist.num_latches() == 0 {
            return Err(Error::Generation("counter circuit has no latch".to_string()));
        }
        if netlist.num_constraints() + netlist.num_justice() + netlist.num_fairness() > 0 {
            return Err(Error::Generation(
                "counter circuit declares constraints or liveness properties".to_string(),
            ));
        }
        let overflow = match (netlist.outputs(), netlist.bads()) {
            ([o], []) | ([], [o]) => o.lit,
            (o, b) => {
                return Err(Error::Generation(format!(
                    "counter circuit has {} outputs and {} bad properties, expected one overflow signal",
                    o.len(),
                    b.len()
                )));
            }
        };
        let named = |n: &str| {
            inputs
                .iter()
                .position(|i| i.name.as_deref() == Some(n))
        };
        let reset_pos = named("reset").unwrap_or(0);
        let inc_pos = match inputs.len() {
            1 => None,
            _ => Some(named("inc").unwrap_or(1 - reset_pos)),
        };
        if inc_pos == Some(reset_pos) {
            return Err(Error::Generation(
                "counter reset and increment are the same input".to_string(),
            ));
        }
        let reset = inputs[reset_pos].lit.var();
        let inc = inc_pos.map(|p| inputs[p].lit.var());
        Ok(Self {
            kind,
            netlist,
            reset,
            inc,
            overflow,
        })
    }

    #[inline]
    pub fn kind(&self) -> CounterKind {
        self.kind
    }

    #[inline]
    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    #[inline]
    pub fn reset(&self) -> Var {
        self.reset
    }

    #[inline]
    pub fn inc(&self) -> Option<Var> {
        self.inc
    }

    #[inline]
    pub fn overflow(&self) -> Lit {
        self.overflow
    }

    /// Lowest variable defined by a latch or a gate.
    pub fn base(&self) -> Var {
        self.netlist
            .latches()
            .iter()
            .map(|l| l.lit.var())
            .chain(self.netlist.ands().iter().map(|g| g.lhs.var()))
            .min()
            .unwrap_or(Var::CONST)
    }
}

/// Run `source` once and validate what it returns against `kind`.
pub fn generate(source: &mut dyn CounterSource, k: u32, kind: CounterKind) -> Result<CounterFragment> {
    if k == 0 {
        return Err(Error::Generation("counter bound must be positive".to_string()));
    }
    let netlist = source.generate(k, kind).map_err(|e| match e {
        Error::Generation(_) => e,
        e => Error::Generation(e.to_string()),
    })?;
    if netlist.num_inputs() != kind.num_inputs() {
        return Err(Error::Generation(format!(
            "{kind} counter needs {} inputs, generated circuit has {}",
            kind.num_inputs(),
            netlist.num_inputs()
        )));
    }
    CounterFragment::new(kind, netlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::AigerLit;

    fn lit(l: u32) -> Lit {
        Lit::from_aiger(l)
    }

    fn toggle(names: [Option<&str>; 2]) -> Netlist {
        let mut n = Netlist::new();
        n.add_input(lit(2), names[0]).unwrap();
        n.add_input(lit(4), names[1]).unwrap();
        n.add_latch(lit(6), lit(8), None).unwrap();
        n.add_and(lit(8), lit(3), lit(4)).unwrap();
        n.add_output(lit(6), None);
        n
    }

    #[test]
    fn inputs_by_position_and_name() {
        let f = CounterFragment::new(CounterKind::Justice, toggle([None, None])).unwrap();
        assert_eq!(f.reset(), Var(1));
        assert_eq!(f.inc(), Some(Var(2)));
        assert_eq!(f.overflow(), lit(6));
        assert_eq!(f.base(), Var(3));
        let f = CounterFragment::new(CounterKind::Justice, toggle([Some("inc"), Some("reset")]))
            .unwrap();
        assert_eq!(f.reset(), Var(2));
        assert_eq!(f.inc(), Some(Var(1)));
    }

    #[test]
    fn fragment_shape_is_validated() {
        let mut two_outputs = toggle([None, None]);
        two_outputs.add_output(lit(8), None);
        assert!(matches!(
            CounterFragment::new(CounterKind::Justice, two_outputs),
            Err(Error::Generation(_))
        ));
        let mut bad_overflow = Netlist::new();
        bad_overflow.add_input(lit(2), None).unwrap();
        bad_overflow.add_latch(lit(4), lit(3), None).unwrap();
        bad_overflow.add_bad(lit(4), None);
        let f = CounterFragment::new(CounterKind::Fairness, bad_overflow).unwrap();
        assert_eq!(f.overflow(), lit(4));
        assert_eq!(f.inc(), None);
        let mut no_latch = Netlist::new();
        no_latch.add_input(lit(2), None).unwrap();
        no_latch.add_output(lit(2), None);
        assert!(CounterFragment::new(CounterKind::Fairness, no_latch).is_err());
    }

    #[test]
    fn generate_checks_arity_and_bound() {
        let mut wrong = |_k: u32, _kind: CounterKind| -> Result<Netlist> { Ok(toggle([None, None])) };
        assert!(matches!(
            generate(&mut wrong, 2, CounterKind::Fairness),
            Err(Error::Generation(_))
        ));
        assert!(generate(&mut wrong, 2, CounterKind::Justice).is_ok());
        assert!(matches!(
            generate(&mut wrong, 0, CounterKind::Justice),
            Err(Error::Generation(_))
        ));
        let mut failing = |_k: u32, _kind: CounterKind| -> Result<Netlist> {
            Err(Error::Format("truncated".to_string()))
        };
        assert!(matches!(
            generate(&mut failing, 2, CounterKind::Justice),
            Err(Error::Generation(_))
        ));
    }
}
