use crate::{
    counter::{CounterFragment, CounterKind},
    error::{Error, Result},
    literal::{AigerLit, Lit, MAX_VAR, Var},
    netlist::Netlist,
};

/// Maps counter fragment literals into a host netlist.
///
/// The counter inputs are substituted by host literals; every other variable
/// is moved by `offset` so that the lowest fragment latch or gate lands on
/// the first variable the host does not use yet.
#[derive(Clone, Debug)]
pub struct Relocation {
    offset: i64,
    reset: Var,
    inc: Option<Var>,
    reset_target: Lit,
    inc_target: Lit,
}

impl Relocation {
    /// `host.maxvar()` is read once here; build before adding anything to the host.
    pub fn build(
        host: &Netlist,
        fragment: &CounterFragment,
        reset_target: Lit,
        inc_target: Option<Lit>,
    ) -> Result<Self> {
        let kind = fragment.kind();
        let num_inputs = fragment.netlist().num_inputs();
        if num_inputs != kind.num_inputs() || fragment.inc().is_some() != (num_inputs == 2) {
            return Err(Error::Relocation(format!(
                "{kind} counter expects {} inputs, fragment has {num_inputs}",
                kind.num_inputs()
            )));
        }
        if kind == CounterKind::Fairness && inc_target.is_some() {
            return Err(Error::Relocation(
                "fairness counter has no increment input to wire".to_string(),
            ));
        }
        for target in [Some(reset_target), inc_target].into_iter().flatten() {
            if *target.var() > host.maxvar() {
                return Err(Error::Relocation(format!(
                    "target literal {} is not part of the host",
                    target.aiger()
                )));
            }
        }
        let first_free = host.maxvar() as i64 + 1;
        let base = *fragment.base() as i64;
        let last = first_free + fragment.netlist().maxvar() as i64 - base;
        if last > MAX_VAR as i64 {
            return Err(Error::Relocation(format!(
                "counter variables {first_free}..={last} exceed the literal range, the limit is {MAX_VAR}"
            )));
        }
        Ok(Self {
            offset: first_free - base,
            reset: fragment.reset(),
            inc: fragment.inc(),
            reset_target,
            inc_target: inc_target.unwrap_or(Lit::constant(true)),
        })
    }

    /// Distance every shifted literal moves, twice the variable offset.
    #[inline]
    pub fn shift(&self) -> i64 {
        2 * self.offset
    }

    pub fn map(&self, lit: Lit) -> Lit {
        let v = lit.var();
        if v.is_constant() {
            lit
        } else if v == self.reset {
            self.reset_target.not_if(lit.is_negated())
        } else if Some(v) == self.inc {
            self.inc_target.not_if(lit.is_negated())
        } else {
            lit.map_var(|v| Var((*v as i64 + self.offset) as u32))
        }
    }
}
