use crate::{
    error::{Error, Result},
    literal::Lit,
    netlist::{LatchInit, Netlist},
};

/// Signal values of one simulation step.
#[derive(Clone, Debug)]
pub struct StepValues {
    values: Vec<bool>,
    outputs: Vec<bool>,
    bads: Vec<bool>,
}

impl StepValues {
    #[inline]
    pub fn value(&self, lit: Lit) -> bool {
        self.values[*lit.var() as usize] ^ !lit.polarity()
    }

    #[inline]
    pub fn output(&self, i: usize) -> bool {
        self.outputs[i]
    }

    #[inline]
    pub fn bad(&self, i: usize) -> bool {
        self.bads[i]
    }
}

/// Cycle-accurate evaluation of a netlist. Uninitialized latches start at 0.
pub struct Simulator<'n> {
    netlist: &'n Netlist,
    order: Vec<usize>,
    state: Vec<bool>,
}

impl<'n> Simulator<'n> {
    pub fn new(netlist: &'n Netlist) -> Result<Self> {
        netlist.check()?;
        let order = netlist.topo_ands()?;
        let mut sim = Self {
            netlist,
            order,
            state: Vec::new(),
        };
        sim.reset();
        Ok(sim)
    }

    pub fn reset(&mut self) {
        self.state = self
            .netlist
            .latches()
            .iter()
            .map(|l| l.init == LatchInit::One)
            .collect();
    }

    /// Evaluate the current step under `inputs` and advance the latches.
    pub fn step(&mut self, inputs: &[bool]) -> Result<StepValues> {
        let n = self.netlist;
        if inputs.len() != n.num_inputs() {
            return Err(Error::InvariantViolation(format!(
                "{} input values given, netlist has {} inputs",
                inputs.len(),
                n.num_inputs()
            )));
        }
        let mut values = vec![false; n.num_vars()];
        for (i, &v) in n.inputs().iter().zip(inputs.iter()) {
            values[*i.lit.var() as usize] = v;
        }
        for (l, &v) in n.latches().iter().zip(self.state.iter()) {
            values[*l.lit.var() as usize] = v;
        }
        let eval = |values: &[bool], l: Lit| values[*l.var() as usize] ^ !l.polarity();
        for &g in self.order.iter() {
            let g = n.ands()[g];
            values[*g.lhs.var() as usize] = eval(&values, g.rhs0) && eval(&values, g.rhs1);
        }
        self.state = n.latches().iter().map(|l| eval(&values, l.next)).collect();
        let outputs = n.outputs().iter().map(|s| eval(&values, s.lit)).collect();
        let bads = n.bads().iter().map(|s| eval(&values, s.lit)).collect();
        Ok(StepValues {
            values,
            outputs,
            bads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::AigerLit;

    #[test]
    fn shift_register() {
        let n: Netlist = "aag 4 1 2 1 1\n2\n4 2\n6 4 1\n8\n8 4 7\n".parse().unwrap();
        let mut sim = Simulator::new(&n).unwrap();
        let s = sim.step(&[true]).unwrap();
        // latch 6 starts at 1
        assert!(s.value(Lit::from_aiger(6)));
        assert!(!s.output(0));
        let s = sim.step(&[false]).unwrap();
        assert!(s.value(Lit::from_aiger(4)));
        assert!(!s.value(Lit::from_aiger(6)));
        assert!(s.output(0));
        assert!(matches!(sim.step(&[]), Err(Error::InvariantViolation(_))));
        sim.reset();
        assert!(!sim.step(&[false]).unwrap().value(Lit::from_aiger(4)));
    }
}
