use super::{CounterKind, CounterSource};
use crate::{error::Result, literal::Lit, netlist::Netlist};
use log::debug;

/// Synthesises the counter natively as a saturating binary counter.
///
/// Inputs take the lowest variables, then one latch per state bit, then the
/// gates, which is the layout `aigtoaig -a` gives the pipeline's output.
#[derive(Clone, Copy, Default, Debug)]
pub struct BinaryCounter;

impl BinaryCounter {
    /// Number of state bits needed to hold `0..=k`.
    #[inline]
    pub fn width(k: u32) -> usize {
        ((u32::BITS - k.leading_zeros()) as usize).max(1)
    }

    pub fn build(k: u32, kind: CounterKind) -> Result<Netlist> {
        let mut n = Netlist::new();
        let reset = n.new_var().lit();
        n.add_input(reset, Some("reset"))?;
        let inc = match kind {
            CounterKind::Fairness => Lit::constant(true),
            CounterKind::Justice => {
                let inc = n.new_var().lit();
                n.add_input(inc, Some("inc"))?;
                inc
            }
        };
        let width = Self::width(k);
        let state: Vec<Lit> = (0..width).map(|_| n.new_var().lit()).collect();
        let overflow = n.new_ands(
            state
                .iter()
                .enumerate()
                .map(|(i, &s)| s.not_if((k >> i) & 1 == 0)),
        );
        let mut carry = n.new_and(inc, !overflow);
        let mut next = Vec::with_capacity(width);
        for (i, &s) in state.iter().enumerate() {
            let sum = n.new_xor(s, carry);
            next.push(n.new_and(sum, !reset));
            if i + 1 < width {
                carry = n.new_and(s, carry);
            }
        }
        for (i, (&s, &nx)) in state.iter().zip(next.iter()).enumerate() {
            n.add_latch(s, nx, Some(&format!("state[{i}]")))?;
        }
        n.add_output(overflow, Some("overflow"));
        debug!(
            "{kind} counter for k = {k}: {} latches, {} and gates",
            n.num_latches(),
            n.num_ands()
        );
        Ok(n)
    }
}

impl CounterSource for BinaryCounter {
    fn generate(&mut self, k: u32, kind: CounterKind) -> Result<Netlist> {
        Self::build(k, kind)
    }
}
