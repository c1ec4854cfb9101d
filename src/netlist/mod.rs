mod parse;
mod write;

use crate::{
    error::{Error, Result},
    literal::{AigerLit, Lit, Var},
};
use std::fmt::{self, Display};

/// Latch reset value, the optional third token of an AIGER 1.9 latch line.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum LatchInit {
    #[default]
    Zero,
    One,
    Uninit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub lit: Lit,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Latch {
    pub lit: Lit,
    pub next: Lit,
    pub init: LatchInit,
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AndGate {
    pub lhs: Lit,
    pub rhs0: Lit,
    pub rhs1: Lit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Justice {
    pub lits: Vec<Lit>,
    pub name: Option<String>,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
enum Role {
    #[default]
    Free,
    Input(usize),
    Latch(usize),
    And(usize),
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Free => write!(f, "free"),
            Role::Input(i) => write!(f, "input {i}"),
            Role::Latch(i) => write!(f, "latch {i}"),
            Role::And(i) => write!(f, "and gate {i}"),
        }
    }
}

/// And-inverter graph with AIGER 1.9 properties.
///
/// Every section keeps insertion order. A variable is defined by at most one
/// input, latch or gate, and `maxvar` bounds every literal the netlist
/// mentions, including forward references to gates not yet added.
#[derive(Clone, Default, Debug)]
pub struct Netlist {
    maxvar: u32,
    inputs: Vec<Symbol>,
    latches: Vec<Latch>,
    ands: Vec<AndGate>,
    outputs: Vec<Symbol>,
    bads: Vec<Symbol>,
    constraints: Vec<Symbol>,
    justice: Vec<Justice>,
    fairness: Vec<Symbol>,
    comments: Vec<String>,
    // indexed by variable, grown on first mention
    roles: Vec<Role>,
}

impl PartialEq for Netlist {
    fn eq(&self, other: &Self) -> bool {
        self.maxvar == other.maxvar
            && self.inputs == other.inputs
            && self.latches == other.latches
            && self.ands == other.ands
            && self.outputs == other.outputs
            && self.bads == other.bads
            && self.constraints == other.constraints
            && self.justice == other.justice
            && self.fairness == other.fairness
            && self.comments == other.comments
    }
}

impl Eq for Netlist {}

impl Netlist {
    pub fn new() -> Self {
        Self {
            roles: vec![Role::Free],
            ..Default::default()
        }
    }

    #[inline]
    pub fn maxvar(&self) -> u32 {
        self.maxvar
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[inline]
    pub fn num_latches(&self) -> usize {
        self.latches.len()
    }

    #[inline]
    pub fn num_ands(&self) -> usize {
        self.ands.len()
    }

    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    #[inline]
    pub fn num_bad(&self) -> usize {
        self.bads.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    #[inline]
    pub fn num_justice(&self) -> usize {
        self.justice.len()
    }

    #[inline]
    pub fn num_fairness(&self) -> usize {
        self.fairness.len()
    }

    /// Outputs, bad, justice and fairness properties together.
    pub fn num_properties(&self) -> usize {
        self.outputs.len() + self.bads.len() + self.justice.len() + self.fairness.len()
    }

    /// One past the highest variable any declaration mentions. Can be far
    /// below `maxvar` for a header that declares unused variables.
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.roles.len().max(1)
    }

    pub fn inputs(&self) -> &[Symbol] {
        &self.inputs
    }

    pub fn latches(&self) -> &[Latch] {
        &self.latches
    }

    pub fn ands(&self) -> &[AndGate] {
        &self.ands
    }

    pub fn outputs(&self) -> &[Symbol] {
        &self.outputs
    }

    pub fn bads(&self) -> &[Symbol] {
        &self.bads
    }

    pub fn constraints(&self) -> &[Symbol] {
        &self.constraints
    }

    pub fn justice(&self) -> &[Justice] {
        &self.justice
    }

    pub fn fairness(&self) -> &[Symbol] {
        &self.fairness
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    #[inline]
    fn role(&self, v: Var) -> Role {
        self.roles.get(*v as usize).copied().unwrap_or_default()
    }

    #[inline]
    pub fn is_input(&self, v: Var) -> bool {
        matches!(self.role(v), Role::Input(_))
    }

    #[inline]
    pub fn is_latch(&self, v: Var) -> bool {
        matches!(self.role(v), Role::Latch(_))
    }

    #[inline]
    pub fn is_and(&self, v: Var) -> bool {
        matches!(self.role(v), Role::And(_))
    }

    /// Whether `v` is a constant or defined by an input, latch or gate.
    #[inline]
    pub fn is_defined(&self, v: Var) -> bool {
        v.is_constant() || !matches!(self.role(v), Role::Free)
    }

    /// Symbol name of the input or latch defining `v`.
    pub fn name_of(&self, v: Var) -> Option<&str> {
        match self.role(v) {
            Role::Input(i) => self.inputs[i].name.as_deref(),
            Role::Latch(i) => self.latches[i].name.as_deref(),
            _ => None,
        }
    }

    fn reserve_var(&mut self, v: Var) {
        if *v > self.maxvar {
            self.maxvar = *v;
        }
        if self.roles.len() <= *v as usize {
            self.roles.resize(*v as usize + 1, Role::Free);
        }
    }

    #[inline]
    fn reference(&mut self, lit: Lit) {
        self.reserve_var(lit.var());
    }

    fn define(&mut self, lit: Lit, what: &str) -> Result<Var> {
        let raw = lit.aiger();
        if lit.is_negated() {
            return Err(Error::InvariantViolation(format!(
                "{what} literal {raw} is negated"
            )));
        }
        let v = lit.var();
        if v.is_constant() {
            return Err(Error::InvariantViolation(format!(
                "{what} literal {raw} is reserved for constants"
            )));
        }
        match self.role(v) {
            Role::Free => {
                self.reserve_var(v);
                Ok(v)
            }
            role => Err(Error::InvariantViolation(format!(
                "{what} literal {raw} is already defined as {role}"
            ))),
        }
    }

    /// Allocate a fresh, undefined variable above `maxvar`.
    pub fn new_var(&mut self) -> Var {
        let v = Var(self.maxvar + 1);
        self.reserve_var(v);
        v
    }

    pub fn add_input(&mut self, lit: Lit, name: Option<&str>) -> Result<()> {
        let v = self.define(lit, "input")?;
        self.roles[*v as usize] = Role::Input(self.inputs.len());
        self.inputs.push(Symbol {
            lit,
            name: name.map(str::to_string),
        });
        Ok(())
    }

    pub fn add_latch(&mut self, lit: Lit, next: Lit, name: Option<&str>) -> Result<()> {
        self.add_latch_with_init(lit, next, LatchInit::Zero, name)
    }

    pub fn add_latch_with_init(
        &mut self,
        lit: Lit,
        next: Lit,
        init: LatchInit,
        name: Option<&str>,
    ) -> Result<()> {
        let v = self.define(lit, "latch")?;
        self.reference(next);
        self.roles[*v as usize] = Role::Latch(self.latches.len());
        self.latches.push(Latch {
            lit,
            next,
            init,
            name: name.map(str::to_string),
        });
        Ok(())
    }

    pub fn add_and(&mut self, lit: Lit, rhs0: Lit, rhs1: Lit) -> Result<()> {
        let v = self.define(lit, "and gate")?;
        self.reference(rhs0);
        self.reference(rhs1);
        self.roles[*v as usize] = Role::And(self.ands.len());
        self.ands.push(AndGate {
            lhs: lit,
            rhs0,
            rhs1,
        });
        Ok(())
    }

    pub fn add_output(&mut self, lit: Lit, name: Option<&str>) {
        self.reference(lit);
        self.outputs.push(Symbol {
            lit,
            name: name.map(str::to_string),
        });
    }

    pub fn add_bad(&mut self, lit: Lit, name: Option<&str>) {
        self.reference(lit);
        self.bads.push(Symbol {
            lit,
            name: name.map(str::to_string),
        });
    }

    pub fn add_constraint(&mut self, lit: Lit, name: Option<&str>) {
        self.reference(lit);
        self.constraints.push(Symbol {
            lit,
            name: name.map(str::to_string),
        });
    }

    pub fn add_justice(&mut self, lits: Vec<Lit>, name: Option<&str>) {
        for &l in lits.iter() {
            self.reference(l);
        }
        self.justice.push(Justice {
            lits,
            name: name.map(str::to_string),
        });
    }

    pub fn add_fairness(&mut self, lit: Lit, name: Option<&str>) {
        self.reference(lit);
        self.fairness.push(Symbol {
            lit,
            name: name.map(str::to_string),
        });
    }

    pub fn justice_literal(&self, index: usize, slot: usize) -> Option<Lit> {
        self.justice.get(index)?.lits.get(slot).copied()
    }

    pub fn set_justice_literal(&mut self, index: usize, slot: usize, lit: Lit) -> Result<()> {
        let Some(l) = self
            .justice
            .get_mut(index)
            .and_then(|j| j.lits.get_mut(slot))
        else {
            return Err(Error::InvariantViolation(format!(
                "no justice literal at {index}:{slot}"
            )));
        };
        *l = lit;
        self.reference(lit);
        Ok(())
    }

    pub fn fairness_literal(&self, index: usize) -> Option<Lit> {
        self.fairness.get(index).map(|f| f.lit)
    }

    pub fn set_fairness_literal(&mut self, index: usize, lit: Lit) -> Result<()> {
        let Some(f) = self.fairness.get_mut(index) else {
            return Err(Error::InvariantViolation(format!(
                "no fairness literal at {index}"
            )));
        };
        f.lit = lit;
        self.reference(lit);
        Ok(())
    }

    /// Drop a justice declaration. The signals it referenced stay defined.
    pub fn remove_justice(&mut self, index: usize) -> Option<Justice> {
        (index < self.justice.len()).then(|| self.justice.remove(index))
    }

    /// Drop a fairness declaration. The signal it referenced stays defined.
    pub fn remove_fairness(&mut self, index: usize) -> Option<Symbol> {
        (index < self.fairness.len()).then(|| self.fairness.remove(index))
    }

    pub fn new_and(&mut self, a: Lit, b: Lit) -> Lit {
        let (f, t) = (Lit::constant(false), Lit::constant(true));
        if a == f || b == f || a == !b {
            return f;
        }
        if a == t || a == b {
            return b;
        }
        if b == t {
            return a;
        }
        let v = self.new_var();
        self.roles[*v as usize] = Role::And(self.ands.len());
        self.ands.push(AndGate {
            lhs: v.lit(),
            rhs0: a,
            rhs1: b,
        });
        v.lit()
    }

    #[inline]
    pub fn new_or(&mut self, a: Lit, b: Lit) -> Lit {
        !self.new_and(!a, !b)
    }

    pub fn new_xor(&mut self, a: Lit, b: Lit) -> Lit {
        let l = self.new_and(a, !b);
        let r = self.new_and(!a, b);
        self.new_or(l, r)
    }

    pub fn new_ands(&mut self, lits: impl IntoIterator<Item = Lit>) -> Lit {
        lits.into_iter()
            .fold(Lit::constant(true), |acc, l| self.new_and(acc, l))
    }

    pub fn new_ors(&mut self, lits: impl IntoIterator<Item = Lit>) -> Lit {
        lits.into_iter()
            .fold(Lit::constant(false), |acc, l| self.new_or(acc, l))
    }

    fn referenced(&self) -> impl Iterator<Item = Lit> + '_ {
        self.latches
            .iter()
            .map(|l| l.next)
            .chain(self.ands.iter().flat_map(|g| [g.rhs0, g.rhs1]))
            .chain(self.outputs.iter().map(|s| s.lit))
            .chain(self.bads.iter().map(|s| s.lit))
            .chain(self.constraints.iter().map(|s| s.lit))
            .chain(self.justice.iter().flat_map(|j| j.lits.iter().copied()))
            .chain(self.fairness.iter().map(|s| s.lit))
    }

    /// Gate indices ordered so that every gate comes after the gates it reads.
    pub fn topo_ands(&self) -> Result<Vec<usize>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            New,
            Active,
            Done,
        }
        let mut mark = vec![Mark::New; self.ands.len()];
        let mut order = Vec::with_capacity(self.ands.len());
        for root in 0..self.ands.len() {
            if mark[root] != Mark::New {
                continue;
            }
            let mut stack = vec![(root, false)];
            while let Some((g, expanded)) = stack.pop() {
                if expanded {
                    mark[g] = Mark::Done;
                    order.push(g);
                    continue;
                }
                match mark[g] {
                    Mark::Done => continue,
                    Mark::Active => {
                        return Err(Error::Format(format!(
                            "combinational cycle through and gate {}",
                            self.ands[g].lhs.aiger()
                        )));
                    }
                    Mark::New => {}
                }
                mark[g] = Mark::Active;
                stack.push((g, true));
                let gate = self.ands[g];
                for rhs in [gate.rhs0, gate.rhs1] {
                    if let Role::And(c) = self.role(rhs.var()) {
                        if mark[c] != Mark::Done {
                            stack.push((c, false));
                        }
                    }
                }
            }
        }
        Ok(order)
    }

    /// Every referenced literal is defined and the gates are acyclic.
    pub fn check(&self) -> Result<()> {
        if let Some(l) = self.referenced().find(|l| !self.is_defined(l.var())) {
            return Err(Error::Format(format!(
                "dangling literal reference {}",
                l.aiger()
            )));
        }
        self.topo_ands().map(|_| ())
    }

    /// Turn the single fairness constraint into a one-literal justice property,
    /// keeping its name or naming it `AIGER_JUSTICE_0`.
    pub fn fairness_to_justice(&mut self) -> Result<()> {
        if self.fairness.is_empty() {
            return Ok(());
        }
        if self.fairness.len() > 1 || !self.justice.is_empty() {
            return Err(Error::UnsupportedConfiguration(format!(
                "cannot move {} fairness constraints next to {} justice properties",
                self.fairness.len(),
                self.justice.len()
            )));
        }
        let fair = self.fairness.remove(0);
        self.justice.push(Justice {
            lits: vec![fair.lit],
            name: fair.name.or_else(|| Some("AIGER_JUSTICE_0".to_string())),
        });
        Ok(())
    }

    /// OR all plain outputs and bad properties into one plain output.
    pub fn compress_bads_into_output(&mut self) {
        if self.bads.is_empty() {
            return;
        }
        let props: Vec<Lit> = self
            .outputs
            .drain(..)
            .chain(self.bads.drain(..))
            .map(|s| s.lit)
            .collect();
        let lit = self.new_ors(props);
        self.add_output(lit, None);
    }
}
