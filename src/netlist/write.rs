use super::{LatchInit, Netlist, Symbol};
use crate::literal::AigerLit;
use std::fmt::{self, Display};

fn write_symbols(f: &mut fmt::Formatter<'_>, tag: char, symbols: &[Symbol]) -> fmt::Result {
    for (i, s) in symbols.iter().enumerate() {
        if let Some(name) = &s.name {
            writeln!(f, "{tag}{i} {name}")?;
        }
    }
    Ok(())
}

impl Display for Netlist {
    /// ASCII AIGER 1.9. The `B C J F` header fields are printed up to the
    /// last non-zero one.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aag {} {} {} {} {}",
            self.maxvar,
            self.inputs.len(),
            self.latches.len(),
            self.outputs.len(),
            self.ands.len()
        )?;
        let extra = [
            self.bads.len(),
            self.constraints.len(),
            self.justice.len(),
            self.fairness.len(),
        ];
        let used = extra.iter().rposition(|&c| c > 0).map_or(0, |p| p + 1);
        for c in &extra[..used] {
            write!(f, " {c}")?;
        }
        writeln!(f)?;

        for i in self.inputs.iter() {
            writeln!(f, "{}", i.lit.aiger())?;
        }
        for l in self.latches.iter() {
            let (lit, next) = (l.lit.aiger(), l.next.aiger());
            match l.init {
                LatchInit::Zero => writeln!(f, "{lit} {next}")?,
                LatchInit::One => writeln!(f, "{lit} {next} 1")?,
                LatchInit::Uninit => writeln!(f, "{lit} {next} {lit}")?,
            }
        }
        for s in self
            .outputs
            .iter()
            .chain(self.bads.iter())
            .chain(self.constraints.iter())
        {
            writeln!(f, "{}", s.lit.aiger())?;
        }
        for j in self.justice.iter() {
            writeln!(f, "{}", j.lits.len())?;
        }
        for l in self.justice.iter().flat_map(|j| j.lits.iter()) {
            writeln!(f, "{}", l.aiger())?;
        }
        for s in self.fairness.iter() {
            writeln!(f, "{}", s.lit.aiger())?;
        }
        for g in self.ands.iter() {
            writeln!(
                f,
                "{} {} {}",
                g.lhs.aiger(),
                g.rhs0.aiger(),
                g.rhs1.aiger()
            )?;
        }

        write_symbols(f, 'i', &self.inputs)?;
        for (i, l) in self.latches.iter().enumerate() {
            if let Some(name) = &l.name {
                writeln!(f, "l{i} {name}")?;
            }
        }
        write_symbols(f, 'o', &self.outputs)?;
        write_symbols(f, 'b', &self.bads)?;
        write_symbols(f, 'c', &self.constraints)?;
        for (i, j) in self.justice.iter().enumerate() {
            if let Some(name) = &j.name {
                writeln!(f, "j{i} {name}")?;
            }
        }
        write_symbols(f, 'f', &self.fairness)?;

        if !self.comments.is_empty() {
            writeln!(f, "c")?;
            for c in self.comments.iter() {
                writeln!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        literal::{AigerLit, Lit},
        netlist::Netlist,
    };

    #[test]
    fn writes_built_netlist() {
        let mut n = Netlist::new();
        n.add_input(Lit::from_aiger(2), Some("req")).unwrap();
        n.add_latch(Lit::from_aiger(4), Lit::from_aiger(6), Some("busy"))
            .unwrap();
        n.add_and(Lit::from_aiger(6), Lit::from_aiger(2), Lit::from_aiger(5))
            .unwrap();
        n.add_fairness(Lit::from_aiger(4), None);
        n.add_comment("generated");
        assert_eq!(
            n.to_string(),
            "aag 3 1 1 0 1 0 0 0 1\n2\n4 6\n4\n6 2 5\ni0 req\nl0 busy\nc\ngenerated\n"
        );
    }

    #[test]
    fn plain_header_without_properties() {
        let mut n = Netlist::new();
        n.add_input(Lit::from_aiger(2), None).unwrap();
        n.add_output(Lit::from_aiger(3), None);
        assert_eq!(n.to_string(), "aag 1 1 0 1 0\n2\n3\n");
    }
}
