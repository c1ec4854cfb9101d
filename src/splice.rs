use crate::{
    counter::CounterFragment,
    error::{Error, Result},
    literal::Lit,
    netlist::Netlist,
    relocate::Relocation,
};

/// Only one justice property and one fairness constraint can be reduced.
pub fn ensure_single_liveness(host: &Netlist) -> Result<()> {
    if host.num_justice() > 1 || host.num_fairness() > 1 {
        return Err(Error::UnsupportedConfiguration(format!(
            "{} justice properties and {} fairness constraints, at most one of each is supported",
            host.num_justice(),
            host.num_fairness()
        )));
    }
    Ok(())
}

/// Copy the fragment's latches and gates into `host` through `relocation` and
/// declare the relocated overflow as a new bad property.
///
/// The host is only replaced once every latch and gate has been added and the
/// result is well formed; on error it is left as it was.
pub fn splice(
    host: &mut Netlist,
    fragment: &CounterFragment,
    relocation: &Relocation,
    overflow_name: &str,
) -> Result<Lit> {
    ensure_single_liveness(host)?;
    let mut staged = host.clone();
    let counter = fragment.netlist();
    for (i, l) in counter.latches().iter().enumerate() {
        staged.add_latch_with_init(
            relocation.map(l.lit),
            relocation.map(l.next),
            l.init,
            Some(&format!("k_counter[{i}]")),
        )?;
    }
    for g in counter.ands() {
        staged.add_and(
            relocation.map(g.lhs),
            relocation.map(g.rhs0),
            relocation.map(g.rhs1),
        )?;
    }
    let overflow = relocation.map(fragment.overflow());
    staged.add_bad(overflow, Some(overflow_name));
    staged
        .check()
        .map_err(|e| Error::InvariantViolation(format!("spliced netlist: {e}")))?;
    *host = staged;
    Ok(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        counter::{BinaryCounter, CounterKind},
        literal::{AigerLit, Var},
        netlist::LatchInit,
    };

    fn lit(l: u32) -> Lit {
        Lit::from_aiger(l)
    }

    fn host() -> Netlist {
        let mut n = Netlist::new();
        n.add_input(lit(2), Some("req")).unwrap();
        n.add_latch(lit(4), lit(6), Some("ack")).unwrap();
        n.add_and(lit(6), lit(2), lit(5)).unwrap();
        n.add_constraint(lit(3), None);
        n.add_justice(vec![lit(4)], None);
        n
    }

    #[test]
    fn splice_appends_counter() {
        let mut h = host();
        let before = h.clone();
        let f = CounterFragment::new(
            CounterKind::Justice,
            BinaryCounter::build(2, CounterKind::Justice).unwrap(),
        )
        .unwrap();
        let r = Relocation::build(&h, &f, lit(4), None).unwrap();
        let bad = splice(&mut h, &f, &r, "k-liveness").unwrap();
        assert_eq!(h.num_bad(), 1);
        assert_eq!(h.bads()[0].lit, bad);
        assert_eq!(h.bads()[0].name.as_deref(), Some("k-liveness"));
        assert_eq!(h.num_latches(), before.num_latches() + 2);
        assert_eq!(h.num_ands(), before.num_ands() + f.netlist().num_ands());
        assert_eq!(h.inputs(), before.inputs());
        assert_eq!(h.latches()[0], before.latches()[0]);
        assert_eq!(h.constraints(), before.constraints());
        assert_eq!(h.latches()[1].name.as_deref(), Some("k_counter[0]"));
        assert_eq!(h.latches()[1].init, LatchInit::Zero);
        assert!(h.maxvar() > before.maxvar());
        assert!(*bad.var() > before.maxvar());
        h.check().unwrap();
    }

    #[test]
    fn failed_splice_leaves_host_untouched() {
        let mut h = host();
        let before = h.clone();
        let f = CounterFragment::new(
            CounterKind::Fairness,
            BinaryCounter::build(3, CounterKind::Fairness).unwrap(),
        )
        .unwrap();
        let r = Relocation::build(&h, &f, lit(4), None).unwrap();
        // something else claims the first free variable after the map was built
        h.add_input(Var(h.maxvar() + 1).lit(), None).unwrap();
        let claimed = h.clone();
        assert!(matches!(
            splice(&mut h, &f, &r, "k-liveness"),
            Err(Error::InvariantViolation(_))
        ));
        assert_eq!(h, claimed);
        assert_ne!(h, before);
    }

    #[test]
    fn multiple_liveness_properties_are_rejected() {
        let mut h = host();
        h.add_justice(vec![lit(2)], None);
        let f = CounterFragment::new(
            CounterKind::Justice,
            BinaryCounter::build(2, CounterKind::Justice).unwrap(),
        )
        .unwrap();
        let r = Relocation::build(&h, &f, lit(4), None).unwrap();
        let before = h.clone();
        assert!(matches!(
            splice(&mut h, &f, &r, "k-liveness"),
            Err(Error::UnsupportedConfiguration(_))
        ));
        assert_eq!(h, before);
    }
}
