use crate::{
    counter::{self, CounterKind, CounterSource},
    error::{Error, Result},
    literal::{AigerLit, Lit},
    netlist::Netlist,
    relocate::Relocation,
    splice::{ensure_single_liveness, splice},
};
use log::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct L2sOptions {
    /// Counter bound; the bad output rises once the count reaches it.
    pub k: u32,
    /// Keep the reduced liveness declarations next to the new bad output.
    pub keep_liveness: bool,
    pub overflow_name: String,
}

impl Default for L2sOptions {
    fn default() -> Self {
        Self {
            k: 2,
            keep_liveness: false,
            overflow_name: "k-liveness".to_string(),
        }
    }
}

/// What a reduction splices and where the counter inputs are wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reduction {
    kind: CounterKind,
    reset_target: Lit,
    inc_target: Option<Lit>,
}

impl Reduction {
    /// `None` when the host has no liveness property to reduce.
    pub fn plan(host: &Netlist) -> Result<Option<Self>> {
        ensure_single_liveness(host)?;
        let fairness = host.fairness_literal(0);
        let Some(justice) = host.justice().first() else {
            return Ok(fairness.map(|f| Self {
                kind: CounterKind::Fairness,
                reset_target: f,
                inc_target: None,
            }));
        };
        let &[reset_target] = justice.lits.as_slice() else {
            return Err(Error::UnsupportedConfiguration(format!(
                "justice property with {} literals, exactly one is supported",
                justice.lits.len()
            )));
        };
        Ok(Some(Self {
            kind: CounterKind::Justice,
            reset_target,
            inc_target: fairness,
        }))
    }

    #[inline]
    pub fn kind(&self) -> CounterKind {
        self.kind
    }

    #[inline]
    pub fn reset_target(&self) -> Lit {
        self.reset_target
    }

    #[inline]
    pub fn inc_target(&self) -> Option<Lit> {
        self.inc_target
    }

    /// Drop the declarations this reduction accounts for. A fairness
    /// constraint wired into the counter increment is consumed with the
    /// justice property.
    pub fn neutralize(&self, host: &mut Netlist) {
        match self.kind {
            CounterKind::Justice => {
                host.remove_justice(0);
                if self.inc_target.is_some() {
                    host.remove_fairness(0);
                }
            }
            CounterKind::Fairness => {
                host.remove_fairness(0);
            }
        }
    }

    /// Generate, relocate and splice the counter, then neutralize the
    /// reduced property unless it is kept. Returns the new bad literal.
    pub fn apply(
        &self,
        host: &mut Netlist,
        source: &mut dyn CounterSource,
        options: &L2sOptions,
    ) -> Result<Lit> {
        let fragment = counter::generate(source, options.k, self.kind)?;
        let relocation = Relocation::build(host, &fragment, self.reset_target, self.inc_target)?;
        debug!(
            "relocating {} counter latches and {} gates with shift {}",
            fragment.netlist().num_latches(),
            fragment.netlist().num_ands(),
            relocation.shift()
        );
        let bad = splice(host, &fragment, &relocation, &options.overflow_name)?;
        if !options.keep_liveness {
            self.neutralize(host);
        }
        Ok(bad)
    }
}

/// Reduce the host's justice or fairness property to a k-bounded safety
/// property. The host is unchanged when it has no liveness property or when
/// any step fails.
pub fn reduce(
    host: &mut Netlist,
    source: &mut dyn CounterSource,
    options: &L2sOptions,
) -> Result<Option<Lit>> {
    let Some(reduction) = Reduction::plan(host)? else {
        warn!("no justice or fairness property found, netlist left unchanged");
        return Ok(None);
    };
    info!(
        "reducing {} property {} to safety with k = {}",
        reduction.kind,
        reduction.reset_target.aiger(),
        options.k
    );
    if let Some(fair) = reduction.inc_target {
        info!("fairness {} gates the counter increment", fair.aiger());
    }
    let (latches, ands) = (host.num_latches(), host.num_ands());
    let bad = reduction.apply(host, source, options)?;
    info!(
        "added bad property {} with {} latches and {} and gates",
        bad.aiger(),
        host.num_latches() - latches,
        host.num_ands() - ands
    );
    Ok(Some(bad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{counter::BinaryCounter, simulate::Simulator};

    fn lit(l: u32) -> Lit {
        Lit::from_aiger(l)
    }

    /// One input `2` that drives the liveness property directly.
    fn direct(justice: bool, fairness: bool) -> Netlist {
        let mut n = Netlist::new();
        n.add_input(lit(2), Some("p")).unwrap();
        n.add_input(lit(4), Some("q")).unwrap();
        if justice {
            n.add_justice(vec![lit(2)], Some("live"));
        }
        if fairness {
            n.add_fairness(lit(4), Some("fair"));
        }
        n
    }

    fn options(k: u32) -> L2sOptions {
        L2sOptions {
            k,
            ..Default::default()
        }
    }

    /// First step at which bad property `0` is raised.
    fn first_bad(n: &Netlist, inputs: impl Fn(usize) -> Vec<bool>, steps: usize) -> Option<usize> {
        let mut sim = Simulator::new(n).unwrap();
        (0..steps).find(|&t| sim.step(&inputs(t)).unwrap().bad(0))
    }

    #[test]
    fn plan_follows_declared_properties() {
        assert_eq!(Reduction::plan(&direct(false, false)).unwrap(), None);
        let r = Reduction::plan(&direct(true, false)).unwrap().unwrap();
        assert_eq!(r.kind(), CounterKind::Justice);
        assert_eq!(r.reset_target(), lit(2));
        assert_eq!(r.inc_target(), None);
        let r = Reduction::plan(&direct(true, true)).unwrap().unwrap();
        assert_eq!(r.kind(), CounterKind::Justice);
        assert_eq!(r.inc_target(), Some(lit(4)));
        let r = Reduction::plan(&direct(false, true)).unwrap().unwrap();
        assert_eq!(r.kind(), CounterKind::Fairness);
        assert_eq!(r.reset_target(), lit(4));
        let mut wide = direct(false, false);
        wide.add_justice(vec![lit(2), lit(4)], None);
        assert!(matches!(
            Reduction::plan(&wide),
            Err(Error::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn passthrough_without_liveness() {
        let mut n = direct(false, false);
        n.add_bad(lit(3), None);
        let before = n.clone();
        let res = reduce(&mut n, &mut BinaryCounter, &options(2)).unwrap();
        assert_eq!(res, None);
        assert_eq!(n, before);
    }

    #[test]
    fn two_justice_properties_are_unsupported() {
        let mut n = direct(true, false);
        n.add_justice(vec![lit(4)], None);
        let before = n.clone();
        assert!(matches!(
            reduce(&mut n, &mut BinaryCounter, &options(2)),
            Err(Error::UnsupportedConfiguration(_))
        ));
        assert_eq!(n, before);
        let mut n = direct(false, true);
        n.add_fairness(lit(2), None);
        assert!(matches!(
            reduce(&mut n, &mut BinaryCounter, &options(2)),
            Err(Error::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn property_counts_after_reduction() {
        let mut n = direct(true, false);
        reduce(&mut n, &mut BinaryCounter, &options(3)).unwrap();
        assert_eq!((n.num_justice(), n.num_fairness(), n.num_bad()), (0, 0, 1));
        assert_eq!(n.num_inputs(), 2);

        let mut n = direct(false, true);
        reduce(&mut n, &mut BinaryCounter, &options(3)).unwrap();
        assert_eq!((n.num_justice(), n.num_fairness(), n.num_bad()), (0, 0, 1));

        let mut n = direct(true, true);
        reduce(&mut n, &mut BinaryCounter, &options(3)).unwrap();
        assert_eq!((n.num_justice(), n.num_fairness(), n.num_bad()), (0, 0, 1));

        let mut n = direct(true, true);
        let keep = L2sOptions {
            keep_liveness: true,
            ..options(3)
        };
        reduce(&mut n, &mut BinaryCounter, &keep).unwrap();
        assert_eq!((n.num_justice(), n.num_fairness(), n.num_bad()), (1, 1, 1));
        assert_eq!(n.justice()[0].name.as_deref(), Some("live"));
    }

    #[test]
    fn fairness_bound_one() {
        let mut n = direct(false, true);
        reduce(&mut n, &mut BinaryCounter, &options(1)).unwrap();
        assert_eq!(first_bad(&n, |_| vec![false, false], 16), Some(1));
        assert_eq!(first_bad(&n, |_| vec![false, true], 16), None);
    }

    #[test]
    fn justice_counts_only_fair_steps() {
        let mut n = direct(true, true);
        reduce(&mut n, &mut BinaryCounter, &options(2)).unwrap();
        // never just, fair every other step: fair at steps 0 and 2
        assert_eq!(first_bad(&n, |t| vec![false, t % 2 == 0], 16), Some(3));
        // never fair: the counter never moves
        assert_eq!(first_bad(&n, |_| vec![false, false], 16), None);
        // just whenever fair
        assert_eq!(first_bad(&n, |_| vec![true, true], 16), None);
    }

    #[test]
    fn failing_source_leaves_host_untouched() {
        let mut n = direct(true, false);
        let before = n.clone();
        let mut broken = |_k: u32, _kind: CounterKind| -> Result<Netlist> {
            Err(Error::Generation("tool missing".to_string()))
        };
        assert!(matches!(
            reduce(&mut n, &mut broken, &options(2)),
            Err(Error::Generation(_))
        ));
        assert_eq!(n, before);
    }
}
