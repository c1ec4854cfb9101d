pub mod config;
pub mod counter;
pub mod error;
pub mod l2s;
pub mod literal;
pub mod netlist;
pub mod relocate;
pub mod simulate;
pub mod splice;

pub use counter::{BinaryCounter, CounterFragment, CounterKind, CounterSource, SmvPipeline};
pub use error::{Error, Result};
pub use l2s::{L2sOptions, Reduction, reduce};
pub use literal::{Lit, Var};
pub use netlist::Netlist;
pub use relocate::Relocation;
pub use splice::splice;
