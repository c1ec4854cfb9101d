use crate::{
    counter::{BinaryCounter, CounterSource, DEFAULT_PIPELINE, SmvPipeline},
    l2s::L2sOptions,
};
use clap::{Parser, ValueEnum};
use std::{path::PathBuf, time::Duration};

/// Reduce a justice or fairness property of an ascii AIGER netlist to a
/// k-liveness safety property
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// input netlist in ascii aiger format, stdin when omitted
    pub aiger: Option<PathBuf>,

    /// output path, stdout when omitted
    pub out: Option<PathBuf>,

    /// counter bound
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub k: u32,

    /// keep the reduced liveness property declared next to the new bad output
    #[arg(short, long, default_value_t = false)]
    pub new: bool,

    /// counter generator
    #[arg(long, value_enum, default_value_t = Generator::Builtin)]
    pub generator: Generator,

    /// shell pipeline turning an smv counter module into ascii aiger
    #[arg(long, default_value = DEFAULT_PIPELINE)]
    pub pipeline: String,

    /// time limit of the smv pipeline in seconds
    #[arg(long = "generator-timeout")]
    pub generator_timeout: Option<u64>,

    /// name of the new bad property
    #[arg(long = "overflow-name", default_value = "k-liveness")]
    pub overflow_name: String,

    /// read a single fairness constraint as a justice property
    #[arg(long = "fairness-as-justice", default_value_t = false)]
    pub fairness_as_justice: bool,

    /// merge outputs and bad properties into a single output; older
    /// reducers wrote this legacy form by default, here it is opt-in
    #[arg(long = "single-output", default_value_t = false)]
    pub single_output: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug, PartialEq, Eq)]
pub enum Generator {
    /// built-in binary counter
    Builtin,
    /// smv module flattened by an external pipeline
    Smv,
}

impl Config {
    pub fn options(&self) -> L2sOptions {
        L2sOptions {
            k: self.k,
            keep_liveness: self.new,
            overflow_name: self.overflow_name.clone(),
        }
    }

    pub fn counter_source(&self) -> Box<dyn CounterSource> {
        match self.generator {
            Generator::Builtin => Box::new(BinaryCounter),
            Generator::Smv => {
                let mut p = SmvPipeline::new(self.pipeline.clone());
                if let Some(t) = self.generator_timeout {
                    p = p.timeout(Duration::from_secs(t));
                }
                Box::new(p)
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from([""])
    }
}
