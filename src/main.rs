use anyhow::Context;
use clap::Parser;
use kliveness::{Netlist, config::Config, reduce};
use log::{error, info};
use std::{
    env,
    io::{self, Read, Write},
    path::Path,
    process::exit,
};
use tempfile::NamedTempFile;

fn read_netlist(cfg: &Config) -> anyhow::Result<Netlist> {
    match &cfg.aiger {
        Some(path) => {
            info!("reading {}", path.display());
            Netlist::from_file(path).with_context(|| format!("cannot load {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            Ok(Netlist::parse(&text)?)
        }
    }
}

fn write_netlist(netlist: &Netlist, out: Option<&Path>) -> anyhow::Result<()> {
    let text = netlist.to_string();
    let Some(out) = out else {
        io::stdout().lock().write_all(text.as_bytes())?;
        return Ok(());
    };
    let dir = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temporary file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(out)
        .with_context(|| format!("cannot write {}", out.display()))?;
    info!("wrote {}", out.display());
    Ok(())
}

fn run(cfg: &Config) -> anyhow::Result<()> {
    let mut netlist = read_netlist(cfg)?;
    if cfg.fairness_as_justice {
        netlist.fairness_to_justice()?;
    }
    let mut source = cfg.counter_source();
    reduce(&mut netlist, source.as_mut(), &cfg.options())?;
    if cfg.single_output {
        netlist.compress_bads_into_output();
    }
    write_netlist(&netlist, cfg.out.as_deref())
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        unsafe { env::set_var("RUST_LOG", "info") };
    }
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
    let cfg = Config::parse();
    if let Err(e) = run(&cfg) {
        error!("{e:#}");
        exit(1);
    }
}
