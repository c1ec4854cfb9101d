use super::{CounterKind, CounterSource};
use crate::{
    error::{Error, Result},
    netlist::Netlist,
};
use log::debug;
use process_control::{ChildExt, Control};
use std::{
    io::{ErrorKind, Write},
    process::{Command, Stdio},
    time::Duration,
};

pub const DEFAULT_PIPELINE: &str = "smvflatten | smvtoaig | aigmove | aigtoaig -a";

/// Flattens an SMV counter module into ascii AIGER with external tools.
#[derive(Clone, Debug)]
pub struct SmvPipeline {
    command: String,
    timeout: Option<Duration>,
}

impl Default for SmvPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_PIPELINE)
    }
}

impl SmvPipeline {
    /// `command` is run with `sh -c`, the module on stdin.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn module(k: u32, kind: CounterKind) -> String {
        let (inc_var, step) = match kind {
            CounterKind::Fairness => ("", format!("state < {k}: state + 1;")),
            CounterKind::Justice => (
                "  inc: boolean;\n",
                format!("inc & state < {k}: state + 1;"),
            ),
        };
        format!(
            "MODULE main\n\
             VAR\n  state: 0..{k};\n\
             IVAR\n  reset: boolean;\n{inc_var}\
             DEFINE\n  overflow := state = {k};\n\
             ASSIGN\n  init(state) := 0;\n  next(state) := case\n    reset: 0;\n    {step}\n    TRUE: state;\n  esac;\n\
             SPEC\n  AG !overflow\n"
        )
    }
}

impl CounterSource for SmvPipeline {
    fn generate(&mut self, k: u32, kind: CounterKind) -> Result<Netlist> {
        let module = Self::module(k, kind);
        debug!("counter pipeline: {}", self.command);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Generation(format!("cannot run '{}': {e}", self.command)))?;
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(module.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(Error::Generation(format!("cannot feed counter module: {e}")));
                }
                _ => {}
            }
        }
        let mut control = child.controlled_with_output();
        if let Some(t) = self.timeout {
            control = control.time_limit(t).terminate_for_timeout();
        }
        let output = control
            .wait()
            .map_err(|e| Error::Generation(format!("counter pipeline failed: {e}")))?
            .ok_or_else(|| {
                Error::Generation(format!(
                    "counter pipeline timed out after {:?}",
                    self.timeout.unwrap_or_default()
                ))
            })?;
        if !output.status.success() {
            debug!("{}", String::from_utf8_lossy(&output.stdout));
            return Err(Error::Generation(format!(
                "counter pipeline exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Netlist::parse(&String::from_utf8_lossy(&output.stdout))
            .map_err(|e| Error::Generation(format!("counter pipeline output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        counter::generate,
        literal::{AigerLit, Var},
    };

    #[test]
    fn module_declares_inputs_per_kind() {
        let m = SmvPipeline::module(3, CounterKind::Justice);
        assert!(m.contains("state: 0..3;"));
        assert!(m.contains("inc: boolean;"));
        assert!(m.contains("overflow := state = 3;"));
        let m = SmvPipeline::module(3, CounterKind::Fairness);
        assert!(!m.contains("inc"));
        assert!(m.contains("reset: boolean;"));
    }

    #[test]
    fn parses_pipeline_output() {
        let mut p = SmvPipeline::new(
            "cat > /dev/null; printf 'aag 3 1 1 1 1\\n2\\n4 6\\n4\\n6 5 3\\ni0 reset\\n'",
        );
        let f = generate(&mut p, 1, CounterKind::Fairness).unwrap();
        assert_eq!(f.netlist().num_latches(), 1);
        assert_eq!(f.reset(), Var(1));
        assert_eq!(f.overflow().aiger(), 4);
    }

    #[test]
    fn failing_pipeline_is_a_generation_error() {
        let mut p = SmvPipeline::new("cat > /dev/null; echo broken >&2; exit 3");
        assert!(matches!(
            generate(&mut p, 2, CounterKind::Justice),
            Err(Error::Generation(_))
        ));
        let mut p = SmvPipeline::new("cat > /dev/null; echo 'aag 1 1 0 0 0'");
        assert!(matches!(
            generate(&mut p, 2, CounterKind::Justice),
            Err(Error::Generation(_))
        ));
    }

    #[test]
    fn pipeline_timeout() {
        let mut p = SmvPipeline::new("exec sleep 5").timeout(Duration::from_millis(200));
        assert!(matches!(
            generate(&mut p, 2, CounterKind::Justice),
            Err(Error::Generation(_))
        ));
    }
}
