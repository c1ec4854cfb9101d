use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed netlist text, or a netlist that is not well formed.
    #[error("malformed netlist: {0}")]
    Format(String),

    /// The counter generator failed or produced an unusable fragment.
    #[error("counter generation failed: {0}")]
    Generation(String),

    /// The fragment does not fit the requested input wiring.
    #[error("relocation failed: {0}")]
    Relocation(String),

    /// A mutation would alias two declarations onto one variable.
    #[error("netlist invariant violated: {0}")]
    InvariantViolation(String),

    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
