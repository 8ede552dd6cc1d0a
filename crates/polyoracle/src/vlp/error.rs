use std::fmt;

/// What is wrong with a VLP statement.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A data statement appeared before the `p` line.
    BeforeProblemLine { statement: char },
    SecondProblemLine,
    /// Unparsable `p` line or dimensions out of range.
    BadProblemLine,
    /// Wrong arity, index out of range, or bound code/value mismatch.
    BadStatement { statement: char },
    UnknownStatement,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::BeforeProblemLine { statement } => {
                write!(f, "{statement} line before p line")
            }
            FormatError::SecondProblemLine => write!(f, "second p line"),
            FormatError::BadProblemLine => write!(f, "wrong p line"),
            FormatError::BadStatement { statement } => write!(f, "wrong {statement} line"),
            FormatError::UnknownStatement => write!(f, "unknown line"),
        }
    }
}

/// Errors surfaced while loading a VLP file.
#[derive(Debug)]
pub enum LoadError {
    Io {
        source: String,
        err: std::io::Error,
    },
    Format {
        source: String,
        line: usize,
        text: String,
        kind: FormatError,
    },
    MissingProblemLine {
        source: String,
    },
    /// Dimensions too large to allocate the model.
    TooLarge {
        rows: usize,
        cols: usize,
        objs: usize,
    },
    /// The polytope tolerance is not a positive finite number.
    Tolerance {
        eps: f64,
    },
    /// Interior point coordinate (1-based) not finite or not above the tolerance.
    InteriorPoint {
        index: usize,
        value: f64,
    },
}

impl LoadError {
    /// Emit the fatal report for this error and hand it back.
    pub(crate) fn reported(self) -> Self {
        tracing::error!("fatal: {self}");
        self
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { source, err } => {
                write!(f, "cannot read vlp file {source}: {err}")
            }
            LoadError::Format {
                source,
                line,
                text,
                kind,
            } => write!(f, "read_vlp: {kind} in {source}:{line}\n   {text}"),
            LoadError::MissingProblemLine { source } => {
                write!(f, "read_vlp: no 'p' line in {source}")
            }
            LoadError::TooLarge { rows, cols, objs } => write!(
                f,
                "read_vlp: problem too large (rows={rows}, cols={cols}, objs={objs})"
            ),
            LoadError::Tolerance { eps } => {
                write!(f, "read_vlp: tolerance eps={eps} must be positive")
            }
            LoadError::InteriorPoint { index, value } => {
                write!(f, "read_vlp: initial value[{index}]={value} not positive")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { err, .. } => Some(err),
            _ => None,
        }
    }
}
