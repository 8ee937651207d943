use std::{error, fmt, io};

pub type Result<T> = std::result::Result<T, Error>;

pub enum Error
{
    Io(io::Error),
    /// A line with at least two tokens whose first two tokens are not both
    /// `u32` values. `line` is 1-based.
    Parse
    {
        line: usize,
        token: String,
    },
    /// Node id 0 is reserved and never appears in the output.
    ReservedId
    {
        line: usize,
    },
    DegreeOverflow(u32),
    /// A neighbor with no dense ID was found while relabeling.
    Unmapped(u32),
    /// The second pass over the input did not reproduce the first one.
    PassMismatch
    {
        node: u32,
    },
    Truncated,
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Debug for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Parse { line, token } => f
                .debug_struct("Error::Parse")
                .field("line", line)
                .field("token", token)
                .finish(),
            Self::ReservedId { line } => write!(f, "Error::ReservedId {{ line: {} }}", line),
            Self::DegreeOverflow(node) => write!(f, "Error::DegreeOverflow({})", node),
            Self::Unmapped(node) => write!(f, "Error::Unmapped({})", node),
            Self::PassMismatch { node } => write!(f, "Error::PassMismatch {{ node: {} }}", node),
            Self::Truncated => write!(f, "Error::Truncated"),
            Self::ThreadPool(e) => e.fmt(f),
        }
    }
}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Parse { line, token } => write!(
                f,
                "line {}: {:?} is not a node id in 1..={}",
                line,
                token,
                u32::MAX
            ),
            Self::ReservedId { line } => write!(f, "line {}: node id 0 is reserved", line),
            Self::DegreeOverflow(node) => write!(
                f,
                "node {} has more than {} neighbor entries",
                node,
                u32::MAX
            ),
            Self::Unmapped(node) => write!(
                f,
                "node {} has no relabeled id, the two passes over the input disagree",
                node
            ),
            Self::PassMismatch { node } => write!(
                f,
                "neighbor slice of node {} was not filled to its degree, the input changed between passes",
                node
            ),
            Self::Truncated => write!(f, "input ends in the middle of a record"),
            Self::ThreadPool(e) => e.fmt(f),
        }
    }
}

impl error::Error for Error
{
    fn source(&self) -> Option<&(dyn error::Error + 'static)>
    {
        match self {
            Self::Io(e) => Some(e),
            Self::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error
{
    fn from(e: io::Error) -> Self
    {
        Self::Io(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error
{
    fn from(e: rayon::ThreadPoolBuildError) -> Self
    {
        Self::ThreadPool(e)
    }
}
