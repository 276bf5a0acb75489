use std::fmt::{Display, Formatter};

/// How a new record obtains the identifier its short code is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Reserve the next id from storage, then encode and insert it.
    ///
    /// Every create gets its own id before encoding, so concurrent
    /// creates never share a code.
    #[default]
    Reserve,
    /// Read the most recently generated id, encode it, then insert and let
    /// storage assign the id.
    ///
    /// Creates are serialized within one process, but two processes sharing
    /// a database can still read the same id and store the same code for
    /// different records.
    ///
    /// The last generated id is exactly the reference of the next record, so
    /// the second record gets `aaaaaaaaab`. Deployments that computed the bias
    /// in floating point encoded one less and stored `aaaaaaaaaa` again for
    /// it; codes written by such a deployment are not reproduced here.
    Sequence,
}

impl Display for IdStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IdStrategy::Reserve => write!(f, "reserve"),
            IdStrategy::Sequence => write!(f, "sequence"),
        }
    }
}
