use thiserror::Error;

/// Errors reported by the explicit block-marker protocol.
///
/// The put/get hot paths never return `Result`; they signal failure through
/// the per-stream sticky error flag. Only the block begin/end pair, whose
/// misuse is a programming error rather than a malformed message, reports
/// errors explicitly.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A deferred-size block is already open on this stream; blocks do not nest.
    #[error("a deferred-size block is already open on this stream")]
    BlockAlreadyOpen,
    /// The presented mark does not belong to a block open on this stream.
    #[error("no open block matches the presented mark")]
    NoOpenBlock,
    /// The stream is already in the sticky error state.
    #[error("stream is in the sticky error state")]
    StreamPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_describe_themselves() {
        assert_eq!(
            ErrorKind::BlockAlreadyOpen.to_string(),
            "a deferred-size block is already open on this stream"
        );
        assert_eq!(ErrorKind::NoOpenBlock.to_string(), "no open block matches the presented mark");
        assert_eq!(ErrorKind::StreamPoisoned.to_string(), "stream is in the sticky error state");
    }
}
