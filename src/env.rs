use crate::host::HostValue;
use crate::{Error, Result};

/// Collaborator contracts consumed by the normalization core but implemented
/// by the surrounding host integration.
pub trait HostEnv {
    /// Serializes a node (and, when `deep`, its descendants) to markup text.
    /// Implementations must not mutate the live tree they read from: clone
    /// into a detached container before reading markup. `None` when the
    /// handle has no markup representation.
    fn stringify_html(&self, node: &HostValue, deep: bool) -> Option<String>;

    /// Reads the full contents of a blob/file-like handle. This is the one
    /// asynchronous boundary in the surface: implementations complete the
    /// host-scheduled read before returning, and surface host I/O failures
    /// as an explicit error rather than an empty buffer. Abandoning a
    /// pending read discards the host resource; no partial buffer is
    /// returned.
    fn extract_bytes(&self, blob_like: &HostValue) -> Result<Vec<u8>>;

    /// Converts a host indexable/iterable of strings into a plain ordered
    /// list. The default flattens an already-materialized list, keeping
    /// string elements in order.
    fn string_list_from(&self, host_list: &HostValue) -> Vec<String> {
        match host_list {
            HostValue::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    HostValue::Str(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            HostValue::Str(s) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Sibling entry point in the same module boundary: reconciles a
    /// fragment against the live tree. The normalization core never calls
    /// this; the default is a no-op stub.
    fn patch_dom(&self, _fragment: &HostValue, _live: &HostValue, _replace: bool) {}
}

/// Environment with no host attached: nothing stringifies and no byte source
/// exists. Useful for tests and for callers that only normalize plain data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl HostEnv for NoopEnv {
    fn stringify_html(&self, _node: &HostValue, _deep: bool) -> Option<String> {
        None
    }

    fn extract_bytes(&self, _blob_like: &HostValue) -> Result<Vec<u8>> {
        Err(Error::NoByteSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_string_list_flattens_string_elements() {
        let env = NoopEnv;
        let list = HostValue::List(vec![
            HostValue::Str("text/plain".into()),
            HostValue::Int(3),
            HostValue::Str("text/uri-list".into()),
        ]);
        assert_eq!(
            env.string_list_from(&list),
            vec!["text/plain".to_string(), "text/uri-list".to_string()]
        );
        assert!(env.string_list_from(&HostValue::Null).is_empty());
    }

    #[test]
    fn noop_env_has_no_byte_source() {
        assert_eq!(
            NoopEnv.extract_bytes(&HostValue::Bytes(vec![1])),
            Err(Error::NoByteSource)
        );
    }
}
