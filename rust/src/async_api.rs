//! Async convenience API built on top of the sync generator.

use crate::{Minid, MinidError, MinidGen, Minids, Mode};

/// Get one minid in async contexts.
pub async fn async_next_minid(mode: Mode, suffix_len: usize) -> Result<Minid, MinidError> {
    let mut generator = MinidGen::new(mode, suffix_len)?;
    generator.next_minid()
}

/// Generate a finite async stream of minids as a collection.
pub async fn async_minid_stream(
    count: usize,
    mode: Mode,
    suffix_len: usize,
) -> Result<Minids, MinidError> {
    let mut generator = MinidGen::new(mode, suffix_len)?;
    generator.next_n(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_minid;
    use futures::executor::block_on;

    #[test]
    fn async_next_minid_ms_is_valid() {
        let id = block_on(async_next_minid(Mode::Milliseconds, 3)).unwrap();
        assert!(validate_minid(id.as_str(), Mode::Milliseconds, 3));
    }

    #[test]
    fn async_minid_stream_count_matches() {
        let values = block_on(async_minid_stream(3, Mode::Nanoseconds, 4)).unwrap();
        assert_eq!(values.len(), 3);
        let prefixes: Vec<&str> = values.iter().map(|v| &v.as_str()[..11]).collect();
        assert!(prefixes[0] <= prefixes[1]);
        assert!(prefixes[1] <= prefixes[2]);
    }

    #[test]
    fn async_rejects_zero_suffix() {
        assert!(matches!(
            block_on(async_next_minid(Mode::Random, 0)),
            Err(MinidError::InvalidSuffixLength)
        ));
    }
}
