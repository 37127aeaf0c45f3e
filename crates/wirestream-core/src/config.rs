use crate::constants::DEFAULT_SEGMENT_CAPACITY;

/// Configuration options to tune encoder behavior.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity in bytes of each output segment. Small messages fit in the
    /// first segment; larger messages grow the chain one segment at a time.
    /// Values below the widest scalar (8 bytes) are raised to it.
    pub segment_capacity: usize,
    /// Max number of segments an encoder may hold (0 = unlimited).
    /// Exceeding the cap poisons the stream instead of allocating further.
    pub max_segments: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            max_segments: 0, // Unlimited
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unbounded() {
        let config = Config::default();
        assert_eq!(config.segment_capacity, DEFAULT_SEGMENT_CAPACITY);
        assert_eq!(config.max_segments, 0);
    }
}
