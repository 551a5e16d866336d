//! Tagged parameter store
//!
//! Each parameter owns a (tag, value) byte pair in the raw store. A value is
//! trusted only when its tag byte equals [`TAG_VALID`]. Any other tag byte
//! (canonically [`TAG_ABSENT`], but erased flash and garbage look the same)
//! leaves the compile-time default in place.

use larmor_hal::{ByteStore, ParameterKey};

use crate::config::{parameter_bounds, OutOfRange, RuntimeConfig};

/// Tag byte marking an operator-set value
pub const TAG_VALID: u8 = 22;

/// Tag byte written to mark a slot as unset
pub const TAG_ABSENT: u8 = 45;

/// Parameter store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError<E> {
    /// Value rejected before touching the store
    OutOfRange(OutOfRange),
    /// Underlying store failed
    Store(E),
}

impl<E> From<OutOfRange> for PersistError<E> {
    fn from(err: OutOfRange) -> Self {
        PersistError::OutOfRange(err)
    }
}

/// Operator parameters over a raw byte store
pub struct ParameterStore<S> {
    store: S,
}

impl<S: ByteStore> ParameterStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Release the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Read one slot
    ///
    /// Returns `Ok(None)` when the tag is not [`TAG_VALID`].
    pub fn read_one(&mut self, key: ParameterKey) -> Result<Option<u8>, S::Error> {
        let tag = self.store.read(key.tag_offset())?;
        if tag != TAG_VALID {
            return Ok(None);
        }
        Ok(Some(self.store.read(key.value_offset())?))
    }

    /// Load the runtime config
    ///
    /// Starts from defaults and overlays every valid slot. A slot that
    /// cannot be read, or that holds a value outside its bounds, keeps the
    /// default.
    pub fn read_all(&mut self) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();

        for key in ParameterKey::ALL {
            match self.read_one(key) {
                Ok(Some(value)) => match config.set(key, value as i32) {
                    Ok(_) => debug!("store: loaded {} = {}", key, value),
                    Err(_) => warn!("store: {} = {} out of range, using default", key, value),
                },
                Ok(None) => debug!("store: {} unset", key),
                Err(_) => warn!("store: read of {} failed, using default", key),
            }
        }

        info!(
            "store: tune={} repeats={} baud_index={}",
            config.tune,
            config.repeats,
            config.baud_index
        );
        config
    }

    /// Persist one parameter
    ///
    /// The value is checked against its bounds before anything is written.
    /// The value byte is written before the tag so an interrupted write
    /// never marks a stale value as valid.
    pub fn write_one(&mut self, key: ParameterKey, value: u8) -> Result<(), PersistError<S::Error>> {
        let bounds = parameter_bounds(key);
        if !bounds.contains(value as i32) {
            return Err(OutOfRange {
                key,
                value: value as i32,
            }
            .into());
        }

        self.store
            .update(key.value_offset(), value)
            .map_err(PersistError::Store)?;
        self.store
            .update(key.tag_offset(), TAG_VALID)
            .map_err(PersistError::Store)?;

        info!("store: saved {} = {}", key, value);
        Ok(())
    }

    /// Mark a slot as unset so the default applies on next load
    pub fn clear_one(&mut self, key: ParameterKey) -> Result<(), S::Error> {
        self.store.update(key.tag_offset(), TAG_ABSENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BAUD_INDEX, DEFAULT_REPEATS, DEFAULT_TUNE};
    use crate::testing::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_blank_store_gives_defaults() {
        let mut store = ParameterStore::new(MemoryStore::filled(TAG_ABSENT));
        assert_eq!(store.read_all(), RuntimeConfig::default());
    }

    #[test]
    fn test_erased_flash_gives_defaults() {
        let mut store = ParameterStore::new(MemoryStore::filled(0xFF));
        assert_eq!(store.read_all(), RuntimeConfig::default());
    }

    #[test]
    fn test_write_layout() {
        let mut store = ParameterStore::new(MemoryStore::filled(TAG_ABSENT));
        store.write_one(ParameterKey::Repeats, 42).unwrap();

        let bytes = store.inner().bytes();
        assert_eq!(&bytes[..6], &[45, 45, 22, 42, 45, 45]);
    }

    #[test]
    fn test_value_written_before_tag() {
        let mut store = ParameterStore::new(MemoryStore::filled(TAG_ABSENT));
        store.write_one(ParameterKey::BaudIndex, 1).unwrap();

        let writes = store.inner().writes();
        assert_eq!(writes, &[(5, 1), (4, TAG_VALID)]);
    }

    #[test]
    fn test_out_of_range_never_written() {
        let mut store = ParameterStore::new(MemoryStore::filled(TAG_ABSENT));
        let result = store.write_one(ParameterKey::Tune, 91);
        assert!(matches!(result, Err(PersistError::OutOfRange(_))));
        assert!(store.inner().writes().is_empty());
    }

    #[test]
    fn test_valid_tag_with_bad_value_keeps_default() {
        let mut raw = MemoryStore::filled(TAG_ABSENT);
        raw.set(0, TAG_VALID);
        raw.set(1, 200);
        let mut store = ParameterStore::new(raw);
        assert_eq!(store.read_all().tune, DEFAULT_TUNE);
    }

    #[test]
    fn test_read_failure_keeps_default() {
        let mut raw = MemoryStore::filled(TAG_ABSENT);
        raw.set(2, TAG_VALID);
        raw.set(3, 7);
        raw.fail_reads(true);
        let mut store = ParameterStore::new(raw);
        assert_eq!(store.read_all().repeats, DEFAULT_REPEATS);
    }

    #[test]
    fn test_clear_restores_default() {
        let mut store = ParameterStore::new(MemoryStore::filled(TAG_ABSENT));
        store.write_one(ParameterKey::BaudIndex, 0).unwrap();
        assert_eq!(store.read_all().baud_index, 0);

        store.clear_one(ParameterKey::BaudIndex).unwrap();
        assert_eq!(store.read_all().baud_index, DEFAULT_BAUD_INDEX);
    }

    fn any_key() -> impl Strategy<Value = ParameterKey> {
        prop_oneof![
            Just(ParameterKey::Tune),
            Just(ParameterKey::Repeats),
            Just(ParameterKey::BaudIndex),
        ]
    }

    proptest! {
        #[test]
        fn test_round_trip(key in any_key(), raw in 0u8..=255) {
            let bounds = parameter_bounds(key);
            let value = (bounds.lo + raw as i32 % (bounds.hi - bounds.lo + 1)) as u8;

            let mut store = ParameterStore::new(MemoryStore::filled(TAG_ABSENT));
            store.write_one(key, value).unwrap();

            let mut reloaded = ParameterStore::new(store.into_inner());
            let config = reloaded.read_all();
            prop_assert_eq!(config.get(key), value);

            // Other keys keep their defaults
            for other in ParameterKey::ALL {
                if other != key {
                    prop_assert_eq!(config.get(other), RuntimeConfig::default().get(other));
                }
            }
        }

        #[test]
        fn test_non_sentinel_tag_gives_default(key in any_key(), tag in 0u8..=255, value in 0u8..=255) {
            prop_assume!(tag != TAG_VALID);

            let mut raw = MemoryStore::filled(TAG_ABSENT);
            raw.set(key.tag_offset(), tag);
            raw.set(key.value_offset(), value);
            let mut store = ParameterStore::new(raw);

            prop_assert_eq!(store.read_all(), RuntimeConfig::default());
        }
    }
}
