//! Flash-backed byte store for RP2040
//!
//! Uses sequential-storage for wear-levelled key-value storage in the last
//! 64KB of flash. Each logical byte offset is one map item keyed by the
//! offset, so updating a parameter appends a single small record instead of
//! erasing a sector.
//!
//! Offsets that were never written read back as 0xFF, like an erased EEPROM
//! cell.

use embassy_futures::block_on;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use larmor_hal::{ByteStore, StorageError};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// Flash storage layout
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const STORE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORE_PARTITION_START: usize = FLASH_SIZE - STORE_PARTITION_SIZE;

/// Flash range for the store partition
pub const STORE_RANGE: core::ops::Range<u32> =
    (STORE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Value reported for offsets never written
pub const ERASED: u8 = 0xFF;

/// Logical bytes addressable through the store
pub const CAPACITY: usize = 64;

/// Scratch space for one serialised map item
const ITEM_BUFFER: usize = 32;

/// RP2040 flash byte store
pub struct FlashByteStore<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    buffer: [u8; ITEM_BUFFER],
}

impl<'d> FlashByteStore<'d> {
    /// Create a store on the flash peripheral
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            buffer: [0u8; ITEM_BUFFER],
        }
    }

    fn key(offset: usize) -> Result<u8, StorageError> {
        if offset < CAPACITY {
            Ok(offset as u8)
        } else {
            Err(StorageError::OutOfRange)
        }
    }
}

impl<'d> ByteStore for FlashByteStore<'d> {
    type Error = StorageError;

    fn read(&mut self, offset: usize) -> Result<u8, Self::Error> {
        let key = Self::key(offset)?;

        let result = block_on(map::fetch_item::<u8, u8, _>(
            &mut self.flash,
            STORE_RANGE,
            &mut NoCache::new(),
            &mut self.buffer,
            &key,
        ));

        match result {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(ERASED),
            Err(_) => Err(StorageError::Storage),
        }
    }

    fn update(&mut self, offset: usize, value: u8) -> Result<(), Self::Error> {
        if self.read(offset)? == value {
            return Ok(());
        }
        let key = Self::key(offset)?;

        block_on(map::store_item(
            &mut self.flash,
            STORE_RANGE,
            &mut NoCache::new(),
            &mut self.buffer,
            &key,
            &value,
        ))
        .map_err(|err| match err {
            sequential_storage::Error::FullStorage => StorageError::Full,
            _ => StorageError::Storage,
        })
    }

    fn capacity(&self) -> usize {
        CAPACITY
    }
}
