//! Flash storage region and the settings record kept in it

mod region;
mod store;

pub use region::{FlashRegion, RegionError};
pub use store::{SettingsStore, StorageError, SETTINGS_MAGIC, SETTINGS_SLOT_SIZE};

#[cfg(test)]
pub(crate) mod ram_flash {
    use embedded_storage::nor_flash::{
        check_erase, check_read, check_write, ErrorType, NorFlash, NorFlashError,
        NorFlashErrorKind, ReadNorFlash,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RamFlashError(pub NorFlashErrorKind);

    impl NorFlashError for RamFlashError {
        fn kind(&self) -> NorFlashErrorKind {
            self.0
        }
    }

    /// NOR flash on RAM. Writes can only clear bits, like the real thing.
    pub struct RamFlash<const N: usize> {
        pub data: [u8; N],
        pub erase_count: usize,
    }

    impl<const N: usize> RamFlash<N> {
        pub fn new() -> Self {
            Self {
                data: [0xff; N],
                erase_count: 0,
            }
        }
    }

    impl<const N: usize> ErrorType for RamFlash<N> {
        type Error = RamFlashError;
    }

    impl<const N: usize> ReadNorFlash for RamFlash<N> {
        const READ_SIZE: usize = 1;

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            check_read(self, offset, bytes.len()).map_err(RamFlashError)?;
            let start = offset as usize;
            bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
            Ok(())
        }

        fn capacity(&self) -> usize {
            N
        }
    }

    impl<const N: usize> NorFlash for RamFlash<N> {
        const WRITE_SIZE: usize = 4;
        const ERASE_SIZE: usize = 4096;

        fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
            check_erase(self, from, to).map_err(RamFlashError)?;
            self.data[from as usize..to as usize].fill(0xff);
            self.erase_count += 1;
            Ok(())
        }

        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            check_write(self, offset, bytes.len()).map_err(RamFlashError)?;
            let start = offset as usize;
            for (cell, byte) in self.data[start..start + bytes.len()].iter_mut().zip(bytes) {
                *cell &= *byte;
            }
            Ok(())
        }
    }
}
