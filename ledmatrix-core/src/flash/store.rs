use byteorder::{ByteOrder, LittleEndian};
use embedded_storage::nor_flash::NorFlash;

use crate::settings::{Settings, SettingsError};

/// Marks a written settings slot
pub const SETTINGS_MAGIC: [u8; 4] = *b"LMS1";
/// Settings slot size, at the start of the region's first sector
pub const SETTINGS_SLOT_SIZE: usize = 256;

/// | Offset | Size | Description           |
/// | ------ | ---- | --------------------- |
/// | 0      | 4    | SETTINGS_MAGIC        |
/// | 4      | 2    | body length (LE)      |
/// | 6      | len  | Settings as JSON      |
const MAGIC_RANGE: core::ops::Range<usize> = 0..4;
const LENGTH_RANGE: core::ops::Range<usize> = 4..6;
const HEADER_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError<E> {
    /// Slot erased or written by something else
    NotFound,
    /// Slot header or body unreadable
    Corrupt,
    /// Settings do not fit in the slot
    Encode,
    /// Stored or given settings rejected
    Invalid(SettingsError),
    /// Flash access failed
    Flash(E),
}

impl<E> From<SettingsError> for StorageError<E> {
    fn from(e: SettingsError) -> Self {
        StorageError::Invalid(e)
    }
}

/// Persists `Settings` in the first erase sector of a flash region
pub struct SettingsStore<F> {
    flash: F,
}

impl<F: NorFlash> SettingsStore<F> {
    pub fn new(flash: F) -> Self {
        Self { flash }
    }

    pub fn release(self) -> F {
        self.flash
    }

    /// Read the stored settings
    pub fn load(&mut self) -> Result<Settings, StorageError<F::Error>> {
        let mut slot = [0u8; SETTINGS_SLOT_SIZE];
        self.flash.read(0, &mut slot).map_err(StorageError::Flash)?;

        if slot[MAGIC_RANGE] != SETTINGS_MAGIC {
            return Err(StorageError::NotFound);
        }
        let len = LittleEndian::read_u16(&slot[LENGTH_RANGE]) as usize;
        let body = slot
            .get(HEADER_SIZE..HEADER_SIZE + len)
            .ok_or(StorageError::Corrupt)?;
        let (settings, _) = serde_json_core::from_slice::<Settings>(body)
            .map_err(|_| StorageError::Corrupt)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Replace the stored settings
    pub fn save(&mut self, settings: &Settings) -> Result<(), StorageError<F::Error>> {
        settings.validate()?;

        // unwritten bytes stay erased
        let mut slot = [0xffu8; SETTINGS_SLOT_SIZE];
        slot[MAGIC_RANGE].copy_from_slice(&SETTINGS_MAGIC);
        let len = serde_json_core::to_slice(settings, &mut slot[HEADER_SIZE..])
            .map_err(|_| StorageError::Encode)?;
        LittleEndian::write_u16(&mut slot[LENGTH_RANGE], len as u16);

        self.erase()?;
        self.flash.write(0, &slot).map_err(StorageError::Flash)
    }

    /// Forget the stored settings
    pub fn erase(&mut self) -> Result<(), StorageError<F::Error>> {
        self.flash
            .erase(0, F::ERASE_SIZE as u32)
            .map_err(StorageError::Flash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use crate::flash::ram_flash::RamFlash;
    use crate::flash::FlashRegion;

    const FLASH_SIZE: usize = 4 * 4096;

    fn region() -> FlashRegion<RamFlash<FLASH_SIZE>> {
        FlashRegion::new(RamFlash::new(), 8192, 8192).unwrap()
    }

    #[test]
    fn test_load_erased() {
        let mut store = SettingsStore::new(region());
        assert_eq!(store.load(), Err(StorageError::NotFound));
    }

    #[test]
    fn test_save_load() {
        let settings = Settings {
            effect: EffectKind::Drift,
            max_lit: 12,
            brightness: 40,
        };
        let mut store = SettingsStore::new(region());
        store.save(&settings).unwrap();
        assert_eq!(store.load(), Ok(settings));

        // overwrite requires erase, which save does
        store.save(&Settings::DEFAULT).unwrap();
        assert_eq!(store.load(), Ok(Settings::DEFAULT));

        let flash = store.release().release();
        assert_eq!(flash.erase_count, 2);
        assert_eq!(&flash.data[8192..8196], b"LMS1");
        // nothing outside the region
        assert!(flash.data[..8192].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_save_rejects_invalid() {
        let mut store = SettingsStore::new(region());
        let settings = Settings {
            brightness: 200,
            ..Settings::DEFAULT
        };
        assert_eq!(
            store.save(&settings),
            Err(StorageError::Invalid(SettingsError::BrightnessOutOfRange {
                brightness: 200
            }))
        );
        assert_eq!(store.load(), Err(StorageError::NotFound));
    }

    #[test]
    fn test_load_corrupt() {
        let mut flash = RamFlash::<FLASH_SIZE>::new();
        // bad length
        flash.data[..6].copy_from_slice(&[b'L', b'M', b'S', b'1', 0xff, 0x0f]);
        let mut store = SettingsStore::new(flash);
        assert_eq!(store.load(), Err(StorageError::Corrupt));

        // bad body
        let mut flash = store.release();
        flash.data[4..8].copy_from_slice(&[2, 0, b'{', b'x']);
        let mut store = SettingsStore::new(flash);
        assert_eq!(store.load(), Err(StorageError::Corrupt));
    }

    #[test]
    fn test_erase() {
        let mut store = SettingsStore::new(region());
        store.save(&Settings::DEFAULT).unwrap();
        store.erase().unwrap();
        assert_eq!(store.load(), Err(StorageError::NotFound));
    }
}
