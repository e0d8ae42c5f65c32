use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegionError<E> {
    /// Region or access not aligned to the flash geometry
    NotAligned,
    /// Region past the end of flash, or access past the end of the region
    OutOfBounds,
    /// Underlying flash failed
    Flash(E),
}

impl<E: NorFlashError> NorFlashError for RegionError<E> {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            RegionError::NotAligned => NorFlashErrorKind::NotAligned,
            RegionError::OutOfBounds => NorFlashErrorKind::OutOfBounds,
            RegionError::Flash(e) => e.kind(),
        }
    }
}

/// A bounded partition of a NOR flash. Offsets are relative to the region start.
pub struct FlashRegion<F> {
    flash: F,
    offset: u32,
    size: u32,
}

impl<F: NorFlash> FlashRegion<F> {
    /// Carve `size` bytes at `offset` out of `flash`.
    /// Both must be multiples of the erase size.
    pub fn new(flash: F, offset: u32, size: u32) -> Result<Self, RegionError<F::Error>> {
        let erase_size = F::ERASE_SIZE as u32;
        if offset % erase_size != 0 || size % erase_size != 0 {
            return Err(RegionError::NotAligned);
        }
        let end = offset.checked_add(size).ok_or(RegionError::OutOfBounds)?;
        if end as usize > flash.capacity() {
            return Err(RegionError::OutOfBounds);
        }
        Ok(Self { flash, offset, size })
    }

    /// Region start, absolute in flash
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Give the flash back
    pub fn release(self) -> F {
        self.flash
    }

    /// Translate a region-relative range to an absolute flash offset
    fn absolute(&self, offset: u32, len: usize) -> Result<u32, RegionError<F::Error>> {
        let end = (offset as usize)
            .checked_add(len)
            .ok_or(RegionError::OutOfBounds)?;
        if end > self.size as usize {
            return Err(RegionError::OutOfBounds);
        }
        Ok(self.offset + offset)
    }
}

impl<F: NorFlash> ErrorType for FlashRegion<F> {
    type Error = RegionError<F::Error>;
}

impl<F: NorFlash> ReadNorFlash for FlashRegion<F> {
    const READ_SIZE: usize = F::READ_SIZE;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let absolute = self.absolute(offset, bytes.len())?;
        self.flash.read(absolute, bytes).map_err(RegionError::Flash)
    }

    fn capacity(&self) -> usize {
        self.size as usize
    }
}

impl<F: NorFlash> NorFlash for FlashRegion<F> {
    const WRITE_SIZE: usize = F::WRITE_SIZE;
    const ERASE_SIZE: usize = F::ERASE_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        if from > to {
            return Err(RegionError::OutOfBounds);
        }
        let start = self.absolute(from, (to - from) as usize)?;
        self.flash
            .erase(start, start + (to - from))
            .map_err(RegionError::Flash)
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let absolute = self.absolute(offset, bytes.len())?;
        self.flash.write(absolute, bytes).map_err(RegionError::Flash)
    }
}
