//! # Logical to Physical Address Translation
//!
//! The HuC6280 sees a 64KB logical address space split into eight 8KB pages.
//! Each page is mapped to an 8KB physical bank by one of eight MPR (memory
//! page register) values, giving a 21-bit physical address space.

/// Number of MPR registers (and logical pages).
pub const PAGE_COUNT: usize = 8;

/// Bits addressing a byte inside an 8KB page.
pub const PAGE_SHIFT: u32 = 13;

/// Mask for the offset of an address within its page.
pub const PAGE_MASK: u32 = 0x1FFF;

/// MPR values after a hardware reset.
pub const RESET_MPR: [u8; PAGE_COUNT] = [0xFF, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Page index (0-7) of a logical address.
pub fn page_of(logical: u16) -> usize {
    ((logical >> PAGE_SHIFT) & 0x07) as usize
}

/// Bank register state for the eight logical pages.
///
/// The translator is a plain value type: every method is a pure function of
/// the register array.
///
/// # Examples
///
/// ```
/// use huc6280_disasm::AddressTranslator;
///
/// let mut mpr = AddressTranslator::default();
/// mpr.set_bank(7, 0x00);
/// assert_eq!(mpr.logical_to_physical(0xE010), 0x0010);
/// assert_eq!(mpr.logical_to_physical(0x2001), 0x1F0001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTranslator {
    mpr: [u8; PAGE_COUNT],
}

impl AddressTranslator {
    /// Build a translator from explicit register values.
    pub fn new(mpr: [u8; PAGE_COUNT]) -> Self {
        Self { mpr }
    }

    /// Reset state with the page holding `logical` mapped to `bank`.
    pub fn for_origin(bank: u8, logical: u16) -> Self {
        let mut translator = Self::default();
        translator.set_bank(page_of(logical), bank);
        translator
    }

    /// Current register values.
    pub fn registers(&self) -> [u8; PAGE_COUNT] {
        self.mpr
    }

    /// Bank mapped to a page.
    pub fn bank(&self, page: usize) -> u8 {
        self.mpr[page & 0x07]
    }

    /// Map a page to a bank.
    pub fn set_bank(&mut self, page: usize, bank: u8) {
        self.mpr[page & 0x07] = bank;
    }

    /// `(mpr[page] << 13) | (logical & 0x1FFF)`
    pub fn logical_to_physical(&self, logical: u16) -> u32 {
        ((self.bank(page_of(logical)) as u32) << PAGE_SHIFT) | (logical as u32 & PAGE_MASK)
    }

    /// First logical page currently mapped to the bank holding `physical`.
    ///
    /// Returns `None` if no register selects that bank.
    pub fn physical_to_logical_page(&self, physical: u32) -> Option<usize> {
        let bank = physical >> PAGE_SHIFT;
        if bank > 0xFF {
            return None;
        }
        self.mpr.iter().position(|&b| b as u32 == bank)
    }

    /// Logical address of `physical` through the first page mapped to its
    /// bank.
    pub fn physical_to_logical(&self, physical: u32) -> Option<u16> {
        self.physical_to_logical_page(physical)
            .map(|page| ((page as u32) << PAGE_SHIFT | (physical & PAGE_MASK)) as u16)
    }
}

impl Default for AddressTranslator {
    fn default() -> Self {
        Self::new(RESET_MPR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let mpr = AddressTranslator::default();
        assert_eq!(mpr.bank(0), 0xFF);
        assert_eq!(mpr.bank(1), 0xF8);
        for page in 2..PAGE_COUNT {
            assert_eq!(mpr.bank(page), 0x00);
        }
    }

    #[test]
    fn test_logical_to_physical() {
        let mpr = AddressTranslator::for_origin(0x1A, 0x4000);
        assert_eq!(mpr.logical_to_physical(0x4000), 0x1A << 13);
        assert_eq!(mpr.logical_to_physical(0x5FFF), (0x1A << 13) | 0x1FFF);
        // zero page through MPR0
        assert_eq!(mpr.logical_to_physical(0x0020), 0x1FE020);
        assert_eq!(mpr.logical_to_physical(0x2020), 0x1F0020);
    }

    #[test]
    fn test_physical_to_logical_page() {
        let mpr = AddressTranslator::for_origin(0x03, 0xC000);
        assert_eq!(mpr.physical_to_logical_page(0x03 << 13 | 0x10), Some(6));
        assert_eq!(mpr.physical_to_logical(0x03 << 13 | 0x10), Some(0xC010));
        assert_eq!(mpr.physical_to_logical_page(0x42 << 13), None);
        assert_eq!(mpr.physical_to_logical_page(0x200000), None);
    }
}
