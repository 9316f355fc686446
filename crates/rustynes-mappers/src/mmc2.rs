//! MMC2/MMC4 Mappers (Mapper 9 and Mapper 10).
//!
//! MMC2 was built for Punch-Out!!; MMC4 is the same hardware family used by
//! Fire Emblem and other later Nintendo releases. Both use two independent
//! CHR latches that flip between an "FD" and "FE" bank selection whenever
//! the PPU fetches a specific pattern-table tile, letting a single 8x16
//! sprite bank swap mid-frame.
//!
//! - PRG-ROM: MMC2 switches one 8KB bank at $8000-$9FFF, fixes the last
//!   three 8KB banks at $A000-$FFFF. MMC4 switches one 16KB bank at
//!   $8000-$BFFF, fixes the last 16KB bank at $C000-$FFFF.
//! - CHR-ROM: two 4KB regions ($0000-$0FFF, $1000-$1FFF), each latch-switched
//!   between two programmable banks.
//! - Mirroring: single bit at $F000-$FFFF (0 = vertical, 1 = horizontal).
//! - 8KB PRG-RAM at $6000-$7FFF may be present.

use crate::mapper::{Mapper, Mirroring};
use crate::rom::Rom;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// MMC2/MMC4 mapper implementation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mmc2 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    prg_ram: Vec<u8>,
    chr_is_ram: bool,
    /// True for mapper 10 (MMC4), false for mapper 9 (MMC2).
    is_mmc4: bool,
    prg_8k_banks: usize,
    prg_select: u8,
    chr_low_fd: u8,
    chr_low_fe: u8,
    chr_high_fd: u8,
    chr_high_fe: u8,
    latch_low: bool,
    latch_high: bool,
    mirroring: Mirroring,
    has_battery: bool,
}

impl Mmc2 {
    fn new(rom: &Rom, is_mmc4: bool) -> Self {
        let prg_8k_banks = (rom.prg_rom.len() / 8192).max(1);
        let chr_is_ram = rom.chr_rom.is_empty();
        let chr = if chr_is_ram {
            vec![0u8; 8192]
        } else {
            rom.chr_rom.clone()
        };

        Self {
            prg_rom: rom.prg_rom.clone(),
            chr,
            prg_ram: vec![0u8; 8192],
            chr_is_ram,
            is_mmc4,
            prg_8k_banks,
            prg_select: 0,
            chr_low_fd: 0,
            chr_low_fe: 0,
            chr_high_fd: 0,
            chr_high_fe: 0,
            latch_low: false,
            latch_high: false,
            mirroring: rom.header.mirroring,
            has_battery: rom.header.has_battery,
        }
    }

    /// Create an MMC2 mapper (mapper 9, Punch-Out!!).
    #[must_use]
    pub fn new_mmc2(rom: &Rom) -> Self {
        Self::new(rom, false)
    }

    /// Create an MMC4 mapper (mapper 10, Fire Emblem).
    #[must_use]
    pub fn new_mmc4(rom: &Rom) -> Self {
        Self::new(rom, true)
    }

    fn chr_bank_size(&self) -> usize {
        4096
    }

    fn chr_bank_read(&self, bank: u8, offset: usize) -> u8 {
        let banks = (self.chr.len() / self.chr_bank_size()).max(1);
        let bank = (bank as usize) % banks;
        self.chr
            .get(bank * self.chr_bank_size() + offset)
            .copied()
            .unwrap_or(0)
    }
}

impl Mapper for Mmc2 {
    fn read_prg(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram.get((addr - 0x6000) as usize).copied().unwrap_or(0),
            0x8000..=0xFFFF => {
                if self.is_mmc4 {
                    // 16KB switchable at $8000-$BFFF, 16KB fixed last at $C000-$FFFF.
                    let (bank, offset) = if addr < 0xC000 {
                        (self.prg_select as usize * 2, (addr - 0x8000) as usize)
                    } else {
                        (self.prg_8k_banks.saturating_sub(2), (addr - 0xC000) as usize)
                    };
                    let bank_8k = bank + offset / 8192;
                    let bank_8k = bank_8k % self.prg_8k_banks.max(1);
                    self.prg_rom
                        .get(bank_8k * 8192 + (offset % 8192))
                        .copied()
                        .unwrap_or(0)
                } else {
                    // 8KB switchable at $8000-$9FFF, last 3 8KB banks fixed at $A000-$FFFF.
                    let (bank, offset) = if addr < 0xA000 {
                        (self.prg_select as usize, (addr - 0x8000) as usize)
                    } else {
                        let fixed_bank = self.prg_8k_banks.saturating_sub(3)
                            + ((addr - 0xA000) / 8192) as usize;
                        (fixed_bank, ((addr - 0xA000) % 8192) as usize)
                    };
                    let bank = bank % self.prg_8k_banks.max(1);
                    self.prg_rom
                        .get(bank * 8192 + offset)
                        .copied()
                        .unwrap_or(0)
                }
            }
            _ => 0,
        }
    }

    fn write_prg(&mut self, addr: u16, val: u8) {
        match addr {
            0x6000..=0x7FFF => {
                if let Some(byte) = self.prg_ram.get_mut((addr - 0x6000) as usize) {
                    *byte = val;
                }
            }
            0xA000..=0xAFFF => self.prg_select = val & 0x0F,
            0xB000..=0xBFFF => self.chr_low_fd = val & 0x1F,
            0xC000..=0xCFFF => self.chr_low_fe = val & 0x1F,
            0xD000..=0xDFFF => self.chr_high_fd = val & 0x1F,
            0xE000..=0xEFFF => self.chr_high_fe = val & 0x1F,
            0xF000..=0xFFFF => {
                self.mirroring = if val & 1 != 0 {
                    Mirroring::Horizontal
                } else {
                    Mirroring::Vertical
                };
            }
            _ => {}
        }
    }

    fn read_chr(&self, addr: u16) -> u8 {
        if addr < 0x1000 {
            let bank = if self.latch_low { self.chr_low_fe } else { self.chr_low_fd };
            self.chr_bank_read(bank, addr as usize)
        } else {
            let bank = if self.latch_high { self.chr_high_fe } else { self.chr_high_fd };
            self.chr_bank_read(bank, (addr - 0x1000) as usize)
        }
    }

    fn write_chr(&mut self, addr: u16, val: u8) {
        if self.chr_is_ram {
            if let Some(byte) = self.chr.get_mut(addr as usize) {
                *byte = val;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn mapper_number(&self) -> u16 {
        if self.is_mmc4 { 10 } else { 9 }
    }

    fn mapper_name(&self) -> &'static str {
        if self.is_mmc4 { "MMC4" } else { "MMC2" }
    }

    fn has_battery(&self) -> bool {
        self.has_battery
    }

    fn battery_ram(&self) -> Option<&[u8]> {
        if self.has_battery { Some(&self.prg_ram) } else { None }
    }

    fn set_battery_ram(&mut self, data: &[u8]) {
        let len = self.prg_ram.len().min(data.len());
        self.prg_ram[..len].copy_from_slice(&data[..len]);
    }

    fn reset(&mut self) {
        self.prg_select = 0;
        self.latch_low = false;
        self.latch_high = false;
    }

    fn clone_mapper(&self) -> Box<dyn Mapper> {
        Box::new(self.clone())
    }

    fn ppu_address_observed(&mut self, addr: u16) {
        if addr < 0x1000 {
            if addr == 0x0FD8 {
                self.latch_low = false;
            } else if addr == 0x0FE8 {
                self.latch_low = true;
            }
        } else if (0x1FD8..=0x1FDF).contains(&addr) {
            self.latch_high = false;
        } else if (0x1FE8..=0x1FEF).contains(&addr) {
            self.latch_high = true;
        }
    }

    fn save_state(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(6 + self.chr.len());
        data.push(self.prg_select);
        data.push(self.chr_low_fd);
        data.push(self.chr_low_fe);
        data.push(self.chr_high_fd);
        data.push(self.chr_high_fe);
        data.push(u8::from(self.latch_low) | (u8::from(self.latch_high) << 1));
        data.push(self.mirroring.to_byte());
        if self.chr_is_ram {
            data.extend_from_slice(&self.chr);
        }
        data
    }

    fn load_state(&mut self, data: &[u8]) {
        if data.len() < 7 {
            return;
        }
        self.prg_select = data[0];
        self.chr_low_fd = data[1];
        self.chr_low_fe = data[2];
        self.chr_high_fd = data[3];
        self.chr_high_fe = data[4];
        self.latch_low = data[5] & 1 != 0;
        self.latch_high = data[5] & 2 != 0;
        self.mirroring = Mirroring::from_byte(data[6]);
        if self.chr_is_ram && data.len() == 7 + self.chr.len() {
            self.chr.copy_from_slice(&data[7..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::RomHeader;

    fn create_test_rom(is_mmc4: bool, prg_8k_banks: u8, chr_4k_banks: u8) -> Rom {
        let prg_size = prg_8k_banks as usize * 8192;
        let chr_size = chr_4k_banks as usize * 4096;

        let mut prg_rom = vec![0u8; prg_size];
        for bank in 0..prg_8k_banks as usize {
            for i in 0..8192 {
                prg_rom[bank * 8192 + i] = bank as u8;
            }
        }

        let mut chr_rom = vec![0u8; chr_size];
        for bank in 0..chr_4k_banks as usize {
            for i in 0..4096 {
                chr_rom[bank * 4096 + i] = bank as u8;
            }
        }

        Rom {
            header: RomHeader {
                prg_rom_size: prg_size,
                chr_rom_size: chr_size,
                mapper_number: if is_mmc4 { 10 } else { 9 },
                submapper: 0,
                mirroring: Mirroring::Vertical,
                has_battery: false,
                has_trainer: false,
                nes2_format: false,
                prg_ram_size: 8192,
                prg_nvram_size: 0,
                chr_ram_size: 0,
                chr_nvram_size: 0,
            },
            prg_rom,
            chr_rom,
            trainer: None,
        }
    }

    #[test]
    fn test_mmc2_prg_fixed_tail() {
        let rom = create_test_rom(false, 8, 8);
        let mapper = Mmc2::new_mmc2(&rom);
        // Last three 8KB banks fixed at $A000-$FFFF
        assert_eq!(mapper.read_prg(0xA000), 5);
        assert_eq!(mapper.read_prg(0xC000), 6);
        assert_eq!(mapper.read_prg(0xE000), 7);
    }

    #[test]
    fn test_mmc2_prg_switchable() {
        let rom = create_test_rom(false, 8, 8);
        let mut mapper = Mmc2::new_mmc2(&rom);
        mapper.write_prg(0xA000, 3);
        assert_eq!(mapper.read_prg(0x8000), 3);
    }

    #[test]
    fn test_mmc2_chr_latch_flip() {
        let rom = create_test_rom(false, 8, 8);
        let mut mapper = Mmc2::new_mmc2(&rom);
        mapper.write_prg(0xB000, 2); // FD bank
        mapper.write_prg(0xC000, 4); // FE bank
        assert_eq!(mapper.read_chr(0x0000), 2);

        mapper.ppu_address_observed(0x0FE8);
        assert_eq!(mapper.read_chr(0x0000), 4);

        mapper.ppu_address_observed(0x0FD8);
        assert_eq!(mapper.read_chr(0x0000), 2);
    }

    #[test]
    fn test_mmc2_high_chr_latch() {
        let rom = create_test_rom(false, 8, 8);
        let mut mapper = Mmc2::new_mmc2(&rom);
        mapper.write_prg(0xD000, 1); // high FD
        mapper.write_prg(0xE000, 5); // high FE
        assert_eq!(mapper.read_chr(0x1000), 1);

        mapper.ppu_address_observed(0x1FE8);
        assert_eq!(mapper.read_chr(0x1000), 5);
    }

    #[test]
    fn test_mmc2_mirroring_control() {
        let rom = create_test_rom(false, 8, 8);
        let mut mapper = Mmc2::new_mmc2(&rom);
        mapper.write_prg(0xF000, 1);
        assert_eq!(mapper.mirroring(), Mirroring::Horizontal);
        mapper.write_prg(0xF000, 0);
        assert_eq!(mapper.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn test_mmc4_prg_16k_switchable() {
        let rom = create_test_rom(true, 8, 8);
        let mut mapper = Mmc2::new_mmc4(&rom);
        mapper.write_prg(0xA000, 1);
        assert_eq!(mapper.read_prg(0x8000), 2);
        assert_eq!(mapper.read_prg(0xBFFF), 3);
    }

    #[test]
    fn test_mmc4_prg_fixed_tail() {
        let rom = create_test_rom(true, 8, 8);
        let mapper = Mmc2::new_mmc4(&rom);
        assert_eq!(mapper.read_prg(0xC000), 6);
        assert_eq!(mapper.read_prg(0xFFFF), 7);
    }

    #[test]
    fn test_mmc2_mapper_info() {
        let rom9 = create_test_rom(false, 8, 8);
        let mapper9 = Mmc2::new_mmc2(&rom9);
        assert_eq!(mapper9.mapper_number(), 9);
        assert_eq!(mapper9.mapper_name(), "MMC2");

        let rom10 = create_test_rom(true, 8, 8);
        let mapper10 = Mmc2::new_mmc4(&rom10);
        assert_eq!(mapper10.mapper_number(), 10);
        assert_eq!(mapper10.mapper_name(), "MMC4");
    }
}
