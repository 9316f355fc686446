//! RAMBO-1 Mapper (Mapper 64).
//!
//! An MMC3-family mapper used by a handful of Konami-adjacent releases
//! (Dracula II, Fudou Myouou Den). Same 8KB PRG-bank/1KB CHR-bank register
//! file as MMC3 but with two extra bank registers (R8/R9) that let the
//! first CHR 4KB region be split into four 1KB banks instead of two 2KB
//! banks, and an IRQ counter that can run off either scanlines (like MMC3)
//! or CPU cycles, selected by a mode bit.
//!
//! Memory layout:
//! - PRG-ROM: three 8KB switchable banks ($8000/$A000/$C000, reordered by
//!   the PRG mode bit) plus a fixed last bank at $E000.
//! - CHR-ROM/RAM: two 4KB regions, optionally swapped by the A12-swap bit;
//!   the low region is either two 2KB banks or four 1KB banks depending on
//!   the CHR-granularity bit, the high region is always four 1KB banks.
//! - 8KB PRG-RAM at $6000-$7FFF (no write-protect register, unlike MMC3).

use crate::mapper::{Mapper, Mirroring};
use crate::rom::Rom;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RAMBO-1 mapper implementation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rambo {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    prg_ram: Vec<u8>,
    chr_is_ram: bool,
    prg_8k_banks: usize,
    chr_1k_banks: usize,

    bank_select: u8,
    /// R0-R9 bank registers.
    r: [u8; 10],
    /// R15 ("RF"): third swappable PRG bank.
    rf: u8,

    mirroring: Mirroring,

    irq_latch: u8,
    irq_counter: u8,
    irq_mode_cycle: bool,
    irq_enabled: bool,
    irq_pending: bool,
    /// Sub-counter for cycle-mode IRQ: RAMBO-1 decrements every 4 CPU cycles.
    cycle_accum: u8,

    has_battery: bool,
}

impl Rambo {
    /// Create a new RAMBO-1 mapper from ROM data.
    #[must_use]
    pub fn new(rom: &Rom) -> Self {
        let prg_8k_banks = (rom.prg_rom.len() / 8192).max(1);
        let chr_is_ram = rom.chr_rom.is_empty();
        let chr = if chr_is_ram { vec![0u8; 8192] } else { rom.chr_rom.clone() };
        let chr_1k_banks = (chr.len() / 1024).max(1);

        Self {
            prg_rom: rom.prg_rom.clone(),
            chr,
            prg_ram: vec![0u8; 8192],
            chr_is_ram,
            prg_8k_banks,
            chr_1k_banks,
            bank_select: 0,
            r: [0, 2, 4, 5, 6, 7, 0, 1, 0, 0],
            rf: 2,
            mirroring: rom.header.mirroring,
            irq_latch: 0,
            irq_counter: 0,
            irq_mode_cycle: false,
            irq_enabled: false,
            irq_pending: false,
            cycle_accum: 0,
            has_battery: rom.header.has_battery,
        }
    }

    fn prg_mode(&self) -> bool {
        self.bank_select & 0x40 != 0
    }

    fn chr_1k_low(&self) -> bool {
        self.bank_select & 0x20 != 0
    }

    fn chr_a12_swap(&self) -> bool {
        self.bank_select & 0x80 != 0
    }

    fn prg_addr(&self, addr: u16) -> usize {
        let fixed_last = self.prg_8k_banks.saturating_sub(1);
        let bank = match addr {
            0x8000..=0x9FFF => {
                if self.prg_mode() {
                    self.rf
                } else {
                    self.r[6]
                }
            }
            0xA000..=0xBFFF => self.r[7],
            0xC000..=0xDFFF => {
                if self.prg_mode() {
                    self.r[6]
                } else {
                    self.rf
                }
            }
            _ => return fixed_last * 8192 + (addr & 0x1FFF) as usize,
        };
        let bank = (bank as usize) % self.prg_8k_banks.max(1);
        bank * 8192 + (addr & 0x1FFF) as usize
    }

    fn chr_addr(&self, addr: u16) -> usize {
        let addr = addr & 0x1FFF;
        let in_low_half = addr < 0x1000;
        let in_region_a = in_low_half != self.chr_a12_swap();

        let (bank, local_offset) = if in_region_a {
            if self.chr_1k_low() {
                let sub = (addr & 0x0FFF) / 1024;
                let reg = match sub {
                    0 => self.r[0],
                    1 => self.r[8],
                    2 => self.r[1],
                    _ => self.r[9],
                };
                (reg, (addr & 0x03FF) as usize)
            } else {
                let reg = if (addr & 0x0FFF) < 0x0800 { self.r[0] } else { self.r[1] };
                (reg & 0xFE, (addr & 0x07FF) as usize)
            }
        } else {
            let sub = (addr & 0x0FFF) / 1024;
            let reg = match sub {
                0 => self.r[2],
                1 => self.r[3],
                2 => self.r[4],
                _ => self.r[5],
            };
            (reg, (addr & 0x03FF) as usize)
        };

        let bank = (bank as usize) % self.chr_1k_banks;
        bank * 1024 + local_offset
    }

    fn clock_irq(&mut self) {
        if self.irq_counter == 0 {
            self.irq_counter = self.irq_latch;
        } else {
            self.irq_counter -= 1;
        }
        if self.irq_counter == 0 && self.irq_enabled {
            self.irq_pending = true;
        }
    }
}

impl Mapper for Rambo {
    fn read_prg(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram.get((addr - 0x6000) as usize).copied().unwrap_or(0),
            0x8000..=0xFFFF => self.prg_rom.get(self.prg_addr(addr)).copied().unwrap_or(0),
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
            0x8000..=0x9FFF => {
                if addr & 1 == 0 {
                    self.bank_select = val;
                } else {
                    match self.bank_select & 0x0F {
                        n @ 0..=9 => self.r[n as usize] = val,
                        _ => self.rf = val,
                    }
                }
            }
            0xA000..=0xBFFF => {
                if addr & 1 == 0 {
                    self.mirroring =
                        if val & 1 != 0 { Mirroring::Horizontal } else { Mirroring::Vertical };
                }
            }
            0xC000..=0xDFFF => {
                if addr & 1 == 0 {
                    self.irq_latch = val;
                } else {
                    self.irq_mode_cycle = val & 1 != 0;
                }
            }
            0xE000..=0xFFFF => {
                if addr & 1 == 0 {
                    self.irq_enabled = false;
                    self.irq_pending = false;
                } else {
                    self.irq_enabled = true;
                }
            }
            _ => {}
        }
    }

    fn read_chr(&self, addr: u16) -> u8 {
        self.chr.get(self.chr_addr(addr)).copied().unwrap_or(0)
    }

    fn write_chr(&mut self, addr: u16, val: u8) {
        if self.chr_is_ram {
            let offset = self.chr_addr(addr);
            if let Some(byte) = self.chr.get_mut(offset) {
                *byte = val;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    fn irq_acknowledge(&mut self) {
        self.irq_pending = false;
    }

    fn clock(&mut self, cycles: u8) {
        if !self.irq_mode_cycle {
            return;
        }
        self.cycle_accum += cycles;
        while self.cycle_accum >= 4 {
            self.cycle_accum -= 4;
            self.clock_irq();
        }
    }

    fn scanline(&mut self) {
        if !self.irq_mode_cycle {
            self.clock_irq();
        }
    }

    fn mapper_number(&self) -> u16 {
        64
    }

    fn mapper_name(&self) -> &'static str {
        "RAMBO-1"
    }

    fn has_battery(&self) -> bool {
        self.has_battery
    }

    fn battery_ram(&self) -> Option<&[u8]> {
        if self.has_battery { Some(&self.prg_ram) } else { None }
    }

    fn set_battery_ram(&mut self, data: &[u8]) {
        let len = data.len().min(self.prg_ram.len());
        self.prg_ram[..len].copy_from_slice(&data[..len]);
    }

    fn reset(&mut self) {
        self.bank_select = 0;
        self.r = [0, 2, 4, 5, 6, 7, 0, 1, 0, 0];
        self.rf = 2;
        self.irq_latch = 0;
        self.irq_counter = 0;
        self.irq_mode_cycle = false;
        self.irq_enabled = false;
        self.irq_pending = false;
        self.cycle_accum = 0;
    }

    fn clone_mapper(&self) -> Box<dyn Mapper> {
        Box::new(self.clone())
    }

    fn save_state(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(18 + self.chr.len());
        data.push(self.bank_select);
        data.extend_from_slice(&self.r);
        data.push(self.rf);
        data.push(self.mirroring.to_byte());
        data.push(self.irq_latch);
        data.push(self.irq_counter);
        data.push(
            u8::from(self.irq_mode_cycle)
                | (u8::from(self.irq_enabled) << 1)
                | (u8::from(self.irq_pending) << 2),
        );
        data.push(self.cycle_accum);
        if self.chr_is_ram {
            data.extend_from_slice(&self.chr);
        }
        data
    }

    fn load_state(&mut self, data: &[u8]) {
        if data.len() < 17 {
            return;
        }
        self.bank_select = data[0];
        self.r.copy_from_slice(&data[1..11]);
        self.rf = data[11];
        self.mirroring = Mirroring::from_byte(data[12]);
        self.irq_latch = data[13];
        self.irq_counter = data[14];
        self.irq_mode_cycle = data[15] & 1 != 0;
        self.irq_enabled = data[15] & 2 != 0;
        self.irq_pending = data[15] & 4 != 0;
        self.cycle_accum = data[16];
        if self.chr_is_ram && data.len() == 17 + self.chr.len() {
            self.chr.copy_from_slice(&data[17..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::RomHeader;

    fn create_test_rom(prg_8k_banks: u8, chr_1k_banks: u16) -> Rom {
        let prg_size = prg_8k_banks as usize * 8192;
        let chr_size = chr_1k_banks as usize * 1024;

        let mut prg_rom = vec![0u8; prg_size];
        for bank in 0..prg_8k_banks as usize {
            for b in prg_rom[bank * 8192..(bank + 1) * 8192].iter_mut() {
                *b = bank as u8;
            }
        }

        let mut chr_rom = vec![0u8; chr_size];
        for bank in 0..chr_1k_banks as usize {
            for b in chr_rom[bank * 1024..(bank + 1) * 1024].iter_mut() {
                *b = bank as u8;
            }
        }

        Rom {
            header: RomHeader {
                prg_rom_size: prg_size,
                chr_rom_size: chr_size,
                mapper_number: 64,
                submapper: 0,
                mirroring: Mirroring::Vertical,
                has_battery: true,
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
    fn test_rambo_initial_prg_banks() {
        let rom = create_test_rom(16, 32);
        let mapper = Rambo::new(&rom);
        assert_eq!(mapper.read_prg(0x8000), 0);
        assert_eq!(mapper.read_prg(0xA000), 1);
        assert_eq!(mapper.read_prg(0xC000), 2);
        assert_eq!(mapper.read_prg(0xE000), 15);
    }

    #[test]
    fn test_rambo_bank_data_register() {
        let rom = create_test_rom(16, 32);
        let mut mapper = Rambo::new(&rom);
        mapper.write_prg(0x8000, 6); // select R6
        mapper.write_prg(0x8001, 9);
        assert_eq!(mapper.read_prg(0x8000), 9);
    }

    #[test]
    fn test_rambo_prg_mode_swap() {
        let rom = create_test_rom(16, 32);
        let mut mapper = Rambo::new(&rom);
        mapper.write_prg(0x8000, 0x46); // mode bit set, select R6
        mapper.write_prg(0x8001, 5);
        // mode 1: $8000=RF, $C000=R6
        assert_eq!(mapper.read_prg(0xC000), 5);
    }

    #[test]
    fn test_rambo_mirroring_control() {
        let rom = create_test_rom(16, 32);
        let mut mapper = Rambo::new(&rom);
        assert_eq!(mapper.mirroring(), Mirroring::Vertical);
        mapper.write_prg(0xA000, 1);
        assert_eq!(mapper.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn test_rambo_scanline_irq() {
        let rom = create_test_rom(16, 32);
        let mut mapper = Rambo::new(&rom);
        mapper.write_prg(0xC000, 2); // latch = 2
        mapper.write_prg(0xC001, 0); // mode = scanline
        mapper.write_prg(0xE001, 0); // enable

        assert!(!mapper.irq_pending());
        mapper.scanline();
        assert!(!mapper.irq_pending());
        mapper.scanline();
        assert!(!mapper.irq_pending());
        mapper.scanline();
        assert!(mapper.irq_pending());

        mapper.irq_acknowledge();
        assert!(!mapper.irq_pending());
    }

    #[test]
    fn test_rambo_cycle_mode_irq_ignores_scanline() {
        let rom = create_test_rom(16, 32);
        let mut mapper = Rambo::new(&rom);
        mapper.write_prg(0xC000, 1);
        mapper.write_prg(0xC001, 1); // cycle mode
        mapper.write_prg(0xE001, 0);

        mapper.scanline();
        mapper.scanline();
        assert!(!mapper.irq_pending());

        mapper.clock(4);
        mapper.clock(4);
        assert!(mapper.irq_pending());
    }

    #[test]
    fn test_rambo_battery_ram() {
        let rom = create_test_rom(16, 32);
        let mut mapper = Rambo::new(&rom);
        assert!(mapper.has_battery());
        mapper.write_prg(0x6000, 0x55);
        assert_eq!(mapper.battery_ram().unwrap()[0], 0x55);
    }
}
