//! NES Cartridge Mapper Implementations.
//!
//! This crate provides mapper implementations for NES cartridge emulation.
//! Mappers handle memory banking for PRG-ROM, CHR-ROM/RAM, and provide
//! various hardware features like IRQ generation.
//!
//! # Supported Mappers
//!
//! | Mapper | Name | Description |
//! |--------|------|-------------|
//! | 0 | NROM | No banking, simplest mapper |
//! | 1 | MMC1 | Nintendo's first bank-switching mapper |
//! | 2 | UxROM | PRG-ROM banking only |
//! | 3 | CNROM | CHR-ROM banking only |
//! | 4 | MMC3 | Most popular, fine-grained banking + IRQ |
//! | 7 | AxROM | 32KB PRG banking, single-screen mirroring |
//! | 9 | MMC2 | Punch-Out!! latch-switched CHR banking |
//! | 10 | MMC4 | Fire Emblem latch-switched CHR banking |
//! | 11 | Color Dreams | Combined PRG/CHR bank select |
//! | 34 | BNROM | 32KB PRG banking, CHR-RAM |
//! | 64 | RAMBO-1 | MMC3-like with extra IRQ mode |
//! | 66 / 140 | GxROM | Combined PRG/CHR bank select |
//! | 67 | Sunsoft-3 | CPU-clock-timestamp IRQ |
//! | 68 | Sunsoft-4 | Optional nametable-from-CHR |
//! | 69 | Sunsoft FME-7 | 16-bit down-counter IRQ, expansion audio |
//! | 71 | Camerica | Codemasters/Camerica bank switching |
//! | 79 | AVE/NINA-03/06 | Combined PRG/CHR bank select |
//! | 163 | Nanjing | Protection registers, mid-frame CHR flip |
//!
//! # Example
//!
//! ```no_run
//! use rustynes_mappers::{Rom, create_mapper};
//!
//! // Load ROM from file
//! let rom_data = std::fs::read("game.nes").expect("Failed to read ROM");
//! let rom = Rom::load(&rom_data).expect("Failed to parse ROM");
//!
//! // Create appropriate mapper
//! let mut mapper = create_mapper(&rom).expect("Unsupported mapper");
//!
//! // Use mapper for memory access
//! let opcode = mapper.read_prg(0x8000);
//! let tile = mapper.read_chr(0x0000);
//! ```
//!
//! # no_std Support
//!
//! This crate supports `no_std` environments with the `alloc` feature.
//! Disable the default `std` feature for embedded use.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

pub mod bank_cache;
pub mod mapper;
pub mod rom;

mod ave;
mod axrom;
mod bnrom;
mod camerica;
mod cnrom;
mod colordreams;
mod fme7;
mod gxrom;
mod mmc1;
mod mmc2;
mod mmc3;
mod nanjing;
mod nrom;
mod rambo;
mod sunsoft3;
mod sunsoft4;
mod uxrom;

pub use ave::Ave;
pub use axrom::Axrom;
pub use bnrom::Bnrom;
pub use camerica::Camerica;
pub use cnrom::Cnrom;
pub use colordreams::ColorDreams;
pub use fme7::Fme7;
pub use gxrom::Gxrom;
pub use mapper::{Mapper, Mirroring};
pub use mmc1::Mmc1;
pub use mmc2::Mmc2;
pub use mmc3::Mmc3;
pub use nanjing::Nanjing;
pub use nrom::Nrom;
pub use rambo::Rambo;
pub use rom::{CartError, Rom, RomHeader};
pub use sunsoft3::Sunsoft3;
pub use sunsoft4::Sunsoft4;
pub use uxrom::Uxrom;

/// Create a mapper instance from ROM data.
///
/// Returns the appropriate mapper implementation based on the ROM header's
/// mapper number. Returns an error if the mapper is not supported.
///
/// # Errors
///
/// Returns `CartError::UnsupportedMapper` if the mapper number is not
/// implemented in this crate.
///
/// # Example
///
/// ```no_run
/// use rustynes_mappers::{Rom, create_mapper};
///
/// let rom_data = std::fs::read("game.nes").expect("Failed to read ROM");
/// let rom = Rom::load(&rom_data).expect("Failed to parse ROM");
/// let mapper = create_mapper(&rom).expect("Unsupported mapper");
///
/// println!("Mapper: {} ({})", mapper.mapper_name(), mapper.mapper_number());
/// ```
pub fn create_mapper(rom: &Rom) -> Result<Box<dyn Mapper>, CartError> {
    match rom.header.mapper_number {
        0 => Ok(Box::new(Nrom::new(rom))),
        1 => Ok(Box::new(Mmc1::new(rom))),
        2 => Ok(Box::new(Uxrom::new(rom))),
        3 => Ok(Box::new(Cnrom::new(rom))),
        4 => Ok(Box::new(Mmc3::new(rom))),
        7 => Ok(Box::new(Axrom::new(rom))),
        9 => Ok(Box::new(Mmc2::new_mmc2(rom))),
        10 => Ok(Box::new(Mmc2::new_mmc4(rom))),
        11 => Ok(Box::new(ColorDreams::new(rom))),
        34 => Ok(Box::new(Bnrom::new(rom))),
        64 => Ok(Box::new(Rambo::new(rom))),
        66 | 140 => Ok(Box::new(Gxrom::new(rom))),
        67 => Ok(Box::new(Sunsoft3::new(rom))),
        68 => Ok(Box::new(Sunsoft4::new(rom))),
        69 => Ok(Box::new(Fme7::new(rom))),
        71 => Ok(Box::new(Camerica::new(rom))),
        79 => Ok(Box::new(Ave::new(rom))),
        163 => Ok(Box::new(Nanjing::new(rom))),
        n => Err(CartError::UnsupportedMapper(n)),
    }
}

/// Get a list of supported mapper numbers.
#[must_use]
pub fn supported_mappers() -> &'static [u16] {
    &[
        0, 1, 2, 3, 4, 7, 9, 10, 11, 34, 64, 66, 67, 68, 69, 71, 79, 140, 163,
    ]
}

/// Check if a mapper number is supported.
#[must_use]
pub fn is_mapper_supported(mapper: u16) -> bool {
    supported_mappers().contains(&mapper)
}

/// Get the name of a mapper by number.
#[must_use]
pub fn mapper_name(mapper: u16) -> Option<&'static str> {
    match mapper {
        0 => Some("NROM"),
        1 => Some("MMC1"),
        2 => Some("UxROM"),
        3 => Some("CNROM"),
        4 => Some("MMC3"),
        7 => Some("AxROM"),
        9 => Some("MMC2"),
        10 => Some("MMC4"),
        11 => Some("Color Dreams"),
        34 => Some("BNROM"),
        64 => Some("RAMBO-1"),
        66 | 140 => Some("GxROM"),
        67 => Some("Sunsoft-3"),
        68 => Some("Sunsoft-4"),
        69 => Some("Sunsoft FME-7"),
        71 => Some("Camerica"),
        79 => Some("AVE/NINA-03/06"),
        163 => Some("Nanjing"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_rom(mapper: u16) -> Rom {
        let prg_rom: Vec<u8> = (0..32768).map(|i| (i & 0xFF) as u8).collect();
        let chr_rom: Vec<u8> = (0..8192).map(|i| (i & 0xFF) as u8).collect();

        Rom {
            header: RomHeader {
                prg_rom_size: 32768,
                chr_rom_size: 8192,
                mapper_number: mapper,
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
    fn test_create_mapper_nrom() {
        let rom = create_test_rom(0);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 0);
        assert_eq!(mapper.mapper_name(), "NROM");
    }

    #[test]
    fn test_create_mapper_mmc1() {
        let rom = create_test_rom(1);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 1);
        assert_eq!(mapper.mapper_name(), "MMC1");
    }

    #[test]
    fn test_create_mapper_uxrom() {
        let rom = create_test_rom(2);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 2);
        assert_eq!(mapper.mapper_name(), "UxROM");
    }

    #[test]
    fn test_create_mapper_cnrom() {
        let rom = create_test_rom(3);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 3);
        assert_eq!(mapper.mapper_name(), "CNROM");
    }

    #[test]
    fn test_create_mapper_mmc3() {
        let rom = create_test_rom(4);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 4);
        assert_eq!(mapper.mapper_name(), "MMC3");
    }

    #[test]
    fn test_create_mapper_axrom() {
        let rom = create_test_rom(7);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 7);
    }

    #[test]
    fn test_create_mapper_mmc2() {
        let rom = create_test_rom(9);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 9);
    }

    #[test]
    fn test_create_mapper_mmc4() {
        let rom = create_test_rom(10);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 10);
    }

    #[test]
    fn test_create_mapper_color_dreams() {
        let rom = create_test_rom(11);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 11);
    }

    #[test]
    fn test_create_mapper_bnrom() {
        let rom = create_test_rom(34);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 34);
    }

    #[test]
    fn test_create_mapper_rambo() {
        let rom = create_test_rom(64);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 64);
    }

    #[test]
    fn test_create_mapper_gxrom() {
        let rom = create_test_rom(66);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 66);
    }

    #[test]
    fn test_create_mapper_gxrom_submapper_140() {
        let rom = create_test_rom(140);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 66);
    }

    #[test]
    fn test_create_mapper_sunsoft3() {
        let rom = create_test_rom(67);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 67);
    }

    #[test]
    fn test_create_mapper_sunsoft4() {
        let rom = create_test_rom(68);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 68);
    }

    #[test]
    fn test_create_mapper_fme7() {
        let rom = create_test_rom(69);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 69);
    }

    #[test]
    fn test_create_mapper_camerica() {
        let rom = create_test_rom(71);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 71);
    }

    #[test]
    fn test_create_mapper_aorom() {
        let rom = create_test_rom(79);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 79);
    }

    #[test]
    fn test_create_mapper_nanjing() {
        let rom = create_test_rom(163);
        let mapper = create_mapper(&rom).unwrap();
        assert_eq!(mapper.mapper_number(), 163);
    }

    #[test]
    fn test_create_mapper_unsupported() {
        let rom = create_test_rom(9999);
        let result = create_mapper(&rom);
        assert!(matches!(result, Err(CartError::UnsupportedMapper(9999))));
    }

    #[test]
    fn test_is_mapper_supported() {
        assert!(is_mapper_supported(0));
        assert!(is_mapper_supported(4));
        assert!(is_mapper_supported(163));
        assert!(!is_mapper_supported(9999));
    }

    #[test]
    fn test_mapper_name() {
        assert_eq!(mapper_name(0), Some("NROM"));
        assert_eq!(mapper_name(1), Some("MMC1"));
        assert_eq!(mapper_name(4), Some("MMC3"));
        assert_eq!(mapper_name(9999), None);
    }

    #[test]
    fn test_mapper_trait_read_write() {
        let rom = create_test_rom(0);
        let mut mapper = create_mapper(&rom).unwrap();

        // Read PRG-ROM
        let val = mapper.read_prg(0x8000);
        assert_eq!(val, 0); // First byte of PRG-ROM

        // Write has no effect on NROM
        mapper.write_prg(0x8000, 0xFF);
        assert_eq!(mapper.read_prg(0x8000), 0);
    }
}
