//! Mapper Trait Definition.
//!
//! This module defines the core `Mapper` trait that all NES cartridge mappers
//! must implement. Mappers handle memory banking for PRG-ROM, CHR-ROM/RAM,
//! and provide mirroring control.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

/// Nametable mirroring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mirroring {
    /// Horizontal mirroring (vertical arrangement).
    #[default]
    Horizontal,
    /// Vertical mirroring (horizontal arrangement).
    Vertical,
    /// Single-screen, lower bank.
    SingleScreenLower,
    /// Single-screen, upper bank.
    SingleScreenUpper,
    /// Four-screen (uses extra VRAM).
    FourScreen,
}

impl Mirroring {
    /// Encode for save-state payloads.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
            Self::SingleScreenLower => 2,
            Self::SingleScreenUpper => 3,
            Self::FourScreen => 4,
        }
    }

    /// Decode a byte produced by [`Mirroring::to_byte`], falling back to
    /// `Horizontal` for an out-of-range value rather than panicking on a
    /// corrupt save state.
    #[must_use]
    pub fn from_byte(val: u8) -> Self {
        match val {
            1 => Self::Vertical,
            2 => Self::SingleScreenLower,
            3 => Self::SingleScreenUpper,
            4 => Self::FourScreen,
            _ => Self::Horizontal,
        }
    }
}

/// Mapper trait.
///
/// All NES cartridge mappers must implement this trait. The mapper handles:
/// - PRG-ROM/RAM memory access (CPU $8000-$FFFF, optionally $6000-$7FFF)
/// - CHR-ROM/RAM memory access (PPU $0000-$1FFF)
/// - Nametable mirroring control
/// - Optional IRQ generation
/// - Optional scanline counting
pub trait Mapper: Send + Sync {
    /// Read a byte from PRG memory (CPU address space).
    ///
    /// Address range: $6000-$FFFF
    /// - $6000-$7FFF: PRG-RAM (battery-backed or work RAM)
    /// - $8000-$FFFF: PRG-ROM (banked)
    fn read_prg(&self, addr: u16) -> u8;

    /// Write a byte to PRG memory (CPU address space).
    ///
    /// Address range: $6000-$FFFF
    /// - $6000-$7FFF: PRG-RAM writes (if present)
    /// - $8000-$FFFF: Mapper register writes
    fn write_prg(&mut self, addr: u16, val: u8);

    /// Read a byte from CHR memory (PPU address space).
    ///
    /// Address range: $0000-$1FFF
    fn read_chr(&self, addr: u16) -> u8;

    /// Write a byte to CHR memory (PPU address space).
    ///
    /// Only works if the cartridge has CHR-RAM instead of CHR-ROM.
    fn write_chr(&mut self, addr: u16, val: u8);

    /// Get the current nametable mirroring mode.
    fn mirroring(&self) -> Mirroring;

    /// Check if the mapper has a pending IRQ.
    fn irq_pending(&self) -> bool {
        false
    }

    /// Acknowledge/clear the IRQ.
    fn irq_acknowledge(&mut self) {}

    /// Clock the mapper (called every CPU cycle).
    ///
    /// Some mappers (like MMC3) count CPU cycles for IRQ timing.
    fn clock(&mut self, _cycles: u8) {}

    /// Notify the mapper of a scanline (called every PPU scanline).
    ///
    /// Some mappers (like MMC3) count scanlines for IRQ timing.
    fn scanline(&mut self) {}

    /// Notify the mapper of PPU A12 rising edge.
    ///
    /// MMC3 uses A12 for IRQ timing.
    fn ppu_a12_rising(&mut self) {}

    /// Get the mapper number (iNES mapper ID).
    fn mapper_number(&self) -> u16;

    /// Get the mapper name.
    fn mapper_name(&self) -> &'static str;

    /// Check if the mapper has battery-backed RAM.
    fn has_battery(&self) -> bool {
        false
    }

    /// Get a reference to the battery-backed RAM for saving.
    fn battery_ram(&self) -> Option<&[u8]> {
        None
    }

    /// Set the battery-backed RAM content (for loading saves).
    fn set_battery_ram(&mut self, _data: &[u8]) {}

    /// Reset the mapper to its initial state.
    fn reset(&mut self) {}

    /// Clone this mapper into a freshly boxed trait object.
    ///
    /// Used by the save-state loader to stage a candidate cartridge state
    /// into a temporary before committing it, so a malformed payload never
    /// corrupts the live mapper (§7: failed save-state load leaves prior
    /// state intact).
    fn clone_mapper(&self) -> Box<dyn Mapper>;

    /// Special write hook for any CPU write into $4020-$FFFF.
    ///
    /// Default forwards to [`Mapper::write_prg`]; mappers whose register
    /// writes and PRG-RAM writes need to be told apart (none currently in
    /// this crate do) can override this instead.
    fn write_special(&mut self, addr: u16, val: u8) {
        self.write_prg(addr, val);
    }

    /// Called by the PPU whenever it reads a pattern-table address.
    ///
    /// MMC2/MMC4 use this to flip their CHR latches; MMC3-family mappers
    /// use `ppu_a12_rising` instead since their IRQ counter only cares
    /// about the A12 edge, not the specific address.
    fn ppu_address_observed(&mut self, _addr: u16) {}

    /// Called once after save-state load, so mappers with derived state
    /// (e.g. MMC2/MMC4's CHR latch mapping) can recompute it.
    fn state_loaded(&mut self) {}

    /// Serialize mapper-internal state (bank-select registers, CHR-RAM,
    /// IRQ counters) not otherwise exposed by this trait.
    ///
    /// The save-state loader recreates the mapper from the ROM first (via
    /// [`crate::create_mapper`]), then feeds this back through
    /// [`Mapper::load_state`] to restore anything beyond the freshly-loaded
    /// ROM contents. Default is an empty payload, meaning the mapper has no
    /// extra state to persist.
    fn save_state(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Restore mapper-internal state previously produced by
    /// [`Mapper::save_state`]. Default is a no-op.
    fn load_state(&mut self, _data: &[u8]) {}
}
