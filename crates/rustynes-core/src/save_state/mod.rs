//! Save state system for `RustyNES`.
//!
//! A save state is a header followed by a `bincode`-encoded payload:
//!
//! ```text
//! ┌──────────┬─────────┬──────────┬───────────────┬──────────────┐
//! │ Magic(4) │ Ver(4)  │ CRC32(4) │ ROM print (4) │ Payload (..) │
//! └──────────┴─────────┴──────────┴───────────────┴──────────────┘
//! ```
//!
//! `Magic` is always `b"RNES"`. `CRC32` is the checksum of the payload
//! bytes (detects truncation/corruption); `ROM print` is a CRC32 computed
//! from the mapper number plus the fixed interrupt-vector bytes at the top
//! of PRG-ROM, which every mapper maps to a non-switchable bank, so it
//! identifies the cartridge without needing access to the raw ROM image
//! (detects loading a state captured against a different game).
//!
//! The payload itself bundles the CPU, PPU and APU (all of which already
//! derive `serde::Serialize`/`Deserialize`), system RAM, controller state,
//! mapper-internal state (via [`rustynes_mappers::Mapper::save_state`]) and
//! a handful of bus-level counters that don't live on any one component.

pub mod error;

pub use error::SaveStateError;

use rustynes_apu::Apu;
use rustynes_cpu::Cpu;
use rustynes_ppu::Ppu;
use serde::{Deserialize, Serialize};

use crate::bus::{BusMiscState, ControllerState};
use crate::console::Console;

#[cfg(not(feature = "std"))]
use alloc::{string::ToString, vec::Vec};

/// Save state format version.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Magic bytes identifying a `RustyNES` save state.
pub const SAVE_STATE_MAGIC: &[u8; 4] = b"RNES";

/// Header size in bytes (magic + version + checksum + ROM fingerprint).
const HEADER_SIZE: usize = 4 + 4 + 4 + 4;

/// Number of fixed bytes sampled from the top of PRG-ROM for the ROM
/// fingerprint. $FFF0-$FFFF covers the IRQ/reset/NMI vectors, which must
/// resolve to a stable bank on every mapper.
const FINGERPRINT_SAMPLE: u16 = 16;

#[derive(Serialize, Deserialize)]
struct SaveStatePayload {
    cpu: Cpu,
    ram: Vec<u8>,
    ppu: Ppu,
    apu: Apu,
    bus_misc: BusMiscState,
    controller1: ControllerState,
    controller2: ControllerState,
    mapper_number: u16,
    mapper_state: Vec<u8>,
    frame_count: u64,
    total_cycles: u64,
}

/// Compute the ROM fingerprint for the currently loaded mapper.
fn rom_fingerprint(mapper: &dyn rustynes_mappers::Mapper) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&mapper.mapper_number().to_le_bytes());
    for addr in (0x10000 - FINGERPRINT_SAMPLE)..=0xFFFF {
        hasher.update(&[mapper.read_prg(addr)]);
    }
    hasher.finalize()
}

impl Console {
    /// Serialize the full emulation state into a save-state buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded.
    pub fn save_state(&self) -> Result<Vec<u8>, SaveStateError> {
        let payload = SaveStatePayload {
            cpu: self.cpu.clone(),
            ram: self.bus.ram.to_vec(),
            ppu: self.bus.ppu.clone(),
            apu: self.bus.apu.clone(),
            bus_misc: self.bus.misc_state(),
            controller1: self.bus.controller1,
            controller2: self.bus.controller2,
            mapper_number: self.bus.mapper.mapper_number(),
            mapper_state: self.bus.mapper.save_state(),
            frame_count: self.frame_count,
            total_cycles: self.total_cycles,
        };

        let payload_bytes = bincode::serde::encode_to_vec(&payload, bincode::config::standard())
            .map_err(|e| SaveStateError::Decode(e.to_string()))?;

        let checksum = crc32fast::hash(&payload_bytes);
        let rom_print = rom_fingerprint(&*self.bus.mapper);

        let mut out = Vec::with_capacity(HEADER_SIZE + payload_bytes.len());
        out.extend_from_slice(SAVE_STATE_MAGIC);
        out.extend_from_slice(&SAVE_STATE_VERSION.to_le_bytes());
        out.extend_from_slice(&checksum.to_le_bytes());
        out.extend_from_slice(&rom_print.to_le_bytes());
        out.extend_from_slice(&payload_bytes);
        Ok(out)
    }

    /// Restore emulation state previously produced by
    /// [`Console::save_state`].
    ///
    /// The payload is fully decoded and validated into a temporary before
    /// any live field is touched, and the mapper is restored via a cloned
    /// staging copy (see [`rustynes_mappers::Mapper::clone_mapper`]), so a
    /// malformed or mismatched save state leaves the console untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is invalid, the version is
    /// unsupported, the checksum doesn't match, the ROM fingerprint or
    /// mapper number doesn't match the currently loaded cartridge, or the
    /// payload fails to decode.
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), SaveStateError> {
        if data.len() < HEADER_SIZE {
            return Err(SaveStateError::InsufficientData {
                needed: HEADER_SIZE,
                available: data.len(),
            });
        }

        if &data[0..4] != SAVE_STATE_MAGIC {
            return Err(SaveStateError::InvalidMagic);
        }

        let version = u32::from_le_bytes(data[4..8].try_into().unwrap());
        if version != SAVE_STATE_VERSION {
            return Err(SaveStateError::UnsupportedVersion(version));
        }

        let expected_checksum = u32::from_le_bytes(data[8..12].try_into().unwrap());
        let expected_rom_print = u32::from_le_bytes(data[12..16].try_into().unwrap());
        let payload_bytes = &data[HEADER_SIZE..];

        let actual_checksum = crc32fast::hash(payload_bytes);
        if actual_checksum != expected_checksum {
            return Err(SaveStateError::ChecksumMismatch {
                expected: expected_checksum,
                actual: actual_checksum,
            });
        }

        let actual_rom_print = rom_fingerprint(&*self.bus.mapper);
        if expected_rom_print != actual_rom_print {
            return Err(SaveStateError::RomMismatch {
                expected: expected_rom_print,
                actual: actual_rom_print,
            });
        }

        let (payload, _): (SaveStatePayload, usize) =
            bincode::serde::decode_from_slice(payload_bytes, bincode::config::standard())
                .map_err(|e| SaveStateError::Decode(e.to_string()))?;

        let current_mapper_number = self.bus.mapper.mapper_number();
        if payload.mapper_number != current_mapper_number {
            return Err(SaveStateError::MapperMismatch {
                expected: payload.mapper_number,
                actual: current_mapper_number,
            });
        }

        if payload.ram.len() != self.bus.ram.len() {
            return Err(SaveStateError::InsufficientData {
                needed: self.bus.ram.len(),
                available: payload.ram.len(),
            });
        }

        // Stage the mapper into a clone first: a corrupt `mapper_state`
        // payload must not be able to leave the live mapper half-updated.
        let mut staged_mapper = self.bus.mapper.clone_mapper();
        staged_mapper.load_state(&payload.mapper_state);
        staged_mapper.state_loaded();

        // Everything validated and decoded successfully; commit.
        self.cpu = payload.cpu;
        self.bus.ram.copy_from_slice(&payload.ram);
        self.bus.ppu = payload.ppu;
        self.bus.apu = payload.apu;
        self.bus.set_misc_state(payload.bus_misc);
        self.bus.controller1 = payload.controller1;
        self.bus.controller2 = payload.controller2;
        self.bus.mapper = staged_mapper;
        self.frame_count = payload.frame_count;
        self.total_cycles = payload.total_cycles;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustynes_mappers::{Mirroring, Nrom, Rom, RomHeader};

    #[cfg(not(feature = "std"))]
    use alloc::{boxed::Box, vec};

    fn test_rom() -> Rom {
        Rom {
            header: RomHeader {
                prg_rom_size: 32768,
                chr_rom_size: 8192,
                mapper_number: 0,
                submapper: 0,
                mirroring: Mirroring::Vertical,
                has_battery: false,
                has_trainer: false,
                nes2_format: false,
                prg_ram_size: 0,
                prg_nvram_size: 0,
                chr_ram_size: 0,
                chr_nvram_size: 0,
            },
            prg_rom: {
                let mut prg = vec![0xEA; 32768];
                prg[0x7FFC] = 0x00;
                prg[0x7FFD] = 0x80;
                prg
            },
            chr_rom: vec![0; 8192],
            trainer: None,
        }
    }

    fn test_console() -> Console {
        let rom = test_rom();
        Console::with_mapper(Box::new(Nrom::new(&rom))).unwrap()
    }

    #[test]
    fn round_trip_preserves_cycles() {
        let mut console = test_console();
        console.reset();
        for _ in 0..50 {
            console.step();
        }

        let snapshot = console.save_state().expect("save should succeed");

        for _ in 0..50 {
            console.step();
        }
        let cycles_after_more_steps = console.total_cycles();

        console
            .load_state(&snapshot)
            .expect("load should succeed on matching cartridge");

        assert_ne!(console.total_cycles(), cycles_after_more_steps);
    }

    #[test]
    fn rejects_corrupt_magic() {
        let console = test_console();
        let mut snapshot = console.save_state().unwrap();
        snapshot[0] = b'X';

        let mut console = console;
        let err = console.load_state(&snapshot).unwrap_err();
        assert!(matches!(err, SaveStateError::InvalidMagic));
    }

    #[test]
    fn rejects_corrupt_payload_checksum() {
        let console = test_console();
        let mut snapshot = console.save_state().unwrap();
        let last = snapshot.len() - 1;
        snapshot[last] ^= 0xFF;

        let mut console = console;
        let err = console.load_state(&snapshot).unwrap_err();
        assert!(matches!(err, SaveStateError::ChecksumMismatch { .. }));
    }

    #[test]
    fn failed_load_leaves_console_state_intact() {
        let mut console = test_console();
        console.reset();
        for _ in 0..10 {
            console.step();
        }
        let cycles_before = console.total_cycles();

        let mut bad_snapshot = console.save_state().unwrap();
        bad_snapshot[4] = 0xFF; // corrupt version field

        let err = console.load_state(&bad_snapshot).unwrap_err();
        assert!(matches!(err, SaveStateError::UnsupportedVersion(_)));
        assert_eq!(console.total_cycles(), cycles_before);
    }
}
