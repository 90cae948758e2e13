// Cartridge module - iNES ROM loading and mapper dispatch
//
// A Cartridge owns the raw PRG/CHR memory extracted from an iNES image plus
// the mapper that knows how to bank it into the CPU and PPU address spaces.
// The mapper is stored as a trait object so the rest of the system never has
// to know which mapper number a given game uses.

pub mod mappers;

use thiserror::Error;
use tracing::{debug, warn};

pub use mappers::{create_mapper, MapperError};

const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A]; // "NES\x1A"
const PRG_BANK_SIZE: usize = 16 * 1024;
const CHR_BANK_SIZE: usize = 8 * 1024;
const TRAINER_SIZE: usize = 512;

/// Nametable mirroring mode, determined by the cartridge header or mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    SingleScreen,
    FourScreen,
}

/// Errors that can occur while parsing an iNES file.
#[derive(Debug, Error)]
pub enum INesError {
    #[error("file too short to contain an iNES header ({0} bytes)")]
    TooShort(usize),
    #[error("missing NES\\x1A magic number")]
    BadMagic,
    #[error("file is shorter than the header declares (need {needed} bytes, have {have})")]
    Truncated { needed: usize, have: usize },
    #[error(transparent)]
    Mapper(#[from] MapperError),
}

/// Parsed contents of the 16-byte iNES header.
#[derive(Debug, Clone, Copy)]
pub struct INesHeader {
    pub prg_rom_banks: u8,
    pub chr_rom_banks: u8,
    pub mapper_id: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
    pub has_trainer: bool,
}

impl INesHeader {
    fn parse(bytes: &[u8; 16]) -> Result<Self, INesError> {
        if bytes[0..4] != INES_MAGIC {
            return Err(INesError::BadMagic);
        }

        let prg_rom_banks = bytes[4];
        let chr_rom_banks = bytes[5];
        let flags6 = bytes[6];
        let flags7 = bytes[7];

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);

        Ok(INesHeader {
            prg_rom_banks,
            chr_rom_banks,
            mapper_id,
            mirroring,
            has_battery: flags6 & 0x02 != 0,
            has_trainer: flags6 & 0x04 != 0,
        })
    }
}

/// A loaded NES cartridge: raw memory plus the mapper that banks it.
pub struct Cartridge {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub trainer: Option<[u8; TRAINER_SIZE]>,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
    /// True when the header declared zero CHR-ROM banks, meaning `chr_rom`
    /// backs writable CHR-RAM rather than read-only CHR-ROM.
    pub chr_is_ram: bool,
}

impl Cartridge {
    /// Create an empty placeholder cartridge (no PRG/CHR data).
    pub fn new() -> Self {
        Cartridge {
            prg_rom: Vec::new(),
            chr_rom: Vec::new(),
            trainer: None,
            mapper: 0,
            mirroring: Mirroring::Horizontal,
            has_battery: false,
            chr_is_ram: false,
        }
    }

    /// Parse an iNES (.nes) image into a Cartridge.
    ///
    /// CHR-RAM is signalled by `chr_rom_banks == 0`; in that case 8KB of
    /// zeroed CHR memory is allocated so mappers can always index `chr_rom`
    /// directly regardless of whether it backs ROM or RAM.
    pub fn from_ines_bytes(bytes: &[u8]) -> Result<Self, INesError> {
        if bytes.len() < 16 {
            return Err(INesError::TooShort(bytes.len()));
        }

        let mut header_bytes = [0u8; 16];
        header_bytes.copy_from_slice(&bytes[0..16]);
        let header = INesHeader::parse(&header_bytes)?;

        debug!(
            prg_banks = header.prg_rom_banks,
            chr_banks = header.chr_rom_banks,
            mapper = header.mapper_id,
            "parsed iNES header"
        );

        let mut offset = 16;
        let trainer = if header.has_trainer {
            let needed = offset + TRAINER_SIZE;
            if bytes.len() < needed {
                return Err(INesError::Truncated {
                    needed,
                    have: bytes.len(),
                });
            }
            let mut t = [0u8; TRAINER_SIZE];
            t.copy_from_slice(&bytes[offset..needed]);
            offset += TRAINER_SIZE;
            Some(t)
        } else {
            None
        };

        let prg_size = header.prg_rom_banks as usize * PRG_BANK_SIZE;
        let prg_end = offset + prg_size;
        if bytes.len() < prg_end {
            return Err(INesError::Truncated {
                needed: prg_end,
                have: bytes.len(),
            });
        }
        let prg_rom = bytes[offset..prg_end].to_vec();
        offset = prg_end;

        let chr_is_ram = header.chr_rom_banks == 0;
        let chr_rom = if chr_is_ram {
            warn!("cartridge has no CHR-ROM banks, allocating 8KB of CHR-RAM");
            vec![0u8; CHR_BANK_SIZE]
        } else {
            let chr_size = header.chr_rom_banks as usize * CHR_BANK_SIZE;
            let chr_end = offset + chr_size;
            if bytes.len() < chr_end {
                return Err(INesError::Truncated {
                    needed: chr_end,
                    have: bytes.len(),
                });
            }
            bytes[offset..chr_end].to_vec()
        };

        Ok(Cartridge {
            prg_rom,
            chr_rom,
            trainer,
            mapper: header.mapper_id,
            mirroring: header.mirroring,
            has_battery: header.has_battery,
            chr_is_ram,
        })
    }
}

impl Default for Cartridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-mapper memory access. Implementations hold the PRG/CHR memory and
/// any bank-switching state; the bus never touches cartridge memory directly.
pub trait Mapper: Send {
    fn cpu_read(&self, address: u16) -> u8;
    fn cpu_write(&mut self, address: u16, value: u8);
    fn ppu_read(&self, address: u16) -> u8;
    fn ppu_write(&mut self, address: u16, value: u8);
    fn mirroring(&self) -> Mirroring;

    /// Whether the mapper is asserting an IRQ line (only MMC3-class mappers
    /// use this; the mappers implemented here never do).
    fn irq_pending(&self) -> bool {
        false
    }
}
