// Mapper 3 (CNROM) - fixed PRG-ROM (16KB or 32KB, mirrored like NROM),
// switchable 8KB CHR-ROM bank. A write anywhere in $8000-$FFFF selects
// the CHR bank; only the low 2 bits are significant on real hardware
// since CNROM boards shipped at most 32KB of CHR-ROM.

use super::MapperError;
use crate::cartridge::{Cartridge, Mapper, Mirroring};

const CHR_BANK_SIZE: usize = 8 * 1024;

pub struct Cnrom {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    mirroring: Mirroring,
    selected_bank: u8,
}

impl Cnrom {
    pub fn new(cartridge: Cartridge) -> Result<Self, MapperError> {
        let prg_len = cartridge.prg_rom.len();
        if prg_len != 16 * 1024 && prg_len != 32 * 1024 {
            return Err(MapperError::InvalidConfiguration(format!(
                "CNROM requires 16KB or 32KB PRG-ROM, got {} bytes",
                prg_len
            )));
        }
        if cartridge.chr_rom.is_empty() || cartridge.chr_rom.len() % CHR_BANK_SIZE != 0 {
            return Err(MapperError::InvalidConfiguration(
                "CNROM CHR-ROM must be a non-zero multiple of 8KB".into(),
            ));
        }

        Ok(Cnrom {
            prg_rom: cartridge.prg_rom,
            chr_rom: cartridge.chr_rom,
            mirroring: cartridge.mirroring,
            selected_bank: 0,
        })
    }

    fn bank_count(&self) -> usize {
        self.chr_rom.len() / CHR_BANK_SIZE
    }
}

impl Mapper for Cnrom {
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x8000..=0xFFFF => {
                let index = (address - 0x8000) as usize % self.prg_rom.len();
                self.prg_rom[index]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, address: u16, value: u8) {
        if let 0x8000..=0xFFFF = address {
            self.selected_bank = value & 0x03;
        }
    }

    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => {
                let bank = self.selected_bank as usize % self.bank_count();
                self.chr_rom[bank * CHR_BANK_SIZE + address as usize]
            }
            _ => 0,
        }
    }

    fn ppu_write(&mut self, _address: u16, _value: u8) {
        // CHR-ROM is read-only on CNROM.
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
