// Mapper 0 (NROM) - the simplest NES mapper, no bank switching.
//
// CPU $8000-$BFFF: first 16KB of PRG-ROM
// CPU $C000-$FFFF: last 16KB of PRG-ROM (mirror of the first bank if only 16KB total)
// PPU $0000-$1FFF: 8KB CHR-ROM or CHR-RAM

use super::MapperError;
use crate::cartridge::{Cartridge, Mapper, Mirroring};

pub struct Nrom {
    prg_rom: Vec<u8>,
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Nrom {
    pub fn new(cartridge: Cartridge) -> Result<Self, MapperError> {
        let prg_rom_size = cartridge.prg_rom.len();
        if prg_rom_size != 16 * 1024 && prg_rom_size != 32 * 1024 {
            return Err(MapperError::InvalidConfiguration(format!(
                "NROM requires 16KB or 32KB PRG-ROM, got {} bytes",
                prg_rom_size
            )));
        }

        Ok(Nrom {
            prg_rom: cartridge.prg_rom,
            chr_mem: cartridge.chr_rom,
            chr_is_ram: cartridge.chr_is_ram,
            mirroring: cartridge.mirroring,
        })
    }
}

impl Mapper for Nrom {
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x8000..=0xFFFF => {
                let index = (address - 0x8000) as usize % self.prg_rom.len();
                self.prg_rom[index]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, _address: u16, _value: u8) {
        // PRG-ROM is read-only on NROM.
    }

    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.chr_mem[address as usize],
            _ => 0,
        }
    }

    fn ppu_write(&mut self, address: u16, value: u8) {
        if self.chr_is_ram {
            if let 0x0000..=0x1FFF = address {
                self.chr_mem[address as usize] = value;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
