// Mapper 2 (UxROM) - switchable 16KB PRG bank at $8000, fixed last bank at $C000.
//
// CHR is always RAM (8KB) since UxROM carts never ship CHR-ROM.
// A write anywhere in $8000-$FFFF selects the PRG bank visible at $8000-$BFFF.

use super::MapperError;
use crate::cartridge::{Cartridge, Mapper, Mirroring};

const PRG_BANK_SIZE: usize = 16 * 1024;

pub struct Uxrom {
    prg_rom: Vec<u8>,
    chr_ram: Vec<u8>,
    mirroring: Mirroring,
    selected_bank: u8,
}

impl Uxrom {
    pub fn new(cartridge: Cartridge) -> Result<Self, MapperError> {
        if cartridge.prg_rom.is_empty() || cartridge.prg_rom.len() % PRG_BANK_SIZE != 0 {
            return Err(MapperError::InvalidConfiguration(
                "UxROM PRG-ROM must be a non-zero multiple of 16KB".into(),
            ));
        }

        Ok(Uxrom {
            prg_rom: cartridge.prg_rom,
            chr_ram: if cartridge.chr_rom.is_empty() {
                vec![0; 8 * 1024]
            } else {
                cartridge.chr_rom
            },
            mirroring: cartridge.mirroring,
            selected_bank: 0,
        })
    }

    fn bank_count(&self) -> usize {
        self.prg_rom.len() / PRG_BANK_SIZE
    }
}

impl Mapper for Uxrom {
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x8000..=0xBFFF => {
                let bank = self.selected_bank as usize % self.bank_count();
                self.prg_rom[bank * PRG_BANK_SIZE + (address - 0x8000) as usize]
            }
            0xC000..=0xFFFF => {
                let last_bank = self.bank_count() - 1;
                self.prg_rom[last_bank * PRG_BANK_SIZE + (address - 0xC000) as usize]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, address: u16, value: u8) {
        if let 0x8000..=0xFFFF = address {
            self.selected_bank = value;
        }
    }

    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.chr_ram[address as usize],
            _ => 0,
        }
    }

    fn ppu_write(&mut self, address: u16, value: u8) {
        if let 0x0000..=0x1FFF = address {
            self.chr_ram[address as usize] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
