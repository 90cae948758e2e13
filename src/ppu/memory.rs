// PPU memory access: nametable/palette mirroring and cartridge routing.

use super::constants::NAMETABLE_SIZE;
use super::Ppu;
use crate::cartridge::{Mapper, Mirroring};

impl Ppu {
    /// Map a nametable address ($2000-$2FFF) to its physical VRAM offset,
    /// folding the 4 logical nametables down to the 2KB the PPU actually has.
    pub(super) fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let mirrored_table = match self.mirroring {
            Mirroring::Horizontal => match table {
                0 | 1 => 0,
                2 | 3 => 1,
                _ => unreachable!(),
            },
            Mirroring::Vertical => match table {
                0 | 2 => 0,
                1 | 3 => 1,
                _ => unreachable!(),
            },
            Mirroring::SingleScreen => 0,
            Mirroring::FourScreen => {
                // No discrete 4-screen VRAM is modeled; fall back to horizontal.
                match table {
                    0 | 1 => 0,
                    2 | 3 => 1,
                    _ => unreachable!(),
                }
            }
        };

        mirrored_table * NAMETABLE_SIZE + offset
    }

    /// Palette RAM mirroring: $3F10/$3F14/$3F18/$3F1C alias $3F00/$3F04/$3F08/$3F0C.
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;
        if addr >= 16 && addr.is_multiple_of(4) {
            addr - 16
        } else {
            addr
        }
    }

    pub(super) fn read_ppu_memory(&self, addr: u16, mapper: &dyn Mapper) -> u8 {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => mapper.ppu_read(addr),
            0x2000..=0x2FFF => self.nametables[self.mirror_nametable_addr(addr)],
            0x3000..=0x3EFF => self.nametables[self.mirror_nametable_addr(addr - 0x1000)],
            0x3F00..=0x3FFF => self.palette_ram[self.mirror_palette_addr(addr)],
            _ => unreachable!(),
        }
    }

    pub(super) fn write_ppu_memory(&mut self, addr: u16, data: u8, mapper: &mut dyn Mapper) {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => mapper.ppu_write(addr, data),
            0x2000..=0x2FFF => {
                let idx = self.mirror_nametable_addr(addr);
                self.nametables[idx] = data;
            }
            0x3000..=0x3EFF => {
                let idx = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[idx] = data;
            }
            0x3F00..=0x3FFF => {
                let idx = self.mirror_palette_addr(addr);
                self.palette_ram[idx] = data;
            }
            _ => unreachable!(),
        }
    }

    /// Read directly from cartridge pattern table memory, bypassing
    /// nametable/palette routing. Used by background/sprite tile fetches.
    pub(super) fn pattern_read(&self, addr: u16, mapper: &dyn Mapper) -> u8 {
        mapper.ppu_read(addr)
    }
}
