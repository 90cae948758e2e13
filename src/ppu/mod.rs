// PPU module - Picture Processing Unit implementation (2C02)
//
// Cycle-accurate, scanline-based PPU. `clock()` advances the PPU by exactly
// one dot (341 dots per scanline, 262 scanlines per frame) and is meant to
// be called three times for every CPU cycle by the owning scheduler.
//
// ## Scanline rendering pipeline
//
// Each visible scanline (0-239) and the pre-render scanline (261) fetch
// background tiles in an 8-cycle pipeline (nametable byte, attribute byte,
// pattern low, pattern high) feeding 16-bit shift registers that are
// shifted once per dot to produce pixels. Sprite evaluation for the next
// scanline happens at cycle 257; the pattern data for the resulting
// secondary OAM entries is fetched immediately afterward rather than
// spread across cycles 258-320 as on real hardware, since nothing reads
// sprite state between those two points.
//
// ## Registers ($2000-$2007, mirrored through $3FFF)
//
// | Address | Name      | Access  |
// |---------|-----------|---------|
// | $2000   | PPUCTRL   | Write   |
// | $2001   | PPUMASK   | Write   |
// | $2002   | PPUSTATUS | Read    |
// | $2003   | OAMADDR   | Write   |
// | $2004   | OAMDATA   | R/W     |
// | $2005   | PPUSCROLL | Write×2 |
// | $2006   | PPUADDR   | Write×2 |
// | $2007   | PPUDATA   | R/W     |

mod constants;
mod memory;
mod registers;
mod rendering;

use crate::cartridge::{Mapper, Mirroring};
use crate::display::palette::NES_PALETTE;
use constants::*;

pub struct Ppu {
    pub(crate) ppuctrl: u8,
    pub(crate) ppumask: u8,
    pub(crate) ppustatus: u8,
    pub(crate) oam_addr: u8,

    pub(crate) v: u16,
    pub(crate) t: u16,
    pub(crate) fine_x: u8,
    pub(crate) write_latch: bool,
    pub(crate) read_buffer: u8,

    pub(crate) nametables: [u8; NAMETABLE_SIZE * 2],
    pub(crate) palette_ram: [u8; PALETTE_SIZE],
    pub(crate) mirroring: Mirroring,

    pub(crate) oam: [u8; 256],

    /// RGBA (0xAARRGGBB) frame buffer, one entry per pixel.
    pub(crate) frame_buffer: [u32; SCREEN_WIDTH * SCREEN_HEIGHT],

    pub(crate) scanline: u16,
    pub(crate) cycle: u16,
    pub(crate) frame: u64,
    pub(crate) nmi_pending: bool,

    /// Set for the one PPU cycle in which VBlank was just raised, so a
    /// PPUSTATUS read on that exact cycle can suppress the NMI per the
    /// documented VBlank/NMI race condition.
    pub(crate) vblank_just_set: bool,
    /// Tracks the previous PPUCTRL NMI-enable bit so a write that toggles
    /// it from 0 to 1 while VBlank is already set can raise a fresh NMI.
    pub(crate) prev_nmi_enable: bool,

    bg_pattern_shift_low: u16,
    bg_pattern_shift_high: u16,
    bg_attribute_shift_low: u16,
    bg_attribute_shift_high: u16,

    bg_nametable_byte: u8,
    bg_attribute_byte: u8,
    bg_pattern_low: u8,
    bg_pattern_high: u8,

    secondary_oam: [(u8, u8, u8, u8); 8], // (y, tile, attr, x)
    sprite_count: usize,
    sprite_pattern_shift_low: [u8; 8],
    sprite_pattern_shift_high: [u8; 8],
    sprite_attributes: [u8; 8],
    sprite_x_positions: [u8; 8],
    sprite_0_present: bool,
}

impl Ppu {
    pub fn new() -> Self {
        Ppu {
            ppuctrl: 0x00,
            ppumask: 0x00,
            ppustatus: 0x00,
            oam_addr: 0x00,

            v: 0x0000,
            t: 0x0000,
            fine_x: 0,
            write_latch: false,
            read_buffer: 0x00,

            nametables: [0; NAMETABLE_SIZE * 2],
            palette_ram: [0; PALETTE_SIZE],
            mirroring: Mirroring::Horizontal,

            oam: [0; 256],

            frame_buffer: [0xFF00_0000; SCREEN_WIDTH * SCREEN_HEIGHT],

            scanline: 0,
            cycle: 0,
            frame: 0,
            nmi_pending: false,

            vblank_just_set: false,
            prev_nmi_enable: false,

            bg_pattern_shift_low: 0,
            bg_pattern_shift_high: 0,
            bg_attribute_shift_low: 0,
            bg_attribute_shift_high: 0,

            bg_nametable_byte: 0,
            bg_attribute_byte: 0,
            bg_pattern_low: 0,
            bg_pattern_high: 0,

            secondary_oam: [(0xFF, 0, 0, 0xFF); 8],
            sprite_count: 0,
            sprite_pattern_shift_low: [0; 8],
            sprite_pattern_shift_high: [0; 8],
            sprite_attributes: [0; 8],
            sprite_x_positions: [0xFF; 8],
            sprite_0_present: false,
        }
    }

    /// Reset PPU to power-on state. Mirroring is left untouched since it
    /// comes from the cartridge, not the PPU itself.
    pub fn reset(&mut self) {
        let mirroring = self.mirroring;
        *self = Ppu::new();
        self.mirroring = mirroring;
    }

    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Write directly to OAM (used by $4014 OAM DMA).
    pub fn write_oam(&mut self, addr: u8, data: u8) {
        self.oam[addr as usize] = data;
    }

    pub fn read_oam(&self, addr: u8) -> u8 {
        self.oam[addr as usize]
    }

    /// RGBA frame buffer for the most recently completed frame.
    pub fn frame(&self) -> &[u32] {
        &self.frame_buffer
    }

    pub fn frame_mut(&mut self) -> &mut [u32] {
        &mut self.frame_buffer
    }

    /// CPU-side register read, routed through the $2000-$2007 mirror mask.
    /// Needs the mapper for OAM-DMA-unrelated PPUDATA reads of pattern
    /// table memory.
    pub fn cpu_read(&mut self, address: u16, mapper: &dyn Mapper) -> u8 {
        let register = address & PPU_REGISTER_MASK;
        self.read_register(register, mapper)
    }

    pub fn cpu_write(&mut self, address: u16, value: u8, mapper: &mut dyn Mapper) {
        let register = address & PPU_REGISTER_MASK;
        self.write_register(register, value, mapper);
    }

    /// Advance the PPU by one dot. Returns true if a frame was just
    /// completed (the pre-render scanline wrapped back to scanline 0).
    pub fn clock(&mut self, mapper: &dyn Mapper) -> bool {
        self.vblank_just_set = false;

        match self.scanline {
            FIRST_VISIBLE_SCANLINE..=LAST_VISIBLE_SCANLINE => {
                self.visible_scanline_cycle(mapper);
            }
            POSTRENDER_SCANLINE => {}
            FIRST_VBLANK_SCANLINE..=LAST_VBLANK_SCANLINE => {
                self.vblank_scanline_cycle();
            }
            PRERENDER_SCANLINE => {
                self.prerender_scanline_cycle(mapper);
            }
            _ => {}
        }

        let mut frame_complete = false;
        self.cycle += 1;

        if self.cycle >= CYCLES_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame += 1;
                frame_complete = true;
            }
        }

        // Odd frames skip the idle dot at the end of the pre-render scanline
        // when rendering is enabled.
        if self.scanline == PRERENDER_SCANLINE
            && self.cycle == CYCLES_PER_SCANLINE - 1
            && (self.frame & 1) == 1
            && self.is_rendering_enabled()
        {
            self.cycle = 0;
            self.scanline = 0;
            self.frame += 1;
            frame_complete = true;
        }

        frame_complete
    }

    fn visible_scanline_cycle(&mut self, mapper: &dyn Mapper) {
        match self.cycle {
            1..=256 => {
                if self.cycle > 1 {
                    self.shift_background_registers();
                }
                self.update_sprite_shifters();

                if self.is_rendering_enabled() {
                    let x = (self.cycle - 1) as usize;
                    let y = self.scanline as usize;
                    let bg_pixel = self.get_background_pixel();
                    let palette_index = self.composite_pixel(x, bg_pixel);
                    self.frame_buffer[y * SCREEN_WIDTH + x] =
                        0xFF00_0000 | NES_PALETTE[(palette_index & 0x3F) as usize];
                }

                self.perform_background_fetch(self.cycle, mapper);

                if self.cycle.is_multiple_of(8) {
                    self.load_shift_registers();
                    self.increment_scroll_x();
                }
                if self.cycle == 256 {
                    self.increment_scroll_y();
                }
            }
            257 => {
                self.copy_horizontal_scroll();
                self.evaluate_sprites_for_next_scanline();
                self.fetch_sprite_patterns(mapper);
            }
            321..=336 => {
                self.perform_background_fetch(self.cycle, mapper);
                if self.cycle.is_multiple_of(8) {
                    self.load_shift_registers();
                    self.increment_scroll_x();
                }
            }
            _ => {}
        }
    }

    fn vblank_scanline_cycle(&mut self) {
        if self.scanline == FIRST_VBLANK_SCANLINE && self.cycle == 0 {
            self.ppustatus |= 0x80;
            self.vblank_just_set = true;
            if (self.ppuctrl & 0x80) != 0 {
                self.nmi_pending = true;
            }
        }
    }

    fn prerender_scanline_cycle(&mut self, mapper: &dyn Mapper) {
        if self.cycle == 0 {
            self.ppustatus &= !0x80;
            self.ppustatus &= !0x40;
            self.ppustatus &= !0x20;
            self.nmi_pending = false;
        }

        if self.cycle >= 280 && self.cycle <= 304 {
            self.copy_vertical_scroll();
        }

        match self.cycle {
            1..=256 | 321..=336 => {
                self.perform_background_fetch(self.cycle, mapper);
                if self.cycle.is_multiple_of(8) {
                    self.load_shift_registers();
                    self.increment_scroll_x();
                }
                if self.cycle == 256 {
                    self.increment_scroll_y();
                }
            }
            257 => {
                self.copy_horizontal_scroll();
            }
            _ => {}
        }
    }

    fn is_rendering_enabled(&self) -> bool {
        (self.ppumask & 0x18) != 0
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    pub fn clear_nmi(&mut self) {
        self.nmi_pending = false;
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn cycle(&self) -> u16 {
        self.cycle
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
