// Emulator module - master clock scheduler coordinating CPU, PPU and bus.
//
// The PPU runs three times for every CPU cycle. `Emulator::tick` advances
// the system by a single PPU dot and, every third call, clocks the CPU one
// cycle, delivering NMI and OAM DMA stalls at instruction boundaries the
// way real hardware would.

mod config;

pub use config::{EmulatorConfig, VideoConfig};

use crate::bus::Bus;
use crate::cartridge::mappers::MapperError;
use crate::cartridge::{Cartridge, INesError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Everything that can go wrong while loading a ROM from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read ROM file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    INes(#[from] INesError),
    #[error(transparent)]
    Mapper(#[from] MapperError),
}

/// Coordinates the CPU, PPU and bus through the master clock.
pub struct Emulator {
    cpu: crate::cpu::Cpu,
    bus: Bus,
    config: EmulatorConfig,
    rom_path: Option<PathBuf>,
    paused: bool,
    /// Counts PPU dots 0..3 within the current CPU cycle; the CPU clocks
    /// exactly once every three dots, matching the exact 3:1 PPU:CPU ratio.
    dot_counter: u8,
    /// Parity of the CPU's own cycle count, used to pick 513 vs 514 DMA
    /// stall cycles the way real hardware does.
    cpu_cycle_odd: bool,
}

impl Emulator {
    /// Create a new emulator with no cartridge loaded.
    pub fn new() -> Self {
        Emulator {
            cpu: crate::cpu::Cpu::new(),
            bus: Bus::new(),
            config: EmulatorConfig::load_or_default(),
            rom_path: None,
            paused: false,
            dot_counter: 0,
            cpu_cycle_odd: false,
        }
    }

    /// Load an iNES ROM from disk and reset the system to run it.
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let cartridge = Cartridge::from_ines_bytes(&bytes)?;

        self.bus = Bus::from_cartridge(cartridge)?;
        self.rom_path = Some(path.to_path_buf());
        info!(path = %path.display(), "loaded ROM");
        self.reset();
        Ok(())
    }

    /// Reset the system to power-on state, as if pressing the reset button.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.dot_counter = 0;
        self.cpu_cycle_odd = false;
        self.paused = false;
    }

    /// Advance the system by one PPU dot (1/3 of a CPU cycle).
    ///
    /// Returns `true` exactly when this dot completed a frame.
    pub fn tick(&mut self) -> bool {
        let frame_done = self.bus.clock_ppu();

        self.dot_counter = (self.dot_counter + 1) % 3;
        if self.dot_counter != 0 {
            return frame_done;
        }

        if self.bus.take_dma_pending() {
            self.cpu.request_dma_stall(self.cpu_cycle_odd);
        }

        if !self.cpu.is_busy() {
            if self.bus.ppu().nmi_pending() {
                self.bus.ppu_mut().clear_nmi();
                self.cpu.nmi(&mut self.bus);
            } else if self.bus.mapper_irq_pending()
                && !self.cpu.get_flag(crate::cpu::flags::INTERRUPT_DISABLE)
            {
                self.cpu.irq(&mut self.bus);
            }
        }

        self.cpu.clock(&mut self.bus);
        self.cpu_cycle_odd = !self.cpu_cycle_odd;
        frame_done
    }

    /// Run the system until a full PPU frame has been produced.
    ///
    /// No-op (returns immediately) while paused.
    pub fn run_frame(&mut self) {
        if self.paused {
            return;
        }
        while !self.tick() {}
    }

    /// Feed live button state for a controller port (0 or 1) into the bus.
    pub fn set_controller_state(&mut self, player: usize, buttons: crate::input::Controller) {
        self.bus
            .set_controller_state(player, buttons.to_button_mask());
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn cpu(&self) -> &crate::cpu::Cpu {
        &self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EmulatorConfig {
        &mut self.config
    }

    pub fn rom_path(&self) -> Option<&Path> {
        self.rom_path.as_deref()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrom_program(opcodes: &[u8]) -> Vec<u8> {
        // 16-byte iNES header + 16KB PRG-ROM + 8KB CHR-ROM, mapper 0, horizontal mirroring.
        let mut rom = vec![0u8; 16 + 16 * 1024 + 8 * 1024];
        rom[0..4].copy_from_slice(b"NES\x1a");
        rom[4] = 1; // 16KB PRG
        rom[5] = 1; // 8KB CHR
        let prg_start = 16;
        rom[prg_start..prg_start + opcodes.len()].copy_from_slice(opcodes);
        // Reset vector -> start of PRG-ROM ($8000)
        rom[prg_start + 0x3FFC] = 0x00;
        rom[prg_start + 0x3FFD] = 0x80;
        rom
    }

    #[test]
    fn loads_rom_and_resets_pc_from_vector() {
        let rom = nrom_program(&[0xEA, 0xEA, 0xEA]); // NOP NOP NOP
        let path = std::env::temp_dir().join("emulator_load_test.nes");
        std::fs::write(&path, &rom).unwrap();

        let mut emu = Emulator::new();
        emu.load_rom(&path).unwrap();
        assert_eq!(emu.cpu().pc, 0x8000);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn tick_reports_frame_completion() {
        let mut emu = Emulator::new();
        let mut frames = 0;
        for _ in 0..(341 * 262 * 2) {
            if emu.tick() {
                frames += 1;
            }
        }
        assert_eq!(frames, 2);
    }

    #[test]
    fn paused_run_frame_is_a_no_op() {
        let mut emu = Emulator::new();
        emu.pause();
        let cycles_before = emu.cpu().cycles;
        emu.run_frame();
        assert_eq!(emu.cpu().cycles, cycles_before);
    }
}
