// Mappers module - Implementations of various NES cartridge mappers
//
// This module contains the mapper factory and individual mapper implementations.
// Each mapper handles memory mapping and banking for different cartridge types.

mod cnrom;
mod mmc1;
mod nrom;
mod uxrom;

use super::{Cartridge, Mapper};
use cnrom::Cnrom;
use mmc1::Mmc1;
use nrom::Nrom;
use thiserror::Error;
use uxrom::Uxrom;

/// Error type for mapper creation
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("mapper {0} is not supported")]
    UnsupportedMapper(u8),
    #[error("invalid mapper configuration: {0}")]
    InvalidConfiguration(String),
}

/// Create a mapper instance based on the mapper number in the cartridge.
///
/// The mapper number is determined from the iNES header. Only the four
/// mappers named in scope are implemented: NROM (0), MMC1 (1), UxROM (2)
/// and CNROM (3).
pub fn create_mapper(cartridge: Cartridge) -> Result<Box<dyn Mapper>, MapperError> {
    match cartridge.mapper {
        0 => Ok(Box::new(Nrom::new(cartridge)?)),
        1 => Ok(Box::new(Mmc1::new(cartridge)?)),
        2 => Ok(Box::new(Uxrom::new(cartridge)?)),
        3 => Ok(Box::new(Cnrom::new(cartridge)?)),
        mapper_num => Err(MapperError::UnsupportedMapper(mapper_num)),
    }
}
