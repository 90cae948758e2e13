// PPU Benchmarks
// Performance benchmarks for PPU rendering operations

use criterion::{criterion_group, criterion_main, Criterion};
use nes_core::cartridge::mappers::create_mapper;
use nes_core::{Cartridge, Mapper, Mirroring, Ppu};
use std::hint::black_box;

/// Helper function to create a test cartridge's mapper (NROM, mapper 0)
fn create_test_mapper() -> Box<dyn Mapper> {
    let cart = Cartridge {
        prg_rom: vec![0; 16 * 1024],
        chr_rom: vec![0xAA; 8 * 1024],
        trainer: None,
        mapper: 0,
        mirroring: Mirroring::Horizontal,
        has_battery: false,
        chr_is_ram: false,
    };
    create_mapper(cart).expect("NROM cartridge should build")
}

/// Benchmark a full frame of PPU dots (the main performance-critical path)
/// One frame = 262 scanlines * 341 dots = 89,342 dots
fn bench_ppu_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_rendering");
    group.sample_size(20);

    group.bench_function("full_frame_via_clock", |b| {
        let mut ppu = Ppu::new();
        let mut mapper = create_test_mapper();
        ppu.set_mirroring(mapper.mirroring());
        ppu.cpu_write(0x2001, 0b0001_1110, mapper.as_mut()); // PPUMASK: show background and sprites

        b.iter(|| {
            for _ in 0..89342 {
                ppu.clock(mapper.as_ref());
            }
            black_box(ppu.frame());
        });
    });

    group.finish();
}

fn bench_ppu_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_step");

    group.bench_function("single_dot", |b| {
        let mut ppu = Ppu::new();
        let mapper = create_test_mapper();

        b.iter(|| {
            black_box(ppu.clock(mapper.as_ref()));
        });
    });

    group.bench_function("scanline_341_dots", |b| {
        let mut ppu = Ppu::new();
        let mapper = create_test_mapper();

        b.iter(|| {
            for _ in 0..341 {
                ppu.clock(mapper.as_ref());
            }
        });
    });

    group.finish();
}

fn bench_ppu_registers(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_registers");

    group.bench_function("ppuctrl_write", |b| {
        let mut ppu = Ppu::new();
        let mut mapper = create_test_mapper();

        b.iter(|| {
            ppu.cpu_write(black_box(0x2000), black_box(0b1001_0000), mapper.as_mut());
        });
    });

    group.bench_function("ppustatus_read", |b| {
        let mut ppu = Ppu::new();
        let mapper = create_test_mapper();

        b.iter(|| {
            black_box(ppu.cpu_read(0x2002, mapper.as_ref()));
        });
    });

    group.bench_function("ppudata_write_sequence", |b| {
        let mut ppu = Ppu::new();
        let mut mapper = create_test_mapper();

        b.iter(|| {
            ppu.cpu_write(0x2006, 0x20, mapper.as_mut()); // VRAM address high byte
            ppu.cpu_write(0x2006, 0x00, mapper.as_mut()); // VRAM address low byte

            for i in 0..32u8 {
                ppu.cpu_write(0x2007, i, mapper.as_mut());
            }
        });
    });

    group.finish();
}

fn bench_ppu_oam(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_oam");

    group.bench_function("oam_write", |b| {
        let mut ppu = Ppu::new();

        b.iter(|| {
            for i in 0..=255u8 {
                ppu.write_oam(i, i);
            }
        });
    });

    group.bench_function("oam_read", |b| {
        let ppu = Ppu::new();

        b.iter(|| {
            black_box(ppu.read_oam(black_box(0)));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ppu_rendering,
    bench_ppu_step,
    bench_ppu_registers,
    bench_ppu_oam
);
criterion_main!(benches);
