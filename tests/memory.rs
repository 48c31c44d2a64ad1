use wasm_rt_core::prelude::*;

use quickcheck_macros::quickcheck;

#[test]
fn segment_bytes_read_back_little_endian() {
    let mut mem = LinearMemory::new(64, 64);
    let segment = [0x01u8, 0x02, 0x03, 0x04, 0xaa, 0xbb];

    mem.init(&segment, 0, 0, segment.len() as u32).unwrap();

    assert_eq!(mem.i32_load(0).unwrap(), 0x0403_0201);
    assert_eq!(mem.i32_load16_u(4).unwrap(), 0xbbaa);
    assert_eq!(mem.i32_load8_u(0).unwrap(), 0x01);
    assert_eq!(mem.i32_load8_u(3).unwrap(), 0x04);
}

#[cfg(not(any(feature = "unchecked-memory", feature = "guard-pages")))]
#[test]
fn two_byte_load_at_the_last_byte_traps() {
    let mem = LinearMemory::new(64, 64);

    assert_eq!(mem.i32_load8_u(63).unwrap(), 0);
    assert_eq!(mem.i32_load16_u(63), Err(TrapReason::OutOfBounds));
    assert_eq!(mem.i32_load(64), Err(TrapReason::OutOfBounds));
}

#[test]
fn float_round_trip_is_bit_exact_for_nan_payloads() {
    let mut mem = LinearMemory::new(64, 64);

    let signalling32 = f32::from_bits(0x7f80_dead);
    mem.f32_store(0, signalling32).unwrap();
    assert_eq!(mem.f32_load(0).unwrap().to_bits(), 0x7f80_dead);

    let signalling64 = f64::from_bits(0x7ff0_0000_dead_beef);
    mem.f64_store(8, signalling64).unwrap();
    assert_eq!(mem.f64_load(8).unwrap().to_bits(), 0x7ff0_0000_dead_beef);
}

#[test]
fn fill_copy_init_compose() {
    let mut mem = LinearMemory::new(32, 32);

    mem.fill(0, 0x11, 8).unwrap();
    mem.init(&[0xde, 0xad], 8, 0, 2).unwrap();
    mem.copy_within(16, 0, 10).unwrap();

    assert_eq!(mem.i32_load(16).unwrap(), 0x1111_1111);
    assert_eq!(mem.i32_load16_u(24).unwrap(), 0xadde);

    let mut other = LinearMemory::new(16, 16);
    other.copy_from(&mem, 0, 20, 8).unwrap();
    assert_eq!(other.i32_load16_u(4).unwrap(), 0xadde);
}

#[test]
fn bulk_ops_check_before_any_write() {
    let mut mem = LinearMemory::new(16, 16);
    mem.fill(0, 0x77, 16).unwrap();

    assert_eq!(mem.fill(8, 0x00, 9), Err(TrapReason::OutOfBounds));
    assert_eq!(mem.copy_within(8, 0, 9), Err(TrapReason::OutOfBounds));
    assert_eq!(mem.init(&[0u8; 4], 15, 0, 4), Err(TrapReason::OutOfBounds));

    for i in 0..16 {
        assert_eq!(mem.i32_load8_u(i).unwrap(), 0x77);
    }
}

#[cfg(all(
    feature = "memory64",
    not(any(feature = "unchecked-memory", feature = "guard-pages"))
))]
#[test]
fn memory64_addresses_past_4gib_of_capacity_are_checked() {
    let mem = LinearMemory::new64(128, 1 << 33);

    assert!(mem.is64());
    assert_eq!(mem.i64_load(120), Ok(0));
    assert_eq!(mem.i64_load(121), Err(TrapReason::OutOfBounds));
    assert_eq!(mem.i64_load(u64::MAX - 4), Err(TrapReason::OutOfBounds));
}

#[quickcheck]
fn store_load_round_trip(addr: u8, value: u64) -> bool {
    let mut mem = LinearMemory::new(512, 512);
    let addr = addr as u64;

    mem.i64_store(addr, value).unwrap();
    mem.i64_load(addr).unwrap() == value
}

#[quickcheck]
fn narrow_store_then_signed_load_sign_extends(addr: u8, value: u32) -> bool {
    let mut mem = LinearMemory::new(512, 512);
    let addr = addr as u64;

    mem.i32_store16(addr, value).unwrap();
    let loaded = mem.i32_load16_s(addr).unwrap();
    loaded == (value as u16 as i16 as i32 as u32)
}

#[quickcheck]
fn float_store_load_round_trip(addr: u8, bits: u32) -> bool {
    let mut mem = LinearMemory::new(512, 512);
    let addr = addr as u64;

    mem.f32_store(addr, f32::from_bits(bits)).unwrap();
    mem.f32_load(addr).unwrap().to_bits() == bits
}
