use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use max3185x::max31855::FaultCode;
use max3185x::{Error, Max31855};

fn sample(bytes: [u8; 4]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::read_vec(bytes.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

#[test]
fn read_assembles_big_endian_word() {
    let expectations = sample([0x01, 0x90, 0x19, 0x00]);

    let mut sensor = Max31855::new(SpiMock::new(&expectations));
    let reading = sensor.read().unwrap();
    assert_eq!(reading.degrees_c(), 25.0);
    assert_eq!(reading.internal_degrees_c(), 25.0);
    assert_eq!(reading.fault_code(), FaultCode::Ok);

    sensor.release().done();
}

#[test]
fn read_checked_reports_open_circuit() {
    let expectations = sample([0x00, 0x01, 0x19, 0x01]);

    let mut sensor = Max31855::new(SpiMock::new(&expectations));
    assert_eq!(sensor.read_checked(), Err(Error::Fault(FaultCode::OpenCircuit)));

    sensor.release().done();
}

#[test]
fn read_checked_passes_clean_sample() {
    let expectations = sample([0xFF, 0xF4, 0x19, 0x00]);

    let mut sensor = Max31855::new(SpiMock::new(&expectations));
    let reading = sensor.read_checked().unwrap();
    assert_eq!(reading.degrees_c(), -0.75);

    sensor.release().done();
}
