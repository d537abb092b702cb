#![no_main]
use libfuzzer_sys::fuzz_target;
use starcharge::api::{Envelope, HttpResponse};
use starcharge::sensor::build_sensors;

fuzz_target!(|data: &[u8]| {
    let response = HttpResponse::new(200, data.to_vec());
    if let Ok(snapshot) = Envelope::parse(&response).and_then(Envelope::into_snapshot) {
        // Reading sensors must never panic, whatever the payload shape
        for sensor in build_sensors("fuzz") {
            let _ = sensor.read(Some(&snapshot));
        }
    }
});
