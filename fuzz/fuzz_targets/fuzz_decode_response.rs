#![no_main]
use chrono::TimeZone;
use chrono_tz::Europe::Paris;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding and mapping must fail cleanly, never panic
    if let Ok(response) = enedis_portal::portal::protocol::decode_response(body) {
        let start = Paris.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let _ = enedis_portal::portal::protocol::to_measurements(&response.graph.data, &start, &[]);
    }
});
