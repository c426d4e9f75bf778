#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Split the input into the two window bounds on the first newline
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (from, to) = text.split_once('\n').unwrap_or((text, text));

    if let Ok(period) = enedis_portal::offpeak::OffpeakPeriod::parse(from, to) {
        // Canonical form must parse back to the same window
        let canonical = period.to_string();
        let (f, t) = canonical.split_once('-').unwrap();
        assert_eq!(
            enedis_portal::offpeak::OffpeakPeriod::parse(f, t).unwrap(),
            period
        );
    }
});
