#![no_main]

use commitsong_backend_midi::vlq;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (value, used) = vlq::decode(data);
    assert!(used <= vlq::MAX_VLQ_BYTES);
    assert!(value <= vlq::MAX_VLQ);

    if let Ok((strict, consumed)) = vlq::decode_strict(data) {
        assert_eq!(strict, value);
        assert_eq!(consumed, used);
        assert_eq!(vlq::encoded_len(strict), vlq::encode(strict).len());
    }
});
