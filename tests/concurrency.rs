//! Drives `Engine::classify` from multiple OS threads with no external
//! synchronization, exercising spec §5's "safe to invoke from arbitrary
//! parallel threads" guarantee end to end (the compile-time `Engine:
//! Sync` check lives alongside the engine in `src/parser.rs`).

use viet_address_classifier::{DistrictRecord, Engine, ProvinceRecord, WardRecord};

fn fixture() -> Engine {
    let provinces = vec![
        ProvinceRecord { code: "HN".into(), name: "Hà Nội".into() },
        ProvinceRecord { code: "HCM".into(), name: "Hồ Chí Minh".into() },
        ProvinceRecord { code: "TQ".into(), name: "Tuyên Quang".into() },
    ];
    let districts = vec![
        DistrictRecord { code: "NTL".into(), name: "Nam Từ Liêm".into(), province_code: "HN".into() },
        DistrictRecord { code: "TB-HCM".into(), name: "Tân Bình".into(), province_code: "HCM".into() },
        DistrictRecord { code: "YS".into(), name: "Yên Sơn".into(), province_code: "TQ".into() },
    ];
    let wards = vec![
        WardRecord { code: "CD".into(), name: "Cầu Diễn".into(), district_code: "NTL".into() },
        WardRecord { code: "TB-W".into(), name: "Tân Bình".into(), district_code: "TB-HCM".into() },
        WardRecord { code: "TBY".into(), name: "Tân Bình".into(), district_code: "YS".into() },
    ];
    Engine::new(&provinces, &districts, &wards).unwrap()
}

#[test]
fn classify_is_safe_from_concurrent_threads() {
    let engine = fixture();
    let inputs = [
        "Cầu Diễn, Nam Từ Liêm, Hà Nội",
        "Tân Bình, Tân Bình, Hồ Chí Minh",
        "TT Tân Bình, Huyện Yên Sơn, Tuyên Quang",
        "ha nol",
        "xyz random garbage",
        "",
    ];

    crossbeam_utils::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|_| {
                for _ in 0..50 {
                    for input in inputs {
                        let _ = engine.classify(input);
                    }
                }
            });
        }
    })
    .unwrap();

    // Results are deterministic regardless of concurrent contention:
    // re-running sequentially after the scoped threads join must match
    // what a single-threaded caller would see.
    let result = engine.classify("Cầu Diễn, Nam Từ Liêm, Hà Nội");
    assert!(result.valid);
    assert_eq!(result.ward_code.as_deref(), Some("CD"));
}
