use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use bre::{Engine, FactTable, RulePackage, RulePackageBuilder};

fn versioned(version: u32) -> RulePackage {
    RulePackageBuilder::new(&format!("v{version}"))
        .rule("R1", |r| {
            r.when("go == 1")
                .then(&format!("out = {version}"))
                .then(&format!("ver = _v{version}"))
        })
        .build()
}

#[test]
fn evaluate_across_threads() {
    let engine = Arc::new(Engine::new());
    engine
        .load_package(
            &RulePackageBuilder::new("pricing")
                .rule("R1", |r| r.when("a == 1").then("b = a + 1"))
                .rule("R2", |r| r.when("seg == xlsSeg").then("c = _member"))
                .filter("xlsSeg-10")
                .build(),
        )
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let seg = if i % 2 == 0 { "10" } else { "99" };
                engine.evaluate(FactTable::new().set("a", "1").set("seg", seg))
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let facts = handle.join().unwrap().unwrap();
        assert_eq!(facts.get("b"), Some("2.00"));
        if i % 2 == 0 {
            assert_eq!(facts.trace(), "R1;R2;");
            assert_eq!(facts.get("c"), Some("member"));
        } else {
            assert_eq!(facts.trace(), "R1;");
            assert_eq!(facts.get("c"), None);
        }
    }
}

#[test]
fn hot_reload_never_mixes_packages() {
    let engine = Arc::new(Engine::new());
    engine.load_package(&versioned(0)).unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut calls = 0_u32;
                while !done.load(Ordering::Relaxed) || calls == 0 {
                    let facts = engine.evaluate(FactTable::new().set("go", "1")).unwrap();
                    let out = facts.get("out").unwrap().to_owned();
                    assert_eq!(facts.get("ver"), Some(format!("v{out}").as_str()));
                    assert_eq!(facts.trace(), "R1;");
                    calls += 1;
                }
                calls
            })
        })
        .collect();

    for version in 1..=50 {
        engine.load_package(&versioned(version)).unwrap();
        if version % 10 == 0 {
            // A broken package in the middle of the stream is simply rejected.
            let broken = RulePackageBuilder::new("broken")
                .rule("R1", |r| r.when("go == (1"))
                .build();
            assert!(engine.load_package(&broken).is_err());
        }
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(engine.current().unwrap().name(), "v50");
}

#[test]
fn engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
    assert_send_sync::<bre::CompiledPackage>();
}
