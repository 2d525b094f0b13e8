mod common;

use std::sync::Arc;

use pyrite_cache::CacheKey;
use pyrite_config::PyriteConfig;
use pyrite_pipeline::CompilerError;
use pyrite_source::SourceUnit;

use common::Harness;

#[test]
fn recompiling_unchanged_source_skips_every_stage() {
    let h = Harness::new(PyriteConfig::default());
    let unit = SourceUnit::new("a.py", "x = 1 + 2\nprint(x)");

    let first = h.pipeline.compile_source(&unit).unwrap();
    let second = h.pipeline.compile_source(&unit).unwrap();
    let third = h.pipeline.compile_source(&unit.clone()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(h.parses.get(), 1);
    assert_eq!(h.lowerings.get(), 1);

    let stats = h.pipeline.cache().stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
}

#[test]
fn edited_text_is_recompiled_and_old_entry_survives() {
    let h = Harness::new(PyriteConfig::default());
    let before = SourceUnit::new("a.py", "x = 1");
    let after = SourceUnit::new("a.py", "x = 2");

    let old = h.pipeline.compile_source(&before).unwrap();
    let new = h.pipeline.compile_source(&after).unwrap();

    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(h.parses.get(), 2);
    assert_eq!(h.pipeline.cache().len(), 2);

    let key = CacheKey::new("a.py", before.fingerprint());
    let kept = h.pipeline.cache().get(&key).unwrap();
    assert!(Arc::ptr_eq(&kept, &old));
}

#[test]
fn same_text_under_another_identifier_is_compiled_separately() {
    let h = Harness::new(PyriteConfig::default());
    let a = h
        .pipeline
        .compile_source(&SourceUnit::new("a.py", "print(1)"))
        .unwrap();
    let b = h
        .pipeline
        .compile_source(&SourceUnit::new("b.py", "print(1)"))
        .unwrap();

    assert_eq!(h.parses.get(), 2);
    assert_eq!(a.filename, "a.py");
    assert_eq!(b.filename, "b.py");
}

#[test]
fn syntax_errors_are_not_cached() {
    let h = Harness::new(PyriteConfig::default());
    let unit = SourceUnit::new("bad.py", "x = = 1");

    for attempt in 1..=2 {
        let err = h.pipeline.compile_source(&unit).unwrap_err();
        assert!(matches!(err, CompilerError::Parse(ref e) if e.identifier == "bad.py"));
        assert_eq!(h.parses.get(), attempt);
    }
    assert_eq!(h.lowerings.get(), 0);
    assert!(h.pipeline.cache().is_empty());
}

#[test]
fn running_from_source_reuses_the_cache() {
    let h = Harness::new(PyriteConfig::default());
    let unit = SourceUnit::new("a.py", "print('hi')");

    h.pipeline.run_from_source(&unit).unwrap();
    h.pipeline.run_from_source(&unit).unwrap();

    assert_eq!(h.output.take(), "hi\nhi\n");
    assert_eq!(h.parses.get(), 1);
}
