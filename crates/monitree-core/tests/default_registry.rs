//! The default root is process-wide, so everything touching it lives in this
//! one test binary, in one test.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use monitree_core::{default, Mode, Snapshot};

#[test]
fn default_root_lifecycle() {
    // a rejected name must not claim the slot
    let err = default::init("a..b", Mode::Full).unwrap_err();
    assert_eq!(err.kind().as_str(), "INVALID_NAME");

    let root = default::init("beat", Mode::Full).expect("first init must succeed");
    assert_eq!(root.name(), "beat");
    assert!(default::init("again", Mode::Full).is_err());
    assert!(Arc::ptr_eq(&root, &default::registry()));

    // package-level lookups on an empty root
    assert!(default::get("missing").is_none());
    assert!(default::get_registry("missing.registry").is_none());

    let v = default::new_int(None, "v", Some(Mode::Reported)).unwrap();
    let sub = default::new_registry("sub.registry1", None).unwrap();
    assert_eq!(sub.name(), "beat.sub.registry1");
    default::new_string(Some(&sub), "v", Some(Mode::Reported)).unwrap().set("x");
    default::new_float(None, "sub.registry2.v", None).unwrap().set(0.5);
    v.add(2);

    assert_eq!(default::get("v").map(|h| h.snapshot()), Some(Snapshot::Int(2)));
    assert_eq!(
        default::get("sub.registry1.v").map(|h| h.snapshot()),
        Some(Snapshot::Str("x".into()))
    );
    assert!(Arc::ptr_eq(&default::get_or_create_registry("sub.registry1").unwrap(), &sub));

    let mut reported = Vec::new();
    default::do_each(Mode::Reported, |name, _| reported.push(name.to_string()));
    reported.sort();
    assert_eq!(reported, vec!["sub.registry1.v".to_string(), "v".to_string()]);

    assert!(default::remove("sub.registry2.v"));
    assert!(default::get("sub.registry2.v").is_none());

    default::clear();
    assert!(default::get("v").is_none());
    assert!(default::get_registry("sub").is_none());
    assert!(default::registry().is_empty());

    // a cleared root keeps its identity
    assert!(Arc::ptr_eq(&root, &default::registry()));
    default::new_bool(None, "alive", None).unwrap().set(true);
    assert_eq!(default::get("alive").map(|h| h.snapshot()), Some(Snapshot::Bool(true)));
    default::clear();
}
