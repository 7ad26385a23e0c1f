use pubrecon_store::memory::MemoryItemStore;
use pubrecon_store::{StoreError, StoreRegistry};
use std::sync::Arc;

#[test]
fn registry_resolves_case_insensitively() {
    let registry = StoreRegistry::new()
        .with_store(Arc::new(MemoryItemStore::new("master")))
        .with_store(Arc::new(MemoryItemStore::new("Web")));

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names(), vec!["master".to_string(), "web".to_string()]);
    assert_eq!(registry.get("Master").unwrap().name(), "master");
    assert_eq!(registry.get("web").unwrap().name(), "Web");
}

#[test]
fn registry_unknown_name() {
    let registry = StoreRegistry::new();
    assert!(registry.is_empty());

    match registry.get("core") {
        Err(err) => {
            assert_eq!(err, StoreError::UnknownStore("core".into()));
            assert!(err.is_misconfiguration());
        }
        Ok(_) => panic!("expected UnknownStore"),
    }
}

#[test]
fn registry_replaces_same_name() {
    let mut registry = StoreRegistry::new();
    registry.register(Arc::new(MemoryItemStore::new("web")));
    registry.register(Arc::new(MemoryItemStore::new("WEB")));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("web").unwrap().name(), "WEB");
}
