use std::path::PathBuf;

use multicalc::config::MultiCalcConfig;
use multicalc::data::app_state::{Action, Store};
use multicalc::{FileStore, KeyValueStore};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("multicalc-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn config_for(dir: &PathBuf) -> MultiCalcConfig {
    let mut cfg = MultiCalcConfig::default();
    cfg.history.storage_dir = Some(dir.clone());
    cfg
}

#[test]
fn history_survives_a_restart() {
    let dir = scratch("restart");
    let cfg = config_for(&dir);
    {
        let mut store = Store::from_config(&cfg);
        store.dispatch(Action::SetFunction("x^3".into()));
        store.dispatch(Action::SaveToHistory { at_millis: 1_700_000_000_000 });
        store.dispatch(Action::SetFunction("tan(x)".into()));
        store.dispatch(Action::SetGuidedMode(true));
        store.dispatch(Action::SaveToHistory { at_millis: 1_700_000_000_500 });
    }

    let raw = FileStore::new(&dir).get(&cfg.history.storage_key).unwrap().unwrap();
    assert!(raw.contains("\"guidedMode\":true"));

    let store = Store::from_config(&cfg);
    let entries = store.history().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].func, "tan(x)");
    assert!(entries[0].guided_mode);
    assert_eq!(entries[1].func, "x^3");
    assert_eq!(entries[1].last_saved, Some(1_700_000_000_000));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn capacity_applies_on_load() {
    let dir = scratch("capacity");
    let mut cfg = config_for(&dir);
    {
        let mut store = Store::from_config(&cfg);
        for i in 0..4 {
            store.dispatch(Action::SetFunction(format!("x+{i}")));
            store.dispatch(Action::SaveToHistory { at_millis: i });
        }
        assert_eq!(store.history().len(), 4);
    }
    cfg.history.capacity = 2;
    let store = Store::from_config(&cfg);
    let funcs: Vec<&str> = store.history().entries().iter().map(|e| e.func.as_str()).collect();
    assert_eq!(funcs, ["x+3", "x+2"]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn memory_only_never_touches_disk() {
    let dir = scratch("memory-only");
    let mut cfg = config_for(&dir);
    cfg.history.memory_only = true;
    let mut store = Store::from_config(&cfg);
    store.dispatch(Action::SaveToHistory { at_millis: 1 });
    assert_eq!(store.history().len(), 1);
    assert!(!dir.exists());
}

#[test]
fn unreadable_history_file_is_left_alone() {
    let dir = scratch("unreadable");
    let cfg = config_for(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.json", cfg.history.storage_key));
    let original: &[u8] = b"[{\"func\":\"x\xff\"}]";
    std::fs::write(&path, original).unwrap();

    let mut store = Store::from_config(&cfg);
    assert!(store.history().is_empty());
    store.dispatch(Action::SetFunction("x^2".into()));
    store.dispatch(Action::SaveToHistory { at_millis: 1 });
    store.delete_entry(0);
    store.clear_history();

    assert_eq!(std::fs::read(&path).unwrap(), original);
    std::fs::remove_dir_all(&dir).ok();
}
