use keep::codec::{decode_note, HEADER_SIZE, NOTE_SIZE};
use keep::error::KeepError;
use keep::header;
use keep::model::{Order, Target};
use keep::store::fs::FileStore;
use keep::store::DataStore;
use std::fs::{self, OpenOptions};
use std::io::Write;

fn store() -> (tempfile::TempDir, FileStore) {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(temp_dir.path().join(".keep"));
    (temp_dir, store)
}

#[test]
fn demo_scenario() {
    let (_tmp, mut store) = store();
    let target = Target::Default;

    let (milk, _) = store.create_note(&target, "buy milk").unwrap();
    let (mom, header) = store.create_note(&target, "call mom").unwrap();
    assert_eq!((milk.id, mom.id), (1, 2));
    assert_eq!((header.size, header.size_all_time), (2, 2));
    assert_eq!(header.title, "default");

    assert_eq!(store.read_note(&target, 1).unwrap().text, "buy milk");

    let header = store.delete_note(&target, 1).unwrap();
    assert_eq!((header.size, header.size_all_time), (1, 2));

    let (_, notes) = store.list_notes(&target, Order::Ascending).unwrap();
    let ids: Vec<_> = notes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![2]);

    assert!(matches!(
        store.read_note(&target, 1),
        Err(KeepError::InvalidId(_))
    ));
}

#[test]
fn notes_sit_at_fixed_offsets() {
    let (_tmp, mut store) = store();
    for i in 1..=5 {
        store
            .create_note(&Target::Default, &format!("note {}", i))
            .unwrap();
    }

    let bytes = fs::read(store.path_for(&Target::Default)).unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + 5 * NOTE_SIZE);

    for k in 1..=5usize {
        let offset = HEADER_SIZE + (k - 1) * NOTE_SIZE;
        let note = decode_note(&bytes[offset..offset + NOTE_SIZE]).unwrap();
        assert_eq!(note.id, k as i64);
        assert_eq!(note.text, format!("note {}", k));
    }
}

#[test]
fn ids_keep_growing_across_deletes() {
    let (_tmp, mut store) = store();
    let target = Target::Default;

    for _ in 0..3 {
        store.create_note(&target, "x").unwrap();
    }
    store.delete_note(&target, 3).unwrap();
    store.delete_note(&target, 2).unwrap();

    let (note, header) = store.create_note(&target, "after").unwrap();
    assert_eq!(note.id, 4);
    assert_eq!((header.size, header.size_all_time), (2, 4));

    let (_, asc) = store.list_notes(&target, Order::Ascending).unwrap();
    let (_, desc) = store.list_notes(&target, Order::Descending).unwrap();
    let mut reversed = desc.clone();
    reversed.reverse();
    assert_eq!(asc, reversed);
}

#[test]
fn group_listing_skips_default_store() {
    let (_tmp, mut store) = store();

    store.create_group("work", "office").unwrap();
    store.create_group("home", "chores").unwrap();
    store.create_note(&Target::Default, "loose note").unwrap();
    store
        .create_note(&Target::Group("work".into()), "standup")
        .unwrap();

    let groups = store.list_groups().unwrap();
    let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["home", "work"]);
    assert_eq!(groups[1].header.size, 1);
    assert_eq!(groups[1].header.description, "office");
}

#[test]
fn stray_bytes_are_reported_not_overwritten() {
    let (_tmp, mut store) = store();
    let target = Target::Default;
    store.create_note(&target, "one").unwrap();

    let path = store.path_for(&target);
    OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap()
        .write_all(&[1, 2, 3])
        .unwrap();

    assert!(matches!(
        store.list_notes(&target, Order::Ascending),
        Err(KeepError::CorruptRecord { .. })
    ));
    assert!(matches!(
        store.create_note(&target, "two"),
        Err(KeepError::CorruptRecord { .. })
    ));
    assert_eq!(
        fs::metadata(&path).unwrap().len() as usize,
        HEADER_SIZE + NOTE_SIZE + 3
    );

    let report = store.doctor(&target).unwrap();
    assert_eq!(report.scan.trailing_bytes, 3);
    assert_eq!(report.scan.live, 1);
    assert!(!report.repaired);
}

#[test]
fn doctor_counts_tombstoned_slots_as_issued() {
    let (_tmp, mut store) = store();
    let target = Target::Default;
    for text in ["one", "two", "three"] {
        store.create_note(&target, text).unwrap();
    }
    store.delete_note(&target, 3).unwrap();

    // Lose track of the last id, which now only exists as a tombstone
    let path = store.path_for(&target);
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .unwrap();
    let mut drifted = header::load(&mut file).unwrap().unwrap();
    drifted.size_all_time = 2;
    header::save(&mut file, &drifted).unwrap();
    drop(file);

    assert!(matches!(
        store.create_note(&target, "blocked"),
        Err(KeepError::CorruptRecord { .. })
    ));

    let report = store.doctor(&target).unwrap();
    assert!(report.repaired);
    assert_eq!(report.scan.slots, 3);
    assert_eq!((report.header.size, report.header.size_all_time), (2, 3));

    let (note, _) = store.create_note(&target, "four").unwrap();
    assert_eq!(note.id, 4);
}
