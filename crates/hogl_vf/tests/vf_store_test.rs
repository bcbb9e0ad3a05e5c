//! Integration tests for in-memory virtual file manipulation.

use hogl_vf::{VfError, VirtualFile};

fn alpha_beta() -> VirtualFile {
    let mut vf = VirtualFile::new(1, 16);
    vf.add_item("alpha", 0, &[1, 2, 3, 4]).unwrap();
    vf.add_item("beta", 1, &[9, 9]).unwrap();
    vf
}

#[test]
fn test_alpha_beta_scenario() {
    let mut vf = alpha_beta();
    vf.map_items().unwrap();

    assert_eq!(vf.get_item_index("beta").unwrap(), 1);
    assert_eq!(vf.item_size(1).unwrap(), 2);
    assert_eq!(vf.item_type(0).unwrap(), 0);
    assert_eq!(vf.item_type(1).unwrap(), 1);
    assert_eq!(vf.buffer_size(), (4 + 8 + 4) + (4 + 8 + 2));
}

#[test]
fn test_rename_scenario() {
    let mut vf = alpha_beta();
    vf.map_items().unwrap();

    vf.rename_item(0, "alpha2").unwrap();

    assert_eq!(
        vf.get_item_index("alpha"),
        Err(VfError::VfBadName("alpha".to_string()))
    );
    assert_eq!(vf.get_item_index("alpha2").unwrap(), 0);
    assert_eq!(vf.map_item(0).unwrap(), &[1, 2, 3, 4]);
}

#[test]
fn test_name_overflow_leaves_store_unchanged() {
    let mut vf = alpha_beta();
    let before = (vf.item_count(), vf.buffer_size());

    let result = vf.add_item("a_name_longer_than_16", 3, &[0; 8]);

    assert!(matches!(result, Err(VfError::BadArgument(_))));
    assert_eq!((vf.item_count(), vf.buffer_size()), before);

    vf.map_items().unwrap();
    assert_eq!(vf.get_item_index("alpha").unwrap(), 0);
    assert_eq!(vf.get_item_index("beta").unwrap(), 1);
    assert!(vf.get_item_index("a_name_longer_than_16").is_err());
}

#[test]
fn test_out_of_range_accessors() {
    let mut empty = VirtualFile::new(0, 8);
    empty.map_items().unwrap();
    for vf in [empty, {
        let mut vf = alpha_beta();
        vf.map_items().unwrap();
        vf
    }] {
        let count = vf.item_count();
        let index = usize::try_from(count).unwrap();
        assert_eq!(vf.map_item(index), Err(VfError::OutOfRange { index, count }));
        assert_eq!(vf.item_size(index), Err(VfError::OutOfRange { index, count }));
        assert_eq!(vf.item_type(index + 7), Err(VfError::OutOfRange { index: index + 7, count }));
    }
}

#[test]
fn test_out_of_range_without_map() {
    let vf = VirtualFile::new(0, 8);
    assert!(matches!(vf.map_item(0), Err(VfError::OutOfRange { .. })));
    assert!(matches!(vf.item_type(0), Err(VfError::OutOfRange { .. })));
}

#[test]
fn test_stale_map_detection() {
    let vf = alpha_beta();
    assert_eq!(vf.get_item_index("alpha"), Err(VfError::VfiMapMissing));
    assert_eq!(vf.map_item(0), Err(VfError::VfiMapMissing));
    assert_eq!(vf.item_size(1), Err(VfError::VfiMapMissing));
    assert!(vf.items().is_err());
}

#[test]
fn test_remap_after_add() {
    let mut vf = alpha_beta();
    vf.map_items().unwrap();
    vf.add_item("gamma", 2, &[5; 10]).unwrap();
    assert_eq!(vf.map_item(2), Err(VfError::VfiMapMissing));

    vf.map_items().unwrap();
    assert_eq!(vf.get_item_index("gamma").unwrap(), 2);
    assert_eq!(vf.map_item(2).unwrap(), &[5; 10]);
}

#[test]
fn test_duplicate_names_resolve_to_first() {
    let mut vf = VirtualFile::new(0, 8);
    vf.add_item("dup", 0, &[1]).unwrap();
    vf.add_item("dup", 0, &[2]).unwrap();
    vf.map_items().unwrap();
    assert_eq!(vf.get_item_index("dup").unwrap(), 0);
}

#[test]
fn test_restride_then_rename() {
    let mut vf = alpha_beta();
    vf.change_name_len(32).unwrap();
    vf.rename_item(1, "a_considerably_longer_name").unwrap();
    assert_eq!(vf.get_item_index("a_considerably_longer_name").unwrap(), 1);
    assert_eq!(vf.item_name(0).unwrap(), "alpha");
}

#[test]
fn test_empty_payload() {
    let mut vf = VirtualFile::new(0, 8);
    vf.add_item("marker", 9, &[]).unwrap();
    vf.map_items().unwrap();
    assert_eq!(vf.item_size(0).unwrap(), 0);
    assert!(vf.map_item(0).unwrap().is_empty());
    assert_eq!(vf.buffer_size(), 12);
}
