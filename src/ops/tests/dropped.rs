use super::{df, names};
use crate::error::{PrepError, Result};
use crate::frame;
use crate::lifecycle::storage::MemoryStore;
use crate::ops::DroppedColumnCache;
use std::sync::Arc;

fn cache() -> DroppedColumnCache {
    DroppedColumnCache::new(Arc::new(MemoryStore::unbounded()))
}

#[test]
fn test_drop_then_restore_reconstructs_columns() -> Result<()> {
    let cache = cache();
    let source = df("a,b,c\n1,x,true\n2,,false\n");

    let (dropped, operation_id) = cache.drop_columns(&source, &names(&["b", "c"]))?;
    assert_eq!(frame::column_names(&dropped), vec!["a"]);

    let restored = cache.restore(&dropped, &operation_id)?;
    assert_eq!(frame::encode(&restored)?, frame::encode(&source)?);

    // The entry is read, not consumed.
    assert!(cache.restore(&dropped, &operation_id).is_ok());
    assert_eq!(cache.len()?, 1);
    Ok(())
}

#[test]
fn test_restore_overwrites_present_column() -> Result<()> {
    let cache = cache();
    let (_, operation_id) = cache.drop_columns(&df("a,b\n1,x\n2,y\n"), &names(&["b"]))?;

    let restored = cache.restore(&df("a,b\n1,q\n2,r\n"), &operation_id)?;
    assert_eq!(frame::encode(&restored)?, "a,b\n1,x\n2,y\n");
    Ok(())
}

#[test]
fn test_restore_unknown_operation() {
    let result = cache().restore(&df("a\n1\n"), "no-such-id");
    assert!(matches!(result, Err(PrepError::UnknownOperation(id)) if id == "no-such-id"));
}

#[test]
fn test_restore_row_count_mismatch() -> Result<()> {
    let cache = cache();
    let (_, operation_id) = cache.drop_columns(&df("a,b\n1,x\n2,y\n"), &names(&["b"]))?;

    let result = cache.restore(&df("a\n1\n2\n3\n"), &operation_id);
    assert!(matches!(result, Err(PrepError::RowCountMismatch { column }) if column == "b"));
    Ok(())
}

#[test]
fn test_operation_ids_are_unique() -> Result<()> {
    let cache = cache();
    let source = df("a,b\n1,2\n");
    let (_, first) = cache.drop_columns(&source, &names(&["a"]))?;
    let (_, second) = cache.drop_columns(&source, &names(&["a"]))?;
    assert_ne!(first, second);
    assert!(cache.forget(&first)?);
    assert!(!cache.forget(&first)?);
    Ok(())
}
