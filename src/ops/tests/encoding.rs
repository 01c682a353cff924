use super::{df, names};
use crate::error::{PrepError, Result};
use crate::frame;
use crate::ops::{EncodeMethod, one_hot, ordinal};

fn ints(df: &polars::prelude::DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = frame::column(df, name)?.cast(&polars::prelude::DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

#[test]
fn test_one_hot_one_indicator_per_value() -> Result<()> {
    let out = one_hot(&df("color,n\nred,1\nblue,2\nred,3\n"), &names(&["color"]))?;
    assert_eq!(frame::column_names(&out), vec!["n", "color_blue", "color_red"]);

    let blue = ints(&out, "color_blue")?;
    let red = ints(&out, "color_red")?;
    for (b, r) in blue.iter().zip(&red) {
        assert_eq!(b.unwrap() + r.unwrap(), 1);
    }
    assert_eq!(red, vec![Some(1), Some(0), Some(1)]);
    Ok(())
}

#[test]
fn test_one_hot_missing_cell_is_all_zero() -> Result<()> {
    let out = one_hot(&df("color,n\nred,1\n,2\n"), &names(&["color"]))?;
    assert_eq!(frame::column_names(&out), vec!["n", "color_red"]);
    assert_eq!(ints(&out, "color_red")?, vec![Some(1), Some(0)]);
    Ok(())
}

#[test]
fn test_ordinal_follows_sorted_order() -> Result<()> {
    let out = ordinal(&df("size,n\nm,1\ns,2\nl,3\nm,4\n"), &names(&["size"]))?;
    assert_eq!(ints(&out, "size")?, vec![Some(1), Some(2), Some(0), Some(1)]);
    assert_eq!(frame::column_names(&out), vec!["size", "n"]);
    Ok(())
}

#[test]
fn test_ordinal_numeric_and_missing() -> Result<()> {
    let out = ordinal(&df("v,k\n30,a\n10,b\n,c\n20,d\n"), &names(&["v"]))?;
    assert_eq!(ints(&out, "v")?, vec![Some(2), Some(0), Some(-1), Some(1)]);
    Ok(())
}

#[test]
fn test_encode_errors() {
    let result = one_hot(&df("a\nx\n"), &names(&["b"]));
    assert!(matches!(result, Err(PrepError::UnknownColumn(_))));
    assert!(matches!("label".parse::<EncodeMethod>(), Err(PrepError::UnknownMethod(_))));
}
