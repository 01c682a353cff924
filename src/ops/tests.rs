#![expect(clippy::unwrap_used, clippy::indexing_slicing)]
use crate::error::Result;
use crate::frame;
use polars::prelude::*;

mod dropped;
mod encoding;

pub(super) fn df(csv: &str) -> DataFrame {
    frame::decode(csv.as_bytes()).unwrap()
}

pub(super) fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

pub(super) fn floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    frame::float_values(frame::column(df, name)?)
}

pub(super) fn texts(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    frame::string_values(frame::column(df, name)?)
}

#[test]
fn test_operations_leave_input_untouched() -> Result<()> {
    let source = df("a,b\n1,\n,y\n3,y\n");
    let before = frame::encode(&source)?;

    super::impute(&source, &names(&["a"]), super::ImputeMethod::Mean, None)?;
    super::scale(&source, &names(&["a"]), super::ScaleMethod::MinMax)?;
    super::one_hot(&source, &names(&["b"]))?;
    super::drop_columns(&source, &names(&["b"]))?;

    assert_eq!(frame::encode(&source)?, before);
    assert_eq!(source.height(), 3);
    Ok(())
}
