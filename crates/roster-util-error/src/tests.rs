use snafu::{ResultExt as _, Snafu};

use super::*;

#[derive(Debug, Snafu)]
#[snafu(display("connection refused"))]
struct Root;

#[derive(Debug, Snafu)]
#[snafu(display("request failed"))]
struct Middle {
    source: Root,
}

#[derive(Debug, Snafu)]
#[snafu(display("refresh of trusted list failed"))]
struct Outer {
    source: Middle,
}

fn failing() -> Result<(), Outer> {
    Err(Root).context(MiddleSnafu).context(OuterSnafu)
}

#[test_log::test]
fn formats_whole_chain_on_one_line() {
    let err = failing().unwrap_err();

    assert_eq!(
        err.fmt_compact().to_string(),
        "refresh of trusted list failed: request failed: connection refused"
    );
}

#[test_log::test]
fn single_error_has_no_separator() {
    assert_eq!(Root.fmt_compact().to_string(), "connection refused");
}
