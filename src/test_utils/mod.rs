#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::{assert_json_error, get_test_server};
