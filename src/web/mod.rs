//! HTML front end (askama templates) served by `api_server`.

pub mod handlers;
