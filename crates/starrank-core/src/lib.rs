pub mod config;
pub mod logging;

pub mod http;
pub mod links;
pub mod metric;
pub mod pipeline;
pub mod rank;
pub mod resolver;
pub mod run;
pub mod source;
