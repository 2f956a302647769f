//! Export the GraphQL schema as SDL.
//!
//! Usage: `cargo run --bin export_schema > schema.graphql`

#![allow(clippy::print_stdout)]

use response_decorator::ResponseDecorator;
use response_headers_api::{app::build_schema, config::SessionConfig};

fn main() {
    let schema = build_schema(ResponseDecorator::new(), SessionConfig::default());
    print!("{}", schema.sdl());
}
