//! Remove the background from a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example remove-background -- input.jpg output.png [method]
//! ```

use std::env;
use std::process;

use bgremover::{Method, ProcessOptions, RemovalEngine};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output.png> [method]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let method = args.get(3).map_or(Method::Smart, |m| Method::parse(m));

    let engine = RemovalEngine::new();
    let opts = ProcessOptions {
        method,
        ..ProcessOptions::default()
    };
    let result = engine.process_file(input.as_ref(), output.as_ref(), &opts);

    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
