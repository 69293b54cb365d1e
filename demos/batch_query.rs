//! Runs the canonical fixture network through the same batch entry point
//! the CLI uses, and pretty-prints the response document.

use dev_fixtures::example_batch_document;

fn main() {
    let document = example_batch_document();
    let output = transit_catalogue::run_batch(&document.to_string()).expect("fixture document is well-formed");
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
