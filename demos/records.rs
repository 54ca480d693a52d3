//! Parsing, building and decoding records.
//!
//! Run with: cargo run --example records
//! Set RUST_LOG=debug to see parse failures logged.

use jsrs::{from_str, parse, record, to_string, Metadata, Value};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Birth {
    date: String,
    place: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Hand-written text: comments, single quotes, unquoted keys, elisions
    let text = r#"
        {
            name: 'Marcus Aurelius', // emperor
            birth: { date: '121-04-26', place: 'Rome' },
            children: [, 'Faustina', ],
            successor: undefined,
        }
    "#;
    let person = parse(text)?;
    println!("Canonical: {}", person.stringify());
    println!("Name: {}", person["name"].as_str());
    println!("Second child: {}", person["children"][1].as_str());
    println!("Successor is {}\n", person["successor"].value_type());

    // Rust types in and out
    let birth: Birth = from_str(&person["birth"].stringify())?;
    println!("Birth struct: {:?}", birth);
    println!("Back to text: {}\n", to_string(&birth)?);

    // Building values in code
    let built = record!({
        name: "Marcus Aurelius",
        children: [, "Faustina", ],
    });
    println!("Built: {}\n", built.stringify());

    // Compact data records decoded against a metadata layout
    let meta = Metadata::parse("{name:'string',birth:{date:'string',place:'string'}}")?;
    let decoded = meta.decode_str("['Lucius Verus',['130-12-15','Rome']]")?;
    println!("Decoded: {}", decoded.stringify());
    println!("Encoded: {}\n", meta.encode(&decoded)?.stringify());

    // Errors report where in the normalized text they happened
    match parse("{ n: nult }") {
        Ok(value) => println!("Unexpectedly parsed {}", value),
        Err(err) => println!("Rejected: {} ({:?})", err, err.kind()),
    }

    let comparison = Value::from(1) < Value::from("1");
    println!("Numbers sort before strings: {}", comparison);

    Ok(())
}
