//! Demonstrates TypedMap rejecting keys and values of the wrong type.
//!
//! Run with: cargo run --example typed

use sovran_tsmap::{MapError, TypeDescriptor, TypedMap};

fn main() -> Result<(), MapError> {
    // Ports by service name
    let ports = TypedMap::of::<String, u16>();

    ports.put("http".to_string(), 80u16)?;
    ports.put("https".to_string(), 443u16)?;

    // A u32 port is a programmer error, not a silent widening
    match ports.put("admin".to_string(), 8080u32) {
        Ok(()) => println!("This shouldn't happen"),
        Err(e) => println!("Rejected: {}", e),
    }

    // So is a &str key
    if let Err(e) = ports.get::<&str, u16>(&"http") {
        println!("Rejected: {}", e);
    }

    if let Some(port) = ports.get::<String, u16>(&"https".to_string())? {
        println!("https -> {}", port);
    }

    let mut names = ports.keys_as::<String>()?;
    names.sort();
    println!("services: {:?}", names);

    // Only the key type is fixed here; values can be anything
    let settings = TypedMap::with_types(Some(TypeDescriptor::of::<&'static str>()), None);
    settings.put("retries", 3u8)?;
    settings.put("hosts", vec!["a".to_string(), "b".to_string()])?;

    let hosts = settings.with(&"hosts", |hosts: &Vec<String>| hosts.join(","))?;
    println!("hosts: {:?}", hosts);
    println!("{:?}", settings);

    Ok(())
}
