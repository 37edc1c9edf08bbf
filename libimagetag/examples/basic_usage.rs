//! Basic usage example for the imagetag library.
//!
//! Detects the authentication scheme of Docker Hub and lists the release
//! tags of `library/alpine`, newest first.
//!
//! Run with: cargo run --example basic_usage

use libimagetag::{Credentials, TagLister, TagQuery};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("imagetag Library - Basic Usage Example\n");

    let registry = "https://registry-1.docker.io";
    let lister = TagLister::default();

    match lister.detect_challenge(registry) {
        Ok(challenge) => println!("✓ {} asks for {} authentication\n", registry, challenge.scheme()),
        Err(e) => {
            eprintln!("✗ Failed to reach {}: {}", registry, e);
            return Ok(());
        }
    }

    let query = TagQuery::new("library/alpine", registry).with_filter(r"\d+\.\d+\.\d+");
    let result = lister.list_tags(&query, &Credentials::anonymous())?;

    if let Some(message) = &result.error_message {
        eprintln!("✗ Listing failed: {}", message);
        return Ok(());
    }

    println!("✓ Found {} release tags:\n", result.tags.len());
    for tag in result.tags.iter().take(10) {
        println!("  - {}", tag);
    }
    if result.tags.len() > 10 {
        println!("  ... and {} more", result.tags.len() - 10);
    }

    Ok(())
}
