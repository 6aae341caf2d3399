//! Show the redirect table

use anyhow::{bail, Result};

use crate::Site;

/// Validate and print the configured redirects
pub fn run(site: &Site) -> Result<()> {
    let redirects = site.redirects();

    if let Err(errors) = redirects.validate() {
        for e in &errors {
            tracing::error!("Redirect: {}", e);
        }
        bail!("{} invalid redirect(s)", errors.len());
    }

    println!("Redirects ({}):", redirects.len());
    for (from, to) in redirects.iter() {
        println!("  {} -> {}", from, to);
    }

    Ok(())
}
