//! Schema generator
//!
//! Prints the Machine CRD manifest and the JSON schemas of the GCP provider
//! payloads as YAML on stdout.
//!
//! `SCHEMAGEN_OUTPUT` selects what is printed: `crd`, `spec`, `status` or
//! `all` (default).

use anyhow::{Result, bail};
use gcp_provider_api::{GcpMachineProviderSpec, GcpMachineProviderStatus, Machine};
use kube::CustomResourceExt;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let output = env::var("SCHEMAGEN_OUTPUT").unwrap_or_else(|_| "all".to_string());
    info!("Generating schemas: {}", output);

    let mut documents = Vec::new();
    match output.as_str() {
        "crd" => documents.push(serde_yaml::to_string(&Machine::crd())?),
        "spec" => documents.push(serde_yaml::to_string(&schemars::schema_for!(GcpMachineProviderSpec))?),
        "status" => documents.push(serde_yaml::to_string(&schemars::schema_for!(GcpMachineProviderStatus))?),
        "all" => {
            documents.push(serde_yaml::to_string(&Machine::crd())?);
            documents.push(serde_yaml::to_string(&schemars::schema_for!(GcpMachineProviderSpec))?);
            documents.push(serde_yaml::to_string(&schemars::schema_for!(GcpMachineProviderStatus))?);
        }
        other => bail!("unknown SCHEMAGEN_OUTPUT '{other}', expected crd, spec, status or all"),
    }

    println!("{}", documents.join("---\n"));
    info!("Generated {} document(s)", documents.len());
    Ok(())
}
