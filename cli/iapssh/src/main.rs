//! iapssh - generate SSH client config for GCE VMs behind IAP.
//!
//! Looks up a VM through the Compute Engine API and prints an SSH config
//! stanza whose ProxyCommand tunnels through the gcloud IAP helper. One
//! linear pass: parse flags, validate, authenticate, list, render.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use iapssh_gce::{ComputeClient, Instance, ServiceAccountKey};

mod error;
mod paths;
mod render;

use error::print_error;
use render::SshStanza;

/// Environment variable naming the service-account key file.
const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Generate an SSH config stanza for a GCE VM reachable through IAP.
#[derive(Debug, Parser)]
#[command(name = "iapssh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Select project where instance lives.
    #[arg(short, long)]
    project: Option<String>,

    /// Select zone where instance is located.
    #[arg(short, long)]
    zone: Option<String>,

    /// Select VM for which to generate ssh config.
    #[arg(short, long)]
    vmname: Option<String>,

    /// Use different username.
    #[arg(short, long)]
    user: Option<String>,
}

/// Validated values extracted from the flags.
#[derive(Debug)]
struct Request {
    project: String,
    zone: String,
    vmname: String,
    user: Option<String>,
}

impl Cli {
    /// Extract the required flags, or `None` if any is missing or empty.
    fn into_request(self) -> Option<Request> {
        let project = self.project.filter(|s| !s.is_empty())?;
        let zone = self.zone.filter(|s| !s.is_empty())?;
        let vmname = self.vmname.filter(|s| !s.is_empty())?;

        Some(Request {
            project,
            zone,
            vmname,
            user: self.user,
        })
    }
}

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so the rendered stanza on stdout stays clean.
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(request) = cli.into_request() else {
        // Missing required flags show usage and exit cleanly. The zero
        // exit code is historical behavior, kept as documented.
        let mut cmd = Cli::command();
        let _ = cmd.write_help(&mut std::io::stderr());
        eprintln!();
        std::process::exit(0);
    };

    // The credentials variable is checked before any network activity.
    // Diagnostic on stdout and exit code 2 are historical behavior.
    let credentials_path = std::env::var(CREDENTIALS_ENV).unwrap_or_default();
    if credentials_path.is_empty() {
        println!(
            "ERR: add to environment {CREDENTIALS_ENV} variable with your service account credentials"
        );
        std::process::exit(2);
    }

    if let Err(e) = run(request, &credentials_path).await {
        print_error(&e);
        std::process::exit(1);
    }
}

async fn run(request: Request, credentials_path: &str) -> Result<()> {
    let key = ServiceAccountKey::from_file(credentials_path)
        .with_context(|| format!("failed to load service account key from {credentials_path}"))?;
    let client = ComputeClient::from_service_account_key(&key).await?;

    let username = match request.user.clone() {
        Some(user) => user,
        None => paths::login_name()?,
    };
    let helper_script = paths::gcloud_helper_script()?;
    let ssh_key_file = paths::ssh_key_file()?;
    let known_hosts_file = paths::known_hosts_file()?;

    let filter = format!("name={}", request.vmname);
    tracing::debug!(
        project = %request.project,
        zone = %request.zone,
        vm = %request.vmname,
        "looking up instance"
    );
    let instances = client
        .list_instances(&request.project, &request.zone, Some(&filter))
        .await?;

    // Zero matches renders nothing and still exits successfully.
    for instance in &instances {
        let stanza = stanza_for(
            &request,
            instance,
            &username,
            &helper_script,
            &ssh_key_file,
            &known_hosts_file,
        );
        print!("{}", stanza.render());
    }

    Ok(())
}

/// Build the per-instance record, in the order the API returned items.
fn stanza_for(
    request: &Request,
    instance: &Instance,
    username: &str,
    helper_script: &std::path::Path,
    ssh_key_file: &std::path::Path,
    known_hosts_file: &std::path::Path,
) -> SshStanza {
    SshStanza {
        vm: request.vmname.clone(),
        project: request.project.clone(),
        zone: request.zone.clone(),
        compute_id: instance.id,
        ssh_key_file: ssh_key_file.to_path_buf(),
        known_hosts_file: known_hosts_file.to_path_buf(),
        helper_script: helper_script.to_path_buf(),
        username: username.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn all_required_flags_yield_request() {
        let cli = parse(&["iapssh", "-p", "proj", "-z", "us-central1-a", "-v", "myvm"]);
        let request = cli.into_request().unwrap();
        assert_eq!(request.project, "proj");
        assert_eq!(request.zone, "us-central1-a");
        assert_eq!(request.vmname, "myvm");
        assert!(request.user.is_none());
    }

    #[test]
    fn long_flags_parse_too() {
        let cli = parse(&[
            "iapssh",
            "--project",
            "proj",
            "--zone",
            "us-central1-a",
            "--vmname",
            "myvm",
            "--user",
            "alice",
        ]);
        let request = cli.into_request().unwrap();
        assert_eq!(request.user.as_deref(), Some("alice"));
    }

    #[test]
    fn missing_any_required_flag_yields_none() {
        for args in [
            vec!["iapssh", "-z", "us-central1-a", "-v", "myvm"],
            vec!["iapssh", "-p", "proj", "-v", "myvm"],
            vec!["iapssh", "-p", "proj", "-z", "us-central1-a"],
            vec!["iapssh"],
        ] {
            assert!(parse(&args).into_request().is_none(), "args: {args:?}");
        }
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let cli = parse(&["iapssh", "-p", "", "-z", "us-central1-a", "-v", "myvm"]);
        assert!(cli.into_request().is_none());
    }

    #[test]
    fn one_stanza_per_instance_in_api_order() {
        let request = Request {
            project: "proj".to_string(),
            zone: "us-central1-a".to_string(),
            vmname: "myvm".to_string(),
            user: Some("alice".to_string()),
        };
        let instances = [
            Instance {
                id: 11,
                name: "myvm".to_string(),
                status: None,
            },
            Instance {
                id: 22,
                name: "myvm".to_string(),
                status: None,
            },
        ];

        let rendered: String = instances
            .iter()
            .map(|instance| {
                stanza_for(
                    &request,
                    instance,
                    "alice",
                    Path::new("/opt/google-cloud-sdk/lib/gcloud.py"),
                    Path::new("/home/alice/.ssh/id_rsa"),
                    Path::new("/home/alice/.ssh/google_compute_known_hosts"),
                )
                .render()
            })
            .collect();

        assert_eq!(rendered.matches("Host myvm\n").count(), 2);
        let first = rendered.find("HostName compute.11").unwrap();
        let second = rendered.find("HostName compute.22").unwrap();
        assert!(first < second);
    }
}
