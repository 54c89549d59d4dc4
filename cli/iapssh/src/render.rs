//! SSH config stanza rendering.
//!
//! The stanza format is fixed: a banner, a `Host` block whose alias is
//! the requested VM name, and a ProxyCommand that tunnels through the
//! gcloud IAP helper. Only the record's fields vary between instances.

use std::path::PathBuf;

/// Everything substituted into one stanza, one record per matched instance.
#[derive(Debug, Clone)]
pub struct SshStanza {
    pub vm: String,
    pub project: String,
    pub zone: String,
    pub compute_id: u64,
    pub ssh_key_file: PathBuf,
    pub known_hosts_file: PathBuf,
    pub helper_script: PathBuf,
    pub username: String,
}

impl SshStanza {
    /// Render the stanza. Values are trusted; no escaping is applied.
    pub fn render(&self) -> String {
        format!(
            "\n\n----\nCopy below host definition to .ssh/config file\n----\n\n\
Host {vm}\n    \
HostName compute.{id}\n    \
IdentityFile {key}\n    \
CheckHostIP no\n    \
HostKeyAlias compute.{id}\n    \
IdentitiesOnly yes\n    \
StrictHostKeyChecking yes\n    \
UserKnownHostsFile {known_hosts}\n    \
ProxyCommand python -S {helper} compute start-iap-tunnel {vm} %p --listen-on-stdin --project={project} --zone={zone} --verbosity=warning\n    \
ProxyUseFdpass no\n    \
ForwardAgent yes\n    \
User {user}\n    \
ControlMaster auto\n    \
ControlPersist 30\n    \
PreferredAuthentications publickey\n    \
KbdInteractiveAuthentication no\n    \
PasswordAuthentication no\n    \
ConnectTimeout 20\n    \
ControlPath /tmp/ssh-{vm}-iap\n\n",
            vm = self.vm,
            id = self.compute_id,
            key = self.ssh_key_file.display(),
            known_hosts = self.known_hosts_file.display(),
            helper = self.helper_script.display(),
            project = self.project,
            zone = self.zone,
            user = self.username,
        )
    }
}
