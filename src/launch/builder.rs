use sha2::{Digest, Sha256};

use crate::config::profile::{GpuRequest, LaunchProfile};

/// Ordered argument tokens handed to the container runtime (`docker <args>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    detach: bool,
}

impl Invocation {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// True when the runtime returns as soon as the container is started
    pub fn detach(&self) -> bool {
        self.detach
    }

    /// SHA-256 over the token sequence, stable across runs
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for arg in &self.args {
            hasher.update(arg.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Render as a single shell-pasteable command line
    pub fn command_line(&self, program: &str) -> String {
        std::iter::once(program)
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render a profile into runtime arguments.
///
/// Token order: `run`, container lifecycle flags, GPU flag, environment flags
/// in insertion order, mount flags in insertion order, user mapping, image,
/// command.
pub fn build(profile: &LaunchProfile) -> Invocation {
    let mut args = vec!["run".to_string()];
    let mut push = |flag: &str, value: Option<String>| {
        args.push(flag.to_string());
        if let Some(value) = value {
            args.push(value);
        }
    };

    push("--name", Some(profile.name().to_string()));
    if profile.remove_on_exit() {
        push("--rm", None);
    }
    if profile.detach() {
        push("--detach", None);
    }
    if profile.interactive() {
        push("--interactive", None);
        push("--tty", None);
    }
    if let Some(entrypoint) = profile.entrypoint() {
        push("--entrypoint", Some(entrypoint.to_string()));
    }
    if let Some(network) = profile.network() {
        push("--network", Some(network.as_str().to_string()));
    }
    if let Some(shm) = profile.shm_size() {
        push("--shm-size", Some(shm.to_string()));
    }

    match profile.gpu() {
        GpuRequest::None => {}
        GpuRequest::All => push("--gpus", Some("all".to_string())),
        // The device list needs literal quotes or the runtime splits on the comma
        GpuRequest::Devices(ids) => push("--gpus", Some(format!("\"device={}\"", ids.join(",")))),
    }

    for var in profile.env() {
        push("-e", Some(format!("{}={}", var.key, var.value)));
    }

    for mount in profile.mounts() {
        push(
            "-v",
            Some(format!(
                "{}:{}:{}",
                mount.host_path.display(),
                mount.container_path,
                mount.mode.as_str()
            )),
        );
    }

    if let Some(user) = profile.user() {
        push("-u", Some(user.to_string()));
    }

    args.push(profile.image().to_string());
    args.extend(profile.command().iter().cloned());

    Invocation {
        args,
        detach: profile.detach(),
    }
}

fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,@%+".contains(c));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}
