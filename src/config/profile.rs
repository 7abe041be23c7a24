use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::host::HostContext;
use crate::error::ProfileError;

/// Where the X authority file lands when a profile does not say otherwise
pub const DEFAULT_XAUTHORITY_TARGET: &str = "/root/.Xauthority";

/// Host X11 socket directory bound into display-forwarding containers
pub const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";

fn container_name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("NAME_RE regex must compile")
    })
}

fn image_regex() -> &'static Regex {
    static IMAGE_RE: OnceLock<Regex> = OnceLock::new();
    IMAGE_RE.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9][A-Za-z0-9.-]*(?::[0-9]+)?/[a-z0-9]+(?:[._-][a-z0-9]+)*(?:/[a-z0-9]+(?:[._-][a-z0-9]+)*)*:[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$",
        )
        .expect("IMAGE_RE regex must compile")
    })
}

fn shm_size_regex() -> &'static Regex {
    static SHM_RE: OnceLock<Regex> = OnceLock::new();
    SHM_RE.get_or_init(|| Regex::new(r"^[0-9]+[bkmgBKMG]?$").expect("SHM_RE regex must compile"))
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ---------------------------------------------------------------------------
// Persisted form
// ---------------------------------------------------------------------------

/// Launch profile as written in a YAML profile file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Container name (required)
    pub name: String,

    /// Image reference in `registry/repo:tag` form (required)
    pub image: String,

    /// Free-form description shown by `simlaunch list`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Entrypoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,

    /// Command passed after the image reference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    /// Network mode: host, bridge, none, or a named network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// GPU request: all, none, or a list of device indices/UUIDs
    #[serde(default)]
    pub gpu: GpuRequest,

    /// Shared memory size (e.g., 2g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shm_size: Option<String>,

    /// Identity override: "uid:gid" or "host"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Keep stdin open and allocate a TTY
    #[serde(default, skip_serializing_if = "is_false")]
    pub interactive: bool,

    /// Run in the background
    #[serde(default, skip_serializing_if = "is_false")]
    pub detach: bool,

    /// Remove the container when it exits
    #[serde(default = "default_true")]
    pub remove_on_exit: bool,

    /// Default for mounts that do not set `create` themselves
    #[serde(default, skip_serializing_if = "is_false")]
    pub create_host_paths: bool,

    /// Forward the host X11 display into the container
    #[serde(default, skip_serializing_if = "is_false")]
    pub display: bool,

    /// Container path for the forwarded X authority file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xauthority_target: Option<String>,

    /// Environment variables, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    /// Bind mounts, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<MountEntry>,
}

/// Bind mount as written in a profile file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountEntry {
    /// Host path (`~/` and relative paths are resolved on load)
    pub host: String,

    /// Container path (must be absolute)
    pub container: String,

    #[serde(default)]
    pub mode: AccessMode,

    /// Allow creating the host directory when it is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<bool>,
}

impl ProfileDocument {
    /// Set an environment variable, replacing an existing entry in place
    pub fn override_env(&mut self, key: &str, value: &str) {
        set_env(&mut self.env, key, value);
    }

    /// Create a template profile for `simlaunch init`
    pub fn template(name: &str) -> Self {
        ProfileDocument {
            name: name.to_string(),
            image: "nvcr.io/nvidia/isaac-sim:5.1.0".to_string(),
            description: Some("A GPU-accelerated simulation container".to_string()),
            entrypoint: Some("bash".to_string()),
            command: Vec::new(),
            network: Some("host".to_string()),
            gpu: GpuRequest::All,
            shm_size: None,
            user: Some("host".to_string()),
            interactive: true,
            detach: false,
            remove_on_exit: true,
            create_host_paths: true,
            display: false,
            xauthority_target: None,
            env: vec![
                EnvVar::new("ACCEPT_EULA", "Y"),
                EnvVar::new("PRIVACY_CONSENT", "Y"),
            ],
            mounts: vec![MountEntry {
                host: format!("~/docker/{}/cache", name),
                container: "/root/.cache".to_string(),
                mode: AccessMode::ReadWrite,
                create: None,
            }],
        }
    }
}

fn set_env(env: &mut Vec<EnvVar>, key: &str, value: &str) {
    match env.iter_mut().find(|var| var.key == key) {
        Some(var) => var.value = value.to_string(),
        None => env.push(EnvVar::new(key, value)),
    }
}

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// Environment variable entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    pub fn new(key: &str, value: &str) -> Self {
        EnvVar {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Mount access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    #[serde(rename = "ro")]
    ReadOnly,
    #[default]
    #[serde(rename = "rw")]
    ReadWrite,
}

impl AccessMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "ro",
            AccessMode::ReadWrite => "rw",
        }
    }
}

/// Resolved bind mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub host_path: PathBuf,
    pub container_path: String,
    pub mode: AccessMode,
    /// Whether validation may create a missing host directory
    pub create: bool,
}

/// GPU passthrough request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "GpuField", into = "GpuField")]
pub enum GpuRequest {
    #[default]
    None,
    All,
    Devices(Vec<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GpuField {
    Keyword(String),
    Devices(Vec<DeviceId>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DeviceId {
    Index(u32),
    Name(String),
}

impl TryFrom<GpuField> for GpuRequest {
    type Error = String;

    fn try_from(field: GpuField) -> Result<Self, Self::Error> {
        match field {
            GpuField::Keyword(keyword) => match keyword.as_str() {
                "all" => Ok(GpuRequest::All),
                "none" => Ok(GpuRequest::None),
                other => Err(format!(
                    "invalid gpu request '{}', expected 'all', 'none' or a device list",
                    other
                )),
            },
            GpuField::Devices(ids) if ids.is_empty() => {
                Err("gpu device list is empty, use 'none' instead".to_string())
            }
            GpuField::Devices(ids) => Ok(GpuRequest::Devices(
                ids.into_iter()
                    .map(|id| match id {
                        DeviceId::Index(index) => index.to_string(),
                        DeviceId::Name(name) => name,
                    })
                    .collect(),
            )),
        }
    }
}

impl From<GpuRequest> for GpuField {
    fn from(request: GpuRequest) -> Self {
        match request {
            GpuRequest::None => GpuField::Keyword("none".to_string()),
            GpuRequest::All => GpuField::Keyword("all".to_string()),
            GpuRequest::Devices(ids) => {
                GpuField::Devices(ids.into_iter().map(DeviceId::Name).collect())
            }
        }
    }
}

/// Container network mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkMode {
    Host,
    Bridge,
    None,
    Named(String),
}

impl NetworkMode {
    fn parse(raw: &str) -> Result<Self, ProfileError> {
        match raw {
            "host" => Ok(NetworkMode::Host),
            "bridge" => Ok(NetworkMode::Bridge),
            "none" => Ok(NetworkMode::None),
            name if container_name_regex().is_match(name) => Ok(NetworkMode::Named(name.to_string())),
            other => Err(ProfileError::invalid(
                "network",
                format!("'{}' is not a valid network name", other),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NetworkMode::Host => "host",
            NetworkMode::Bridge => "bridge",
            NetworkMode::None => "none",
            NetworkMode::Named(name) => name,
        }
    }
}

/// uid:gid identity override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMapping {
    pub uid: u32,
    pub gid: u32,
}

impl UserMapping {
    fn parse(raw: &str, host: &HostContext) -> Result<Self, ProfileError> {
        if raw == "host" {
            return Ok(UserMapping {
                uid: host.uid,
                gid: host.gid,
            });
        }
        let invalid = || {
            ProfileError::invalid(
                "user",
                format!("'{}' is not of the form uid:gid or 'host'", raw),
            )
        };
        let (uid, gid) = raw.split_once(':').ok_or_else(invalid)?;
        Ok(UserMapping {
            uid: uid.parse().map_err(|_| invalid())?,
            gid: gid.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for UserMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}

// ---------------------------------------------------------------------------
// Resolved profile
// ---------------------------------------------------------------------------

/// Fully resolved, immutable description of one container launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchProfile {
    name: String,
    image: String,
    description: Option<String>,
    entrypoint: Option<String>,
    command: Vec<String>,
    network: Option<NetworkMode>,
    gpu: GpuRequest,
    shm_size: Option<String>,
    user: Option<UserMapping>,
    interactive: bool,
    detach: bool,
    remove_on_exit: bool,
    env: Vec<EnvVar>,
    mounts: Vec<MountSpec>,
}

impl LaunchProfile {
    /// Resolve a profile document against the host it will launch on.
    ///
    /// Fails with `InvalidProfile` naming the offending field. Environment
    /// keys and mount collisions are left to the validator.
    pub fn from_document(doc: ProfileDocument, host: &HostContext) -> Result<Self, ProfileError> {
        if doc.name.trim().is_empty() {
            return Err(ProfileError::invalid("name", "must not be empty"));
        }
        if !container_name_regex().is_match(&doc.name) {
            return Err(ProfileError::invalid(
                "name",
                format!("'{}' is not a valid container name", doc.name),
            ));
        }
        if doc.image.trim().is_empty() {
            return Err(ProfileError::invalid("image", "must not be empty"));
        }
        if !image_regex().is_match(&doc.image) {
            return Err(ProfileError::invalid(
                "image",
                format!("'{}' does not match registry/repo:tag", doc.image),
            ));
        }
        if let Some(entrypoint) = &doc.entrypoint {
            if entrypoint.trim().is_empty() {
                return Err(ProfileError::invalid("entrypoint", "must not be empty when set"));
            }
        }
        if let Some(shm) = &doc.shm_size {
            if !shm_size_regex().is_match(shm) {
                return Err(ProfileError::invalid(
                    "shm_size",
                    format!("'{}' is not a size such as 512m or 2g", shm),
                ));
            }
        }

        let network = doc.network.as_deref().map(NetworkMode::parse).transpose()?;
        let user = doc
            .user
            .as_deref()
            .map(|raw| UserMapping::parse(raw, host))
            .transpose()?;

        let mut mounts = Vec::with_capacity(doc.mounts.len());
        for (index, entry) in doc.mounts.iter().enumerate() {
            mounts.push(resolve_mount(index, entry, doc.create_host_paths, host)?);
        }

        let mut env = doc.env;
        if doc.display {
            forward_display(host, doc.xauthority_target.as_deref(), &mut env, &mut mounts)?;
        }

        Ok(LaunchProfile {
            name: doc.name,
            image: doc.image,
            description: doc.description,
            entrypoint: doc.entrypoint,
            command: doc.command,
            network,
            gpu: doc.gpu,
            shm_size: doc.shm_size,
            user,
            interactive: doc.interactive,
            detach: doc.detach,
            remove_on_exit: doc.remove_on_exit,
            env,
            mounts,
        })
    }

    /// Persisted form with every host-derived value already resolved
    pub fn to_document(&self) -> ProfileDocument {
        ProfileDocument {
            name: self.name.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
            entrypoint: self.entrypoint.clone(),
            command: self.command.clone(),
            network: self.network.as_ref().map(|n| n.as_str().to_string()),
            gpu: self.gpu.clone(),
            shm_size: self.shm_size.clone(),
            user: self.user.map(|u| u.to_string()),
            interactive: self.interactive,
            detach: self.detach,
            remove_on_exit: self.remove_on_exit,
            create_host_paths: false,
            display: false,
            xauthority_target: None,
            env: self.env.clone(),
            mounts: self
                .mounts
                .iter()
                .map(|m| MountEntry {
                    host: m.host_path.display().to_string(),
                    container: m.container_path.clone(),
                    mode: m.mode,
                    create: Some(m.create),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn entrypoint(&self) -> Option<&str> {
        self.entrypoint.as_deref()
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn network(&self) -> Option<&NetworkMode> {
        self.network.as_ref()
    }

    pub fn gpu(&self) -> &GpuRequest {
        &self.gpu
    }

    pub fn shm_size(&self) -> Option<&str> {
        self.shm_size.as_deref()
    }

    pub fn user(&self) -> Option<UserMapping> {
        self.user
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn detach(&self) -> bool {
        self.detach
    }

    pub fn remove_on_exit(&self) -> bool {
        self.remove_on_exit
    }

    pub fn env(&self) -> &[EnvVar] {
        &self.env
    }

    pub fn mounts(&self) -> &[MountSpec] {
        &self.mounts
    }
}

fn resolve_mount(
    index: usize,
    entry: &MountEntry,
    create_default: bool,
    host: &HostContext,
) -> Result<MountSpec, ProfileError> {
    let field = format!("mounts[{}]", index);
    if entry.host.trim().is_empty() {
        return Err(ProfileError::invalid(field, "host path must not be empty"));
    }
    if !entry.container.starts_with('/') {
        return Err(ProfileError::invalid(
            field,
            format!("container path '{}' must be absolute", entry.container),
        ));
    }
    if entry.host.contains(':') || entry.container.contains(':') {
        return Err(ProfileError::invalid(field, "paths must not contain ':'"));
    }

    Ok(MountSpec {
        host_path: host.resolve_path(&entry.host),
        container_path: entry.container.clone(),
        mode: entry.mode,
        create: entry.create.unwrap_or(create_default),
    })
}

fn forward_display(
    host: &HostContext,
    xauthority_target: Option<&str>,
    env: &mut Vec<EnvVar>,
    mounts: &mut Vec<MountSpec>,
) -> Result<(), ProfileError> {
    let display = host.display.as_deref().ok_or_else(|| {
        ProfileError::invalid(
            "display",
            "display forwarding requested but DISPLAY is not set on the host",
        )
    })?;
    set_env(env, "DISPLAY", display);
    mounts.push(MountSpec {
        host_path: PathBuf::from(X11_SOCKET_DIR),
        container_path: X11_SOCKET_DIR.to_string(),
        mode: AccessMode::ReadWrite,
        create: false,
    });

    if let Some(xauthority) = &host.xauthority {
        let target = xauthority_target.unwrap_or(DEFAULT_XAUTHORITY_TARGET);
        if !Path::new(target).is_absolute() || target.contains(':') {
            return Err(ProfileError::invalid(
                "xauthority_target",
                format!("'{}' must be an absolute path without ':'", target),
            ));
        }
        set_env(env, "XAUTHORITY", target);
        mounts.push(MountSpec {
            host_path: xauthority.clone(),
            container_path: target.to_string(),
            mode: AccessMode::ReadOnly,
            create: false,
        });
    } else {
        tracing::warn!("No X authority file found on the host; forwarding DISPLAY only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::host::fixture;

    fn isaac_doc() -> ProfileDocument {
        serde_yaml::from_str(
            r#"
name: isaac-sim
image: nvcr.io/nvidia/isaac-sim:5.1.0
gpu: all
env:
  - key: ACCEPT_EULA
    value: "Y"
mounts:
  - host: ~/docker/isaac-sim/cache/main
    container: /isaac-sim/.cache
    mode: rw
"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_minimal_document_with_defaults() {
        let doc = isaac_doc();
        assert_eq!(doc.gpu, GpuRequest::All);
        assert!(doc.remove_on_exit);
        assert!(!doc.interactive);
        assert_eq!(doc.mounts[0].mode, AccessMode::ReadWrite);
        assert_eq!(doc.mounts[0].create, None);
    }

    #[test]
    fn resolves_home_relative_mounts() {
        let host = fixture(Path::new("/h"));
        let profile = LaunchProfile::from_document(isaac_doc(), &host).unwrap();
        assert_eq!(
            profile.mounts()[0].host_path,
            PathBuf::from("/h/home/docker/isaac-sim/cache/main")
        );
        assert!(!profile.mounts()[0].create);
    }

    #[test]
    fn rejects_empty_or_malformed_name_and_image() {
        let host = fixture(Path::new("/h"));
        let cases = [
            ("", "nvcr.io/nvidia/isaac-sim:5.1.0", "name"),
            ("bad name", "nvcr.io/nvidia/isaac-sim:5.1.0", "name"),
            ("isaac-sim", "", "image"),
            ("isaac-sim", "isaac-sim", "image"),
            ("isaac-sim", "nvcr.io/nvidia/isaac-sim", "image"),
            ("isaac-sim", "isaac-sim:5.1.0", "image"),
        ];
        for (name, image, field) in cases {
            let mut doc = isaac_doc();
            doc.name = name.to_string();
            doc.image = image.to_string();
            match LaunchProfile::from_document(doc, &host) {
                Err(ProfileError::InvalidProfile { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected InvalidProfile for {:?}/{:?}, got {:?}", name, image, other),
            }
        }
    }

    #[test]
    fn accepts_registry_with_port_and_nested_repo() {
        let host = fixture(Path::new("/h"));
        let mut doc = isaac_doc();
        doc.image = "registry.local:5000/sim/team/isaac-sim:5.1.0-rc1".to_string();
        assert!(LaunchProfile::from_document(doc, &host).is_ok());
    }

    #[test]
    fn rejects_relative_container_path() {
        let host = fixture(Path::new("/h"));
        let mut doc = isaac_doc();
        doc.mounts[0].container = "isaac-sim/.cache".to_string();
        let err = LaunchProfile::from_document(doc, &host).unwrap_err();
        assert_eq!(
            err,
            ProfileError::invalid("mounts[0]", "container path 'isaac-sim/.cache' must be absolute")
        );
    }

    #[test]
    fn rejects_malformed_user_and_shm_size() {
        let host = fixture(Path::new("/h"));
        let mut doc = isaac_doc();
        doc.user = Some("1234".to_string());
        assert!(matches!(
            LaunchProfile::from_document(doc, &host),
            Err(ProfileError::InvalidProfile { field, .. }) if field == "user"
        ));

        let mut doc = isaac_doc();
        doc.shm_size = Some("lots".to_string());
        assert!(matches!(
            LaunchProfile::from_document(doc, &host),
            Err(ProfileError::InvalidProfile { field, .. }) if field == "shm_size"
        ));
    }

    #[test]
    fn host_user_resolves_from_context() {
        let host = fixture(Path::new("/h"));
        let mut doc = isaac_doc();
        doc.user = Some("host".to_string());
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        assert_eq!(profile.user(), Some(UserMapping { uid: 1000, gid: 1000 }));
    }

    #[test]
    fn display_forwarding_requires_display() {
        let host = fixture(Path::new("/h"));
        let mut doc = isaac_doc();
        doc.display = true;
        assert!(matches!(
            LaunchProfile::from_document(doc, &host),
            Err(ProfileError::InvalidProfile { field, .. }) if field == "display"
        ));
    }

    #[test]
    fn display_forwarding_appends_env_and_mounts() {
        let mut host = fixture(Path::new("/h"));
        host.display = Some(":1".to_string());
        host.xauthority = Some(PathBuf::from("/h/home/.Xauthority"));
        let mut doc = isaac_doc();
        doc.display = true;
        doc.xauthority_target = Some("/isaac-sim/.Xauthority".to_string());

        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        let keys: Vec<_> = profile.env().iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, ["ACCEPT_EULA", "DISPLAY", "XAUTHORITY"]);
        assert_eq!(profile.env()[1].value, ":1");
        let targets: Vec<_> = profile.mounts().iter().map(|m| m.container_path.as_str()).collect();
        assert_eq!(targets, ["/isaac-sim/.cache", X11_SOCKET_DIR, "/isaac-sim/.Xauthority"]);
        assert_eq!(profile.mounts()[2].mode, AccessMode::ReadOnly);
    }

    #[test]
    fn gpu_device_list_accepts_indices_and_uuids() {
        let doc: ProfileDocument = serde_yaml::from_str(
            "name: a\nimage: nvcr.io/nvidia/isaac-sim:5.1.0\ngpu: [0, GPU-3f2a]\n",
        )
        .unwrap();
        assert_eq!(
            doc.gpu,
            GpuRequest::Devices(vec!["0".to_string(), "GPU-3f2a".to_string()])
        );

        let bad: Result<ProfileDocument, _> =
            serde_yaml::from_str("name: a\nimage: nvcr.io/nvidia/isaac-sim:5.1.0\ngpu: some\n");
        assert!(bad.is_err());
    }

    #[test]
    fn yaml_round_trip_preserves_every_field() {
        let mut host = fixture(Path::new("/h"));
        host.display = Some(":0".to_string());
        host.xauthority = Some(PathBuf::from("/h/home/.Xauthority"));

        let mut doc = isaac_doc();
        doc.description = Some("round trip".to_string());
        doc.entrypoint = Some("bash".to_string());
        doc.command = vec!["-c".to_string(), "./runheadless.sh".to_string()];
        doc.network = Some("host".to_string());
        doc.gpu = GpuRequest::Devices(vec!["0".to_string(), "1".to_string()]);
        doc.shm_size = Some("2g".to_string());
        doc.user = Some("host".to_string());
        doc.interactive = true;
        doc.remove_on_exit = false;
        doc.create_host_paths = true;
        doc.display = true;
        doc.env.push(EnvVar::new("EMPTY", ""));
        doc.mounts.push(MountEntry {
            host: "./sdg".to_string(),
            container: "/isaac-sim/sdg".to_string(),
            mode: AccessMode::ReadOnly,
            create: Some(false),
        });

        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        let yaml = serde_yaml::to_string(&profile.to_document()).unwrap();
        let reloaded: ProfileDocument = serde_yaml::from_str(&yaml).unwrap();
        let reloaded = LaunchProfile::from_document(reloaded, &host).unwrap();
        assert_eq!(reloaded, profile);
    }

    #[test]
    fn display_forwarding_replaces_declared_display_vars() {
        let mut host = fixture(Path::new("/h"));
        host.display = Some(":1".to_string());
        host.xauthority = Some(PathBuf::from("/h/home/.Xauthority"));
        let mut doc = isaac_doc();
        doc.env.push(EnvVar::new("DISPLAY", ":9"));
        doc.env.push(EnvVar::new("XAUTHORITY", "/stale"));
        doc.display = true;

        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        assert_eq!(
            profile.env(),
            [
                EnvVar::new("ACCEPT_EULA", "Y"),
                EnvVar::new("DISPLAY", ":1"),
                EnvVar::new("XAUTHORITY", DEFAULT_XAUTHORITY_TARGET),
            ]
        );
    }

    #[test]
    fn override_env_replaces_in_place() {
        let mut doc = isaac_doc();
        doc.override_env("FOO", "1");
        doc.override_env("ACCEPT_EULA", "N");
        assert_eq!(doc.env, vec![EnvVar::new("ACCEPT_EULA", "N"), EnvVar::new("FOO", "1")]);
    }
}
