use std::fs::File;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ssh2::Session;
use uuid::Uuid;

use crate::media::{MediaError, MediaKind, MediaStorage};
use crate::utils::file_utils::StagedFile;

#[derive(Debug, Clone)]
pub struct SftpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub private_key: String,
    pub passphrase: Option<String>,
    /// Directory on the remote host that holds the `audio/` and `images/` folders.
    pub remote_root: String,
    /// Public URL prefix under which `remote_root` is served.
    pub public_base_url: String,
}

impl SftpConfig {
    /// Keys passed through env vars usually carry escaped newlines.
    pub fn normalized_private_key(&self) -> String {
        self.private_key.replace("\\n", "\n")
    }
}

pub struct SftpMediaStorage {
    config: SftpConfig,
}

impl SftpMediaStorage {
    pub fn new(config: SftpConfig) -> Self {
        Self { config }
    }
}

fn remote_name(local: &StagedFile) -> String {
    match local.extension() {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

fn public_url(base_url: &str, folder: &str, name: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), folder, name)
}

fn upload_file_sftp(cfg: &SftpConfig, local_path: &Path, folder: &str, name: &str) -> Result<(), MediaError> {
    // Connect to VM
    let tcp = TcpStream::connect((cfg.host.as_str(), cfg.port))?;
    let mut session = Session::new()?;
    session.set_tcp_stream(tcp);
    session.handshake()?;

    session.userauth_pubkey_memory(
        &cfg.username,
        None,
        &cfg.normalized_private_key(),
        cfg.passphrase.as_deref(),
    )?;

    let sftp = session.sftp()?;
    let remote_dir = PathBuf::from(&cfg.remote_root).join(folder);
    // Fails when the folder already exists.
    let _ = sftp.mkdir(&remote_dir, 0o755);

    let mut local_file = File::open(local_path)?;
    let mut remote_file = sftp.create(&remote_dir.join(name))?;
    std::io::copy(&mut local_file, &mut remote_file)?;

    Ok(())
}

#[async_trait]
impl MediaStorage for SftpMediaStorage {
    async fn upload(&self, kind: MediaKind, file: &StagedFile) -> Result<String, MediaError> {
        let cfg = self.config.clone();
        let local_path = file.path().to_path_buf();
        let name = remote_name(file);
        let folder = kind.folder();

        let remote = name.clone();
        tokio::task::spawn_blocking(move || upload_file_sftp(&cfg, &local_path, folder, &remote))
            .await
            .map_err(|e| MediaError::Task(e.to_string()))??;

        tracing::info!(folder, name = %name, bytes = file.size, "media uploaded");
        Ok(public_url(&self.config.public_base_url, folder, &name))
    }
}
