use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use ssh2::Session;
use tokio::sync::Mutex;
use tracing::debug;

use crate::data_aquisition::core::{SessionError, SessionTransport};

// Wide terminal so CLI rows are not wrapped mid-record.
const TERMINAL_COLUMNS: u32 = 160;
const TERMINAL_LINES: u32 = 2048;

/// SSH-backed [`SessionTransport`]: password authentication and an
/// interactive shell channel on a PTY. The blocking ssh2 calls run on the
/// blocking thread pool.
pub struct SshTransport {
    username: String,
    host: String,
    password: Option<String>,
    port: u16,
    shell: Option<Arc<Mutex<Shell>>>,
}

struct Shell {
    session: Session,
    channel: ssh2::Channel,
}

impl SshTransport {
    pub fn new_with_password(
        username: String,
        host: String,
        password: String,
        port: u16,
    ) -> Result<Self, SessionError> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(SessionError::InvalidConfig(
                "user name can not be empty".to_string(),
            ));
        }
        Ok(SshTransport {
            username,
            host,
            password: Some(password),
            port,
            shell: None,
        })
    }

    fn connect_sync_inner(
        username: String,
        host: String,
        password: Option<String>,
        port: u16,
    ) -> Result<Shell, SessionError> {
        let failure = |reason: String| SessionError::ConnectionFailure {
            host: host.clone(),
            reason,
        };
        let tcp = TcpStream::connect(format!("{}:{}", host, port))
            .map_err(|e| failure(e.to_string()))?;
        let mut session = Session::new().map_err(|e| failure(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| failure(e.to_string()))?;
        if let Some(password) = password {
            session
                .userauth_password(&username, &password)
                .map_err(|e| failure(format!("authentication failed: {e}")))?;
        }
        if !session.authenticated() {
            return Err(failure("authentication failed".to_string()));
        }
        let mut channel = session
            .channel_session()
            .map_err(|e| failure(e.to_string()))?;
        channel
            .request_pty("vt100", None, Some((TERMINAL_COLUMNS, TERMINAL_LINES, 0, 0)))
            .map_err(|e| failure(e.to_string()))?;
        channel.shell().map_err(|e| failure(e.to_string()))?;
        debug!(host, "ssh shell channel established");
        Ok(Shell { session, channel })
    }

    fn shell(&self) -> Result<Arc<Mutex<Shell>>, SessionError> {
        self.shell.clone().ok_or(SessionError::NotConnected)
    }

    fn write_sync(shell: &mut Shell, bytes: &[u8]) -> Result<(), SessionError> {
        shell
            .channel
            .write_all(bytes)
            .and_then(|_| shell.channel.flush())
            .map_err(|e| SessionError::Transport(e.to_string()))
    }

    fn read_until_sync(
        shell: &mut Shell,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<String, SessionError> {
        let deadline = Instant::now() + timeout;
        let mut accumulated = String::new();
        let mut buf = [0u8; 4096];
        loop {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(remaining) => remaining,
                None => return Err(SessionError::Timeout(timeout)),
            };
            shell
                .session
                .set_timeout((remaining.as_millis().max(1)) as u32);
            match shell.channel.read(&mut buf) {
                Ok(0) => {
                    return Err(SessionError::Transport("channel closed".to_string()));
                }
                Ok(n) => {
                    accumulated.push_str(&String::from_utf8_lossy(&buf[..n]));
                    if pattern.is_match(&accumulated) {
                        return Ok(accumulated);
                    }
                }
                Err(e) => return Err(SshTransport::classify_read_error(e, timeout)),
            }
        }
    }

    // ssh2 surfaces LIBSSH2_ERROR_TIMEOUT as ErrorKind::TimedOut, so the
    // error kind decides the classification, not a second look at the clock.
    fn classify_read_error(error: std::io::Error, timeout: Duration) -> SessionError {
        if error.kind() == std::io::ErrorKind::TimedOut {
            SessionError::Timeout(timeout)
        } else {
            SessionError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl SessionTransport for SshTransport {
    fn host(&self) -> &str {
        &self.host
    }

    async fn connect(&mut self) -> Result<(), SessionError> {
        if self.shell.is_some() {
            return Ok(());
        }
        let username = self.username.clone();
        let host = self.host.clone();
        let password = self.password.clone();
        let port = self.port;
        let shell = tokio::task::spawn_blocking(move || {
            SshTransport::connect_sync_inner(username, host, password, port)
        })
        .await
        .map_err(|e| SessionError::Async(e.to_string()))??;
        self.shell = Some(Arc::new(Mutex::new(shell)));
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let shell = self.shell()?;
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut shell = shell.blocking_lock();
            SshTransport::write_sync(&mut shell, &bytes)
        })
        .await
        .map_err(|e| SessionError::Async(e.to_string()))?
    }

    async fn read_until(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<String, SessionError> {
        let shell = self.shell()?;
        let pattern = pattern.clone();
        tokio::task::spawn_blocking(move || {
            let mut shell = shell.blocking_lock();
            SshTransport::read_until_sync(&mut shell, &pattern, timeout)
        })
        .await
        .map_err(|e| SessionError::Async(e.to_string()))?
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        let Some(shell) = self.shell.take() else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || {
            let shell = shell.blocking_lock();
            shell
                .session
                .disconnect(Some(ssh2::DisconnectCode::ByApplication), "", None)
                .map_err(|e| SessionError::Transport(e.to_string()))
        })
        .await
        .map_err(|e| SessionError::Async(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_username_rejected() {
        let result = SshTransport::new_with_password(
            "   ".to_string(),
            "localhost".to_string(),
            "password".to_string(),
            22,
        );
        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_read_error_classification() {
        use std::io::{Error, ErrorKind};

        let timeout = Duration::from_secs(2);
        assert!(matches!(
            SshTransport::classify_read_error(Error::new(ErrorKind::TimedOut, "timed out"), timeout),
            SessionError::Timeout(_)
        ));
        assert!(matches!(
            SshTransport::classify_read_error(Error::new(ErrorKind::BrokenPipe, "pipe"), timeout),
            SessionError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn test_io_before_connect_fails() {
        let mut transport = SshTransport::new_with_password(
            "admin".to_string(),
            "localhost".to_string(),
            "password".to_string(),
            22,
        )
        .unwrap();
        assert!(matches!(
            transport.write(b"\n").await,
            Err(SessionError::NotConnected)
        ));
    }
}
