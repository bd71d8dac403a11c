use tokio::io::{
    self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use roomlink_core::error::{Result, RoomlinkError};

use super::wire::{escape, parse_items, parse_status, Record};
use crate::config::TeamSpeakSection;

fn io_err(e: std::io::Error) -> RoomlinkError {
    RoomlinkError::Internal(format!("serverquery io failed: {e}"))
}

/// One ServerQuery connection.
pub struct QueryConn<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    // partial line kept across a cancelled read
    pending: Vec<u8>,
}

impl QueryConn<TcpStream> {
    /// Connect, check the banner, log in and select the virtual server.
    pub async fn open(cfg: &TeamSpeakSection) -> Result<Self> {
        let stream = TcpStream::connect(&cfg.addr)
            .await
            .map_err(|e| RoomlinkError::Internal(format!("connect {} failed: {e}", cfg.addr)))?;
        let mut conn = Self::handshake(stream).await?;
        conn.login(&cfg.username, &cfg.password).await?;
        conn.use_server(cfg.server_id).await?;
        tracing::debug!(addr = %cfg.addr, server_id = cfg.server_id, "serverquery session ready");
        Ok(conn)
    }
}

impl<S: AsyncRead + AsyncWrite> QueryConn<S> {
    pub async fn handshake(stream: S) -> Result<Self> {
        let (r, w) = io::split(stream);
        let mut conn = Self {
            reader: BufReader::new(r),
            writer: w,
            pending: Vec::new(),
        };
        let banner = conn.read_line().await?;
        if banner != "TS3" {
            return Err(RoomlinkError::Internal(format!(
                "unexpected serverquery banner {banner:?}"
            )));
        }
        // welcome text
        conn.read_line().await?;
        Ok(conn)
    }

    /// Next non-empty line without its `\n\r` terminator.
    pub async fn read_line(&mut self) -> Result<String> {
        loop {
            let n = self
                .reader
                .read_until(b'\n', &mut self.pending)
                .await
                .map_err(io_err)?;
            if n == 0 {
                return Err(RoomlinkError::ConnectionClosed);
            }
            if self.pending.last() != Some(&b'\n') {
                continue;
            }
            let line = String::from_utf8_lossy(&self.pending)
                .trim_matches(['\r', '\n'])
                .to_string();
            self.pending.clear();
            if !line.is_empty() {
                return Ok(line);
            }
        }
    }

    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .map_err(io_err)?;
        self.writer.flush().await.map_err(io_err)
    }

    /// Run a command and collect its reply items.
    ///
    /// Notifications arriving in between are skipped.
    pub async fn exec(&mut self, cmd: &str) -> Result<Vec<Record>> {
        self.send_line(cmd).await?;
        let mut items = Vec::new();
        loop {
            let line = self.read_line().await?;
            if let Some(status) = parse_status(&line) {
                if status.id == 0 {
                    return Ok(items);
                }
                let verb = cmd.split(' ').next().unwrap_or(cmd);
                return Err(RoomlinkError::Internal(format!(
                    "serverquery {verb} failed: id={} msg={}",
                    status.id, status.msg
                )));
            }
            if line.starts_with("notify") {
                continue;
            }
            items.extend(parse_items(&line));
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.exec(&format!("login {} {}", escape(username), escape(password)))
            .await
            .map(|_| ())
    }

    pub async fn use_server(&mut self, server_id: u32) -> Result<()> {
        self.exec(&format!("use {server_id}")).await.map(|_| ())
    }
}

/// Shared, lazily opened query session for request/reply commands.
///
/// Any failure drops the connection; the next command reopens it.
pub struct QueryClient {
    cfg: TeamSpeakSection,
    conn: Mutex<Option<QueryConn<TcpStream>>>,
}

impl QueryClient {
    pub fn new(cfg: TeamSpeakSection) -> Self {
        Self {
            cfg,
            conn: Mutex::new(None),
        }
    }

    pub async fn exec(&self, cmd: &str) -> Result<Vec<Record>> {
        let mut guard = self.conn.lock().await;
        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => QueryConn::open(&self.cfg).await?,
        };
        let items = conn.exec(cmd).await?;
        *guard = Some(conn);
        Ok(items)
    }
}
