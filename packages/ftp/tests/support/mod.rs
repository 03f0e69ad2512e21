//! A scripted in-process FTP server for exercising the accessor.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Default)]
pub struct ServerState {
    pub files: BTreeMap<String, Vec<u8>>,
    pub commands: Vec<String>,
    pub logins: Vec<(String, String)>,
    pub connections: usize,
}

pub struct FakeFtpServer {
    addr: SocketAddr,
    state: Arc<Mutex<ServerState>>,
}

impl FakeFtpServer {
    /// Serve `files`, keyed by path relative to the server root.
    pub fn start(files: &[(&str, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState {
            files: files
                .iter()
                .map(|(path, data)| (path.to_string(), data.as_bytes().to_vec()))
                .collect(),
            ..Default::default()
        }));

        let shared = state.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let state = shared.clone();
                thread::spawn(move || {
                    let _ = serve(stream, state);
                });
            }
        });

        Self { addr, state }
    }

    /// An `ftp://` address for this server with optional `user[:pw]@`.
    pub fn address(&self, userinfo: &str, directory: &str) -> String {
        format!("ftp://{}127.0.0.1:{}/{}", userinfo, self.addr.port(), directory)
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn logins(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().logins.clone()
    }

    pub fn connections(&self) -> usize {
        self.state.lock().unwrap().connections
    }
}

fn reply(out: &mut TcpStream, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\r\n")
}

fn join(cwd: &str, name: &str) -> String {
    if let Some(absolute) = name.strip_prefix('/') {
        return absolute.trim_end_matches('/').to_string();
    }
    let name = name.trim_end_matches('/');
    if cwd.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        cwd.to_string()
    } else {
        format!("{}/{}", cwd, name)
    }
}

fn accept(pasv: &mut Option<TcpListener>) -> io::Result<TcpStream> {
    let listener = pasv
        .take()
        .ok_or_else(|| io::Error::other("no PASV before transfer"))?;
    Ok(listener.accept()?.0)
}

fn serve(stream: TcpStream, state: Arc<Mutex<ServerState>>) -> io::Result<()> {
    state.lock().unwrap().connections += 1;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut out = stream;
    let mut cwd = String::new();
    let mut user = String::new();
    let mut pasv: Option<TcpListener> = None;

    reply(&mut out, "220 fake ftp ready")?;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end().to_string();
        state.lock().unwrap().commands.push(line.clone());
        let (verb, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));

        match verb.to_ascii_uppercase().as_str() {
            "USER" => {
                user = arg.to_string();
                reply(&mut out, "331 Password required")?;
            }
            "PASS" => {
                state
                    .lock()
                    .unwrap()
                    .logins
                    .push((user.clone(), arg.to_string()));
                reply(&mut out, "230 Logged in")?;
            }
            "CWD" => {
                let dir = join(&cwd, arg);
                let prefix = format!("{}/", dir);
                let exists = state
                    .lock()
                    .unwrap()
                    .files
                    .keys()
                    .any(|path| path.starts_with(&prefix));
                if exists {
                    cwd = dir;
                    reply(&mut out, "250 Directory changed")?;
                } else {
                    reply(&mut out, "550 No such directory")?;
                }
            }
            "TYPE" => reply(&mut out, "200 Type set")?,
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0")?;
                let port = listener.local_addr()?.port();
                pasv = Some(listener);
                // Advertise a bogus host; clients must use the control peer.
                reply(
                    &mut out,
                    &format!(
                        "227 Entering Passive Mode (10,255,255,1,{},{})",
                        port >> 8,
                        port & 0xff
                    ),
                )?;
            }
            "RETR" => {
                let path = join(&cwd, arg);
                let data = state.lock().unwrap().files.get(&path).cloned();
                match data {
                    Some(data) => {
                        let mut conn = accept(&mut pasv)?;
                        reply(&mut out, "150 Opening BINARY mode data connection")?;
                        conn.write_all(&data)?;
                        drop(conn);
                        reply(&mut out, "226 Transfer complete")?;
                    }
                    None => {
                        pasv = None;
                        reply(&mut out, "550 No such file")?;
                    }
                }
            }
            "NLST" => {
                let dir = join(&cwd, arg);
                let prefix = if dir.is_empty() {
                    String::new()
                } else {
                    format!("{}/", dir)
                };
                let names: Vec<String> = state
                    .lock()
                    .unwrap()
                    .files
                    .keys()
                    .filter_map(|path| path.strip_prefix(&prefix))
                    .filter(|rest| !rest.contains('/'))
                    .map(|name| {
                        if arg.is_empty() {
                            name.to_string()
                        } else {
                            format!("{}/{}", arg.trim_end_matches('/'), name)
                        }
                    })
                    .collect();

                if names.is_empty() {
                    pasv = None;
                    reply(&mut out, "550 No files found")?;
                } else {
                    let mut conn = accept(&mut pasv)?;
                    reply(&mut out, "150 Here comes the listing")?;
                    for name in names {
                        conn.write_all(format!("{}\r\n", name).as_bytes())?;
                    }
                    drop(conn);
                    reply(&mut out, "226 Directory send OK")?;
                }
            }
            "STOR" => {
                let path = join(&cwd, arg);
                let mut conn = accept(&mut pasv)?;
                reply(&mut out, "150 Ok to send data")?;
                let mut data = Vec::new();
                conn.read_to_end(&mut data)?;
                state.lock().unwrap().files.insert(path, data);
                reply(&mut out, "226 Transfer complete")?;
            }
            "QUIT" => {
                reply(&mut out, "221 Goodbye")?;
                return Ok(());
            }
            _ => reply(&mut out, "502 Command not implemented")?,
        }
    }
}
