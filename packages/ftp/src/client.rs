//! A minimal blocking FTP control connection.
//!
//! Only what the accessor needs: login, `CWD`, passive-mode `RETR`, `NLST`
//! and `STOR`. A `RETR` hands the data connection to the caller and leaves
//! its completion reply unread; the connection tracks that in
//! [`ReplyState`] and refuses to send anything until [`drain`] consumes it.
//!
//! [`drain`]: ControlConnection::drain

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream};

use mediafs_core::copy_stream;

use crate::error::FtpError;

pub const DEFAULT_PORT: u16 = 21;

const ANONYMOUS_USER: &str = "anonymous";
const ANONYMOUS_PASSWORD: &str = "anonymous@";

/// A complete (possibly multi-line) server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    pub text: String,
}

impl Reply {
    pub fn class(&self) -> u16 {
        self.code / 100
    }
}

/// Whether the server owes us a reply we have not read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    Idle,
    AwaitingReply,
}

pub struct ControlConnection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    peer: IpAddr,
    state: ReplyState,
}

impl ControlConnection {
    /// Connect and consume the server greeting.
    pub fn connect(host: &str, port: u16) -> Result<Self, FtpError> {
        log::debug!("Connecting to {}:{}", host, port);
        let writer = TcpStream::connect((host, port))?;
        let peer = writer.peer_addr()?.ip();
        let reader = BufReader::new(writer.try_clone()?);

        let mut conn = Self {
            reader,
            writer,
            peer,
            state: ReplyState::Idle,
        };

        let mut greeting = conn.read_reply()?;
        // 120: service ready in nnn minutes; the real greeting follows.
        while greeting.class() == 1 {
            greeting = conn.read_reply()?;
        }
        check("connect", &greeting, 2)?;
        Ok(conn)
    }

    pub fn state(&self) -> ReplyState {
        self.state
    }

    /// Read and discard a deferred transfer reply, if one is owed.
    pub fn drain(&mut self) -> Result<Option<Reply>, FtpError> {
        if self.state == ReplyState::Idle {
            return Ok(None);
        }
        let reply = self.read_reply()?;
        log::debug!("Drained deferred reply {} {}", reply.code, reply.text);
        self.state = ReplyState::Idle;
        Ok(Some(reply))
    }

    /// Log in, falling back to anonymous credentials.
    pub fn login(&mut self, username: Option<&str>, password: Option<&str>) -> Result<(), FtpError> {
        let username = username.unwrap_or(ANONYMOUS_USER);
        let password = match password {
            Some(password) => password,
            None if username == ANONYMOUS_USER => ANONYMOUS_PASSWORD,
            None => "",
        };

        let reply = self.command(&format!("USER {}", username))?;
        match reply.class() {
            2 => Ok(()),
            3 => {
                let reply = self.command_masked("PASS", password)?;
                check("PASS", &reply, 2)
            }
            _ => Err(unexpected("USER", reply)),
        }
    }

    pub fn cwd(&mut self, directory: &str) -> Result<(), FtpError> {
        self.expect(&format!("CWD {}", directory), 2)?;
        Ok(())
    }

    /// Start a binary download of `path` and return its data connection.
    ///
    /// The completion reply is left pending until [`drain`](Self::drain).
    pub fn retr(&mut self, path: &str) -> Result<TcpStream, FtpError> {
        self.expect("TYPE I", 2)?;
        let data = self.open_data(&format!("RETR {}", path))?;
        self.state = ReplyState::AwaitingReply;
        Ok(data)
    }

    /// List the names in `directory` (the current directory when empty).
    pub fn nlst(&mut self, directory: &str) -> Result<Vec<String>, FtpError> {
        self.expect("TYPE A", 2)?;
        let command = if directory.is_empty() {
            "NLST".to_string()
        } else {
            format!("NLST {}", directory)
        };
        let data = self.open_data(&command)?;

        let mut names = Vec::new();
        for line in BufReader::new(data).lines() {
            let line = line?;
            let name = line.trim_end_matches('\r');
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }

        let reply = self.read_reply()?;
        check("NLST", &reply, 2)?;
        Ok(names)
    }

    /// Upload everything from `source` as `name`. Returns the bytes sent.
    pub fn stor(&mut self, name: &str, source: &mut dyn Read) -> Result<u64, FtpError> {
        self.expect("TYPE I", 2)?;
        let data = self.open_data(&format!("STOR {}", name))?;
        let sent = copy_stream(source, data)?;
        let reply = self.read_reply()?;
        check("STOR", &reply, 2)?;
        Ok(sent)
    }

    pub fn quit(&mut self) -> Result<(), FtpError> {
        self.expect("QUIT", 2)?;
        Ok(())
    }

    /// Open a passive data connection and issue `command` over it.
    fn open_data(&mut self, command: &str) -> Result<TcpStream, FtpError> {
        let reply = self.expect("PASV", 2)?;
        let port = parse_pasv(&reply)?;
        // The advertised host is often unroutable; reuse the control peer.
        let data = TcpStream::connect(SocketAddr::new(self.peer, port))?;

        let reply = self.command(command)?;
        if reply.class() != 1 {
            return Err(unexpected(command, reply));
        }
        Ok(data)
    }

    fn expect(&mut self, command: &str, class: u16) -> Result<Reply, FtpError> {
        let reply = self.command(command)?;
        check(command, &reply, class)?;
        Ok(reply)
    }

    fn command(&mut self, command: &str) -> Result<Reply, FtpError> {
        log::debug!("> {}", command);
        self.send(command)?;
        self.read_reply()
    }

    fn command_masked(&mut self, verb: &str, argument: &str) -> Result<Reply, FtpError> {
        log::debug!("> {} ****", verb);
        self.send(&format!("{} {}", verb, argument))?;
        self.read_reply()
    }

    fn send(&mut self, command: &str) -> Result<(), FtpError> {
        if self.state == ReplyState::AwaitingReply {
            return Err(FtpError::ReplyPending {
                command: verb_of(command).to_string(),
            });
        }
        self.writer.write_all(command.as_bytes())?;
        self.writer.write_all(b"\r\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, FtpError> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(FtpError::Closed);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn read_reply(&mut self) -> Result<Reply, FtpError> {
        let first = self.read_line()?;
        let (code, continued) = parse_reply_line(&first)?;
        let mut text = first.get(4..).unwrap_or("").to_string();

        if continued {
            let terminator = format!("{} ", code);
            loop {
                let line = self.read_line()?;
                if line.starts_with(&terminator) || line == code.to_string() {
                    text.push('\n');
                    text.push_str(line.get(4..).unwrap_or(""));
                    break;
                }
                text.push('\n');
                text.push_str(&line);
            }
        }

        log::debug!("< {} {}", code, text);
        Ok(Reply { code, text })
    }
}

fn verb_of(command: &str) -> &str {
    command.split(' ').next().unwrap_or(command)
}

fn check(command: &str, reply: &Reply, class: u16) -> Result<(), FtpError> {
    if reply.class() == class {
        Ok(())
    } else {
        Err(unexpected(command, reply.clone()))
    }
}

fn unexpected(command: &str, reply: Reply) -> FtpError {
    FtpError::UnexpectedReply {
        command: verb_of(command).to_string(),
        code: reply.code,
        text: reply.text,
    }
}

/// Split the first line of a reply into its code and whether more lines
/// follow (`123-` rather than `123 `).
pub(crate) fn parse_reply_line(line: &str) -> Result<(u16, bool), FtpError> {
    let malformed = || FtpError::MalformedReply {
        line: line.to_string(),
    };

    let digits = line.get(..3).ok_or_else(malformed)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let code: u16 = digits.parse().map_err(|_| malformed())?;

    match line.as_bytes().get(3) {
        None | Some(b' ') => Ok((code, false)),
        Some(b'-') => Ok((code, true)),
        Some(_) => Err(malformed()),
    }
}

/// The data port from a `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)` reply.
pub(crate) fn parse_pasv(reply: &Reply) -> Result<u16, FtpError> {
    let malformed = || FtpError::MalformedReply {
        line: format!("{} {}", reply.code, reply.text),
    };

    let start = reply.text.find('(').ok_or_else(malformed)?;
    let end = reply.text[start..].find(')').ok_or_else(malformed)? + start;
    let numbers = reply.text[start + 1..end]
        .split(',')
        .map(|n| n.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;

    match numbers.as_slice() {
        [_, _, _, _, hi, lo] => Ok((u16::from(*hi) << 8) | u16::from(*lo)),
        _ => Err(malformed()),
    }
}
