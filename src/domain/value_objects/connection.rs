//! Connection String Value Object
//!
//! Parses `scheme://[user[:password]@][host[:port]][/directory]`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigError;

/// Transports a connection string can select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionScheme {
    File,
    Ftp,
    Ssh,
}

impl ConnectionScheme {
    fn parse(scheme: &str, connection: &str) -> Result<Self, ConfigError> {
        match scheme.to_lowercase().as_str() {
            "file" => Ok(ConnectionScheme::File),
            "ftp" => Ok(ConnectionScheme::Ftp),
            "ssh" => Ok(ConnectionScheme::Ssh),
            _ => Err(ConfigError::UnsupportedScheme {
                scheme: scheme.to_string(),
                connection: connection.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConnectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionScheme::File => f.write_str("file"),
            ConnectionScheme::Ftp => f.write_str("ftp"),
            ConnectionScheme::Ssh => f.write_str("ssh"),
        }
    }
}

/// Parsed connection string
#[derive(Clone, PartialEq, Eq)]
pub struct Connection {
    pub scheme: ConnectionScheme,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Remote directory, or the local path for `file`
    pub directory: String,
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^([+0-9A-Za-z]+)://(?:([^#/:@]+)(?::([^#/@]+))?@)?(?:([^#/:]+)(?::([0-9]+))?)?(?:/([^#]*))?$",
        )
        .expect("connection pattern is valid")
    })
}

impl Connection {
    pub fn parse(connection: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedConnection {
            connection: connection.to_string(),
        };

        let captures = pattern().captures(connection).ok_or_else(malformed)?;
        let scheme = ConnectionScheme::parse(&captures[1], connection)?;

        let user = captures.get(2).map(|m| percent_decode(m.as_str()));
        let password = captures.get(3).map(|m| percent_decode(m.as_str()));
        let host = captures.get(4).map(|m| m.as_str().to_string());
        let port = match captures.get(5) {
            Some(m) => Some(m.as_str().parse::<u16>().map_err(|_| malformed())?),
            None => None,
        };

        let directory = match scheme {
            // Host and directory together form a filesystem path for `file`:
            // `file://dist` is relative, `file:///srv/www` absolute.
            ConnectionScheme::File => {
                let rest = captures.get(6).map(|m| m.as_str()).unwrap_or("");
                match (&host, rest) {
                    (Some(h), "") => h.clone(),
                    (Some(h), r) => format!("{}/{}", h, r),
                    (None, "") => ".".to_string(),
                    (None, r) => format!("/{}", r),
                }
            }
            _ => captures
                .get(6)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        };

        Ok(Self {
            scheme,
            user,
            password,
            host: if scheme == ConnectionScheme::File {
                None
            } else {
                host
            },
            port,
            directory,
        })
    }

    /// Non-fatal problems worth reporting to the operator
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        match self.scheme {
            ConnectionScheme::File => {
                if self.user.is_some() || self.password.is_some() || self.port.is_some() {
                    warnings.push(
                        "connection string for \"file\" scheme shouldn't contain any port, user or password"
                            .to_string(),
                    );
                }
            }
            ConnectionScheme::Ssh => {
                if self.password.is_some() {
                    warnings.push(
                        "connection string for \"ssh\" scheme shouldn't contain any password, use an agent or key file"
                            .to_string(),
                    );
                }
            }
            ConnectionScheme::Ftp => {}
        }
        warnings
    }
}

// Never print the password
impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("scheme", &self.scheme)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("directory", &self.directory)
            .finish()
    }
}

/// Decode `%XX` escapes and `+` as space; invalid escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
