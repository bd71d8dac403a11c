//! Envelope header tags.

use std::fmt;

/// Which side originates a message, seen from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Server to client.
    Inbound,
    /// Client to server.
    Outbound,
}

/// The closed set of known header tags.
///
/// Anything else on the wire is an unknown header and must be dropped, never
/// treated as an error that ends the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// Roster snapshot.
    ClientList,
    /// User chat submission.
    ChatMessage,
    /// Chat line pushed by the server.
    ServerMsg,
    /// Request for the current light state.
    GetCurrentToggle,
    /// Authoritative light state.
    Toggle,
    /// User light toggle request.
    ToggleLight,
}

impl Header {
    /// Every known tag.
    pub const ALL: [Header; 6] = [
        Header::ClientList,
        Header::ChatMessage,
        Header::ServerMsg,
        Header::GetCurrentToggle,
        Header::Toggle,
        Header::ToggleLight,
    ];

    /// Wire spelling (case-sensitive).
    pub fn as_str(self) -> &'static str {
        match self {
            Header::ClientList => "clientlist",
            Header::ChatMessage => "chatmessage",
            Header::ServerMsg => "servermsg",
            Header::GetCurrentToggle => "getCurrentToggle",
            Header::Toggle => "toggle",
            Header::ToggleLight => "toggleLight",
        }
    }

    /// Parse a wire tag. Returns `None` for unknown tags.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == s)
    }

    pub fn direction(self) -> Direction {
        match self {
            Header::ClientList | Header::ServerMsg | Header::Toggle => Direction::Inbound,
            Header::ChatMessage | Header::GetCurrentToggle | Header::ToggleLight => {
                Direction::Outbound
            }
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_are_case_sensitive() {
        assert_eq!(Header::from_wire("toggleLight"), Some(Header::ToggleLight));
        assert_eq!(Header::from_wire("togglelight"), None);
        assert_eq!(Header::from_wire("ClientList"), None);
    }

    #[test]
    fn every_tag_parses_back() {
        for h in Header::ALL {
            assert_eq!(Header::from_wire(h.as_str()), Some(h));
        }
    }

    #[test]
    fn directions() {
        assert_eq!(Header::ClientList.direction(), Direction::Inbound);
        assert_eq!(Header::ToggleLight.direction(), Direction::Outbound);
    }
}
