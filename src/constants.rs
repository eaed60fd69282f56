// Interpret As Command
pub const IAC: u8 = 255;

// Indicates the desire to begin performing, or confirmation that you are now
// performing, the indicated option.
pub const WILL: u8 = 251;

// Indicates the refusal to perform, or continue performing, the indicated
// option.
pub const WONT: u8 = 252;

// Indicates the request that the other party perform, or confirmation that you
// are expecting the other party to perform, the indicated option.
pub const DO: u8 = 253;

// Indicates the demand that the other party stop performing, or confirmation
// that you are no longer expecting the other party to perform, the indicated
// option.
pub const DONT: u8 = 254;

// Echo a message back to the other side
pub const ECHO: u8 = 1;

// Carriage Return + Line Feed
pub const CRLF: &[u8] = b"\r\n";

/// Length of an embedded command sequence: `IAC`, a command byte and an option
/// byte.
pub const COMMAND_LEN: usize = 3;

/// The one negotiation message a client sends after connecting: it will do its
/// own local echo.
pub const WILL_ECHO: [u8; COMMAND_LEN] = [IAC, WILL, ECHO];

/// How many bytes a single receive asks the transport for by default.
pub const DEFAULT_READ_SIZE: usize = 4096;

/// Largest read a session or transport will allocate for.
pub const MAX_READ_SIZE: usize = 64 * 1024;

/// Port used by `SessionConfig::default()`.
pub const DEFAULT_PORT: u16 = 4000;

/// Seconds a TCP connect may take before it is reported as failed.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
