use std::{
    env,
    error::Error,
    fs,
    io::{self, Write},
};

use mudlink::{Connector, Session, SessionConfig, SessionError};
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // `RUST_LOG=mudlink=debug` shows the session's lifecycle events.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // An optional TOML file picks the server; otherwise we talk to a local one.
    let config = match env::args().nth(1) {
        Some(path) => SessionConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => SessionConfig::default(),
    };

    let mut session = Session::with_config(&config)?;
    session.connect(&config.host, config.port).await?;
    println!("connected to {}:{}, type \"quit\" to leave", config.host, config.port);

    play(&mut session, BufReader::new(stdin()), &mut io::stdout()).await?;

    Ok(())
}

/// Runs the command loop and disconnects afterwards, whether the loop ended
/// with "quit", end of input or an error.
async fn play<C, R, W>(
    session: &mut Session<C>,
    input: R,
    output: &mut W,
) -> Result<(), SessionError>
where
    C: Connector,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let outcome = command_loop(session, input, output).await;
    if let Err(e) = &outcome {
        tracing::error!(error = %e, "session ended with an error");
    }

    session.disconnect().await?;
    outcome
}

/// Sends each typed line, then prints whatever the server sent back. An empty
/// response is skipped: it may only have held command sequences.
async fn command_loop<C, R, W>(
    session: &mut Session<C>,
    input: R,
    output: &mut W,
) -> Result<(), SessionError>
where
    C: Connector,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        // We told the server WILL ECHO, so the echo is ours to do.
        writeln!(output, "> {line}")?;

        session.send(&line).await?;

        let response = session.receive().await?;
        if !response.is_empty() {
            write!(output, "{response}")?;
            output.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use mudlink::constants::{IAC, WILL, WILL_ECHO};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    use super::*;

    async fn expect_line(socket: &mut TcpStream, expected: &[u8]) {
        let mut line = vec![0u8; expected.len()];
        socket.read_exact(&mut line).await.unwrap();
        assert_eq!(line, expected);
    }

    async fn connected(port: u16) -> Session {
        let mut session = Session::new();
        session.connect("127.0.0.1", port).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_commands_only_response_keeps_playing() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            expect_line(&mut socket, &WILL_ECHO).await;

            expect_line(&mut socket, b"look\r\n").await;
            socket.write_all(&[IAC, WILL, 1]).await.unwrap();

            expect_line(&mut socket, b"north\r\n").await;
            socket.write_all(b"Room\r\n").await.unwrap();
        });

        let mut session = connected(port).await;
        let mut output = Vec::new();
        play(&mut session, &b"look\nnorth\nquit\nsouth\n"[..], &mut output).await.unwrap();
        server.await.unwrap();

        assert!(!session.is_connected());
        assert_eq!(String::from_utf8(output).unwrap(), "> look\n> north\nRoom\r\n");
    }

    #[tokio::test]
    async fn test_error_still_disconnects() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            expect_line(&mut socket, &WILL_ECHO).await;
            socket
        });

        let mut session = connected(port).await;
        let mut output = Vec::new();
        let result = play(&mut session, &"wave 😀\n".as_bytes()[..], &mut output).await;
        let _socket = server.await.unwrap();

        assert!(matches!(result, Err(SessionError::EncodingFailure { character: '😀' })));
        assert!(!session.is_connected());
    }
}
