//! Interactive console session: start, wait for readiness, chat, end.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use eirene_client::{ChatApi, Envelope};
use eirene_common::{EireneError, SessionId, UserId};
use tracing::{debug, info, warn};

const RULE: &str = "================================";

#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    /// Prompted for on the input when `None`.
    pub user_id: Option<UserId>,
    pub max_check_attempts: u32,
    pub check_interval: Duration,
}

/// How a console run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    EmptyUserId,
    SessionNotReady,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Completed => 0,
            Outcome::EmptyUserId => 1,
            Outcome::SessionNotReady => 2,
        }
    }
}

/// Run one console session. Once the session is ready it is always ended
/// on the way out, even when reading input fails.
pub async fn run<C, R, W>(
    client: &C,
    options: &ConsoleOptions,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome, EireneError>
where
    C: ChatApi + ?Sized,
    R: BufRead,
    W: Write + Send,
{
    let user_id = match &options.user_id {
        Some(id) => id.clone(),
        None => {
            write!(output, "User ID: ")?;
            output.flush()?;
            UserId::from(read_line(input)?.unwrap_or_default())
        }
    };
    if user_id.is_empty() {
        writeln!(output, "User ID is empty!")?;
        return Ok(Outcome::EmptyUserId);
    }

    let envelope = client.start_chat_session(&user_id).await?;
    let session_id = session_id_from(&envelope)?;
    info!(session = %session_id, user = %user_id, "chat session started");
    writeln!(output, "Current session: {session_id}")?;

    if !wait_until_ready(client, &session_id, options).await {
        writeln!(output, "Session is not ready.")?;
        return Ok(Outcome::SessionNotReady);
    }

    let result = chat_loop(client, &session_id, &user_id, input, output).await;

    match client.end_chat_session(&session_id).await {
        Ok(_) => info!(session = %session_id, "chat session ended"),
        Err(e) => warn!(session = %session_id, error = %e, "failed to end chat session"),
    }

    result.map(|()| Outcome::Completed)
}

fn session_id_from(envelope: &Envelope) -> Result<SessionId, EireneError> {
    envelope
        .get("session_id")
        .and_then(|v| v.as_str())
        .map(SessionId::from)
        .ok_or_else(|| EireneError::Session("server response has no session_id".into()))
}

/// Read one line without its terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

async fn wait_until_ready<C>(client: &C, session_id: &SessionId, options: &ConsoleOptions) -> bool
where
    C: ChatApi + ?Sized,
{
    for attempt in 1..=options.max_check_attempts {
        match client.check_chat_session(session_id).await {
            Ok(_) => return true,
            Err(e) => debug!(attempt, error = %e, "session not ready yet"),
        }
        if attempt < options.max_check_attempts {
            tokio::time::sleep(options.check_interval).await;
        }
    }
    false
}

async fn chat_loop<C, R, W>(
    client: &C,
    session_id: &SessionId,
    user_id: &UserId,
    input: &mut R,
    output: &mut W,
) -> Result<(), EireneError>
where
    C: ChatApi + ?Sized,
    R: BufRead,
    W: Write + Send,
{
    writeln!(output, "\n{RULE}")?;
    loop {
        write!(output, "Ask Eirene (Enter to exit): ")?;
        output.flush()?;

        let Some(message) = read_line(input)? else {
            break;
        };
        if message.trim().is_empty() {
            break;
        }

        ask(client, session_id, user_id, &message, output).await?;
        writeln!(output, "\n{RULE}")?;
    }
    Ok(())
}

/// Send one message, echoing reply chunks as they arrive. A failed send is
/// reported on the output and does not end the loop.
async fn ask<C, W>(
    client: &C,
    session_id: &SessionId,
    user_id: &UserId,
    message: &str,
    output: &mut W,
) -> Result<(), EireneError>
where
    C: ChatApi + ?Sized,
    W: Write + Send,
{
    writeln!(output, "Q: {message}")?;
    write!(output, "A: ")?;
    output.flush()?;

    let started = Instant::now();
    let mut first_chunk_at: Option<Instant> = None;
    let mut write_error: Option<std::io::Error> = None;

    let result = {
        let mut on_chunk = |chunk: String| {
            first_chunk_at.get_or_insert_with(Instant::now);
            if write_error.is_none() {
                if let Err(e) = output
                    .write_all(chunk.as_bytes())
                    .and_then(|()| output.flush())
                {
                    write_error = Some(e);
                }
            }
        };
        client
            .send_chat_message(session_id, user_id, message, &mut on_chunk)
            .await
    };
    let finished = Instant::now();
    writeln!(output)?;

    if let Some(e) = write_error {
        return Err(e.into());
    }

    match result {
        Ok(()) => {
            if let Some(first) = first_chunk_at {
                writeln!(
                    output,
                    "Response time: {:.3}(s)",
                    (first - started).as_secs_f64()
                )?;
            }
            writeln!(
                output,
                "Execution time: {:.3}(s)",
                (finished - started).as_secs_f64()
            )?;
        }
        Err(e) => {
            warn!(session = %session_id, error = %e, "message failed");
            writeln!(output, "{e}")?;
        }
    }
    Ok(())
}
