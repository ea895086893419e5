//! Interactive interview console
//!
//! A terminal client for running a transfer interview against a live
//! server. Useful for exercising the protocol without the web UI:
//!
//! ```text
//! RELEVO_URL=http://localhost:8000 RELEVO_TOKEN=dev relevo-console
//! ```
//!
//! Commands: `/start <transfer-id>`, `/reset`, `/quit`; anything else is
//! sent as the answer to the current step.

use relevo::client::{ClientError, DisplayTurn, HttpInterviewApi, InterviewSession};
use relevo::interview::Role;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("RELEVO_URL").unwrap_or_else(|_| "http://localhost:8000".into());
    let token = std::env::var("RELEVO_TOKEN").unwrap_or_else(|_| "dev".into());
    let role = std::env::var("RELEVO_ROLE").unwrap_or_else(|_| "user".into());

    let api = HttpInterviewApi::new(&base_url, token, role);
    let mut session = InterviewSession::new(api);

    println!("relevo-console: conectado a {base_url}");
    println!("Usa /start <id> para iniciar, /reset para vaciar (solo local), /quit para salir.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(&session);
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            "" => {}
            "/quit" => break,
            "/reset" => {
                session.reset();
                println!("Conversación vaciada localmente; el servidor conserva la entrevista.");
            }
            _ if line.starts_with("/start") => {
                match line
                    .strip_prefix("/start")
                    .and_then(|rest| rest.trim().parse::<i64>().ok())
                {
                    Some(id) => run(session.start(id).await, &session),
                    None => println!("Uso: /start <id de traspaso>"),
                }
            }
            text => run(session.send(text).await, &session),
        }
        prompt(&session);
    }

    Ok(())
}

fn run(result: Result<(), ClientError>, session: &InterviewSession<HttpInterviewApi>) {
    match result {
        Ok(()) => render(session.transcript()),
        Err(err) => {
            println!("! {err}");
            if !session.draft().is_empty() {
                println!("  (tu mensaje sigue en el borrador: {})", session.draft());
            }
        }
    }
}

fn render(transcript: &[DisplayTurn]) {
    for turn in transcript {
        let speaker = match turn.role {
            Role::User => "tú",
            Role::Assistant => "asistente",
        };
        println!("[{speaker}] {}", turn.content);
    }
}

fn prompt(session: &InterviewSession<HttpInterviewApi>) {
    match session.pending_step() {
        Some(step) => println!("(paso pendiente: {step})"),
        None if session.transfer_id().is_some() && !session.transcript().is_empty() => {
            println!("(entrevista completa)");
        }
        None => {}
    }
}
