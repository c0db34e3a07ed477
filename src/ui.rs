// UI layer: prompts for credentials, logs in once, then runs a simple
// command loop (`message`, `file`, `exit`) using `dialoguer` prompts.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::ApiClient;
use crate::auth::Credentials;
use crate::session::Session;
use crate::transport::Transport;

/// A command typed at the main prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Message,
    File,
    Exit,
    Unknown(String),
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.to_ascii_lowercase().as_str() {
            "message" => Command::Message,
            "file" => Command::File,
            "exit" => Command::Exit,
            _ => Command::Unknown(s.to_string()),
        })
    }
}

/// Run the whole interactive session. A failed login ends the program;
/// failed sends are reported and the loop carries on.
pub fn run<T: Transport>(api: &ApiClient<T>) -> Result<()> {
    let username: String = Input::new()
        .with_prompt("Enter username")
        .allow_empty(true)
        .interact_text()?;
    let password: String = Password::new().with_prompt("Enter password").interact()?;
    let credentials = Credentials::new(username, password);

    let spinner = spinner("Logging in...")?;
    let login = api.login(&credentials);
    spinner.finish_and_clear();
    let session = match login {
        Ok(session) => session,
        Err(e) => {
            println!("Login failed: {}", e);
            return Ok(());
        }
    };
    drop(credentials);

    loop {
        let line: String = Input::new()
            .with_prompt("Enter command (message, file, exit)")
            .allow_empty(true)
            .interact_text()?;
        match line.parse::<Command>()? {
            Command::Message => handle_message(api, &session)?,
            Command::File => handle_file(api, &session)?,
            Command::Exit => {
                println!("Exiting...");
                break;
            }
            Command::Unknown(_) => println!("Unknown command"),
        }
    }
    Ok(())
}

fn handle_message<T: Transport>(api: &ApiClient<T>, session: &Session) -> Result<()> {
    let recipient: String = Input::new()
        .with_prompt("Enter recipient")
        .allow_empty(true)
        .interact_text()?;
    let message: String = Input::new()
        .with_prompt("Enter message")
        .allow_empty(true)
        .interact_text()?;

    let spinner = spinner("Sending message...")?;
    let sent = api.send_message(session, &recipient, &message);
    spinner.finish_and_clear();
    match sent {
        Ok(()) => println!("Message sent successfully"),
        Err(e) => println!("Error sending message: {}", e),
    }
    Ok(())
}

fn handle_file<T: Transport>(api: &ApiClient<T>, session: &Session) -> Result<()> {
    let recipient: String = Input::new()
        .with_prompt("Enter recipient")
        .allow_empty(true)
        .interact_text()?;
    let path: String = Input::new()
        .with_prompt("Enter file path")
        .allow_empty(true)
        .interact_text()?;

    let spinner = spinner("Uploading...")?;
    let sent = api.send_file(session, &recipient, &path);
    spinner.finish_and_clear();
    match sent {
        Ok(()) => println!("File sent successfully"),
        Err(e) => println!("Error sending file: {}", e),
    }
    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
