//! Example: build an email and print its wire form
//!
//! Configures an email with recipients, a subject, and both text and HTML
//! bodies, then builds the MIME message and prints the rendered output.
//!
//! ## Running
//!
//! ```bash
//! cargo run --example build_message
//! ```

use std::time::Duration;

use mailwright::Email;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let mut email = Email::new();
    email.set_host_name("smtp.example.com");
    email
        .add_to("recipient@example.com")?
        .add_cc("copy@example.com")?
        .add_reply_to_named("replies@example.com", "Replies")?
        .set_from_named("sender@example.com", "Sender")?
        .set_subject("Greetings from mailwright")
        .set_msg("Hello, World!")
        .set_html_msg("<html><body><h1>Hello, World!</h1></body></html>")
        .set_socket_connection_timeout(Duration::from_secs(10));

    let session = email.session()?.clone();
    println!("Session: {}:{}", session.host, session.port);

    let message = email.build_mime_message()?;
    println!("{}", message.to_wire()?);

    Ok(())
}
