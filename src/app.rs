use crate::cli::Cli;
use crate::config::{AuthConfig, CacheLocation, GMAIL_READONLY_SCOPE};
use crate::email_content::{decode_body_data, find_attachments};
use crate::error::{ApiError, Error, Result};
use crate::gmail_api::{try_authenticate, GmailSession, MailApi};
use crate::presenter::Presenter;
use crate::prompt::{Prompt, TerminalPrompt};
use std::io::{self, Write};
use tracing::{debug, info};

pub async fn run(cli: &Cli) -> Result<()> {
    let config =
        AuthConfig::from_file(&cli.client_secret, vec![GMAIL_READONLY_SCOPE.to_string()]).await?;
    let location = CacheLocation::from_env()?;
    let mut prompt = TerminalPrompt::stdio();

    let client = try_authenticate(&config, &location, &mut prompt).await?;
    info!("Authorized ({:?})", client.token_source());

    let session = GmailSession::new(client);
    let mut presenter = Presenter::stdout(&cli.output_dir);
    presenter.ensure_output_dir()?;

    list_and_show(&session, &cli.user, &mut prompt, &mut presenter).await
}

/// Lists the user's message ids, asks which one to open and prints it.
/// Does nothing further when the mailbox is empty.
pub async fn list_and_show<A, P, W>(
    api: &A,
    user: &str,
    prompt: &mut P,
    presenter: &mut Presenter<W>,
) -> Result<()>
where
    A: MailApi + ?Sized,
    P: Prompt + ?Sized,
    W: Write,
{
    let ids = api.list_message_ids(user).await?;
    presenter.print_message_ids(&ids)?;
    if ids.is_empty() {
        return Ok(());
    }

    let message_id = prompt.ask("Enter message id: ").map_err(Error::Prompt)?;
    if message_id.is_empty() {
        return Err(Error::Prompt(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no message id entered",
        )));
    }

    show_message(api, user, &message_id, presenter).await
}

pub async fn show_message<A, W>(
    api: &A,
    user: &str,
    message_id: &str,
    presenter: &mut Presenter<W>,
) -> Result<()>
where
    A: MailApi + ?Sized,
    W: Write,
{
    let message = api.get_message(user, message_id).await?;
    presenter.print_message(&message)?;

    let payload = message.payload.clone().unwrap_or_default();
    for attachment in find_attachments(&payload) {
        presenter.print_attachment(&attachment)?;

        let bytes = match (&attachment.inline_data, &attachment.attachment_id) {
            (Some(data), _) => decode_body_data(data)?,
            (None, Some(attachment_id)) => {
                api.get_attachment(user, message_id, attachment_id).await?
            }
            (None, None) => {
                return Err(ApiError::Payload(format!(
                    "attachment {:?} has neither data nor an attachment id",
                    attachment.filename
                ))
                .into())
            }
        };

        let path = presenter.save_attachment(&attachment.filename, &bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        presenter.print_attachment_saved(&path)?;
    }

    presenter.print_footer()
}
