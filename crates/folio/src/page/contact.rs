//! The contact form. There's no server: a valid message is turned into a `mailto:` link and
//! handed to the user's email client.

use color_eyre::eyre::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use snafu::{ensure, Snafu};

use crate::page::classes::ClassList;

/// Where messages go unless the config says otherwise.
pub const DEFAULT_ADDRESS: &str = "contact@taugustin.fr";

/// The submit button's label when it's not busy.
pub const DEFAULT_SUBMIT_LABEL: &str = "Envoyer le message";

/// The submit button's label whilst the email client is being opened.
pub const SENDING_LABEL: &str = "⏳ Envoi en cours...";

/// Shown once the email client has (hopefully) opened.
pub const SUCCESS_MESSAGE: &str = "✅ Votre client email s'est ouvert. Merci de votre message !";

/// How long to wait after opening the email client before confirming.
pub const CONFIRMATION_DELAY: std::time::Duration = std::time::Duration::from_millis(1000);

/// How long the confirmation stays up.
pub const CLEAR_DELAY: std::time::Duration = std::time::Duration::from_millis(5000);

/// The class that every status has.
const STATUS_CLASS: &str = "form-status";

/// The characters that `encodeURIComponent` leaves alone are the alphanumerics and these.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Something that looks enough like an email address. A byte order mark counts as whitespace,
/// as it does in browsers.
#[expect(clippy::expect_used, reason = "The pattern is a constant")]
static EMAIL_PATTERN: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$")
        .expect("Email pattern should compile")
});

/// Whitespace as browsers trim it: Unicode whitespace and the byte order mark.
fn is_blank(character: char) -> bool {
    character.is_whitespace() || character == '\u{FEFF}'
}

/// Reasons that a message can't be sent. Displayed as-is to the user.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// One of the fields is empty, or only whitespace.
    #[snafu(display("Tous les champs sont requis."))]
    MissingField,
    /// The email field doesn't look like an email address.
    #[snafu(display("Veuillez entrer une adresse email valide."))]
    InvalidEmail,
}

/// What the user typed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Fields {
    /// The sender's name
    pub name: String,
    /// The sender's email address
    pub email: String,
    /// The message itself
    pub message: String,
}

impl Fields {
    /// Instantiate
    #[must_use]
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_owned(),
            email: email.to_owned(),
            message: message.to_owned(),
        }
    }

    /// The trimmed fields, if they make a sendable message.
    ///
    /// # Errors
    /// When a field is empty or the email address is invalid.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        let trimmed = Self::new(
            self.name.trim_matches(is_blank),
            self.email.trim_matches(is_blank),
            self.message.trim_matches(is_blank),
        );
        ensure!(
            !trimmed.name.is_empty() && !trimmed.email.is_empty() && !trimmed.message.is_empty(),
            MissingFieldSnafu
        );
        ensure!(EMAIL_PATTERN.is_match(&trimmed.email), InvalidEmailSnafu);
        Ok(trimmed)
    }
}

/// The kinds of status message.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatusKind {
    /// Nothing to say
    #[default]
    Empty,
    /// Something's wrong with the form
    Error,
    /// The email client was opened
    Success,
}

/// The message shown under the form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct FormStatus {
    /// What kind of message it is
    pub kind: StatusKind,
    /// The message
    pub text: String,
}

impl FormStatus {
    /// A status with a message.
    #[must_use]
    pub fn new(kind: StatusKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_owned(),
        }
    }

    /// The classes of the status element, eg `form-status error`.
    #[must_use]
    pub fn class_name(&self) -> String {
        let mut classes = ClassList::with(&[STATUS_CLASS]);
        match self.kind {
            StatusKind::Empty => (),
            StatusKind::Error => classes.add("error"),
            StatusKind::Success => classes.add("success"),
        }
        classes.to_string()
    }
}

/// The form's submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SubmitButton {
    /// What the button says
    pub label: String,
    /// Whether it can be pressed
    pub is_disabled: bool,
}

/// Something that can be pointed at a URI, like a browser's location bar.
pub trait Navigator {
    /// Go to the URI.
    ///
    /// # Errors
    /// When the URI can't be opened.
    fn navigate(&mut self, uri: &str) -> Result<()>;
}

/// Hands URIs to the operating system, which should open the user's email client for `mailto:`.
#[derive(Debug, Default, Copy, Clone)]
#[non_exhaustive]
pub struct SystemNavigator;

impl SystemNavigator {
    /// The program, and its leading arguments, that opens URIs on the given OS. The URI is
    /// always passed as a single argument of its own. On Windows that rules out going through
    /// `cmd`, which would split it at every `&`.
    #[must_use]
    pub fn opener(os: &str) -> (&'static str, &'static [&'static str]) {
        match os {
            "macos" => ("open", &[]),
            "windows" => ("rundll32", &["url.dll,FileProtocolHandler"]),
            _ => ("xdg-open", &[]),
        }
    }

    /// The command that opens the URI on this OS.
    #[must_use]
    pub fn command(uri: &str) -> std::process::Command {
        let (program, arguments) = Self::opener(std::env::consts::OS);
        let mut command = std::process::Command::new(program);
        command.args(arguments).arg(uri);
        command
    }
}

impl Navigator for SystemNavigator {
    fn navigate(&mut self, uri: &str) -> Result<()> {
        let mut command = Self::command(uri);
        tracing::debug!("Opening {uri} with {command:?}");
        command
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
    /// The form wasn't valid, nothing was sent.
    Invalid(ValidationError),
    /// The email client was pointed at this `mailto:` URI.
    Sent(String),
}

/// The contact form.
pub struct ContactForm<N: Navigator> {
    /// What the user typed
    pub fields: Fields,
    /// The submit button
    pub button: SubmitButton,
    /// The button's label when it's not busy
    submit_label: String,
    /// Where messages are sent
    address: String,
    /// What opens the `mailto:` links
    navigator: N,
    /// The current status, observable with `subscribe()`
    status: tokio::sync::watch::Sender<FormStatus>,
}

impl<N: Navigator> ContactForm<N> {
    /// Instantiate
    #[must_use]
    pub fn new(address: &str, submit_label: &str, navigator: N) -> Self {
        let (status, _) = tokio::sync::watch::channel(FormStatus::default());
        Self {
            fields: Fields::default(),
            button: SubmitButton {
                label: submit_label.to_owned(),
                is_disabled: false,
            },
            submit_label: submit_label.to_owned(),
            address: address.to_owned(),
            navigator,
            status,
        }
    }

    /// Watch the status for changes.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    /// The current status.
    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status.borrow().clone()
    }

    /// The navigator, mostly so tests can see where it went.
    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    /// The `mailto:` URI for a validated message.
    #[must_use]
    pub fn mailto(&self, fields: &Fields) -> String {
        let subject = format!("Contact depuis CV - {}", fields.name);
        let body = format!(
            "Nom: {}\nEmail: {}\n\nMessage:\n{}",
            fields.name, fields.email, fields.message
        );
        format!(
            "mailto:{}?subject={}&body={}",
            self.address,
            utf8_percent_encode(&subject, URI_COMPONENT),
            utf8_percent_encode(&body, URI_COMPONENT)
        )
    }

    /// Submit the form: open the email client, confirm, then clear the confirmation. Takes a
    /// good few seconds when successful.
    ///
    /// # Errors
    /// When the email client can't be opened. An invalid form isn't an error, it's reported
    /// through the status.
    pub async fn submit(&mut self) -> Result<Outcome> {
        let outcome = self.send()?;
        if matches!(outcome, Outcome::Sent(_)) {
            self.confirm().await;
        }
        Ok(outcome)
    }

    /// Validate and, if valid, open the email client. Leaves the button busy.
    ///
    /// # Errors
    /// When the email client can't be opened.
    pub fn send(&mut self) -> Result<Outcome> {
        let fields = match self.fields.validate() {
            Ok(fields) => fields,
            Err(error) => {
                tracing::debug!("Contact form is invalid: {error:?}");
                self.set_status(FormStatus::new(StatusKind::Error, &error.to_string()));
                return Ok(Outcome::Invalid(error));
            }
        };

        SENDING_LABEL.clone_into(&mut self.button.label);
        self.button.is_disabled = true;

        let uri = self.mailto(&fields);
        if let Err(error) = self.navigator.navigate(&uri) {
            self.restore_button();
            return Err(error);
        }
        Ok(Outcome::Sent(uri))
    }

    /// After a message has been sent: confirm, reset the form, then clear the confirmation.
    pub async fn confirm(&mut self) {
        tokio::time::sleep(CONFIRMATION_DELAY).await;
        self.set_status(FormStatus::new(StatusKind::Success, SUCCESS_MESSAGE));
        self.fields = Fields::default();
        self.restore_button();

        tokio::time::sleep(CLEAR_DELAY).await;
        self.set_status(FormStatus::default());
    }

    /// Put the button back how it was before sending.
    fn restore_button(&mut self) {
        self.submit_label.clone_into(&mut self.button.label);
        self.button.is_disabled = false;
    }

    /// Change the status, notifying anyone watching.
    fn set_status(&self, status: FormStatus) {
        tracing::trace!("Contact form status: {status:?}");
        self.status.send_replace(status);
    }
}
