//! Question client orchestrating validate, sign, encode, send and decode.
//!
//! Each call builds its own [`SignedRequest`], performs at most one transport
//! call, and returns either the full payload or the first error. Key material
//! is only borrowed for the duration of the call.

use std::fs;
use std::path::Path;

use error_stack::Report;
use p256::elliptic_curve::zeroize::Zeroizing;
use url::Url;

use crate::error::QuestionError;
use crate::request::{RequestPreparer, SignedRequest};
use crate::response::{decode_response, QuestionData};
use crate::settings::Settings;
use crate::transport::{Transport, UreqTransport};

pub struct QuestionClient<T = UreqTransport> {
    settings: Settings,
    transport: T,
}

impl QuestionClient<UreqTransport> {
    /// Client using the blocking `ureq` transport configured from `settings`.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let transport = UreqTransport::new(&settings.service);
        Self::with_transport(settings, transport)
    }
}

impl<T: Transport> QuestionClient<T> {
    #[must_use]
    pub fn with_transport(settings: Settings, transport: T) -> Self {
        Self {
            settings,
            transport,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate, sign and encode a request without sending it.
    ///
    /// # Errors
    ///
    /// Returns a validation, crypto or configuration stage [`QuestionError`].
    pub fn prepare_request(
        &self,
        question_type: i64,
        firm_id: &str,
        private_key: &str,
    ) -> Result<Url, Report<QuestionError>> {
        let mut request =
            SignedRequest::new(&self.settings.request, question_type, firm_id, private_key);

        request.check_params()?;
        request.generate_digital_signature()?;
        let url = request.generate_get_url(&self.settings.service.base_url)?;

        log::debug!(
            "Prepared signed request: questionType={} firmID={} currentTimestamp={}",
            request.question_type(),
            request.firm_id(),
            request.current_timestamp()
        );

        Ok(url)
    }

    /// Fetch a question signed with the PEM `private_key`.
    ///
    /// # Errors
    ///
    /// Returns the first [`QuestionError`] raised by any stage; see
    /// [`QuestionError::stage`].
    pub fn fetch_question(
        &self,
        question_type: i64,
        firm_id: &str,
        private_key: &str,
    ) -> Result<QuestionData, Report<QuestionError>> {
        let url = self.prepare_request(question_type, firm_id, private_key)?;

        log::info!(
            "Requesting question type {} from {}{}",
            question_type,
            url.host_str().unwrap_or_default(),
            url.path()
        );

        let result = self
            .transport
            .get(&url)
            .and_then(|response| decode_response(response.status, &response.body));

        match &result {
            Ok(data) if data.is_unlimited() => {
                log::info!("Received question (unlimited calls remaining)");
            }
            Ok(data) => log::info!("Received question ({} calls remaining)", data.remain_times),
            Err(e) => log::warn!("Question request failed: {}", e.current_context()),
        }

        result
    }

    /// Read the PEM key from `private_key_path` and delegate to
    /// [`Self::fetch_question`].
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::KeyFile`] if the file cannot be read as UTF-8,
    /// otherwise whatever [`Self::fetch_question`] returns.
    pub fn fetch_question_by_path(
        &self,
        question_type: i64,
        firm_id: &str,
        private_key_path: impl AsRef<Path>,
    ) -> Result<QuestionData, Report<QuestionError>> {
        let private_key = read_private_key(private_key_path.as_ref())?;
        self.fetch_question(question_type, firm_id, &private_key)
    }
}

/// Read a whole PEM key file.
///
/// # Errors
///
/// Returns [`QuestionError::KeyFile`] naming the path if the read fails.
pub fn read_private_key(path: &Path) -> Result<Zeroizing<String>, Report<QuestionError>> {
    fs::read_to_string(path).map(Zeroizing::new).map_err(|e| {
        Report::new(QuestionError::KeyFile {
            message: format!("{}: {}", path.display(), e),
        })
    })
}

/// Fetch a question using the embedded default settings.
///
/// # Errors
///
/// Returns [`QuestionError::Configuration`] if the default settings do not
/// load, otherwise whatever [`QuestionClient::fetch_question`] returns.
pub fn get_question(
    question_type: i64,
    firm_id: &str,
    private_key: &str,
) -> Result<QuestionData, Report<QuestionError>> {
    QuestionClient::new(Settings::new()?).fetch_question(question_type, firm_id, private_key)
}

/// File-path variant of [`get_question`].
///
/// # Errors
///
/// See [`get_question`] and [`QuestionClient::fetch_question_by_path`].
pub fn get_question_by_path(
    question_type: i64,
    firm_id: &str,
    private_key_path: impl AsRef<Path>,
) -> Result<QuestionData, Report<QuestionError>> {
    QuestionClient::new(Settings::new()?).fetch_question_by_path(
        question_type,
        firm_id,
        private_key_path,
    )
}
