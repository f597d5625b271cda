//! Async HTTP client for the printer host's AJAX API.
//!
//! All command and query endpoints live under the host's `ajax/` prefix;
//! G-code downloads are served from the host root. Command POSTs use
//! form-encoded bodies, matching what the host's web frontend sends.
//!
//! The client is cheap to clone (it shares one [`reqwest::Client`] pool), so
//! spawned tasks each hold their own copy.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use hostdeck_core::prelude::*;
use hostdeck_core::types::{ControlDefinition, GcodeFile, TimelapseFile, TimelapseMode};

/// Name of the API key header the host accepts
const API_KEY_HEADER: &str = "X-Api-Key";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response of `GET control/connectionOptions`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionOptions {
    pub ports: Vec<String>,
    pub baudrates: Vec<u32>,
    pub port_preference: Option<String>,
    pub baudrate_preference: Option<u32>,
}

/// Response of `GET gcodefiles` and `POST gcodefiles/delete`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileListing {
    pub files: Vec<GcodeFile>,
}

/// The four named feedrates of `control/speed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feedrates {
    pub outer_wall: Option<u32>,
    pub inner_wall: Option<u32>,
    pub fill: Option<u32>,
    pub support: Option<u32>,
}

/// Response of `GET control/speed` and `POST control/speed`.
///
/// A missing `feedrate` object means the values are unknown (for example
/// while the printer is disconnected) and any displayed values must be
/// cleared rather than left stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedResponse {
    pub feedrate: Option<Feedrates>,
}

/// Nested `config` object of the timelapse response
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimelapseSettings {
    pub interval: Option<u32>,
}

/// Response of `GET timelapse` and `POST timelapse/config`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimelapseResponse {
    #[serde(rename = "type")]
    pub mode: TimelapseMode,
    pub files: Vec<TimelapseFile>,
    pub config: TimelapseSettings,
}

// ---------------------------------------------------------------------------
// Command vocabulary
// ---------------------------------------------------------------------------

/// Axis of a jog command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JogAxis {
    X,
    Y,
    Z,
}

impl JogAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            JogAxis::X => "x",
            JogAxis::Y => "y",
            JogAxis::Z => "z",
        }
    }
}

/// One of the four adjustable feedrate structures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedStructure {
    OuterWall,
    InnerWall,
    Fill,
    Support,
}

impl SpeedStructure {
    /// Wire name of the form field, also used as the display label
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedStructure::OuterWall => "outerWall",
            SpeedStructure::InnerWall => "innerWall",
            SpeedStructure::Fill => "fill",
            SpeedStructure::Support => "support",
        }
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Async client for the host's HTTP API.
///
/// Create once with [`ApiClient::new`] and clone freely; every spawned task
/// gets its own copy sharing the same connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Host root, always with a trailing slash
    base: Url,
    /// `{base}ajax/`, where all command/query endpoints live
    ajax_base: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish()
    }
}

impl ApiClient {
    /// Build a client for the host at `base_url`.
    ///
    /// `base_url` is the host root (for example `http://octopi.local:5000`);
    /// a trailing slash is added if missing. When `api_key` is given it is
    /// sent as `X-Api-Key` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` does not parse or cannot
    /// serve as a base.
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self> {
        let mut base =
            Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let ajax_base = base
            .join("ajax/")
            .map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = api_key {
            let value = reqwest::header::HeaderValue::from_str(key)
                .map_err(|_| Error::config_invalid("API key contains invalid characters"))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::api(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            ajax_base,
        })
    }

    /// Host root URL (with trailing slash)
    pub fn base(&self) -> &Url {
        &self.base
    }

    // ── Connection ───────────────────────────────────────────────────────

    /// `GET control/connectionOptions`
    pub async fn connection_options(&self) -> Result<ConnectionOptions> {
        self.get_json("control/connectionOptions").await
    }

    /// `POST control/connect` — open the serial connection.
    ///
    /// `save` asks the host to remember port and baud rate as its new
    /// preference.
    pub async fn connect_printer(
        &self,
        port: Option<&str>,
        baudrate: Option<u32>,
        save: bool,
    ) -> Result<()> {
        let mut form: Vec<(&str, String)> = Vec::new();
        if let Some(port) = port {
            form.push(("port", port.to_string()));
        }
        if let Some(baudrate) = baudrate {
            form.push(("baudrate", baudrate.to_string()));
        }
        if save {
            form.push(("save", "true".to_string()));
        }
        self.post_form("control/connect", &form).await
    }

    /// `POST control/disconnect` — close the serial connection
    pub async fn disconnect_printer(&self) -> Result<()> {
        self.post_form("control/disconnect", &[]).await
    }

    // ── Custom controls ──────────────────────────────────────────────────

    /// `GET control/custom` — fetch the host-defined controls tree
    pub async fn custom_controls(&self) -> Result<Vec<ControlDefinition>> {
        #[derive(Deserialize)]
        struct ControlsResponse {
            #[serde(default)]
            controls: Vec<ControlDefinition>,
        }
        let response: ControlsResponse = self.get_json("control/custom").await?;
        Ok(response.controls)
    }

    /// `POST control/jog` — move the head along one axis by `distance` mm
    pub async fn jog(&self, axis: JogAxis, distance: f64) -> Result<()> {
        self.post_form("control/jog", &[(axis.as_str(), distance.to_string())])
            .await
    }

    /// `POST control/jog` — home one axis (`home<axis>` form token)
    pub async fn home(&self, axis: JogAxis) -> Result<()> {
        let field = format!("home{}", axis.as_str());
        self.post_form_owned("control/jog", vec![(field, String::new())])
            .await
    }

    /// `POST control/command` — send one G-code command verbatim
    pub async fn send_command(&self, command: &str) -> Result<()> {
        self.post_form("control/command", &[("command", command.to_string())])
            .await
    }

    /// `POST control/command` — send a parametric custom command.
    ///
    /// Each `(parameter, value)` pair is sent as a `parameter_<name>` form
    /// field; the host substitutes them into the command template.
    pub async fn send_parametric_command(
        &self,
        command: &str,
        parameters: &[(String, String)],
    ) -> Result<()> {
        let mut form: Vec<(String, String)> = vec![("command".to_string(), command.to_string())];
        for (name, value) in parameters {
            form.push((format!("parameter_{name}"), value.clone()));
        }
        self.post_form_owned("control/command", form).await
    }

    // ── Job control ──────────────────────────────────────────────────────

    /// `POST control/print` — start printing the loaded file
    pub async fn start_print(&self) -> Result<()> {
        self.post_form("control/print", &[]).await
    }

    /// `POST control/pause` — toggle pause
    pub async fn pause_print(&self) -> Result<()> {
        self.post_form("control/pause", &[]).await
    }

    /// `POST control/cancel` — cancel the running print
    pub async fn cancel_print(&self) -> Result<()> {
        self.post_form("control/cancel", &[]).await
    }

    // ── Temperature ──────────────────────────────────────────────────────

    /// `POST control/temperature` — set the hotend target
    pub async fn set_hotend_temperature(&self, celsius: f64) -> Result<()> {
        self.post_form("control/temperature", &[("temp", celsius.to_string())])
            .await
    }

    /// `POST control/temperature` — set the bed target
    pub async fn set_bed_temperature(&self, celsius: f64) -> Result<()> {
        self.post_form("control/temperature", &[("bedTemp", celsius.to_string())])
            .await
    }

    // ── Speed ────────────────────────────────────────────────────────────

    /// `GET control/speed`
    pub async fn speed(&self) -> Result<SpeedResponse> {
        self.get_json("control/speed").await
    }

    /// `POST control/speed` — set one feedrate; the response carries the
    /// full updated set
    pub async fn set_speed(&self, structure: SpeedStructure, value: u32) -> Result<SpeedResponse> {
        self.post_form_json("control/speed", &[(structure.as_str(), value.to_string())])
            .await
    }

    // ── G-code files ─────────────────────────────────────────────────────

    /// `GET gcodefiles` — list files on the host
    pub async fn gcode_files(&self) -> Result<FileListing> {
        self.get_json("gcodefiles").await
    }

    /// `POST gcodefiles/load` — select a file for printing
    pub async fn load_file(&self, filename: &str) -> Result<()> {
        self.post_form("gcodefiles/load", &[("filename", filename.to_string())])
            .await
    }

    /// `POST gcodefiles/delete` — delete a file; the response carries the
    /// updated listing
    pub async fn delete_file(&self, filename: &str) -> Result<FileListing> {
        self.post_form_json("gcodefiles/delete", &[("filename", filename.to_string())])
            .await
    }

    /// `GET downloads/files/local/{filename}?ctime=` — fetch raw G-code.
    ///
    /// `ctime` is the file's upload timestamp; the host uses it for cache
    /// validation, we pass along whatever the job data reported.
    pub async fn download_gcode(&self, filename: &str, ctime: Option<i64>) -> Result<String> {
        let mut url = self.download_url(filename)?;
        if let Some(ctime) = ctime {
            url.query_pairs_mut().append_pair("ctime", &ctime.to_string());
        }

        debug!("downloading G-code from {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::api(format!("GET {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_status(status.as_u16(), url.path().to_string()));
        }
        response
            .text()
            .await
            .map_err(|e| Error::api(format!("reading G-code body: {e}")))
    }

    // ── Timelapse ────────────────────────────────────────────────────────

    /// `GET timelapse` — current config and rendered clips
    pub async fn timelapse(&self) -> Result<TimelapseResponse> {
        self.get_json("timelapse").await
    }

    /// `POST timelapse/config` — save mode (and interval when timed); the
    /// response carries the updated config and file list
    pub async fn save_timelapse_config(
        &self,
        mode: TimelapseMode,
        interval: Option<u32>,
    ) -> Result<TimelapseResponse> {
        let mut form: Vec<(&str, String)> = vec![("type", mode.as_str().to_string())];
        if mode == TimelapseMode::Timed {
            if let Some(interval) = interval {
                form.push(("interval", interval.to_string()));
            }
        }
        self.post_form_json("timelapse/config", &form).await
    }

    /// `DELETE timelapse/{filename}` — remove a rendered clip
    pub async fn delete_timelapse(&self, filename: &str) -> Result<()> {
        let mut url = self.ajax_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.ajax_base.to_string()))?
            .push("timelapse")
            .push(filename);

        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| Error::api(format!("DELETE {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_status(status.as_u16(), url.path().to_string()));
        }
        Ok(())
    }

    // ── URL helpers ──────────────────────────────────────────────────────

    fn api_url(&self, endpoint: &str) -> Result<Url> {
        self.ajax_base
            .join(endpoint)
            .map_err(|e| Error::InvalidUrl(format!("{endpoint}: {e}")))
    }

    fn download_url(&self, filename: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(["downloads", "files", "local", filename]);
        Ok(url)
    }

    // ── Request plumbing ─────────────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.api_url(endpoint)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::api(format!("GET {endpoint}: {e}")))?;
        Self::json_body(endpoint, response).await
    }

    /// POST a form body, discarding the response payload
    async fn post_form(&self, endpoint: &str, form: &[(&str, String)]) -> Result<()> {
        let url = self.api_url(endpoint)?;
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::api(format!("POST {endpoint}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_status(status.as_u16(), endpoint));
        }
        Ok(())
    }

    async fn post_form_owned(&self, endpoint: &str, form: Vec<(String, String)>) -> Result<()> {
        let url = self.api_url(endpoint)?;
        let response = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::api(format!("POST {endpoint}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_status(status.as_u16(), endpoint));
        }
        Ok(())
    }

    /// POST a form body and deserialize the JSON response
    async fn post_form_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, String)],
    ) -> Result<T> {
        let url = self.api_url(endpoint)?;
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::api(format!("POST {endpoint}: {e}")))?;
        Self::json_body(endpoint, response).await
    }

    async fn json_body<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_status(status.as_u16(), endpoint));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| Error::api(format!("decoding {endpoint} response: {e}")))
    }
}
