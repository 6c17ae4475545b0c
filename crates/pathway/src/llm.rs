//! Client implementation for interacting with Ollama LLMs.
//!
//! Both AI collaborators ([`LlmRoadmapGenerator`](crate::generation::LlmRoadmapGenerator)
//! and [`LlmSummaryGenerator`](crate::summary::LlmSummaryGenerator)) talk to a locally
//! running Ollama service through this client. Only the chat endpoint is used; roadmap
//! generation additionally asks Ollama to constrain the reply to JSON.
//!
//! # Examples
//!
//! ```no_run
//! use pathway::llm::{LlamaRequest, Model, OllamaEndpoint};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = LlamaRequest::new()
//!   .with_host("http://localhost:11434")
//!   .with_endpoint(OllamaEndpoint::Chat)
//!   .with_model(Model::Llama3p2c3b)
//!   .with_system("You are an expert career coach.")
//!   .with_message("Which skills does a backend engineer need?");
//!
//! let response = request.send().await?;
//! println!("Response: {}", response.message.content);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Host used when a request has none configured.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// API endpoints of the Ollama service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OllamaEndpoint {
  /// Chat completion endpoint for conversation-style interactions
  Chat,
  /// Raw text generation endpoint
  Generate,
}

impl OllamaEndpoint {
  /// Converts the endpoint variant to its URL path string.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Chat => "/api/chat",
      Self::Generate => "/api/generate",
    }
  }
}

/// Models the client knows by name.
///
/// Any other model pulled into the local Ollama install can be addressed with
/// [`Model::Named`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Model {
  /// Llama 3.2 3B model variant
  Llama3p2c3b,
  /// Any other model tag, e.g. `mistral:7b`
  Named(String),
}

impl Default for Model {
  fn default() -> Self { Model::Llama3p2c3b }
}

impl From<String> for Model {
  fn from(value: String) -> Self {
    match value.as_str() {
      "llama3.2:3b" => Model::Llama3p2c3b,
      _ => Model::Named(value),
    }
  }
}

impl From<Model> for String {
  fn from(model: Model) -> Self { model.to_string() }
}

impl Display for Model {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Model::Llama3p2c3b => write!(f, "llama3.2:3b"),
      Model::Named(name) => write!(f, "{name}"),
    }
  }
}

/// Request builder for Ollama LLM interactions.
///
/// # Examples
///
/// ```no_run
/// # use pathway::llm::{LlamaRequest, Model};
/// # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let response = LlamaRequest::new()
///   .with_model(Model::Llama3p2c3b)
///   .with_json_format()
///   .with_message("Reply with {\"ok\": true}")
///   .send()
///   .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Serialize, Default)]
pub struct LlamaRequest {
  /// The LLM model to use for generation. If not specified, will result in
  /// an error when sending the request.
  pub model: Option<Model>,

  /// Conversation messages, processed in order. Must contain at least one message
  /// before sending the request.
  pub messages: Vec<Message>,

  /// Whether to stream the response. Streaming is not supported by this client.
  pub stream: bool,

  /// Output format constraint, `"json"` when structured output is required.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,

  /// Generation parameters including temperature, top-k, top-p, and maximum
  /// token count.
  pub options: Options,

  /// The target URL for the request. If not specified, defaults to
  /// localhost:11434 with a warning. Skipped during serialization.
  #[serde(skip)]
  pub url: Option<Url>,
}

/// A single message in the conversation.
///
/// # Examples
///
/// ```
/// use pathway::llm::Message;
///
/// let message = Message::user("Summarize this module for me");
/// assert_eq!(message.role, "user");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
  /// The role of the message sender: `system`, `user` or `assistant`.
  pub role: String,

  /// The actual content of the message.
  pub content: String,
}

impl Message {
  /// A message from the user.
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: "user".to_string(), content: content.into() }
  }

  /// An instruction framing the whole conversation.
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: "system".to_string(), content: content.into() }
  }
}

/// Configuration options for LLM inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
  /// Maximum number of tokens to generate
  num_predict: u64,
  /// Top-k sampling parameter
  top_k:       u64,
  /// Top-p (nucleus) sampling parameter
  top_p:       f64,
  /// Temperature for controlling randomness in generation
  temperature: f64,
}

impl Default for Options {
  fn default() -> Self { Self { num_predict: 4096, top_k: 50, top_p: 0.95, temperature: 0.7 } }
}

impl Options {
  /// Sets the sampling temperature.
  pub fn with_temperature(mut self, temperature: f64) -> Self {
    self.temperature = temperature;
    self
  }

  /// Caps the number of generated tokens.
  pub fn with_max_tokens(mut self, num_predict: u64) -> Self {
    self.num_predict = num_predict;
    self
  }
}

/// Response structure from Ollama chat requests.
///
/// Only `message` is required; the timing metadata is filled with defaults when the
/// service leaves it out.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlamaResponse {
  /// Name of the model used
  pub model:                String,
  /// Timestamp of response creation
  pub created_at:           String,
  /// Generated message content
  pub message:              Message,
  /// Reason for completion
  pub done_reason:          String,
  /// Whether generation is complete
  pub done:                 bool,
  /// Total processing time in nanoseconds
  pub total_duration:       u64,
  /// Model loading time in nanoseconds
  pub load_duration:        u64,
  /// Number of tokens in the prompt
  pub prompt_eval_count:    u64,
  /// Time spent evaluating prompt in nanoseconds
  pub prompt_eval_duration: u64,
  /// Number of generated tokens
  pub eval_count:           u64,
  /// Time spent generating tokens in nanoseconds
  pub eval_duration:        u64,
}

impl LlamaRequest {
  /// Creates a new request with builder-style API with default settings.
  pub fn new() -> Self { Self::default() }

  /// Sets the host URL for the request.
  pub fn with_host(mut self, host: &str) -> Self {
    self.url = Url::parse(host).ok();
    if self.url.is_none() {
      warn!("Ignoring unparseable host {host}");
    }
    self
  }

  /// Sets the API endpoint for the request, relative to the configured host.
  ///
  /// Only the chat endpoint has a response shape this client understands.
  pub fn with_endpoint(mut self, endpoint: OllamaEndpoint) -> Self {
    if endpoint != OllamaEndpoint::Chat {
      warn!("Endpoint {:?} is not fully supported yet", endpoint);
    }

    let base = match self.url.take() {
      Some(url) => url,
      None => {
        warn!("No host set, using localhost");
        match Url::parse(DEFAULT_HOST) {
          Ok(url) => url,
          Err(_) => return self,
        }
      },
    };

    self.url = base.join(endpoint.as_str()).ok();
    self
  }

  /// Sets the model to use for the request.
  pub fn with_model(mut self, model: Model) -> Self {
    self.model.replace(model);
    self
  }

  /// Adds a system message framing the conversation.
  pub fn with_system(mut self, content: &str) -> Self {
    self.messages.push(Message::system(content));
    self
  }

  /// Adds a user message to the conversation.
  pub fn with_message(mut self, content: &str) -> Self {
    self.messages.push(Message::user(content));
    self
  }

  /// Asks the model to reply with a single JSON value.
  pub fn with_json_format(mut self) -> Self {
    self.format = Some("json".to_string());
    self
  }

  /// Replaces the generation parameters.
  pub fn with_options(mut self, options: Options) -> Self {
    self.options = options;
    self
  }

  /// Sends the request to the Ollama service.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - No model is specified
  /// - No messages are provided
  /// - The network request fails or returns an error status
  /// - The response cannot be parsed
  pub async fn send(&self) -> Result<LlamaResponse> {
    if self.model.is_none() {
      return Err(PathwayError::LLMMissingModel);
    }

    if self.messages.is_empty() {
      return Err(PathwayError::LLMMissingMessage);
    }

    let url = match &self.url {
      Some(url) => url.clone(),
      None => {
        warn!("No URL set, using localhost/chat");
        Url::parse(DEFAULT_HOST)
          .and_then(|base| base.join(OllamaEndpoint::Chat.as_str()))
          .map_err(|e| PathwayError::Config(format!("invalid default LLM url: {e}")))?
      },
    };

    debug!("Sending {} message(s) to {}", self.messages.len(), url);
    let client = reqwest::Client::new();
    let response = client.post(url).json(&self).send().await?.error_for_status()?;
    let llama_response: LlamaResponse = response.json().await?;
    trace!("LLM replied with {} characters", llama_response.message.content.len());
    Ok(llama_response)
  }
}
